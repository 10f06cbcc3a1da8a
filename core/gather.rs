use crate::config::Rule;
use crate::error::{AppError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Shell-style patterns matched against a single path component.
///
/// Malformed patterns are dropped when the set is built, so they never match.
#[derive(Debug, Clone)]
pub struct NamePatterns {
    set: GlobSet,
    accepted: usize,
}

impl NamePatterns {
    pub fn new(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut accepted = 0;
        for pattern_str in patterns {
            // `*` must not cross a separator, so `sub/*.go` can never match a base name.
            match GlobBuilder::new(pattern_str)
                .literal_separator(true)
                .build()
            {
                Ok(glob) => {
                    log::trace!("Adding name pattern: {}", pattern_str);
                    builder.add(glob);
                    accepted += 1;
                }
                Err(e) => {
                    log::debug!("Ignoring malformed pattern \"{}\": {}", pattern_str, e);
                }
            }
        }
        let set = builder.build().unwrap_or_else(|e| {
            log::debug!("Pattern set could not be compiled, matching nothing: {}", e);
            accepted = 0;
            GlobSet::empty()
        });
        Self { set, accepted }
    }

    pub fn is_empty(&self) -> bool {
        self.accepted == 0
    }

    pub fn matches(&self, name: &OsStr) -> bool {
        !self.is_empty() && self.set.is_match(Path::new(name))
    }
}

/// Compiled form of one rule's include/exclude/exclude_dirs patterns.
#[derive(Debug, Clone)]
pub struct FileSelector {
    include: NamePatterns,
    exclude: NamePatterns,
    exclude_dirs: NamePatterns,
}

impl FileSelector {
    pub fn new(include: &[String], exclude: &[String], exclude_dirs: &[String]) -> Self {
        Self {
            include: NamePatterns::new(include),
            exclude: NamePatterns::new(exclude),
            exclude_dirs: NamePatterns::new(exclude_dirs),
        }
    }

    pub fn for_rule(rule: &Rule) -> Self {
        Self::new(&rule.include, &rule.exclude, &rule.exclude_dirs)
    }

    /// Exclude wins over include; no include patterns means nothing is selected.
    pub fn accepts_file(&self, name: &OsStr) -> bool {
        if self.exclude.matches(name) {
            log::trace!("Excluded by pattern: {}", name.to_string_lossy());
            return false;
        }
        self.include.matches(name)
    }

    pub fn prunes_dir(&self, name: &OsStr) -> bool {
        self.exclude_dirs.matches(name)
    }

    /// Walks `base_dir` depth-first, siblings in file-name order, and returns the
    /// absolute paths of every selected file.
    pub fn select(&self, base_dir: &Path) -> Result<Vec<PathBuf>> {
        let root = resolve_root(base_dir)?;
        self.walk(&root, base_dir.file_name())
    }

    /// Like [`FileSelector::select`], keeping each file's path relative to `base_dir`.
    pub fn select_matches(&self, base_dir: &Path) -> Result<Vec<MatchedFile>> {
        let root = resolve_root(base_dir)?;
        let files = self.walk(&root, base_dir.file_name())?;
        Ok(files
            .into_iter()
            .map(|path| MatchedFile::new(path, &root))
            .collect())
    }

    fn walk(&self, root: &Path, root_name: Option<&OsStr>) -> Result<Vec<PathBuf>> {
        log::debug!("Selecting files under: {}", root.display());

        // The root is judged by the name it was given, so "." is never pruned.
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry, root_name));

        let mut files = Vec::new();
        for entry_result in walker {
            let entry = entry_result.map_err(|e| AppError::Traversal {
                path: e.path().unwrap_or(root).to_path_buf(),
                source: e.into(),
            })?;
            if entry.file_type().is_dir() {
                continue;
            }
            if self.accepts_file(entry.file_name()) {
                log::trace!("Selected: {}", entry.path().display());
                files.push(entry.into_path());
            }
        }
        log::debug!("Selected {} file(s) under {}", files.len(), root.display());
        Ok(files)
    }

    fn is_pruned(&self, entry: &DirEntry, root_name: Option<&OsStr>) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = if entry.depth() == 0 {
            match root_name {
                Some(name) => name,
                None => return false,
            }
        } else {
            entry.file_name()
        };
        let pruned = self.prunes_dir(name);
        if pruned {
            log::trace!("Pruning directory: {}", entry.path().display());
        }
        pruned
    }
}

/// A selected file together with its path relative to the rule's base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub path: PathBuf,
    pub relative: PathBuf,
}

impl MatchedFile {
    fn new(path: PathBuf, root: &Path) -> Self {
        let relative = pathdiff::diff_paths(&path, root)
            .filter(|rel| !rel.as_os_str().is_empty())
            .or_else(|| path.file_name().map(PathBuf::from))
            .unwrap_or_else(|| path.clone());
        Self { path, relative }
    }

    pub fn display_path(&self) -> String {
        self.relative.to_string_lossy().into_owned()
    }
}

/// Absolute form of `base_dir` with `.` and `..` folded away, so the same file
/// reached through different spellings of a directory has one path.
fn resolve_root(base_dir: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(base_dir).map_err(|e| AppError::Traversal {
        path: base_dir.to_path_buf(),
        source: e,
    })?;
    Ok(clean_path(&absolute))
}

fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // `..` at the root stays at the root.
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

/// Runs one selector pass for `rule`.
pub fn select_files(rule: &Rule) -> Result<Vec<MatchedFile>> {
    FileSelector::for_rule(rule).select_matches(&rule.base_dir)
}
