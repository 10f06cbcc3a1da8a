use crate::error::{AppError, Result};
use log;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const FALLBACK_LANGUAGE: &str = "plaintext";
const FENCE: &[u8] = b"```";

static BUILTIN_LANGUAGES: Lazy<LanguageTable> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../data/languages.yaml"
    ));
    let map: HashMap<String, String> =
        serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/languages.yaml");
    LanguageTable { by_extension: map }
});

/// Extension → fence language tag. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageTable {
    by_extension: HashMap<String, String>,
}

impl LanguageTable {
    pub fn builtin() -> &'static LanguageTable {
        &BUILTIN_LANGUAGES
    }

    /// Extensions are given without the leading dot.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            by_extension: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }

    /// Case-sensitive lookup on the final extension; anything unknown is `plaintext`.
    pub fn language_for(&self, path: &Path) -> &str {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.by_extension.get(ext))
            .map_or(FALLBACK_LANGUAGE, String::as_str)
    }
}

/// A file's contents wrapped in a language-tagged fence.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub language: String,
    pub content: Vec<u8>,
}

impl RenderedBlock {
    pub fn new(language: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            language: language.into(),
            content,
        }
    }

    /// Appends `` ```<lang>\n<content>\n``` `` with the content untouched.
    pub fn write_into(&self, buf: &mut Vec<u8>) {
        buf.reserve(self.content.len() + self.language.len() + 8);
        buf.extend_from_slice(FENCE);
        buf.extend_from_slice(self.language.as_bytes());
        buf.push(b'\n');
        buf.extend_from_slice(&self.content);
        buf.push(b'\n');
        buf.extend_from_slice(FENCE);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_into(&mut buf);
        buf
    }
}

pub fn render_file(path: &Path, languages: &LanguageTable) -> Result<RenderedBlock> {
    let content = fs::read(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let language = languages.language_for(path);
    log::trace!(
        "Rendered {} ({} bytes) as {}",
        path.display(),
        content.len(),
        language
    );
    Ok(RenderedBlock::new(language, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_table_covers_common_extensions() {
        let table = LanguageTable::builtin();
        assert_eq!(table.language_for(Path::new("main.go")), "go");
        assert_eq!(table.language_for(Path::new("lib.rs")), "rust");
        assert_eq!(table.language_for(Path::new("a/b/app.tsx")), "typescript");
        assert_eq!(table.language_for(Path::new("run.sh")), "bash");
        assert_eq!(table.language_for(Path::new("vars.tfvars")), "hcl");
        assert_eq!(table.len(), 30);
    }

    #[test]
    fn unknown_or_missing_extensions_are_plaintext() {
        let table = LanguageTable::builtin();
        assert_eq!(table.language_for(Path::new("data.zzz")), "plaintext");
        assert_eq!(table.language_for(Path::new("Makefile")), "plaintext");
        assert_eq!(table.language_for(Path::new(".bashrc")), "plaintext");
        assert_eq!(table.language_for(Path::new("Main.PY")), "plaintext");
    }

    #[test]
    fn custom_tables_are_independent_of_builtin() {
        let table = LanguageTable::from_pairs([("zig", "zig")]);
        assert_eq!(table.language_for(Path::new("x.zig")), "zig");
        assert_eq!(table.language_for(Path::new("x.go")), "plaintext");
    }

    #[test]
    fn renders_raw_bytes_inside_fence() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("x.go");
        fs::write(&path, "package main").unwrap();

        let block = render_file(&path, LanguageTable::builtin()).unwrap();
        assert_eq!(block.to_bytes(), b"```go\npackage main\n```".to_vec());
    }

    #[test]
    fn content_is_not_normalised_or_escaped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blob.bin");
        let raw = b"a\r\n```\n\xff\x00".to_vec();
        fs::write(&path, &raw).unwrap();

        let block = render_file(&path, LanguageTable::builtin()).unwrap();
        assert_eq!(block.language, "plaintext");
        assert_eq!(block.content, raw);
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = render_file(&tmp.path().join("gone.rs"), LanguageTable::builtin()).unwrap_err();
        assert!(matches!(err, AppError::FileRead { .. }));
    }
}
