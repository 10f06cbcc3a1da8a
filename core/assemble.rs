use crate::config::{Config, Rule};
use crate::error::{AppError, Result};
use crate::gather::select_files;
use crate::render::{LanguageTable, render_file};
use log;
use std::collections::HashSet;
use std::fs::{DirBuilder, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};

const PERMISSIVE_MODE: u32 = 0o777;

/// A fully assembled output document, not yet written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub content: Vec<u8>,
    pub rule_count: usize,
    pub file_count: usize,
    pub skipped_duplicates: usize,
}

/// What was written for one output.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSummary {
    pub name: String,
    pub path: PathBuf,
    pub rule_count: usize,
    pub file_count: usize,
    pub bytes_written: usize,
}

/// Builds one output document from `rules`, in order.
///
/// A file matched by more than one rule is emitted once, at its first match.
/// Any selector or renderer failure aborts the whole document.
pub fn build_document(rules: &[Rule], languages: &LanguageTable) -> Result<Document> {
    let mut document = Document {
        rule_count: rules.len(),
        ..Document::default()
    };
    let mut processed: HashSet<PathBuf> = HashSet::new();

    for (index, rule) in rules.iter().enumerate() {
        let rule_number = index + 1;
        log::debug!(
            "Processing rule #{} (base_dir: {})",
            rule_number,
            rule.base_dir.display()
        );

        let matches = select_files(rule).map_err(|e| e.in_rule(rule_number, &rule.base_dir))?;

        if let Some(heading) = rule.heading_text() {
            push_str(&mut document.content, &format!("## {}\n\n", heading));
        }
        if let Some(description) = rule.description_text() {
            push_str(&mut document.content, &format!("> NOTE: {}\n\n", description));
        }

        for matched in matches {
            if !processed.insert(matched.path.clone()) {
                log::trace!("Skipping already emitted file: {}", matched.path.display());
                document.skipped_duplicates += 1;
                continue;
            }

            let block = render_file(&matched.path, languages)
                .map_err(|e| e.in_rule(rule_number, &rule.base_dir))?;

            push_str(
                &mut document.content,
                &format!("### File: `{}`\n", matched.display_path()),
            );
            block.write_into(&mut document.content);
            document.content.extend_from_slice(b"\n\n");
            document.file_count += 1;
        }
    }

    Ok(document)
}

/// Builds the document for `output_name` and writes it to `output_dir/output_name`.
///
/// Nothing is written unless the whole document was built.
pub fn assemble_output(
    output_name: &str,
    rules: &[Rule],
    output_dir: &Path,
    languages: &LanguageTable,
) -> Result<OutputSummary> {
    log::debug!("Assembling output '{}' from {} rule(s)", output_name, rules.len());
    let output_path = output_dir.join(output_name);

    let document = build_document(rules, languages).map_err(|e| e.in_output(output_name))?;
    write_output(&output_path, &document.content).map_err(|e| e.in_output(output_name))?;

    log::debug!(
        "Wrote {} ({} files, {} duplicate(s) skipped)",
        output_path.display(),
        document.file_count,
        document.skipped_duplicates
    );
    Ok(OutputSummary {
        name: output_name.to_string(),
        path: output_path,
        rule_count: document.rule_count,
        file_count: document.file_count,
        bytes_written: document.content.len(),
    })
}

/// Writes every configured output under `output_dir`, stopping at the first error.
///
/// Outputs written before the failure stay on disk; later ones are not attempted.
pub fn process_outputs(
    config: &Config,
    output_dir: &Path,
    languages: &LanguageTable,
) -> Result<Vec<OutputSummary>> {
    let mut summaries = Vec::with_capacity(config.output_count());
    process_outputs_with(config, output_dir, languages, |summary| {
        summaries.push(summary.clone())
    })?;
    Ok(summaries)
}

/// Same as [`process_outputs`], reporting each output as soon as it is on disk.
pub fn process_outputs_with<F>(
    config: &Config,
    output_dir: &Path,
    languages: &LanguageTable,
    mut on_written: F,
) -> Result<()>
where
    F: FnMut(&OutputSummary),
{
    ensure_output_dir(output_dir)?;

    for (name, rules) in config.outputs() {
        let summary = assemble_output(name, rules, output_dir, languages)?;
        on_written(&summary);
    }
    Ok(())
}

pub fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(PERMISSIVE_MODE);
    builder.create(output_dir).map_err(|e| AppError::DirCreation {
        path: output_dir.to_path_buf(),
        source: e,
    })
}

fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    // Output names may contain subdirectories.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            ensure_output_dir(parent)?;
        }
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(PERMISSIVE_MODE);

    let to_write_error = |e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = options.open(path).map_err(to_write_error)?;
    file.write_all(content).map_err(to_write_error)?;
    file.flush().map_err(to_write_error)
}

fn push_str(buf: &mut Vec<u8>, text: &str) {
    buf.extend_from_slice(text.as_bytes());
}
