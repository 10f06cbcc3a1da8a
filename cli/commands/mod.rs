pub mod generate;
pub mod init;

use std::path::{Path, PathBuf};

/// Resolves a user-supplied path (tilde-expanded) or falls back to `default_name` under `cwd`.
pub fn resolve_cli_path(raw: Option<&str>, cwd: &Path, default_name: &str) -> PathBuf {
    match raw {
        Some(p_str) => PathBuf::from(shellexpand::tilde(p_str).as_ref()),
        None => cwd.join(default_name),
    }
}
