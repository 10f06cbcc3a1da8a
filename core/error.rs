use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("YAML Parsing Error: {0}")]
    YamlError(#[from] serde_yml::Error),

    #[error("Traversal Error: Path '{path}', Error: {source}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Creation Error: Path '{path}', Error: {source}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Rule #{index} (base_dir '{base_dir}') failed")]
    Rule {
        index: usize,
        base_dir: PathBuf,
        #[source]
        source: Box<AppError>,
    },

    #[error("Output '{name}' failed")]
    Output {
        name: String,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Innermost error below any `Output`/`Rule` wrapping.
    pub fn root_cause(&self) -> &AppError {
        match self {
            AppError::Output { source, .. } | AppError::Rule { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn in_rule(self, index: usize, base_dir: &std::path::Path) -> Self {
        AppError::Rule {
            index,
            base_dir: base_dir.to_path_buf(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_output(self, name: &str) -> Self {
        AppError::Output {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}
