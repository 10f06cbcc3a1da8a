pub mod assemble;
pub mod config;
pub mod error;
pub mod gather;
pub mod render;

pub use assemble::{
    Document, OutputSummary, assemble_output, build_document, process_outputs,
    process_outputs_with,
};
pub use config::{Config, DEFAULT_CONFIG_FILENAME, DEFAULT_OUTPUT_DIR, Rule};
pub use error::{AppError, Result};
pub use gather::{FileSelector, MatchedFile, select_files};
pub use render::{LanguageTable, RenderedBlock, render_file};
