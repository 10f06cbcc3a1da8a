use crate::cli_args::GenerateArgs;
use crate::commands::resolve_cli_path;
use crate::output;
use anyhow::{Context, Result};
use gmd_core::{
    self as core, AppError, Config, DEFAULT_CONFIG_FILENAME, DEFAULT_OUTPUT_DIR, LanguageTable,
    OutputSummary,
};
use log;
use std::env;
use std::path::Path;

pub fn handle_generate_command(args: &GenerateArgs, quiet: bool) -> Result<()> {
    let current_dir = env::current_dir().context("Failed to determine current directory")?;

    let config_path = resolve_cli_path(
        args.config.as_deref(),
        &current_dir,
        DEFAULT_CONFIG_FILENAME,
    );
    let output_dir = resolve_cli_path(args.output_dir.as_deref(), &current_dir, DEFAULT_OUTPUT_DIR);
    log::debug!(
        "Resolved config path: {}, output dir: {}",
        config_path.display(),
        output_dir.display()
    );

    let config = load_config(&config_path)?;

    output::print_run_header(&config_path, &output_dir, quiet);
    let summaries = generate_outputs(&config, &output_dir, quiet)?;
    output::print_summary_table(&summaries, quiet);

    log::info!("Markdown documentation generated successfully.");
    Ok(())
}

fn load_config(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        anyhow::bail!(AppError::Config(format!(
            "Configuration file '{}' does not exist. Use the --config flag to specify the correct file, or run `gmd init`.",
            config_path.display()
        )));
    }
    Config::load_from_path(config_path)
        .with_context(|| format!("Error loading config file {}", config_path.display()))
}

fn generate_outputs(
    config: &Config,
    output_dir: &Path,
    quiet: bool,
) -> Result<Vec<OutputSummary>> {
    let mut summaries = Vec::with_capacity(config.output_count());
    core::process_outputs_with(config, output_dir, LanguageTable::builtin(), |summary| {
        output::print_output_written(summary, quiet);
        summaries.push(summary.clone());
    })
    .context("Error processing outputs")?;
    Ok(summaries)
}
