use crate::cli_args::InitArgs;
use crate::commands::resolve_cli_path;
use anyhow::{Context, Result};
use colored::Colorize;
use gmd_core::{AppError, Config, DEFAULT_CONFIG_FILENAME};
use log;
use std::env;
use std::fs::{DirBuilder, OpenOptions};
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};

const TEMPLATE_MODE: u32 = 0o777;

pub fn handle_init_command(args: &InitArgs, quiet: bool) -> Result<()> {
    let current_dir = env::current_dir().context("Failed to determine current directory")?;
    let config_path = resolve_cli_path(args.config.as_deref(), &current_dir, DEFAULT_CONFIG_FILENAME);

    write_template(&config_path)?;

    if !quiet {
        println!(
            "{} Default configuration file created: {}",
            "✅".green(),
            config_path.display().to_string().blue()
        );
    }
    Ok(())
}

fn write_template(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        anyhow::bail!(AppError::Config(format!(
            "A configuration file ('{}') already exists.",
            config_path.display()
        )));
    }
    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(TEMPLATE_MODE);
        builder.create(parent).map_err(|e| AppError::DirCreation {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    log::debug!("Writing default template to {}", config_path.display());
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(TEMPLATE_MODE);

    let to_write_error = |e| AppError::FileWrite {
        path: config_path.to_path_buf(),
        source: e,
    };
    let mut file = options.open(config_path).map_err(to_write_error)?;
    file.write_all(Config::default_template().as_bytes())
        .map_err(to_write_error)?;
    Ok(())
}
