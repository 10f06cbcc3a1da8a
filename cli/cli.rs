mod cli_args;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use colored::*;
use log;
use std::process;

use cli_args::{Cli, Commands};
use gmd_core::AppError;

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>().map(AppError::root_cause) {
        Some(AppError::Config(_)) => 1,
        Some(AppError::YamlError(_)) => 1,
        Some(AppError::Traversal { .. }) => 2,
        Some(AppError::FileRead { .. }) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::DirCreation { .. }) => 2,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            log::debug!("No subcommand given, generating outputs...");
            commands::generate::handle_generate_command(&cli.generate, quiet)?;
        }
        Some(Commands::Generate(args)) => {
            log::debug!("Executing 'generate' command...");
            commands::generate::handle_generate_command(&args, quiet)?;
        }
        Some(Commands::Init(args)) => {
            log::debug!("Executing 'init' command...");
            commands::init::handle_init_command(&args, quiet)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn exit_codes_follow_innermost_cause() {
        let config_err = anyhow::Error::new(AppError::Config("x".to_string()));
        assert_eq!(exit_code_for(&config_err), 1);

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let wrapped = AppError::Output {
            name: "a.md".to_string(),
            source: Box::new(AppError::Rule {
                index: 2,
                base_dir: PathBuf::from("src"),
                source: Box::new(AppError::Traversal {
                    path: PathBuf::from("src"),
                    source: io,
                }),
            }),
        };
        let err = anyhow::Error::new(wrapped).context("Failed to generate Markdown outputs");
        assert_eq!(exit_code_for(&err), 2);

        assert_eq!(exit_code_for(&anyhow::anyhow!("plain")), 1);
    }
}
