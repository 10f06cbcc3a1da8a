use clap::{Args, Parser, Subcommand};

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    #[arg(
        long,
        help = "Path to the YAML configuration file (default: ./gmd-config.yaml).",
        value_name = "PATH",
        help_heading = "Project Setup"
    )]
    pub config: Option<String>,

    #[arg(
        long = "output-dir",
        visible_alias = "output_dir",
        help = "Directory to save the generated Markdown files (default: ./gmd_output).",
        value_name = "DIR",
        help_heading = "Output Control"
    )]
    pub output_dir: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    #[arg(
        long,
        help = "Where to write the template (default: ./gmd-config.yaml).",
        value_name = "PATH"
    )]
    pub config: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "gmd",
    author,
    version,
    about = "gmd: Generate Markdown Documentation.",
    long_about = "gmd: Generate Markdown Documentation.\n\ngmd walks the directories named in gmd-config.yaml, selects files by \ninclude/exclude patterns and excluded directory names, and writes each \nconfigured output as a Markdown document of fenced, language-tagged code blocks.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  gmd\n  gmd --config docs/gmd-config.yaml --output-dir build/docs\n  gmd init\n  gmd help"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub generate: GenerateArgs,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        visible_alias = "gen",
        about = "Generate Markdown documents from the configuration [default]."
    )]
    Generate(GenerateArgs),

    #[command(about = "Create a default gmd-config.yaml in the current directory.")]
    Init(InitArgs),
}
