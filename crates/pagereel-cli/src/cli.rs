use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use pagereel_runtime::PageConfig;

use crate::error::Result;
use crate::logging::{self, LogFormat};
use crate::rotate::{RotateArgs, run_rotate};
use crate::simulate::{SimulateArgs, run_simulate};
use crate::table::{TableArgs, run_table};

#[derive(Debug, Parser)]
#[command(
    name = "pagereel",
    about = "Drive a scroll-tracked report page from the command line",
    version
)]
pub struct Cli {
    /// Log output format. The filter is read from PAGEREEL_LOG (default: warn).
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scroll through the page and report the active section at each step.
    Simulate(SimulateArgs),

    /// Print the data table shown by the spreadsheet modal.
    Table(TableArgs),

    /// Run the headline rotator on a live timer.
    Rotate(RotateArgs),

    /// Print the effective page configuration.
    #[command(name = "print-config")]
    PrintConfig(PrintConfigArgs),
}

/// Page configuration source shared by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Page config file (`.toml` or `.json`). Built-in defaults when absent.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<PageConfig> {
        match &self.config {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading page config");
                Ok(PageConfig::from_file(path)?)
            }
            None => Ok(PageConfig::default()),
        }
    }

    /// Directory that relative paths inside the config resolve against.
    pub fn base_dir(&self) -> &Path {
        self.config
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
}

#[derive(Debug, Clone, Default, Args)]
pub struct PrintConfigArgs {
    #[command(flatten)]
    pub source: ConfigArgs,

    #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
    pub format: ConfigFormat,
}

pub fn run_print_config(args: PrintConfigArgs, out: &mut dyn Write) -> Result<()> {
    let config = args.source.load()?;
    match args.format {
        ConfigFormat::Toml => write!(out, "{}", config.to_toml_string()?)?,
        ConfigFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?,
    }
    Ok(())
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Simulate(args) => run_simulate(args, out),
        Commands::Table(args) => run_table(args, out),
        Commands::Rotate(args) => run_rotate(args, out),
        Commands::PrintConfig(args) => run_print_config(args, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_log_format_after_subcommand() {
        let cli = Cli::try_parse_from(["pagereel", "table", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Commands::Table(_)));
    }

    #[test]
    fn default_config_prints_as_json() {
        let mut out = Vec::new();
        run_print_config(
            PrintConfigArgs {
                source: ConfigArgs::default(),
                format: ConfigFormat::Json,
            },
            &mut out,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["rotator"]["interval_ms"], 2000);
        assert_eq!(value["nav"].as_array().map(Vec::len), Some(7));
    }

    #[test]
    fn base_dir_defaults_to_cwd() {
        assert_eq!(ConfigArgs::default().base_dir(), Path::new("."));
        let args = ConfigArgs {
            config: Some(PathBuf::from("site/report.toml")),
        };
        assert_eq!(args.base_dir(), Path::new("site"));
    }
}
