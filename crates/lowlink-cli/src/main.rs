#![forbid(unsafe_code)]

mod cmd;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "lowlink: strongly connected components and bridges of edge lists",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (shorthand for `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file to use instead of the lookup order.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Analyse an edge list",
        long_about = "Find strongly connected components, bridges, and the condensation order \
                      of a plain-text edge list.",
        after_help = "EXAMPLES:\n    # Analyse a file\n    lowlink analyze deps.txt\n\n    # Read from stdin\n    printf 'A B\\nB A\\nB C\\n' | lowlink analyze\n\n    # Treat edges as one-way for bridge detection\n    lowlink analyze deps.txt --bridge-view directed\n\n    # Emit machine-readable output\n    lowlink analyze deps.txt --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Show the effective configuration",
        after_help = "EXAMPLES:\n    # Print resolved config as TOML\n    lowlink config\n\n    # Use a specific file\n    lowlink --config ci.toml config"
    )]
    Config,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("LOWLINK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "lowlink=debug,info"
        } else {
            "lowlink=info,warn"
        })
    });

    let format = env::var("LOWLINK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let cwd = env::current_dir()?;
    let (config, source) = config::resolve_config(cli.config.as_deref(), &cwd)?;
    debug!(source = %source.describe(), "configuration resolved");

    let output = resolve_output_mode(cli.format, cli.json, config.output.format);

    match cli.command {
        Commands::Analyze(ref args) => cmd::analyze::run_analyze(args, &config, output),
        Commands::Config => cmd::config::run_config(&config, &source, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_parses_with_file() {
        let cli = Cli::parse_from(["lowlink", "analyze", "deps.txt"]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.file, Some(PathBuf::from("deps.txt")));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["lowlink", "analyze", "--json", "--verbose"]);
        assert!(cli.json);
        assert!(cli.verbose);
    }

    #[test]
    fn format_flag_takes_a_value() {
        let cli = Cli::parse_from(["lowlink", "--format", "text", "config"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["lowlink", "config", "--config", "ci.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["lowlink", "--format", "yaml", "config"]).is_err());
    }
}
