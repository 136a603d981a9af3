mod cmd;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::TargetArgs;
use output::OutputFormat;

/// Package function code into a deployable artifact
#[derive(Parser)]
#[command(name = "assetpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run pre-build, build and post-build for a module
  Bundle {
    #[command(flatten)]
    target: TargetArgs,

    /// Print the commands that would run without executing them
    #[arg(long)]
    dry_run: bool,
  },

  /// Show the commands of each phase (no changes made)
  Plan {
    #[command(flatten)]
    target: TargetArgs,
  },

  /// Show toolchain defaults and registered build pairings
  Info,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Bundle { target, dry_run } => cmd::cmd_bundle(&target, dry_run, cli.format),
    Commands::Plan { target } => cmd::cmd_plan(&target, cli.format),
    Commands::Info => cmd::cmd_info(cli.format),
  }
}
