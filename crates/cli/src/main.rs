mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trellis_lib::consts::DEFAULT_DECLARATION_FILE;

use crate::cmd::{cmd_check, cmd_plan, cmd_targets};
use crate::output::{OutputFormat, print_error};

/// trellis - composite build targets and dependency-ordered build plans
#[derive(Parser)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (RUST_LOG takes precedence)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve targets into a flat, dependency-ordered build plan
  Plan {
    /// Path to the declaration file
    #[arg(default_value = DEFAULT_DECLARATION_FILE)]
    file: PathBuf,

    /// Root target to resolve (repeatable; defaults to all top-level targets)
    #[arg(short, long = "root", value_name = "TARGET")]
    roots: Vec<String>,

    /// Also show parallel build waves
    #[arg(long)]
    waves: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Validate declarations by resolving every declared target
  Check {
    /// Path to the declaration file
    #[arg(default_value = DEFAULT_DECLARATION_FILE)]
    file: PathBuf,
  },

  /// List declared targets in declaration order
  Targets {
    /// Path to the declaration file
    #[arg(default_value = DEFAULT_DECLARATION_FILE)]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },
}

fn init_logging(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let result: Result<()> = match cli.command {
    Commands::Plan {
      file,
      roots,
      waves,
      output,
    } => cmd_plan(&file, &roots, waves, output),
    Commands::Check { file } => cmd_check(&file),
    Commands::Targets { file, output } => cmd_targets(&file, output),
  };

  if let Err(err) = result {
    print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}
