//! bbdoc CLI - Class reference generator.
//!
//! Provides commands for:
//! - `classes`: Generate class pages and the class index
//! - `nodes`: Generate the graph node page and C++ header
//! - `all`: Run both pipelines

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AllArgs, ClassesArgs, NodesArgs};
use output::Output;

/// bbdoc - Class reference generator.
#[derive(Parser)]
#[command(name = "bbdoc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate class pages and the class index.
    Classes(ClassesArgs),
    /// Generate graph node documentation.
    Nodes(NodesArgs),
    /// Generate class pages and graph node documentation.
    All(AllArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Classes(args) => args.common.verbose,
            Self::Nodes(args) => args.common.verbose,
            Self::All(args) => args.common.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Classes(args) => args.execute(),
        Commands::Nodes(args) => args.execute(),
        Commands::All(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
