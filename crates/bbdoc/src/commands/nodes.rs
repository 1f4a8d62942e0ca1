//! `bbdoc nodes` command implementation.

use std::path::{Path, PathBuf};

use bbdoc_config::{CliSettings, Config};
use clap::Args;

use super::{CommonArgs, build_nodes, load_model, page_options};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nodes command.
#[derive(Args)]
pub(crate) struct NodesArgs {
    /// Graph node catalog XML file (overrides config).
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Markdown page to write (overrides config).
    #[arg(long)]
    markdown_output: Option<PathBuf>,

    /// C++ header to write (overrides config).
    #[arg(long)]
    cpp_output: Option<PathBuf>,

    /// Directory of class XML records used to resolve references (overrides config).
    #[arg(long)]
    classes_dir: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl NodesArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.classes_dir,
            nodes_source: self.source,
            nodes_markdown_output: self.markdown_output,
            nodes_cpp_output: self.cpp_output,
            timestamp: self.common.timestamp(),
            ..CliSettings::default()
        };
        let config = Config::load(self.common.config.as_deref(), Some(&cli_settings))?;
        let settings = config.require_graph_nodes()?;

        output.info(&format!("Source: {}", settings.source.display()));

        let model = load_model(&config)?;
        let report = build_nodes(&config, &model, &page_options(&config))?;

        let dir = report
            .files
            .first()
            .and_then(|path| path.parent())
            .unwrap_or(Path::new("."));
        output.generated(&report, dir);
        Ok(())
    }
}
