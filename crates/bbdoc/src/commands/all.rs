//! `bbdoc all` command implementation.

use std::path::PathBuf;

use bbdoc_config::{CliSettings, Config};
use clap::Args;

use super::{CommonArgs, build_classes, build_nodes, load_model, page_options};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the all command.
#[derive(Args)]
pub(crate) struct AllArgs {
    /// Directory of class XML records (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Directory receiving class pages (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl AllArgs {
    /// Run the class pipeline, then the node pipeline when `[graph_nodes]` is configured.
    ///
    /// Both pipelines share one model and one footer date.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            timestamp: self.common.timestamp(),
            ..CliSettings::default()
        };
        let config = Config::load(self.common.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Source: {}",
            config.classes_resolved.source_dir.display()
        ));

        let model = load_model(&config)?;
        let page = page_options(&config);

        let report = build_classes(&config, &model, &page)?;
        output.generated(&report, &config.classes_resolved.output_dir);

        if config.graph_nodes_resolved.is_none() {
            output.warning("Skipping graph nodes: no [graph_nodes] section in config");
            return Ok(());
        }
        let report = build_nodes(&config, &model, &page)?;
        if let Some(dir) = report.files.first().and_then(|path| path.parent()) {
            output.generated(&report, dir);
        }
        Ok(())
    }
}
