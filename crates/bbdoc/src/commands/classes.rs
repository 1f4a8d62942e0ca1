//! `bbdoc classes` command implementation.

use std::path::PathBuf;

use bbdoc_config::{CliSettings, Config};
use clap::Args;

use super::{CommonArgs, build_classes, load_model, page_options};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the classes command.
#[derive(Args)]
pub(crate) struct ClassesArgs {
    /// Directory of class XML records (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Directory receiving class pages (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl ClassesArgs {
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
        let report = build_classes(&config, &model, &page_options(&config))?;

        output.generated(&report, &config.classes_resolved.output_dir);
        Ok(())
    }
}
