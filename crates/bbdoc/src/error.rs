//! CLI error types.

use bbdoc_config::ConfigError;
use bbdoc_model::ModelError;
use bbdoc_pages::PageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("{0}")]
    Page(#[from] PageError),
}
