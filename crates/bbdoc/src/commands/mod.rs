//! CLI command implementations.

mod all;
mod classes;
mod nodes;

use std::path::PathBuf;

use bbdoc_config::{Config, NodeListLayout};
use bbdoc_markup::LinkStyle;
use bbdoc_model::{DocModel, load_classes, load_graph_nodes};
use bbdoc_pages::{
    BuildReport, ClassDocsBuilder, ClassDocsOptions, IndexOptions, NodeDocsBuilder, NodeDocsOptions,
    NodeLayout, NodeListingOptions, PageOptions,
};
use clap::Args;

use crate::error::CliError;

pub(crate) use all::AllArgs;
pub(crate) use classes::ClassesArgs;
pub(crate) use nodes::NodesArgs;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover bbdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (per-file progress and summaries).
    #[arg(short, long)]
    pub verbose: bool,

    /// Omit the "Generated on" footer (overrides config).
    #[arg(long)]
    no_timestamp: bool,
}

impl CommonArgs {
    fn timestamp(&self) -> Option<bool> {
        self.no_timestamp.then_some(false)
    }
}

/// Footer options for one run.
///
/// The date is taken once so every page of a run carries the same footer.
fn page_options(config: &Config) -> PageOptions {
    PageOptions {
        generated_on: config
            .output
            .timestamp
            .then(|| chrono::Local::now().format("%b %d, %Y").to_string()),
    }
}

fn link_style(config: &Config) -> LinkStyle {
    LinkStyle {
        page_extension: config.links.page_extension.clone(),
        external_base_url: config.links.external_base_url.clone(),
    }
}

/// Load every class record and link it against the engine catalog.
fn load_model(config: &Config) -> Result<DocModel, CliError> {
    let classes = load_classes(&config.classes_resolved.source_dir)?;
    let model = DocModel::from_local(classes);
    tracing::debug!(
        local = model.local_names().len(),
        total = model.classes().count(),
        "Linked class model"
    );
    Ok(model)
}

/// Write class pages and the class index.
fn build_classes(config: &Config, model: &DocModel, page: &PageOptions) -> Result<BuildReport, CliError> {
    let classes = &config.classes_resolved;
    let options = ClassDocsOptions {
        output_dir: classes.output_dir.clone(),
        index_file: classes.index_file.clone(),
        index: IndexOptions {
            title: classes.index_title.clone(),
            intro: classes.index_intro.clone(),
        },
        index_link_prefix: classes.link_prefix.clone(),
        style: link_style(config),
        page: page.clone(),
    };
    Ok(ClassDocsBuilder::new(options).build(model)?)
}

/// Write the graph node page and C++ header.
fn build_nodes(config: &Config, model: &DocModel, page: &PageOptions) -> Result<BuildReport, CliError> {
    let settings = config.require_graph_nodes()?;
    let nodes = load_graph_nodes(&settings.source)?;

    let options = NodeDocsOptions {
        markdown_output: settings.markdown_output.clone(),
        cpp_output: settings.cpp_output.clone(),
        layout: match settings.layout {
            NodeListLayout::Listing => NodeLayout::Listing,
            NodeListLayout::Table => NodeLayout::Table,
        },
        listing: NodeListingOptions {
            title: settings.title.clone(),
            intro: settings.intro.clone(),
        },
        link_prefix: settings.link_prefix.clone(),
        style: link_style(config),
        page: page.clone(),
    };
    Ok(NodeDocsBuilder::new(options).build(&nodes, model)?)
}
