//! Generation runs.
//!
//! A builder renders every output of one pipeline and writes it to disk.
//! Rendering finishes before the first write, so a markup error leaves the
//! previous output untouched.

use std::path::PathBuf;

use bbdoc_markup::{LinkStyle, RenderContext};
use bbdoc_model::{DocModel, GraphNode};

use crate::error::PageError;
use crate::index::{IndexOptions, render_class_index};
use crate::nodes::{NodeListingOptions, render_node_cpp, render_node_listing, render_node_table};
use crate::page::{PageOptions, render_class_page};
use crate::writer::{OutputDir, write_file};

/// Files written by a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub files: Vec<PathBuf>,
}

impl BuildReport {
    #[must_use]
    pub fn count(&self) -> usize {
        self.files.len()
    }
}

/// Settings for class pages and the class index.
#[derive(Debug, Clone)]
pub struct ClassDocsOptions {
    /// Directory receiving one page per local class.
    pub output_dir: PathBuf,
    /// Index page location. No index is written when absent.
    pub index_file: Option<PathBuf>,
    pub index: IndexOptions,
    /// Prefix of class page links in the index, relative to the index file.
    pub index_link_prefix: String,
    pub style: LinkStyle,
    pub page: PageOptions,
}

/// Renders and writes class pages and the class index.
#[derive(Debug, Clone)]
pub struct ClassDocsBuilder {
    options: ClassDocsOptions,
}

impl ClassDocsBuilder {
    #[must_use]
    pub fn new(options: ClassDocsOptions) -> Self {
        Self { options }
    }

    /// Render every local class and the index, then write them.
    ///
    /// # Errors
    ///
    /// Returns an error if a page cannot be rendered or written.
    pub fn build(&self, model: &DocModel) -> Result<BuildReport, PageError> {
        let options = &self.options;
        let ctx = RenderContext::new(model.local_names(), &options.style);

        let mut pages = Vec::new();
        for class in model.local_classes() {
            tracing::debug!(class = %class.name, source = %class.source_id, "Rendering class page");
            let page = render_class_page(class, model, &ctx, &options.page)
                .map_err(|e| PageError::render(&class.name, e))?;
            pages.push((options.style.page_file_name(&class.name), page));
        }

        let index = match &options.index_file {
            Some(path) => {
                let index_ctx = ctx
                    .with_link_prefix(&options.index_link_prefix)
                    .with_unresolved_as_text();
                let content = render_class_index(model, &index_ctx, &options.index, &options.page)
                    .map_err(|e| PageError::render(&path.display().to_string(), e))?;
                Some((path, content))
            }
            None => None,
        };

        let dir = OutputDir::prepare(&options.output_dir, &options.style.page_extension)?;
        let mut report = BuildReport::default();
        for (file_name, content) in &pages {
            report.files.push(dir.write(file_name, content)?);
        }
        if let Some((path, content)) = index {
            write_file(path, &content)?;
            report.files.push(path.clone());
        }

        tracing::info!(
            count = report.count(),
            dir = %options.output_dir.display(),
            "Generated class reference"
        );
        Ok(report)
    }
}

/// Layout of the node listing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeLayout {
    /// One section per node.
    #[default]
    Listing,
    /// One table per category.
    Table,
}

/// Settings for the graph node catalog outputs.
#[derive(Debug, Clone, Default)]
pub struct NodeDocsOptions {
    /// Markdown page location. Skipped when absent.
    pub markdown_output: Option<PathBuf>,
    /// C++ header location. Skipped when absent.
    pub cpp_output: Option<PathBuf>,
    pub layout: NodeLayout,
    pub listing: NodeListingOptions,
    /// Prefix of class page links, relative to the Markdown page.
    pub link_prefix: String,
    pub style: LinkStyle,
    pub page: PageOptions,
}

/// Renders and writes the graph node catalog.
#[derive(Debug, Clone)]
pub struct NodeDocsBuilder {
    options: NodeDocsOptions,
}

impl NodeDocsBuilder {
    #[must_use]
    pub fn new(options: NodeDocsOptions) -> Self {
        Self { options }
    }

    /// Render the catalog and write the configured outputs.
    ///
    /// Class references in descriptions are resolved against the local
    /// classes of `model`.
    ///
    /// # Errors
    ///
    /// Returns an error if a description cannot be rendered or a file cannot be written.
    pub fn build(&self, nodes: &[GraphNode], model: &DocModel) -> Result<BuildReport, PageError> {
        let options = &self.options;
        let ctx = RenderContext::new(model.local_names(), &options.style)
            .with_link_prefix(&options.link_prefix)
            .with_unresolved_as_text();

        let mut outputs = Vec::new();
        if let Some(path) = &options.markdown_output {
            let content = match options.layout {
                NodeLayout::Listing => render_node_listing(nodes, &ctx, &options.listing, &options.page),
                NodeLayout::Table => render_node_table(nodes, &ctx, &options.listing, &options.page),
            }
            .map_err(|e| PageError::render(&path.display().to_string(), e))?;
            outputs.push((path, content));
        }
        if let Some(path) = &options.cpp_output {
            outputs.push((path, render_node_cpp(nodes)));
        }

        let mut report = BuildReport::default();
        for (path, content) in outputs {
            write_file(path, &content)?;
            report.files.push(path.clone());
        }

        tracing::info!(nodes = nodes.len(), files = report.count(), "Generated graph node docs");
        Ok(report)
    }
}
