//! Markdown pages and generated sources for bbdoc.
//!
//! Renderers turn a linked [`DocModel`](bbdoc_model::DocModel) or a graph node
//! catalog into text; builders run a whole pipeline and write the results.
//!
//! # Quick Start
//!
//! ```
//! use std::collections::HashSet;
//!
//! use bbdoc_markup::{LinkStyle, RenderContext};
//! use bbdoc_model::{DocModel, parse_class};
//! use bbdoc_pages::{PageOptions, render_class_page};
//!
//! let class = parse_class(r#"<class name="VoxelTool" inherits="RefCounted"/>"#, "VoxelTool.xml").unwrap();
//! let model = DocModel::from_local(vec![class]);
//! let style = LinkStyle::default();
//! let ctx = RenderContext::new(model.local_names(), &style);
//!
//! let page = render_class_page(model.get("VoxelTool").unwrap(), &model, &ctx, &PageOptions::default()).unwrap();
//! assert!(page.starts_with("# VoxelTool\n"));
//! ```

mod builder;
mod error;
mod index;
mod nodes;
mod page;
mod writer;

pub use builder::{
    BuildReport, ClassDocsBuilder, ClassDocsOptions, NodeDocsBuilder, NodeDocsOptions, NodeLayout,
};
pub use error::PageError;
pub use index::{IndexOptions, render_class_index};
pub use nodes::{NodeListingOptions, render_node_cpp, render_node_listing, render_node_table};
pub use page::{PageOptions, render_class_page};
pub use writer::{OutputDir, write_file};
