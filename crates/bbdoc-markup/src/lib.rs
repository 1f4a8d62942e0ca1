//! Bracket-tag documentation markup for bbdoc.
//!
//! Class reference text embeds a small BBCode-like markup:
//! `[b]`, `[i]`, `[code]`, `[codeblock]`, `[url=...]`, cross-references
//! such as `[member Class.name]` or `[method name]`, and bare class names
//! like `[Node3D]`.
//!
//! # Architecture
//!
//! - [`parse`] tokenizes text into [`Node`]s (text or tag). It never fails:
//!   malformed tags are kept as text.
//! - [`render`] walks the nodes with a [`RenderContext`] and produces
//!   Markdown, resolving references to local pages or to the external class
//!   reference described by [`LinkStyle`].
//! - [`markdown`] holds the output primitives (links, anchors, tables).

mod context;
mod links;
pub mod markdown;
mod parser;
mod renderer;

pub use context::RenderContext;
pub use links::{DEFAULT_EXTERNAL_BASE_URL, DEFAULT_PAGE_EXTENSION, LinkStyle, RefKind};
pub use parser::{EmptyOptionsError, Node, TagNode, TextNode, parse};
pub use renderer::{
    MarkupError, TextMode, format_optional_text, format_text, format_text_for_table, render,
};
