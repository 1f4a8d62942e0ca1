//! Class reference model for bbdoc.
//!
//! Class records are parsed independently with [`parse_class`] or
//! [`load_classes`], then linked in one pass by [`DocModel::link`], which
//! merges them with the engine classes of [`external::catalog`] and builds
//! the [`Hierarchy`].
//!
//! # Quick Start
//!
//! ```
//! use bbdoc_model::{DocModel, parse_class};
//!
//! let a = parse_class(r#"<class name="A" inherits="Node"/>"#, "A.xml").unwrap();
//! let b = parse_class(r#"<class name="B" inherits="A"/>"#, "B.xml").unwrap();
//! let model = DocModel::from_local(vec![a, b]);
//!
//! assert_eq!(model.children("A"), ["B".to_owned()]);
//! assert_eq!(model.parent_of("A"), Some("Node"));
//! ```

mod builder;
mod entity;
mod error;
pub mod external;
mod graph_nodes;
mod hierarchy;
mod model;
mod xml;

pub use builder::{load_classes, parse_class};
pub use entity::{
    ClassEntity, ConstantEntity, EnumEntity, MemberEntity, MethodEntity, Parameter,
    PropertyEntity, SignalEntity, Status, Tutorial,
};
pub use error::ModelError;
pub use graph_nodes::{
    DEFAULT_CATEGORY, GraphNode, NodeInput, NodeOutput, NodeParameter, load_graph_nodes,
    parse_graph_nodes,
};
pub use hierarchy::Hierarchy;
pub use model::DocModel;
pub use xml::XmlElement;
