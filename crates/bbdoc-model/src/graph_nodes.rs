//! Catalog of procedural graph nodes.
//!
//! ```xml
//! <nodes>
//!     <node name="Add" category="Math">
//!         <input name="a" default_value="0" />
//!         <output name="out" />
//!         <parameter name="seed" type="int" default_value="0" />
//!         <description>Returns [code]a + b[/code].</description>
//!     </node>
//! </nodes>
//! ```

use std::path::Path;

use crate::error::ModelError;
use crate::xml::XmlElement;

/// Category used for nodes that declare none.
pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInput {
    pub name: String,
    pub default_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOutput {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeParameter {
    pub name: String,
    pub type_name: String,
    pub default_value: String,
}

/// One node of the generator graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphNode {
    pub name: String,
    /// May be empty.
    pub category: String,
    /// Raw markup, not yet rendered.
    pub description: String,
    pub inputs: Vec<NodeInput>,
    pub outputs: Vec<NodeOutput>,
    pub parameters: Vec<NodeParameter>,
}

impl GraphNode {
    /// Category to list the node under.
    #[must_use]
    pub fn display_category(&self) -> &str {
        if self.category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            &self.category
        }
    }
}

/// Parse a node catalog, keeping declaration order.
///
/// # Errors
///
/// Returns an error if the XML is malformed, the root is not `<nodes>`, or
/// a node, port or parameter has no name.
pub fn parse_graph_nodes(xml: &str) -> Result<Vec<GraphNode>, ModelError> {
    let root = XmlElement::parse(xml)?;
    if root.tag != "nodes" {
        return Err(ModelError::UnexpectedRoot {
            expected: "nodes",
            found: root.tag,
        });
    }

    root.children_named("node").map(parse_node).collect()
}

/// Read and parse a node catalog file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid catalog.
pub fn load_graph_nodes(path: &Path) -> Result<Vec<GraphNode>, ModelError> {
    let xml = std::fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
    let nodes =
        parse_graph_nodes(&xml).map_err(|e| e.in_record(&path.display().to_string()))?;
    tracing::info!(count = nodes.len(), path = %path.display(), "Loaded graph nodes");
    Ok(nodes)
}

fn name_of(element: &XmlElement) -> Result<String, ModelError> {
    element
        .attr("name")
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ModelError::MissingAttribute {
            element: element.tag.clone(),
            attribute: "name",
        })
}

fn parse_node(element: &XmlElement) -> Result<GraphNode, ModelError> {
    let inputs: Vec<NodeInput> = element
        .children_named("input")
        .map(|input| {
            Ok(NodeInput {
                name: name_of(input)?,
                default_value: input.attr("default_value").unwrap_or("0").to_owned(),
            })
        })
        .collect::<Result<_, ModelError>>()?;

    let outputs: Vec<NodeOutput> = element
        .children_named("output")
        .map(|output| Ok(NodeOutput { name: name_of(output)? }))
        .collect::<Result<_, ModelError>>()?;

    let parameters: Vec<NodeParameter> = element
        .children_named("parameter")
        .map(|param| {
            Ok(NodeParameter {
                name: name_of(param)?,
                type_name: param.attr("type").unwrap_or_default().to_owned(),
                default_value: param.attr("default_value").unwrap_or_default().to_owned(),
            })
        })
        .collect::<Result<_, ModelError>>()?;

    Ok(GraphNode {
        name: name_of(element)?,
        category: element.attr("category").unwrap_or_default().to_owned(),
        description: element.child_text("description").to_owned(),
        inputs,
        outputs,
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const NODES: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<nodes>
	<node name="Add" category="Math">
		<input name="a" default_value="0" />
		<input name="b" />
		<output name="out" />
		<description>
			Returns [code]a + b[/code].
		</description>
	</node>
	<node name="FastNoise2D" category="Noise">
		<input name="x" default_value="0" />
		<output name="out" />
		<parameter name="noise" type="FastNoiseLite" default_value="null" />
		<description>Samples [FastNoiseLite].</description>
	</node>
	<node name="Custom">
	</node>
</nodes>"#;

    #[test]
    fn test_parse_graph_nodes() {
        let nodes = parse_graph_nodes(NODES).unwrap();
        assert_eq!(nodes.len(), 3);

        let add = &nodes[0];
        assert_eq!(add.name, "Add");
        assert_eq!(add.category, "Math");
        assert_eq!(
            add.inputs,
            vec![
                NodeInput {
                    name: "a".to_owned(),
                    default_value: "0".to_owned(),
                },
                NodeInput {
                    name: "b".to_owned(),
                    default_value: "0".to_owned(),
                },
            ]
        );
        assert_eq!(add.outputs[0].name, "out");
        assert!(add.description.contains("[code]a + b[/code]"));

        let noise = &nodes[1];
        assert_eq!(
            noise.parameters,
            vec![NodeParameter {
                name: "noise".to_owned(),
                type_name: "FastNoiseLite".to_owned(),
                default_value: "null".to_owned(),
            }]
        );
    }

    #[test]
    fn test_default_category() {
        let nodes = parse_graph_nodes(NODES).unwrap();
        assert_eq!(nodes[2].category, "");
        assert_eq!(nodes[2].display_category(), "Other");
        assert_eq!(nodes[0].display_category(), "Math");
        assert_eq!(nodes[2].description, "");
    }

    #[test]
    fn test_wrong_root() {
        assert!(matches!(
            parse_graph_nodes(r#"<class name="A"/>"#),
            Err(ModelError::UnexpectedRoot { expected: "nodes", .. })
        ));
    }

    #[test]
    fn test_nameless_node() {
        assert!(matches!(
            parse_graph_nodes("<nodes><node category=\"Math\"/></nodes>"),
            Err(ModelError::MissingAttribute { attribute: "name", .. })
        ));
    }

    #[test]
    fn test_load_graph_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph_nodes.xml");
        std::fs::write(&path, NODES).unwrap();

        let nodes = load_graph_nodes(&path).unwrap();
        assert_eq!(nodes.len(), 3);
    }
}
