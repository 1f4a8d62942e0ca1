//! Graph node catalog output.
//!
//! The same catalog is rendered as a Markdown page for the online docs and as
//! a C++ header embedded in the editor, where descriptions are shown with the
//! engine's own rich-text tags.

use std::collections::BTreeMap;
use std::fmt::Write;

use bbdoc_markup::markdown::{dedent, escape_cell, inline_code, make_table, strip_blank_lines};
use bbdoc_markup::{MarkupError, Node, RenderContext, format_optional_text, format_text_for_table, parse};
use bbdoc_model::GraphNode;

use crate::page::PageOptions;

/// Title and introduction of the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeListingOptions {
    pub title: String,
    /// Markup shown below the title.
    pub intro: Option<String>,
}

impl Default for NodeListingOptions {
    fn default() -> Self {
        Self {
            title: "Graph nodes".to_owned(),
            intro: None,
        }
    }
}

/// Group nodes by category. Categories are sorted, nodes keep catalog order.
fn by_category(nodes: &[GraphNode]) -> BTreeMap<&str, Vec<&GraphNode>> {
    let mut categories: BTreeMap<&str, Vec<&GraphNode>> = BTreeMap::new();
    for node in nodes {
        categories.entry(node.display_category()).or_default().push(node);
    }
    categories
}

fn write_header(out: &mut String, listing: &NodeListingOptions, ctx: &RenderContext<'_>) -> Result<(), MarkupError> {
    let _ = write!(out, "# {}\n\n", listing.title);
    if let Some(intro) = listing.intro.as_deref() {
        if let Some(intro) = format_optional_text(intro, ctx)? {
            let _ = write!(out, "{intro}\n\n");
        }
    }
    Ok(())
}

fn port_line(out: &mut String, label: &str, names: impl Iterator<Item = String>) {
    let names: Vec<String> = names.map(|name| inline_code(&name)).collect();
    if !names.is_empty() {
        let _ = writeln!(out, "{label}: {}", names.join(", "));
    }
}

/// Render the catalog as one section per category and node.
///
/// # Errors
///
/// Returns an error if a description holds a reference that cannot be resolved.
pub fn render_node_listing(
    nodes: &[GraphNode],
    ctx: &RenderContext<'_>,
    listing: &NodeListingOptions,
    options: &PageOptions,
) -> Result<String, MarkupError> {
    let mut out = String::new();
    write_header(&mut out, listing, ctx)?;

    for (category, nodes) in by_category(nodes) {
        let _ = write!(out, "## {category}\n\n");
        for node in nodes {
            let _ = write!(out, "### {}\n\n", node.name);
            port_line(&mut out, "Inputs", node.inputs.iter().map(|p| p.name.clone()));
            port_line(&mut out, "Outputs", node.outputs.iter().map(|p| p.name.clone()));
            port_line(&mut out, "Parameters", node.parameters.iter().map(|p| p.name.clone()));
            out.push('\n');

            if let Some(description) = format_optional_text(&node.description, ctx)? {
                let _ = write!(out, "{description}\n\n");
            }
        }
    }

    options.write_footer(&mut out);
    Ok(out)
}

/// Render the catalog as one table per category.
///
/// Descriptions are squeezed on one line, so this suits short descriptions.
///
/// # Errors
///
/// Returns an error if a description holds a reference that cannot be resolved.
pub fn render_node_table(
    nodes: &[GraphNode],
    ctx: &RenderContext<'_>,
    listing: &NodeListingOptions,
    options: &PageOptions,
) -> Result<String, MarkupError> {
    let mut out = String::new();
    write_header(&mut out, listing, ctx)?;

    for (category, nodes) in by_category(nodes) {
        let _ = write!(out, "## {category}\n\n");
        let mut rows = vec![vec!["Node name".to_owned(), "Description".to_owned()]];
        for node in nodes {
            let description = format_text_for_table(&node.description, ctx)?;
            rows.push(vec![node.name.clone(), escape_cell(&description)]);
        }
        let _ = write!(out, "{}\n\n", make_table(&rows));
    }

    options.write_footer(&mut out);
    Ok(out)
}

/// Render the catalog as a C++ header holding a `{name, category, description}` array.
#[must_use]
pub fn render_node_cpp(nodes: &[GraphNode]) -> String {
    let mut out = String::from(
        "// <GENERATED>\n\
         // clang-format off\n\
         namespace GraphNodesDocData {\n\
         \n\
         struct Node {\n\
         \x20   const char *name;\n\
         \x20   const char *category;\n\
         \x20   const char *description;\n\
         };\n\
         \n",
    );

    let _ = writeln!(out, "static const unsigned int COUNT = {};", nodes.len());
    out.push_str("static const Node g_data[COUNT] = {\n");
    for node in nodes {
        let _ = writeln!(
            out,
            "    {{\"{}\", \"{}\", \"{}\"}},",
            escape_cpp_string(&node.name),
            escape_cpp_string(&node.category),
            format_text_for_cpp(&node.description)
        );
    }
    out.push_str(
        "};\n\
         \n\
         } // namespace GraphNodesDocData\n\
         // clang-format on\n\
         // </GENERATED>\n",
    );
    out
}

/// Prepare a description for a C string literal shown in a rich-text label.
///
/// Lines are joined with a literal `\n` escape so the literal stays on one line.
fn format_text_for_cpp(text: &str) -> String {
    let text = strip_blank_lines(&dedent(text), "\\n");
    escape_cpp_string(&to_rich_text(&text))
}

fn escape_cpp_string(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Convert documentation tags to the subset understood by the editor's rich-text label.
fn to_rich_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for node in parse(text) {
        match node {
            Node::Text(node) => out.push_str(&node.text),
            Node::Tag(tag) => match tag.name.as_str() {
                "codeblock" => out.push_str(if tag.is_opening() { "[code]" } else { "[/code]" }),
                "graph_node" => match tag.first_option_key() {
                    Ok(key) => {
                        let _ = write!(out, "[code]{key}[/code]");
                    }
                    Err(_) => out.push_str(&tag.to_string()),
                },
                // Class names are recognized by convention only
                name if tag.is_opening() && name.starts_with(char::is_uppercase) => {
                    let _ = write!(out, "[url={name}]{name}[/url]");
                }
                _ => out.push_str(&tag.to_string()),
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use bbdoc_markup::LinkStyle;
    use bbdoc_model::{NodeInput, NodeOutput, NodeParameter};
    use pretty_assertions::assert_eq;

    use super::*;

    fn node(name: &str, category: &str, description: &str) -> GraphNode {
        GraphNode {
            name: name.to_owned(),
            category: category.to_owned(),
            description: description.to_owned(),
            ..GraphNode::default()
        }
    }

    fn catalog() -> Vec<GraphNode> {
        vec![
            GraphNode {
                inputs: vec![
                    NodeInput {
                        name: "a".to_owned(),
                        default_value: "0".to_owned(),
                    },
                    NodeInput {
                        name: "b".to_owned(),
                        default_value: "0".to_owned(),
                    },
                ],
                outputs: vec![NodeOutput { name: "out".to_owned() }],
                ..node("Add", "Math", "\n\t\t\tReturns [code]a + b[/code].\n\t\t")
            },
            GraphNode {
                parameters: vec![NodeParameter {
                    name: "noise".to_owned(),
                    type_name: "FastNoiseLite".to_owned(),
                    default_value: "null".to_owned(),
                }],
                ..node("FastNoise2D", "Noise", "Samples [FastNoiseLite] with [VoxelTool].")
            },
            node("Custom", "", ""),
            node("Multiply", "Math", "Like [graph_node Add].\nBut multiplies."),
        ]
    }

    #[test]
    fn test_listing() {
        let local: HashSet<String> = ["VoxelTool".to_owned()].into();
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style).with_link_prefix("api/");
        let listing = NodeListingOptions {
            title: "VoxelGeneratorGraph nodes".to_owned(),
            intro: Some("This page lists all nodes of [VoxelTool].".to_owned()),
        };

        let out = render_node_listing(&catalog(), &ctx, &listing, &PageOptions::default()).unwrap();

        let expected = "# VoxelGeneratorGraph nodes\n\n\
            This page lists all nodes of [VoxelTool](api/VoxelTool.md).\n\n\
            ## Math\n\n\
            ### Add\n\n\
            Inputs: `a`, `b`\n\
            Outputs: `out`\n\
            \n\
            Returns `a + b`.\n\n\
            ### Multiply\n\n\
            \n\
            Like `Add`.\n\nBut multiplies.\n\n\
            ## Noise\n\n\
            ### FastNoise2D\n\n\
            Parameters: `noise`\n\
            \n\
            Samples [FastNoiseLite](https://docs.godotengine.org/en/stable/classes/class_fastnoiselite.html) with [VoxelTool](api/VoxelTool.md).\n\n\
            ## Other\n\n\
            ### Custom\n\n\
            \n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_table() {
        let local = HashSet::new();
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        let nodes = vec![node("Add", "Math", "Adds\ntwo values."), node("Sub", "Math", "a | b")];

        let out = render_node_table(&nodes, &ctx, &NodeListingOptions::default(), &PageOptions::default()).unwrap();

        assert_eq!(
            out,
            "# Graph nodes\n\n## Math\n\n\nNode name  | Description      \n---------- | -----------------\nAdd        | Adds two values. \nSub        | a \\| b           \n<p></p>\n\n"
        );
    }

    #[test]
    fn test_cpp_header() {
        let out = render_node_cpp(&catalog());

        assert!(out.starts_with("// <GENERATED>\n// clang-format off\nnamespace GraphNodesDocData {\n\nstruct Node {\n    const char *name;\n"));
        assert!(out.contains("static const unsigned int COUNT = 4;\nstatic const Node g_data[COUNT] = {\n"));
        assert!(out.contains("    {\"Add\", \"Math\", \"Returns [code]a + b[/code].\"},\n"));
        assert!(out.contains(
            "    {\"FastNoise2D\", \"Noise\", \"Samples [url=FastNoiseLite]FastNoiseLite[/url] with [url=VoxelTool]VoxelTool[/url].\"},\n"
        ));
        assert!(out.contains("    {\"Custom\", \"\", \"\"},\n"));
        assert!(out.contains("    {\"Multiply\", \"Math\", \"Like [code]Add[/code].\\nBut multiplies.\"},\n"));
        assert!(out.ends_with("};\n\n} // namespace GraphNodesDocData\n// clang-format on\n// </GENERATED>\n"));
    }

    #[test]
    fn test_cpp_description_conversion() {
        assert_eq!(
            format_text_for_cpp("\n\t[codeblock]\n\tx = \"1\"\n\t[/codeblock]\n\tSee \\[not a tag].\n"),
            "[code]\\nx = \\\"1\\\"\\n[/code]\\nSee [not a tag]."
        );
        assert_eq!(to_rich_text("[b]bold[/b] [i]x[/i]"), "[b]bold[/b] [i]x[/i]");
    }
}
