//! Hierarchical class index.

use std::fmt::Write;

use bbdoc_markup::{MarkupError, RenderContext, format_optional_text};
use bbdoc_model::DocModel;

use crate::page::PageOptions;

/// Indentation of one hierarchy level.
const INDENT: &str = "    ";

/// Title and introduction of the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    pub title: String,
    /// Markup shown below the title.
    pub intro: Option<String>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            title: "Class List".to_owned(),
            intro: None,
        }
    }
}

/// Render the class index as a nested bullet list.
///
/// Walks the hierarchy depth-first from every root. Branches that contain no
/// local class are left out, so engine classes only appear as ancestors of
/// documented ones.
///
/// # Errors
///
/// Returns an error if the intro holds a reference that cannot be resolved.
pub fn render_class_index(
    model: &DocModel,
    ctx: &RenderContext<'_>,
    index: &IndexOptions,
    options: &PageOptions,
) -> Result<String, MarkupError> {
    let mut out = format!("# {}\n\n", index.title);
    if let Some(intro) = index.intro.as_deref() {
        if let Some(intro) = format_optional_text(intro, ctx)? {
            let _ = write!(out, "{intro}\n\n");
        }
    }

    for root in model.roots() {
        write_subtree(&mut out, model, ctx, root, 0);
    }
    out.push('\n');

    options.write_footer(&mut out);
    Ok(out)
}

fn write_subtree(out: &mut String, model: &DocModel, ctx: &RenderContext<'_>, name: &str, depth: usize) {
    if !model.has_local_descendant(name) {
        return;
    }
    let _ = writeln!(out, "{}- {}", INDENT.repeat(depth), ctx.type_link(name));
    for child in model.children(name) {
        write_subtree(out, model, ctx, child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use bbdoc_markup::LinkStyle;
    use bbdoc_model::{ClassEntity, parse_class};
    use pretty_assertions::assert_eq;

    use super::*;

    fn class(xml: &str) -> ClassEntity {
        parse_class(xml, "test.xml").unwrap()
    }

    #[test]
    fn test_index_tree() {
        let model = DocModel::from_local(vec![
            class(r#"<class name="VoxelNode" inherits="Node3D"/>"#),
            class(r#"<class name="VoxelTerrain" inherits="VoxelNode"/>"#),
            class(r#"<class name="VoxelLodTerrain" inherits="VoxelNode"/>"#),
            class(r#"<class name="VoxelTool" inherits="RefCounted"/>"#),
        ]);
        let local = model.local_names().clone();
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style).with_link_prefix("api/");

        let index = render_class_index(&model, &ctx, &IndexOptions::default(), &PageOptions::default()).unwrap();

        let base = "https://docs.godotengine.org/en/stable/classes";
        let expected = format!(
            "# Class List\n\n\
             - [Object]({base}/class_object.html)\n\
             \x20   - [Node]({base}/class_node.html)\n\
             \x20       - [Node3D]({base}/class_node3d.html)\n\
             \x20           - [VoxelNode](api/VoxelNode.md)\n\
             \x20               - [VoxelLodTerrain](api/VoxelLodTerrain.md)\n\
             \x20               - [VoxelTerrain](api/VoxelTerrain.md)\n\
             \x20   - [RefCounted]({base}/class_refcounted.html)\n\
             \x20       - [VoxelTool](api/VoxelTool.md)\n\
             \n"
        );
        assert_eq!(index, expected);
    }

    #[test]
    fn test_orphans_are_roots() {
        let model = DocModel::link(
            vec![
                class(r#"<class name="B" inherits="Missing"/>"#),
                class(r#"<class name="A"/>"#),
            ],
            Vec::new(),
        );
        let local = model.local_names().clone();
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        let index = IndexOptions {
            title: "Classes".to_owned(),
            intro: Some("See [B].".to_owned()),
        };
        let options = PageOptions {
            generated_on: Some("Oct 19, 2026".to_owned()),
        };

        let out = render_class_index(&model, &ctx, &index, &options).unwrap();

        assert_eq!(
            out,
            "# Classes\n\nSee [B](B.md).\n\n- [A](A.md)\n- [B](B.md)\n\n_Generated on Oct 19, 2026_\n"
        );
    }
}
