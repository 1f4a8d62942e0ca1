//! Markup to Markdown conversion.
//!
//! Walks the nodes produced by [`parse`](crate::parse) and translates known
//! tags into Markdown links, emphasis and code. Unknown lowercase tags are
//! reported and written back in their bracket form so no information is lost.

use crate::context::RenderContext;
use crate::links::RefKind;
use crate::markdown::{dedent, inline_code, make_link, strip_blank_lines};
use crate::parser::{Node, TagNode, parse};

/// Tag whose sole option names a procedural graph node.
const GRAPH_NODE_TAG: &str = "graph_node";

/// Container of per-language code blocks such as `[gdscript]` and `[csharp]`.
const CODEBLOCKS_TAG: &str = "codeblocks";

/// How newlines in text are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Compact output for table cells: newlines become spaces, code block
    /// lines become a comma-separated list.
    SingleLine,
    /// Paragraph output: every non-empty line is followed by a blank line.
    MultiLine,
}

/// Error raised while resolving a reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    /// A reference without a class name was used where no class is in scope.
    #[error("[{tag} {symbol}] has no class name and there is no current class in this context")]
    MissingClassContext {
        /// Tag name, e.g. `member`.
        tag: String,
        /// Referenced symbol as written.
        symbol: String,
    },
}

/// Link waiting for the text enclosed by `[url]`.
enum PendingLink {
    /// `[url=target]text[/url]`
    Target(String),
    /// `[url]target[/url]`
    FromText,
}

/// Render markup text to Markdown.
///
/// # Errors
///
/// Returns [`MarkupError::MissingClassContext`] when a reference such as
/// `[member size]` has no class name and `ctx` has no current class, unless
/// `ctx` keeps unresolved references as text.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use bbdoc_markup::{LinkStyle, RenderContext, TextMode, render};
///
/// let local: HashSet<String> = ["VoxelTool".to_owned()].into();
/// let style = LinkStyle::default();
/// let ctx = RenderContext::new(&local, &style);
///
/// let md = render("Use [VoxelTool], [i]carefully[/i].", TextMode::MultiLine, &ctx).unwrap();
/// assert_eq!(md, "Use [VoxelTool](VoxelTool.md), *carefully*.");
/// ```
pub fn render(text: &str, mode: TextMode, ctx: &RenderContext<'_>) -> Result<String, MarkupError> {
    let mut writer = MarkdownWriter::new(mode, ctx);
    for node in parse(text) {
        match node {
            Node::Text(node) => writer.push_text(&node.text),
            Node::Tag(tag) => writer.push_tag(&tag)?,
        }
    }
    Ok(writer.finish())
}

/// Render a multi-line description.
///
/// The text is dedented first, and leading and trailing blank lines are
/// stripped from the result.
pub fn format_text(text: &str, ctx: &RenderContext<'_>) -> Result<String, MarkupError> {
    let text = dedent(text);
    let md = render(&text, TextMode::MultiLine, ctx)?;
    Ok(md.trim().to_owned())
}

/// Render text for a table cell, on a single line.
pub fn format_text_for_table(text: &str, ctx: &RenderContext<'_>) -> Result<String, MarkupError> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let md = render(&lines.join("\n"), TextMode::SingleLine, ctx)?;
    Ok(md.trim().to_owned())
}

/// Render a description that may be blank, returning `None` when nothing remains.
pub fn format_optional_text(
    text: &str,
    ctx: &RenderContext<'_>,
) -> Result<Option<String>, MarkupError> {
    let text = strip_blank_lines(text, "\n");
    if text.is_empty() {
        return Ok(None);
    }
    let md = format_text(&text, ctx)?;
    Ok((!md.is_empty()).then_some(md))
}

struct MarkdownWriter<'a, 'c> {
    mode: TextMode,
    ctx: &'c RenderContext<'a>,
    /// Name of the tag that closes the open code block.
    codeblock: Option<String>,
    in_codeblocks: bool,
    in_code: bool,
    pending_link: Option<PendingLink>,
    out: String,
}

impl<'a, 'c> MarkdownWriter<'a, 'c> {
    fn new(mode: TextMode, ctx: &'c RenderContext<'a>) -> Self {
        Self {
            mode,
            ctx,
            codeblock: None,
            in_codeblocks: false,
            in_code: false,
            pending_link: None,
            out: String::new(),
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn push_text(&mut self, text: &str) {
        let text = match self.mode {
            TextMode::SingleLine if self.codeblock.is_some() => {
                let items: Vec<&str> = text
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect();
                items.join(", ")
            }
            TextMode::SingleLine => text.replace('\n', " "),
            TextMode::MultiLine if self.codeblock.is_some() => text.to_owned(),
            TextMode::MultiLine => separate_paragraphs(text),
        };

        match self.pending_link.take() {
            Some(PendingLink::Target(url)) => self.out.push_str(&make_link(&text, &url)),
            Some(PendingLink::FromText) => self.out.push_str(&make_link(&text, text.trim())),
            None => self.out.push_str(&text),
        }
    }

    fn push_tag(&mut self, tag: &TagNode) -> Result<(), MarkupError> {
        // Code samples may contain brackets that are not markup
        if self
            .codeblock
            .as_deref()
            .is_some_and(|open| !(tag.closing && tag.name == open))
        {
            self.push_verbatim(tag);
            return Ok(());
        }
        if self.in_code && !(tag.closing && is_code_tag(&tag.name)) {
            self.push_verbatim(tag);
            return Ok(());
        }

        match tag.name.as_str() {
            "codeblock" => self.push_fence(tag, None),
            CODEBLOCKS_TAG => self.in_codeblocks = tag.is_opening(),
            // Every tag directly inside [codeblocks] names a language
            name if self.in_codeblocks => self.push_fence(tag, Some(name)),
            name if is_code_tag(name) => {
                self.out.push('`');
                self.in_code = tag.is_opening();
            }
            "url" => self.push_url(tag),
            "i" => self.out.push('*'),
            "b" => self.out.push_str("**"),
            "param" | GRAPH_NODE_TAG => match tag.first_option_key() {
                Ok(key) => self.out.push_str(&inline_code(key)),
                Err(_) => self.push_unhandled(tag),
            },
            name => {
                if let Some(kind) = RefKind::from_tag(name) {
                    self.push_reference(kind, tag)?;
                } else if tag.is_opening() && name.starts_with(char::is_uppercase) {
                    self.out.push_str(&self.ctx.type_link(name));
                } else {
                    self.push_unhandled(tag);
                }
            }
        }
        Ok(())
    }

    fn push_fence(&mut self, tag: &TagNode, language: Option<&str>) {
        match self.mode {
            TextMode::MultiLine => {
                self.out.push_str("```");
                if let Some(language) = language.filter(|_| tag.is_opening()) {
                    self.out.push_str(language);
                }
            }
            TextMode::SingleLine => self.out.push('`'),
        }
        self.codeblock = tag.is_opening().then(|| tag.name.clone());
    }

    fn push_url(&mut self, tag: &TagNode) {
        if tag.is_opening() {
            self.pending_link = Some(if tag.value.is_empty() {
                PendingLink::FromText
            } else {
                PendingLink::Target(tag.value.clone())
            });
        } else if let Some(PendingLink::Target(url)) = self.pending_link.take() {
            // No text between the tags
            self.out.push_str(&make_link(&url, &url));
        }
    }

    fn push_reference(&mut self, kind: RefKind, tag: &TagNode) -> Result<(), MarkupError> {
        let Ok(symbol) = tag.first_option_key() else {
            tracing::warn!(tag = %tag, "Reference tag without a target");
            self.push_verbatim(tag);
            return Ok(());
        };

        let (class, member) = match symbol.split_once('.') {
            Some((class, member)) => (class, member),
            None => match self.ctx.current_class() {
                Some(class) => (class, symbol),
                None if self.ctx.unresolved_as_text() => {
                    tracing::warn!(tag = %tag, "Reference without a class outside a class page");
                    self.push_verbatim(tag);
                    return Ok(());
                }
                None => {
                    return Err(MarkupError::MissingClassContext {
                        tag: tag.name.clone(),
                        symbol: symbol.to_owned(),
                    });
                }
            },
        };

        self.out.push_str(&self.ctx.member_link(kind, class, member));
        Ok(())
    }

    fn push_unhandled(&mut self, tag: &TagNode) {
        tracing::warn!(tag = %tag, "Unhandled markup tag");
        self.push_verbatim(tag);
    }

    fn push_verbatim(&mut self, tag: &TagNode) {
        self.out.push_str(&tag.to_string());
    }
}

fn is_code_tag(name: &str) -> bool {
    matches!(name, "code" | "kbd")
}

/// Insert a blank line after every non-empty line that ends with a newline.
///
/// The markup has no paragraph syntax; each source line is a paragraph.
fn separate_paragraphs(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for line in text.split_inclusive('\n') {
        out.push_str(line);
        if line.ends_with('\n') && !line.trim().is_empty() {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::links::LinkStyle;

    fn names(list: &[&str]) -> HashSet<String> {
        list.iter().map(|&n| n.to_owned()).collect()
    }

    fn render_multi(text: &str, ctx: &RenderContext<'_>) -> String {
        render(text, TextMode::MultiLine, ctx).unwrap()
    }

    fn render_single(text: &str, ctx: &RenderContext<'_>) -> String {
        render(text, TextMode::SingleLine, ctx).unwrap()
    }

    #[test]
    fn test_plain_text_unchanged() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(render_multi("Hello.", &ctx), "Hello.");
    }

    #[test]
    fn test_emphasis_and_bold() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(render_multi("[i]a[/i] [b]b[/b]", &ctx), "*a* **b**");
    }

    #[test]
    fn test_inline_code_keeps_brackets() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(
            render_multi("Use [code]Array[int][/code] or [code][Foo][/code].", &ctx),
            "Use `Array[int]` or `[Foo]`."
        );
    }

    #[test]
    fn test_codeblock_multiline() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        let md = render_multi("Example:\n[codeblock]\nvar a = [1, 2]\n[/codeblock]\nDone.", &ctx);
        assert_eq!(md, "Example:\n\n```\nvar a = [1, 2]\n```\nDone.");
    }

    #[test]
    fn test_codeblock_single_line_is_a_list() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        let md = render_single("Modes: [codeblock]\n  add\n\n  remove\n[/codeblock]", &ctx);
        assert_eq!(md, "Modes: `add, remove`");
    }

    #[test]
    fn test_single_line_collapses_newlines() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(render_single("one\ntwo\nthree", &ctx), "one two three");
    }

    #[test]
    fn test_table_text_keeps_space_before_tag_after_line_break() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        let md = format_text_for_table("Returns\n[code]x[/code] value.\nSee\n[b]this[/b].", &ctx).unwrap();
        assert_eq!(md, "Returns `x` value. See **this**.");
    }

    #[test]
    fn test_codeblocks_fence_per_language() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        let md = render_multi(
            "[codeblocks]\n[gdscript]\nvar a = [1]\n[/gdscript]\n[csharp]\nint a = 1;\n[/csharp]\n[/codeblocks]",
            &ctx,
        );
        assert_eq!(md, "\n```gdscript\nvar a = [1]\n```\n```csharp\nint a = 1;\n```\n");
    }

    #[test]
    fn test_codeblocks_single_line() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        let md = format_text_for_table("[codeblocks]\n[gdscript]\nadd()\n[/gdscript]\n[/codeblocks]", &ctx).unwrap();
        assert_eq!(md, "`add()`");
    }

    #[test]
    fn test_multiline_separates_paragraphs() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(render_multi("First.\nSecond.\n\nThird.", &ctx), "First.\n\nSecond.\n\n\nThird.");
    }

    #[test]
    fn test_url_with_target() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(
            render_multi("See [url=https://example.com]the site[/url].", &ctx),
            "See [the site](https://example.com)."
        );
    }

    #[test]
    fn test_url_without_target() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(
            render_multi("[url]https://example.com[/url]", &ctx),
            "[https://example.com](https://example.com)"
        );
    }

    #[test]
    fn test_url_without_text() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(
            render_multi("[url=https://example.com][/url]", &ctx),
            "[https://example.com](https://example.com)"
        );
    }

    #[test]
    fn test_local_member_reference() {
        let local = names(&["VoxelTool", "VoxelBuffer"]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style).with_current_class("VoxelTool");
        assert_eq!(
            render_multi("Call [method do_box] on [member VoxelBuffer.size].", &ctx),
            "Call [do_box](VoxelTool.md#i_do_box) on [VoxelBuffer.size](VoxelBuffer.md#i_size)."
        );
    }

    #[test]
    fn test_external_method_reference() {
        let local = names(&["C"]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style).with_current_class("C");
        let md = render_multi("[method Other.do_thing]", &ctx);
        assert!(md.contains("https://docs.godotengine.org/en/stable/classes/class_other.html"));
        assert!(md.contains("do-thing"));
        assert!(!md.contains("Other.md"));
    }

    #[test]
    fn test_reference_without_class_context_is_an_error() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(
            render("[signal changed]", TextMode::MultiLine, &ctx),
            Err(MarkupError::MissingClassContext {
                tag: "signal".to_owned(),
                symbol: "changed".to_owned()
            })
        );
    }

    #[test]
    fn test_reference_without_class_context_kept_as_text() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style).with_unresolved_as_text();
        assert_eq!(
            render_multi("Emits [signal changed] after [member Foo.x].", &ctx),
            "Emits [signal changed] after [Foo.x](https://docs.godotengine.org/en/stable/classes/class_foo.html#class-foo-property-x)."
        );
    }

    #[test]
    fn test_reference_without_target_passes_through() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(render_multi("a [member] b", &ctx), "a [member] b");
    }

    #[test]
    fn test_type_reference() {
        let local = names(&["VoxelTerrain"]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style).with_link_prefix("api/");
        assert_eq!(
            render_multi("[VoxelTerrain] and [Mesh]", &ctx),
            "[VoxelTerrain](api/VoxelTerrain.md) and [Mesh](https://docs.godotengine.org/en/stable/classes/class_mesh.html)"
        );
    }

    #[test]
    fn test_graph_node_and_param() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(
            render_multi("[graph_node SdfSphere] uses [param radius]", &ctx),
            "`SdfSphere` uses `radius`"
        );
    }

    #[test]
    fn test_unknown_tag_is_kept() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(
            render_multi("[color=#ff0000]red[/color]", &ctx),
            "[color=#ff0000]red[/color]"
        );
    }

    #[test]
    fn test_malformed_tag_does_not_abort() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(render_multi("in [0..1] range [i]x[/i]", &ctx), "in [0..1] range *x*");
    }

    #[test]
    fn test_format_text_dedents_and_strips() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        let md = format_text("\n\t\tFirst.\n\t\tSecond.\n\t", &ctx).unwrap();
        assert_eq!(md, "First.\n\nSecond.");
    }

    #[test]
    fn test_format_text_for_table() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        let md = format_text_for_table("\n\t\tOutputs a value.\n\t\tSee [code]x[/code].\n\t", &ctx).unwrap();
        assert_eq!(md, "Outputs a value. See `x`.");
    }

    #[test]
    fn test_format_optional_text() {
        let local = names(&[]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style);
        assert_eq!(format_optional_text("\n\t\n", &ctx).unwrap(), None);
        assert_eq!(
            format_optional_text("\n\tText.\n", &ctx).unwrap(),
            Some("Text.".to_owned())
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let local = names(&["A"]);
        let style = LinkStyle::default();
        let ctx = RenderContext::new(&local, &style).with_current_class("A");
        let text = "See [member x], [B] and [unknown].\n[codeblock]\n[a]\n[/codeblock]";
        assert_eq!(render_multi(text, &ctx), render_multi(text, &ctx));
    }
}
