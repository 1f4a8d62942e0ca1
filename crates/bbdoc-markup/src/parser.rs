//! Bracket-tag markup parsing.
//!
//! Splits documentation text into literal text and `[tag]` nodes:
//! `[name]`, `[name=value]`, `[name=value key key=value]` and `[/name]`.
//!
//! Parsing never fails. A tag that cannot be parsed (missing closing bracket,
//! unexpected character, option with a dangling `=`) is kept as literal text
//! and scanning resumes right after the malformed span.

use std::fmt;

/// A parsed markup element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text.
    Text(TextNode),
    /// Opening or closing tag.
    Tag(TagNode),
}

impl Node {
    fn text(text: impl Into<String>) -> Self {
        Self::Text(TextNode { text: text.into() })
    }
}

/// Literal text span with escaped brackets (`\[`) already unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub text: String,
}

/// Bracket tag: `[name=value opt=val ...]` or `[/name]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagNode {
    /// Tag name (may contain dots, e.g. `[Foo.Bar]`).
    pub name: String,
    /// Value after `=` directly following the name (empty if absent).
    pub value: String,
    /// Options in insertion order. A later duplicate key replaces the value in place.
    pub options: Vec<(String, String)>,
    /// Whether this is a `[/name]` tag.
    pub closing: bool,
}

/// Returned by [`TagNode::first_option_key`] for a tag without options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("the tag has no options")]
pub struct EmptyOptionsError;

impl TagNode {
    /// Create an opening tag with no value and no options.
    #[must_use]
    pub fn opening(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a closing tag.
    #[must_use]
    pub fn closing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            closing: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_opening(&self) -> bool {
        !self.closing
    }

    /// First option key in insertion order.
    ///
    /// Cross-reference tags such as `[member Foo.bar]` carry their target as
    /// their only option, so callers use this to extract it.
    pub fn first_option_key(&self) -> Result<&str, EmptyOptionsError> {
        self.options
            .first()
            .map(|(key, _)| key.as_str())
            .ok_or(EmptyOptionsError)
    }

    fn set_option(&mut self, key: String, value: String) {
        if let Some(slot) = self.options.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.options.push((key, value));
        }
    }
}

impl fmt::Display for TagNode {
    /// Serialize back to bracket form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if self.closing {
            f.write_str("/")?;
        }
        f.write_str(&self.name)?;
        if !self.value.is_empty() {
            write!(f, "={}", self.value)?;
        }
        for (key, value) in &self.options {
            write!(f, " {key}")?;
            if !value.is_empty() {
                write!(f, "={value}")?;
            }
        }
        f.write_str("]")
    }
}

/// Parse text into an ordered sequence of text and tag nodes.
///
/// Text without any bracket yields exactly one text node equal to the input.
///
/// # Example
///
/// ```
/// use bbdoc_markup::{Node, parse};
///
/// let nodes = parse("See [member Foo.bar] for details.");
/// assert_eq!(nodes.len(), 3);
/// let Node::Tag(tag) = &nodes[1] else { panic!("expected tag") };
/// assert_eq!(tag.name, "member");
/// assert_eq!(tag.first_option_key(), Ok("Foo.bar"));
/// ```
pub fn parse(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let Some(open) = find_unescaped_bracket(text, pos) else {
            nodes.push(Node::text(unescape(&text[pos..])));
            break;
        };

        if open > pos {
            nodes.push(Node::text(unescape(&text[pos..open])));
        }

        match parse_tag(text, open + 1) {
            Ok((tag, end)) => {
                nodes.push(Node::Tag(tag));
                pos = end;
            }
            Err(stop) => {
                // Failed tags are kept verbatim, escapes included
                let end = stop.min(text.len());
                nodes.push(Node::text(&text[open..end]));
                pos = end;
            }
        }
    }

    if nodes.is_empty() {
        nodes.push(Node::text(String::new()));
    }
    nodes
}

fn unescape(text: &str) -> String {
    text.replace("\\[", "[")
}

fn find_unescaped_bracket(text: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(offset) = text[pos..].find('[') {
        let found = pos + offset;
        if found > 0 && text.as_bytes()[found - 1] == b'\\' {
            pos = found + 1;
            continue;
        }
        return Some(found);
    }
    None
}

fn char_at(text: &str, pos: usize) -> Option<char> {
    text.get(pos..).and_then(|rest| rest.chars().next())
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

fn parse_name(text: &str, begin: usize) -> &str {
    let rest = &text[begin..];
    let end = rest.find(|c: char| !is_name_part(c)).unwrap_or(rest.len());
    &rest[..end]
}

fn parse_option_value(text: &str, begin: usize) -> &str {
    let rest = &text[begin..];
    let end = rest
        .find(|c: char| c == ' ' || c == ']' || c == '[')
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Position where a failed tag stops when the offending character is `c` at `pos`.
///
/// A stray `[` inside a tag body is consumed with the failed span so it never
/// opens a new tag.
fn stop_at(pos: usize, c: char) -> usize {
    if c == '[' { pos + 1 } else { pos }
}

/// Parse `name[=value]` starting at `begin`.
///
/// Returns `(name, value, end)` on success, or the stop position on failure.
fn parse_option(text: &str, begin: usize) -> Result<(String, String, usize), usize> {
    let name = parse_name(text, begin);
    let mut pos = begin + name.len();

    let Some(c) = char_at(text, pos) else {
        return Err(pos);
    };

    let mut value = "";
    if c == '=' {
        pos += 1;
        if pos >= text.len() {
            return Err(pos);
        }
        value = parse_option_value(text, pos);
        pos += value.len();
    }

    Ok((name.to_owned(), value.to_owned(), pos))
}

/// Parse a tag whose body starts at `pos` (just after `[`).
///
/// Returns the tag and the position after `]`, or the stop position on failure.
fn parse_tag(text: &str, pos: usize) -> Result<(TagNode, usize), usize> {
    let Some(first) = char_at(text, pos) else {
        return Err(pos);
    };

    if first == '/' {
        let pos = pos + 1;
        let name = parse_name(text, pos);
        let pos = pos + name.len();
        return match char_at(text, pos) {
            Some(']') if !name.is_empty() => Ok((TagNode::closing(name), pos + 1)),
            Some(c) => Err(stop_at(pos, c)),
            None => Err(pos),
        };
    }

    if !is_name_start(first) {
        // Consume the offending character, e.g. `[0..1]` leaves `[0` as text
        return Err(pos + first.len_utf8());
    }

    let (name, value, mut pos) = parse_option(text, pos)?;
    let mut tag = TagNode {
        name,
        value,
        ..TagNode::default()
    };

    loop {
        match char_at(text, pos) {
            None => return Err(pos),
            Some(' ') => pos += 1,
            Some(']') => return Ok((tag, pos + 1)),
            Some(c) if is_name_start(c) => {
                let (key, value, end) = parse_option(text, pos)?;
                tag.set_option(key, value);
                pos = end;
            }
            Some(c) => return Err(stop_at(pos, c)),
        }
    }
}
