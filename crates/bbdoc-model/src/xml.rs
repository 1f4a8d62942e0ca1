//! Minimal XML element tree.
//!
//! Documentation records are small, so they are read into a tree of
//! [`XmlElement`]s first and interpreted afterwards.

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::ModelError;

/// XML element with its attributes, direct text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub tag: String,
    pub attrs: HashMap<String, String>,
    /// Concatenated text found directly inside this element (entities decoded).
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parse a document and return its root element.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not well-formed XML or has no element.
    pub fn parse(xml: &str) -> Result<Self, ModelError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let tag = decode_tag(&reader, e.name().as_ref());
                    let attrs = decode_attrs(&reader, &e);
                    let mut root = parse_children(&mut reader, &tag)?;
                    root.tag = tag;
                    root.attrs = attrs;
                    return Ok(root);
                }
                Event::Empty(e) => {
                    return Ok(Self {
                        tag: decode_tag(&reader, e.name().as_ref()),
                        attrs: decode_attrs(&reader, &e),
                        ..Self::default()
                    });
                }
                Event::Eof => return Err(ModelError::EmptyDocument),
                _ => {}
            }
            buf.clear();
        }
    }

    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// First child with the given tag.
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All children with the given tag, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Text of the first child with the given tag, or an empty string.
    #[must_use]
    pub fn child_text(&self, tag: &str) -> &str {
        self.child(tag).map_or("", |c| c.text.as_str())
    }
}

fn parse_children<R: BufRead>(
    reader: &mut Reader<R>,
    parent_tag: &str,
) -> Result<XmlElement, ModelError> {
    let mut buf = Vec::new();
    let mut node = XmlElement::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let child_tag = decode_tag(reader, e.name().as_ref());
                let child_attrs = decode_attrs(reader, &e);
                let mut child = parse_children(reader, &child_tag)?;
                child.tag = child_tag;
                child.attrs = child_attrs;
                node.children.push(child);
            }
            Event::Empty(e) => {
                node.children.push(XmlElement {
                    tag: decode_tag(reader, e.name().as_ref()),
                    attrs: decode_attrs(reader, &e),
                    ..XmlElement::default()
                });
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                node.text.push_str(&text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                node.text.push_str(&decode_entity(&entity));
            }
            Event::CData(e) => {
                node.text.push_str(&String::from_utf8_lossy(&e));
            }
            Event::End(e) => {
                let end_tag = decode_tag(reader, e.name().as_ref());
                if end_tag == parent_tag {
                    return Ok(node);
                }
                // Mismatched end tag - continue
            }
            Event::Eof => return Ok(node),
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }
}

fn decode_tag<R: BufRead>(reader: &Reader<R>, name: &[u8]) -> String {
    reader.decoder().decode(name).map_or_else(
        |_| String::from_utf8_lossy(name).into_owned(),
        std::borrow::Cow::into_owned,
    )
}

fn decode_attrs<R: BufRead>(reader: &Reader<R>, e: &BytesStart) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    for attr in e.attributes().flatten() {
        let key = decode_tag(reader, attr.key.as_ref());
        if key.starts_with("xmlns") {
            continue;
        }
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        attrs.insert(key, value);
    }
    attrs
}

/// Decode XML entity references to their character values.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}
