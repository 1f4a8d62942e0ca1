//! Read-only scope for rendering one page.

use std::collections::HashSet;

use crate::links::{LinkStyle, RefKind};
use crate::markdown::make_link;

/// Scope used to resolve class and member references.
///
/// Built once per page and never mutated; scoped variants are derived with
/// [`with_current_class`](Self::with_current_class),
/// [`with_link_prefix`](Self::with_link_prefix) and
/// [`with_unresolved_as_text`](Self::with_unresolved_as_text).
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    current_class: Option<&'a str>,
    local_classes: &'a HashSet<String>,
    link_prefix: &'a str,
    style: &'a LinkStyle,
    unresolved_as_text: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a context without a current class and with an empty link prefix.
    #[must_use]
    pub fn new(local_classes: &'a HashSet<String>, style: &'a LinkStyle) -> Self {
        Self {
            current_class: None,
            local_classes,
            link_prefix: "",
            style,
            unresolved_as_text: false,
        }
    }

    /// Scope to a class page. References without a class name resolve against it.
    #[must_use]
    pub fn with_current_class(self, class: &'a str) -> Self {
        Self {
            current_class: Some(class),
            ..self
        }
    }

    /// Prefix prepended to links to local pages (e.g. `api/`).
    #[must_use]
    pub fn with_link_prefix(self, prefix: &'a str) -> Self {
        Self {
            link_prefix: prefix,
            ..self
        }
    }

    #[must_use]
    pub fn current_class(&self) -> Option<&'a str> {
        self.current_class
    }

    /// Keep references that cannot be resolved as text instead of failing.
    ///
    /// Used for text that belongs to no class, such as an index introduction
    /// or a graph node description.
    #[must_use]
    pub fn with_unresolved_as_text(self) -> Self {
        Self {
            unresolved_as_text: true,
            ..self
        }
    }

    /// Whether unresolvable references are written back as text.
    #[must_use]
    pub fn unresolved_as_text(&self) -> bool {
        self.unresolved_as_text
    }

    /// Whether `class` is documented by this project.
    #[must_use]
    pub fn is_local(&self, class: &str) -> bool {
        self.local_classes.contains(class)
    }

    /// URL of a class page, local or external.
    #[must_use]
    pub fn class_url(&self, class: &str) -> String {
        if self.is_local(class) {
            self.style.local_page_url(self.link_prefix, class)
        } else {
            self.style.external_class_url(class)
        }
    }

    /// Markdown link for a type name.
    ///
    /// `void` links nowhere, and typed arrays (`Foo[]`) link to their element type.
    #[must_use]
    pub fn type_link(&self, name: &str) -> String {
        if name == "void" {
            return make_link(name, "#");
        }
        let element = name.strip_suffix("[]").unwrap_or(name);
        make_link(name, &self.class_url(element))
    }

    /// Markdown link for a member of `class`.
    ///
    /// The class prefix is left out of the link text when `class` is the current class.
    #[must_use]
    pub fn member_link(&self, kind: RefKind, class: &str, member: &str) -> String {
        let url = if self.is_local(class) {
            self.style.local_member_url(self.link_prefix, class, member)
        } else {
            self.style.external_member_url(kind, class, member)
        };
        let text = if self.current_class == Some(class) {
            member.to_owned()
        } else {
            format!("{class}.{member}")
        };
        make_link(&text, &url)
    }
}
