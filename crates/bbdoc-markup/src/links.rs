//! Link targets for class pages and externally documented classes.

/// Default location of the engine's class reference.
pub const DEFAULT_EXTERNAL_BASE_URL: &str = "https://docs.godotengine.org/en/stable/classes";

/// Default extension of generated pages.
pub const DEFAULT_PAGE_EXTENSION: &str = "md";

/// Kind of member targeted by a cross-reference tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Property,
    Method,
    Signal,
    Constant,
    Enum,
}

impl RefKind {
    /// Map a cross-reference tag name (`member`, `method`, ...) to its kind.
    #[must_use]
    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            "member" => Some(Self::Property),
            "method" => Some(Self::Method),
            "signal" => Some(Self::Signal),
            "constant" => Some(Self::Constant),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }

    /// Segment used by the external anchor scheme.
    fn external_segment(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Method => "method",
            Self::Signal => "signal",
            Self::Constant => "constant",
            Self::Enum => "enum",
        }
    }
}

/// How page files and external class URLs are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStyle {
    /// Extension of generated pages, without the dot.
    pub page_extension: String,
    /// Base URL of the external class reference.
    pub external_base_url: String,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            page_extension: DEFAULT_PAGE_EXTENSION.to_owned(),
            external_base_url: DEFAULT_EXTERNAL_BASE_URL.to_owned(),
        }
    }
}

impl LinkStyle {
    /// File name of the page generated for `class`.
    #[must_use]
    pub fn page_file_name(&self, class: &str) -> String {
        format!("{class}.{}", self.page_extension)
    }

    /// Link to a local class page.
    #[must_use]
    pub fn local_page_url(&self, prefix: &str, class: &str) -> String {
        format!("{prefix}{}", self.page_file_name(class))
    }

    /// Link to a member anchor on a local class page.
    #[must_use]
    pub fn local_member_url(&self, prefix: &str, class: &str, member: &str) -> String {
        format!(
            "{}#{}{member}",
            self.local_page_url(prefix, class),
            crate::markdown::ANCHOR_PREFIX
        )
    }

    /// Page of a class in the external reference.
    ///
    /// # Example
    ///
    /// ```
    /// use bbdoc_markup::LinkStyle;
    ///
    /// let style = LinkStyle::default();
    /// assert_eq!(
    ///     style.external_class_url("Node3D"),
    ///     "https://docs.godotengine.org/en/stable/classes/class_node3d.html"
    /// );
    /// ```
    #[must_use]
    pub fn external_class_url(&self, class: &str) -> String {
        format!(
            "{}/class_{}.html",
            self.external_base_url.trim_end_matches('/'),
            class.to_lowercase()
        )
    }

    /// Anchor of a member in the external reference.
    ///
    /// The external anchor scheme drops one leading underscore and uses
    /// hyphens instead of underscores. Members that exist both with and
    /// without the underscore (like `_get` and `get`) cannot be told apart.
    #[must_use]
    pub fn external_member_url(&self, kind: RefKind, class: &str, member: &str) -> String {
        let class_url = self.external_class_url(class);
        let class_lower = class.to_lowercase();
        let member = member.to_lowercase();

        if kind == RefKind::Enum {
            return format!("{class_url}#enum-{class_lower}-{member}");
        }

        let member = member.strip_prefix('_').unwrap_or(member.as_str()).replace('_', "-");
        format!(
            "{class_url}#class-{class_lower}-{}-{member}",
            kind.external_segment()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_kind_from_tag() {
        assert_eq!(RefKind::from_tag("member"), Some(RefKind::Property));
        assert_eq!(RefKind::from_tag("enum"), Some(RefKind::Enum));
        assert_eq!(RefKind::from_tag("b"), None);
    }

    #[test]
    fn test_local_urls() {
        let style = LinkStyle::default();
        assert_eq!(style.local_page_url("api/", "VoxelTool"), "api/VoxelTool.md");
        assert_eq!(
            style.local_member_url("", "VoxelTool", "do_box"),
            "VoxelTool.md#i_do_box"
        );
    }

    #[test]
    fn test_external_member_url() {
        let style = LinkStyle::default();
        assert_eq!(
            style.external_member_url(RefKind::Method, "Node", "add_child"),
            "https://docs.godotengine.org/en/stable/classes/class_node.html#class-node-method-add-child"
        );
    }

    #[test]
    fn test_external_member_url_strips_leading_underscore() {
        let style = LinkStyle::default();
        assert_eq!(
            style.external_member_url(RefKind::Method, "Node", "_ready"),
            "https://docs.godotengine.org/en/stable/classes/class_node.html#class-node-method-ready"
        );
    }

    #[test]
    fn test_external_enum_and_constant_urls() {
        let style = LinkStyle::default();
        assert_eq!(
            style.external_member_url(RefKind::Enum, "Mesh", "PrimitiveType"),
            "https://docs.godotengine.org/en/stable/classes/class_mesh.html#enum-mesh-primitivetype"
        );
        assert_eq!(
            style.external_member_url(RefKind::Constant, "Node", "NOTIFICATION_READY"),
            "https://docs.godotengine.org/en/stable/classes/class_node.html#class-node-constant-notification-ready"
        );
    }

    #[test]
    fn test_custom_base_url_trailing_slash() {
        let style = LinkStyle {
            page_extension: "md".to_owned(),
            external_base_url: "https://example.com/classes/".to_owned(),
        };
        assert_eq!(
            style.external_class_url("Object"),
            "https://example.com/classes/class_object.html"
        );
    }
}
