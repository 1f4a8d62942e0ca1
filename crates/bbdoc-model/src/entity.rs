//! Documentation entities.
//!
//! Entities are immutable once built. Inheritance edges live in
//! [`Hierarchy`](crate::Hierarchy), never inside the entities themselves.

/// Deprecated or experimental status of a class or member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Stable,
    /// Flagged, optionally with an explanation.
    Flagged(Option<String>),
}

impl Status {
    /// Build a status from the boolean form (`is_deprecated="true"`) and the
    /// message form (`deprecated="..."`). A message implies the flag.
    #[must_use]
    pub fn from_markers(flag: Option<&str>, message: Option<&str>) -> Self {
        match message {
            Some(message) => Self::Flagged(Some(message.to_owned())),
            None if flag == Some("true") => Self::Flagged(None),
            None => Self::Stable,
        }
    }

    #[must_use]
    pub fn is_flagged(&self) -> bool {
        matches!(self, Self::Flagged(_))
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Flagged(Some(message)) => Some(message),
            _ => None,
        }
    }
}

/// Fields shared by every kind of class member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberEntity {
    pub name: String,
    /// Raw markup, not yet rendered.
    pub description: String,
    pub deprecated: Status,
    pub experimental: Status,
}

impl MemberEntity {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Method or signal parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyEntity {
    pub member: MemberEntity,
    pub type_name: String,
    pub default: Option<String>,
    /// Enum the property value belongs to, if any.
    pub enum_name: Option<String>,
    pub setter: Option<String>,
    pub getter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntity {
    pub member: MemberEntity,
    pub parameters: Vec<Parameter>,
    pub return_type: String,
    /// Space-separated qualifiers such as `const` or `virtual`.
    pub qualifiers: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalEntity {
    pub member: MemberEntity,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantEntity {
    pub member: MemberEntity,
    pub value: String,
    /// Enum group the constant belongs to.
    pub enum_name: Option<String>,
    pub is_bitfield: bool,
}

/// Constants sharing an `enum` group, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumEntity {
    pub name: String,
    pub is_bitfield: bool,
    pub items: Vec<ConstantEntity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tutorial {
    pub title: String,
    pub link: String,
}

/// One documented class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassEntity {
    pub name: String,
    /// Empty for a root class.
    pub parent_name: String,
    pub brief_description: String,
    pub description: String,
    pub experimental: Status,
    pub deprecated: Status,
    pub tutorials: Vec<Tutorial>,
    pub properties: Vec<PropertyEntity>,
    pub methods: Vec<MethodEntity>,
    pub signals: Vec<SignalEntity>,
    /// Constants without an enum group.
    pub constants: Vec<ConstantEntity>,
    pub enums: Vec<EnumEntity>,
    /// Whether the class is documented by this project rather than known by name only.
    pub is_local: bool,
    /// Where the record came from (usually a file path).
    pub source_id: String,
}

impl ClassEntity {
    /// Externally known class with no documentation of its own.
    #[must_use]
    pub fn external(name: &str, parent_name: &str) -> Self {
        Self {
            name: name.to_owned(),
            parent_name: parent_name.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_parent(&self) -> bool {
        !self.parent_name.is_empty()
    }

}
