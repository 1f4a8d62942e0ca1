//! Linked documentation model.

use std::collections::{BTreeMap, HashSet};

use crate::entity::ClassEntity;
use crate::hierarchy::Hierarchy;

/// Every known class, local and external, with the inheritance index.
///
/// Read-only once linked.
#[derive(Debug, Clone, Default)]
pub struct DocModel {
    classes: BTreeMap<String, ClassEntity>,
    hierarchy: Hierarchy,
    local_names: HashSet<String>,
}

impl DocModel {
    /// Merge local and external classes and link the hierarchy.
    ///
    /// A local class replaces an external one of the same name.
    #[must_use]
    pub fn link(local: Vec<ClassEntity>, external: Vec<ClassEntity>) -> Self {
        let mut classes: BTreeMap<String, ClassEntity> = external
            .into_iter()
            .map(|class| (class.name.clone(), class))
            .collect();

        let mut local_names = HashSet::with_capacity(local.len());
        for class in local {
            local_names.insert(class.name.clone());
            classes.insert(class.name.clone(), class);
        }

        let hierarchy = Hierarchy::build(&classes);
        tracing::debug!(
            classes = classes.len(),
            local = local_names.len(),
            roots = hierarchy.roots().len(),
            "Linked class hierarchy"
        );

        Self {
            classes,
            hierarchy,
            local_names,
        }
    }

    /// Link local classes against the built-in engine catalog.
    #[must_use]
    pub fn from_local(local: Vec<ClassEntity>) -> Self {
        Self::link(local, crate::external::catalog())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassEntity> {
        self.classes.get(name)
    }

    /// All classes, sorted by name.
    pub fn classes(&self) -> impl Iterator<Item = &ClassEntity> {
        self.classes.values()
    }

    /// Local classes, sorted by name.
    pub fn local_classes(&self) -> impl Iterator<Item = &ClassEntity> {
        self.classes.values().filter(|c| c.is_local)
    }

    #[must_use]
    pub fn local_names(&self) -> &HashSet<String> {
        &self.local_names
    }

    #[must_use]
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    #[must_use]
    pub fn children(&self, name: &str) -> &[String] {
        self.hierarchy.children(name)
    }

    #[must_use]
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.hierarchy.parent_of(name)
    }

    #[must_use]
    pub fn roots(&self) -> &[String] {
        self.hierarchy.roots()
    }

    #[must_use]
    pub fn has_local_descendant(&self, name: &str) -> bool {
        self.hierarchy.has_local_descendant(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::parse_class;

    #[test]
    fn test_link_two_phase() {
        // B is parsed before its parent A.
        let b = parse_class(r#"<class name="B" inherits="A"/>"#, "B.xml").unwrap();
        let a = parse_class(r#"<class name="A" inherits=""/>"#, "A.xml").unwrap();

        let model = DocModel::link(vec![b, a], Vec::new());

        assert_eq!(model.children("A"), ["B".to_owned()]);
        assert_eq!(model.parent_of("B"), Some("A"));
        assert_eq!(model.roots(), ["A".to_owned()]);
    }

    #[test]
    fn test_local_wins_over_external() {
        let local = ClassEntity {
            is_local: true,
            brief_description: "Local.".to_owned(),
            ..ClassEntity::external("Node", "Object")
        };
        let model = DocModel::from_local(vec![local]);

        let node = model.get("Node").unwrap();
        assert!(node.is_local);
        assert_eq!(node.brief_description, "Local.");
        assert!(model.local_names().contains("Node"));
        assert_eq!(model.local_classes().count(), 1);
    }

    #[test]
    fn test_external_parent_resolved() {
        let tool = parse_class(
            r#"<class name="VoxelTool" inherits="RefCounted"/>"#,
            "VoxelTool.xml",
        )
        .unwrap();
        let model = DocModel::from_local(vec![tool]);

        assert_eq!(model.parent_of("VoxelTool"), Some("RefCounted"));
        assert_eq!(model.parent_of("RefCounted"), Some("Object"));
        assert!(model.has_local_descendant("Object"));
        assert!(!model.has_local_descendant("Node"));
        assert_eq!(model.roots(), ["Object".to_owned()]);
    }

    #[test]
    fn test_unknown_parent_is_silent_orphan() {
        let class = parse_class(
            r#"<class name="VoxelThing" inherits="SomethingNew"/>"#,
            "VoxelThing.xml",
        )
        .unwrap();
        let model = DocModel::from_local(vec![class]);

        assert!(model.roots().contains(&"VoxelThing".to_owned()));
        assert_eq!(model.parent_of("VoxelThing"), None);
    }
}
