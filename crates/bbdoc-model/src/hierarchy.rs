//! Inheritance index.
//!
//! Built once after every record is parsed, since any class may name a parent
//! declared in another record. Edges are stored by class name next to the
//! entities rather than inside them:
//! - `children`: parent name to child names, sorted
//! - `parents`: child name to resolved parent name
//! - `roots`: classes without a resolvable parent, sorted

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::entity::ClassEntity;

/// Parent/children relationships between classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    children: HashMap<String, Vec<String>>,
    parents: HashMap<String, String>,
    roots: Vec<String>,
    subtree_has_local: HashSet<String>,
}

/// Collect classes whose subtree contains a local class.
///
/// Post-order DFS from every root, so each class is visited once.
fn compute_subtree_has_local(
    classes: &BTreeMap<String, ClassEntity>,
    children: &HashMap<String, Vec<String>>,
    roots: &[String],
) -> HashSet<String> {
    fn dfs(
        name: &str,
        classes: &BTreeMap<String, ClassEntity>,
        children: &HashMap<String, Vec<String>>,
        result: &mut HashSet<String>,
    ) -> bool {
        let mut has_local = classes.get(name).is_some_and(|c| c.is_local);
        for child in children.get(name).into_iter().flatten() {
            has_local |= dfs(child, classes, children, result);
        }
        if has_local {
            result.insert(name.to_owned());
        }
        has_local
    }

    let mut result = HashSet::new();
    for root in roots {
        dfs(root, classes, children, &mut result);
    }
    result
}

impl Hierarchy {
    /// Link every class to its parent.
    ///
    /// A parent name that matches no class leaves the child as a root. An edge
    /// that would close an inheritance cycle is dropped the same way.
    #[must_use]
    pub fn build(classes: &BTreeMap<String, ClassEntity>) -> Self {
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        let mut parents: HashMap<String, String> = HashMap::new();

        for class in classes.values() {
            if !class.has_parent() || !classes.contains_key(&class.parent_name) {
                continue;
            }
            if closes_cycle(&parents, &class.name, &class.parent_name) {
                tracing::warn!(
                    class = %class.name,
                    parent = %class.parent_name,
                    "Inheritance cycle, treating class as a root"
                );
                continue;
            }
            parents.insert(class.name.clone(), class.parent_name.clone());
            children
                .entry(class.parent_name.clone())
                .or_default()
                .push(class.name.clone());
        }

        for list in children.values_mut() {
            list.sort();
        }

        let roots: Vec<String> = classes
            .keys()
            .filter(|name| !parents.contains_key(*name))
            .cloned()
            .collect();

        let subtree_has_local = compute_subtree_has_local(classes, &children, &roots);

        Self {
            children,
            parents,
            roots,
            subtree_has_local,
        }
    }

    /// Direct children of a class, sorted by name.
    #[must_use]
    pub fn children(&self, name: &str) -> &[String] {
        self.children.get(name).map_or(&[], Vec::as_slice)
    }

    /// Resolved parent of a class. `None` for roots and orphans.
    #[must_use]
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.parents.get(name).map(String::as_str)
    }

    /// Classes with no resolved parent, sorted by name.
    #[must_use]
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Whether the class or any of its descendants is local.
    #[must_use]
    pub fn has_local_descendant(&self, name: &str) -> bool {
        self.subtree_has_local.contains(name)
    }
}

/// Whether adding `child -> parent` would make `child` its own ancestor.
fn closes_cycle(parents: &HashMap<String, String>, child: &str, parent: &str) -> bool {
    let mut current = parent;
    let mut steps = 0;
    loop {
        if current == child {
            return true;
        }
        match parents.get(current) {
            Some(next) if steps <= parents.len() => {
                current = next;
                steps += 1;
            }
            _ => return false,
        }
    }
}
