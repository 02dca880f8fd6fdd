//! Category path resolution for posting descriptions.
//!
//! Categories form a tree through a nullable parent reference. The tree is
//! held as an arena keyed by id rather than an object graph, so there are no
//! ownership cycles. Resolution failures degrade to the literal `"Unknown"`
//! instead of failing the owning financial operation.

use std::collections::{HashMap, HashSet};

use fintrack_shared::types::CategoryId;

/// Placeholder path for an unknown category id.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone)]
struct CategoryNode {
    name: String,
    parent: Option<CategoryId>,
}

/// Arena of category records supporting path-name lookups.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: HashMap<CategoryId, CategoryNode>,
}

impl CategoryTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a category record.
    pub fn insert(
        &mut self,
        id: CategoryId,
        name: impl Into<String>,
        parent: Option<CategoryId>,
    ) {
        self.nodes.insert(
            id,
            CategoryNode {
                name: name.into(),
                parent,
            },
        );
    }

    /// Returns the number of categories in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolves the full hierarchical path name of a category.
    ///
    /// The path is the parent path followed by `"/"` and the category name;
    /// root categories have no prefix. An unknown id resolves to `"Unknown"`,
    /// and a dangling parent reference resolves to an `"Unknown/..."` prefix.
    /// A parent cycle terminates at the first repeated node.
    #[must_use]
    pub fn path_name(&self, id: CategoryId) -> String {
        let Some(node) = self.nodes.get(&id) else {
            return UNKNOWN_CATEGORY.to_string();
        };

        // Segments are collected child-first, then reversed.
        let mut segments = vec![node.name.as_str()];
        let mut seen = HashSet::from([id]);
        let mut parent = node.parent;

        while let Some(parent_id) = parent {
            if !seen.insert(parent_id) {
                break;
            }
            match self.nodes.get(&parent_id) {
                Some(node) => {
                    segments.push(node.name.as_str());
                    parent = node.parent;
                }
                None => {
                    segments.push(UNKNOWN_CATEGORY);
                    break;
                }
            }
        }

        segments.reverse();
        segments.join("/")
    }
}

impl FromIterator<(CategoryId, String, Option<CategoryId>)> for CategoryTree {
    fn from_iter<I: IntoIterator<Item = (CategoryId, String, Option<CategoryId>)>>(
        iter: I,
    ) -> Self {
        let mut tree = Self::new();
        for (id, name, parent) in iter {
            tree.insert(id, name, parent);
        }
        tree
    }
}
