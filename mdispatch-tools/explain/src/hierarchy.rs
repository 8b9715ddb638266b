//! Nominal type hierarchies.
//!
//! Every type has at most one parent; types declared without one hang
//! off the built-in root [`ROOT`]. Method parameters name types, and call
//! arguments name the run-time type of each value.

use indexmap::IndexMap;
use thiserror::Error;

use mdispatch::{Dominates, Matches};

/// The built-in root type. Every type is a subtype of it.
pub const ROOT: &str = "Any";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("type `{0}` is declared more than once")]
    Duplicate(String),

    #[error("type `{name}` has unknown parent `{parent}`")]
    UnknownParent { name: String, parent: String },

    #[error("type `{0}` is its own ancestor")]
    Cycle(String),
}

/// A single-inheritance type tree rooted at [`ROOT`].
#[derive(Debug, Clone)]
pub struct TypeHierarchy {
    parents: IndexMap<String, Option<String>>,
}

impl Default for TypeHierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeHierarchy {
    /// A hierarchy holding only the root.
    pub fn new() -> Self {
        let mut parents = IndexMap::new();
        parents.insert(ROOT.to_string(), None);
        Self { parents }
    }

    /// Build a hierarchy from `(name, parent)` declarations in any order.
    pub fn from_decls<'a, I>(decls: I) -> Result<Self, HierarchyError>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut hierarchy = Self::new();

        for (name, parent) in decls {
            if hierarchy.parents.contains_key(name) {
                return Err(HierarchyError::Duplicate(name.to_string()));
            }
            let parent = parent.unwrap_or(ROOT).to_string();
            hierarchy.parents.insert(name.to_string(), Some(parent));
        }

        for (name, parent) in &hierarchy.parents {
            if let Some(parent) = parent {
                if !hierarchy.parents.contains_key(parent) {
                    return Err(HierarchyError::UnknownParent {
                        name: name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        // With every parent known, a walk that outlasts the type count
        // must be going round a cycle.
        let limit = hierarchy.parents.len();
        for name in hierarchy.parents.keys() {
            if hierarchy.ancestors(name).nth(limit).is_some() {
                return Err(HierarchyError::Cycle(name.clone()));
            }
        }

        Ok(hierarchy)
    }

    /// Declare a type under an already known parent.
    pub fn declare(&mut self, name: &str, parent: Option<&str>) -> Result<(), HierarchyError> {
        if self.parents.contains_key(name) {
            return Err(HierarchyError::Duplicate(name.to_string()));
        }
        let parent = parent.unwrap_or(ROOT);
        if !self.parents.contains_key(parent) {
            return Err(HierarchyError::UnknownParent {
                name: name.to_string(),
                parent: parent.to_string(),
            });
        }
        self.parents.insert(name.to_string(), Some(parent.to_string()));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    pub fn parent(&self, name: &str) -> Option<&str> {
        self.parents.get(name).and_then(|p| p.as_deref())
    }

    /// Type names in declaration order, root first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// `name` followed by its ancestors up to the root.
    pub fn ancestors<'h>(&'h self, name: &'h str) -> impl Iterator<Item = &'h str> + 'h {
        let start = self.parents.get_key_value(name).map(|(k, _)| k.as_str());
        std::iter::successors(start, move |current| self.parent(current))
    }

    /// Reflexive subtyping: is `sub` equal to or a descendant of `sup`?
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        self.ancestors(sub).any(|ancestor| ancestor == sup)
    }

    /// The most general type below both `a` and `b`, if one exists.
    ///
    /// In a tree two types share a descendant only when one is an
    /// ancestor of the other, so this is the more specific of the two.
    pub fn meet<'h>(&'h self, a: &'h str, b: &'h str) -> Option<&'h str> {
        if self.is_subtype(a, b) {
            Some(a)
        } else if self.is_subtype(b, a) {
            Some(b)
        } else {
            None
        }
    }

    /// Position-wise [`meet`](Self::meet) of equal-length parameter lists.
    ///
    /// Returns `None` when the lists differ in length or some position
    /// has no common subtype, i.e. when no call can match them all.
    pub fn meet_params<S: AsRef<str>>(&self, lists: &[&[S]]) -> Option<Vec<String>> {
        let (first, rest) = lists.split_first()?;
        let mut meet: Vec<String> = first.iter().map(|ty| ty.as_ref().to_string()).collect();

        for list in rest {
            if list.len() != meet.len() {
                return None;
            }
            for (slot, ty) in meet.iter_mut().zip(list.iter()) {
                let narrowed = self.meet(slot, ty.as_ref())?.to_string();
                *slot = narrowed;
            }
        }

        Some(meet)
    }

    /// The dominance and matching relations over this hierarchy.
    pub fn subtyping(&self) -> Subtyping<'_> {
        Subtyping { hierarchy: self }
    }
}

/// Subtyping as dispatch relations: a parameter type dominates another
/// when it is a strict subtype, and accepts an argument of any subtype.
#[derive(Debug, Clone, Copy)]
pub struct Subtyping<'h> {
    hierarchy: &'h TypeHierarchy,
}

impl Dominates<String> for Subtyping<'_> {
    fn dominates(&self, a: &String, b: &String) -> bool {
        a != b && self.hierarchy.is_subtype(a, b)
    }
}

impl Matches<String, String> for Subtyping<'_> {
    fn matches(&self, spec: &String, value: &String) -> bool {
        self.hierarchy.is_subtype(value, spec)
    }
}
