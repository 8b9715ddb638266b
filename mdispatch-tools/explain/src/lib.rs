//! Explain multiple-dispatch resolution over a method table file.
//!
//! A table file declares a nominal type hierarchy and the methods of
//! generic functions. This crate loads such a file into a [`Catalog`],
//! dispatches calls against it with `mdispatch`, and reports the outcome
//! as text, JSON, or source-annotated diagnostics.
//!
//! # Example
//!
//! ```
//! use mdispatch_explain::{explain, Catalog, Outcome};
//!
//! let source = r#"
//! [[type]]
//! name = "Shape"
//!
//! [[type]]
//! name = "Circle"
//! parent = "Shape"
//!
//! [[method]]
//! name = "area"
//! params = ["Shape"]
//!
//! [[method]]
//! name = "area"
//! params = ["Circle"]
//! "#;
//!
//! let catalog = Catalog::parse("shapes.toml", source.to_string()).unwrap();
//! let explanation = explain(&catalog, "area", &["Circle".to_string()]).unwrap();
//! assert_eq!(explanation.outcome, Outcome::Selected(1));
//! ```

pub mod catalog;
pub mod check;
pub mod explain;
pub mod hierarchy;

pub use catalog::{Catalog, CatalogError, FunctionTable, MethodDef};
pub use check::{find_conflicts, Conflict};
pub use explain::{explain, Explanation, Outcome};
pub use hierarchy::{HierarchyError, Subtyping, TypeHierarchy, ROOT};
