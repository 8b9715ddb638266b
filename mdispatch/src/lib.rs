//! Dominance-based specificity resolution for run-time multiple dispatch.
//!
//! Given the implementations of a generic function that accept a call,
//! `mdispatch` selects the single most specific one, or reports that none
//! apply or that several are equally specific.
//!
//! # Algorithm Overview
//!
//! 1. **Argument dominance** is injected: a [`Dominates`] relation saying
//!    when one argument descriptor is strictly more specific than another
//! 2. **Signature dominance** lifts it position by position
//!    ([`SignatureDominates`], Pareto rule by default)
//! 3. **Implementation dominance** compares implementations by signature
//!    ([`ImplDominates`])
//! 4. **Resolution** keeps the candidates nothing else dominates
//!    ([`Resolver`]) and classifies them as a [`Resolution`]
//!
//! [`MethodTable`] packages these for a registry: it stores
//! implementations, filters them against call arguments with an injected
//! [`Matches`] predicate, and resolves.
//!
//! # Example
//!
//! ```
//! use mdispatch::{Implementation, Resolution, Resolver};
//!
//! // `Some(n)` matches only `n`, `None` matches any integer.
//! let more_specific = |a: &Option<i64>, b: &Option<i64>| a.is_some() && b.is_none();
//! let any: Option<i64> = None;
//!
//! let candidates = vec![
//!     Implementation::new([any, any], "general"),
//!     Implementation::new([Some(1), Some(1)], "ones"),
//! ];
//!
//! let resolver = Resolver::for_implementations(more_specific);
//! match resolver.resolve(&candidates) {
//!     Resolution::Winner(imp) => assert_eq!(*imp.handler(), "ones"),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```
//!
//! # Module Structure
//!
//! - [`dominance`] - The `Dominates` relation and adapters
//! - [`signature`] - Signatures and lifting rules
//! - [`implementation`] - Implementation records and their dominance
//! - [`resolver`] - Maximal-element search
//! - [`table`] - Method tables with argument matching
//! - [`config`] - Dispatch configuration
//! - [`error`] - Error types

pub mod config;
pub mod dominance;
pub mod error;
pub mod implementation;
pub mod resolver;
pub mod signature;
pub mod table;

pub use config::DispatchConfig;
pub use dominance::{ByPartialOrd, Dominates, Specificity};
pub use error::{ConfigError, DispatchError, TableError};
pub use implementation::{ImplDominates, Implementation};
pub use resolver::{Resolution, Resolver};
pub use signature::{
    lexicographic_dominates, pareto_dominates, LiftingRule, Signature, SignatureDominates,
};
pub use table::{ImplId, Matches, MethodTable};
