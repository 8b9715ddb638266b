//! Method tables: registries of implementations for one generic function.
//!
//! A table owns its implementations and answers calls in two steps:
//!
//! 1. **Filter applicable**: keep implementations whose arity equals the
//!    argument count and whose every descriptor matches its argument
//! 2. **Resolve**: hand the applicable set to the [`Resolver`]
//!
//! What "matches" means belongs to the descriptor vocabulary and is
//! injected through [`Matches`], just like dominance.

use std::fmt;

use tracing::{debug, trace};

use crate::config::DispatchConfig;
use crate::dominance::Dominates;
use crate::error::{DispatchError, TableError};
use crate::implementation::{ImplDominates, Implementation};
use crate::resolver::{Resolution, Resolver};
use crate::signature::Signature;

/// Does an argument descriptor accept a value?
pub trait Matches<A: ?Sized, V: ?Sized> {
    fn matches(&self, spec: &A, value: &V) -> bool;
}

impl<A: ?Sized, V: ?Sized, F> Matches<A, V> for F
where
    F: Fn(&A, &V) -> bool,
{
    fn matches(&self, spec: &A, value: &V) -> bool {
        self(spec, value)
    }
}

/// Index of an implementation within its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImplId(usize);

impl ImplId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ImplId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The implementations of one generic function.
pub struct MethodTable<A, H, D> {
    name: String,
    config: DispatchConfig,
    implementations: Vec<Implementation<A, H>>,
    resolver: Resolver<ImplDominates<D>>,
}

impl<A, H, D> MethodTable<A, H, D> {
    /// Create an empty table comparing descriptors with `relation`.
    pub fn new(name: impl Into<String>, relation: D) -> Self {
        Self::with_config(name, relation, DispatchConfig::default())
    }

    pub fn with_config(name: impl Into<String>, relation: D, config: DispatchConfig) -> Self {
        let resolver = Resolver::for_implementations_with_rule(relation, config.lifting);
        Self {
            name: name.into(),
            config,
            implementations: Vec::new(),
            resolver,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }

    pub fn get(&self, id: ImplId) -> Option<&Implementation<A, H>> {
        self.implementations.get(id.index())
    }

    /// Iterate implementations in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (ImplId, &Implementation<A, H>)> + '_ {
        self.implementations
            .iter()
            .enumerate()
            .map(|(i, imp)| (ImplId(i), imp))
    }

    /// Find the id of an implementation borrowed from this table.
    pub fn id_of(&self, implementation: &Implementation<A, H>) -> Option<ImplId> {
        self.implementations
            .iter()
            .position(|imp| std::ptr::eq(imp, implementation))
            .map(ImplId)
    }

    /// The resolver used by [`dispatch`](Self::dispatch).
    pub fn resolver(&self) -> &Resolver<ImplDominates<D>> {
        &self.resolver
    }

    /// Register an implementation.
    pub fn define(
        &mut self,
        signature: impl Into<Signature<A>>,
        handler: H,
    ) -> Result<ImplId, TableError>
    where
        A: PartialEq + fmt::Debug,
    {
        let signature = signature.into();

        if !self.config.allow_duplicate_signatures
            && self.implementations.iter().any(|imp| *imp.signature() == signature)
        {
            return Err(TableError::DuplicateSignature {
                method: self.name.clone(),
                signature: format!("{:?}", signature.params()),
            });
        }

        let id = ImplId(self.implementations.len());
        debug!(method = %self.name, id = %id, arity = signature.arity(), "defined implementation");
        self.implementations.push(Implementation::new(signature, handler));
        Ok(id)
    }

    /// Check whether `implementation` accepts `args`.
    pub fn is_applicable<V, M>(
        &self,
        implementation: &Implementation<A, H>,
        args: &[V],
        matcher: &M,
    ) -> bool
    where
        M: Matches<A, V> + ?Sized,
    {
        if implementation.arity() != args.len() {
            return false;
        }

        implementation
            .signature()
            .iter()
            .zip(args)
            .all(|(spec, arg)| matcher.matches(spec, arg))
    }

    /// The implementations that accept `args`, in definition order.
    pub fn applicable<V, M>(&self, args: &[V], matcher: &M) -> Vec<&Implementation<A, H>>
    where
        M: Matches<A, V> + ?Sized,
    {
        self.implementations
            .iter()
            .enumerate()
            .filter(|(i, imp)| {
                let applicable = self.is_applicable(imp, args, matcher);
                if !applicable {
                    trace!(method = %self.name, id = i, "implementation not applicable");
                }
                applicable
            })
            .map(|(_, imp)| imp)
            .collect()
    }

    /// Select the most specific implementation for `args`.
    pub fn dispatch<V, M>(&self, args: &[V], matcher: &M) -> Resolution<'_, Implementation<A, H>>
    where
        D: Dominates<A>,
        M: Matches<A, V> + ?Sized,
    {
        let applicable = self.applicable(args, matcher);
        debug!(
            method = %self.name,
            args = args.len(),
            applicable = applicable.len(),
            "dispatching"
        );
        self.resolver.resolve_refs(applicable)
    }

    /// Dispatch and invoke the winning handler with `args`.
    pub fn call<V, M, R>(&self, args: &[V], matcher: &M) -> Result<R, DispatchError>
    where
        A: fmt::Debug,
        D: Dominates<A>,
        M: Matches<A, V> + ?Sized,
        H: Fn(&[V]) -> R,
    {
        let winner = self
            .dispatch(args, matcher)
            .into_result_with(&self.name, |imp| format!("{:?}", imp.signature().params()))?;
        Ok((winner.handler())(args))
    }
}

impl<A: fmt::Debug, H, D> fmt::Debug for MethodTable<A, H, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("name", &self.name)
            .field("config", &self.config)
            .field(
                "signatures",
                &self
                    .implementations
                    .iter()
                    .map(|imp| imp.signature())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
