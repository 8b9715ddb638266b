//! Maximal-element search over a candidate set.
//!
//! The resolver is handed candidates that already match the call. It
//! keeps every candidate that no other candidate dominates and classifies
//! the survivors:
//!
//! 1. **No candidates**: nothing to choose from
//! 2. **Unique winner**: exactly one survivor
//! 3. **Ambiguous**: two or more survivors, mutually undominated
//!
//! The relation is only a partial order, so there is nothing to sort by;
//! every pair is compared. Overload sets are small, which keeps the
//! O(n²) scan cheap.

use std::fmt;

use tracing::{debug, trace};

use crate::dominance::Dominates;
use crate::error::DispatchError;
use crate::implementation::ImplDominates;
use crate::signature::LiftingRule;

/// Outcome of resolving a candidate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a, I> {
    /// Exactly one candidate is undominated.
    Winner(&'a I),
    /// The candidate set was empty.
    NoMatch,
    /// Several candidates are undominated, in input order.
    Ambiguous(Vec<&'a I>),
}

impl<'a, I> Resolution<'a, I> {
    pub fn is_winner(&self) -> bool {
        matches!(self, Resolution::Winner(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Resolution::Ambiguous(_))
    }

    /// The winning candidate, if resolution succeeded.
    pub fn winner(&self) -> Option<&'a I> {
        match self {
            Resolution::Winner(winner) => Some(*winner),
            _ => None,
        }
    }

    /// The maximal candidates: the winner alone, every ambiguous
    /// candidate, or nothing.
    pub fn maximal(&self) -> Vec<&'a I> {
        match self {
            Resolution::Winner(winner) => vec![*winner],
            Resolution::NoMatch => Vec::new(),
            Resolution::Ambiguous(candidates) => candidates.clone(),
        }
    }

    /// Map the candidate references, keeping the outcome shape.
    pub fn map<'b, J>(self, mut f: impl FnMut(&'a I) -> &'b J) -> Resolution<'b, J> {
        match self {
            Resolution::Winner(winner) => Resolution::Winner(f(winner)),
            Resolution::NoMatch => Resolution::NoMatch,
            Resolution::Ambiguous(candidates) => {
                Resolution::Ambiguous(candidates.into_iter().map(f).collect())
            }
        }
    }

    /// Convert into a `Result`, describing each ambiguous candidate with
    /// its `Display` impl.
    pub fn into_result(self, method: &str) -> Result<&'a I, DispatchError>
    where
        I: fmt::Display,
    {
        self.into_result_with(method, |candidate| candidate.to_string())
    }

    /// Convert into a `Result`, describing each ambiguous candidate with
    /// `describe`.
    pub fn into_result_with(
        self,
        method: &str,
        describe: impl Fn(&I) -> String,
    ) -> Result<&'a I, DispatchError> {
        match self {
            Resolution::Winner(winner) => Ok(winner),
            Resolution::NoMatch => Err(DispatchError::NoApplicable {
                method: method.to_string(),
            }),
            Resolution::Ambiguous(candidates) => Err(DispatchError::Ambiguous {
                method: method.to_string(),
                candidates: candidates.into_iter().map(describe).collect(),
            }),
        }
    }
}

/// Selects the most specific candidate under a dominance relation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver<D> {
    relation: D,
}

impl<D> Resolver<D> {
    /// Create a resolver over candidates compared by `relation`.
    pub fn new(relation: D) -> Self {
        Self { relation }
    }

    pub fn relation(&self) -> &D {
        &self.relation
    }

    /// Resolve a candidate set.
    pub fn resolve<'a, I>(&self, candidates: &'a [I]) -> Resolution<'a, I>
    where
        D: Dominates<I>,
    {
        let refs: Vec<&'a I> = candidates.iter().collect();
        self.resolve_refs(refs)
    }

    /// Resolve a candidate set given as borrowed references.
    ///
    /// Registries usually filter their full table down to the applicable
    /// entries and end up holding references; this avoids cloning them.
    pub fn resolve_refs<'a, I>(&self, candidates: Vec<&'a I>) -> Resolution<'a, I>
    where
        D: Dominates<I>,
    {
        debug!(candidates = candidates.len(), "resolving dispatch");

        if candidates.is_empty() {
            debug!("no applicable candidates");
            return Resolution::NoMatch;
        }

        let mut maximal = self.maximal_refs(&candidates);

        // Lifted relations need not be transitive, so candidates can
        // eliminate each other in a loop. None of them is then preferable.
        if maximal.is_empty() {
            debug!(
                candidates = candidates.len(),
                "dominance cycle eliminated every candidate"
            );
            return Resolution::Ambiguous(candidates);
        }

        if maximal.len() == 1 {
            if let Some(winner) = maximal.pop() {
                debug!("unique most specific candidate");
                return Resolution::Winner(winner);
            }
        }

        debug!(maximal = maximal.len(), "ambiguous dispatch");
        Resolution::Ambiguous(maximal)
    }

    /// Find the maximally specific candidates.
    ///
    /// A candidate is maximal if no *other* candidate (by position)
    /// dominates it. Equal candidates therefore all survive. The result is
    /// empty when the candidates dominate each other in a cycle, which
    /// [`resolve`](Self::resolve) reports as ambiguity over all of them.
    pub fn find_maximal<'a, I>(&self, candidates: &'a [I]) -> Vec<&'a I>
    where
        D: Dominates<I>,
    {
        let refs: Vec<&'a I> = candidates.iter().collect();
        self.maximal_refs(&refs)
    }

    fn maximal_refs<'a, I>(&self, candidates: &[&'a I]) -> Vec<&'a I>
    where
        D: Dominates<I>,
    {
        candidates
            .iter()
            .enumerate()
            .filter(|&(i, c)| !self.is_dominated(i, c, candidates))
            .map(|(_, c)| *c)
            .collect()
    }

    fn is_dominated<I>(&self, index: usize, candidate: &I, candidates: &[&I]) -> bool
    where
        D: Dominates<I>,
    {
        candidates.iter().enumerate().any(|(j, other)| {
            let dominated = j != index && self.relation.dominates(other, candidate);
            if dominated {
                trace!(eliminated = index, by = j, "candidate dominated");
            }
            dominated
        })
    }
}

impl<D> Resolver<ImplDominates<D>> {
    /// Resolver over [`Implementation`](crate::Implementation) records,
    /// Pareto-lifting the argument relation `arg`.
    pub fn for_implementations(arg: D) -> Self {
        Self::new(ImplDominates::new(arg))
    }

    /// Resolver over implementation records with an explicit lifting rule.
    pub fn for_implementations_with_rule(arg: D, rule: LiftingRule) -> Self {
        Self::new(ImplDominates::with_rule(arg, rule))
    }
}
