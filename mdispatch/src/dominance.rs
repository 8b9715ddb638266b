//! Dominance relations.
//!
//! A dominance relation answers one question: is `a` strictly more
//! specific than `b`? Every layer of dispatch resolution is phrased in
//! terms of it, from single argument descriptors up to whole
//! implementations.
//!
//! Implementations must behave as a strict partial order:
//!
//! - **Irreflexive**: `dominates(a, a)` is false
//! - **Asymmetric**: `dominates(a, b)` implies `!dominates(b, a)`
//!
//! The relation need not be total. Two elements where neither dominates
//! the other are *incomparable*. Resolution assumes these laws hold and
//! does not check them.

use std::cmp::Ordering;

/// A strict "more specific than" relation over `T`.
///
/// Any `Fn(&T, &T) -> bool` is a relation, so callers can inject plain
/// closures:
///
/// ```
/// use mdispatch::Dominates;
///
/// // Narrower integer ranges are more specific.
/// let narrower = |a: &(i32, i32), b: &(i32, i32)| {
///     a != b && b.0 <= a.0 && a.1 <= b.1
/// };
/// assert!(narrower.dominates(&(0, 10), &(i32::MIN, i32::MAX)));
/// assert!(!narrower.dominates(&(0, 10), &(0, 10)));
/// ```
pub trait Dominates<T: ?Sized> {
    /// Returns true if `a` is strictly more specific than `b`.
    fn dominates(&self, a: &T, b: &T) -> bool;

    /// Compare the specificity of two elements.
    fn compare(&self, a: &T, b: &T) -> Specificity {
        match (self.dominates(a, b), self.dominates(b, a)) {
            (true, false) => Specificity::More,
            (false, true) => Specificity::Less,
            // (true, true) only happens for a broken relation.
            _ => Specificity::Incomparable,
        }
    }
}

impl<T: ?Sized, F> Dominates<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn dominates(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Outcome of comparing two elements under a dominance relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Specificity {
    /// The left element is strictly more specific.
    More,
    /// The right element is strictly more specific.
    Less,
    /// Neither dominates the other.
    Incomparable,
}

impl Specificity {
    /// Convert to an [`Ordering`] where "more specific" sorts first.
    ///
    /// Incomparable elements map to `None`, mirroring `partial_cmp`.
    pub fn to_ordering(self) -> Option<Ordering> {
        match self {
            Specificity::More => Some(Ordering::Less),
            Specificity::Less => Some(Ordering::Greater),
            Specificity::Incomparable => None,
        }
    }

    /// Returns true if neither side dominates.
    pub fn is_incomparable(self) -> bool {
        self == Specificity::Incomparable
    }
}

/// Dominance read off a `PartialOrd` impl: `a` dominates `b` iff `a < b`.
///
/// Useful for descriptor vocabularies whose ordering already encodes
/// specificity, with "smaller" meaning "more specific".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByPartialOrd;

impl<T: PartialOrd + ?Sized> Dominates<T> for ByPartialOrd {
    fn dominates(&self, a: &T, b: &T) -> bool {
        a.partial_cmp(b) == Some(Ordering::Less)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_relation() {
        let rel = |a: &u32, b: &u32| a < b;
        assert!(rel.dominates(&1, &2));
        assert!(!rel.dominates(&2, &1));
        assert!(!rel.dominates(&2, &2));
    }

    #[test]
    fn test_compare_more_less() {
        assert_eq!(ByPartialOrd.compare(&1, &5), Specificity::More);
        assert_eq!(ByPartialOrd.compare(&5, &1), Specificity::Less);
        assert_eq!(ByPartialOrd.compare(&3, &3), Specificity::Incomparable);
    }

    #[test]
    fn test_partial_ord_incomparable() {
        // NaN is unordered against everything, itself included.
        assert_eq!(ByPartialOrd.compare(&f64::NAN, &1.0), Specificity::Incomparable);
        assert!(!ByPartialOrd.dominates(&f64::NAN, &f64::NAN));
    }

    #[test]
    fn test_specificity_to_ordering() {
        assert_eq!(Specificity::More.to_ordering(), Some(Ordering::Less));
        assert_eq!(Specificity::Less.to_ordering(), Some(Ordering::Greater));
        assert_eq!(Specificity::Incomparable.to_ordering(), None);
        assert!(Specificity::Incomparable.is_incomparable());
    }
}
