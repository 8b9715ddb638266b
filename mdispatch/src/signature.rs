//! Call signatures and the lifting of argument dominance to them.
//!
//! A [`Signature`] is the ordered list of argument descriptors of one
//! implementation. Two signatures are compared position by position with
//! an injected argument-level relation; the [`LiftingRule`] decides how
//! the per-position answers combine.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dominance::Dominates;

/// The ordered argument descriptors of one implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature<A> {
    params: Box<[A]>,
}

impl<A> Signature<A> {
    /// Create a signature from its argument descriptors.
    pub fn new(params: impl Into<Vec<A>>) -> Self {
        Self {
            params: params.into().into_boxed_slice(),
        }
    }

    /// Number of parameter positions.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The argument descriptors, in position order.
    pub fn params(&self) -> &[A] {
        &self.params
    }

    /// The descriptor at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&A> {
        self.params.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, A> {
        self.params.iter()
    }

    /// Check whether this signature dominates `other` under the default
    /// Pareto lifting of `arg`.
    pub fn dominates<D: Dominates<A>>(&self, arg: &D, other: &Self) -> bool {
        pareto_dominates(arg, &self.params, &other.params)
    }
}

impl<A> From<Vec<A>> for Signature<A> {
    fn from(params: Vec<A>) -> Self {
        Self::new(params)
    }
}

impl<A: Clone> From<&[A]> for Signature<A> {
    fn from(params: &[A]) -> Self {
        Self::new(params.to_vec())
    }
}

impl<A, const N: usize> From<[A; N]> for Signature<A> {
    fn from(params: [A; N]) -> Self {
        Self::new(Vec::from(params))
    }
}

impl<A> FromIterator<A> for Signature<A> {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, A> IntoIterator for &'a Signature<A> {
    type Item = &'a A;
    type IntoIter = std::slice::Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl<A: fmt::Display> fmt::Display for Signature<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

/// How per-argument dominance combines into signature dominance.
///
/// Both rules are irreflexive and asymmetric. Neither is transitive once
/// some descriptors are incomparable, so lifted dominance can cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiftingRule {
    /// No position is less specific and at least one is strictly more
    /// specific.
    #[default]
    Pareto,
    /// The first position where the descriptors are comparable decides.
    /// Positions where they are incomparable are skipped.
    ///
    /// When the argument relation is only a partial order, this lifting is
    /// not transitive: three signatures can each dominate the next in a
    /// cycle. Resolution reports such a cycle as ambiguity over all of its
    /// members.
    Lexicographic,
}

impl fmt::Display for LiftingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiftingRule::Pareto => write!(f, "pareto"),
            LiftingRule::Lexicographic => write!(f, "lexicographic"),
        }
    }
}

/// Pareto dominance over two parameter lists.
///
/// `a` dominates `b` iff no position of `a` is dominated by `b` and some
/// position of `a` strictly dominates `b`. Lists of unequal length are
/// incomparable.
pub fn pareto_dominates<A, D>(arg: &D, a: &[A], b: &[A]) -> bool
where
    D: Dominates<A> + ?Sized,
{
    if a.len() != b.len() {
        debug!(
            left = a.len(),
            right = b.len(),
            "signature arity mismatch, treating as incomparable"
        );
        return false;
    }

    let mut strictly = false;
    for (x, y) in a.iter().zip(b) {
        if arg.dominates(y, x) {
            return false;
        }
        if !strictly && arg.dominates(x, y) {
            strictly = true;
        }
    }

    strictly
}

/// Lexicographic dominance over two parameter lists.
///
/// Scans left to right and answers at the first position where one
/// descriptor dominates the other. Lists of unequal length are
/// incomparable.
pub fn lexicographic_dominates<A, D>(arg: &D, a: &[A], b: &[A]) -> bool
where
    D: Dominates<A> + ?Sized,
{
    if a.len() != b.len() {
        debug!(
            left = a.len(),
            right = b.len(),
            "signature arity mismatch, treating as incomparable"
        );
        return false;
    }

    for (x, y) in a.iter().zip(b) {
        if arg.dominates(x, y) {
            return true;
        }
        if arg.dominates(y, x) {
            return false;
        }
    }

    false
}

/// Signature dominance lifted from an argument-descriptor relation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureDominates<D> {
    arg: D,
    rule: LiftingRule,
}

impl<D> SignatureDominates<D> {
    /// Lift `arg` with the Pareto rule.
    pub fn new(arg: D) -> Self {
        Self::with_rule(arg, LiftingRule::Pareto)
    }

    /// Lift `arg` with an explicit rule.
    pub fn with_rule(arg: D, rule: LiftingRule) -> Self {
        Self { arg, rule }
    }

    /// The injected argument-descriptor relation.
    pub fn arg_relation(&self) -> &D {
        &self.arg
    }

    pub fn rule(&self) -> LiftingRule {
        self.rule
    }
}

impl<A, D: Dominates<A>> Dominates<Signature<A>> for SignatureDominates<D> {
    fn dominates(&self, a: &Signature<A>, b: &Signature<A>) -> bool {
        match self.rule {
            LiftingRule::Pareto => pareto_dominates(&self.arg, a.params(), b.params()),
            LiftingRule::Lexicographic => {
                lexicographic_dominates(&self.arg, a.params(), b.params())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dominance::{ByPartialOrd, Specificity};
    use proptest::prelude::*;

    fn sig(params: &[u32]) -> Signature<u32> {
        Signature::from(params)
    }

    fn pareto() -> SignatureDominates<ByPartialOrd> {
        SignatureDominates::new(ByPartialOrd)
    }

    fn lexicographic() -> SignatureDominates<ByPartialOrd> {
        SignatureDominates::with_rule(ByPartialOrd, LiftingRule::Lexicographic)
    }

    /// Even numbers and odd numbers are unrelated; within a parity class,
    /// smaller is more specific.
    fn same_parity_smaller(a: &u32, b: &u32) -> bool {
        a % 2 == b % 2 && a < b
    }

    #[test]
    fn test_pareto_equal_then_better() {
        assert!(pareto().dominates(&sig(&[1, 5]), &sig(&[1, 9])));
        assert!(!pareto().dominates(&sig(&[1, 9]), &sig(&[1, 5])));
    }

    #[test]
    fn test_pareto_incomparable() {
        let a = sig(&[1, 5]);
        let b = sig(&[2, 1]);
        assert!(!pareto().dominates(&a, &b));
        assert!(!pareto().dominates(&b, &a));
        assert_eq!(pareto().compare(&a, &b), Specificity::Incomparable);
    }

    #[test]
    fn test_pareto_all_positions_better() {
        assert!(pareto().dominates(&sig(&[1, 1, 1]), &sig(&[2, 3, 4])));
    }

    #[test]
    fn test_pareto_irreflexive() {
        let s = sig(&[3, 4]);
        assert!(!pareto().dominates(&s, &s));
    }

    #[test]
    fn test_pareto_incomparable_position_blocks_nothing() {
        // Position 0 is incomparable (odd vs even), position 1 improves.
        // Nothing regresses, so the left side still dominates.
        let rel = SignatureDominates::new(same_parity_smaller);
        assert!(rel.dominates(&sig(&[1, 2]), &sig(&[2, 4])));
        assert!(!rel.dominates(&sig(&[2, 4]), &sig(&[1, 2])));
    }

    #[test]
    fn test_arity_mismatch_incomparable() {
        let short = sig(&[1]);
        let long = sig(&[1, 2]);
        for rel in [pareto(), lexicographic()] {
            assert!(!rel.dominates(&short, &long));
            assert!(!rel.dominates(&long, &short));
        }
    }

    #[test]
    fn test_empty_signatures() {
        let empty = sig(&[]);
        assert!(!pareto().dominates(&empty, &empty));
        assert!(!lexicographic().dominates(&empty, &empty));
    }

    #[test]
    fn test_lexicographic_first_position_decides() {
        // Pareto sees these as incomparable; lexicographic lets position 0 win.
        assert!(lexicographic().dominates(&sig(&[1, 5]), &sig(&[2, 1])));
        assert!(!lexicographic().dominates(&sig(&[2, 1]), &sig(&[1, 5])));
    }

    #[test]
    fn test_lexicographic_skips_equal_prefix() {
        assert!(lexicographic().dominates(&sig(&[1, 5]), &sig(&[1, 9])));
    }

    /// Inclusive ranges, narrower is more specific.
    fn narrower(a: &(u32, u32), b: &(u32, u32)) -> bool {
        a != b && b.0 <= a.0 && a.1 <= b.1
    }

    fn ranges(params: &[(u32, u32)]) -> Signature<(u32, u32)> {
        Signature::from(params)
    }

    #[test]
    fn test_lexicographic_three_way_cycle() {
        let rel = SignatureDominates::with_rule(narrower, LiftingRule::Lexicographic);
        let x = ranges(&[(0, 5), (0, 10)]);
        let y = ranges(&[(0, 10), (3, 3)]);
        let z = ranges(&[(3, 20), (0, 5)]);

        assert!(rel.dominates(&x, &y));
        assert!(rel.dominates(&y, &z));
        assert!(rel.dominates(&z, &x));
    }

    #[test]
    fn test_pareto_three_way_cycle() {
        let rel = SignatureDominates::new(narrower);
        let a = ranges(&[(0, 5), (1, 3), (0, 5)]);
        let b = ranges(&[(0, 10), (3, 4), (3, 9)]);
        let c = ranges(&[(3, 20), (2, 6), (2, 4)]);

        assert!(rel.dominates(&a, &b));
        assert!(rel.dominates(&b, &c));
        assert!(rel.dominates(&c, &a));
    }

    #[test]
    fn test_signature_method_uses_pareto() {
        assert!(sig(&[1, 5]).dominates(&ByPartialOrd, &sig(&[1, 9])));
        assert!(!sig(&[1, 5]).dominates(&ByPartialOrd, &sig(&[2, 1])));
    }

    #[test]
    fn test_signature_display() {
        let s: Signature<&str> = Signature::from(["Int", "Any"]);
        assert_eq!(s.to_string(), "(Int, Any)");
        assert_eq!(Signature::<u8>::new(vec![]).to_string(), "()");
    }

    #[test]
    fn test_lifting_rule_display() {
        assert_eq!(LiftingRule::Pareto.to_string(), "pareto");
        assert_eq!(LiftingRule::Lexicographic.to_string(), "lexicographic");
    }

    fn arb_params(arity: usize) -> impl Strategy<Value = Vec<u32>> {
        prop::collection::vec(0u32..6, arity)
    }

    fn arb_pair() -> impl Strategy<Value = (Vec<u32>, Vec<u32>)> {
        (0usize..5).prop_flat_map(|n| (arb_params(n), arb_params(n)))
    }

    // PROPERTY: a signature never dominates itself
    proptest! {
        #[test]
        fn test_property_irreflexive(params in arb_params(4)) {
            let s = sig(&params);
            prop_assert!(!pareto().dominates(&s, &s));
            prop_assert!(!lexicographic().dominates(&s, &s));
        }
    }

    // PROPERTY: dominance never holds in both directions
    proptest! {
        #[test]
        fn test_property_asymmetric((a, b) in arb_pair()) {
            let (a, b) = (sig(&a), sig(&b));
            for rel in [pareto(), lexicographic()] {
                prop_assert!(!(rel.dominates(&a, &b) && rel.dominates(&b, &a)));
            }
            for rule in [LiftingRule::Pareto, LiftingRule::Lexicographic] {
                let parity = SignatureDominates::with_rule(same_parity_smaller, rule);
                prop_assert!(!(parity.dominates(&a, &b) && parity.dominates(&b, &a)));
            }
        }
    }

    // PROPERTY: signatures of different arity never dominate
    proptest! {
        #[test]
        fn test_property_arity_mismatch(
            a in prop::collection::vec(0u32..6, 0..5),
            b in prop::collection::vec(0u32..6, 0..5)
        ) {
            prop_assume!(a.len() != b.len());
            let (a, b) = (sig(&a), sig(&b));
            prop_assert!(!pareto().dominates(&a, &b));
            prop_assert!(!pareto().dominates(&b, &a));
        }
    }

    // PROPERTY: Pareto dominance implies lexicographic dominance
    proptest! {
        #[test]
        fn test_property_pareto_refines_lexicographic((a, b) in arb_pair()) {
            let (a, b) = (sig(&a), sig(&b));
            if pareto().dominates(&a, &b) {
                prop_assert!(lexicographic().dominates(&a, &b));
            }
        }
    }
}
