//! Implementation records and their dominance.

use std::fmt;

use crate::dominance::Dominates;
use crate::signature::{LiftingRule, Signature, SignatureDominates};

/// One registered implementation: a signature paired with an opaque handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Implementation<A, H> {
    signature: Signature<A>,
    handler: H,
}

impl<A, H> Implementation<A, H> {
    pub fn new(signature: impl Into<Signature<A>>, handler: H) -> Self {
        Self {
            signature: signature.into(),
            handler,
        }
    }

    pub fn signature(&self) -> &Signature<A> {
        &self.signature
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn arity(&self) -> usize {
        self.signature.arity()
    }

    pub fn into_parts(self) -> (Signature<A>, H) {
        (self.signature, self.handler)
    }
}

impl<A: fmt::Display, H> fmt::Display for Implementation<A, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature)
    }
}

/// Implementation dominance: compares the signatures and nothing else.
///
/// The resolver only needs a `Dominates<I>` for its candidate type, so
/// wrapping the signature relation here keeps it independent of both the
/// signature representation and the descriptor vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplDominates<D> {
    signature: SignatureDominates<D>,
}

impl<D> ImplDominates<D> {
    /// Compare implementations by Pareto-lifting `arg`.
    pub fn new(arg: D) -> Self {
        Self::from_signature_relation(SignatureDominates::new(arg))
    }

    pub fn with_rule(arg: D, rule: LiftingRule) -> Self {
        Self::from_signature_relation(SignatureDominates::with_rule(arg, rule))
    }

    pub fn from_signature_relation(signature: SignatureDominates<D>) -> Self {
        Self { signature }
    }

    pub fn signature_relation(&self) -> &SignatureDominates<D> {
        &self.signature
    }
}

impl<A, H, D: Dominates<A>> Dominates<Implementation<A, H>> for ImplDominates<D> {
    fn dominates(&self, a: &Implementation<A, H>, b: &Implementation<A, H>) -> bool {
        self.signature.dominates(a.signature(), b.signature())
    }
}
