//! Link validity oracle.
//!
//! The engine asks the host whether a proposed link is legal every time the
//! pointer enters a new candidate target. The host answers `Some(true)`,
//! `Some(false)`, or `None` when it has no opinion. `None` is treated as
//! allowed, so hosts without fine-grained rules never have to implement one.

use crate::node::{DragNode, DragPort};

/// Host-supplied predicate deciding whether `source → candidate` is legal.
///
/// Called synchronously and at most once per distinct target entered.
/// Implementations must not reach back into the dispatcher that calls them.
///
/// Closures of the shape `Fn(&N, &N, Option<&P>) -> Option<bool>` implement
/// this trait:
///
/// ```ignore
/// let oracle = |source: &SimpleNode, target: &SimpleNode, _port: Option<&SimplePort>| {
///     Some(source.id != target.id)
/// };
/// let dispatcher = GestureDispatcher::new(config).with_oracle(oracle);
/// ```
pub trait LinkOracle<N, P> {
    fn check(&self, source: &N, candidate: &N, port: Option<&P>) -> Option<bool>;
}

impl<N, P, F> LinkOracle<N, P> for F
where
    F: Fn(&N, &N, Option<&P>) -> Option<bool>,
{
    fn check(&self, source: &N, candidate: &N, port: Option<&P>) -> Option<bool> {
        self(source, candidate, port)
    }
}

/// Oracle used when the host supplies none: never objects.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl<N, P> LinkOracle<N, P> for AllowAll {
    fn check(&self, _source: &N, _candidate: &N, _port: Option<&P>) -> Option<bool> {
        None
    }
}

/// Oracle that rejects links from a node onto itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSelfLinks;

impl<N: DragNode, P> LinkOracle<N, P> for NoSelfLinks {
    fn check(&self, source: &N, candidate: &N, _port: Option<&P>) -> Option<bool> {
        if source.id() == candidate.id() {
            Some(false)
        } else {
            None
        }
    }
}

/// Combines several oracles with AND logic.
///
/// Members are asked in insertion order; the first explicit `Some(false)`
/// short-circuits. If every member declines to answer the result is `None`.
///
/// ```ignore
/// let oracle = CompositeOracle::new()
///     .add(NoSelfLinks)
///     .add(|s: &SimpleNode, t: &SimpleNode, _: Option<&SimplePort>| Some(t.id < 100));
/// ```
pub struct CompositeOracle<N, P> {
    oracles: Vec<Box<dyn LinkOracle<N, P>>>,
}

impl<N, P> Default for CompositeOracle<N, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, P> CompositeOracle<N, P> {
    pub fn new() -> Self {
        Self { oracles: Vec::new() }
    }

    pub fn add<O: LinkOracle<N, P> + 'static>(mut self, oracle: O) -> Self {
        self.oracles.push(Box::new(oracle));
        self
    }

    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }
}

impl<N, P> LinkOracle<N, P> for CompositeOracle<N, P> {
    fn check(&self, source: &N, candidate: &N, port: Option<&P>) -> Option<bool> {
        let mut answer = None;
        for oracle in &self.oracles {
            match oracle.check(source, candidate, port) {
                Some(false) => return Some(false),
                Some(true) => answer = Some(true),
                None => {}
            }
        }
        answer
    }
}

/// Collapse an oracle answer into a decision. Unspecified means allowed.
pub fn resolve_link_check(answer: Option<bool>) -> bool {
    answer.unwrap_or(true)
}

/// Ask `oracle` about a candidate and apply the permissive default.
pub fn is_link_allowed<N, P, O>(oracle: &O, source: &N, candidate: &N, port: Option<&P>) -> bool
where
    N: DragNode,
    P: DragPort,
    O: LinkOracle<N, P> + ?Sized,
{
    resolve_link_check(oracle.check(source, candidate, port))
}
