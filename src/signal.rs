//! Read-only reactive view of the in-progress link for the rendering layer.

use crate::transform::Position;

/// Projection of the live drag session, recomputed on every state change.
///
/// `None` in the signal means no gesture is in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkProposal<NodeId, PortId> {
    pub source: NodeId,
    pub source_port: Option<PortId>,
    /// The node currently under the pointer, if any.
    pub target: Option<NodeId>,
    /// Drag origin, logical space.
    pub start: Position,
    /// Live pointer position, logical space.
    pub end: Position,
    /// `None` until the oracle has been consulted for the current target.
    pub link_allowed: Option<bool>,
}

impl<NodeId, PortId> LinkProposal<NodeId, PortId> {
    pub fn is_allowed(&self) -> bool {
        self.link_allowed == Some(true)
    }
}

/// Handle returned by [`Signal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

/// A value plus the listeners that want to hear about changes to it.
///
/// Listeners run synchronously inside [`set`](Self::set), in subscription
/// order, and only when the new value differs from the old one.
pub struct Signal<T> {
    value: T,
    version: u64,
    next_id: usize,
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut(&T)>)>,
}

impl<T: Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            version: 0,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Incremented on every change. Useful as a dummy binding argument to
    /// make Slint re-evaluate a pure callback.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    /// Returns `true` if a listener was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != len_before
    }
}

impl<T: PartialEq> Signal<T> {
    /// Store `value` and notify listeners. Returns `false` when unchanged.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.version += 1;
        for (_, listener) in &mut self.subscribers {
            listener(&self.value);
        }
        true
    }
}

/// Signal carrying the current [`LinkProposal`].
pub type ProposalSignal<NodeId, PortId> = Signal<Option<LinkProposal<NodeId, PortId>>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_listeners_see_changes_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut signal = Signal::new(0);
        let sink = seen.clone();
        signal.subscribe(move |v| sink.borrow_mut().push(*v));

        assert!(signal.set(1));
        assert!(!signal.set(1));
        assert!(signal.set(2));

        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(signal.version(), 2);
        assert_eq!(*signal.get(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut signal = Signal::new(false);
        let counter = count.clone();
        let id = signal.subscribe(move |_| *counter.borrow_mut() += 1);

        signal.set(true);
        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));
        signal.set(false);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_proposal_allowed_only_when_confirmed() {
        let mut proposal: LinkProposal<i32, i32> = LinkProposal {
            source: 1,
            source_port: None,
            target: Some(2),
            start: Position::default(),
            end: Position::new(5.0, 5.0),
            link_allowed: None,
        };
        assert!(!proposal.is_allowed());
        proposal.link_allowed = Some(true);
        assert!(proposal.is_allowed());
    }
}
