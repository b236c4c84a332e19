//! Common test utilities for integration tests.

#![allow(dead_code)]

use slint_link_drag::{
    DragPort, GestureDispatcher, LinkDragConfig, Position, ProposalOf, SimpleNode, SimplePort,
};
use std::cell::RefCell;
use std::rc::Rc;

pub type Dispatcher = GestureDispatcher<SimpleNode, SimplePort>;
pub type Proposal = ProposalOf<SimpleNode, SimplePort>;

/// Tracks collaborator invocations for testing.
///
/// Each field records calls to the corresponding handler with their arguments.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    /// (node_id, pin_id, origin)
    pub drag_started: Rc<RefCell<Vec<(i32, Option<i32>, Position)>>>,
    /// (node_id, pin_id, origin)
    pub drag_ended: Rc<RefCell<Vec<(i32, Option<i32>, Position)>>>,
    /// (source_id, target_id, pin_id)
    pub links: Rc<RefCell<Vec<(i32, i32, Option<i32>)>>>,
    /// (source_id, candidate_id)
    pub oracle_calls: Rc<RefCell<Vec<(i32, i32)>>>,
    /// Every value published on the proposal signal
    pub proposals: Rc<RefCell<Vec<Option<Proposal>>>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with all handlers recording into this tracker and no oracle.
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher_with_config(LinkDragConfig::default())
    }

    pub fn dispatcher_with_config(&self, config: LinkDragConfig) -> Dispatcher {
        let mut dispatcher = Dispatcher::new(config);

        let started = self.drag_started.clone();
        dispatcher.on_drag_start(move |source, origin| {
            started
                .borrow_mut()
                .push((source.node.id, source.port.as_ref().map(DragPort::id), origin));
        });

        let ended = self.drag_ended.clone();
        dispatcher.on_drag_end(move |source, origin| {
            ended
                .borrow_mut()
                .push((source.node.id, source.port.as_ref().map(DragPort::id), origin));
        });

        let links = self.links.clone();
        dispatcher.on_link(move |source, target, port| {
            links.borrow_mut().push((source.id, target.id, port.map(|p| p.id)));
            Ok(())
        });

        let proposals = self.proposals.clone();
        dispatcher.subscribe(move |proposal| proposals.borrow_mut().push(proposal.clone()));

        dispatcher
    }

    /// Dispatcher whose oracle records its calls and always gives `answer`.
    pub fn dispatcher_with_answer(&self, answer: Option<bool>) -> Dispatcher {
        let mut dispatcher = self.dispatcher();
        let calls = self.oracle_calls.clone();
        dispatcher.set_oracle(
            move |source: &SimpleNode, candidate: &SimpleNode, _: Option<&SimplePort>| {
                calls.borrow_mut().push((source.id, candidate.id));
                answer
            },
        );
        dispatcher
    }

    pub fn link_count(&self) -> usize {
        self.links.borrow().len()
    }

    pub fn oracle_call_count(&self) -> usize {
        self.oracle_calls.borrow().len()
    }

    /// Clear all recorded callbacks.
    pub fn clear(&self) {
        self.drag_started.borrow_mut().clear();
        self.drag_ended.borrow_mut().clear();
        self.links.borrow_mut().clear();
        self.oracle_calls.borrow_mut().clear();
        self.proposals.borrow_mut().clear();
    }
}

/// Top-level node with the given id.
pub fn node(id: i32) -> SimpleNode {
    SimpleNode::new(id)
}

/// Node inside group `parent`.
pub fn child(id: i32, parent: i32) -> SimpleNode {
    SimpleNode::with_parent(id, parent)
}
