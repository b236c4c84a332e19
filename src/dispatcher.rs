//! Public entry points for one pointer's link gestures.
//!
//! [`GestureDispatcher`] owns the only [`DragSession`] of its pointer-input
//! context. Node and port hit-test surfaces call the five gesture methods;
//! the dispatcher converts coordinates, asks the oracle, publishes the
//! [`LinkProposal`] and finally calls the host's link handler.
//!
//! # Example
//!
//! ```ignore
//! use slint_link_drag::*;
//!
//! let mut dispatcher = GestureDispatcher::<SimpleNode>::new(LinkDragConfig::default())
//!     .with_oracle(|s: &SimpleNode, t: &SimpleNode, _: Option<&SimplePort>| Some(s.id != t.id));
//!
//! dispatcher.on_link(|source, target, port| {
//!     graph.add_edge(source.id, target.id, port.map(|p| p.id))?;
//!     Ok(())
//! });
//! dispatcher.subscribe(|proposal| renderer.set_preview(proposal.clone()));
//!
//! dispatcher.start(Draggable::node(node_a), Position::new(0.0, 0.0))?;
//! dispatcher.drag_move(&viewport, pointer)?;
//! dispatcher.enter_target(node_b)?;
//! let outcome = dispatcher.end()?;
//! ```

use crate::config::LinkDragConfig;
use crate::error::DragError;
use crate::node::{DragNode, DragPort, Draggable, SimplePort};
use crate::oracle::{AllowAll, LinkOracle};
use crate::session::{DragEvent, DragSession, DragState, Effect};
use crate::signal::{LinkProposal, ProposalSignal, SubscriptionId};
use crate::transform::{to_logical, Position, ViewTransform};
use log::{debug, warn};

/// The [`LinkProposal`] type published by a dispatcher over `N` and `P`.
pub type ProposalOf<N, P> = LinkProposal<<N as DragNode>::Id, <P as DragPort>::Id>;

type LinkHandler<N, P> = Box<dyn FnMut(&N, &N, Option<&P>) -> anyhow::Result<()>>;
type LifecycleHandler<N, P> = Box<dyn FnMut(&Draggable<N, P>, Position)>;

/// How a gesture finished.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome<N, P> {
    Linked { source: N, target: N, port: Option<P> },
    Cancelled,
}

impl<N, P> DragOutcome<N, P> {
    pub fn is_linked(&self) -> bool {
        matches!(self, Self::Linked { .. })
    }
}

/// Drag-to-link gesture engine for a single pointer.
///
/// Hosts with several simultaneous pointers create one dispatcher per
/// pointer. All methods run synchronously to completion.
pub struct GestureDispatcher<N: DragNode, P: DragPort = SimplePort> {
    config: LinkDragConfig,
    state: DragState<N, P>,
    oracle: Box<dyn LinkOracle<N, P>>,
    proposal: ProposalSignal<N::Id, P::Id>,
    link_handler: Option<LinkHandler<N, P>>,
    drag_start_handler: Option<LifecycleHandler<N, P>>,
    drag_end_handler: Option<LifecycleHandler<N, P>>,
}

impl<N: DragNode + 'static, P: DragPort + 'static> Default for GestureDispatcher<N, P> {
    fn default() -> Self {
        Self::new(LinkDragConfig::default())
    }
}

impl<N: DragNode + 'static, P: DragPort + 'static> GestureDispatcher<N, P> {
    /// Create an idle dispatcher. Without an oracle every structurally
    /// eligible target is allowed.
    pub fn new(config: LinkDragConfig) -> Self {
        Self {
            config,
            state: DragState::Idle,
            oracle: Box::new(AllowAll),
            proposal: ProposalSignal::new(None),
            link_handler: None,
            drag_start_handler: None,
            drag_end_handler: None,
        }
    }

    pub fn with_oracle<O: LinkOracle<N, P> + 'static>(mut self, oracle: O) -> Self {
        self.set_oracle(oracle);
        self
    }

    pub fn set_oracle<O: LinkOracle<N, P> + 'static>(&mut self, oracle: O) {
        self.oracle = Box::new(oracle);
    }

    /// Go back to the always-allow default.
    pub fn clear_oracle(&mut self) {
        self.oracle = Box::new(AllowAll);
    }
}

impl<N: DragNode, P: DragPort> GestureDispatcher<N, P> {
    /// Set the create-link collaborator, called once per committed gesture.
    ///
    /// An error returned here is passed through by [`end`](Self::end); the
    /// dispatcher has already returned to idle by then.
    pub fn on_link(
        &mut self,
        handler: impl FnMut(&N, &N, Option<&P>) -> anyhow::Result<()> + 'static,
    ) {
        self.link_handler = Some(Box::new(handler));
    }

    /// Called on every successful `start` with the source and origin.
    pub fn on_drag_start(&mut self, handler: impl FnMut(&Draggable<N, P>, Position) + 'static) {
        self.drag_start_handler = Some(Box::new(handler));
    }

    /// Called on every `end`, committed or not.
    pub fn on_drag_end(&mut self, handler: impl FnMut(&Draggable<N, P>, Position) + 'static) {
        self.drag_end_handler = Some(Box::new(handler));
    }

    /// Listen to proposal changes. The listener receives `None` when the
    /// gesture ends.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&Option<ProposalOf<N, P>>) + 'static,
    ) -> SubscriptionId {
        self.proposal.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.proposal.unsubscribe(id)
    }

    pub fn config(&self) -> &LinkDragConfig {
        &self.config
    }

    /// Replace the configuration. Refused while a gesture is live.
    pub fn set_config(&mut self, config: LinkDragConfig) -> Result<(), DragError> {
        if self.state.is_dragging() {
            return Err(DragError::AlreadyDragging);
        }
        self.config = config;
        Ok(())
    }

    pub fn state(&self) -> &DragState<N, P> {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    pub fn session(&self) -> Option<&DragSession<N, P>> {
        self.state.session()
    }

    pub fn proposal(&self) -> Option<&ProposalOf<N, P>> {
        self.proposal.get().as_ref()
    }

    /// Bumped each time the published proposal changes.
    pub fn proposal_version(&self) -> u64 {
        self.proposal.version()
    }

    /// `None` while idle or before a target has been evaluated.
    pub fn link_allowed(&self) -> Option<bool> {
        self.session().and_then(|s| s.link_allowed)
    }

    // === Gesture entry points ===

    /// Begin a gesture from `source`. `origin` is in logical space.
    pub fn start(&mut self, source: Draggable<N, P>, origin: Position) -> Result<(), DragError> {
        self.apply(DragEvent::Start { source, origin }).map(|_| ())
    }

    /// Track the pointer. `viewport_pos` is in viewport pixels and
    /// `transform` is the current logical → viewport map.
    ///
    /// Ignored while idle. A degenerate transform fails this call only; the
    /// gesture stays live.
    pub fn drag_move<T: ViewTransform>(
        &mut self,
        transform: &T,
        viewport_pos: Position,
    ) -> Result<(), DragError> {
        if !self.state.is_dragging() {
            debug!("ignoring move while idle");
            return Ok(());
        }
        let endpoint = to_logical(transform, viewport_pos)?;
        self.apply(DragEvent::Move { endpoint }).map(|_| ())
    }

    /// The pointer entered `candidate`. Re-entering the current target is a
    /// no-op and does not consult the oracle again.
    pub fn enter_target(&mut self, candidate: N) -> Result<(), DragError> {
        self.apply(DragEvent::Enter(candidate)).map(|_| ())
    }

    /// The pointer left the current target.
    pub fn leave_target(&mut self) -> Result<(), DragError> {
        self.apply(DragEvent::Leave).map(|_| ())
    }

    /// Finish the gesture, creating the link if the current target allows
    /// it. The dispatcher is idle afterwards whatever the outcome.
    pub fn end(&mut self) -> Result<DragOutcome<N, P>, DragError> {
        self.apply(DragEvent::End)
    }

    /// Drop the live gesture without creating a link or notifying
    /// `on_drag_end`. Safe to call at any time.
    pub fn reset(&mut self) {
        if let Err(err) = self.apply(DragEvent::Reset) {
            warn!("reset failed: {}", err);
        }
    }

    fn apply(&mut self, event: DragEvent<N, P>) -> Result<DragOutcome<N, P>, DragError> {
        let transition = self.state.step(event, self.oracle.as_ref(), &self.config)?;
        self.state = transition.state;
        if transition.changed {
            self.proposal.set(self.state.proposal());
        }
        self.run_effects(transition.effects)
    }

    fn run_effects(&mut self, effects: Vec<Effect<N, P>>) -> Result<DragOutcome<N, P>, DragError> {
        let mut outcome = DragOutcome::Cancelled;
        let mut link_result = Ok(());
        for effect in effects {
            match effect {
                Effect::DragStarted { source, origin } => {
                    if let Some(handler) = self.drag_start_handler.as_mut() {
                        handler(&source, origin);
                    }
                }
                Effect::Link { source, target, port } => {
                    if let Some(handler) = self.link_handler.as_mut() {
                        link_result = handler(&source, &target, port.as_ref());
                    }
                    outcome = DragOutcome::Linked { source, target, port };
                }
                Effect::DragEnded { source, origin } => {
                    if let Some(handler) = self.drag_end_handler.as_mut() {
                        handler(&source, origin);
                    }
                }
            }
        }
        link_result.map_err(DragError::LinkHandler)?;
        Ok(outcome)
    }
}
