//! The drag-to-link state machine.
//!
//! A gesture is `Idle → Dragging → Idle`. All transitions go through
//! [`DragState::step`], which takes the current state and one event and
//! returns the next state plus the side effects the dispatcher has to run.
//! Nothing here calls back into the host except the link oracle, so a
//! recorded event stream can be replayed deterministically:
//!
//! ```ignore
//! let end = events.into_iter().try_fold(DragState::Idle, |state, event| {
//!     state.step(event, &AllowAll, &config).map(|t| t.state)
//! })?;
//! ```

use crate::config::LinkDragConfig;
use crate::error::DragError;
use crate::node::{DragNode, DragPort, Draggable};
use crate::oracle::{is_link_allowed, LinkOracle};
use crate::signal::LinkProposal;
use crate::transform::Position;
use log::{debug, trace};

/// State of one live gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession<N, P> {
    pub source: Draggable<N, P>,
    /// Logical-space position captured at drag start.
    pub origin: Position,
    /// Latest logical-space pointer position.
    pub endpoint: Position,
    pub entered_target: Option<N>,
    pub link_allowed: Option<bool>,
}

impl<N: DragNode, P: DragPort> DragSession<N, P> {
    fn new(source: Draggable<N, P>, origin: Position) -> Self {
        Self {
            source,
            origin,
            endpoint: origin,
            entered_target: None,
            link_allowed: None,
        }
    }

    /// Whether ending the gesture now would create a link.
    ///
    /// The container check is repeated here even though `Enter` already
    /// applied it, so a stale `link_allowed` can never commit.
    pub fn can_commit(&self) -> bool {
        match &self.entered_target {
            Some(target) => self.link_allowed == Some(true) && !self.source.is_child_of(target),
            None => false,
        }
    }

    pub fn proposal(&self) -> LinkProposal<N::Id, P::Id> {
        LinkProposal {
            source: self.source.node.id(),
            source_port: self.source.port.as_ref().map(DragPort::id),
            target: self.entered_target.as_ref().map(DragNode::id),
            start: self.origin,
            end: self.endpoint,
            link_allowed: self.link_allowed,
        }
    }
}

/// Input to the state machine. `Move` carries an already converted logical
/// position; coordinate conversion happens in the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent<N, P> {
    Start { source: Draggable<N, P>, origin: Position },
    Move { endpoint: Position },
    Enter(N),
    Leave,
    End,
    /// Host-initiated discard, e.g. on focus loss. Never commits.
    Reset,
}

/// Side effect requested by a transition, in the order it must run.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect<N, P> {
    DragStarted { source: Draggable<N, P>, origin: Position },
    Link { source: N, target: N, port: Option<P> },
    DragEnded { source: Draggable<N, P>, origin: Position },
}

/// Result of one [`DragState::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<N, P> {
    pub state: DragState<N, P>,
    pub effects: Vec<Effect<N, P>>,
    /// Whether the visible [`LinkProposal`] may have changed.
    pub changed: bool,
}

impl<N, P> Transition<N, P> {
    fn unchanged(state: DragState<N, P>) -> Self {
        Self { state, effects: Vec::new(), changed: false }
    }

    fn to(state: DragState<N, P>, effects: Vec<Effect<N, P>>) -> Self {
        Self { state, effects, changed: true }
    }

    pub fn committed(&self) -> bool {
        self.effects.iter().any(|e| matches!(e, Effect::Link { .. }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState<N, P> {
    Idle,
    Dragging(DragSession<N, P>),
}

impl<N, P> Default for DragState<N, P> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<N: DragNode, P: DragPort> DragState<N, P> {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession<N, P>> {
        match self {
            Self::Dragging(session) => Some(session),
            Self::Idle => None,
        }
    }

    pub fn proposal(&self) -> Option<LinkProposal<N::Id, P::Id>> {
        self.session().map(DragSession::proposal)
    }

    /// Apply one event.
    ///
    /// Protocol misuse (`Start` while dragging, `End` while idle) is an
    /// error. `Move`, `Enter`, `Leave` and `Reset` while idle are absorbed.
    pub fn step<O>(
        &self,
        event: DragEvent<N, P>,
        oracle: &O,
        config: &LinkDragConfig,
    ) -> Result<Transition<N, P>, DragError>
    where
        O: LinkOracle<N, P> + ?Sized,
    {
        let dragging = match (self, event) {
            (Self::Idle, DragEvent::Start { source, origin }) => {
                return start(source, origin, config);
            }
            (Self::Dragging(_), DragEvent::Start { .. }) => return Err(DragError::AlreadyDragging),
            (Self::Idle, DragEvent::End) => return Err(DragError::NotDragging),
            (Self::Idle, event) => {
                debug!("ignoring {} while idle", event_name(&event));
                return Ok(Transition::unchanged(Self::Idle));
            }
            (Self::Dragging(session), event) => (session, event),
        };

        match dragging {
            (session, DragEvent::Move { endpoint }) => {
                trace!("drag endpoint {:?}", endpoint);
                if session.endpoint == endpoint {
                    return Ok(Transition::unchanged(self.clone()));
                }
                let mut next = session.clone();
                next.endpoint = endpoint;
                Ok(Transition::to(Self::Dragging(next), Vec::new()))
            }
            (session, DragEvent::Enter(candidate)) => Ok(enter(session, candidate, oracle)),
            (session, DragEvent::Leave) => {
                if session.entered_target.is_none() && session.link_allowed.is_none() {
                    return Ok(Transition::unchanged(self.clone()));
                }
                debug!("left target {:?}", session.entered_target.as_ref().map(DragNode::id));
                let mut next = session.clone();
                next.entered_target = None;
                next.link_allowed = None;
                Ok(Transition::to(Self::Dragging(next), Vec::new()))
            }
            (session, DragEvent::End) => Ok(end(session)),
            (session, DragEvent::Reset) => {
                debug!("drag from {:?} reset without commit", session.source.node.id());
                Ok(Transition::to(Self::Idle, Vec::new()))
            }
            (_, DragEvent::Start { .. }) => Err(DragError::AlreadyDragging),
        }
    }
}

fn start<N: DragNode, P: DragPort>(
    source: Draggable<N, P>,
    origin: Position,
    config: &LinkDragConfig,
) -> Result<Transition<N, P>, DragError> {
    if config.read_only {
        return Err(DragError::ReadOnly);
    }
    if let Some(port) = &source.port {
        if port.disabled() || port.hidden() {
            return Err(DragError::PortDisabled(port.id().to_string()));
        }
    }
    debug!(
        "drag started from {:?} (port {:?}) at {:?}",
        source.node.id(),
        source.port.as_ref().map(DragPort::id),
        origin
    );
    let effects = vec![Effect::DragStarted { source: source.clone(), origin }];
    Ok(Transition::to(
        DragState::Dragging(DragSession::new(source, origin)),
        effects,
    ))
}

fn enter<N, P, O>(session: &DragSession<N, P>, candidate: N, oracle: &O) -> Transition<N, P>
where
    N: DragNode,
    P: DragPort,
    O: LinkOracle<N, P> + ?Sized,
{
    let candidate_id = candidate.id();
    if session.entered_target.as_ref().map(DragNode::id) == Some(candidate_id.clone()) {
        return Transition::unchanged(DragState::Dragging(session.clone()));
    }

    let source = &session.source;
    let allowed = if source.is_child_of(&candidate) {
        false
    } else {
        is_link_allowed(oracle, &source.node, &candidate, source.port.as_ref())
            && source.shares_parent_with(&candidate)
    };
    debug!(
        "entered {:?} from {:?}: link {}",
        candidate_id,
        source.node.id(),
        if allowed { "allowed" } else { "rejected" }
    );

    let mut next = session.clone();
    next.entered_target = Some(candidate);
    next.link_allowed = Some(allowed);
    Transition::to(DragState::Dragging(next), Vec::new())
}

fn end<N: DragNode, P: DragPort>(session: &DragSession<N, P>) -> Transition<N, P> {
    let mut effects = Vec::with_capacity(2);
    match &session.entered_target {
        Some(target) if session.can_commit() => {
            debug!("linking {:?} -> {:?}", session.source.node.id(), target.id());
            effects.push(Effect::Link {
                source: session.source.node.clone(),
                target: target.clone(),
                port: session.source.port.clone(),
            });
        }
        _ => debug!("drag from {:?} ended without link", session.source.node.id()),
    }
    effects.push(Effect::DragEnded {
        source: session.source.clone(),
        origin: session.origin,
    });
    Transition::to(DragState::Idle, effects)
}

fn event_name<N, P>(event: &DragEvent<N, P>) -> &'static str {
    match event {
        DragEvent::Start { .. } => "start",
        DragEvent::Move { .. } => "move",
        DragEvent::Enter(_) => "enter",
        DragEvent::Leave => "leave",
        DragEvent::End => "end",
        DragEvent::Reset => "reset",
    }
}
