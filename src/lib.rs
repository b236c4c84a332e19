//! # Slint Link Drag
//!
//! Drag-to-link interaction engine for node and graph editors built with
//! Slint. The user presses on a node or port, drags across a panned/zoomed
//! canvas, hovers candidate targets and releases; this crate tracks that
//! gesture and decides whether it becomes a new link.
//!
//! ## Features
//!
//! - **Explicit State Machine** - `Idle → Dragging → Idle` as pure
//!   `(state, event) -> transition` steps that can be replayed in tests
//! - **Transform Agnostic** - Pointer positions are mapped to logical space
//!   through the [`ViewTransform`] trait; bring your own math type
//! - **Host-Decided Validity** - A [`LinkOracle`] is asked once per hovered
//!   target; no answer means "allowed"
//! - **Scope Rules** - Links never target the source's own container and stay
//!   within one parent group
//! - **Reactive Preview** - The live [`LinkProposal`] is published through a
//!   [`Signal`] for the rendering layer
//!
//! ## Core Types
//!
//! - [`GestureDispatcher`] - `start` / `drag_move` / `enter_target` /
//!   `leave_target` / `end` entry points
//! - [`DragState`] / [`DragSession`] - The state machine and its live session
//! - [`LinkOracle`], [`CompositeOracle`] - Link validity predicates
//! - [`Transform`], [`to_logical`] - Viewport → logical conversion
//! - [`LinkDragController`] - Ready-made Slint callbacks over integer ids
//! - [`LinkDragConfig`] - Per-canvas settings such as read-only mode

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod node;
pub mod oracle;
pub mod path;
pub mod session;
pub mod signal;
pub mod transform;

pub use config::LinkDragConfig;
pub use controller::{
    LinkDragController, LINK_STATE_ALLOWED, LINK_STATE_REJECTED, LINK_STATE_UNKNOWN,
};
pub use dispatcher::{DragOutcome, GestureDispatcher, ProposalOf};
pub use error::{DragError, TransformError};
pub use node::{DragNode, DragPort, Draggable, SimpleNode, SimplePort};
pub use oracle::{
    is_link_allowed, resolve_link_check, AllowAll, CompositeOracle, LinkOracle, NoSelfLinks,
};
pub use path::{proposal_path, PreviewCurve};
pub use session::{DragEvent, DragSession, DragState, Effect, Transition};
pub use signal::{LinkProposal, ProposalSignal, Signal, SubscriptionId};
pub use transform::{to_logical, Position, Transform, ViewTransform};
