//! Slint glue for the link gesture engine.
//!
//! [`LinkDragController`] wraps a [`GestureDispatcher`] over integer ids and
//! keeps the viewport state and node registry the Slint node editor
//! components report, so gesture callbacks can be wired with one line each.
//!
//! # Example
//!
//! ```ignore
//! use slint_link_drag::LinkDragController;
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = LinkDragController::new();
//!     let w = window.as_weak();
//!
//!     // Node registry: the scope rule needs each node's parent group
//!     for node in &nodes {
//!         ctrl.register_node(node.id, node.group);
//!     }
//!
//!     window.on_update_viewport({
//!         let ctrl = ctrl.clone();
//!         move |zoom, pan_x, pan_y| ctrl.set_viewport(zoom, pan_x, pan_y)
//!     });
//!
//!     // Gesture callbacks from pins and nodes
//!     window.on_link_drag_started(ctrl.drag_started_callback());
//!     window.on_link_drag_moved(ctrl.drag_moved_callback());
//!     window.on_node_pointer_entered(ctrl.node_entered_callback());
//!     window.on_node_pointer_left(ctrl.node_left_callback());
//!     window.on_link_drag_ended(ctrl.drag_ended_callback());
//!
//!     // Preview line, re-evaluated through the version argument
//!     window.on_compute_preview_path(ctrl.preview_path_callback());
//!
//!     ctrl.on_link(move |source, target, pin| {
//!         // Append to your link model here
//!     });
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::config::LinkDragConfig;
use crate::dispatcher::{DragOutcome, GestureDispatcher};
use crate::error::DragError;
use crate::node::{Draggable, SimpleNode, SimplePort};
use crate::path::proposal_path;
use crate::transform::{to_logical, Position, Transform};
use log::warn;
use slint::SharedString;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// `link_state()` before the hovered target has been evaluated, or when
/// nothing is hovered.
pub const LINK_STATE_UNKNOWN: i32 = 0;
/// `link_state()` when releasing now would create a link.
pub const LINK_STATE_ALLOWED: i32 = 1;
/// `link_state()` when the hovered target rejects the link.
pub const LINK_STATE_REJECTED: i32 = 2;

/// Controller that owns the gesture engine for one editor canvas.
///
/// Screen-space input from Slint is converted to world space with the
/// stored pan/zoom. Pin id `0` means "dragged from the node body", matching
/// the node editor's convention that `0` is no pin.
///
/// Clone this controller to share it across callbacks. The link handler
/// runs after the gesture has finished, so it may query the controller.
#[derive(Clone)]
pub struct LinkDragController {
    dispatcher: Rc<RefCell<GestureDispatcher<SimpleNode, SimplePort>>>,
    zoom: Rc<RefCell<f32>>,
    pan_x: Rc<RefCell<f32>>,
    pan_y: Rc<RefCell<f32>>,
    nodes: Rc<RefCell<HashMap<i32, SimpleNode>>>,
    pins: Rc<RefCell<HashMap<i32, SimplePort>>>,
    link_handler: Rc<RefCell<Option<LinkHandler>>>,
}

type LinkHandler = Box<dyn FnMut(i32, i32, i32)>;

impl Default for LinkDragController {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkDragController {
    pub fn new() -> Self {
        Self::with_config(LinkDragConfig::default())
    }

    pub fn with_config(config: LinkDragConfig) -> Self {
        Self {
            dispatcher: Rc::new(RefCell::new(GestureDispatcher::new(config))),
            zoom: Rc::new(RefCell::new(1.0)),
            pan_x: Rc::new(RefCell::new(0.0)),
            pan_y: Rc::new(RefCell::new(0.0)),
            nodes: Rc::new(RefCell::new(HashMap::new())),
            pins: Rc::new(RefCell::new(HashMap::new())),
            link_handler: Rc::new(RefCell::new(None)),
        }
    }

    /// Get access to the underlying dispatcher.
    pub fn dispatcher(&self) -> Rc<RefCell<GestureDispatcher<SimpleNode, SimplePort>>> {
        self.dispatcher.clone()
    }

    // === Configuration ===

    /// Toggle read-only mode. Ignored (with a warning) during a gesture.
    pub fn set_read_only(&self, read_only: bool) {
        let mut dispatcher = self.dispatcher.borrow_mut();
        let config = LinkDragConfig { read_only, ..dispatcher.config().clone() };
        if let Err(err) = dispatcher.set_config(config) {
            warn!("cannot change read-only mode: {}", err);
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.dispatcher.borrow().config().read_only
    }

    /// Set viewport state: zoom, pan_x, pan_y.
    pub fn set_viewport(&self, zoom: f32, pan_x: f32, pan_y: f32) {
        *self.zoom.borrow_mut() = zoom;
        *self.pan_x.borrow_mut() = pan_x;
        *self.pan_y.borrow_mut() = pan_y;
    }

    pub fn zoom(&self) -> f32 {
        *self.zoom.borrow()
    }

    /// The current world → screen transform.
    pub fn viewport(&self) -> Transform {
        Transform::from_viewport(*self.zoom.borrow(), *self.pan_x.borrow(), *self.pan_y.borrow())
    }

    /// Set the link validity check. Returning `None` allows the link.
    pub fn set_link_check(
        &self,
        check: impl Fn(&SimpleNode, &SimpleNode, Option<&SimplePort>) -> Option<bool> + 'static,
    ) {
        self.dispatcher.borrow_mut().set_oracle(check);
    }

    /// Set the create-link handler: `(source_node, target_node, source_pin)`.
    ///
    /// Called once the controller is idle again, so the handler may read
    /// controller state to refresh the UI.
    pub fn on_link(&self, handler: impl FnMut(i32, i32, i32) + 'static) {
        *self.link_handler.borrow_mut() = Some(Box::new(handler));
    }

    // === Node registry ===

    /// Record a node and its parent group. `parent == 0` means top-level,
    /// the same "no id" convention as pin `0`; any other value, negative
    /// ids included, is a group id.
    pub fn register_node(&self, id: i32, parent: i32) {
        let node = if parent == 0 { SimpleNode::new(id) } else { SimpleNode::with_parent(id, parent) };
        self.nodes.borrow_mut().insert(id, node);
    }

    pub fn unregister_node(&self, id: i32) {
        self.nodes.borrow_mut().remove(&id);
    }

    /// Record pin flags. Unregistered pins are enabled and visible.
    pub fn register_pin(&self, id: i32, disabled: bool, hidden: bool) {
        self.pins.borrow_mut().insert(id, SimplePort { id, disabled, hidden });
    }

    pub fn clear(&self) {
        self.nodes.borrow_mut().clear();
        self.pins.borrow_mut().clear();
        self.dispatcher.borrow_mut().reset();
    }

    fn node(&self, id: i32) -> SimpleNode {
        self.nodes.borrow().get(&id).copied().unwrap_or_else(|| SimpleNode::new(id))
    }

    fn screen_to_world(&self, x: f32, y: f32) -> Result<Position, DragError> {
        Ok(to_logical(&self.viewport(), Position::new(x, y))?)
    }

    // === Direct handlers ===

    /// Start a link drag from a node (`pin_id == 0`) or one of its pins.
    /// `x`, `y` are the screen-space drag origin. Returns whether the
    /// gesture started.
    pub fn handle_drag_started(&self, node_id: i32, pin_id: i32, x: f32, y: f32) -> bool {
        let node = self.node(node_id);
        let source = if pin_id == 0 {
            Draggable::node(node)
        } else {
            let pin = self.pins.borrow().get(&pin_id).copied().unwrap_or_else(|| SimplePort::new(pin_id));
            Draggable::port(node, pin)
        };
        let result = self
            .screen_to_world(x, y)
            .and_then(|origin| self.dispatcher.borrow_mut().start(source, origin));
        log_rejected("start", result).is_some()
    }

    /// Pointer moved to screen position `x`, `y`.
    pub fn handle_drag_moved(&self, x: f32, y: f32) {
        let view = self.viewport();
        let result = self.dispatcher.borrow_mut().drag_move(&view, Position::new(x, y));
        log_rejected("move", result);
    }

    pub fn handle_node_entered(&self, node_id: i32) {
        let node = self.node(node_id);
        let result = self.dispatcher.borrow_mut().enter_target(node);
        log_rejected("enter", result);
    }

    pub fn handle_node_left(&self) {
        let result = self.dispatcher.borrow_mut().leave_target();
        log_rejected("leave", result);
    }

    /// Finish the gesture. Returns `true` when a link was created.
    pub fn handle_drag_ended(&self) -> bool {
        let result = self.dispatcher.borrow_mut().end();
        match log_rejected("end", result) {
            Some(DragOutcome::Linked { source, target, port }) => {
                if let Some(handler) = self.link_handler.borrow_mut().as_mut() {
                    handler(source.id, target.id, port.map_or(0, |p| p.id));
                }
                true
            }
            _ => false,
        }
    }

    /// Drop the live gesture, e.g. when the window loses focus.
    pub fn cancel(&self) {
        self.dispatcher.borrow_mut().reset();
    }

    // === Rendering state ===

    pub fn is_dragging(&self) -> bool {
        self.dispatcher.borrow().is_dragging()
    }

    /// One of [`LINK_STATE_UNKNOWN`], [`LINK_STATE_ALLOWED`],
    /// [`LINK_STATE_REJECTED`].
    pub fn link_state(&self) -> i32 {
        match self.dispatcher.borrow().link_allowed() {
            None => LINK_STATE_UNKNOWN,
            Some(true) => LINK_STATE_ALLOWED,
            Some(false) => LINK_STATE_REJECTED,
        }
    }

    /// Changes whenever the preview changes; bind it as the version argument
    /// of `compute-preview-path`.
    ///
    /// Wraps around on overflow. Only inequality between readings matters.
    pub fn preview_version(&self) -> i32 {
        wrap_version(self.dispatcher.borrow().proposal_version())
    }

    /// Screen-space SVG path of the drag preview, empty while idle.
    pub fn compute_preview_path(&self) -> SharedString {
        let dispatcher = self.dispatcher.borrow();
        match dispatcher.proposal() {
            Some(proposal) => {
                proposal_path(proposal, &self.viewport(), self.zoom(), dispatcher.config()).into()
            }
            None => SharedString::default(),
        }
    }

    // === Callback factories ===

    /// Returns a callback for `link-drag-started(node-id, pin-id, x, y) -> bool`.
    pub fn drag_started_callback(&self) -> impl Fn(i32, i32, f32, f32) -> bool {
        let ctrl = self.clone();
        move |node_id, pin_id, x, y| ctrl.handle_drag_started(node_id, pin_id, x, y)
    }

    /// Returns a callback for `link-drag-moved(x, y)`.
    pub fn drag_moved_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| ctrl.handle_drag_moved(x, y)
    }

    /// Returns a callback for `node-pointer-entered(node-id)`.
    pub fn node_entered_callback(&self) -> impl Fn(i32) {
        let ctrl = self.clone();
        move |node_id| ctrl.handle_node_entered(node_id)
    }

    /// Returns a callback for `node-pointer-left()`.
    pub fn node_left_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.handle_node_left()
    }

    /// Returns a callback for `link-drag-ended() -> bool`.
    pub fn drag_ended_callback(&self) -> impl Fn() -> bool {
        let ctrl = self.clone();
        move || ctrl.handle_drag_ended()
    }

    /// Returns a callback for `compute-preview-path(version) -> string`.
    pub fn preview_path_callback(&self) -> impl Fn(i32) -> SharedString {
        let ctrl = self.clone();
        move |_version| ctrl.compute_preview_path()
    }
}

/// Truncate to the low 32 bits, reinterpreted as a Slint `int`.
fn wrap_version(version: u64) -> i32 {
    version as u32 as i32
}

/// Slint callbacks cannot return errors; log and drop them.
fn log_rejected<T>(operation: &str, result: Result<T, DragError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("link drag {} rejected: {}", operation, err);
            None
        }
    }
}
