//! Level 4: Slint Controller Tests
//!
//! Tests the integer-id controller the Slint callbacks are wired to:
//! screen-space input, node registry, preview path and link state.

use slint_link_drag::{
    LinkDragController, Position, LINK_STATE_ALLOWED, LINK_STATE_REJECTED, LINK_STATE_UNKNOWN,
};
use std::cell::RefCell;
use std::rc::Rc;

fn controller_with_links() -> (LinkDragController, Rc<RefCell<Vec<(i32, i32, i32)>>>) {
    let ctrl = LinkDragController::new();
    let links = Rc::new(RefCell::new(Vec::new()));
    let sink = links.clone();
    ctrl.on_link(move |source, target, pin| sink.borrow_mut().push((source, target, pin)));
    (ctrl, links)
}

#[test]
fn test_pin_drag_to_sibling_creates_link() {
    let (ctrl, links) = controller_with_links();
    ctrl.register_node(1, 0);
    ctrl.register_node(2, 0);

    assert!(ctrl.handle_drag_started(1, 3, 250.0, 150.0));
    ctrl.handle_drag_moved(380.0, 240.0);
    ctrl.handle_node_entered(2);
    assert_eq!(ctrl.link_state(), LINK_STATE_ALLOWED);

    assert!(ctrl.handle_drag_ended());
    assert_eq!(*links.borrow(), vec![(1, 2, 3)]);
    assert!(!ctrl.is_dragging());
}

#[test]
fn test_node_body_drag_reports_pin_zero() {
    let (ctrl, links) = controller_with_links();

    ctrl.handle_drag_started(1, 0, 0.0, 0.0);
    ctrl.handle_node_entered(2);
    ctrl.handle_drag_ended();

    assert_eq!(*links.borrow(), vec![(1, 2, 0)]);
}

#[test]
fn test_registered_groups_enforce_scope() {
    let (ctrl, links) = controller_with_links();
    ctrl.register_node(10, 0);
    ctrl.register_node(1, 10);
    ctrl.register_node(2, 20);

    ctrl.handle_drag_started(1, 0, 0.0, 0.0);
    ctrl.handle_node_entered(2);
    assert_eq!(ctrl.link_state(), LINK_STATE_REJECTED);
    ctrl.handle_node_entered(10);
    assert_eq!(ctrl.link_state(), LINK_STATE_REJECTED, "cannot link into own container");
    ctrl.handle_node_left();
    assert_eq!(ctrl.link_state(), LINK_STATE_UNKNOWN);

    assert!(!ctrl.handle_drag_ended());
    assert!(links.borrow().is_empty());
}

#[test]
fn test_link_check_is_consulted() {
    let (ctrl, links) = controller_with_links();
    ctrl.set_link_check(|_, target, _| Some(target.id != 2));

    ctrl.handle_drag_started(1, 0, 0.0, 0.0);
    ctrl.handle_node_entered(2);
    assert_eq!(ctrl.link_state(), LINK_STATE_REJECTED);
    ctrl.handle_node_entered(3);
    assert_eq!(ctrl.link_state(), LINK_STATE_ALLOWED);
    ctrl.handle_drag_ended();

    assert_eq!(*links.borrow(), vec![(1, 3, 0)]);
}

#[test]
fn test_disabled_pin_does_not_start() {
    let ctrl = LinkDragController::new();
    ctrl.register_pin(3, true, false);

    assert!(!ctrl.handle_drag_started(1, 3, 0.0, 0.0));
    assert!(!ctrl.is_dragging());
}

#[test]
fn test_read_only_blocks_new_drags() {
    let ctrl = LinkDragController::new();
    ctrl.set_read_only(true);
    assert!(ctrl.is_read_only());

    assert!(!ctrl.handle_drag_started(1, 0, 0.0, 0.0));

    ctrl.set_read_only(false);
    assert!(ctrl.handle_drag_started(1, 0, 0.0, 0.0));
}

#[test]
fn test_protocol_misuse_is_swallowed() {
    let ctrl = LinkDragController::new();

    // Release without press and a second press are logged, not panicking
    assert!(!ctrl.handle_drag_ended());
    assert!(ctrl.handle_drag_started(1, 0, 0.0, 0.0));
    assert!(!ctrl.handle_drag_started(2, 0, 0.0, 0.0));
    assert!(ctrl.is_dragging());
}

#[test]
fn test_screen_positions_are_converted_with_viewport() {
    let ctrl = LinkDragController::new();
    ctrl.set_viewport(2.0, 100.0, 50.0);

    ctrl.handle_drag_started(1, 0, 300.0, 250.0);
    ctrl.handle_drag_moved(500.0, 250.0);

    let dispatcher = ctrl.dispatcher();
    let dispatcher = dispatcher.borrow();
    let session = dispatcher.session().unwrap();
    assert_eq!(session.origin, Position::new(100.0, 100.0));
    assert_eq!(session.endpoint, Position::new(200.0, 100.0));
}

#[test]
fn test_preview_path_is_screen_space() {
    let ctrl = LinkDragController::new();
    assert!(ctrl.compute_preview_path().is_empty(), "no preview while idle");

    ctrl.set_viewport(2.0, 100.0, 50.0);
    ctrl.handle_drag_started(1, 0, 300.0, 250.0);
    ctrl.handle_drag_moved(500.0, 250.0);

    let path = ctrl.compute_preview_path();
    assert!(path.as_str().starts_with("M 300 250 C"), "got {}", path);
    assert!(path.as_str().ends_with("500 250"), "got {}", path);

    ctrl.handle_drag_ended();
    assert!(ctrl.compute_preview_path().is_empty());
}

#[test]
fn test_preview_version_tracks_changes() {
    let ctrl = LinkDragController::new();
    let v0 = ctrl.preview_version();

    ctrl.handle_drag_moved(10.0, 10.0);
    assert_eq!(ctrl.preview_version(), v0, "moves while idle change nothing");

    ctrl.handle_drag_started(1, 0, 0.0, 0.0);
    ctrl.handle_drag_moved(10.0, 10.0);
    assert!(ctrl.preview_version() > v0);
}

#[test]
fn test_callback_factories_share_state() {
    let (ctrl, links) = controller_with_links();
    let started = ctrl.drag_started_callback();
    let moved = ctrl.drag_moved_callback();
    let entered = ctrl.node_entered_callback();
    let left = ctrl.node_left_callback();
    let ended = ctrl.drag_ended_callback();
    let preview = ctrl.preview_path_callback();

    assert!(started(1, 0, 0.0, 0.0));
    moved(100.0, 0.0);
    assert!(!preview(0).is_empty());
    entered(2);
    left();
    entered(3);
    assert!(ended());

    assert_eq!(*links.borrow(), vec![(1, 3, 0)]);
}

#[test]
fn test_cancel_discards_gesture() {
    let (ctrl, links) = controller_with_links();

    ctrl.handle_drag_started(1, 0, 0.0, 0.0);
    ctrl.handle_node_entered(2);
    ctrl.cancel();

    assert!(!ctrl.is_dragging());
    assert!(!ctrl.handle_drag_ended());
    assert!(links.borrow().is_empty());
}

#[test]
fn test_link_handler_can_query_controller() {
    let ctrl = LinkDragController::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let inner = ctrl.clone();
    ctrl.on_link(move |source, target, _| {
        sink.borrow_mut().push((source, target, inner.link_state(), inner.is_dragging()));
    });

    ctrl.handle_drag_started(1, 0, 0.0, 0.0);
    ctrl.handle_node_entered(2);
    assert!(ctrl.handle_drag_ended());

    assert_eq!(*seen.borrow(), vec![(1, 2, LINK_STATE_UNKNOWN, false)]);
}

#[test]
fn test_negative_group_ids_are_groups() {
    let (ctrl, links) = controller_with_links();
    ctrl.register_node(1, -5);
    ctrl.register_node(2, -5);
    ctrl.register_node(3, 0);

    ctrl.handle_drag_started(1, 0, 0.0, 0.0);
    ctrl.handle_node_entered(3);
    assert_eq!(ctrl.link_state(), LINK_STATE_REJECTED, "top-level is another scope");
    ctrl.handle_node_entered(2);
    assert_eq!(ctrl.link_state(), LINK_STATE_ALLOWED);
    assert!(ctrl.handle_drag_ended());

    assert_eq!(*links.borrow(), vec![(1, 2, 0)]);
}
