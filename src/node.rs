//! Identity traits for the things a link gesture connects.
//!
//! The engine never looks at node contents beyond identity and the
//! parent/group relation used for scope checks. Implement [`DragNode`] on your
//! own node type, or use [`SimpleNode`] when ids are all you have.

use std::fmt;

/// A node that can be dragged from or dropped onto.
///
/// # Example
///
/// ```ignore
/// struct Task { key: String, group: Option<String> }
///
/// impl DragNode for Task {
///     type Id = String;
///     fn id(&self) -> String { self.key.clone() }
///     fn parent(&self) -> Option<String> { self.group.clone() }
/// }
/// ```
pub trait DragNode: Clone {
    type Id: Clone + PartialEq + fmt::Debug;

    fn id(&self) -> Self::Id;

    /// The containing group, or `None` for top-level nodes.
    fn parent(&self) -> Option<Self::Id>;
}

/// An attachment point on a node that a drag may start from.
pub trait DragPort: Clone {
    /// Shown in [`DragError::PortDisabled`](crate::DragError::PortDisabled)
    /// messages, hence `Display`.
    type Id: Clone + PartialEq + fmt::Debug + fmt::Display;

    fn id(&self) -> Self::Id;

    fn disabled(&self) -> bool {
        false
    }

    fn hidden(&self) -> bool {
        false
    }
}

/// Minimal [`DragNode`] with integer ids, matching the ids used by the
/// Slint node editor components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimpleNode {
    pub id: i32,
    pub parent: Option<i32>,
}

impl SimpleNode {
    pub fn new(id: i32) -> Self {
        Self { id, parent: None }
    }

    pub fn with_parent(id: i32, parent: i32) -> Self {
        Self { id, parent: Some(parent) }
    }
}

impl DragNode for SimpleNode {
    type Id = i32;
    fn id(&self) -> i32 { self.id }
    fn parent(&self) -> Option<i32> { self.parent }
}

/// Minimal [`DragPort`] carrying the flags a port surface can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SimplePort {
    pub id: i32,
    pub disabled: bool,
    pub hidden: bool,
}

impl SimplePort {
    pub fn new(id: i32) -> Self {
        Self { id, ..Self::default() }
    }
}

impl DragPort for SimplePort {
    type Id = i32;
    fn id(&self) -> i32 { self.id }
    fn disabled(&self) -> bool { self.disabled }
    fn hidden(&self) -> bool { self.hidden }
}

/// A bare pin id is a port that is always enabled.
impl DragPort for i32 {
    type Id = i32;
    fn id(&self) -> i32 { *self }
}

/// The source of a link gesture: a node, and the port on it when the drag
/// started from a port rather than the node body.
#[derive(Debug, Clone, PartialEq)]
pub struct Draggable<N, P = SimplePort> {
    pub node: N,
    pub port: Option<P>,
}

impl<N: DragNode, P: DragPort> Draggable<N, P> {
    pub fn node(node: N) -> Self {
        Self { node, port: None }
    }

    pub fn port(node: N, port: P) -> Self {
        Self { node, port: Some(port) }
    }

    /// Scope rule: a node may not be linked to its own container.
    pub fn is_child_of(&self, candidate: &N) -> bool {
        self.node.parent() == Some(candidate.id())
    }

    /// Scope-equality rule: links stay within one parent/group.
    pub fn shares_parent_with(&self, candidate: &N) -> bool {
        self.node.parent() == candidate.parent()
    }
}
