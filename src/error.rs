//! Error types for the drag-to-link engine.
//!
//! Only protocol misuse by the integrating code and degenerate input surface
//! as errors. An illegal link target is not an error: it shows up as
//! `link_allowed == Some(false)` on the [`LinkProposal`](crate::LinkProposal).

use thiserror::Error;

/// Failure to map a viewport position into logical space.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TransformError {
    /// The transform collapses the plane and has no inverse.
    #[error("transform is not invertible (determinant {determinant})")]
    Singular { determinant: f32 },
    /// A coefficient or the input position is NaN or infinite.
    #[error("transform or position contains a non-finite value")]
    NonFinite,
}

/// Errors reported by [`GestureDispatcher`](crate::GestureDispatcher).
#[derive(Debug, Error)]
pub enum DragError {
    /// `start` was called while a drag gesture is already live.
    #[error("a drag gesture is already in progress")]
    AlreadyDragging,
    /// `end` was called with no drag gesture in progress.
    #[error("no drag gesture is in progress")]
    NotDragging,
    /// The canvas is configured read-only and does not accept new links.
    #[error("canvas is read-only")]
    ReadOnly,
    /// The port the gesture started from is disabled or hidden.
    #[error("port {0} cannot start a drag")]
    PortDisabled(String),
    /// The pointer position could not be converted to logical space.
    /// The session stays in the dragging state.
    #[error(transparent)]
    Transform(#[from] TransformError),
    /// The create-link collaborator failed. The engine had already returned
    /// to idle when this was raised.
    #[error("link handler failed")]
    LinkHandler(#[source] anyhow::Error),
}

impl DragError {
    /// Whether this error was caused by calling the engine out of order.
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::AlreadyDragging | Self::NotDragging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_error_converts_into_drag_error() {
        let err: DragError = TransformError::Singular { determinant: 0.0 }.into();
        assert!(matches!(
            err,
            DragError::Transform(TransformError::Singular { .. })
        ));
        assert!(!err.is_protocol_error());
        assert_eq!(
            err.to_string(),
            "transform is not invertible (determinant 0)"
        );
    }

    #[test]
    fn test_protocol_errors() {
        assert!(DragError::AlreadyDragging.is_protocol_error());
        assert!(DragError::NotDragging.is_protocol_error());
        assert!(!DragError::ReadOnly.is_protocol_error());
    }

    #[test]
    fn test_link_handler_keeps_source() {
        use std::error::Error as _;
        let err = DragError::LinkHandler(anyhow::anyhow!("storage offline"));
        assert_eq!(err.to_string(), "link handler failed");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("storage offline"));
    }
}
