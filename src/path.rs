//! SVG path for the in-progress link preview.
//!
//! The preview follows the same horizontal-biased cubic bezier the node
//! editor draws for committed links, so the line does not change shape when
//! the gesture is released. Short drags are drawn as a straight segment to
//! avoid zig-zags.

use crate::config::LinkDragConfig;
use crate::signal::LinkProposal;
use crate::transform::{Position, ViewTransform};

/// Control points of a preview curve, in whatever space the endpoints are in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewCurve {
    pub start: Position,
    pub ctrl1: Position,
    pub ctrl2: Position,
    pub end: Position,
    /// Endpoints are too close for a curve; render `start → end` directly.
    pub straight: bool,
}

impl PreviewCurve {
    /// Build the curve between two screen-space points.
    ///
    /// `zoom` scales the configured minimum offset and straight-line
    /// threshold, which are given in logical units.
    pub fn between(start: Position, end: Position, zoom: f32, config: &LinkDragConfig) -> Self {
        let dx = end.x - start.x;
        let threshold = config.preview_straight_threshold * zoom;

        if start.distance_to(end) < threshold {
            return Self { start, ctrl1: start, ctrl2: end, end, straight: true };
        }

        let offset = (dx.abs() * 0.5).max(config.preview_min_offset * zoom);
        Self {
            start,
            ctrl1: Position::new(start.x + offset, start.y),
            ctrl2: Position::new(end.x - offset, end.y),
            end,
            straight: false,
        }
    }

    /// SVG path commands, e.g. `M 10 20 C 60 20 90 80 140 80`.
    pub fn to_svg(&self) -> String {
        if self.straight {
            return format!("M {} {} L {} {}", self.start.x, self.start.y, self.end.x, self.end.y);
        }
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.start.x,
            self.start.y,
            self.ctrl1.x,
            self.ctrl1.y,
            self.ctrl2.x,
            self.ctrl2.y,
            self.end.x,
            self.end.y
        )
    }
}

/// Screen-space preview path for a proposal.
///
/// `view` maps logical → screen (the same transform passed to
/// `drag_move`), `zoom` is its scale factor.
pub fn proposal_path<I, J, T: ViewTransform>(
    proposal: &LinkProposal<I, J>,
    view: &T,
    zoom: f32,
    config: &LinkDragConfig,
) -> String {
    PreviewCurve::between(view.apply(proposal.start), view.apply(proposal.end), zoom, config).to_svg()
}
