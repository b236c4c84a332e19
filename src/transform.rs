//! Viewport ↔ logical coordinate conversion.
//!
//! The editor canvas is panned and zoomed, so a pointer position reported in
//! viewport pixels has to be mapped back into the diagram's logical (world)
//! space before it can be used as a link endpoint. The engine only depends on
//! the [`ViewTransform`] trait; [`Transform`] is the built-in implementation
//! and `glam::Affine2` implements it too when the `glam` feature is enabled.

use crate::error::TransformError;
use serde::{Deserialize, Serialize};

/// A point in either viewport or logical space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// An invertible 2D affine map.
///
/// Implementations must be pure: the same input always yields the same
/// output and nothing is mutated.
pub trait ViewTransform: Sized {
    /// The inverse map, or an error when the map is degenerate.
    fn invert(&self) -> Result<Self, TransformError>;
    /// Map a point through this transform.
    fn apply(&self, p: Position) -> Position;
}

/// Convert a viewport-space position into logical space.
///
/// `transform` maps logical → viewport (the current pan/zoom), so the
/// result is `transform⁻¹(viewport_pos)`.
pub fn to_logical<T: ViewTransform>(
    transform: &T,
    viewport_pos: Position,
) -> Result<Position, TransformError> {
    if !viewport_pos.is_finite() {
        return Err(TransformError::NonFinite);
    }
    let logical = transform.invert()?.apply(viewport_pos);
    if !logical.is_finite() {
        return Err(TransformError::NonFinite);
    }
    Ok(logical)
}

/// Affine matrix in SVG order:
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translate(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Counter-clockwise rotation around the origin, in radians.
    pub fn rotate(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// The pan/zoom transform used by the node editor viewport:
    /// `screen = world * zoom + pan`.
    pub const fn from_viewport(zoom: f32, pan_x: f32, pan_y: f32) -> Self {
        Self::new(zoom, 0.0, 0.0, zoom, pan_x, pan_y)
    }

    /// Compose: apply `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.e, self.f]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl ViewTransform for Transform {
    fn invert(&self) -> Result<Self, TransformError> {
        if !self.is_finite() {
            return Err(TransformError::NonFinite);
        }
        let det = self.determinant();
        if det.abs() <= f32::EPSILON * f32::EPSILON {
            return Err(TransformError::Singular { determinant: det });
        }
        let inverse = Transform {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        };
        if !inverse.is_finite() {
            return Err(TransformError::NonFinite);
        }
        Ok(inverse)
    }

    fn apply(&self, p: Position) -> Position {
        Position {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }
}

#[cfg(feature = "glam")]
impl ViewTransform for glam::Affine2 {
    fn invert(&self) -> Result<Self, TransformError> {
        if !self.is_finite() {
            return Err(TransformError::NonFinite);
        }
        let det = self.matrix2.determinant();
        if det.abs() <= f32::EPSILON * f32::EPSILON {
            return Err(TransformError::Singular { determinant: det });
        }
        Ok(self.inverse())
    }

    fn apply(&self, p: Position) -> Position {
        let v = self.transform_point2(glam::Vec2::new(p.x, p.y));
        Position::new(v.x, v.y)
    }
}

#[cfg(feature = "glam")]
impl From<Transform> for glam::Affine2 {
    fn from(t: Transform) -> Self {
        glam::Affine2::from_cols_array(&[t.a, t.b, t.c, t.d, t.e, t.f])
    }
}
