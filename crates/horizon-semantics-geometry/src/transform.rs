//! 4×4 projective transforms.
//!
//! Semantics nodes carry a full 4×4 node-to-parent matrix, which may include
//! perspective. Points are mapped in homogeneous coordinates and divided by
//! `w` before use; a zero or non-finite `w` means the point does not map.

use std::ops::Mul;

use glam::{Mat4, Vec3, Vec4};

use crate::types::{Point, Rect};

/// A 4×4 transformation matrix.
///
/// Stored column-major, matching the layout of the sixteen transform floats
/// in a semantics update.
///
/// # Composing Transforms
///
/// `a * b` applies `b` first, then `a`:
///
/// ```
/// use horizon_semantics_geometry::{Point, Transform3D};
///
/// let parent = Transform3D::scale(2.0, 2.0);
/// let local = Transform3D::translate(10.0, 0.0);
///
/// let global = parent * local;
/// assert_eq!(global.transform_point(Point::new(5.0, 0.0)), Some(Point::new(30.0, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    m: Mat4,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform3D {
    /// The identity transform (no transformation).
    pub const IDENTITY: Self = Self { m: Mat4::IDENTITY };

    /// The zero matrix. Maps every point to w = 0, so nothing maps.
    pub const ZERO: Self = Self { m: Mat4::ZERO };

    /// Create from sixteen column-major values.
    #[inline]
    pub fn from_cols_array(values: &[f32; 16]) -> Self {
        Self {
            m: Mat4::from_cols_array(values),
        }
    }

    /// The sixteen column-major values.
    #[inline]
    pub fn to_cols_array(&self) -> [f32; 16] {
        self.m.to_cols_array()
    }

    /// Wrap a glam matrix.
    #[inline]
    pub const fn from_mat4(m: Mat4) -> Self {
        Self { m }
    }

    /// Convert to a glam Mat4.
    #[inline]
    pub fn to_mat4(&self) -> Mat4 {
        self.m
    }

    /// Create a 2D translation.
    #[inline]
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m: Mat4::from_translation(Vec3::new(tx, ty, 0.0)),
        }
    }

    /// Create a 2D scale.
    #[inline]
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: Mat4::from_scale(Vec3::new(sx, sy, 1.0)),
        }
    }

    /// Create a rotation about the z axis (radians).
    #[inline]
    pub fn rotate_z(angle: f32) -> Self {
        Self {
            m: Mat4::from_rotation_z(angle),
        }
    }

    /// Apply `other` after this transform.
    #[inline]
    pub fn then(&self, other: &Self) -> Self {
        Self { m: other.m * self.m }
    }

    /// Check if this is the identity transform.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.m == Mat4::IDENTITY
    }

    /// Determinant of the matrix.
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.m.determinant()
    }

    /// Compute the inverse transform.
    ///
    /// Returns `None` when the matrix is singular or not finite.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.m.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = self.m.inverse();
        inv.is_finite().then_some(Self { m: inv })
    }

    /// The inverse, or [`Transform3D::ZERO`] when there is none.
    #[inline]
    pub fn inverse_or_zero(&self) -> Self {
        self.inverse().unwrap_or(Self::ZERO)
    }

    /// Transform a homogeneous vector without dividing by `w`.
    #[inline]
    pub fn transform_vec4(&self, v: Vec4) -> Vec4 {
        self.m * v
    }

    /// Transform a point on the z = 0 plane, dividing by `w`.
    ///
    /// Returns `None` when `w` is zero or the result is not finite.
    pub fn transform_point(&self, p: Point) -> Option<Point> {
        project(self.m * p.to_homogeneous())
    }

    /// Bounding box of the four transformed corners of `rect`.
    ///
    /// Returns `None` if any corner fails to map.
    pub fn map_rect_bounds(&self, rect: &Rect) -> Option<Rect> {
        let mut corners = [Point::ZERO; 4];
        for (slot, corner) in corners.iter_mut().zip(rect.corners()) {
            *slot = self.transform_point(corner)?;
        }
        Rect::bounding(corners)
    }
}

/// Divide a homogeneous vector by `w`.
///
/// Returns `None` when `w` is zero or the result is not finite.
pub(crate) fn project(v: Vec4) -> Option<Point> {
    if v.w == 0.0 || !v.w.is_finite() {
        return None;
    }
    let p = Point::new(v.x / v.w, v.y / v.w);
    (p.x.is_finite() && p.y.is_finite()).then_some(p)
}

impl Point {
    /// Project a homogeneous vector back to 2D.
    ///
    /// Returns `None` when `w` is zero or the result is not finite.
    #[inline]
    pub fn from_homogeneous(v: Vec4) -> Option<Self> {
        project(v)
    }
}

impl Mul for Transform3D {
    type Output = Transform3D;

    #[inline]
    fn mul(self, rhs: Transform3D) -> Transform3D {
        Transform3D { m: self.m * rhs.m }
    }
}

impl From<Mat4> for Transform3D {
    fn from(m: Mat4) -> Self {
        Self::from_mat4(m)
    }
}
