//! Geometry primitives for Horizon Semantics.
//!
//! Semantics nodes carry a local bounding rectangle and a 4×4 node-to-parent
//! transform. This crate provides the types used to compose those into
//! global bounds and to map host points back into node space.
//!
//! # Example
//!
//! ```
//! use horizon_semantics_geometry::{Point, Rect, Transform3D};
//!
//! let local = Rect::from_ltrb(0.0, 0.0, 100.0, 50.0);
//! let to_parent = Transform3D::translate(10.0, 20.0);
//!
//! let global = to_parent.map_rect_bounds(&local).unwrap();
//! assert_eq!(global, Rect::from_ltrb(10.0, 20.0, 110.0, 70.0));
//!
//! let inside = to_parent.inverse_or_zero().transform_point(Point::new(15.0, 25.0));
//! assert_eq!(inside, Some(Point::new(5.0, 5.0)));
//! ```

mod transform;
mod types;

pub use transform::Transform3D;
pub use types::{PixelRect, Point, Rect};
