//! Points and rectangles.

/// A point in root or node coordinates, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Homogeneous coordinates on the z = 0 plane with w = 1.
    #[inline]
    pub fn to_homogeneous(self) -> glam::Vec4 {
        glam::Vec4::new(self.x, self.y, 0.0, 1.0)
    }
}

/// An axis-aligned rectangle stored by its edges.
///
/// Semantics updates describe bounds as (left, top, right, bottom), so the
/// edges are the stored representation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const ZERO: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    /// A rectangle from its top-left corner and size.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    #[inline]
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Smallest rectangle containing every point.
    ///
    /// Returns `None` for an empty iterator.
    pub fn bounding(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(
            Self::from_ltrb(first.x, first.y, first.x, first.y),
            |rect, p| {
                Self::from_ltrb(
                    rect.left.min(p.x),
                    rect.top.min(p.y),
                    rect.right.max(p.x),
                    rect.bottom.max(p.y),
                )
            },
        ))
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// The four corners, clockwise from top-left.
    #[inline]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }

    /// True when either side is zero or negative.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Left and top edges are inclusive, right and bottom exclusive.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Round every edge to the nearest pixel, halves rounding up.
    pub fn round(&self) -> PixelRect {
        fn round_half_up(v: f32) -> i32 {
            (v + 0.5).floor() as i32
        }
        PixelRect {
            left: round_half_up(self.left),
            top: round_half_up(self.top),
            right: round_half_up(self.right),
            bottom: round_half_up(self.bottom),
        }
    }
}

/// An integer rectangle in host pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Translate by `(dx, dy)` pixels.
    #[inline]
    pub fn offset(&self, dx: i32, dy: i32) -> PixelRect {
        PixelRect::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }
}
