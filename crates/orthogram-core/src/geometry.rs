//! Geometric primitives for connector routing and element placement.
//!
//! This module provides the small set of geometric types the router and the
//! layout importer operate on.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Frame`] - The axis-aligned rectangle owned by a diagram element
//! - [`Axis`] - Horizontal or vertical orientation of a connector segment
//!
//! # Coordinate System
//!
//! Orthogram uses the canvas pixel space of the editor:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default height of one text row inside a frame.
pub const DEFAULT_ROW_HEIGHT: f32 = 25.0;

/// Default font size used by frames that carry text rows.
pub const DEFAULT_FONT_PIXEL_SIZE: f32 = 14.0;

/// A 2D point representing a position in canvas space.
///
/// # Examples
///
/// ```
/// # use orthogram_core::geometry::Point;
/// let head = Point::new(300.0, 200.0);
/// let tail = Point::new(100.0, 100.0);
///
/// let delta = head.sub_point(tail);
/// assert_eq!(delta.x(), 200.0);
/// assert_eq!(delta.y(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Returns the coordinate of this point along `axis`.
    ///
    /// ```
    /// # use orthogram_core::geometry::{Axis, Point};
    /// let p = Point::new(3.0, 7.0);
    /// assert_eq!(p.along(Axis::Horizontal), 3.0);
    /// assert_eq!(p.along(Axis::Vertical), 7.0);
    /// ```
    pub fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Returns a copy of this point with its coordinate along `axis` replaced.
    pub fn with_along(self, axis: Axis, value: f32) -> Self {
        match axis {
            Axis::Horizontal => self.with_x(value),
            Axis::Vertical => self.with_y(value),
        }
    }

    /// Returns a copy of this point moved by `delta` along `axis`.
    pub fn offset_along(self, axis: Axis, delta: f32) -> Self {
        self.with_along(axis, self.along(axis) + delta)
    }

    /// Returns true if both coordinates are within `tolerance` of `other`.
    pub fn approx_eq(self, other: Point, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

/// Orientation of an orthogonal connector segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Returns the other axis.
    pub fn orthogonal(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the point at the middle of an area of this size anchored at the origin
    pub fn middle(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Errors raised when a [`Frame`] would violate its invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("frame size must be positive, got {width}x{height}")]
    NonPositiveSize { width: f32, height: f32 },
}

/// Axis-aligned rectangle owned by a diagram element.
///
/// The frame stores its top-left corner, its size, the row metrics used by
/// text-bearing elements and a cached horizontal center (`x + width / 2`).
/// Width and height are always positive.
///
/// # Examples
///
/// ```
/// # use orthogram_core::geometry::{Frame, Point, Size};
/// let frame = Frame::new(Point::new(100.0, 50.0), Size::new(160.0, 80.0)).unwrap();
/// assert_eq!(frame.x_center(), 180.0);
/// assert_eq!(frame.right(), 260.0);
///
/// let moved = frame.translate(Point::new(10.0, -5.0));
/// assert_eq!(moved.x(), 110.0);
/// assert_eq!(moved.x_center(), 190.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    row_height: f32,
    font_pixel_size: f32,
    x_center: f32,
}

impl Frame {
    /// Creates a frame from its top-left corner and size.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::NonPositiveSize`] if either dimension is not
    /// strictly positive.
    pub fn new(top_left: Point, size: Size) -> Result<Self, FrameError> {
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(FrameError::NonPositiveSize {
                width: size.width,
                height: size.height,
            });
        }
        Ok(Self {
            x: top_left.x,
            y: top_left.y,
            width: size.width,
            height: size.height,
            row_height: DEFAULT_ROW_HEIGHT,
            font_pixel_size: DEFAULT_FONT_PIXEL_SIZE,
            x_center: top_left.x + size.width / 2.0,
        })
    }

    /// Sets the text row height (builder style)
    pub fn with_row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height;
        self
    }

    /// Sets the font pixel size (builder style)
    pub fn with_font_pixel_size(mut self, font_pixel_size: f32) -> Self {
        self.font_pixel_size = font_pixel_size;
        self
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn font_pixel_size(&self) -> f32 {
        self.font_pixel_size
    }

    /// Horizontal center of the frame
    pub fn x_center(&self) -> f32 {
        self.x_center
    }

    /// Returns the x-coordinate of the right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the y-coordinate of the bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns the top-left corner as a Point
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns true if `point` lies inside the frame or on its border
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Moves the frame by the specified offset, keeping its size and row metrics.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            x_center: self.x_center + offset.x,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert_eq!(point.x(), 0.0);
        assert_eq!(point.y(), 0.0);
        assert!(point.is_zero());
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(5.0, 8.0);
        let p2 = Point::new(2.0, 3.0);
        assert_eq!(p1.add_point(p2), Point::new(7.0, 11.0));
        assert_eq!(p1.sub_point(p2), Point::new(3.0, 5.0));
    }

    #[test]
    fn test_point_with_coordinate() {
        let p = Point::new(4.0, 9.0);
        assert_eq!(p.with_x(-2.5), Point::new(-2.5, 9.0));
        assert_eq!(p.with_y(30.0), Point::new(4.0, 30.0));
        assert_eq!(p.with_x(1.0).with_y(2.0), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_point_along_axis() {
        let p = Point::new(4.0, 9.0);
        assert_eq!(p.with_along(Axis::Horizontal, 1.0), Point::new(1.0, 9.0));
        assert_eq!(p.with_along(Axis::Vertical, 1.0), Point::new(4.0, 1.0));
        assert_eq!(p.offset_along(Axis::Vertical, -4.0), Point::new(4.0, 5.0));
    }

    #[test]
    fn test_point_approx_eq() {
        let p = Point::new(1.0, 1.0);
        assert!(p.approx_eq(Point::new(1.0005, 0.9995), 1e-3));
        assert!(!p.approx_eq(Point::new(1.1, 1.0), 1e-3));
    }

    #[test]
    fn test_axis_orthogonal() {
        assert_eq!(Axis::Horizontal.orthogonal(), Axis::Vertical);
        assert_eq!(Axis::Vertical.orthogonal(), Axis::Horizontal);
    }

    #[test]
    fn test_size_middle() {
        let middle = Size::new(4400.0, 4684.0).middle();
        assert_approx_eq!(f32, middle.x(), 2200.0);
        assert_approx_eq!(f32, middle.y(), 2342.0);
    }

    #[test]
    fn test_frame_rejects_non_positive_size() {
        let err = Frame::new(Point::default(), Size::new(0.0, 10.0)).unwrap_err();
        assert_eq!(
            err,
            FrameError::NonPositiveSize {
                width: 0.0,
                height: 10.0
            }
        );
        assert!(Frame::new(Point::default(), Size::new(10.0, -1.0)).is_err());
        assert!(Frame::new(Point::default(), Size::new(f32::NAN, 1.0)).is_err());
    }

    #[test]
    fn test_frame_edges() {
        let frame = Frame::new(Point::new(10.0, 20.0), Size::new(100.0, 40.0)).unwrap();
        assert_approx_eq!(f32, frame.right(), 110.0);
        assert_approx_eq!(f32, frame.bottom(), 60.0);
        assert_approx_eq!(f32, frame.x_center(), 60.0);
        assert!(frame.contains(Point::new(10.0, 20.0)));
        assert!(frame.contains(Point::new(110.0, 60.0)));
        assert!(!frame.contains(Point::new(111.0, 30.0)));
    }

    #[test]
    fn test_frame_translate_keeps_metrics() {
        let frame = Frame::new(Point::new(0.0, 0.0), Size::new(50.0, 50.0))
            .unwrap()
            .with_row_height(30.0)
            .with_font_pixel_size(16.0);
        let moved = frame.translate(Point::new(5.0, 7.0));

        assert_approx_eq!(f32, moved.x(), 5.0);
        assert_approx_eq!(f32, moved.y(), 7.0);
        assert_approx_eq!(f32, moved.x_center(), 30.0);
        assert_approx_eq!(f32, moved.row_height(), 30.0);
        assert_approx_eq!(f32, moved.font_pixel_size(), 16.0);
        assert_eq!(moved.size(), frame.size());
    }
}
