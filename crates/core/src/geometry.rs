//! Scene-space geometry.
//!
//! All coordinates are in canvas pixels with the origin at the top-left and
//! the y axis pointing down.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point (or a translation vector) in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Round both coordinates to the nearest multiple of `step`.
    ///
    /// A non-positive step leaves the point unchanged.
    #[must_use]
    pub fn snap(self, step: f64) -> Self {
        if step <= 0.0 {
            return self;
        }
        Self::new((self.x / step).round() * step, (self.y / step).round() * step)
    }

    /// `true` when both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height of a cell body.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `true` when both extents are finite and strictly positive.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent.
    pub size: Size,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Left edge.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.origin.x
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.origin.y
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// `true` if `point` lies inside or on the border.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Smallest rectangle containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(Point::new(left, top), Size::new(right - left, bottom - top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(1.0, 2.0);
        assert_eq!(a + b, Point::new(11.0, 22.0));
        assert_eq!(a - b, Point::new(9.0, 18.0));
        assert_eq!(Point::ZERO.distance(Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 20.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, 10.0));
    }

    #[test]
    fn snap_rounds_to_grid() {
        assert_eq!(Point::new(14.0, 16.0).snap(10.0), Point::new(10.0, 20.0));
        assert_eq!(Point::new(14.0, 16.0).snap(0.0), Point::new(14.0, 16.0));
    }

    #[test]
    fn size_validity() {
        assert!(Size::new(1.0, 1.0).is_valid());
        assert!(!Size::new(0.0, 1.0).is_valid());
        assert!(!Size::new(f64::NAN, 1.0).is_valid());
    }

    #[test]
    fn rect_edges_and_center() {
        let r = Rect::new(Point::new(10.0, 10.0), Size::new(120.0, 60.0));
        assert_eq!(r.right(), 130.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.center(), Point::new(70.0, 40.0));
        assert!(r.contains(Point::new(10.0, 70.0)));
        assert!(!r.contains(Point::new(131.0, 40.0)));
    }

    #[test]
    fn rect_union_covers_both() {
        let a = Rect::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Rect::new(Point::new(20.0, 5.0), Size::new(10.0, 10.0));
        let u = a.union(&b);
        assert_eq!(u, Rect::new(Point::ZERO, Size::new(30.0, 15.0)));
    }
}
