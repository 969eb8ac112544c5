//! Geometric types for the logical drawing surface and device coordinates

use serde::{Deserialize, Serialize};

/// Point on the logical drawing surface (origin at surface center)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicalPoint {
    pub x: f64,
    pub y: f64,
}

impl LogicalPoint {
    pub const ORIGIN: LogicalPoint = LogicalPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`
    pub fn delta(self, other: LogicalPoint) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }

    /// Translate the point by the given offset
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Rotate the point around `center` by `radians`
    pub fn rotate_around(self, center: LogicalPoint, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Self {
            x: center.x + dx * cos - dy * sin,
            y: center.y + dx * sin + dy * cos,
        }
    }
}

/// Point in device (pointer/pixel) coordinates, origin at the viewport's top-left
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DevicePoint {
    pub x: f64,
    pub y: f64,
}

impl DevicePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle with `left <= right` and `top <= bottom`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Build a rectangle from two arbitrary corners
    pub fn from_corners(a: LogicalPoint, b: LogicalPoint) -> Self {
        let (left, top, right, bottom) = normalize_rect(a.x, a.y, b.x, b.y);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a rectangle from its top-left corner and size
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        let (left, top, right, bottom) = normalize_rect(x, y, x + width, y + height);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(Rect {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Half-open containment, so adjacent rectangles never both contain a point
    pub fn contains(&self, p: LogicalPoint) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    /// Corners in drawing order: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [LogicalPoint; 4] {
        [
            LogicalPoint::new(self.left, self.top),
            LogicalPoint::new(self.right, self.top),
            LogicalPoint::new(self.right, self.bottom),
            LogicalPoint::new(self.left, self.bottom),
        ]
    }
}

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f64, y1: f64, x2: f64, y2: f64) -> (f64, f64, f64, f64) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}

/// Even-odd point-in-polygon test
pub fn polygon_contains(polygon: &[LogicalPoint], p: LogicalPoint) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Distance from `p` to the segment `a`-`b`
pub fn segment_distance(a: LogicalPoint, b: LogicalPoint, p: LogicalPoint) -> f64 {
    let (dx, dy) = b.delta(a);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (ex, ey) = p.delta(a.translate(dx * t, dy * t));
    (ex * ex + ey * ey).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let r = Rect::from_corners(LogicalPoint::new(10.0, -5.0), LogicalPoint::new(-10.0, 5.0));
        assert_eq!(r.left, -10.0);
        assert_eq!(r.top, -5.0);
        assert_eq!(r.width(), 20.0);
        assert_eq!(r.height(), 10.0);
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersect(b).is_none());
    }

    #[test]
    fn test_polygon_contains_rotated_square() {
        let center = LogicalPoint::ORIGIN;
        let square: Vec<_> = Rect::from_xywh(-1.0, -1.0, 2.0, 2.0)
            .corners()
            .iter()
            .map(|c| c.rotate_around(center, std::f64::consts::FRAC_PI_4))
            .collect();
        assert!(polygon_contains(&square, LogicalPoint::new(0.0, 1.3)));
        assert!(!polygon_contains(&square, LogicalPoint::new(0.9, 0.9)));
    }

    #[test]
    fn test_segment_distance() {
        let a = LogicalPoint::new(0.0, 0.0);
        let b = LogicalPoint::new(10.0, 0.0);
        assert_eq!(segment_distance(a, b, LogicalPoint::new(5.0, 3.0)), 3.0);
        assert_eq!(segment_distance(a, b, LogicalPoint::new(13.0, 4.0)), 5.0);
    }
}
