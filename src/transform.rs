//! Mapping between device (pointer) coordinates and the logical surface
//!
//! The forward mapping is: translate by the pan offset, scale by zoom, then
//! translate by half the viewport so the logical origin sits at the center.

use crate::domain::{DevicePoint, LogicalPoint, Rect};

/// Pan/zoom state of the canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    /// Pan offset in logical units
    pub pan_x: f64,
    pub pan_y: f64,
    /// Scale factor, never below [`TransformState::MIN_ZOOM`]
    zoom: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl TransformState {
    pub const MIN_ZOOM: f64 = 0.1;
    /// Zoom change per wheel notch
    pub const ZOOM_STEP: f64 = 0.1;

    pub fn new(pan_x: f64, pan_y: f64, zoom: f64) -> Self {
        let mut state = Self {
            pan_x,
            pan_y,
            zoom: 1.0,
        };
        state.set_zoom(zoom);
        state
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom factor, clamped to the minimum (no upper bound)
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom.is_nan() {
            Self::MIN_ZOOM
        } else {
            zoom.max(Self::MIN_ZOOM)
        };
    }

    /// Apply `notches` wheel steps; positive zooms in
    pub fn zoom_by_notches(&mut self, notches: i32) {
        self.set_zoom(self.zoom + Self::ZOOM_STEP * f64::from(notches));
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }
}

/// A 2D affine matrix in the column convention used by SVG and cairo:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            e: dx,
            f: dy,
            ..Self::IDENTITY
        }
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self * other`: apply `other` first, then `self`
    pub fn then_apply(self, other: Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Apply only the linear part (no translation), for distances
    pub fn apply_vector(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y, self.b * x + self.d * y)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn invert(&self) -> Option<Affine> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Affine {
            a,
            b,
            c,
            d,
            e: -(a * self.e + c * self.f),
            f: -(b * self.e + d * self.f),
        })
    }
}

/// Transform context for one viewport size and pan/zoom state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformContext {
    pub state: TransformState,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl TransformContext {
    pub fn new(state: TransformState, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            state,
            viewport_width,
            viewport_height,
        }
    }

    /// Logical → device matrix
    pub fn matrix(&self) -> Affine {
        Affine::translation(self.viewport_width / 2.0, self.viewport_height / 2.0)
            .then_apply(Affine::scaling(self.state.zoom, self.state.zoom))
            .then_apply(Affine::translation(self.state.pan_x, self.state.pan_y))
    }

    pub fn logical_to_device(&self, p: LogicalPoint) -> DevicePoint {
        let zoom = self.state.zoom;
        DevicePoint::new(
            (p.x + self.state.pan_x) * zoom + self.viewport_width / 2.0,
            (p.y + self.state.pan_y) * zoom + self.viewport_height / 2.0,
        )
    }

    pub fn device_to_logical(&self, p: DevicePoint) -> LogicalPoint {
        let zoom = self.state.zoom;
        LogicalPoint::new(
            (p.x - self.viewport_width / 2.0) / zoom - self.state.pan_x,
            (p.y - self.viewport_height / 2.0) / zoom - self.state.pan_y,
        )
    }

    /// Convert a device-space length (e.g. a font pixel size) to logical units
    pub fn scale_distance(&self, px: f64) -> f64 {
        px / self.state.zoom
    }

    /// The viewport's extent on the logical surface
    pub fn visible_logical_rect(&self) -> Rect {
        let tl = self.device_to_logical(DevicePoint::new(0.0, 0.0));
        let br = self.device_to_logical(DevicePoint::new(self.viewport_width, self.viewport_height));
        Rect::from_corners(tl, br)
    }

    /// Device-space extent of a logical rectangle (the view never rotates)
    pub fn logical_rect_to_device(&self, rect: Rect) -> Rect {
        let a = self.logical_to_device(LogicalPoint::new(rect.left, rect.top));
        let b = self.logical_to_device(LogicalPoint::new(rect.right, rect.bottom));
        Rect::from_corners(LogicalPoint::new(a.x, a.y), LogicalPoint::new(b.x, b.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn test_center_maps_to_origin() {
        let ctx = TransformContext::new(TransformState::default(), 800.0, 600.0);
        assert_eq!(
            ctx.device_to_logical(DevicePoint::new(400.0, 300.0)),
            LogicalPoint::ORIGIN
        );
    }

    #[test]
    fn test_zoom_and_pan() {
        let ctx = TransformContext::new(TransformState::new(10.0, -5.0, 2.0), 100.0, 100.0);
        let d = ctx.logical_to_device(LogicalPoint::new(0.0, 0.0));
        assert_eq!(d, DevicePoint::new(70.0, 40.0));
        assert_eq!(ctx.scale_distance(11.0), 5.5);
    }

    #[test]
    fn test_matrix_matches_direct_mapping() {
        let ctx = TransformContext::new(TransformState::new(3.0, 4.0, 1.7), 640.0, 480.0);
        let p = LogicalPoint::new(-12.5, 33.0);
        let (x, y) = ctx.matrix().apply(p.x, p.y);
        let d = ctx.logical_to_device(p);
        assert!(close(x, d.x) && close(y, d.y));

        let inv = ctx.matrix().invert().unwrap();
        let (lx, ly) = inv.apply(d.x, d.y);
        assert!(close(lx, p.x) && close(ly, p.y));
    }

    #[test]
    fn test_rect_to_device() {
        let ctx = TransformContext::new(TransformState::new(0.0, 0.0, 2.0), 1000.0, 1000.0);
        let r = ctx.logical_rect_to_device(Rect::from_xywh(-10.0, -10.0, 20.0, 10.0));
        assert_eq!(r, Rect::from_xywh(480.0, 480.0, 40.0, 20.0));
        assert_eq!(
            ctx.visible_logical_rect(),
            Rect::from_xywh(-250.0, -250.0, 500.0, 500.0)
        );
    }

    #[test]
    fn test_zoom_out_clamps() {
        let mut state = TransformState::default();
        for _ in 0..50 {
            state.zoom_by_notches(-1);
        }
        assert_eq!(state.zoom(), TransformState::MIN_ZOOM);
        state.zoom_by_notches(1);
        assert!(close(state.zoom(), 0.2));
    }

    #[test]
    fn test_rotation_matrix() {
        let r = Affine::rotation(std::f64::consts::FRAC_PI_2);
        let (x, y) = r.apply(1.0, 0.0);
        assert!(close(x, 0.0) && close(y, 1.0));
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            pan_x in -1e4f64..1e4,
            pan_y in -1e4f64..1e4,
            zoom in 0.1f64..50.0,
            x in -1e5f64..1e5,
            y in -1e5f64..1e5,
        ) {
            let ctx = TransformContext::new(TransformState::new(pan_x, pan_y, zoom), 1280.0, 720.0);
            let p = LogicalPoint::new(x, y);
            let back = ctx.device_to_logical(ctx.logical_to_device(p));
            prop_assert!(close(back.x, p.x), "{} vs {}", back.x, p.x);
            prop_assert!(close(back.y, p.y), "{} vs {}", back.y, p.y);
        }

        #[test]
        fn prop_zoom_never_below_minimum(steps in proptest::collection::vec(-5i32..5, 0..200)) {
            let mut state = TransformState::default();
            for s in steps {
                state.zoom_by_notches(s);
                prop_assert!(state.zoom() >= TransformState::MIN_ZOOM);
            }
        }
    }
}
