//! Annotation types placed on the gel image
//!
//! All annotation types store coordinates in logical coordinates.

use super::geometry::{LogicalPoint, Rect};

/// Where the loaded image sits on the logical surface
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePlacement {
    /// Image center in logical coordinates
    pub center: LogicalPoint,
    /// Rotation around `center`, in radians
    pub rotation: f64,
    /// Raster width in pixels, fixed at load time
    pub width: u32,
    /// Raster height in pixels, fixed at load time
    pub height: u32,
}

impl ImagePlacement {
    /// Placement for a freshly loaded image: centered, unrotated
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            center: LogicalPoint::ORIGIN,
            rotation: 0.0,
            width,
            height,
        }
    }

    /// Top-left corner of the unrotated image rectangle
    pub fn origin(&self) -> LogicalPoint {
        LogicalPoint::new(
            self.center.x - f64::from(self.width) / 2.0,
            self.center.y - f64::from(self.height) / 2.0,
        )
    }

    /// The image outline after rotation, used as its clip and hit path
    pub fn outline(&self) -> [LogicalPoint; 4] {
        let o = self.origin();
        Rect::from_xywh(o.x, o.y, f64::from(self.width), f64::from(self.height))
            .corners()
            .map(|c| c.rotate_around(self.center, self.rotation))
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.center = self.center.translate(dx, dy);
    }
}

/// Crop region; everything outside it is masked when drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropBox {
    pub corner1: LogicalPoint,
    pub corner2: LogicalPoint,
}

impl CropBox {
    pub fn new(corner1: LogicalPoint, corner2: LogicalPoint) -> Self {
        Self { corner1, corner2 }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.corner1, self.corner2)
    }

    /// The four mask rectangles covering `bounds` outside the crop box
    ///
    /// Left and right strips span the full height; top and bottom strips
    /// span only the crop box's columns, so the regions tile the complement
    /// without overlapping. Strips that would be empty come back empty.
    pub fn mask_regions(&self, bounds: Rect) -> [Rect; 4] {
        let crop = self.rect();
        let inner_left = crop.left.clamp(bounds.left, bounds.right);
        let inner_right = crop.right.clamp(bounds.left, bounds.right);
        let inner_top = crop.top.clamp(bounds.top, bounds.bottom);
        let inner_bottom = crop.bottom.clamp(bounds.top, bounds.bottom);

        let left = Rect {
            left: bounds.left,
            top: bounds.top,
            right: inner_left,
            bottom: bounds.bottom,
        };
        let right = Rect {
            left: inner_right,
            top: bounds.top,
            right: bounds.right,
            bottom: bounds.bottom,
        };
        let top = Rect {
            left: inner_left,
            top: bounds.top,
            right: inner_right,
            bottom: inner_top,
        };
        let bottom = Rect {
            left: inner_left,
            top: inner_bottom,
            right: inner_right,
            bottom: bounds.bottom,
        };
        [left, right, top, bottom]
    }
}

/// Region selected for export, in logical coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportSelection {
    pub corner1: LogicalPoint,
    pub corner2: LogicalPoint,
}

impl ExportSelection {
    pub fn new(corner1: LogicalPoint, corner2: LogicalPoint) -> Self {
        Self { corner1, corner2 }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.corner1, self.corner2)
    }
}

/// A ladder placed on the image
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLadder {
    /// Name of the ladder definition in the ladder table
    pub definition: String,
    /// Where the largest fragment sits
    pub anchor_start: LogicalPoint,
    /// Where the smallest fragment sits
    pub anchor_stop: LogicalPoint,
    /// Clicked band positions, largest fragment first
    pub bands: Vec<LogicalPoint>,
}

impl PlacedLadder {
    pub fn new(definition: impl Into<String>, anchor_start: LogicalPoint, anchor_stop: LogicalPoint) -> Self {
        Self {
            definition: definition.into(),
            anchor_start,
            anchor_stop,
            bands: Vec::new(),
        }
    }

    /// Record the next band if the ladder still has unrecorded fragments
    ///
    /// Returns false when all `capacity` fragments already have a band.
    pub fn record_band(&mut self, p: LogicalPoint, capacity: usize) -> bool {
        if self.bands.len() >= capacity {
            return false;
        }
        self.bands.push(p);
        true
    }
}

/// One clicked lane; labels share the average y of all markers
pub type LaneMarker = LogicalPoint;
