use std::path::PathBuf;

use crate::capture::image::RasterImage;
use crate::config::AnnotationConfig;
use crate::domain::{
    CropBox, DevicePoint, ExportSelection, ImagePlacement, LadderDefinition, LadderTable,
    LaneMarker, LogicalPoint, PlacedLadder,
};
use crate::error::ConfigurationError;
use crate::transform::{TransformContext, TransformState};

/// Active interaction mode; decides what a pointer gesture does
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    MoveImage,
    AddLadderAnchor,
    RecordLadderBands,
    RotateImage,
    CropImage,
    SelectExportRegion,
    LabelLanes,
}

/// Pointer drag bookkeeping between down and up
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub pressed: bool,
    pub start: LogicalPoint,
    pub current: LogicalPoint,
    /// Last pointer position in device space, for panning
    pub last_device: DevicePoint,
    /// Whether the press landed on the image
    pub image_hit: bool,
}

/// The whole annotation session
#[derive(Clone, Debug)]
pub struct SessionState {
    pub mode: Mode,
    pub raster: Option<RasterImage>,
    pub placement: Option<ImagePlacement>,
    pub crop: Option<CropBox>,
    pub ladders: Vec<PlacedLadder>,
    /// The last ladder is still being dragged out and not yet committed
    pub ladder_in_progress: bool,
    pub lane_markers: Vec<LaneMarker>,
    pub export_selection: Option<ExportSelection>,
    pub export_armed: bool,
    pub drag: DragState,
    pub transform: TransformState,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub config: AnnotationConfig,
    pub ladder_table: LadderTable,
    /// File the current image was opened from
    pub source_path: Option<PathBuf>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(AnnotationConfig::default(), LadderTable::builtin())
    }
}

impl SessionState {
    pub const DEFAULT_VIEWPORT: (f64, f64) = (1000.0, 1000.0);

    pub fn new(config: AnnotationConfig, ladder_table: LadderTable) -> Self {
        Self {
            mode: Mode::Idle,
            raster: None,
            placement: None,
            crop: None,
            ladders: Vec::new(),
            ladder_in_progress: false,
            lane_markers: Vec::new(),
            export_selection: None,
            export_armed: false,
            drag: DragState::default(),
            transform: TransformState::default(),
            viewport_width: Self::DEFAULT_VIEWPORT.0,
            viewport_height: Self::DEFAULT_VIEWPORT.1,
            config,
            ladder_table,
            source_path: None,
        }
    }

    pub fn transform_context(&self) -> TransformContext {
        TransformContext::new(self.transform, self.viewport_width, self.viewport_height)
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::debug!("Mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width.max(1.0);
        self.viewport_height = height.max(1.0);
    }

    /// Replace the image and reset every piece of annotation geometry
    ///
    /// Configuration and the ladder table survive so GUI controls stay in sync.
    pub fn load_image(&mut self, raster: RasterImage, path: Option<PathBuf>) {
        let config = std::mem::take(&mut self.config);
        let table = std::mem::take(&mut self.ladder_table);
        let (vw, vh) = (self.viewport_width, self.viewport_height);

        *self = Self::new(config, table);
        self.set_viewport(vw, vh);
        self.placement = Some(ImagePlacement::new(raster.width(), raster.height()));
        self.raster = Some(raster);
        self.source_path = path;
        self.set_mode(Mode::MoveImage);
    }

    /// Replace the raster pixels without touching placement
    pub fn replace_raster(&mut self, raster: RasterImage) {
        self.raster = Some(raster);
    }

    pub fn has_image(&self) -> bool {
        self.raster.is_some()
    }

    /// Definition of the ladder selected in the configuration
    pub fn selected_ladder(&self) -> Result<&LadderDefinition, ConfigurationError> {
        self.ladder_table.require(&self.config.ladder)
    }

    /// Drop the uncommitted ladder, if any
    pub fn discard_ladder_in_progress(&mut self) {
        if self.ladder_in_progress {
            self.ladders.pop();
            self.ladder_in_progress = false;
        }
    }

    pub fn clear_ladders(&mut self) {
        self.ladders.clear();
        self.ladder_in_progress = false;
    }

    pub fn clear_lane_markers(&mut self) {
        self.lane_markers.clear();
    }

    pub fn clear_export_selection(&mut self) {
        self.export_selection = None;
        self.export_armed = false;
    }
}
