//! Gel image rasters and the image provider that loads them

use std::path::Path;

use image::RgbaImage;

use crate::error::DecodeError;

/// A decoded gel image, always RGBA with an opaque alpha channel
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    pub rgba: RgbaImage,
}

impl RasterImage {
    /// Wrap an RGBA buffer, forcing every pixel opaque
    pub fn new(mut rgba: RgbaImage) -> Self {
        for pixel in rgba.pixels_mut() {
            pixel[3] = 255;
        }
        Self { rgba }
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}

/// Source of gel images and the colour transforms applied to them
pub trait ImageProvider {
    /// Decode the image at `path`
    fn open(&self, path: &Path) -> Result<RasterImage, DecodeError>;

    /// Invert the colour channels, keeping alpha
    fn invert_colors(&self, image: &RasterImage) -> RasterImage;

    /// Convert to grayscale, keeping the RGBA layout
    fn to_grayscale(&self, image: &RasterImage) -> RasterImage;
}

/// Image provider backed by the `image` crate (PNG, TIFF, JPEG, ...)
#[derive(Clone, Copy, Debug, Default)]
pub struct FileImageProvider;

impl ImageProvider for FileImageProvider {
    fn open(&self, path: &Path) -> Result<RasterImage, DecodeError> {
        let reader = image::ImageReader::open(path)
            .map_err(|source| DecodeError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .with_guessed_format()
            .map_err(|source| DecodeError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let decoded = reader.decode().map_err(|source| DecodeError::Image {
            path: path.to_path_buf(),
            source,
        })?;

        let rgba = decoded.to_rgba8();
        if rgba.width() == 0 || rgba.height() == 0 {
            return Err(DecodeError::Empty {
                path: path.to_path_buf(),
            });
        }
        log::debug!(
            "Gel image decoded: {}x{} pixels from {}",
            rgba.width(),
            rgba.height(),
            path.display()
        );
        Ok(RasterImage::new(rgba))
    }

    fn invert_colors(&self, image: &RasterImage) -> RasterImage {
        let mut rgba = image.rgba.clone();
        image::imageops::invert(&mut rgba);
        RasterImage { rgba }
    }

    fn to_grayscale(&self, image: &RasterImage) -> RasterImage {
        let gray = image::imageops::grayscale(&image.rgba);
        let rgba = image::DynamicImage::ImageLuma8(gray).to_rgba8();
        RasterImage::new(rgba)
    }
}
