//! Forced image resizing

use image::DynamicImage;
use tracing::debug;

use crate::config::{Dimensions, ResizeConfig};
use crate::error::Result;

/// Available resize filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterType {
    /// Nearest neighbor (fastest, lowest quality)
    Nearest,
    /// Triangle (linear interpolation)
    Triangle,
    /// Catmull-Rom cubic spline
    #[default]
    CatmullRom,
    /// Gaussian blur
    Gaussian,
    /// Lanczos with radius 3
    Lanczos3,
}

impl From<FilterType> for image::imageops::FilterType {
    fn from(filter: FilterType) -> Self {
        match filter {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Triangle => image::imageops::FilterType::Triangle,
            FilterType::CatmullRom => image::imageops::FilterType::CatmullRom,
            FilterType::Gaussian => image::imageops::FilterType::Gaussian,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Resizer that stretches images to an exact size
///
/// The target is checked once when the resizer is built, so every later
/// `resize` call is infallible.
#[derive(Debug, Clone, Copy)]
pub struct ImageResizer {
    target: Dimensions,
    filter: FilterType,
}

impl ImageResizer {
    /// Create a resizer for `target`, rejecting zero-sized targets
    pub fn new(target: Dimensions, filter: FilterType) -> Result<Self> {
        target.validate()?;
        Ok(Self { target, filter })
    }

    /// Create a resizer from a resize configuration
    pub fn from_config(config: &ResizeConfig) -> Result<Self> {
        Self::new(config.target, config.filter)
    }

    pub fn target(&self) -> Dimensions {
        self.target
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }

    /// Resize to exactly the target, discarding the source aspect ratio
    pub fn resize(&self, image: &DynamicImage) -> DynamicImage {
        debug!(
            "Resizing {}x{} -> {} using {:?}",
            image.width(),
            image.height(),
            self.target,
            self.filter
        );

        if image.width() == self.target.width && image.height() == self.target.height {
            return image.clone();
        }

        image.resize_exact(self.target.width, self.target.height, self.filter.into())
    }
}
