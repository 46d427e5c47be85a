//! Configuration for a batch run

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{BatchResizeError, Result};
use crate::processing::FilterType;

/// Default output width in pixels
pub const DEFAULT_WIDTH: u32 = 294;

/// Default output height in pixels
pub const DEFAULT_HEIGHT: u32 = 221;

/// Exact output resolution applied to every image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Parse a dimension string (e.g., "294x221")
    pub fn parse(s: &str) -> Result<Self> {
        let (width, height) = s
            .trim()
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or_else(|| BatchResizeError::invalid_parameters(
                format!("Dimensions must be in format 'WIDTHxHEIGHT' (e.g., '294x221'), got '{}'", s)
            ))?;

        let width = width.trim().parse::<u32>()
            .map_err(|_| BatchResizeError::invalid_parameters(format!("Invalid width value '{}'", width)))?;
        let height = height.trim().parse::<u32>()
            .map_err(|_| BatchResizeError::invalid_parameters(format!("Invalid height value '{}'", height)))?;

        let dimensions = Self { width, height };
        dimensions.validate()?;
        Ok(dimensions)
    }

    /// Both sides must be at least one pixel
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BatchResizeError::invalid_parameters(format!(
                "Width and height must be greater than 0, got {}",
                self
            )));
        }
        Ok(())
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Dimensions {
    type Err = BatchResizeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// How each image is resized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeConfig {
    /// Forced output size; the source aspect ratio is discarded
    pub target: Dimensions,

    /// Resampling filter
    pub filter: FilterType,
}

impl ResizeConfig {
    /// Create a new resize configuration with the default 294x221 target
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target dimensions
    pub fn target(mut self, target: Dimensions) -> Self {
        self.target = target;
        self
    }

    /// Set the resampling filter
    pub fn filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.target.validate()
    }
}

/// Parameters of one batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Folder whose direct entries are resized. Must already exist.
    pub input_dir: PathBuf,

    /// Folder receiving the resized files. Created if absent.
    pub output_dir: PathBuf,

    pub resize: ResizeConfig,
}

impl BatchConfig {
    pub fn new<I: AsRef<Path>, O: AsRef<Path>>(input_dir: I, output_dir: O) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            resize: ResizeConfig::default(),
        }
    }

    /// Set the target dimensions
    pub fn target(mut self, target: Dimensions) -> Self {
        self.resize.target = target;
        self
    }

    /// Set the resampling filter
    pub fn filter(mut self, filter: FilterType) -> Self {
        self.resize.filter = filter;
        self
    }

    /// Validate configuration
    ///
    /// Only parameters are checked here; the input folder is not probed,
    /// a missing one surfaces when it is listed.
    pub fn validate(&self) -> Result<()> {
        self.resize.validate()
    }
}
