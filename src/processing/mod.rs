//! Core image processing functionality

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::fs;
use tracing::{debug, info};

use crate::config::{BatchConfig, Dimensions, ResizeConfig};
use crate::error::{BatchResizeError, Result};

pub mod discovery;
pub mod formats;
pub mod resize;

pub use discovery::*;
pub use formats::*;
pub use resize::*;

/// Core processing engine for image operations
///
/// Files are handled strictly one after another. Each decode/resize/save
/// runs on the blocking pool and is awaited before the next file starts,
/// so at most one decoded image is alive at a time.
#[derive(Debug, Default)]
pub struct ProcessingEngine;

impl ProcessingEngine {
    /// Create a new processing engine
    pub fn new() -> Self {
        Self
    }

    /// Decode `input_path`, force it to the configured size and write it
    /// to `output_path` in the format named by the output extension.
    pub async fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        config: &ResizeConfig,
    ) -> Result<ProcessingResult> {
        let resizer = ImageResizer::from_config(config)?;
        self.resize_file(&resizer, input_path.as_ref(), output_path.as_ref())
            .await
    }

    /// Decode, resize and save one file with an already validated resizer
    async fn resize_file(
        &self,
        resizer: &ImageResizer,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<ProcessingResult> {
        let start_time = Instant::now();
        let input_path = input_path.to_path_buf();
        let output_path = output_path.to_path_buf();

        debug!("Processing file: {:?} -> {:?}", input_path, output_path);

        let output_format = detect_format_from_path(&output_path)?;
        let resizer = *resizer;

        let original = tokio::task::spawn_blocking({
            let input_path = input_path.clone();
            let output_path = output_path.clone();
            move || -> Result<Dimensions> {
                let image = load_image(&input_path)?;
                let original = Dimensions::new(image.width(), image.height());

                let resized = resizer.resize(&image);
                drop(image);

                resized
                    .save_with_format(&output_path, output_format.into())
                    .map_err(|e| BatchResizeError::save(&output_path, e))?;

                Ok(original)
            }
        })
        .await??;

        let processing_time = start_time.elapsed();
        debug!(
            "Resized {:?}: {} -> {} in {:.1}ms",
            input_path,
            original,
            resizer.target(),
            processing_time.as_secs_f64() * 1000.0
        );

        Ok(ProcessingResult {
            input_path,
            output_path,
            original_size: original,
            output_size: resizer.target(),
            processing_time,
        })
    }

    /// Run one batch over `config.input_dir`
    ///
    /// `on_event` receives a [`BatchEvent::FileResized`] after every saved
    /// file and a single [`BatchEvent::BatchCompleted`] at the end. The first
    /// error stops the run and is returned; files already written stay.
    pub async fn run_batch<F>(&self, config: &BatchConfig, mut on_event: F) -> Result<BatchReport>
    where
        F: FnMut(&BatchEvent),
    {
        let start_time = Instant::now();
        let resizer = ImageResizer::from_config(&config.resize)?;

        info!("Starting batch processing");
        info!("Input: {:?}", config.input_dir);
        info!("Output: {:?}", config.output_dir);
        info!("Target: {} ({:?})", config.resize.target, config.resize.filter);

        fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|e| BatchResizeError::create_dir(&config.output_dir, e))?;

        let images = discover_images(&config.input_dir).await?;
        info!("Found {} files to process", images.len());

        let mut report = BatchReport::default();

        for image in &images {
            let output_path = config.output_dir.join(&image.file_name);
            let result = self.resize_file(&resizer, &image.path, &output_path).await?;

            report.resized += 1;
            on_event(&BatchEvent::FileResized {
                file_name: image.display_name(),
                result,
            });
        }

        report.duration = start_time.elapsed();
        info!(
            "Batch complete: {} file(s) in {:.2}s",
            report.resized,
            report.duration.as_secs_f64()
        );
        on_event(&BatchEvent::BatchCompleted { report: report.clone() });

        Ok(report)
    }

    /// List the files a batch run would process without touching the output
    pub async fn plan_batch(&self, config: &BatchConfig) -> Result<Vec<PlannedFile>> {
        config.validate()?;

        let images = discover_images(&config.input_dir).await?;
        Ok(images
            .into_iter()
            .map(|image| PlannedFile {
                output_path: config.output_dir.join(&image.file_name),
                input_path: image.path,
            })
            .collect())
    }
}

/// Open and decode an image, sniffing the content rather than trusting the
/// extension.
fn load_image(path: &Path) -> Result<image::DynamicImage> {
    let reader = image::io::Reader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| BatchResizeError::decode(path, image::ImageError::IoError(e)))?;

    reader.decode().map_err(|e| BatchResizeError::decode(path, e))
}

/// Result of processing an image
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub original_size: Dimensions,
    pub output_size: Dimensions,
    pub processing_time: Duration,
}

/// Notices emitted while a batch runs
#[derive(Debug, Clone)]
pub enum BatchEvent {
    FileResized {
        file_name: String,
        result: ProcessingResult,
    },
    BatchCompleted {
        report: BatchReport,
    },
}

/// Summary of a finished batch
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub resized: usize,
    pub duration: Duration,
}

/// A file a batch run would write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};
    use tempfile::TempDir;

    fn write_rgb(path: &Path, width: u32, height: u32) {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        img.save(path).unwrap();
    }

    fn collect_names(events: &[BatchEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                BatchEvent::FileResized { file_name, .. } => Some(file_name.clone()),
                BatchEvent::BatchCompleted { .. } => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_process_single_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("wide.png");
        let output = dir.path().join("out.png");
        write_rgb(&input, 400, 100);

        let engine = ProcessingEngine::new();
        let result = engine.process_file(&input, &output, &ResizeConfig::new()).await.unwrap();

        assert_eq!(result.original_size, Dimensions::new(400, 100));
        assert_eq!(result.output_size, Dimensions::new(294, 221));
        assert_eq!(image::image_dimensions(&output).unwrap(), (294, 221));
    }

    #[tokio::test]
    async fn test_each_recognized_format_roundtrips() {
        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("in");
        std::fs::create_dir(&input_dir).unwrap();

        write_rgb(&input_dir.join("a.png"), 30, 20);
        write_rgb(&input_dir.join("b.jpg"), 50, 80);
        write_rgb(&input_dir.join("c.bmp"), 10, 10);
        let gif = ImageBuffer::from_pixel(12, 12, Rgba([10u8, 20, 30, 255]));
        gif.save(input_dir.join("d.gif")).unwrap();
        std::fs::copy(input_dir.join("b.jpg"), input_dir.join("e.JPEG")).unwrap();

        let config = BatchConfig::new(&input_dir, dir.path().join("out"));
        let report = ProcessingEngine::new().run_batch(&config, |_| {}).await.unwrap();
        assert_eq!(report.resized, 5);

        for (name, format) in [
            ("a.png", image::ImageFormat::Png),
            ("b.jpg", image::ImageFormat::Jpeg),
            ("c.bmp", image::ImageFormat::Bmp),
            ("d.gif", image::ImageFormat::Gif),
            ("e.JPEG", image::ImageFormat::Jpeg),
        ] {
            let path = config.output_dir.join(name);
            let reader = image::io::Reader::open(&path).unwrap().with_guessed_format().unwrap();
            assert_eq!(reader.format(), Some(format), "{name}");
            assert_eq!(image::image_dimensions(&path).unwrap(), (294, 221), "{name}");
        }
    }

    #[tokio::test]
    async fn test_batch_events_and_skips() {
        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("in");
        std::fs::create_dir(&input_dir).unwrap();
        write_rgb(&input_dir.join("a.png"), 100, 100);
        write_rgb(&input_dir.join("b.jpg"), 50, 80);
        std::fs::write(input_dir.join("notes.txt"), "not an image").unwrap();
        std::fs::create_dir(input_dir.join("sub")).unwrap();

        let output_dir = dir.path().join("nested").join("out");
        let config = BatchConfig::new(&input_dir, &output_dir);

        let mut events = Vec::new();
        let report = ProcessingEngine::new()
            .run_batch(&config, |event| events.push(event.clone()))
            .await
            .unwrap();

        assert_eq!(report.resized, 2);

        let mut names = collect_names(&events);
        names.sort();
        assert_eq!(names, ["a.png", "b.jpg"]);
        assert!(matches!(events.last(), Some(BatchEvent::BatchCompleted { .. })));
        assert_eq!(events.len(), 3);

        let mut written: Vec<_> = std::fs::read_dir(&output_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        written.sort();
        assert_eq!(written, ["a.png", "b.jpg"]);
    }

    #[tokio::test]
    async fn test_rerun_overwrites() {
        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("in");
        std::fs::create_dir(&input_dir).unwrap();
        write_rgb(&input_dir.join("a.png"), 64, 48);

        let config = BatchConfig::new(&input_dir, dir.path().join("out"));
        let engine = ProcessingEngine::new();

        engine.run_batch(&config, |_| {}).await.unwrap();
        let first = std::fs::read(config.output_dir.join("a.png")).unwrap();

        engine.run_batch(&config, |_| {}).await.unwrap();
        let second = std::fs::read(config.output_dir.join("a.png")).unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read_dir(&config.output_dir).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_aborts_batch() {
        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("in");
        std::fs::create_dir(&input_dir).unwrap();
        std::fs::write(input_dir.join("corrupt.jpg"), b"definitely not a jpeg").unwrap();

        let config = BatchConfig::new(&input_dir, dir.path().join("out"));

        let mut completed = false;
        let err = ProcessingEngine::new()
            .run_batch(&config, |event| {
                if let BatchEvent::BatchCompleted { .. } = event {
                    completed = true;
                }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BatchResizeError::Decode { .. }));
        assert!(!completed);
        assert!(!config.output_dir.join("corrupt.jpg").exists());
    }

    #[tokio::test]
    async fn test_missing_input_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = BatchConfig::new(dir.path().join("missing"), dir.path().join("out"));

        let err = ProcessingEngine::new().run_batch(&config, |_| {}).await.unwrap_err();
        assert!(matches!(err, BatchResizeError::ReadDir { .. }));
        // The output folder is ensured before the input is listed
        assert!(config.output_dir.is_dir());
    }

    #[tokio::test]
    async fn test_plan_batch_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("in");
        std::fs::create_dir(&input_dir).unwrap();
        write_rgb(&input_dir.join("a.png"), 8, 8);
        std::fs::write(input_dir.join("b.txt"), "x").unwrap();

        let output_dir = dir.path().join("out");
        let config = BatchConfig::new(&input_dir, &output_dir);
        let plan = ProcessingEngine::new().plan_batch(&config).await.unwrap();

        assert_eq!(
            plan,
            vec![PlannedFile {
                input_path: input_dir.join("a.png"),
                output_path: output_dir.join("a.png"),
            }]
        );
        assert!(!output_dir.exists());
    }

    #[tokio::test]
    async fn test_custom_target() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("src.png");
        let output = dir.path().join("dst.png");
        write_rgb(&input, 20, 20);

        let config = ResizeConfig::new()
            .target(Dimensions::new(7, 3))
            .filter(FilterType::Nearest);
        ProcessingEngine::new().process_file(&input, &output, &config).await.unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (7, 3));
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_outputs() {
        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("in");
        std::fs::create_dir(&input_dir).unwrap();
        write_rgb(&input_dir.join("good.png"), 60, 40);
        std::fs::write(input_dir.join("corrupt.jpg"), b"garbage bytes, not a jpeg").unwrap();

        let config = BatchConfig::new(&input_dir, dir.path().join("out"));

        let mut events = Vec::new();
        let err = ProcessingEngine::new()
            .run_batch(&config, |event| events.push(event.clone()))
            .await
            .unwrap_err();

        assert!(matches!(err, BatchResizeError::Decode { .. }));
        assert_eq!(err.file_path(), Some(input_dir.join("corrupt.jpg").as_path()));
        assert!(!events.iter().any(|e| matches!(e, BatchEvent::BatchCompleted { .. })));

        // Whatever was listed before the corrupt file got written; nothing else did
        let resized = collect_names(&events);
        assert!(resized.iter().all(|name| name == "good.png"));

        let mut written: Vec<String> = std::fs::read_dir(&config.output_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        written.sort();
        assert_eq!(written, resized);

        for name in &written {
            assert_eq!(image::image_dimensions(config.output_dir.join(name)).unwrap(), (294, 221));
        }
    }

    #[tokio::test]
    async fn test_zero_target_rejected_before_any_io() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("out");
        let config = BatchConfig::new(dir.path(), &output_dir).target(Dimensions::new(0, 221));

        let err = ProcessingEngine::new().run_batch(&config, |_| {}).await.unwrap_err();
        assert!(matches!(err, BatchResizeError::InvalidParameters { .. }));
        assert!(!output_dir.exists());

        let err = ProcessingEngine::new()
            .process_file(dir.path().join("a.png"), dir.path().join("b.png"), &config.resize)
            .await
            .unwrap_err();
        assert!(matches!(err, BatchResizeError::InvalidParameters { .. }));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_file_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("in");
        std::fs::create_dir(&input_dir).unwrap();

        let name = OsStr::from_bytes(b"caf\xe9.PNG");
        let img = ImageBuffer::from_pixel(10, 10, Rgb([1u8, 2, 3]));
        img.save_with_format(input_dir.join(name), image::ImageFormat::Png).unwrap();

        let config = BatchConfig::new(&input_dir, dir.path().join("out"));
        let report = ProcessingEngine::new().run_batch(&config, |_| {}).await.unwrap();

        assert_eq!(report.resized, 1);
        let output = config.output_dir.join(name);
        assert_eq!(image::image_dimensions(&output).unwrap(), (294, 221));
    }
}
