//! BatchResize - folder-to-folder image resizer
//!
//! Takes every PNG, JPEG, BMP and GIF directly inside an input folder,
//! stretches it to a fixed resolution (294x221 unless told otherwise) and
//! writes it under the same name into an output folder.
//!
//! # Behaviour
//!
//! - **Flat**: only direct entries of the input folder are considered
//! - **Sequential**: one image is decoded, resized and saved at a time
//! - **Fail-fast**: the first unreadable or unwritable file ends the run
//! - **Same name, same format**: outputs overwrite existing files silently
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use batchresize::{BatchConfig, BatchEvent, ProcessingEngine};
//!
//! # async fn run() -> batchresize::Result<()> {
//! let config = BatchConfig::new("oldimages", "newimages");
//!
//! ProcessingEngine::new()
//!     .run_batch(&config, |event| match event {
//!         BatchEvent::FileResized { file_name, .. } => println!("Resized: {}", file_name),
//!         BatchEvent::BatchCompleted { .. } => println!("All images resized."),
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod processing;

// Re-export commonly used types
pub use config::{BatchConfig, Dimensions, ResizeConfig};
pub use error::{BatchResizeError, Result};
pub use processing::{BatchEvent, BatchReport, FilterType, ProcessingEngine};

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging
///
/// Log lines go to stderr; stdout carries only the per-file and final
/// notices. `RUST_LOG` wins over `default_level` when set. Calling this more
/// than once is harmless.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    if tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .is_ok()
    {
        info!("BatchResize v{} initialized", VERSION);
    }
}
