//! Imgbrowse - a terminal image browser library
//!
//! Lists the images in a directory, loads them in the background and renders
//! a thumbnail list with a scaled preview in the terminal.

pub mod cli;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logging;
pub mod preview;
pub mod scale;
pub mod tui;

// Re-export primary types for convenience
pub use domain::{
    discover_images, discover_images_with_options, is_supported_image, AppState,
    DiscoveryOptions, ImageEntry, ImageSlot, SortBy,
};
pub use error::{BrowserError, Result};
pub use loader::{ImageLoader, LoadEvent, LoadedImage, SyncImageLoader};
pub use preview::PreviewCache;
