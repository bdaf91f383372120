// Background image loading: one decode task per file, results delivered on a channel

use crate::domain::ImageEntry;
use crate::error::{BrowserError, Result};
use crate::scale::make_thumbnail;
use image::{DynamicImage, GenericImageView, ImageReader, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

/// Maximum number of decodes running on the blocking pool at once
const MAX_CONCURRENT_DECODES: usize = 4;

/// A decoded image together with its list thumbnail
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: Arc<DynamicImage>,
    pub thumbnail: RgbaImage,
    pub width: u32,
    pub height: u32,
}

/// Completion of one load, sent exactly once per `ImageLoader::load` call
#[derive(Debug)]
pub struct LoadEvent {
    pub index: usize,
    pub path: PathBuf,
    pub result: Result<LoadedImage>,
}

/// Opens and decodes an image, sniffing the format from the file contents
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    let open_err = |source| BrowserError::Open {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .map_err(open_err)?
        .with_guessed_format()
        .map_err(open_err)?
        .decode()
        .map_err(|source| BrowserError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

fn load_blocking(path: &Path, thumb_box: (u32, u32)) -> Result<LoadedImage> {
    let image = decode_image(path)?;
    let (width, height) = image.dimensions();
    let thumbnail = make_thumbnail(&image, thumb_box.0, thumb_box.1);

    Ok(LoadedImage {
        image: Arc::new(image),
        thumbnail,
        width,
        height,
    })
}

/// Decodes `path` and builds its thumbnail on tokio's blocking pool
pub async fn load_image(path: PathBuf, thumb_box: (u32, u32)) -> Result<LoadedImage> {
    let task_path = path.clone();
    tokio::task::spawn_blocking(move || load_blocking(&task_path, thumb_box))
        .await
        .map_err(|e| BrowserError::TaskFailed {
            path,
            reason: e.to_string(),
        })?
}

/// Spawns decode tasks and reports each completion on a channel.
///
/// Completions arrive in whatever order the decodes finish.
#[derive(Clone)]
pub struct ImageLoader {
    events_tx: mpsc::UnboundedSender<LoadEvent>,
    permits: Arc<Semaphore>,
    thumb_box: (u32, u32),
}

impl ImageLoader {
    /// Creates a loader whose thumbnails fit inside `thumb_box` pixels
    pub fn new(thumb_box: (u32, u32)) -> (Self, mpsc::UnboundedReceiver<LoadEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let loader = Self {
            events_tx,
            permits: Arc::new(Semaphore::new(MAX_CONCURRENT_DECODES)),
            thumb_box,
        };
        (loader, events_rx)
    }

    /// Starts loading `path`; must be called from within a tokio runtime.
    pub fn load(&self, index: usize, path: PathBuf) -> JoinHandle<()> {
        let events_tx = self.events_tx.clone();
        let permits = Arc::clone(&self.permits);
        let thumb_box = self.thumb_box;

        tokio::spawn(async move {
            let result = match permits.acquire_owned().await {
                Ok(_permit) => load_image(path.clone(), thumb_box).await,
                Err(e) => Err(BrowserError::TaskFailed {
                    path: path.clone(),
                    reason: e.to_string(),
                }),
            };

            match &result {
                Ok(loaded) => tracing::debug!(
                    index,
                    path = %path.display(),
                    width = loaded.width,
                    height = loaded.height,
                    "image loaded"
                ),
                Err(err) => tracing::warn!(index, error = %err, "image failed to load"),
            }

            // The receiver is gone only when the UI has already shut down
            let _ = events_tx.send(LoadEvent {
                index,
                path,
                result,
            });
        })
    }

    /// Starts one load per entry, using the entry's position as its index
    pub fn load_all(&self, files: &[ImageEntry]) -> Vec<JoinHandle<()>> {
        files
            .iter()
            .enumerate()
            .map(|(index, file)| self.load(index, file.path.clone()))
            .collect()
    }
}

/// Synchronous front end for the loader, polled from the terminal event loop
pub struct SyncImageLoader {
    loader: ImageLoader,
    events_rx: mpsc::UnboundedReceiver<LoadEvent>,
    runtime: tokio::runtime::Runtime,
    in_flight: usize,
}

impl SyncImageLoader {
    pub fn new(thumb_box: (u32, u32)) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (loader, events_rx) = ImageLoader::new(thumb_box);

        Ok(Self {
            loader,
            events_rx,
            runtime,
            in_flight: 0,
        })
    }

    /// Starts background loads for every file
    pub fn start(&mut self, files: &[ImageEntry]) {
        let _guard = self.runtime.enter();
        self.in_flight += self.loader.load_all(files).len();
    }

    /// Returns every completion that has arrived since the last poll (non-blocking)
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            events.push(event);
        }
        events
    }

    /// Number of loads started but not yet returned by `poll`
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Stops the runtime without waiting for decodes still in progress
    pub fn shutdown(self) {
        if self.in_flight > 0 {
            tracing::debug!(in_flight = self.in_flight, "abandoning pending loads");
        }
        self.runtime.shutdown_background();
    }
}
