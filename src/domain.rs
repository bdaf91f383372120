use crate::error::Result;
use crate::loader::LoadedImage;
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions recognized as browsable images (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Returns true when the path carries one of the supported image extensions
///
/// The extension is whatever follows the last dot of the file name, so a file
/// named just `.png` counts as a png.
pub fn is_supported_image(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub modified_date: DateTime<Utc>,
}

impl ImageEntry {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let modified = metadata.modified()?;
        let modified_date: DateTime<Utc> = modified.into();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(ImageEntry {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
            modified_date,
        })
    }
}

/// Options for image discovery
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Sort order
    pub sort_by: SortBy,
    /// Reverse sort order
    pub reverse: bool,
}

/// Sort order for discovered images
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Directory listing order: file names compared byte-wise
    #[default]
    Name,
    /// Modification date, oldest first
    Date,
    /// File size, smallest first
    Size,
}

/// Lists the supported images directly inside `dir_path`.
///
/// # Behavior
/// - Does not recurse; directories (and symlinks to directories) are skipped
/// - Keeps only files whose extension is jpg, jpeg, png or gif, in any case
/// - Hidden files are kept when their extension matches
/// - Entries whose metadata cannot be read are skipped
/// - Results are ordered by file name unless `discover_images_with_options` says otherwise
pub fn discover_images(dir_path: &Path) -> io::Result<Vec<ImageEntry>> {
    discover_images_with_options(dir_path, &DiscoveryOptions::default())
}

/// Discovers images with custom ordering
pub fn discover_images_with_options(
    dir_path: &Path,
    options: &DiscoveryOptions,
) -> io::Result<Vec<ImageEntry>> {
    let mut images = Vec::new();

    for entry_result in fs::read_dir(dir_path)? {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();

        if !is_supported_image(&path) {
            continue;
        }

        // fs::metadata follows symlinks, so a link to a directory is still a directory
        match fs::metadata(&path) {
            Ok(m) if m.is_dir() => continue,
            Ok(_) => {}
            Err(_) => continue,
        }

        match ImageEntry::from_path(&path) {
            Ok(image) => images.push(image),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "skipping image entry");
            }
        }
    }

    match options.sort_by {
        SortBy::Name => images.sort_by(|a, b| a.name.cmp(&b.name)),
        SortBy::Date => images.sort_by(|a, b| a.modified_date.cmp(&b.modified_date)),
        SortBy::Size => images.sort_by(|a, b| a.size.cmp(&b.size)),
    }

    if options.reverse {
        images.reverse();
    }

    Ok(images)
}

/// Decode state of one image in the list
#[derive(Debug, Clone)]
pub enum ImageSlot {
    /// Decode still running in the background
    Loading,
    /// Decoded image and its thumbnail
    Ready(LoadedImage),
    /// Decode failed; the message is shown in place of the image
    Failed(String),
}

impl ImageSlot {
    pub fn is_loading(&self) -> bool {
        matches!(self, ImageSlot::Loading)
    }
}

/// Session state: the discovered files, their decode slots and the cursor.
///
/// `files` and `images` always have the same length and share indices.
#[derive(Debug)]
pub struct AppState {
    pub directory: PathBuf,
    pub files: Vec<ImageEntry>,
    pub images: Vec<ImageSlot>,
    pub current_index: usize,
}

impl AppState {
    pub fn new(directory: PathBuf, files: Vec<ImageEntry>) -> Self {
        let images = vec![ImageSlot::Loading; files.len()];
        Self {
            directory,
            files,
            images,
            current_index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Moves the cursor to `index`. Out-of-range indices leave the state untouched.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.files.len() {
            return false;
        }
        self.current_index = index;
        true
    }

    /// Moves the cursor by `offset` if the target lies in `[0, len - 1]`.
    pub fn change(&mut self, offset: isize) -> bool {
        let Some(target) = self.current_index.checked_add_signed(offset) else {
            return false;
        };
        self.select(target)
    }

    pub fn next(&mut self) -> bool {
        self.change(1)
    }

    pub fn previous(&mut self) -> bool {
        self.change(-1)
    }

    pub fn first(&mut self) -> bool {
        self.select(0)
    }

    pub fn last(&mut self) -> bool {
        match self.files.len() {
            0 => false,
            n => self.select(n - 1),
        }
    }

    pub fn current_file(&self) -> Option<&ImageEntry> {
        self.files.get(self.current_index)
    }

    pub fn current_slot(&self) -> Option<&ImageSlot> {
        self.images.get(self.current_index)
    }

    pub fn slot(&self, index: usize) -> Option<&ImageSlot> {
        self.images.get(index)
    }

    /// Stores the outcome of a background load.
    ///
    /// A slot settles once: later results for the same index are ignored.
    /// Returns true when this call settled the slot, meaning the screen is stale.
    pub fn apply_load(&mut self, index: usize, result: Result<LoadedImage>) -> bool {
        let Some(slot) = self.images.get_mut(index) else {
            return false;
        };
        if !slot.is_loading() {
            return false;
        }

        *slot = match result {
            Ok(loaded) => ImageSlot::Ready(loaded),
            Err(err) => ImageSlot::Failed(err.to_string()),
        };

        true
    }

    pub fn loaded_count(&self) -> usize {
        self.images
            .iter()
            .filter(|s| matches!(s, ImageSlot::Ready(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.images
            .iter()
            .filter(|s| matches!(s, ImageSlot::Failed(_)))
            .count()
    }

    pub fn pending_count(&self) -> usize {
        self.images.iter().filter(|s| s.is_loading()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod extension_tests {
        use super::*;

        #[test]
        fn test_supported_extensions() {
            assert!(is_supported_image(Path::new("a.png")));
            assert!(is_supported_image(Path::new("a.jpg")));
            assert!(is_supported_image(Path::new("a.jpeg")));
            assert!(is_supported_image(Path::new("a.gif")));
        }

        #[test]
        fn test_supported_extensions_case_insensitive() {
            assert!(is_supported_image(Path::new("c.JPG")));
            assert!(is_supported_image(Path::new("d.Png")));
            assert!(is_supported_image(Path::new("e.GIF")));
            assert!(is_supported_image(Path::new("f.JpEg")));
        }

        #[test]
        fn test_extension_only_names() {
            assert!(is_supported_image(Path::new(".png")));
            assert!(is_supported_image(Path::new("/photos/.JPG")));
            assert!(!is_supported_image(Path::new("trailing.")));
        }

        #[test]
        fn test_unsupported_extensions() {
            assert!(!is_supported_image(Path::new("b.txt")));
            assert!(!is_supported_image(Path::new("photo.webp")));
            assert!(!is_supported_image(Path::new("png")));
            assert!(!is_supported_image(Path::new("archive.png.zip")));
            assert!(!is_supported_image(Path::new("")));
        }
    }

    mod image_entry_tests {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn test_image_entry_from_path() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("pic.png");
            fs::write(&path, b"not really a png").unwrap();

            let entry = ImageEntry::from_path(&path).unwrap();

            assert_eq!(entry.path, path);
            assert_eq!(entry.name, "pic.png");
            assert_eq!(entry.size, 16);
        }

        #[test]
        fn test_image_entry_nonexistent_file() {
            let result = ImageEntry::from_path(Path::new("/nonexistent/pic.png"));
            assert!(result.is_err());
        }
    }

    mod discovery_tests {
        use super::*;
        use std::thread;
        use std::time::Duration;
        use tempfile::TempDir;

        fn names(images: &[ImageEntry]) -> Vec<&str> {
            images.iter().map(|f| f.name.as_str()).collect()
        }

        #[test]
        fn test_discover_mixed_directory() {
            let temp_dir = TempDir::new().unwrap();
            let dir_path = temp_dir.path();

            fs::write(dir_path.join("a.png"), b"a").unwrap();
            fs::write(dir_path.join("b.txt"), b"b").unwrap();
            fs::create_dir(dir_path.join("sub")).unwrap();
            fs::write(dir_path.join("c.JPG"), b"c").unwrap();

            let images = discover_images(dir_path).unwrap();

            assert_eq!(names(&images), vec!["a.png", "c.JPG"]);
        }

        #[test]
        fn test_discover_skips_directories_with_image_names() {
            let temp_dir = TempDir::new().unwrap();
            let dir_path = temp_dir.path();

            fs::create_dir(dir_path.join("album.png")).unwrap();
            fs::write(dir_path.join("album.png").join("inner.png"), b"x").unwrap();
            fs::write(dir_path.join("top.gif"), b"x").unwrap();

            let images = discover_images(dir_path).unwrap();

            assert_eq!(names(&images), vec!["top.gif"]);
        }

        #[test]
        fn test_discover_keeps_hidden_images() {
            let temp_dir = TempDir::new().unwrap();
            let dir_path = temp_dir.path();

            fs::write(dir_path.join(".cover.jpeg"), b"x").unwrap();
            fs::write(dir_path.join(".hidden"), b"x").unwrap();

            let images = discover_images(dir_path).unwrap();

            assert_eq!(names(&images), vec![".cover.jpeg"]);
        }

        #[test]
        fn test_discover_keeps_extension_only_names() {
            let temp_dir = TempDir::new().unwrap();
            let dir_path = temp_dir.path();

            fs::write(dir_path.join(".png"), b"x").unwrap();
            fs::write(dir_path.join(".JPG"), b"x").unwrap();
            fs::write(dir_path.join("a.gif"), b"x").unwrap();
            fs::write(dir_path.join("png"), b"x").unwrap();
            fs::write(dir_path.join("trailing."), b"x").unwrap();

            let images = discover_images(dir_path).unwrap();

            assert_eq!(names(&images), vec![".JPG", ".png", "a.gif"]);
        }

        #[test]
        fn test_discover_orders_by_name_bytes() {
            let temp_dir = TempDir::new().unwrap();
            let dir_path = temp_dir.path();

            for name in ["b.png", "C.png", "a.gif", "10.jpg", "2.jpg"] {
                fs::write(dir_path.join(name), b"x").unwrap();
            }

            let images = discover_images(dir_path).unwrap();

            assert_eq!(
                names(&images),
                vec!["10.jpg", "2.jpg", "C.png", "a.gif", "b.png"]
            );
        }

        #[test]
        fn test_discover_sort_by_date() {
            let temp_dir = TempDir::new().unwrap();
            let dir_path = temp_dir.path();

            fs::write(dir_path.join("z_oldest.png"), b"1").unwrap();
            thread::sleep(Duration::from_millis(20));
            fs::write(dir_path.join("a_newest.png"), b"2").unwrap();

            let options = DiscoveryOptions {
                sort_by: SortBy::Date,
                ..Default::default()
            };
            let images = discover_images_with_options(dir_path, &options).unwrap();

            assert_eq!(names(&images), vec!["z_oldest.png", "a_newest.png"]);
        }

        #[test]
        fn test_discover_sort_by_size_reversed() {
            let temp_dir = TempDir::new().unwrap();
            let dir_path = temp_dir.path();

            fs::write(dir_path.join("small.png"), b"1").unwrap();
            fs::write(dir_path.join("large.png"), b"12345").unwrap();
            fs::write(dir_path.join("medium.png"), b"123").unwrap();

            let options = DiscoveryOptions {
                sort_by: SortBy::Size,
                reverse: true,
            };
            let images = discover_images_with_options(dir_path, &options).unwrap();

            assert_eq!(
                names(&images),
                vec!["large.png", "medium.png", "small.png"]
            );
        }

        #[test]
        fn test_discover_empty_directory() {
            let temp_dir = TempDir::new().unwrap();
            let images = discover_images(temp_dir.path()).unwrap();
            assert!(images.is_empty());
        }

        #[test]
        fn test_discover_nonexistent_directory() {
            let result = discover_images(Path::new("/nonexistent/directory"));
            assert!(result.is_err());
        }
    }

    mod app_state_tests {
        use super::*;
        use crate::error::BrowserError;
        use image::{DynamicImage, RgbaImage};
        use std::sync::Arc;

        fn create_test_entry(name: &str) -> ImageEntry {
            ImageEntry {
                path: PathBuf::from(name),
                name: name.to_string(),
                size: 0,
                modified_date: Utc::now(),
            }
        }

        fn state_with(n: usize) -> AppState {
            let files = (0..n)
                .map(|i| create_test_entry(&format!("img{}.png", i)))
                .collect();
            AppState::new(PathBuf::from("."), files)
        }

        fn loaded() -> LoadedImage {
            LoadedImage {
                image: Arc::new(DynamicImage::new_rgba8(4, 2)),
                thumbnail: RgbaImage::new(2, 1),
                width: 4,
                height: 2,
            }
        }

        #[test]
        fn test_app_state_new() {
            let state = state_with(3);
            assert_eq!(state.len(), 3);
            assert_eq!(state.images.len(), 3);
            assert_eq!(state.current_index, 0);
            assert!(state.images.iter().all(ImageSlot::is_loading));
        }

        #[test]
        fn test_next_and_previous_in_range() {
            let mut state = state_with(3);

            assert!(state.next());
            assert_eq!(state.current_index, 1);
            assert!(state.next());
            assert_eq!(state.current_index, 2);
            assert!(state.previous());
            assert_eq!(state.current_index, 1);
        }

        #[test]
        fn test_previous_at_first_is_noop() {
            let mut state = state_with(3);

            assert!(!state.previous());
            assert_eq!(state.current_index, 0);
        }

        #[test]
        fn test_next_at_last_is_noop() {
            let mut state = state_with(3);
            state.select(2);

            assert!(!state.next());
            assert_eq!(state.current_index, 2);
        }

        #[test]
        fn test_change_out_of_range_is_noop() {
            let mut state = state_with(3);
            state.select(1);

            assert!(!state.change(5));
            assert!(!state.change(-2));
            assert_eq!(state.current_index, 1);
            assert!(state.change(-1));
            assert_eq!(state.current_index, 0);
        }

        #[test]
        fn test_select_out_of_range_is_noop() {
            let mut state = state_with(2);

            assert!(!state.select(2));
            assert_eq!(state.current_index, 0);
            assert!(state.select(1));
            assert_eq!(state.current_index, 1);
        }

        #[test]
        fn test_navigation_on_empty_state() {
            let mut state = state_with(0);

            assert!(!state.next());
            assert!(!state.previous());
            assert!(!state.first());
            assert!(!state.last());
            assert_eq!(state.current_index, 0);
            assert!(state.current_file().is_none());
            assert!(state.current_slot().is_none());
        }

        #[test]
        fn test_first_and_last() {
            let mut state = state_with(4);

            assert!(state.last());
            assert_eq!(state.current_index, 3);
            assert!(state.first());
            assert_eq!(state.current_index, 0);
        }

        #[test]
        fn test_current_file() {
            let mut state = state_with(2);
            state.next();
            assert_eq!(state.current_file().unwrap().name, "img1.png");
        }

        #[test]
        fn test_apply_load_reports_every_settle() {
            let mut state = state_with(3);

            // Settling any slot changes the thumbnail list, not just the preview
            assert!(state.apply_load(0, Ok(loaded())));
            assert!(state.apply_load(2, Ok(loaded())));

            assert!(matches!(state.slot(0), Some(ImageSlot::Ready(_))));
            assert!(matches!(state.slot(1), Some(ImageSlot::Loading)));
            assert!(matches!(state.slot(2), Some(ImageSlot::Ready(_))));
            assert_eq!(state.loaded_count(), 2);
            assert_eq!(state.pending_count(), 1);
        }

        #[test]
        fn test_apply_load_failure_records_message() {
            let mut state = state_with(1);
            let err = BrowserError::TaskFailed {
                path: PathBuf::from("img0.png"),
                reason: "panicked".to_string(),
            };

            assert!(state.apply_load(0, Err(err)));

            match state.current_slot() {
                Some(ImageSlot::Failed(msg)) => assert!(msg.contains("panicked")),
                other => panic!("Expected failed slot, got {:?}", other),
            }
            assert_eq!(state.failed_count(), 1);
        }

        #[test]
        fn test_apply_load_settles_once() {
            let mut state = state_with(1);
            state.apply_load(0, Ok(loaded()));

            let err = BrowserError::TaskFailed {
                path: PathBuf::from("img0.png"),
                reason: "late".to_string(),
            };
            assert!(!state.apply_load(0, Err(err)));
            assert!(matches!(state.current_slot(), Some(ImageSlot::Ready(_))));
        }

        #[test]
        fn test_apply_load_out_of_range_ignored() {
            let mut state = state_with(1);
            assert!(!state.apply_load(7, Ok(loaded())));
            assert_eq!(state.loaded_count(), 0);
        }
    }
}
