// Terminal rendering of images: half-block lines, cached previews, the folder glyph
use crate::scale::{fit_dimensions, scale_image};
use crate::tui::colors::BG_DARK;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::collections::HashMap;

/// Maximum number of rendered previews kept around
const CACHE_SIZE: usize = 8;

/// Blends an RGBA pixel over the UI background so transparent areas match the pane
fn composite(pixel: &Rgba<u8>, background: (u8, u8, u8)) -> Color {
    let [r, g, b, a] = pixel.0;
    let a = a as u16;
    let blend = |fg: u8, bg: u8| ((fg as u16 * a + bg as u16 * (255 - a)) / 255) as u8;
    Color::Rgb(
        blend(r, background.0),
        blend(g, background.1),
        blend(b, background.2),
    )
}

fn background_rgb() -> (u8, u8, u8) {
    match BG_DARK {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => (0, 0, 0),
    }
}

/// Converts an image to styled lines using half-block characters for terminal display.
/// Uses the upper half block character (▀) with foreground color for the upper pixel
/// and background color for the lower pixel, effectively displaying 2 pixels per cell.
pub fn render_halfblocks(img: &RgbaImage) -> Vec<Line<'static>> {
    let (width, height) = img.dimensions();
    let background = background_rgb();
    let term_height = height.div_ceil(2);
    let mut lines = Vec::with_capacity(term_height as usize);

    for y in 0..term_height {
        let upper_y = y * 2;
        let lower_y = upper_y + 1;

        let mut spans = Vec::with_capacity(width as usize);

        for x in 0..width {
            let upper = img.get_pixel(x, upper_y);
            // Odd heights: the last row fills both halves
            let lower = if lower_y < height {
                img.get_pixel(x, lower_y)
            } else {
                upper
            };

            let style = Style::default()
                .fg(composite(upper, background))
                .bg(composite(lower, background));

            spans.push(Span::styled("▀", style));
        }

        lines.push(Line::from(spans));
    }

    lines
}

/// Scales `image` into a pane of `cols`×`rows` terminal cells and renders it.
///
/// Each cell holds two pixels vertically, so the pixel box is `cols`×`rows*2`.
/// With `stretch` the image fills the box exactly; otherwise its aspect ratio is kept.
pub fn build_preview_lines(
    image: &DynamicImage,
    cols: u16,
    rows: u16,
    stretch: bool,
) -> Vec<Line<'static>> {
    let box_width = cols as u32;
    let box_height = rows as u32 * 2;

    let (width, height) = if stretch {
        (box_width, box_height)
    } else {
        let (w, h) = image.dimensions();
        fit_dimensions(w, h, box_width, box_height)
    };

    if width == 0 || height == 0 {
        return Vec::new();
    }

    render_halfblocks(&scale_image(image, width, height))
}

/// Draws a simple folder glyph used for the directory cell of the thumbnail list
pub fn folder_icon(width: u32, height: u32) -> RgbaImage {
    let body = Rgba([232, 176, 74, 255]);
    let tab = Rgba([201, 146, 52, 255]);
    let clear = Rgba([0, 0, 0, 0]);

    let tab_height = (height / 4).max(1);
    let tab_width = (width * 2 / 5).max(1);

    RgbaImage::from_fn(width, height, |x, y| {
        if y < tab_height {
            if x < tab_width {
                tab
            } else {
                clear
            }
        } else {
            body
        }
    })
}

/// Identifies one rendered preview: image index plus pane geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    pub index: usize,
    pub cols: u16,
    pub rows: u16,
    pub stretch: bool,
}

/// LRU-like cache for rendered previews, so each frame doesn't rescale the image
#[derive(Debug)]
pub struct PreviewCache {
    cache: HashMap<PreviewKey, Vec<Line<'static>>>,
    /// Order of access for LRU eviction (most recent at end)
    access_order: Vec<PreviewKey>,
    max_size: usize,
}

impl PreviewCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::new(),
            access_order: Vec::new(),
            max_size,
        }
    }

    /// Insert a preview, evicting the least recently used one if necessary
    fn insert(&mut self, key: PreviewKey, lines: Vec<Line<'static>>) {
        if self.cache.contains_key(&key) {
            self.access_order.retain(|k| k != &key);
        } else if self.cache.len() >= self.max_size && !self.access_order.is_empty() {
            let oldest = self.access_order.remove(0);
            self.cache.remove(&oldest);
        }

        self.cache.insert(key, lines);
        self.access_order.push(key);
    }

    /// Returns the cached lines for `key`, rendering them with `render` on a miss
    pub fn get_or_insert_with<F>(&mut self, key: PreviewKey, render: F) -> &[Line<'static>]
    where
        F: FnOnce() -> Vec<Line<'static>>,
    {
        if self.cache.contains_key(&key) {
            self.touch(&key);
        } else {
            self.insert(key, render());
        }
        self.cache.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, key: &PreviewKey) -> bool {
        self.cache.contains_key(key)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.cache.len()
    }

    fn touch(&mut self, key: &PreviewKey) {
        self.access_order.retain(|k| k != key);
        self.access_order.push(*key);
    }
}

impl Default for PreviewCache {
    fn default() -> Self {
        Self::new(CACHE_SIZE)
    }
}
