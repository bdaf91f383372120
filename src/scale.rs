//! Image scaling helpers used for thumbnails and the preview pane

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};

/// Scales `src` to exactly `width`×`height` pixels.
///
/// The aspect ratio is not preserved. Zero-sized sources or targets produce a
/// transparent image of the requested size instead of calling the resampler.
pub fn scale_image(src: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let (src_width, src_height) = src.dimensions();
    if width == 0 || height == 0 || src_width == 0 || src_height == 0 {
        return RgbaImage::new(width, height);
    }

    // Bilinear
    imageops::resize(src, width, height, FilterType::Triangle)
}

/// Calculates new dimensions to fit image within max width and height while preserving aspect ratio
pub fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width == 0 || original_height == 0 {
        return (0, 0);
    }

    let ratio = fit_ratio(original_width, original_height, max_width, max_height);

    if ratio >= 1.0 {
        // Image is smaller than max dimensions, don't upscale
        (original_width, original_height)
    } else {
        scaled_by(original_width, original_height, ratio, max_width, max_height)
    }
}

/// Like [`calculate_resize_dimensions`] but also enlarges images smaller than the box.
pub fn fit_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width == 0 || original_height == 0 || max_width == 0 || max_height == 0 {
        return (0, 0);
    }

    let ratio = fit_ratio(original_width, original_height, max_width, max_height);
    scaled_by(original_width, original_height, ratio, max_width, max_height)
}

/// Shrinks `src` into a `box_width`×`box_height` thumbnail, keeping its aspect ratio.
pub fn make_thumbnail(src: &DynamicImage, box_width: u32, box_height: u32) -> RgbaImage {
    let (w, h) = calculate_resize_dimensions(src.width(), src.height(), box_width, box_height);
    scale_image(src, w.max(1), h.max(1))
}

fn fit_ratio(original_width: u32, original_height: u32, max_width: u32, max_height: u32) -> f64 {
    let width_ratio = max_width as f64 / original_width as f64;
    let height_ratio = max_height as f64 / original_height as f64;
    width_ratio.min(height_ratio)
}

fn scaled_by(width: u32, height: u32, ratio: f64, max_width: u32, max_height: u32) -> (u32, u32) {
    // Extreme aspect ratios can round a side down to zero
    let new_width = ((width as f64 * ratio) as u32).clamp(1, max_width.max(1));
    let new_height = ((height as f64 * ratio) as u32).clamp(1, max_height.max(1));
    (new_width, new_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_scale_image_exact_dimensions() {
        let src = DynamicImage::new_rgb8(640, 480);

        for (w, h) in [(1, 1), (7, 3), (640, 480), (1000, 20), (3, 900)] {
            let scaled = scale_image(&src, w, h);
            assert_eq!(scaled.dimensions(), (w, h));
        }
    }

    #[test]
    fn test_scale_image_from_tiny_source() {
        let src = DynamicImage::new_rgba8(1, 1);
        let scaled = scale_image(&src, 33, 17);
        assert_eq!(scaled.dimensions(), (33, 17));
    }

    #[test]
    fn test_scale_image_zero_sized() {
        let src = DynamicImage::new_rgba8(0, 0);
        assert_eq!(scale_image(&src, 5, 4).dimensions(), (5, 4));

        let src = DynamicImage::new_rgba8(10, 10);
        assert_eq!(scale_image(&src, 0, 4).dimensions(), (0, 4));
    }

    #[test]
    fn test_scale_image_preserves_solid_color() {
        let mut buffer = RgbaImage::new(20, 10);
        for pixel in buffer.pixels_mut() {
            *pixel = Rgba([200, 40, 10, 255]);
        }
        let src = DynamicImage::ImageRgba8(buffer);

        let scaled = scale_image(&src, 6, 9);

        assert!(scaled.pixels().all(|p| *p == Rgba([200, 40, 10, 255])));
    }

    #[test]
    fn test_calculate_resize_dimensions_scale_down() {
        let (width, height) = calculate_resize_dimensions(1600, 1200, 80, 40);
        assert!(width <= 80);
        assert!(height <= 40);
        // 4:3 within a pixel of rounding
        let ratio_diff = (width * 3).abs_diff(height * 4);
        assert!(ratio_diff <= 4, "Aspect ratio not preserved: {}x{}", width, height);
    }

    #[test]
    fn test_calculate_resize_dimensions_no_upscale() {
        assert_eq!(calculate_resize_dimensions(40, 30, 80, 40), (40, 30));
    }

    #[test]
    fn test_calculate_resize_dimensions_zero() {
        assert_eq!(calculate_resize_dimensions(0, 0, 80, 40), (0, 0));
    }

    #[test]
    fn test_calculate_resize_dimensions_wide_and_tall() {
        assert_eq!(calculate_resize_dimensions(1600, 400, 80, 40), (80, 20));
        assert_eq!(calculate_resize_dimensions(400, 1600, 80, 40), (10, 40));
    }

    #[test]
    fn test_calculate_resize_dimensions_extreme_aspect_keeps_one_pixel() {
        let (width, height) = calculate_resize_dimensions(10_000, 1, 80, 40);
        assert_eq!(width, 80);
        assert_eq!(height, 1);
    }

    #[test]
    fn test_fit_dimensions_upscales() {
        assert_eq!(fit_dimensions(40, 30, 80, 80), (80, 60));
        assert_eq!(fit_dimensions(10, 20, 100, 100), (50, 100));
    }

    #[test]
    fn test_fit_dimensions_empty_box() {
        assert_eq!(fit_dimensions(40, 30, 0, 80), (0, 0));
    }

    #[test]
    fn test_make_thumbnail_fits_box() {
        let src = DynamicImage::new_rgb8(300, 100);
        let thumb = make_thumbnail(&src, 12, 12);
        assert_eq!(thumb.dimensions(), (12, 4));
    }

    #[test]
    fn test_make_thumbnail_small_source_unchanged() {
        let src = DynamicImage::new_rgb8(5, 3);
        let thumb = make_thumbnail(&src, 12, 12);
        assert_eq!(thumb.dimensions(), (5, 3));
    }
}
