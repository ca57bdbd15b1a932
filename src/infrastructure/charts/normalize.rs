use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;

use crate::domain::error::{AppError, Result};

/// Scale an image to fit a `size` x `size` white square, keeping its aspect ratio
pub fn letterbox(img: &RgbImage, size: u32) -> RgbImage {
    let (width, height) = img.dimensions();
    let scale = size as f64 / width.max(height).max(1) as f64;
    let new_w = ((width as f64 * scale).round() as u32).clamp(1, size);
    let new_h = ((height as f64 * scale).round() as u32).clamp(1, size);

    let resized = imageops::resize(img, new_w, new_h, FilterType::Lanczos3);

    let mut canvas = RgbImage::from_pixel(size, size, Rgb([255, 255, 255]));
    imageops::overlay(
        &mut canvas,
        &resized,
        ((size - new_w) / 2) as i64,
        ((size - new_h) / 2) as i64,
    );
    canvas
}

pub fn save_png(img: &RgbImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png).map_err(|e| {
        AppError::RenderError(format!("Failed to write {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_is_letterboxed() {
        let img = RgbImage::from_pixel(1000, 500, Rgb([10, 20, 30]));
        let square = letterbox(&img, 512);

        assert_eq!(square.dimensions(), (512, 512));
        // Padding above and below, content in the middle
        assert_eq!(square.get_pixel(5, 5), &Rgb([255, 255, 255]));
        assert_eq!(square.get_pixel(5, 506), &Rgb([255, 255, 255]));
        assert_eq!(square.get_pixel(256, 256), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_portrait_is_pillarboxed() {
        let img = RgbImage::from_pixel(300, 900, Rgb([0, 0, 0]));
        let square = letterbox(&img, 300);

        assert_eq!(square.dimensions(), (300, 300));
        assert_eq!(square.get_pixel(2, 150), &Rgb([255, 255, 255]));
        assert_eq!(square.get_pixel(150, 150), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_save_png_round_trip_dimensions() {
        let dir = std::env::temp_dir().join(format!("autolysis-png-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("square.png");

        save_png(&letterbox(&RgbImage::new(40, 20), 64), &path).unwrap();
        let reopened = image::open(&path).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (64, 64));

        std::fs::remove_dir_all(&dir).ok();
    }
}
