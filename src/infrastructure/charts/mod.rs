// ============================================================
// CHART RENDERING
// ============================================================
// Draw prepared chart data with plotters and save square PNGs

mod bar;
mod heatmap;
pub mod histogram;
pub mod normalize;
mod palette;

use image::RgbImage;
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

use crate::domain::chart::{ChartData, ChartKind};
use crate::domain::error::{AppError, Result};

pub use heatmap::cell_label;

pub const DEFAULT_IMAGE_SIZE: u32 = 512;

/// Draws one chart to an image file
pub trait ChartRenderer {
    fn render(&self, title: &str, data: &ChartData, path: &Path) -> Result<()>;
}

/// Bitmap renderer; every output is normalised to a square of `image_size` pixels
pub struct PlottersRenderer {
    image_size: u32,
}

impl PlottersRenderer {
    pub fn new(image_size: u32) -> Self {
        Self { image_size }
    }

    fn canvas_size(kind: ChartKind) -> (u32, u32) {
        match kind {
            ChartKind::Distribution | ChartKind::CategoryBar => (1000, 700),
            ChartKind::CorrelationHeatmap => (900, 900),
        }
    }
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_SIZE)
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, title: &str, data: &ChartData, path: &Path) -> Result<()> {
        let (width, height) = Self::canvas_size(data.kind());
        let mut buffer = vec![0u8; (width * height * 3) as usize];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            match data {
                ChartData::Distribution { column, values } => {
                    histogram::draw_distribution(&root, title, column, values)?
                }
                ChartData::CategoryBar { column, counts, .. } => {
                    bar::draw_category_bar(&root, title, column, counts)?
                }
                ChartData::CorrelationHeatmap { matrix } => {
                    heatmap::draw_heatmap(&root, title, matrix)?
                }
            }

            root.present().map_err(draw_err)?;
        }

        let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            AppError::RenderError("Rendered buffer has unexpected size".to_string())
        })?;
        let square = normalize::letterbox(&image, self.image_size);
        normalize::save_png(&square, path)?;

        debug!(path = %path.display(), kind = %data.kind(), "Chart written");
        Ok(())
    }
}

pub(crate) fn draw_err<E: std::fmt::Display>(err: E) -> AppError {
    AppError::RenderError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::statistics::CorrelationMatrix;

    fn scratch_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("autolysis-render-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Rendering needs a system font; without one it must fail cleanly, never panic
    fn assert_square_or_render_error(result: Result<()>, path: &Path, size: u32) {
        match result {
            Ok(()) => {
                let img = image::open(path).unwrap();
                assert_eq!((img.width(), img.height()), (size, size));
            }
            Err(err) => assert!(matches!(err, AppError::RenderError(_)), "{err}"),
        }
    }

    #[test]
    fn test_render_each_kind() {
        let dir = scratch_dir();
        let renderer = PlottersRenderer::new(256);

        let charts = vec![
            ChartData::Distribution {
                column: "age".to_string(),
                values: vec![21.0, 35.0, 35.0, 42.0, 58.0, 63.0],
            },
            ChartData::CategoryBar {
                column: "city".to_string(),
                counts: vec![("Paris".to_string(), 5), ("Lyon".to_string(), 2)],
                distinct: 2,
            },
            ChartData::CorrelationHeatmap {
                matrix: CorrelationMatrix {
                    columns: vec!["a".to_string(), "b".to_string()],
                    values: vec![vec![Some(1.0), Some(-0.5)], vec![Some(-0.5), Some(1.0)]],
                },
            },
        ];

        for (i, data) in charts.iter().enumerate() {
            let path = dir.join(format!("chart_{i}.png"));
            let result = renderer.render("test", data, &path);
            assert_square_or_render_error(result, &path, 256);
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unplottable_range_is_render_error() {
        let dir = scratch_dir();
        let path = dir.join("huge.png");
        let data = ChartData::Distribution {
            column: "x".to_string(),
            values: vec![-1e308, 1e308],
        };

        let result = PlottersRenderer::default().render("Distribution of x", &data, &path);
        assert!(matches!(result, Err(AppError::RenderError(_))));
        assert!(!path.exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unwritable_path_is_render_error() {
        let path = std::env::temp_dir()
            .join(format!("autolysis-missing-{}", uuid::Uuid::new_v4()))
            .join("chart.png");
        let data = ChartData::Distribution {
            column: "x".to_string(),
            values: vec![1.0, 2.0],
        };

        let result = PlottersRenderer::default().render("x", &data, &path);
        assert!(matches!(result, Err(AppError::RenderError(_))));
    }
}
