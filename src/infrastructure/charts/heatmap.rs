use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{draw_err, palette};
use crate::domain::error::Result;
use crate::domain::statistics::CorrelationMatrix;

const LABEL_SPACE: i32 = 150;
const COLORBAR_SPACE: i32 = 90;
const COLORBAR_STEPS: i32 = 40;

/// Cell annotation: two decimals, `n/a` where undefined
pub fn cell_label(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

/// Draws the matrix directly in pixel space so cells stay square
pub fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    matrix: &CorrelationMatrix,
) -> Result<()> {
    let area = root.titled(title, ("sans-serif", 30)).map_err(draw_err)?;
    let (width, height) = area.dim_in_pixel();
    let n = matrix.len().max(1) as i32;

    let grid = (width as i32 - LABEL_SPACE - COLORBAR_SPACE - 20)
        .min(height as i32 - LABEL_SPACE - 20)
        .max(n);
    let cell = grid / n;
    let grid = cell * n;
    let (x0, y0) = (LABEL_SPACE, 10);

    let font_size = (cell / 4).clamp(8, 20) as f64;
    let dark_text = TextStyle::from(("sans-serif", font_size).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let light_text = dark_text.color(&WHITE);

    for (i, row) in matrix.values.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let (cx, cy) = (x0 + j as i32 * cell, y0 + i as i32 * cell);
            let fill = value.map(palette::coolwarm).unwrap_or(palette::UNDEFINED);

            area.draw(&Rectangle::new(
                [(cx, cy), (cx + cell, cy + cell)],
                fill.filled(),
            ))
            .map_err(draw_err)?;
            area.draw(&Rectangle::new(
                [(cx, cy), (cx + cell, cy + cell)],
                WHITE.stroke_width(1),
            ))
            .map_err(draw_err)?;

            let style = match value {
                Some(v) if palette::needs_light_text(*v) => light_text.clone(),
                _ => dark_text.clone(),
            };
            area.draw(&Text::new(
                cell_label(*value),
                (cx + cell / 2, cy + cell / 2),
                style,
            ))
            .map_err(draw_err)?;
        }
    }

    let label_font = font_size.max(12.0);
    let row_style = TextStyle::from(("sans-serif", label_font).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    let col_style = TextStyle::from(("sans-serif", label_font).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));

    for (i, name) in matrix.columns.iter().enumerate() {
        let offset = i as i32 * cell + cell / 2;
        area.draw(&Text::new(name.clone(), (x0 - 8, y0 + offset), row_style.clone()))
            .map_err(draw_err)?;
        area.draw(&Text::new(name.clone(), (x0 + offset, y0 + grid + 8), col_style.clone()))
            .map_err(draw_err)?;
    }

    // Colour bar from +1 (top) to -1 (bottom)
    let bar_x = x0 + grid + 30;
    let step = (grid / COLORBAR_STEPS).max(1);
    for s in 0..COLORBAR_STEPS {
        let value = 1.0 - 2.0 * (s as f64 + 0.5) / COLORBAR_STEPS as f64;
        let y = y0 + s * step;
        area.draw(&Rectangle::new(
            [(bar_x, y), (bar_x + 20, y + step)],
            palette::coolwarm(value).filled(),
        ))
        .map_err(draw_err)?;
    }

    let tick_style = TextStyle::from(("sans-serif", 12.0).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let ticks = [
        ("1.0", y0),
        ("0.0", y0 + step * COLORBAR_STEPS / 2),
        ("-1.0", y0 + step * COLORBAR_STEPS),
    ];
    for (label, y) in ticks {
        area.draw(&Text::new(label, (bar_x + 26, y), tick_style.clone()))
            .map_err(draw_err)?;
    }

    Ok(())
}
