use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{draw_err, palette};
use crate::domain::error::Result;

const MAX_LABEL_CHARS: usize = 14;

fn short_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{}…", head)
    }
}

pub fn draw_category_bar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    column: &str,
    counts: &[(String, usize)],
) -> Result<()> {
    let n = counts.len().max(1) as u32;
    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let top = ((max_count as f64) * 1.15).ceil() as u32 + 1;
    let labels: Vec<String> = counts.iter().map(|(label, _)| short_label(label)).collect();

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..n).into_segmented(), 0u32..top)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc(column)
        .y_desc("Count")
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(palette::BAR.filled())
                .margin(8)
                .data(
                    counts
                        .iter()
                        .enumerate()
                        .map(|(i, (_, count))| (i as u32, *count as u32)),
                ),
        )
        .map_err(draw_err)?;

    let annotation = TextStyle::from(("sans-serif", 16.0).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    chart
        .draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
            Text::new(
                count.to_string(),
                (SegmentValue::CenterOf(i as u32), *count as u32),
                annotation.clone(),
            )
        }))
        .map_err(draw_err)?;

    Ok(())
}
