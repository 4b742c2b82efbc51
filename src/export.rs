use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use plotters::prelude::*;

use crate::chart::{ChartSpec, X_LABEL, format_tick};
use crate::dataset::Metric;

// Geometry of the rasterized chart: an 800x500 plot with 60/10/50/50
// margins and a 200px legend column.
pub const PLOT_WIDTH: u32 = 800;
pub const PLOT_HEIGHT: u32 = 500;
pub const MARGIN_LEFT: u32 = 60;
pub const MARGIN_RIGHT: u32 = 10;
pub const MARGIN_TOP: u32 = 50;
pub const MARGIN_BOTTOM: u32 = 50;
pub const LEGEND_WIDTH: u32 = 200;

pub const IMAGE_WIDTH: u32 = PLOT_WIDTH + MARGIN_LEFT + MARGIN_RIGHT + LEGEND_WIDTH;
pub const IMAGE_HEIGHT: u32 = PLOT_HEIGHT + MARGIN_TOP + MARGIN_BOTTOM;

/// A finished PNG on disk, recorded so the UI can surface it per chart.
#[derive(Debug, Clone)]
pub struct ExportedChart {
    pub metric: Metric,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Rasterizes one built chart to `dir/<metric>-<stamp>.png`. The background
/// is filled white first; the chart itself assumes nothing underneath.
pub fn export_chart_png(spec: &ChartSpec, dir: &Path, stamp: &str) -> Result<ExportedChart> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create export dir {}", dir.display()))?;
    let path = dir.join(format!("{}-{stamp}.png", spec.metric.slug()));

    draw_png(spec, &path).map_err(|err| anyhow!("render {}: {err}", path.display()))?;

    Ok(ExportedChart {
        metric: spec.metric,
        path,
        width: IMAGE_WIDTH,
        height: IMAGE_HEIGHT,
    })
}

// Kept separate because the plotters error type borrows the backend and
// can't cross `?` into anyhow directly.
fn draw_png(spec: &ChartSpec, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (IMAGE_WIDTH, IMAGE_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_format = spec.y_format;
    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 28))
        .margin_top(MARGIN_TOP / 2)
        .margin_bottom(10)
        .margin_right(LEGEND_WIDTH + MARGIN_RIGHT)
        .x_label_area_size(MARGIN_BOTTOM)
        .y_label_area_size(MARGIN_LEFT)
        .build_cartesian_2d(
            spec.x_domain[0]..spec.x_domain[1],
            spec.y_domain[0]..spec.y_domain[1],
        )?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(spec.y_label.clone())
        .x_labels(spec.x_ticks.len().max(2))
        .y_labels(spec.y_ticks.len().max(2))
        .y_label_formatter(&|value| format_tick(*value, y_format))
        .draw()?;

    for series in &spec.series {
        let (r, g, b) = series.color;
        let color = RGBColor(r, g, b);
        chart
            .draw_series(LineSeries::new(
                series.points.iter().copied(),
                color.stroke_width(2),
            ))?
            .label(series.player.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 8), (x + 16, y + 8)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE)
        .border_style(&RGBColor(200, 200, 200))
        .draw()?;

    root.present()?;
    Ok(())
}
