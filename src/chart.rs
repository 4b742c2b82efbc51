use crate::dataset::{Dataset, Metric};

/// Tableau10 qualitative palette, assigned to series positionally on every
/// render.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (78, 121, 167),
    (242, 142, 43),
    (225, 87, 89),
    (118, 183, 178),
    (89, 161, 79),
    (237, 201, 72),
    (176, 122, 161),
    (255, 157, 167),
    (156, 117, 95),
    (186, 176, 172),
];

/// Target tick count for both axes.
pub const TICK_COUNT: usize = 10;

pub const X_LABEL: &str = "Age (years)";

/// How Y-axis tick labels are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    Plain,
    PercentInt,
    PercentOneDecimal,
}

/// One player's polyline: `(age, value)` points in increasing age order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub player: String,
    pub color: (u8, u8, u8),
    pub points: Vec<(f64, f64)>,
}

/// A fully computed chart, independent of any rendering backend. The X domain
/// is the raw union extent of ages; the Y domain is niced to clean tick
/// boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub metric: Metric,
    pub title: String,
    pub y_label: String,
    pub x_domain: [f64; 2],
    pub y_domain: [f64; 2],
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    pub y_format: TickFormat,
    pub series: Vec<ChartSeries>,
}

/// Builds the chart for one metric from the chosen players' series, or `None`
/// when nothing would be drawn.
pub fn build_chart(metric: Metric, dataset: &Dataset, players: &[String]) -> Option<ChartSpec> {
    let series: Vec<ChartSeries> = players
        .iter()
        .filter_map(|player| {
            let points = dataset.series(player, metric);
            if points.is_empty() {
                return None;
            }
            Some((player.clone(), points))
        })
        .enumerate()
        .map(|(i, (player, points))| ChartSeries {
            player,
            color: PALETTE[i % PALETTE.len()],
            points,
        })
        .collect();

    let x_domain = extent(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)))?;
    let y_raw = extent(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)))?;
    let y_domain = nice(y_raw.0, y_raw.1, TICK_COUNT);

    let x_ticks = ticks(x_domain.0, x_domain.1, TICK_COUNT);
    let y_ticks = ticks(y_domain.0, y_domain.1, TICK_COUNT);
    let y_format = if metric.is_percentage() {
        percent_format(&y_ticks)
    } else {
        TickFormat::Plain
    };

    Some(ChartSpec {
        metric,
        title: metric.title().to_string(),
        y_label: metric.y_label().to_string(),
        x_domain: [x_domain.0, x_domain.1],
        y_domain: [y_domain.0, y_domain.1],
        x_ticks,
        y_ticks,
        y_format,
        series,
    })
}

/// `[min, max]` of a numeric sequence, `None` when empty.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    for value in values {
        range = Some(match range {
            None => (value, value),
            Some((min, max)) => (min.min(value), max.max(value)),
        });
    }
    range
}

// Tick step selection in the d3 manner: steps are 1/2/5/10 times a power of
// ten, picked by the sqrt(2)/sqrt(10)/sqrt(50) thresholds. A negative return
// encodes a fractional step as -1/step so tick positions stay exact.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    const E10: f64 = 7.071067811865476; // sqrt(50)
    const E5: f64 = 3.1622776601683795; // sqrt(10)
    const E2: f64 = std::f64::consts::SQRT_2;

    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Expands `[start, stop]` outward to tick-step boundaries.
pub fn nice(start: f64, stop: f64, count: usize) -> (f64, f64) {
    let (mut start, mut stop) = (start, stop);
    let mut prestep = 0.0;
    // The step can change once the domain widens; settle in a couple passes.
    for _ in 0..4 {
        let step = tick_increment(start, stop, count);
        if step == prestep || step == 0.0 || !step.is_finite() {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else {
            // Fractional step encoded as -1/step.
            let inv = -step;
            start = (start * inv).floor() / inv;
            stop = (stop * inv).ceil() / inv;
        }
        prestep = step;
    }
    (start, stop)
}

/// Tick positions inside `[start, stop]`, roughly `count` of them, at clean
/// boundaries.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if start == stop {
        return vec![start];
    }
    let step = tick_increment(start, stop, count);
    if step == 0.0 || !step.is_finite() {
        return vec![start];
    }
    // Round to the nearest step multiple, then nudge endpoints back inside
    // the domain; plain ceil/floor is too sensitive to representation error.
    if step > 0.0 {
        let mut i0 = (start / step).round() as i64;
        let mut i1 = (stop / step).round() as i64;
        if (i0 as f64) * step < start {
            i0 += 1;
        }
        if (i1 as f64) * step > stop {
            i1 -= 1;
        }
        (i0..=i1).map(|i| i as f64 * step).collect()
    } else {
        let inv = -step;
        let mut i0 = (start * inv).round() as i64;
        let mut i1 = (stop * inv).round() as i64;
        if (i0 as f64) / inv < start {
            i0 += 1;
        }
        if (i1 as f64) / inv > stop {
            i1 -= 1;
        }
        (i0..=i1).map(|i| i as f64 / inv).collect()
    }
}

/// Percentage label precision: when the top tick scaled to percent exceeds
/// the tick count, whole percents are readable; below that, one decimal digit
/// is needed to tell ticks apart.
pub fn percent_format(ticks: &[f64]) -> TickFormat {
    let max_tick = ticks.last().copied().unwrap_or(0.0) * 100.0;
    if max_tick > ticks.len() as f64 {
        TickFormat::PercentInt
    } else {
        TickFormat::PercentOneDecimal
    }
}

/// Renders one tick value for display.
pub fn format_tick(value: f64, format: TickFormat) -> String {
    match format {
        TickFormat::Plain => {
            // Trim trailing zeros so 2.50 reads as 2.5 and 3.00 as 3.
            let text = format!("{value:.2}");
            let trimmed = text.trim_end_matches('0').trim_end_matches('.');
            trimmed.to_string()
        }
        TickFormat::PercentInt => format!("{:.0}%", value * 100.0),
        TickFormat::PercentOneDecimal => format!("{:.1}%", value * 100.0),
    }
}
