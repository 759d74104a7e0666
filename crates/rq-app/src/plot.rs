//! PNG rendering of the analysis views.

use std::path::Path;
use std::sync::OnceLock;

use plotters::chart::SeriesLabelPosition;
use plotters::prelude::*;
use plotters::style::FontStyle;

/// Boxed error covering the plotters backend error family.
pub type PlotError = Box<dyn std::error::Error + Send + Sync>;

/// Embedded font: the pure-Rust text backend has no system font lookup,
/// so every chart family has to be registered explicitly.
static BUNDLED_FONT: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

static FONT_INIT: OnceLock<bool> = OnceLock::new();

/// Register the bundled font once, before the first chart draws text.
pub fn ensure_fonts() {
    FONT_INIT.get_or_init(|| {
        let registered =
            plotters::style::register_font("sans-serif", FontStyle::Normal, BUNDLED_FONT).is_ok();
        if !registered {
            log::warn!("police embarquée invalide, textes des graphiques absents");
        }
        registered
    });
}

/// One labelled line on a chart.
pub struct PlotSeries {
    pub label: String,
    pub color: RGBColor,
    pub points: Vec<(f64, f64)>,
}

/// Calculate a plot range with padding.
/// Adds 15% padding, or a fixed padding for degenerate ranges.
#[must_use]
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

fn series_bounds(series: &[PlotSeries]) -> ((f64, f64), (f64, f64)) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for s in series {
        for &(x, y) in &s.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    if !x_min.is_finite() {
        return ((0.0, 1.0), (0.0, 1.0));
    }
    ((x_min, x_max), calculate_range(y_min, y_max))
}

/// Render labelled line series to a PNG chart.
///
/// # Errors
/// Fails when the backend cannot draw or write the file.
pub fn render_lines(
    path: &Path,
    title: &str,
    x_label: &str,
    y_label: &str,
    series: &[PlotSeries],
    dimensions: (u32, u32),
) -> Result<(), PlotError> {
    ensure_fonts();
    let ((x_min, x_max), (y_min, y_max)) = series_bounds(series);

    let root = BitMapBackend::new(path, dimensions).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(64)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .light_line_style(WHITE.mix(0.6))
        .draw()?;

    for s in series {
        let color = s.color;
        chart
            .draw_series(LineSeries::new(s.points.iter().copied(), &color))?
            .label(s.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Render a probability density histogram to a PNG chart.
///
/// # Errors
/// Fails when the backend cannot draw or write the file.
pub fn render_histogram(
    path: &Path,
    title: &str,
    bin_centers: &[f64],
    density: &[f64],
    bin_width: f64,
    color: RGBColor,
    dimensions: (u32, u32),
) -> Result<(), PlotError> {
    ensure_fonts();
    let x_min = bin_centers.first().map_or(0.0, |c| c - bin_width / 2.0);
    let x_max = bin_centers.last().map_or(1.0, |c| c + bin_width / 2.0);
    let y_max = density.iter().copied().fold(0.0_f64, f64::max);
    let (_, y_max) = calculate_range(0.0, y_max);

    let root = BitMapBackend::new(path, dimensions).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(64)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Amplitude")
        .y_desc("Density")
        .draw()?;

    chart.draw_series(bin_centers.iter().zip(density).map(|(&center, &d)| {
        Rectangle::new(
            [(center - bin_width / 2.0, 0.0), (center + bin_width / 2.0, d)],
            color.mix(0.6).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_padding() {
        let (min, max) = calculate_range(-1.0, 1.0);
        assert!((min - -1.3).abs() < 1e-12);
        assert!((max - 1.3).abs() < 1e-12);
        // Degenerate range falls back to fixed padding.
        let (min, max) = calculate_range(2.0, 2.0);
        assert!((min - 1.5).abs() < 1e-12);
        assert!((max - 2.5).abs() < 1e-12);
        // Reversed input is normalized.
        let (min, max) = calculate_range(1.0, -1.0);
        assert!(min < max);
    }

    #[test]
    fn line_chart_writes_a_png() -> Result<(), PlotError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("lines.png");
        let series = vec![PlotSeries {
            label: "ramp".to_string(),
            color: BLUE,
            points: (0..64).map(|i| (f64::from(i), f64::from(i) * 0.5)).collect(),
        }];
        render_lines(&path, "test", "x", "y", &series, (320, 200))?;
        let metadata = std::fs::metadata(&path)?;
        assert!(metadata.len() > 0);
        Ok(())
    }

    #[test]
    fn histogram_writes_a_png() -> Result<(), PlotError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("hist.png");
        let centers: Vec<f64> = (0..10).map(|i| f64::from(i) * 0.1 + 0.05).collect();
        let density = vec![1.0; 10];
        render_histogram(&path, "test", &centers, &density, 0.1, RED, (320, 200))?;
        assert!(std::fs::metadata(&path)?.len() > 0);
        Ok(())
    }
}
