//! # Plot Module
//!
//! PNG rendering of QMS signals, photon flux and integration regions with the
//! `plotters` bitmap backend.
//!
//! Signal overviews use a logarithmic intensity axis; samples that are not
//! strictly positive are left out of those plots. Captions, axis titles and
//! legends use the system `sans-serif` font.

use std::fs;
use std::path::Path;

use plotters::prelude::*;

use crate::config::AnalysisConfig;
use crate::integrate::{Baseline, Series, Window, SECONDS_PER_MINUTE};

/// Errors that can occur while rendering a plot
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Nothing drawable in the input
    #[error("no plottable data: {0}")]
    NoData(String),

    /// Output directory could not be created
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Backend failure
    #[error("failed to render plot: {0}")]
    Drawing(String),
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for PlotError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        PlotError::Drawing(format!("{value:?}"))
    }
}

/// Size, colors and stroke used for every figure
#[derive(Clone, Debug)]
pub struct PlotStyle {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Line width in pixels
    pub line_width: u32,
    /// Background fill
    pub background: RGBColor,
    /// Trace colors, cycled
    pub palette: Vec<RGBColor>,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            line_width: 1,
            background: WHITE,
            palette: vec![
                RGBColor(31, 119, 180),
                RGBColor(255, 127, 14),
                RGBColor(44, 160, 44),
                RGBColor(214, 39, 40),
                RGBColor(148, 103, 189),
                RGBColor(140, 86, 75),
                RGBColor(227, 119, 194),
                RGBColor(127, 127, 127),
            ],
        }
    }
}

impl PlotStyle {
    /// Style derived from `figsize` and `linewidth`
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let (width, height) = config.figure_size_px();
        Self {
            width,
            height,
            line_width: (config.linewidth.round() as u32).max(1),
            ..Default::default()
        }
    }

    fn color(&self, idx: usize) -> RGBColor {
        self.palette
            .get(idx % self.palette.len().max(1))
            .copied()
            .unwrap_or(BLACK)
    }
}

/// One labelled line of a multi-trace plot
#[derive(Debug, Clone, Copy)]
pub struct Trace<'a> {
    /// Legend label
    pub label: &'a str,
    /// Abscissa
    pub x: &'a [f64],
    /// Ordinate
    pub y: &'a [f64],
}

/// Axis titles and figure caption
#[derive(Debug, Clone)]
pub struct Labels {
    /// Figure caption
    pub title: String,
    /// X axis description
    pub x: String,
    /// Y axis description
    pub y: String,
}

/// Render several traces on a log intensity axis
pub fn render_signals(
    path: &Path,
    traces: &[Trace<'_>],
    labels: &Labels,
    style: &PlotStyle,
) -> Result<(), PlotError> {
    let points: Vec<Vec<(f64, f64)>> = traces
        .iter()
        .map(|t| finite_points(t.x, t.y, true))
        .collect();
    let (x_range, y_range) = bounds(points.iter().flatten())
        .ok_or_else(|| PlotError::NoData(format!("no positive samples for {}", labels.title)))?;
    let y_range = log_padded(y_range);

    prepare_dir(path)?;
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&style.background)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(&labels.title, ("sans-serif", 20))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(padded(x_range), (y_range.0..y_range.1).log_scale())?;
    chart
        .configure_mesh()
        .x_desc(labels.x.as_str())
        .y_desc(labels.y.as_str())
        .y_label_formatter(&|v| format!("{:.0e}", v))
        .draw()?;

    for (idx, (trace, pts)) in traces.iter().zip(points).enumerate() {
        let color = style.color(idx);
        chart
            .draw_series(LineSeries::new(pts, color.stroke_width(style.line_width)))?
            .label(format!("Mass {}", trace.label))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }
    chart
        .configure_series_labels()
        .border_style(BLACK.mix(0.3))
        .background_style(style.background.mix(0.8))
        .draw()?;
    root.present()?;
    Ok(())
}

/// Render photon flux against time in minutes
pub fn render_photon_flux(
    path: &Path,
    flux: &Series,
    style: &PlotStyle,
) -> Result<(), PlotError> {
    let time_min = flux.time_minutes();
    let points = finite_points(&time_min, flux.values(), false);
    let (x_range, y_range) = bounds(points.iter())
        .ok_or_else(|| PlotError::NoData("photon flux series".to_string()))?;

    prepare_dir(path)?;
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&style.background)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Photon Flux vs Time", ("sans-serif", 20))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(padded(x_range), padded(y_range))?;
    chart
        .configure_mesh()
        .x_desc("Time (min)")
        .y_desc("Photon flux (photons cm⁻² s⁻¹)")
        .y_label_formatter(&|v| format!("{:.1e}", v))
        .draw()?;
    chart.draw_series(LineSeries::new(
        points,
        style.color(0).stroke_width(style.line_width),
    ))?;
    root.present()?;
    Ok(())
}

/// Render a signal over the integration window with its baseline and the
/// integrated region shaded
pub fn render_integration(
    path: &Path,
    series: &Series,
    window: &Window,
    baseline: &Baseline,
    labels: &Labels,
    style: &PlotStyle,
) -> Result<(), PlotError> {
    let range = series.window_indices(window);
    let time = &series.time()[range.clone()];
    let values = &series.values()[range];
    if time.len() < 2 {
        return Err(PlotError::NoData(format!(
            "fewer than two samples in window for {}",
            labels.title
        )));
    }

    let signal: Vec<(f64, f64)> = time
        .iter()
        .zip(values)
        .map(|(&t, &v)| (t / SECONDS_PER_MINUTE, v))
        .collect();
    let base: Vec<(f64, f64)> = time
        .iter()
        .map(|&t| (t / SECONDS_PER_MINUTE, baseline.at(t)))
        .collect();

    let (_, (y_min, y_max)) = bounds(signal.iter().chain(base.iter()))
        .ok_or_else(|| PlotError::NoData(labels.title.clone()))?;
    let margin = 0.2 * (y_max - y_min);
    let y_range = if margin > 0.0 {
        (y_min - margin)..(y_max + margin)
    } else {
        padded((y_min, y_max))
    };

    let mut region = signal.clone();
    region.extend(base.iter().rev().copied());

    prepare_dir(path)?;
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&style.background)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(&labels.title, ("sans-serif", 18))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(window.start_min()..window.end_min(), y_range)?;
    chart
        .configure_mesh()
        .x_desc(labels.x.as_str())
        .y_desc(labels.y.as_str())
        .y_label_formatter(&|v| format!("{:.1e}", v))
        .draw()?;

    let fill = style.color(0);
    chart
        .draw_series(std::iter::once(Polygon::new(region, fill.mix(0.3).filled())))?
        .label("Integrated area")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill.mix(0.3).filled()));
    chart
        .draw_series(LineSeries::new(signal, BLACK.stroke_width(style.line_width)))?
        .label("QMS signal")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));
    chart
        .draw_series(LineSeries::new(base, RED.stroke_width(style.line_width)))?
        .label("Baseline")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart
        .configure_series_labels()
        .border_style(BLACK.mix(0.3))
        .background_style(style.background.mix(0.8))
        .draw()?;
    root.present()?;
    Ok(())
}

/// File name of the integration plot for a mass label (`28.00` -> `integrated_mass_28_00.png`)
pub fn integration_file_name(label: &str) -> String {
    format!("integrated_mass_{}.png", label.replace('.', "_"))
}

fn finite_points(x: &[f64], y: &[f64], positive_only: bool) -> Vec<(f64, f64)> {
    x.iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite() && (!positive_only || **b > 0.0))
        .map(|(&a, &b)| (a, b))
        .collect()
}

type Bounds = ((f64, f64), (f64, f64));

fn bounds<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> Option<Bounds> {
    let mut out: Option<Bounds> = None;
    for &(x, y) in points {
        out = Some(match out {
            None => ((x, x), (y, y)),
            Some(((x0, x1), (y0, y1))) => ((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y))),
        });
    }
    out
}

fn padded((lo, hi): (f64, f64)) -> std::ops::Range<f64> {
    if hi > lo {
        lo..hi
    } else {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        (lo - pad)..(hi + pad)
    }
}

fn log_padded((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo / 2.0, hi * 2.0)
    }
}

fn prepare_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn peak() -> Series {
        let pairs: Vec<(f64, f64)> = (0..=120)
            .map(|i| {
                let t = i as f64;
                (t, 1e-10 + 5e-10 * (-((t - 60.0) / 10.0).powi(2)).exp())
            })
            .collect();
        Series::from_pairs(&pairs).unwrap()
    }

    fn labels() -> Labels {
        Labels {
            title: "Mass 28.00".to_string(),
            x: "Time (min)".to_string(),
            y: "Intensity (A)".to_string(),
        }
    }

    #[test]
    fn test_integration_file_name() {
        assert_eq!(integration_file_name("28.00"), "integrated_mass_28_00.png");
    }

    #[test]
    fn test_render_signals_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plots/signals.png");
        let series = peak();
        let x = series.time_minutes();
        let traces = [Trace {
            label: "28.00",
            x: &x,
            y: series.values(),
        }];

        render_signals(&path, &traces, &labels(), &PlotStyle::default()).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_render_integration_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("integrated_mass_28_00.png");
        let window = Window::from_seconds(30.0, 90.0).unwrap();
        let baseline = Baseline::Constant { level: 1e-10 };

        render_integration(&path, &peak(), &window, &baseline, &labels(), &PlotStyle::default())
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_render_photon_flux_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photon_flux.png");
        let flux = crate::photon::flux_series(&peak(), 1.924e22);

        render_photon_flux(&path, &flux, &PlotStyle::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_signals_without_positive_samples() {
        let dir = tempdir().unwrap();
        let traces = [Trace {
            label: "18.00",
            x: &[0.0, 1.0],
            y: &[0.0, -1.0],
        }];
        let err = render_signals(
            &dir.path().join("none.png"),
            &traces,
            &labels(),
            &PlotStyle::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PlotError::NoData(_)));
    }

    #[test]
    fn test_style_from_config() {
        let config = AnalysisConfig {
            figsize: [6.0, 4.0],
            linewidth: 2.4,
            ..Default::default()
        };
        let style = PlotStyle::from_config(&config);
        assert_eq!((style.width, style.height), (600, 400));
        assert_eq!(style.line_width, 2);
    }

    #[test]
    fn test_bounds_and_padding() {
        let pts = [(1.0, 5.0), (3.0, -2.0)];
        assert_eq!(bounds(pts.iter()), Some(((1.0, 3.0), (-2.0, 5.0))));
        assert_eq!(bounds([].iter()), None);
        assert_eq!(padded((10.0, 10.0)), 9.0..11.0);
        assert_eq!(padded((0.0, 0.0)), -1.0..1.0);
    }
}
