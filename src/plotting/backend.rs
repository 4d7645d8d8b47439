//! Draws a recorded [`Figure`] with plotters.

use super::colormap::Rgb;
use super::figure::{Artist, Aspect, Bounds, Figure, Marker};
use crate::error::{Error, Result};
use crate::physics::Scalar;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const MARGIN: u32 = 10;
const X_LABEL_AREA: u32 = 40;
const Y_LABEL_AREA: u32 = 70;
const CAPTION_HEIGHT: u32 = 40;
const CAPTION_FONT_SIZE: f64 = 22.0;
const LABEL_FONT_SIZE: f64 = 16.0;
/// Fraction of the data range added on each side
const DATA_PADDING: Scalar = 0.05;
const POINTS_PER_INCH: Scalar = 72.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("svg") => Ok(OutputFormat::Svg),
            Some("png") => Ok(OutputFormat::Png),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Pixels per inch, used to turn marker areas in points² into pixels
    pub dpi: Scalar,
    pub font_family: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            dpi: 100.0,
            font_family: "sans-serif".to_string(),
        }
    }
}

impl RenderSettings {
    /// Approximate pixel size of the plotting area inside the axes.
    fn plot_area(&self, has_caption: bool) -> (Scalar, Scalar) {
        let caption = if has_caption { CAPTION_HEIGHT } else { 0 };
        let width = self.width.saturating_sub(Y_LABEL_AREA + 2 * MARGIN).max(1);
        let height = self
            .height
            .saturating_sub(X_LABEL_AREA + caption + 2 * MARGIN)
            .max(1);
        (width as Scalar, height as Scalar)
    }

    /// Pixel radius of a marker whose area is `size` points².
    pub fn marker_radius(&self, size: Scalar) -> u32 {
        let radius = libm::sqrt(size.max(0.0)) / 2.0 * self.dpi / POINTS_PER_INCH;
        (libm::round(radius) as u32).max(1)
    }

    /// Whole-pixel stroke width for a line width in points.
    pub fn stroke_width(&self, width: Scalar) -> u32 {
        let pixels = width.max(0.0) * self.dpi / POINTS_PER_INCH;
        (libm::ceil(pixels) as u32).max(1)
    }
}

/// Renders `figure` to `path`, choosing the backend from the file extension.
pub fn render_to_file(figure: &Figure, path: &Path, settings: &RenderSettings) -> Result<()> {
    let size = (settings.width, settings.height);
    match OutputFormat::from_path(path)? {
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_figure(figure, &root, settings)?;
            root.present().map_err(render_error)?;
        }
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_figure(figure, &root, settings)?;
            root.present().map_err(render_error)?;
        }
    }
    debug!("Rendered figure to {}", path.display());
    Ok(())
}

/// Renders `figure` as an SVG document.
pub fn render_to_svg_string(figure: &Figure, settings: &RenderSettings) -> Result<String> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, (settings.width, settings.height))
            .into_drawing_area();
        draw_figure(figure, &root, settings)?;
        root.present().map_err(render_error)?;
    }
    Ok(buffer)
}

fn render_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Render(err.to_string())
}

fn to_color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

/// Axis ranges for the figure: padded data bounds, widened on one axis when
/// the aspect ratio is fixed.
pub fn axis_ranges(figure: &Figure, settings: &RenderSettings) -> Bounds {
    let bounds = figure.data_bounds().unwrap_or(Bounds {
        x_min: 0.0,
        x_max: 1.0,
        y_min: 0.0,
        y_max: 1.0,
    });
    let (mut x_min, mut x_max) = padded(bounds.x_min, bounds.x_max);
    let (mut y_min, mut y_max) = padded(bounds.y_min, bounds.y_max);

    if figure.aspect() == Aspect::Equal {
        let (width, height) = settings.plot_area(figure.title().is_some());
        let x_per_pixel = (x_max - x_min) / width;
        let y_per_pixel = (y_max - y_min) / height;
        if x_per_pixel > y_per_pixel {
            let half = x_per_pixel * height / 2.0;
            let center = (y_min + y_max) / 2.0;
            (y_min, y_max) = (center - half, center + half);
        } else {
            let half = y_per_pixel * width / 2.0;
            let center = (x_min + x_max) / 2.0;
            (x_min, x_max) = (center - half, center + half);
        }
    }

    Bounds {
        x_min,
        x_max,
        y_min,
        y_max,
    }
}

fn padded(min: Scalar, max: Scalar) -> (Scalar, Scalar) {
    let span = max - min;
    if span > 0.0 {
        (min - span * DATA_PADDING, max + span * DATA_PADDING)
    } else {
        let half = if min.abs() > 0.0 { min.abs() * DATA_PADDING } else { 0.5 };
        (min - half, max + half)
    }
}

fn draw_figure<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
    settings: &RenderSettings,
) -> Result<()> {
    root.fill(&WHITE).map_err(render_error)?;

    let ranges = axis_ranges(figure, settings);
    let family = settings.font_family.as_str();

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA);
    if let Some(title) = figure.title() {
        builder.caption(title, (family, CAPTION_FONT_SIZE).into_font());
    }
    let mut chart = builder
        .build_cartesian_2d(ranges.x_min..ranges.x_max, ranges.y_min..ranges.y_max)
        .map_err(render_error)?;

    let mut mesh = chart.configure_mesh();
    mesh.label_style((family, LABEL_FONT_SIZE).into_font());
    if let Some(label) = figure.x_label() {
        mesh.x_desc(label);
    }
    if let Some(label) = figure.y_label() {
        mesh.y_desc(label);
    }
    mesh.draw().map_err(render_error)?;

    for artist in figure.artists() {
        match artist {
            Artist::Line(line) => {
                let style = to_color(line.style.color)
                    .stroke_width(settings.stroke_width(line.style.width));
                chart
                    .draw_series(LineSeries::new(
                        line.xs.iter().copied().zip(line.ys.iter().copied()),
                        style,
                    ))
                    .map_err(render_error)?;
            }
            Artist::Scatter(scatter) => {
                let radius = settings.marker_radius(scatter.size);
                let points = scatter.xs.iter().copied().zip(scatter.ys.iter().copied());
                match scatter.marker {
                    Marker::Circle => {
                        chart
                            .draw_series(points.enumerate().map(|(index, point)| {
                                Circle::new(point, radius, to_color(scatter.color_of(index)).filled())
                            }))
                            .map_err(render_error)?;
                    }
                    Marker::Cross => {
                        chart
                            .draw_series(points.enumerate().map(|(index, point)| {
                                Cross::new(
                                    point,
                                    radius,
                                    to_color(scatter.color_of(index)).stroke_width(2),
                                )
                            }))
                            .map_err(render_error)?;
                    }
                }
            }
        }
    }

    Ok(())
}
