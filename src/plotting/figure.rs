//! Rendering context: an explicit figure that accumulates plot commands
//! until a backend draws it.

use super::colormap::{Colormap, Normalize, Rgb};
use crate::error::{Error, Result};
use crate::physics::Scalar;

/// Default matplotlib-style line width in points
pub const DEFAULT_LINE_WIDTH: Scalar = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aspect {
    /// Axes scaled independently to fill the plot area
    #[default]
    Auto,
    /// One data unit spans the same length on both axes
    Equal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Cross,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointColors {
    Uniform(Rgb),
    /// One value per point, colored through the scatter's colormap
    Mapped { values: Vec<Scalar>, norm: Normalize },
}

impl Default for PointColors {
    fn default() -> Self {
        PointColors::Uniform(Rgb::TAB_BLUE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub width: Scalar,
    pub color: Rgb,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_LINE_WIDTH,
            color: Rgb::TAB_BLUE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub xs: Vec<Scalar>,
    pub ys: Vec<Scalar>,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub xs: Vec<Scalar>,
    pub ys: Vec<Scalar>,
    pub marker: Marker,
    /// Marker area in points²
    pub size: Scalar,
    pub colors: PointColors,
    /// Colormap current when the scatter was added
    pub colormap: Colormap,
}

impl ScatterSeries {
    /// Resolved color of point `index`
    pub fn color_of(&self, index: usize) -> Rgb {
        match &self.colors {
            PointColors::Uniform(color) => *color,
            PointColors::Mapped { values, norm } => values
                .get(index)
                .map(|value| self.colormap.map(*value, norm))
                .unwrap_or(Rgb::BLACK),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    Line(LineSeries),
    Scatter(ScatterSeries),
}

impl Artist {
    fn points(&self) -> impl Iterator<Item = (Scalar, Scalar)> + '_ {
        let (xs, ys) = match self {
            Artist::Line(line) => (&line.xs, &line.ys),
            Artist::Scatter(scatter) => (&scatter.xs, &scatter.ys),
        };
        xs.iter().copied().zip(ys.iter().copied())
    }
}

/// Axis-aligned extent of all finite plotted points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: Scalar,
    pub x_max: Scalar,
    pub y_min: Scalar,
    pub y_max: Scalar,
}

/// A figure with a single set of axes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Figure {
    title: Option<String>,
    x_label: Option<String>,
    y_label: Option<String>,
    colormap: Colormap,
    aspect: Aspect,
    artists: Vec<Artist>,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every recorded command and restores the defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.x_label = Some(label.into());
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.y_label = Some(label.into());
    }

    /// Colormap used by subsequent value-mapped scatters
    pub fn set_colormap(&mut self, colormap: Colormap) {
        self.colormap = colormap;
    }

    pub fn set_aspect(&mut self, aspect: Aspect) {
        self.aspect = aspect;
    }

    /// Adds a connected line through the points in the given order.
    pub fn plot(&mut self, xs: Vec<Scalar>, ys: Vec<Scalar>, style: LineStyle) -> Result<()> {
        check_lengths("line y values", &xs, ys.len())?;
        self.artists.push(Artist::Line(LineSeries { xs, ys, style }));
        Ok(())
    }

    /// Adds a scatter of markers. Empty input records nothing.
    pub fn scatter(
        &mut self,
        xs: Vec<Scalar>,
        ys: Vec<Scalar>,
        marker: Marker,
        size: Scalar,
        colors: PointColors,
    ) -> Result<()> {
        check_lengths("scatter y values", &xs, ys.len())?;
        if let PointColors::Mapped { values, .. } = &colors {
            check_lengths("scatter color values", &xs, values.len())?;
        }
        if xs.is_empty() {
            return Ok(());
        }
        self.artists.push(Artist::Scatter(ScatterSeries {
            xs,
            ys,
            marker,
            size,
            colors,
            colormap: self.colormap,
        }));
        Ok(())
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn x_label(&self) -> Option<&str> {
        self.x_label.as_deref()
    }

    pub fn y_label(&self) -> Option<&str> {
        self.y_label.as_deref()
    }

    pub fn colormap(&self) -> Colormap {
        self.colormap
    }

    pub fn aspect(&self) -> Aspect {
        self.aspect
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineSeries> {
        self.artists.iter().filter_map(|artist| match artist {
            Artist::Line(line) => Some(line),
            Artist::Scatter(_) => None,
        })
    }

    pub fn scatters(&self) -> impl Iterator<Item = &ScatterSeries> {
        self.artists.iter().filter_map(|artist| match artist {
            Artist::Scatter(scatter) => Some(scatter),
            Artist::Line(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    /// Extent of all finite points, or `None` when nothing is plotted.
    pub fn data_bounds(&self) -> Option<Bounds> {
        self.artists
            .iter()
            .flat_map(|artist| artist.points())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .fold(None, |bounds: Option<Bounds>, (x, y)| {
                Some(match bounds {
                    None => Bounds {
                        x_min: x,
                        x_max: x,
                        y_min: y,
                        y_max: y,
                    },
                    Some(b) => Bounds {
                        x_min: b.x_min.min(x),
                        x_max: b.x_max.max(x),
                        y_min: b.y_min.min(y),
                        y_max: b.y_max.max(y),
                    },
                })
            })
    }
}

fn check_lengths(what: &str, xs: &[Scalar], found: usize) -> Result<()> {
    if xs.len() != found {
        return Err(Error::shape_mismatch(what, xs.len(), found));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_figure_is_blank() {
        let figure = Figure::new();
        assert!(figure.is_empty());
        assert_eq!(figure.title(), None);
        assert_eq!(figure.aspect(), Aspect::Auto);
        assert_eq!(figure.data_bounds(), None);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut figure = Figure::new();
        figure.set_title("t");
        figure.set_colormap(Colormap::Greys);
        figure.set_aspect(Aspect::Equal);
        figure
            .plot(vec![0.0, 1.0], vec![1.0, 2.0], LineStyle::default())
            .unwrap();

        figure.reset();
        assert_eq!(figure, Figure::new());
    }

    #[test]
    fn test_plot_rejects_mismatched_lengths() {
        let mut figure = Figure::new();
        let err = figure
            .plot(vec![0.0, 1.0, 2.0], vec![1.0], LineStyle::default())
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
        assert!(figure.is_empty());
    }

    #[test]
    fn test_empty_scatter_is_a_no_op() {
        let mut figure = Figure::new();
        figure
            .scatter(vec![], vec![], Marker::Cross, 50.0, PointColors::default())
            .unwrap();
        assert!(figure.is_empty());
    }

    #[test]
    fn test_mapped_scatter_needs_one_value_per_point() {
        let mut figure = Figure::new();
        let colors = PointColors::Mapped {
            values: vec![0.0],
            norm: Normalize::new(0.0, 1.0),
        };
        let err = figure
            .scatter(vec![0.0, 1.0], vec![0.0, 1.0], Marker::Circle, 1.0, colors)
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
    }

    #[test]
    fn test_scatter_captures_current_colormap() {
        let mut figure = Figure::new();
        figure.set_colormap(Colormap::Greys);
        let colors = PointColors::Mapped {
            values: vec![0.0, 1.0],
            norm: Normalize::new(0.0, 1.0),
        };
        figure
            .scatter(vec![0.0, 1.0], vec![0.0, 1.0], Marker::Circle, 1.0, colors)
            .unwrap();
        figure.set_colormap(Colormap::Viridis);

        let scatter = figure.scatters().next().unwrap();
        assert_eq!(scatter.colormap, Colormap::Greys);
        assert_eq!(scatter.color_of(0), Rgb::WHITE);
        assert_eq!(scatter.color_of(1), Rgb::BLACK);
    }

    #[test]
    fn test_data_bounds_skip_non_finite_points() {
        let mut figure = Figure::new();
        figure
            .plot(
                vec![-1.0, 2.0, Scalar::NAN],
                vec![0.5, 3.0, 1.0],
                LineStyle::default(),
            )
            .unwrap();
        figure
            .scatter(
                vec![4.0],
                vec![-2.0],
                Marker::Circle,
                1.0,
                PointColors::default(),
            )
            .unwrap();

        let bounds = figure.data_bounds().unwrap();
        assert_eq!(bounds.x_min, -1.0);
        assert_eq!(bounds.x_max, 4.0);
        assert_eq!(bounds.y_min, -2.0);
        assert_eq!(bounds.y_max, 3.0);
    }
}
