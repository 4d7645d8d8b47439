use super::colormap::{Colormap, Normalize, Rgb};
use super::figure::{Aspect, Figure, LineStyle, Marker, PointColors};
use crate::error::{Error, Result};
use crate::physics::math::{Scalar, SnapshotSeriesView};
use ndarray::{ArrayView1, Axis, s};
use serde::{Deserialize, Serialize};

/// Visual parameters of a trajectory plot
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrajectoryStyle {
    pub colormap: Colormap,
    /// Area of the initial-position cross, in points²
    pub initial_marker_size: Scalar,
    /// Width of the line joining each trajectory's points
    pub line_width: Scalar,
}

impl Default for TrajectoryStyle {
    fn default() -> Self {
        Self {
            colormap: Colormap::GistRainbow,
            initial_marker_size: 50.0,
            line_width: 0.5,
        }
    }
}

/// Marker area for particle `index`; later particles are drawn larger.
pub fn trajectory_point_size(index: usize) -> Scalar {
    0.5 * (index + 1) as Scalar
}

/// Draws every particle's path in the x/y plane, colored by time.
///
/// `rs` is `(timesteps, dim, N)` with `dim >= 2`; axes 0 and 1 are plotted.
/// Colors are normalized over `[0, iteration_time]` so separate runs share a
/// scale.
pub fn plot_trajectories(
    figure: &mut Figure,
    rs: SnapshotSeriesView<'_>,
    ts: ArrayView1<'_, Scalar>,
    iteration_time: Scalar,
) -> Result<()> {
    plot_trajectories_with(figure, rs, ts, iteration_time, &TrajectoryStyle::default())
}

pub fn plot_trajectories_with(
    figure: &mut Figure,
    rs: SnapshotSeriesView<'_>,
    ts: ArrayView1<'_, Scalar>,
    iteration_time: Scalar,
    style: &TrajectoryStyle,
) -> Result<()> {
    let (steps, dim, particle_count) = rs.dim();
    if steps != ts.len() {
        return Err(Error::shape_mismatch("timestamp count", steps, ts.len()));
    }
    if dim < 2 {
        return Err(Error::ShapeMismatch(format!(
            "trajectories need at least 2 spatial axes, found {dim}"
        )));
    }
    if steps == 0 {
        return Err(Error::ShapeMismatch(
            "trajectories need at least one snapshot".to_string(),
        ));
    }

    let norm = Normalize::new(0.0, iteration_time);
    figure.set_colormap(style.colormap);

    let initial = rs.index_axis(Axis(0), 0);
    figure.scatter(
        initial.row(0).to_vec(),
        initial.row(1).to_vec(),
        Marker::Cross,
        style.initial_marker_size,
        PointColors::default(),
    )?;

    let times = ts.to_vec();
    for particle in 0..particle_count {
        let xs = rs.slice(s![.., 0, particle]).to_vec();
        let ys = rs.slice(s![.., 1, particle]).to_vec();

        figure.scatter(
            xs.clone(),
            ys.clone(),
            Marker::Circle,
            trajectory_point_size(particle),
            PointColors::Mapped {
                values: times.clone(),
                norm,
            },
        )?;
        figure.plot(
            xs,
            ys,
            LineStyle {
                width: style.line_width,
                color: Rgb::BLACK,
            },
        )?;
    }

    figure.set_aspect(Aspect::Equal);
    Ok(())
}
