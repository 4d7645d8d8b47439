//! Energy and trajectory plots.
//!
//! Plot functions record commands on an explicit [`Figure`]; a backend turns
//! the figure into an SVG or PNG file afterwards.

pub mod backend;
pub mod colormap;
pub mod energy;
pub mod figure;
pub mod trajectories;

pub use backend::{OutputFormat, RenderSettings, render_to_file, render_to_svg_string};
pub use colormap::{Colormap, Normalize, Rgb};
pub use energy::plot_energy_evolution;
pub use figure::{Artist, Aspect, Figure, LineStyle, Marker, PointColors};
pub use trajectories::{
    TrajectoryStyle, plot_trajectories, plot_trajectories_with, trajectory_point_size,
};
