//! Colormaps and value normalization for time-colored scatter plots.
//!
//! Colormaps are piecewise-linear between anchor colors and quantized to
//! [`LUT_SIZE`] steps, so nearby values share a color band.

use crate::physics::Scalar;
use serde::{Deserialize, Serialize};

/// Number of discrete color steps per colormap
pub const LUT_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    /// First color of the default line cycle
    pub const TAB_BLUE: Rgb = Rgb(0x1f, 0x77, 0xb4);

    fn from_unit(r: Scalar, g: Scalar, b: Scalar) -> Self {
        let channel = |c: Scalar| libm::round(c.clamp(0.0, 1.0) * 255.0) as u8;
        Rgb(channel(r), channel(g), channel(b))
    }
}

/// Linear map of `[vmin, vmax]` onto `[0, 1]`, clamped at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: Scalar,
    pub vmax: Scalar,
}

impl Normalize {
    pub fn new(vmin: Scalar, vmax: Scalar) -> Self {
        Self { vmin, vmax }
    }

    pub fn apply(&self, value: Scalar) -> Scalar {
        let span = self.vmax - self.vmin;
        if !(span.abs() > Scalar::EPSILON) || !value.is_finite() {
            return 0.0;
        }
        ((value - self.vmin) / span).clamp(0.0, 1.0)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Colormap {
    /// Red, yellow, green, cyan, blue, magenta
    #[default]
    GistRainbow,
    Viridis,
    Greys,
}

type Anchor = (Scalar, (Scalar, Scalar, Scalar));

const GIST_RAINBOW: &[Anchor] = &[
    (0.000, (1.00, 0.00, 0.16)),
    (0.030, (1.00, 0.00, 0.00)),
    (0.215, (1.00, 1.00, 0.00)),
    (0.400, (0.00, 1.00, 0.00)),
    (0.586, (0.00, 1.00, 1.00)),
    (0.770, (0.00, 0.00, 1.00)),
    (0.954, (1.00, 0.00, 1.00)),
    (1.000, (1.00, 0.00, 0.75)),
];

const VIRIDIS: &[Anchor] = &[
    (0.00, (0.267, 0.005, 0.329)),
    (0.25, (0.229, 0.322, 0.546)),
    (0.50, (0.128, 0.567, 0.551)),
    (0.75, (0.369, 0.789, 0.383)),
    (1.00, (0.993, 0.906, 0.144)),
];

const GREYS: &[Anchor] = &[(0.0, (1.0, 1.0, 1.0)), (1.0, (0.0, 0.0, 0.0))];

impl Colormap {
    fn anchors(self) -> &'static [Anchor] {
        match self {
            Colormap::GistRainbow => GIST_RAINBOW,
            Colormap::Viridis => VIRIDIS,
            Colormap::Greys => GREYS,
        }
    }

    /// Color at a normalized position; values outside `[0, 1]` are clamped.
    pub fn color_at(self, x: Scalar) -> Rgb {
        let x = if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.0 };
        let step = ((x * LUT_SIZE as Scalar) as usize).min(LUT_SIZE - 1);
        let x = step as Scalar / (LUT_SIZE - 1) as Scalar;

        let anchors = self.anchors();
        let upper = anchors
            .iter()
            .position(|(at, _)| *at >= x)
            .unwrap_or(anchors.len() - 1)
            .max(1);
        let (x0, (r0, g0, b0)) = anchors[upper - 1];
        let (x1, (r1, g1, b1)) = anchors[upper];
        let f = if x1 > x0 { (x - x0) / (x1 - x0) } else { 0.0 };

        Rgb::from_unit(r0 + f * (r1 - r0), g0 + f * (g1 - g0), b0 + f * (b1 - b0))
    }

    /// Color for a raw value under the given normalization.
    pub fn map(self, value: Scalar, norm: &Normalize) -> Rgb {
        self.color_at(norm.apply(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_maps_range_to_unit_interval() {
        let norm = Normalize::new(0.0, 4.0);
        assert_eq!(norm.apply(0.0), 0.0);
        assert_eq!(norm.apply(1.0), 0.25);
        assert_eq!(norm.apply(4.0), 1.0);
    }

    #[test]
    fn test_normalize_clamps_out_of_range_values() {
        let norm = Normalize::new(0.0, 2.0);
        assert_eq!(norm.apply(-1.0), 0.0);
        assert_eq!(norm.apply(3.0), 1.0);
    }

    #[test]
    fn test_normalize_degenerate_range() {
        let norm = Normalize::new(1.0, 1.0);
        assert_eq!(norm.apply(5.0), 0.0);
        assert_eq!(Normalize::new(0.0, 1.0).apply(Scalar::NAN), 0.0);
    }

    #[test]
    fn test_gist_rainbow_endpoints() {
        assert_eq!(Colormap::GistRainbow.color_at(0.0), Rgb(255, 0, 41));
        assert_eq!(Colormap::GistRainbow.color_at(1.0), Rgb(255, 0, 191));
    }

    #[test]
    fn test_gist_rainbow_passes_through_primary_hues() {
        let green = Colormap::GistRainbow.color_at(0.4);
        assert!(green.1 > 240 && green.0 < 20 && green.2 < 20, "{green:?}");

        let blue = Colormap::GistRainbow.color_at(0.77);
        assert!(blue.2 > 240 && blue.0 < 20 && blue.1 < 20, "{blue:?}");
    }

    #[test]
    fn test_colormap_clamps() {
        for map in [Colormap::GistRainbow, Colormap::Viridis, Colormap::Greys] {
            assert_eq!(map.color_at(-3.0), map.color_at(0.0));
            assert_eq!(map.color_at(7.0), map.color_at(1.0));
        }
    }

    #[test]
    fn test_greys_runs_white_to_black() {
        assert_eq!(Colormap::Greys.color_at(0.0), Rgb::WHITE);
        assert_eq!(Colormap::Greys.color_at(1.0), Rgb::BLACK);
    }

    #[test]
    fn test_quantized_neighbors_share_a_color() {
        let a = Colormap::Viridis.color_at(0.5001);
        let b = Colormap::Viridis.color_at(0.5002);
        assert_eq!(a, b);
    }

    #[test]
    fn test_map_uses_normalization() {
        let norm = Normalize::new(0.0, 10.0);
        assert_eq!(
            Colormap::Viridis.map(10.0, &norm),
            Colormap::Viridis.color_at(1.0)
        );
    }
}
