//! Palette kinds and color synthesis.
//!
//! Two families exist. `randomColor` draws a luminosity and a hue bucket once per run and then
//! synthesizes independent colors under that bias. Every other kind is a hue-rotation palette
//! around one drawn base color.

use crate::foundation::core::Color;
use crate::seed::source::SeedSource;
use serde::{Deserialize, Serialize};

/// Strategy used to generate the run's color set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaletteKind {
    /// Grayscale extremes.
    #[serde(rename = "Black&White")]
    BlackWhite,
    /// One hue, lightness ramp.
    Mono,
    /// Neighbouring hues, 30 degrees apart.
    Analogous,
    /// Opposite hues, 180 degrees apart.
    Complementary,
    /// Independent random colors under a luminosity and hue bias.
    #[serde(rename = "randomColor")]
    RandomColor,
}

impl PaletteKind {
    /// Name as it appears in configuration and the published feature record.
    pub fn name(self) -> &'static str {
        match self {
            Self::BlackWhite => "Black&White",
            Self::Mono => "Mono",
            Self::Analogous => "Analogous",
            Self::Complementary => "Complementary",
            Self::RandomColor => "randomColor",
        }
    }

    /// Number of base colors generated for a run with `layer_count` layers.
    ///
    /// Two-tone kinds get exactly two colors; every other kind gets one per layer plus a
    /// secondary.
    pub fn color_count(self, layer_count: u32) -> usize {
        match self {
            Self::Complementary | Self::BlackWhite => 2,
            _ => (layer_count as usize + 1).max(2),
        }
    }
}

/// Luminosity bias of a `randomColor` run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Luminosity {
    /// Low value, high saturation.
    Dark,
    /// High value.
    Bright,
}

/// Hue bucket of a `randomColor` run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HueBucket {
    /// Hue in `[-26, 18]` degrees.
    Red,
    /// Hue in `[19, 46]` degrees.
    Orange,
    /// Zero saturation.
    Monochrome,
    /// Hue in `[179, 257]` degrees.
    Blue,
}

impl HueBucket {
    fn hue_range(self) -> Option<(i64, i64)> {
        match self {
            Self::Red => Some((-26, 18)),
            Self::Orange => Some((19, 46)),
            Self::Blue => Some((179, 257)),
            Self::Monochrome => None,
        }
    }
}

/// Base color of a hue-rotation palette.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Hsl {
    /// Hue in degrees.
    pub h: f64,
    /// Saturation in `[0, 1]`.
    pub s: f64,
    /// Lightness in `[0, 1]`.
    pub l: f64,
}

/// The per-run bias that later color draws reuse.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum PaletteBias {
    /// `randomColor` bias.
    Random {
        /// Luminosity.
        luminosity: Luminosity,
        /// Hue bucket.
        hue: HueBucket,
    },
    /// Hue-rotation base.
    Rotation {
        /// Palette kind driving the rotation.
        kind: PaletteKind,
        /// Base color.
        base: Hsl,
    },
}

/// Draw the palette bias and `count` colors for `kind`.
pub fn generate_palette(
    kind: PaletteKind,
    count: usize,
    seed: &mut SeedSource,
) -> (PaletteBias, Vec<Color>) {
    match kind {
        PaletteKind::RandomColor => {
            let luminosity = if seed.bool() {
                Luminosity::Dark
            } else {
                Luminosity::Bright
            };
            let buckets = match luminosity {
                Luminosity::Dark => [HueBucket::Red, HueBucket::Orange],
                Luminosity::Bright => [HueBucket::Monochrome, HueBucket::Blue],
            };
            let hue = *seed.choice(&buckets).unwrap_or(&buckets[0]);
            let colors = (0..count).map(|_| random_color(luminosity, hue, seed)).collect();
            (PaletteBias::Random { luminosity, hue }, colors)
        }
        _ => {
            let base = Hsl {
                h: seed.uniform(0.0, 360.0),
                s: seed.uniform(0.5, 0.9),
                l: seed.uniform(0.4, 0.6),
            };
            let colors = (0..count).map(|i| rotation_color(kind, base, i, count)).collect();
            (PaletteBias::Rotation { kind, base }, colors)
        }
    }
}

/// Draw one fresh color consistent with a run's palette bias.
pub fn generate_color(bias: &PaletteBias, seed: &mut SeedSource) -> Color {
    match *bias {
        PaletteBias::Random { luminosity, hue } => random_color(luminosity, hue, seed),
        PaletteBias::Rotation { kind, base } => match kind {
            PaletteKind::BlackWhite => {
                if seed.bool() {
                    Color::BLACK
                } else {
                    Color::WHITE
                }
            }
            PaletteKind::Mono => Color::from_hsl(base.h, base.s, seed.uniform(0.25, 0.75)),
            _ => {
                let step = rotation_step(kind);
                let k = seed.int(0, (360.0 / step) as i64 - 1);
                Color::from_hsl(base.h + step * k as f64, base.s, base.l)
            }
        },
    }
}

fn rotation_step(kind: PaletteKind) -> f64 {
    match kind {
        PaletteKind::Complementary => 180.0,
        _ => 30.0,
    }
}

fn rotation_color(kind: PaletteKind, base: Hsl, i: usize, count: usize) -> Color {
    match kind {
        PaletteKind::BlackWhite => {
            if i % 2 == 0 {
                Color::BLACK
            } else {
                Color::WHITE
            }
        }
        PaletteKind::Mono => {
            let t = if count > 1 {
                i as f64 / (count - 1) as f64
            } else {
                0.5
            };
            Color::from_hsl(base.h, base.s, 0.25 + 0.5 * t)
        }
        _ => Color::from_hsl(base.h + rotation_step(kind) * i as f64, base.s, base.l),
    }
}

fn random_color(luminosity: Luminosity, hue: HueBucket, seed: &mut SeedSource) -> Color {
    let Some((lo, hi)) = hue.hue_range() else {
        let v = match luminosity {
            Luminosity::Dark => seed.int(20, 45),
            Luminosity::Bright => seed.int(75, 100),
        };
        return Color::from_hsv(0.0, 0.0, v as f64 / 100.0);
    };
    let h = seed.int(lo, hi) as f64;
    let (s, v) = match luminosity {
        Luminosity::Dark => (seed.int(90, 100), seed.int(30, 55)),
        Luminosity::Bright => (seed.int(55, 100), seed.int(75, 100)),
    };
    Color::from_hsv(h, s as f64 / 100.0, v as f64 / 100.0)
}

#[cfg(test)]
#[path = "../../tests/unit/features/palette.rs"]
mod tests;
