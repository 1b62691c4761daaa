use crate::config::options::Options;
use crate::features::palette::{PaletteBias, PaletteKind, generate_palette};
use crate::foundation::core::Color;
use crate::foundation::error::{FluidError, FluidResult};
use crate::foundation::hash::{Fingerprint, StableHasher};
use crate::seed::source::SeedSource;
use serde::{Deserialize, Serialize};

/// High-level spatial arrangement strategy for strokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionKind {
    /// Perlin-noise driven flow, pointer strokes.
    Pnoise,
    /// Simplex-noise driven flow, pointer strokes.
    Snoise,
    /// Free-moving strokes with random targets.
    Random,
    /// Fixed strokes held down at their origin.
    Center,
    /// Pointer strokes only.
    Mouse,
    /// Single boxed layer, pointer strokes.
    Box,
}

impl CompositionKind {
    /// Every kind in configuration order.
    pub const ALL: [CompositionKind; 6] = [
        Self::Pnoise,
        Self::Snoise,
        Self::Random,
        Self::Center,
        Self::Mouse,
        Self::Box,
    ];

    /// Name as it appears in configuration and the published feature record.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pnoise => "pnoise",
            Self::Snoise => "snoise",
            Self::Random => "random",
            Self::Center => "center",
            Self::Mouse => "mouse",
            Self::Box => "box",
        }
    }
}

/// The run's immutable fingerprint: everything chosen once per seed before layers exist.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSet {
    composition: CompositionKind,
    palette: PaletteKind,
    layer_count: u32,
    strokes_per_layer: u32,
    base_colors: Vec<Color>,
    color_weight: f64,
    palette_bias: PaletteBias,
}

/// Flat record published for provenance and export.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureSnapshot {
    /// Composition kind name.
    pub composition: &'static str,
    /// Palette kind name.
    pub palette: &'static str,
    /// Layer count.
    pub layers: u32,
    /// First base color as hex.
    pub color1: String,
    /// Second base color as hex.
    pub color2: String,
    /// Color weight.
    #[serde(rename = "colorW")]
    pub color_w: f64,
}

impl FeatureSet {
    /// Composition kind.
    pub fn composition(&self) -> CompositionKind {
        self.composition
    }

    /// Palette kind.
    pub fn palette(&self) -> PaletteKind {
        self.palette
    }

    /// Number of layers built at start and after every restart.
    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }

    /// Strokes each layer is built with.
    pub fn strokes_per_layer(&self) -> u32 {
        self.strokes_per_layer
    }

    /// Base colors in layer order. Always at least two.
    pub fn base_colors(&self) -> &[Color] {
        &self.base_colors
    }

    /// Global color weight, the alpha lane of every layer tint.
    pub fn color_weight(&self) -> f64 {
        self.color_weight
    }

    /// Bias reused for fresh colors drawn on full reset.
    pub fn palette_bias(&self) -> &PaletteBias {
        &self.palette_bias
    }

    /// Base color for layer `i`, falling back to the secondary color.
    pub fn color_for_layer(&self, i: usize) -> Color {
        self.base_colors
            .get(i)
            .or_else(|| self.base_colors.get(1))
            .copied()
            .unwrap_or(Color::WHITE)
    }

    /// Published provenance record.
    pub fn snapshot(&self) -> FeatureSnapshot {
        let hex = |i: usize| self.color_for_layer(i).to_hex_string();
        FeatureSnapshot {
            composition: self.composition.name(),
            palette: self.palette.name(),
            layers: self.layer_count,
            color1: hex(0),
            color2: hex(1),
            color_w: self.color_weight,
        }
    }

    /// Stable 128-bit fingerprint over every field.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut h = StableHasher::new();
        h.write_bytes(self.composition.name().as_bytes());
        h.write_u8(0);
        h.write_bytes(self.palette.name().as_bytes());
        h.write_u8(0);
        h.write_u32(self.layer_count);
        h.write_u32(self.strokes_per_layer);
        h.write_u32(self.base_colors.len() as u32);
        for c in &self.base_colors {
            h.write_f32(c.r);
            h.write_f32(c.g);
            h.write_f32(c.b);
        }
        h.write_f64(self.color_weight);
        h.finish()
    }
}

/// One-time selection of the run's features.
pub struct FeatureSelector;

impl FeatureSelector {
    /// Draw the feature set. Options must already be validated; the empty-candidate checks here
    /// only guard direct callers.
    ///
    /// Draw order: layer count, palette kind, palette colors, composition kind, strokes per
    /// layer, color weight.
    #[tracing::instrument(skip_all, fields(seed = seed.seed()))]
    pub fn select(options: &Options, seed: &mut SeedSource) -> FluidResult<FeatureSet> {
        let layer_count = seed.int(i64::from(options.min_layers), i64::from(options.max_layers));
        let layer_count = u32::try_from(layer_count)
            .map_err(|_| FluidError::config("layer count out of range"))?;

        let palettes = options.enabled_palettes();
        let palette = *seed
            .choice(&palettes)
            .ok_or_else(|| FluidError::config("no palette enabled"))?;

        let (palette_bias, base_colors) =
            generate_palette(palette, palette.color_count(layer_count), seed);

        let comps = options.enabled_compositions();
        let composition = *seed
            .choice(&comps)
            .ok_or_else(|| FluidError::config("no composition enabled"))?;

        let strokes_per_layer =
            seed.int(i64::from(options.min_strokes), i64::from(options.max_strokes)) as u32;
        let color_weight = seed.exp(0.1, 2.0);

        let features = FeatureSet {
            composition,
            palette,
            layer_count,
            strokes_per_layer,
            base_colors,
            color_weight,
            palette_bias,
        };
        tracing::info!(
            composition = composition.name(),
            palette = palette.name(),
            layers = layer_count,
            strokes = strokes_per_layer,
            color_weight,
            "features selected"
        );
        Ok(features)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/features/selector.rs"]
mod tests;
