use crate::features::palette::PaletteKind;
use crate::features::selector::CompositionKind;
use crate::foundation::error::{FluidError, FluidResult};
use crate::params::bundle::BlendMode;
use crate::seed::source::SeedSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Hard cap on strokes per layer (renderer uniform array length).
pub const MAX_STROKES_PER_LAYER: u32 = 22;

/// How strokes of layers after the first relate to layer 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokesRel {
    /// Share layer 0's stroke unchanged.
    #[serde(rename = "same")]
    Same,
    /// Mirror on both axes.
    #[serde(rename = "mirror")]
    Mirror,
    /// Mirror horizontally.
    #[serde(rename = "mirrorX")]
    MirrorX,
    /// Mirror vertically.
    #[serde(rename = "mirrorY")]
    MirrorY,
    /// Draw one of the three mirrors per stroke.
    #[default]
    #[serde(rename = "mirrorRand")]
    MirrorRand,
    /// Independent strokes, drawn like layer 0's.
    #[serde(rename = "random")]
    Random,
}

/// Action bound to a pointer click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnClick {
    /// Clicks do nothing.
    #[serde(rename = "")]
    None,
    /// Fire a change immediately.
    #[default]
    #[serde(rename = "change")]
    Change,
    /// Full reset of every layer.
    #[serde(rename = "reset")]
    Reset,
    /// Append a new layer.
    #[serde(rename = "addNew", alias = "addnew")]
    AddNew,
}

/// What a GUI edit of a layer publishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnChange {
    /// Edits are stored but not published.
    #[serde(rename = "")]
    None,
    /// Republish the edited layer.
    #[default]
    #[serde(rename = "update")]
    Update,
    /// Republish, then reset every layer and the frame counter.
    #[serde(rename = "reset")]
    Reset,
}

/// Run configuration, owned by the session and edited by the GUI through bounded setters.
///
/// Keys marked optional are generated from the seed the first time they are resolved and are
/// never re-rolled while set, so GUI overrides survive restarts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    /// Lower bound of the drawn layer count.
    pub min_layers: u32,
    /// Upper bound of the drawn layer count.
    pub max_layers: u32,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f64,
    /// Lower bound of the drawn strokes per layer.
    pub min_strokes: u32,
    /// Upper bound of the drawn strokes per layer.
    pub max_strokes: u32,
    /// Solver iteration cap.
    pub max_iterations: u32,
    /// Lower bound of stroke speed, before `speedMult`.
    pub min_speed: f64,
    /// Upper bound of stroke speed, before `speedMult`.
    pub max_speed: f64,
    /// Lower bound of the solver time step.
    pub min_dt: f64,
    /// Upper bound of the solver time step.
    pub max_dt: f64,
    /// Stroke speed multiplier. Generated when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_mult: Option<f64>,
    /// Stroke relation for layers after the first.
    pub strokes_rel: StrokesRel,
    /// Click action.
    pub on_click: OnClick,
    /// Layer edit behaviour.
    pub on_change: OnChange,
    /// Capture a snapshot on every change.
    pub snap_overlay: bool,
    /// Snapshot overlay blending. Defaults to subtractive when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap_blending: Option<BlendMode>,
    /// Snapshot overlay opacity in `[0, 1]`.
    pub snap_opacity: f64,
    /// Soft changes per cycle before pause and restart; 0 disables scheduling. Generated when
    /// unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_changes: Option<u32>,
    /// Validator redraw bound; 0 disables validation.
    pub max_redraws: u32,
    /// Show debug overlays.
    pub show_debug: bool,
    /// Enables developer input (double-click reload).
    pub dev_mode: bool,
    /// Composition kinds and whether each may be selected.
    pub compositions: BTreeMap<CompositionKind, bool>,
    /// Palette kinds and whether each may be selected.
    pub palettes: BTreeMap<PaletteKind, bool>,
}

impl Default for Options {
    fn default() -> Self {
        let compositions = CompositionKind::ALL
            .into_iter()
            .map(|k| (k, k == CompositionKind::Snoise))
            .collect();
        let palettes = [
            PaletteKind::BlackWhite,
            PaletteKind::Mono,
            PaletteKind::Analogous,
            PaletteKind::Complementary,
            PaletteKind::RandomColor,
        ]
        .into_iter()
        .map(|k| (k, k == PaletteKind::RandomColor))
        .collect();

        Self {
            min_layers: 2,
            max_layers: 2,
            opacity: 1.0,
            min_strokes: 1,
            max_strokes: 2,
            max_iterations: 10,
            min_speed: 0.001,
            max_speed: 0.01,
            min_dt: 0.1,
            max_dt: 0.25,
            speed_mult: None,
            strokes_rel: StrokesRel::MirrorRand,
            on_click: OnClick::Change,
            on_change: OnChange::Update,
            snap_overlay: false,
            snap_blending: Some(BlendMode::Subtractive),
            snap_opacity: 1.0,
            max_changes: None,
            max_redraws: 1000,
            show_debug: false,
            dev_mode: true,
            compositions,
            palettes,
        }
    }
}

/// Keys filled in by [`Options::resolve_defaults`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolvedKeys {
    /// `speedMult` was generated.
    pub speed_mult: bool,
    /// `snapBlending` was filled with its fixed default.
    pub snap_blending: bool,
    /// `maxChanges` was generated.
    pub max_changes: bool,
}

impl Options {
    /// Parse options from a JSON reader. Missing keys take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> FluidResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| FluidError::serde(format!("parse options JSON: {e}")))
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> FluidResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FluidError::config(format!("open options JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Fail-fast consistency check. Nothing is clamped.
    pub fn validate(&self) -> FluidResult<()> {
        fn ordered(name: &str, min: f64, max: f64) -> FluidResult<()> {
            if !(min.is_finite() && max.is_finite()) {
                return Err(FluidError::config(format!("{name} bounds must be finite")));
            }
            if min > max {
                return Err(FluidError::config(format!(
                    "min{name} ({min}) must be <= max{name} ({max})"
                )));
            }
            Ok(())
        }
        fn unit(name: &str, v: f64) -> FluidResult<()> {
            if !(0.0..=1.0).contains(&v) {
                return Err(FluidError::config(format!("{name} must be in [0, 1], got {v}")));
            }
            Ok(())
        }

        if self.min_layers == 0 {
            return Err(FluidError::config("minLayers must be >= 1"));
        }
        ordered("Layers", f64::from(self.min_layers), f64::from(self.max_layers))?;
        if self.min_strokes == 0 {
            return Err(FluidError::config("minStrokes must be >= 1"));
        }
        if self.max_strokes > MAX_STROKES_PER_LAYER {
            return Err(FluidError::config(format!(
                "maxStrokes must be <= {MAX_STROKES_PER_LAYER}"
            )));
        }
        ordered("Strokes", f64::from(self.min_strokes), f64::from(self.max_strokes))?;
        if self.min_speed < 0.0 {
            return Err(FluidError::config("minSpeed must be >= 0"));
        }
        ordered("Speed", self.min_speed, self.max_speed)?;
        if !(self.min_dt > 0.0) {
            return Err(FluidError::config("minDt must be > 0"));
        }
        ordered("Dt", self.min_dt, self.max_dt)?;
        if self.max_iterations == 0 {
            return Err(FluidError::config("maxIterations must be > 0"));
        }
        unit("opacity", self.opacity)?;
        unit("snapOpacity", self.snap_opacity)?;
        if let Some(m) = self.speed_mult
            && !(m > 0.0 && m.is_finite())
        {
            return Err(FluidError::config("speedMult must be > 0"));
        }
        if self.enabled_compositions().is_empty() {
            return Err(FluidError::config("at least one composition must be enabled"));
        }
        if self.enabled_palettes().is_empty() {
            return Err(FluidError::config("at least one palette must be enabled"));
        }
        Ok(())
    }

    /// Fill unset optional keys. Keys already present (from config, the GUI, or an earlier
    /// resolve) are left alone and consume no draws.
    ///
    /// Draw order: `speedMult`, then `maxChanges`.
    pub fn resolve_defaults(&mut self, seed: &mut SeedSource) -> ResolvedKeys {
        let mut out = ResolvedKeys::default();
        if self.speed_mult.is_none() {
            self.speed_mult = Some(seed.uniform(0.1, 10.0));
            out.speed_mult = true;
        }
        if self.snap_blending.is_none() {
            self.snap_blending = Some(BlendMode::Subtractive);
            out.snap_blending = true;
        }
        if self.max_changes.is_none() {
            self.max_changes = Some(seed.int(5, 9) as u32);
            out.max_changes = true;
        }
        out
    }

    /// Enabled composition kinds in stable order.
    pub fn enabled_compositions(&self) -> Vec<CompositionKind> {
        self.compositions
            .iter()
            .filter(|(_, on)| **on)
            .map(|(k, _)| *k)
            .collect()
    }

    /// Enabled palette kinds in stable order.
    pub fn enabled_palettes(&self) -> Vec<PaletteKind> {
        self.palettes
            .iter()
            .filter(|(_, on)| **on)
            .map(|(k, _)| *k)
            .collect()
    }

    /// Effective speed multiplier (1 until resolved).
    pub fn speed_mult(&self) -> f64 {
        self.speed_mult.unwrap_or(1.0)
    }

    /// Effective change budget (0 until resolved).
    pub fn max_changes(&self) -> u32 {
        self.max_changes.unwrap_or(0)
    }

    /// Effective snapshot blending.
    pub fn snap_blending(&self) -> BlendMode {
        self.snap_blending.unwrap_or(BlendMode::Subtractive)
    }

    /// Inclusive speed interval after the multiplier.
    pub fn speed_range(&self) -> (f64, f64) {
        let m = self.speed_mult();
        (self.min_speed * m, self.max_speed * m)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/options.rs"]
mod tests;
