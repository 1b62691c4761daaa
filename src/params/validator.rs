use crate::features::palette::PaletteKind;
use crate::features::selector::FeatureSet;
use crate::params::bundle::{ParameterBundle, SimulationParams};
use crate::params::generator::{K_RANGE, KAPPA_RANGE, NU_RANGE};

/// `(pass, view)` blend pairs that need a strong, slow-decaying simulation.
pub const DISALLOWED_PAIRS: [(u8, u8); 2] = [(2, 2), (2, 5)];

/// `(pass, view)` blend pairs with an extra floor under the Analogous palette.
pub const ANALOGOUS_PAIRS: [(u8, u8); 1] = [(1, 5)];

/// Result of a bounded rejection-sampling loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleOutcome {
    /// Candidates drawn, including the kept one.
    pub attempts: u32,
    /// `false` when the bound was hit and the last candidate was kept anyway.
    pub accepted: bool,
}

/// Pure acceptance predicate for candidate bundles of one run.
#[derive(Clone, Copy, Debug)]
pub struct ParameterValidator {
    color_weight: f64,
    palette: PaletteKind,
}

impl ParameterValidator {
    /// Validator bound to a run's color weight and palette.
    pub fn new(features: &FeatureSet) -> Self {
        Self::with(features.color_weight(), features.palette())
    }

    /// Validator for explicit run values.
    pub fn with(color_weight: f64, palette: PaletteKind) -> Self {
        Self {
            color_weight,
            palette,
        }
    }

    /// Whether `bundle` is acceptable for the layer at `layer`.
    pub fn is_valid(&self, bundle: &ParameterBundle, layer: usize) -> bool {
        let ok = self.accepts(bundle.blend_pair(), &bundle.simulation);
        if !ok {
            tracing::trace!(layer, pair = ?bundle.blend_pair(), "bundle rejected");
        }
        ok
    }

    /// Whether the color-weight floor on `dt + kappa / 1.5` can be met with `dt <= max_dt`.
    pub fn floor_reachable(&self, max_dt: f64) -> bool {
        max_dt + KAPPA_RANGE.1 / 1.5 >= self.floor()
    }

    /// Whether any simulation block with `dt <= max_dt` can pass for `pair`.
    ///
    /// The predicate only grows easier as `dt` and `kappa` grow, so the upper corner decides.
    pub fn can_accept(&self, pair: (u8, u8), max_dt: f64) -> bool {
        let corner = SimulationParams {
            dt: max_dt,
            k: K_RANGE.1,
            nu: NU_RANGE.1,
            kappa: KAPPA_RANGE.1,
        };
        self.accepts(pair, &corner)
    }

    fn floor(&self) -> f64 {
        f64::min(1.0, 0.5 * self.color_weight.max(1.0))
    }

    pub(crate) fn accepts(&self, pair: (u8, u8), sim: &SimulationParams) -> bool {
        if sim.dt + sim.kappa / 1.5 < self.floor() {
            return false;
        }
        if DISALLOWED_PAIRS.contains(&pair) && (sim.dt < 0.9 || sim.kappa < 0.8) {
            return false;
        }
        if self.palette == PaletteKind::Analogous
            && ANALOGOUS_PAIRS.contains(&pair)
            && sim.dt + sim.kappa < 1.0
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/validator.rs"]
mod tests;
