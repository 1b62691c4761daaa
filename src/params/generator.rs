use crate::config::options::Options;
use crate::features::palette::PaletteKind;
use crate::features::selector::FeatureSet;
use crate::foundation::core::Point;
use crate::params::bundle::{BlendMode, ParameterBundle, SimulationParams, ViewShader};
use crate::params::validator::{ParameterValidator, SampleOutcome};
use crate::seed::source::SeedSource;

/// Candidate blend modes of the simulation pass.
pub const PASS_BLEND_CANDIDATES: [BlendMode; 2] = [BlendMode::NoBlending, BlendMode::Normal];
/// Candidate blend modes of the view composite.
pub const VIEW_BLEND_CANDIDATES: [BlendMode; 2] = [BlendMode::Additive, BlendMode::Custom];

/// Domain of the pressure coefficient `K`.
pub const K_RANGE: (f64, f64) = (0.2, 0.7);
/// Domain of the viscosity `nu`.
pub const NU_RANGE: (f64, f64) = (0.4, 0.6);
/// Domain of the vorticity confinement `kappa`.
pub const KAPPA_RANGE: (f64, f64) = (0.1, 0.75);

/// Per-layer parameter synthesis for one run.
///
/// Every method returns a new bundle; callers decide where it is stored. Draw order within each
/// method is fixed and documented on the method.
pub struct ParameterGenerator<'a> {
    options: &'a Options,
    features: &'a FeatureSet,
    validator: ParameterValidator,
}

impl<'a> ParameterGenerator<'a> {
    /// Generator for the current options and feature set.
    pub fn new(options: &'a Options, features: &'a FeatureSet) -> Self {
        Self {
            options,
            features,
            validator: ParameterValidator::new(features),
        }
    }

    /// Full init of layer `i`.
    ///
    /// `prev_shader` is the shader of layer `i - 1`, if any; it is excluded from the candidates.
    /// Draw order: pass blend, view blend, fluid zoom, noise zoom, saturation, simulation block,
    /// shader, noise offset.
    pub fn full_init(
        &self,
        i: usize,
        prev_shader: Option<ViewShader>,
        visible: bool,
        seed: &mut SeedSource,
    ) -> (ParameterBundle, SampleOutcome) {
        self.init_with(i, visible, ShaderPick::Draw(prev_shader), seed)
    }

    /// Full init that keeps `current`'s shader and visibility (GUI randomize).
    ///
    /// Draw order matches [`Self::full_init`] without the shader draw.
    pub fn randomize(
        &self,
        i: usize,
        current: &ParameterBundle,
        seed: &mut SeedSource,
    ) -> (ParameterBundle, SampleOutcome) {
        self.init_with(
            i,
            current.visible,
            ShaderPick::Keep(current.view_shader),
            seed,
        )
    }

    /// Soft change of layer `i`: new zooms, simulation block and noise offset; everything else is
    /// copied from `current`.
    ///
    /// Draw order: fluid zoom, noise zoom, simulation block, noise offset.
    pub fn soft_change(
        &self,
        i: usize,
        current: &ParameterBundle,
        seed: &mut SeedSource,
    ) -> (ParameterBundle, SampleOutcome) {
        let fluid_zoom = seed.exp(0.1, 10.0);
        let noise_zoom = seed.uniform(400.0, 2000.0);
        let (simulation, outcome) = self.draw_simulation(current.blend_pair(), i, seed);
        let noise_offset = draw_noise_offset(seed);
        let bundle = ParameterBundle {
            fluid_zoom,
            noise_zoom,
            simulation,
            noise_offset,
            ..current.clone()
        };
        (bundle, outcome)
    }

    fn init_with(
        &self,
        i: usize,
        visible: bool,
        shader: ShaderPick,
        seed: &mut SeedSource,
    ) -> (ParameterBundle, SampleOutcome) {
        let blend_mode_pass = *seed
            .choice(&PASS_BLEND_CANDIDATES)
            .unwrap_or(&PASS_BLEND_CANDIDATES[0]);
        let blend_mode_view = *seed
            .choice(&VIEW_BLEND_CANDIDATES)
            .unwrap_or(&VIEW_BLEND_CANDIDATES[0]);
        let fluid_zoom = seed.exp(0.1, 10.0);
        let noise_zoom = seed.uniform(400.0, 2000.0);
        let saturation = seed.uniform(0.5, 1.0);
        let (simulation, outcome) =
            self.draw_simulation((blend_mode_pass.code(), blend_mode_view.code()), i, seed);
        let view_shader = match shader {
            ShaderPick::Keep(s) => s,
            ShaderPick::Draw(prev) => self.draw_shader(prev, seed),
        };
        let noise_offset = draw_noise_offset(seed);

        let bundle = ParameterBundle {
            visible,
            blend_mode_pass,
            blend_mode_view,
            fluid_zoom,
            noise_zoom,
            color: self.features.color_for_layer(i),
            saturation,
            max_iterations: self.options.max_iterations,
            simulation,
            noise_offset,
            view_shader,
        };
        (bundle, outcome)
    }

    fn draw_shader(&self, prev: Option<ViewShader>, seed: &mut SeedSource) -> ViewShader {
        let pool: &[ViewShader] = if self.features.palette() == PaletteKind::RandomColor {
            &ViewShader::ALL
        } else {
            &ViewShader::PALETTE_SAFE
        };
        let candidates: Vec<ViewShader> = pool
            .iter()
            .copied()
            .filter(|s| Some(*s) != prev)
            .collect();
        *seed.choice(&candidates).unwrap_or(&pool[0])
    }

    /// Bounded rejection sampling of the simulation block against the validator.
    ///
    /// When no candidate can pass for `pair` a single block is drawn and kept unvalidated.
    fn draw_simulation(
        &self,
        pair: (u8, u8),
        layer: usize,
        seed: &mut SeedSource,
    ) -> (SimulationParams, SampleOutcome) {
        let bound = self.options.max_redraws;
        let reachable = bound == 0 || self.validator.can_accept(pair, self.options.max_dt);
        let mut attempts = 0u32;
        loop {
            let sim = SimulationParams {
                dt: seed.uniform(self.options.min_dt, self.options.max_dt),
                k: seed.uniform(K_RANGE.0, K_RANGE.1),
                nu: seed.uniform(NU_RANGE.0, NU_RANGE.1),
                kappa: seed.uniform(KAPPA_RANGE.0, KAPPA_RANGE.1),
            };
            attempts += 1;
            if bound == 0 {
                return (
                    sim,
                    SampleOutcome {
                        attempts,
                        accepted: true,
                    },
                );
            }
            if !reachable {
                tracing::trace!(layer, pair = ?pair, "simulation block kept unvalidated");
                return (
                    sim,
                    SampleOutcome {
                        attempts,
                        accepted: false,
                    },
                );
            }
            if self.validator.accepts(pair, &sim) {
                return (
                    sim,
                    SampleOutcome {
                        attempts,
                        accepted: true,
                    },
                );
            }
            if attempts >= bound {
                tracing::warn!(
                    layer,
                    attempts,
                    pair = ?pair,
                    "no valid simulation block within redraw bound, keeping last candidate"
                );
                return (
                    sim,
                    SampleOutcome {
                        attempts,
                        accepted: false,
                    },
                );
            }
        }
    }
}

enum ShaderPick {
    Keep(ViewShader),
    Draw(Option<ViewShader>),
}

fn draw_noise_offset(seed: &mut SeedSource) -> Point {
    let x = seed.uniform(0.0, 1000.0);
    let y = seed.uniform(0.0, 1000.0);
    Point::new(x, y)
}

#[cfg(test)]
#[path = "../../tests/unit/params/generator.rs"]
mod tests;
