use crate::config::options::Options;
use crate::features::palette::generate_color;
use crate::features::selector::FeatureSet;
use crate::foundation::core::{LayerId, Viewport};
use crate::foundation::error::{FluidError, FluidResult};
use crate::layers::stroke::{MirrorAxis, Stroke, Strokes, create_strokes};
use crate::params::bundle::{ParameterBundle, ViewShader};
use crate::params::generator::ParameterGenerator;
use crate::params::validator::SampleOutcome;
use crate::render::contract::{LayerHandle, Renderer, Tint};
use crate::seed::source::SeedSource;
use smallvec::SmallVec;

/// Everything a registry mutation needs besides the registry itself.
pub struct LayerCtx<'a> {
    /// Current options.
    pub options: &'a Options,
    /// Run features.
    pub features: &'a FeatureSet,
    /// The session's only randomness.
    pub seed: &'a mut SeedSource,
    /// Destination of every published bundle.
    pub renderer: &'a mut dyn Renderer,
}

/// One simulation layer.
#[derive(Clone, Debug)]
pub struct Layer {
    id: LayerId,
    handle: LayerHandle,
    parameters: ParameterBundle,
    strokes: Strokes,
    speeds: SmallVec<[f64; 4]>,
    last_outcome: SampleOutcome,
}

impl Layer {
    /// Stable identity.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Renderer handle.
    pub fn handle(&self) -> LayerHandle {
        self.handle
    }

    /// Current (last published) bundle.
    pub fn parameters(&self) -> &ParameterBundle {
        &self.parameters
    }

    /// Strokes, fixed for the layer's lifetime.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Speed uniform of each stroke slot.
    pub fn stroke_speeds(&self) -> &[f64] {
        &self.speeds
    }

    /// Outcome of the last simulation-block sampling.
    pub fn last_outcome(&self) -> SampleOutcome {
        self.last_outcome
    }
}

/// Ordered collection of live layers.
///
/// Ids come from a monotonic counter and are never reused, so a stale id always fails lookup
/// instead of reaching a newer layer.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    layers: Vec<Layer>,
    next_id: u32,
}

impl LayerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Live layers in draw order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Ids in draw order.
    pub fn ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id).collect()
    }

    /// Number of live layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// `true` when no layer is live.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Look up a layer.
    pub fn get(&self, id: LayerId) -> FluidResult<&Layer> {
        self.layers
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| unknown(id))
    }

    fn position(&self, id: LayerId) -> FluidResult<usize> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| unknown(id))
    }

    /// Full-init a new layer at the end of the draw order.
    ///
    /// Draw order: the parameter bundle, then the strokes.
    pub fn add_layer(&mut self, ctx: LayerCtx<'_>) -> FluidResult<LayerId> {
        let ordinal = self.layers.len();
        let prev_shader = self.layers.last().map(|l| l.parameters.view_shader);
        let generator = ParameterGenerator::new(ctx.options, ctx.features);
        let (bundle, outcome) = generator.full_init(ordinal, prev_shader, true, ctx.seed);

        let source = self
            .layers
            .first()
            .map(|l| (l.id, l.strokes.as_slice(), l.speeds.as_slice()));
        let (strokes, speeds) = create_strokes(
            ordinal,
            ctx.features.strokes_per_layer(),
            ctx.features.composition(),
            ctx.options,
            source,
            ctx.seed,
        );

        let layer_tint = tint(&bundle, ctx.features.color_weight());
        self.create(bundle, strokes, speeds, outcome, layer_tint, ctx.renderer)
    }

    /// Register a fully built layer and publish it.
    pub fn create(
        &mut self,
        bundle: ParameterBundle,
        strokes: Strokes,
        speeds: SmallVec<[f64; 4]>,
        outcome: SampleOutcome,
        tint: Tint,
        renderer: &mut dyn Renderer,
    ) -> FluidResult<LayerId> {
        if strokes.len() != speeds.len() {
            return Err(FluidError::layer(format!(
                "{} strokes but {} speeds",
                strokes.len(),
                speeds.len()
            )));
        }
        bundle.check_domains()?;
        let resolved = strokes
            .iter()
            .map(|s| self.resolve(s))
            .collect::<FluidResult<Vec<_>>>()?;

        let id = LayerId(self.next_id);
        self.next_id += 1;
        let handle = renderer.create_layer(id, &bundle, strokes.len())?;
        for (j, (stroke, speed)) in resolved.iter().zip(&speeds).enumerate() {
            renderer.init_stroke(id, j, stroke)?;
            renderer.set_stroke_speed(id, j, *speed)?;
        }
        renderer.set_layer_tint(id, tint)?;
        renderer.set_layer_visible(id, bundle.visible)?;

        tracing::debug!(
            layer = id.0,
            handle = handle.0,
            shader = ?bundle.view_shader,
            strokes = strokes.len(),
            "layer created"
        );
        self.layers.push(Layer {
            id,
            handle,
            parameters: bundle,
            strokes,
            speeds,
            last_outcome: outcome,
        });
        Ok(id)
    }

    /// Soft change: new zooms, simulation block and noise offset.
    pub fn apply_soft_change(&mut self, id: LayerId, ctx: LayerCtx<'_>) -> FluidResult<()> {
        let i = self.position(id)?;
        let generator = ParameterGenerator::new(ctx.options, ctx.features);
        let (bundle, outcome) = generator.soft_change(i, &self.layers[i].parameters, ctx.seed);
        ctx.renderer.apply_layer_parameters(id, &bundle)?;
        let layer = &mut self.layers[i];
        layer.parameters = bundle;
        layer.last_outcome = outcome;
        Ok(())
    }

    /// Full reset: new bundle and shader, cleared simulation, new stroke speeds and a fresh
    /// color from the run's palette bias. Visibility and strokes survive.
    ///
    /// Draw order: the bundle (as [`ParameterGenerator::full_init`]), one speed per stroke slot,
    /// then the color.
    pub fn full_reset(&mut self, id: LayerId, ctx: LayerCtx<'_>) -> FluidResult<()> {
        let i = self.position(id)?;
        let prev_shader: Option<ViewShader> = i
            .checked_sub(1)
            .map(|p| self.layers[p].parameters.view_shader);
        let generator = ParameterGenerator::new(ctx.options, ctx.features);
        let visible = self.layers[i].parameters.visible;
        let (mut bundle, outcome) = generator.full_init(i, prev_shader, visible, ctx.seed);

        let (min_speed, max_speed) = ctx.options.speed_range();
        let speeds: SmallVec<[f64; 4]> = (0..self.layers[i].strokes.len())
            .map(|_| ctx.seed.uniform(min_speed, max_speed))
            .collect();
        bundle.color = generate_color(ctx.features.palette_bias(), ctx.seed);

        ctx.renderer.apply_layer_parameters(id, &bundle)?;
        ctx.renderer.reset_layer(id)?;
        for (j, speed) in speeds.iter().enumerate() {
            ctx.renderer.set_stroke_speed(id, j, *speed)?;
        }
        ctx.renderer.set_layer_tint(id, tint(&bundle, ctx.features.color_weight()))?;

        let layer = &mut self.layers[i];
        for (stroke, speed) in layer.strokes.iter_mut().zip(&speeds) {
            if let Stroke::Free(f) = stroke {
                f.speed = *speed;
            }
        }
        layer.speeds = speeds;
        layer.parameters = bundle;
        layer.last_outcome = outcome;
        tracing::debug!(layer = id.0, "layer reset");
        Ok(())
    }

    /// GUI randomize: full init that keeps the shader and visibility.
    pub fn randomize(&mut self, id: LayerId, ctx: LayerCtx<'_>) -> FluidResult<()> {
        let i = self.position(id)?;
        let generator = ParameterGenerator::new(ctx.options, ctx.features);
        let (bundle, outcome) = generator.randomize(i, &self.layers[i].parameters, ctx.seed);
        ctx.renderer.apply_layer_parameters(id, &bundle)?;
        let layer = &mut self.layers[i];
        layer.parameters = bundle;
        layer.last_outcome = outcome;
        Ok(())
    }

    /// Show or hide a layer. Consumes no draws.
    pub fn set_visible(
        &mut self,
        id: LayerId,
        visible: bool,
        renderer: &mut dyn Renderer,
    ) -> FluidResult<()> {
        let i = self.position(id)?;
        renderer.set_layer_visible(id, visible)?;
        self.layers[i].parameters.visible = visible;
        Ok(())
    }

    /// Replace a layer's bundle wholesale (GUI write-back) and publish it.
    pub fn replace_parameters(
        &mut self,
        id: LayerId,
        bundle: ParameterBundle,
        color_weight: f64,
        renderer: &mut dyn Renderer,
    ) -> FluidResult<()> {
        self.store_parameters(id, bundle)?;
        self.publish(id, color_weight, renderer)
    }

    /// Store a GUI edit without publishing it.
    pub fn store_parameters(&mut self, id: LayerId, bundle: ParameterBundle) -> FluidResult<()> {
        let i = self.position(id)?;
        bundle.check_domains()?;
        self.layers[i].parameters = bundle;
        Ok(())
    }

    /// Republish a layer's stored bundle together with its visibility and tint.
    pub fn publish(
        &self,
        id: LayerId,
        color_weight: f64,
        renderer: &mut dyn Renderer,
    ) -> FluidResult<()> {
        let bundle = &self.get(id)?.parameters;
        renderer.apply_layer_parameters(id, bundle)?;
        renderer.set_layer_visible(id, bundle.visible)?;
        renderer.set_layer_tint(id, tint(bundle, color_weight))?;
        Ok(())
    }

    /// Clear the simulation state of every layer without touching parameters.
    pub fn reset_all(&self, renderer: &mut dyn Renderer) -> FluidResult<()> {
        for layer in &self.layers {
            renderer.reset_layer(layer.id)?;
        }
        Ok(())
    }

    /// Destroy every layer past the first `n`.
    pub fn retain_first(&mut self, n: usize, renderer: &mut dyn Renderer) -> FluidResult<()> {
        if n >= self.layers.len() {
            return Ok(());
        }
        for layer in self.layers.drain(n..) {
            renderer.destroy_layer(layer.id)?;
            tracing::debug!(layer = layer.id.0, "layer destroyed");
        }
        Ok(())
    }

    /// Push the global view opacity to every layer.
    pub fn set_opacity(&self, opacity: f64, renderer: &mut dyn Renderer) -> FluidResult<()> {
        for layer in &self.layers {
            renderer.set_layer_opacity(layer.id, opacity)?;
        }
        Ok(())
    }

    /// Forward a viewport change to every layer.
    pub fn resize(&self, viewport: Viewport, renderer: &mut dyn Renderer) -> FluidResult<()> {
        for layer in &self.layers {
            renderer.resize_layer(layer.id, viewport)?;
        }
        Ok(())
    }

    /// Draw every visible layer in order.
    pub fn draw(&self, frame: u64, renderer: &mut dyn Renderer) -> FluidResult<()> {
        for layer in self.layers.iter().filter(|l| l.parameters.visible) {
            renderer.draw_layer(layer.id, frame)?;
        }
        Ok(())
    }

    /// Geometry of stroke `j` of layer `id`, following mirror references to a concrete variant.
    pub fn resolve_stroke(&self, id: LayerId, j: usize) -> FluidResult<Stroke> {
        let layer = self.get(id)?;
        let stroke = layer
            .strokes
            .get(j)
            .ok_or_else(|| FluidError::layer(format!("layer {} has no stroke {j}", id.0)))?;
        self.resolve(stroke)
    }

    fn resolve(&self, stroke: &Stroke) -> FluidResult<Stroke> {
        let mut axis = MirrorAxis::Identity;
        let mut current = *stroke;
        for _ in 0..=self.layers.len() {
            let Stroke::MirrorOf {
                source_layer,
                source_stroke,
                axis: hop,
            } = current
            else {
                return Ok(current.mirrored(axis));
            };
            axis = axis.then(hop);
            current = *self
                .get(source_layer)?
                .strokes
                .get(source_stroke)
                .ok_or_else(|| {
                    FluidError::layer(format!(
                        "mirror source stroke {source_stroke} missing on layer {}",
                        source_layer.0
                    ))
                })?;
        }
        Err(FluidError::layer("mirror reference cycle"))
    }
}

fn unknown(id: LayerId) -> FluidError {
    FluidError::layer(format!("unknown layer {}", id.0))
}

fn tint(bundle: &ParameterBundle, color_weight: f64) -> Tint {
    let c = bundle.color;
    [c.r, c.g, c.b, color_weight as f32]
}

#[cfg(test)]
#[path = "../../tests/unit/layers/registry.rs"]
mod tests;
