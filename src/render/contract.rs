use crate::foundation::core::{LayerId, Viewport};
use crate::foundation::error::FluidResult;
use crate::layers::stroke::Stroke;
use crate::params::bundle::{BlendMode, ParameterBundle};

/// Opaque handle a renderer hands back for a created layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerHandle(pub u64);

/// Tint pushed to a layer: RGB plus the run's color weight.
pub type Tint = [f32; 4];

/// Consumer of layer parameters.
///
/// The session publishes whole bundles only: a renderer never sees a half-updated layer. Calls
/// for one layer arrive in the order they were issued. Only the first four methods are required;
/// the rest are hooks a headless renderer can ignore.
pub trait Renderer {
    /// Allocate resources for a new layer.
    fn create_layer(
        &mut self,
        id: LayerId,
        bundle: &ParameterBundle,
        stroke_count: usize,
    ) -> FluidResult<LayerHandle>;

    /// Replace every parameter of an existing layer.
    fn apply_layer_parameters(&mut self, id: LayerId, bundle: &ParameterBundle)
    -> FluidResult<()>;

    /// Clear a layer's simulation state.
    fn reset_layer(&mut self, id: LayerId) -> FluidResult<()>;

    /// Set the speed uniform of one stroke slot.
    fn set_stroke_speed(&mut self, id: LayerId, stroke: usize, speed: f64) -> FluidResult<()>;

    /// Stroke geometry for a slot, already resolved through mirror references.
    fn init_stroke(&mut self, _id: LayerId, _stroke: usize, _resolved: &Stroke) -> FluidResult<()> {
        Ok(())
    }

    /// Show or hide a layer.
    fn set_layer_visible(&mut self, _id: LayerId, _visible: bool) -> FluidResult<()> {
        Ok(())
    }

    /// Push the layer tint.
    fn set_layer_tint(&mut self, _id: LayerId, _tint: Tint) -> FluidResult<()> {
        Ok(())
    }

    /// Set the layer's view opacity.
    fn set_layer_opacity(&mut self, _id: LayerId, _opacity: f64) -> FluidResult<()> {
        Ok(())
    }

    /// Show or hide debug helpers.
    fn set_debug_visible(&mut self, _visible: bool) -> FluidResult<()> {
        Ok(())
    }

    /// Follow a viewport change.
    fn resize_layer(&mut self, _id: LayerId, _viewport: Viewport) -> FluidResult<()> {
        Ok(())
    }

    /// Render one frame of a layer.
    fn draw_layer(&mut self, _id: LayerId, _frame: u64) -> FluidResult<()> {
        Ok(())
    }

    /// Release a layer's resources.
    fn destroy_layer(&mut self, _id: LayerId) -> FluidResult<()> {
        Ok(())
    }
}

/// Overlay that freezes the current canvas on each change.
pub trait SnapshotOverlay {
    /// Copy the current canvas into the overlay.
    fn capture(&mut self) -> FluidResult<()>;
    /// Drop the captured image.
    fn clear(&mut self) -> FluidResult<()>;
    /// Blending, opacity and visibility of the overlay.
    fn configure(&mut self, blending: BlendMode, opacity: f64, visible: bool) -> FluidResult<()>;
}

/// One call observed by [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCall {
    /// `create_layer`.
    Create {
        /// Layer.
        id: LayerId,
        /// Published bundle.
        bundle: ParameterBundle,
        /// Stroke slots.
        strokes: usize,
    },
    /// `apply_layer_parameters`.
    Apply {
        /// Layer.
        id: LayerId,
        /// Published bundle.
        bundle: ParameterBundle,
    },
    /// `reset_layer`.
    Reset(LayerId),
    /// `set_stroke_speed`.
    Speed {
        /// Layer.
        id: LayerId,
        /// Stroke slot.
        stroke: usize,
        /// New speed.
        speed: f64,
    },
    /// `init_stroke`.
    InitStroke {
        /// Layer.
        id: LayerId,
        /// Stroke slot.
        stroke: usize,
        /// Resolved geometry.
        resolved: Stroke,
    },
    /// `set_layer_visible`.
    Visible(LayerId, bool),
    /// `set_layer_tint`.
    Tint(LayerId, Tint),
    /// `set_layer_opacity`.
    Opacity(LayerId, f64),
    /// `set_debug_visible`.
    Debug(bool),
    /// `resize_layer`.
    Resize(LayerId, Viewport),
    /// `draw_layer`.
    Draw(LayerId, u64),
    /// `destroy_layer`.
    Destroy(LayerId),
}

/// Headless renderer that records every call. Used by the CLI and tests.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next_handle: u64,
    /// Calls in issue order.
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Last bundle published for `id`, through create or apply.
    pub fn last_bundle(&self, id: LayerId) -> Option<&ParameterBundle> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::Create { id: i, bundle, .. } | RenderCall::Apply { id: i, bundle }
                if *i == id =>
            {
                Some(bundle)
            }
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn create_layer(
        &mut self,
        id: LayerId,
        bundle: &ParameterBundle,
        stroke_count: usize,
    ) -> FluidResult<LayerHandle> {
        self.next_handle += 1;
        self.calls.push(RenderCall::Create {
            id,
            bundle: bundle.clone(),
            strokes: stroke_count,
        });
        Ok(LayerHandle(self.next_handle))
    }

    fn apply_layer_parameters(
        &mut self,
        id: LayerId,
        bundle: &ParameterBundle,
    ) -> FluidResult<()> {
        self.calls.push(RenderCall::Apply {
            id,
            bundle: bundle.clone(),
        });
        Ok(())
    }

    fn reset_layer(&mut self, id: LayerId) -> FluidResult<()> {
        self.calls.push(RenderCall::Reset(id));
        Ok(())
    }

    fn set_stroke_speed(&mut self, id: LayerId, stroke: usize, speed: f64) -> FluidResult<()> {
        self.calls.push(RenderCall::Speed { id, stroke, speed });
        Ok(())
    }

    fn init_stroke(&mut self, id: LayerId, stroke: usize, resolved: &Stroke) -> FluidResult<()> {
        self.calls.push(RenderCall::InitStroke {
            id,
            stroke,
            resolved: *resolved,
        });
        Ok(())
    }

    fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> FluidResult<()> {
        self.calls.push(RenderCall::Visible(id, visible));
        Ok(())
    }

    fn set_layer_tint(&mut self, id: LayerId, tint: Tint) -> FluidResult<()> {
        self.calls.push(RenderCall::Tint(id, tint));
        Ok(())
    }

    fn set_layer_opacity(&mut self, id: LayerId, opacity: f64) -> FluidResult<()> {
        self.calls.push(RenderCall::Opacity(id, opacity));
        Ok(())
    }

    fn set_debug_visible(&mut self, visible: bool) -> FluidResult<()> {
        self.calls.push(RenderCall::Debug(visible));
        Ok(())
    }

    fn resize_layer(&mut self, id: LayerId, viewport: Viewport) -> FluidResult<()> {
        self.calls.push(RenderCall::Resize(id, viewport));
        Ok(())
    }

    fn draw_layer(&mut self, id: LayerId, frame: u64) -> FluidResult<()> {
        self.calls.push(RenderCall::Draw(id, frame));
        Ok(())
    }

    fn destroy_layer(&mut self, id: LayerId) -> FluidResult<()> {
        self.calls.push(RenderCall::Destroy(id));
        Ok(())
    }
}

/// Overlay recorder.
#[derive(Debug, Default)]
pub struct RecordingOverlay {
    /// Captures since creation.
    pub captures: u32,
    /// Clears since creation.
    pub clears: u32,
    /// Last configuration, as `(blending, opacity, visible)`.
    pub config: Option<(BlendMode, f64, bool)>,
}

impl RecordingOverlay {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotOverlay for RecordingOverlay {
    fn capture(&mut self) -> FluidResult<()> {
        self.captures += 1;
        Ok(())
    }

    fn clear(&mut self) -> FluidResult<()> {
        self.clears += 1;
        Ok(())
    }

    fn configure(&mut self, blending: BlendMode, opacity: f64, visible: bool) -> FluidResult<()> {
        self.config = Some((blending, opacity, visible));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/contract.rs"]
mod tests;
