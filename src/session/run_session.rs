use crate::config::options::{OnChange, OnClick, Options};
use crate::features::selector::{CompositionKind, FeatureSelector, FeatureSet, FeatureSnapshot};
use crate::foundation::core::{LayerId, Millis, Viewport};
use crate::foundation::error::FluidResult;
use crate::layers::registry::{LayerCtx, LayerRegistry};
use crate::params::bundle::ParameterBundle;
use crate::params::validator::ParameterValidator;
use crate::render::contract::{Renderer, SnapshotOverlay};
use crate::schedule::queue::FireAction;
use crate::schedule::scheduler::{ChangeScheduler, RunState, Transition};
use crate::seed::source::SeedSource;

/// External input routed into the session.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Pointer click on the canvas; the action follows `onClick`.
    Click,
    /// New viewport.
    Resize(Viewport),
    /// Key press, delegated to dev tooling.
    KeyDown(String),
    /// Double click; `on_gui` is set when it targeted the GUI surface.
    DoubleClick {
        /// Whether the GUI received the event.
        on_gui: bool,
    },
}

/// What an input did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// A layer was appended.
    LayerAdded(LayerId),
    /// Every layer was fully reset.
    LayersReset,
    /// A manual change was applied.
    Changed,
    /// Every layer received the new viewport.
    Resized,
    /// Handed to dev tooling.
    Delegated,
    /// The session was rebuilt from its seed.
    Reloaded,
    /// Nothing to do.
    Ignored,
}

/// A running fluid piece: the owner of every piece of mutable state.
///
/// All mutation happens inside the calls below, on one thread; a draw never observes a
/// half-applied change.
///
/// A `box` composition is a still piece: one layer, no snapshot overlay and no timed changes.
pub struct Session<R: Renderer, O: SnapshotOverlay> {
    initial_options: Options,
    options: Options,
    seed: SeedSource,
    features: FeatureSet,
    registry: LayerRegistry,
    scheduler: ChangeScheduler,
    renderer: R,
    overlay: O,
    viewport: Viewport,
    clock: Millis,
    frame: u64,
    log: Vec<Transition>,
    logged: usize,
}

impl<R: Renderer, O: SnapshotOverlay> Session<R, O> {
    /// Validate `options`, draw the run's features and build the initial layers.
    ///
    /// Draw order: generated option defaults, the feature set, then one full init per layer.
    #[tracing::instrument(skip_all, fields(seed = seed.seed()))]
    pub fn new(options: Options, seed: SeedSource, renderer: R, overlay: O) -> FluidResult<Self> {
        options.validate()?;
        let mut seed = seed;
        let mut resolved = options.clone();
        resolved.resolve_defaults(&mut seed);
        let features = FeatureSelector::select(&resolved, &mut seed)?;

        let mut session = Self {
            scheduler: ChangeScheduler::new(change_budget(&resolved, &features)),
            initial_options: options,
            options: resolved,
            seed,
            features,
            registry: LayerRegistry::new(),
            renderer,
            overlay,
            viewport: Viewport::default(),
            clock: Millis::default(),
            frame: 0,
            log: Vec::new(),
            logged: 0,
        };
        session.build()?;
        Ok(session)
    }

    fn build(&mut self) -> FluidResult<()> {
        self.warn_unreachable_floor();
        for _ in 0..self.base_layer_count() {
            self.add_layer()?;
        }
        self.renderer.set_debug_visible(self.options.show_debug)?;
        self.configure_overlay()?;
        self.scheduler.start(self.clock, &mut self.log);
        self.flush_log();
        Ok(())
    }

    /// Current options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The run's feature set.
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Published provenance record.
    pub fn snapshot(&self) -> FeatureSnapshot {
        self.features.snapshot()
    }

    /// Live layers.
    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    /// Scheduler state.
    pub fn run_state(&self) -> RunState {
        self.scheduler.state()
    }

    /// Shared animation frame counter.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Session clock.
    pub fn clock(&self) -> Millis {
        self.clock
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Draws consumed so far.
    pub fn draw_count(&self) -> u64 {
        self.seed.draw_count()
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The snapshot overlay.
    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Transitions logged since the last call.
    pub fn take_transitions(&mut self) -> Vec<Transition> {
        self.logged = 0;
        std::mem::take(&mut self.log)
    }

    /// Per-frame tick: advance the clock, apply every due fire, then draw.
    ///
    /// The frame counter and draws stand still while the clock is paused. Returns the
    /// transitions of this tick together with any not yet taken.
    pub fn advance(&mut self, elapsed_ms: u64) -> FluidResult<Vec<Transition>> {
        self.clock = self.clock.after(elapsed_ms);
        let now = self.clock;
        while let Some(action) = self.scheduler.pop_due(now, &mut self.log) {
            match action {
                FireAction::Change => self.change()?,
                FireAction::Exhaust => self.scheduler.exhaust(now, &mut self.log),
                FireAction::Restart => self.restart()?,
            }
        }
        if !self.scheduler.state().paused {
            self.frame += 1;
            self.registry.draw(self.frame, &mut self.renderer)?;
        }
        self.flush_log();
        Ok(self.take_transitions())
    }

    /// Soft-change every layer and count it (timed fire or manual trigger).
    pub fn change(&mut self) -> FluidResult<()> {
        if self.overlay_active() {
            self.overlay.capture()?;
        }
        for id in self.registry.ids() {
            let (registry, ctx) = self.split();
            registry.apply_soft_change(id, ctx)?;
        }
        self.scheduler.record_change(self.clock, &mut self.log);
        Ok(())
    }

    /// Restart the run: unpause, fill option keys still unset, trim runtime-added layers,
    /// fully reset the rest and start a new change cycle. The feature set is kept.
    #[tracing::instrument(skip_all, fields(clock = self.clock.0))]
    pub fn restart(&mut self) -> FluidResult<()> {
        self.scheduler.set_paused(false);
        self.options.resolve_defaults(&mut self.seed);
        self.scheduler
            .set_max_changes(change_budget(&self.options, &self.features));
        self.registry
            .retain_first(self.base_layer_count(), &mut self.renderer)?;
        self.reset_all_layers()?;
        if self.overlay_active() {
            self.configure_overlay()?;
            self.overlay.clear()?;
        }
        self.scheduler.restart(self.clock, &mut self.log);
        Ok(())
    }

    /// Append a layer with a fresh full init.
    pub fn add_layer(&mut self) -> FluidResult<LayerId> {
        let (registry, ctx) = self.split();
        let id = registry.add_layer(ctx)?;
        self.renderer.set_layer_opacity(id, self.options.opacity)?;
        self.renderer.resize_layer(id, self.viewport)?;
        Ok(id)
    }

    /// Route one input event.
    pub fn handle_input(&mut self, event: InputEvent) -> FluidResult<InputOutcome> {
        let outcome = match event {
            InputEvent::Click => match self.options.on_click {
                OnClick::AddNew => InputOutcome::LayerAdded(self.add_layer()?),
                OnClick::Reset => {
                    self.reset_all_layers()?;
                    InputOutcome::LayersReset
                }
                OnClick::Change => {
                    self.change()?;
                    InputOutcome::Changed
                }
                OnClick::None => InputOutcome::Ignored,
            },
            InputEvent::Resize(viewport) => {
                self.viewport = viewport;
                self.registry.resize(viewport, &mut self.renderer)?;
                InputOutcome::Resized
            }
            InputEvent::KeyDown(key) if self.options.dev_mode => {
                tracing::debug!(%key, "key delegated to dev tooling");
                InputOutcome::Delegated
            }
            InputEvent::KeyDown(_) => InputOutcome::Ignored,
            InputEvent::DoubleClick { on_gui } if self.options.dev_mode && !on_gui => {
                self.reload()?;
                InputOutcome::Reloaded
            }
            InputEvent::DoubleClick { .. } => InputOutcome::Ignored,
        };
        self.flush_log();
        Ok(outcome)
    }

    /// Apply a GUI write to the global options. The edit is validated first; on error the options
    /// are left unchanged.
    pub fn update_options(&mut self, edit: impl FnOnce(&mut Options)) -> FluidResult<()> {
        let mut next = self.options.clone();
        edit(&mut next);
        next.validate()?;
        let reachability_changed =
            (next.max_dt, next.max_redraws) != (self.options.max_dt, self.options.max_redraws);
        self.options = next;
        self.scheduler
            .set_max_changes(change_budget(&self.options, &self.features));
        if reachability_changed {
            self.warn_unreachable_floor();
        }
        self.registry
            .set_opacity(self.options.opacity, &mut self.renderer)?;
        self.renderer.set_debug_visible(self.options.show_debug)?;
        self.configure_overlay()
    }

    /// Apply a GUI write to one layer's bundle, honoring `onChange`.
    pub fn edit_layer(
        &mut self,
        id: LayerId,
        edit: impl FnOnce(&mut ParameterBundle),
    ) -> FluidResult<()> {
        let mut bundle = self.registry.get(id)?.parameters().clone();
        edit(&mut bundle);
        let color_weight = self.features.color_weight();
        match self.options.on_change {
            OnChange::None => self.registry.store_parameters(id, bundle)?,
            OnChange::Update => {
                self.registry
                    .replace_parameters(id, bundle, color_weight, &mut self.renderer)?;
            }
            OnChange::Reset => {
                self.registry
                    .replace_parameters(id, bundle, color_weight, &mut self.renderer)?;
                self.registry.reset_all(&mut self.renderer)?;
                self.frame = 0;
            }
        }
        Ok(())
    }

    /// GUI randomize of one layer.
    pub fn randomize_layer(&mut self, id: LayerId) -> FluidResult<()> {
        let (registry, ctx) = self.split();
        registry.randomize(id, ctx)
    }

    /// GUI visibility toggle.
    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> FluidResult<()> {
        self.registry.set_visible(id, visible, &mut self.renderer)
    }

    /// Rebuild from the original seed and the options as first loaded.
    pub fn reload(&mut self) -> FluidResult<()> {
        tracing::info!(seed = self.seed.seed(), "reloading session");
        self.registry.retain_first(0, &mut self.renderer)?;
        self.overlay.clear()?;

        let mut seed = SeedSource::new(self.seed.seed());
        let mut options = self.initial_options.clone();
        options.resolve_defaults(&mut seed);
        self.features = FeatureSelector::select(&options, &mut seed)?;
        self.scheduler = ChangeScheduler::new(change_budget(&options, &self.features));
        self.options = options;
        self.seed = seed;
        self.frame = 0;
        self.build()
    }

    fn reset_all_layers(&mut self) -> FluidResult<()> {
        for id in self.registry.ids() {
            let (registry, ctx) = self.split();
            registry.full_reset(id, ctx)?;
        }
        self.frame = 0;
        Ok(())
    }

    fn is_box(&self) -> bool {
        self.features.composition() == CompositionKind::Box
    }

    fn base_layer_count(&self) -> usize {
        if self.is_box() {
            1
        } else {
            self.features.layer_count() as usize
        }
    }

    fn overlay_active(&self) -> bool {
        self.options.snap_overlay && !self.is_box()
    }

    fn warn_unreachable_floor(&self) {
        let validator = ParameterValidator::new(&self.features);
        if self.options.max_redraws > 0 && !validator.floor_reachable(self.options.max_dt) {
            tracing::warn!(
                color_weight = self.features.color_weight(),
                max_dt = self.options.max_dt,
                "simulation floor unreachable, blocks are kept unvalidated"
            );
        }
    }

    fn configure_overlay(&mut self) -> FluidResult<()> {
        if self.is_box() {
            return Ok(());
        }
        self.overlay.configure(
            self.options.snap_blending(),
            self.options.snap_opacity,
            self.options.snap_overlay,
        )
    }

    fn split(&mut self) -> (&mut LayerRegistry, LayerCtx<'_>) {
        let ctx = LayerCtx {
            options: &self.options,
            features: &self.features,
            seed: &mut self.seed,
            renderer: &mut self.renderer,
        };
        (&mut self.registry, ctx)
    }

    fn flush_log(&mut self) {
        for t in &self.log[self.logged..] {
            match t {
                Transition::Dropped { .. } => tracing::debug!(transition = ?t, "scheduler"),
                _ => tracing::info!(transition = ?t, frame = self.frame, "scheduler"),
            }
        }
        self.logged = self.log.len();
    }
}

/// Timed changes never run for a `box` composition.
fn change_budget(options: &Options, features: &FeatureSet) -> u32 {
    if features.composition() == CompositionKind::Box {
        0
    } else {
        options.max_changes()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/run_session.rs"]
mod tests;
