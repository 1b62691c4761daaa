//! Fluidseed is the deterministic core of a seeded generative fluid piece.
//!
//! One seed fixes everything: the run's feature set, every layer's parameter bundle and stroke
//! geometry, and the sequence of timed changes, exhaustion and restarts. Rendering sits behind
//! the [`Renderer`] and [`SnapshotOverlay`] traits, so a run can be driven headless.
//!
//! - Load and validate [`Options`]
//! - Create a [`Session`] from a [`SeedSource`]
//! - Drive it with [`Session::advance`] and [`Session::handle_input`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod config;
pub(crate) mod features;
pub(crate) mod layers;
pub(crate) mod params;
pub(crate) mod render;
pub(crate) mod schedule;
pub(crate) mod seed;
pub(crate) mod session;

pub use crate::foundation::core::{Color, Epoch, LayerId, Millis, Point, Vec2, Viewport};
pub use crate::foundation::error::{FluidError, FluidResult};
pub use crate::foundation::hash::Fingerprint;

pub use crate::config::options::{
    MAX_STROKES_PER_LAYER, OnChange, OnClick, Options, ResolvedKeys, StrokesRel,
};
pub use crate::features::palette::{HueBucket, Hsl, Luminosity, PaletteBias, PaletteKind};
pub use crate::features::selector::{
    CompositionKind, FeatureSelector, FeatureSet, FeatureSnapshot,
};
pub use crate::layers::registry::{Layer, LayerCtx, LayerRegistry};
pub use crate::layers::stroke::{FreeStroke, MirrorAxis, Stroke};
pub use crate::params::bundle::{BlendMode, ParameterBundle, SimulationParams, ViewShader};
pub use crate::params::generator::ParameterGenerator;
pub use crate::params::validator::{ParameterValidator, SampleOutcome};
pub use crate::render::contract::{
    LayerHandle, RecordingOverlay, RecordingRenderer, RenderCall, Renderer, SnapshotOverlay, Tint,
};
pub use crate::schedule::queue::FireAction;
pub use crate::schedule::scheduler::{
    CHANGE_DELAY_MS, RESTART_DELAY_MS, RunState, SchedulerPhase, Transition,
};
pub use crate::seed::source::SeedSource;
pub use crate::session::run_session::{InputEvent, InputOutcome, Session};
