use super::*;
use crate::config::options::StrokesRel;
use crate::features::selector::{CompositionKind, FeatureSelector};
use crate::render::contract::{RecordingRenderer, RenderCall};

struct Fixture {
    options: Options,
    features: FeatureSet,
    seed: SeedSource,
    renderer: RecordingRenderer,
}

impl Fixture {
    fn new(seed: u64, options: Options) -> Self {
        let mut seed = SeedSource::new(seed);
        let mut options = options;
        options.resolve_defaults(&mut seed);
        let features = FeatureSelector::select(&options, &mut seed).unwrap();
        Self {
            options,
            features,
            seed,
            renderer: RecordingRenderer::new(),
        }
    }

    fn ctx(&mut self) -> LayerCtx<'_> {
        LayerCtx {
            options: &self.options,
            features: &self.features,
            seed: &mut self.seed,
            renderer: &mut self.renderer,
        }
    }
}

fn random_composition(rel: StrokesRel) -> Options {
    let mut o = Options {
        strokes_rel: rel,
        ..Options::default()
    };
    o.compositions.insert(CompositionKind::Snoise, false);
    o.compositions.insert(CompositionKind::Random, true);
    o
}

#[test]
fn ids_are_never_reused() {
    let mut fx = Fixture::new(1, Options::default());
    let mut reg = LayerRegistry::new();
    let a = reg.add_layer(fx.ctx()).unwrap();
    let b = reg.add_layer(fx.ctx()).unwrap();
    let c = reg.add_layer(fx.ctx()).unwrap();
    reg.retain_first(1, &mut fx.renderer).unwrap();
    let d = reg.add_layer(fx.ctx()).unwrap();
    assert_eq!(reg.ids(), vec![a, d]);
    assert!(d > c && c > b);
    assert!(reg.get(b).is_err());
    assert_eq!(
        fx.renderer.count(|c| matches!(c, RenderCall::Destroy(_))),
        2
    );
}

#[test]
fn unknown_layer_is_a_layer_error() {
    let mut fx = Fixture::new(2, Options::default());
    let mut reg = LayerRegistry::new();
    let err = reg.full_reset(LayerId(42), fx.ctx()).unwrap_err();
    assert!(matches!(err, FluidError::Layer(_)));
    let err = reg
        .set_visible(LayerId(42), false, &mut fx.renderer)
        .unwrap_err();
    assert!(matches!(err, FluidError::Layer(_)));
}

#[test]
fn adjacent_layers_use_different_shaders() {
    for seed in 0..8 {
        let mut fx = Fixture::new(seed, Options::default());
        let mut reg = LayerRegistry::new();
        for _ in 0..4 {
            reg.add_layer(fx.ctx()).unwrap();
        }
        for w in reg.layers().windows(2) {
            assert_ne!(w[0].parameters().view_shader, w[1].parameters().view_shader);
        }
    }
}

#[test]
fn soft_change_publishes_and_keeps_identity() {
    let mut fx = Fixture::new(3, Options::default());
    let mut reg = LayerRegistry::new();
    let id = reg.add_layer(fx.ctx()).unwrap();
    let before = reg.get(id).unwrap().parameters().clone();
    reg.apply_soft_change(id, fx.ctx()).unwrap();
    let after = reg.get(id).unwrap().parameters().clone();
    assert_eq!(after.view_shader, before.view_shader);
    assert_eq!(after.color, before.color);
    assert_ne!(after.noise_offset, before.noise_offset);
    assert_eq!(fx.renderer.last_bundle(id), Some(&after));
}

#[test]
fn full_reset_keeps_visibility_and_redraws_speeds() {
    let mut fx = Fixture::new(4, random_composition(StrokesRel::Random));
    let mut reg = LayerRegistry::new();
    let id = reg.add_layer(fx.ctx()).unwrap();
    reg.set_visible(id, false, &mut fx.renderer).unwrap();
    let old_speeds = reg.get(id).unwrap().stroke_speeds().to_vec();

    reg.full_reset(id, fx.ctx()).unwrap();
    let layer = reg.get(id).unwrap();
    assert!(!layer.parameters().visible);
    assert_ne!(layer.stroke_speeds(), old_speeds.as_slice());
    let (lo, hi) = fx.options.speed_range();
    for (stroke, speed) in layer.strokes().iter().zip(layer.stroke_speeds()) {
        assert!((lo..hi).contains(speed));
        if let Stroke::Free(f) = stroke {
            assert_eq!(f.speed, *speed);
        }
    }
    assert_eq!(fx.renderer.count(|c| matches!(c, RenderCall::Reset(_))), 1);
}

#[test]
fn mirrored_strokes_resolve_through_layer_zero() {
    let mut fx = Fixture::new(5, random_composition(StrokesRel::MirrorX));
    let mut reg = LayerRegistry::new();
    let a = reg.add_layer(fx.ctx()).unwrap();
    let b = reg.add_layer(fx.ctx()).unwrap();
    for j in 0..fx.features.strokes_per_layer() as usize {
        let src = reg.resolve_stroke(a, j).unwrap();
        let mirrored = reg.resolve_stroke(b, j).unwrap();
        assert_eq!(mirrored, src.mirror_x());
    }
    assert!(reg.resolve_stroke(b, 99).is_err());
}

#[test]
fn replace_parameters_rejects_bad_domains() {
    let mut fx = Fixture::new(6, Options::default());
    let mut reg = LayerRegistry::new();
    let id = reg.add_layer(fx.ctx()).unwrap();
    let mut bad = reg.get(id).unwrap().parameters().clone();
    bad.fluid_zoom = 0.0;
    let w = fx.features.color_weight();
    let err = reg
        .replace_parameters(id, bad, w, &mut fx.renderer)
        .unwrap_err();
    assert!(matches!(err, FluidError::Validation(_)));
    assert!(reg.get(id).unwrap().parameters().fluid_zoom > 0.0);
}

#[test]
fn replace_parameters_publishes_bundle_visibility_and_tint() {
    let mut fx = Fixture::new(8, Options::default());
    let mut reg = LayerRegistry::new();
    let id = reg.add_layer(fx.ctx()).unwrap();
    let mut edited = reg.get(id).unwrap().parameters().clone();
    edited.saturation = 0.6;
    edited.visible = false;
    fx.renderer.calls.clear();

    let w = fx.features.color_weight();
    reg.replace_parameters(id, edited.clone(), w, &mut fx.renderer)
        .unwrap();
    assert_eq!(reg.get(id).unwrap().parameters(), &edited);
    assert_eq!(fx.renderer.last_bundle(id), Some(&edited));
    assert_eq!(fx.renderer.calls[1], RenderCall::Visible(id, false));
    assert!(matches!(fx.renderer.calls[2], RenderCall::Tint(i, t) if i == id && t[3] == w as f32));
}

#[test]
fn handles_come_from_the_renderer() {
    let mut fx = Fixture::new(9, Options::default());
    let mut reg = LayerRegistry::new();
    reg.add_layer(fx.ctx()).unwrap();
    reg.add_layer(fx.ctx()).unwrap();
    let handles: Vec<_> = reg.layers().iter().map(|l| l.handle()).collect();
    assert_eq!(handles, vec![LayerHandle(1), LayerHandle(2)]);
}

#[test]
fn opacity_reaches_every_layer() {
    let mut fx = Fixture::new(10, Options::default());
    let mut reg = LayerRegistry::new();
    let a = reg.add_layer(fx.ctx()).unwrap();
    let b = reg.add_layer(fx.ctx()).unwrap();
    fx.renderer.calls.clear();
    reg.set_opacity(0.3, &mut fx.renderer).unwrap();
    assert_eq!(
        fx.renderer.calls,
        vec![RenderCall::Opacity(a, 0.3), RenderCall::Opacity(b, 0.3)]
    );
}

#[test]
fn draw_visits_layers_in_order() {
    let mut fx = Fixture::new(7, Options::default());
    let mut reg = LayerRegistry::new();
    let a = reg.add_layer(fx.ctx()).unwrap();
    let b = reg.add_layer(fx.ctx()).unwrap();
    fx.renderer.calls.clear();
    reg.draw(9, &mut fx.renderer).unwrap();
    assert_eq!(
        fx.renderer.calls,
        vec![RenderCall::Draw(a, 9), RenderCall::Draw(b, 9)]
    );
}
