use super::*;

fn opts() -> Options {
    Options {
        min_layers: 1,
        max_layers: 5,
        ..Options::default()
    }
}

#[test]
fn same_seed_same_features() {
    let a = FeatureSelector::select(&opts(), &mut SeedSource::new(77)).unwrap();
    let b = FeatureSelector::select(&opts(), &mut SeedSource::new(77)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn different_seeds_diverge() {
    let prints: std::collections::HashSet<_> = (0..16)
        .map(|s| {
            FeatureSelector::select(&opts(), &mut SeedSource::new(s))
                .unwrap()
                .fingerprint()
        })
        .collect();
    assert!(prints.len() > 1);
}

#[test]
fn draws_respect_options() {
    for s in 0..32 {
        let f = FeatureSelector::select(&opts(), &mut SeedSource::new(s)).unwrap();
        assert!((1..=5).contains(&f.layer_count()));
        assert!((1..=2).contains(&f.strokes_per_layer()));
        assert!((0.1..2.0).contains(&f.color_weight()));
        assert_eq!(f.palette(), PaletteKind::RandomColor);
        assert_eq!(f.composition(), CompositionKind::Snoise);
        assert_eq!(f.base_colors().len(), f.layer_count() as usize + 1);
    }
}

#[test]
fn only_enabled_kinds_are_chosen() {
    let mut o = opts();
    o.compositions.insert(CompositionKind::Snoise, false);
    o.compositions.insert(CompositionKind::Center, true);
    o.compositions.insert(CompositionKind::Random, true);
    o.palettes.insert(PaletteKind::RandomColor, false);
    o.palettes.insert(PaletteKind::Complementary, true);
    for s in 0..32 {
        let f = FeatureSelector::select(&o, &mut SeedSource::new(s)).unwrap();
        assert!(matches!(
            f.composition(),
            CompositionKind::Center | CompositionKind::Random
        ));
        assert_eq!(f.palette(), PaletteKind::Complementary);
        assert_eq!(f.base_colors().len(), 2);
    }
}

#[test]
fn empty_candidates_are_config_errors() {
    let mut o = opts();
    for v in o.compositions.values_mut() {
        *v = false;
    }
    let err = FeatureSelector::select(&o, &mut SeedSource::new(1)).unwrap_err();
    assert!(matches!(err, FluidError::Config(_)));
}

#[test]
fn layer_color_falls_back_to_secondary() {
    let mut o = opts();
    o.palettes.insert(PaletteKind::RandomColor, false);
    o.palettes.insert(PaletteKind::BlackWhite, true);
    let f = FeatureSelector::select(&o, &mut SeedSource::new(4)).unwrap();
    assert_eq!(f.color_for_layer(0), Color::BLACK);
    assert_eq!(f.color_for_layer(4), Color::WHITE);
}

#[test]
fn snapshot_uses_published_names() {
    let f = FeatureSelector::select(&opts(), &mut SeedSource::new(2)).unwrap();
    let v = serde_json::to_value(f.snapshot()).unwrap();
    assert_eq!(v["composition"], "snoise");
    assert_eq!(v["palette"], "randomColor");
    assert_eq!(v["color1"].as_str().unwrap().len(), 6);
    assert!(v["colorW"].is_number());
}
