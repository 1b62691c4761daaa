use super::*;

fn sim(dt: f64, kappa: f64) -> SimulationParams {
    SimulationParams {
        dt,
        k: 0.5,
        nu: 0.5,
        kappa,
    }
}

#[test]
fn disallowed_pair_needs_strong_simulation() {
    let v = ParameterValidator::with(1.0, PaletteKind::RandomColor);
    assert!(!v.accepts((2, 2), &sim(0.5, 0.5)));
    assert!(v.accepts((2, 2), &sim(0.95, 0.85)));
    assert!(!v.accepts((2, 5), &sim(0.95, 0.5)));
}

#[test]
fn floor_scales_with_color_weight() {
    let light = ParameterValidator::with(0.5, PaletteKind::RandomColor);
    let heavy = ParameterValidator::with(2.0, PaletteKind::RandomColor);
    // 0.25 + 0.45 / 1.5 = 0.55
    assert!(light.accepts((1, 2), &sim(0.25, 0.45)));
    assert!(!heavy.accepts((1, 2), &sim(0.25, 0.45)));
    assert!(!light.accepts((1, 2), &sim(0.1, 0.1)));
}

#[test]
fn analogous_pair_floor_only_under_analogous() {
    let analogous = ParameterValidator::with(1.0, PaletteKind::Analogous);
    let mono = ParameterValidator::with(1.0, PaletteKind::Mono);
    let s = sim(0.4, 0.4);
    assert!(!analogous.accepts((1, 5), &s));
    assert!(mono.accepts((1, 5), &s));
    assert!(analogous.accepts((0, 5), &s));
}

#[test]
fn reachability_follows_the_upper_corner() {
    // 0.25 + 0.75 / 1.5 = 0.75
    let light = ParameterValidator::with(1.4, PaletteKind::RandomColor);
    let heavy = ParameterValidator::with(1.6, PaletteKind::RandomColor);
    assert!(light.floor_reachable(0.25));
    assert!(!heavy.floor_reachable(0.25));
    assert!(heavy.floor_reachable(0.4));

    assert!(light.can_accept((1, 2), 0.25));
    assert!(!heavy.can_accept((1, 2), 0.25));
    // kappa never reaches 0.8, so the disallowed pairs are out for any dt.
    assert!(!light.can_accept((2, 2), 5.0));
}
