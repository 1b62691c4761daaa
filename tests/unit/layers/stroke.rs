use super::*;

fn free(x: f64, y: f64) -> Stroke {
    Stroke::Free(FreeStroke {
        speed: 0.01,
        is_down: true,
        pos: Point::new(x, y),
        target: Point::new(0.9, 0.1),
    })
}

fn pos(s: &Stroke) -> Point {
    match s {
        Stroke::Free(f) => f.pos,
        other => panic!("expected free stroke, got {other:?}"),
    }
}

#[test]
fn mirror_x_flips_only_x() {
    let s = free(0.25, 0.75);
    let m = s.mirror_x();
    assert_eq!(pos(&m).x, 1.0 - 0.25);
    assert_eq!(pos(&m).y, 0.75);
}

#[test]
fn mirror_is_mirror_x_after_mirror_y() {
    for (x, y) in [(0.1, 0.2), (0.5, 0.5), (0.0, 1.0), (0.8125, 0.375)] {
        let s = free(x, y);
        assert_eq!(s.mirror(), s.mirror_y().mirror_x());
        assert_eq!(s.mirror(), s.mirror_x().mirror_y());
    }
}

#[test]
fn mirrors_are_involutions() {
    let s = free(0.125, 0.625);
    assert_eq!(s.mirror_x().mirror_x(), s);
    assert_eq!(s.mirror().mirror(), s);
}

#[test]
fn axes_compose_by_xor() {
    assert_eq!(MirrorAxis::X.then(MirrorAxis::Y), MirrorAxis::Both);
    assert_eq!(MirrorAxis::Both.then(MirrorAxis::X), MirrorAxis::Y);
    assert_eq!(MirrorAxis::Y.then(MirrorAxis::Y), MirrorAxis::Identity);
}

#[test]
fn mirror_references_compose_instead_of_nesting() {
    let r = Stroke::MirrorOf {
        source_layer: LayerId(0),
        source_stroke: 1,
        axis: MirrorAxis::X,
    };
    assert_eq!(
        r.mirror_y(),
        Stroke::MirrorOf {
            source_layer: LayerId(0),
            source_stroke: 1,
            axis: MirrorAxis::Both,
        }
    );
    assert_eq!(Stroke::PointerDriven.mirror(), Stroke::PointerDriven);
}

#[test]
fn first_layer_strokes_follow_composition() {
    let o = Options {
        speed_mult: Some(1.0),
        ..Options::default()
    };
    let mut s = SeedSource::new(1);
    let (strokes, speeds) = create_strokes(0, 3, CompositionKind::Random, &o, None, &mut s);
    assert_eq!(strokes.len(), 3);
    assert_eq!(speeds.len(), 3);
    for (st, sp) in strokes.iter().zip(&speeds) {
        let Stroke::Free(f) = st else {
            panic!("random composition builds free strokes");
        };
        assert_eq!(f.speed, *sp);
        assert!((o.min_speed..o.max_speed).contains(sp));
    }

    let (strokes, _) = create_strokes(0, 2, CompositionKind::Center, &o, None, &mut s);
    assert!(strokes.iter().all(|s| *s == Stroke::Fixed { is_down: true }));

    let (strokes, _) = create_strokes(0, 2, CompositionKind::Snoise, &o, None, &mut s);
    assert!(strokes.iter().all(|s| *s == Stroke::PointerDriven));
}

#[test]
fn later_layers_mirror_layer_zero() {
    let o = Options {
        speed_mult: Some(1.0),
        strokes_rel: StrokesRel::MirrorX,
        ..Options::default()
    };
    let mut s = SeedSource::new(2);
    let (src, src_speeds) = create_strokes(0, 2, CompositionKind::Random, &o, None, &mut s);
    let before = s.draw_count();
    let (strokes, speeds) = create_strokes(
        1,
        2,
        CompositionKind::Random,
        &o,
        Some((LayerId(0), &src, &src_speeds)),
        &mut s,
    );
    assert_eq!(s.draw_count(), before);
    assert_eq!(speeds.as_slice(), src_speeds.as_slice());
    for (j, st) in strokes.iter().enumerate() {
        assert_eq!(
            *st,
            Stroke::MirrorOf {
                source_layer: LayerId(0),
                source_stroke: j,
                axis: MirrorAxis::X,
            }
        );
    }
}

#[test]
fn random_relation_draws_independent_strokes() {
    let o = Options {
        speed_mult: Some(1.0),
        strokes_rel: StrokesRel::Random,
        ..Options::default()
    };
    let mut s = SeedSource::new(2);
    let (src, src_speeds) = create_strokes(0, 2, CompositionKind::Random, &o, None, &mut s);
    let (strokes, _) = create_strokes(
        1,
        2,
        CompositionKind::Random,
        &o,
        Some((LayerId(0), &src, &src_speeds)),
        &mut s,
    );
    assert!(strokes.iter().all(|s| matches!(s, Stroke::Free(_))));
}
