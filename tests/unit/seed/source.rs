use super::*;

#[test]
fn same_seed_same_stream() {
    let mut a = SeedSource::new(123);
    let mut b = SeedSource::new(123);
    for _ in 0..64 {
        assert_eq!(a.uniform(0.0, 1.0).to_bits(), b.uniform(0.0, 1.0).to_bits());
        assert_eq!(a.int(-5, 5), b.int(-5, 5));
        assert_eq!(a.exp(0.1, 10.0).to_bits(), b.exp(0.1, 10.0).to_bits());
        assert_eq!(a.bool(), b.bool());
    }
    assert_eq!(a.draw_count(), b.draw_count());
}

#[test]
fn call_order_is_part_of_the_output() {
    let mut a = SeedSource::new(9);
    let x1 = a.uniform(0.0, 1.0);
    let y1 = a.int(0, 1_000_000);

    let mut b = SeedSource::new(9);
    let y2 = b.int(0, 1_000_000);
    let x2 = b.uniform(0.0, 1.0);

    assert!(x1 != x2 || y1 != y2);
}

#[test]
fn draws_stay_in_bounds() {
    let mut s = SeedSource::new(7);
    for _ in 0..1000 {
        let u = s.uniform(400.0, 2000.0);
        assert!((400.0..2000.0).contains(&u));
        let e = s.exp(0.1, 10.0);
        assert!((0.1..10.0).contains(&e));
        let i = s.int(5, 9);
        assert!((5..=9).contains(&i));
    }
}

#[test]
fn exp_favours_low_values() {
    let mut s = SeedSource::new(42);
    let n = 4000;
    let low = (0..n).filter(|_| s.exp(0.0, 1.0) < 0.25).count();
    // P(u^3 < 0.25) = 0.25^(1/3) ~ 0.63
    assert!(low > n / 2, "low={low}");
}

#[test]
fn swapped_bounds_are_reordered() {
    let mut s = SeedSource::new(1);
    for _ in 0..100 {
        let v = s.uniform(2.0, 1.0);
        assert!((1.0..2.0).contains(&v));
        let i = s.int(9, 5);
        assert!((5..=9).contains(&i));
    }
}

#[test]
fn degenerate_interval_returns_bound() {
    let mut s = SeedSource::new(1);
    assert_eq!(s.uniform(3.0, 3.0), 3.0);
    assert_eq!(s.int(2, 2), 2);
}

#[test]
fn empty_choice_does_not_draw() {
    let mut s = SeedSource::new(5);
    let empty: [u8; 0] = [];
    assert!(s.choice(&empty).is_none());
    assert_eq!(s.draw_count(), 0);
    assert_eq!(s.choice(&[7]), Some(&7));
    assert_eq!(s.draw_count(), 1);
}

#[test]
fn weighted_choice_skips_non_positive_weights() {
    let mut s = SeedSource::new(11);
    let mut w = BTreeMap::new();
    w.insert("a", 0.0);
    w.insert("b", 2.0);
    w.insert("c", -1.0);
    for _ in 0..200 {
        assert_eq!(s.weighted_choice(&w), Some(&"b"));
    }

    let none: BTreeMap<&str, f64> = [("x", 0.0)].into_iter().collect();
    assert!(s.weighted_choice(&none).is_none());
}

#[test]
fn hash_seed_is_stable() {
    let a = SeedSource::from_hash("ooTestHash");
    let b = SeedSource::from_hash("ooTestHash");
    assert_eq!(a.seed(), b.seed());
    assert_ne!(a.seed(), SeedSource::from_hash("ooOther").seed());
}
