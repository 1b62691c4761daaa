use super::*;

#[test]
fn hex_roundtrip_keeps_packed_value() {
    for hex in [0x000000, 0xffffff, 0x3284ff, 0x404040] {
        assert_eq!(Color::from_hex(hex).to_hex(), hex);
    }
    assert_eq!(Color::from_hex(0x3284ff).to_hex_string(), "3284ff");
}

#[test]
fn hsl_primaries() {
    assert_eq!(Color::from_hsl(0.0, 1.0, 0.5).to_hex(), 0xff0000);
    assert_eq!(Color::from_hsl(120.0, 1.0, 0.5).to_hex(), 0x00ff00);
    assert_eq!(Color::from_hsl(240.0, 1.0, 0.5).to_hex(), 0x0000ff);
    assert_eq!(Color::from_hsl(-120.0, 1.0, 0.5).to_hex(), 0x0000ff);
    assert_eq!(Color::from_hsl(42.0, 0.0, 1.0), Color::WHITE);
}

#[test]
fn hsv_zero_saturation_is_gray() {
    let c = Color::from_hsv(200.0, 0.0, 0.5);
    assert_eq!(c.r, c.g);
    assert_eq!(c.g, c.b);
}

#[test]
fn rgb_clamps_channels() {
    let c = Color::rgb(-1.0, 2.0, 0.5);
    assert_eq!((c.r, c.g, c.b), (0.0, 1.0, 0.5));
}

#[test]
fn epoch_and_millis_advance() {
    assert_eq!(Epoch(3).next(), Epoch(4));
    assert_eq!(Millis(10).after(7000), Millis(7010));
    assert_eq!(Millis(u64::MAX).after(1), Millis(u64::MAX));
}
