pub use kurbo::{Point, Vec2};

/// Stable layer identity. Assigned once by the registry and never reused within a session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LayerId(pub u32);

/// Scheduler generation stamped on every deferred fire.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
)]
pub struct Epoch(pub u64);

impl Epoch {
    /// The following generation.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Session clock time in milliseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Saturating `self + delay_ms`.
    pub fn after(self, delay_ms: u64) -> Self {
        Self(self.0.saturating_add(delay_ms))
    }
}

/// Output viewport dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Device pixel ratio applied by the renderer.
    pub pixel_ratio: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            pixel_ratio: 1,
        }
    }
}

/// Straight RGB color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Build a color from channels, clamping each into `[0, 1]`.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Parse a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let ch = |shift: u32| f32::from(((hex >> shift) & 0xFF) as u8) / 255.0;
        Self::rgb(ch(16), ch(8), ch(0))
    }

    /// Pack into `0xRRGGBB`.
    pub fn to_hex(self) -> u32 {
        fn q(c: f32) -> u32 {
            (c.clamp(0.0, 1.0) * 255.0).round() as u32
        }
        (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
    }

    /// Lowercase six digit hex string without a leading `#`.
    pub fn to_hex_string(self) -> String {
        format!("{:06x}", self.to_hex())
    }

    /// Convert from HSL. `h` is in degrees (any value, wrapped), `s` and `l` in `[0, 1]`.
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let m = l - c / 2.0;
        Self::from_chroma(h, c, m)
    }

    /// Convert from HSV. `h` is in degrees (any value, wrapped), `s` and `v` in `[0, 1]`.
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let s = s.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let c = v * s;
        Self::from_chroma(h, c, v - c)
    }

    fn from_chroma(h: f64, c: f64, m: f64) -> Self {
        let hp = h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Self::rgb((r + m) as f32, (g + m) as f32, (b + m) as f32)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
