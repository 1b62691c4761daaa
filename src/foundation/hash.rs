use xxhash_rust::xxh3::{Xxh3, xxh3_64_with_seed};

const XXH3_SEED: u64 = 0x6f1d_5eed_c0de_f1d0;

/// Stable 128-bit fingerprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Fingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

impl Fingerprint {
    /// 32 lowercase hex digits, high half first.
    pub fn to_hex(self) -> String {
        format!("{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Map an arbitrary hash string (e.g. a mint token) onto a 64-bit seed.
pub(crate) fn seed_from_str(s: &str) -> u64 {
    xxh3_64_with_seed(s.as_bytes(), XXH3_SEED)
}

/// Field-by-field hasher with a fixed seed and little-endian encoding, so the result never
/// depends on platform or struct layout.
pub(crate) struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    pub(crate) fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    pub(crate) fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    pub(crate) fn finish(self) -> Fingerprint {
        let v = self.inner.digest128();
        Fingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}
