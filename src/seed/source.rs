use crate::foundation::hash::seed_from_str;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::collections::BTreeMap;

/// Exponent shaping [`SeedSource::exp`]: `min + (max - min) * u^EXP_SHAPE`.
const EXP_SHAPE: i32 = 3;

/// Deterministic draw primitives over a single seed.
///
/// Every primitive consumes generator state, so the order of calls is part of the output
/// contract: the same seed and the same call sequence always reproduce the same values, and
/// reordering any two draws changes everything derived after them.
///
/// Bounds are never rejected. `min > max` is treated as the swapped interval.
#[derive(Clone, Debug)]
pub struct SeedSource {
    seed: u64,
    rng: Pcg64,
    draws: u64,
}

impl SeedSource {
    /// Create a source from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg64::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Create a source from an arbitrary hash string (stable across platforms).
    pub fn from_hash(hash: &str) -> Self {
        Self::new(seed_from_str(hash))
    }

    /// The seed this source was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of primitive draws consumed so far.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    fn unit(&mut self) -> f64 {
        self.draws += 1;
        self.rng.random::<f64>()
    }

    /// Uniform real in `[min, max)`.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        let (lo, hi) = ordered(min, max);
        lo + (hi - lo) * self.unit()
    }

    /// Uniform integer in `[min, max]` (inclusive).
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.draws += 1;
        self.rng.random_range(lo..=hi)
    }

    /// Real in `[min, max)` skewed towards `min`: most draws land low, a few land far out.
    pub fn exp(&mut self, min: f64, max: f64) -> f64 {
        let (lo, hi) = ordered(min, max);
        lo + (hi - lo) * self.unit().powi(EXP_SHAPE)
    }

    /// Fair coin.
    pub fn bool(&mut self) -> bool {
        self.unit() < 0.5
    }

    /// Uniform pick from `items`. Returns `None` (without drawing) for an empty slice.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.int(0, items.len() as i64 - 1) as usize;
        items.get(i)
    }

    /// Weighted pick over `weights` in key order. Non-positive weights never win; returns
    /// `None` (without drawing) when no weight is positive.
    pub fn weighted_choice<'a, K: Ord>(&mut self, weights: &'a BTreeMap<K, f64>) -> Option<&'a K> {
        let total: f64 = weights.values().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let mut target = self.unit() * total;
        let mut last = None;
        for (k, &w) in weights {
            if w <= 0.0 {
                continue;
            }
            if target < w {
                return Some(k);
            }
            target -= w;
            last = Some(k);
        }
        // Float residue can leave `target` a hair above the final bucket.
        last
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
#[path = "../../tests/unit/seed/source.rs"]
mod tests;
