//! Random source for the peg bounce perturbation
//!
//! Play uses a seeded PCG stream so a session can be replayed from its seed.
//! Tests substitute a fixed or scripted source to steer balls into chosen bins.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Supplies uniform samples for the bounce angle offset
pub trait BounceSource {
    /// Uniform sample in `[0, 1]`
    fn next_unit(&mut self) -> f32;

    /// Angle offset in `[-spread / 2, spread / 2]`
    fn offset(&mut self, spread: f32) -> f32 {
        (self.next_unit() - 0.5) * spread
    }
}

impl<S: BounceSource + ?Sized> BounceSource for Box<S> {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}

/// Seeded PCG source
#[derive(Debug, Clone)]
pub struct SeededBounce {
    seed: u64,
    rng: Pcg32,
}

impl SeededBounce {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BounceSource for SeededBounce {
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Always returns the same sample. `FixedBounce(0.0)` kicks every bounce as
/// far counter-clockwise as the spread allows, `FixedBounce(1.0)` clockwise.
#[derive(Debug, Clone, Copy)]
pub struct FixedBounce(pub f32);

impl BounceSource for FixedBounce {
    fn next_unit(&mut self) -> f32 {
        self.0.clamp(0.0, 1.0)
    }
}

/// Replays a list of samples, cycling when it runs out
#[derive(Debug, Clone)]
pub struct ScriptedBounce {
    units: Vec<f32>,
    cursor: usize,
}

impl ScriptedBounce {
    pub fn new(units: Vec<f32>) -> Self {
        Self { units, cursor: 0 }
    }

    /// Samples handed out so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl BounceSource for ScriptedBounce {
    fn next_unit(&mut self) -> f32 {
        if self.units.is_empty() {
            return 0.5;
        }
        let unit = self.units[self.cursor % self.units.len()];
        self.cursor += 1;
        unit.clamp(0.0, 1.0)
    }
}
