//! Owner of every ball in the session

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, BallId};

/// Balls in flight and at rest, kept sorted by id for deterministic iteration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BallPool {
    balls: Vec<Ball>,
    /// Next ball id; never reused, even across `clear`
    next_id: u32,
}

impl BallPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a falling ball at rest at `pos`
    pub fn spawn(&mut self, pos: Vec2, radius: f32, stake: f64) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        self.balls.push(Ball::new(id, pos, radius, stake));
        id
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.index_of(id).map(|i| &self.balls[i])
    }

    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.index_of(id).map(|i| &mut self.balls[i])
    }

    fn index_of(&self, id: BallId) -> Option<usize> {
        self.balls.binary_search_by_key(&id, |b| b.id).ok()
    }

    /// Visit every falling ball in id order
    pub fn for_each_falling<F: FnMut(&mut Ball)>(&mut self, mut f: F) {
        for ball in self.balls.iter_mut().filter(|b| b.is_falling()) {
            f(ball);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn falling(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter().filter(|b| b.is_falling())
    }

    /// True when no ball is falling, including when the pool is empty
    pub fn all_captured(&self) -> bool {
        self.balls.iter().all(|b| !b.is_falling())
    }

    pub fn falling_count(&self) -> usize {
        self.falling().count()
    }

    pub fn captured_count(&self) -> usize {
        self.balls.len() - self.falling_count()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Discard every ball
    pub fn clear(&mut self) {
        self.balls.clear();
    }
}
