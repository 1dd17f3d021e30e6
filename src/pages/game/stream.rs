use std::collections::VecDeque;

use rand::Rng;

use crate::{constants::game::SPAWN_DISTANCE, pages::game::lightning::Lightning};

/// Owns the live bolts, spawning on the right and dropping them once they leave on the left.
///
/// Bolts are kept in spawn order, which is also left-to-right order since every
/// bolt moves at the same speed.
#[derive(Debug, Clone)]
pub struct LightningStream {
    bolts: VecDeque<Lightning>,
    field_width: f64,
    field_height: f64,
    spawned: u64,
}

impl LightningStream {
    pub fn new(field_width: f64, field_height: f64) -> Self {
        Self { bolts: VecDeque::new(), field_width, field_height, spawned: 0 }
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        if self.spawn_due() {
            let bolt = Lightning::new(rng, self.field_width, self.field_height);
            self.push(bolt);
        }

        for bolt in self.bolts.iter_mut() {
            bolt.advance();
        }

        self.bolts.retain(|bolt| !bolt.off_screen());
    }

    fn spawn_due(&self) -> bool {
        match self.bolts.back() {
            None => true,
            Some(last) => last.x() < self.field_width - SPAWN_DISTANCE,
        }
    }

    pub fn push(&mut self, bolt: Lightning) {
        self.bolts.push_back(bolt);
        self.spawned += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.bolts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bolts.len()
    }

    /// Total number of bolts spawned since creation.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lightning> {
        self.bolts.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Lightning> {
        self.bolts.iter_mut()
    }
}
