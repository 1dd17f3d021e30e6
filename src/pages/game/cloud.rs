use std::collections::VecDeque;

use ratatui::{
    style::Color,
    widgets::canvas::{Circle, Context},
};

use crate::{
    constants::game::{CLOUD_BASE_SIZE, CLOUD_CAPACITY, CLOUD_OFFSET, CLOUD_SHRINK},
    pages::game::{bird::Bird, object::Object},
};

/// Trail of puffs following the bird, newest first.
#[derive(Debug, Clone)]
pub struct Cloud {
    positions: VecDeque<(f64, f64)>,
    capacity: usize,
}

impl Default for Cloud {
    fn default() -> Self {
        Self::new(CLOUD_CAPACITY)
    }
}

impl Cloud {
    pub fn new(capacity: usize) -> Self {
        Self { positions: VecDeque::with_capacity(capacity + 1), capacity }
    }

    pub fn record(&mut self, bird: &Bird) {
        let (dx, dy) = CLOUD_OFFSET;
        self.positions.push_front((bird.x() + dx, bird.y() + dy));
        self.positions.truncate(self.capacity);
    }

    pub fn positions(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.positions.iter()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Object for Cloud {
    fn draw(&self, ctx: &mut Context<'_>, field_height: f64) {
        for (index, (x, y)) in self.positions.iter().enumerate() {
            let size = CLOUD_BASE_SIZE - index as f64 * CLOUD_SHRINK;
            let color = if index < self.capacity / 2 { Color::White } else { Color::Gray };
            for (dx, dy, scale) in [(0.0, 0.0, 1.0), (0.8, -0.2, 0.6), (0.4, -0.4, 0.8)] {
                let (cx, cy) = self.transform_pos(x + size * dx, y + size * dy, field_height);
                ctx.draw(&Circle { x: cx, y: cy, radius: size * scale, color });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_trail_is_bounded_and_newest_first() {
        let mut cloud = Cloud::default();
        let mut bird = Bird::at(100.0, 200.0);
        for _ in 0..25 {
            bird.advance();
            cloud.record(&bird);
        }
        assert_eq!(cloud.len(), CLOUD_CAPACITY);
        let newest = cloud.positions().next().copied().unwrap();
        assert_eq!(newest, (bird.x() + CLOUD_OFFSET.0, bird.y() + CLOUD_OFFSET.1));
    }

    #[test]
    fn test_oldest_evicted() {
        let mut cloud = Cloud::new(2);
        cloud.record(&Bird::at(0.0, 10.0));
        cloud.record(&Bird::at(0.0, 20.0));
        cloud.record(&Bird::at(0.0, 30.0));
        let ys: Vec<f64> = cloud.positions().map(|(_, y)| y - CLOUD_OFFSET.1).collect();
        assert_eq!(ys, vec![30.0, 20.0]);
    }
}
