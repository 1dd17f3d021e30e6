use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle, Context, Line},
        StatefulWidget, Widget,
    },
};

use crate::constants::background::{
    HILL_AMPLITUDE, HILL_BASE, HILL_FREQUENCY, HILL_STEP, RAINDROP_COUNT, RAINDROP_LENGTH, RAINDROP_SPEED, RAIN_DRIFT,
    SCENERY_TIME_STEP, SUN_POSITION, SUN_RADIUS, SUN_RAYS, SUN_RAY_INNER, SUN_RAY_OUTER, SUN_RAY_PULSE,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raindrop {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub length: f64,
}

/// Weather behind the playfield: rain, a turning sun and rolling hills.
/// Purely cosmetic, nothing here feeds back into the game.
#[derive(Debug)]
pub struct BackgroundState {
    raindrops: Vec<Raindrop>,
    time: f64,
    width: f64,
    height: f64,
    pub frozen: bool,
}

impl BackgroundState {
    pub fn new<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        let mut state = Self { raindrops: Vec::with_capacity(RAINDROP_COUNT), time: 0.0, width, height, frozen: false };
        for _ in 0..RAINDROP_COUNT {
            let drop = state.sample(rng);
            state.raindrops.push(drop);
        }
        state
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> Raindrop {
        Raindrop {
            x: rng.gen::<f64>() * self.width,
            y: rng.gen::<f64>() * self.height,
            speed: rng.gen_range(RAINDROP_SPEED.0..RAINDROP_SPEED.1),
            length: rng.gen_range(RAINDROP_LENGTH.0..RAINDROP_LENGTH.1),
        }
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        if self.frozen {
            return;
        }
        self.time += SCENERY_TIME_STEP;

        for index in 0..self.raindrops.len() {
            let mut drop = self.raindrops[index];
            drop.y += drop.speed;
            drop.x += RAIN_DRIFT;

            if drop.y > self.height {
                drop = self.sample(rng);
                drop.y = -drop.length;
            }
            if drop.x > self.width {
                drop.x = -drop.length;
            }
            self.raindrops[index] = drop;
        }
    }

    pub fn raindrops(&self) -> &[Raindrop] {
        &self.raindrops
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    fn flip(&self, x: f64, y: f64) -> (f64, f64) {
        (x, self.height - y)
    }

    fn paint_sun(&self, ctx: &mut Context<'_>) {
        let (cx, cy) = SUN_POSITION;
        let reach = SUN_RAY_OUTER + (self.time * 2.0).sin() * SUN_RAY_PULSE;
        for ray in 0..SUN_RAYS {
            let angle = self.time + (ray + 1) as f64 * std::f64::consts::TAU / SUN_RAYS as f64;
            let (sin, cos) = angle.sin_cos();
            let (x1, y1) = self.flip(cx + cos * SUN_RAY_INNER, cy + sin * SUN_RAY_INNER);
            let (x2, y2) = self.flip(cx + cos * reach, cy + sin * reach);
            ctx.draw(&Line { x1, y1, x2, y2, color: Color::Rgb(255, 200, 0) });
        }
        let (x, y) = self.flip(cx, cy);
        ctx.draw(&Circle { x, y, radius: SUN_RADIUS, color: Color::Yellow });
    }

    fn paint_hills(&self, ctx: &mut Context<'_>) {
        let hill = |x: f64| self.height - HILL_BASE + (x * HILL_FREQUENCY + self.time).sin() * HILL_AMPLITUDE;
        let mut x = 0.0;
        while x < self.width {
            let next = (x + HILL_STEP).min(self.width);
            let (x1, y1) = self.flip(x, hill(x));
            let (x2, y2) = self.flip(next, hill(next));
            ctx.draw(&Line { x1, y1, x2, y2, color: Color::LightGreen });
            x = next;
        }
    }

    fn paint_rain(&self, ctx: &mut Context<'_>) {
        for drop in &self.raindrops {
            let (x1, y1) = self.flip(drop.x, drop.y);
            let (x2, y2) = self.flip(drop.x + drop.length * 0.1, drop.y + drop.length);
            ctx.draw(&Line { x1, y1, x2, y2, color: Color::Blue });
        }
    }
}

#[derive(Debug, Default)]
pub struct Background;

impl Background {
    pub fn new() -> Self {
        Self
    }
}

impl StatefulWidget for Background {
    type State = BackgroundState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut BackgroundState)
    where
        Self: Sized,
    {
        let state = &*state;
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, state.width])
            .y_bounds([0.0, state.height])
            .paint(|ctx| {
                state.paint_rain(ctx);
                ctx.layer();
                state.paint_hills(ctx);
                ctx.layer();
                state.paint_sun(ctx);
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_pool_size_is_fixed() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = BackgroundState::new(&mut rng, 320.0, 480.0);
        for _ in 0..1_000 {
            state.update(&mut rng);
        }
        assert_eq!(state.raindrops().len(), RAINDROP_COUNT);
    }

    #[test]
    fn test_drop_respawns_above_when_it_lands() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = BackgroundState::new(&mut rng, 320.0, 480.0);
        state.raindrops[0] = Raindrop { x: 10.0, y: 479.0, speed: 4.0, length: 12.0 };
        state.update(&mut rng);
        let drop = state.raindrops()[0];
        assert_eq!(drop.y, -drop.length);
        assert!(drop.x >= 0.0 && drop.x <= 320.0 + RAIN_DRIFT);
    }

    #[test]
    fn test_drop_wraps_horizontally() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = BackgroundState::new(&mut rng, 320.0, 480.0);
        state.raindrops[0] = Raindrop { x: 320.0, y: 100.0, speed: 4.0, length: 12.0 };
        state.update(&mut rng);
        assert_eq!(state.raindrops()[0], Raindrop { x: -12.0, y: 104.0, speed: 4.0, length: 12.0 });
    }

    #[test]
    fn test_frozen_scenery_stands_still() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = BackgroundState::new(&mut rng, 320.0, 480.0);
        let before = state.raindrops().to_vec();
        state.frozen = true;
        state.update(&mut rng);
        assert_eq!(state.raindrops(), &before[..]);
        assert_eq!(state.time(), 0.0);
    }
}
