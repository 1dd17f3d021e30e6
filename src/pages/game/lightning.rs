use rand::Rng;
use ratatui::{
    style::Color,
    widgets::canvas::{Context, Line},
};

use crate::{
    constants::game::{
        GAP_MARGIN, LIGHTNING_FLICKER_STEP, LIGHTNING_GAP, LIGHTNING_SPEED, LIGHTNING_WIDTH, SEGMENT_HEIGHT,
        ZIGZAG_WIDTH,
    },
    pages::game::object::{Object, Span},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// A pair of bolts, one hanging from the top and one rising from the bottom,
/// with a gap between them.
#[derive(Debug, Clone)]
pub struct Lightning {
    x: f64,
    width: f64,
    gap: f64,
    speed: f64,
    top: f64,
    bottom: f64,
    scored: bool,
    time: f64,
    paths: [Vec<Segment>; 2],
}

impl Lightning {
    /// Spawns a bolt pair at `x` with the gap placed at random.
    pub fn new<R: Rng>(rng: &mut R, x: f64, field_height: f64) -> Self {
        let lowest = GAP_MARGIN;
        let highest = (field_height - LIGHTNING_GAP - GAP_MARGIN).max(lowest);
        let top = rng.gen_range(lowest..=highest);
        Self::with_top(rng, x, top, field_height)
    }

    pub fn with_top<R: Rng>(rng: &mut R, x: f64, top: f64, field_height: f64) -> Self {
        let bottom = top + LIGHTNING_GAP;
        let paths = [generate_path(rng, x, 0.0, top), generate_path(rng, x, bottom, field_height)];
        Lightning {
            x,
            width: LIGHTNING_WIDTH,
            gap: LIGHTNING_GAP,
            speed: LIGHTNING_SPEED,
            top,
            bottom,
            scored: false,
            time: 0.0,
            paths,
        }
    }

    pub fn advance(&mut self) {
        self.x -= self.speed;
        self.time += LIGHTNING_FLICKER_STEP;
        for segment in self.paths.iter_mut().flatten() {
            segment.x1 -= self.speed;
            segment.x2 -= self.speed;
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn gap_span(&self) -> Span {
        Span::new(self.top, self.bottom)
    }

    pub fn off_screen(&self) -> bool {
        self.right() <= 0.0
    }

    pub fn scored(&self) -> bool {
        self.scored
    }

    /// Flags the pair as passed. Returns false if it already was.
    pub fn mark_scored(&mut self) -> bool {
        !std::mem::replace(&mut self.scored, true)
    }

    pub fn paths(&self) -> &[Vec<Segment>; 2] {
        &self.paths
    }

    fn glow(&self) -> Color {
        if self.time.sin() > 0.0 {
            Color::White
        } else {
            Color::LightCyan
        }
    }
}

fn generate_path<R: Rng>(rng: &mut R, x: f64, from: f64, to: f64) -> Vec<Segment> {
    let mut jitter = || x + rng.gen::<f64>() * ZIGZAG_WIDTH - ZIGZAG_WIDTH / 2.0;
    let mut segments = Vec::new();
    let mut y = from;
    while y < to {
        segments.push(Segment { x1: jitter(), y1: y, x2: jitter(), y2: y + SEGMENT_HEIGHT });
        y += SEGMENT_HEIGHT;
    }
    segments
}

impl Object for Lightning {
    fn draw(&self, ctx: &mut Context<'_>, field_height: f64) {
        let color = self.glow();
        for segment in self.paths.iter().flatten() {
            let (x1, y1) = self.transform_pos(segment.x1, segment.y1, field_height);
            let (x2, y2) = self.transform_pos(segment.x2, segment.y2, field_height);
            ctx.draw(&Line { x1, y1, x2, y2, color });
        }
    }
}
