use ratatui::widgets::canvas::Context;

/// Something living on the playfield that can paint itself onto the canvas.
pub trait Object {
    fn draw(&self, ctx: &mut Context<'_>, field_height: f64);

    /// Playfield coordinates grow downwards, canvas coordinates upwards.
    fn transform_pos(&self, x: f64, y: f64, field_height: f64) -> (f64, f64) {
        (x, field_height - y)
    }
}

/// A closed interval along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub lo: f64,
    pub hi: f64,
}

impl Span {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn around(center: f64, half: f64) -> Self {
        Self { lo: center - half, hi: center + half }
    }

    /// Strict overlap, touching edges do not count.
    pub fn overlaps(&self, other: &Span) -> bool {
        interval_sec(self.lo, self.hi, other.lo, other.hi)
    }

    pub fn within(&self, outer: &Span) -> bool {
        self.lo >= outer.lo && self.hi <= outer.hi
    }
}

fn interval_sec(l1: f64, r1: f64, l2: f64, r2: f64) -> bool {
    r1 > l2 && l1 < r2
}
