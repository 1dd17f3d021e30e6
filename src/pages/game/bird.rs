use ratatui::widgets::canvas::{Circle, Context, Line, Points};

use crate::{
    constants::game::{
        BIRD_BEAK_COLOR, BIRD_BODY_COLOR, BIRD_RADIUS, BIRD_WING_COLOR, GRAVITY, HITBOX_SCALE, JUMP_VELOCITY,
        ROTATION_FACTOR, ROTATION_LIMIT, WING_STEP,
    },
    pages::game::object::{Object, Span},
};

#[derive(Debug, Clone)]
pub struct Bird {
    x: f64,
    y: f64,
    radius: f64,
    velocity: f64,
    rotation: f64,
    wing_angle: f64,
}

impl Bird {
    /// Places the bird a third of the way across and halfway down the field.
    pub fn new(field_width: f64, field_height: f64) -> Self {
        Self::at(field_width / 3.0, field_height / 2.0)
    }

    pub fn at(x: f64, y: f64) -> Self {
        Bird { x, y, radius: BIRD_RADIUS, velocity: 0.0, rotation: 0.0, wing_angle: 0.0 }
    }

    /// One tick of gravity.
    pub fn advance(&mut self) {
        self.velocity += GRAVITY;
        self.y += self.velocity;
        self.rotation = (self.velocity * ROTATION_FACTOR).clamp(-ROTATION_LIMIT, ROTATION_LIMIT);
        self.wing_angle += WING_STEP;
    }

    /// Replaces the current velocity, it does not add to it.
    pub fn jump(&mut self) {
        self.velocity = JUMP_VELOCITY;
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn wing_angle(&self) -> f64 {
        self.wing_angle
    }

    /// Full vertical extent, used against the playfield boundaries.
    pub fn vertical_extent(&self) -> Span {
        Span::around(self.y, self.radius)
    }

    /// Shrunken box used against obstacles.
    pub fn hitbox(&self) -> (Span, Span) {
        let half = self.radius * HITBOX_SCALE;
        (Span::around(self.x, half), Span::around(self.y, half))
    }

    // Rotates a point given relative to the bird's centre into canvas space.
    fn local(&self, dx: f64, dy: f64, field_height: f64) -> (f64, f64) {
        let (sin, cos) = self.rotation.sin_cos();
        self.transform_pos(self.x + dx * cos - dy * sin, self.y + dx * sin + dy * cos, field_height)
    }
}

impl Object for Bird {
    fn draw(&self, ctx: &mut Context<'_>, field_height: f64) {
        let r = self.radius;
        let local = |dx: f64, dy: f64| self.local(dx, dy, field_height);

        let (x, y) = self.transform_pos(self.x, self.y, field_height);
        ctx.draw(&Circle { x, y, radius: r, color: BIRD_BODY_COLOR });

        let (x, y) = local(-5.0, self.wing_angle.sin() * 5.0);
        ctx.draw(&Circle { x, y, radius: r * 0.5, color: BIRD_WING_COLOR });

        let (x, y) = local(r * 0.7, -r * 0.3);
        ctx.draw(&Circle { x, y, radius: r * 0.5, color: BIRD_BODY_COLOR });

        let eye = local(r * 0.9, -r * 0.4);
        ctx.draw(&Points { coords: &[eye], color: ratatui::style::Color::White });

        let beak = [local(r * 1.2, -r * 0.3), local(r * 1.6, -r * 0.1), local(r * 1.2, r * 0.1)];
        for (i, (x1, y1)) in beak.iter().enumerate() {
            let (x2, y2) = beak[(i + 1) % beak.len()];
            ctx.draw(&Line { x1: *x1, y1: *y1, x2, y2, color: BIRD_BEAK_COLOR });
        }
    }
}
