use std::f64::consts::FRAC_PI_4;

use ratatui::style::Color;

// Playfield, in logical units. y grows downwards.
pub const FIELD_WIDTH: f64 = 320.0;
pub const FIELD_HEIGHT: f64 = 480.0;

pub const BIRD_RADIUS: f64 = 12.0;
pub const GRAVITY: f64 = 0.15;
pub const JUMP_VELOCITY: f64 = -4.0;
pub const ROTATION_FACTOR: f64 = 0.1;
pub const ROTATION_LIMIT: f64 = FRAC_PI_4;
pub const WING_STEP: f64 = 0.2;
pub const BIRD_BODY_COLOR: Color = Color::Yellow;
pub const BIRD_WING_COLOR: Color = Color::LightYellow;
pub const BIRD_BEAK_COLOR: Color = Color::LightRed;

pub const LIGHTNING_WIDTH: f64 = 20.0;
pub const LIGHTNING_GAP: f64 = 300.0;
pub const LIGHTNING_SPEED: f64 = 0.8;
pub const LIGHTNING_FLICKER_STEP: f64 = 0.1;
pub const ZIGZAG_WIDTH: f64 = 30.0;
pub const SEGMENT_HEIGHT: f64 = 20.0;
// Minimum clearance between a gap and the top or bottom of the playfield.
pub const GAP_MARGIN: f64 = 40.0;
// A new bolt spawns once the last one is this far left of the right edge.
pub const SPAWN_DISTANCE: f64 = 400.0;

// Tuned collision margins, kept as found.
pub const BOUNDARY_MARGIN: f64 = 5.0;
pub const HITBOX_SCALE: f64 = 0.8;
pub const OBSTACLE_HALF_SPAN: f64 = 10.0;

pub const CLOUD_CAPACITY: usize = 10;
pub const CLOUD_OFFSET: (f64, f64) = (-40.0, -30.0);
pub const CLOUD_BASE_SIZE: f64 = 15.0;
pub const CLOUD_SHRINK: f64 = 0.5;

pub const HIGH_SCORE_KEY: &str = "high_score";
