pub const RAINDROP_COUNT: usize = 100;
pub const RAINDROP_SPEED: (f64, f64) = (3.0, 5.0);
pub const RAINDROP_LENGTH: (f64, f64) = (10.0, 20.0);
pub const RAIN_DRIFT: f64 = 0.5;

pub const SCENERY_TIME_STEP: f64 = 0.01;

pub const SUN_POSITION: (f64, f64) = (50.0, 50.0);
pub const SUN_RADIUS: f64 = 20.0;
pub const SUN_RAYS: usize = 12;
pub const SUN_RAY_INNER: f64 = 20.0;
pub const SUN_RAY_OUTER: f64 = 35.0;
pub const SUN_RAY_PULSE: f64 = 5.0;

pub const HILL_BASE: f64 = 100.0;
pub const HILL_AMPLITUDE: f64 = 20.0;
pub const HILL_FREQUENCY: f64 = 0.02;
pub const HILL_STEP: f64 = 50.0;
