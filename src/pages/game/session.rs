use rand::Rng;

use crate::{
    constants::game::{BOUNDARY_MARGIN, FIELD_HEIGHT, FIELD_WIDTH, OBSTACLE_HALF_SPAN},
    pages::game::{bird::Bird, cloud::Cloud, object::Span, stream::LightningStream},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Playing,
    Over,
}

/// Everything that makes up one play-through.
#[derive(Debug, Clone)]
pub struct Session {
    state: State,
    score: u32,
    bird: Bird,
    cloud: Cloud,
    stream: LightningStream,
    width: f64,
    height: f64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FIELD_WIDTH, FIELD_HEIGHT)
    }
}

impl Session {
    pub fn new(width: f64, height: f64) -> Self {
        Session {
            state: State::Idle,
            score: 0,
            bird: Bird::new(width, height),
            cloud: Cloud::default(),
            stream: LightningStream::new(width, height),
            width,
            height,
        }
    }

    fn reset(&mut self) {
        self.score = 0;
        self.bird = Bird::new(self.width, self.height);
        self.cloud = Cloud::default();
        self.stream = LightningStream::new(self.width, self.height);
        self.state = State::Playing;
    }

    /// Leaves the start screen. Does nothing once started.
    pub fn start(&mut self) -> bool {
        if self.state != State::Idle {
            return false;
        }
        self.reset();
        true
    }

    /// Fresh play-through after a game over.
    pub fn restart(&mut self) -> bool {
        if self.state != State::Over {
            return false;
        }
        self.reset();
        true
    }

    pub fn jump(&mut self) -> bool {
        if self.state != State::Playing {
            return false;
        }
        self.bird.jump();
        true
    }

    /// Advances one tick. Returns true if this tick ended the game.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.state != State::Playing {
            return false;
        }

        self.bird.advance();
        self.cloud.record(&self.bird);
        self.stream.update(rng);

        if self.collides() {
            self.state = State::Over;
            return true;
        }
        self.update_score();
        false
    }

    /// Boundary or bolt contact for the bird's current position.
    pub fn collides(&self) -> bool {
        let extent = self.bird.vertical_extent();
        if extent.lo <= BOUNDARY_MARGIN || extent.hi >= self.height - BOUNDARY_MARGIN {
            return true;
        }

        let (horizontal, vertical) = self.bird.hitbox();
        self.stream.iter().any(|bolt| {
            horizontal.overlaps(&Span::around(bolt.x(), OBSTACLE_HALF_SPAN)) && !vertical.within(&bolt.gap_span())
        })
    }

    fn update_score(&mut self) -> u32 {
        let bird_x = self.bird.x();
        let mut passed = 0;
        for bolt in self.stream.iter_mut() {
            if bolt.right() < bird_x && bolt.mark_scored() {
                passed += 1;
            }
        }
        self.score += passed;
        passed
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn started(&self) -> bool {
        self.state != State::Idle
    }

    pub fn is_over(&self) -> bool {
        self.state == State::Over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn cloud(&self) -> &Cloud {
        &self.cloud
    }

    pub fn stream(&self) -> &LightningStream {
        &self.stream
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{constants::game::BIRD_RADIUS, pages::game::lightning::Lightning};

    fn playing() -> Session {
        let mut session = Session::default();
        assert!(session.start());
        session
    }

    fn bolt_at(x: f64, top: f64) -> Lightning {
        Lightning::with_top(&mut StdRng::seed_from_u64(0), x, top, FIELD_HEIGHT)
    }

    #[test]
    fn test_idle_session_ignores_input() {
        let mut session = Session::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(!session.jump());
        assert!(!session.tick(&mut rng));
        assert!(session.stream().is_empty());
        assert!(!session.started());
    }

    #[test]
    fn test_bottom_boundary_ends_game() {
        let mut session = playing();
        session.bird = Bird::at(FIELD_WIDTH / 3.0, FIELD_HEIGHT - BOUNDARY_MARGIN + BIRD_RADIUS);
        assert!(session.stream().is_empty());
        assert!(session.collides());
    }

    #[test]
    fn test_top_boundary_ends_game() {
        let mut session = playing();
        session.bird = Bird::at(FIELD_WIDTH / 3.0, BOUNDARY_MARGIN + BIRD_RADIUS);
        assert!(session.collides());
        session.bird = Bird::at(FIELD_WIDTH / 3.0, BOUNDARY_MARGIN + BIRD_RADIUS + 0.1);
        assert!(!session.collides());
    }

    #[test]
    fn test_inside_gap_is_safe() {
        let mut session = playing();
        session.bird = Bird::at(107.0, 250.0);
        session.stream.push(bolt_at(100.0, 100.0));
        assert!(!session.collides());
    }

    #[test]
    fn test_clipping_bolt_ends_game() {
        let mut session = playing();
        session.bird = Bird::at(107.0, 105.0);
        session.stream.push(bolt_at(100.0, 100.0));
        assert!(session.collides());

        session.bird = Bird::at(107.0, 395.0);
        assert!(session.collides());
    }

    #[test]
    fn test_bolt_out_of_horizontal_reach_is_safe() {
        let mut session = playing();
        session.bird = Bird::at(107.0, 50.0);
        session.stream.push(bolt_at(107.0 + BIRD_RADIUS * 0.8 + OBSTACLE_HALF_SPAN + 0.5, 100.0));
        assert!(!session.collides());
    }

    #[test]
    fn test_tick_reports_game_over_once() {
        let mut session = playing();
        let mut rng = StdRng::seed_from_u64(0);
        let mut endings = 0;
        for _ in 0..1_000 {
            if session.tick(&mut rng) {
                endings += 1;
            }
        }
        assert_eq!(endings, 1);
        assert!(session.is_over());
    }

    #[test]
    fn test_game_over_freezes_state() {
        let mut session = playing();
        let mut rng = StdRng::seed_from_u64(0);
        while !session.tick(&mut rng) {}

        let y = session.bird().y();
        let score = session.score();
        let bolts: Vec<f64> = session.stream().iter().map(|b| b.x()).collect();
        for _ in 0..10 {
            assert!(!session.tick(&mut rng));
        }
        assert!(!session.jump());
        assert_eq!(session.bird().y(), y);
        assert_eq!(session.score(), score);
        assert_eq!(session.stream().iter().map(|b| b.x()).collect::<Vec<_>>(), bolts);
    }

    #[test]
    fn test_each_bolt_scores_once() {
        let mut session = playing();
        let bird_x = session.bird().x();
        session.stream.push(bolt_at(bird_x - 30.0, 100.0));
        session.stream.push(bolt_at(bird_x + 5.0, 100.0));

        assert_eq!(session.update_score(), 1);
        assert_eq!(session.update_score(), 0);
        assert_eq!(session.score(), 1);
        assert!(session.stream().iter().next().unwrap().scored());
        assert!(!session.stream().iter().nth(1).unwrap().scored());
    }

    #[test]
    fn test_score_accumulates_while_flying_through_gaps() {
        let mut session = playing();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..3_000 {
            // Hold the bird at the centre of whatever gap is coming.
            let target = session
                .stream()
                .iter()
                .find(|bolt| !bolt.scored())
                .map(|bolt| (bolt.top() + bolt.bottom()) / 2.0)
                .unwrap_or(FIELD_HEIGHT / 2.0);
            if session.bird().y() + session.bird().velocity() > target {
                session.jump();
            }
            assert!(!session.tick(&mut rng), "crashed with score {}", session.score());
        }
        assert!(session.score() >= 3);
        assert!(session.score() as u64 <= session.stream().spawned());
    }

    #[test]
    fn test_restart_resets_play_state() {
        let mut session = playing();
        let mut rng = StdRng::seed_from_u64(0);
        session.score = 4;
        while !session.tick(&mut rng) {}

        assert!(session.restart());
        assert_eq!(session.score(), 0);
        assert!(!session.is_over());
        assert!(session.started());
        assert!(session.stream().is_empty());
        assert!(session.cloud().is_empty());
        assert_eq!(session.bird().y(), FIELD_HEIGHT / 2.0);
    }

    #[test]
    fn test_restart_requires_game_over() {
        let mut session = playing();
        assert!(!session.restart());
        assert!(!session.start());
    }
}
