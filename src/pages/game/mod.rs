mod bird;
mod cloud;
mod lightning;
mod object;
mod session;
mod stream;

use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    layout::{Alignment, Position, Rect},
    style::{Color, Style, Stylize},
    symbols::Marker,
    widgets::{canvas::Canvas, Paragraph, Widget},
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

pub use self::session::{Session, State};
use self::object::Object;
use super::{Page, PageId};
use crate::{
    action::{act, Action, ActionState, Command, GameAction},
    audio::AudioController,
    components::panel::Panel,
    config::{Config, PageKeyBindings},
    constants::game::HIGH_SCORE_KEY,
    storage::{read_score, record_best, JsonFileStore, MemoryStore, ScoreStore},
    tui::Frame,
};

/// Final numbers of a finished run, shown until the next restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub score: u32,
    pub best: u64,
}

pub struct GamePage {
    pub action_tx: Option<UnboundedSender<Action>>,
    pub keymap: PageKeyBindings,
    session: Session,
    audio: AudioController,
    store: Box<dyn ScoreStore>,
    rng: StdRng,
    canvas: Rect,
    high_score: u64,
    outcome: Option<Outcome>,
}

impl GamePage {
    pub fn new() -> Self {
        Self::with_parts(Box::new(MemoryStore::default()), AudioController::muted(), StdRng::from_entropy())
    }

    pub fn with_parts(store: Box<dyn ScoreStore>, audio: AudioController, rng: StdRng) -> Self {
        let high_score = read_score(store.as_ref(), HIGH_SCORE_KEY);
        GamePage {
            action_tx: None,
            keymap: PageKeyBindings::default(),
            session: Session::default(),
            audio,
            store,
            rng,
            canvas: Rect::default(),
            high_score,
            outcome: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn audio(&self) -> &AudioController {
        &self.audio
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    fn tick(&mut self) -> Option<Action> {
        if self.session.tick(&mut self.rng) {
            self.audio.stop();
            let score = self.session.score();
            self.high_score = record_best(self.store.as_mut(), HIGH_SCORE_KEY, score as u64);
            self.outcome = Some(Outcome { score, best: self.high_score });
            info!("Game over with score {score}, best {}", self.high_score);
            return Some(act!(Command::GameOver));
        }
        if self.session.state() == State::Playing {
            self.audio.update(self.session.bird().wing_angle(), &mut self.rng);
        }
        None
    }
}

/// The playfield canvas, sized to the session's own field.
fn field(session: &Session) -> impl Widget + '_ {
    let height = session.height();
    Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, session.width()])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            session.cloud().draw(ctx, height);
            ctx.layer();
            for bolt in session.stream().iter() {
                bolt.draw(ctx, height);
            }
            ctx.layer();
            session.bird().draw(ctx, height);
        })
}

impl Default for GamePage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for GamePage {
    fn id(&self) -> PageId {
        PageId::Game
    }

    fn register_keymap(&mut self, keymaps: &HashMap<PageId, PageKeyBindings>) -> Result<()> {
        if let Some(keymap) = keymaps.get(&self.id()) {
            self.keymap = keymap.clone();
        }
        Ok(())
    }

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(tx);
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        let store = JsonFileStore::open(config.config._data_dir.join("store.json"));
        debug!("Scores are kept in {}", store.path().display());
        self.high_score = read_score(&store, HIGH_SCORE_KEY);
        self.store = Box::new(store);
        self.audio = AudioController::new(config.audio.master_volume, config.audio.muted);
        Ok(())
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let inside = self.canvas.contains(Position::new(mouse.column, mouse.row));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside && self.session.state() == State::Playing => {
                Ok(Some(act!(Command::Game(GameAction::Jump))))
            },
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let Action { command, state } = action;
        match command {
            Command::StartGame => {
                if self.session.start() {
                    self.audio.start();
                    self.outcome = None;
                }
            },
            Command::Game(GameAction::Jump) if state == ActionState::Start => {
                self.session.jump();
            },
            Command::Game(GameAction::Restart) if state == ActionState::Start => {
                if self.session.restart() {
                    self.audio.start();
                    self.outcome = None;
                    return Ok(Some(act!(Command::RestartGame)));
                }
            },
            Command::Tick => return Ok(self.tick()),
            Command::Quit => self.audio.stop(),
            _ => {},
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        self.canvas = area;

        let session = &self.session;
        f.render_widget(field(session), area);

        let score = Paragraph::new(format!("Score: {}", session.score()))
            .style(Style::default().fg(Color::White).bold())
            .alignment(Alignment::Left);
        f.render_widget(score, Rect { height: 1.min(area.height), ..area });

        if let Some(Outcome { score, best }) = self.outcome {
            let panel = Panel::new("Game Over")
                .line(format!("Score: {score}"))
                .line(format!("Best: {best}"))
                .line("")
                .line("Enter to retry")
                .color(Color::Red);
            f.render_widget(panel, area);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use ratatui::buffer::Buffer;

    use super::*;

    fn page_with_best(best: u64) -> GamePage {
        let mut store = MemoryStore::default();
        record_best(&mut store, HIGH_SCORE_KEY, best);
        GamePage::with_parts(Box::new(store), AudioController::muted(), StdRng::seed_from_u64(7))
    }

    fn run_until_over(page: &mut GamePage) -> Result<u32> {
        for ticks in 1..=1_000 {
            if let Some(action) = page.update(act!(Command::Tick))? {
                assert_eq!(action, act!(Command::GameOver));
                return Ok(ticks);
            }
        }
        panic!("game never ended");
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn test_ticks_before_start_do_nothing() -> Result<()> {
        let mut page = page_with_best(0);
        assert_eq!(page.update(act!(Command::Tick))?, None);
        assert_eq!(page.session().state(), State::Idle);
        Ok(())
    }

    #[test]
    fn test_falling_bird_ends_game_and_keeps_best() -> Result<()> {
        let mut page = page_with_best(5);
        page.update(act!(Command::StartGame))?;
        assert_eq!(page.session().state(), State::Playing);

        run_until_over(&mut page)?;
        assert!(page.session().is_over());
        assert_eq!(page.outcome(), Some(Outcome { score: 0, best: 5 }));
        assert_eq!(page.high_score(), 5);

        // Nothing moves once the run is over
        assert_eq!(page.update(act!(Command::Tick))?, None);
        Ok(())
    }

    #[test]
    fn test_game_over_stops_audio() -> Result<()> {
        let mut page = GamePage::with_parts(
            Box::new(MemoryStore::default()),
            AudioController::playing_without_device(),
            StdRng::seed_from_u64(7),
        );
        page.update(act!(Command::StartGame))?;
        assert!(page.audio().is_playing());

        run_until_over(&mut page)?;
        assert!(!page.audio().is_playing());
        Ok(())
    }

    #[test]
    fn test_restart_only_after_game_over() -> Result<()> {
        let mut page = page_with_best(0);
        page.update(act!(Command::StartGame))?;
        assert_eq!(page.update(act!(Command::Game(GameAction::Restart)))?, None);

        run_until_over(&mut page)?;
        assert_eq!(page.update(act!(Command::Game(GameAction::Restart)))?, Some(act!(Command::RestartGame)));
        assert_eq!(page.session().state(), State::Playing);
        assert_eq!(page.outcome(), None);
        Ok(())
    }

    #[test]
    fn test_jumping_delays_the_fall() -> Result<()> {
        let mut idle = page_with_best(0);
        idle.update(act!(Command::StartGame))?;
        let falls_after = run_until_over(&mut idle)?;

        let mut flapping = page_with_best(0);
        flapping.update(act!(Command::StartGame))?;
        for _ in 0..30 {
            flapping.update(act!(Command::Tick))?;
        }
        flapping.update(act!(Command::Game(GameAction::Jump)))?;
        // Held keys repeat, only the press counts
        flapping.update(act!(Command::Game(GameAction::Jump), ActionState::Repeat))?;
        assert!(flapping.session().bird().velocity() < 0.0);
        assert!(run_until_over(&mut flapping)? + 30 > falls_after);
        Ok(())
    }

    fn painted_rows(buf: &Buffer) -> Vec<u16> {
        let area = buf.area;
        (area.top()..area.bottom())
            .filter(|&y| (area.left()..area.right()).any(|x| buf[(x, y)].symbol() != " "))
            .collect()
    }

    #[test]
    fn test_short_field_draws_bird_mid_canvas() {
        let session = Session::new(320.0, 240.0);
        let area = Rect::new(0, 0, 40, 30);
        let mut buf = Buffer::empty(area);
        field(&session).render(area, &mut buf);

        // The bird spawns halfway down, so it must land around the middle rows
        let rows = painted_rows(&buf);
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|row| (11..=19).contains(row)), "{rows:?}");
    }

    #[test]
    fn test_click_inside_playfield_jumps() -> Result<()> {
        let mut page = page_with_best(0);
        page.canvas = Rect::new(10, 5, 40, 30);
        assert_eq!(page.handle_mouse_events(click(20, 10))?, None);

        page.update(act!(Command::StartGame))?;
        assert_eq!(page.handle_mouse_events(click(20, 10))?, Some(act!(Command::Game(GameAction::Jump))));
        assert_eq!(page.handle_mouse_events(click(2, 10))?, None);
        Ok(())
    }
}
