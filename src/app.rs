use color_eyre::eyre::Result;
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};

use crate::{
    action::{act, Action, Command},
    components::{
        background::{Background, BackgroundState},
        help::Help,
    },
    config::Config,
    constants::{
        game::{FIELD_HEIGHT, FIELD_WIDTH},
        HEIGHT, WIDTH,
    },
    pages::{game::GamePage, home::HomePage, Page, PageId},
    tui::{self, Frame},
};

/// Maps terminal events that do not depend on key bindings onto commands.
fn event_action(event: &tui::Event) -> Option<Action> {
    match event {
        tui::Event::Closed => Some(act!(Command::Quit)),
        tui::Event::Error(message) => Some(act!(Command::Error(message.clone()))),
        tui::Event::Tick => Some(act!(Command::Tick)),
        tui::Event::Render => Some(act!(Command::Render)),
        tui::Event::Resize(x, y) => Some(act!(Command::Resize(*x, *y))),
        tui::Event::Key(_) | tui::Event::Mouse(_) => None,
    }
}

pub struct App {
    config: Config,
    tick_rate: f64,
    frame_rate: f64,
    should_quit: bool,
    should_suspend: bool,
    show_help: bool,
    pages: Vec<Box<dyn Page>>,
    active_page_index: usize,
    background_state: BackgroundState,
    rng: StdRng,
}

impl App {
    pub fn new(tick_rate: f64, frame_rate: f64, mute: bool) -> Result<Self> {
        let mut config = Config::new()?;
        config.audio.muted |= mute;

        let mut rng = StdRng::from_entropy();
        let background_state = BackgroundState::new(&mut rng, FIELD_WIDTH, FIELD_HEIGHT);

        Ok(Self {
            tick_rate,
            frame_rate,
            should_quit: false,
            should_suspend: false,
            show_help: false,
            config,
            pages: vec![Box::new(HomePage::new()?), Box::new(GamePage::new())],
            active_page_index: 0,
            background_state,
            rng,
        })
    }

    fn active_page(&mut self) -> &mut Box<dyn Page> {
        &mut self.pages[self.active_page_index]
    }

    fn set_active_page(&mut self, id: PageId) {
        if let Some(index) = self.pages.iter().position(|page| page.id() == id) {
            self.active_page_index = index;
        }
    }

    /// Scenery only moves behind a running game, and pauses under the help overlay.
    fn tick_scenery(&mut self) {
        if self.show_help || self.pages[self.active_page_index].id() != PageId::Game {
            return;
        }
        self.background_state.update(&mut self.rng);
    }

    fn enter_tui(&self) -> Result<tui::Tui> {
        let mut tui = tui::Tui::new()?.mouse(true);
        tui.tick_rate(self.tick_rate);
        tui.frame_rate(self.frame_rate);
        tui.enter()?;
        Ok(tui)
    }

    /// Looks the key up in the active page's bindings first, then the global ones.
    fn lookup_key(&mut self, key: crossterm::event::KeyEvent) -> Option<Action> {
        let page_id = self.active_page().id();
        self.config
            .keybindings
            .pages
            .get(&page_id)
            .and_then(|keymap| keymap.get(&key))
            .or_else(|| self.config.keybindings.global.get(&key))
            .cloned()
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = self.enter_tui()?;

        for page in self.pages.iter_mut() {
            page.register_keymap(&self.config.keybindings.pages)?;
            page.register_action_handler(action_tx.clone())?;
            page.register_config_handler(self.config.clone())?;
            page.init()?;
        }

        loop {
            if let Some(e) = tui.next().await {
                let action = match &e {
                    tui::Event::Key(key) => self.lookup_key(*key).inspect(|action| debug!("Got action: {action:?}")),
                    event => event_action(event),
                };
                if let Some(action) = action {
                    action_tx.send(action)?;
                }
                if !self.show_help {
                    if let Some(action) = self.active_page().handle_events(Some(e))? {
                        action_tx.send(action)?;
                    }
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                let Action { command, .. } = &action;
                if *command != Command::Tick && *command != Command::Render {
                    debug!("{command:?}");
                }
                match command {
                    Command::Tick => self.tick_scenery(),
                    Command::Quit => self.should_quit = true,
                    Command::Suspend => self.should_suspend = true,
                    Command::Resume => self.should_suspend = false,
                    Command::ToggleShowHelp => self.show_help = !self.show_help,
                    Command::Error(message) => tracing::error!("{message}"),
                    Command::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, *w, *h))?;
                        self.render(&mut tui, &action_tx)?;
                    },
                    Command::Render => {
                        self.render(&mut tui, &action_tx)?;
                    },
                    Command::StartGame => {
                        info!("Starting a new game");
                        self.set_active_page(PageId::Game);
                    },
                    Command::GameOver => self.background_state.frozen = true,
                    Command::RestartGame => self.background_state.frozen = false,
                    _ => {},
                }
                // Quit always reaches the page so it can release the audio device
                if !self.show_help || *command == Command::Quit {
                    if let Some(action) = self.active_page().update(action)? {
                        action_tx.send(action)?
                    }
                }
            }
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(act!(Command::Resume))?;
                tui = self.enter_tui()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    fn render(&mut self, tui: &mut tui::Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
        tui.draw(|f| {
            let area = f.area();

            let [_, area, _] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(HEIGHT), Constraint::Fill(1)]).areas(area);
            let [_, area, _] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(WIDTH), Constraint::Fill(1)]).areas(area);

            let border = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(Color::Black));
            f.render_widget(border, area);

            let area = area.inner(Margin { horizontal: 1, vertical: 1 });

            f.render_stateful_widget(Background::new(), area, &mut self.background_state);

            if let Err(e) = self.active_page().draw(f, area) {
                let _ = action_tx.send(act!(Command::Error(format!("Failed to draw: {e:?}"))));
            }

            if self.show_help {
                self.draw_help(f, area);
            }
        })?;

        Ok(())
    }

    fn draw_help(&mut self, f: &mut Frame<'_>, rect: Rect) {
        let page_id = self.active_page().id();
        let mut groups = vec![("System".to_string(), self.config.keybindings.global.clone())];
        if let Some(keymap) = self.config.keybindings.pages.get(&page_id) {
            groups.push((page_id.to_string(), keymap.clone()));
        }
        f.render_widget(Help::new(groups), rect);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_scenery_waits_for_the_game() -> Result<()> {
        let mut app = App::new(60.0, 60.0, true)?;
        app.tick_scenery();
        assert_eq!(app.background_state.time(), 0.0);

        app.set_active_page(PageId::Game);
        app.tick_scenery();
        assert!(app.background_state.time() > 0.0);

        let time = app.background_state.time();
        app.show_help = true;
        app.tick_scenery();
        assert_eq!(app.background_state.time(), time);
        Ok(())
    }

    #[test]
    fn test_closed_input_quits() {
        assert_eq!(event_action(&tui::Event::Closed), Some(act!(Command::Quit)));
    }

    #[test]
    fn test_terminal_events_become_commands() {
        assert_eq!(event_action(&tui::Event::Tick), Some(act!(Command::Tick)));
        assert_eq!(event_action(&tui::Event::Resize(80, 24)), Some(act!(Command::Resize(80, 24))));
        assert_eq!(
            event_action(&tui::Event::Error("broken pipe".to_string())),
            Some(act!(Command::Error("broken pipe".to_string())))
        );
        assert_eq!(event_action(&tui::Event::Key(KeyEvent::from(KeyCode::Char('q')))), None);
    }
}
