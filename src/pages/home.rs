use std::collections::HashMap;

use color_eyre::eyre::{eyre, Result};
use derive_builder::Builder;
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::{Page, PageId};
use crate::{
    action::{act, Action, Command, HomeAction},
    config::{Config, PageKeyBindings},
    constants::{game::HIGH_SCORE_KEY, TITLE_TEXT},
    storage::{read_score, JsonFileStore},
    tui::Frame,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OptionItem {
    Start,
    Quit,
}

#[derive(Builder)]
pub struct HomePage {
    #[builder(default)]
    pub action_tx: Option<UnboundedSender<Action>>,
    #[builder(default)]
    pub keymap: PageKeyBindings,
    options: Vec<(OptionItem, &'static str)>,
    #[builder(default)]
    selected_option_index: usize,
    #[builder(default)]
    high_score: u64,
}

impl HomePage {
    pub fn new() -> Result<Self> {
        HomePageBuilder::default()
            .options(vec![(OptionItem::Start, "Start playing"), (OptionItem::Quit, "Quit")])
            .build()
            .map_err(|e| eyre!("Failed to build home page: {e}"))
    }

    pub fn up(&mut self) {
        self.selected_option_index = self.selected_option_index.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.selected_option_index + 1 < self.options.len() {
            self.selected_option_index += 1;
        }
    }

    pub fn selected(&self) -> OptionItem {
        self.options[self.selected_option_index].0
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }
}

impl Page for HomePage {
    fn id(&self) -> PageId {
        PageId::Home
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
        self.high_score = read_score(&store, HIGH_SCORE_KEY);
        debug!("Loaded high score {} from {}", self.high_score, store.path().display());
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Command::Home(command) = action.command {
            match command {
                HomeAction::Up => self.up(),
                HomeAction::Down => self.down(),
                HomeAction::Select => {
                    return Ok(Some(match self.selected() {
                        OptionItem::Start => act!(Command::StartGame),
                        OptionItem::Quit => act!(Command::Quit),
                    }))
                },
            }
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        let title_lines: Vec<&str> = TITLE_TEXT.lines().filter(|s| !s.is_empty()).collect();
        let num_title_lines = title_lines.len() as u16;

        // One blank row between options
        let option_height = self.options.len() as u16 * 2 - 1;

        let [title_area, score_area, option_area] = Layout::vertical([
            Constraint::Length(num_title_lines),
            Constraint::Length(1),
            Constraint::Length(option_height),
        ])
        .flex(layout::Flex::SpaceAround)
        .areas(rect);

        let lines = title_lines.iter().map(|line| Line::from(*line)).collect::<Vec<_>>();
        let title = Paragraph::new(lines).style(Style::default().fg(Color::Yellow)).alignment(Alignment::Center);
        f.render_widget(Clear, title_area);
        f.render_widget(title, title_area);

        let score = Paragraph::new(format!("High score: {}", self.high_score))
            .style(Style::default().fg(Color::White).bold())
            .alignment(Alignment::Center);
        f.render_widget(score, score_area);

        let max_option_len = self.options.iter().map(|(_, title)| title.len()).max().unwrap_or(0);
        let [option_area] = Layout::horizontal([Constraint::Length(max_option_len as u16 + 2 * 2)])
            .flex(layout::Flex::Center)
            .areas(option_area);

        let mut lines = Vec::with_capacity(self.options.len() * 2);
        for (index, (_, title)) in self.options.iter().enumerate() {
            if index > 0 {
                lines.push(Line::from(""));
            }
            let style = if index == self.selected_option_index {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::White).bg(Color::Black)
            };
            lines.push(Line::from(format!("  {title:<max_option_len$}  ")).style(style));
        }
        f.render_widget(Paragraph::new(lines), option_area);

        Ok(())
    }
}
