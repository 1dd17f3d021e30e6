mod game;
mod home;

use serde::{Deserialize, Serialize};
use strum::Display;

pub use crate::action::{game::GameAction, home::HomeAction};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Display, Deserialize, Default)]
pub enum ActionState {
    #[default]
    Start,
    Repeat,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Command {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Error(String),
    ToggleShowHelp,
    // Session lifecycle, broadcast so the app can drive pages and scenery
    StartGame,
    RestartGame,
    GameOver,
    // Page actions
    Home(HomeAction),
    Game(GameAction),
}

impl Command {
    /// Human readable name, used by the help overlay.
    pub fn describe(&self) -> String {
        match self {
            Command::Home(action) => action.to_string(),
            Command::Game(action) => action.to_string(),
            command => command.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub command: Command,
    pub state: ActionState,
}

macro_rules! act {
    ($command:expr) => {
        $crate::action::Action { command: $command, state: $crate::action::ActionState::default() }
    };
    ($command:expr, $state:expr) => {
        $crate::action::Action { command: $command, state: $state }
    };
}

pub(crate) use act;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_act_defaults_to_start() {
        let action = act!(Command::Quit);
        assert_eq!(action, Action { command: Command::Quit, state: ActionState::Start });
    }

    #[test]
    fn test_describe_unwraps_page_actions() {
        assert_eq!(Command::Game(GameAction::Jump).describe(), "Jump");
        assert_eq!(Command::Home(HomeAction::Select).describe(), "Select");
        assert_eq!(Command::ToggleShowHelp.describe(), "ToggleShowHelp");
    }

    #[test]
    fn test_command_from_yaml() {
        let command: Command = serde_yaml::from_str("Quit").unwrap();
        assert_eq!(command, Command::Quit);
        let action: GameAction = serde_yaml::from_str("Jump").unwrap();
        assert_eq!(action, GameAction::Jump);
    }
}
