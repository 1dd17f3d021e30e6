use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, Padding, Row, Table, Widget},
};

use crate::{
    action::ActionState,
    config::{key_event_to_string, PageKeyBindings},
};

type Group = (String, Vec<(String, String)>);

/// Overlay listing the bindings of the global scope and the active page.
#[derive(Debug)]
pub struct Help {
    keybinding_groups: Vec<Group>,
    column_spacing: u16,
    margin_vertical: u16,
    margin_horizontal: u16,
}

impl Help {
    pub fn new(keybinding_groups: Vec<(String, PageKeyBindings)>) -> Self {
        let groups = keybinding_groups
            .into_iter()
            .map(|(group_name, keybindings)| {
                let mut keybindings: Vec<(String, String)> = keybindings
                    .iter()
                    .filter(|(_, action)| action.state == ActionState::Start)
                    .map(|(event, action)| (key_event_to_string(event), action.command.describe()))
                    .collect();
                keybindings.sort();
                (group_name, keybindings)
            })
            .collect();

        Self { keybinding_groups: groups, column_spacing: 3, margin_vertical: 0, margin_horizontal: 1 }
    }

    pub fn groups(&self) -> &[Group] {
        &self.keybinding_groups
    }

    fn render_group(&self, area: Rect, buf: &mut Buffer, group: &Group, key_length: u16, val_length: u16) {
        let (group_name, keybindings) = group;
        let rows: Vec<Row> = keybindings.iter().map(|(key, val)| Row::new(vec![key.clone(), val.clone()])).collect();

        let table = Table::new(rows, [Constraint::Length(key_length), Constraint::Min(val_length)])
            .column_spacing(self.column_spacing)
            .header(Row::new(vec!["Key", "Command"]).style(Style::new().bold()).bottom_margin(1))
            .block(
                Block::new()
                    .title(group_name.clone())
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::new().bold().fg(Color::Cyan))
                    .padding(Padding::symmetric(self.margin_horizontal, self.margin_vertical)),
            );

        Clear.render(area, buf);
        table.render(area, buf);
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let longest = |pick: fn(&(String, String)) -> usize| {
            self.keybinding_groups.iter().flat_map(|(_, bindings)| bindings.iter().map(pick)).max().unwrap_or(0)
                as u16
        };
        let key_length = longest(|binding: &(String, String)| binding.0.len()).max(3);
        let val_length = longest(|binding: &(String, String)| binding.1.len()).max(7);

        // + column spacing + padding on both sides + border
        let width = key_length + val_length + self.column_spacing + (self.margin_horizontal * 2) + 2;
        let heights: Vec<Constraint> = self
            .keybinding_groups
            .iter()
            // + padding on both sides + header + border
            .map(|(_, bindings)| Constraint::Length(bindings.len() as u16 + (self.margin_vertical * 2) + 2 + 2))
            .collect();

        let [area] = Layout::default()
            .flex(Flex::Center)
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(width)])
            .areas(area);
        let areas = Layout::default().flex(Flex::Center).direction(Direction::Vertical).constraints(heights).split(area);

        for (group, area) in self.keybinding_groups.iter().zip(areas.iter()) {
            self.render_group(*area, buf, group, key_length, val_length);
        }
    }
}
