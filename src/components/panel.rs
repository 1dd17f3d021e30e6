use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Widget},
};

/// Small centered popup with a title and a few lines of text.
#[derive(Debug, Clone)]
pub struct Panel<'a> {
    title: &'a str,
    lines: Vec<Line<'a>>,
    color: Color,
}

impl<'a> Panel<'a> {
    pub fn new(title: &'a str) -> Self {
        Self { title, lines: Vec::new(), color: Color::Cyan }
    }

    pub fn line(mut self, line: impl Into<Line<'a>>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// The area the panel occupies when centered in `area`.
    pub fn area(&self, area: Rect) -> Rect {
        let content_width = self.lines.iter().map(Line::width).chain([self.title.len()]).max().unwrap_or(0) as u16;
        // + padding + border
        let width = (content_width + 2 * 2 + 2).min(area.width);
        let height = (self.lines.len() as u16 + 2 + 2).min(area.height);

        let [area] = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center).areas(area);
        let [area] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(area);
        area
    }
}

impl Widget for Panel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let area = self.area(area);
        let block = Block::new()
            .title(self.title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::new().bold().fg(self.color))
            .padding(Padding::symmetric(2, 1));

        Clear.render(area, buf);
        Paragraph::new(self.lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White).bg(Color::Black))
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_panel_is_centered() {
        let panel = Panel::new("Game Over").line("Score: 3").line("Best: 10");
        let area = panel.area(Rect::new(0, 0, 40, 30));
        assert_eq!((area.width, area.height), (15, 6));
        assert!(area.x.abs_diff(40 - area.right()) <= 1);
        assert!(area.y.abs_diff(30 - area.bottom()) <= 1);
    }

    #[test]
    fn test_panel_is_clamped_to_area() {
        let panel = Panel::new("Game Over").line("a rather long line that does not fit");
        let area = panel.area(Rect::new(0, 0, 20, 4));
        assert_eq!(area.width, 20);
        assert_eq!(area.height, 4);
    }

    #[test]
    fn test_panel_renders_text() {
        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        Panel::new("Paused").line("hello").render(area, &mut buf);
        let text: String = buf.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("hello"));
        assert!(text.contains("Paused"));
    }
}
