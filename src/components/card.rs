use sheet_api::GameRecord;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap};

pub const CARD_WIDTH: u16 = 30;
pub const CARD_HEIGHT: u16 = 7;

/// Brand colors: kickoff green and trophy gold.
pub const GREEN: Color = Color::Rgb(0, 255, 136);
pub const GOLD: Color = Color::Rgb(201, 162, 39);

/// One game on the shelf: title, platform badges, genre, station and
/// whether a trailer can be played.
pub struct GameCard<'a> {
    pub game: &'a GameRecord,
    pub selected: bool,
}

impl Widget for GameCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 8 || area.height < 3 {
            return;
        }

        let border_style = if self.selected {
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if self.selected { BorderType::Double } else { BorderType::Rounded })
            .border_style(border_style);

        let title = if self.game.title.is_empty() { "(untitled)" } else { self.game.title.as_str() };
        let mut lines = vec![Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))];

        let mut badges: Vec<Span> = Vec::new();
        for platform in &self.game.platforms {
            badges.push(Span::styled(format!("[{platform}]"), Style::default().fg(GREEN)));
            badges.push(Span::raw(" "));
        }
        if !self.game.genre.is_empty() {
            badges.push(Span::styled(self.game.genre.clone(), Style::default().fg(Color::Gray)));
        }
        lines.push(Line::from(badges));

        if !self.game.station.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("Station: {}", self.game.station),
                Style::default().fg(Color::Gray),
            )));
        }

        let clip = if self.game.has_trailer() {
            Span::styled("▶ Watch clip", Style::default().fg(GOLD))
        } else {
            Span::styled("no clip", Style::default().fg(Color::DarkGray))
        };
        lines.push(Line::from(vec![clip, Span::styled("  b Book", Style::default().fg(Color::DarkGray))]));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

/// How many cards fit across `width`, at least one.
pub fn columns_for(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

/// How many card rows fit in `height`, at least one.
pub fn rows_for(height: u16) -> usize {
    (height / CARD_HEIGHT).max(1) as usize
}
