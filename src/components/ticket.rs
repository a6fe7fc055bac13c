use crate::components::card::{GOLD, GREEN};
use crate::state::queue::QueueTicket;
use chrono::{DateTime, Local};
use tui::buffer::Buffer;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

/// The walk-up queue ticket, shown until the next one is issued.
pub struct TicketPanel<'a> {
    pub ticket: Option<&'a QueueTicket>,
    pub now: Option<DateTime<Local>>,
}

impl Widget for TicketPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(GOLD))
            .title(" Queue Ticket ");

        let lines = match self.ticket {
            None => vec![
                Line::from(""),
                Line::from("No ticket yet."),
                Line::from(Span::styled("Press Enter for a spot in line.", Style::default().fg(Color::DarkGray))),
            ],
            Some(ticket) => {
                let mut lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        ticket.code.clone(),
                        Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!("Issued {}", ticket.issued_label())),
                ];
                if let Some(game) = &ticket.game {
                    lines.push(Line::from(format!("For: {game}")));
                }
                if let Some(now) = self.now {
                    let minutes = (now - ticket.issued_at).num_minutes().max(0);
                    lines.push(Line::from(Span::styled(
                        format!("{minutes} min ago"),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Show this code to staff. Enter = new ticket",
                    Style::default().fg(Color::DarkGray),
                )));
                lines
            }
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
