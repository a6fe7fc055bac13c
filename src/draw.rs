use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::card::{self, CARD_HEIGHT, CARD_WIDTH, GOLD, GREEN, GameCard};
use crate::components::ticket::TicketPanel;
use crate::state::app_state::StatusKind;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use sheet_api::GameRecord;

static TABS: &[&str; 3] = &["Games", "Appointments", "Featured"];

const HELP_TEXT: &str = "\
Views     1 Games   2 Appointments   3 Featured   ? Help (Esc to leave)

Games     / or s   search (Enter keeps it, Esc clears)
          p / P    next / previous platform
          g / G    next / previous genre
          o        cycle sort
          c        clear search and filters

Cards     arrows or h j k l   move
          Enter or t          watch trailer
          b                   book: queue ticket for this game

Queue     Enter or n on Appointments issues a ticket

Other     r or F5 refresh   f full screen   v sheet issues   \" logs   q quit";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
            draw_status(f, layout.status, app);
        }

        let main = if app.state.show_issues {
            let [main, issues] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(40)]).areas(layout.main);
            draw_issues(f, issues, app);
            main
        } else {
            layout.main
        };

        match app.state.active_tab {
            MenuItem::Games => draw_games(f, main, app),
            MenuItem::Appointments => draw_appointments(f, main, app),
            MenuItem::Featured => draw_featured(f, main, app),
            MenuItem::Help => draw_help(f, main),
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        draw_trailer_modal(f, f.area(), app);
        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Games => 0,
        MenuItem::Appointments => 1,
        MenuItem::Featured => 2,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type)
                .title(Span::styled(
                    format!(" {} ", app.settings.kiosk_title),
                    Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
                )),
        )
        .highlight_style(Style::default().fg(GOLD).add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let clock = app
        .state
        .now
        .map(|t| t.format("%a %-I:%M %p").to_string())
        .unwrap_or_default();
    let help = Paragraph::new(format!("{clock}  Help: ? "))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let status = &app.state.status;
    let pill_color = match status.kind {
        StatusKind::Info => Color::Cyan,
        StatusKind::Ok => GREEN,
        StatusKind::Warn => Color::Yellow,
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", status.pill),
            Style::default().fg(Color::Black).bg(pill_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(status.text.clone(), Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_games(f: &mut Frame, area: Rect, app: &mut App) {
    let block = default_border(Color::White).title(" Games ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [controls, grid] = Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    draw_controls(f, controls, app);

    let columns = card::columns_for(grid.width);
    let rows = card::rows_for(grid.height);
    let catalog = &mut app.state.catalog;
    catalog.columns = columns;
    catalog.scroll_into_view(rows);
    let (selected, scroll_row) = (catalog.selected, catalog.scroll_row);

    let games = app.state.visible_games();
    if games.is_empty() {
        let msg = if app.state.catalog.query.is_filtered() {
            "No games found.\nPress c to clear the search and filters."
        } else if app.state.loaded || !app.state.library.games.is_empty() {
            "No games found."
        } else {
            "Loading games..."
        };
        draw_empty(f, grid, msg);
        return;
    }

    draw_card_grid(f, grid, &games, Some(selected), scroll_row, columns);
}

fn draw_controls(f: &mut Frame, area: Rect, app: &App) {
    let catalog = &app.state.catalog;
    let query = &catalog.query;

    let search_style = if catalog.editing_search {
        Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if catalog.editing_search { "_" } else { "" };
    let or_all = |value: &str, all: &str| if value.is_empty() { all.to_string() } else { value.to_string() };

    let filters = Line::from(vec![
        Span::styled("Search: ", Style::default().fg(Color::Gray)),
        Span::styled(format!("{}{cursor}", query.search), search_style),
        Span::styled("  Platform: ", Style::default().fg(Color::Gray)),
        Span::raw(or_all(&query.platform, "All platforms")),
        Span::styled("  Genre: ", Style::default().fg(Color::Gray)),
        Span::raw(or_all(&query.genre, "All genres")),
        Span::styled("  Sort: ", Style::default().fg(Color::Gray)),
        Span::raw(query.sort.label()),
    ]);

    let shown = app.state.visible_games().len();
    let total = app.state.library.games.iter().filter(|g| g.is_active()).count();
    let legend = Line::from(Span::styled(
        format!("{shown} of {total} shown   /=search  p=platform  g=genre  o=sort  c=clear  Enter=trailer  b=book"),
        Style::default().fg(Color::DarkGray),
    ));

    f.render_widget(Paragraph::new(vec![filters, legend]), area);
}

fn draw_featured(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(GOLD).title(" Featured ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let games = app.state.featured_games();
    if games.is_empty() {
        draw_empty(f, inner, "No featured games right now.");
        return;
    }

    let columns = card::columns_for(inner.width);
    let rows = card::rows_for(inner.height);
    let selected = app.state.featured_selected;
    let scroll_row = (selected / columns).saturating_sub(rows - 1);
    draw_card_grid(f, inner, &games, Some(selected), scroll_row, columns);
}

fn draw_card_grid(
    f: &mut Frame,
    area: Rect,
    games: &[&GameRecord],
    selected: Option<usize>,
    scroll_row: usize,
    columns: usize,
) {
    let rows = card::rows_for(area.height);
    let first = scroll_row * columns;

    for (offset, game) in games.iter().copied().skip(first).take(rows * columns).enumerate() {
        let row = (offset / columns) as u16;
        let col = (offset % columns) as u16;
        let cell = Rect::new(
            area.x + col * CARD_WIDTH,
            area.y + row * CARD_HEIGHT,
            CARD_WIDTH.min(area.width),
            CARD_HEIGHT.min(area.height.saturating_sub(row * CARD_HEIGHT)),
        );
        f.render_widget(GameCard { game, selected: selected == Some(first + offset) }, cell);
    }
}

fn draw_appointments(f: &mut Frame, area: Rect, app: &App) {
    let [stations_area, ticket_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(44)]).areas(area);

    let block = default_border(Color::White).title(" Stations ");
    let inner = block.inner(stations_area);
    f.render_widget(block, stations_area);

    let stations = &app.state.library.stations;
    if stations.is_empty() {
        draw_empty(f, inner, "No station info yet.");
    } else {
        let mut lines = Vec::new();
        for station in stations {
            let status_style = if station.status.eq_ignore_ascii_case("open") {
                Style::default().fg(GREEN)
            } else {
                Style::default().fg(Color::Yellow)
            };
            let mut spans = vec![
                Span::styled(
                    station.station_name.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(station.status.clone(), status_style),
            ];
            if !station.note.is_empty() {
                spans.push(Span::styled(format!("  {}", station.note), Style::default().fg(Color::Gray)));
            }
            lines.push(Line::from(spans));
        }
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }

    let [ticket, instructions] =
        Layout::vertical([Constraint::Length(10), Constraint::Fill(1)]).areas(ticket_area);
    f.render_widget(TicketPanel { ticket: app.state.ticket.as_ref(), now: app.state.now }, ticket);

    let block = default_border(Color::DarkGray).title(" How it works ");
    let inner = block.inner(instructions);
    f.render_widget(block, instructions);
    f.render_widget(
        Paragraph::new(vec![
            Line::from("1. Take a ticket here, or press b on a game card."),
            Line::from("2. Keep the code handy."),
            Line::from("3. Staff will call it when a station frees up."),
        ])
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true }),
        inner,
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(HELP_TEXT).style(Style::default().fg(Color::Gray)), inner);
}

fn draw_issues(f: &mut Frame, area: Rect, app: &App) {
    let issues = &app.state.library.issues;
    let block = default_border(Color::Yellow).title(format!(" Sheet issues ({}) ", issues.len()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if issues.is_empty() {
        draw_empty(f, inner, "Every row looks good.");
        return;
    }

    let mut lines = Vec::new();
    for issue in issues {
        let title = if issue.title.is_empty() { "(no title)" } else { issue.title.as_str() };
        let problems: Vec<&str> = issue.problems.iter().map(|p| p.label()).collect();
        lines.push(Line::from(vec![
            Span::styled(format!("row {:>3} ", issue.row), Style::default().fg(Color::DarkGray)),
            Span::raw(title.to_string()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("         {}", problems.join(", ")),
            Style::default().fg(Color::Yellow),
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .output_separator(' ')
        .output_timestamp(Some("%H:%M:%S".to_string()));
    f.render_widget(logger, area);
}

/// Trailer overlay. Drawn last so it covers whichever view is active.
fn draw_trailer_modal(f: &mut Frame, area: Rect, app: &App) {
    let Some(modal) = app.state.trailer.as_ref() else {
        return;
    };

    let [popup] = Layout::horizontal([Constraint::Length(area.width.min(64))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Length(area.height.min(9))])
        .flex(Flex::Center)
        .areas(popup);

    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(GOLD))
        .title(format!(" {} ", modal.title));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("▶ Trailer", Style::default().fg(GREEN).add_modifier(Modifier::BOLD))),
        Line::from(format!("Video: {}", modal.video_id)),
        Line::from(Span::styled(modal.url.clone(), Style::default().fg(Color::Cyan))),
        Line::from(""),
        Line::from(Span::styled("Esc / Enter to close", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        inner,
    );
}

fn draw_empty(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(2), area.height.saturating_sub(1), 1, 1)
    };
    f.render_widget(spinner, area);
}
