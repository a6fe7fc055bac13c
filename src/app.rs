use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, StatusKind, TrailerModal};
use crate::state::queue::QueueTicket;
use chrono::Local;
use log::info;
use sheet_api::Library;

/// The three kiosk panels plus the help overlay. Exactly one is visible.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Games,
    Appointments,
    Featured,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self { state: AppState::new(), settings };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Replace the whole library. The selected card is kept when the same
    /// game is still visible after the refresh.
    pub fn on_library_loaded(&mut self, library: Library) {
        let selected_key = self.state.selected_game().map(|g| g.key().to_string());

        self.state.library = library;
        self.state.loaded = true;
        self.state.catalog.refresh_options(&self.state.library.games);

        let restored = selected_key.and_then(|key| {
            let visible = self.state.visible_games();
            visible.iter().position(|g| g.key() == key)
        });
        match restored {
            Some(idx) if self.state.active_tab == MenuItem::Games => self.state.catalog.selected = idx,
            _ => self.state.catalog.reset_selection(),
        }
        self.state.featured_selected = 0;

        // The modal may point at a game that no longer has a trailer.
        if let Some(modal) = &self.state.trailer {
            let still_there = self
                .state
                .library
                .find_game(&modal.game_key)
                .and_then(TrailerModal::for_game)
                .is_some();
            if !still_there {
                self.state.trailer = None;
            }
        }

        let lib = &self.state.library;
        let active = lib.games.iter().filter(|g| g.is_active()).count();
        let updated = lib
            .fetched_at
            .map(|t| t.format("%-I:%M %p").to_string())
            .unwrap_or_default();
        let mut text = format!("{active} games on the shelf. Updated {updated}.");
        if !lib.issues.is_empty() {
            text.push_str(&format!(" {} rows need attention (press v).", lib.issues.len()));
        }
        let kind = if lib.issues.is_empty() { StatusKind::Ok } else { StatusKind::Warn };
        info!("library loaded: {} games, {} stations", lib.games.len(), lib.stations.len());
        self.state.status.set("Live", text, kind);
    }

    /// Show the advisory and leave whatever is on screen untouched.
    pub fn on_error(&mut self, message: String) {
        let pill = if self.state.loaded { "Stale" } else { "Offline" };
        self.state.status.set(pill, message, StatusKind::Warn);
    }

    pub fn on_refresh_requested(&mut self) {
        self.state.status.set("Loading", "Refreshing from the sheet...", StatusKind::Info);
    }

    pub fn tick_clock(&mut self) {
        self.state.now = Some(Local::now());
    }

    // -----------------------------------------------------------------------
    // View management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.catalog.editing_search = false;
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if next == MenuItem::Featured {
            self.state.featured_selected = 0;
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_show_issues(&mut self) {
        self.state.show_issues = !self.state.show_issues;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Search and filters
    // -----------------------------------------------------------------------

    pub fn start_search(&mut self) {
        self.update_tab(MenuItem::Games);
        self.state.catalog.editing_search = true;
    }

    pub fn finish_search(&mut self) {
        self.state.catalog.editing_search = false;
    }

    pub fn cancel_search(&mut self) {
        self.state.catalog.query.search.clear();
        self.state.catalog.editing_search = false;
        self.state.catalog.reset_selection();
    }

    // -----------------------------------------------------------------------
    // Card navigation
    // -----------------------------------------------------------------------

    pub fn move_selection(&mut self, delta: isize) {
        match self.state.active_tab {
            MenuItem::Games => {
                let len = self.state.visible_games().len();
                self.state.catalog.move_selection(delta, len);
            }
            MenuItem::Featured => {
                let len = self.state.featured_games().len();
                if len > 0 {
                    let next = (self.state.featured_selected as isize + delta).clamp(0, len as isize - 1);
                    self.state.featured_selected = next as usize;
                }
            }
            _ => {}
        }
    }

    pub fn move_row(&mut self, rows: isize) {
        match self.state.active_tab {
            MenuItem::Games => {
                let len = self.state.visible_games().len();
                self.state.catalog.move_row(rows, len);
            }
            _ => self.move_selection(rows),
        }
    }

    // -----------------------------------------------------------------------
    // Trailer modal and queue tickets
    // -----------------------------------------------------------------------

    /// Open the trailer for the selected card. Cards without a recognized
    /// YouTube link have the action disabled.
    pub fn open_trailer(&mut self) {
        let Some(game) = self.state.selected_game() else {
            return;
        };
        match TrailerModal::for_game(game) {
            Some(modal) => self.state.trailer = Some(modal),
            None => {
                let title = game.title.clone();
                self.state
                    .status
                    .set("Live", format!("No playable trailer for {title}."), StatusKind::Info);
            }
        }
    }

    pub fn close_trailer(&mut self) {
        self.state.trailer = None;
    }

    /// "Book" the selected game: issue a ticket for it and jump to appointments.
    pub fn book_selected(&mut self) {
        let game = self.state.selected_game().map(|g| g.title.clone()).filter(|t| !t.is_empty());
        self.issue_ticket(game);
        self.update_tab(MenuItem::Appointments);
    }

    pub fn issue_ticket(&mut self, game: Option<String>) {
        let ticket = QueueTicket::generate(&mut rand::thread_rng(), Local::now(), game);
        info!("issued queue ticket {}", ticket.code);
        self.state.ticket = Some(ticket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_api::GameRecord;
    use sheet_api::normalize::split_platforms;

    fn game(title: &str, platform: &str, trailer: &str) -> GameRecord {
        GameRecord {
            title: title.into(),
            platform: platform.into(),
            platforms: split_platforms(platform),
            trailer_url: trailer.into(),
            ..Default::default()
        }
    }

    fn app_with(games: Vec<GameRecord>) -> App {
        let mut app = App::new(AppSettings::default());
        app.on_library_loaded(Library { games, fetched_at: Some(Local::now()), ..Default::default() });
        app
    }

    #[test]
    fn starts_on_games_view() {
        let app = App::new(AppSettings::default());
        assert_eq!(app.state.active_tab, MenuItem::Games);
        assert!(app.state.trailer.is_none());
    }

    #[test]
    fn error_keeps_previous_library() {
        let mut app = app_with(vec![game("Tetris", "Switch", "")]);
        app.on_error("Couldn't load games.".into());
        assert_eq!(app.state.library.games.len(), 1);
        assert_eq!(app.state.visible_games().len(), 1);
        assert_eq!(app.state.status.pill, "Stale");
    }

    #[test]
    fn error_before_first_load_is_offline() {
        let mut app = App::new(AppSettings::default());
        app.on_error("Couldn't load games.".into());
        assert_eq!(app.state.status.pill, "Offline");
        assert!(app.state.library.games.is_empty());
    }

    #[test]
    fn refresh_replaces_games_and_keeps_selected_card() {
        let mut app = app_with(vec![game("A", "PC", ""), game("B", "PC", "")]);
        app.move_selection(1);
        assert_eq!(app.state.selected_game().unwrap().title, "B");

        app.on_library_loaded(Library {
            games: vec![game("Z", "PC", ""), game("A", "PC", ""), game("B", "PC", "")],
            ..Default::default()
        });
        assert_eq!(app.state.library.games.len(), 3);
        assert_eq!(app.state.selected_game().unwrap().title, "B");
    }

    #[test]
    fn trailer_modal_overlays_any_view() {
        let mut app = app_with(vec![game("Hades", "PC", "https://youtu.be/91t0ha9x0AE")]);
        app.open_trailer();
        assert!(app.state.trailer.is_some());
        app.update_tab(MenuItem::Appointments);
        assert!(app.state.trailer.is_some());
        app.close_trailer();
        assert!(app.state.trailer.is_none());
    }

    #[test]
    fn trailer_is_disabled_without_youtube_link() {
        let mut app = app_with(vec![game("Pong", "PC", "https://example.com/video")]);
        app.open_trailer();
        assert!(app.state.trailer.is_none());
        assert!(app.state.status.text.contains("Pong"));
    }

    #[test]
    fn booking_issues_ticket_and_switches_view() {
        let mut app = app_with(vec![game("Tetris", "Switch", "")]);
        app.book_selected();
        assert_eq!(app.state.active_tab, MenuItem::Appointments);
        let ticket = app.state.ticket.as_ref().unwrap();
        assert_eq!(ticket.game.as_deref(), Some("Tetris"));
        assert_eq!(ticket.code.len(), 6);
    }

    #[test]
    fn help_returns_to_previous_view() {
        let mut app = App::new(AppSettings::default());
        app.update_tab(MenuItem::Featured);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Featured);
    }

    #[test]
    fn platform_filter_narrows_visible_cards() {
        let mut app = app_with(vec![game("Elden Ring", "Xbox, PS5", ""), game("Zelda", "Switch", "")]);
        assert_eq!(app.state.catalog.platform_options, vec!["PS5", "Switch", "Xbox"]);
        app.state.catalog.cycle_platform(true);
        assert_eq!(app.state.catalog.query.platform, "PS5");
        let titles: Vec<_> = app.state.visible_games().iter().map(|g| g.title.clone()).collect();
        assert_eq!(titles, vec!["Elden Ring"]);
    }
}
