use crate::app::MenuItem;
use crate::state::queue::QueueTicket;
use chrono::{DateTime, Local};
use sheet_api::catalog::{self, Query};
use sheet_api::normalize::watch_url;
use sheet_api::{GameRecord, Library};

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusKind {
    #[default]
    Info,
    Ok,
    Warn,
}

#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    /// Short label, e.g. "Live" or "Offline".
    pub pill: String,
    pub text: String,
    pub kind: StatusKind,
}

impl StatusLine {
    pub fn set(&mut self, pill: impl Into<String>, text: impl Into<String>, kind: StatusKind) {
        self.pill = pill.into();
        self.text = text.into();
        self.kind = kind;
    }
}

// ---------------------------------------------------------------------------
// Catalog browsing: search box, filters, sort and the selected card
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CatalogState {
    pub query: Query,
    /// Keystrokes go into the search box while set.
    pub editing_search: bool,
    pub platform_options: Vec<String>,
    pub genre_options: Vec<String>,
    /// Selected card index within the visible (filtered, sorted) list.
    pub selected: usize,
    /// Cards per row, as last laid out by the draw pass.
    pub columns: usize,
    /// First visible card row.
    pub scroll_row: usize,
}

impl CatalogState {
    /// Rebuild the option lists, keeping the current selections when they
    /// still exist in the new data.
    pub fn refresh_options(&mut self, games: &[GameRecord]) {
        self.platform_options = catalog::platform_options(games);
        self.genre_options = catalog::genre_options(games);
        self.query.platform = surviving_option(&self.platform_options, &self.query.platform);
        self.query.genre = surviving_option(&self.genre_options, &self.query.genre);
    }

    pub fn cycle_platform(&mut self, forward: bool) {
        self.query.platform = cycle_option(&self.platform_options, &self.query.platform, forward);
        self.reset_selection();
    }

    pub fn cycle_genre(&mut self, forward: bool) {
        self.query.genre = cycle_option(&self.genre_options, &self.query.genre, forward);
        self.reset_selection();
    }

    pub fn cycle_sort(&mut self) {
        self.query.sort = self.query.sort.next();
        self.reset_selection();
    }

    pub fn clear_filters(&mut self) {
        self.query = Query { sort: self.query.sort, ..Query::default() };
        self.reset_selection();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.query.search.push(c);
        self.reset_selection();
    }

    pub fn pop_search_char(&mut self) {
        self.query.search.pop();
        self.reset_selection();
    }

    pub fn reset_selection(&mut self) {
        self.selected = 0;
        self.scroll_row = 0;
    }

    /// Move the selection by `delta` cards, clamped to `len` visible cards.
    pub fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as isize + delta).clamp(0, len as isize - 1);
        self.selected = next as usize;
    }

    pub fn move_row(&mut self, rows: isize, len: usize) {
        self.move_selection(rows * self.columns.max(1) as isize, len);
    }

    /// Keep the selected card inside a window of `visible_rows` card rows.
    pub fn scroll_into_view(&mut self, visible_rows: usize) {
        let row = self.selected / self.columns.max(1);
        let visible_rows = visible_rows.max(1);
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + visible_rows {
            self.scroll_row = row + 1 - visible_rows;
        }
    }
}

/// The option matching `current` case-insensitively, spelled the way the
/// new data spells it. Empty when the selection is gone.
fn surviving_option(options: &[String], current: &str) -> String {
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(current))
        .cloned()
        .unwrap_or_default()
}

/// Step through `"" → options[0] → … → options[n-1] → ""`.
fn cycle_option(options: &[String], current: &str, forward: bool) -> String {
    if options.is_empty() {
        return String::new();
    }
    let pos = options.iter().position(|o| o.eq_ignore_ascii_case(current));
    let next = match (pos, forward) {
        (None, true) => Some(0),
        (None, false) => Some(options.len() - 1),
        (Some(i), true) if i + 1 < options.len() => Some(i + 1),
        (Some(i), false) if i > 0 => Some(i - 1),
        _ => None,
    };
    next.map(|i| options[i].clone()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Trailer modal: an overlay independent of the active view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailerModal {
    pub game_key: String,
    pub title: String,
    pub video_id: String,
    pub url: String,
}

impl TrailerModal {
    pub fn for_game(game: &GameRecord) -> Option<Self> {
        let video_id = game.trailer_id()?.to_string();
        Some(Self {
            game_key: game.key().to_string(),
            title: game.title.clone(),
            url: watch_url(&video_id),
            video_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub show_issues: bool,
    pub library: Library,
    /// Set once the first load succeeded; later failures keep the old list.
    pub loaded: bool,
    pub status: StatusLine,
    pub catalog: CatalogState,
    /// Selected card on the Featured view.
    pub featured_selected: usize,
    pub trailer: Option<TrailerModal>,
    pub ticket: Option<QueueTicket>,
    pub now: Option<DateTime<Local>>,
}

impl AppState {
    pub fn new() -> Self {
        let mut state = Self::default();
        state.status.set("Loading", "Fetching games from the sheet...", StatusKind::Info);
        state
    }

    pub fn visible_games(&self) -> Vec<&GameRecord> {
        catalog::visible_games(&self.library.games, &self.catalog.query)
    }

    pub fn featured_games(&self) -> Vec<&GameRecord> {
        catalog::featured_games(&self.library.games)
    }

    /// The card under the cursor on the current view, if any.
    pub fn selected_game(&self) -> Option<&GameRecord> {
        match self.active_tab {
            MenuItem::Games => self.visible_games().get(self.catalog.selected).copied(),
            MenuItem::Featured => self.featured_games().get(self.featured_selected).copied(),
            _ => None,
        }
    }
}
