pub mod catalog;
pub mod client;
pub mod gviz;
pub mod markup;
pub mod normalize;
pub mod table;

use chrono::{DateTime, Local};

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the spreadsheet wire format
// ---------------------------------------------------------------------------

/// Everything a single refresh produced. Replaced wholesale on every refresh.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub games: Vec<GameRecord>,
    pub stations: Vec<StationRecord>,
    /// Soft validation findings for the games tab.
    pub issues: Vec<RowIssue>,
    pub fetched_at: Option<DateTime<Local>>,
}

impl Library {
    /// Look a game up by its correlation key (`id`, or title when the sheet has no id).
    pub fn find_game(&self, key: &str) -> Option<&GameRecord> {
        self.games.iter().find(|g| g.key() == key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRecord {
    pub id: String,
    pub title: String,
    /// Platform cell as written in the sheet, e.g. "Xbox / PS5".
    pub platform: String,
    /// `platform` split into tokens; empty when the cell is empty.
    pub platforms: Vec<String>,
    pub genre: String,
    pub trailer_url: String,
    pub thumbnail_url: String,
    pub station: String,
    pub status: String,
    pub featured: String,
}

impl GameRecord {
    /// Correlates a rendered card back to its record within one render cycle.
    pub fn key(&self) -> &str {
        if self.id.is_empty() { &self.title } else { &self.id }
    }

    pub fn first_platform(&self) -> &str {
        self.platforms.first().map(String::as_str).unwrap_or("")
    }

    pub fn trailer_id(&self) -> Option<&str> {
        normalize::youtube_id(&self.trailer_url)
    }

    pub fn has_trailer(&self) -> bool {
        self.trailer_id().is_some()
    }

    pub fn is_active(&self) -> bool {
        catalog::is_active_status(&self.status)
    }

    pub fn is_featured(&self) -> bool {
        catalog::is_yes(&self.featured)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationRecord {
    pub station_name: String,
    pub status: String,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    MissingTitle,
    UnrecognizedTrailer,
}

impl Problem {
    pub fn label(&self) -> &'static str {
        match self {
            Problem::MissingTitle => "Missing title",
            Problem::UnrecognizedTrailer => "Trailer URL not recognized (YouTube recommended)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    /// 1-based data row, header excluded.
    pub row: usize,
    pub title: String,
    pub problems: Vec<Problem>,
}
