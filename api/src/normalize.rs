use crate::client::{ApiError, ApiResult};
use crate::table::SheetTable;
use crate::{GameRecord, Problem, RowIssue, StationRecord};
use regex::Regex;
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Column synonyms. First match wins, compared case-insensitively
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameField {
    Id,
    Title,
    Platform,
    Genre,
    TrailerUrl,
    ThumbnailUrl,
    Station,
    Status,
    Featured,
}

pub const GAME_COLUMNS: &[(GameField, &[&str])] = &[
    (GameField::Id, &["id", "game_id", "game id"]),
    (GameField::Title, &["title", "game", "game title", "name"]),
    (GameField::Platform, &["platform", "platforms", "console", "system"]),
    (GameField::Genre, &["genre", "category", "type"]),
    (GameField::TrailerUrl, &["trailer_url", "trailer", "trailer link", "youtube", "video"]),
    (GameField::ThumbnailUrl, &["thumbnail_url", "thumbnail", "image", "cover", "cover_url"]),
    (GameField::Station, &["station", "station_name", "location"]),
    (GameField::Status, &["status", "active"]),
    (GameField::Featured, &["featured", "feature", "spotlight"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationField {
    Name,
    Status,
    Note,
}

pub const STATION_COLUMNS: &[(StationField, &[&str])] = &[
    (StationField::Name, &["station_name", "station", "name"]),
    (StationField::Status, &["status", "availability"]),
    (StationField::Note, &["note", "notes", "comment"]),
];

/// Lowercase, trim, and treat underscores like spaces so "Game_Title",
/// "game title" and " GAME TITLE " all compare equal.
fn fold_header(header: &str) -> String {
    header.trim().to_lowercase().replace('_', " ")
}

/// Where each known field lives in one table. Resolved once per table: for
/// every field the accepted names are tried in order, and for each name the
/// leftmost header that folds to it wins.
#[derive(Debug, Clone)]
pub struct Columns<F> {
    found: Vec<(F, usize)>,
}

impl<F: Copy + PartialEq> Columns<F> {
    pub fn resolve(headers: &[String], table: &[(F, &[&str])]) -> Self {
        let folded: Vec<String> = headers.iter().map(|h| fold_header(h)).collect();
        let found = table
            .iter()
            .filter_map(|(field, accepted)| {
                accepted
                    .iter()
                    .find_map(|name| {
                        let name = fold_header(name);
                        folded.iter().position(|h| *h == name)
                    })
                    .map(|idx| (*field, idx))
            })
            .collect();
        Self { found }
    }

    /// No header matched any field.
    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    pub fn index_of(&self, wanted: F) -> Option<usize> {
        self.found.iter().find(|(f, _)| *f == wanted).map(|(_, idx)| *idx)
    }

    /// Trimmed cell for `wanted`, empty when the column is absent.
    pub fn cell(&self, row: &[String], wanted: F) -> String {
        self.index_of(wanted)
            .and_then(|idx| row.get(idx))
            .map(|v| v.trim().to_owned())
            .unwrap_or_default()
    }
}

pub type GameColumns = Columns<GameField>;
pub type StationColumns = Columns<StationField>;

/// Split a multi-valued platform cell on comma, slash, pipe or bullet.
pub fn split_platforms(raw: &str) -> Vec<String> {
    raw.split([',', '/', '|', '•', '·'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub fn normalize_game(columns: &GameColumns, row: &[String]) -> GameRecord {
    let get = |f| columns.cell(row, f);
    let platform = get(GameField::Platform);
    GameRecord {
        id: get(GameField::Id),
        title: get(GameField::Title),
        platforms: split_platforms(&platform),
        platform,
        genre: get(GameField::Genre),
        trailer_url: get(GameField::TrailerUrl),
        thumbnail_url: get(GameField::ThumbnailUrl),
        station: get(GameField::Station),
        status: get(GameField::Status),
        featured: get(GameField::Featured),
    }
}

pub fn normalize_station(columns: &StationColumns, row: &[String]) -> StationRecord {
    let get = |f| columns.cell(row, f);
    StationRecord {
        station_name: get(StationField::Name),
        status: get(StationField::Status),
        note: get(StationField::Note),
    }
}

/// Soft validation for one record. A record without a title is only
/// reported as such; the remaining checks are skipped for it.
pub fn validate_game(game: &GameRecord) -> Vec<Problem> {
    if game.title.is_empty() {
        return vec![Problem::MissingTitle];
    }
    let mut problems = Vec::new();
    if !game.trailer_url.is_empty() && youtube_id(&game.trailer_url).is_none() {
        problems.push(Problem::UnrecognizedTrailer);
    }
    problems
}

/// Normalize every data row of the games tab and collect validation issues.
pub fn normalize_games(table: &SheetTable) -> ApiResult<(Vec<GameRecord>, Vec<RowIssue>)> {
    if table.is_empty() {
        return Err(ApiError::EmptyData("the sheet has a header row but no game rows".into()));
    }
    let columns = GameColumns::resolve(&table.headers, GAME_COLUMNS);
    if columns.is_empty() {
        return Err(ApiError::ColumnMissing(format!(
            "none of the sheet's columns ({}) look like game columns; expected a header such as \"title\"",
            table.headers.join(", ")
        )));
    }

    let mut games = Vec::with_capacity(table.rows.len());
    let mut issues = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let game = normalize_game(&columns, row);
        let problems = validate_game(&game);
        if !problems.is_empty() {
            issues.push(RowIssue { row: idx + 1, title: game.title.clone(), problems });
        }
        games.push(game);
    }
    Ok((games, issues))
}

pub fn normalize_stations(table: &SheetTable) -> Vec<StationRecord> {
    let columns = StationColumns::resolve(&table.headers, STATION_COLUMNS);
    table
        .rows
        .iter()
        .map(|row| normalize_station(&columns, row))
        .filter(|s| !s.station_name.is_empty() || !s.status.is_empty() || !s.note.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// YouTube references
// ---------------------------------------------------------------------------

static SHORT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([A-Za-z0-9_-]{6,})").expect("valid pattern"));
static WATCH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]v=([A-Za-z0-9_-]{6,})").expect("valid pattern"));
static EMBED_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/embed/([A-Za-z0-9_-]{6,})").expect("valid pattern"));
static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{6,}$").expect("valid pattern"));

/// Extract a YouTube video id from a short link, a watch URL, an embed URL,
/// or a bare id. Returns `None` when the value is not a YouTube reference.
pub fn youtube_id(url: &str) -> Option<&str> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    for pattern in [&*SHORT_LINK, &*WATCH_PARAM, &*EMBED_PATH] {
        if let Some(id) = pattern.captures(url).and_then(|c| c.get(1)) {
            return Some(id.as_str());
        }
    }
    BARE_ID.is_match(url).then_some(url)
}

pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

pub fn embed_url(id: &str) -> String {
    format!("https://www.youtube.com/embed/{id}?autoplay=1&rel=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> SheetTable {
        SheetTable::from_rows(rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect())
    }

    fn games_of(rows: &[&[&str]]) -> Vec<GameRecord> {
        normalize_games(&table(rows)).unwrap().0
    }

    #[test]
    fn synonyms_map_to_schema() {
        let games = games_of(&[
            &["Game Title", "Console", "Genre", "Trailer"],
            &["  Hades ", "Switch", "Roguelike", "https://youtu.be/91t0ha9x0AE"],
        ]);
        let game = &games[0];
        assert_eq!(game.title, "Hades");
        assert_eq!(game.platform, "Switch");
        assert_eq!(game.platforms, vec!["Switch"]);
        assert_eq!(game.genre, "Roguelike");
        assert_eq!(game.station, "");
        assert!(game.has_trailer());
    }

    #[test]
    fn first_synonym_wins() {
        let games = games_of(&[&["name", "title"], &["Second", "First"]]);
        assert_eq!(games[0].title, "First");
    }

    #[test]
    fn headers_folding_alike_resolve_to_leftmost() {
        let rows: &[&[&str]] = &[&["Game_Title", "game title", "TITLE", "Title"], &["Left", "Right", "Upper", "Plain"]];
        let columns = GameColumns::resolve(&table(rows).headers, GAME_COLUMNS);
        assert_eq!(columns.index_of(GameField::Title), Some(2));

        let rows: &[&[&str]] = &[&["Game_Title", "game title"], &["Left", "Right"]];
        for _ in 0..50 {
            assert_eq!(games_of(rows)[0].title, "Left");
        }
    }

    #[test]
    fn missing_title_is_flagged_but_kept() {
        let (games, issues) = normalize_games(&table(&[&["platform", "genre"], &["PS5", "Racing"]])).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].title, "");
        assert_eq!(issues, vec![RowIssue { row: 1, title: String::new(), problems: vec![Problem::MissingTitle] }]);
    }

    #[test]
    fn blank_rows_keep_sheet_row_numbers() {
        let parsed = crate::table::parse_delimited("title,trailer_url\nTetris,\n,\nPong,https://example.com/clip\n").unwrap();
        let (games, issues) = normalize_games(&parsed).unwrap();
        assert_eq!(games.len(), 3);
        let flagged: Vec<(usize, Vec<Problem>)> = issues.into_iter().map(|i| (i.row, i.problems)).collect();
        assert_eq!(
            flagged,
            vec![(2, vec![Problem::MissingTitle]), (3, vec![Problem::UnrecognizedTrailer])]
        );
    }

    #[test]
    fn untitled_rows_skip_trailer_check() {
        let game = GameRecord { trailer_url: "https://example.com/video".into(), ..Default::default() };
        assert_eq!(validate_game(&game), vec![Problem::MissingTitle]);
    }

    #[test]
    fn unrecognized_trailer_is_flagged() {
        let game = GameRecord {
            title: "Celeste".into(),
            trailer_url: "https://example.com/video".into(),
            ..Default::default()
        };
        assert_eq!(validate_game(&game), vec![Problem::UnrecognizedTrailer]);
    }

    #[test]
    fn unknown_columns_are_column_missing() {
        assert!(matches!(normalize_games(&table(&[&["foo", "bar"], &["1", "2"]])), Err(ApiError::ColumnMissing(_))));
    }

    #[test]
    fn header_only_table_is_empty_data() {
        assert!(matches!(normalize_games(&table(&[&["title"]])), Err(ApiError::EmptyData(_))));
    }

    #[test]
    fn platform_cell_splits_on_all_delimiters() {
        assert_eq!(split_platforms("Xbox, PS5"), vec!["Xbox", "PS5"]);
        assert_eq!(split_platforms("PC / Switch | PS4 • Xbox"), vec!["PC", "Switch", "PS4", "Xbox"]);
        assert!(split_platforms("  ").is_empty());
    }

    #[test]
    fn youtube_ids() {
        assert_eq!(youtube_id("https://youtu.be/abc123XY"), Some("abc123XY"));
        assert_eq!(youtube_id("https://youtube.com/watch?v=abc123XY&t=5"), Some("abc123XY"));
        assert_eq!(youtube_id("https://www.youtube.com/embed/abc123XY"), Some("abc123XY"));
        assert_eq!(youtube_id("abc123XY"), Some("abc123XY"));
        assert_eq!(youtube_id("https://example.com/video"), None);
        assert_eq!(youtube_id("abc"), None);
        assert_eq!(youtube_id(""), None);
    }

    #[test]
    fn stations_normalize_and_drop_blank_rows() {
        let table = table(&[&["Station", "Status", "Notes"], &["TV 1", "Open", ""], &["", "", ""]]);
        let stations = normalize_stations(&table);
        assert_eq!(
            stations,
            vec![StationRecord { station_name: "TV 1".into(), status: "Open".into(), note: String::new() }]
        );
    }
}
