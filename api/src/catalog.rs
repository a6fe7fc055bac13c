use crate::GameRecord;
use std::cmp::Ordering;

/// Status values that keep a row visible. An empty status also counts.
const ACTIVE_VALUES: [&str; 4] = ["active", "yes", "true", "1"];
const YES_VALUES: [&str; 4] = ["yes", "y", "true", "1"];

pub fn is_active_status(status: &str) -> bool {
    let status = status.trim().to_lowercase();
    status.is_empty() || ACTIVE_VALUES.contains(&status.as_str())
}

pub fn is_yes(value: &str) -> bool {
    YES_VALUES.contains(&value.trim().to_lowercase().as_str())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Order rows appear in the sheet.
    #[default]
    Sheet,
    TitleAsc,
    TitleDesc,
    Platform,
}

impl SortMode {
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Sheet => "Sheet order",
            SortMode::TitleAsc => "Title A-Z",
            SortMode::TitleDesc => "Title Z-A",
            SortMode::Platform => "Platform",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortMode::Sheet => SortMode::TitleAsc,
            SortMode::TitleAsc => SortMode::TitleDesc,
            SortMode::TitleDesc => SortMode::Platform,
            SortMode::Platform => SortMode::Sheet,
        }
    }
}

/// Current control values. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub search: String,
    pub platform: String,
    pub genre: String,
    pub sort: SortMode,
}

impl Query {
    pub fn matches(&self, game: &GameRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || game.title.to_lowercase().contains(&needle)
            || game.platform.to_lowercase().contains(&needle)
            || game.genre.to_lowercase().contains(&needle);

        let platform = self.platform.trim().to_lowercase();
        let matches_platform =
            platform.is_empty() || game.platforms.iter().any(|p| p.to_lowercase() == platform);

        let genre = self.genre.trim().to_lowercase();
        let matches_genre = genre.is_empty() || game.genre.to_lowercase() == genre;

        matches_search && matches_platform && matches_genre
    }

    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty() || !self.platform.is_empty() || !self.genre.is_empty()
    }
}

/// Case-folded comparison with a byte-wise tiebreak, so "apex" and "Apex"
/// sort next to each other but still in a stable, total order.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Active games matching `query`, sorted per `query.sort`.
pub fn visible_games<'a>(games: &'a [GameRecord], query: &Query) -> Vec<&'a GameRecord> {
    let mut out: Vec<&GameRecord> = games.iter().filter(|g| g.is_active() && query.matches(g)).collect();
    sort_games(&mut out, query.sort);
    out
}

/// Active games flagged as featured, in sheet order.
pub fn featured_games(games: &[GameRecord]) -> Vec<&GameRecord> {
    games.iter().filter(|g| g.is_active() && g.is_featured()).collect()
}

pub fn sort_games(games: &mut [&GameRecord], mode: SortMode) {
    match mode {
        SortMode::Sheet => {}
        SortMode::TitleAsc => games.sort_by(|a, b| collate(&a.title, &b.title)),
        SortMode::TitleDesc => games.sort_by(|a, b| collate(&b.title, &a.title)),
        SortMode::Platform => games.sort_by(|a, b| {
            collate(a.first_platform(), b.first_platform()).then_with(|| collate(&a.title, &b.title))
        }),
    }
}

/// Distinct platform tokens across all games, sorted.
pub fn platform_options(games: &[GameRecord]) -> Vec<String> {
    uniq_sorted(games.iter().flat_map(|g| g.platforms.iter().cloned()))
}

/// Distinct genres across all games, sorted.
pub fn genre_options(games: &[GameRecord]) -> Vec<String> {
    uniq_sorted(games.iter().map(|g| g.genre.clone()))
}

fn uniq_sorted(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = values.filter(|v| !v.is_empty()).collect();
    out.sort_by(|a, b| collate(a, b));
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::split_platforms;

    fn game(title: &str, platform: &str, genre: &str) -> GameRecord {
        GameRecord {
            title: title.into(),
            platform: platform.into(),
            platforms: split_platforms(platform),
            genre: genre.into(),
            ..Default::default()
        }
    }

    #[test]
    fn active_statuses() {
        for s in ["", "Active", "yes", "TRUE", "1", "  active "] {
            assert!(is_active_status(s), "{s:?} should be active");
        }
        for s in ["hidden", "no", "0", "inactive"] {
            assert!(!is_active_status(s), "{s:?} should be inactive");
        }
    }

    #[test]
    fn inactive_rows_never_show() {
        let mut hidden = game("Secret", "PC", "Horror");
        hidden.status = "hidden".into();
        let games = vec![hidden, game("Open", "PC", "Horror")];
        let visible = visible_games(&games, &Query::default());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Open");
    }

    #[test]
    fn platform_filter_matches_any_member() {
        let games = vec![game("Elden Ring", "Xbox, PS5", "RPG"), game("Zelda", "Switch", "Adventure")];
        assert_eq!(games[0].platforms, vec!["Xbox", "PS5"]);
        let query = Query { platform: "PS5".into(), ..Default::default() };
        let visible = visible_games(&games, &query);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Elden Ring");
    }

    #[test]
    fn platform_filter_is_token_exact() {
        let games = vec![game("Spider-Man", "PS4", "Action")];
        let query = Query { platform: "PS".into(), ..Default::default() };
        assert!(visible_games(&games, &query).is_empty());
    }

    #[test]
    fn search_covers_title_platform_and_genre() {
        let games = vec![
            game("Forza Horizon", "Xbox", "Racing"),
            game("Tetris", "Switch", "Puzzle"),
            game("Doom", "PC", "Shooter"),
        ];
        let by = |s: &str| {
            let q = Query { search: s.into(), ..Default::default() };
            visible_games(&games, &q).iter().map(|g| g.title.clone()).collect::<Vec<_>>()
        };
        assert_eq!(by("forza"), vec!["Forza Horizon"]);
        assert_eq!(by("SWITCH"), vec!["Tetris"]);
        assert_eq!(by("shoot"), vec!["Doom"]);
        assert_eq!(by("").len(), 3);
    }

    #[test]
    fn genre_filter_is_case_insensitive_exact() {
        let games = vec![game("A", "PC", "Racing"), game("B", "PC", "Racing Sim")];
        let query = Query { genre: "racing".into(), ..Default::default() };
        let titles: Vec<_> = visible_games(&games, &query).iter().map(|g| g.title.clone()).collect();
        assert_eq!(titles, vec!["A"]);
    }

    #[test]
    fn sort_modes() {
        let games = vec![
            game("bravo", "Xbox", ""),
            game("Alpha", "Switch", ""),
            game("charlie", "PC / Xbox", ""),
        ];
        let titles = |sort| {
            let q = Query { sort, ..Default::default() };
            visible_games(&games, &q).iter().map(|g| g.title.clone()).collect::<Vec<_>>()
        };
        assert_eq!(titles(SortMode::Sheet), vec!["bravo", "Alpha", "charlie"]);
        assert_eq!(titles(SortMode::TitleAsc), vec!["Alpha", "bravo", "charlie"]);
        assert_eq!(titles(SortMode::TitleDesc), vec!["charlie", "bravo", "Alpha"]);
        assert_eq!(titles(SortMode::Platform), vec!["charlie", "Alpha", "bravo"]);
    }

    #[test]
    fn featured_requires_active_and_yes() {
        let mut a = game("A", "PC", "");
        a.featured = "Y".into();
        let mut b = game("B", "PC", "");
        b.featured = "yes".into();
        b.status = "no".into();
        let c = game("C", "PC", "");
        let games = vec![a, b, c];
        let featured = featured_games(&games);
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].title, "A");
    }

    #[test]
    fn options_are_distinct_and_sorted() {
        let games = vec![
            game("A", "Xbox, PS5", "RPG"),
            game("B", "PS5", "Action"),
            game("C", "", "RPG"),
        ];
        assert_eq!(platform_options(&games), vec!["PS5", "Xbox"]);
        assert_eq!(genre_options(&games), vec!["Action", "RPG"]);
    }

    #[test]
    fn sort_mode_cycles() {
        let mut mode = SortMode::default();
        for _ in 0..4 {
            mode = mode.next();
        }
        assert_eq!(mode, SortMode::Sheet);
    }
}
