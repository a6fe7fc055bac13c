use log::LevelFilter;
use sheet_api::client::{ExportFormat, GOOGLE_DOCS, SheetConfig, TabRef};
use std::time::Duration;

const DEFAULT_SHEET_ID: &str = "13rkxqr7sohPeexiygv0dBMFV63ElDb2J";
const DEFAULT_GAMES_TAB: &str = "Games";
const DEFAULT_STATIONS_TAB: &str = "Stations";
const DEFAULT_REFRESH_SECS: u64 = 300;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub sheet: SheetConfig,
    pub base_url: String,
    /// `None` disables the periodic refresh.
    pub refresh_every: Option<Duration>,
    pub timeout: Duration,
    pub kiosk_title: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            sheet: SheetConfig {
                sheet_id: DEFAULT_SHEET_ID.to_string(),
                games: TabRef::named(DEFAULT_GAMES_TAB),
                stations: Some(TabRef::named(DEFAULT_STATIONS_TAB)),
                format: ExportFormat::Json,
            },
            base_url: GOOGLE_DOCS.to_string(),
            refresh_every: Some(Duration::from_secs(DEFAULT_REFRESH_SECS)),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            kiosk_title: "Kickoff Game Hub".to_string(),
        }
    }
}

impl AppSettings {
    /// Defaults overridden by `KIOSK_*` environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let mut settings = Self::default();

        if let Some(id) = var("KIOSK_SHEET_ID").filter(|v| !v.is_empty()) {
            settings.sheet.sheet_id = id;
        }
        if let Some(tab) = var("KIOSK_GAMES_TAB") {
            settings.sheet.games.name = Some(tab).filter(|v| !v.is_empty());
        }
        if let Some(gid) = var("KIOSK_GAMES_GID").filter(|v| !v.is_empty()) {
            settings.sheet.games.gid = Some(gid);
        }
        if let Some(tab) = var("KIOSK_STATIONS_TAB") {
            settings.sheet.stations = if tab.is_empty() { None } else { Some(TabRef::named(tab)) };
        }
        if let Some(gid) = var("KIOSK_STATIONS_GID").filter(|v| !v.is_empty()) {
            settings.sheet.stations.get_or_insert_with(TabRef::default).gid = Some(gid);
        }
        if let Some(format) = var("KIOSK_FORMAT").as_deref().and_then(ExportFormat::parse) {
            settings.sheet.format = format;
        }
        if let Some(url) = var("KIOSK_BASE_URL").filter(|v| !v.is_empty()) {
            settings.base_url = url;
        }
        if let Some(secs) = var("KIOSK_REFRESH_SECS").and_then(|v| v.parse::<u64>().ok()) {
            settings.refresh_every = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(secs) = var("KIOSK_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok()) {
            settings.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(level) = var("KIOSK_LOG_LEVEL").and_then(|v| v.parse::<LevelFilter>().ok()) {
            settings.log_level = Some(level);
        }
        if let Some(title) = var("KIOSK_TITLE").filter(|v| !v.is_empty()) {
            settings.kiosk_title = title;
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> AppSettings {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_without_env() {
        let s = settings(&[]);
        assert_eq!(s.sheet.games.name.as_deref(), Some("Games"));
        assert_eq!(s.sheet.format, ExportFormat::Json);
        assert_eq!(s.refresh_every, Some(Duration::from_secs(300)));
        assert!(s.log_level.is_none());
    }

    #[test]
    fn env_overrides() {
        let s = settings(&[
            ("KIOSK_SHEET_ID", "abc"),
            ("KIOSK_GAMES_GID", "123"),
            ("KIOSK_FORMAT", "csv"),
            ("KIOSK_REFRESH_SECS", "0"),
            ("KIOSK_LOG_LEVEL", "debug"),
        ]);
        assert_eq!(s.sheet.sheet_id, "abc");
        assert_eq!(s.sheet.games.gid.as_deref(), Some("123"));
        assert_eq!(s.sheet.format, ExportFormat::Csv);
        assert_eq!(s.refresh_every, None);
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn empty_stations_tab_disables_stations() {
        let s = settings(&[("KIOSK_STATIONS_TAB", "")]);
        assert!(s.sheet.stations.is_none());
    }
}
