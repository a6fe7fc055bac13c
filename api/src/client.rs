use crate::normalize::{normalize_games, normalize_stations};
use crate::table::{SheetTable, parse_delimited};
use crate::{Library, gviz};
use chrono::Local;
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const GOOGLE_DOCS: &str = "https://docs.google.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub enum ApiError {
    /// Transport failure: DNS, TLS, connection reset, timeout.
    Network(reqwest::Error, String),
    /// The endpoint answered with a non-success status.
    Status(StatusCode, String),
    /// The body is not the expected envelope or table shape.
    Format(String),
    /// Well-formed response with zero data rows.
    EmptyData(String),
    /// No recognizable columns after synonym matching.
    ColumnMissing(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Status(status, url) => write!(f, "HTTP {status} for {url}"),
            ApiError::Format(msg) => write!(f, "Unexpected response: {msg}"),
            ApiError::EmptyData(msg) => write!(f, "No data: {msg}"),
            ApiError::ColumnMissing(msg) => write!(f, "Missing columns: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(..) | ApiError::Status(..))
    }
}

/// Which export flavour of the GViz endpoint to request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// `tqx=out:json`, wrapped in a `setResponse(...)` call.
    #[default]
    Json,
    /// `tqx=out:csv`, raw delimited text.
    Csv,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" | "gviz" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    fn tqx(&self) -> &'static str {
        match self {
            ExportFormat::Json => "out:json",
            ExportFormat::Csv => "out:csv",
        }
    }

    pub fn parse_body(&self, body: &str) -> ApiResult<SheetTable> {
        match self {
            ExportFormat::Json => gviz::parse_gviz(body),
            ExportFormat::Csv => {
                // The CSV export also answers with a sign-in page when the sheet is private.
                if gviz::looks_like_html(body) {
                    return gviz::parse_gviz(body);
                }
                parse_delimited(body)
            }
        }
    }
}

/// One tab of the spreadsheet, addressed by name, numeric gid, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabRef {
    pub name: Option<String>,
    pub gid: Option<String>,
}

impl TabRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), gid: None }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.gid.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub sheet_id: String,
    pub games: TabRef,
    /// Optional secondary tab; failures are treated as "no stations".
    pub stations: Option<TabRef>,
    pub format: ExportFormat,
}

/// Read-only client for a published Google Sheet.
#[derive(Debug, Clone)]
pub struct SheetApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for SheetApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("kickoff-kiosk/0.1 (game library kiosk)")
                .build()
                .unwrap_or_default(),
            base_url: GOOGLE_DOCS.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl SheetApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another host (a mirror, or a mock server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the GViz query URL for one tab, addressed either by name or by gid.
    pub fn tab_url(&self, sheet_id: &str, format: ExportFormat, by: TabSelector<'_>) -> ApiResult<Url> {
        let endpoint = format!("{}/spreadsheets/d/{sheet_id}/gviz/tq", self.base_url);
        let (key, value) = match by {
            TabSelector::Name(name) => ("sheet", name),
            TabSelector::Gid(gid) => ("gid", gid),
        };
        Url::parse_with_params(&endpoint, &[("tqx", format.tqx()), (key, value), ("tq", "select *")])
            .map_err(|e| ApiError::Format(format!("invalid sheet url {endpoint}: {e}")))
    }

    /// Fetch and parse one tab.
    ///
    /// Fallback order: by name first, then by numeric gid if the by-name
    /// attempt fails. The last error is returned when every attempt fails.
    pub async fn fetch_table(&self, sheet_id: &str, tab: &TabRef, format: ExportFormat) -> ApiResult<SheetTable> {
        let mut attempts = Vec::with_capacity(2);
        if let Some(name) = tab.name.as_deref().filter(|n| !n.trim().is_empty()) {
            attempts.push(TabSelector::Name(name));
        }
        if let Some(gid) = tab.gid.as_deref().filter(|g| !g.trim().is_empty()) {
            attempts.push(TabSelector::Gid(gid));
        }
        if attempts.is_empty() {
            return Err(ApiError::Format("no tab name or gid configured".into()));
        }

        let mut last_error = None;
        for by in attempts {
            let url = self.tab_url(sheet_id, format, by)?;
            let result = match self.get_text(url).await {
                Ok(body) => format.parse_body(&body),
                Err(e) => Err(e),
            };
            match result {
                Ok(table) => return Ok(table),
                Err(e) => {
                    debug!("sheet fetch by {by:?} failed: {e}");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| ApiError::Format("no fetch attempted".into())))
    }

    /// Fetch the games tab, then the optional stations tab.
    pub async fn fetch_library(&self, config: &SheetConfig) -> ApiResult<Library> {
        let table = self.fetch_table(&config.sheet_id, &config.games, config.format).await?;
        let (games, issues) = normalize_games(&table)?;
        debug!("loaded {} games ({} need attention)", games.len(), issues.len());

        let stations = match config.stations.as_ref().filter(|t| !t.is_empty()) {
            Some(tab) => match self.fetch_table(&config.sheet_id, tab, config.format).await {
                Ok(table) => normalize_stations(&table),
                Err(e) => {
                    warn!("stations tab unavailable, showing none: {e}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(Library { games, stations, issues, fetched_at: Some(Local::now()) })
    }

    async fn get_text(&self, url: Url) -> ApiResult<String> {
        let url_str = url.to_string();
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url_str.clone()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status, url_str));
        }
        response.text().await.map_err(|e| ApiError::Network(e, url_str))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TabSelector<'a> {
    Name(&'a str),
    Gid(&'a str),
}

/// The operator-facing message shown when the primary source cannot be loaded.
pub fn advisory(err: &ApiError) -> String {
    let hint = match err {
        ApiError::Network(..) | ApiError::Status(..) => {
            "Check the network connection and that the sheet is shared (\"Anyone with the link\") or published to the web."
        }
        ApiError::Format(_) => {
            "Make sure the sheet is shared (\"Anyone with the link\") or published to the web."
        }
        ApiError::EmptyData(_) => "Add at least one game row below the header row.",
        ApiError::ColumnMissing(_) => {
            "Check the tab name and that the first row holds headers such as title, platform, genre."
        }
    };
    format!("Couldn't load games. {hint} ({err})")
}
