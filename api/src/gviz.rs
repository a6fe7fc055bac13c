/// Wire types for the Google Visualization (GViz) query endpoint.
/// Endpoint: https://docs.google.com/spreadsheets/d/{id}/gviz/tq?tqx=out:json
///
/// The body is not plain JSON; it is wrapped in a JavaScript call:
/// `/*O_o*/ google.visualization.Query.setResponse({...});`
use crate::client::{ApiError, ApiResult};
use crate::table::{SheetTable, trim_trailing_blank_rows};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

const SNIPPET_CHARS: usize = 200;

static ENVELOPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)setResponse\((.*)\)\s*;?\s*$").expect("envelope pattern is valid")
});

#[derive(Deserialize, Default, Debug)]
pub struct GvizResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub errors: Vec<GvizMessage>,
    pub table: Option<GvizTable>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GvizMessage {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub detailed_message: String,
}

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GvizTable {
    #[serde(default)]
    pub cols: Vec<GvizColumn>,
    #[serde(default)]
    pub rows: Vec<GvizRow>,
    /// How many leading sheet rows the provider folded into column labels.
    #[serde(default)]
    pub parsed_num_headers: u32,
}

#[derive(Deserialize, Default, Debug)]
pub struct GvizColumn {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Deserialize, Default, Debug)]
pub struct GvizRow {
    #[serde(default)]
    pub c: Vec<Option<GvizCell>>,
}

#[derive(Deserialize, Default, Debug)]
pub struct GvizCell {
    #[serde(default)]
    pub v: Value,
    /// Formatted value; preferred over `v` when present.
    pub f: Option<String>,
}

impl GvizCell {
    pub fn text(&self) -> String {
        if let Some(formatted) = &self.f {
            return formatted.clone();
        }
        match &self.v {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.to_string()
                } else {
                    match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
                        _ => n.to_string(),
                    }
                }
            }
            other => other.to_string(),
        }
    }
}

/// True when the provider answered with a web page (usually a sign-in page)
/// instead of data.
pub fn looks_like_html(text: &str) -> bool {
    let head: String = text.trim_start().chars().take(16).collect::<String>().to_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

pub fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

/// Strip the `setResponse(...)` envelope and decode the JSON payload.
pub fn unwrap_envelope(text: &str) -> ApiResult<GvizResponse> {
    if looks_like_html(text) {
        return Err(ApiError::Format(
            "Google returned a web page instead of sheet data. The sheet is probably not \
             shared (\"Anyone with the link\") or published to the web."
                .into(),
        ));
    }

    let payload = ENVELOPE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            ApiError::Format(format!(
                "Unexpected Google Sheets response. Make sure the sheet is published or shared. \
                 Response began with: {}",
                snippet(text)
            ))
        })?;

    serde_json::from_str(payload)
        .map_err(|e| ApiError::Format(format!("could not decode sheet payload: {e}")))
}

/// Parse a wrapped GViz response into a table of raw cell text.
pub fn parse_gviz(text: &str) -> ApiResult<SheetTable> {
    let response = unwrap_envelope(text)?;

    if response.status.eq_ignore_ascii_case("error") {
        let reasons: Vec<String> = response
            .errors
            .iter()
            .map(|e| {
                if e.detailed_message.is_empty() {
                    e.message.clone()
                } else {
                    e.detailed_message.clone()
                }
            })
            .filter(|m| !m.is_empty())
            .collect();
        return Err(ApiError::Format(format!(
            "Google Sheets rejected the query: {}",
            if reasons.is_empty() { "no reason given".to_string() } else { reasons.join("; ") }
        )));
    }

    let table = response
        .table
        .ok_or_else(|| ApiError::Format("sheet payload has no table".into()))?;

    let mut rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            (0..table.cols.len())
                .map(|idx| row.c.get(idx).and_then(Option::as_ref).map(GvizCell::text).unwrap_or_default())
                .collect()
        })
        .collect();

    // No header row detected by the provider: the first data row holds the headers.
    let unlabeled = table.cols.iter().all(|c| c.label.trim().is_empty());
    let headers: Vec<String> = if unlabeled && table.parsed_num_headers == 0 && !rows.is_empty() {
        rows.remove(0).into_iter().map(|h| h.trim().to_owned()).collect()
    } else {
        table
            .cols
            .iter()
            .map(|c| if c.label.trim().is_empty() { c.id.trim() } else { c.label.trim() }.to_owned())
            .collect()
    };

    trim_trailing_blank_rows(&mut rows);
    if rows.is_empty() {
        return Err(ApiError::EmptyData("the sheet has a header row but no game rows".into()));
    }

    Ok(SheetTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(json: &str) -> String {
        format!("/*O_o*/\ngoogle.visualization.Query.setResponse({json});")
    }

    #[test]
    fn parses_labels_and_prefers_formatted_values() {
        let body = wrap(
            r#"{"version":"0.6","status":"ok","table":{"cols":[{"id":"A","label":"Title","type":"string"},{"id":"B","label":"Players","type":"number"}],"rows":[{"c":[{"v":"Rocket League"},{"v":4.0,"f":"4 players"}]},{"c":[{"v":"Tetris"},{"v":1.0}]}],"parsedNumHeaders":1}}"#,
        );
        let table = parse_gviz(&body).unwrap();
        assert_eq!(table.headers, vec!["Title", "Players"]);
        assert_eq!(table.rows[0], vec!["Rocket League", "4 players"]);
        assert_eq!(table.rows[1], vec!["Tetris", "1"]);
    }

    #[test]
    fn null_cells_become_empty_strings() {
        let body = wrap(
            r#"{"status":"ok","table":{"cols":[{"id":"A","label":"title"},{"id":"B","label":"genre"}],"rows":[{"c":[{"v":"Pong"},null]},{"c":[{"v":"Doom"}]}]}}"#,
        );
        let table = parse_gviz(&body).unwrap();
        assert_eq!(table.rows[0], vec!["Pong", ""]);
        assert_eq!(table.rows[1], vec!["Doom", ""]);
    }

    #[test]
    fn html_page_is_a_format_error() {
        let err = parse_gviz("<!DOCTYPE html><html><body>Sign in</body></html>").unwrap_err();
        match err {
            ApiError::Format(msg) => assert!(msg.contains("shared")),
            other => panic!("expected format error, got {other}"),
        }
    }

    #[test]
    fn missing_envelope_reports_a_snippet() {
        let text = format!("{{\"oops\": true}}{}", "x".repeat(400));
        let err = parse_gviz(&text).unwrap_err();
        let ApiError::Format(msg) = err else {
            panic!("expected format error");
        };
        assert!(msg.contains("{\"oops\": true}"));
        assert!(!msg.contains(&"x".repeat(201)));
    }

    #[test]
    fn provider_error_status_is_surfaced() {
        let body = wrap(
            r#"{"status":"error","errors":[{"reason":"invalid_query","message":"INVALID_QUERY","detailed_message":"Invalid sheet name: Gamez"}]}"#,
        );
        let ApiError::Format(msg) = parse_gviz(&body).unwrap_err() else {
            panic!("expected format error");
        };
        assert!(msg.contains("Invalid sheet name: Gamez"));
    }

    #[test]
    fn header_only_sheet_is_empty_data() {
        let body = wrap(
            r#"{"status":"ok","table":{"cols":[{"id":"A","label":"title"}],"rows":[],"parsedNumHeaders":1}}"#,
        );
        assert!(matches!(parse_gviz(&body).unwrap_err(), ApiError::EmptyData(_)));
    }

    #[test]
    fn unlabeled_columns_promote_first_row() {
        let body = wrap(
            r#"{"status":"ok","table":{"cols":[{"id":"A","label":""},{"id":"B","label":""}],"rows":[{"c":[{"v":"title"},{"v":"platform"}]},{"c":[{"v":"Halo"},{"v":"Xbox"}]}],"parsedNumHeaders":0}}"#,
        );
        let table = parse_gviz(&body).unwrap();
        assert_eq!(table.headers, vec!["title", "platform"]);
        assert_eq!(table.rows, vec![vec!["Halo".to_string(), "Xbox".to_string()]]);
    }

    #[test]
    fn blank_middle_rows_survive_trailing_ones_do_not() {
        let body = wrap(
            r#"{"status":"ok","table":{"cols":[{"id":"A","label":"title"},{"id":"B","label":"trailer_url"}],"rows":[{"c":[{"v":"Tetris"},null]},{"c":[null,null]},{"c":[{"v":"Pong"},{"v":"https://example.com/clip"}]},{"c":[null,{"v":""}]}],"parsedNumHeaders":1}}"#,
        );
        let table = parse_gviz(&body).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1], vec!["", ""]);
        assert_eq!(table.rows[2][0], "Pong");
    }

    #[test]
    fn html_detection_ignores_leading_whitespace() {
        assert!(looks_like_html("\n  <html lang=\"en\">"));
        assert!(!looks_like_html("/*O_o*/ google.visualization"));
    }
}
