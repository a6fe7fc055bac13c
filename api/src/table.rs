use crate::client::{ApiError, ApiResult};

/// A rectangular sheet: one header row plus data rows of raw cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Build a table from raw rows, taking row zero as the header.
    /// Rows shorter than the header are padded with empty cells.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let headers: Vec<String> = rows.remove(0).into_iter().map(|h| h.trim().to_owned()).collect();
        for row in &mut rows {
            if row.len() < headers.len() {
                row.resize(headers.len(), String::new());
            }
        }
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub(crate) fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Drop the run of all-blank rows at the end of the sheet. Blank rows with
/// data below them stay, so row numbers keep matching the sheet.
pub(crate) fn trim_trailing_blank_rows(rows: &mut Vec<Vec<String>>) {
    while rows.last().is_some_and(|row| is_blank_row(row)) {
        rows.pop();
    }
}

/// Parse a delimited-text (CSV) export. `"` quotes a field, `""` inside a
/// quoted field is a literal quote, and `\r`, `\n` or `\r\n` end a row.
/// Trailing blank rows are collapsed.
pub fn parse_delimited(text: &str) -> ApiResult<SheetTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| ApiError::Format(format!("malformed delimited text: {e}")))?;
        rows.push(record.iter().map(ToOwned::to_owned).collect());
    }
    trim_trailing_blank_rows(&mut rows);

    if rows.len() < 2 {
        return Err(ApiError::EmptyData(
            "the sheet has a header row but no game rows".into(),
        ));
    }

    Ok(SheetTable::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_field_keeps_delimiter_and_quote() {
        let text = "title,platform\n\"Halo, \"\"Reach\"\"\",Xbox\n";
        let table = parse_delimited(text).unwrap();
        assert_eq!(table.headers, vec!["title", "platform"]);
        assert_eq!(table.rows[0][0], "Halo, \"Reach\"");
        assert_eq!(table.rows[0][1], "Xbox");
    }

    #[test]
    fn carriage_returns_end_rows() {
        let text = "title,genre\r\nTetris,Puzzle\rCeleste,Platformer\r\n";
        let table = parse_delimited(text).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["Celeste", "Platformer"]);
    }

    #[test]
    fn trailing_blank_rows_are_collapsed() {
        let text = "title,genre\nTetris,Puzzle\n\n,\n\r\n";
        let table = parse_delimited(text).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn header_only_is_empty_data() {
        let err = parse_delimited("title,platform\n").unwrap_err();
        assert!(matches!(err, ApiError::EmptyData(_)));
    }

    #[test]
    fn nothing_at_all_is_empty_data() {
        assert!(matches!(parse_delimited("").unwrap_err(), ApiError::EmptyData(_)));
    }

    #[test]
    fn short_rows_are_padded() {
        let table = parse_delimited("title,platform,genre\nPong\n").unwrap();
        assert_eq!(table.rows[0], vec!["Pong", "", ""]);
    }

    #[test]
    fn blank_rows_between_games_are_kept() {
        let text = "title,trailer_url\nTetris,\n,\nPong,https://example.com/clip\n,\n";
        let table = parse_delimited(text).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert!(is_blank_row(&table.rows[1]));
        assert_eq!(table.rows[2][0], "Pong");
    }
}
