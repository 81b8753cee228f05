use chrono::NaiveDate;

/// Parse a `"YYYY-MM-DD"` trading-date value.
///
/// Empty and malformed values yield `None` — a gap to be repaired by
/// forward-fill, never an error that escapes the row.
pub fn parse_trading_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
