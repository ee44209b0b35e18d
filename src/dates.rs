// 📅 Approval-date rules

use crate::error::{ReportError, Result};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

pub const DATE_PLACEHOLDER: &str = "????년 ??월 ??일";

const DATE_INDENT: &str = "     ";

fn is_eight_digits(raw: &str) -> bool {
    raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Strict `YYYYMMDD` parse
pub fn parse_compact_date(raw: &str) -> Result<NaiveDate> {
    if !is_eight_digits(raw) {
        return Err(ReportError::DateFormat(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d").map_err(|_| ReportError::DateFormat(raw.to_string()))
}

/// `YYYYMMDD` that is a real calendar date → `YYYY-MM-DD`; anything else unchanged
pub fn normalize_approval_date(raw: &str) -> String {
    if !is_eight_digits(raw) {
        return raw.to_string();
    }

    match parse_compact_date(raw) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(e) => {
            debug!(error = %e, "approval date kept as typed");
            raw.to_string()
        }
    }
}

/// Parse either the raw `YYYYMMDD` form or the normalized `YYYY-MM-DD` form
pub fn parse_approval_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if is_eight_digits(text) {
        NaiveDate::parse_from_str(text, "%Y%m%d").ok()
    } else if text.len() == 10 {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
    } else {
        None
    }
}

/// Localized closing line, e.g. `     2024년 2월 10일`
pub fn closing_date_line(text: &str) -> String {
    match parse_approval_date(text) {
        Some(date) => format!(
            "{}{}년 {}월 {}일",
            DATE_INDENT,
            date.year(),
            date.month(),
            date.day()
        ),
        None => {
            debug!(date = text, "no usable application date, using placeholder");
            format!("{}{}", DATE_INDENT, DATE_PLACEHOLDER)
        }
    }
}
