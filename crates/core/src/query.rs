//! Parsing of item listing parameters (`dueDate`, `sort`) and LIKE escaping.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Due date filter
// ---------------------------------------------------------------------------

/// A half-open UTC interval `[start, end)` covering one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DayRange {
    /// The UTC day containing `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::default()));
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        ts >= self.start && ts < self.end
    }
}

/// Parse a `dueDate` query value.
///
/// Accepts a calendar date (`2026-10-18`) or an RFC 3339 timestamp
/// (`2026-10-18T09:30:00Z`); both select the whole UTC day.
pub fn parse_due_date(raw: &str) -> Result<DayRange, CoreError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(DayRange::for_date(date));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(DayRange::for_date(ts.with_timezone(&Utc).date_naive()));
    }
    Err(CoreError::Validation(format!(
        "Invalid dueDate '{raw}'. Expected YYYY-MM-DD or an RFC 3339 timestamp"
    )))
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    DueDate,
    Title,
}

impl SortField {
    /// The database column backing this field.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::DueDate => "due_date",
            SortField::Title => "title",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            "dueDate" => Some(SortField::DueDate),
            "title" => Some(SortField::Title),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Ordering for item listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for ItemSort {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl ItemSort {
    pub const fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    /// Parse a `sort` query value: a field name, optionally prefixed with
    /// `-` for descending order. `None` or blank yields the default.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(Self::default()),
            Some(raw) => raw,
        };

        let (name, direction) = match raw.strip_prefix('-') {
            Some(name) => (name, SortDirection::Desc),
            None => (raw, SortDirection::Asc),
        };

        let field = SortField::from_name(name).ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid sort '{raw}'. Must be one of: createdAt, updatedAt, dueDate, title \
                 (prefix with '-' for descending)"
            ))
        })?;

        Ok(Self { field, direction })
    }
}

// ---------------------------------------------------------------------------
// LIKE patterns
// ---------------------------------------------------------------------------

/// Escape `\`, `%` and `_` so user input matches literally inside a LIKE
/// pattern using the default `\` escape character.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build a `%term%` substring pattern from raw user input.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
