//! List request parameters and results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::pagination::PageState;
use crate::types::{field_text, EntityKind, Record};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive date range; an open end matches everything on that side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        match (self.start, self.end) {
            (None, None) => true,
            (Some(s), None) => *date >= s,
            (None, Some(e)) => *date <= e,
            (Some(s), Some(e)) => *date >= s && *date <= e,
        }
    }

    /// Check a record's date field; unparsable or missing dates are outside any bounded range
    pub fn contains_record(&self, record: &Record, field: &str) -> bool {
        if self.is_open() {
            return true;
        }
        record
            .get(field)
            .and_then(|v| v.as_str())
            .and_then(parse_record_date)
            .map(|d| self.contains(&d))
            .unwrap_or(false)
    }
}

/// Parse the leading `YYYY-MM-DD` of a stored date or timestamp
pub fn parse_record_date(value: &str) -> Option<NaiveDate> {
    let head = value.trim().get(..10)?;
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

/// A list request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: usize,
    pub limit: usize,
    pub search: Option<String>,
    pub dates: DateRange,
    /// Exact `status` value, compared case-insensitively
    pub status: Option<String>,
}

impl ListQuery {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            search: None,
            dates: DateRange::default(),
            status: None,
        }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        let trimmed = search.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.dates = DateRange { start, end };
        self
    }

    /// Restrict to one status; empty or `all` clears the filter
    pub fn with_status(mut self, status: &str) -> Self {
        let trimmed = status.trim();
        self.status = (!trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("all"))
            .then(|| trimmed.to_lowercase());
        self
    }

    /// Whether a record passes the status filter
    pub fn matches_status(&self, record: &Record) -> bool {
        match self.status {
            None => true,
            Some(ref wanted) => field_text(record, "status")
                .map(|s| s.trim().eq_ignore_ascii_case(wanted))
                .unwrap_or(false),
        }
    }

    /// Build from query-string parameters.
    ///
    /// Missing, unparsable or zero `page` falls back to 1 and `limit` to
    /// `default_limit`. Dates must be `YYYY-MM-DD`.
    pub fn from_params(params: &HashMap<String, String>, default_limit: usize) -> CoreResult<Self> {
        let page = positive(params.get("page")).unwrap_or(1);
        let limit = positive(params.get("limit")).unwrap_or(default_limit);

        let start = parse_param_date(params, "start_date")?;
        let end = parse_param_date(params, "end_date")?;
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(CoreError::InvalidQuery {
                    field: "start_date".to_string(),
                    message: format!("{} is after end_date {}", s, e),
                });
            }
        }

        Ok(Self::new(page, limit)
            .with_search(params.get("search").map(String::as_str).unwrap_or(""))
            .with_dates(start, end)
            .with_status(params.get("status").map(String::as_str).unwrap_or("")))
    }

    /// Zero-based index of the first row of the page
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.limit.max(1))
    }

    /// Query-string form, without `page`, for building page links
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", self.limit.to_string())];
        if let Some(ref search) = self.search {
            params.push(("search", search.clone()));
        }
        if let Some(start) = self.dates.start {
            params.push(("start_date", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.dates.end {
            params.push(("end_date", end.format(DATE_FORMAT).to_string()));
        }
        if let Some(ref status) = self.status {
            params.push(("status", status.clone()));
        }
        params
    }
}

fn positive(value: Option<&String>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
}

fn parse_param_date(params: &HashMap<String, String>, field: &str) -> CoreResult<Option<NaiveDate>> {
    match params.get(field).map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Some)
            .map_err(|_| CoreError::InvalidQuery {
                field: field.to_string(),
                message: format!("'{}' is not a YYYY-MM-DD date", value),
            }),
    }
}

/// One page of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    pub records: Vec<Record>,
    /// Matching records across all pages
    pub total_count: usize,
    pub page: usize,
    pub limit: usize,
}

impl ListPage {
    pub fn page_state(&self) -> PageState {
        PageState::new(self.page, self.total_count, self.limit)
    }

    /// `{ "<plural>": [...], "total_count", "page", "limit" }`
    pub fn to_json(&self, kind: EntityKind) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert(
            kind.plural().to_string(),
            serde_json::Value::Array(
                self.records
                    .iter()
                    .cloned()
                    .map(serde_json::Value::Object)
                    .collect(),
            ),
        );
        body.insert("total_count".to_string(), self.total_count.into());
        body.insert("page".to_string(), self.page.into());
        body.insert("limit".to_string(), self.limit.into());
        serde_json::Value::Object(body)
    }
}
