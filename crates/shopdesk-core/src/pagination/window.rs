//! Sliding-window page selector computation
//!
//! Turns `(current_page, total_records, page_length)` into the sequence of
//! page buttons and ellipsis markers shown under every list, e.g.
//! `1 … 48 49 50 51 52 … 100`, plus the "Showing X-Y of Z" line.

use serde::{Deserialize, Serialize};

/// Pages shown on each side of the current page
pub const DEFAULT_DELTA: usize = 2;

/// Text shown when the result set is empty
pub const NO_RESULTS_TEXT: &str = "No results found";

/// One entry of the page selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "page", rename_all = "lowercase")]
pub enum PageToken {
    Number(usize),
    Ellipsis,
}

impl std::fmt::Display for PageToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageToken::Number(n) => write!(f, "{}", n),
            PageToken::Ellipsis => write!(f, "…"),
        }
    }
}

/// Caller-owned pagination state of a list page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub current_page: usize,
    pub total_records: usize,
    pub page_length: usize,
}

impl PageState {
    pub fn new(current_page: usize, total_records: usize, page_length: usize) -> Self {
        Self {
            current_page,
            total_records,
            page_length,
        }
    }

    /// Number of pages, never less than 1
    pub fn total_pages(&self) -> usize {
        total_pages(self.total_records, self.page_length)
    }

    /// Zero-based index of the first row on the current page
    pub fn offset(&self) -> usize {
        self.current_page.max(1).saturating_sub(1).saturating_mul(self.page_length.max(1))
    }

    /// Copy with `current_page` pulled into `[1, total_pages]`
    pub fn clamped(&self) -> Self {
        Self {
            current_page: self.current_page.clamp(1, self.total_pages()),
            total_records: self.total_records,
            page_length: self.page_length.max(1),
        }
    }

    pub fn compute_window(&self, delta: usize) -> RenderPlan {
        compute_window(self.current_page, self.total_records, self.page_length, delta)
    }
}

/// What a pagination control should display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub tokens: Vec<PageToken>,
    pub info_text: String,
    pub has_prev: bool,
    pub has_next: bool,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_records: usize,
}

impl RenderPlan {
    /// Page numbers present in the token sequence, in order
    pub fn page_numbers(&self) -> Vec<usize> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                PageToken::Number(n) => Some(*n),
                PageToken::Ellipsis => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}

/// `max(1, ceil(total_records / page_length))`, with `page_length` floored at 1
pub fn total_pages(total_records: usize, page_length: usize) -> usize {
    let page_length = page_length.max(1);
    total_records.div_ceil(page_length).max(1)
}

/// Pages kept around `current_page`: first, last, and the `delta` window
fn kept_pages(current_page: usize, total_pages: usize, delta: usize) -> Vec<usize> {
    let low = current_page.saturating_sub(delta);
    let high = current_page.saturating_add(delta);

    (1..=total_pages)
        .filter(|&i| i == 1 || i == total_pages || (i >= low && i <= high))
        .collect()
}

/// Build the render plan for a pagination control.
///
/// Never fails: `page_length` and `current_page` are floored at 1, and a
/// `current_page` past the last page still yields a plan whose `has_next`
/// is false so navigation can recover.
pub fn compute_window(
    current_page: usize,
    total_records: usize,
    page_length: usize,
    delta: usize,
) -> RenderPlan {
    let page_length = page_length.max(1);
    let current_page = current_page.max(1);
    let pages = total_pages(total_records, page_length);

    let mut tokens = Vec::new();
    let mut last: Option<usize> = None;
    for page in kept_pages(current_page, pages, delta) {
        if let Some(prev) = last {
            match page - prev {
                1 => {}
                2 => tokens.push(PageToken::Number(prev + 1)),
                _ => tokens.push(PageToken::Ellipsis),
            }
        }
        tokens.push(PageToken::Number(page));
        last = Some(page);
    }

    let info_text = if total_records == 0 {
        NO_RESULTS_TEXT.to_string()
    } else {
        let start = (current_page - 1).saturating_mul(page_length).saturating_add(1);
        let end = current_page.saturating_mul(page_length).min(total_records);
        format!("Showing {}-{} of {} results", start, end, total_records)
    };

    let empty = total_records == 0;

    RenderPlan {
        tokens,
        info_text,
        has_prev: !empty && current_page > 1,
        has_next: !empty && current_page < pages,
        current_page,
        total_pages: pages,
        total_records,
    }
}

// ==================== Tests ====================
