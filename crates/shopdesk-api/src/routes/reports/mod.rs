//! Report routes - branch, salary, worker progress and customer dues
//!
//! Structure:
//! - api.rs: JSON API and the HTMX report fragment
//! - page.rs: Report index and full report pages

pub mod api;
pub mod page;

pub use api::{api_report, htmx_report_list, report_kind};
pub use page::{page_report, page_reports};
