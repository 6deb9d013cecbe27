//! Entity routes - every record kind, from employees to daily progress entries
//!
//! All kinds share one set of handlers keyed by the `:entity` path
//! segment.
//!
//! Structure:
//! - api.rs: JSON list, detail and autocomplete endpoints
//! - page.rs: Full list page and the HTMX list fragment

pub mod api;
pub mod page;

pub use api::{api_entity_detail, api_entity_list, api_entity_suggest, entity_kind};
pub use page::{htmx_entity_list, page_entity, render_pagination, render_table};
