//! Route modules for the API server
//!
//! - entities: record lists, detail, autocomplete (one set of handlers for all kinds)
//! - cart: order/sale summary
//! - reports: branch, salary, worker progress and customer dues with totals
//! - settings: configuration display
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: HTMX page rendering

pub mod cart;
pub mod entities;
pub mod reports;
pub mod settings;
