//! Cart routes - order/sale totals

pub mod api;

pub use api::api_cart_summary;
