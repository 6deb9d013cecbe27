//! Windowed pagination shared by every list page
//!
//! - window: pure render-plan computation (page tokens + info text)
//! - controller: binds a plan to a render target and reports page changes

pub mod controller;
pub mod window;

pub use controller::{
    Control, ControlKind, ControlSurface, PageChangeHandler, PaginationController, RenderTarget,
};
pub use window::{
    compute_window, total_pages, PageState, PageToken, RenderPlan, DEFAULT_DELTA, NO_RESULTS_TEXT,
};
