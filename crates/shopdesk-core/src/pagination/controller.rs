//! Binding a render plan to an interactive control surface
//!
//! The controller is stateless: every `render` call turns a plan into a full
//! set of controls and hands them, together with a freshly supplied page
//! change callback, to a [`RenderTarget`]. Targets own exactly one callback
//! slot and replace it on every render, so repeated renders never stack
//! handlers.

use serde::{Deserialize, Serialize};

use super::window::{PageToken, RenderPlan};

pub const PREVIOUS_LABEL: &str = "Previous";
pub const NEXT_LABEL: &str = "Next";
pub const ELLIPSIS_LABEL: &str = "...";

/// Kind of a rendered control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Previous,
    Page,
    Ellipsis,
    Next,
}

/// One rendered button or spacer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub kind: ControlKind,
    pub label: String,
    /// Page requested when the control is activated
    pub target: Option<usize>,
    /// Highlighted as the current page
    pub active: bool,
    pub disabled: bool,
}

impl Control {
    fn page(page: usize, current_page: usize) -> Self {
        Self {
            kind: ControlKind::Page,
            label: page.to_string(),
            target: Some(page),
            active: page == current_page,
            disabled: false,
        }
    }

    fn ellipsis() -> Self {
        Self {
            kind: ControlKind::Ellipsis,
            label: ELLIPSIS_LABEL.to_string(),
            target: None,
            active: false,
            disabled: true,
        }
    }

    /// Whether activating this control requests a page change
    pub fn is_interactive(&self) -> bool {
        !self.disabled && !self.active && self.target.is_some()
    }
}

/// Anything a pagination control can be rendered into
pub trait RenderTarget {
    /// What the target calls (or encodes) when a control requests a page
    type Handler;

    /// Replace all previously rendered content and the previous handler
    fn replace(&mut self, info_text: &str, controls: Vec<Control>, handler: Self::Handler);
}

/// Stateless pagination controller
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationController;

impl PaginationController {
    pub fn new() -> Self {
        Self
    }

    /// Controls for a plan: Previous, one per token, Next.
    ///
    /// An empty result set renders no controls at all.
    pub fn controls(&self, plan: &RenderPlan, current_page: usize, total_pages: usize) -> Vec<Control> {
        if plan.is_empty() {
            return Vec::new();
        }

        let current_page = current_page.max(1);
        let total_pages = total_pages.max(1);

        let mut controls = Vec::with_capacity(plan.tokens.len() + 2);

        // an out-of-range page steps back onto the last real page
        let prev_target = (current_page - 1).min(total_pages);
        controls.push(Control {
            kind: ControlKind::Previous,
            label: PREVIOUS_LABEL.to_string(),
            target: (prev_target >= 1).then_some(prev_target),
            active: false,
            disabled: !plan.has_prev,
        });

        for token in &plan.tokens {
            controls.push(match token {
                PageToken::Number(n) => Control::page(*n, current_page),
                PageToken::Ellipsis => Control::ellipsis(),
            });
        }

        controls.push(Control {
            kind: ControlKind::Next,
            label: NEXT_LABEL.to_string(),
            target: current_page.checked_add(1),
            active: false,
            disabled: !plan.has_next,
        });

        controls
    }

    /// Render `plan` into `target`, replacing its content and handler
    pub fn render<T: RenderTarget>(
        &self,
        target: &mut T,
        plan: &RenderPlan,
        current_page: usize,
        total_pages: usize,
        on_page_change: T::Handler,
    ) {
        let controls = self.controls(plan, current_page, total_pages);
        target.replace(&plan.info_text, controls, on_page_change);
    }
}

/// Callback invoked with the requested page
pub type PageChangeHandler = Box<dyn FnMut(usize) + Send>;

/// In-memory control surface driven by callbacks
#[derive(Default)]
pub struct ControlSurface {
    info_text: String,
    controls: Vec<Control>,
    handler: Option<PageChangeHandler>,
}

impl std::fmt::Debug for ControlSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlSurface")
            .field("info_text", &self.info_text)
            .field("controls", &self.controls)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl ControlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info_text(&self) -> &str {
        &self.info_text
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Labels of all rendered controls, in order
    pub fn labels(&self) -> Vec<&str> {
        self.controls.iter().map(|c| c.label.as_str()).collect()
    }

    /// Simulate a user activating the control at `index`.
    ///
    /// Returns the page reported to the handler, or `None` when the control
    /// is missing, disabled, a spacer, or the current page.
    pub fn activate(&mut self, index: usize) -> Option<usize> {
        let page = self
            .controls
            .get(index)
            .filter(|c| c.is_interactive())
            .and_then(|c| c.target)?;

        let handler = self.handler.as_mut()?;
        handler(page);
        Some(page)
    }

    /// Activate the numbered control for `page`
    pub fn activate_page(&mut self, page: usize) -> Option<usize> {
        let index = self
            .controls
            .iter()
            .position(|c| c.kind == ControlKind::Page && c.target == Some(page))?;
        self.activate(index)
    }

    pub fn activate_previous(&mut self) -> Option<usize> {
        let index = self.controls.iter().position(|c| c.kind == ControlKind::Previous)?;
        self.activate(index)
    }

    pub fn activate_next(&mut self) -> Option<usize> {
        let index = self.controls.iter().position(|c| c.kind == ControlKind::Next)?;
        self.activate(index)
    }
}

impl RenderTarget for ControlSurface {
    type Handler = PageChangeHandler;

    fn replace(&mut self, info_text: &str, controls: Vec<Control>, handler: Self::Handler) {
        self.info_text = info_text.to_string();
        self.controls = controls;
        self.handler = Some(handler);
    }
}

// ==================== Tests ====================
