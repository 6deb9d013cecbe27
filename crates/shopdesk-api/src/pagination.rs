//! HTMX rendering of the pagination control
//!
//! Each interactive button carries its own `hx-get` URL, so re-rendering the
//! fragment replaces every button together with its request.

use shopdesk_core::pagination::{Control, ControlKind, RenderTarget};
use shopdesk_utils::escape_html;

/// Maps a page number to the URL its button fetches
pub type PageUrl = Box<dyn Fn(usize) -> String + Send>;

/// Pagination fragment swapped into `target`
pub struct HtmxPagination {
    target: String,
    html: String,
}

impl HtmxPagination {
    /// `target` is the CSS selector the fetched page replaces
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            html: String::new(),
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    fn button(&self, control: &Control, page_url: &PageUrl) -> String {
        let label = escape_html(&control.label);

        match (control.kind, control.target) {
            (ControlKind::Ellipsis, _) => {
                format!("<span class='px-2 py-1 text-gray-400 select-none'>{}</span>", label)
            }
            (ControlKind::Page, Some(page)) if control.active => format!(
                "<button type='button' disabled aria-current='page' data-page='{}' class='px-3 py-1 rounded border bg-indigo-600 text-white'>{}</button>",
                page, label
            ),
            (_, Some(page)) if control.is_interactive() => format!(
                "<button type='button' hx-get='{}' hx-target='{}' hx-swap='innerHTML' data-page='{}' class='px-3 py-1 rounded border hover:bg-gray-100'>{}</button>",
                escape_html(&page_url(page)),
                escape_html(&self.target),
                page,
                label
            ),
            _ => format!(
                "<button type='button' disabled class='px-3 py-1 rounded border opacity-50 cursor-not-allowed'>{}</button>",
                label
            ),
        }
    }
}

impl RenderTarget for HtmxPagination {
    type Handler = PageUrl;

    fn replace(&mut self, info_text: &str, controls: Vec<Control>, handler: Self::Handler) {
        let mut html = format!(
            "<div class='mt-6 flex items-center justify-between flex-wrap gap-4' data-role='pagination'><span class='text-sm text-gray-500'>{}</span>",
            escape_html(info_text)
        );

        if !controls.is_empty() {
            html.push_str("<div class='flex items-center gap-1'>");
            for control in &controls {
                html.push_str(&self.button(control, &handler));
            }
            html.push_str("</div>");
        }

        html.push_str("</div>");
        self.html = html;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdesk_core::pagination::{compute_window, PaginationController};

    fn url() -> PageUrl {
        Box::new(|page| format!("/customers/list?page={}&limit=10", page))
    }

    #[test]
    fn test_renders_buttons_with_urls() {
        let plan = compute_window(3, 95, 10, 2);
        let mut target = HtmxPagination::new("#list-content");
        PaginationController.render(&mut target, &plan, 3, plan.total_pages, url());

        let html = target.html();
        assert!(html.contains("Showing 21-30 of 95 results"));
        assert!(html.contains("hx-get='/customers/list?page=2&amp;limit=10'"));
        assert!(html.contains("hx-target='#list-content'"));
        assert!(html.contains("aria-current='page' data-page='3'"));
        // the active page has no request of its own
        assert!(!html.contains("page=3&amp;"));
        assert_eq!(html.matches("data-page=").count(), 8);
    }

    #[test]
    fn test_disabled_previous_on_first_page() {
        let plan = compute_window(1, 95, 10, 2);
        let mut target = HtmxPagination::new("#list-content");
        PaginationController.render(&mut target, &plan, 1, plan.total_pages, url());

        assert!(target.html().contains("disabled class='px-3 py-1 rounded border opacity-50 cursor-not-allowed'>Previous"));
        assert!(target.html().contains("page=2&amp;limit=10'"));
    }

    #[test]
    fn test_empty_result_only_info() {
        let plan = compute_window(1, 0, 10, 2);
        let mut target = HtmxPagination::new("#list-content");
        PaginationController.render(&mut target, &plan, 1, plan.total_pages, url());

        assert!(target.html().contains("No results found"));
        assert!(!target.html().contains("<button"));
    }

    #[test]
    fn test_rerender_replaces_fragment() {
        let mut target = HtmxPagination::new("#list-content");
        let first = compute_window(1, 95, 10, 2);
        PaginationController.render(&mut target, &first, 1, first.total_pages, url());
        let second = compute_window(10, 95, 10, 2);
        PaginationController.render(&mut target, &second, 10, second.total_pages, url());

        let html = target.into_html();
        assert_eq!(html.matches("data-role='pagination'").count(), 1);
        assert!(html.contains("Showing 91-95 of 95 results"));
        assert!(!html.contains("Showing 1-10"));
    }
}
