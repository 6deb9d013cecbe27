//! Entity list pages - full page shell and the HTMX list fragment
//!
//! The page holds the search box, page-length selector and (for dated
//! records) a date range. Every change re-fetches `/<entity>/list`, which
//! returns the table together with a freshly rendered pagination control.

use super::api::entity_kind;
use crate::pagination::HtmxPagination;
use crate::{ApiError, AppState};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use shopdesk_config::CurrencyConfig;
use shopdesk_core::pagination::{PageState, PaginationController};
use shopdesk_core::types::{field_number, field_text};
use shopdesk_core::{Column, ColumnFormat, ListQuery, Record};
use shopdesk_utils::{escape_html, format_money_with};
use std::collections::HashMap;

pub(crate) const LIST_TARGET: &str = "#list-content";

/// Full list page
pub async fn page_entity(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    Path(entity): Path<String>,
) -> Response {
    let kind = match entity_kind(&entity) {
        Ok(kind) => kind,
        Err(_) => {
            let inner = format!(
                "<div class='text-center py-12 text-gray-500'><p>Unknown page: {}</p></div>",
                escape_html(&entity)
            );
            let body = crate::page_response(&headers, "Not Found", &format!("/{}", entity), &inner);
            return (StatusCode::NOT_FOUND, Html(body)).into_response();
        }
    };

    let config = &state.config;
    let list_url = format!("/{}/list", kind.plural());

    let options: String = config
        .page_length_choices()
        .iter()
        .map(|n| {
            let selected = if *n == config.pagination.page_length { " selected" } else { "" };
            format!("<option value='{}'{}>{} rows</option>", n, selected, n)
        })
        .collect();

    let date_inputs = if kind.date_field().is_some() {
        r#"<input type='date' name='start_date' class='px-3 py-2 border rounded-lg'>
            <input type='date' name='end_date' class='px-3 py-2 border rounded-lg'>"#
    } else {
        ""
    };

    let status_select = if kind.statuses().is_empty() {
        String::new()
    } else {
        let choices: String = kind
            .statuses()
            .iter()
            .map(|status| format!("<option value='{0}'>{0}</option>", status))
            .collect();
        format!(
            "<select name='status' class='px-4 py-2 border rounded-lg'><option value='all'>All statuses</option>{}</select>",
            choices
        )
    };

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>{title}</h2>
            <form id='list-filters' class='flex gap-2' hx-get='{url}' hx-target='{target}' hx-trigger='input delay:400ms, change'>
                <input type='search' name='search' placeholder='Search {title}...' autocomplete='off'
                    class='px-4 py-2 border rounded-lg w-56'>
                {dates}
                {status}
                <select name='limit' class='px-4 py-2 border rounded-lg'>{options}</select>
            </form>
        </div>
        <div id='list-content' hx-get='{url}?limit={limit}' hx-trigger='load' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Loading...</p>
        </div>"#,
        title = kind.title(),
        url = list_url,
        target = LIST_TARGET,
        dates = date_inputs,
        status = status_select,
        options = options,
        limit = config.pagination.page_length,
    );

    Html(crate::page_response(&headers, kind.title(), &format!("/{}", kind.plural()), &inner_content)).into_response()
}

/// HTMX: table rows plus pagination for one page of records
pub async fn htmx_entity_list(
    state: axum::extract::State<AppState>,
    Path(entity): Path<String>,
    params: Query<HashMap<String, String>>,
) -> Response {
    match render_list(&state, &entity, &params).await {
        Ok(html) => Html(html).into_response(),
        Err(error) => {
            log::warn!("List fragment for '{}' failed: {}", entity, error);
            let body = format!(
                "<div class='text-center py-12 text-red-500'>{}</div>",
                escape_html(&error.to_string())
            );
            (error.status(), Html(body)).into_response()
        }
    }
}

async fn render_list(
    state: &AppState,
    entity: &str,
    params: &HashMap<String, String>,
) -> Result<String, ApiError> {
    let kind = entity_kind(entity)?;
    let query = ListQuery::from_params(params, state.config.pagination.page_length)?;

    let page = {
        let directory = state.directory.read().await;
        directory.list(kind, &query)?
    };

    let mut html = render_table(kind.columns(), &page.records, None, &state.config.currency);
    html.push_str(&render_pagination(
        &format!("/{}/list", kind.plural()),
        query.to_params(),
        page.page_state(),
        state.config.pagination.window_delta,
    ));
    Ok(html)
}

/// Pagination control whose buttons re-fetch `base` with the same filters
pub fn render_pagination(base: &str, filters: Vec<(&'static str, String)>, state: PageState, delta: usize) -> String {
    let plan = state.compute_window(delta);

    let base = base.to_string();
    let filters: String = filters
        .into_iter()
        .map(|(key, value)| format!("&{}={}", key, urlencoding::encode(&value)))
        .collect();
    let page_url = Box::new(move |n: usize| format!("{}?page={}{}", base, n, filters));

    let mut target = HtmxPagination::new(LIST_TARGET);
    PaginationController.render(&mut target, &plan, state.current_page, plan.total_pages, page_url);
    target.into_html()
}

/// Records as an HTML table, with an optional footer row of totals.
/// An empty page renders nothing.
pub fn render_table(
    columns: &[Column],
    records: &[Record],
    totals: Option<&Record>,
    currency: &CurrencyConfig,
) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut html = String::from("<div class='overflow-x-auto'><table class='min-w-full text-sm'><thead><tr>");
    for column in columns {
        html.push_str(&format!(
            "<th class='px-3 py-2 text-left font-medium text-gray-500'>{}</th>",
            column.label
        ));
    }
    html.push_str("</tr></thead><tbody>");

    for record in records {
        html.push_str("<tr class='border-t hover:bg-gray-50'>");
        for column in columns {
            let cell = format_cell(record, column.key, column.format, currency);
            html.push_str(&format!("<td class='px-3 py-2{}'>{}</td>", align(column), escape_html(&cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody>");

    if let Some(totals) = totals {
        html.push_str("<tfoot><tr class='border-t-2 font-semibold bg-gray-50'>");
        for (index, column) in columns.iter().enumerate() {
            let cell = if totals.contains_key(column.key) {
                format_cell(totals, column.key, column.format, currency)
            } else if index == 0 {
                "Total".to_string()
            } else {
                String::new()
            };
            html.push_str(&format!("<td class='px-3 py-2{}'>{}</td>", align(column), escape_html(&cell)));
        }
        html.push_str("</tr></tfoot>");
    }

    html.push_str("</table></div>");
    html
}

fn align(column: &Column) -> &'static str {
    if column.format == ColumnFormat::Money {
        " text-right"
    } else {
        ""
    }
}

fn format_cell(record: &Record, key: &str, format: ColumnFormat, currency: &CurrencyConfig) -> String {
    match format {
        ColumnFormat::Money => format_money_with(
            field_number(record, key),
            currency.decimal_places,
            &currency.thousands_separator,
        ),
        ColumnFormat::Date => field_text(record, key)
            .map(|s| s.chars().take(10).collect())
            .unwrap_or_else(|| "-".to_string()),
        ColumnFormat::Text => field_text(record, key).unwrap_or_else(|| "-".to_string()),
    }
}
