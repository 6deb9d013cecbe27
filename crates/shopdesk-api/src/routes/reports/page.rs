//! Reports page rendering - Full page endpoints

use super::api::report_kind;
use crate::AppState;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use shopdesk_core::{Grouping, ReportKind};
use shopdesk_utils::escape_html;

/// Index of every report
pub async fn page_reports(headers: axum::http::HeaderMap) -> Html<String> {
    let cards: String = ReportKind::ALL
        .iter()
        .map(|kind| {
            format!(
                r#"<a href='/reports/{}' class='bg-white p-4 rounded-xl shadow-sm hover:shadow'><p class='text-lg font-bold'>{}</p><p class='text-sm text-gray-500'>{} columns, totals included</p></a>"#,
                kind.slug(),
                kind.title(),
                kind.columns().len()
            )
        })
        .collect();

    let inner_content = format!(
        r#"<h2 class='text-2xl font-bold mb-4'>Reports</h2>
        <div class='grid grid-cols-1 md:grid-cols-2 gap-4'>{}</div>"#,
        cards
    );

    Html(crate::page_response(&headers, "Reports", "/reports", &inner_content))
}

/// One report with its filter form; the table loads from `/reports/<report>/list`
pub async fn page_report(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    Path(report): Path<String>,
) -> Response {
    let kind = match report_kind(&report) {
        Ok(kind) => kind,
        Err(_) => {
            let inner = format!(
                "<div class='text-center py-12 text-gray-500'><p>Unknown report: {}</p></div>",
                escape_html(&report)
            );
            let body = crate::page_response(&headers, "Not Found", "/reports", &inner);
            return (StatusCode::NOT_FOUND, Html(body)).into_response();
        }
    };

    let config = &state.config;
    let list_url = format!("/reports/{}/list", kind.slug());

    let options: String = config
        .page_length_choices()
        .iter()
        .map(|n| {
            let selected = if *n == config.pagination.page_length { " selected" } else { "" };
            format!("<option value='{}'{}>{} rows</option>", n, selected, n)
        })
        .collect();

    let mut extra = String::new();
    if kind.has_dates() {
        extra.push_str(
            "<input type='date' name='start_date' class='px-3 py-2 border rounded-lg'>\
             <input type='date' name='end_date' class='px-3 py-2 border rounded-lg'>",
        );
    }
    if kind.uses_grouping() {
        let periods: String = Grouping::ALL
            .iter()
            .map(|g| format!("<option value='{}'>{}</option>", g.as_str(), g.as_str()))
            .collect();
        extra.push_str(&format!(
            "<select name='report_type' class='px-4 py-2 border rounded-lg'>{}</select>",
            periods
        ));
    }

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>{title}</h2>
            <form id='report-filters' class='flex gap-2' hx-get='{url}' hx-target='#list-content' hx-trigger='input delay:400ms, change'>
                <input type='search' name='search' placeholder='Search...' autocomplete='off'
                    class='px-4 py-2 border rounded-lg w-56'>
                {extra}
                <select name='limit' class='px-4 py-2 border rounded-lg'>{options}</select>
            </form>
        </div>
        <div id='list-content' hx-get='{url}?limit={limit}' hx-trigger='load' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Loading...</p>
        </div>"#,
        title = kind.title(),
        url = list_url,
        extra = extra,
        options = options,
        limit = config.pagination.page_length,
    );

    Html(crate::page_response(
        &headers,
        kind.title(),
        &format!("/reports/{}", kind.slug()),
        &inner_content,
    ))
    .into_response()
}
