//! Reports API endpoints - JSON API and HTMX partial responses

use crate::routes::entities::{render_pagination, render_table};
use crate::{ApiError, AppState};
use axum::extract::{Path, Query};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use shopdesk_core::{ReportKind, ReportQuery};
use shopdesk_utils::escape_html;
use std::collections::HashMap;

/// Parse the `:report` path segment
pub fn report_kind(name: &str) -> Result<ReportKind, ApiError> {
    Ok(name.parse::<ReportKind>()?)
}

/// `{ "rows": [...], "totals": {...}, "total_count", "page", "limit" }`
pub async fn api_report(
    state: axum::extract::State<AppState>,
    Path(report): Path<String>,
    params: Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let kind = report_kind(&report)?;
    let query = ReportQuery::from_params(&params, state.config.pagination.page_length)?;

    let directory = state.directory.read().await;
    Ok(Json(directory.report(kind, &query)?.to_json()))
}

/// HTMX: report table with its totals row, plus pagination
pub async fn htmx_report_list(
    state: axum::extract::State<AppState>,
    Path(report): Path<String>,
    params: Query<HashMap<String, String>>,
) -> Response {
    match render_report(&state, &report, &params).await {
        Ok(html) => Html(html).into_response(),
        Err(error) => {
            log::warn!("Report fragment for '{}' failed: {}", report, error);
            let body = format!(
                "<div class='text-center py-12 text-red-500'>{}</div>",
                escape_html(&error.to_string())
            );
            (error.status(), Html(body)).into_response()
        }
    }
}

async fn render_report(
    state: &AppState,
    report: &str,
    params: &HashMap<String, String>,
) -> Result<String, ApiError> {
    let kind = report_kind(report)?;
    let query = ReportQuery::from_params(params, state.config.pagination.page_length)?;

    let page = {
        let directory = state.directory.read().await;
        directory.report(kind, &query)?
    };

    let mut html = render_table(kind.columns(), &page.rows, Some(&page.totals), &state.config.currency);
    html.push_str(&render_pagination(
        &format!("/reports/{}/list", kind.slug()),
        query.to_params(),
        page.page_state(),
        state.config.pagination.window_delta,
    ));
    Ok(html)
}
