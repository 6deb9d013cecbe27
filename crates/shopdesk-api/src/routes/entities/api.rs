//! Entity API endpoints - JSON lists, detail and autocomplete

use crate::{ApiError, AppState};
use axum::extract::{Path, Query};
use axum::Json;
use shopdesk_core::{EntityKind, ListQuery, Record};
use std::collections::HashMap;

/// Parse the `:entity` path segment
pub fn entity_kind(name: &str) -> Result<EntityKind, ApiError> {
    name.parse::<EntityKind>().map_err(|_| {
        ApiError::from(shopdesk_core::CoreError::UnknownEntity {
            name: name.to_string(),
        })
    })
}

/// `{ "<plural>": [...], "total_count", "page", "limit" }`
pub async fn api_entity_list(
    state: axum::extract::State<AppState>,
    Path(entity): Path<String>,
    params: Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let kind = entity_kind(&entity)?;
    let query = ListQuery::from_params(&params, state.config.pagination.page_length)?;

    let directory = state.directory.read().await;
    let page = directory.list(kind, &query)?;
    Ok(Json(page.to_json(kind)))
}

pub async fn api_entity_detail(
    state: axum::extract::State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Json<Record>, ApiError> {
    let kind = entity_kind(&entity)?;
    let directory = state.directory.read().await;
    Ok(Json(directory.record(kind, &id)?))
}

/// Autocomplete: `?q=<text>[&limit=<n>]`
pub async fn api_entity_suggest(
    state: axum::extract::State<AppState>,
    Path(entity): Path<String>,
    params: Query<HashMap<String, String>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let kind = entity_kind(&entity)?;
    let query = params.get("q").map(|s| s.as_str()).unwrap_or("");
    let max = params
        .get("limit")
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(state.config.pagination.suggest_limit);

    let directory = state.directory.read().await;
    Ok(Json(directory.suggest(kind, query, max)?))
}
