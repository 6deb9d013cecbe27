//! Cart API endpoint

use crate::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use shopdesk_core::{CartSummary, SummaryRequest};

/// Recompute total and due for a list of cart lines
pub async fn api_cart_summary(
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<CartSummary>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest {
        message: e.body_text(),
    })?;

    let summary = request.summarize()?;
    log::debug!(
        "Cart summary: {} lines, total {}, due {}",
        summary.item_count,
        summary.total,
        summary.due
    );
    Ok(Json(summary))
}
