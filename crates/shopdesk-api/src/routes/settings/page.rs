//! Settings page rendering - Full page endpoints

use crate::AppState;
use shopdesk_utils::escape_html;

pub async fn page_settings(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let config = &state.config;

    let page_lengths = config
        .page_length_choices()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let loaded = {
        let directory = state.directory.read().await;
        directory
            .loaded_at()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "not loaded".to_string())
    };

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Settings</h2></div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Server</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Host</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Port</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Data</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Data directory</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Last loaded</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Pagination</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Rows per page</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Page length options</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Window width</p><p class='font-medium'>±{}</p></div>
                <div><p class='text-sm text-gray-500'>Suggestions</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Currency</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Decimal places</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Thousands separator</p><p class='font-medium'>"{}"</p></div>
            </div>
        </div>"#,
        escape_html(&config.server.host),
        config.server.port,
        escape_html(&config.data.path.display().to_string()),
        loaded,
        config.pagination.page_length,
        page_lengths,
        config.pagination.window_delta,
        config.pagination.suggest_limit,
        config.currency.decimal_places,
        escape_html(&config.currency.thousands_separator),
    );

    axum::response::Html(crate::page_response(&headers, "Settings", "/settings", &inner_content))
}
