//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::entities: record lists, detail, autocomplete
//! - routes::cart: order/sale summary
//! - routes::reports: aggregate reports with a totals row
//! - routes::settings: configuration display

pub mod error;
pub mod pagination;
pub mod routes;

use axum::{
    http::Uri,
    routing::{get, post},
    Json, Router,
};
use shopdesk_config::Config;
use shopdesk_core::{Directory, EntityKind};
use shopdesk_utils::{escape_html, format_number};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<RwLock<Directory>>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::cart::api_cart_summary;
    use routes::entities::{api_entity_detail, api_entity_list, api_entity_suggest, htmx_entity_list, page_entity};
    use routes::reports::{api_report, htmx_report_list, page_report, page_reports};
    use routes::settings::{api_settings, page_settings};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/reload", post(api_reload))
        .route("/api/settings", get(api_settings))
        .route("/api/cart/summary", post(api_cart_summary))
        .route("/api/reports/:report", get(api_report))
        .route("/api/:entity", get(api_entity_list))
        .route("/api/:entity/suggest", get(api_entity_suggest))
        .route("/api/:entity/:id", get(api_entity_detail))
        // HTMX page routes
        .route("/", get(index_page))
        .route("/settings", get(page_settings))
        .route("/reports", get(page_reports))
        .route("/reports/:report", get(page_report))
        .route("/:entity", get(page_entity))
        // HTMX partial routes
        .route("/:entity/list", get(htmx_entity_list))
        .route("/reports/:report/list", get(htmx_report_list))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound {
        resource: uri.path().to_string(),
    }
}

/// Re-read the data directory
async fn api_reload(state: axum::extract::State<AppState>) -> Json<serde_json::Value> {
    let mut directory = state.directory.write().await;
    match directory.reload().await {
        Ok(summary) => Json(serde_json::json!({
            "success": true,
            "message": format!("Reloaded {} records", summary.total()),
            "counts": summary.counts,
            "skipped": summary.skipped,
        })),
        Err(e) => {
            log::error!("Reload failed: {}", e);
            Json(serde_json::json!({
                "success": false,
                "message": e.to_string(),
            }))
        }
    }
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Shopdesk</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Shopdesk</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    let mut links: Vec<(String, &str)> = vec![("/".to_string(), "Dashboard")];
    links.extend(EntityKind::ALL.iter().map(|k| (format!("/{}", k.plural()), k.title())));
    links.push(("/reports".to_string(), "Reports"));
    links.push(("/settings".to_string(), "Settings"));

    for (path, label) in &links {
        let is_active = if path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path.as_str())
        };
        let active_class = if is_active { "bg-indigo-50 text-indigo-600" } else { "text-gray-600 hover:bg-gray-50" };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'><span>{}</span></a></li>"#,
            path, active_class, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Content only for HTMX requests, full page with sidebar otherwise
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, current_path: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!(
            r#"<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>"#,
            inner_content
        )
    } else {
        base_html(title, &format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path), inner_content))
    }
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Dashboard: record counts per kind
async fn index_page(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let directory = state.directory.read().await;

    let cards: String = directory
        .counts()
        .iter()
        .map(|(kind, count)| {
            format!(
                r#"<a href='/{}' class='bg-white p-4 rounded-xl shadow-sm hover:shadow'><p class='text-sm text-gray-500'>{}</p><p class='text-2xl font-bold'>{}</p></a>"#,
                kind.plural(),
                kind.title(),
                format_number(*count)
            )
        })
        .collect();

    let status = if directory.is_loaded() {
        String::new()
    } else {
        "<div class='mb-4 p-3 rounded-lg bg-yellow-50 text-yellow-700'>No data loaded. Check the data directory in config.yaml.</div>".to_string()
    };

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Dashboard</h2>
            <button hx-post='/api/reload' hx-swap='none' hx-on::after-request='window.location.reload()'
                class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>Reload</button>
        </div>
        {}
        <div class='grid grid-cols-2 md:grid-cols-3 gap-4'>{}</div>"#,
        status, cards
    );

    axum::response::Html(page_response(&headers, "Dashboard", "/", &inner_content))
}

/// Bind and serve until ctrl-c
pub async fn start_server(config: Config, directory: Arc<RwLock<Directory>>) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { directory, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Shopdesk server on http://{}", addr);
    log::info!("Available routes: / (dashboard), /<entity> (lists), /reports, /settings, /api/*");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use shopdesk_loader::JsonRecordSource;
    use tower::ServiceExt;

    async fn app_with_customers(count: usize) -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let customers: Vec<serde_json::Value> = (1..=count)
            .map(|i| {
                serde_json::json!({
                    "id": i,
                    "name": format!("Customer {:02}", i),
                    "mobile": format!("0171100{:04}", i),
                    "due_amount": 100 * i,
                })
            })
            .collect();
        std::fs::write(
            dir.path().join("customers.json"),
            serde_json::to_string(&customers).unwrap(),
        )
        .unwrap();

        let mut directory = Directory::new(Arc::new(JsonRecordSource));
        directory.load(dir.path().to_path_buf()).await.unwrap();

        let state = AppState {
            directory: Arc::new(RwLock::new(directory)),
            config: Config::default(),
        };
        (create_router(state), dir)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = app_with_customers(1).await;
        let (status, body) = get(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_list_json_third_page() {
        let (app, _dir) = app_with_customers(23).await;
        let (status, body) = get(app, "/api/customers?page=3&limit=10").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["customers"].as_array().unwrap().len(), 3);
        assert_eq!(json["total_count"], 23);
        assert_eq!(json["page"], 3);
        assert_eq!(json["limit"], 10);
    }

    #[tokio::test]
    async fn test_list_json_defaults() {
        let (app, _dir) = app_with_customers(23).await;
        let (_, body) = get(app, "/api/customers?page=0&limit=x").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["page"], 1);
        assert_eq!(json["limit"], 10);
        assert_eq!(json["customers"][0]["id"], 1);
    }

    #[tokio::test]
    async fn test_list_search() {
        let (app, _dir) = app_with_customers(23).await;
        let (_, body) = get(app, "/api/customers?search=CUSTOMER%2002").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["total_count"], 1);
    }

    #[tokio::test]
    async fn test_unknown_entity_is_404_json() {
        let (app, _dir) = app_with_customers(1).await;
        let (status, body) = get(app, "/api/widgets").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], "UNKNOWN_ENTITY");
    }

    #[tokio::test]
    async fn test_bad_date_is_400_json() {
        let (app, _dir) = app_with_customers(1).await;
        let (status, body) = get(app, "/api/purchases?start_date=yesterday").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], "INVALID_QUERY");
    }

    #[tokio::test]
    async fn test_detail_and_missing_record() {
        let (app, _dir) = app_with_customers(3).await;
        let (status, body) = get(app.clone(), "/api/customers/2").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Customer 02"));

        let (status, _) = get(app, "/api/customers/42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_suggest() {
        let (app, _dir) = app_with_customers(12).await;
        let (status, body) = get(app, "/api/customers/suggest?q=customer&limit=3").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_fragment_renders_table_and_pagination() {
        let (app, _dir) = app_with_customers(23).await;
        let (status, body) = get(app, "/customers/list?page=2&limit=10").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Customer 11"));
        assert!(body.contains("1,100.00"));
        assert!(body.contains("Showing 11-20 of 23 results"));
        assert!(body.contains("hx-get='/customers/list?page=3&amp;limit=10'"));
        assert_eq!(body.matches("data-role='pagination'").count(), 1);
    }

    #[tokio::test]
    async fn test_list_fragment_no_results() {
        let (app, _dir) = app_with_customers(23).await;
        let (_, body) = get(app, "/customers/list?search=nobody").await;
        assert!(body.contains("No results found"));
        assert!(!body.contains("<button"));
    }

    #[tokio::test]
    async fn test_pages_render() {
        let (app, _dir) = app_with_customers(2).await;
        let (status, body) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<!DOCTYPE html>"));
        assert!(body.contains("href='/customers'"));

        let (status, body) = get(app.clone(), "/customers").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("id='list-content'"));

        let (status, _) = get(app.clone(), "/widgets").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get(app, "/settings").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Rows per page"));
    }

    #[tokio::test]
    async fn test_htmx_request_gets_fragment_only() {
        let (app, _dir) = app_with_customers(2).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/customers")
                    .header("hx-request", "true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!body.contains("<!DOCTYPE html>"));
        assert!(body.contains("id='list-content'"));
    }

    #[tokio::test]
    async fn test_cart_summary() {
        let (app, _dir) = app_with_customers(1).await;
        let (status, body) = post_json(
            app.clone(),
            "/api/cart/summary",
            r#"{"items": [{"product_id": 1, "quantity": 2, "unit_price": "50"}], "advance": "40"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["due_status"], "partial");
        assert_eq!(json["item_count"], 1);
        assert_eq!(json["due"], "60");

        let (status, body) = post_json(
            app.clone(),
            "/api/cart/summary",
            r#"{"items": [{"product_id": 1, "quantity": 1, "unit_price": 5}, {"product_id": 1, "quantity": 1, "unit_price": 5}]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.contains("CART_REJECTED"));

        let (status, _) = post_json(app, "/api/cart/summary", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reload_and_unknown_route() {
        let (app, dir) = app_with_customers(2).await;
        std::fs::write(dir.path().join("suppliers.json"), r#"[{"id": 1, "name": "Akij"}]"#).unwrap();

        let (status, body) = post_json(app.clone(), "/api/reload", "").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["counts"]["suppliers"], 1);

        let (status, _) = get(app, "/api/customers/2/extra").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_fragment_largest_page_number() {
        let (app, _dir) = app_with_customers(23).await;
        let (status, body) = get(app, "/customers/list?page=18446744073709551615").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Showing"));
        assert!(body.contains("of 23 results"));
        assert!(body.contains("hx-get='/customers/list?page=3&amp;limit=10'"));
    }

    #[tokio::test]
    async fn test_cart_summary_amount_too_large() {
        let (app, _dir) = app_with_customers(1).await;
        let (status, body) = post_json(
            app,
            "/api/cart/summary",
            r#"{"items":[{"product_id":1,"quantity":2,"unit_price":"79228162514264337593543950335"}]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], "CART_REJECTED");
    }

    #[tokio::test]
    async fn test_status_filter() {
        let (app, dir) = app_with_customers(1).await;
        std::fs::write(
            dir.path().join("orders.json"),
            r#"[
                {"id": 1, "memo_no": "O-1", "order_date": "2024-03-01", "status": "pending"},
                {"id": 2, "memo_no": "O-2", "order_date": "2024-03-02", "status": "Delivered"},
                {"id": 3, "memo_no": "O-3", "order_date": "2024-03-03", "status": "pending"}
            ]"#,
        )
        .unwrap();
        post_json(app.clone(), "/api/reload", "").await;

        let (_, body) = get(app.clone(), "/api/orders?status=pending").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["total_count"], 2);

        let (_, body) = get(app.clone(), "/api/orders?status=delivered").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["orders"][0]["memo_no"], "O-2");

        let (_, body) = get(app.clone(), "/api/orders?status=all").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["total_count"], 3);

        let (_, body) = get(app, "/orders").await;
        assert!(body.contains("name='status'"));
    }

    #[tokio::test]
    async fn test_reports() {
        let (app, dir) = app_with_customers(3).await;
        std::fs::write(
            dir.path().join("sheets.json"),
            r#"[
                {"id": 1, "sheet_date": "2024-03-01", "expense": 100, "cash": 500, "bank": 0, "order_count": 2, "delivery": 1},
                {"id": 2, "sheet_date": "2024-03-02", "expense": 50, "cash": 300, "bank": 200, "order_count": 1, "delivery": 2}
            ]"#,
        )
        .unwrap();
        post_json(app.clone(), "/api/reload", "").await;

        let (status, body) = get(app.clone(), "/api/reports/branch?limit=1").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["rows"].as_array().unwrap().len(), 1);
        assert_eq!(json["total_count"], 2);
        assert_eq!(json["totals"]["balance"], 850);

        let (status, body) = get(app.clone(), "/reports/branch/list?limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<tfoot>"));
        assert!(body.contains("1,000.00"));
        assert!(body.contains("hx-get='/reports/branch/list?page=2&amp;limit=1'"));

        let (_, body) = get(app.clone(), "/api/reports/customer-dues").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["total_count"], 3);
        assert_eq!(json["totals"]["due_amount"], 600);

        let (status, body) = get(app.clone(), "/api/reports/payroll").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("UNKNOWN_ENTITY"));

        let (status, _) = get(app.clone(), "/api/reports/worker-progress?report_type=hourly").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get(app.clone(), "/reports").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("href='/reports/salary'"));

        let (status, body) = get(app.clone(), "/reports/worker-progress").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("name='report_type'"));

        let (status, _) = get(app, "/reports/payroll").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_settings_json() {
        let (app, _dir) = app_with_customers(1).await;
        let (status, body) = get(app, "/api/settings").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["pagination"]["page_length"], 10);
    }
}
