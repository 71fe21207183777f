use axum::{
    body::Bytes,
    extract::{Json, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use lens_core::{ImageSource, Lens, LensConfig, LensResults, VisualResultSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lens_api=debug,lens_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LensConfig::from_env();
    tracing::info!("Using search service at {}", config.base_url);

    let app_state = Arc::new(AppState {
        lens: Lens::with_config(config)?,
    });

    let app = Router::new()
        .route("/health", get(health))
        .nest(
            "/v1",
            Router::new()
                .route("/search", post(search))
                .route("/upload", post(upload))
                .layer(middleware::from_fn(auth)),
        )
        .with_state(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "OK"
}

async fn auth(req: Request, next: Next) -> Result<Response, StatusCode> {
    // If API_KEY is not set, allow all requests (for development)
    let Ok(api_key) = std::env::var("API_KEY") else {
        return Ok(next.run(req).await);
    };

    let authorized = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h == format!("Bearer {}", api_key));

    if authorized {
        Ok(next.run(req).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

struct AppState {
    lens: Lens,
}

#[derive(Deserialize)]
struct SearchRequest {
    url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchData {
    text: Option<Vec<String>>,
    visual: Option<VisualResultSet>,
    warning: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    success: bool,
    data: Option<SearchData>,
    error: Option<String>,
}

impl SearchResponse {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Json<SearchResponse> {
    run(&state, ImageSource::from_input(&req.url)).await
}

async fn upload(State(state): State<Arc<AppState>>, body: Bytes) -> Json<SearchResponse> {
    if body.is_empty() {
        return Json(SearchResponse::failure("empty image body".to_string()));
    }
    run(&state, ImageSource::Bytes(body.to_vec())).await
}

async fn run(state: &AppState, source: ImageSource) -> Json<SearchResponse> {
    // Local paths would read files off this host.
    if matches!(source, ImageSource::Path(_)) {
        return Json(SearchResponse::failure("url must be http or https".to_string()));
    }

    match state.lens.upload_image(source).await {
        Ok(results) => Json(summarize(&results)),
        Err(e) => {
            tracing::error!("Upload failed: {}", e);
            Json(SearchResponse::failure(e.to_string()))
        }
    }
}

fn summarize(results: &LensResults) -> SearchResponse {
    let mut warnings = Vec::new();

    let text = results
        .extract_raw_text()
        .map_err(|e| warnings.push(format!("text: {e}")))
        .ok();
    let visual = results
        .extract_visual_results()
        .map_err(|e| warnings.push(format!("visual: {e}")))
        .ok();

    if text.is_none() && visual.is_none() {
        tracing::warn!("Could not interpret results page: {:?}", warnings);
        return SearchResponse::failure(warnings.join("; "));
    }

    SearchResponse {
        success: true,
        data: Some(SearchData {
            text,
            visual,
            warning: (!warnings.is_empty()).then(|| warnings.join("; ")),
        }),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_unreadable_page_fails() {
        let results = LensResults::from_html("<html><body>captcha</body></html>");
        let response = summarize(&results);
        assert!(!response.success);
        assert!(response.error.unwrap().contains("not found"));
    }

    #[test]
    fn test_summarize_keeps_visual_when_text_is_missing() {
        let html = "<script>AF_initDataCallback({key: 'ds:0', hash: '1', data:[null], sideChannel: {}});</script>";
        let response = summarize(&LensResults::from_html(html));
        assert!(response.success);
        let data = response.data.unwrap();
        assert!(data.text.is_none());
        assert_eq!(data.visual, Some(VisualResultSet::default()));
        assert!(data.warning.unwrap().starts_with("text:"));
    }
}
