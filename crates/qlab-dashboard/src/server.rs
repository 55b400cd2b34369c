//! Route table and middleware stack.

use std::sync::Arc;

use axum::{
    Router,
    http::header,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::api::{datasets, health, rng};
use crate::state::AppState;

type SharedState = Arc<AppState>;

/// Build the full application: hardware RNG at the root, JSON API under
/// `/api`, and the bundled single-page UI.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/rng/hardware", post(rng::hardware))
        .nest("/api", api())
        .merge(ui())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

fn api() -> Router<SharedState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/datasets", get(datasets::list_datasets))
        .route("/datasets/{slug}", get(datasets::get_dataset))
        .route("/datasets/{slug}/correlation", get(datasets::correlation))
        .route("/rng/simulator", post(rng::simulator))
        .route("/rng/hardware", post(rng::hardware))
}

fn ui() -> Router<SharedState> {
    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route("/app.js", get(|| asset("application/javascript", APP_JS)))
        .route("/style.css", get(|| asset("text/css", STYLE_CSS)))
}

static INDEX: &str = include_str!("../static/index.html");
static APP_JS: &str = include_str!("../static/app.js");
static STYLE_CSS: &str = include_str!("../static/style.css");

async fn index() -> Html<&'static str> {
    Html(INDEX)
}

async fn asset(content_type: &'static str, body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, content_type)], body)
}
