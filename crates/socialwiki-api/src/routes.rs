use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{AppState, pages, users};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/createWikiPage", post(pages::create_wiki_page))
        .route("/searchWikiPage", get(pages::search_wiki_page))
        .route("/advancedSearchWikiPage", get(pages::advanced_search_wiki_page))
        .route("/getWikiPage", get(pages::get_wiki_page))
        .route("/createUser", post(users::create_user))
        .route("/login", post(users::login))
        .route("/health", get(health))
        .with_state(state)
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
