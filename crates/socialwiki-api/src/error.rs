use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use socialwiki_types::models::{NewWikiPage, WikiPage};

/// Failure of a wiki page operation, mapped onto the HTTP status the client sees.
#[derive(Debug, Error)]
pub enum PageError {
    /// Malformed or missing input.
    #[error("precondition failed: {0}")]
    Precondition(&'static str),

    /// The username matched no user, or more than one.
    #[error("username does not resolve to exactly one user")]
    UnresolvedAuthor,

    #[error("at least one of title, author or content is required")]
    EmptySearch,

    #[error("page not found")]
    NotFound,

    /// The store refused the page. Carries what we tried to save.
    #[error("page rejected by store: {reason}")]
    Rejected { page: NewWikiPage, reason: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            // Explicit empty result, never a page with default fields.
            PageError::Precondition(_) => {
                (StatusCode::PRECONDITION_FAILED, Json(None::<WikiPage>)).into_response()
            }
            PageError::UnresolvedAuthor | PageError::EmptySearch => {
                StatusCode::UNPROCESSABLE_ENTITY.into_response()
            }
            PageError::NotFound => StatusCode::NOT_FOUND.into_response(),
            PageError::Rejected { page, reason } => {
                warn!("Page '{}' rejected by store: {}", page.title, reason);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(page)).into_response()
            }
            PageError::Internal(e) => {
                error!("Wiki page operation failed: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
