//! Liveness and readiness probes

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness report. Catalog sizes are only filled in once the store answers.
#[derive(Debug, Serialize)]
pub struct Readiness {
    pub ready: bool,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<i64>,
}

async fn healthz() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// 200 with catalog sizes when the store answers, 503 otherwise
async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    if let Err(e) = state.db.ping().await {
        tracing::warn!(error = %e, "Readiness check failed");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Readiness {
                ready: false,
                database: "unavailable",
                authors: None,
                books: None,
            }),
        );
    }

    let authors = state.db.authors().count().await.ok();
    let books = state.db.books().count().await.ok();

    (
        StatusCode::OK,
        Json(Readiness {
            ready: true,
            database: "ok",
            authors,
            books,
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
