//! Autocomplete search endpoint.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use cartelera_core::{MovieSuggestion, SiteError};

use super::params::{first_value, QueryPairs};
use crate::state::AppState;

const FOUND_MESSAGE: &str = "Resultados de búsqueda encontrados.";
const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor";

/// JSON envelope for the search endpoint.
#[derive(Debug, Serialize)]
pub struct SearchEnvelope {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<MovieSuggestion>>,
    pub message: String,
}

impl SearchEnvelope {
    fn ok(data: Vec<MovieSuggestion>) -> Self {
        Self {
            status: "ok",
            data: Some(data),
            message: FOUND_MESSAGE.to_string(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            data: None,
            message: message.into(),
        }
    }
}

/// `GET /ajax/search?query=...`
pub async fn ajax_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryPairs>,
) -> Response {
    match state.site().search_suggestions(first_value(&params, "query")).await {
        Ok(suggestions) => Json(SearchEnvelope::ok(suggestions)).into_response(),
        Err(SiteError::Validation(message)) => {
            (StatusCode::BAD_REQUEST, Json(SearchEnvelope::error(message))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to search movies");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SearchEnvelope::error(INTERNAL_ERROR_MESSAGE)),
            )
                .into_response()
        }
    }
}
