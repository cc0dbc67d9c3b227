//! HTML page handlers.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{error, info};

use cartelera_core::query::{parse_page, BrowseParams};
use cartelera_core::{BrowseRequest, SiteError};

use super::params::{first_value, QueryPairs};
use crate::pages;
use crate::state::AppState;

/// `?page=N`. The first `page` value wins; anything unparsable is page 1.
fn requested_page(query: &QueryPairs) -> u32 {
    parse_page(first_value(query, "page"))
}

/// A site error rendered as an HTML error page.
#[derive(Debug)]
pub struct PageError(pub SiteError);

impl From<SiteError> for PageError {
    fn from(err: SiteError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SiteError::NotFound(url) => {
                info!(url = %url, "Movie not found");
                (StatusCode::NOT_FOUND, pages::NOT_FOUND_MESSAGE.to_string())
            }
            SiteError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            SiteError::Store(_) | SiteError::Timeout { .. } => {
                error!(error = %self.0, "Failed to render page");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    pages::SERVER_ERROR_MESSAGE.to_string(),
                )
            }
        };
        (status, Html(pages::error_page(&message))).into_response()
    }
}

pub async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>, PageError> {
    let view = state.site().render_home().await?;
    Ok(Html(pages::home_page(&view)))
}

pub async fn trending(State(state): State<Arc<AppState>>) -> Result<Html<String>, PageError> {
    let view = state.site().render_trending().await?;
    Ok(Html(pages::trending_page(&view)))
}

/// Unfiltered listing. A `?title=` from the search forms redirects to the
/// filtered path for that title.
pub async fn browse(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> Result<Response, PageError> {
    if let Some(path) = first_value(&query, "title").and_then(BrowseRequest::title_search_path) {
        return Ok(Redirect::to(&path).into_response());
    }

    let request = BrowseRequest::listing(requested_page(&query));
    let view = state.site().render_browse(&request).await?;
    Ok(Html(pages::browse_page(&view)).into_response())
}

pub async fn browse_filtered(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    Path(params): Path<BrowseParams>,
    Query(query): Query<QueryPairs>,
) -> Result<Html<String>, PageError> {
    let request = BrowseRequest::filtered(uri.path(), &params, requested_page(&query))
        .map_err(SiteError::from)?;
    let view = state.site().render_browse(&request).await?;
    Ok(Html(pages::browse_page(&view)))
}

/// Detail page; also serves `/movies/reproductor/{movie_id}`.
pub async fn movie_detail(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let view = state.site().render_movie(&movie_id).await?;
    Ok(Html(pages::movie_page(&view)))
}
