use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{ListKind, ListMembership, Movie, MovieCategory, MovieDetails, MovieId, MovieSource},
    services::{catalog, lists},
};

use super::{
    extract::{ApiJson, ApiPath, ApiQuery},
    AppState, Session,
};

// Request types

#[derive(Debug, Deserialize)]
pub struct MoviesQuery {
    #[serde(rename = "listType")]
    pub list_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}

impl MoviesQuery {
    /// A non-blank `search` wins over `listType`; a missing or unknown `listType` means Popular
    fn source(&self) -> MovieSource {
        if let Some(query) = self.search.as_deref().map(str::trim) {
            if !query.is_empty() {
                return MovieSource::Search(query.to_string());
            }
        }

        let category = match self.list_type.as_deref().map(str::parse::<MovieCategory>) {
            Some(Ok(category)) => category,
            Some(Err(reason)) => {
                tracing::debug!(reason = %reason, "Falling back to the default list");
                MovieCategory::default()
            }
            None => MovieCategory::default(),
        };
        MovieSource::Category(category)
    }

    /// Leading digits of `page`; anything missing, unreadable or zero is page 1
    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .map(str::trim)
            .and_then(|raw| {
                let end = raw
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(raw.len());
                raw[..end].parse::<u32>().ok()
            })
            .filter(|page| *page > 0)
            .unwrap_or(1)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_enrich")]
    pub enrich: bool,
}

fn default_enrich() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct AddMembershipRequest {
    pub movie_id: Option<MovieId>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// A page of a curated list, or of search results when `search` is given
pub async fn list_movies(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<MoviesQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let source = params.source();
    let page = params.page();
    let movies = catalog::list_movies(state.catalog.as_ref(), &source, page).await?;

    tracing::info!(
        source = ?source,
        page,
        results = movies.len(),
        provider = state.catalog.name(),
        "Movie page served"
    );

    Ok(Json(movies))
}

/// Single-page free-text search
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = catalog::search_movies(state.catalog.as_ref(), &params.query).await?;
    Ok(Json(movies))
}

/// Movie detail page with trailers and genres
pub async fn movie_details(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<MovieId>,
) -> AppResult<Json<MovieDetails>> {
    let details = catalog::movie_details(state.catalog.as_ref(), id).await?;
    Ok(Json(details))
}

/// Every entry on one of the user's lists
///
/// Entries carry their catalog record unless `enrich=false` is passed, in which
/// case the raw membership records are returned.
pub async fn list_memberships(
    State(state): State<AppState>,
    Extension(kind): Extension<ListKind>,
    session: Session,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> AppResult<Response> {
    if !params.enrich {
        let records = lists::memberships(state.store.as_ref(), &session.user_id, kind).await?;
        return Ok(Json(records).into_response());
    }

    let entries = lists::enriched(
        state.store.as_ref(),
        state.catalog.as_ref(),
        &session.user_id,
        kind,
    )
    .await?;

    Ok(Json(entries).into_response())
}

/// Adds the movie named in the path
pub async fn add_membership(
    State(state): State<AppState>,
    Extension(kind): Extension<ListKind>,
    Extension(request_id): Extension<RequestId>,
    session: Session,
    ApiPath(movie_id): ApiPath<MovieId>,
) -> AppResult<(StatusCode, Json<ListMembership>)> {
    tracing::debug!(request_id = %request_id, list = %kind, movie_id, "Add requested");

    let membership = lists::add(state.store.as_ref(), &session.user_id, kind, movie_id).await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

/// Adds the movie named in a `{"movie_id": n}` body
pub async fn add_membership_from_body(
    State(state): State<AppState>,
    Extension(kind): Extension<ListKind>,
    session: Session,
    ApiJson(request): ApiJson<AddMembershipRequest>,
) -> AppResult<(StatusCode, Json<ListMembership>)> {
    let movie_id = request
        .movie_id
        .ok_or_else(|| AppError::InvalidInput("movie_id is required".to_string()))?;

    let membership = lists::add(state.store.as_ref(), &session.user_id, kind, movie_id).await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

/// Removes the movie named in the path
pub async fn remove_membership(
    State(state): State<AppState>,
    Extension(kind): Extension<ListKind>,
    Extension(request_id): Extension<RequestId>,
    session: Session,
    ApiPath(movie_id): ApiPath<MovieId>,
) -> AppResult<StatusCode> {
    tracing::debug!(request_id = %request_id, list = %kind, movie_id, "Remove requested");

    lists::remove(state.store.as_ref(), &session.user_id, kind, movie_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
