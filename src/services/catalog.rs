use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieDetails, MovieId, MovieSource},
    services::providers::CatalogProvider,
};

/// Number of movies served per page of a grid
pub const PAGE_SIZE: usize = 24;

/// Upstream pages read at most per request, starting at the requested page
const MAX_UPSTREAM_PAGES: u32 = 2;

/// Collects a page of `PAGE_SIZE` movies from the catalog
///
/// Upstream pages are read from `page` onward until enough movies are held,
/// the upstream runs out of pages, or `MAX_UPSTREAM_PAGES` have been read.
/// Anything beyond `PAGE_SIZE` is dropped.
pub async fn list_movies(
    provider: &dyn CatalogProvider,
    source: &MovieSource,
    page: u32,
) -> AppResult<Vec<Movie>> {
    let mut movies = Vec::with_capacity(PAGE_SIZE);
    let mut next = page.max(1);
    let mut read = 0;

    loop {
        let batch = provider.fetch_page(source, next).await?;
        movies.extend(batch.movies);
        read += 1;

        if movies.len() >= PAGE_SIZE || read >= MAX_UPSTREAM_PAGES || next >= batch.total_pages {
            break;
        }
        match next.checked_add(1) {
            Some(following) => next = following,
            None => break,
        }
    }

    movies.truncate(PAGE_SIZE);
    Ok(movies)
}

/// Free-text search returning a single upstream page
pub async fn search_movies(provider: &dyn CatalogProvider, query: &str) -> AppResult<Vec<Movie>> {
    let query = validate_query(query)?;
    let page = provider
        .fetch_page(&MovieSource::Search(query.to_string()), 1)
        .await?;

    tracing::info!(
        query = %query,
        results = page.movies.len(),
        provider = provider.name(),
        "Search completed"
    );

    Ok(page.movies)
}

/// Detail page for one movie
pub async fn movie_details(provider: &dyn CatalogProvider, id: MovieId) -> AppResult<MovieDetails> {
    validate_movie_id(id)?;
    provider.movie_details(id).await
}

pub fn validate_query(query: &str) -> AppResult<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

pub fn validate_movie_id(id: MovieId) -> AppResult<()> {
    if id <= 0 {
        return Err(AppError::InvalidInput(format!(
            "Movie id must be a positive integer, got {}",
            id
        )));
    }
    Ok(())
}
