/// Movie catalog provider abstraction
///
/// The catalog is an opaque upstream: providers translate its wire format into
/// `Movie` records and report every failure as `AppError::UpstreamUnavailable`.
use crate::{
    error::AppResult,
    models::{CatalogPage, Movie, MovieDetails, MovieId, MovieSource},
};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

/// Read-only access to a third-party movie catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch one upstream page of a curated list or of search results
    async fn fetch_page(&self, source: &MovieSource, page: u32) -> AppResult<CatalogPage>;

    /// Fetch a single movie by id
    async fn movie(&self, id: MovieId) -> AppResult<Movie>;

    /// Fetch a movie together with its trailers and genres
    async fn movie_details(&self, id: MovieId) -> AppResult<MovieDetails>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
