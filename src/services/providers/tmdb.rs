/// The Movie Database (TMDB) v3 provider
///
/// API Flow:
/// 1. Curated lists: /movie/{popular,top_rated,now_playing,upcoming}
/// 2. Search: /search/movie
/// 3. Detail page: /movie/{id} and /movie/{id}/videos, fetched concurrently
use crate::{
    error::{AppError, AppResult},
    models::{
        CatalogPage, Movie, MovieDetails, MovieId, MovieSource, TmdbMovie, TmdbPage, TmdbVideo,
        TmdbVideoList, Trailer,
    },
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const LANGUAGE: &str = "en-US";
const REGION: &str = "US";

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl TmdbCatalog {
    pub fn new(api_key: Option<String>, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: api_key.filter(|key| !key.is_empty()),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::UpstreamUnavailable("TMDB API key is not configured".to_string())
        })
    }

    /// Issues a GET against the API and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let api_key = self.api_key()?;
        let url = format!("{}/{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key)])
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("GET {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamUnavailable(format!(
                "TMDB returned status {} for {}: {}",
                status, path, body
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!(
                "Failed to parse TMDB response for {}: {}",
                path, e
            ))
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbCatalog {
    async fn fetch_page(&self, source: &MovieSource, page: u32) -> AppResult<CatalogPage> {
        let (path, params) = match source {
            MovieSource::Category(category) => (
                category.upstream_path(),
                vec![
                    ("language", LANGUAGE.to_string()),
                    ("region", REGION.to_string()),
                    ("page", page.to_string()),
                ],
            ),
            MovieSource::Search(query) => (
                "search/movie",
                vec![
                    ("query", query.clone()),
                    ("include_adult", "false".to_string()),
                    ("language", LANGUAGE.to_string()),
                    ("page", page.to_string()),
                ],
            ),
        };

        let raw: TmdbPage = self.get_json(path, &params).await?;
        let page_data = CatalogPage::from(raw);

        tracing::debug!(
            path,
            page,
            results = page_data.movies.len(),
            total_pages = page_data.total_pages,
            provider = "tmdb",
            "Catalog page fetched"
        );

        Ok(page_data)
    }

    async fn movie(&self, id: MovieId) -> AppResult<Movie> {
        let raw: TmdbMovie = self.get_json(&format!("movie/{}", id), &[]).await?;
        Ok(raw.into())
    }

    async fn movie_details(&self, id: MovieId) -> AppResult<MovieDetails> {
        let movie_path = format!("movie/{}", id);
        let videos_path = format!("movie/{}/videos", id);

        let (raw, videos) = tokio::try_join!(
            self.get_json::<TmdbMovie>(&movie_path, &[]),
            self.get_json::<TmdbVideoList>(&videos_path, &[]),
        )?;

        let trailers: Vec<Trailer> = videos
            .results
            .into_iter()
            .filter(TmdbVideo::is_trailer)
            .map(Trailer::from)
            .collect();
        let genres = raw.genres.clone();

        tracing::info!(
            movie_id = id,
            trailers = trailers.len(),
            genres = genres.len(),
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(MovieDetails {
            movie: raw.into(),
            trailers,
            genres,
        })
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
