//! Client side of the list and browsing flows.
//!
//! [`MooviesClient`] talks to this service over HTTP. [`ListSync`] keeps a local
//! copy of the user's three lists that only changes after the server
//! acknowledges a write, and [`MovieBrowser`] makes sure only the newest
//! category or search request updates what is shown.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response};
use serde::Deserialize;

use crate::models::{ListKind, ListMembership, Movie, MovieId, MovieSource};

pub mod browser;
pub mod lists;

pub use browser::{Applied, BrowserView, MovieBrowser, MovieFeed};
pub use lists::{ListApi, ListState, ListSync};

/// Errors seen by client code
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the Moovies API
#[derive(Clone)]
pub struct MooviesClient {
    http_client: HttpClient,
    base_url: String,
    session_token: Option<String>,
}

impl MooviesClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_token: None,
        }
    }

    /// Sends `token` as bearer on every request
    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, format!("{}/api/{}", self.base_url, path));

        match &self.session_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> ClientResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };

        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ListApi for MooviesClient {
    async fn fetch_ids(&self, kind: ListKind) -> ClientResult<Vec<MovieId>> {
        let builder = self
            .request(Method::GET, kind.route())
            .query(&[("enrich", "false")]);
        let records: Vec<ListMembership> = Self::send(builder).await?.json().await?;
        Ok(records.into_iter().map(|record| record.movie_id).collect())
    }

    async fn add(&self, kind: ListKind, movie_id: MovieId) -> ClientResult<()> {
        let path = format!("{}/{}", kind.route(), movie_id);
        Self::send(self.request(Method::POST, &path)).await?;
        Ok(())
    }

    async fn remove(&self, kind: ListKind, movie_id: MovieId) -> ClientResult<()> {
        let path = format!("{}/{}", kind.route(), movie_id);
        Self::send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}

#[async_trait]
impl MovieFeed for MooviesClient {
    async fn movies(&self, source: &MovieSource, page: u32) -> ClientResult<Vec<Movie>> {
        let page = page.to_string();
        let params = match source {
            MovieSource::Category(category) => {
                [("listType", category.label()), ("page", page.as_str())]
            }
            MovieSource::Search(query) => [("search", query.as_str()), ("page", page.as_str())],
        };

        let builder = self.request(Method::GET, "movies").query(&params);
        Ok(Self::send(builder).await?.json().await?)
    }
}
