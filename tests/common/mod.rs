#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Router;
use moovies::{
    api::{create_router, AppState},
    db::InMemoryMembershipStore,
    error::{AppError, AppResult},
    models::{CatalogPage, Genre, Movie, MovieDetails, MovieId, MovieSource, Trailer, UserId},
    services::{CatalogProvider, SessionVerifier},
};

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";

pub fn movie(id: MovieId, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        overview: format!("Overview of {}", title),
        poster_path: Some(format!("/{}.jpg", id)),
        release_date: "1999-10-15".to_string(),
        vote_average: 8.0,
    }
}

/// Catalog with a fixed set of movies that can be switched offline
pub struct FakeCatalog {
    movies: HashMap<MovieId, Movie>,
    offline: AtomicBool,
}

impl FakeCatalog {
    pub fn new() -> Self {
        let movies = [
            movie(550, "Fight Club"),
            movie(13, "Forrest Gump"),
            movie(680, "Pulp Fiction"),
        ]
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

        Self {
            movies,
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::UpstreamUnavailable("fake catalog offline".into()));
        }
        Ok(())
    }

    fn lookup(&self, id: MovieId) -> AppResult<Movie> {
        self.check_online()?;
        self.movies
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::UpstreamUnavailable(format!("no movie {}", id)))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn fetch_page(&self, source: &MovieSource, page: u32) -> AppResult<CatalogPage> {
        self.check_online()?;
        let movies = match source {
            MovieSource::Search(query) => self
                .movies
                .values()
                .filter(|m| m.title.to_lowercase().contains(&query.to_lowercase()))
                .cloned()
                .collect(),
            // 20 movies per upstream page, ids encode the page
            MovieSource::Category(_) => (0..20)
                .map(|i| movie(i64::from(page) * 100 + i, "Listed"))
                .collect(),
        };

        Ok(CatalogPage {
            movies,
            total_pages: 5,
        })
    }

    async fn movie(&self, id: MovieId) -> AppResult<Movie> {
        self.lookup(id)
    }

    async fn movie_details(&self, id: MovieId) -> AppResult<MovieDetails> {
        let movie = self.lookup(id)?;
        Ok(MovieDetails {
            movie,
            trailers: vec![Trailer {
                id: "t1".to_string(),
                key: "SUXWAEX2jlg".to_string(),
                site: Some("YouTube".to_string()),
            }],
            genres: vec![Genre {
                id: 18,
                name: "Drama".to_string(),
            }],
        })
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Sessions keyed by fixed tokens
pub struct FakeSessions {
    users: HashMap<String, UserId>,
}

impl FakeSessions {
    pub fn new() -> Self {
        let users = [(ALICE_TOKEN, "alice"), (BOB_TOKEN, "bob")]
            .into_iter()
            .map(|(token, user)| (token.to_string(), user.to_string()))
            .collect();
        Self { users }
    }
}

#[async_trait::async_trait]
impl SessionVerifier for FakeSessions {
    async fn verify(&self, token: &str) -> AppResult<Option<UserId>> {
        Ok(self.users.get(token).cloned())
    }
}

pub struct TestApp {
    pub router: Router,
    pub catalog: Arc<FakeCatalog>,
    pub store: Arc<InMemoryMembershipStore>,
}

pub fn test_app() -> TestApp {
    let catalog = Arc::new(FakeCatalog::new());
    let store = Arc::new(InMemoryMembershipStore::new());
    let state = AppState::new(catalog.clone(), store.clone(), Arc::new(FakeSessions::new()));

    TestApp {
        router: create_router(state),
        catalog,
        store,
    }
}
