use serde::{Deserialize, Serialize};

pub mod category;
pub mod membership;

pub use category::{CategoryPalette, MovieCategory};
pub use membership::{EnrichedMembership, ListKind, ListMembership, UserId};

/// Catalog identifier of a movie
pub type MovieId = i64;

/// A movie as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    /// ISO calendar date, empty when the catalog has none
    pub release_date: String,
    /// Average rating on a 0-10 scale
    pub vote_average: f64,
}

/// A trailer attached to a movie detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trailer {
    pub id: String,
    /// Video key on the hosting site (e.g. a YouTube id)
    pub key: String,
    pub site: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Movie detail page payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub movie: Movie,
    pub trailers: Vec<Trailer>,
    pub genres: Vec<Genre>,
}

/// What a page of movies is drawn from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieSource {
    Category(MovieCategory),
    Search(String),
}

/// One upstream page, normalized
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub movies: Vec<Movie>,
    pub total_pages: u32,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paged list/search response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
    #[serde(default)]
    pub total_pages: u32,
}

impl From<TmdbPage> for CatalogPage {
    fn from(page: TmdbPage) -> Self {
        Self {
            movies: page.results.into_iter().map(Movie::from).collect(),
            total_pages: page.total_pages,
        }
    }
}

/// Movie as found in list, search and detail responses
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    /// Only present on the detail endpoint
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl From<TmdbMovie> for Movie {
    fn from(movie: TmdbMovie) -> Self {
        Movie {
            id: movie.id,
            title: movie.title,
            overview: movie.overview.unwrap_or_default(),
            poster_path: movie.poster_path.filter(|p| !p.is_empty()),
            release_date: movie.release_date.unwrap_or_default(),
            vote_average: movie.vote_average.clamp(0.0, 10.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideoList {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    pub id: String,
    pub key: String,
    #[serde(rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub site: Option<String>,
}

impl TmdbVideo {
    pub fn is_trailer(&self) -> bool {
        self.video_type == "Trailer"
    }
}

impl From<TmdbVideo> for Trailer {
    fn from(video: TmdbVideo) -> Self {
        Trailer {
            id: video.id,
            key: video.key,
            site: video.site,
        }
    }
}
