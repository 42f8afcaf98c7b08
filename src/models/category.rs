use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Curated movie lists offered by the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovieCategory {
    #[default]
    #[serde(rename = "Popular")]
    Popular,
    #[serde(rename = "Top Rated")]
    TopRated,
    #[serde(rename = "Now Playing")]
    NowPlaying,
    #[serde(rename = "Upcoming")]
    Upcoming,
}

impl MovieCategory {
    pub const ALL: [MovieCategory; 4] = [
        MovieCategory::Popular,
        MovieCategory::TopRated,
        MovieCategory::NowPlaying,
        MovieCategory::Upcoming,
    ];

    /// Name used in the `listType` query parameter
    pub fn label(&self) -> &'static str {
        match self {
            MovieCategory::Popular => "Popular",
            MovieCategory::TopRated => "Top Rated",
            MovieCategory::NowPlaying => "Now Playing",
            MovieCategory::Upcoming => "Upcoming",
        }
    }

    /// Path of the TMDB list endpoint
    pub fn upstream_path(&self) -> &'static str {
        match self {
            MovieCategory::Popular => "movie/popular",
            MovieCategory::TopRated => "movie/top_rated",
            MovieCategory::NowPlaying => "movie/now_playing",
            MovieCategory::Upcoming => "movie/upcoming",
        }
    }
}

impl Display for MovieCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for MovieCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MovieCategory::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown list type '{}'", s))
    }
}

/// Accent color per category, handed to whoever renders the category switcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPalette {
    colors: [&'static str; 4],
}

impl CategoryPalette {
    /// Colors in `MovieCategory::ALL` order
    pub const fn new(colors: [&'static str; 4]) -> Self {
        Self { colors }
    }

    pub fn color(&self, category: MovieCategory) -> &'static str {
        let index = match category {
            MovieCategory::Popular => 0,
            MovieCategory::TopRated => 1,
            MovieCategory::NowPlaying => 2,
            MovieCategory::Upcoming => 3,
        };
        self.colors[index]
    }
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self::new(["grey", "red", "blue", "violet"])
    }
}
