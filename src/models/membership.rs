use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use super::{Movie, MovieId};

/// Opaque user identifier handed out by the identity provider
pub type UserId = String;

/// The three personal lists a user can keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Favourite,
    Watched,
    WatchList,
}

impl ListKind {
    pub const ALL: [ListKind; 3] = [ListKind::Favourite, ListKind::Watched, ListKind::WatchList];

    /// Stored tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Favourite => "favourite",
            ListKind::Watched => "watched",
            ListKind::WatchList => "watchlist",
        }
    }

    /// Path segment the list is served under
    pub fn route(&self) -> &'static str {
        match self {
            ListKind::Favourite => "favourites",
            ListKind::Watched => "watched",
            ListKind::WatchList => "watchlist",
        }
    }
}

impl Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown list kind '{}'", s))
    }
}

/// A movie placed on one of a user's lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListMembership {
    pub id: Uuid,
    pub user_id: UserId,
    pub kind: ListKind,
    pub movie_id: MovieId,
    pub created_at: DateTime<Utc>,
}

impl ListMembership {
    pub fn new(user_id: impl Into<UserId>, kind: ListKind, movie_id: MovieId) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            kind,
            movie_id,
            created_at: Utc::now(),
        }
    }
}

/// List entry joined with its catalog record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedMembership {
    pub movie_id: MovieId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub movie: Movie,
}

impl EnrichedMembership {
    pub fn new(membership: &ListMembership, movie: Movie) -> Self {
        Self {
            movie_id: membership.movie_id,
            created_at: membership.created_at,
            movie,
        }
    }
}
