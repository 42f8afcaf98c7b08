use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{ListKind, MovieId};

use super::ClientResult;

/// Server operations the list synchronisation relies on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListApi: Send + Sync {
    /// Movie ids currently on the list
    async fn fetch_ids(&self, kind: ListKind) -> ClientResult<Vec<MovieId>>;

    async fn add(&self, kind: ListKind, movie_id: MovieId) -> ClientResult<()>;

    async fn remove(&self, kind: ListKind, movie_id: MovieId) -> ClientResult<()>;
}

/// Local copy of the three lists, in the order movies were added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub favourites: Vec<MovieId>,
    pub watched: Vec<MovieId>,
    pub watchlist: Vec<MovieId>,
}

impl ListState {
    pub fn ids(&self, kind: ListKind) -> &[MovieId] {
        match kind {
            ListKind::Favourite => &self.favourites,
            ListKind::Watched => &self.watched,
            ListKind::WatchList => &self.watchlist,
        }
    }

    fn ids_mut(&mut self, kind: ListKind) -> &mut Vec<MovieId> {
        match kind {
            ListKind::Favourite => &mut self.favourites,
            ListKind::Watched => &mut self.watched,
            ListKind::WatchList => &mut self.watchlist,
        }
    }

    pub fn contains(&self, kind: ListKind, movie_id: MovieId) -> bool {
        self.ids(kind).contains(&movie_id)
    }
}

/// Keeps the user's list memberships in step with the server
///
/// Local state changes only after the server acknowledges a write; a failed
/// call leaves it as it was. `reload` replaces everything with the server's view.
pub struct ListSync<A> {
    api: A,
    state: RwLock<ListState>,
}

impl<A: ListApi> ListSync<A> {
    /// Loads all three lists before handing out the synchroniser
    pub async fn load(api: A) -> ClientResult<Self> {
        let sync = Self {
            api,
            state: RwLock::new(ListState::default()),
        };
        sync.reload().await?;
        Ok(sync)
    }

    /// Fetches the three lists concurrently and replaces local state
    ///
    /// If any fetch fails, local state is left untouched.
    pub async fn reload(&self) -> ClientResult<()> {
        let (favourites, watched, watchlist) = tokio::try_join!(
            self.api.fetch_ids(ListKind::Favourite),
            self.api.fetch_ids(ListKind::Watched),
            self.api.fetch_ids(ListKind::WatchList),
        )
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to load lists"))?;

        *self.state.write().await = ListState {
            favourites,
            watched,
            watchlist,
        };
        Ok(())
    }

    pub async fn add(&self, kind: ListKind, movie_id: MovieId) -> ClientResult<()> {
        self.api.add(kind, movie_id).await?;

        let mut state = self.state.write().await;
        let ids = state.ids_mut(kind);
        if !ids.contains(&movie_id) {
            ids.push(movie_id);
        }
        Ok(())
    }

    pub async fn remove(&self, kind: ListKind, movie_id: MovieId) -> ClientResult<()> {
        self.api.remove(kind, movie_id).await?;

        self.state
            .write()
            .await
            .ids_mut(kind)
            .retain(|id| *id != movie_id);
        Ok(())
    }

    /// Adds when absent, removes when present
    pub async fn toggle(&self, kind: ListKind, movie_id: MovieId) -> ClientResult<bool> {
        if self.contains(kind, movie_id).await {
            self.remove(kind, movie_id).await?;
            Ok(false)
        } else {
            self.add(kind, movie_id).await?;
            Ok(true)
        }
    }

    pub async fn contains(&self, kind: ListKind, movie_id: MovieId) -> bool {
        self.state.read().await.contains(kind, movie_id)
    }

    pub async fn ids(&self, kind: ListKind) -> Vec<MovieId> {
        self.state.read().await.ids(kind).to_vec()
    }

    pub async fn snapshot(&self) -> ListState {
        self.state.read().await.clone()
    }
}
