use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{CategoryPalette, Movie, MovieCategory, MovieSource};

use super::ClientResult;

/// Source of movie grids
#[async_trait]
pub trait MovieFeed: Send + Sync {
    async fn movies(&self, source: &MovieSource, page: u32) -> ClientResult<Vec<Movie>>;
}

/// What the grid currently shows
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserView {
    pub source: MovieSource,
    pub movies: Vec<Movie>,
}

/// Outcome of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The response was shown
    Current,
    /// A newer selection was made while this one was in flight; its response was dropped
    Stale,
}

/// Category and search browsing with last-request-wins semantics
///
/// Every selection takes a new generation number before its request is sent.
/// A response is shown only if no later selection has been made since, so a
/// slow response can never overwrite a newer one.
pub struct MovieBrowser<F> {
    feed: F,
    palette: CategoryPalette,
    generation: AtomicU64,
    view: RwLock<Option<BrowserView>>,
}

impl<F: MovieFeed> MovieBrowser<F> {
    pub fn new(feed: F, palette: CategoryPalette) -> Self {
        Self {
            feed,
            palette,
            generation: AtomicU64::new(0),
            view: RwLock::new(None),
        }
    }

    pub async fn select_category(&self, category: MovieCategory) -> ClientResult<Applied> {
        self.show(MovieSource::Category(category)).await
    }

    /// Searches by title; a blank query shows the default category instead
    pub async fn search(&self, query: &str) -> ClientResult<Applied> {
        let query = query.trim();
        if query.is_empty() {
            return self.select_category(MovieCategory::default()).await;
        }
        self.show(MovieSource::Search(query.to_string())).await
    }

    async fn show(&self, source: MovieSource) -> ClientResult<Applied> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.feed.movies(&source, 1).await;

        // Compare under the write lock so check and update are atomic
        let mut view = self.view.write().await;
        if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(generation, source = ?source, "Dropping stale response");
            return Ok(Applied::Stale);
        }

        let movies = result?;
        *view = Some(BrowserView { source, movies });
        Ok(Applied::Current)
    }

    pub async fn view(&self) -> Option<BrowserView> {
        self.view.read().await.clone()
    }

    /// Color for the category being shown; `None` for search results or before the first load
    pub async fn accent_color(&self) -> Option<&'static str> {
        match self.view.read().await.as_ref().map(|view| &view.source) {
            Some(MovieSource::Category(category)) => Some(self.palette.color(*category)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            overview: String::new(),
            poster_path: None,
            release_date: String::new(),
            vote_average: 5.0,
        }
    }

    /// Answers immediately, except for Top Rated which waits for `release`
    struct GatedFeed {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl MovieFeed for GatedFeed {
        async fn movies(&self, source: &MovieSource, _page: u32) -> ClientResult<Vec<Movie>> {
            match source {
                MovieSource::Category(MovieCategory::TopRated) => {
                    self.started.notify_one();
                    self.release.notified().await;
                    Ok(vec![movie(238, "The Godfather")])
                }
                MovieSource::Category(MovieCategory::Upcoming) => Ok(vec![movie(1, "Soon")]),
                MovieSource::Search(query) if query == "broken" => Err(ClientError::Status {
                    status: 500,
                    message: "catalog unavailable".to_string(),
                }),
                _ => Ok(vec![movie(550, "Fight Club")]),
            }
        }
    }

    fn browser() -> Arc<MovieBrowser<GatedFeed>> {
        Arc::new(MovieBrowser::new(
            GatedFeed {
                started: Notify::new(),
                release: Notify::new(),
            },
            CategoryPalette::default(),
        ))
    }

    #[tokio::test]
    async fn test_slow_earlier_selection_does_not_overwrite_newer_one() {
        let browser = browser();

        let slow = {
            let browser = browser.clone();
            tokio::spawn(async move { browser.select_category(MovieCategory::TopRated).await })
        };
        browser.feed.started.notified().await;

        let fast = browser.select_category(MovieCategory::Upcoming).await.unwrap();
        assert_eq!(fast, Applied::Current);

        browser.feed.release.notify_one();
        let late = slow.await.unwrap().unwrap();
        assert_eq!(late, Applied::Stale);

        let view = browser.view().await.unwrap();
        assert_eq!(view.source, MovieSource::Category(MovieCategory::Upcoming));
        assert_eq!(view.movies[0].title, "Soon");
        assert_eq!(browser.accent_color().await, Some("violet"));
    }

    #[tokio::test]
    async fn test_failed_selection_keeps_previous_view() {
        let browser = browser();
        browser.select_category(MovieCategory::Popular).await.unwrap();

        assert!(browser.search("broken").await.is_err());

        let view = browser.view().await.unwrap();
        assert_eq!(view.source, MovieSource::Category(MovieCategory::Popular));
        assert_eq!(browser.accent_color().await, Some("grey"));
    }

    #[tokio::test]
    async fn test_search_results_have_no_accent() {
        let browser = browser();
        assert_eq!(browser.accent_color().await, None);

        assert_eq!(browser.search(" fight ").await.unwrap(), Applied::Current);
        let view = browser.view().await.unwrap();
        assert_eq!(view.source, MovieSource::Search("fight".to_string()));
        assert_eq!(browser.accent_color().await, None);
    }

    #[tokio::test]
    async fn test_blank_search_shows_default_category() {
        let browser = browser();
        browser.search("fight").await.unwrap();

        assert_eq!(browser.search("   ").await.unwrap(), Applied::Current);
        let view = browser.view().await.unwrap();
        assert_eq!(view.source, MovieSource::Category(MovieCategory::Popular));
        assert_eq!(browser.accent_color().await, Some("grey"));
    }
}
