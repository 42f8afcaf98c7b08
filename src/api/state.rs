use std::sync::Arc;

use crate::{
    db::MembershipStore,
    services::{CatalogProvider, SessionVerifier},
};

/// Shared application state
///
/// Every collaborator sits behind a trait object so the router can be built
/// over PostgreSQL/TMDB in production and over in-memory fakes in tests.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub store: Arc<dyn MembershipStore>,
    pub sessions: Arc<dyn SessionVerifier>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        store: Arc<dyn MembershipStore>,
        sessions: Arc<dyn SessionVerifier>,
    ) -> Self {
        Self {
            catalog,
            store,
            sessions,
        }
    }
}
