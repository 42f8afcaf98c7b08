use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{
    db::MembershipStore,
    error::AppResult,
    models::{ListKind, ListMembership, MovieId, UserId},
};

/// Membership store held in process memory
///
/// Used by the test suites and for running the API without PostgreSQL.
/// Same semantics as the PostgreSQL store, including idempotent adds.
#[derive(Default)]
pub struct InMemoryMembershipStore {
    lists: RwLock<HashMap<(UserId, ListKind), Vec<ListMembership>>>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn create(
        &self,
        user_id: &str,
        kind: ListKind,
        movie_id: MovieId,
    ) -> AppResult<ListMembership> {
        let mut lists = self.lists.write().await;
        let list = lists.entry((user_id.to_string(), kind)).or_default();

        if let Some(existing) = list.iter().find(|m| m.movie_id == movie_id) {
            return Ok(existing.clone());
        }

        let membership = ListMembership::new(user_id, kind, movie_id);
        list.push(membership.clone());
        Ok(membership)
    }

    async fn delete(&self, user_id: &str, kind: ListKind, movie_id: MovieId) -> AppResult<bool> {
        let mut lists = self.lists.write().await;
        let Some(list) = lists.get_mut(&(user_id.to_string(), kind)) else {
            return Ok(false);
        };

        let before = list.len();
        list.retain(|m| m.movie_id != movie_id);
        Ok(list.len() < before)
    }

    async fn find(&self, user_id: &str, kind: ListKind) -> AppResult<Vec<ListMembership>> {
        let lists = self.lists.read().await;
        Ok(lists
            .get(&(user_id.to_string(), kind))
            .cloned()
            .unwrap_or_default())
    }
}
