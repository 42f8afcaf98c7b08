//! Persistence of list memberships.
//!
//! All three list kinds live in one table tagged by `list_kind`; a unique index on
//! `(user_id, list_kind, movie_id)` keeps at most one record per movie per list.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{ListKind, ListMembership, MovieId},
};

/// Storage for the three personal lists
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MembershipStore: Send + Sync {
    /// Records `movie_id` on the user's list. Adding a movie that is already
    /// present returns the existing record instead of creating a duplicate.
    async fn create(
        &self,
        user_id: &str,
        kind: ListKind,
        movie_id: MovieId,
    ) -> AppResult<ListMembership>;

    /// Removes the matching record; `false` when there was nothing to remove
    async fn delete(&self, user_id: &str, kind: ListKind, movie_id: MovieId) -> AppResult<bool>;

    /// Every record on the user's list
    async fn find(&self, user_id: &str, kind: ListKind) -> AppResult<Vec<ListMembership>>;
}

#[derive(sqlx::FromRow)]
struct MembershipRow {
    id: Uuid,
    user_id: String,
    list_kind: String,
    movie_id: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<MembershipRow> for ListMembership {
    type Error = AppError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        let kind = row
            .list_kind
            .parse::<ListKind>()
            .map_err(AppError::Internal)?;

        Ok(ListMembership {
            id: row.id,
            user_id: row.user_id,
            kind,
            movie_id: row.movie_id,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL-backed membership store
#[derive(Clone)]
pub struct PgMembershipStore {
    pool: PgPool,
}

impl PgMembershipStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MembershipStore for PgMembershipStore {
    async fn create(
        &self,
        user_id: &str,
        kind: ListKind,
        movie_id: MovieId,
    ) -> AppResult<ListMembership> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            INSERT INTO list_memberships (id, user_id, list_kind, movie_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, list_kind, movie_id)
            DO UPDATE SET movie_id = EXCLUDED.movie_id
            RETURNING id, user_id, list_kind, movie_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(kind.as_str())
        .bind(movie_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn delete(&self, user_id: &str, kind: ListKind, movie_id: MovieId) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM list_memberships WHERE user_id = $1 AND list_kind = $2 AND movie_id = $3",
        )
        .bind(user_id)
        .bind(kind.as_str())
        .bind(movie_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, user_id: &str, kind: ListKind) -> AppResult<Vec<ListMembership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT id, user_id, list_kind, movie_id, created_at
            FROM list_memberships
            WHERE user_id = $1 AND list_kind = $2
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ListMembership::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(list_kind: &str) -> MembershipRow {
        MembershipRow {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            list_kind: list_kind.to_string(),
            movie_id: 550,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let membership = ListMembership::try_from(row("watchlist")).unwrap();
        assert_eq!(membership.kind, ListKind::WatchList);
        assert_eq!(membership.movie_id, 550);
    }

    #[test]
    fn test_row_with_unknown_kind_is_rejected() {
        let result = ListMembership::try_from(row("wishlist"));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a disposable PostgreSQL database"]
    async fn test_postgres_round_trip() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let pool = crate::db::create_pool(&url).await.unwrap();
        crate::db::run_migrations(&pool).await.unwrap();
        let store = PgMembershipStore::new(pool);
        let user = format!("test-{}", Uuid::new_v4());

        let first = store.create(&user, ListKind::Favourite, 550).await.unwrap();
        let second = store.create(&user, ListKind::Favourite, 550).await.unwrap();
        assert_eq!(first.id, second.id);

        let found = store.find(&user, ListKind::Favourite).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(store.find(&user, ListKind::Watched).await.unwrap().is_empty());

        assert!(store.delete(&user, ListKind::Favourite, 550).await.unwrap());
        assert!(!store.delete(&user, ListKind::Favourite, 550).await.unwrap());
    }
}
