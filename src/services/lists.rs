use futures::future::join_all;

use crate::{
    db::MembershipStore,
    error::{AppError, AppResult},
    models::{EnrichedMembership, ListKind, ListMembership, MovieId},
    services::{catalog::validate_movie_id, providers::CatalogProvider},
};

/// Puts a movie on one of the user's lists
///
/// The movie id is not checked against the catalog.
pub async fn add(
    store: &dyn MembershipStore,
    user_id: &str,
    kind: ListKind,
    movie_id: MovieId,
) -> AppResult<ListMembership> {
    validate_movie_id(movie_id)?;
    let membership = store.create(user_id, kind, movie_id).await?;

    tracing::info!(
        user_id = %user_id,
        list = %kind,
        movie_id,
        "Movie added to list"
    );

    Ok(membership)
}

/// Takes a movie off one of the user's lists
pub async fn remove(
    store: &dyn MembershipStore,
    user_id: &str,
    kind: ListKind,
    movie_id: MovieId,
) -> AppResult<()> {
    validate_movie_id(movie_id)?;

    if !store.delete(user_id, kind, movie_id).await? {
        return Err(AppError::NotFound(format!(
            "Movie {} is not on the {} list",
            movie_id, kind
        )));
    }

    tracing::info!(
        user_id = %user_id,
        list = %kind,
        movie_id,
        "Movie removed from list"
    );

    Ok(())
}

/// Raw list records, without catalog data
pub async fn memberships(
    store: &dyn MembershipStore,
    user_id: &str,
    kind: ListKind,
) -> AppResult<Vec<ListMembership>> {
    store.find(user_id, kind).await
}

/// List records joined with their catalog entries
///
/// Catalog lookups run concurrently. An entry whose lookup fails is left out of
/// the result; the stored record is untouched and reappears once the catalog
/// answers again.
pub async fn enriched(
    store: &dyn MembershipStore,
    catalog: &dyn CatalogProvider,
    user_id: &str,
    kind: ListKind,
) -> AppResult<Vec<EnrichedMembership>> {
    let records = store.find(user_id, kind).await?;
    let lookups = records.iter().map(|record| catalog.movie(record.movie_id));
    let movies = join_all(lookups).await;

    let mut entries = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for (record, movie) in records.iter().zip(movies) {
        match movie {
            Ok(movie) => entries.push(EnrichedMembership::new(record, movie)),
            Err(e) => {
                dropped += 1;
                tracing::warn!(
                    error = %e,
                    movie_id = record.movie_id,
                    list = %kind,
                    "Catalog lookup failed, omitting list entry"
                );
            }
        }
    }

    if dropped > 0 {
        tracing::warn!(
            returned = entries.len(),
            dropped,
            provider = catalog.name(),
            "Partial list enrichment"
        );
    }

    Ok(entries)
}
