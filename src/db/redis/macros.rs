/// Read-through caching over [`Cache`](crate::db::Cache).
///
/// Returns the cached value for `$key` when present. Otherwise awaits `$block`,
/// queues its value for a background write with `$ttl` seconds to live, and
/// returns it. A failed cache read is logged and treated as a miss; errors from
/// `$block` are propagated with `?`.
///
/// # Example
/// ```rust,ignore
/// let user: Option<UserId> = cached!(self.cache, CacheKey::Session(token.to_string()), 60, async {
///     self.fetch_session(token).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache.get_from_cache(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, "Cache read failed, falling back to source");
                None
            }
        };
        if let Some(cached) = hit {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
