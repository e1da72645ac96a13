/// Read-through caching for an async computation.
///
/// Checks the optional cache first; on a miss (or a failed cache read) runs the
/// block, queues the result for a background write with the given TTL, and
/// returns it. With no cache configured the block simply runs.
///
/// # Arguments
/// * `$cache`: `Option<&Cache>` to read from and write to.
/// * `$key`: The `CacheKey` for the value.
/// * `$ttl`: Time-to-live for the cached value in seconds.
/// * `$block`: Future yielding `AppResult<T>` computed on a miss.
///
/// # Example
/// ```rust,ignore
/// let movies: AppResult<Vec<Movie>> = cached!(self.cache.as_ref(), CacheKey::Trending, 600, async move {
///     fetch_trending().await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let cache: Option<&$crate::db::Cache> = $cache;
        let key = $key;
        match cache {
            Some(cache) => match cache.get_or_miss(&key).await {
                Some(hit) => Ok(hit),
                None => {
                    let value = $block.await?;
                    cache.set_in_background(&key, &value, $ttl);
                    Ok(value)
                }
            },
            None => $block.await,
        }
    }};
}
