use crate::open_data::data_loader::OpenDataLoader;
use crate::open_data::error::OpenDataError;
use crate::types::feed::Feed;
use polars::prelude::LazyFrame;
use std::collections::{hash_map::Entry, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Memoizes the per-feed LazyFrame in front of the download/parquet loader,
/// so repeated map interactions within one process never refetch a feed.
pub struct FrameFetcher {
    loader: OpenDataLoader,
    lazyframe_cache: Mutex<HashMap<Feed, LazyFrame>>,
}

impl FrameFetcher {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            loader: OpenDataLoader::new(cache_dir),
            lazyframe_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Gets the LazyFrame for a feed, using the in-process cache if possible.
    pub async fn get_cache_lazyframe(&self, feed: Feed) -> Result<LazyFrame, OpenDataError> {
        // --- Fast path: already memoized ---
        {
            let cache = self.lazyframe_cache.lock().await;
            if let Some(cached_frame) = cache.get(&feed) {
                return Ok(cached_frame.clone());
            }
            // Not in cache, release the lock before loading
        }

        // --- Slow path: load (download on disk-cache miss) outside the lock ---
        let loaded_frame = self.loader.get_frame(feed).await?;

        let mut cache = self.lazyframe_cache.lock().await;
        match cache.entry(feed) {
            Entry::Occupied(entry) => {
                // Someone else loaded it while we were downloading; use theirs.
                Ok(entry.get().clone())
            }
            Entry::Vacant(entry) => {
                entry.insert(loaded_frame.clone());
                Ok(loaded_frame)
            }
        }
    }

    /// Drops the in-process memoization and returns the on-disk cache paths
    /// for the caller to delete.
    pub async fn evict(&self) -> Vec<PathBuf> {
        let mut cache = self.lazyframe_cache.lock().await;
        cache.clear();
        [Feed::Readings, Feed::Gauges]
            .into_iter()
            .map(|feed| self.loader.cache_path(feed))
            .collect()
    }
}
