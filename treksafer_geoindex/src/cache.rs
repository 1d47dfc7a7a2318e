use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;

use lru::LruCache;

use crate::layer::PerimeterSet;

/// Loads polygon sets lazily on first use and memoizes them behind a small
/// bounded LRU, as the lifecycle section requires: one mutex around
/// hit/miss/insert, shared by every request-handling task.
pub struct GeoIndex {
    cache: Mutex<LruCache<PathBuf, Arc<PerimeterSet>>>,
}

impl GeoIndex {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(16).unwrap());
        GeoIndex {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Load the perimeter set at `path`, from cache if present. A load
    /// failure is logged once and cached as an empty set so a permanently
    /// missing or corrupt file doesn't retry every request.
    pub fn load(&self, path: &Path) -> Arc<PerimeterSet> {
        let mut cache = self.cache.lock().expect("geo index cache mutex poisoned");
        if let Some(hit) = cache.get(path) {
            return Arc::clone(hit);
        }

        let set = match PerimeterSet::load_zip(path) {
            Ok(set) => Arc::new(set),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "shapefile load failed, serving empty index");
                Arc::new(PerimeterSet::empty())
            }
        };

        cache.put(path.to_path_buf(), Arc::clone(&set));
        set
    }

    pub fn len(&self) -> usize {
        self.cache.lock().expect("geo index cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for GeoIndex {
    fn default() -> Self {
        GeoIndex::new(16)
    }
}
