//! Image dimension cache.
//!
//! Content pages emit `width`/`height` attributes for local images so the
//! browser can reserve layout space before the file arrives. Reading
//! dimensions means opening the image header, so results are memoised per
//! source path.
//!
//! Only successful reads are cached. A missing or unreadable file yields
//! `None` and is retried on the next lookup; the caller simply renders the
//! image without dimensions.
//!
//! Uses `Mutex` (not `RefCell`) so the cache is `Sync` and can be filled
//! from rayon's `par_iter` in [`DimensionCache::preload`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

#[derive(Debug)]
pub struct DimensionCache {
    root: PathBuf,
    entries: Mutex<HashMap<String, Dimensions>>,
}

impl DimensionCache {
    /// `root` is the content directory image sources are relative to.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Dimensions of `src`, reading the file on a cache miss.
    pub fn get(&self, src: &str) -> Option<Dimensions> {
        if let Some(hit) = self.cached(src) {
            return Some(hit);
        }
        let path = self.resolve(src)?;
        match image::image_dimensions(&path) {
            Ok((width, height)) => {
                let dims = Dimensions { width, height };
                self.lock().insert(src.to_string(), dims);
                Some(dims)
            }
            Err(err) => {
                debug!(src, error = %err, "could not read image dimensions");
                None
            }
        }
    }

    /// Warm the cache for many sources in parallel. Returns how many are now
    /// cached.
    pub fn preload<S: AsRef<str> + Sync>(&self, sources: &[S]) -> usize {
        sources
            .par_iter()
            .filter_map(|src| self.get(src.as_ref()))
            .count()
    }

    /// Cached dimensions without touching the filesystem.
    pub fn cached(&self, src: &str) -> Option<Dimensions> {
        self.lock().get(src).copied()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Local path for a site-relative source. Remote URLs and data URIs have
    /// no local file.
    fn resolve(&self, src: &str) -> Option<PathBuf> {
        if src.contains("://") || src.starts_with("data:") || src.starts_with("//") {
            return None;
        }
        let relative = Path::new(src.trim_start_matches('/'));
        Some(self.root.join(relative))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Dimensions>> {
        // A panic while holding the lock leaves the map intact; keep using it.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
