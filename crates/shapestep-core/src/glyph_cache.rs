//! Glyph bitmap cache for repeated frames
//!
//! Frame k+1 redraws every glyph of frame k. This cache stores rendered
//! bitmaps keyed by (font, size, glyph id) so each glyph is rasterized once
//! per run. Only successful loads are stored; a failing glyph is retried and
//! fails again the same way, so output is identical with or without cache.
//!
//! The cache is shareable: several rasterizer handles over the same face can
//! point at one [`GlyphCache`].

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::{
    error::Result,
    traits::GlyphRasterizer,
    types::{CodePoint, GlyphBitmap, GlyphId},
};

/// Default number of bitmaps kept
pub const DEFAULT_CAPACITY: usize = 1024;

/// Cache key for rendered glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphCacheKey {
    pub font_id: u64,
    /// Pixel size in 26.6 fixed point
    pub size: i32,
    pub glyph_id: GlyphId,
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate between 0.0 and 1.0
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU store of rendered glyph bitmaps
pub struct GlyphCache {
    entries: Mutex<LruCache<GlyphCacheKey, GlyphBitmap>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl GlyphCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &GlyphCacheKey) -> Option<GlyphBitmap> {
        let found = self.entries.lock().get(key).cloned();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn insert(&self, key: GlyphCacheKey, bitmap: GlyphBitmap) {
        self.entries.lock().put(key, bitmap);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.lock().len(),
        }
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// A rasterizer that answers repeated loads from a [`GlyphCache`]
pub struct CachedRasterizer<R> {
    inner: R,
    cache: Arc<GlyphCache>,
}

impl<R: GlyphRasterizer> CachedRasterizer<R> {
    /// Wrap `inner` with a private cache
    pub fn new(inner: R) -> Self {
        Self::with_shared_cache(inner, Arc::new(GlyphCache::default()))
    }

    /// Wrap `inner`, storing bitmaps in `cache`
    pub fn with_shared_cache(inner: R, cache: Arc<GlyphCache>) -> Self {
        Self { inner, cache }
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn key(&self, glyph_id: GlyphId) -> GlyphCacheKey {
        GlyphCacheKey {
            font_id: self.inner.font_id(),
            size: self.inner.size_26_6(),
            glyph_id,
        }
    }
}

impl<R: GlyphRasterizer> GlyphRasterizer for CachedRasterizer<R> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn font_id(&self) -> u64 {
        self.inner.font_id()
    }

    fn size_26_6(&self) -> i32 {
        self.inner.size_26_6()
    }

    fn char_index(&self, code_point: CodePoint) -> Option<GlyphId> {
        self.inner.char_index(code_point)
    }

    fn load_glyph(&mut self, glyph_id: GlyphId) -> Result<GlyphBitmap> {
        let key = self.key(glyph_id);
        if let Some(bitmap) = self.cache.get(&key) {
            return Ok(bitmap);
        }
        let bitmap = self.inner.load_glyph(glyph_id)?;
        self.cache.insert(key, bitmap.clone());
        Ok(bitmap)
    }
}
