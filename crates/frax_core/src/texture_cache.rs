//! Content-addressed texture cache.
//!
//! Every distinct source id is uploaded at most once while any handle to it
//! is alive. Handles are `Rc<CachedTexture<T>>`; the cache itself only keeps
//! `Weak` references, so dropping the last handle frees the GPU texture and
//! removes the mapping right away. Entries can be pinned to keep them
//! resident with no sprite referencing them (e.g. preloading between scenes).
//!
//! The cache is single-threaded (`Rc` + `RefCell`), which is what makes the
//! unsynchronized insert-on-miss sound.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::backend::TextureLoader;
use crate::error::FraxError;
use crate::geometry::Rect;

type Entries<T> = RefCell<HashMap<String, Weak<CachedTexture<T>>>>;

/// Shared reference to a cached texture.
pub type TextureHandle<T> = Rc<CachedTexture<T>>;

pub struct CachedTexture<T> {
    source_id: String,
    texture: T,
    width: u32,
    height: u32,
    frame_count: u32,
    entries: Weak<Entries<T>>,
}

impl<T> CachedTexture<T> {
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn texture(&self) -> &T {
        &self.texture
    }

    /// Width of one frame in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of one frame in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Pixel region of frame `index` (frames are stacked vertically).
    /// Out-of-range indices wrap.
    pub fn frame_rect(&self, index: u32) -> Rect {
        let index = index % self.frame_count.max(1);
        Rect::new(
            0.0,
            (u64::from(index) * u64::from(self.height)) as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

impl<T> fmt::Debug for CachedTexture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedTexture")
            .field("source_id", &self.source_id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

impl<T> Drop for CachedTexture<T> {
    fn drop(&mut self) {
        let Some(entries) = self.entries.upgrade() else {
            return;
        };
        // A drop triggered while the map is borrowed leaves a dead entry
        // behind; `TextureCache::purge` and the next `acquire` clean it up.
        let Ok(mut entries) = entries.try_borrow_mut() else {
            return;
        };
        let dead = entries
            .get(&self.source_id)
            .is_some_and(|weak| weak.strong_count() == 0);
        if dead {
            entries.remove(&self.source_id);
            log::debug!("Texture '{}' released", self.source_id);
        }
    }
}

pub struct TextureCache<L: TextureLoader> {
    loader: L,
    entries: Rc<Entries<L::Texture>>,
    pinned: HashMap<String, TextureHandle<L::Texture>>,
    load_count: u64,
}

impl<L: TextureLoader> TextureCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            entries: Rc::new(RefCell::new(HashMap::new())),
            pinned: HashMap::new(),
            load_count: 0,
        }
    }

    /// Return the live handle for `source_id`, loading it on a miss.
    ///
    /// A failed load leaves the cache untouched.
    pub fn acquire(&mut self, source_id: &str) -> Result<TextureHandle<L::Texture>, FraxError> {
        if let Some(handle) = self.get(source_id) {
            return Ok(handle);
        }

        let loaded = self.loader.load(source_id)?;
        if loaded.width == 0 || loaded.height == 0 || loaded.frame_count == 0 {
            return Err(FraxError::resource_load(
                source_id,
                format!(
                    "empty image ({}x{}, {} frames)",
                    loaded.width, loaded.height, loaded.frame_count
                ),
            ));
        }

        let handle = Rc::new(CachedTexture {
            source_id: source_id.to_string(),
            texture: loaded.texture,
            width: loaded.width,
            height: loaded.height,
            frame_count: loaded.frame_count,
            entries: Rc::downgrade(&self.entries),
        });
        self.entries
            .borrow_mut()
            .insert(source_id.to_string(), Rc::downgrade(&handle));
        self.load_count += 1;
        log::debug!(
            "Texture '{}' loaded: {}x{} ({} frames)",
            source_id,
            handle.width,
            handle.height,
            handle.frame_count
        );
        Ok(handle)
    }

    /// Live handle for `source_id`, without loading.
    pub fn get(&self, source_id: &str) -> Option<TextureHandle<L::Texture>> {
        self.entries.borrow().get(source_id).and_then(Weak::upgrade)
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.get(source_id).is_some()
    }

    /// Number of live textures.
    pub fn len(&self) -> usize {
        self.entries
            .borrow()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total successful uploads since the cache was created.
    pub fn load_count(&self) -> u64 {
        self.load_count
    }

    /// Outstanding handles for `source_id`, pins included.
    pub fn strong_count(&self, source_id: &str) -> usize {
        self.entries
            .borrow()
            .get(source_id)
            .map_or(0, Weak::strong_count)
    }

    /// Load `source_id` and keep it resident until unpinned.
    pub fn pin(&mut self, source_id: &str) -> Result<TextureHandle<L::Texture>, FraxError> {
        let handle = self.acquire(source_id)?;
        self.pinned
            .insert(source_id.to_string(), Rc::clone(&handle));
        Ok(handle)
    }

    /// Drop the cache's own reference. Returns false if it was not pinned.
    pub fn unpin(&mut self, source_id: &str) -> bool {
        self.pinned.remove(source_id).is_some()
    }

    pub fn unpin_all(&mut self) {
        self.pinned.clear();
    }

    /// Remove entries whose texture is already gone. Returns how many were removed.
    pub fn purge(&mut self) -> usize {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|_, weak| weak.strong_count() > 0);
        before - entries.len()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }
}
