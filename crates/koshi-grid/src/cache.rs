//! Image and sprite caches shared by every cell in a frame.
//!
//! Both caches are owned by the grid and handed to renderers by reference.
//!
//! ## Image loading
//!
//! Drawing never waits for an image. A renderer that finds no entry for a
//! URL calls [`ImageCache::request`], paints a placeholder and moves on. The
//! request sits in a queue until a loader picks it up with
//! [`ImageCache::take_requests`]; loaders may run on any thread and report
//! back through an [`ImageCompleter`], which feeds a channel. The grid drains
//! that channel on the UI thread with [`ImageCache::drain_completions`] at
//! the start of a frame and redraws if anything became ready or failed.
//!
//! The cache holds at most [`ImageCache::capacity`] entries. Past that the
//! least recently requested finished entries (ready or failed) are dropped
//! and will be requested again if drawn. Pending entries are never dropped.
//!
//! ```text
//! draw ──request(url)──▶ pending queue ──take_requests──▶ loader thread
//!                                                             │
//! frame start ◀──drain_completions── channel ◀──complete──────┘
//! ```

use std::collections::{HashMap, VecDeque};
use std::f64::consts::PI;

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// A decoded image ready to blit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Load state of one URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageStatus {
    /// Requested; no result yet.
    Pending,
    Ready(LoadedImage),
    /// Load failed. Renderers draw a placeholder.
    Failed(String),
}

/// Result of one load, sent from a loader to the cache.
#[derive(Debug)]
pub struct ImageCompletion {
    pub url: String,
    pub result: Result<LoadedImage, String>,
}

/// Sending half handed to loaders. Cheap to clone, `Send`.
#[derive(Clone, Debug)]
pub struct ImageCompleter {
    tx: Sender<ImageCompletion>,
}

impl ImageCompleter {
    /// Report a finished load. Silently dropped if the cache is gone.
    pub fn complete(&self, url: impl Into<String>, result: Result<LoadedImage, String>) {
        let _ = self.tx.send(ImageCompletion {
            url: url.into(),
            result,
        });
    }
}

/// Default entry limit for [`ImageCache::new`].
pub const DEFAULT_IMAGE_CAPACITY: usize = 512;

#[derive(Default)]
struct ImageCacheState {
    entries: HashMap<String, ImageStatus>,
    requests: VecDeque<String>,
    /// Known URLs, least recently requested first.
    recency: VecDeque<String>,
}

impl ImageCacheState {
    fn touch(&mut self, url: &str) {
        if let Some(pos) = self.recency.iter().position(|u| u == url) {
            self.recency.remove(pos);
        }
        self.recency.push_back(url.to_string());
    }

    fn forget(&mut self, url: &str) -> bool {
        if let Some(pos) = self.recency.iter().position(|u| u == url) {
            self.recency.remove(pos);
        }
        self.entries.remove(url).is_some()
    }

    /// Drop the oldest finished entries until at most `capacity` remain.
    fn trim(&mut self, capacity: usize) {
        while self.entries.len() > capacity {
            let oldest = self
                .recency
                .iter()
                .find(|u| !matches!(self.entries.get(*u), Some(ImageStatus::Pending)))
                .cloned();
            let Some(url) = oldest else { break };
            debug!(url = %url, "image evicted");
            self.forget(&url);
        }
    }
}

type RedrawHook = Box<dyn Fn() + Send + Sync>;

/// URL-keyed image cache with an asynchronous completion queue.
pub struct ImageCache {
    state: Mutex<ImageCacheState>,
    tx: Sender<ImageCompletion>,
    rx: Receiver<ImageCompletion>,
    redraw_hook: Option<RedrawHook>,
    capacity: usize,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ImageCache")
            .field("entries", &state.entries.len())
            .field("queued", &state.requests.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl ImageCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_IMAGE_CAPACITY)
    }

    /// Cache keeping at most `capacity` finished entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = unbounded();
        Self {
            state: Mutex::new(ImageCacheState::default()),
            tx,
            rx,
            redraw_hook: None,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Call `hook` whenever draining completions changed an entry.
    pub fn with_redraw_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.redraw_hook = Some(Box::new(hook));
        self
    }

    /// Handle for loaders to report results.
    pub fn completer(&self) -> ImageCompleter {
        ImageCompleter {
            tx: self.tx.clone(),
        }
    }

    pub fn status(&self, url: &str) -> Option<ImageStatus> {
        self.state.lock().entries.get(url).cloned()
    }

    /// The decoded image, if it has finished loading.
    pub fn get(&self, url: &str) -> Option<LoadedImage> {
        match self.state.lock().entries.get(url) {
            Some(ImageStatus::Ready(img)) => Some(img.clone()),
            _ => None,
        }
    }

    /// Ask for `url` to be loaded. No-op if it's already known.
    ///
    /// Returns the current status so the caller can pick what to paint.
    pub fn request(&self, url: &str) -> ImageStatus {
        let mut state = self.state.lock();
        if let Some(status) = state.entries.get(url).cloned() {
            state.touch(url);
            return status;
        }
        debug!(url, "image requested");
        state.entries.insert(url.to_string(), ImageStatus::Pending);
        state.requests.push_back(url.to_string());
        state.touch(url);
        state.trim(self.capacity);
        ImageStatus::Pending
    }

    /// URLs waiting for a loader, oldest first.
    pub fn take_requests(&self) -> Vec<String> {
        self.state.lock().requests.drain(..).collect()
    }

    /// Apply every queued completion. Returns true if a redraw is needed.
    ///
    /// Must run on the thread that owns the grid.
    pub fn drain_completions(&self) -> bool {
        let mut changed = false;
        {
            let mut state = self.state.lock();
            for completion in self.rx.try_iter() {
                let status = match completion.result {
                    Ok(img) => ImageStatus::Ready(img),
                    Err(reason) => {
                        warn!(url = %completion.url, %reason, "image load failed");
                        ImageStatus::Failed(reason)
                    }
                };
                if !state.entries.contains_key(&completion.url) {
                    state.touch(&completion.url);
                }
                state.entries.insert(completion.url, status);
                changed = true;
            }
            state.trim(self.capacity);
        }
        if changed && let Some(hook) = &self.redraw_hook {
            hook();
        }
        changed
    }

    /// Forget a URL so the next draw requests it again.
    pub fn evict(&self, url: &str) -> bool {
        self.state.lock().forget(url)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Sprites
// ============================================================================

/// A named vector icon.
///
/// `outline` is a closed polygon in a unit square (0,0)–(1,1); backends scale
/// it into the destination rectangle and fill it with the requested color.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub outline: Vec<(f64, f64)>,
}

impl Sprite {
    pub fn new(name: impl Into<String>, outline: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            outline,
        }
    }
}

/// Name of the sprite used when a requested icon is unknown.
pub const FALLBACK_SPRITE: &str = "star";

/// Icon set shared by rating glyphs, checkboxes and placeholders.
#[derive(Clone, Debug)]
pub struct SpriteCache {
    sprites: HashMap<String, Sprite>,
}

impl Default for SpriteCache {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SpriteCache {
    /// An empty cache.
    pub fn empty() -> Self {
        Self {
            sprites: HashMap::new(),
        }
    }

    /// The built-in icon set.
    pub fn builtin() -> Self {
        let mut cache = Self::empty();
        cache.register(Sprite::new("star", star_outline(5, 0.5, 0.2)));
        cache.register(Sprite::new("flame", vec![
            (0.5, 0.0), (0.8, 0.4), (0.75, 0.8), (0.5, 1.0), (0.25, 0.8), (0.2, 0.4),
        ]));
        cache.register(Sprite::new("heart", vec![
            (0.5, 0.25), (0.75, 0.05), (1.0, 0.3), (0.5, 0.95), (0.0, 0.3), (0.25, 0.05),
        ]));
        cache.register(Sprite::new("thumb-up", vec![
            (0.1, 0.45), (0.3, 0.45), (0.55, 0.0), (0.65, 0.1), (0.6, 0.4), (0.95, 0.45),
            (0.85, 1.0), (0.1, 1.0),
        ]));
        cache.register(Sprite::new("check", vec![
            (0.1, 0.5), (0.25, 0.35), (0.42, 0.55), (0.8, 0.15), (0.95, 0.3), (0.42, 0.85),
        ]));
        cache.register(Sprite::new("image", vec![
            (0.0, 0.1), (1.0, 0.1), (1.0, 0.9), (0.0, 0.9),
        ]));
        cache.register(Sprite::new("link", vec![
            (0.1, 0.6), (0.6, 0.1), (0.9, 0.4), (0.4, 0.9),
        ]));
        cache
    }

    /// Add or replace a sprite.
    pub fn register(&mut self, sprite: Sprite) {
        self.sprites.insert(sprite.name.clone(), sprite);
    }

    pub fn get(&self, name: &str) -> Option<&Sprite> {
        self.sprites.get(name)
    }

    /// Look up `name`, falling back to [`FALLBACK_SPRITE`].
    pub fn get_or_fallback(&self, name: &str) -> Option<&Sprite> {
        self.sprites.get(name).or_else(|| {
            debug!(name, "unknown sprite, using fallback");
            self.sprites.get(FALLBACK_SPRITE)
        })
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

/// Regular star polygon centered in the unit square.
fn star_outline(points: usize, outer: f64, inner: f64) -> Vec<(f64, f64)> {
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = PI * i as f64 / points as f64 - PI / 2.0;
            (0.5 + r * angle.cos(), 0.5 + r * angle.sin())
        })
        .collect()
}
