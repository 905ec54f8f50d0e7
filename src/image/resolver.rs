//! Observable image state for a single product image.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, error};
use serde::Serialize;
use tokio::task::JoinHandle;

use super::cache::ImageCache;
use super::probe::{HttpImageProbe, ImageProbe, ProbeError};
use crate::config::ImageConfig;
use crate::state::Observable;

/// Snapshot of a [`ProductImage`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageState {
    pub image_src: String,
    pub is_loading: bool,
    pub has_error: bool,
}

/// Display state of a product image.
///
/// Starts out showing the placeholder. Each [`load`](ProductImage::load) takes
/// a new request generation; a probe only commits its result if no newer load
/// has started by the time it finishes, so a slow stale probe can never
/// overwrite a newer image.
///
/// Clones share the same state.
#[derive(Clone)]
pub struct ProductImage {
    inner: Arc<Inner>,
}

struct Inner {
    image_src: Observable<String>,
    is_loading: Observable<bool>,
    has_error: Observable<bool>,
    generation: Mutex<u64>,
    probe: Arc<dyn ImageProbe>,
    cache: Arc<ImageCache>,
    placeholder: String,
}

impl ProductImage {
    pub fn new(probe: Arc<dyn ImageProbe>, cache: Arc<ImageCache>, placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();

        Self {
            inner: Arc::new(Inner {
                image_src: Observable::new(placeholder.clone()),
                is_loading: Observable::new(false),
                has_error: Observable::new(false),
                generation: Mutex::new(0),
                probe,
                cache,
                placeholder,
            }),
        }
    }

    /// Build an image backed by an HTTP probe and the process-wide cache
    pub fn from_config(config: &ImageConfig) -> Result<Self, ProbeError> {
        let probe = HttpImageProbe::new(Duration::from_secs(config.probe_timeout_secs))?;
        let cache = ImageCache::init_global(config.cache_capacity, Duration::from_secs(config.cache_ttl_secs));

        Ok(Self::new(Arc::new(probe), cache, config.placeholder_url.clone()))
    }

    /// URL to display: the image itself once it has loaded, else the placeholder
    pub fn image_src(&self) -> &Observable<String> {
        &self.inner.image_src
    }

    /// True while a probe for the latest URL is in flight
    pub fn is_loading(&self) -> &Observable<bool> {
        &self.inner.is_loading
    }

    /// True when the latest URL failed to load
    pub fn has_error(&self) -> &Observable<bool> {
        &self.inner.has_error
    }

    pub fn placeholder(&self) -> &str {
        &self.inner.placeholder
    }

    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.inner.cache
    }

    pub fn snapshot(&self) -> ImageState {
        ImageState {
            image_src: self.inner.image_src.get(),
            is_loading: self.inner.is_loading.get(),
            has_error: self.inner.has_error.get(),
        }
    }

    /// Resolve a new URL.
    ///
    /// An empty or missing URL shows the placeholder right away, and so does a
    /// URL already in the cache (with the URL itself). Anything else is probed;
    /// on failure the placeholder is shown, the error flag is raised and a
    /// diagnostic is logged. Errors are never returned.
    pub async fn load(&self, url: Option<&str>) {
        let url = url.unwrap_or_default();

        let (generation, changes) = {
            let mut generation = self.lock_generation();
            *generation += 1;

            if url.is_empty() {
                let changes = self.stage(&self.inner.placeholder, false);
                drop(generation);
                self.publish(changes);
                return;
            }

            if self.inner.cache.contains(url) {
                let changes = self.stage(url, false);
                drop(generation);
                self.publish(changes);
                return;
            }

            let changes = Changes {
                image_src: false,
                has_error: self.inner.has_error.set_quiet(false),
                is_loading: self.inner.is_loading.set_quiet(true),
            };
            (*generation, changes)
        };
        self.publish(changes);

        let outcome = self.inner.probe.probe(url).await;
        if outcome.is_ok() {
            self.inner.cache.insert(url);
        }

        let changes = {
            let current = self.lock_generation();
            if *current != generation {
                debug!("Discarding stale image probe for {}", url);
                return;
            }

            match outcome {
                Ok(()) => self.stage(url, false),
                Err(e) => {
                    error!("Image failed to load, showing placeholder: {} ({})", url, e);
                    self.stage(&self.inner.placeholder, true)
                }
            }
        };
        self.publish(changes);
    }

    /// Run [`load`](ProductImage::load) in the background
    pub fn spawn_load(&self, url: Option<String>) -> JoinHandle<()> {
        let image = self.clone();
        tokio::spawn(async move { image.load(url.as_deref()).await })
    }

    /// Write a settled state while the generation lock is held. Subscribers
    /// are only told in [`publish`](ProductImage::publish), after the lock is
    /// released, so they may start another load.
    fn stage(&self, src: &str, has_error: bool) -> Changes {
        Changes {
            image_src: self.inner.image_src.set_quiet(src.to_string()),
            has_error: self.inner.has_error.set_quiet(has_error),
            is_loading: self.inner.is_loading.set_quiet(false),
        }
    }

    fn publish(&self, changes: Changes) {
        if changes.image_src {
            self.inner.image_src.notify_current();
        }
        if changes.has_error {
            self.inner.has_error.notify_current();
        }
        if changes.is_loading {
            self.inner.is_loading.notify_current();
        }
    }

    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.inner.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Which observables a state transition changed
#[derive(Clone, Copy, Debug)]
struct Changes {
    image_src: bool,
    has_error: bool,
    is_loading: bool,
}

impl std::fmt::Debug for ProductImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductImage")
            .field("state", &self.snapshot())
            .field("placeholder", &self.inner.placeholder)
            .finish()
    }
}
