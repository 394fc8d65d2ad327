//! Image resolution: cache, remote lookup/fetch, placeholder fallback.
//!
//! [`ImageResolver::resolve`] never fails. The state machine per call:
//!
//! 1. cache probe (cached identifier + decodable cached image);
//! 2. identifier resolution (cached id, manual override, or remote lookup
//!    with weighted candidate scoring), persisted eagerly on success;
//! 3. image fetch with a bounded number of attempts and fixed backoff;
//! 4. synthetic placeholder when everything above came up empty.
//!
//! A game whose image cannot be obtained degrades to a placeholder and the
//! run continues; resolution failures are logged, never propagated.

pub mod cache;
pub mod fetch;
pub mod lookup;

use std::time::Duration;

use image::DynamicImage;

use crate::render::font::TierFont;
use crate::render::placeholder::placeholder_image;
use crate::render::ResolveImage;

use cache::ImageCache;
use fetch::ImageFetch;
use lookup::{override_id, pick_best, GameLookup};

/// Resolves display names to renderable images.
pub struct ImageResolver<L: GameLookup, F: ImageFetch> {
    cache: ImageCache,
    lookup: L,
    fetch: F,
    font: TierFont,
    fetch_attempts: u32,
    retry_delay: Duration,
}

impl<L: GameLookup, F: ImageFetch> ImageResolver<L, F> {
    pub fn new(cache: ImageCache, lookup: L, fetch: F) -> Self {
        ImageResolver {
            cache,
            lookup,
            fetch,
            font: TierFont::load(),
            fetch_attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }

    /// Override the fetch retry schedule (tests use a zero delay).
    pub fn with_retry(mut self, fetch_attempts: u32, retry_delay: Duration) -> Self {
        self.fetch_attempts = fetch_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// Identifier for a name: cached, manually pinned, or searched.
    ///
    /// Fresh resolutions are persisted immediately so a crash later in the
    /// run loses no progress.
    fn resolve_id(&mut self, name: &str) -> Option<u64> {
        if let Some(id) = self.cache.cached_id(name) {
            log::debug!("found {name} in cache: {id}");
            return Some(id);
        }

        if let Some(id) = override_id(name) {
            log::debug!("using pinned id for {name}: {id}");
            self.persist_id(name, id);
            return Some(id);
        }

        log::debug!("searching for: {name}");
        let hits = match self.lookup.search(name) {
            Ok(hits) => hits,
            Err(message) => {
                log::warn!("error searching for {name}: {message}");
                return None;
            }
        };
        if hits.is_empty() {
            log::debug!("no search results found for {name}");
            return None;
        }

        let best = pick_best(name, &hits)?;
        let id = best.id;
        self.persist_id(name, id);
        Some(id)
    }

    fn persist_id(&mut self, name: &str, id: u64) {
        if let Err(error) = self.cache.store_id(name, id) {
            // Losing a cache write is not worth failing the item over.
            log::warn!("failed to persist id cache entry for {name}: {error}");
        }
    }

    /// Fetch, decode and cache the image for an identifier.
    ///
    /// Transient failures (including undecodable payloads) are retried up
    /// to the attempt budget with a fixed synchronous backoff.
    fn fetch_image(&mut self, name: &str, id: u64) -> Option<DynamicImage> {
        for attempt in 1..=self.fetch_attempts {
            match self.fetch.fetch(id) {
                Ok(bytes) => match image::load_from_memory(&bytes) {
                    Ok(decoded) => {
                        if let Err(error) = self.cache.store_image(name, id, &bytes) {
                            log::warn!("failed to cache image for {name}: {error}");
                        }
                        return Some(decoded);
                    }
                    Err(error) => {
                        log::warn!(
                            "fetched bytes for {name} (id: {id}) did not decode: {error}"
                        );
                    }
                },
                Err(message) => {
                    log::warn!(
                        "error downloading image for {name} (id: {id}), attempt {attempt}/{}: {message}",
                        self.fetch_attempts
                    );
                }
            }
            if attempt < self.fetch_attempts {
                std::thread::sleep(self.retry_delay);
            }
        }
        None
    }
}

impl<L: GameLookup, F: ImageFetch> ResolveImage for ImageResolver<L, F> {
    fn resolve(&mut self, name: &str) -> DynamicImage {
        // Warm path: identifier and image both cached and healthy. A
        // corrupt cached file was already deleted by the probe, so falling
        // through re-fetches it.
        if let Some(id) = self.cache.cached_id(name) {
            if let Some(image) = self.cache.load_image(name, id) {
                return image;
            }
        }

        if let Some(id) = self.resolve_id(name) {
            log::debug!("downloading image for {name} (id: {id})");
            if let Some(image) = self.fetch_image(name, id) {
                return image;
            }
        }

        log::info!("creating placeholder for {name}");
        placeholder_image(name, &self.font)
    }
}
