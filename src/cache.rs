// glyph-solid/src/cache.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A cache of parsed fonts keyed by where they came from.
//!
//! Only successfully parsed fonts are stored. A failed load leaves the cache untouched, so the
//! next request for the same locator tries again from scratch.

use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{FetchError, FontLoadingError};
use crate::fetch::Fetch;
use crate::font::Font;
use crate::handle::{Handle, Locator};
use crate::sniff;

/// Loads fonts through a fetcher and remembers every one that parsed.
pub struct FontCache<F> {
    fetcher: F,
    fonts: Mutex<HashMap<Locator, Font>>,
}

impl<F> FontCache<F>
where
    F: Fetch,
{
    /// Creates an empty cache that retrieves remote fonts with `fetcher`.
    pub fn new(fetcher: F) -> FontCache<F> {
        FontCache {
            fetcher,
            fonts: Mutex::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Returns the font for `handle`, loading and caching it on first use.
    ///
    /// Remote handles are fetched and screened for HTML error pages before parsing. Local and
    /// in-memory handles are parsed directly.
    pub async fn load(&self, handle: &Handle) -> Result<Font, FontLoadingError> {
        let locator = handle.locator();
        if let Some(font) = self.get(&locator) {
            debug!("font cache hit for {}", locator);
            return Ok(font);
        }

        let result = match *handle {
            Handle::Url { ref url } => self.fetch_font(url).await,
            Handle::Path { .. } | Handle::Memory { .. } => Font::from_handle(handle),
        };

        match result {
            Ok(font) => {
                info!("loaded font \"{}\" from {}", font.full_name(), locator);
                self.fonts().insert(locator, font.clone());
                Ok(font)
            }
            Err(error) => {
                warn!("failed to load font from {}: {}", locator, error);
                Err(error)
            }
        }
    }

    /// Returns the cached font for `locator` without loading anything.
    pub fn get(&self, locator: &Locator) -> Option<Font> {
        self.fonts().get(locator).cloned()
    }

    #[inline]
    pub fn contains(&self, locator: &Locator) -> bool {
        self.fonts().contains_key(locator)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fonts().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts().is_empty()
    }

    async fn fetch_font(&self, url: &str) -> Result<Font, FontLoadingError> {
        let fetched = self.fetcher.fetch(url).await?;
        if !fetched.is_success() {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: fetched.status,
            }
            .into());
        }
        let format = sniff::validate_payload(fetched.content_type.as_deref(), &fetched.bytes)?;
        debug!("{} is a {} font", url, format);
        Font::from_bytes(Arc::new(fetched.bytes), 0)
    }

    // Never held across an await.
    fn fonts(&self) -> MutexGuard<'_, HashMap<Locator, Font>> {
        self.fonts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fetch::Fetched;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned {
        status: u16,
        content_type: Option<&'static str>,
        body: &'static [u8],
        calls: AtomicUsize,
    }

    impl Fetch for Canned {
        async fn fetch(&self, _: &str) -> Result<Fetched, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Fetched {
                status: self.status,
                content_type: self.content_type.map(str::to_owned),
                bytes: self.body.to_vec(),
            })
        }
    }

    fn canned(status: u16, content_type: Option<&'static str>, body: &'static [u8]) -> Canned {
        Canned {
            status,
            content_type,
            body,
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn not_found_is_a_status_error() {
        let cache = FontCache::new(canned(404, Some("text/plain"), b"missing"));
        let handle = Handle::from_url("https://fonts.test/missing.ttf");
        match cache.load(&handle).await {
            Err(FontLoadingError::Fetch(FetchError::Status { status: 404, .. })) => {}
            other => panic!("unexpected result: {:?}", other.map(|font| font.full_name())),
        }
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn markup_is_rejected_and_retried() {
        let cache = FontCache::new(canned(200, None, b"<!DOCTYPE html><p>Not found</p>"));
        let handle = Handle::from_url("https://fonts.test/wrong-path.ttf");
        for _ in 0..2 {
            let error = cache.load(&handle).await.err();
            assert!(error.map_or(false, |error| error.is_format()));
        }
        assert_eq!(cache.fetcher().calls.load(Ordering::SeqCst), 2);
        assert!(!cache.contains(&handle.locator()));
    }

    #[tokio::test]
    async fn garbage_memory_is_not_cached() {
        let cache = FontCache::new(canned(200, None, b""));
        let handle = Handle::from_upload("notes.txt", b"plain text".to_vec());
        assert!(cache.load(&handle).await.is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.fetcher().calls.load(Ordering::SeqCst), 0);
    }
}
