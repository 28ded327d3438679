// glyph-solid/src/handle.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Encapsulates the information needed to locate and open a font.
//!
//! This is a URL, the path to the font, or the raw in-memory font data of an uploaded file.
//!
//! To open the font referenced by a handle, use a loader or a `FontCache`.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::FontLoadingError;
use crate::font::Font;
use crate::loader::Loader;

static NEXT_MEMORY_ID: AtomicUsize = AtomicUsize::new(0);

/// The key a font is cached under.
///
/// For remote fonts this is the URL, for files the path, and for in-memory data a synthetic
/// `memory:` key assigned when the handle is created.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locator(String);

impl Locator {
    #[inline]
    pub fn new<S>(locator: S) -> Locator
    where
        S: Into<String>,
    {
        Locator(locator.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encapsulates the information needed to locate and open a font.
#[derive(Debug, Clone)]
pub enum Handle {
    /// A font served over HTTP(S).
    Url {
        /// The URL of the font file.
        url: String,
    },
    /// A font on disk referenced by a path.
    Path {
        /// The path to the font.
        path: PathBuf,
        /// The index of the font, if the path refers to a collection.
        ///
        /// If the path refers to a single font, this value will be 0.
        font_index: u32,
    },
    /// A font in memory, such as a file the user uploaded.
    Memory {
        /// The raw TrueType/OpenType/etc. data that makes up this font.
        bytes: Arc<Vec<u8>>,
        /// The index of the font, if the memory consists of a collection.
        ///
        /// If the memory consists of a single font, this value will be 0.
        font_index: u32,
        /// The synthetic cache key of this blob.
        locator: Locator,
    },
}

impl Handle {
    /// Creates a new handle from a URL.
    #[inline]
    pub fn from_url<S>(url: S) -> Handle
    where
        S: Into<String>,
    {
        Handle::Url { url: url.into() }
    }

    /// Creates a new handle from a path.
    ///
    /// `font_index` specifies the index of the font to choose if the path points to a font
    /// collection. If the path points to a single font file, pass 0.
    #[inline]
    pub fn from_path(path: PathBuf, font_index: u32) -> Handle {
        Handle::Path { path, font_index }
    }

    /// Creates a new handle from raw TTF/OTF/etc. data in memory.
    ///
    /// `font_index` specifies the index of the font to choose if the memory represents a font
    /// collection. If the memory represents a single font file, pass 0.
    ///
    /// Every call yields a distinct locator, even for identical bytes.
    pub fn from_memory(bytes: Arc<Vec<u8>>, font_index: u32) -> Handle {
        let id = NEXT_MEMORY_ID.fetch_add(1, Ordering::Relaxed);
        Handle::Memory {
            bytes,
            font_index,
            locator: Locator(format!("memory:{}", id)),
        }
    }

    /// Creates a handle for a file the user uploaded, remembering its name in the locator.
    pub fn from_upload(name: &str, bytes: Vec<u8>) -> Handle {
        let id = NEXT_MEMORY_ID.fetch_add(1, Ordering::Relaxed);
        Handle::Memory {
            bytes: Arc::new(bytes),
            font_index: 0,
            locator: Locator(format!("memory:{}/{}", id, name)),
        }
    }

    /// Returns the key this handle's font is cached under.
    pub fn locator(&self) -> Locator {
        match *self {
            Handle::Url { ref url } => Locator::new(url.as_str()),
            Handle::Path { ref path, font_index: 0 } => {
                Locator(format!("file:{}", path.display()))
            }
            Handle::Path {
                ref path,
                font_index,
            } => Locator(format!("file:{}#{}", path.display(), font_index)),
            Handle::Memory { ref locator, .. } => locator.clone(),
        }
    }

    /// Returns true if loading this handle requires a network fetch.
    #[inline]
    pub fn is_remote(&self) -> bool {
        matches!(*self, Handle::Url { .. })
    }

    /// A convenience method to load this handle with the default loader, producing a Font.
    ///
    /// URL handles fail here; load them through a `FontCache`.
    #[inline]
    pub fn load(&self) -> Result<Font, FontLoadingError> {
        Font::from_handle(self)
    }
}
