// glyph-solid/src/loader.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Provides a common interface to the API that loads and parses fonts and walks glyph outlines.

use pathfinder_geometry::vector::Vector2F;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::error::{FetchError, FontLoadingError, GlyphLoadingError};
use crate::file_type::FileType;
use crate::handle::Handle;
use crate::metrics::Metrics;
use crate::outline::OutlineSink;

/// Per-glyph queries against one parse of a font.
///
/// Obtained from `Loader::face` and meant to be reused for a whole run of text.
pub trait GlyphSource {
    /// Returns the usual glyph ID for a Unicode character.
    ///
    /// Be careful with this function; typographically correct character-to-glyph mapping must be
    /// done using a *shaper* such as HarfBuzz. This function is only useful for best-effort simple
    /// use cases like "what does character X look like on its own".
    fn glyph_for_char(&self, character: char) -> Option<u32>;

    /// Sends the vector path for a glyph to a sink, in font units with Y pointing up.
    ///
    /// Glyphs without an outline, such as the space, send nothing and succeed.
    fn outline<S>(&self, glyph_id: u32, sink: &mut S) -> Result<(), GlyphLoadingError>
    where
        S: OutlineSink;

    /// Returns the distance from the origin of the glyph with the given ID to the next, in font
    /// units.
    fn advance(&self, glyph_id: u32) -> Result<Vector2F, GlyphLoadingError>;

    /// Returns the horizontal pair adjustment between two glyphs, in font units.
    ///
    /// Returns 0 when the font has no kerning for the pair.
    fn kerning(&self, left_glyph_id: u32, right_glyph_id: u32) -> f32;
}

/// Provides a common interface to the API that loads and parses fonts and walks glyph outlines.
pub trait Loader: Clone + Sized {
    /// A parsed view of the font used for glyph queries.
    type Face<'a>: GlyphSource
    where
        Self: 'a;

    /// Loads a font from raw font data (the contents of a `.ttf`/`.otf`/etc. file).
    ///
    /// If the data represents a collection (`.ttc`/`.otc`/etc.), `font_index` specifies the index
    /// of the font to load from it. If the data represents a single font, pass 0 for `font_index`.
    fn from_bytes(font_data: Arc<Vec<u8>>, font_index: u32) -> Result<Self, FontLoadingError>;

    /// Loads a font from a `.ttf`/`.otf`/etc. file.
    ///
    /// If the file is a collection (`.ttc`/`.otc`/etc.), `font_index` specifies the index of the
    /// font to load from it. If the file represents a single font, pass 0 for `font_index`.
    fn from_file(file: &mut File, font_index: u32) -> Result<Self, FontLoadingError> {
        let mut font_data = vec![];
        file.read_to_end(&mut font_data)?;
        Self::from_bytes(Arc::new(font_data), font_index)
    }

    /// Loads a font from the path to a `.ttf`/`.otf`/etc. file.
    ///
    /// If the file is a collection (`.ttc`/`.otc`/etc.), `font_index` specifies the index of the
    /// font to load from it. If the file represents a single font, pass 0 for `font_index`.
    fn from_path<P>(path: P, font_index: u32) -> Result<Self, FontLoadingError>
    where
        P: AsRef<Path>,
    {
        Loader::from_file(&mut File::open(path)?, font_index)
    }

    /// Loads the font pointed to by a handle.
    ///
    /// Remote handles are rejected with `FetchError::RemoteHandle`.
    fn from_handle(handle: &Handle) -> Result<Self, FontLoadingError> {
        match *handle {
            Handle::Memory {
                ref bytes,
                font_index,
                ..
            } => Self::from_bytes((*bytes).clone(), font_index),
            Handle::Path {
                ref path,
                font_index,
            } => Self::from_path(path, font_index),
            Handle::Url { ref url } => Err(FetchError::RemoteHandle { url: url.clone() }.into()),
        }
    }

    /// Determines whether a blob of raw font data represents a supported font, and, if so, what
    /// type of font it is.
    fn analyze_bytes(font_data: Arc<Vec<u8>>) -> Result<FileType, FontLoadingError>;

    /// Returns the PostScript name of the font. This should be globally unique.
    fn postscript_name(&self) -> Option<String>;

    /// Returns the full name of the font (also known as "display name" on macOS).
    fn full_name(&self) -> String;

    /// Returns the name of the font family.
    fn family_name(&self) -> String;

    /// Parses the font for a batch of glyph queries.
    fn face(&self) -> Result<Self::Face<'_>, GlyphLoadingError>;

    /// Retrieves various metrics that apply to the entire font.
    fn metrics(&self) -> Metrics;

    /// Attempts to return the raw font data (contents of the font file).
    ///
    /// If this font is a member of a collection, this function returns the data for the entire
    /// collection.
    fn copy_font_data(&self) -> Option<Arc<Vec<u8>>>;
}
