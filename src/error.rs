// glyph-solid/src/error.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Various types of errors that `glyph-solid` can return.

use std::convert::From;
use std::io;
use thiserror::Error;
use ttf_parser::FaceParsingError;

use crate::sniff::{FontFormat, MarkupEvidence};

/// Reasons why a loader might fail to load a font.
#[derive(Debug, Error)]
pub enum FontLoadingError {
    /// The font bytes could not be retrieved.
    #[error("font fetch error: {0}. Please try a different font or upload a .ttf/.otf file")]
    Fetch(#[from] FetchError),

    /// The bytes were retrieved but are not a usable font.
    #[error("font format error: {0}. Please try a different font or upload a .ttf/.otf file")]
    Format(#[from] FormatError),
}

impl FontLoadingError {
    /// Returns true if the font could not be retrieved at all.
    #[inline]
    pub fn is_fetch(&self) -> bool {
        matches!(*self, FontLoadingError::Fetch(_))
    }

    /// Returns true if the bytes arrived but were not a font this crate can read.
    #[inline]
    pub fn is_format(&self) -> bool {
        matches!(*self, FontLoadingError::Format(_))
    }
}

impl From<io::Error> for FontLoadingError {
    fn from(error: io::Error) -> FontLoadingError {
        FontLoadingError::Fetch(FetchError::Io(error))
    }
}

/// Reasons why the raw bytes of a font could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, TLS, timeout, connection reset).
    #[error("could not reach {url}: {reason}")]
    Network { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("{url} answered with HTTP status {status}")]
    Status { url: String, status: u16 },

    /// A disk or similar I/O error occurred while reading the font.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The HTTP client could not be set up.
    #[error("could not create HTTP client: {0}")]
    Client(String),

    /// A remote handle was handed to a synchronous loader.
    ///
    /// Remote fonts must be loaded through a `FontCache`, which owns the fetch.
    #[error("{url} is remote and must be loaded through a font cache")]
    RemoteHandle { url: String },
}

/// Reasons why retrieved bytes are not a usable font.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The payload is an HTML document, typically a 404 page served with status 200.
    #[error(
        "the server returned an HTML page instead of a font file ({0}); the font path is \
         probably wrong"
    )]
    Markup(MarkupEvidence),

    /// The payload was empty.
    #[error("the font file is empty")]
    Empty,

    /// The payload is a font container this crate does not decode.
    #[error("{0} fonts are not supported")]
    Unsupported(FontFormat),

    /// The data was of a format the loader didn't recognize.
    #[error("unknown format")]
    UnknownFormat,

    /// Attempted to load an invalid index in a TrueType or OpenType font collection.
    ///
    /// For example, if a `.ttc` file has 2 fonts in it, and you ask for the 5th one, you'll get
    /// this error.
    #[error("no such font in the collection")]
    NoSuchFontInCollection,

    /// Attempted to load a malformed or corrupted font.
    #[error("corrupt or unsupported font data: {0}")]
    Parse(FaceParsingError),
}

impl From<FaceParsingError> for FormatError {
    fn from(error: FaceParsingError) -> FormatError {
        match error {
            FaceParsingError::FaceIndexOutOfBounds => FormatError::NoSuchFontInCollection,
            FaceParsingError::UnknownMagic => FormatError::UnknownFormat,
            error => FormatError::Parse(error),
        }
    }
}

/// Reasons why a font might fail to load a glyph.
#[derive(PartialEq, Debug, Error)]
pub enum GlyphLoadingError {
    /// The font didn't contain a glyph with that ID.
    #[error("no such glyph: {0}")]
    NoSuchGlyph(u32),

    /// The font data could no longer be parsed.
    #[error("the font data could not be parsed")]
    FaceUnavailable,
}

/// Reasons why text could not be converted into shapes.
#[derive(PartialEq, Debug, Error)]
pub enum ConversionError {
    /// The font size was zero, negative, or not finite.
    #[error("font size must be positive and finite, got {0}")]
    InvalidSize(f32),

    #[error(transparent)]
    Glyph(#[from] GlyphLoadingError),
}

/// Reasons why shapes could not be turned into a solid.
#[derive(PartialEq, Debug, Error)]
pub enum GeometryError {
    /// The cap triangulator rejected a contour set.
    #[error("cap tessellation failed: {0}")]
    Tessellation(String),

    /// An extrusion or sizing parameter was NaN or infinite.
    #[error("parameter `{0}` is not finite")]
    NonFinite(&'static str),

    /// A size parameter was zero or negative.
    #[error("parameter `{0}` must be positive")]
    NonPositive(&'static str),
}

/// Everything that can stop a rebuild from producing a solid.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Font(#[from] FontLoadingError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
