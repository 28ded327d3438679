// glyph-solid/src/sniff.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Cheap checks that tell a font payload apart from an error page before parsing it.
//!
//! Static hosts commonly answer a missing file with an HTML page and status 200. Handing that
//! page to the font parser yields an opaque parse failure, so the payload is inspected first:
//! the declared content type, then the leading bytes.

use byteorder::{BigEndian, ByteOrder};
use std::fmt::{self, Display, Formatter};

use crate::error::FormatError;

const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];

const SFNT_VERSION_TRUETYPE: u32 = 0x0001_0000;
const SFNT_VERSION_OPENTYPE: u32 = 0x4f54_544f; // OTTO
const SFNT_VERSION_APPLE: u32 = 0x7472_7565; // true
const SFNT_VERSION_TYPE1: u32 = 0x7479_7031; // typ1
const TTC_TAG: u32 = 0x7474_6366; // ttcf
const WOFF_SIGNATURE: u32 = 0x774f_4646; // wOFF
const WOFF2_SIGNATURE: u32 = 0x774f_4632; // wOF2

// Lower-cased; the leading bytes are folded to ASCII lowercase before comparison.
const MARKUP_SIGNATURES: [u32; 5] = [
    0x3c21_646f, // <!do
    0x3c68_746d, // <htm
    0x3c3f_786d, // <?xm
    0x3c68_6561, // <hea
    0x3c62_6f64, // <bod
];

const MARKUP_CONTENT_TYPES: [&str; 2] = ["text/html", "application/xhtml+xml"];

/// The container format of a font file, as identified by its leading four bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFormat {
    /// A single TrueType-flavored SFNT (`.ttf`).
    TrueType,
    /// A single CFF-flavored SFNT (`.otf`).
    OpenType,
    /// A TrueType or OpenType collection (`.ttc`/`.otc`).
    Collection,
    /// WOFF 1.0.
    Woff,
    /// WOFF 2.0.
    Woff2,
}

impl FontFormat {
    /// Identifies the container format from the first bytes of a file.
    pub fn detect(bytes: &[u8]) -> Option<FontFormat> {
        if bytes.len() < 4 {
            return None;
        }
        match BigEndian::read_u32(bytes) {
            SFNT_VERSION_TRUETYPE | SFNT_VERSION_APPLE => Some(FontFormat::TrueType),
            SFNT_VERSION_OPENTYPE | SFNT_VERSION_TYPE1 => Some(FontFormat::OpenType),
            TTC_TAG => Some(FontFormat::Collection),
            WOFF_SIGNATURE => Some(FontFormat::Woff),
            WOFF2_SIGNATURE => Some(FontFormat::Woff2),
            _ => None,
        }
    }

    /// Returns true if the outline parser can read this format directly.
    #[inline]
    pub fn is_supported(self) -> bool {
        !matches!(self, FontFormat::Woff | FontFormat::Woff2)
    }
}

impl Display for FontFormat {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match *self {
            FontFormat::TrueType => "TrueType",
            FontFormat::OpenType => "OpenType",
            FontFormat::Collection => "font collection",
            FontFormat::Woff => "WOFF",
            FontFormat::Woff2 => "WOFF2",
        };
        f.write_str(name)
    }
}

/// What gave a markup payload away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupEvidence {
    /// The response declared a markup content type.
    ContentType(String),
    /// The payload starts like an HTML or XML document.
    Signature,
}

impl Display for MarkupEvidence {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            MarkupEvidence::ContentType(ref content_type) => {
                write!(f, "content type `{}`", content_type)
            }
            MarkupEvidence::Signature => f.write_str("payload starts with markup"),
        }
    }
}

/// Rejects a declared content type that names a markup document.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), FormatError> {
    let content_type = match content_type {
        Some(content_type) => content_type,
        None => return Ok(()),
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    if MARKUP_CONTENT_TYPES.contains(&essence.as_str()) {
        return Err(FormatError::Markup(MarkupEvidence::ContentType(
            content_type.to_owned(),
        )));
    }
    Ok(())
}

/// Returns true if the payload looks like the start of an HTML or XML document.
///
/// This is a best-effort check: a byte-order mark and leading whitespace are skipped, and only
/// the first four bytes after them are examined.
pub fn sniff_markup(bytes: &[u8]) -> bool {
    let mut bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    while let Some((first, rest)) = bytes.split_first() {
        if !first.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    if bytes.len() < 4 {
        return false;
    }
    let mut head = [0; 4];
    head.copy_from_slice(&bytes[..4]);
    head.make_ascii_lowercase();
    MARKUP_SIGNATURES.contains(&BigEndian::read_u32(&head))
}

/// Runs every check on a fetched payload, in order: declared content type, emptiness, leading
/// markup, then container format.
pub fn validate_payload(content_type: Option<&str>, bytes: &[u8]) -> Result<FontFormat, FormatError> {
    check_content_type(content_type)?;
    if bytes.is_empty() {
        return Err(FormatError::Empty);
    }
    if sniff_markup(bytes) {
        return Err(FormatError::Markup(MarkupEvidence::Signature));
    }
    match FontFormat::detect(bytes) {
        Some(format) if format.is_supported() => Ok(format),
        Some(format) => Err(FormatError::Unsupported(format)),
        None => Err(FormatError::UnknownFormat),
    }
}
