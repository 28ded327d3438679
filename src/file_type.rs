// glyph-solid/src/file_type.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The type of a font file: either a single font or a TrueType/OpenType collection.

use crate::error::FormatError;
use crate::sniff::FontFormat;

/// The type of a font file: either a single font or a TrueType/OpenType collection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FileType {
    /// The font file represents a single font (`.ttf`, `.otf`)
    Single,
    /// The font file represents a collection of fonts (`.ttc`, `.otc`), with this many members.
    Collection(u32),
}

impl FileType {
    /// Classifies raw font data without parsing any of its tables.
    pub fn of(font_data: &[u8]) -> Result<FileType, FormatError> {
        match FontFormat::detect(font_data) {
            Some(FontFormat::Collection) => ttf_parser::fonts_in_collection(font_data)
                .map(FileType::Collection)
                .ok_or(FormatError::UnknownFormat),
            Some(format) if format.is_supported() => Ok(FileType::Single),
            Some(format) => Err(FormatError::Unsupported(format)),
            None => Err(FormatError::UnknownFormat),
        }
    }
}
