// glyph-solid/src/loaders/ttf.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A pure-Rust loader that uses `ttf-parser` to read TrueType and OpenType (CFF) outlines.
//!
//! `Font` owns its bytes and re-parses the face on demand. Parsing only validates the table
//! directory, so this is cheap; layout still parses once per line through `FontFace`.

use log::warn;
use pathfinder_geometry::line_segment::LineSegment2F;
use pathfinder_geometry::vector::Vector2F;
use std::fmt::{self, Debug, Formatter};
use std::path::Path;
use std::sync::Arc;
use ttf_parser::gpos::{PairAdjustment, PositioningSubtable};
use ttf_parser::{name_id, Face, GlyphId, Tag};

use crate::error::{FontLoadingError, FormatError, GlyphLoadingError};
use crate::file_type::FileType;
use crate::handle::Handle;
use crate::loader::{GlyphSource, Loader};
use crate::metrics::Metrics;
use crate::outline::OutlineSink;
use crate::sniff::FontFormat;

const KERN_FEATURE: Tag = Tag::from_bytes(b"kern");

/// A loader that parses fonts with `ttf-parser`.
///
/// Cloning is cheap: clones share the same font data.
#[derive(Clone)]
pub struct Font {
    font_data: Arc<Vec<u8>>,
    font_index: u32,
    metrics: Metrics,
    glyph_count: u32,
}

impl Font {
    /// Loads a font from raw font data (the contents of a `.ttf`/`.otf`/etc. file).
    ///
    /// If the data represents a collection (`.ttc`/`.otc`/etc.), `font_index` specifies the index
    /// of the font to load from it. If the data represents a single font, pass 0 for `font_index`.
    pub fn from_bytes(font_data: Arc<Vec<u8>>, font_index: u32) -> Result<Font, FontLoadingError> {
        match FontFormat::detect(&font_data) {
            Some(format) if !format.is_supported() => {
                return Err(FormatError::Unsupported(format).into())
            }
            Some(_) => {}
            None => return Err(FormatError::UnknownFormat.into()),
        }

        let face = Face::parse(&font_data, font_index).map_err(FormatError::from)?;
        let metrics = Metrics::from_face(&face);
        let glyph_count = face.number_of_glyphs() as u32;
        if metrics.units_per_em == 0 {
            return Err(FormatError::UnknownFormat.into());
        }

        Ok(Font {
            font_data,
            font_index,
            metrics,
            glyph_count,
        })
    }

    /// Loads a font from the path to a `.ttf`/`.otf`/etc. file.
    #[inline]
    pub fn from_path<P>(path: P, font_index: u32) -> Result<Font, FontLoadingError>
    where
        P: AsRef<Path>,
    {
        <Font as Loader>::from_path(path, font_index)
    }

    /// Loads the font pointed to by a handle.
    #[inline]
    pub fn from_handle(handle: &Handle) -> Result<Self, FontLoadingError> {
        <Self as Loader>::from_handle(handle)
    }

    /// Determines whether a blob of raw font data represents a supported font, and, if so, what
    /// type of font it is.
    pub fn analyze_bytes(font_data: Arc<Vec<u8>>) -> Result<FileType, FontLoadingError> {
        let file_type = FileType::of(&font_data)?;
        Face::parse(&font_data, 0).map_err(FormatError::from)?;
        Ok(file_type)
    }

    /// The index of this font within its file.
    #[inline]
    pub fn font_index(&self) -> u32 {
        self.font_index
    }

    /// Returns the PostScript name of the font. This should be globally unique.
    pub fn postscript_name(&self) -> Option<String> {
        self.name(name_id::POST_SCRIPT_NAME)
    }

    /// Returns the full name of the font (also known as "display name" on macOS).
    pub fn full_name(&self) -> String {
        self.name(name_id::FULL_NAME)
            .unwrap_or_else(|| self.family_name())
    }

    /// Returns the name of the font family.
    pub fn family_name(&self) -> String {
        self.name(name_id::TYPOGRAPHIC_FAMILY)
            .or_else(|| self.name(name_id::FAMILY))
            .unwrap_or_default()
    }

    /// Parses the font once for a batch of glyph queries.
    pub fn face(&self) -> Result<FontFace<'_>, GlyphLoadingError> {
        let face = self.parse().ok_or(GlyphLoadingError::FaceUnavailable)?;
        Ok(FontFace {
            face,
            glyph_count: self.glyph_count,
        })
    }

    /// Returns the usual glyph ID for a Unicode character.
    pub fn glyph_for_char(&self, character: char) -> Option<u32> {
        self.face().ok()?.glyph_for_char(character)
    }

    /// Sends the vector path for a glyph to a sink, in font units with Y pointing up.
    pub fn outline<S>(&self, glyph_id: u32, sink: &mut S) -> Result<(), GlyphLoadingError>
    where
        S: OutlineSink,
    {
        self.face()?.outline(glyph_id, sink)
    }

    /// Returns the distance from the origin of the glyph with the given ID to the next, in font
    /// units.
    pub fn advance(&self, glyph_id: u32) -> Result<Vector2F, GlyphLoadingError> {
        self.face()?.advance(glyph_id)
    }

    /// Returns the horizontal kerning between two glyphs, preferring `GPOS` over `kern`.
    pub fn kerning(&self, left_glyph_id: u32, right_glyph_id: u32) -> f32 {
        self.face()
            .map_or(0.0, |face| face.kerning(left_glyph_id, right_glyph_id))
    }

    /// Retrieves various metrics that apply to the entire font.
    #[inline]
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Returns the raw font data, shared with this font.
    #[inline]
    pub fn copy_font_data(&self) -> Option<Arc<Vec<u8>>> {
        Some(self.font_data.clone())
    }

    fn parse(&self) -> Option<Face<'_>> {
        match Face::parse(&self.font_data, self.font_index) {
            Ok(face) => Some(face),
            Err(error) => {
                warn!("font data failed to re-parse: {}", error);
                None
            }
        }
    }

    fn name(&self, id: u16) -> Option<String> {
        let face = self.parse()?;
        let name = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == id)
            .find_map(|name| name.to_string());
        name
    }
}

impl Loader for Font {
    type Face<'a> = FontFace<'a>;

    #[inline]
    fn from_bytes(font_data: Arc<Vec<u8>>, font_index: u32) -> Result<Self, FontLoadingError> {
        Font::from_bytes(font_data, font_index)
    }

    #[inline]
    fn analyze_bytes(font_data: Arc<Vec<u8>>) -> Result<FileType, FontLoadingError> {
        Font::analyze_bytes(font_data)
    }

    #[inline]
    fn postscript_name(&self) -> Option<String> {
        self.postscript_name()
    }

    #[inline]
    fn full_name(&self) -> String {
        self.full_name()
    }

    #[inline]
    fn family_name(&self) -> String {
        self.family_name()
    }

    #[inline]
    fn face(&self) -> Result<FontFace<'_>, GlyphLoadingError> {
        self.face()
    }

    #[inline]
    fn metrics(&self) -> Metrics {
        self.metrics()
    }

    #[inline]
    fn copy_font_data(&self) -> Option<Arc<Vec<u8>>> {
        self.copy_font_data()
    }
}

/// One parse of a `Font`, borrowed from its data.
pub struct FontFace<'a> {
    face: Face<'a>,
    glyph_count: u32,
}

impl FontFace<'_> {
    fn glyph_id(&self, glyph_id: u32) -> Result<GlyphId, GlyphLoadingError> {
        if glyph_id >= self.glyph_count {
            return Err(GlyphLoadingError::NoSuchGlyph(glyph_id));
        }
        Ok(GlyphId(glyph_id as u16))
    }

    /// Pair adjustment from the `kern` feature of the `GPOS` table.
    ///
    /// The first pair positioning subtable that covers `left` decides, as in OpenType layout.
    fn gpos_kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        let gpos = self.face.tables().gpos?;
        gpos.features
            .into_iter()
            .filter(|feature| feature.tag == KERN_FEATURE)
            .flat_map(|feature| feature.lookup_indices)
            .filter_map(|index| gpos.lookups.get(index))
            .flat_map(|lookup| lookup.subtables.into_iter::<PositioningSubtable>())
            .find_map(|subtable| match subtable {
                PositioningSubtable::Pair(pair) => pair_kerning(&pair, left, right),
                _ => None,
            })
    }

    /// Pair adjustment from the legacy `kern` table.
    fn kern_table_kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        let kern = self.face.tables().kern?;
        kern.subtables
            .into_iter()
            .filter(|subtable| subtable.horizontal && !subtable.has_cross_stream)
            .find_map(|subtable| subtable.glyphs_kerning(left, right))
    }
}

fn pair_kerning(pair: &PairAdjustment, left: GlyphId, right: GlyphId) -> Option<i16> {
    let index = pair.coverage().get(left)?;
    let (first, _) = match *pair {
        PairAdjustment::Format1 { ref sets, .. } => sets.get(index)?.get(right)?,
        PairAdjustment::Format2 {
            ref classes,
            ref matrix,
            ..
        } => matrix.get((classes.0.get(left), classes.1.get(right)))?,
    };
    Some(first.x_advance)
}

impl GlyphSource for FontFace<'_> {
    fn glyph_for_char(&self, character: char) -> Option<u32> {
        self.face
            .glyph_index(character)
            .map(|glyph_id| glyph_id.0 as u32)
    }

    fn outline<S>(&self, glyph_id: u32, sink: &mut S) -> Result<(), GlyphLoadingError>
    where
        S: OutlineSink,
    {
        let glyph = self.glyph_id(glyph_id)?;
        let mut adapter = OutlineAdapter { sink };
        // `None` means the glyph has no outline, as with the space.
        self.face.outline_glyph(glyph, &mut adapter);
        Ok(())
    }

    fn advance(&self, glyph_id: u32) -> Result<Vector2F, GlyphLoadingError> {
        let glyph = self.glyph_id(glyph_id)?;
        let advance = self.face.glyph_hor_advance(glyph).unwrap_or(0);
        Ok(Vector2F::new(advance as f32, 0.0))
    }

    fn kerning(&self, left_glyph_id: u32, right_glyph_id: u32) -> f32 {
        let (left, right) = match (self.glyph_id(left_glyph_id), self.glyph_id(right_glyph_id)) {
            (Ok(left), Ok(right)) => (left, right),
            _ => return 0.0,
        };
        self.gpos_kerning(left, right)
            .or_else(|| self.kern_table_kerning(left, right))
            .map_or(0.0, |kerning| kerning as f32)
    }
}

impl Debug for Font {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        self.family_name().fmt(fmt)
    }
}

/// Forwards `ttf-parser` outline callbacks to an `OutlineSink`.
struct OutlineAdapter<'a, S> {
    sink: &'a mut S,
}

impl<S> ttf_parser::OutlineBuilder for OutlineAdapter<'_, S>
where
    S: OutlineSink,
{
    fn move_to(&mut self, x: f32, y: f32) {
        self.sink.move_to(Vector2F::new(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.sink.line_to(Vector2F::new(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.sink
            .quadratic_curve_to(Vector2F::new(x1, y1), Vector2F::new(x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.sink.cubic_curve_to(
            LineSegment2F::new(Vector2F::new(x1, y1), Vector2F::new(x2, y2)),
            Vector2F::new(x, y),
        );
    }

    fn close(&mut self) {
        self.sink.close();
    }
}
