// glyph-solid/src/layout.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Simple single-line layout: one glyph per character, advance widths, pair kerning.
//!
//! Outlines are emitted in layout space: scaled to the requested size, with Y pointing down, the
//! way typical outline-font libraries hand them out. No shaping is performed.

use pathfinder_geometry::transform2d::Transform2F;
use pathfinder_geometry::vector::Vector2F;

use crate::error::GlyphLoadingError;
use crate::loader::{GlyphSource, Loader};
use crate::outline::{OutlineSink, TransformSink};

/// The glyph drawn for characters the font does not cover.
pub const NOTDEF_GLYPH: u32 = 0;

/// Options that control how a line is laid out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutOptions {
    /// Whether to apply pair kerning from the font.
    pub kerning: bool,
    /// Extra space added between consecutive glyphs, in output units.
    pub letter_spacing: f32,
}

impl Default for LayoutOptions {
    #[inline]
    fn default() -> LayoutOptions {
        LayoutOptions {
            kerning: true,
            letter_spacing: 0.0,
        }
    }
}

/// Lays out one line of text and sends every glyph outline to `sink`.
///
/// `origin` is the left end of the baseline in layout space (Y down). Returns the advance width
/// of the line.
pub fn layout_line<L, S>(
    font: &L,
    line: &str,
    origin: Vector2F,
    size: f32,
    options: &LayoutOptions,
    sink: &mut S,
) -> Result<f32, GlyphLoadingError>
where
    L: Loader,
    S: OutlineSink,
{
    let face = font.face()?;
    let scale = size / font.metrics().units_per_em as f32;
    let glyph_transform = Transform2F::from_scale(Vector2F::new(scale, -scale));
    walk_line(&face, line, scale, options, |glyph_id, pen_x| {
        let transform =
            Transform2F::from_translation(origin + Vector2F::new(pen_x, 0.0)) * glyph_transform;
        face.outline(glyph_id, &mut TransformSink::new(transform, &mut *sink))
    })
}

/// Returns the advance width of a line without emitting any outlines.
pub fn measure_line<L>(
    font: &L,
    line: &str,
    size: f32,
    options: &LayoutOptions,
) -> Result<f32, GlyphLoadingError>
where
    L: Loader,
{
    let face = font.face()?;
    let scale = size / font.metrics().units_per_em as f32;
    walk_line(&face, line, scale, options, |_, _| Ok(()))
}

fn walk_line<G, F>(
    face: &G,
    line: &str,
    scale: f32,
    options: &LayoutOptions,
    mut place: F,
) -> Result<f32, GlyphLoadingError>
where
    G: GlyphSource,
    F: FnMut(u32, f32) -> Result<(), GlyphLoadingError>,
{
    let mut pen_x = 0.0;
    let mut previous = None;
    for character in line.chars() {
        let glyph_id = face.glyph_for_char(character).unwrap_or(NOTDEF_GLYPH);
        if let Some(previous) = previous {
            if options.kerning {
                pen_x += face.kerning(previous, glyph_id) * scale;
            }
            pen_x += options.letter_spacing;
        }
        place(glyph_id, pen_x)?;
        pen_x += face.advance(glyph_id)?.x() * scale;
        previous = Some(glyph_id);
    }
    Ok(pen_x)
}
