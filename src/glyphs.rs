// glyph-solid/src/glyphs.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Converts text into planar shapes with holes.
//!
//! Each line is laid out in the font's Y-down layout space on its own baseline, every command is
//! mirrored into the scene's Y-up space, and the resulting contours are sorted into solids and
//! holes. Lines are never merged with each other.

use pathfinder_geometry::vector::Vector2F;

use crate::error::ConversionError;
use crate::layout::{self, LayoutOptions};
use crate::loader::Loader;
use crate::outline::{CommandList, OutlineBuilder};
use crate::shape::Shape;
use crate::winding;

// Resolution used only to decide contour roles and directions.
const CLASSIFICATION_CURVE_SEGMENTS: u32 = 8;

/// How lines of different widths line up with each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl Default for TextAlign {
    #[inline]
    fn default() -> TextAlign {
        TextAlign::Left
    }
}

impl TextAlign {
    /// The horizontal shift of a line of width `width` among lines at most `widest` wide.
    pub fn offset(self, width: f32, widest: f32) -> f32 {
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Center => (widest - width) * 0.5,
            TextAlign::Right => widest - width,
        }
    }
}

/// What to render and how to set it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextSpec {
    /// The string to render. `\n` starts a new line.
    pub text: String,
    /// The em size in output units.
    pub size: f32,
    /// Extra space between glyphs, as a fraction of `size`. May be negative.
    pub letter_spacing: f32,
    /// Distance between baselines, as a multiple of `size`.
    pub line_height: f32,
    /// Swaps which contours are treated as holes.
    pub invert_holes: bool,
    pub align: TextAlign,
}

impl Default for TextSpec {
    fn default() -> TextSpec {
        TextSpec {
            text: "Hire me".to_owned(),
            size: 1.0,
            letter_spacing: 0.02,
            line_height: 1.2,
            invert_holes: false,
            align: TextAlign::Left,
        }
    }
}

impl TextSpec {
    /// Creates a spec with default settings for the given text.
    pub fn new<S>(text: S) -> TextSpec
    where
        S: Into<String>,
    {
        TextSpec {
            text: text.into(),
            ..TextSpec::default()
        }
    }

    /// Splits the text into lines. A `\r` before a line break is dropped.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }
}

/// The baseline of line `line_index` in the scene's Y-up space.
#[inline]
pub fn baseline_offset(line_index: usize, size: f32, line_height: f32) -> f32 {
    -(line_index as f32 * size * line_height)
}

/// Converts text into the ordered list of shapes of every line.
///
/// Empty text yields no shapes. Characters the font lacks are drawn with its `.notdef` glyph.
pub fn shapes_for_text<L>(font: &L, spec: &TextSpec) -> Result<Vec<Shape>, ConversionError>
where
    L: Loader,
{
    if spec.text.is_empty() {
        return Ok(vec![]);
    }
    if !(spec.size.is_finite() && spec.size > 0.0) {
        return Err(ConversionError::InvalidSize(spec.size));
    }

    let options = LayoutOptions {
        kerning: true,
        letter_spacing: spec.letter_spacing * spec.size,
    };
    let lines: Vec<&str> = spec.lines().collect();
    let widths = match spec.align {
        TextAlign::Left => vec![0.0; lines.len()],
        _ => lines
            .iter()
            .map(|line| layout::measure_line(font, line, spec.size, &options))
            .collect::<Result<Vec<f32>, _>>()?,
    };
    let widest = widths.iter().cloned().fold(0.0, f32::max);

    let mut shapes = vec![];
    for (line_index, line) in lines.iter().enumerate() {
        let baseline = baseline_offset(line_index, spec.size, spec.line_height);
        let origin = Vector2F::new(spec.align.offset(widths[line_index], widest), -baseline);
        let mut commands = CommandList::new();
        layout::layout_line(font, line, origin, spec.size, &options, &mut commands)?;
        shapes.extend(shapes_from_commands(&commands.flipped_y(), spec.invert_holes));
    }
    Ok(shapes)
}

/// Resolves Y-up path commands into shapes.
pub fn shapes_from_commands(commands: &CommandList, invert_holes: bool) -> Vec<Shape> {
    let mut builder = OutlineBuilder::new();
    commands.copy_to(&mut builder);
    let outline = builder.into_outline();
    let polylines: Vec<Vec<Vector2F>> = outline
        .contours
        .iter()
        .map(|contour| contour.flatten(CLASSIFICATION_CURVE_SEGMENTS))
        .collect();
    let groups = winding::group_contours(&polylines, invert_holes);
    Shape::from_groups(&outline, &polylines, &groups)
}
