// glyph-solid/src/shape.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Closed planar regions: an outer contour minus its holes.

use pathfinder_geometry::rect::RectF;
use pathfinder_geometry::vector::Vector2F;

use crate::outline::{Contour, Outline};
use crate::winding::{self, ContourGroup};

/// Whether a contour adds material or removes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContourRole {
    Solid,
    Hole,
}

/// A filled region in the XY plane with Y pointing up.
///
/// The outline runs counterclockwise and every hole clockwise.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub outline: Contour,
    pub holes: Vec<Contour>,
}

impl Shape {
    /// Builds shapes from the contours of an outline.
    ///
    /// `polylines` must be the flattened contours of `outline`, in the same order; they decide
    /// roles and directions.
    pub fn from_groups(
        outline: &Outline,
        polylines: &[Vec<Vector2F>],
        groups: &[ContourGroup],
    ) -> Vec<Shape> {
        let oriented = |index: usize, counterclockwise: bool| {
            let contour = &outline.contours[index];
            if (winding::signed_area(&polylines[index]) > 0.0) == counterclockwise {
                contour.clone()
            } else {
                contour.reversed()
            }
        };
        groups
            .iter()
            .map(|group| Shape {
                outline: oriented(group.outer, true),
                holes: group
                    .holes
                    .iter()
                    .map(|&hole| oriented(hole, false))
                    .collect(),
            })
            .collect()
    }

    /// The number of contours, outline included.
    #[inline]
    pub fn contour_count(&self) -> usize {
        1 + self.holes.len()
    }

    /// Iterates over every contour with its role.
    pub fn contours(&self) -> impl Iterator<Item = (ContourRole, &Contour)> {
        Some((ContourRole::Solid, &self.outline))
            .into_iter()
            .chain(self.holes.iter().map(|hole| (ContourRole::Hole, hole)))
    }

    #[inline]
    pub fn bounds(&self) -> Option<RectF> {
        self.outline.bounds()
    }

    /// Flattens the outline and holes, enforcing their directions.
    pub fn flatten(&self, curve_segments: u32) -> (Vec<Vector2F>, Vec<Vec<Vector2F>>) {
        let outline = winding::oriented(&self.outline.flatten(curve_segments), true);
        let holes = self
            .holes
            .iter()
            .map(|hole| winding::oriented(&hole.flatten(curve_segments), false))
            .collect();
        (outline, holes)
    }
}
