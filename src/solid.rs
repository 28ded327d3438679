// glyph-solid/src/solid.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Indexed triangle meshes and the sizing steps applied to them after extrusion.

use glam::Vec3;
use log::{debug, warn};

use crate::error::GeometryError;
use crate::extrude::{self, ExtrudeSpec};
use crate::shape::Shape;

/// How a freshly extruded solid is scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SizingSpec {
    /// The width the solid is scaled to along X, or `None` to keep font units.
    pub target_length: Option<f32>,
    /// Scale only X and Y, keeping the extrusion depth.
    pub lock_thickness: bool,
}

impl Default for SizingSpec {
    fn default() -> SizingSpec {
        SizingSpec {
            target_length: Some(8.0),
            lock_thickness: true,
        }
    }
}

impl SizingSpec {
    fn validate(&self) -> Result<(), GeometryError> {
        match self.target_length {
            Some(length) if !length.is_finite() => Err(GeometryError::NonFinite("target_length")),
            Some(length) if length <= 0.0 => Err(GeometryError::NonPositive("target_length")),
            _ => Ok(()),
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// The result of `Solid::fit_to_width`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FitOutcome {
    /// The solid was scaled by this factor.
    Scaled(f32),
    /// The solid has no width, or the target is not a positive finite width, so scaling was
    /// skipped.
    Degenerate,
}

/// An indexed triangle mesh with per-vertex normals.
///
/// Triangles wind counterclockwise when seen from outside.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Solid {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

impl Solid {
    #[inline]
    pub fn new() -> Solid {
        Solid::default()
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Per-vertex normals. Empty until `compute_vertex_normals` runs.
    #[inline]
    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub(crate) fn push_vertex(&mut self, position: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        index
    }

    pub(crate) fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Returns the bounds of every vertex, or `None` for an empty solid.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let (first, rest) = self.positions.split_first()?;
        let first = Vec3::from_array(*first);
        let (min, max) = rest.iter().fold((first, first), |(min, max), &position| {
            let position = Vec3::from_array(position);
            (min.min(position), max.max(position))
        });
        Some(Aabb { min, max })
    }

    pub fn translate(&mut self, offset: Vec3) {
        for position in &mut self.positions {
            *position = (Vec3::from_array(*position) + offset).to_array();
        }
    }

    pub fn scale(&mut self, factors: Vec3) {
        for position in &mut self.positions {
            *position = (Vec3::from_array(*position) * factors).to_array();
        }
    }

    /// Moves the center of the bounding box to the origin and returns the translation applied.
    pub fn center(&mut self) -> Vec3 {
        let offset = match self.bounding_box() {
            Some(bounds) => -bounds.center(),
            None => return Vec3::ZERO,
        };
        self.translate(offset);
        offset
    }

    /// Scales the solid so its bounding box is `target` wide along X.
    ///
    /// With `lock_thickness` only X and Y are scaled, otherwise all three axes. A solid with no
    /// width, or a target that is not positive and finite, leaves the solid untouched.
    pub fn fit_to_width(&mut self, target: f32, lock_thickness: bool) -> FitOutcome {
        if !(target > 0.0 && target.is_finite()) {
            return FitOutcome::Degenerate;
        }
        let width = match self.bounding_box() {
            Some(bounds) => bounds.size().x,
            None => return FitOutcome::Degenerate,
        };
        if !(width > 0.0 && width.is_finite()) {
            return FitOutcome::Degenerate;
        }
        let factor = target / width;
        let factors = if lock_thickness {
            Vec3::new(factor, factor, 1.0)
        } else {
            Vec3::splat(factor)
        };
        self.scale(factors);
        FitOutcome::Scaled(factor)
    }

    /// Recomputes smooth per-vertex normals, weighting each face by its area.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for triangle in self.indices.chunks_exact(3) {
            let (a, b, c) = (
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            );
            let p0 = Vec3::from_array(self.positions[a]);
            let p1 = Vec3::from_array(self.positions[b]);
            let p2 = Vec3::from_array(self.positions[c]);
            let face_normal = (p1 - p0).cross(p2 - p0);
            normals[a] += face_normal;
            normals[b] += face_normal;
            normals[c] += face_normal;
        }
        self.normals = normals
            .into_iter()
            .map(|normal| normal.normalize_or_zero().to_array())
            .collect();
    }
}

/// Extrudes shapes and normalizes the result: fit to the target width, center on the origin,
/// and recompute normals.
///
/// Returns `Ok(None)` when there is nothing to extrude. A target length that is not positive and
/// finite is an error.
pub fn build_solid(
    shapes: &[Shape],
    extrude_spec: &ExtrudeSpec,
    sizing: &SizingSpec,
) -> Result<Option<Solid>, GeometryError> {
    sizing.validate()?;
    if shapes.is_empty() {
        debug!("no shapes to extrude");
        return Ok(None);
    }
    let mut solid = extrude::extrude_shapes(shapes, extrude_spec)?;
    if solid.is_empty() {
        warn!("{} shapes produced no triangles", shapes.len());
        return Ok(None);
    }

    if let Some(target_length) = sizing.target_length {
        if let FitOutcome::Degenerate = solid.fit_to_width(target_length, sizing.lock_thickness) {
            warn!("solid has zero width, skipping scale to {}", target_length);
        }
    }
    solid.center();
    solid.compute_vertex_normals();
    Ok(Some(solid))
}
