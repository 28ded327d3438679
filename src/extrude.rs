// glyph-solid/src/extrude.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Linear extrusion of planar shapes along +Z, with an optional rounded bevel.
//!
//! The solid is built as a stack of layers. Each layer is a copy of every flattened contour,
//! pushed out along its miter vectors by the layer's offset and placed at the layer's depth.
//! Consecutive layers are joined by side walls, and the first and last layers are capped.
//!
//! With a bevel, the stack starts `bevel_thickness` in front of the body at offset
//! `bevel_offset`, widens along a quarter circle to `bevel_size + bevel_offset` at `z = 0`, runs
//! straight back to `z = depth`, and narrows again behind it.

use glam::Vec3;
use lyon_tessellation::math::point;
use lyon_tessellation::path::Path;
use lyon_tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};
use pathfinder_geometry::vector::Vector2F;
use std::f32::consts::FRAC_PI_2;

use crate::error::GeometryError;
use crate::shape::Shape;
use crate::solid::Solid;

// Miters are clamped to this multiple of the offset at sharp corners.
const MITER_LIMIT: f32 = 4.0;

/// Extrusion parameters. The bevel fields are ignored when `bevel_enabled` is false.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtrudeSpec {
    /// Depth of the straight body along +Z.
    pub depth: f32,
    pub bevel_enabled: bool,
    /// How far the bevel reaches in front of and behind the body.
    pub bevel_thickness: f32,
    /// How far the bevel pushes the contours outward.
    pub bevel_size: f32,
    /// Outward offset of the contours where the bevel starts.
    pub bevel_offset: f32,
    pub bevel_segments: u32,
    /// Samples per curve when flattening contours.
    pub curve_segments: u32,
    /// Subdivisions of the straight body.
    pub steps: u32,
}

impl Default for ExtrudeSpec {
    fn default() -> ExtrudeSpec {
        ExtrudeSpec {
            depth: 0.3,
            bevel_enabled: true,
            bevel_thickness: 0.08,
            bevel_size: 0.06,
            bevel_offset: 0.0,
            bevel_segments: 8,
            curve_segments: 24,
            steps: 1,
        }
    }
}

impl ExtrudeSpec {
    fn validate(&self) -> Result<(), GeometryError> {
        let fields = [
            ("depth", self.depth),
            ("bevel_thickness", self.bevel_thickness),
            ("bevel_size", self.bevel_size),
            ("bevel_offset", self.bevel_offset),
        ];
        match fields.iter().find(|(_, value)| !value.is_finite()) {
            Some(&(name, _)) => Err(GeometryError::NonFinite(name)),
            None => Ok(()),
        }
    }

    /// The (z, outward offset) of every layer, front to back.
    fn layers(&self) -> Vec<(f32, f32)> {
        let steps = self.steps.max(1);
        let body_offset = if self.bevel_enabled {
            self.bevel_size + self.bevel_offset
        } else {
            0.0
        };
        let bevel = |segment: u32| {
            let t = segment as f32 / self.bevel_segments as f32;
            (
                self.bevel_thickness * (t * FRAC_PI_2).cos(),
                self.bevel_size * (t * FRAC_PI_2).sin() + self.bevel_offset,
            )
        };

        let mut layers = vec![];
        if self.bevel_enabled {
            for segment in 0..self.bevel_segments {
                let (z, offset) = bevel(segment);
                layers.push((-z, offset));
            }
        }
        for step in 0..=steps {
            layers.push((self.depth * step as f32 / steps as f32, body_offset));
        }
        if self.bevel_enabled {
            for segment in (0..self.bevel_segments).rev() {
                let (z, offset) = bevel(segment);
                layers.push((self.depth + z, offset));
            }
        }
        layers
    }
}

/// One flattened contour with the direction each vertex moves when the contour is offset.
struct Ring {
    points: Vec<Vector2F>,
    miters: Vec<Vector2F>,
}

impl Ring {
    fn new(points: Vec<Vector2F>) -> Ring {
        let miters = miters(&points);
        Ring { points, miters }
    }

    #[inline]
    fn at(&self, index: usize, offset: f32) -> Vector2F {
        self.points[index] + self.miters[index] * offset
    }
}

// The right-hand normal, which points away from the material for a counterclockwise outline and
// a clockwise hole alike.
#[inline]
fn outward_normal(from: Vector2F, to: Vector2F) -> Vector2F {
    let edge = to - from;
    let length = edge.length();
    if length == 0.0 {
        return Vector2F::zero();
    }
    Vector2F::new(edge.y(), -edge.x()) * (1.0 / length)
}

fn miters(points: &[Vector2F]) -> Vec<Vector2F> {
    let count = points.len();
    (0..count)
        .map(|index| {
            let previous = points[(index + count - 1) % count];
            let current = points[index];
            let next = points[(index + 1) % count];
            let normal_in = outward_normal(previous, current);
            let normal_out = outward_normal(current, next);
            let sum = normal_in + normal_out;
            if sum.length() < 1e-6 {
                return normal_out;
            }
            let direction = sum.normalize();
            let cos = direction.dot(normal_out).max(1.0 / MITER_LIMIT);
            direction * (1.0 / cos)
        })
        .collect()
}

/// Extrudes every shape into one solid. Normals are left empty.
pub fn extrude_shapes(shapes: &[Shape], spec: &ExtrudeSpec) -> Result<Solid, GeometryError> {
    spec.validate()?;
    let layers = spec.layers();
    let mut solid = Solid::new();
    let mut tessellator = FillTessellator::new();

    for shape in shapes {
        let (outline, holes) = shape.flatten(spec.curve_segments);
        if outline.len() < 3 {
            continue;
        }
        let rings: Vec<Ring> = Some(outline)
            .into_iter()
            .chain(holes.into_iter().filter(|hole| hole.len() >= 3))
            .map(Ring::new)
            .collect();

        for pair in layers.windows(2) {
            for ring in &rings {
                add_side_walls(&mut solid, ring, pair[0], pair[1]);
            }
        }

        if let (Some(&front), Some(&back)) = (layers.first(), layers.last()) {
            add_cap(&mut solid, &mut tessellator, &rings, front, false)?;
            add_cap(&mut solid, &mut tessellator, &rings, back, true)?;
        }
    }
    Ok(solid)
}

fn add_side_walls(solid: &mut Solid, ring: &Ring, near: (f32, f32), far: (f32, f32)) {
    let count = ring.points.len();
    for index in 0..count {
        let next = (index + 1) % count;
        let corners = [
            (ring.at(index, near.1), near.0),
            (ring.at(next, near.1), near.0),
            (ring.at(next, far.1), far.0),
            (ring.at(index, far.1), far.0),
        ];
        let [a, b, c, d] =
            corners.map(|(point, z)| solid.push_vertex(Vec3::new(point.x(), point.y(), z)));
        solid.push_triangle(a, b, c);
        solid.push_triangle(a, c, d);
    }
}

fn add_cap(
    solid: &mut Solid,
    tessellator: &mut FillTessellator,
    rings: &[Ring],
    (z, offset): (f32, f32),
    facing_back: bool,
) -> Result<(), GeometryError> {
    let mut builder = Path::builder();
    for ring in rings {
        builder.begin(to_point(ring.at(0, offset)));
        for index in 1..ring.points.len() {
            builder.line_to(to_point(ring.at(index, offset)));
        }
        builder.end(true);
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<Vector2F, u32> = VertexBuffers::new();
    tessellator
        .tessellate_path(
            path.as_slice(),
            &FillOptions::default(),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                let position = vertex.position();
                Vector2F::new(position.x, position.y)
            }),
        )
        .map_err(|error| GeometryError::Tessellation(error.to_string()))?;

    let base = solid.vertex_count() as u32;
    for position in &buffers.vertices {
        solid.push_vertex(Vec3::new(position.x(), position.y(), z));
    }
    for triangle in buffers.indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]];
        let (pa, pb, pc) = (
            buffers.vertices[a as usize],
            buffers.vertices[b as usize],
            buffers.vertices[c as usize],
        );
        let twice_area = (pb - pa).det(pc - pa);
        if twice_area == 0.0 {
            continue;
        }
        // The back cap faces +Z and must wind counterclockwise seen from +Z; the front the reverse.
        if (twice_area > 0.0) == facing_back {
            solid.push_triangle(base + a, base + b, base + c);
        } else {
            solid.push_triangle(base + a, base + c, base + b);
        }
    }
    Ok(())
}

#[inline]
fn to_point(vector: Vector2F) -> lyon_tessellation::math::Point {
    point(vector.x(), vector.y())
}
