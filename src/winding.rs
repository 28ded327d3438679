// glyph-solid/src/winding.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Classification of closed polylines into solids and holes.
//!
//! Fonts disagree about contour direction (TrueType outlines run clockwise, CFF outlines
//! counterclockwise, and some fonts are simply inconsistent), so roles are decided by nesting
//! depth rather than by winding: a contour inside an even number of others is a solid, inside an
//! odd number a hole. This is the even-odd rule applied per contour, and it handles counters
//! nested inside counters.

use float_ord::FloatOrd;
use pathfinder_geometry::rect::RectF;
use pathfinder_geometry::vector::Vector2F;

// Relative to the square of the contour's larger bounding box side.
const DEGENERATE_AREA_RATIO: f32 = 1e-6;

/// One solid contour and the holes cut out of it, as indices into the input.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourGroup {
    pub outer: usize,
    pub holes: Vec<usize>,
}

/// The shoelace area of a closed polyline, positive when counterclockwise in a Y-up frame.
pub fn signed_area(points: &[Vector2F]) -> f32 {
    let count = points.len();
    if count < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for index in 0..count {
        let next = (index + 1) % count;
        twice_area += points[index].det(points[next]);
    }
    twice_area * 0.5
}

#[inline]
pub fn is_clockwise(points: &[Vector2F]) -> bool {
    signed_area(points) < 0.0
}

/// Even-odd point-in-polygon test by ray casting along +X.
pub fn contains_point(polygon: &[Vector2F], point: Vector2F) -> bool {
    let count = polygon.len();
    if count < 3 {
        return false;
    }
    let mut inside = false;
    let mut previous = polygon[count - 1];
    for &current in polygon {
        if (current.y() > point.y()) != (previous.y() > point.y()) {
            let t = (point.y() - current.y()) / (previous.y() - current.y());
            let crossing_x = current.x() + t * (previous.x() - current.x());
            if point.x() < crossing_x {
                inside = !inside;
            }
        }
        previous = current;
    }
    inside
}

/// Returns the polyline with its direction forced: counterclockwise if `counterclockwise` is
/// true, clockwise otherwise.
pub fn oriented(points: &[Vector2F], counterclockwise: bool) -> Vec<Vector2F> {
    let mut points = points.to_vec();
    if (signed_area(&points) > 0.0) != counterclockwise {
        points.reverse();
    }
    points
}

struct Candidate<'a> {
    index: usize,
    points: &'a [Vector2F],
    area: f32,
    bounds: RectF,
}

impl Candidate<'_> {
    fn is_inside(&self, other: &Candidate) -> bool {
        if other.area <= self.area || !other.bounds.contains_rect(self.bounds) {
            return false;
        }
        // Contours may touch, so a single vertex can sit on the other boundary. Take a vote.
        let inside = self
            .points
            .iter()
            .filter(|&&point| contains_point(other.points, point))
            .count();
        inside * 2 > self.points.len()
    }
}

fn bounds(points: &[Vector2F]) -> Option<RectF> {
    let (&first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(RectF::from_points(first, first), |rect, &point| {
                rect.union_point(point)
            }),
    )
}

fn is_degenerate(points: &[Vector2F], area: f32, bounds: RectF) -> bool {
    let mut distinct = points.to_vec();
    distinct.dedup();
    if distinct.len() > 1 && distinct.first() == distinct.last() {
        distinct.pop();
    }
    if distinct.len() < 3 || !area.is_finite() {
        return true;
    }
    let extent = bounds.width().max(bounds.height());
    area <= extent * extent * DEGENERATE_AREA_RATIO
}

/// Groups closed polylines into solids with their holes.
///
/// Degenerate polylines (fewer than three distinct points, or no area) and exact duplicates are
/// dropped. Every other polyline appears in exactly one group. `invert` swaps the solid and hole
/// roles; a hole with no solid around it then attaches to the largest solid it encloses, or
/// stands alone if it encloses none.
///
/// Groups come out in the order of their outer contours in the input.
pub fn group_contours(polylines: &[Vec<Vector2F>], invert: bool) -> Vec<ContourGroup> {
    let mut candidates: Vec<Candidate> = vec![];
    for (index, points) in polylines.iter().enumerate() {
        let bounds = match bounds(points) {
            Some(bounds) => bounds,
            None => continue,
        };
        let area = signed_area(points).abs();
        if is_degenerate(points, area, bounds) {
            continue;
        }
        if candidates.iter().any(|candidate| candidate.points == &points[..]) {
            continue;
        }
        candidates.push(Candidate {
            index,
            points,
            area,
            bounds,
        });
    }

    let is_solid: Vec<bool> = candidates
        .iter()
        .map(|candidate| {
            let depth = candidates
                .iter()
                .filter(|other| other.index != candidate.index && candidate.is_inside(other))
                .count();
            (depth % 2 == 0) != invert
        })
        .collect();

    let mut groups: Vec<ContourGroup> = vec![];
    let mut group_of_candidate = vec![None; candidates.len()];
    for (position, candidate) in candidates.iter().enumerate() {
        if is_solid[position] {
            group_of_candidate[position] = Some(groups.len());
            groups.push(ContourGroup {
                outer: candidate.index,
                holes: vec![],
            });
        }
    }

    let solids = || {
        candidates
            .iter()
            .enumerate()
            .filter(|&(position, _)| is_solid[position])
    };
    for (position, hole) in candidates.iter().enumerate() {
        if is_solid[position] {
            continue;
        }
        let parent = solids()
            .filter(|(_, solid)| hole.is_inside(solid))
            .min_by_key(|(_, solid)| FloatOrd(solid.area))
            .or_else(|| {
                solids()
                    .filter(|(_, solid)| solid.is_inside(hole))
                    .max_by_key(|(_, solid)| FloatOrd(solid.area))
            })
            .and_then(|(solid_position, _)| group_of_candidate[solid_position]);
        match parent {
            Some(group) => groups[group].holes.push(hole.index),
            None => groups.push(ContourGroup {
                outer: hole.index,
                holes: vec![],
            }),
        }
    }

    groups.sort_by_key(|group| group.outer);
    for group in &mut groups {
        group.holes.sort_unstable();
    }
    groups
}

#[cfg(test)]
mod test {
    use super::*;

    fn square(x: f32, y: f32, side: f32) -> Vec<Vector2F> {
        vec![
            Vector2F::new(x, y),
            Vector2F::new(x + side, y),
            Vector2F::new(x + side, y + side),
            Vector2F::new(x, y + side),
        ]
    }

    #[test]
    fn signed_area_follows_direction() {
        let ccw = square(0.0, 0.0, 2.0);
        assert_eq!(signed_area(&ccw), 4.0);
        let mut cw = ccw.clone();
        cw.reverse();
        assert_eq!(signed_area(&cw), -4.0);
        assert!(is_clockwise(&cw));
        assert_eq!(signed_area(&oriented(&cw, true)), 4.0);
    }

    #[test]
    fn ring_has_one_hole_regardless_of_direction() {
        let outer = square(0.0, 0.0, 3.0);
        let inner = square(1.0, 1.0, 1.0);
        let mut reversed_inner = inner.clone();
        reversed_inner.reverse();
        let expected = vec![ContourGroup {
            outer: 0,
            holes: vec![1],
        }];
        assert_eq!(group_contours(&[outer.clone(), inner], false), expected);
        assert_eq!(group_contours(&[outer, reversed_inner], false), expected);
    }

    #[test]
    fn invert_swaps_roles_and_keeps_every_contour() {
        let polylines = vec![square(0.0, 0.0, 3.0), square(1.0, 1.0, 1.0)];
        let inverted = group_contours(&polylines, true);
        assert_eq!(
            inverted,
            vec![ContourGroup {
                outer: 1,
                holes: vec![0],
            }]
        );
    }

    #[test]
    fn nested_counters_alternate() {
        let polylines = vec![
            square(0.0, 0.0, 10.0),
            square(1.0, 1.0, 8.0),
            square(2.0, 2.0, 6.0),
            square(3.0, 3.0, 4.0),
        ];
        assert_eq!(
            group_contours(&polylines, false),
            vec![
                ContourGroup {
                    outer: 0,
                    holes: vec![1],
                },
                ContourGroup {
                    outer: 2,
                    holes: vec![3],
                },
            ]
        );
    }

    #[test]
    fn separate_glyphs_are_separate_groups() {
        let polylines = vec![square(0.0, 0.0, 1.0), square(2.0, 0.0, 1.0)];
        assert_eq!(group_contours(&polylines, false).len(), 2);
        assert_eq!(group_contours(&polylines, true).len(), 2);
    }

    #[test]
    fn degenerate_and_duplicate_contours_are_dropped() {
        let polylines = vec![
            square(0.0, 0.0, 1.0),
            vec![Vector2F::new(5.0, 5.0), Vector2F::new(6.0, 5.0)],
            vec![
                Vector2F::new(0.0, 0.0),
                Vector2F::new(1.0, 1.0),
                Vector2F::new(2.0, 2.0),
            ],
            square(0.0, 0.0, 1.0),
            vec![],
        ];
        assert_eq!(
            group_contours(&polylines, false),
            vec![ContourGroup {
                outer: 0,
                holes: vec![],
            }]
        );
    }

    #[test]
    fn point_in_polygon() {
        let polygon = square(0.0, 0.0, 2.0);
        assert!(contains_point(&polygon, Vector2F::new(1.0, 1.0)));
        assert!(!contains_point(&polygon, Vector2F::new(3.0, 1.0)));
        assert!(!contains_point(&polygon, Vector2F::new(1.0, -0.5)));
    }
}
