// glyph-solid/src/outline.rs
//
// Copyright © 2020 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Bézier paths.

use bitflags::bitflags;
use pathfinder_geometry::line_segment::LineSegment2F;
use pathfinder_geometry::rect::RectF;
use pathfinder_geometry::transform2d::Transform2F;
use pathfinder_geometry::vector::Vector2F;
use std::mem;

/// Receives Bézier path rendering commands.
pub trait OutlineSink {
    /// Moves the pen to a point.
    fn move_to(&mut self, to: Vector2F);
    /// Draws a line to a point.
    fn line_to(&mut self, to: Vector2F);
    /// Draws a quadratic Bézier curve to a point.
    fn quadratic_curve_to(&mut self, ctrl: Vector2F, to: Vector2F);
    /// Draws a cubic Bézier curve to a point.
    fn cubic_curve_to(&mut self, ctrl: LineSegment2F, to: Vector2F);
    /// Closes the path, returning to the first point in it.
    fn close(&mut self);
}

/// One recorded path drawing command.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathCommand {
    MoveTo(Vector2F),
    LineTo(Vector2F),
    QuadTo { ctrl: Vector2F, to: Vector2F },
    CubicTo { ctrl: LineSegment2F, to: Vector2F },
    Close,
}

impl PathCommand {
    /// Mirrors the command across the X axis.
    ///
    /// Every point is negated in Y, control points included. Applying this twice yields the
    /// original command.
    #[inline]
    pub fn flip_y(self) -> PathCommand {
        self.transform(&Transform2F::from_scale(Vector2F::new(1.0, -1.0)))
    }

    /// Applies an affine transform to every point of the command.
    pub fn transform(self, transform: &Transform2F) -> PathCommand {
        match self {
            PathCommand::MoveTo(to) => PathCommand::MoveTo(*transform * to),
            PathCommand::LineTo(to) => PathCommand::LineTo(*transform * to),
            PathCommand::QuadTo { ctrl, to } => PathCommand::QuadTo {
                ctrl: *transform * ctrl,
                to: *transform * to,
            },
            PathCommand::CubicTo { ctrl, to } => PathCommand::CubicTo {
                ctrl: *transform * ctrl,
                to: *transform * to,
            },
            PathCommand::Close => PathCommand::Close,
        }
    }

    /// Sends this command to an `OutlineSink`.
    pub fn send_to<S>(self, sink: &mut S)
    where
        S: OutlineSink,
    {
        match self {
            PathCommand::MoveTo(to) => sink.move_to(to),
            PathCommand::LineTo(to) => sink.line_to(to),
            PathCommand::QuadTo { ctrl, to } => sink.quadratic_curve_to(ctrl, to),
            PathCommand::CubicTo { ctrl, to } => sink.cubic_curve_to(ctrl, to),
            PathCommand::Close => sink.close(),
        }
    }
}

/// Records path commands in order, as an `OutlineSink`.
#[derive(Clone, Default, Debug)]
pub struct CommandList {
    commands: Vec<PathCommand>,
}

impl CommandList {
    #[inline]
    pub fn new() -> CommandList {
        CommandList::default()
    }

    #[inline]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[inline]
    pub fn into_commands(self) -> Vec<PathCommand> {
        self.commands
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns a copy of this list with every command mirrored across the X axis.
    pub fn flipped_y(&self) -> CommandList {
        CommandList {
            commands: self.commands.iter().map(|command| command.flip_y()).collect(),
        }
    }

    /// Sends every recorded command to an `OutlineSink`.
    pub fn copy_to<S>(&self, sink: &mut S)
    where
        S: OutlineSink,
    {
        for &command in &self.commands {
            command.send_to(sink);
        }
    }
}

impl OutlineSink for CommandList {
    #[inline]
    fn move_to(&mut self, to: Vector2F) {
        self.commands.push(PathCommand::MoveTo(to));
    }

    #[inline]
    fn line_to(&mut self, to: Vector2F) {
        self.commands.push(PathCommand::LineTo(to));
    }

    #[inline]
    fn quadratic_curve_to(&mut self, ctrl: Vector2F, to: Vector2F) {
        self.commands.push(PathCommand::QuadTo { ctrl, to });
    }

    #[inline]
    fn cubic_curve_to(&mut self, ctrl: LineSegment2F, to: Vector2F) {
        self.commands.push(PathCommand::CubicTo { ctrl, to });
    }

    #[inline]
    fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }
}

/// Applies an affine transform to every point before passing it on.
pub struct TransformSink<'a, S> {
    transform: Transform2F,
    sink: &'a mut S,
}

impl<'a, S> TransformSink<'a, S>
where
    S: OutlineSink,
{
    #[inline]
    pub fn new(transform: Transform2F, sink: &'a mut S) -> TransformSink<'a, S> {
        TransformSink { transform, sink }
    }
}

impl<S> OutlineSink for TransformSink<'_, S>
where
    S: OutlineSink,
{
    #[inline]
    fn move_to(&mut self, to: Vector2F) {
        self.sink.move_to(self.transform * to);
    }

    #[inline]
    fn line_to(&mut self, to: Vector2F) {
        self.sink.line_to(self.transform * to);
    }

    #[inline]
    fn quadratic_curve_to(&mut self, ctrl: Vector2F, to: Vector2F) {
        self.sink
            .quadratic_curve_to(self.transform * ctrl, self.transform * to);
    }

    #[inline]
    fn cubic_curve_to(&mut self, ctrl: LineSegment2F, to: Vector2F) {
        self.sink
            .cubic_curve_to(self.transform * ctrl, self.transform * to);
    }

    #[inline]
    fn close(&mut self) {
        self.sink.close();
    }
}

/// A glyph vector outline or path.
#[derive(Clone, PartialEq, Debug)]
pub struct Outline {
    /// The individual subpaths that make up this outline.
    pub contours: Vec<Contour>,
}

/// A single curve or subpath within a glyph outline.
///
/// Contours are implicitly closed: the last point connects back to the first.
#[derive(Clone, PartialEq, Debug)]
pub struct Contour {
    /// Positions of each point.
    ///
    /// This must have the same length as the `flags` field.
    pub positions: Vec<Vector2F>,
    /// Flags that specify what type of point the corresponding position represents.
    ///
    /// This must have the same length as the `positions` field.
    pub flags: Vec<PointFlags>,
}

bitflags! {
    /// Flags that specify what type of point the corresponding position represents.
    pub struct PointFlags: u8 {
        /// This point is the control point of a quadratic Bézier curve or the first control point
        /// of a cubic Bézier curve.
        ///
        /// This flag is mutually exclusive with `CONTROL_POINT_1`.
        const CONTROL_POINT_0 = 0x01;
        /// This point is the second control point of a cubic Bézier curve.
        ///
        /// This flag is mutually exclusive with `CONTROL_POINT_0`.
        const CONTROL_POINT_1 = 0x02;
    }
}

/// A segment of a contour, ending at `to`.
#[derive(Clone, Copy, Debug)]
enum Segment {
    Line { to: Vector2F },
    Quad { ctrl: Vector2F, to: Vector2F },
    Cubic { ctrl: LineSegment2F, to: Vector2F },
}

impl Segment {
    #[inline]
    fn to(self) -> Vector2F {
        match self {
            Segment::Line { to } | Segment::Quad { to, .. } | Segment::Cubic { to, .. } => to,
        }
    }
}

/// Accumulates Bézier path rendering commands into an `Outline` structure.
#[derive(Clone, Debug)]
pub struct OutlineBuilder {
    outline: Outline,
    current_contour: Contour,
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}

impl Outline {
    /// Creates a new empty outline.
    #[inline]
    pub fn new() -> Outline {
        Outline { contours: vec![] }
    }

    /// Returns the bounding box of every point, control points included.
    pub fn bounds(&self) -> Option<RectF> {
        self.contours
            .iter()
            .filter_map(Contour::bounds)
            .reduce(RectF::union_rect)
    }
}

impl Default for Contour {
    fn default() -> Self {
        Self::new()
    }
}

impl Contour {
    /// Creates a new empty contour.
    #[inline]
    pub fn new() -> Contour {
        Contour {
            positions: vec![],
            flags: vec![],
        }
    }

    /// Adds a new point with the given flags to the contour.
    #[inline]
    pub fn push(&mut self, position: Vector2F, flags: PointFlags) {
        self.positions.push(position);
        self.flags.push(flags);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the bounding box of every point, control points included.
    pub fn bounds(&self) -> Option<RectF> {
        let (&first, rest) = self.positions.split_first()?;
        Some(
            rest.iter()
                .fold(RectF::from_points(first, first), |rect, &point| {
                    rect.union_point(point)
                }),
        )
    }

    /// Approximates the contour by a closed polyline.
    ///
    /// Each curve is evaluated at `curve_segments` evenly spaced parameter values. The closing
    /// point is not repeated.
    pub fn flatten(&self, curve_segments: u32) -> Vec<Vector2F> {
        let start = match self.positions.first() {
            Some(&start) => start,
            None => return vec![],
        };
        let steps = curve_segments.max(1);
        let mut points = vec![start];
        let mut from = start;
        for segment in self.segments() {
            match segment {
                Segment::Line { to } => points.push(to),
                Segment::Quad { ctrl, to } => {
                    for step in 1..=steps {
                        let t = step as f32 / steps as f32;
                        let a = from.lerp(ctrl, t);
                        let b = ctrl.lerp(to, t);
                        points.push(a.lerp(b, t));
                    }
                }
                Segment::Cubic { ctrl, to } => {
                    for step in 1..=steps {
                        let t = step as f32 / steps as f32;
                        let a = from.lerp(ctrl.from(), t);
                        let b = ctrl.from().lerp(ctrl.to(), t);
                        let c = ctrl.to().lerp(to, t);
                        let ab = a.lerp(b, t);
                        let bc = b.lerp(c, t);
                        points.push(ab.lerp(bc, t));
                    }
                }
            }
            from = segment.to();
        }

        points.dedup();
        if points.len() > 1 && points.last() == points.first() {
            points.pop();
        }
        points
    }

    /// Returns the same contour traversed in the opposite direction, starting at the same point.
    pub fn reversed(&self) -> Contour {
        let start = match self.positions.first() {
            Some(&start) => start,
            None => return Contour::new(),
        };
        let mut segments = self.segments();
        if segments.last().map(|segment| segment.to()) != Some(start) {
            segments.push(Segment::Line { to: start });
        }

        let mut reversed = Contour::new();
        reversed.push(start, PointFlags::empty());
        for (index, segment) in segments.iter().enumerate().rev() {
            let to = if index == 0 {
                start
            } else {
                segments[index - 1].to()
            };
            match *segment {
                Segment::Line { .. } => {}
                Segment::Quad { ctrl, .. } => reversed.push(ctrl, PointFlags::CONTROL_POINT_0),
                Segment::Cubic { ctrl, .. } => {
                    reversed.push(ctrl.to(), PointFlags::CONTROL_POINT_0);
                    reversed.push(ctrl.from(), PointFlags::CONTROL_POINT_1);
                }
            }
            reversed.push(to, PointFlags::empty());
        }

        // The final line back to the start is implied by closing.
        if let Some(Segment::Line { .. }) = segments.first() {
            reversed.positions.pop();
            reversed.flags.pop();
        }
        reversed
    }

    fn segments(&self) -> Vec<Segment> {
        let mut segments = vec![];
        let mut index = 1;
        while index < self.positions.len() {
            let position_0 = self.positions[index];
            if self.flags[index].is_empty() {
                segments.push(Segment::Line { to: position_0 });
                index += 1;
                continue;
            }

            let (position_1, flags_1) = match self.positions.get(index + 1) {
                Some(&position) => (position, self.flags[index + 1]),
                None => break,
            };
            if flags_1.is_empty() {
                segments.push(Segment::Quad {
                    ctrl: position_0,
                    to: position_1,
                });
                index += 2;
                continue;
            }

            let position_2 = match self.positions.get(index + 2) {
                Some(&position) => position,
                None => break,
            };
            debug_assert!(self.flags[index + 2].is_empty());
            segments.push(Segment::Cubic {
                ctrl: LineSegment2F::new(position_0, position_1),
                to: position_2,
            });
            index += 3;
        }
        segments
    }
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineBuilder {
    /// Creates a new empty `OutlineBuilder`.
    #[inline]
    pub fn new() -> OutlineBuilder {
        OutlineBuilder {
            outline: Outline::new(),
            current_contour: Contour::new(),
        }
    }

    /// Consumes this outline builder and returns the resulting outline.
    ///
    /// A contour still open at this point is closed implicitly.
    #[inline]
    pub fn into_outline(mut self) -> Outline {
        self.finish_contour();
        self.outline
    }

    fn finish_contour(&mut self) {
        let mut contour = mem::replace(&mut self.current_contour, Contour::new());
        if contour.positions.len() < 2 {
            return;
        }

        // A trailing line back to the start is redundant with closing.
        let last = contour.positions.len() - 1;
        if contour.positions[last] == contour.positions[0] && contour.flags[last - 1].is_empty() {
            contour.positions.pop();
            contour.flags.pop();
        }
        self.outline.contours.push(contour);
    }
}

impl OutlineSink for OutlineBuilder {
    #[inline]
    fn move_to(&mut self, to: Vector2F) {
        self.finish_contour();
        self.current_contour.push(to, PointFlags::empty());
    }

    #[inline]
    fn line_to(&mut self, to: Vector2F) {
        self.current_contour.push(to, PointFlags::empty());
    }

    #[inline]
    fn quadratic_curve_to(&mut self, ctrl: Vector2F, to: Vector2F) {
        self.current_contour.push(ctrl, PointFlags::CONTROL_POINT_0);
        self.current_contour.push(to, PointFlags::empty());
    }

    #[inline]
    fn cubic_curve_to(&mut self, ctrl: LineSegment2F, to: Vector2F) {
        self.current_contour
            .push(ctrl.from(), PointFlags::CONTROL_POINT_0);
        self.current_contour
            .push(ctrl.to(), PointFlags::CONTROL_POINT_1);
        self.current_contour.push(to, PointFlags::empty());
    }

    #[inline]
    fn close(&mut self) {
        self.finish_contour();
    }
}
