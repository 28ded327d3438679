// glyph-solid/src/lib.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `glyph-solid` turns a line of text set in an outline font into an extruded, beveled triangle
//! mesh.
//!
//! The work happens in three stages:
//!
//! * A `FontCache` loads fonts from URLs, files, or uploaded bytes. It rejects HTML error pages
//!   served in place of a font and remembers every font that parsed.
//!
//! * `glyphs::shapes_for_text` lays the text out line by line and resolves the glyph contours
//!   into `Shape`s, each an outer contour with its holes.
//!
//! * `solid::build_solid` extrudes the shapes with an optional bevel, scales the result to a
//!   target width, centers it, and computes normals.
//!
//! `pipeline::Pipeline` ties the stages together for interactive use, discarding results that were
//! overtaken by newer edits.

pub mod cache;
pub mod error;
pub mod extrude;
pub mod fetch;
pub mod file_type;
pub mod font;
pub mod glyphs;
pub mod handle;
pub mod layout;
pub mod loader;
pub mod loaders;
pub mod metrics;
pub mod outline;
pub mod pipeline;
pub mod shape;
pub mod sniff;
pub mod solid;
pub mod winding;
