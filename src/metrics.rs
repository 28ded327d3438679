// glyph-solid/src/metrics.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Various metrics that apply to the entire font.

use ttf_parser::Face;

/// Various metrics that apply to the entire font.
#[derive(Clone, Copy, Debug)]
pub struct Metrics {
    /// The number of font units per em.
    ///
    /// Font sizes are usually expressed in pixels per em; e.g. `12px` means 12 pixels per em.
    pub units_per_em: u32,
}

impl Metrics {
    pub(crate) fn from_face(face: &Face) -> Metrics {
        Metrics {
            units_per_em: face.units_per_em() as u32,
        }
    }
}
