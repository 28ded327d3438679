// glyph-solid/src/pipeline.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Drives text-to-solid rebuilds as the user edits their inputs.
//!
//! Every change issues a new `Ticket`. A rebuild that finishes after a newer ticket was issued
//! reports `Rebuild::Stale` and its result is never installed.

use log::{debug, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::cache::FontCache;
use crate::error::BuildError;
use crate::extrude::ExtrudeSpec;
use crate::fetch::Fetch;
use crate::glyphs::{self, TextSpec};
use crate::handle::Handle;
use crate::solid::{self, SizingSpec, Solid};

/// Identifies one generation of inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Issues tickets and remembers the newest one.
#[derive(Debug, Default)]
pub struct Generations {
    latest: AtomicU64,
}

impl Generations {
    #[inline]
    pub fn new() -> Generations {
        Generations::default()
    }

    /// Starts a new generation, making every earlier ticket stale.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[inline]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Everything a rebuild needs.
#[derive(Clone, Debug)]
pub struct Request {
    pub font: Handle,
    pub text: TextSpec,
    pub extrude: ExtrudeSpec,
    pub sizing: SizingSpec,
}

impl Request {
    /// A request with default text, extrusion, and sizing settings.
    pub fn new(font: Handle) -> Request {
        Request {
            font,
            text: TextSpec::default(),
            extrude: ExtrudeSpec::default(),
            sizing: SizingSpec::default(),
        }
    }
}

/// The outcome of a rebuild that did not fail.
#[derive(Debug)]
pub enum Rebuild {
    /// A new solid, ready to install.
    Built(Solid),
    /// The inputs describe no geometry, such as blank text.
    Degenerate,
    /// A newer generation was issued while this one ran.
    Stale,
}

/// Rebuilds solids from requests, sharing one font cache.
pub struct Pipeline<F> {
    cache: FontCache<F>,
    generations: Generations,
}

impl<F> Pipeline<F>
where
    F: Fetch,
{
    pub fn new(cache: FontCache<F>) -> Pipeline<F> {
        Pipeline {
            cache,
            generations: Generations::new(),
        }
    }

    #[inline]
    pub fn cache(&self) -> &FontCache<F> {
        &self.cache
    }

    /// Issues the ticket for a new set of inputs.
    #[inline]
    pub fn begin(&self) -> Ticket {
        self.generations.issue()
    }

    #[inline]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generations.is_current(ticket)
    }

    /// Loads the font, converts the text, and builds the solid for `request`.
    ///
    /// Errors from a generation that went stale during the font load are swallowed and reported
    /// as `Stale`.
    pub async fn rebuild(&self, ticket: Ticket, request: &Request) -> Result<Rebuild, BuildError> {
        if !self.is_current(ticket) {
            debug!("{:?} is stale before starting", ticket);
            return Ok(Rebuild::Stale);
        }
        if request.text.text.trim().is_empty() {
            debug!("{:?} has no text", ticket);
            return Ok(Rebuild::Degenerate);
        }

        let loaded = self.cache.load(&request.font).await;
        if !self.is_current(ticket) {
            debug!("{:?} went stale while loading {}", ticket, request.font.locator());
            return Ok(Rebuild::Stale);
        }
        let font = loaded?;

        let shapes = glyphs::shapes_for_text(&font, &request.text)?;
        match solid::build_solid(&shapes, &request.extrude, &request.sizing)? {
            Some(solid) => {
                info!(
                    "{:?} built {} triangles from {} shapes",
                    ticket,
                    solid.triangle_count(),
                    shapes.len()
                );
                Ok(Rebuild::Built(solid))
            }
            None => Ok(Rebuild::Degenerate),
        }
    }
}

/// Collapses bursts of edits into one rebuild.
///
/// The caller supplies the clock, so the debouncer itself never sleeps.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    delay: Duration,
    last_change: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Debouncer {
        Debouncer::new(Debouncer::DEFAULT_DELAY)
    }
}

impl Debouncer {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

    pub fn new(delay: Duration) -> Debouncer {
        Debouncer {
            delay,
            last_change: None,
        }
    }

    /// Records an edit at `now`, pushing the deadline back.
    #[inline]
    pub fn touch(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    /// Returns true once, when the inputs have been quiet for the full delay.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_change {
            Some(last_change) if now.saturating_duration_since(last_change) >= self.delay => {
                self.last_change = None;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    /// When the pending rebuild becomes due.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.last_change.map(|last_change| last_change + self.delay)
    }
}

/// Holds the solid currently on display.
#[derive(Debug, Default)]
pub struct SolidSlot {
    current: Option<Solid>,
}

impl SolidSlot {
    #[inline]
    pub fn new() -> SolidSlot {
        SolidSlot::default()
    }

    /// Replaces the current solid. The old one is released before the new one is stored.
    pub fn install(&mut self, solid: Solid) {
        drop(self.current.take());
        self.current = Some(solid);
    }

    /// Installs a built solid. Returns false, leaving the slot alone, for any other outcome.
    pub fn apply(&mut self, rebuild: Rebuild) -> bool {
        match rebuild {
            Rebuild::Built(solid) => {
                self.install(solid);
                true
            }
            Rebuild::Degenerate | Rebuild::Stale => false,
        }
    }

    #[inline]
    pub fn get(&self) -> Option<&Solid> {
        self.current.as_ref()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.current = None;
    }
}
