// glyph-solid/tests/tests.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// General tests.

use glyph_solid::cache::FontCache;
use glyph_solid::error::{
    BuildError, ConversionError, FetchError, FontLoadingError, FormatError, GlyphLoadingError,
};
use glyph_solid::extrude::{self, ExtrudeSpec};
use glyph_solid::fetch::{Fetch, Fetched};
use glyph_solid::file_type::FileType;
use glyph_solid::font::Font;
use glyph_solid::glyphs::{self, TextSpec};
use glyph_solid::handle::Handle;
use glyph_solid::layout::{self, LayoutOptions};
use glyph_solid::loader::{GlyphSource, Loader};
use glyph_solid::outline::{Contour, Outline, OutlineBuilder, PointFlags};
use glyph_solid::pipeline::{Pipeline, Rebuild, Request, SolidSlot};
use glyph_solid::shape::{ContourRole, Shape};
use glyph_solid::solid::{self, SizingSpec};
use glyph_solid::winding;
use pathfinder_geometry::rect::RectF;
use pathfinder_geometry::vector::Vector2F;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static TEST_FONT_FILE_PATH: &'static str = "resources/tests/dejavu/DejaVuSans.ttf";
static TEST_FONT_POSTSCRIPT_NAME: &'static str = "DejaVuSans";
static TEST_FONT_FAMILY_NAME: &'static str = "DejaVu Sans";
static TEST_FONT_URL: &'static str = "https://fonts.example.com/DejaVuSans.ttf";

fn test_font_data() -> Vec<u8> {
    let mut file = File::open(TEST_FONT_FILE_PATH).unwrap();
    let mut font_data = vec![];
    file.read_to_end(&mut font_data).unwrap();
    font_data
}

fn test_font() -> Font {
    Font::from_bytes(Arc::new(test_font_data()), 0).unwrap()
}

// Hides the legacy `kern` table by renaming its directory entry, leaving only `GPOS` kerning.
// The new tag sorts to the same position, so the directory stays ordered.
fn test_font_without_kern_table() -> Font {
    let mut font_data = test_font_data();
    let table_count = u16::from_be_bytes([font_data[4], font_data[5]]) as usize;
    let record = (0..table_count)
        .map(|index| 12 + 16 * index)
        .find(|&offset| &font_data[offset..offset + 4] == b"kern")
        .unwrap();
    font_data[record..record + 4].copy_from_slice(b"kerm");
    Font::from_bytes(Arc::new(font_data), 0).unwrap()
}

fn contour_roles(shapes: &[Shape]) -> Vec<([u32; 4], ContourRole)> {
    let key = |bounds: RectF| {
        [
            bounds.min_x().to_bits(),
            bounds.min_y().to_bits(),
            bounds.max_x().to_bits(),
            bounds.max_y().to_bits(),
        ]
    };
    let mut roles: Vec<([u32; 4], ContourRole)> = shapes
        .iter()
        .flat_map(|shape| shape.contours())
        .map(|(role, contour)| (key(contour.bounds().unwrap()), role))
        .collect();
    roles.sort_by_key(|&(key, _)| key);
    roles
}

fn opposite(role: ContourRole) -> ContourRole {
    match role {
        ContourRole::Solid => ContourRole::Hole,
        ContourRole::Hole => ContourRole::Solid,
    }
}

/// Serves canned responses and counts how often it was asked.
struct MockFetcher {
    status: u16,
    content_type: Option<&'static str>,
    body: Vec<u8>,
    calls: AtomicUsize,
}

impl MockFetcher {
    fn serving(status: u16, content_type: Option<&'static str>, body: Vec<u8>) -> MockFetcher {
        MockFetcher {
            status,
            content_type,
            body,
            calls: AtomicUsize::new(0),
        }
    }

    fn font() -> MockFetcher {
        MockFetcher::serving(200, Some("font/ttf"), test_font_data())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetch for MockFetcher {
    async fn fetch(&self, _: &str) -> Result<Fetched, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Fetched {
            status: self.status,
            content_type: self.content_type.map(str::to_owned),
            bytes: self.body.clone(),
        })
    }
}

#[test]
pub fn load_font_from_file() {
    let mut file = File::open(TEST_FONT_FILE_PATH).unwrap();
    let font = Font::from_file(&mut file, 0).unwrap();
    assert_eq!(font.postscript_name().unwrap(), TEST_FONT_POSTSCRIPT_NAME);
    assert_eq!(font.family_name(), TEST_FONT_FAMILY_NAME);
}

#[test]
pub fn load_font_from_memory() {
    let font = test_font();
    assert_eq!(font.postscript_name().unwrap(), TEST_FONT_POSTSCRIPT_NAME);
    assert_eq!(font.metrics().units_per_em, 2048);
}

#[test]
pub fn load_font_from_path_handle() {
    let handle = Handle::from_path(PathBuf::from(TEST_FONT_FILE_PATH), 0);
    let font = handle.load().unwrap();
    assert_eq!(font.family_name(), TEST_FONT_FAMILY_NAME);
}

#[test]
pub fn remote_handle_cannot_load_synchronously() {
    match Handle::from_url(TEST_FONT_URL).load() {
        Err(FontLoadingError::Fetch(FetchError::RemoteHandle { url })) => {
            assert_eq!(url, TEST_FONT_URL)
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
pub fn analyze_bytes() {
    assert_eq!(
        Font::analyze_bytes(Arc::new(test_font_data())).unwrap(),
        FileType::Single
    );
}

#[test]
pub fn get_glyph_for_char() {
    let font = test_font();
    let glyph = font.glyph_for_char('a').expect("No glyph for char!");
    assert_eq!(glyph, 68);
    assert_eq!(font.glyph_for_char('中'), None);
}

#[test]
pub fn get_glyph_outline() {
    let font = test_font();
    let glyph = font.glyph_for_char('i').expect("No glyph for char!");
    let mut outline_builder = OutlineBuilder::new();
    font.outline(glyph, &mut outline_builder).unwrap();

    let outline = outline_builder.into_outline();
    assert_eq!(
        outline,
        Outline {
            contours: vec![
                Contour {
                    positions: vec![
                        Vector2F::new(193.0, 1120.0),
                        Vector2F::new(377.0, 1120.0),
                        Vector2F::new(377.0, 0.0),
                        Vector2F::new(193.0, 0.0),
                    ],
                    flags: vec![PointFlags::empty(); 4],
                },
                Contour {
                    positions: vec![
                        Vector2F::new(193.0, 1556.0),
                        Vector2F::new(377.0, 1556.0),
                        Vector2F::new(377.0, 1323.0),
                        Vector2F::new(193.0, 1323.0),
                    ],
                    flags: vec![PointFlags::empty(); 4],
                },
            ],
        }
    );
}

#[test]
pub fn get_empty_glyph_outline() {
    let font = test_font();
    let glyph = font.glyph_for_char(' ').expect("No glyph for char!");
    let mut outline_builder = OutlineBuilder::new();
    font.outline(glyph, &mut outline_builder).unwrap();

    let outline = outline_builder.into_outline();
    assert_eq!(outline, Outline::new());
}

#[test]
pub fn get_glyph_kerning() {
    let font = test_font();
    let a = font.glyph_for_char('A').unwrap();
    let v = font.glyph_for_char('V').unwrap();
    let h = font.glyph_for_char('H').unwrap();
    assert_eq!(font.kerning(a, v), -131.0);
    assert_eq!(font.kerning(v, a), -131.0);
    assert_eq!(font.kerning(h, h), 0.0);
}

#[test]
pub fn get_glyph_kerning_from_gpos_only() {
    let font = test_font_without_kern_table();
    let a = font.glyph_for_char('A').unwrap();
    let v = font.glyph_for_char('V').unwrap();
    assert_eq!(font.kerning(a, v), -131.0);

    let face = font.face().unwrap();
    assert_eq!(face.kerning(a, v), -131.0);
}

#[test]
pub fn kerning_tightens_layout() {
    let font = test_font_without_kern_table();
    let options = LayoutOptions {
        kerning: true,
        letter_spacing: 0.0,
    };
    let unkerned = LayoutOptions {
        kerning: false,
        ..options
    };
    let kerned_width = layout::measure_line(&font, "AV", 2048.0, &options).unwrap();
    let plain_width = layout::measure_line(&font, "AV", 2048.0, &unkerned).unwrap();
    assert!((plain_width - kerned_width - 131.0).abs() < 1e-3);
}

#[test]
pub fn get_glyph_advance() {
    let font = test_font();
    let face = font.face().unwrap();
    let glyph = face.glyph_for_char('i').unwrap();
    assert_eq!(face.advance(glyph).unwrap(), font.advance(glyph).unwrap());
    assert!(face.advance(glyph).unwrap().x() > 0.0);
    assert_eq!(
        face.advance(60_000),
        Err(GlyphLoadingError::NoSuchGlyph(60_000))
    );
}

#[test]
pub fn letter_o_has_one_hole() {
    let font = test_font();
    let shapes = glyphs::shapes_for_text(&font, &TextSpec::new("O")).unwrap();
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].holes.len(), 1);

    let (outline, holes) = shapes[0].flatten(12);
    assert!(winding::signed_area(&outline) > 0.0);
    assert!(winding::signed_area(&holes[0]) < 0.0);
}

#[test]
pub fn inverted_holes_keep_every_contour() {
    let font = test_font();
    let normal = glyphs::shapes_for_text(&font, &TextSpec::new("O")).unwrap();
    let spec = TextSpec {
        invert_holes: true,
        ..TextSpec::new("O")
    };
    let inverted = glyphs::shapes_for_text(&font, &spec).unwrap();

    let count = |shapes: &[Shape]| -> usize {
        shapes.iter().map(|shape| shape.contour_count()).sum()
    };
    assert_eq!(count(&normal), count(&inverted));

    // The former counter is now the solid and the former outline the hole.
    let outer = normal[0].bounds().unwrap();
    let roles: Vec<ContourRole> = inverted[0].contours().map(|(role, _)| role).collect();
    assert_eq!(roles, vec![ContourRole::Solid, ContourRole::Hole]);
    assert!(inverted[0].bounds().unwrap().width() < outer.width());
    assert_eq!(inverted[0].holes[0].bounds(), normal[0].outline.bounds());
}

#[test]
pub fn inverting_twice_restores_roles() {
    let font = test_font();
    for text in &["O", "8", "®"] {
        let spec = TextSpec::new(*text);
        let normal = contour_roles(&glyphs::shapes_for_text(&font, &spec).unwrap());
        let inverted_spec = TextSpec {
            invert_holes: true,
            ..spec.clone()
        };
        let inverted = contour_roles(&glyphs::shapes_for_text(&font, &inverted_spec).unwrap());

        assert_eq!(normal.len(), inverted.len());
        for (&(bounds, role), &(inverted_bounds, inverted_role)) in normal.iter().zip(&inverted) {
            assert_eq!(bounds, inverted_bounds);
            assert_eq!(opposite(inverted_role), role);
        }
        let restored: Vec<_> = inverted
            .iter()
            .map(|&(bounds, role)| (bounds, opposite(role)))
            .collect();
        assert_eq!(restored, normal);
    }
}

#[test]
pub fn beveled_text_is_closed() {
    let font = test_font();
    for text in &["O", "e", "8", "@", "Hello, world"] {
        let shapes = glyphs::shapes_for_text(&font, &TextSpec::new(*text)).unwrap();
        let solid = extrude::extrude_shapes(&shapes, &ExtrudeSpec::default()).unwrap();

        // Weld coincident vertices, then every directed edge needs its reverse.
        let mut ids: HashMap<[u32; 3], usize> = HashMap::new();
        let welded: Vec<usize> = solid
            .positions()
            .iter()
            .map(|position| {
                let next = ids.len();
                *ids.entry(position.map(f32::to_bits)).or_insert(next)
            })
            .collect();
        let mut edges: HashSet<(usize, usize)> = HashSet::new();
        for triangle in solid.indices().chunks_exact(3) {
            for k in 0..3 {
                let from = welded[triangle[k] as usize];
                let to = welded[triangle[(k + 1) % 3] as usize];
                if from != to {
                    edges.insert((from, to));
                }
            }
        }
        let unmatched = edges
            .iter()
            .filter(|&&(from, to)| !edges.contains(&(to, from)))
            .count();
        assert_eq!(unmatched, 0, "open edges in {:?}", text);
    }
}

#[test]
pub fn nested_contours_alternate_roles() {
    let font = test_font();
    let shapes = glyphs::shapes_for_text(&font, &TextSpec::new("®")).unwrap();
    assert_eq!(shapes.len(), 2);
    assert!(shapes.iter().all(|shape| shape.holes.len() == 1));
}

#[test]
pub fn empty_text_has_no_shapes() {
    let font = test_font();
    let shapes = glyphs::shapes_for_text(&font, &TextSpec::new("")).unwrap();
    assert!(shapes.is_empty());
    let solid = solid::build_solid(&shapes, &ExtrudeSpec::default(), &SizingSpec::default());
    assert_eq!(solid, Ok(None));
}

#[test]
pub fn invalid_size_is_rejected() {
    let font = test_font();
    let spec = TextSpec {
        size: 0.0,
        ..TextSpec::new("A")
    };
    assert_eq!(
        glyphs::shapes_for_text(&font, &spec),
        Err(ConversionError::InvalidSize(0.0))
    );
}

#[test]
pub fn missing_characters_still_convert() {
    let font = test_font();
    assert!(glyphs::shapes_for_text(&font, &TextSpec::new("A中B")).is_ok());
}

#[test]
pub fn lines_stack_downward() {
    let font = test_font();
    assert!((glyphs::baseline_offset(1, 1.0, 1.2) + 1.2).abs() < 1e-6);

    let shapes = glyphs::shapes_for_text(&font, &TextSpec::new("AB\nCD")).unwrap();
    assert_eq!(shapes.len(), 4);
    let (first, second) = shapes.split_at(2);
    for shape in first {
        let bounds = shape.bounds().unwrap();
        assert!(bounds.min_y() > -0.05 && bounds.max_y() < 1.0);
    }
    for shape in second {
        let bounds = shape.bounds().unwrap();
        assert!(bounds.max_y() < -0.3 && bounds.min_y() > -1.3);
    }
}

#[test]
pub fn letter_spacing_widens_text() {
    let font = test_font();
    let width = |letter_spacing: f32| {
        let spec = TextSpec {
            letter_spacing,
            ..TextSpec::new("HH")
        };
        let shapes = glyphs::shapes_for_text(&font, &spec).unwrap();
        shapes[1].bounds().unwrap().min_x()
    };
    assert!((width(0.5) - width(0.0) - 0.5).abs() < 1e-4);
}

#[test]
pub fn solid_fits_target_width_and_is_centered() {
    let font = test_font();
    let shapes = glyphs::shapes_for_text(&font, &TextSpec::new("Hello, world")).unwrap();
    assert!(shapes.len() >= 10);

    let solid = solid::build_solid(&shapes, &ExtrudeSpec::default(), &SizingSpec::default())
        .unwrap()
        .unwrap();
    let bounds = solid.bounding_box().unwrap();
    let size = bounds.size();
    assert!((size.x - 8.0).abs() < 1e-3);
    assert!((size.z - 0.46).abs() < 1e-4);
    assert!(bounds.center().length() < 1e-3);
    assert_eq!(solid.normals().len(), solid.vertex_count());
    assert!(solid.indices().iter().all(|&index| (index as usize) < solid.vertex_count()));
}

#[test]
pub fn unlocked_thickness_scales_depth() {
    let font = test_font();
    let shapes = glyphs::shapes_for_text(&font, &TextSpec::new("Hi")).unwrap();
    let sizing = SizingSpec {
        target_length: Some(8.0),
        lock_thickness: false,
    };
    let unscaled = solid::build_solid(
        &shapes,
        &ExtrudeSpec::default(),
        &SizingSpec {
            target_length: None,
            ..sizing
        },
    )
    .unwrap()
    .unwrap();
    let scaled = solid::build_solid(&shapes, &ExtrudeSpec::default(), &sizing)
        .unwrap()
        .unwrap();

    let before = unscaled.bounding_box().unwrap().size();
    let after = scaled.bounding_box().unwrap().size();
    let factor = 8.0 / before.x;
    assert!((after.z - before.z * factor).abs() < 1e-3);
}

#[tokio::test]
pub async fn cache_loads_each_url_once() {
    let cache = FontCache::new(MockFetcher::font());
    let handle = Handle::from_url(TEST_FONT_URL);
    let first = cache.load(&handle).await.unwrap();
    let second = cache.load(&handle).await.unwrap();
    assert!(Arc::ptr_eq(
        &first.copy_font_data().unwrap(),
        &second.copy_font_data().unwrap()
    ));
    assert_eq!(cache.fetcher().calls(), 1);
    assert_eq!(cache.len(), 1);
    assert!(cache.contains(&handle.locator()));
}

#[tokio::test]
pub async fn html_error_page_is_not_cached() {
    let page = b"\n  <html><body>404 Not Found</body></html>".to_vec();
    let cache = FontCache::new(MockFetcher::serving(200, Some("text/html; charset=utf-8"), page));
    let handle = Handle::from_url(TEST_FONT_URL);

    for _ in 0..2 {
        match cache.load(&handle).await {
            Err(FontLoadingError::Format(FormatError::Markup(_))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
    assert_eq!(cache.fetcher().calls(), 2);
    assert!(cache.is_empty());
}

#[tokio::test]
pub async fn uploads_are_cached_under_their_own_locator() {
    let cache = FontCache::new(MockFetcher::serving(500, None, vec![]));
    let upload = Handle::from_upload("DejaVuSans.ttf", test_font_data());
    let other = Handle::from_upload("DejaVuSans.ttf", test_font_data());
    assert_ne!(upload.locator(), other.locator());

    cache.load(&upload).await.unwrap();
    assert!(cache.contains(&upload.locator()));
    assert!(!cache.contains(&other.locator()));
    assert_eq!(cache.fetcher().calls(), 0);
}

#[tokio::test]
pub async fn pipeline_builds_and_discards_stale_results() {
    let pipeline = Pipeline::new(FontCache::new(MockFetcher::font()));
    let mut request = Request::new(Handle::from_url(TEST_FONT_URL));
    let mut slot = SolidSlot::new();

    let ticket = pipeline.begin();
    let rebuild = pipeline.rebuild(ticket, &request).await.unwrap();
    assert!(slot.apply(rebuild));
    let installed = slot.get().unwrap().clone();

    request.text = TextSpec::new("Hired");
    let stale = pipeline.begin();
    let current = pipeline.begin();
    assert!(matches!(
        pipeline.rebuild(stale, &request).await,
        Ok(Rebuild::Stale)
    ));
    assert_eq!(slot.get(), Some(&installed));

    let rebuild = pipeline.rebuild(current, &request).await.unwrap();
    assert!(slot.apply(rebuild));
    assert_ne!(slot.get(), Some(&installed));
    assert_eq!(pipeline.cache().fetcher().calls(), 1);
}

#[tokio::test]
pub async fn pipeline_reports_font_errors() {
    let pipeline = Pipeline::new(FontCache::new(MockFetcher::serving(404, None, vec![])));
    let request = Request::new(Handle::from_url(TEST_FONT_URL));
    let ticket = pipeline.begin();
    match pipeline.rebuild(ticket, &request).await {
        Err(BuildError::Font(FontLoadingError::Fetch(FetchError::Status { status, .. }))) => {
            assert_eq!(status, 404)
        }
        other => panic!("unexpected result: {:?}", other),
    }
}
