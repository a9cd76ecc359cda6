//! Pattern Generator - Spec In, Scene Out
//!
//! Pure and deterministic: the same `MandalaSpec` always yields the same
//! primitive sequence. Order is painter's order (later paints over earlier).

use serde::Serialize;
use tracing::debug;

use crate::geometry::{doubled_area, inner_radius, polar, Point, CENTER, OUTER_RADIUS};
use crate::mandala::{MandalaSpec, Symmetry, MIN_SEGMENTS};

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static GENERATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_generation_call_count() -> u32 {
    GENERATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_generation_call_count() {
    GENERATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

pub const OUTER_OPACITY: f64 = 0.8;
pub const INNER_OPACITY: f64 = 0.25;
pub const MIRROR_OUTER_OPACITY: f64 = 0.6;
pub const MIRROR_INNER_OPACITY: f64 = 0.15;

pub const WATERMARK_LABEL: &str = "MANDALA";
pub const WATERMARK_FONT_SIZE: u32 = 42;
pub const WATERMARK_OPACITY: f64 = 0.15;
pub const WATERMARK_FILL: &str = "#000000";
pub const WATERMARK_FONT_FAMILY: &str = "serif";

pub const CENTER_DOT_RADIUS: f64 = 6.0;
pub const CENTER_DOT_FILL: &str = "#ffffff";
pub const CENTER_DOT_OPACITY: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ring {
    Outer,
    Inner,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wedge {
    pub apex: Point,
    pub edge_start: Point,
    pub edge_end: Point,
    pub fill: String,
    pub opacity: f64,
    pub ring: Ring,
    pub mirrored: bool,
}

impl Wedge {
    pub fn points(&self) -> [Point; 3] {
        [self.apex, self.edge_start, self.edge_end]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub anchor: Point,
    pub content: String,
    pub font_size: u32,
    pub font_family: String,
    pub fill: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dot {
    pub center: Point,
    pub radius: f64,
    pub fill: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Wedge(Wedge),
    Text(Label),
    Circle(Dot),
}

/// A drawable primitive plus its synthetic redraw key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Primitive {
    pub key: String,
    #[serde(flatten)]
    pub shape: Shape,
}

impl Primitive {
    pub fn as_wedge(&self) -> Option<&Wedge> {
        match &self.shape {
            Shape::Wedge(w) => Some(w),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.shape, Shape::Text(_))
    }

    pub fn is_circle(&self) -> bool {
        matches!(self.shape, Shape::Circle(_))
    }
}

/// The full ordered primitive list for one generated pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    primitives: Vec<Primitive>,
}

impl Scene {
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn wedges(&self) -> impl Iterator<Item = &Wedge> {
        self.primitives.iter().filter_map(Primitive::as_wedge)
    }

    pub fn wedge_count(&self) -> usize {
        self.wedges().count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Primitive> {
        self.primitives.iter()
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a Primitive;
    type IntoIter = std::slice::Iter<'a, Primitive>;

    fn into_iter(self) -> Self::IntoIter {
        self.primitives.iter()
    }
}

struct RingSet {
    prefix: &'static str,
    direction: f64,
    outer_opacity: f64,
    inner_opacity: f64,
    mirrored: bool,
}

const PRIMARY: RingSet = RingSet {
    prefix: "",
    direction: 1.0,
    outer_opacity: OUTER_OPACITY,
    inner_opacity: INNER_OPACITY,
    mirrored: false,
};

// Reflection by angle negation: sweeps -i*step .. -(i+1)*step.
const MIRROR: RingSet = RingSet {
    prefix: "mirror-",
    direction: -1.0,
    outer_opacity: MIRROR_OUTER_OPACITY,
    inner_opacity: MIRROR_INNER_OPACITY,
    mirrored: true,
};

const RADIAL_SETS: &[RingSet] = &[PRIMARY];
const MIRROR_SETS: &[RingSet] = &[PRIMARY, MIRROR];

/// Generate the scene for `spec`.
///
/// Wedges come first (outer ring then inner ring, primary set then mirror
/// set), then the optional watermark, then the center dot, always last.
pub fn generate(spec: &MandalaSpec) -> Scene {
    #[cfg(feature = "test-hooks")]
    GENERATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

    let segments = spec.segments();
    // MandalaSpec clamps on construction; anything lower is a programming error.
    assert!(segments >= MIN_SEGMENTS, "segment count {} below minimum", segments);

    let sets = match spec.symmetry() {
        Symmetry::Radial => RADIAL_SETS,
        Symmetry::Mirror => MIRROR_SETS,
    };

    let capacity = sets.len() * 2 * segments as usize + 2;
    let mut primitives = Vec::with_capacity(capacity);

    for set in sets {
        emit_rings(&mut primitives, set, segments, spec.color().as_str());
    }

    if spec.show_watermark() {
        primitives.push(Primitive {
            key: "watermark".to_string(),
            shape: Shape::Text(Label {
                anchor: CENTER,
                content: WATERMARK_LABEL.to_string(),
                font_size: WATERMARK_FONT_SIZE,
                font_family: WATERMARK_FONT_FAMILY.to_string(),
                fill: WATERMARK_FILL.to_string(),
                opacity: WATERMARK_OPACITY,
            }),
        });
    }

    primitives.push(Primitive {
        key: "center-dot".to_string(),
        shape: Shape::Circle(Dot {
            center: CENTER,
            radius: CENTER_DOT_RADIUS,
            fill: CENTER_DOT_FILL.to_string(),
            opacity: CENTER_DOT_OPACITY,
        }),
    });

    debug!(
        segments,
        symmetry = ?spec.symmetry(),
        primitives = primitives.len(),
        "generated scene"
    );

    Scene { primitives }
}

fn emit_rings(out: &mut Vec<Primitive>, set: &RingSet, segments: u32, fill: &str) {
    let step = 360.0 / segments as f64;

    // Whole outer ring first, then the whole inner ring over it.
    for (ring, radius, opacity) in [
        (Ring::Outer, OUTER_RADIUS, set.outer_opacity),
        (Ring::Inner, inner_radius(), set.inner_opacity),
    ] {
        let ring_name = match ring {
            Ring::Outer => "outer",
            Ring::Inner => "inner",
        };
        for i in 0..segments {
            let start = set.direction * (i as f64 * step);
            let end = set.direction * ((i + 1) as f64 * step);
            let wedge = Wedge {
                apex: CENTER,
                edge_start: polar(start, radius),
                edge_end: polar(end, radius),
                fill: fill.to_string(),
                opacity,
                ring,
                mirrored: set.mirrored,
            };
            debug_assert!(
                doubled_area(wedge.apex, wedge.edge_start, wedge.edge_end).abs() > f64::EPSILON,
                "degenerate wedge at segment {}",
                i
            );
            out.push(Primitive {
                key: format!("{}{}-{}", set.prefix, ring_name, i),
                shape: Shape::Wedge(wedge),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mandala::HexColor;

    fn spec(segments: i64, symmetry: Symmetry, watermark: bool) -> MandalaSpec {
        MandalaSpec::new(segments, symmetry, HexColor::default(), watermark)
    }

    #[test]
    fn test_radial_cardinality() {
        let scene = generate(&spec(12, Symmetry::Radial, true));
        assert_eq!(scene.wedge_count(), 24);
        assert_eq!(scene.len(), 26);
    }

    #[test]
    fn test_mirror_cardinality() {
        let scene = generate(&spec(12, Symmetry::Mirror, true));
        assert_eq!(scene.wedge_count(), 48);
        assert_eq!(scene.len(), 50);
    }

    #[test]
    fn test_no_watermark_drops_text() {
        let scene = generate(&spec(5, Symmetry::Radial, false));
        assert_eq!(scene.len(), 11);
        assert!(!scene.iter().any(Primitive::is_text));
    }

    #[test]
    fn test_first_outer_wedge_geometry() {
        let scene = generate(&spec(4, Symmetry::Radial, false));
        let first = scene.primitives()[0].as_wedge().unwrap();
        assert_eq!(first.ring, Ring::Outer);
        assert_eq!(first.apex, CENTER);
        assert_eq!(first.edge_start, Point::new(350.0, 210.0));
        assert!((first.edge_end.x - 210.0).abs() < 1e-9);
        assert!((first.edge_end.y - 350.0).abs() < 1e-9);
        assert_eq!(first.opacity, 0.8);
    }

    #[test]
    fn test_inner_ring_follows_whole_outer_ring() {
        let scene = generate(&spec(3, Symmetry::Radial, false));
        let keys: Vec<_> = scene.iter().take(6).map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["outer-0", "outer-1", "outer-2", "inner-0", "inner-1", "inner-2"]);
        let rings: Vec<_> = scene.wedges().map(|w| w.ring).collect();
        assert!(rings[..3].iter().all(|r| *r == Ring::Outer));
        assert!(rings[3..].iter().all(|r| *r == Ring::Inner));
        let inner = scene.primitives()[3].as_wedge().unwrap();
        assert_eq!(inner.opacity, 0.25);
        assert!((inner.edge_start.x - (210.0 + 84.0)).abs() < 1e-9);
    }

    #[test]
    fn test_mirror_set_sweeps_negative_angles() {
        let scene = generate(&spec(4, Symmetry::Mirror, false));
        let mirror = scene.primitives()[8].as_wedge().unwrap();
        assert_eq!(scene.primitives()[8].key, "mirror-outer-0");
        assert!(mirror.mirrored);
        assert_eq!(mirror.opacity, 0.6);
        // -90 degrees points up on screen
        assert!((mirror.edge_end.x - 210.0).abs() < 1e-9);
        assert!((mirror.edge_end.y - 70.0).abs() < 1e-9);
        assert_eq!(scene.primitives()[12].key, "mirror-inner-0");
        let mirror_inner = scene.primitives()[12].as_wedge().unwrap();
        assert_eq!(mirror_inner.opacity, 0.15);
    }

    #[test]
    fn test_center_dot_last() {
        for symmetry in [Symmetry::Radial, Symmetry::Mirror] {
            let scene = generate(&spec(7, symmetry, true));
            let last = scene.primitives().last().unwrap();
            assert_eq!(last.key, "center-dot");
            assert!(last.is_circle());
            assert!(scene.primitives()[scene.len() - 2].is_text());
        }
    }

    #[test]
    fn test_fill_uses_spec_color() {
        let spec = MandalaSpec::new(3, Symmetry::Radial, HexColor::parse("#00ff00").unwrap(), false);
        let scene = generate(&spec);
        assert!(scene.wedges().all(|w| w.fill == "#00ff00"));
    }
}
