//! Scene Exporter - Standalone SVG Documents
//!
//! Serializes the primitive list of the last generated `Scene` into a
//! self-contained SVG document. Geometry is never re-derived here: the
//! document is exactly the scene it was given, in the same order.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::generator::{Primitive, Scene, Shape};
use crate::geometry::{Point, CANVAS_SIZE};
use crate::hashing::{compute_spec_hash, sha256_hex};
use crate::mandala::MandalaSpec;
use crate::ENGINE_VERSION;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
pub const SVG_MIME_TYPE: &str = "image/svg+xml";
pub const EXPORT_FILENAME: &str = "mandala.svg";

/// A finished standalone document ready for a save sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    bytes: Vec<u8>,
    filename: &'static str,
}

impl ExportDocument {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Suggested filename, always `mandala.svg`.
    pub fn filename(&self) -> &str {
        self.filename
    }

    pub fn mime_type(&self) -> &str {
        SVG_MIME_TYPE
    }

    /// The document as markup. Output is always built from `String`s.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// `data:` URI for hosts that hand the document to a browser link.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", SVG_MIME_TYPE, self.to_base64())
    }

    pub fn hash(&self) -> String {
        sha256_hex(&self.bytes)
    }
}

/// Export record for audit and reproduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportManifest {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub engine_version: String,
    pub spec: MandalaSpec,
    pub spec_hash: String,
    pub document_hash: String,
    pub filename: String,
    pub mime_type: String,
    pub primitive_count: usize,
}

impl ExportManifest {
    pub fn new(
        spec: &MandalaSpec,
        scene: &Scene,
        document: &ExportDocument,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            spec: spec.clone(),
            spec_hash: compute_spec_hash(spec)?,
            document_hash: document.hash(),
            filename: document.filename().to_string(),
            mime_type: document.mime_type().to_string(),
            primitive_count: scene.len(),
        })
    }
}

/// Serialize `scene` into a standalone SVG document.
pub fn export(scene: &Scene) -> ExportDocument {
    let mut svg = String::with_capacity(128 + scene.len() * 96);
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    svg.push_str(&format!(
        "<svg xmlns=\"{ns}\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\">\n",
        ns = SVG_NAMESPACE,
        size = CANVAS_SIZE,
    ));
    for primitive in scene {
        svg.push_str(&render_primitive(primitive));
    }
    svg.push_str("</svg>\n");

    let document = ExportDocument {
        bytes: svg.into_bytes(),
        filename: EXPORT_FILENAME,
    };
    info!(
        primitives = scene.len(),
        bytes = document.len(),
        "exported standalone document"
    );
    document
}

/// Export the most recent render, if any. No render means no document.
pub fn export_latest(scene: Option<&Scene>) -> Option<ExportDocument> {
    match scene {
        Some(scene) => Some(export(scene)),
        None => {
            info!("export requested before any render; nothing to do");
            None
        }
    }
}

/// One indented element line, newline-terminated.
fn render_primitive(primitive: &Primitive) -> String {
    match &primitive.shape {
        Shape::Wedge(w) => format!(
            "  <polygon points=\"{}\" fill=\"{}\" opacity=\"{}\"/>\n",
            format_points(&w.points()),
            escape_xml(&w.fill),
            format_number(w.opacity),
        ),
        Shape::Text(t) => format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\" opacity=\"{}\">{}</text>\n",
            format_number(t.anchor.x),
            format_number(t.anchor.y),
            escape_xml(&t.font_family),
            t.font_size,
            escape_xml(&t.fill),
            format_number(t.opacity),
            escape_xml(&t.content),
        ),
        Shape::Circle(c) => format!(
            "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" opacity=\"{}\"/>\n",
            format_number(c.center.x),
            format_number(c.center.y),
            format_number(c.radius),
            escape_xml(&c.fill),
            format_number(c.opacity),
        ),
    }
}

fn format_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", format_number(p.x), format_number(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shortest round-trip decimal; integral values carry no fraction.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Collapses -0 as well
        return "0".to_string();
    }
    format!("{}", value)
}

/// Escape text for use in both attribute values and character data.
pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
