//! Studio - The Rendering Adapter
//!
//! Holds the active spec and the scene generated from it. Every edit
//! replaces the parameters and regenerates synchronously; export always reads the
//! scene currently on screen, never a recomputation.

use tracing::{debug, warn};

use crate::export::{export_latest, ExportDocument};
use crate::generator::{generate, Primitive, Scene};
use crate::mandala::{HexColor, MandalaSpec, Symmetry};
use crate::presets::Preset;
use crate::sink::{deliver, Delivery, SaveSink, SinkError};

/// Anything that can draw primitives in painter's order.
pub trait RenderSurface {
    fn draw(&mut self, primitives: &[Primitive]);
}

/// Surface that draws nothing. Used when only export matters.
#[derive(Debug, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn draw(&mut self, _primitives: &[Primitive]) {}
}

pub struct Studio<R: RenderSurface = NullSurface> {
    spec: MandalaSpec,
    scene: Option<Scene>,
    surface: R,
}

impl Studio<NullSurface> {
    pub fn headless() -> Self {
        Self::new(NullSurface)
    }
}

impl<R: RenderSurface> Studio<R> {
    /// A studio with the default spec and nothing rendered yet.
    pub fn new(surface: R) -> Self {
        Self {
            spec: MandalaSpec::default(),
            scene: None,
            surface,
        }
    }

    pub fn spec(&self) -> &MandalaSpec {
        &self.spec
    }

    /// The scene on screen, if anything has been rendered.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    /// Replace the spec and redraw.
    pub fn apply(&mut self, spec: MandalaSpec) -> &Scene {
        self.spec = spec;
        self.render()
    }

    /// Generate from the current spec and push it to the surface.
    pub fn render(&mut self) -> &Scene {
        let scene = generate(&self.spec);
        self.surface.draw(scene.primitives());
        debug!(primitives = scene.len(), "scene drawn");
        self.scene.insert(scene)
    }

    pub fn set_segments(&mut self, segments: i64) -> &Scene {
        let spec = self.spec.with_segments(segments);
        self.apply(spec)
    }

    pub fn set_symmetry(&mut self, symmetry: Symmetry) -> &Scene {
        let spec = self.spec.with_symmetry(symmetry);
        self.apply(spec)
    }

    /// Invalid hex keeps the previous color; the scene is still redrawn.
    pub fn set_color(&mut self, raw: &str) -> &Scene {
        let spec = match HexColor::parse(raw) {
            Ok(color) => self.spec.with_color(color),
            Err(e) => {
                warn!(error = %e, "ignoring color edit");
                self.spec.clone()
            }
        };
        self.apply(spec)
    }

    pub fn set_watermark(&mut self, show: bool) -> &Scene {
        let spec = self.spec.with_watermark(show);
        self.apply(spec)
    }

    pub fn toggle_watermark(&mut self) -> &Scene {
        let show = !self.spec.show_watermark();
        self.set_watermark(show)
    }

    pub fn apply_preset(&mut self, preset: &Preset) -> &Scene {
        self.apply(preset.spec.clone())
    }

    /// Serialize what is on screen; `None` before the first render.
    pub fn export(&self) -> Option<ExportDocument> {
        export_latest(self.scene.as_ref())
    }

    /// Export and hand off to `sink`. Before the first render the sink is not touched.
    pub fn export_to<S: SaveSink>(&self, sink: &mut S) -> Result<Delivery, SinkError> {
        let document = self.export();
        deliver(document.as_ref(), sink)
    }
}
