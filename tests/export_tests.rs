//! Export and hand-off tests: standalone documents and paired staging.

use mandala_core::{
    deliver, export, generate, Delivery, DirectorySink, ExportDocument, ExportManifest, MandalaSpec,
    SaveSink, Shape, SinkError, Studio, Symmetry,
};
use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

fn element_names(document: &ExportDocument) -> Vec<&str> {
    document
        .as_str()
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix('<'))
        .filter(|rest| !rest.starts_with('?') && !rest.starts_with('/'))
        .filter_map(|rest| rest.split([' ', '>']).next())
        .collect()
}

#[test]
fn test_document_order_matches_scene() {
    let scene = generate(&MandalaSpec::default().with_symmetry(Symmetry::Mirror));
    let document = export(&scene);

    let expected: Vec<&str> = std::iter::once("svg")
        .chain(scene.iter().map(|p| match p.shape {
            Shape::Wedge(_) => "polygon",
            Shape::Text(_) => "text",
            Shape::Circle(_) => "circle",
        }))
        .collect();
    assert_eq!(element_names(&document), expected);
}

#[test]
fn test_document_is_standalone() {
    let document = export(&generate(&MandalaSpec::default()));
    let text = document.as_str();
    assert!(text.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    assert!(!text.contains("href"));
    assert!(!text.contains("<style"));
    assert!(!text.contains("url("));
    assert!(text.contains(r#"font-family="serif""#));
    assert!(text.contains(">MANDALA</text>"));
    assert_eq!(text.matches("<svg ").count(), 1);
}

#[test]
fn test_watermark_and_dot_markup() {
    let document = export(&generate(&MandalaSpec::default()));
    let lines: Vec<_> = document.as_str().lines().collect();
    let n = lines.len();
    assert_eq!(lines[n - 1], "</svg>");
    assert_eq!(
        lines[n - 2],
        r##"  <circle cx="210" cy="210" r="6" fill="#ffffff" opacity="0.4"/>"##
    );
    assert_eq!(
        lines[n - 3],
        r##"  <text x="210" y="210" text-anchor="middle" dominant-baseline="middle" font-family="serif" font-size="42" fill="#000000" opacity="0.15">MANDALA</text>"##
    );
}

#[test]
fn test_studio_exports_what_is_on_screen() {
    let mut studio = Studio::headless();
    studio.set_segments(5);
    let on_screen = studio.scene().cloned().unwrap();
    let document = studio.export().unwrap();
    assert_eq!(document, export(&on_screen));

    studio.set_symmetry(Symmetry::Mirror);
    let after_edit = studio.export().unwrap();
    assert_ne!(document, after_edit);
    assert_eq!(after_edit.as_str().matches("<polygon ").count(), 20);
}

#[test]
fn test_manifest_hashes() {
    let spec = MandalaSpec::default();
    let scene = generate(&spec);
    let document = export(&scene);
    let a = ExportManifest::new(&spec, &scene, &document).unwrap();
    let b = ExportManifest::new(&spec, &scene, &document).unwrap();

    assert_eq!(a.spec_hash, b.spec_hash);
    assert_eq!(a.document_hash, b.document_hash);
    assert_ne!(a.id, b.id);
    assert_eq!(a.document_hash.len(), 64);
    assert_eq!(a.primitive_count, 26);
    assert_eq!(a.filename, "mandala.svg");
    assert_eq!(a.mime_type, "image/svg+xml");
}

#[test]
fn test_directory_sink_writes_file_and_cleans_staging() {
    let dir = tempfile::tempdir().unwrap();
    let document = export(&generate(&MandalaSpec::default()));
    let mut sink = DirectorySink::new(dir.path());

    assert_eq!(deliver(Some(&document), &mut sink).unwrap(), Delivery::Triggered);

    let written = std::fs::read(dir.path().join("mandala.svg")).unwrap();
    assert_eq!(written, document.bytes());
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1, "staged temp file must be removed");
}

#[test]
fn test_directory_sink_replaces_target_instead_of_rewriting_it() {
    let dir = tempfile::tempdir().unwrap();
    let keep = dir.path().join("keep.svg");
    std::fs::write(&keep, b"ORIGINAL").unwrap();
    std::fs::hard_link(&keep, dir.path().join("mandala.svg")).unwrap();

    let document = export(&generate(&MandalaSpec::default()));
    let mut sink = DirectorySink::new(dir.path());
    assert_eq!(deliver(Some(&document), &mut sink).unwrap(), Delivery::Triggered);

    // The old inode is left alone; the target name now points at the new file
    assert_eq!(std::fs::read(&keep).unwrap(), b"ORIGINAL");
    assert_eq!(std::fs::read(dir.path().join("mandala.svg")).unwrap(), document.bytes());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_directory_sink_failed_trigger_leaves_target_untouched() {
    let dir = tempfile::tempdir().unwrap();
    // A non-empty directory at the target name cannot be replaced by a file
    let blocker = dir.path().join("mandala.svg");
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("inner.txt"), b"ORIGINAL").unwrap();

    let document = export(&generate(&MandalaSpec::default()));
    let mut sink = DirectorySink::new(dir.path());
    let err = deliver(Some(&document), &mut sink).unwrap_err();

    assert!(matches!(err, SinkError::Trigger(_)));
    assert!(blocker.is_dir());
    assert_eq!(std::fs::read(blocker.join("inner.txt")).unwrap(), b"ORIGINAL");
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1, "staged temp file must be removed after a failed save");
}

#[test]
fn test_directory_sink_untouched_without_render() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out");
    let mut sink = DirectorySink::new(&target);

    assert_eq!(Studio::headless().export_to(&mut sink).unwrap(), Delivery::Skipped);
    assert!(!target.exists());
}

struct PanickingSink {
    revoked: Rc<RefCell<Vec<u32>>>,
}

impl SaveSink for PanickingSink {
    type Handle = u32;

    fn stage(&mut self, _document: &ExportDocument) -> Result<u32, SinkError> {
        Ok(7)
    }

    fn trigger(&mut self, _handle: &mut u32, _filename: &str) -> Result<(), SinkError> {
        panic!("save dialog crashed");
    }

    fn revoke(&mut self, handle: &mut u32) {
        self.revoked.borrow_mut().push(*handle);
    }
}

#[test]
fn test_panicking_trigger_still_revokes() {
    let revoked = Rc::new(RefCell::new(vec![]));
    let mut sink = PanickingSink { revoked: Rc::clone(&revoked) };
    let document = export(&generate(&MandalaSpec::default()));

    let result = catch_unwind(AssertUnwindSafe(|| deliver(Some(&document), &mut sink)));

    assert!(result.is_err());
    assert_eq!(*revoked.borrow(), vec![7]);
}
