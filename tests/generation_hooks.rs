//! Export must serialize the existing scene, never regenerate it.
//!
//! Run with `--features test-hooks`.

#![cfg(feature = "test-hooks")]

use mandala_core::generator::{get_generation_call_count, reset_generation_call_count};
use mandala_core::{MandalaSpec, MemorySink, Studio};

#[test]
fn test_export_does_not_regenerate() {
    reset_generation_call_count();

    let mut studio = Studio::headless();
    studio.apply(MandalaSpec::default());
    studio.set_segments(20);
    assert_eq!(get_generation_call_count(), 2);

    let _ = studio.export();
    let mut sink = MemorySink::new();
    studio.export_to(&mut sink).unwrap();

    assert_eq!(get_generation_call_count(), 2);
}
