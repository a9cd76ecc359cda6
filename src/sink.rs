//! Save Sinks - Handing Documents Off
//!
//! The exporter's guarantee ends at a correct document. A sink decides how
//! the bytes reach the user. Staging resources are always paired: every
//! `stage` is followed by exactly one `revoke`, even when `trigger` fails
//! or panics.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::export::ExportDocument;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Staging failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Save trigger failed: {0}")]
    Trigger(String),
}

/// Destination for exported documents.
pub trait SaveSink {
    /// Transient resource holding the staged bytes.
    type Handle;

    fn stage(&mut self, document: &ExportDocument) -> Result<Self::Handle, SinkError>;

    /// Fire the save. Completion is not awaited.
    fn trigger(&mut self, handle: &mut Self::Handle, filename: &str) -> Result<(), SinkError>;

    /// Release whatever `handle` still holds. Called exactly once per `stage`.
    fn revoke(&mut self, handle: &mut Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Nothing had been rendered; the sink was not touched.
    Skipped,
    Triggered,
}

struct Staged<'a, S: SaveSink> {
    sink: &'a mut S,
    handle: S::Handle,
}

impl<S: SaveSink> Staged<'_, S> {
    fn trigger(&mut self, filename: &str) -> Result<(), SinkError> {
        self.sink.trigger(&mut self.handle, filename)
    }
}

impl<S: SaveSink> Drop for Staged<'_, S> {
    fn drop(&mut self) {
        self.sink.revoke(&mut self.handle);
        debug!("staging resource released");
    }
}

/// Stage, trigger and release. `None` is a no-op that never calls the sink.
pub fn deliver<S: SaveSink>(
    document: Option<&ExportDocument>,
    sink: &mut S,
) -> Result<Delivery, SinkError> {
    let Some(document) = document else {
        info!("no document to deliver; sink not invoked");
        return Ok(Delivery::Skipped);
    };

    let handle = sink.stage(document)?;
    let mut staged = Staged { sink, handle };

    if let Err(e) = staged.trigger(document.filename()) {
        warn!(error = %e, "save trigger failed");
        return Err(e);
    }

    info!(filename = document.filename(), bytes = document.len(), "document handed to sink");
    Ok(Delivery::Triggered)
}

/// Writes documents into a directory via a temp file in the same directory.
///
/// The staged file is renamed over the target, so the target is either the
/// previous file or the complete new document, never a partial write.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn target(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl SaveSink for DirectorySink {
    /// `None` once the staged file has been persisted as the target.
    type Handle = Option<NamedTempFile>;

    fn stage(&mut self, document: &ExportDocument) -> Result<Self::Handle, SinkError> {
        fs::create_dir_all(&self.dir)?;
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(document.bytes())?;
        staged.as_file().sync_all()?;
        Ok(Some(staged))
    }

    fn trigger(&mut self, handle: &mut Self::Handle, filename: &str) -> Result<(), SinkError> {
        let staged = handle
            .take()
            .ok_or_else(|| SinkError::Trigger("staged file already persisted".into()))?;
        let target = self.target(filename);
        if let Err(e) = staged.persist(&target) {
            // Hand the temp file back so revoke removes it.
            *handle = Some(e.file);
            return Err(SinkError::Trigger(format!("{}: {}", target.display(), e.error)));
        }
        Ok(())
    }

    fn revoke(&mut self, handle: &mut Self::Handle) {
        if let Some(staged) = handle.take() {
            if let Err(e) = staged.close() {
                warn!(error = %e, "failed to remove staged file");
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Staged(usize),
    Triggered { handle: usize, filename: String, bytes: Vec<u8> },
    Revoked(usize),
}

/// In-memory sink that records every call.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Vec<SinkEvent>,
    next_handle: usize,
    fail_trigger: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose trigger step always fails.
    pub fn failing() -> Self {
        Self { fail_trigger: true, ..Self::default() }
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    pub fn saved(&self) -> Vec<(&str, &[u8])> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Triggered { filename, bytes, .. } => Some((filename.as_str(), bytes.as_slice())),
                _ => None,
            })
            .collect()
    }

    /// Staged handles not yet revoked.
    pub fn outstanding(&self) -> usize {
        let staged = self.events.iter().filter(|e| matches!(e, SinkEvent::Staged(_))).count();
        let revoked = self.events.iter().filter(|e| matches!(e, SinkEvent::Revoked(_))).count();
        staged - revoked
    }
}

impl SaveSink for MemorySink {
    type Handle = (usize, Vec<u8>);

    fn stage(&mut self, document: &ExportDocument) -> Result<Self::Handle, SinkError> {
        let id = self.next_handle;
        self.next_handle += 1;
        self.events.push(SinkEvent::Staged(id));
        Ok((id, document.bytes().to_vec()))
    }

    fn trigger(&mut self, handle: &mut Self::Handle, filename: &str) -> Result<(), SinkError> {
        if self.fail_trigger {
            return Err(SinkError::Trigger("trigger refused".into()));
        }
        self.events.push(SinkEvent::Triggered {
            handle: handle.0,
            filename: filename.to_string(),
            bytes: handle.1.clone(),
        });
        Ok(())
    }

    fn revoke(&mut self, handle: &mut Self::Handle) {
        self.events.push(SinkEvent::Revoked(handle.0));
    }
}
