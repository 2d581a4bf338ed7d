//! Batch status display.
//!
//! A single [`StatusRenderer`] task owns the output stream. Jobs never write
//! to it directly: they send `(slot, text)` updates through a cloneable
//! [`StatusHandle`], so concurrent updates can never interleave.
//!
//! In [`RenderMode::Ansi`] every batch slot keeps one line of a fixed-height
//! region and updates overwrite that line in place. [`RenderMode::Plain`]
//! appends one line per finished job, for logs and pipes.

mod renderer;

pub use renderer::{stdout_rows, RenderMode, StatusRenderer};

use tokio::sync::mpsc;

/// Initial text of every slot.
pub const PENDING_TEXT: &str = "⏳ Starting...";

/// Messages consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// Opens a region of `slots` lines.
    BeginBatch {
        index: usize,
        total_batches: usize,
        slots: usize,
    },
    /// Intermediate progress for a slot.
    Progress { slot: usize, text: String },
    /// Terminal line for a slot.
    Finished { slot: usize, text: String },
    EndBatch,
    /// Final marker after all batches, with a one-line summary.
    Finish { summary: String },
}

/// Cloneable sender side of the renderer.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    tx: Option<mpsc::UnboundedSender<StatusEvent>>,
}

impl StatusHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<StatusEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A handle that discards every event.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    fn send(&self, event: StatusEvent) {
        if let Some(tx) = &self.tx {
            // The renderer only stops after Finish or when the run is torn down
            let _ = tx.send(event);
        }
    }

    pub fn begin_batch(&self, index: usize, total_batches: usize, slots: usize) {
        self.send(StatusEvent::BeginBatch {
            index,
            total_batches,
            slots,
        });
    }

    pub fn end_batch(&self) {
        self.send(StatusEvent::EndBatch);
    }

    pub fn finish(&self, summary: impl Into<String>) {
        self.send(StatusEvent::Finish {
            summary: summary.into(),
        });
    }

    /// Reporter bound to one slot of the current batch.
    pub fn slot(&self, slot: usize, display_name: impl Into<String>) -> SlotReporter {
        SlotReporter {
            handle: self.clone(),
            slot,
            display_name: display_name.into(),
        }
    }
}

/// Writes one job's progress into its slot.
#[derive(Debug, Clone)]
pub struct SlotReporter {
    handle: StatusHandle,
    slot: usize,
    display_name: String,
}

impl SlotReporter {
    /// A reporter that goes nowhere.
    pub fn detached(display_name: impl Into<String>) -> Self {
        StatusHandle::disabled().slot(0, display_name)
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Shows `<file> → <text>` without ending the slot.
    pub fn progress(&self, text: &str) {
        self.handle.send(StatusEvent::Progress {
            slot: self.slot,
            text: format!("{} → {}", self.display_name, text),
        });
    }

    /// Sets the slot's terminal line, used verbatim.
    pub fn complete(&self, line: impl Into<String>) {
        self.handle.send(StatusEvent::Finished {
            slot: self.slot,
            text: line.into(),
        });
    }
}
