//! The single owner of the status output.

use crossterm::cursor::{MoveToNextLine, MoveToPreviousLine};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, IsTerminal, Write};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{StatusEvent, StatusHandle, PENDING_TEXT};
use crate::config::StatusMode;

/// How slot updates reach the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Fixed-height region, lines overwritten in place.
    Ansi,
    /// Header, one line per finished job, footer.
    Plain,
}

impl RenderMode {
    /// Resolves `auto` against whether stdout is a terminal.
    pub fn for_stdout(mode: StatusMode) -> Self {
        match mode {
            StatusMode::Ansi => Self::Ansi,
            StatusMode::Plain => Self::Plain,
            StatusMode::Auto => {
                if io::stdout().is_terminal() {
                    Self::Ansi
                } else {
                    Self::Plain
                }
            }
        }
    }
}

/// Height of the terminal on stdout, `None` when stdout is not one.
pub fn stdout_rows() -> Option<u16> {
    if !io::stdout().is_terminal() {
        return None;
    }
    crossterm::terminal::size().ok().map(|(_, rows)| rows)
}

/// Renders [`StatusEvent`]s onto a writer.
///
/// In [`RenderMode::Ansi`] the cursor moves by relative rows, so nothing else
/// may write to the same terminal while a batch is on screen, and the region
/// has to fit in it. A batch with more slots than the terminal has rows is
/// rendered plain.
pub struct StatusRenderer<W> {
    out: W,
    mode: RenderMode,
    /// Mode of the batch on screen.
    batch_mode: RenderMode,
    terminal_rows: Option<u16>,
    lines: Vec<String>,
}

impl<W: Write + Send + 'static> StatusRenderer<W> {
    pub fn new(out: W, mode: RenderMode) -> Self {
        Self {
            out,
            mode,
            batch_mode: mode,
            terminal_rows: None,
            lines: Vec::new(),
        }
    }

    /// Height of the terminal `out` draws on, when known.
    pub fn with_terminal_rows(mut self, rows: Option<u16>) -> Self {
        self.terminal_rows = rows;
        self
    }

    /// Moves the renderer into its own task.
    ///
    /// The task ends after [`StatusEvent::Finish`] or once every handle is
    /// dropped, and yields the writer back.
    pub fn spawn(self) -> (StatusHandle, JoinHandle<W>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            let mut renderer = self;
            while let Some(event) = rx.recv().await {
                let last = matches!(event, StatusEvent::Finish { .. });
                if let Err(e) = renderer.apply(&event) {
                    debug!(error = %e, "Status write failed");
                }
                if last {
                    break;
                }
            }
            renderer.out
        });
        (StatusHandle::new(tx), task)
    }

    /// Applies one event and flushes.
    pub fn apply(&mut self, event: &StatusEvent) -> io::Result<()> {
        match event {
            StatusEvent::BeginBatch {
                index,
                total_batches,
                slots,
            } => {
                self.lines = vec![PENDING_TEXT.to_string(); *slots];
                self.batch_mode = self.mode_for(*slots);
                if *total_batches > 1 {
                    writeln!(
                        self.out,
                        "🎶 Processing {} files (batch {}/{})...",
                        slots,
                        index + 1,
                        total_batches
                    )?;
                } else {
                    writeln!(self.out, "🎶 Processing {} files...", slots)?;
                }
                if self.batch_mode == RenderMode::Ansi {
                    for line in &self.lines {
                        writeln!(self.out, "{}", line)?;
                    }
                }
            }
            StatusEvent::Progress { slot, text } => {
                if self.set_line(*slot, text) && self.batch_mode == RenderMode::Ansi {
                    self.redraw(*slot)?;
                }
            }
            StatusEvent::Finished { slot, text } => {
                if self.set_line(*slot, text) {
                    match self.batch_mode {
                        RenderMode::Ansi => self.redraw(*slot)?,
                        RenderMode::Plain => writeln!(self.out, "{}", text)?,
                    }
                }
            }
            StatusEvent::EndBatch => {
                self.lines.clear();
                writeln!(self.out, "\n✅ Batch complete")?;
            }
            StatusEvent::Finish { summary } => {
                writeln!(self.out, "\n🎉 All files processed.")?;
                if !summary.is_empty() {
                    writeln!(self.out, "{}", summary)?;
                }
            }
        }
        self.out.flush()
    }

    // The region plus the cursor row below it must fit on screen
    fn mode_for(&self, slots: usize) -> RenderMode {
        match (self.mode, self.terminal_rows) {
            (RenderMode::Ansi, Some(rows)) if slots >= usize::from(rows) => {
                debug!(slots, rows, "Batch taller than terminal, rendering plain");
                RenderMode::Plain
            }
            (mode, _) => mode,
        }
    }

    fn set_line(&mut self, slot: usize, text: &str) -> bool {
        match self.lines.get_mut(slot) {
            Some(line) => {
                *line = text.to_string();
                true
            }
            None => {
                debug!(slot, "Update for unknown slot dropped");
                false
            }
        }
    }

    // Cursor rests on the line below the region between updates
    fn redraw(&mut self, slot: usize) -> io::Result<()> {
        let distance = u16::try_from(self.lines.len() - slot).unwrap_or(u16::MAX);
        let line = self.lines[slot].clone();
        queue!(
            self.out,
            MoveToPreviousLine(distance),
            Clear(ClearType::CurrentLine),
            Print(line),
            MoveToNextLine(distance)
        )
    }
}
