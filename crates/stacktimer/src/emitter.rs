use crate::widget::Action;
use anyhow::{Context, Result};
use stacktimer_core::protocol::{self, Event, Snapshot};
use std::io::Write;

/// Writes protocol events as JSON lines, skipping unchanged snapshots.
pub struct Emitter<W: Write> {
    out: W,
    last: Option<Snapshot>,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn send(&mut self, event: &Event) -> Result<()> {
        let line = protocol::encode(event).context("encoding event")?;
        self.out
            .write_all(line.as_bytes())
            .context("writing event")?;
        self.out.flush().context("flushing events")
    }

    pub fn actions(&mut self, actions: Vec<Action>) -> Result<()> {
        for action in actions {
            let event = match action {
                Action::Feedback(kind) => Event::Feedback { kind },
                Action::Completed(channel) => Event::Completed { channel },
            };
            self.send(&event)?;
        }
        Ok(())
    }

    /// Emit `snapshot` if it differs from the last one sent, or if forced.
    pub fn state(&mut self, snapshot: Snapshot, force: bool) -> Result<()> {
        if !force && self.last.as_ref() == Some(&snapshot) {
            return Ok(());
        }
        self.send(&Event::State(snapshot.clone()))?;
        self.last = Some(snapshot);
        Ok(())
    }

    pub fn ack(&mut self, ok: bool, message: impl Into<String>) -> Result<()> {
        self.send(&Event::Ack {
            ok,
            message: message.into(),
        })
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}
