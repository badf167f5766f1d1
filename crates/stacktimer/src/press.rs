use stacktimer_core::protocol::Gesture;
use std::time::{Duration, Instant};
use tracing::debug;

/// Tells a tap from a sustained press on one button.
#[derive(Debug)]
pub struct HoldDetector {
    threshold: Duration,
    pressed_at: Option<Instant>,
}

impl HoldDetector {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            pressed_at: None,
        }
    }

    pub fn press(&mut self) {
        self.pressed_at = Some(Instant::now());
    }

    /// Finish a press. None if nothing was pressed (or the hold already fired).
    pub fn release(&mut self) -> Option<Gesture> {
        let started = self.pressed_at.take()?;
        let held = started.elapsed();
        let gesture = if held >= self.threshold {
            Gesture::Hold
        } else {
            Gesture::Tap
        };
        debug!(held_ms = held.as_millis() as u64, ?gesture, "press released");
        Some(gesture)
    }

    /// True once, when a press still in progress crosses the threshold.
    /// The eventual release is then ignored.
    pub fn check(&mut self) -> bool {
        match self.pressed_at {
            Some(started) if started.elapsed() >= self.threshold => {
                self.pressed_at = None;
                true
            }
            _ => false,
        }
    }

    /// When `check()` next needs to run, or None if nothing is pressed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pressed_at.map(|started| started + self.threshold)
    }

    pub fn cancel(&mut self) {
        self.pressed_at = None;
    }
}
