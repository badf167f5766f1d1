use stacktimer_core::protocol::Channel;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// Identifies one acquisition of a periodic tick. Never reused.
pub type TickId = u64;

/// Host-provided periodic callbacks.
pub trait Scheduler {
    type Handle;

    /// Start delivering `id` every `interval`.
    fn schedule(&mut self, id: TickId, interval: Duration) -> Self::Handle;

    /// Stop the tick behind `handle`.
    fn cancel(&mut self, handle: Self::Handle);
}

/// The one periodic tick a widget may hold, task or break.
pub struct TickSlot<H> {
    held: Option<Held<H>>,
    next_id: TickId,
}

struct Held<H> {
    id: TickId,
    channel: Channel,
    handle: H,
}

impl<H> TickSlot<H> {
    pub fn new() -> Self {
        Self {
            held: None,
            next_id: 1,
        }
    }

    /// Release whatever is held, then schedule a fresh tick for `channel`.
    pub fn acquire<S>(&mut self, scheduler: &mut S, channel: Channel, interval: Duration) -> TickId
    where
        S: Scheduler<Handle = H>,
    {
        self.release(scheduler);
        let id = self.next_id;
        self.next_id += 1;
        let handle = scheduler.schedule(id, interval);
        debug!(id, ?channel, "tick acquired");
        self.held = Some(Held { id, channel, handle });
        id
    }

    /// Returns true if a tick was held.
    pub fn release<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: Scheduler<Handle = H>,
    {
        match self.held.take() {
            Some(held) => {
                debug!(id = held.id, channel = ?held.channel, "tick released");
                scheduler.cancel(held.handle);
                true
            }
            None => false,
        }
    }

    /// The channel `id` belongs to, if it is the tick currently held.
    pub fn accepts(&self, id: TickId) -> Option<Channel> {
        self.held
            .as_ref()
            .filter(|held| held.id == id)
            .map(|held| held.channel)
    }

    pub fn active(&self) -> Option<Channel> {
        self.held.as_ref().map(|held| held.channel)
    }
}

impl<H> Default for TickSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Ticks as tokio interval tasks feeding one channel.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TickId>,
}

impl TokioScheduler {
    pub fn new(tx: mpsc::UnboundedSender<TickId>) -> Self {
        Self { tx }
    }
}

impl Scheduler for TokioScheduler {
    type Handle = JoinHandle<()>;

    fn schedule(&mut self, id: TickId, interval: Duration) -> Self::Handle {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // First tick one full interval from now, not immediately.
            let mut ticks = time::interval_at(time::Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if tx.send(id).is_err() {
                    break;
                }
            }
        })
    }

    fn cancel(&mut self, handle: Self::Handle) {
        handle.abort();
    }
}
