//! Resize/invalidation scheduler.
//!
//! Watches a set of measured cards and coalesces any burst of size-change
//! notifications into at most one recomputation per display frame. The
//! frame primitive is abstracted behind [`FramePump`] so a host can wire in
//! its own animation-frame facility; headless environments run without a
//! pump in a degraded mode that computes once, synchronously, at setup.

use std::collections::BTreeMap;

use crate::geometry::Rect;
use crate::measure::MeasureSource;

/// Opaque handle for one scheduled frame callback.
pub type FrameTicket = u64;

/// Deferred-work primitive: "run once at the next display refresh".
///
/// Scheduling returns a ticket; cancelling an already-fired or foreign
/// ticket is a no-op. The scheduler keeps at most one live ticket.
pub trait FramePump {
    fn schedule(&mut self) -> FrameTicket;
    fn cancel(&mut self, ticket: FrameTicket);
}

/// Hand-cranked pump for tests and non-interactive hosts: tickets queue up
/// and fire only when the owner calls [`ManualPump::take_due`].
#[derive(Debug, Default)]
pub struct ManualPump {
    next: FrameTicket,
    due: Option<FrameTicket>,
    scheduled: usize,
    cancelled: usize,
}

impl ManualPump {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket that should fire this frame, if any.
    pub fn take_due(&mut self) -> Option<FrameTicket> {
        self.due.take()
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }
}

impl FramePump for ManualPump {
    fn schedule(&mut self) -> FrameTicket {
        self.next += 1;
        self.due = Some(self.next);
        self.scheduled += 1;
        self.next
    }

    fn cancel(&mut self, ticket: FrameTicket) {
        if self.due == Some(ticket) {
            self.due = None;
        }
        self.cancelled += 1;
    }
}

/// Fresh measurements for every observed card, taken in one synchronous
/// pass so a recomputation never sees a torn mix of frames.
pub type MeasureSnapshot = BTreeMap<String, Option<Rect>>;

/// Coalescing recomputation driver over a [`MeasureSource`].
pub struct Scheduler<S, P, F>
where
    S: MeasureSource,
    P: FramePump,
    F: FnMut(&MeasureSnapshot),
{
    source: S,
    pump: Option<P>,
    observed: Vec<String>,
    pending: Option<FrameTicket>,
    fonts_seen: bool,
    recompute: F,
}

impl<S, P, F> Scheduler<S, P, F>
where
    S: MeasureSource,
    P: FramePump,
    F: FnMut(&MeasureSnapshot),
{
    /// Start observing `observed`. Without a pump the scheduler degrades to
    /// a single synchronous computation here and ignores later
    /// notifications; with one, an initial frame is scheduled so the first
    /// routes land before anything else happens.
    pub fn new(source: S, pump: Option<P>, observed: Vec<String>, recompute: F) -> Self {
        let mut scheduler = Self {
            source,
            pump,
            observed,
            pending: None,
            fonts_seen: false,
            recompute,
        };
        if scheduler.pump.is_some() {
            scheduler.invalidate();
        } else {
            scheduler.run();
        }
        scheduler
    }

    /// Size-change notification for one observed card.
    pub fn notify_resize(&mut self, id: &str) {
        if self.observed.iter().any(|observed| observed == id) {
            self.invalidate();
        }
    }

    /// The container itself changed size; everything is stale.
    pub fn notify_container(&mut self) {
        if !self.observed.is_empty() {
            self.invalidate();
        }
    }

    /// One-shot trigger after font loading settles, since text reflow can
    /// change card boxes after the first layout pass.
    pub fn fonts_ready(&mut self) {
        if !self.fonts_seen {
            self.fonts_seen = true;
            self.invalidate();
        }
    }

    /// Frame callback from the host. Stale tickets (superseded by a newer
    /// schedule or already detached) are ignored.
    pub fn frame(&mut self, ticket: FrameTicket) {
        if self.pending == Some(ticket) {
            self.pending = None;
            self.run();
        }
    }

    /// Stop observing and drop any pending frame. Idempotent; also runs on
    /// drop so an unmounted figure never recomputes again.
    pub fn detach(&mut self) {
        if let (Some(pump), Some(ticket)) = (self.pump.as_mut(), self.pending.take()) {
            pump.cancel(ticket);
        }
        self.observed.clear();
    }

    pub fn pump_mut(&mut self) -> Option<&mut P> {
        self.pump.as_mut()
    }

    fn invalidate(&mut self) {
        let Some(pump) = self.pump.as_mut() else {
            return;
        };
        if let Some(ticket) = self.pending.take() {
            pump.cancel(ticket);
        }
        self.pending = Some(pump.schedule());
    }

    fn run(&mut self) {
        let mut snapshot = MeasureSnapshot::new();
        for id in &self.observed {
            snapshot.insert(id.clone(), self.source.measure(id));
        }
        (self.recompute)(&snapshot);
    }
}

impl<S, P, F> Drop for Scheduler<S, P, F>
where
    S: MeasureSource,
    P: FramePump,
    F: FnMut(&MeasureSnapshot),
{
    fn drop(&mut self) {
        self.detach();
    }
}
