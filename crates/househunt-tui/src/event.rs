//! Input pump: terminal events plus tick and render pulses, merged on a
//! background task and handed to the app loop over a channel.

use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Columns, rows.
    Resize(u16, u16),
    Tick,
    Render,
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    stop: CancellationToken,
}

impl EventReader {
    pub fn new(tick_every: Duration, frame_every: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = CancellationToken::new();
        tokio::spawn(pump(tx, stop.clone(), tick_every, frame_every));
        Self { rx, stop }
    }

    /// Yields `None` after [`stop`](Self::stop).
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.stop.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn pulse(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Key releases and repeats are dropped; only presses reach the app.
fn translate(event: TermEvent) -> Option<Event> {
    match event {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        TermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}

async fn pump(
    tx: mpsc::UnboundedSender<Event>,
    stop: CancellationToken,
    tick_every: Duration,
    frame_every: Duration,
) {
    let mut input = EventStream::new();
    let mut ticks = pulse(tick_every);
    let mut frames = pulse(frame_every);

    loop {
        let next = tokio::select! {
            () = stop.cancelled() => return,
            _ = ticks.tick() => Some(Event::Tick),
            _ = frames.tick() => Some(Event::Render),
            Some(read) = input.next() => read.ok().and_then(translate),
        };
        let Some(event) = next else { continue };
        if tx.send(event).is_err() {
            return;
        }
    }
}
