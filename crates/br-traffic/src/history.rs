//! Tick-aligned result history with placeholders for ungated ticks.

use std::collections::BTreeSet;

use br_core::Tick;

/// One slot per tick, `None` where no result was produced.
///
/// The slot index is the tick, so `len()` is always the next tick expected.
/// Lookups that want the most recent real result go through
/// [`latest_at`](Self::latest_at).
#[derive(Clone, Debug)]
pub struct History<T> {
    slots:    Vec<Option<T>>,
    recorded: BTreeSet<Tick>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self { slots: Vec::new(), recorded: BTreeSet::new() }
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` for the next tick and return that tick.
    pub fn record(&mut self, value: T) -> Tick {
        let tick = self.next_tick();
        self.slots.push(Some(value));
        self.recorded.insert(tick);
        tick
    }

    /// Append an empty slot for the next tick and return that tick.
    pub fn skip(&mut self) -> Tick {
        let tick = self.next_tick();
        self.slots.push(None);
        tick
    }

    pub fn next_tick(&self) -> Tick {
        Tick(self.slots.len() as u64)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The result stored for exactly `tick`.
    pub fn get(&self, tick: Tick) -> Option<&T> {
        self.slots.get(tick.index()).and_then(Option::as_ref)
    }

    /// The most recent real result at or before `tick`.
    pub fn latest_at(&self, tick: Tick) -> Option<(Tick, &T)> {
        let t = *self.recorded.range(..=tick).next_back()?;
        self.get(t).map(|v| (t, v))
    }

    /// The tick-0 result.
    pub fn baseline(&self) -> Option<&T> {
        self.get(Tick::ZERO)
    }

    /// The value of the last slot; `None` when it is a placeholder.
    pub fn last_slot(&self) -> Option<&T> {
        self.slots.last().and_then(Option::as_ref)
    }

    pub fn recorded_ticks(&self) -> impl Iterator<Item = Tick> + '_ {
        self.recorded.iter().copied()
    }
}
