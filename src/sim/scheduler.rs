//! Pull-based spawn scheduler
//!
//! The tick asks the scheduler what is due; nothing here runs on timers.
//! Specs fire in trigger order, each at most once per `schedule` call.

use serde::{Deserialize, Serialize};

use super::spawn::{SpawnSpec, sort_by_trigger};

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SchedulerState {
    /// Nothing pending
    #[default]
    Idle,
    /// Loaded, nothing fired yet
    Scheduled,
    /// At least one spec fired, more pending
    Draining,
}

/// Outcome of one scheduler tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerTick {
    pub spawned: usize,
    /// Due specs that found no free pool slot
    pub dropped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    specs: Vec<SpawnSpec>,
    cursor: usize,
    clock_origin_ms: f64,
    state: SchedulerState,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the schedule. Any pending specs of the old one are discarded.
    pub fn schedule(&mut self, mut specs: Vec<SpawnSpec>, clock_origin_ms: f64) {
        if self.has_pending() {
            self.cancel();
        }
        sort_by_trigger(&mut specs);
        self.specs = specs;
        self.cursor = 0;
        self.clock_origin_ms = clock_origin_ms;
        self.state = if self.specs.is_empty() {
            SchedulerState::Idle
        } else {
            SchedulerState::Scheduled
        };
        log::info!("Scheduled {} spawns at t={:.0}ms", self.specs.len(), clock_origin_ms);
    }

    /// Drop every un-fired spec. Already spawned entities are untouched.
    pub fn cancel(&mut self) {
        let discarded = self.pending();
        if discarded > 0 {
            log::info!("Cancelled schedule with {} spawns pending", discarded);
        }
        self.specs.clear();
        self.cursor = 0;
        self.state = SchedulerState::Idle;
    }

    /// Fire every spec whose trigger time is at or before `now_ms`
    ///
    /// `activate` materializes one spec and reports whether a pool slot was
    /// available. The cursor advances either way; dropped spawns are not
    /// retried.
    pub fn tick(&mut self, now_ms: f64, mut activate: impl FnMut(&SpawnSpec) -> bool) -> SchedulerTick {
        let mut result = SchedulerTick::default();
        let elapsed = now_ms - self.clock_origin_ms;
        while let Some(spec) = self.specs.get(self.cursor) {
            if spec.trigger_time_ms > elapsed {
                break;
            }
            if activate(spec) {
                result.spawned += 1;
            } else {
                result.dropped += 1;
            }
            self.cursor += 1;
        }

        if result.spawned + result.dropped > 0 {
            self.state = if self.has_pending() {
                SchedulerState::Draining
            } else {
                SchedulerState::Idle
            };
        }
        result
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn pending(&self) -> usize {
        self.specs.len() - self.cursor
    }

    pub fn has_pending(&self) -> bool {
        self.cursor < self.specs.len()
    }

    pub fn clock_origin_ms(&self) -> f64 {
        self.clock_origin_ms
    }

    /// Trigger time of the next pending spec, relative to the origin
    pub fn next_trigger_ms(&self) -> Option<f64> {
        self.specs.get(self.cursor).map(|s| s.trigger_time_ms)
    }
}
