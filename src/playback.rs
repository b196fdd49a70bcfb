//! History Playback State Machine.
//!
//! Steps through a stored log of matching deltas at a throttled pace,
//! decoupled from the live render cadence. At most one step is applied per
//! orchestrated render pass; the machine terminates deterministically after
//! exactly `log.len()` advances.

use std::time::Duration;

use log::warn;
use rustc_hash::FxHashMap;

use crate::layout::Point;
use crate::message::MatchingDelta;
use crate::registry::{Registry, Side};

/// Playback phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No log armed, or the previous run has settled
    #[default]
    Idle,
    /// A log is armed and the cursor has steps left
    Stepping,
    /// The final advance happened this pass; settles to `Idle` on the next
    /// pass while the finished picture stays frozen on screen
    Done,
}

/// Outcome of one playback tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing advanced (not stepping, or a finished run settled)
    Idle,
    /// The cursor's delta was applied to registry and edge set
    Applied,
    /// The cursor's delta referenced an unregistered participant and was
    /// skipped; the cursor still advanced
    Skipped,
}

/// A drawn history edge between a paired couple's recorded positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoryEdge {
    pub man: Point,
    pub woman: Point,
}

/// Scheduler pass cadence, switched by the playback phase.
///
/// An explicit policy value rather than a side effect of drawing: the host
/// asks for the interval each pass and sleeps accordingly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    /// Pass interval while no playback is stepping (~30 passes/second)
    pub normal: Duration,
    /// Pass interval while stepping, so the history plays out slowly
    /// (~2 passes/second)
    pub throttled: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            normal: Duration::from_millis(33),
            throttled: Duration::from_millis(500),
        }
    }
}

impl Cadence {
    /// Interval until the next render pass under the given phase.
    #[inline]
    pub fn interval(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Stepping => self.throttled,
            Phase::Idle | Phase::Done => self.normal,
        }
    }
}

/// The playback state machine over one stored history log.
#[derive(Debug, Default)]
pub struct Playback {
    log: Vec<MatchingDelta>,
    cursor: usize,
    phase: Phase,
    edges: FxHashMap<u32, HistoryEdge>,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// The currently drawn history edges, keyed by husband ID.
    #[inline]
    pub fn edges(&self) -> &FxHashMap<u32, HistoryEdge> {
        &self.edges
    }

    /// Replace the stored log wholesale and rewind.
    ///
    /// Arms `Stepping` only if the log is non-empty and the registry is
    /// already populated; otherwise the log is stored for a later restart.
    pub fn load(&mut self, steps: Vec<MatchingDelta>, registry_populated: bool) {
        self.log = steps;
        self.cursor = 0;
        self.edges.clear();
        self.phase = if !self.log.is_empty() && registry_populated {
            Phase::Stepping
        } else {
            Phase::Idle
        };
    }

    /// Re-arm from 0 using the already-stored log - no new data fetch.
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.edges.clear();
        self.phase = if self.log.is_empty() {
            Phase::Idle
        } else {
            Phase::Stepping
        };
    }

    /// Cancel an in-flight run: a new snapshot made the recorded positions
    /// stale. The log itself is kept for a later restart.
    pub fn cancel(&mut self) {
        self.cursor = 0;
        self.edges.clear();
        self.phase = Phase::Idle;
    }

    /// One scheduler tick: settle a finished run, or advance by exactly one
    /// step while stepping.
    pub fn tick(&mut self, registry: &mut Registry) -> StepOutcome {
        match self.phase {
            Phase::Idle => StepOutcome::Idle,
            Phase::Done => {
                self.phase = Phase::Idle;
                StepOutcome::Idle
            }
            Phase::Stepping => self.step(registry),
        }
    }

    /// Apply `log[cursor]` to the registry and the edge set, then advance.
    fn step(&mut self, registry: &mut Registry) -> StepOutcome {
        let delta = self.log[self.cursor];
        self.cursor += 1;

        let outcome = self.apply_step(registry, &delta);

        if self.cursor == self.log.len() {
            // Final frozen picture: edges stay, only the cursor rewinds.
            self.phase = Phase::Done;
            self.cursor = 0;
        }

        outcome
    }

    fn apply_step(&mut self, registry: &mut Registry, delta: &MatchingDelta) -> StepOutcome {
        let endpoints = registry
            .get(Side::Man, delta.husband_id)
            .map(|h| h.pos)
            .and_then(|man| {
                registry
                    .get(Side::Woman, delta.wife_id)
                    .map(|w| (man, w.pos))
            });

        let (man, woman) = match endpoints {
            Ok(pair) => pair,
            Err(err) => {
                // Should not occur in a correct engine run
                warn!("history step references unregistered participant, skipping: {err}");
                return StepOutcome::Skipped;
            }
        };

        // Partner state mirrors the live delta rule, same self-collision guard
        if let Err(err) = registry.apply_delta(delta) {
            warn!("history step displaced an unregistered man: {err}");
        }

        self.edges.insert(delta.husband_id, HistoryEdge { man, woman });
        if delta.unmarried_id != delta.husband_id {
            self.edges.remove(&delta.unmarried_id);
        }

        StepOutcome::Applied
    }
}
