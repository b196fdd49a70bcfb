//! VizEngine - reconciles inbound messages into one visual model and drives
//! the playback/render cycle.
//!
//! One value owns all mutable visualization state (registry, layout,
//! playback, toggles), created at session start and mutated only by the
//! host's single scheduler: inbound messages between passes, one playback
//! advance per pass.

use std::time::Duration;

use log::warn;

use crate::layout::{Canvas, Layout};
use crate::message::{HistoryWire, Inbound, MatchingDelta, PopulationWire};
use crate::playback::{Cadence, Phase, Playback, StepOutcome};
use crate::registry::{Participant, Registry, Side};
use crate::render::{self, Frame, Toggles};

/// The client-side visualization core.
pub struct VizEngine {
    registry: Registry,
    layout: Layout,
    playback: Playback,
    toggles: Toggles,
    cadence: Cadence,
    /// Last run duration reported by the engine (display pass-through)
    duration: Option<String>,
}

impl VizEngine {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            registry: Registry::new(),
            layout: Layout::new(canvas),
            playback: Playback::new(),
            toggles: Toggles::default(),
            cadence: Cadence::default(),
            duration: None,
        }
    }

    /// Apply one inbound message to completion.
    ///
    /// Safe to call between render passes at any time; no transition leaves
    /// the model partially updated.
    pub fn apply(&mut self, msg: Inbound) {
        match msg {
            Inbound::People(population) => self.apply_snapshot(population),
            Inbound::Matching(delta) => self.apply_matching(&delta),
            Inbound::History(history) => self.apply_history(history),
            Inbound::Duration(text) => self.duration = Some(text),
        }
    }

    /// Wholesale population replacement: reset both sides, recompute the
    /// layout, and cancel any in-flight playback whose positions just went
    /// stale.
    fn apply_snapshot(&mut self, population: PopulationWire) {
        let into_participants = |side, people: Vec<crate::message::PersonWire>| {
            people
                .into_iter()
                .map(|p| Participant::new(p.id, side, p.preferences))
                .collect()
        };

        self.registry
            .reset(Side::Man, into_participants(Side::Man, population.men));
        self.registry
            .reset(Side::Woman, into_participants(Side::Woman, population.women));

        self.reposition(Side::Man);
        self.reposition(Side::Woman);

        self.playback.cancel();
    }

    /// Live matching delta. An unknown participant ID is non-fatal: the
    /// delta is dropped with a warning and prior state stays untouched.
    fn apply_matching(&mut self, delta: &MatchingDelta) {
        if let Err(err) = self.registry.apply_delta(delta) {
            warn!("dropping matching update: {err}");
        }
    }

    /// History log replacement; playback arms only against a populated
    /// registry.
    fn apply_history(&mut self, history: HistoryWire) {
        self.playback.load(history.steps, self.registry.populated());
    }

    /// Recompute one side's positions in full from the current snapshot.
    fn reposition(&mut self, side: Side) {
        let count = self.registry.len(side);
        let ids: Vec<u32> = self.registry.iter(side).map(|p| p.id).collect();

        for id in ids {
            if let Some(pos) = self.layout.position(side, id, count) {
                if let Ok(participant) = self.registry.get_mut(side, id) {
                    participant.pos = pos;
                }
            }
        }
    }

    /// One orchestrated render pass: at most one playback advance, then
    /// frame composition from the current state.
    pub fn render_pass(&mut self) -> Frame {
        self.playback.tick(&mut self.registry);
        render::compose(&self.registry, &self.playback, self.toggles)
    }

    /// Like [`render_pass`](Self::render_pass), also reporting whether the
    /// pass advanced playback.
    pub fn render_pass_with_outcome(&mut self) -> (Frame, StepOutcome) {
        let outcome = self.playback.tick(&mut self.registry);
        let frame = render::compose(&self.registry, &self.playback, self.toggles);
        (frame, outcome)
    }

    /// Interval until the next render pass under the current playback phase.
    pub fn pass_interval(&self) -> Duration {
        self.cadence.interval(self.playback.phase())
    }

    /// Replay the stored history from the beginning - no new data fetch.
    pub fn replay(&mut self) {
        self.playback.restart();
    }

    /// Change the canvas geometry and recompute all positions.
    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.layout = Layout::new(canvas);
        self.reposition(Side::Man);
        self.reposition(Side::Woman);
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    #[inline]
    pub fn toggles(&self) -> Toggles {
        self.toggles
    }

    #[inline]
    pub fn toggles_mut(&mut self) -> &mut Toggles {
        &mut self.toggles
    }

    #[inline]
    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    #[inline]
    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }

    /// Hash of the model state (partners, history edges, playback cursor)
    /// for determinism testing. Iteration-order independent.
    pub fn state_hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        for side in [Side::Man, Side::Woman] {
            let mut entries: Vec<(u32, Option<u32>)> = self
                .registry
                .iter(side)
                .map(|p| (p.id, p.partner))
                .collect();
            entries.sort_unstable();
            entries.hash(&mut hasher);
        }

        let mut edges: Vec<(u32, u32, u32, u32, u32)> = self
            .playback
            .edges()
            .iter()
            .map(|(id, e)| {
                (
                    *id,
                    e.man.x.to_bits(),
                    e.man.y.to_bits(),
                    e.woman.x.to_bits(),
                    e.woman.y.to_bits(),
                )
            })
            .collect();
        edges.sort_unstable();
        edges.hash(&mut hasher);

        self.playback.cursor().hash(&mut hasher);
        (self.playback.phase() == Phase::Stepping).hash(&mut hasher);

        hasher.finish()
    }
}
