//! Demo matching engine - the producer side of the channel.
//!
//! Generates random populations and runs the proposal (deferred-acceptance)
//! algorithm, emitting the exact message stream a remote engine would: one
//! matching delta per proposal-acceptance, the full history log, and the run
//! duration. Preference ranking is by list position - earlier means more
//! preferred.
//!
//! This module is not part of the visualization core; it exists so the demo
//! binaries and integration tests have a real engine to talk to.

use std::collections::VecDeque;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::message::{HistoryWire, Inbound, MatchingDelta, PersonWire, PopulationWire};

/// Local stand-in for the external matching engine.
#[derive(Debug, Default)]
pub struct DemoEngine {
    men: Vec<PersonWire>,
    women: Vec<PersonWire>,
}

fn random_side<R: Rng + ?Sized>(n: u32, rng: &mut R) -> Vec<PersonWire> {
    (0..n)
        .map(|id| {
            let mut preferences: Vec<u32> = (0..n).collect();
            preferences.shuffle(rng);
            PersonWire { id, preferences }
        })
        .collect()
}

impl DemoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate `n` men and `n` women with random ranked preference lists
    /// over the opposite side, replacing any previous population.
    ///
    /// Returns the snapshot to push over the channel.
    pub fn generate<R: Rng + ?Sized>(&mut self, n: u32, rng: &mut R) -> PopulationWire {
        self.men = random_side(n, rng);
        self.women = random_side(n, rng);
        self.population()
    }

    #[inline]
    pub fn group_size(&self) -> usize {
        self.men.len()
    }

    /// The current population as a snapshot payload.
    pub fn population(&self) -> PopulationWire {
        PopulationWire {
            men: self.men.clone(),
            women: self.women.clone(),
        }
    }

    /// Run deferred acceptance over the current population.
    ///
    /// Each step is one accepted proposal: a man pairs with a woman, and
    /// either displaces her current husband (`unmarried_id` = the displaced
    /// man) or displaces nobody (`unmarried_id` = the husband himself).
    /// Folding the steps in order yields the final matching.
    pub fn run(&self) -> HistoryWire {
        // rank[w][m] = position of man m in woman w's list; absent = never preferred
        let rank: FxHashMap<u32, FxHashMap<u32, usize>> = self
            .women
            .iter()
            .map(|w| {
                let ranks = w
                    .preferences
                    .iter()
                    .enumerate()
                    .map(|(position, &man_id)| (man_id, position))
                    .collect();
                (w.id, ranks)
            })
            .collect();
        let rank_of = |woman: u32, man: u32| -> usize {
            rank.get(&woman)
                .and_then(|r| r.get(&man))
                .copied()
                .unwrap_or(usize::MAX)
        };

        let mut husband_of: FxHashMap<u32, u32> = FxHashMap::default();
        let mut next_proposal: FxHashMap<u32, usize> =
            self.men.iter().map(|m| (m.id, 0)).collect();
        let mut free: VecDeque<&PersonWire> = self.men.iter().collect();
        let mut steps = Vec::new();

        while let Some(man) = free.pop_front() {
            let propose_index = next_proposal[&man.id];
            let Some(&woman_id) = man.preferences.get(propose_index) else {
                // Exhausted his list; stays unmatched
                continue;
            };
            next_proposal.insert(man.id, propose_index + 1);

            match husband_of.get(&woman_id).copied() {
                None => {
                    husband_of.insert(woman_id, man.id);
                    steps.push(MatchingDelta {
                        husband_id: man.id,
                        wife_id: woman_id,
                        unmarried_id: man.id,
                    });
                }
                Some(current) => {
                    if rank_of(woman_id, man.id) < rank_of(woman_id, current) {
                        // She prefers the proposer: displace the current husband
                        husband_of.insert(woman_id, man.id);
                        steps.push(MatchingDelta {
                            husband_id: man.id,
                            wife_id: woman_id,
                            unmarried_id: current,
                        });
                        if let Some(displaced) = self.men.iter().find(|m| m.id == current) {
                            free.push_back(displaced);
                        }
                    } else {
                        // Rejected; he proposes to his next choice later
                        free.push_back(man);
                    }
                }
            }
        }

        HistoryWire { steps }
    }

    /// The message stream one `stable-match` command produces: a live delta
    /// per step, the recorded history, and the run duration.
    pub fn run_messages(&self) -> Vec<Inbound> {
        let start = Instant::now();
        let history = self.run();
        let duration = start.elapsed();

        let mut messages: Vec<Inbound> =
            history.steps.iter().copied().map(Inbound::Matching).collect();
        messages.push(Inbound::History(history));
        messages.push(Inbound::Duration(format!("{duration:?}")));
        messages
    }
}
