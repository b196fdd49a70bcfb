//! Render Orchestrator - composes the visible frame each pass.
//!
//! The output is a set of visual primitives (markers; edges with endpoints,
//! color class, weight). Pixel-level drawing belongs to the host surface.

use crate::layout::Point;
use crate::playback::Playback;
use crate::registry::{Registry, Side};

/// Base weight of the lowest-ranked preference edge; each rank adds 1.
pub const PREFERENCE_BASE_WEIGHT: f32 = 1.0;
/// Weight of matching and history edges.
pub const PAIR_EDGE_WEIGHT: f32 = 5.0;

/// Display toggles gating the edge layers. Markers are always drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Toggles {
    pub preferences: bool,
    pub matching: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            preferences: true,
            matching: true,
        }
    }
}

/// Color class of an edge, mapped to a concrete color by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeClass {
    Preference,
    Matching,
    History,
}

/// A line between two participants' positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub from: Point,
    pub to: Point,
    pub class: EdgeClass,
    pub weight: f32,
}

/// A participant marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub id: u32,
    pub side: Side,
    pub pos: Point,
}

/// Everything visible in one render pass.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub markers: Vec<Marker>,
    pub edges: Vec<Edge>,
}

/// Compose the visible frame from registry state, active history edges, and
/// the display toggles.
///
/// Unknown opponent IDs are non-fatal: the edge is simply omitted. Matching
/// edges resolve the opposite endpoint strictly through the participant's
/// own recorded partner.
pub fn compose(registry: &Registry, playback: &Playback, toggles: Toggles) -> Frame {
    let mut frame = Frame::default();

    for side in [Side::Man, Side::Woman] {
        for participant in registry.iter(side) {
            frame.markers.push(Marker {
                id: participant.id,
                side,
                pos: participant.pos,
            });

            if toggles.preferences {
                for (rank, opponent_id) in participant.preferences.iter().enumerate() {
                    if let Ok(opponent) = registry.get(side.opposite(), *opponent_id) {
                        frame.edges.push(Edge {
                            from: participant.pos,
                            to: opponent.pos,
                            class: EdgeClass::Preference,
                            weight: PREFERENCE_BASE_WEIGHT + rank as f32,
                        });
                    }
                }
            }

            if toggles.matching {
                if let Some(partner_id) = participant.partner {
                    if let Ok(partner) = registry.get(side.opposite(), partner_id) {
                        frame.edges.push(Edge {
                            from: participant.pos,
                            to: partner.pos,
                            class: EdgeClass::Matching,
                            weight: PAIR_EDGE_WEIGHT,
                        });
                    }
                }
            }
        }
    }

    for edge in playback.edges().values() {
        frame.edges.push(Edge {
            from: edge.man,
            to: edge.woman,
            class: EdgeClass::History,
            weight: PAIR_EDGE_WEIGHT,
        });
    }

    frame
}

impl Frame {
    /// Edges of one color class, in composition order.
    pub fn edges_of(&self, class: EdgeClass) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.class == class)
    }
}
