//! # Match-Viz
//!
//! A deterministic client-side visualization core for two-sided stable
//! matching. The matching algorithm runs in an external engine; this crate
//! reconciles its pushed updates into one consistent visual model and
//! replays recorded history at a throttled, render-independent pace.
//!
//! ## Design Principles
//!
//! - **Single-Writer**: one cooperative scheduler owns all state (no locks)
//! - **Synchronous Transitions**: every inbound message is applied to
//!   completion between render passes
//! - **Deterministic Playback**: a log of length `L` terminates after
//!   exactly `L` advances, at most one per pass
//! - **Pure Layout**: positions are a function of (side, ID, population
//!   size, canvas) and are only ever recomputed wholesale
//!
//! ## Architecture
//!
//! ```text
//! [Engine] --> [Channel] --> [Reconciler] --> [Registry/Layout] --> [Frame]
//!                                 |                                    ^
//!                                 +--> [History Log] --> [Playback] ---+
//! ```

pub mod algorithm;
pub mod layout;
pub mod message;
pub mod playback;
pub mod registry;
pub mod render;
pub mod viz;

// Re-exports for convenience
pub use algorithm::DemoEngine;
pub use layout::{Canvas, Layout, Point, MARKER_DIAMETER};
pub use message::{
    HistoryWire, Inbound, MatchingDelta, Outbound, PersonWire, PopulationWire, WireError,
};
pub use playback::{Cadence, HistoryEdge, Phase, Playback, StepOutcome};
pub use registry::{Participant, Registry, RegistryError, Side};
pub use render::{Edge, EdgeClass, Frame, Marker, Toggles};
pub use viz::VizEngine;
