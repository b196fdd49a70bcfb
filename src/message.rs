//! Wire protocol for the engine channel.
//!
//! Inbound messages are pushed by the external matching engine.
//! Outbound commands are emitted by the client toward the engine.
//!
//! Field names follow the engine's JSON encoding (`HusbandID`, `Men`, ...).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Channel event name for population snapshots.
pub const EVENT_UPDATE_PEOPLE: &str = "update-people";
/// Channel event name for live matching deltas.
pub const EVENT_UPDATE_MATCHING: &str = "update-matching";
/// Channel event name for a full history log.
pub const EVENT_HISTORY: &str = "stable-match-history";
/// Channel event name for the run-duration pass-through.
pub const EVENT_DURATION: &str = "stable-match-duration";
/// Outbound: request a new population of the given group size.
pub const EVENT_GENERATE: &str = "generate";
/// Outbound: request one matching run.
pub const EVENT_STABLE_MATCH: &str = "stable-match";

// ============================================================================
// Payload Types
// ============================================================================

/// A participant as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonWire {
    /// Participant ID, unique within its side
    #[serde(rename = "ID")]
    pub id: u32,
    /// Ranked opposite-side IDs; rank = list position
    #[serde(rename = "Preferences")]
    pub preferences: Vec<u32>,
}

/// Full population snapshot (`update-people`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationWire {
    #[serde(rename = "Men")]
    pub men: Vec<PersonWire>,
    #[serde(rename = "Women")]
    pub women: Vec<PersonWire>,
}

/// One proposal-acceptance event (`update-matching`): a new pairing plus the
/// man it displaced. `unmarried_id == husband_id` encodes "nobody displaced".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchingDelta {
    #[serde(rename = "HusbandID")]
    pub husband_id: u32,
    #[serde(rename = "WifeID")]
    pub wife_id: u32,
    #[serde(rename = "UnmarriedID")]
    pub unmarried_id: u32,
}

/// The recorded timeline of one algorithm run (`stable-match-history`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWire {
    #[serde(rename = "Steps")]
    pub steps: Vec<MatchingDelta>,
}

// ============================================================================
// Inbound Messages
// ============================================================================

/// Inbound channel messages, dispatched through one reconciler.
#[derive(Clone, Debug, PartialEq)]
pub enum Inbound {
    /// Wholesale population replacement
    People(PopulationWire),
    /// Live matching delta
    Matching(MatchingDelta),
    /// Full history log replacement
    History(HistoryWire),
    /// Opaque run duration, display pass-through only
    Duration(String),
}

impl Inbound {
    /// Decode a raw channel event into a typed message.
    ///
    /// A payload missing a required field yields [`WireError::Malformed`];
    /// the caller drops the message whole and prior state stays untouched.
    pub fn parse(event: &str, payload: &serde_json::Value) -> Result<Self, WireError> {
        let malformed = |event, source| WireError::Malformed { event, source };
        match event {
            EVENT_UPDATE_PEOPLE => serde_json::from_value(payload.clone())
                .map(Inbound::People)
                .map_err(|e| malformed(EVENT_UPDATE_PEOPLE, e)),
            EVENT_UPDATE_MATCHING => serde_json::from_value(payload.clone())
                .map(Inbound::Matching)
                .map_err(|e| malformed(EVENT_UPDATE_MATCHING, e)),
            EVENT_HISTORY => serde_json::from_value(payload.clone())
                .map(Inbound::History)
                .map_err(|e| malformed(EVENT_HISTORY, e)),
            EVENT_DURATION => Ok(Inbound::Duration(match payload {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })),
            other => Err(WireError::UnknownEvent(other.to_string())),
        }
    }

    /// The channel event name this message arrives under.
    pub fn event_name(&self) -> &'static str {
        match self {
            Inbound::People(_) => EVENT_UPDATE_PEOPLE,
            Inbound::Matching(_) => EVENT_UPDATE_MATCHING,
            Inbound::History(_) => EVENT_HISTORY,
            Inbound::Duration(_) => EVENT_DURATION,
        }
    }
}

// ============================================================================
// Outbound Commands
// ============================================================================

/// Commands the client emits toward the matching engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outbound {
    /// Request a fresh population of `n` men and `n` women
    Generate(u32),
    /// Request the engine to compute and stream one run's updates
    StableMatch,
}

impl Outbound {
    /// The channel event name this command is emitted under.
    pub fn event_name(&self) -> &'static str {
        match self {
            Outbound::Generate(_) => EVENT_GENERATE,
            Outbound::StableMatch => EVENT_STABLE_MATCH,
        }
    }

    /// JSON payload for the command (`Null` for parameterless commands).
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Outbound::Generate(n) => serde_json::Value::from(*n),
            Outbound::StableMatch => serde_json::Value::Null,
        }
    }
}

/// Errors decoding a raw channel event.
#[derive(Debug, Error)]
pub enum WireError {
    /// Event name outside the protocol contract
    #[error("unknown channel event `{0}`")]
    UnknownEvent(String),
    /// Payload did not match the event's schema
    #[error("malformed `{event}` payload: {source}")]
    Malformed {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
