//! Participant Registry - owns both sides of the population.
//!
//! ID-indexed stores with O(1) lookup for delta application. Iteration order
//! is unspecified; it affects only draw order, not correctness.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::layout::Point;
use crate::message::MatchingDelta;

/// Which side of the matching a participant belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Man,
    Woman,
}

impl Side {
    /// Returns the opposite side
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Man => Side::Woman,
            Side::Woman => Side::Man,
        }
    }
}

/// Errors from registry lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The ID does not resolve on the given side
    #[error("no {side:?} registered with ID {id}")]
    NotFound { side: Side, id: u32 },
}

/// A single man or woman node.
#[derive(Clone, Debug, PartialEq)]
pub struct Participant {
    /// ID, unique within the side
    pub id: u32,
    pub side: Side,
    /// Ranked opposite-side IDs; rank = list position
    pub preferences: Vec<u32>,
    /// Current partner on the opposite side, if any
    pub partner: Option<u32>,
    /// Derived screen position; recomputed wholesale on snapshot
    pub pos: Point,
}

impl Participant {
    pub fn new(id: u32, side: Side, preferences: Vec<u32>) -> Self {
        Self {
            id,
            side,
            preferences,
            partner: None,
            pos: Point::ZERO,
        }
    }
}

/// ID-indexed store for both sides of the population.
#[derive(Debug, Default)]
pub struct Registry {
    men: FxHashMap<u32, Participant>,
    women: FxHashMap<u32, Participant>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn side(&self, side: Side) -> &FxHashMap<u32, Participant> {
        match side {
            Side::Man => &self.men,
            Side::Woman => &self.women,
        }
    }

    #[inline]
    fn side_mut(&mut self, side: Side) -> &mut FxHashMap<u32, Participant> {
        match side {
            Side::Man => &mut self.men,
            Side::Woman => &mut self.women,
        }
    }

    /// Wholesale replace one side. Previously held IDs become unresolvable.
    /// Idempotent for identical input.
    pub fn reset(&mut self, side: Side, participants: Vec<Participant>) {
        let store = self.side_mut(side);
        store.clear();
        for p in participants {
            store.insert(p.id, p);
        }
    }

    /// Look up a participant, failing with `NotFound` for unknown IDs.
    pub fn get(&self, side: Side, id: u32) -> Result<&Participant, RegistryError> {
        self.side(side)
            .get(&id)
            .ok_or(RegistryError::NotFound { side, id })
    }

    pub fn get_mut(&mut self, side: Side, id: u32) -> Result<&mut Participant, RegistryError> {
        self.side_mut(side)
            .get_mut(&id)
            .ok_or(RegistryError::NotFound { side, id })
    }

    /// Assign or clear a participant's partner.
    ///
    /// Fails with `NotFound` if `id` is unregistered. There is no existence
    /// check on the partner: it may reference the opposite side lazily.
    pub fn set_partner(
        &mut self,
        side: Side,
        id: u32,
        partner: Option<u32>,
    ) -> Result<(), RegistryError> {
        self.get_mut(side, id)?.partner = partner;
        Ok(())
    }

    /// Apply one matching delta: pair the husband first, then clear the
    /// displaced man - unless the delta displaces the husband it just
    /// paired (`unmarried_id == husband_id`), in which case the clear is
    /// skipped so the most recent assignment is preserved.
    ///
    /// Mutations that succeeded before an unknown-ID failure remain; the
    /// caller surfaces the error as a data-consistency warning.
    pub fn apply_delta(&mut self, delta: &MatchingDelta) -> Result<(), RegistryError> {
        self.set_partner(Side::Man, delta.husband_id, Some(delta.wife_id))?;
        if delta.unmarried_id != delta.husband_id {
            self.set_partner(Side::Man, delta.unmarried_id, None)?;
        }
        Ok(())
    }

    /// Number of participants on one side.
    #[inline]
    pub fn len(&self, side: Side) -> usize {
        self.side(side).len()
    }

    /// True when both sides are empty.
    pub fn is_empty(&self) -> bool {
        self.men.is_empty() && self.women.is_empty()
    }

    /// True when both sides hold at least one participant - the arming
    /// precondition for history playback.
    pub fn populated(&self) -> bool {
        !self.men.is_empty() && !self.women.is_empty()
    }

    /// Iterate one side in unspecified order.
    pub fn iter(&self, side: Side) -> impl Iterator<Item = &Participant> {
        self.side(side).values()
    }
}
