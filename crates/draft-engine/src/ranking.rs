//! Ranking and tie-break generation.
//!
//! Every entrant draws a uniform roll in `[1, 100]`. Entrants sharing a roll
//! receive a random permutation of `1..=k` as tie values, so the final order
//! is always a strict total order: descending by `(roll, tie)` with an
//! absent tie value sorting below any assigned one.
//!
//! Randomness is intentional; only the postcondition (no surviving ties) is
//! guaranteed, not any particular outcome.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;

use draft_core::ParticipantId;

/// An entrant prior to ranking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entrant {
    /// Platform member id.
    pub id: ParticipantId,
    /// Display name shown in render descriptors.
    pub name: String,
}

impl Entrant {
    /// Convenience constructor.
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A participant with their roll and (where needed) tie value, in final
/// seat order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedParticipant {
    /// Platform member id.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Primary roll, `1..=100`.
    pub roll: u8,
    /// Tie value within this roll's group; `None` when the roll is unique.
    pub tie: Option<u8>,
}

/// Roll for every entrant and produce the final seat order.
pub fn rank<R: Rng + ?Sized>(rng: &mut R, entrants: &[Entrant]) -> Vec<RankedParticipant> {
    let rolls: Vec<u8> = entrants.iter().map(|_| rng.random_range(1..=100)).collect();
    order_by_roll(rng, entrants, &rolls)
}

/// Assign tie values for duplicate rolls and sort into seat order.
///
/// Split out from [`rank`] so tie-break behavior is testable with fixed
/// rolls.
pub fn order_by_roll<R: Rng + ?Sized>(
    rng: &mut R,
    entrants: &[Entrant],
    rolls: &[u8],
) -> Vec<RankedParticipant> {
    debug_assert_eq!(entrants.len(), rolls.len());

    let mut groups: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (i, &roll) in rolls.iter().enumerate() {
        groups.entry(roll).or_default().push(i);
    }

    let mut ties: Vec<Option<u8>> = vec![None; entrants.len()];
    for members in groups.values() {
        if members.len() > 1 {
            // Distinct permutation of 1..=k, so no secondary ties exist.
            let mut permutation: Vec<u8> = (1..=members.len() as u8).collect();
            permutation.shuffle(rng);
            for (&entrant_index, &tie) in members.iter().zip(&permutation) {
                ties[entrant_index] = Some(tie);
            }
        }
    }

    let mut ranked: Vec<RankedParticipant> = entrants
        .iter()
        .zip(rolls)
        .zip(&ties)
        .map(|((entrant, &roll), &tie)| RankedParticipant {
            id: entrant.id,
            name: entrant.name.clone(),
            roll,
            tie,
        })
        .collect();

    // Descending by (roll, tie); Option's ordering puts None below Some.
    ranked.sort_by(|a, b| (b.roll, b.tie).cmp(&(a.roll, a.tie)));
    ranked
}
