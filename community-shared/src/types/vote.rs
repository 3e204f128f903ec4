use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The direction of a like toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VoteDirection {
    /// Adds the voter to the target's voter set.
    Like,
    /// Removes the voter from the target's voter set.
    Unlike,
}

impl VoteDirection {
    /// Maps the wire increment (`1` or `-1`) to a direction.
    pub fn from_increment(increment: i64) -> Option<Self> {
        match increment {
            1 => Some(VoteDirection::Like),
            -1 => Some(VoteDirection::Unlike),
            _ => None,
        }
    }

    /// The wire increment for this direction.
    pub fn increment(&self) -> i64 {
        match self {
            VoteDirection::Like => 1,
            VoteDirection::Unlike => -1,
        }
    }

    /// Whether the voter holds a like after this direction is applied.
    pub fn voted_after(&self) -> bool {
        matches!(self, VoteDirection::Like)
    }

    /// The direction that flips the given voted flag.
    pub fn toggling(voted: bool) -> Self {
        if voted {
            VoteDirection::Unlike
        } else {
            VoteDirection::Like
        }
    }
}

/// A transient request to change one voter's membership on one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteIntent {
    pub target_id: Uuid,
    pub voter_id: String,
    pub direction: VoteDirection,
}

/// The result of a conditional ledger update as reported by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Membership changed; carries the new authoritative count.
    Applied(i64),
    /// Membership already matched the requested state; carries the unchanged count.
    Unchanged(i64),
    /// No target with the requested id exists.
    TargetMissing,
}
