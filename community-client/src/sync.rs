//! Optimistic toggle state for a single engagement target.
//!
//! A toggle moves the target from `Idle` to `Pending` with the tentative count
//! applied at once. The response settles it back to `Idle`, either with the
//! authoritative values or with the values from before the toggle. Every toggle
//! gets a token from a per-target counter, and a response carrying any token
//! other than the one in flight is ignored.
use community_shared::types::VoteDirection;
use uuid::Uuid;

/// The observable state of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle { count: i64, voted: bool },
    Pending { tentative_count: i64, tentative_voted: bool },
}

/// Describes a toggle that has been applied tentatively and awaits its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToggle {
    pub target_id: Uuid,
    pub token: u64,
    pub direction: VoteDirection,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    token: u64,
    previous_count: i64,
    previous_voted: bool,
}

#[derive(Debug, Clone)]
pub struct TargetSync {
    target_id: Uuid,
    count: i64,
    voted: bool,
    in_flight: Option<InFlight>,
    last_token: u64,
}

impl TargetSync {
    pub fn new(target_id: Uuid, count: i64, voted: bool) -> Self {
        Self {
            target_id,
            count,
            voted,
            in_flight: None,
            last_token: 0,
        }
    }

    pub fn state(&self) -> SyncState {
        match self.in_flight {
            None => SyncState::Idle {
                count: self.count,
                voted: self.voted,
            },
            Some(_) => SyncState::Pending {
                tentative_count: self.count,
                tentative_voted: self.voted,
            },
        }
    }

    /// Applies a toggle tentatively.
    ///
    /// Returns `None` without changing anything while another toggle is pending.
    pub fn begin_toggle(&mut self) -> Option<PendingToggle> {
        if self.in_flight.is_some() {
            return None;
        }

        let direction = VoteDirection::toggling(self.voted);
        self.last_token += 1;
        self.in_flight = Some(InFlight {
            token: self.last_token,
            previous_count: self.count,
            previous_voted: self.voted,
        });
        self.count = (self.count + direction.increment()).max(0);
        self.voted = direction.voted_after();

        Some(PendingToggle {
            target_id: self.target_id,
            token: self.last_token,
            direction,
        })
    }

    /// Settles a successful response.
    ///
    /// With an authoritative count the target becomes `Idle(count, requested)`.
    /// Without one the tentative values are kept.
    ///
    /// Returns `false` if `token` is not the toggle in flight.
    pub fn confirm(&mut self, token: u64, authoritative_count: Option<i64>) -> bool {
        if self.take_in_flight(token).is_none() {
            return false;
        }
        if let Some(count) = authoritative_count {
            self.count = count;
        }
        true
    }

    /// Settles a failed response by restoring the values from before the toggle.
    ///
    /// Returns `false` if `token` is not the toggle in flight.
    pub fn roll_back(&mut self, token: u64) -> bool {
        match self.take_in_flight(token) {
            Some(in_flight) => {
                self.count = in_flight.previous_count;
                self.voted = in_flight.previous_voted;
                true
            }
            None => false,
        }
    }

    /// Replaces the state with freshly loaded values.
    ///
    /// A toggle in flight is abandoned, so its response will be ignored.
    pub fn reset(&mut self, count: i64, voted: bool) {
        self.in_flight = None;
        self.count = count;
        self.voted = voted;
    }

    fn take_in_flight(&mut self, token: u64) -> Option<InFlight> {
        match self.in_flight {
            Some(in_flight) if in_flight.token == token => self.in_flight.take(),
            _ => None,
        }
    }
}
