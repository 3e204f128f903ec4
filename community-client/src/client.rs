use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::VoteCache;
use crate::errors::ClientError;
use crate::sync::{SyncState, TargetSync};
use crate::transport::{VoteRequest, VoteTransport};

/// Optimistic like toggling for one voter session.
///
/// Each tracked target has its own [`TargetSync`]. The session's [`VoteCache`]
/// supplies the initial `voted` flag. It is updated and saved whenever a response
/// reveals the voter's membership on the server: a confirmed toggle, including
/// one abandoned by [`track`](Self::track), or a rejected transition.
pub struct EngagementClient {
    voter_id: String,
    transport: Arc<dyn VoteTransport>,
    cache: Mutex<VoteCache>,
    targets: Mutex<HashMap<Uuid, TargetSync>>,
}

impl EngagementClient {
    pub fn new(voter_id: impl Into<String>, transport: Arc<dyn VoteTransport>, cache: VoteCache) -> Self {
        Self {
            voter_id: voter_id.into(),
            transport,
            cache: Mutex::new(cache),
            targets: Mutex::new(HashMap::new()),
        }
    }

    /// Starts tracking a target with the like count loaded from the server.
    ///
    /// Tracking an already tracked target resets it, abandoning any toggle in flight.
    pub async fn track(&self, target_id: Uuid, like_count: i64) -> SyncState {
        let voted = self.cache.lock().await.is_liked(target_id);
        let mut targets = self.targets.lock().await;
        let sync = targets
            .entry(target_id)
            .or_insert_with(|| TargetSync::new(target_id, like_count, voted));
        sync.reset(like_count, voted);
        sync.state()
    }

    pub async fn state(&self, target_id: Uuid) -> Option<SyncState> {
        self.targets.lock().await.get(&target_id).map(TargetSync::state)
    }

    /// Toggles the voter's like on a tracked target.
    ///
    /// The tentative state is visible through [`state`](Self::state) while the
    /// request is in flight. A toggle issued while another is pending does
    /// nothing and returns the pending state.
    ///
    /// # Errors
    ///
    /// Any transport failure or rejection. The target is back in its state from
    /// before the toggle when the error is returned. Responses to a toggle that
    /// `track` abandoned are never errors; the current state is returned instead.
    pub async fn toggle(&self, target_id: Uuid) -> Result<SyncState, ClientError> {
        let pending = {
            let mut targets = self.targets.lock().await;
            let sync = targets
                .get_mut(&target_id)
                .ok_or(ClientError::UnknownTarget(target_id))?;
            match sync.begin_toggle() {
                Some(pending) => pending,
                None => {
                    debug!(target_id = %target_id, "Toggle ignored while pending");
                    return Ok(sync.state());
                }
            }
        };

        let request = VoteRequest {
            increment: pending.direction.increment(),
            voter_id: self.voter_id.clone(),
        };
        let result = self.transport.send_vote(target_id, &request).await;

        let voted_after = pending.direction.voted_after();
        let (settled, state, membership) = {
            let mut targets = self.targets.lock().await;
            let sync = targets
                .get_mut(&target_id)
                .ok_or(ClientError::UnknownTarget(target_id))?;
            match &result {
                Ok(like_count) => {
                    let settled = sync.confirm(pending.token, *like_count);
                    (settled, sync.state(), Some(voted_after))
                }
                Err(e) => {
                    let settled = sync.roll_back(pending.token);
                    // The server already holds the membership this toggle asked for.
                    let membership = e.is_invalid_transition().then_some(voted_after);
                    (settled, sync.state(), membership)
                }
            }
        };

        if let Some(liked) = membership {
            self.remember(target_id, liked).await;
        }

        match result {
            Ok(_) => {
                if !settled {
                    debug!(target_id = %target_id, token = pending.token, "Ignoring stale vote response");
                }
                Ok(state)
            }
            Err(e) if !settled => {
                debug!(target_id = %target_id, token = pending.token, error = %e, "Ignoring failure of abandoned toggle");
                Ok(state)
            }
            Err(e) => {
                warn!(target_id = %target_id, error = %e, "Vote failed, rolled back");
                Err(e.into())
            }
        }
    }

    async fn remember(&self, target_id: Uuid, liked: bool) {
        let mut cache = self.cache.lock().await;
        if cache.is_liked(target_id) == liked {
            return;
        }
        cache.set_liked(target_id, liked);
        if let Err(e) = cache.save().await {
            warn!(target_id = %target_id, error = %e, "Failed to save vote cache");
        }
    }
}
