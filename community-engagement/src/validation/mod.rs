//! Input validation shared by the engagement services and the HTTP layer.
//!
//! Identifiers are checked here before any storage access, so a malformed id
//! never reaches a repository.
use community_shared::types::{VoteDirection, VoteIntent};
use uuid::Uuid;

use crate::errors::EngagementError;

/// Parses an identifier field, failing with a validation error if it is empty
/// or not a well-formed UUID.
///
/// # Arguments
///
/// * `field_name` - Name used in the error message
/// * `value` - The raw identifier
pub fn parse_id(field_name: &str, value: &str) -> Result<Uuid, EngagementError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EngagementError::validation(format!("{field_name} is required")));
    }
    Uuid::parse_str(value).map_err(|_| {
        EngagementError::validation(format!("{field_name} must be a valid UUID, got: {value}"))
    })
}

/// Parses the id of an engagement target.
pub fn parse_target_id(value: &str) -> Result<Uuid, EngagementError> {
    parse_id("id", value)
}

/// Returns the trimmed value, or a validation error if nothing is left.
pub fn require_non_blank(field_name: &str, value: &str) -> Result<String, EngagementError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngagementError::validation(format!("{field_name} is required")));
    }
    Ok(trimmed.to_string())
}

/// Builds a vote intent from the wire representation of a toggle.
///
/// # Arguments
///
/// * `target_id` - Raw target id from the request path
/// * `increment` - `1` for a like, `-1` for an unlike
/// * `voter_id` - Identity of the voter
///
/// # Returns
///
/// The validated `VoteIntent`, or `EngagementError::Validation` describing the
/// first invalid field.
pub fn vote_intent(
    target_id: &str,
    increment: i64,
    voter_id: &str,
) -> Result<VoteIntent, EngagementError> {
    let target_id = parse_target_id(target_id)?;
    let direction = VoteDirection::from_increment(increment).ok_or_else(|| {
        EngagementError::validation(format!("increment must be 1 or -1, got: {increment}"))
    })?;
    let voter_id = require_non_blank("voterId", voter_id)?;
    Ok(VoteIntent {
        target_id,
        voter_id,
        direction,
    })
}
