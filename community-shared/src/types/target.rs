use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The kind of post that owns an engagement target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A blog article.
    Blog,
    /// A community forum post.
    Forum,
}

impl TargetKind {
    /// Returns the storage representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Blog => "blog",
            TargetKind::Forum => "forum",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "blog" => Ok(TargetKind::Blog),
            "forum" => Ok(TargetKind::Forum),
            other => Err(other.to_string()),
        }
    }
}

/// The votable part of a post.
///
/// Membership in `voters` means the voter has liked the target. The set is
/// embedded in the owning post record and only changes together with
/// `like_count`, in a single conditional update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementTarget {
    pub id: Uuid,
    pub kind: TargetKind,
    pub title: String,
    pub like_count: i64,
    pub voters: Vec<String>,
}
