//! Core records shared by the directory and the swap ledger.
//!
//! Field names serialize in camelCase so stored collections and exports keep
//! the layout existing SkillSwap data files already use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reputation score given to newly registered members.
pub const DEFAULT_REPUTATION: f64 = 5.0;

/// Opaque identifier for members and swap requests.
/// Fresh ids are `UUIDv7` so they sort by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(pub String);

impl Id {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Swap request lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl SwapStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }
}

impl std::fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SwapStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            _ => Err(format!(
                "invalid status '{s}', expected: pending, accepted, rejected, completed"
            )),
        }
    }
}

/// A member profile in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Id,
    /// Display name.
    pub name: String,
    /// Contact address, unique across the roster.
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Avatar reference (URL or path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub skills_offered: Vec<String>,
    #[serde(default)]
    pub skills_wanted: Vec<String>,
    /// Availability tags such as "Weekends" or "Evenings".
    #[serde(default)]
    pub availability: Vec<String>,
    /// Hidden members never appear in directory search.
    pub is_public: bool,
    #[serde(default)]
    pub is_admin: bool,
    /// Reputation score derived from completed swaps.
    #[serde(default = "default_reputation")]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

fn default_reputation() -> f64 {
    DEFAULT_REPUTATION
}

impl Member {
    /// True when `keyword` (already lowercased) is a substring of any
    /// offered or wanted skill, ignoring case.
    pub(crate) fn has_skill_matching(&self, keyword_lower: &str) -> bool {
        self.skills_offered
            .iter()
            .chain(self.skills_wanted.iter())
            .any(|skill| skill.to_lowercase().contains(keyword_lower))
    }
}

/// A proposed bilateral skill exchange between two members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub id: Id,
    pub requester_id: Id,
    pub receiver_id: Id,
    /// Skill the requester teaches in this swap.
    pub skill_offered: String,
    /// Skill the requester wants to learn in this swap.
    pub skill_wanted: String,
    #[serde(default)]
    pub message: String,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
    /// Post-completion rating (1-5), present only once completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl SwapRequest {
    pub fn involves(&self, member_id: &Id) -> bool {
        &self.requester_id == member_id || &self.receiver_id == member_id
    }
}

/// The authenticated caller of an operation.
///
/// Supplied by the identity collaborator and trusted as-is. The
/// administrator claim travels with every call instead of being read from
/// shared session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub member_id: Id,
    pub is_admin: bool,
}

impl Actor {
    pub fn member(member_id: impl Into<Id>) -> Self {
        Self {
            member_id: member_id.into(),
            is_admin: false,
        }
    }

    pub fn admin(member_id: impl Into<Id>) -> Self {
        Self {
            member_id: member_id.into(),
            is_admin: true,
        }
    }
}
