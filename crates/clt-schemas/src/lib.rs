//! clt-schemas
//!
//! Shared domain types for clubtrack. Pure data: no I/O, no HTTP, no
//! roster logic. Everything here is cheap to clone and serde-friendly.

use serde::{Deserialize, Serialize};

/// Base URL of public member profile pages.
pub const MEMBER_URL_BASE: &str = "https://www.chess.com/member";

/// Base URL of public club pages.
pub const CLUB_URL_BASE: &str = "https://www.chess.com/club";

/// One tracked individual of a club roster.
///
/// `username` is display identity only: players can rename, so it may
/// change between observations while `player_id` stays stable. Both
/// `player_id` and `joined` start out unknown for freshly observed
/// members and are filled in lazily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub username: String,
    pub player_id: Option<u64>,
    /// Club-join time, UTC epoch seconds.
    pub joined: Option<i64>,
    pub is_active: bool,
}

impl Member {
    /// A freshly observed member: active, nothing resolved yet.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            player_id: None,
            joined: None,
            is_active: true,
        }
    }

    /// Public profile page for this member.
    pub fn profile_url(&self) -> String {
        format!("{MEMBER_URL_BASE}/{}", self.username)
    }

    /// Composite identity check used by the roster diff.
    ///
    /// `player_id` and `joined` only veto a match when known on *both*
    /// sides; an absent value matches anything. `username` must always be
    /// equal. Username is therefore necessary but not sufficient: a known
    /// id or join-time mismatch separates two same-named observations.
    pub fn same_identity(&self, other: &Member) -> bool {
        if let (Some(a), Some(b)) = (self.player_id, other.player_id) {
            if a != b {
                return false;
            }
        }
        if let (Some(a), Some(b)) = (self.joined, other.joined) {
            if a != b {
                return false;
            }
        }
        self.username == other.username
    }
}

/// Normalise club input to its url-name.
///
/// Accepts a full API url (`https://api.chess.com/pub/club/team-england`),
/// a web url (`https://www.chess.com/club/team-england`), a bare url-name,
/// or a space-separated club name (joined with dashes).
pub fn club_url_name(input: &str) -> String {
    let trimmed = input.trim().trim_matches(|c| c == ' ' || c == '/');
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    last.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Public club page for a url-name.
pub fn club_url(url_name: &str) -> String {
    format!("{CLUB_URL_BASE}/{url_name}")
}
