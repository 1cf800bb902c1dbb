//! Shared in-process directory stub for the reconciliation scenarios.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;

use clt_api::{ApiError, ClubDirectory, ClubProfile};
use clt_schemas::Member;

pub const CLUB: &str = "test-club";
pub const CLUB_URL: &str = "https://www.chess.com/club/test-club";

/// Scripted stand-in for the remote service: fixed member list, fixed id
/// lookups, fixed per-player club lists, and a set of usernames whose
/// profile lookups fail.
#[derive(Default)]
pub struct StubDirectory {
    pub members: Vec<Member>,
    pub ids: BTreeMap<String, u64>,
    pub club_urls: BTreeMap<String, Vec<String>>,
    pub unreachable: BTreeSet<String>,
}

impl StubDirectory {
    pub fn with_members(members: Vec<Member>) -> Self {
        Self {
            members,
            ..Self::default()
        }
    }

    pub fn id(mut self, username: &str, id: u64) -> Self {
        self.ids.insert(username.to_string(), id);
        self
    }

    pub fn still_in_club(mut self, username: &str) -> Self {
        self.club_urls
            .insert(username.to_string(), vec![CLUB_URL.to_string()]);
        self
    }

    pub fn in_no_clubs(mut self, username: &str) -> Self {
        self.club_urls.insert(username.to_string(), Vec::new());
        self
    }

    pub fn unreachable(mut self, username: &str) -> Self {
        self.unreachable.insert(username.to_string());
        self
    }
}

#[async_trait]
impl ClubDirectory for StubDirectory {
    async fn club_profile(&self, _club: &str) -> Result<ClubProfile, ApiError> {
        Ok(profile())
    }

    async fn club_members(&self, _club: &str) -> Result<Vec<Member>, ApiError> {
        Ok(self.members.clone())
    }

    async fn player_id(&self, username: &str) -> Result<u64, ApiError> {
        self.ids
            .get(username)
            .copied()
            .ok_or_else(|| ApiError::Status {
                code: 404,
                url: format!("/player/{username}"),
            })
    }

    async fn player_club_urls(&self, username: &str) -> Result<Vec<String>, ApiError> {
        if self.unreachable.contains(username) {
            return Err(ApiError::Status {
                code: 410,
                url: format!("/player/{username}/clubs"),
            });
        }
        Ok(self.club_urls.get(username).cloned().unwrap_or_default())
    }
}

pub fn profile() -> ClubProfile {
    ClubProfile {
        url_name: CLUB.to_string(),
        name: Some("Test Club".to_string()),
        club_id: Some(1),
        url: CLUB_URL.to_string(),
        admins: Vec::new(),
    }
}

/// A member as the member-list endpoint reports it: no id yet.
pub fn observed(username: &str, joined: i64) -> Member {
    Member {
        username: username.to_string(),
        player_id: None,
        joined: Some(joined),
        is_active: true,
    }
}

/// A member as the roster stores it: fully resolved.
pub fn stored(username: &str, id: u64, joined: i64, active: bool) -> Member {
    Member {
        username: username.to_string(),
        player_id: Some(id),
        joined: Some(joined),
        is_active: active,
    }
}
