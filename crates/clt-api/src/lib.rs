//! clt-api
//!
//! chess.com public-API client. This crate owns the directory trait the
//! reconciliation engine calls through and the concrete HTTP
//! implementation. It does **not** touch the roster store; callers fetch
//! data here and hand it to clt-reconcile.
//!
//! All calls are blocking from the caller's point of view: one request at
//! a time, awaited serially, with a short fixed per-request timeout and no
//! retries.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use clt_schemas::{club_url, Member};

/// Production API root.
pub const DEFAULT_API_BASE: &str = "https://api.chess.com/pub";

/// Fixed per-request timeout. There is no retry layer; a timed-out call
/// surfaces as [`ApiError::Transport`].
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors an API call may return.
#[derive(Debug)]
pub enum ApiError {
    /// Network or transport failure (connect, timeout, TLS).
    Transport(String),
    /// The API answered with a non-success HTTP status.
    Status { code: u16, url: String },
    /// A response payload could not be decoded.
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "transport error: {msg}"),
            ApiError::Status { code, url } => {
                write!(f, "api http error status={code} url={url}")
            }
            ApiError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

// ---------------------------------------------------------------------------
// Directory trait
// ---------------------------------------------------------------------------

/// Club profile as served by `/club/{club}`.
#[derive(Debug, Clone)]
pub struct ClubProfile {
    /// Url-name, the last segment of the API `@id`.
    pub url_name: String,
    pub name: Option<String>,
    pub club_id: Option<u64>,
    /// Public web page of the club; this exact string appears in a
    /// member's club list when they belong to the club.
    pub url: String,
    pub admins: Vec<String>,
}

/// Remote member-data service contract.
///
/// Object-safe so callers can hold a `&dyn ClubDirectory`; `Send + Sync`
/// so it crosses async boundaries.
#[async_trait]
pub trait ClubDirectory: Send + Sync {
    /// Resolve a club url-name to its profile.
    async fn club_profile(&self, club: &str) -> Result<ClubProfile, ApiError>;

    /// The club's live member list: the flat, username-deduplicated union
    /// of the weekly / monthly / all_time activity groups, sorted by
    /// username. Player ids are not part of this payload.
    async fn club_members(&self, club: &str) -> Result<Vec<Member>, ApiError>;

    /// Resolve a username to its stable numeric player id.
    async fn player_id(&self, username: &str) -> Result<u64, ApiError>;

    /// Urls of every club the player currently belongs to.
    async fn player_club_urls(&self, username: &str) -> Result<Vec<String>, ApiError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// `ClubDirectory` over the chess.com public API.
#[derive(Debug, Clone)]
pub struct ChessComClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChessComClient {
    /// `user_agent` should identify the operator (the public API asks
    /// automated clients to send contact info).
    pub fn new(user_agent: &str) -> Result<Self, ApiError> {
        Self::new_with_base_url(user_agent, DEFAULT_API_BASE)
    }

    pub fn new_with_base_url(
        user_agent: &str,
        base_url: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "api request");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                code: status.as_u16(),
                url,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ClubDirectory for ChessComClient {
    async fn club_profile(&self, club: &str) -> Result<ClubProfile, ApiError> {
        let body: ClubProfileResponse = self.get_json(&format!("/club/{club}")).await?;

        let url_name = body
            .api
            .rsplit('/')
            .next()
            .unwrap_or(club)
            .to_string();
        let url = body.url.unwrap_or_else(|| club_url(&url_name));

        Ok(ClubProfile {
            url_name,
            name: body.name,
            club_id: body.club_id,
            url,
            admins: body.admin,
        })
    }

    async fn club_members(&self, club: &str) -> Result<Vec<Member>, ApiError> {
        let body: ClubMembersResponse = self
            .get_json(&format!("/club/{club}/members"))
            .await?;

        // Union of the three activity groups, keyed by username so a player
        // appearing in several groups yields one record, in sorted order.
        let mut by_username: BTreeMap<String, Member> = BTreeMap::new();
        for entry in body
            .weekly
            .into_iter()
            .chain(body.monthly)
            .chain(body.all_time)
        {
            by_username
                .entry(entry.username.clone())
                .or_insert_with(|| Member {
                    username: entry.username,
                    player_id: None,
                    joined: entry.joined,
                    is_active: true,
                });
        }
        Ok(by_username.into_values().collect())
    }

    async fn player_id(&self, username: &str) -> Result<u64, ApiError> {
        let body: PlayerProfileResponse =
            self.get_json(&format!("/player/{username}")).await?;
        Ok(body.player_id)
    }

    async fn player_club_urls(&self, username: &str) -> Result<Vec<String>, ApiError> {
        let body: PlayerClubsResponse = self
            .get_json(&format!("/player/{username}/clubs"))
            .await?;
        Ok(body.clubs.into_iter().map(|c| c.url).collect())
    }
}

// ---------------------------------------------------------------------------
// Wire DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ClubProfileResponse {
    #[serde(rename = "@id")]
    api: String,
    name: Option<String>,
    club_id: Option<u64>,
    url: Option<String>,
    #[serde(default)]
    admin: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ClubMembersResponse {
    #[serde(default)]
    weekly: Vec<MemberEntry>,
    #[serde(default)]
    monthly: Vec<MemberEntry>,
    #[serde(default)]
    all_time: Vec<MemberEntry>,
}

#[derive(Debug, Deserialize)]
struct MemberEntry {
    username: String,
    joined: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct PlayerProfileResponse {
    player_id: u64,
}

#[derive(Debug, Deserialize)]
struct PlayerClubsResponse {
    #[serde(default)]
    clubs: Vec<PlayerClubEntry>,
}

#[derive(Debug, Deserialize)]
struct PlayerClubEntry {
    url: String,
}

// -----------------
// Tests (no network)
// -----------------

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> ChessComClient {
        ChessComClient::new_with_base_url("clubtrack-tests", server.base_url()).unwrap()
    }

    #[tokio::test]
    async fn club_members_unions_and_dedupes_groups() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/club/team-england/members");
                then.status(200).json_body(json!({
                    "weekly": [{"username": "carol", "joined": 300}],
                    "monthly": [{"username": "alice", "joined": 100}],
                    "all_time": [
                        {"username": "bob", "joined": 200},
                        {"username": "alice", "joined": 100}
                    ]
                }));
            })
            .await;

        let members = client(&server).club_members("team-england").await.unwrap();
        let usernames: Vec<&str> = members.iter().map(|m| m.username.as_str()).collect();
        assert_eq!(usernames, vec!["alice", "bob", "carol"]);
        assert_eq!(members[0].joined, Some(100));
        assert_eq!(members[0].player_id, None);
        assert!(members.iter().all(|m| m.is_active));
    }

    #[tokio::test]
    async fn club_members_tolerates_missing_groups() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/club/tiny/members");
                then.status(200)
                    .json_body(json!({"weekly": [{"username": "zed", "joined": 5}]}));
            })
            .await;

        let members = client(&server).club_members("tiny").await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].username, "zed");
    }

    #[tokio::test]
    async fn player_id_resolves_from_profile() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/player/alice");
                then.status(200)
                    .json_body(json!({"player_id": 41, "username": "alice"}));
            })
            .await;

        assert_eq!(client(&server).player_id("alice").await.unwrap(), 41);
    }

    #[tokio::test]
    async fn player_club_urls_extracts_urls() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/player/alice/clubs");
                then.status(200).json_body(json!({
                    "clubs": [
                        {"url": "https://www.chess.com/club/team-england", "name": "Team England"},
                        {"url": "https://www.chess.com/club/other"}
                    ]
                }));
            })
            .await;

        let urls = client(&server).player_club_urls("alice").await.unwrap();
        assert_eq!(
            urls,
            vec![
                "https://www.chess.com/club/team-england",
                "https://www.chess.com/club/other"
            ]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_status_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/player/gone/clubs");
                then.status(404).json_body(json!({"message": "not found"}));
            })
            .await;

        let err = client(&server)
            .player_club_urls("gone")
            .await
            .unwrap_err();
        match err {
            ApiError::Status { code, .. } => assert_eq!(code, 404),
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_payload_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/player/alice");
                then.status(200).body("not json");
            })
            .await;

        let err = client(&server).player_id("alice").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn club_profile_derives_url_name_and_url() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/club/team-england");
                then.status(200).json_body(json!({
                    "@id": "https://api.chess.com/pub/club/team-england",
                    "name": "Team England",
                    "club_id": 17,
                    "url": "https://www.chess.com/club/team-england",
                    "admin": ["https://api.chess.com/pub/player/boss"]
                }));
            })
            .await;

        let profile = client(&server).club_profile("team-england").await.unwrap();
        assert_eq!(profile.url_name, "team-england");
        assert_eq!(profile.name.as_deref(), Some("Team England"));
        assert_eq!(profile.club_id, Some(17));
        assert_eq!(profile.url, "https://www.chess.com/club/team-england");
        assert_eq!(profile.admins.len(), 1);
    }

    #[tokio::test]
    async fn club_profile_falls_back_to_derived_url() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/club/quiet-club");
                then.status(200)
                    .json_body(json!({"@id": "https://api.chess.com/pub/club/quiet-club"}));
            })
            .await;

        let profile = client(&server).club_profile("quiet-club").await.unwrap();
        assert_eq!(profile.url, "https://www.chess.com/club/quiet-club");
    }

    #[test]
    fn error_display_variants() {
        let t = ApiError::Transport("connection refused".to_string());
        assert!(t.to_string().contains("connection refused"));

        let s = ApiError::Status {
            code: 410,
            url: "https://api.chess.com/pub/player/x".to_string(),
        };
        assert!(s.to_string().contains("410"));

        let d = ApiError::Decode("expected value".to_string());
        assert!(d.to_string().contains("decode"));
    }

    #[test]
    fn directory_is_object_safe() {
        fn assert_dyn(_d: &dyn ClubDirectory) {}
        let _ = assert_dyn;
    }
}
