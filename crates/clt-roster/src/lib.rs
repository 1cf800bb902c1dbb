//! clt-roster
//!
//! The roster store: two id-keyed partitions of members, `current`
//! (active) and `archive` (inactive), plus CSV persistence. Invariant: a
//! player id appears in at most one partition at any time.
//!
//! Partition moves reject violated preconditions with [`RosterError`]
//! instead of fixing them up silently. A precondition failure here means
//! the classification upstream is wrong, not that the data is; the run
//! aborts.

pub mod store;

use std::collections::BTreeMap;
use std::fmt;

use clt_schemas::Member;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Invariant violations raised by partition operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// The operation needs a resolved player id and the member has none.
    MissingPlayerId { username: String },
    /// Insert of a member whose id is already tracked in some partition.
    AlreadyTracked { player_id: u64, username: String },
    /// Move of a member whose id is tracked in neither partition.
    NotTracked { player_id: u64, username: String },
    /// Operation requires the member to be in `current` and it is not.
    NotCurrent { player_id: u64, username: String },
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterError::MissingPlayerId { username } => {
                write!(f, "member '{username}' has no player id")
            }
            RosterError::AlreadyTracked {
                player_id,
                username,
            } => write!(
                f,
                "member '{username}' (id {player_id}) is already tracked"
            ),
            RosterError::NotTracked {
                player_id,
                username,
            } => write!(f, "member '{username}' (id {player_id}) is not tracked"),
            RosterError::NotCurrent {
                player_id,
                username,
            } => write!(
                f,
                "member '{username}' (id {player_id}) is not in the current partition"
            ),
        }
    }
}

impl std::error::Error for RosterError {}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// A club's locally persisted membership record.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    current: BTreeMap<u64, Member>,
    archive: BTreeMap<u64, Member>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition members by their `is_active` flag. Members without a
    /// player id cannot be keyed and are dropped with a warning; they
    /// would be unmatchable in any later run anyway.
    pub fn from_members(members: impl IntoIterator<Item = Member>) -> Self {
        let mut roster = Self::new();
        for member in members {
            let Some(id) = member.player_id else {
                tracing::warn!(username = %member.username, "dropping member without player id");
                continue;
            };
            if member.is_active {
                roster.current.insert(id, member);
            } else {
                roster.archive.insert(id, member);
            }
        }
        roster
    }

    pub fn current(&self) -> &BTreeMap<u64, Member> {
        &self.current
    }

    pub fn archive(&self) -> &BTreeMap<u64, Member> {
        &self.archive
    }

    /// Count of active members, the trailing number of the change report.
    pub fn active_count(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.archive.is_empty()
    }

    /// Union of both partitions, active members first, each group sorted
    /// by username. This is the persistence order.
    pub fn all_sorted(&self) -> Vec<Member> {
        let mut all: Vec<Member> = self
            .current
            .values()
            .chain(self.archive.values())
            .cloned()
            .collect();
        all.sort_by(|a, b| {
            b.is_active
                .cmp(&a.is_active)
                .then_with(|| a.username.cmp(&b.username))
        });
        all
    }

    /// Insert a brand-new member into `current`. The id must not be
    /// tracked anywhere yet.
    pub fn insert_current(&mut self, mut member: Member) -> Result<(), RosterError> {
        let id = require_id(&member)?;
        if self.current.contains_key(&id) || self.archive.contains_key(&id) {
            return Err(RosterError::AlreadyTracked {
                player_id: id,
                username: member.username,
            });
        }
        member.is_active = true;
        self.current.insert(id, member);
        Ok(())
    }

    /// Ensure a tracked member is active: moves it out of `archive`, or
    /// refreshes it in place when it already sits in `current` (a member
    /// that returned without ever leaving the partition). Rejects ids
    /// tracked in neither partition.
    pub fn move_to_current(&mut self, mut member: Member) -> Result<(), RosterError> {
        let id = require_id(&member)?;
        member.is_active = true;
        if self.archive.remove(&id).is_some() || self.current.contains_key(&id) {
            self.current.insert(id, member);
            return Ok(());
        }
        Err(RosterError::NotTracked {
            player_id: id,
            username: member.username,
        })
    }

    /// Move a member out of `current` into `archive`. Strict: the member
    /// must currently be active.
    pub fn move_to_archive(&mut self, member: &Member) -> Result<(), RosterError> {
        let id = require_id(member)?;
        let Some(mut departed) = self.current.remove(&id) else {
            return Err(RosterError::NotCurrent {
                player_id: id,
                username: member.username.clone(),
            });
        };
        departed.is_active = false;
        self.archive.insert(id, departed);
        Ok(())
    }

    /// Refresh the display fields of a member already in `current`
    /// without any partition effect (a pure rename).
    pub fn update_current(&mut self, member: Member) -> Result<(), RosterError> {
        let id = require_id(&member)?;
        let Some(slot) = self.current.get_mut(&id) else {
            return Err(RosterError::NotCurrent {
                player_id: id,
                username: member.username,
            });
        };
        slot.username = member.username;
        slot.joined = member.joined;
        Ok(())
    }
}

fn require_id(member: &Member) -> Result<u64, RosterError> {
    member.player_id.ok_or_else(|| RosterError::MissingPlayerId {
        username: member.username.clone(),
    })
}
