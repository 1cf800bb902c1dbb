//! CSV persistence for rosters.
//!
//! One file per club: `<data_dir>/<club>/members.csv` with the header
//! `username,player_id,joined,is_active`. Absent numeric values are
//! written as `0`; `is_active` as `1`/`0`. The file is read wholesale at
//! run start and overwritten wholesale at run end.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use clt_schemas::Member;

use crate::Roster;

const FILE_NAME: &str = "members.csv";

/// Flat row shape of the persisted store.
#[derive(Debug, Serialize, Deserialize)]
struct RosterRow {
    username: String,
    player_id: u64,
    joined: i64,
    is_active: u8,
}

impl From<&Member> for RosterRow {
    fn from(m: &Member) -> Self {
        RosterRow {
            username: m.username.clone(),
            player_id: m.player_id.unwrap_or(0),
            joined: m.joined.unwrap_or(0),
            is_active: u8::from(m.is_active),
        }
    }
}

pub fn roster_path(data_dir: &Path, club: &str) -> PathBuf {
    data_dir.join(club).join(FILE_NAME)
}

/// Load a club's roster. A missing file is a first run: logs a warning
/// and returns an empty roster. Rows without a username, player id, or
/// join time are unusable for matching and are skipped with a warning.
pub fn load_roster(data_dir: &Path, club: &str) -> Result<Roster> {
    let path = roster_path(data_dir, club);
    if !path.exists() {
        warn!(path = %path.display(), "no roster file; starting from an empty roster");
        return Ok(Roster::new());
    }

    let mut reader = csv::Reader::from_path(&path)
        .with_context(|| format!("failed to open roster: {}", path.display()))?;

    let mut members: Vec<Member> = Vec::new();
    for record in reader.deserialize::<RosterRow>() {
        let row = record
            .with_context(|| format!("malformed roster row in {}", path.display()))?;
        if row.username.is_empty() || row.player_id == 0 || row.joined == 0 {
            warn!(username = %row.username, "skipping incomplete roster row");
            continue;
        }
        members.push(Member {
            username: row.username,
            player_id: Some(row.player_id),
            joined: Some(row.joined),
            is_active: row.is_active != 0,
        });
    }

    Ok(Roster::from_members(members))
}

/// Persist a club's roster, overwriting any previous file. Output order
/// is deterministic: active members first, then by username.
pub fn save_roster(data_dir: &Path, club: &str, roster: &Roster) -> Result<()> {
    let dir = data_dir.join(club);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create roster dir: {}", dir.display()))?;

    let path = dir.join(FILE_NAME);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to write roster: {}", path.display()))?;

    for member in roster.all_sorted() {
        writer
            .serialize(RosterRow::from(&member))
            .with_context(|| format!("failed to serialize roster row for '{}'", member.username))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush roster: {}", path.display()))?;
    Ok(())
}
