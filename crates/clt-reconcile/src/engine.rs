//! The reconciliation pass: diff, classify, report, apply.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{debug, info};

use clt_api::{ClubDirectory, ClubProfile};
use clt_roster::{Roster, RosterError};
use clt_schemas::Member;

use crate::{ChangeKind, ChangeSet, Entries, RenamePair, RosterEffect};

/// Run one full reconciliation pass against a club.
///
/// Fetches the live member list, classifies every difference from the
/// stored roster, prints the change report and the trailing total to
/// stdout, and applies the partition moves. The roster is left describing
/// the newly observed state; the caller decides whether to persist it.
pub async fn reconcile_club(
    directory: &dyn ClubDirectory,
    club: &ClubProfile,
    roster: &mut Roster,
) -> Result<()> {
    let incoming = directory
        .club_members(&club.url_name)
        .await
        .with_context(|| format!("failed to fetch member list for '{}'", club.url_name))?;
    info!(
        club = %club.url_name,
        incoming = incoming.len(),
        tracked = roster.active_count(),
        "reconciling membership"
    );

    let changes = classify(directory, &club.url, roster, &incoming).await?;

    print!("{}", changes.render());
    apply(roster, &changes).context("roster update failed")?;
    println!("total: {}", roster.active_count());
    Ok(())
}

/// Classify the difference between the stored roster and an incoming
/// member snapshot into the nine change categories.
///
/// Failures resolving a new member's player id are fatal: without an id
/// the member could never be matched again. A failure of the departure
/// disambiguation lookup is recovered into `renamed & gone`.
///
/// The returned set is sorted ready for rendering.
pub async fn classify(
    directory: &dyn ClubDirectory,
    club_url: &str,
    roster: &Roster,
    incoming: &[Member],
) -> Result<ChangeSet> {
    let (mut additions, deletions) = diff(roster.current(), incoming);

    for member in &mut additions {
        if member.player_id.is_none() {
            let id = directory
                .player_id(&member.username)
                .await
                .with_context(|| {
                    format!("failed to resolve player id for '{}'", member.username)
                })?;
            member.player_id = Some(id);
        }
    }

    // Id-keyed view of the additions; ids are resolved above, but any
    // member that still lacks one is simply unmatchable by id.
    let additions_by_id: BTreeMap<u64, usize> = additions
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.player_id.map(|id| (id, i)))
        .collect();

    let mut claimed = vec![false; additions.len()];
    let mut changes = ChangeSet::default();

    // Names that disappeared from the member list.
    for mut old in deletions {
        let reappeared = old
            .player_id
            .and_then(|id| additions_by_id.get(&id).copied());
        if let Some(idx) = reappeared {
            // Same individual, observed under a new username and/or join
            // time. The matching addition is accounted for.
            claimed[idx] = true;
            let new = &additions[idx];
            if old.username == new.username {
                old.joined = new.joined;
                changes.returned.push(old);
            } else if old.joined == new.joined {
                changes.renamed.push(RenamePair {
                    old,
                    new: new.clone(),
                });
            } else {
                changes.renamed_returned.push(RenamePair {
                    old,
                    new: new.clone(),
                });
            }
            continue;
        }

        // Truly absent from the list. The profile's club list tells a
        // closed account (still a member, just hidden) from a departure.
        match directory.player_club_urls(&old.username).await {
            Ok(urls) if urls.iter().any(|u| u == club_url) => changes.closed.push(old),
            Ok(_) => changes.left.push(old),
            Err(err) => {
                // Renamed and then left or closed; the old profile no
                // longer answers, so the cases cannot be told apart.
                debug!(username = %old.username, error = %err, "departure check failed");
                changes.renamed_gone.push(old);
            }
        }
    }

    // Remaining new names: returning archive members or genuine joiners.
    for (idx, new) in additions.into_iter().enumerate() {
        if claimed[idx] {
            continue;
        }
        let archived = new
            .player_id
            .and_then(|id| roster.archive().get(&id))
            .cloned();
        if let Some(mut old) = archived {
            if old.username == new.username {
                if old.joined == new.joined {
                    changes.reopened.push(old);
                } else {
                    // Take the observed join time so the next pass sees
                    // this record as unchanged.
                    old.joined = new.joined;
                    changes.returned.push(old);
                }
            } else if old.joined == new.joined {
                changes.renamed_reopened.push(RenamePair { old, new });
            } else {
                changes.renamed_returned.push(RenamePair { old, new });
            }
        } else {
            changes.joined.push(new);
        }
    }

    changes.sort_entries();
    Ok(changes)
}

/// Apply each category's partition effect, in the fixed category order.
///
/// Rename variants first record the new username and join time against
/// the old record; the player id is untouched. A precondition failure in
/// the store surfaces as an error, it is never patched over.
pub fn apply(roster: &mut Roster, changes: &ChangeSet) -> Result<(), RosterError> {
    for kind in ChangeKind::ALL {
        match changes.entries(kind) {
            Entries::Members(members) => {
                for member in members {
                    match kind.effect() {
                        RosterEffect::ToArchive => roster.move_to_archive(member)?,
                        RosterEffect::ToCurrent => {
                            if kind == ChangeKind::Joined {
                                roster.insert_current(member.clone())?;
                            } else {
                                roster.move_to_current(member.clone())?;
                            }
                        }
                        RosterEffect::None => {}
                    }
                }
            }
            Entries::Renames(pairs) => {
                for pair in pairs {
                    let mut updated = pair.old.clone();
                    updated.username = pair.new.username.clone();
                    updated.joined = pair.new.joined;
                    match kind.effect() {
                        RosterEffect::None => roster.update_current(updated)?,
                        RosterEffect::ToCurrent => roster.move_to_current(updated)?,
                        RosterEffect::ToArchive => {}
                    }
                }
            }
        }
    }
    Ok(())
}

/// Identity diff of the member list against the active partition.
///
/// `additions` are incoming members with no identity match among the
/// active members; `deletions` are active members with no identity match
/// in the incoming list. Both come back sorted by username so every later
/// step (including the order of remote lookups) is deterministic.
fn diff(current: &BTreeMap<u64, Member>, incoming: &[Member]) -> (Vec<Member>, Vec<Member>) {
    let mut additions: Vec<Member> = incoming
        .iter()
        .filter(|inc| !current.values().any(|cur| cur.same_identity(inc)))
        .cloned()
        .collect();
    let mut deletions: Vec<Member> = current
        .values()
        .filter(|cur| !incoming.iter().any(|inc| inc.same_identity(cur)))
        .cloned()
        .collect();

    additions.sort_by(|a, b| a.username.cmp(&b.username));
    deletions.sort_by(|a, b| a.username.cmp(&b.username));
    (additions, deletions)
}
