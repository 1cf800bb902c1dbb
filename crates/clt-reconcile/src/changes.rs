//! Change categories and the per-run change set.

use std::fmt::Write as _;

use clt_schemas::Member;

/// Where a category's members end up after the report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterEffect {
    ToCurrent,
    ToArchive,
    /// A pure rename: display fields update in place, the partition does
    /// not change.
    None,
}

/// The nine mutually exclusive classifications of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeKind {
    Left,
    Joined,
    Closed,
    Reopened,
    Returned,
    Renamed,
    RenamedGone,
    RenamedReopened,
    RenamedReturned,
}

impl ChangeKind {
    /// Fixed report and apply order.
    pub const ALL: [ChangeKind; 9] = [
        ChangeKind::Left,
        ChangeKind::Joined,
        ChangeKind::Closed,
        ChangeKind::Reopened,
        ChangeKind::Returned,
        ChangeKind::Renamed,
        ChangeKind::RenamedGone,
        ChangeKind::RenamedReopened,
        ChangeKind::RenamedReturned,
    ];

    /// Heading printed above the category's entries.
    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::Left => "goners",
            ChangeKind::Joined => "newbies",
            ChangeKind::Closed => "closed",
            ChangeKind::Reopened => "reopened",
            ChangeKind::Returned => "returned",
            ChangeKind::Renamed => "renamed",
            ChangeKind::RenamedGone => "renamed & gone",
            ChangeKind::RenamedReopened => "reopened & renamed",
            ChangeKind::RenamedReturned => "renamed & returned",
        }
    }

    pub fn effect(self) -> RosterEffect {
        match self {
            ChangeKind::Left | ChangeKind::Closed | ChangeKind::RenamedGone => {
                RosterEffect::ToArchive
            }
            ChangeKind::Joined
            | ChangeKind::Reopened
            | ChangeKind::Returned
            | ChangeKind::RenamedReopened
            | ChangeKind::RenamedReturned => RosterEffect::ToCurrent,
            ChangeKind::Renamed => RosterEffect::None,
        }
    }
}

/// An old roster record paired with its newly observed form. The new
/// username (and join time) are recorded against the old record when the
/// change is applied; the player id never changes.
#[derive(Debug, Clone)]
pub struct RenamePair {
    pub old: Member,
    pub new: Member,
}

/// Borrowed view of one category's entries: plain members for the simple
/// categories, (old, new) pairs for the rename variants.
#[derive(Debug)]
pub enum Entries<'a> {
    Members(&'a [Member]),
    Renames(&'a [RenamePair]),
}

impl Entries<'_> {
    pub fn len(&self) -> usize {
        match self {
            Entries::Members(m) => m.len(),
            Entries::Renames(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-run accumulation of classified changes. One bucket per category;
/// the bucket shape (members vs rename pairs) is fixed by the category.
#[derive(Debug, Default)]
pub struct ChangeSet {
    pub left: Vec<Member>,
    pub joined: Vec<Member>,
    pub closed: Vec<Member>,
    pub reopened: Vec<Member>,
    pub returned: Vec<Member>,
    pub renamed: Vec<RenamePair>,
    pub renamed_gone: Vec<Member>,
    pub renamed_reopened: Vec<RenamePair>,
    pub renamed_returned: Vec<RenamePair>,
}

impl ChangeSet {
    pub fn entries(&self, kind: ChangeKind) -> Entries<'_> {
        match kind {
            ChangeKind::Left => Entries::Members(&self.left),
            ChangeKind::Joined => Entries::Members(&self.joined),
            ChangeKind::Closed => Entries::Members(&self.closed),
            ChangeKind::Reopened => Entries::Members(&self.reopened),
            ChangeKind::Returned => Entries::Members(&self.returned),
            ChangeKind::Renamed => Entries::Renames(&self.renamed),
            ChangeKind::RenamedGone => Entries::Members(&self.renamed_gone),
            ChangeKind::RenamedReopened => Entries::Renames(&self.renamed_reopened),
            ChangeKind::RenamedReturned => Entries::Renames(&self.renamed_returned),
        }
    }

    /// Total entry count across all categories.
    pub fn len(&self) -> usize {
        ChangeKind::ALL
            .iter()
            .map(|k| self.entries(*k).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sort every bucket by username; rename pairs sort by the *new*
    /// username, which is what the report shows last.
    pub fn sort_entries(&mut self) {
        for bucket in [
            &mut self.left,
            &mut self.joined,
            &mut self.closed,
            &mut self.reopened,
            &mut self.returned,
            &mut self.renamed_gone,
        ] {
            bucket.sort_by(|a, b| a.username.cmp(&b.username));
        }
        for bucket in [
            &mut self.renamed,
            &mut self.renamed_reopened,
            &mut self.renamed_returned,
        ] {
            bucket.sort_by(|a, b| a.new.username.cmp(&b.new.username));
        }
    }

    /// The change report body: per non-empty category, in the fixed
    /// order, a `label: count` heading followed by one line per entry.
    /// Assumes [`ChangeSet::sort_entries`] has run.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for kind in ChangeKind::ALL {
            match self.entries(kind) {
                Entries::Members(members) if !members.is_empty() => {
                    let _ = writeln!(out, "{}: {}", kind.label(), members.len());
                    for m in members {
                        let _ = writeln!(out, "{} {}", m.username, m.profile_url());
                    }
                }
                Entries::Renames(pairs) if !pairs.is_empty() => {
                    let _ = writeln!(out, "{}: {}", kind.label(), pairs.len());
                    for p in pairs {
                        let _ = writeln!(
                            out,
                            "{} -> {} {}",
                            p.old.username,
                            p.new.username,
                            p.new.profile_url()
                        );
                    }
                }
                _ => {}
            }
        }
        out
    }
}
