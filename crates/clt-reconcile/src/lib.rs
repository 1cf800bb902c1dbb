//! clt-reconcile
//!
//! The membership reconciliation engine.
//!
//! Given the stored roster and the club's live member list, classify every
//! difference into one of nine mutually exclusive change categories, print
//! a deterministic report, and apply the corresponding partition moves.
//! The change set is plain per-run state, built fresh for every pass.
//!
//! Remote lookups (id resolution, departure disambiguation) go through the
//! [`clt_api::ClubDirectory`] trait; everything else is deterministic, pure
//! logic.

mod changes;
mod engine;

pub use changes::{ChangeKind, ChangeSet, Entries, RenamePair, RosterEffect};
pub use engine::{apply, classify, reconcile_club};
