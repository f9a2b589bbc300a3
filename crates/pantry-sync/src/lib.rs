//! Pantry client sync: the in-memory state containers behind every view.
//!
//! Everything here is synchronous, I/O-free and owned by exactly one task:
//! [`EntityStore`] (de-duplicated ordered collections), [`PageCursor`]
//! (page / has-more bookkeeping with stale-response tickets), [`Counter`] and
//! [`CounterMap`] (badge state kept apart from the entities),
//! [`ProfileDirectory`] (the canonical copy of account snapshots) and
//! [`Adjustments`] (a pending/commit/rollback ledger for optimistic counts).

pub mod counters;
pub mod cursor;
pub mod directory;
pub mod optimistic;
pub mod store;

pub use counters::{Counter, CounterMap};
pub use cursor::{LoadOutcome, LoadTicket, PageCursor};
pub use directory::ProfileDirectory;
pub use optimistic::{AdjustmentId, Adjustments};
pub use store::{Applied, EntityStore, PushPlacement, Record};
