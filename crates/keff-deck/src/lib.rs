//! Input-deck handling for the sweep harness.
//!
//! The simulator's deck is positional, not self-describing: specific
//! 1-based lines carry a record label, one scientific-notation value, and a
//! fixed trailing classification code. This crate models the deck as raw
//! lines with their terminators intact, rewrites only the targeted fields,
//! and owns the backup/restore lifecycle around a sweep.

mod backup;
mod deck;
mod patch;

pub use backup::{backup_path_for, restore_from_backup, BackupGuard};
pub use deck::Deck;
pub use patch::{patch_field, patch_linked_fields, FieldTarget};
