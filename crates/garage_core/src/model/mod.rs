//! Domain model for people and their owned vehicle collections.
//!
//! # Responsibility
//! - Define the canonical data structures used by the association store.
//! - Keep validation rules next to the data they protect.
//!
//! # Invariants
//! - Every domain object is identified by a stable surrogate id.
//! - Deletion is represented by soft-delete tombstones unless a caller
//!   explicitly requests permanent removal.

pub mod person;
pub mod vehicle;
