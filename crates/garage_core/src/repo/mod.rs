//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the association store contract for people and their vehicles.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce model validation before SQL mutations.
//! - Multi-row mutations run in a single transaction; a failed operation
//!   leaves storage unchanged.
//! - Repository APIs return semantic errors (`PersonNotFound`,
//!   `InvalidAssociation`, `ConstraintViolation`) in addition to DB
//!   transport errors.

pub mod person_repo;
