//! Person domain model.
//!
//! # Responsibility
//! - Define the owning side of the person/vehicle association.
//! - Provide lifecycle helpers for soft-delete semantics.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another person.
//! - `name` is unique among live (non-tombstoned) people; the partial unique
//!   index in the schema enforces this at the storage layer.
//! - `is_deleted` is the source of truth for tombstone state.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a person.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PersonId = Uuid;

const MAX_AGE: i64 = 150;

/// Categorical sex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// Canonical person record.
///
/// Owned vehicle collections are not embedded here; they are loaded through
/// the store read model so scalar updates can never drag collection state
/// along implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Stable global ID used for linking and auditing.
    pub uuid: PersonId,
    /// Human-readable name, unique among live people.
    pub name: String,
    /// Age in whole years.
    pub age: i64,
    pub sex: Sex,
    /// Soft delete tombstone; tombstoned rows keep their storage.
    pub is_deleted: bool,
}

/// Validation failure for person field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    /// Name is empty or whitespace-only.
    EmptyName,
    /// Age is negative or implausibly large.
    AgeOutOfRange(i64),
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "person name cannot be empty"),
            Self::AgeOutOfRange(age) => {
                write!(f, "person age {age} is outside the accepted range 0..={MAX_AGE}")
            }
        }
    }
}

impl Error for PersonValidationError {}

impl Person {
    /// Creates a new person with a generated stable ID.
    pub fn new(name: impl Into<String>, age: i64, sex: Sex) -> Self {
        Self::with_id(Uuid::new_v4(), name, age, sex)
    }

    /// Creates a new person with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(uuid: PersonId, name: impl Into<String>, age: i64, sex: Sex) -> Self {
        Self {
            uuid,
            name: name.into(),
            age,
            sex,
            is_deleted: false,
        }
    }

    /// Checks field-level rules before any write path touches storage.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.name.trim().is_empty() {
            return Err(PersonValidationError::EmptyName);
        }
        if !(0..=MAX_AGE).contains(&self.age) {
            return Err(PersonValidationError::AgeOutOfRange(self.age));
        }
        Ok(())
    }

    /// Marks this person as softly deleted (tombstoned).
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Clears the soft delete flag.
    pub fn restore(&mut self) {
        self.is_deleted = false;
    }

    /// Returns whether this person should be considered visible/active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
