//! Vehicle domain model.
//!
//! # Responsibility
//! - Define the owned side of the person/vehicle association.
//! - Name the two declared collections (`cars`, `bikes`) through
//!   [`VehicleKind`].
//!
//! # Invariants
//! - A vehicle with `owner == None` is orphaned: stored, but unassociated.
//! - A linked live vehicle must reference a live person; the store enforces
//!   this on every write path.

use crate::model::person::PersonId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a vehicle.
pub type VehicleId = Uuid;

/// Declared vehicle collections on a person.
///
/// The two collections share one storage shape and are fully independent;
/// every store operation is scoped to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    Car,
    Bike,
}

impl VehicleKind {
    /// Collection label used in caller-facing messages and logs.
    pub fn collection_name(self) -> &'static str {
        match self {
            Self::Car => "cars",
            Self::Bike => "bikes",
        }
    }
}

/// Canonical vehicle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Stable global ID.
    pub uuid: VehicleId,
    /// Collection this vehicle belongs to.
    pub kind: VehicleKind,
    /// Descriptive name, e.g. a model designation.
    pub name: String,
    /// Manufacturer label.
    pub brand: String,
    /// Back-reference to the owning person; `None` means orphaned.
    pub owner: Option<PersonId>,
    /// Soft delete tombstone.
    pub is_deleted: bool,
}

/// Validation failure for vehicle field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleValidationError {
    /// Name is empty or whitespace-only.
    EmptyName,
    /// Brand is empty or whitespace-only.
    EmptyBrand,
}

impl Display for VehicleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "vehicle name cannot be empty"),
            Self::EmptyBrand => write!(f, "vehicle brand cannot be empty"),
        }
    }
}

impl Error for VehicleValidationError {}

impl Vehicle {
    /// Creates a new unowned vehicle with a generated stable ID.
    pub fn new(kind: VehicleKind, name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), kind, name, brand)
    }

    /// Creates a new unowned vehicle with a caller-provided stable ID.
    pub fn with_id(
        uuid: VehicleId,
        kind: VehicleKind,
        name: impl Into<String>,
        brand: impl Into<String>,
    ) -> Self {
        Self {
            uuid,
            kind,
            name: name.into(),
            brand: brand.into(),
            owner: None,
            is_deleted: false,
        }
    }

    /// Checks field-level rules before any write path touches storage.
    pub fn validate(&self) -> Result<(), VehicleValidationError> {
        if self.name.trim().is_empty() {
            return Err(VehicleValidationError::EmptyName);
        }
        if self.brand.trim().is_empty() {
            return Err(VehicleValidationError::EmptyBrand);
        }
        Ok(())
    }

    /// Returns whether this vehicle has no owning person.
    pub fn is_orphaned(&self) -> bool {
        self.owner.is_none()
    }

    /// Returns whether this vehicle should be considered visible/active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
