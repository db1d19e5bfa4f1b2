//! Person/vehicle use-case service.
//!
//! # Responsibility
//! - Provide name-addressed association APIs for core callers.
//! - Resolve caller-supplied collection names before any store work.
//! - Delegate persistence to the association store.
//!
//! # Invariants
//! - Service APIs never bypass store validation/persistence contracts.
//! - Association mutations read the collection back after the write, so
//!   callers always observe the applied state.

use crate::model::person::{Person, PersonId};
use crate::model::vehicle::{Vehicle, VehicleId};
use crate::repo::person_repo::{
    parse_collection, PersonRecord, PersonStore, StoreResult, UpsertVehicleMode,
};

/// Use-case service wrapper around an association store.
///
/// The store handle is injected at construction; the service owns no
/// connection state of its own.
pub struct PersonService<S: PersonStore> {
    store: S,
}

impl<S: PersonStore> PersonService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Inserts a person plus supplied collections in one transaction.
    pub fn create_person(&mut self, record: &PersonRecord) -> StoreResult<PersonId> {
        self.store.create_person(record)
    }

    /// Inserts or updates a person matched by live unique name.
    ///
    /// See [`UpsertVehicleMode`] for the collection handling policy; the
    /// default mode duplicates prior members on repeated calls.
    pub fn upsert_person(
        &mut self,
        record: &PersonRecord,
        mode: UpsertVehicleMode,
    ) -> StoreResult<PersonId> {
        self.store.upsert_person_by_name(record, mode)
    }

    /// Finds a live person by unique name with eagerly loaded collections.
    pub fn find_person(&self, name: &str) -> StoreResult<PersonRecord> {
        self.store.find_person_by_name(name)
    }

    /// Updates name/age/sex only; collections are never touched.
    pub fn update_scalars(&mut self, person: &Person) -> StoreResult<()> {
        self.store.update_person_scalars(person)
    }

    /// Lists the current members of a collection named by text.
    ///
    /// Undeclared collection names fail with `InvalidAssociation` before
    /// the person lookup runs.
    pub fn vehicles_of(&self, person_name: &str, collection: &str) -> StoreResult<Vec<Vehicle>> {
        let kind = parse_collection(collection)?;
        let person_id = self.resolve(person_name)?;
        self.store.list_association(person_id, kind)
    }

    /// Replaces a collection with exactly `members`; prior members are
    /// unlinked as orphans. Returns the collection after the write.
    pub fn replace_vehicles(
        &mut self,
        person_name: &str,
        collection: &str,
        members: &[Vehicle],
    ) -> StoreResult<Vec<Vehicle>> {
        let kind = parse_collection(collection)?;
        let person_id = self.resolve(person_name)?;
        self.store.replace_association(person_id, kind, members)?;
        self.store.list_association(person_id, kind)
    }

    /// Appends new members to a collection without touching existing ones.
    /// Returns the collection after the write.
    pub fn append_vehicles(
        &mut self,
        person_name: &str,
        collection: &str,
        members: &[Vehicle],
    ) -> StoreResult<Vec<Vehicle>> {
        let kind = parse_collection(collection)?;
        let person_id = self.resolve(person_name)?;
        self.store.append_association(person_id, kind, members)?;
        self.store.list_association(person_id, kind)
    }

    /// Removes the named members from a collection.
    ///
    /// `permanent=true` deletes the rows; otherwise they are unlinked and
    /// remain stored as orphans. Returns the collection after the write.
    pub fn remove_vehicles(
        &mut self,
        person_name: &str,
        collection: &str,
        member_ids: &[VehicleId],
        permanent: bool,
    ) -> StoreResult<Vec<Vehicle>> {
        let kind = parse_collection(collection)?;
        let person_id = self.resolve(person_name)?;
        self.store
            .delete_association(person_id, kind, member_ids, permanent)?;
        self.store.list_association(person_id, kind)
    }

    /// Deletes a person by name with explicit cascade/permanence policy.
    pub fn delete_person(
        &mut self,
        person_name: &str,
        cascade: bool,
        permanent: bool,
    ) -> StoreResult<()> {
        let person_id = self.resolve(person_name)?;
        self.store.delete_person(person_id, cascade, permanent)
    }

    fn resolve(&self, person_name: &str) -> StoreResult<PersonId> {
        Ok(self.store.find_person_by_name(person_name)?.person.uuid)
    }
}
