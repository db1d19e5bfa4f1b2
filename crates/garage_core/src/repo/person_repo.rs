//! Association store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and association APIs over `people`/`vehicles`
//!   storage.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths must call model `validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Every multi-row mutation is a single `IMMEDIATE` transaction.
//!
//! # Association policy
//! - `replace_association` unlinks prior members (owner cleared, row
//!   retained as orphan); it never deletes. Callers that want prior members
//!   gone use `delete_association(.., permanent: true)` followed by
//!   `append_association`.
//! - `upsert_person_by_name` with [`UpsertVehicleMode::InsertNew`] (the
//!   default) inserts the supplied vehicles as brand-new rows and leaves
//!   prior members linked, so repeated upserts grow duplicate rows. This
//!   mirrors the upsert-all behavior of typical ORMs and is kept as a
//!   documented footgun; use [`UpsertVehicleMode::Reconcile`] for
//!   convergent collection state.

use crate::db::DbError;
use crate::model::person::{Person, PersonId, PersonValidationError, Sex};
use crate::model::vehicle::{Vehicle, VehicleId, VehicleKind, VehicleValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PERSON_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    age,
    sex,
    is_deleted
FROM people";

const VEHICLE_SELECT_SQL: &str = "SELECT
    uuid,
    kind,
    name,
    brand,
    owner_uuid,
    is_deleted
FROM vehicles";

pub type StoreResult<T> = Result<T, StoreError>;

/// Generic store error for person/vehicle persistence and association
/// operations.
#[derive(Debug)]
pub enum StoreError {
    InvalidPerson(PersonValidationError),
    InvalidVehicle(VehicleValidationError),
    Db(DbError),
    /// Lookup miss; carries the key text (uuid or unique name).
    PersonNotFound(String),
    VehicleNotFound(VehicleId),
    /// Caller named a collection that is not declared on `Person`.
    InvalidAssociation(String),
    /// Uniqueness or referential constraint breach; nothing was applied.
    ConstraintViolation(String),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPerson(err) => write!(f, "{err}"),
            Self::InvalidVehicle(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::PersonNotFound(key) => write!(f, "person not found: {key}"),
            Self::VehicleNotFound(id) => write!(f, "vehicle not found: {id}"),
            Self::InvalidAssociation(name) => write!(
                f,
                "undeclared association `{name}`; declared collections are `cars` and `bikes`"
            ),
            Self::ConstraintViolation(details) => write!(f, "constraint violation: {details}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{column}` on table `{table}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPerson(err) => Some(err),
            Self::InvalidVehicle(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PersonValidationError> for StoreError {
    fn from(value: PersonValidationError) -> Self {
        Self::InvalidPerson(value)
    }
}

impl From<VehicleValidationError> for StoreError {
    fn from(value: VehicleValidationError) -> Self {
        Self::InvalidVehicle(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, message) = &value {
            if code.code == rusqlite::ErrorCode::ConstraintViolation {
                return Self::ConstraintViolation(
                    message.clone().unwrap_or_else(|| value.to_string()),
                );
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Resolves a caller-supplied collection name to a declared collection.
///
/// Accepts the collection labels (`cars`, `bikes`) and their singular forms,
/// case-insensitively. Anything else fails with
/// [`StoreError::InvalidAssociation`].
pub fn parse_collection(name: &str) -> StoreResult<VehicleKind> {
    match name.trim().to_ascii_lowercase().as_str() {
        "cars" | "car" => Ok(VehicleKind::Car),
        "bikes" | "bike" => Ok(VehicleKind::Bike),
        _ => Err(StoreError::InvalidAssociation(name.to_string())),
    }
}

/// Collection handling mode for `upsert_person_by_name` on an existing
/// match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpsertVehicleMode {
    /// Insert the supplied vehicles as brand-new linked rows; prior members
    /// stay linked. Repeated upserts therefore accumulate duplicate child
    /// rows on the same person.
    #[default]
    InsertNew,
    /// Hard-delete all vehicles currently linked to the person, then insert
    /// the supplied sets; both collections end exactly equal to the request.
    Reconcile,
}

/// Read/write aggregate: a person together with both owned collections.
///
/// On writes, the `owner` field of supplied members is ignored; the store
/// links every member to `person.uuid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub person: Person,
    pub cars: Vec<Vehicle>,
    pub bikes: Vec<Vehicle>,
}

impl PersonRecord {
    /// Wraps a person with empty collections.
    pub fn new(person: Person) -> Self {
        Self {
            person,
            cars: Vec::new(),
            bikes: Vec::new(),
        }
    }

    /// Validates the person and every member, including collection/kind
    /// agreement.
    pub fn validate(&self) -> StoreResult<()> {
        self.person.validate()?;
        validate_members(VehicleKind::Car, &self.cars)?;
        validate_members(VehicleKind::Bike, &self.bikes)?;
        Ok(())
    }
}

/// Association store interface.
///
/// The store handle is passed explicitly wherever it is needed; there is no
/// process-global connection state.
pub trait PersonStore {
    /// Inserts a person plus all supplied collection members in one
    /// transaction.
    ///
    /// A duplicate live name fails with `ConstraintViolation` and applies
    /// nothing.
    fn create_person(&mut self, record: &PersonRecord) -> StoreResult<PersonId>;

    /// Inserts or updates a person matched by live unique name.
    ///
    /// On a match, scalar fields are updated in place (the stored row keeps
    /// its original id) and collections are handled per `mode`. After the
    /// call exactly one live person row carries the name.
    fn upsert_person_by_name(
        &mut self,
        record: &PersonRecord,
        mode: UpsertVehicleMode,
    ) -> StoreResult<PersonId>;

    /// Finds a live person by unique name with both collections eagerly
    /// loaded. Fails with `PersonNotFound` when no live match exists.
    fn find_person_by_name(&self, name: &str) -> StoreResult<PersonRecord>;

    /// Gets one person by id with optional tombstone visibility.
    fn get_person(&self, id: PersonId, include_deleted: bool) -> StoreResult<Option<PersonRecord>>;

    /// Updates name/age/sex only; collections are never touched.
    fn update_person_scalars(&mut self, person: &Person) -> StoreResult<()>;

    /// Deletes a person.
    ///
    /// - `cascade=true, permanent=true`: linked vehicles and the person row
    ///   are removed outright.
    /// - `cascade=true, permanent=false`: linked vehicles and the person are
    ///   tombstoned; links are kept.
    /// - `cascade=false`: linked vehicles are unlinked first (left as live
    ///   orphans), then the person row is removed or tombstoned per
    ///   `permanent`.
    fn delete_person(&mut self, id: PersonId, cascade: bool, permanent: bool) -> StoreResult<()>;

    /// Creates a standalone vehicle. A supplied owner must name a live
    /// person.
    fn create_vehicle(&mut self, vehicle: &Vehicle) -> StoreResult<VehicleId>;

    /// Gets one vehicle by id with optional tombstone visibility.
    fn get_vehicle(&self, id: VehicleId, include_deleted: bool) -> StoreResult<Option<Vehicle>>;

    /// Returns the current live members of one collection.
    fn list_association(&self, person_id: PersonId, kind: VehicleKind)
        -> StoreResult<Vec<Vehicle>>;

    /// Sets the collection to exactly `members`.
    ///
    /// Prior members are unlinked, never deleted: their owner reference is
    /// cleared and their rows remain stored as orphans. Callers accepting
    /// the storage growth this implies can prune via
    /// `delete_association(.., permanent: true)`.
    fn replace_association(
        &mut self,
        person_id: PersonId,
        kind: VehicleKind,
        members: &[Vehicle],
    ) -> StoreResult<()>;

    /// Inserts new linked members without touching existing ones.
    fn append_association(
        &mut self,
        person_id: PersonId,
        kind: VehicleKind,
        members: &[Vehicle],
    ) -> StoreResult<()>;

    /// Removes the named members from the collection.
    ///
    /// With `permanent=true` the rows are deleted outright; otherwise they
    /// are only unlinked and remain stored as orphans. Every id must name a
    /// live member of this person's collection, else the call fails with
    /// `VehicleNotFound` and applies nothing.
    fn delete_association(
        &mut self,
        person_id: PersonId,
        kind: VehicleKind,
        member_ids: &[VehicleId],
        permanent: bool,
    ) -> StoreResult<()>;
}

/// SQLite-backed association store.
pub struct SqlitePersonStore<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePersonStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> StoreResult<Self> {
        ensure_store_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PersonStore for SqlitePersonStore<'_> {
    fn create_person(&mut self, record: &PersonRecord) -> StoreResult<PersonId> {
        record.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        insert_person_row(&tx, &record.person)?;
        insert_members(&tx, record.person.uuid, &record.cars)?;
        insert_members(&tx, record.person.uuid, &record.bikes)?;
        tx.commit()?;

        Ok(record.person.uuid)
    }

    fn upsert_person_by_name(
        &mut self,
        record: &PersonRecord,
        mode: UpsertVehicleMode,
    ) -> StoreResult<PersonId> {
        record.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT uuid FROM people WHERE name = ?1 AND is_deleted = 0;",
                [record.person.name.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let id = match existing {
            Some(uuid_text) => {
                let id = parse_uuid(&uuid_text, "people.uuid")?;
                tx.execute(
                    "UPDATE people
                     SET
                        age = ?2,
                        sex = ?3,
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE uuid = ?1;",
                    params![uuid_text, record.person.age, sex_to_db(record.person.sex)],
                )?;

                if mode == UpsertVehicleMode::Reconcile {
                    tx.execute(
                        "DELETE FROM vehicles WHERE owner_uuid = ?1;",
                        [uuid_text.as_str()],
                    )?;
                }
                insert_members(&tx, id, &record.cars)?;
                insert_members(&tx, id, &record.bikes)?;
                id
            }
            None => {
                insert_person_row(&tx, &record.person)?;
                insert_members(&tx, record.person.uuid, &record.cars)?;
                insert_members(&tx, record.person.uuid, &record.bikes)?;
                record.person.uuid
            }
        };

        tx.commit()?;
        Ok(id)
    }

    fn find_person_by_name(&self, name: &str) -> StoreResult<PersonRecord> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE name = ?1 AND is_deleted = 0;"))?;

        let mut rows = stmt.query([name])?;
        let Some(row) = rows.next()? else {
            return Err(StoreError::PersonNotFound(name.to_string()));
        };

        let person = parse_person_row(row)?;
        load_record(&*self.conn, person)
    }

    fn get_person(&self, id: PersonId, include_deleted: bool) -> StoreResult<Option<PersonRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let person = parse_person_row(row)?;
        Ok(Some(load_record(&*self.conn, person)?))
    }

    fn update_person_scalars(&mut self, person: &Person) -> StoreResult<()> {
        person.validate()?;

        let changed = self.conn.execute(
            "UPDATE people
             SET
                name = ?2,
                age = ?3,
                sex = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            params![
                person.uuid.to_string(),
                person.name.as_str(),
                person.age,
                sex_to_db(person.sex),
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::PersonNotFound(person.uuid.to_string()));
        }

        Ok(())
    }

    fn delete_person(&mut self, id: PersonId, cascade: bool, permanent: bool) -> StoreResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let id_text = id.to_string();

        let exists: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM people WHERE uuid = ?1;",
                [id_text.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::PersonNotFound(id_text));
        }

        if cascade {
            if permanent {
                tx.execute(
                    "DELETE FROM vehicles WHERE owner_uuid = ?1;",
                    [id_text.as_str()],
                )?;
            } else {
                tx.execute(
                    "UPDATE vehicles
                     SET
                        is_deleted = 1,
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE owner_uuid = ?1
                       AND is_deleted = 0;",
                    [id_text.as_str()],
                )?;
            }
        } else {
            // Children stay live but lose their owner reference.
            tx.execute(
                "UPDATE vehicles
                 SET
                    owner_uuid = NULL,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE owner_uuid = ?1;",
                [id_text.as_str()],
            )?;
        }

        if permanent {
            tx.execute("DELETE FROM people WHERE uuid = ?1;", [id_text.as_str()])?;
        } else {
            tx.execute(
                "UPDATE people
                 SET
                    is_deleted = 1,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?1;",
                [id_text.as_str()],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn create_vehicle(&mut self, vehicle: &Vehicle) -> StoreResult<VehicleId> {
        vehicle.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if let Some(owner) = vehicle.owner {
            if !live_person_exists(&tx, owner)? {
                return Err(StoreError::PersonNotFound(owner.to_string()));
            }
        }
        insert_vehicle_row(&tx, vehicle, vehicle.owner)?;
        tx.commit()?;

        Ok(vehicle.uuid)
    }

    fn get_vehicle(&self, id: VehicleId, include_deleted: bool) -> StoreResult<Option<Vehicle>> {
        let mut stmt = self.conn.prepare(&format!(
            "{VEHICLE_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_vehicle_row(row)?));
        }

        Ok(None)
    }

    fn list_association(
        &self,
        person_id: PersonId,
        kind: VehicleKind,
    ) -> StoreResult<Vec<Vehicle>> {
        if !live_person_exists(&*self.conn, person_id)? {
            return Err(StoreError::PersonNotFound(person_id.to_string()));
        }
        load_members(&*self.conn, person_id, kind)
    }

    fn replace_association(
        &mut self,
        person_id: PersonId,
        kind: VehicleKind,
        members: &[Vehicle],
    ) -> StoreResult<()> {
        validate_members(kind, members)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !live_person_exists(&tx, person_id)? {
            return Err(StoreError::PersonNotFound(person_id.to_string()));
        }

        // Unlink, never delete: prior members become orphans.
        tx.execute(
            "UPDATE vehicles
             SET
                owner_uuid = NULL,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE owner_uuid = ?1
               AND kind = ?2;",
            params![person_id.to_string(), kind_to_db(kind)],
        )?;

        insert_members(&tx, person_id, members)?;
        tx.commit()?;
        Ok(())
    }

    fn append_association(
        &mut self,
        person_id: PersonId,
        kind: VehicleKind,
        members: &[Vehicle],
    ) -> StoreResult<()> {
        validate_members(kind, members)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !live_person_exists(&tx, person_id)? {
            return Err(StoreError::PersonNotFound(person_id.to_string()));
        }

        insert_members(&tx, person_id, members)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_association(
        &mut self,
        person_id: PersonId,
        kind: VehicleKind,
        member_ids: &[VehicleId],
        permanent: bool,
    ) -> StoreResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !live_person_exists(&tx, person_id)? {
            return Err(StoreError::PersonNotFound(person_id.to_string()));
        }

        for member_id in member_ids {
            let is_member: i64 = tx.query_row(
                "SELECT EXISTS(
                    SELECT 1
                    FROM vehicles
                    WHERE uuid = ?1
                      AND kind = ?2
                      AND owner_uuid = ?3
                      AND is_deleted = 0
                );",
                params![
                    member_id.to_string(),
                    kind_to_db(kind),
                    person_id.to_string()
                ],
                |row| row.get(0),
            )?;
            if is_member != 1 {
                return Err(StoreError::VehicleNotFound(*member_id));
            }

            if permanent {
                tx.execute(
                    "DELETE FROM vehicles WHERE uuid = ?1;",
                    [member_id.to_string()],
                )?;
            } else {
                tx.execute(
                    "UPDATE vehicles
                     SET
                        owner_uuid = NULL,
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE uuid = ?1;",
                    [member_id.to_string()],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

fn validate_members(kind: VehicleKind, members: &[Vehicle]) -> StoreResult<()> {
    for member in members {
        member.validate()?;
        if member.kind != kind {
            return Err(StoreError::InvalidData(format!(
                "collection `{}` accepts only `{}` members, got `{}` for vehicle {}",
                kind.collection_name(),
                kind.collection_name(),
                member.kind.collection_name(),
                member.uuid
            )));
        }
    }
    Ok(())
}

fn insert_person_row(tx: &Transaction<'_>, person: &Person) -> StoreResult<()> {
    tx.execute(
        "INSERT INTO people (uuid, name, age, sex, is_deleted)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            person.uuid.to_string(),
            person.name.as_str(),
            person.age,
            sex_to_db(person.sex),
            bool_to_int(person.is_deleted),
        ],
    )?;
    Ok(())
}

fn insert_vehicle_row(
    tx: &Transaction<'_>,
    vehicle: &Vehicle,
    owner: Option<PersonId>,
) -> StoreResult<()> {
    tx.execute(
        "INSERT INTO vehicles (uuid, kind, name, brand, owner_uuid, is_deleted)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            vehicle.uuid.to_string(),
            kind_to_db(vehicle.kind),
            vehicle.name.as_str(),
            vehicle.brand.as_str(),
            owner.map(|id| id.to_string()),
            bool_to_int(vehicle.is_deleted),
        ],
    )?;
    Ok(())
}

fn insert_members(tx: &Transaction<'_>, owner: PersonId, members: &[Vehicle]) -> StoreResult<()> {
    for member in members {
        insert_vehicle_row(tx, member, Some(owner))?;
    }
    Ok(())
}

fn load_record(conn: &Connection, person: Person) -> StoreResult<PersonRecord> {
    let cars = load_members(conn, person.uuid, VehicleKind::Car)?;
    let bikes = load_members(conn, person.uuid, VehicleKind::Bike)?;
    Ok(PersonRecord {
        person,
        cars,
        bikes,
    })
}

fn load_members(
    conn: &Connection,
    owner: PersonId,
    kind: VehicleKind,
) -> StoreResult<Vec<Vehicle>> {
    let mut stmt = conn.prepare(&format!(
        "{VEHICLE_SELECT_SQL}
         WHERE owner_uuid = ?1
           AND kind = ?2
           AND is_deleted = 0
         ORDER BY created_at ASC, uuid ASC;"
    ))?;

    let mut rows = stmt.query(params![owner.to_string(), kind_to_db(kind)])?;
    let mut members = Vec::new();
    while let Some(row) = rows.next()? {
        members.push(parse_vehicle_row(row)?);
    }

    Ok(members)
}

fn live_person_exists(conn: &Connection, id: PersonId) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM people
            WHERE uuid = ?1
              AND is_deleted = 0
        );",
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_person_row(row: &Row<'_>) -> StoreResult<Person> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "people.uuid")?;

    let sex_text: String = row.get("sex")?;
    let sex = parse_sex(&sex_text).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid sex value `{sex_text}` in people.sex"))
    })?;

    let person = Person {
        uuid,
        name: row.get("name")?,
        age: row.get("age")?,
        sex,
        is_deleted: parse_tombstone(row.get("is_deleted")?, "people.is_deleted")?,
    };
    person.validate()?;
    Ok(person)
}

fn parse_vehicle_row(row: &Row<'_>) -> StoreResult<Vehicle> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "vehicles.uuid")?;

    let kind_text: String = row.get("kind")?;
    let kind = parse_kind(&kind_text).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid kind value `{kind_text}` in vehicles.kind"))
    })?;

    let owner = match row.get::<_, Option<String>>("owner_uuid")? {
        Some(owner_text) => Some(parse_uuid(&owner_text, "vehicles.owner_uuid")?),
        None => None,
    };

    let vehicle = Vehicle {
        uuid,
        kind,
        name: row.get("name")?,
        brand: row.get("brand")?,
        owner,
        is_deleted: parse_tombstone(row.get("is_deleted")?, "vehicles.is_deleted")?,
    };
    vehicle.validate()?;
    Ok(vehicle)
}

fn parse_uuid(value: &str, column: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn parse_tombstone(value: i64, column: &str) -> StoreResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid is_deleted value `{other}` in {column}"
        ))),
    }
}

fn sex_to_db(sex: Sex) -> &'static str {
    match sex {
        Sex::Male => "male",
        Sex::Female => "female",
    }
}

fn parse_sex(value: &str) -> Option<Sex> {
    match value {
        "male" => Some(Sex::Male),
        "female" => Some(Sex::Female),
        _ => None,
    }
}

fn kind_to_db(kind: VehicleKind) -> &'static str {
    match kind {
        VehicleKind::Car => "car",
        VehicleKind::Bike => "bike",
    }
}

fn parse_kind(value: &str) -> Option<VehicleKind> {
    match value {
        "car" => Some(VehicleKind::Car),
        "bike" => Some(VehicleKind::Bike),
        _ => None,
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_store_ready(conn: &Connection) -> StoreResult<()> {
    const REQUIRED: &[(&str, &[&str])] = &[
        ("people", &["uuid", "name", "age", "sex", "is_deleted"]),
        (
            "vehicles",
            &["uuid", "kind", "name", "brand", "owner_uuid", "is_deleted"],
        ),
    ];

    for &(table, columns) in REQUIRED {
        if !table_exists(conn, table)? {
            return Err(StoreError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(StoreError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
