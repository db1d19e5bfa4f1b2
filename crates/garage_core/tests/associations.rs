use garage_core::db::open_db_in_memory;
use garage_core::{
    Person, PersonRecord, PersonService, PersonStore, Sex, SqlitePersonStore, StoreError, Vehicle,
    VehicleKind,
};
use std::collections::BTreeSet;
use uuid::Uuid;

fn john_with_cars() -> PersonRecord {
    let mut record = PersonRecord::new(Person::new("John", 20, Sex::Male));
    record.cars = vec![
        Vehicle::new(VehicleKind::Car, "Car1", "Brand1"),
        Vehicle::new(VehicleKind::Car, "Car2", "Brand2"),
    ];
    record
}

fn names(vehicles: &[Vehicle]) -> BTreeSet<String> {
    vehicles
        .iter()
        .map(|vehicle| vehicle.name.clone())
        .collect()
}

fn name_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[test]
fn list_association_for_unknown_person_fails_with_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let err = store
        .list_association(Uuid::new_v4(), VehicleKind::Car)
        .unwrap_err();
    assert!(matches!(err, StoreError::PersonNotFound(_)));
}

#[test]
fn replace_returns_exactly_new_set_and_orphans_prior_members() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let record = john_with_cars();
    let prior_ids: Vec<_> = record.cars.iter().map(|car| car.uuid).collect();
    store.create_person(&record).unwrap();

    let replacement = vec![
        Vehicle::new(VehicleKind::Car, "Car5", "Brand5"),
        Vehicle::new(VehicleKind::Car, "Car6", "Brand6"),
    ];
    store
        .replace_association(record.person.uuid, VehicleKind::Car, &replacement)
        .unwrap();

    let listed = store
        .list_association(record.person.uuid, VehicleKind::Car)
        .unwrap();
    assert_eq!(names(&listed), name_set(&["Car5", "Car6"]));

    // Replace unlinks: prior members stay reachable, but own no person.
    for prior_id in prior_ids {
        let orphan = store.get_vehicle(prior_id, false).unwrap().unwrap();
        assert!(orphan.is_orphaned());
        assert!(orphan.is_active());
    }
}

#[test]
fn replace_with_empty_set_clears_the_collection() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let record = john_with_cars();
    store.create_person(&record).unwrap();

    store
        .replace_association(record.person.uuid, VehicleKind::Car, &[])
        .unwrap();
    let listed = store
        .list_association(record.person.uuid, VehicleKind::Car)
        .unwrap();
    assert!(listed.is_empty());
}

#[test]
fn replace_leaves_the_other_collection_alone() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let mut record = john_with_cars();
    record.bikes = vec![Vehicle::new(VehicleKind::Bike, "Bike1", "Brand1")];
    store.create_person(&record).unwrap();

    store
        .replace_association(record.person.uuid, VehicleKind::Car, &[])
        .unwrap();
    let bikes = store
        .list_association(record.person.uuid, VehicleKind::Bike)
        .unwrap();
    assert_eq!(names(&bikes), name_set(&["Bike1"]));
}

#[test]
fn append_adds_members_without_touching_existing_ones() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let record = john_with_cars();
    store.create_person(&record).unwrap();

    store
        .append_association(
            record.person.uuid,
            VehicleKind::Car,
            &[Vehicle::new(VehicleKind::Car, "Car7", "Brand7")],
        )
        .unwrap();

    let listed = store
        .list_association(record.person.uuid, VehicleKind::Car)
        .unwrap();
    assert_eq!(names(&listed), name_set(&["Car1", "Car2", "Car7"]));
}

#[test]
fn delete_association_permanently_removes_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let record = john_with_cars();
    let ids: Vec<_> = record.cars.iter().map(|car| car.uuid).collect();
    store.create_person(&record).unwrap();

    store
        .delete_association(record.person.uuid, VehicleKind::Car, &ids, true)
        .unwrap();

    let listed = store
        .list_association(record.person.uuid, VehicleKind::Car)
        .unwrap();
    assert!(listed.is_empty());
    for id in ids {
        assert!(store.get_vehicle(id, true).unwrap().is_none());
    }
}

#[test]
fn delete_association_without_permanent_flag_only_unlinks() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let record = john_with_cars();
    let ids: Vec<_> = record.cars.iter().map(|car| car.uuid).collect();
    store.create_person(&record).unwrap();

    store
        .delete_association(record.person.uuid, VehicleKind::Car, &ids, false)
        .unwrap();

    for id in ids {
        let vehicle = store.get_vehicle(id, false).unwrap().unwrap();
        assert!(vehicle.is_orphaned());
        assert!(vehicle.is_active());
    }
}

#[test]
fn delete_association_with_unknown_member_applies_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let record = john_with_cars();
    let known = record.cars[0].uuid;
    store.create_person(&record).unwrap();

    let err = store
        .delete_association(
            record.person.uuid,
            VehicleKind::Car,
            &[known, Uuid::new_v4()],
            true,
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::VehicleNotFound(_)));

    // The transaction rolled back, so the known member is still linked.
    let listed = store
        .list_association(record.person.uuid, VehicleKind::Car)
        .unwrap();
    assert_eq!(names(&listed), name_set(&["Car1", "Car2"]));
}

#[test]
fn member_kind_must_match_the_named_collection() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let record = john_with_cars();
    store.create_person(&record).unwrap();

    let err = store
        .append_association(
            record.person.uuid,
            VehicleKind::Car,
            &[Vehicle::new(VehicleKind::Bike, "Bike1", "Brand1")],
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn delete_person_cascade_permanent_leaves_no_reachable_children() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let mut record = john_with_cars();
    record.bikes = vec![Vehicle::new(VehicleKind::Bike, "Bike1", "Brand1")];
    let car_ids: Vec<_> = record.cars.iter().map(|car| car.uuid).collect();
    let bike_id = record.bikes[0].uuid;
    store.create_person(&record).unwrap();

    store
        .delete_person(record.person.uuid, true, true)
        .unwrap();

    assert!(store
        .get_person(record.person.uuid, true)
        .unwrap()
        .is_none());
    for id in car_ids {
        assert!(store.get_vehicle(id, true).unwrap().is_none());
    }
    assert!(store.get_vehicle(bike_id, true).unwrap().is_none());
}

#[test]
fn delete_person_cascade_soft_tombstones_children_with_links_kept() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let record = john_with_cars();
    let car_id = record.cars[0].uuid;
    store.create_person(&record).unwrap();

    store
        .delete_person(record.person.uuid, true, false)
        .unwrap();

    assert!(store.get_vehicle(car_id, false).unwrap().is_none());
    let tombstoned = store.get_vehicle(car_id, true).unwrap().unwrap();
    assert!(tombstoned.is_deleted);
    assert_eq!(tombstoned.owner, Some(record.person.uuid));
}

#[test]
fn delete_person_without_cascade_leaves_live_orphans() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let record = john_with_cars();
    let car_ids: Vec<_> = record.cars.iter().map(|car| car.uuid).collect();
    store.create_person(&record).unwrap();

    store
        .delete_person(record.person.uuid, false, true)
        .unwrap();

    assert!(store
        .get_person(record.person.uuid, true)
        .unwrap()
        .is_none());
    for id in car_ids {
        let orphan = store.get_vehicle(id, false).unwrap().unwrap();
        assert!(orphan.is_orphaned());
        assert!(orphan.is_active());
    }
}

#[test]
fn delete_unknown_person_fails_with_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let err = store.delete_person(Uuid::new_v4(), true, true).unwrap_err();
    assert!(matches!(err, StoreError::PersonNotFound(_)));
}

#[test]
fn service_rejects_undeclared_collection_names() {
    let mut conn = open_db_in_memory().unwrap();
    let store = SqlitePersonStore::try_new(&mut conn).unwrap();
    let mut service = PersonService::new(store);

    service.create_person(&john_with_cars()).unwrap();

    let err = service.vehicles_of("John", "boats").unwrap_err();
    assert!(matches!(err, StoreError::InvalidAssociation(name) if name == "boats"));
}

#[test]
fn service_replace_by_name_reports_applied_state() {
    let mut conn = open_db_in_memory().unwrap();
    let store = SqlitePersonStore::try_new(&mut conn).unwrap();
    let mut service = PersonService::new(store);

    service.create_person(&john_with_cars()).unwrap();

    let replaced = service
        .replace_vehicles(
            "John",
            "Cars",
            &[
                Vehicle::new(VehicleKind::Car, "Car5", "Brand5"),
                Vehicle::new(VehicleKind::Car, "Car6", "Brand6"),
            ],
        )
        .unwrap();
    assert_eq!(names(&replaced), name_set(&["Car5", "Car6"]));

    let current = service.vehicles_of("John", "cars").unwrap();
    assert_eq!(names(&current), name_set(&["Car5", "Car6"]));
}

#[test]
fn service_remove_then_append_rebuilds_collection_without_orphans() {
    let mut conn = open_db_in_memory().unwrap();
    let store = SqlitePersonStore::try_new(&mut conn).unwrap();
    let mut service = PersonService::new(store);

    let record = john_with_cars();
    let prior_ids: Vec<_> = record.cars.iter().map(|car| car.uuid).collect();
    service.create_person(&record).unwrap();

    service
        .remove_vehicles("John", "cars", &prior_ids, true)
        .unwrap();
    let rebuilt = service
        .append_vehicles(
            "John",
            "cars",
            &[
                Vehicle::new(VehicleKind::Car, "Car7", "Brand7"),
                Vehicle::new(VehicleKind::Car, "Car8", "Brand8"),
            ],
        )
        .unwrap();
    assert_eq!(names(&rebuilt), name_set(&["Car7", "Car8"]));
}
