use garage_core::db::open_db_in_memory;
use garage_core::{
    Person, PersonRecord, PersonStore, Sex, SqlitePersonStore, UpsertVehicleMode, Vehicle,
    VehicleKind,
};
use std::collections::BTreeSet;

fn jane_record(age: i64, car_brand: &str) -> PersonRecord {
    let mut record = PersonRecord::new(Person::new("Jane", age, Sex::Female));
    record.cars = vec![
        Vehicle::new(VehicleKind::Car, "Car3", car_brand),
        Vehicle::new(VehicleKind::Car, "Car4", car_brand),
    ];
    record.bikes = vec![Vehicle::new(VehicleKind::Bike, "Bike3", car_brand)];
    record
}

fn names(vehicles: &[Vehicle]) -> BTreeSet<String> {
    vehicles
        .iter()
        .map(|vehicle| vehicle.name.clone())
        .collect()
}

#[test]
fn upsert_without_existing_match_inserts() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let record = jane_record(20, "Brand3");
    let id = store
        .upsert_person_by_name(&record, UpsertVehicleMode::default())
        .unwrap();
    assert_eq!(id, record.person.uuid);

    let loaded = store.find_person_by_name("Jane").unwrap();
    assert_eq!(loaded.cars.len(), 2);
    assert_eq!(loaded.bikes.len(), 1);
}

#[test]
fn upsert_on_existing_name_keeps_a_single_live_row() {
    let mut conn = open_db_in_memory().unwrap();
    let original_id = {
        let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();
        let original = jane_record(20, "Brand3");
        store.create_person(&original).unwrap();

        let update = jane_record(23, "Brand3");
        let id = store
            .upsert_person_by_name(&update, UpsertVehicleMode::InsertNew)
            .unwrap();
        // The stored row keeps its identity; the update's fresh uuid is
        // discarded.
        assert_eq!(id, original.person.uuid);
        assert_ne!(id, update.person.uuid);

        let loaded = store.find_person_by_name("Jane").unwrap();
        assert_eq!(loaded.person.age, 23);
        original.person.uuid
    };

    let rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM people WHERE name = 'Jane' AND is_deleted = 0;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(rows, 1);

    let stored_id: String = conn
        .query_row(
            "SELECT uuid FROM people WHERE name = 'Jane' AND is_deleted = 0;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored_id, original_id.to_string());
}

#[test]
fn insert_new_mode_accumulates_duplicate_members() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    store.create_person(&jane_record(20, "Brand3")).unwrap();
    store
        .upsert_person_by_name(&jane_record(23, "Brand3"), UpsertVehicleMode::InsertNew)
        .unwrap();

    // The documented footgun: prior members stay linked and the supplied
    // ones are inserted next to them.
    let loaded = store.find_person_by_name("Jane").unwrap();
    assert_eq!(loaded.cars.len(), 4);
    assert_eq!(loaded.bikes.len(), 2);
    assert_eq!(names(&loaded.cars), names(&jane_record(0, "x").cars));
}

#[test]
fn reconcile_mode_makes_collections_exactly_match_the_request() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();

    let original = jane_record(20, "Brand3");
    let prior_car_ids: Vec<_> = original.cars.iter().map(|car| car.uuid).collect();
    store.create_person(&original).unwrap();

    let mut update = PersonRecord::new(Person::new("Jane", 23, Sex::Female));
    update.cars = vec![Vehicle::new(VehicleKind::Car, "Car9", "Brand9")];
    store
        .upsert_person_by_name(&update, UpsertVehicleMode::Reconcile)
        .unwrap();

    let loaded = store.find_person_by_name("Jane").unwrap();
    assert_eq!(loaded.cars.len(), 1);
    assert_eq!(loaded.cars[0].name, "Car9");
    // The update supplied no bikes, so reconcile cleared that collection
    // too.
    assert!(loaded.bikes.is_empty());

    // Reconcile removes prior member rows outright, not as orphans.
    for id in prior_car_ids {
        assert!(store.get_vehicle(id, true).unwrap().is_none());
    }
}

#[test]
fn upsert_validates_input_before_touching_storage() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut store = SqlitePersonStore::try_new(&mut conn).unwrap();
        let mut record = jane_record(20, "Brand3");
        record.person.age = -5;
        assert!(store
            .upsert_person_by_name(&record, UpsertVehicleMode::default())
            .is_err());
    }

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}
