//! CLI walkthrough entry point.
//!
//! # Responsibility
//! - Drive the association store operations in sequence against sample
//!   data, so store semantics can be observed from a terminal.
//! - Keep all behavior in `garage_core`; this binary only constructs input
//!   and prints results.

use garage_core::db::open_db_in_memory;
use garage_core::{
    core_version, Person, PersonRecord, PersonService, Sex, SqlitePersonStore, UpsertVehicleMode,
    Vehicle, VehicleKind,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("garage_core version={}", core_version());

    let mut conn = open_db_in_memory()?;
    let store = SqlitePersonStore::try_new(&mut conn)?;
    let mut service = PersonService::new(store);

    // Insert two people with both collections populated.
    let john = sample_person(
        "John",
        20,
        Sex::Male,
        &[("Car1", "Brand1"), ("Car2", "Brand2")],
        &[("Bike1", "Brand1"), ("Bike2", "Brand2")],
    );
    let jane = sample_person(
        "Jane",
        20,
        Sex::Female,
        &[("Car3", "Brand3"), ("Car4", "Brand4")],
        &[("Bike3", "Brand3"), ("Bike4", "Brand4")],
    );
    service.create_person(&john)?;
    service.create_person(&jane)?;

    let loaded = service.find_person("John")?;
    println!(
        "loaded {} with {} cars and {} bikes",
        loaded.person.name,
        loaded.cars.len(),
        loaded.bikes.len()
    );

    // Upsert in the default mode: scalars update in place, but the supplied
    // vehicles are inserted as brand-new rows next to the existing ones.
    let jane_update = sample_person(
        "Jane",
        23,
        Sex::Female,
        &[("Car3", "Brand3"), ("Car4", "Brand3")],
        &[("Bike3", "Brand3"), ("Bike4", "Brand3")],
    );
    service.upsert_person(&jane_update, UpsertVehicleMode::InsertNew)?;
    let jane_after = service.find_person("Jane")?;
    println!(
        "after upsert Jane is {} years old and owns {} cars (duplicates included)",
        jane_after.person.age,
        jane_after.cars.len()
    );

    // Scalar update never drags collections along.
    let mut john_scalars = service.find_person("John")?.person;
    john_scalars.age = 21;
    service.update_scalars(&john_scalars)?;

    let cars = service.vehicles_of("John", "cars")?;
    println!("John currently owns: {}", names_of(&cars));

    // Replace unlinks the previous members; their rows survive as orphans.
    let replacement = vec![
        Vehicle::new(VehicleKind::Car, "Car5", "Brand5"),
        Vehicle::new(VehicleKind::Car, "Car6", "Brand6"),
    ];
    let replaced = service.replace_vehicles("John", "cars", &replacement)?;
    println!("after replace John owns: {}", names_of(&replaced));

    // Permanent removal plus append is the path that does not grow orphans.
    let ids: Vec<_> = replaced.iter().map(|vehicle| vehicle.uuid).collect();
    service.remove_vehicles("John", "cars", &ids, true)?;
    let appended = service.append_vehicles(
        "John",
        "cars",
        &[
            Vehicle::new(VehicleKind::Car, "Car7", "Brand7"),
            Vehicle::new(VehicleKind::Car, "Car8", "Brand8"),
        ],
    )?;
    println!("after delete+append John owns: {}", names_of(&appended));

    // Remove Jane together with everything she owns.
    service.delete_person("Jane", true, true)?;
    println!("Jane removed with her vehicles");

    Ok(())
}

fn sample_person(
    name: &str,
    age: i64,
    sex: Sex,
    cars: &[(&str, &str)],
    bikes: &[(&str, &str)],
) -> PersonRecord {
    let mut record = PersonRecord::new(Person::new(name, age, sex));
    record.cars = cars
        .iter()
        .map(|(name, brand)| Vehicle::new(VehicleKind::Car, *name, *brand))
        .collect();
    record.bikes = bikes
        .iter()
        .map(|(name, brand)| Vehicle::new(VehicleKind::Bike, *name, *brand))
        .collect();
    record
}

fn names_of(vehicles: &[Vehicle]) -> String {
    vehicles
        .iter()
        .map(|vehicle| vehicle.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
