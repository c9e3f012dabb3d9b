//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use persondb::model::{Color, Coordinates, Country, Location, Person};

/// A valid, not-yet-stored person
pub fn person(name: &str, height: i64) -> Person {
    Person::new(
        name,
        Coordinates::new(10.5, 20.0).unwrap(),
        height,
        Some(Color::Blue),
        Some(Color::Brown),
        Some(Country::India),
        Location::new(1.0, 2.0, 3.0, Some("Home".to_string())).unwrap(),
    )
    .unwrap()
}

/// Same as `person` with the given hair color
pub fn person_with_hair(name: &str, height: i64, hair: Option<Color>) -> Person {
    let mut p = person(name, height);
    p.hair_color = hair;
    p
}

/// A person carrying an explicit id, as if loaded from disk
pub fn stored_person(id: i64, name: &str) -> Person {
    let mut p = person(name, 170);
    p.id = id;
    p
}

/// Console answers that `PersonReader::read_person` consumes for one person
pub fn person_input_lines(name: &str, height: i64) -> Vec<String> {
    vec![
        name.to_string(),
        "1,5".to_string(),
        "2".to_string(),
        height.to_string(),
        "green".to_string(),
        "".to_string(),
        "india".to_string(),
        "0".to_string(),
        "0".to_string(),
        "0".to_string(),
        "".to_string(),
    ]
}
