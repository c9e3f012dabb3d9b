//! Person entity and its value objects.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Color, Country};
use crate::error::{DbError, Result};

/// Maximum allowed value of `Coordinates::x`
pub const MAX_COORDINATE_X: f64 = 348.0;

/// Maximum length of `Location::name` (in characters)
pub const LOCATION_NAME_MAX_LEN: usize = 400;

/// Planar coordinates of a person
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// At most 348
    pub x: f64,
    pub y: f32,
}

impl Coordinates {
    pub fn new(x: f64, y: f32) -> Result<Self> {
        let coordinates = Self { x, y };
        coordinates.validate()?;
        Ok(coordinates)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(DbError::Validation(
                "Coordinates must be finite numbers".to_string(),
            ));
        }
        if self.x > MAX_COORDINATE_X {
            return Err(DbError::Validation(format!(
                "Coordinate X must not exceed {}",
                MAX_COORDINATE_X
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinates{{x={}, y={}}}", self.x, self.y)
    }
}

/// Where a person lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f32,
    pub y: f64,
    pub z: f64,
    /// Optional, at most 400 characters
    pub name: Option<String>,
}

impl Location {
    pub fn new(x: f32, y: f64, z: f64, name: Option<String>) -> Result<Self> {
        let location = Self { x, y, z, name };
        location.validate()?;
        Ok(location)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.x.is_finite() || !self.y.is_finite() || !self.z.is_finite() {
            return Err(DbError::Validation(
                "Location coordinates must be finite numbers".to_string(),
            ));
        }
        if let Some(name) = &self.name {
            if name.chars().count() > LOCATION_NAME_MAX_LEN {
                return Err(DbError::Validation(format!(
                    "Location name must not exceed {} characters",
                    LOCATION_NAME_MAX_LEN
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Location{{name='{}', x={}, y={}, z={}}}",
            self.name.as_deref().unwrap_or("N/A"),
            self.x,
            self.y,
            self.z
        )
    }
}

/// The record kept in the collection.
///
/// `id` and `creation_date` are owned by the server: a person built on the
/// client has id `0` and no creation date until it is inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub coordinates: Coordinates,
    pub creation_date: Option<NaiveDateTime>,
    pub height: i64,
    pub eye_color: Option<Color>,
    pub hair_color: Option<Color>,
    pub nationality: Option<Country>,
    pub location: Location,
}

impl Person {
    /// Build a not-yet-stored person and validate it
    pub fn new(
        name: impl Into<String>,
        coordinates: Coordinates,
        height: i64,
        eye_color: Option<Color>,
        hair_color: Option<Color>,
        nationality: Option<Country>,
        location: Location,
    ) -> Result<Self> {
        let person = Self {
            id: 0,
            name: name.into(),
            coordinates,
            creation_date: None,
            height,
            eye_color,
            hair_color,
            nationality,
            location,
        };
        person.validate()?;
        Ok(person)
    }

    /// Check every field constraint.
    ///
    /// Deserialized persons never went through a constructor, so anything
    /// arriving from the network or from disk must pass through here.
    pub fn validate(&self) -> Result<()> {
        if self.id < 0 {
            return Err(DbError::Validation("ID must not be negative".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(DbError::Validation("Name must not be empty".to_string()));
        }
        if self.height <= 0 {
            return Err(DbError::Validation(
                "Height must be greater than 0".to_string(),
            ));
        }
        self.coordinates.validate()?;
        self.location.validate()?;
        Ok(())
    }

    /// Copy every user-editable field from `other`, leaving `id` and
    /// `creation_date` untouched
    pub fn replace_data(&mut self, other: Person) {
        self.name = other.name;
        self.coordinates = other.coordinates;
        self.height = other.height;
        self.eye_color = other.eye_color;
        self.hair_color = other.hair_color;
        self.nationality = other.nationality;
        self.location = other.location;
    }
}

// Identity is the id, nothing else.
impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Person {}

impl PartialOrd for Person {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Person {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

fn or_na<T: fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Person {{")?;
        writeln!(f, "  id={},", self.id)?;
        writeln!(f, "  name='{}',", self.name)?;
        writeln!(f, "  coordinates={},", self.coordinates)?;
        writeln!(
            f,
            "  creationDate={},",
            or_na(self.creation_date.map(|d| d.format("%d.%m.%Y %H:%M:%S")))
        )?;
        writeln!(f, "  height={},", self.height)?;
        writeln!(f, "  eyeColor={},", or_na(self.eye_color))?;
        writeln!(f, "  hairColor={},", or_na(self.hair_color))?;
        writeln!(f, "  nationality={},", or_na(self.nationality))?;
        writeln!(f, "  location={}", self.location)?;
        write!(f, "}}")
    }
}
