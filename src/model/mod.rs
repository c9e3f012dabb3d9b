//! Record Model
//!
//! The `Person` entity and the value objects embedded in it.
//!
//! ## Ordering
//! Persons are ordered and compared **by id only**. Two persons with the same
//! id are equal even if every other field differs, and a freshly built person
//! (id `0`) sorts below every stored one. The collection store and the
//! `add_if_min` / `remove_greater` / `remove_lower` commands rely on this.

mod palette;
mod person;

pub use palette::{Color, Country};
pub use person::{Coordinates, Location, Person, LOCATION_NAME_MAX_LEN, MAX_COORDINATE_X};
