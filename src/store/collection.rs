//! Person Store
//!
//! BTreeMap-based collection keyed (and therefore ordered) by person id.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Local};

use crate::error::{DbError, Result};
use crate::model::{Color, Person};

/// Descriptive snapshot returned by `info`
#[derive(Debug, Clone)]
pub struct StoreInfo {
    /// Collection type tag
    pub kind: &'static str,
    pub initialized_at: DateTime<Local>,
    pub len: usize,
}

impl fmt::Display for StoreInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Collection type: {}", self.kind)?;
        writeln!(
            f,
            "Initialization date: {}",
            self.initialized_at.format("%d.%m.%Y %H:%M:%S %Z")
        )?;
        write!(f, "Element count: {}", self.len)
    }
}

/// In-memory collection of persons
///
/// ## Concurrency
/// None. The store is owned by the dispatcher and only ever touched from the
/// server's event loop, so every method takes `&self` / `&mut self` directly.
/// Wrap it in a lock before sharing it across threads.
///
/// ## Id assignment
/// `next_id` starts at `max(id) + 1` of the initial collection, grows by one
/// per insertion and goes back to 1 on `clear`.
#[derive(Debug)]
pub struct PersonStore {
    /// Persons sorted ascending by id
    persons: BTreeMap<i64, Person>,

    /// Id handed to the next inserted person
    next_id: i64,

    /// When this store was created
    initialized_at: DateTime<Local>,
}

impl PersonStore {
    pub const KIND: &'static str = "BTreeMap<i64, Person>";

    /// Create an empty store
    pub fn new() -> Self {
        Self {
            persons: BTreeMap::new(),
            next_id: 1,
            initialized_at: Local::now(),
        }
    }

    /// Create a store from a loaded collection.
    ///
    /// Persons that fail validation or have no positive id are dropped with a
    /// warning; duplicate ids keep the first occurrence.
    pub fn from_persons(persons: impl IntoIterator<Item = Person>) -> Self {
        let mut store = Self::new();
        for person in persons {
            if person.id <= 0 {
                tracing::warn!("Skipping loaded person without a positive id: {}", person.name);
                continue;
            }
            if let Err(e) = person.validate() {
                tracing::warn!("Skipping invalid loaded person {}: {}", person.id, e);
                continue;
            }
            if store.persons.contains_key(&person.id) {
                tracing::warn!("Skipping duplicate loaded person id {}", person.id);
                continue;
            }
            store.persons.insert(person.id, person);
        }
        store.next_id = store.max_id() + 1;
        store
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a new person, returning its assigned id
    pub fn add(&mut self, mut person: Person) -> Result<i64> {
        person.validate()?;

        let id = self.next_id;
        if id == i64::MAX {
            return Err(DbError::Storage("Id space exhausted".to_string()));
        }

        person.id = id;
        person.creation_date = Some(Local::now().naive_local());
        self.persons.insert(id, person);
        self.next_id = id + 1;

        Ok(id)
    }

    /// Insert `person` only if it sorts below the current minimum.
    ///
    /// Comparison uses the id order, and a client-built person has id 0, so
    /// this almost always inserts.
    pub fn add_if_min(&mut self, person: Person) -> Result<Option<i64>> {
        person.validate()?;

        let is_min = match self.persons.values().next() {
            None => true,
            Some(min) => person < *min,
        };

        if is_min {
            self.add(person).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Replace every field of person `id` except its id and creation date.
    ///
    /// Returns `false` if no such person exists.
    pub fn update(&mut self, id: i64, data: Person) -> Result<bool> {
        data.validate()?;

        match self.persons.get_mut(&id) {
            Some(current) => {
                current.replace_data(data);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove person `id`, returning whether it existed
    pub fn remove_by_id(&mut self, id: i64) -> bool {
        self.persons.remove(&id).is_some()
    }

    /// Remove everything and restart ids at 1
    pub fn clear(&mut self) {
        self.persons.clear();
        self.next_id = 1;
    }

    /// Remove all persons strictly greater than `reference`, returning how many
    pub fn remove_greater(&mut self, reference: &Person) -> usize {
        let before = self.persons.len();
        self.persons.retain(|_, p| &*p <= reference);
        before - self.persons.len()
    }

    /// Remove all persons strictly lower than `reference`, returning how many
    pub fn remove_lower(&mut self, reference: &Person) -> usize {
        let before = self.persons.len();
        self.persons.retain(|_, p| &*p >= reference);
        before - self.persons.len()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of persons whose hair color equals `color` (None matches None)
    pub fn count_by_hair_color(&self, color: Option<Color>) -> usize {
        self.persons.values().filter(|p| p.hair_color == color).count()
    }

    /// Persons whose hair color is set and comes before `color` in the palette
    pub fn filter_less_than_hair_color(&self, color: Option<Color>) -> Vec<Person> {
        let Some(color) = color else {
            return Vec::new();
        };

        self.persons
            .values()
            .filter(|p| matches!(p.hair_color, Some(c) if c.ordinal() < color.ordinal()))
            .cloned()
            .collect()
    }

    /// Mean height, 0 for an empty store
    pub fn average_height(&self) -> f64 {
        if self.persons.is_empty() {
            return 0.0;
        }
        let total: f64 = self.persons.values().map(|p| p.height as f64).sum();
        total / self.persons.len() as f64
    }

    pub fn info(&self) -> StoreInfo {
        StoreInfo {
            kind: Self::KIND,
            initialized_at: self.initialized_at,
            len: self.persons.len(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&Person> {
        self.persons.get(&id)
    }

    /// Iterate ascending by id
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    /// Owned copy of the collection, ascending by id
    pub fn snapshot(&self) -> Vec<Person> {
        self.persons.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Id the next `add` will assign
    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    fn max_id(&self) -> i64 {
        self.persons.keys().next_back().copied().unwrap_or(0)
    }
}

impl Default for PersonStore {
    fn default() -> Self {
        Self::new()
    }
}
