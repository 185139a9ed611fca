//! Ship storage abstraction and the in-memory backend.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::domain::{NewShip, Ship};
use crate::error::{Result, ShipyardError};

/// Persistence operations the ship service relies on.
///
/// Implementations serialize their own writes; the service does not lock
/// around read-modify-write sequences.
#[cfg_attr(test, mockall::automock)]
pub trait ShipStore {
    /// Return every stored ship, ordered by identifier.
    fn find_all(&self) -> Result<Vec<Ship>>;
    /// Check whether a ship with the identifier exists.
    fn exists_by_id(&self, id: i64) -> Result<bool>;
    /// Fetch a ship by identifier.
    fn find_by_id(&self, id: i64) -> Result<Option<Ship>>;
    /// Persist a new ship and return it with its assigned identifier.
    fn insert(&self, ship: NewShip) -> Result<Ship>;
    /// Overwrite an existing ship.
    fn update(&self, ship: Ship) -> Result<Ship>;
    /// Remove a ship by identifier.
    fn delete_by_id(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Default)]
struct MemoryState {
    ships: BTreeMap<i64, Ship>,
    last_id: i64,
}

/// Ship store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryShipStore {
    state: RwLock<MemoryState>,
}

impl InMemoryShipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing ships; new ids continue after the largest one.
    pub fn with_ships(ships: impl IntoIterator<Item = Ship>) -> Self {
        let ships: BTreeMap<i64, Ship> = ships.into_iter().map(|ship| (ship.id, ship)).collect();
        let last_id = ships.keys().next_back().copied().unwrap_or(0);
        Self {
            state: RwLock::new(MemoryState { ships, last_id }),
        }
    }
}

fn unavailable<T>(_: T) -> ShipyardError {
    ShipyardError::Store("ship store unavailable".to_string())
}

impl ShipStore for InMemoryShipStore {
    fn find_all(&self) -> Result<Vec<Ship>> {
        let state = self.state.read().map_err(unavailable)?;
        Ok(state.ships.values().cloned().collect())
    }

    fn exists_by_id(&self, id: i64) -> Result<bool> {
        let state = self.state.read().map_err(unavailable)?;
        Ok(state.ships.contains_key(&id))
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let state = self.state.read().map_err(unavailable)?;
        Ok(state.ships.get(&id).cloned())
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        let mut state = self.state.write().map_err(unavailable)?;
        state.last_id += 1;
        let ship = ship.with_id(state.last_id);
        state.ships.insert(ship.id, ship.clone());
        Ok(ship)
    }

    fn update(&self, ship: Ship) -> Result<Ship> {
        let mut state = self.state.write().map_err(unavailable)?;
        match state.ships.get_mut(&ship.id) {
            Some(entry) => {
                *entry = ship.clone();
                Ok(ship)
            }
            None => Err(ShipyardError::ship_not_found(ship.id)),
        }
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().map_err(unavailable)?;
        state
            .ships
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ShipyardError::ship_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShipType;
    use chrono::{TimeZone, Utc};

    fn new_ship(name: &str) -> NewShip {
        NewShip {
            name: name.to_string(),
            planet: "Venus".to_string(),
            ship_type: ShipType::Military,
            prod_date: Utc.with_ymd_and_hms(3000, 1, 1, 0, 0, 0).unwrap(),
            is_used: false,
            speed: 0.4,
            crew_size: 120,
            rating: 1.6,
        }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let store = InMemoryShipStore::new();
        let first = store.insert(new_ship("Alpha")).expect("insert");
        let second = store.insert(new_ship("Beta")).expect("insert");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.find_all().expect("find all").len(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = InMemoryShipStore::new();
        let first = store.insert(new_ship("Alpha")).expect("insert");
        store.delete_by_id(first.id).expect("delete");
        let second = store.insert(new_ship("Beta")).expect("insert");

        assert_eq!(second.id, 2);
        assert!(!store.exists_by_id(first.id).expect("exists"));
    }

    #[test]
    fn seeded_store_continues_after_largest_id() {
        let store = InMemoryShipStore::with_ships([new_ship("Gamma").with_id(40)]);
        let ship = store.insert(new_ship("Delta")).expect("insert");
        assert_eq!(ship.id, 41);
    }

    #[test]
    fn update_requires_existing_ship() {
        let store = InMemoryShipStore::new();
        let mut ship = store.insert(new_ship("Alpha")).expect("insert");
        ship.crew_size = 7;
        store.update(ship.clone()).expect("update");
        assert_eq!(store.find_by_id(ship.id).expect("find"), Some(ship));

        let missing = new_ship("Ghost").with_id(99);
        assert_eq!(
            store.update(missing),
            Err(ShipyardError::ship_not_found(99))
        );
        assert_eq!(
            store.delete_by_id(99),
            Err(ShipyardError::ship_not_found(99))
        );
    }
}
