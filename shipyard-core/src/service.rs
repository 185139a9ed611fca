//! Ship listing and write orchestration over a [`ShipStore`].

use std::sync::Arc;

use crate::domain::{Ship, ShipPatch};
use crate::error::{Result, ShipyardError};
use crate::filter::{ShipCriteria, filter_ships};
use crate::page::{PageMode, PageQuery, paginate};
use crate::store::ShipStore;
use crate::validation::{apply_patch, parse_ship_id, validate_for_create};

/// Ship operations backing the REST handlers.
#[derive(Clone)]
pub struct ShipService {
    store: Arc<dyn ShipStore + Send + Sync>,
    page_mode: PageMode,
}

impl ShipService {
    /// Build a service over the given store using the default page mode.
    pub fn new(store: Arc<dyn ShipStore + Send + Sync>) -> Self {
        Self {
            store,
            page_mode: PageMode::default(),
        }
    }

    /// Override how pages are cut relative to sorting.
    pub fn with_page_mode(mut self, page_mode: PageMode) -> Self {
        self.page_mode = page_mode;
        self
    }

    /// Active page mode.
    pub fn page_mode(&self) -> PageMode {
        self.page_mode
    }

    /// Filter all ships and return the requested page.
    pub fn list(&self, criteria: &ShipCriteria, page: &PageQuery) -> Result<Vec<Ship>> {
        let order = page.order()?;
        let predicates = criteria.predicates()?;
        let ships = self.store.find_all()?;
        let matching = filter_ships(&ships, &predicates);
        Ok(paginate(
            matching,
            order,
            page.page_number,
            page.page_size,
            self.page_mode,
        ))
    }

    /// Count the ships matching the criteria, ignoring paging.
    pub fn count(&self, criteria: &ShipCriteria) -> Result<usize> {
        let predicates = criteria.predicates()?;
        let ships = self.store.find_all()?;
        Ok(filter_ships(&ships, &predicates).len())
    }

    /// Fetch a ship by its raw path identifier.
    pub fn get(&self, raw_id: &str) -> Result<Ship> {
        let id = parse_ship_id(raw_id)?;
        self.store
            .find_by_id(id)?
            .ok_or_else(|| ShipyardError::ship_not_found(id))
    }

    /// Validate and persist a new ship.
    pub fn create(&self, patch: &ShipPatch) -> Result<Ship> {
        let ship = validate_for_create(patch)?;
        self.store.insert(ship)
    }

    /// Apply a partial update to an existing ship.
    ///
    /// An empty body returns the ship unchanged without writing.
    pub fn update(&self, raw_id: &str, patch: &ShipPatch) -> Result<Ship> {
        let id = parse_ship_id(raw_id)?;
        let ship = self
            .store
            .find_by_id(id)?
            .ok_or_else(|| ShipyardError::ship_not_found(id))?;
        if patch.is_empty() {
            return Ok(ship);
        }
        self.store.update(apply_patch(ship, patch)?)
    }

    /// Delete a ship by its raw path identifier.
    pub fn delete(&self, raw_id: &str) -> Result<()> {
        let id = parse_ship_id(raw_id)?;
        if !self.store.exists_by_id(id)? {
            return Err(ShipyardError::ship_not_found(id));
        }
        self.store.delete_by_id(id)
    }
}
