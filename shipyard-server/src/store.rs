//! PostgreSQL-backed ship store.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};

use shipyard_core::{NewShip, Result, Ship, ShipStore, ShipyardError};

use crate::db::DbPool;
use crate::models::{ShipColumns, ShipRecord};
use crate::schema::ships;

/// Ship store over a Diesel connection pool.
#[derive(Clone)]
pub struct PgShipStore {
    pool: DbPool,
}

impl PgShipStore {
    /// Wrap an initialized pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>> {
        self.pool.get().map_err(ShipyardError::store)
    }
}

impl ShipStore for PgShipStore {
    fn find_all(&self) -> Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        let records = ships::table
            .order(ships::id.asc())
            .select(ShipRecord::as_select())
            .load(&mut conn)
            .map_err(ShipyardError::store)?;
        records.into_iter().map(Ship::try_from).collect()
    }

    fn exists_by_id(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn()?;
        diesel::select(diesel::dsl::exists(ships::table.find(id)))
            .get_result(&mut conn)
            .map_err(ShipyardError::store)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .find(id)
            .select(ShipRecord::as_select())
            .first(&mut conn)
            .optional()
            .map_err(ShipyardError::store)?
            .map(Ship::try_from)
            .transpose()
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        let mut conn = self.conn()?;
        let record = diesel::insert_into(ships::table)
            .values(&ShipColumns::from(&ship))
            .returning(ShipRecord::as_returning())
            .get_result(&mut conn)
            .map_err(ShipyardError::store)?;
        Ship::try_from(record)
    }

    fn update(&self, ship: Ship) -> Result<Ship> {
        let mut conn = self.conn()?;
        let record = diesel::update(ships::table.find(ship.id))
            .set(&ShipColumns::from(&ship))
            .returning(ShipRecord::as_returning())
            .get_result(&mut conn)
            .optional()
            .map_err(ShipyardError::store)?
            .ok_or_else(|| ShipyardError::ship_not_found(ship.id))?;
        Ship::try_from(record)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(ships::table.find(id))
            .execute(&mut conn)
            .map_err(ShipyardError::store)?;
        if deleted == 0 {
            return Err(ShipyardError::ship_not_found(id));
        }
        Ok(())
    }
}
