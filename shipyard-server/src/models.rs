//! Database models for the Shipyard server.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use shipyard_core::{NewShip, Ship, ShipType, ShipyardError};

use crate::schema::ships;

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable)]
#[diesel(table_name = ships)]
/// Ship database record.
pub struct ShipRecord {
    /// Ship identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Planet of registration.
    pub planet: String,
    /// Ship type label (`TRANSPORT`, `MILITARY`, `MERCHANT`).
    pub ship_type: String,
    /// Production timestamp, stored as UTC.
    pub prod_date: NaiveDateTime,
    /// Whether the ship was previously used.
    pub is_used: bool,
    /// Ship speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset)]
#[diesel(table_name = ships)]
/// Insertable ship columns, also used as the full changeset for updates.
pub struct ShipColumns {
    /// Ship name.
    pub name: String,
    /// Planet of registration.
    pub planet: String,
    /// Ship type label.
    pub ship_type: String,
    /// Production timestamp, stored as UTC.
    pub prod_date: NaiveDateTime,
    /// Whether the ship was previously used.
    pub is_used: bool,
    /// Ship speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl TryFrom<ShipRecord> for Ship {
    type Error = ShipyardError;

    fn try_from(record: ShipRecord) -> Result<Self, Self::Error> {
        let ship_type: ShipType = record.ship_type.parse().map_err(|_| {
            ShipyardError::store(format!(
                "ship {} has unknown type {}",
                record.id, record.ship_type
            ))
        })?;
        Ok(Ship {
            id: record.id,
            name: record.name,
            planet: record.planet,
            ship_type,
            prod_date: record.prod_date.and_utc(),
            is_used: record.is_used,
            speed: record.speed,
            crew_size: record.crew_size,
            rating: record.rating,
        })
    }
}

impl From<&NewShip> for ShipColumns {
    fn from(ship: &NewShip) -> Self {
        Self {
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date.naive_utc(),
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

impl From<&Ship> for ShipColumns {
    fn from(ship: &Ship) -> Self {
        Self {
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date.naive_utc(),
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}
