//! Validation of ship identifiers and request bodies.

use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Utc};

use crate::domain::{NewShip, Ship, ShipPatch, ShipType};
use crate::error::{Result, ShipyardError};
use crate::rating::{CURRENT_YEAR, compute_rating, round_to_hundredths};

/// Maximum length of `name` and `planet`, in characters.
pub const MAX_TEXT_CHARS: usize = 50;
/// Accepted speed range.
pub const SPEED_RANGE: RangeInclusive<f64> = 0.01..=0.99;
/// Accepted crew size range.
pub const CREW_SIZE_RANGE: RangeInclusive<i32> = 1..=9999;
/// Accepted production years.
pub const PROD_YEAR_RANGE: RangeInclusive<i32> = 2800..=CURRENT_YEAR;

/// Parse a raw path identifier into a positive ship id.
pub fn parse_ship_id(raw: &str) -> Result<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ShipyardError::bad_request(format!("invalid ship id: {raw}"))),
    }
}

/// True when the raw identifier is a positive integer.
pub fn is_valid_identifier(raw: &str) -> bool {
    parse_ship_id(raw).is_ok()
}

/// Validate a creation body and derive the rating.
///
/// Every field except `isUsed` is required; `isUsed` defaults to false.
/// Speed is checked as supplied and then rounded to two decimals.
pub fn validate_for_create(patch: &ShipPatch) -> Result<NewShip> {
    let name = check_text("name", required(patch.name.as_ref(), "name")?)?;
    let planet = check_text("planet", required(patch.planet.as_ref(), "planet")?)?;
    let ship_type = required(patch.ship_type, "shipType")?;
    let prod_date = check_prod_date(required(patch.prod_date, "prodDate")?)?;
    let is_used = patch.is_used.unwrap_or(false);
    let speed = round_to_hundredths(check_speed(required(patch.speed, "speed")?)?);
    let crew_size = check_crew_size(required(patch.crew_size, "crewSize")?)?;

    Ok(NewShip {
        name,
        planet,
        ship_type,
        prod_date,
        is_used,
        speed,
        crew_size,
        rating: compute_rating(speed, is_used, prod_date),
    })
}

/// Field changes that passed update validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipUpdate {
    name: Option<String>,
    planet: Option<String>,
    ship_type: Option<ShipType>,
    prod_date: Option<DateTime<Utc>>,
    is_used: Option<bool>,
    speed: Option<f64>,
    crew_size: Option<i32>,
}

impl ShipUpdate {
    /// Merge the changes into an existing ship and recompute its rating.
    pub fn apply_to(self, ship: Ship) -> Ship {
        let mut ship = ship;
        if let Some(name) = self.name {
            ship.name = name;
        }
        if let Some(planet) = self.planet {
            ship.planet = planet;
        }
        if let Some(ship_type) = self.ship_type {
            ship.ship_type = ship_type;
        }
        if let Some(prod_date) = self.prod_date {
            ship.prod_date = prod_date;
        }
        if let Some(is_used) = self.is_used {
            ship.is_used = is_used;
        }
        if let Some(speed) = self.speed {
            ship.speed = speed;
        }
        if let Some(crew_size) = self.crew_size {
            ship.crew_size = crew_size;
        }
        ship.rating = compute_rating(ship.speed, ship.is_used, ship.prod_date);
        ship
    }
}

/// Validate the supplied fields of a partial update.
///
/// Omitted fields are not checked. The first violation rejects the whole update.
pub fn validate_for_update(patch: &ShipPatch) -> Result<ShipUpdate> {
    Ok(ShipUpdate {
        name: patch
            .name
            .as_ref()
            .map(|name| check_text("name", name))
            .transpose()?,
        planet: patch
            .planet
            .as_ref()
            .map(|planet| check_text("planet", planet))
            .transpose()?,
        ship_type: patch.ship_type,
        prod_date: patch.prod_date.map(check_prod_date).transpose()?,
        is_used: patch.is_used,
        speed: patch.speed.map(check_speed).transpose()?,
        crew_size: patch.crew_size.map(check_crew_size).transpose()?,
    })
}

/// Validate a partial update and merge it into `ship`.
///
/// Nothing is applied when any supplied field is invalid.
pub fn apply_patch(ship: Ship, patch: &ShipPatch) -> Result<Ship> {
    Ok(validate_for_update(patch)?.apply_to(ship))
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| ShipyardError::bad_request(format!("{field} is required")))
}

fn check_text(field: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(ShipyardError::bad_request(format!(
            "{field} must not be empty"
        )));
    }
    if value.chars().count() > MAX_TEXT_CHARS {
        return Err(ShipyardError::bad_request(format!(
            "{field} must be at most {MAX_TEXT_CHARS} characters"
        )));
    }
    Ok(value.to_string())
}

fn check_speed(speed: f64) -> Result<f64> {
    if SPEED_RANGE.contains(&speed) {
        Ok(speed)
    } else {
        Err(ShipyardError::bad_request(format!(
            "speed must be between {} and {}",
            SPEED_RANGE.start(),
            SPEED_RANGE.end()
        )))
    }
}

fn check_crew_size(crew_size: i32) -> Result<i32> {
    if CREW_SIZE_RANGE.contains(&crew_size) {
        Ok(crew_size)
    } else {
        Err(ShipyardError::bad_request(format!(
            "crewSize must be between {} and {}",
            CREW_SIZE_RANGE.start(),
            CREW_SIZE_RANGE.end()
        )))
    }
}

fn check_prod_date(millis: i64) -> Result<DateTime<Utc>> {
    if millis < 0 {
        return Err(ShipyardError::bad_request("prodDate must not be negative"));
    }
    let prod_date = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| ShipyardError::bad_request(format!("prodDate out of range: {millis}")))?;
    if !PROD_YEAR_RANGE.contains(&prod_date.year()) {
        return Err(ShipyardError::bad_request(format!(
            "prodDate year must be between {} and {}",
            PROD_YEAR_RANGE.start(),
            PROD_YEAR_RANGE.end()
        )));
    }
    Ok(prod_date)
}
