//! Ship filtering by optional query criteria.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::{Ship, ShipType};
use crate::error::{Result, ShipyardError};

/// Optional filter criteria parsed from the list and count query strings.
///
/// Absent fields impose no restriction; supplied fields are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShipCriteria {
    /// Substring of the ship name (case-sensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Substring of the planet name (case-sensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Exact ship category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[param(value_type = Option<String>)]
    pub ship_type: Option<ShipType>,
    /// Earliest production timestamp in epoch milliseconds, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<i64>,
    /// Latest production year, taken from an epoch-millisecond timestamp, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<i64>,
    /// Usage flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
    /// Minimum speed, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_speed: Option<f64>,
    /// Maximum speed, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
    /// Minimum crew size, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_crew_size: Option<i32>,
    /// Maximum crew size, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_crew_size: Option<i32>,
    /// Minimum rating, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    /// Maximum rating, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f64>,
}

/// A single filter predicate over a ship.
#[derive(Debug, Clone, PartialEq)]
pub enum ShipPredicate {
    /// Name contains the substring.
    NameContains(String),
    /// Planet contains the substring.
    PlanetContains(String),
    /// Ship category equals.
    ShipTypeIs(ShipType),
    /// Production timestamp (epoch millis) is at or after the bound.
    ProducedAfter(i64),
    /// Production year is at or before the bound.
    ProducedByYear(i32),
    /// Usage flag equals.
    IsUsed(bool),
    /// Speed is at least the bound.
    MinSpeed(f64),
    /// Speed is at most the bound.
    MaxSpeed(f64),
    /// Crew size is at least the bound.
    MinCrewSize(i32),
    /// Crew size is at most the bound.
    MaxCrewSize(i32),
    /// Rating is at least the bound.
    MinRating(f64),
    /// Rating is at most the bound.
    MaxRating(f64),
}

impl ShipPredicate {
    /// Returns true when the ship satisfies the predicate.
    pub fn matches(&self, ship: &Ship) -> bool {
        match self {
            Self::NameContains(name) => ship.name.contains(name.as_str()),
            Self::PlanetContains(planet) => ship.planet.contains(planet.as_str()),
            Self::ShipTypeIs(kind) => ship.ship_type == *kind,
            Self::ProducedAfter(millis) => ship.prod_date.timestamp_millis() >= *millis,
            Self::ProducedByYear(year) => ship.production_year() <= *year,
            Self::IsUsed(is_used) => ship.is_used == *is_used,
            Self::MinSpeed(speed) => ship.speed >= *speed,
            Self::MaxSpeed(speed) => ship.speed <= *speed,
            Self::MinCrewSize(crew) => ship.crew_size >= *crew,
            Self::MaxCrewSize(crew) => ship.crew_size <= *crew,
            Self::MinRating(rating) => ship.rating >= *rating,
            Self::MaxRating(rating) => ship.rating <= *rating,
        }
    }
}

impl ShipCriteria {
    /// Convert the supplied criteria into predicates.
    ///
    /// `before` is reduced to its calendar year, so a ship matches when it was
    /// produced in or before that year regardless of the time of year.
    pub fn predicates(&self) -> Result<Vec<ShipPredicate>> {
        let mut predicates = Vec::new();
        if let Some(name) = &self.name {
            predicates.push(ShipPredicate::NameContains(name.clone()));
        }
        if let Some(planet) = &self.planet {
            predicates.push(ShipPredicate::PlanetContains(planet.clone()));
        }
        if let Some(kind) = self.ship_type {
            predicates.push(ShipPredicate::ShipTypeIs(kind));
        }
        if let Some(after) = self.after {
            predicates.push(ShipPredicate::ProducedAfter(after));
        }
        if let Some(before) = self.before {
            predicates.push(ShipPredicate::ProducedByYear(year_of_millis(before)?));
        }
        if let Some(is_used) = self.is_used {
            predicates.push(ShipPredicate::IsUsed(is_used));
        }
        if let Some(speed) = self.min_speed {
            predicates.push(ShipPredicate::MinSpeed(speed));
        }
        if let Some(speed) = self.max_speed {
            predicates.push(ShipPredicate::MaxSpeed(speed));
        }
        if let Some(crew) = self.min_crew_size {
            predicates.push(ShipPredicate::MinCrewSize(crew));
        }
        if let Some(crew) = self.max_crew_size {
            predicates.push(ShipPredicate::MaxCrewSize(crew));
        }
        if let Some(rating) = self.min_rating {
            predicates.push(ShipPredicate::MinRating(rating));
        }
        if let Some(rating) = self.max_rating {
            predicates.push(ShipPredicate::MaxRating(rating));
        }
        Ok(predicates)
    }
}

/// Return the ships that satisfy every predicate.
///
/// The input slice is left untouched; matches are cloned into a new vector.
pub fn filter_ships(ships: &[Ship], predicates: &[ShipPredicate]) -> Vec<Ship> {
    ships
        .iter()
        .filter(|ship| predicates.iter().all(|predicate| predicate.matches(ship)))
        .cloned()
        .collect()
}

fn year_of_millis(millis: i64) -> Result<i32> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|date| date.year())
        .ok_or_else(|| ShipyardError::bad_request(format!("timestamp out of range: {millis}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ship(id: i64, name: &str, year: i32, speed: f64, crew_size: i32, rating: f64) -> Ship {
        Ship {
            id,
            name: name.to_string(),
            planet: if id % 2 == 0 { "Earth" } else { "Jupiter" }.to_string(),
            ship_type: match id % 3 {
                0 => ShipType::Transport,
                1 => ShipType::Military,
                _ => ShipType::Merchant,
            },
            prod_date: Utc.with_ymd_and_hms(year, 3, 1, 0, 0, 0).unwrap(),
            is_used: id % 2 == 1,
            speed,
            crew_size,
            rating,
        }
    }

    fn fleet() -> Vec<Ship> {
        vec![
            ship(1, "Orion III", 2995, 0.82, 617, 1.31),
            ship(2, "Daedalus", 2808, 0.17, 3, 0.06),
            ship(3, "Eagle Transporter", 3011, 0.79, 5045, 3.51),
            ship(4, "Cassini", 2918, 0.59, 1012, 0.46),
            ship(5, "Orion II", 3019, 0.5, 14, 20.0),
        ]
    }

    fn ids(ships: &[Ship]) -> Vec<i64> {
        ships.iter().map(|ship| ship.id).collect()
    }

    fn filter_by(criteria: ShipCriteria) -> Vec<i64> {
        let predicates = criteria.predicates().expect("predicates");
        ids(&filter_ships(&fleet(), &predicates))
    }

    #[test]
    fn empty_criteria_keeps_everything() {
        assert_eq!(filter_by(ShipCriteria::default()), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn name_filter_is_case_sensitive_substring() {
        let criteria = ShipCriteria {
            name: Some("Orion".to_string()),
            ..ShipCriteria::default()
        };
        assert_eq!(filter_by(criteria), vec![1, 5]);

        let criteria = ShipCriteria {
            name: Some("orion".to_string()),
            ..ShipCriteria::default()
        };
        assert!(filter_by(criteria).is_empty());
    }

    #[test]
    fn after_compares_full_timestamp() {
        let bound = Utc.with_ymd_and_hms(3011, 3, 1, 0, 0, 0).unwrap();
        let criteria = ShipCriteria {
            after: Some(bound.timestamp_millis()),
            ..ShipCriteria::default()
        };
        assert_eq!(filter_by(criteria), vec![3, 5]);

        let criteria = ShipCriteria {
            after: Some(bound.timestamp_millis() + 1),
            ..ShipCriteria::default()
        };
        assert_eq!(filter_by(criteria), vec![5]);
    }

    #[test]
    fn before_compares_year_only() {
        // January 1st 2995 still admits a ship built in March 2995.
        let bound = Utc.with_ymd_and_hms(2995, 1, 1, 0, 0, 0).unwrap();
        let criteria = ShipCriteria {
            before: Some(bound.timestamp_millis()),
            ..ShipCriteria::default()
        };
        assert_eq!(filter_by(criteria), vec![1, 2, 4]);
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let criteria = ShipCriteria {
            min_speed: Some(0.59),
            max_speed: Some(0.82),
            ..ShipCriteria::default()
        };
        assert_eq!(filter_by(criteria), vec![1, 3, 4]);

        let criteria = ShipCriteria {
            min_crew_size: Some(14),
            max_crew_size: Some(1012),
            ..ShipCriteria::default()
        };
        assert_eq!(filter_by(criteria), vec![1, 4, 5]);
    }

    #[test]
    fn max_rating_is_applied() {
        let criteria = ShipCriteria {
            min_rating: Some(0.46),
            max_rating: Some(3.51),
            ..ShipCriteria::default()
        };
        assert_eq!(filter_by(criteria), vec![1, 3, 4]);
    }

    #[test]
    fn type_and_usage_are_exact() {
        let criteria = ShipCriteria {
            ship_type: Some(ShipType::Merchant),
            is_used: Some(true),
            ..ShipCriteria::default()
        };
        assert_eq!(filter_by(criteria), vec![5]);
    }

    #[test]
    fn predicate_order_does_not_change_result() {
        let criteria = ShipCriteria {
            planet: Some("Jupiter".to_string()),
            min_speed: Some(0.5),
            max_crew_size: Some(1000),
            before: Some(Utc.with_ymd_and_hms(3019, 1, 1, 0, 0, 0).unwrap().timestamp_millis()),
            ..ShipCriteria::default()
        };
        let predicates = criteria.predicates().expect("predicates");
        let expected = ids(&filter_ships(&fleet(), &predicates));

        let mut reversed = predicates.clone();
        reversed.reverse();
        assert_eq!(ids(&filter_ships(&fleet(), &reversed)), expected);

        let mut rotated = predicates.clone();
        rotated.rotate_left(1);
        assert_eq!(ids(&filter_ships(&fleet(), &rotated)), expected);

        let staged = predicates
            .iter()
            .fold(fleet(), |ships, predicate| {
                filter_ships(&ships, std::slice::from_ref(predicate))
            });
        assert_eq!(ids(&staged), expected);
        assert_eq!(expected, vec![1, 5]);
    }

    #[test]
    fn filtering_leaves_input_untouched() {
        let ships = fleet();
        let predicates = vec![ShipPredicate::IsUsed(false)];
        let matching = filter_ships(&ships, &predicates);

        assert_eq!(ids(&matching), vec![2, 4]);
        assert_eq!(ships, fleet());
    }

    #[test]
    fn unrepresentable_before_is_rejected() {
        let criteria = ShipCriteria {
            before: Some(i64::MAX),
            ..ShipCriteria::default()
        };
        assert!(matches!(
            criteria.predicates(),
            Err(ShipyardError::BadRequest(_))
        ));
    }
}
