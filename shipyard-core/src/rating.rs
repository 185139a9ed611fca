//! Ship rating formula.

use chrono::{DateTime, Datelike, Utc};

/// Last production year accepted by the registry; ships built this year score highest.
pub const CURRENT_YEAR: i32 = 3019;

const RATING_SCALE: f64 = 80.0;
const USED_COEFFICIENT: f64 = 0.5;
const NEW_COEFFICIENT: f64 = 1.0;

/// Round to two decimals, halves away from zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the rating for a ship from its speed, usage flag, and production date.
pub fn compute_rating(speed: f64, is_used: bool, prod_date: DateTime<Utc>) -> f64 {
    let coefficient = if is_used {
        USED_COEFFICIENT
    } else {
        NEW_COEFFICIENT
    };
    let age = f64::from(CURRENT_YEAR - prod_date.year() + 1);
    round_to_hundredths((RATING_SCALE * speed * coefficient) / age)
}
