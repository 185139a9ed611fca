//! Ordering and pagination of filtered ships.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::Ship;
use crate::error::{Result, ShipyardError};

/// Page number used when the caller omits one.
pub const DEFAULT_PAGE_NUMBER: usize = 0;
/// Page size used when the caller omits one.
pub const DEFAULT_PAGE_SIZE: usize = 3;

/// Sort key for ship listings. Sorting is always ascending.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ShipOrder {
    /// Sort by identifier.
    #[default]
    Id,
    /// Sort by speed.
    Speed,
    /// Sort by production date.
    Date,
    /// Sort by rating.
    Rating,
}

impl ShipOrder {
    /// Ship field the order sorts on.
    pub fn field_name(&self) -> &'static str {
        match self {
            ShipOrder::Id => "id",
            ShipOrder::Speed => "speed",
            ShipOrder::Date => "prodDate",
            ShipOrder::Rating => "rating",
        }
    }

    /// Compare two ships on this key.
    pub fn compare(&self, left: &Ship, right: &Ship) -> Ordering {
        match self {
            ShipOrder::Id => left.id.cmp(&right.id),
            ShipOrder::Speed => left.speed.total_cmp(&right.speed),
            ShipOrder::Date => left.prod_date.cmp(&right.prod_date),
            ShipOrder::Rating => left.rating.total_cmp(&right.rating),
        }
    }
}

impl fmt::Display for ShipOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for ShipOrder {
    type Err = ShipyardError;

    /// Accepts the field names and the upper-case constant names (`ID`, `SPEED`, `DATE`, `RATING`).
    fn from_str(value: &str) -> Result<Self> {
        match value {
            "id" | "ID" => Ok(ShipOrder::Id),
            "speed" | "SPEED" => Ok(ShipOrder::Speed),
            "prodDate" | "DATE" => Ok(ShipOrder::Date),
            "rating" | "RATING" => Ok(ShipOrder::Rating),
            _ => Err(ShipyardError::bad_request(format!(
                "unknown sort order: {value}"
            ))),
        }
    }
}

/// Whether a page is cut before or after sorting.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageMode {
    /// Cut the page from the unsorted collection, then sort the page.
    #[default]
    SliceThenSort,
    /// Sort the whole collection, then cut the page.
    SortThenSlice,
}

impl PageMode {
    /// Configuration label for the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageMode::SliceThenSort => "slice-then-sort",
            PageMode::SortThenSlice => "sort-then-slice",
        }
    }
}

impl FromStr for PageMode {
    type Err = ShipyardError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "slice-then-sort" => Ok(PageMode::SliceThenSort),
            "sort-then-slice" => Ok(PageMode::SortThenSlice),
            other => Err(ShipyardError::bad_request(format!(
                "unknown page mode: {other}"
            ))),
        }
    }
}

/// Ordering and page parameters parsed from the list query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Sort key: `id`, `speed`, `prodDate`, `rating` (or `ID`, `SPEED`, `DATE`, `RATING`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Zero-based page number, defaults to 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<usize>,
    /// Page size, defaults to 3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl PageQuery {
    /// Parse the requested sort key, rejecting unknown keys.
    pub fn order(&self) -> Result<Option<ShipOrder>> {
        self.order.as_deref().map(str::parse).transpose()
    }
}

/// Sort ships in place, ascending on the given key. The sort is stable.
pub fn sort_ships(ships: &mut [Ship], order: ShipOrder) {
    ships.sort_by(|left, right| order.compare(left, right));
}

/// Return one page of ships.
///
/// With [`PageMode::SliceThenSort`] the page is taken from the collection as
/// given and only the page itself is sorted. With [`PageMode::SortThenSlice`]
/// the whole collection is sorted first. Pages past the end are empty.
pub fn paginate(
    ships: Vec<Ship>,
    order: Option<ShipOrder>,
    page_number: Option<usize>,
    page_size: Option<usize>,
    mode: PageMode,
) -> Vec<Ship> {
    let order = order.unwrap_or_default();
    let page_number = page_number.unwrap_or(DEFAULT_PAGE_NUMBER);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let offset = page_number.saturating_mul(page_size);

    match mode {
        PageMode::SliceThenSort => {
            let mut page: Vec<Ship> = ships.into_iter().skip(offset).take(page_size).collect();
            sort_ships(&mut page, order);
            page
        }
        PageMode::SortThenSlice => {
            let mut ships = ships;
            sort_ships(&mut ships, order);
            ships.into_iter().skip(offset).take(page_size).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShipType;
    use chrono::{TimeZone, Utc};

    fn ship(id: i64, speed: f64, year: i32, rating: f64) -> Ship {
        Ship {
            id,
            name: format!("Ship {id}"),
            planet: "Earth".to_string(),
            ship_type: ShipType::Transport,
            prod_date: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
            is_used: false,
            speed,
            crew_size: 10,
            rating,
        }
    }

    // Deliberately stored out of id order, as a store might return them.
    fn unsorted() -> Vec<Ship> {
        vec![
            ship(4, 0.40, 2900, 0.5),
            ship(2, 0.90, 3000, 3.6),
            ship(5, 0.10, 2850, 0.1),
            ship(1, 0.70, 3010, 5.6),
            ship(3, 0.20, 2990, 0.6),
        ]
    }

    fn ids(ships: &[Ship]) -> Vec<i64> {
        ships.iter().map(|ship| ship.id).collect()
    }

    #[test]
    fn defaults_take_first_three_sorted_by_id() {
        let page = paginate(unsorted(), None, None, None, PageMode::SliceThenSort);
        assert_eq!(ids(&page), vec![2, 4, 5]);
    }

    #[test]
    fn second_page_of_two_sorted_by_speed() {
        let order = "speed".parse().ok();
        let page = paginate(unsorted(), order, Some(1), Some(2), PageMode::SliceThenSort);
        // Offsets 2 and 3 are ships 5 and 1.
        assert_eq!(ids(&page), vec![5, 1]);
    }

    #[test]
    fn sort_then_slice_orders_whole_collection() {
        let page = paginate(
            unsorted(),
            Some(ShipOrder::Speed),
            Some(1),
            Some(2),
            PageMode::SortThenSlice,
        );
        assert_eq!(ids(&page), vec![4, 1]);

        let page = paginate(unsorted(), None, None, None, PageMode::SortThenSlice);
        assert_eq!(ids(&page), vec![1, 2, 3]);
    }

    #[test]
    fn date_and_rating_orders() {
        let page = paginate(
            unsorted(),
            Some(ShipOrder::Date),
            Some(0),
            Some(5),
            PageMode::SliceThenSort,
        );
        assert_eq!(ids(&page), vec![5, 4, 3, 2, 1]);

        let page = paginate(
            unsorted(),
            Some(ShipOrder::Rating),
            Some(0),
            Some(5),
            PageMode::SliceThenSort,
        );
        assert_eq!(ids(&page), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        assert!(paginate(unsorted(), None, Some(2), Some(3), PageMode::SliceThenSort).is_empty());
        assert!(paginate(unsorted(), None, Some(0), Some(0), PageMode::SliceThenSort).is_empty());
        assert!(
            paginate(
                unsorted(),
                None,
                Some(usize::MAX),
                Some(usize::MAX),
                PageMode::SortThenSlice
            )
            .is_empty()
        );
    }

    #[test]
    fn order_accepts_field_and_constant_names() {
        assert_eq!("prodDate".parse::<ShipOrder>(), Ok(ShipOrder::Date));
        assert_eq!("DATE".parse::<ShipOrder>(), Ok(ShipOrder::Date));
        assert_eq!("RATING".parse::<ShipOrder>(), Ok(ShipOrder::Rating));
        assert!(matches!(
            "crewSize".parse::<ShipOrder>(),
            Err(ShipyardError::BadRequest(_))
        ));
    }

    #[test]
    fn page_query_rejects_unknown_order() {
        let query = PageQuery {
            order: Some("name".to_string()),
            ..PageQuery::default()
        };
        assert!(query.order().is_err());
        assert_eq!(PageQuery::default().order(), Ok(None));
    }

    #[test]
    fn page_mode_labels_round_trip() {
        for mode in [PageMode::SliceThenSort, PageMode::SortThenSlice] {
            assert_eq!(mode.as_str().parse::<PageMode>(), Ok(mode));
        }
        assert!("sorted".parse::<PageMode>().is_err());
    }
}
