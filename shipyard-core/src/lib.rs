#![deny(missing_docs)]
//! Shipyard core library.
//!
//! Domain types for the ship registry together with the filter, paging,
//! rating, and validation rules applied by the REST service.

pub mod domain;
pub mod error;
pub mod filter;
pub mod page;
pub mod rating;
pub mod service;
pub mod store;
pub mod validation;

pub use domain::{NewShip, Ship, ShipPatch, ShipType};
pub use error::{Result, ShipyardError};
pub use filter::{ShipCriteria, ShipPredicate, filter_ships};
pub use page::{
    DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, PageMode, PageQuery, ShipOrder, paginate, sort_ships,
};
pub use rating::{compute_rating, round_to_hundredths};
pub use service::ShipService;
pub use store::{InMemoryShipStore, ShipStore};
pub use validation::{
    ShipUpdate, apply_patch, is_valid_identifier, parse_ship_id, validate_for_create,
    validate_for_update,
};
