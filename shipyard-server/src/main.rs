#![deny(missing_docs)]
//! Shipyard server executable.
//!
//! Serves the ship registry REST API under `/rest/ships`.

mod config;
mod db;
mod models;
mod openapi;
mod routes;
mod schema;
mod store;

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, middleware, web};
use dotenvy::dotenv;

use shipyard_core::{InMemoryShipStore, ShipService, ShipStore};

use crate::config::{ServerConfig, StoreMode};
use crate::db::init_pool;
use crate::routes::{AppState, configure};
use crate::store::PgShipStore;

#[cfg_attr(test, allow(dead_code))]
fn invalid_config(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

#[cfg_attr(test, allow(dead_code))]
fn build_store(config: &ServerConfig) -> io::Result<Arc<dyn ShipStore + Send + Sync>> {
    match (config.store_mode, config.database_url.as_deref()) {
        (StoreMode::Postgres, Some(database_url)) => {
            let pool = init_pool(database_url).map_err(io::Error::other)?;
            Ok(Arc::new(PgShipStore::new(pool)))
        }
        (StoreMode::Postgres, None) => Err(invalid_config(
            "DATABASE_URL must be set to a PostgreSQL connection string".to_string(),
        )),
        (StoreMode::Memory, _) => Ok(Arc::new(InMemoryShipStore::new())),
    }
}

#[cfg_attr(test, allow(dead_code))]
fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().map_err(invalid_config)?;
    let store = build_store(&config)?;
    log::info!(
        "starting shipyard on {}:{} with {:?} store, {} paging",
        config.host,
        config.port,
        config.store_mode,
        config.page_mode.as_str()
    );

    let state = web::Data::new(AppState {
        service: ShipService::new(store).with_page_mode(config.page_mode),
    });
    let allowed_origins = config.allowed_origins;
    let listen = (config.host, config.port);

    // Manually start the Actix system
    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(middleware::Logger::default())
                .wrap(cors)
                .wrap(middleware::NormalizePath::trim())
                .app_data(state.clone())
                .configure(configure)
        })
        .bind(listen)?
        .run()
        .await
    })
}
