//! HTTP handlers for the Shipyard server.

use actix_web::error::{BlockingError, InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use shipyard_core::{PageQuery, Ship, ShipCriteria, ShipPatch, ShipService, ShipyardError};

use crate::openapi::ApiDoc;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Ship operations over the configured store.
    pub service: ShipService,
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Register every ship route along with JSON error handlers for bad input.
///
/// `count_ships` is registered before `get_ship` so `/rest/ships/count` is not
/// captured as an identifier.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .service(list_ships)
        .service(count_ships)
        .service(create_ship)
        .service(get_ship)
        .service(update_ship)
        .service(delete_ship)
        .service(openapi_json);
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        message: format!("invalid query: {err}"),
    });
    InternalError::from_response(err, response).into()
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        message: format!("invalid ship body: {err}"),
    });
    InternalError::from_response(err, response).into()
}

fn error_response(err: ShipyardError) -> HttpResponse {
    log::warn!("ship request failed: {err}");
    let body = ErrorResponse {
        message: err.message().to_string(),
    };
    match err {
        ShipyardError::BadRequest(_) => HttpResponse::BadRequest().json(body),
        ShipyardError::NotFound(_) => HttpResponse::NotFound().json(body),
        ShipyardError::Store(_) => HttpResponse::InternalServerError().json(body),
    }
}

fn respond<T>(
    result: Result<shipyard_core::Result<T>, BlockingError>,
    ok: impl FnOnce(T) -> HttpResponse,
) -> HttpResponse {
    match result {
        Ok(Ok(value)) => ok(value),
        Ok(Err(err)) => error_response(err),
        Err(err) => {
            log::error!("ship task failed: {err}");
            HttpResponse::InternalServerError().json(ErrorResponse {
                message: "ship task failed".to_string(),
            })
        }
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships",
    params(ShipCriteria, PageQuery),
    responses(
        (status = 200, description = "One page of matching ships", body = [Ship]),
        (status = 400, description = "Invalid filter or order", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships")]
/// List ships matching the filters, one page at a time.
pub async fn list_ships(
    state: web::Data<AppState>,
    criteria: web::Query<ShipCriteria>,
    page: web::Query<PageQuery>,
) -> impl Responder {
    let service = state.service.clone();
    let criteria = criteria.into_inner();
    let page = page.into_inner();
    let result = web::block(move || service.list(&criteria, &page)).await;
    respond(result, |ships| HttpResponse::Ok().json(ships))
}

#[utoipa::path(
    get,
    path = "/rest/ships/count",
    params(ShipCriteria),
    responses(
        (status = 200, description = "Number of matching ships", body = usize),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/count")]
/// Count ships matching the filters, ignoring paging.
pub async fn count_ships(
    state: web::Data<AppState>,
    criteria: web::Query<ShipCriteria>,
) -> impl Responder {
    let service = state.service.clone();
    let criteria = criteria.into_inner();
    let result = web::block(move || service.count(&criteria)).await;
    respond(result, |count| HttpResponse::Ok().json(count))
}

#[utoipa::path(
    get,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship", body = Ship),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/{id}")]
/// Fetch a single ship.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let service = state.service.clone();
    let id = path.into_inner();
    let result = web::block(move || service.get(&id)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    post,
    path = "/rest/ships",
    request_body = ShipPatch,
    responses(
        (status = 200, description = "Created ship", body = Ship),
        (status = 400, description = "Invalid ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships")]
/// Create a ship; the rating is derived from the supplied fields.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: web::Json<ShipPatch>,
) -> impl Responder {
    let service = state.service.clone();
    let patch = payload.into_inner();
    let result = web::block(move || service.create(&patch)).await;
    respond(result, |ship| {
        log::info!("created ship {}", ship.id);
        HttpResponse::Ok().json(ship)
    })
}

#[utoipa::path(
    post,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    request_body = ShipPatch,
    responses(
        (status = 200, description = "Updated ship", body = Ship),
        (status = 400, description = "Invalid identifier or field", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships/{id}")]
/// Apply a partial update to a ship and recompute its rating.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<ShipPatch>,
) -> impl Responder {
    let service = state.service.clone();
    let id = path.into_inner();
    let patch = payload.into_inner();
    let result = web::block(move || service.update(&id, &patch)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    delete,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/rest/ships/{id}")]
/// Delete a ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let service = state.service.clone();
    let id = path.into_inner();
    let log_id = id.clone();
    let result = web::block(move || service.delete(&id)).await;
    respond(result, |()| {
        log::info!("deleted ship {log_id}");
        HttpResponse::Ok().finish()
    })
}

#[utoipa::path(
    get,
    path = "/rest/openapi.json",
    responses(
        (status = 200, description = "OpenAPI specification")
    ),
    tag = "system"
)]
#[get("/rest/openapi.json")]
/// Serve the OpenAPI specification.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
