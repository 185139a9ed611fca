//! HTTP client for the Shipyard REST API.

use std::fmt;

use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shipyard_core::{PageQuery, Ship, ShipCriteria, ShipPatch};

use crate::CliResult;

/// A non-success response from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Server-provided message, or the raw body when it was not JSON.
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "server returned {}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Strip whitespace and trailing slashes from a server URL.
pub fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Reqwest-backed client for ship endpoints.
pub struct ShipClient {
    client: Client,
    base_url: String,
}

impl ShipClient {
    /// Build a client for the given server.
    pub fn new(server_url: &str) -> CliResult<Self> {
        let client = Client::builder().user_agent("shipyard-cli").build()?;
        Ok(Self {
            client,
            base_url: normalize_server_url(server_url)?,
        })
    }

    fn ships_url(&self) -> String {
        format!("{}/rest/ships", self.base_url)
    }

    fn ship_url(&self, id: &str) -> String {
        format!("{}/rest/ships/{}", self.base_url, id.trim())
    }

    /// Fetch one page of ships matching the criteria.
    pub async fn list(&self, criteria: &ShipCriteria, page: &PageQuery) -> CliResult<Vec<Ship>> {
        let response = self
            .client
            .get(self.ships_url())
            .query(criteria)
            .query(page)
            .send()
            .await?;
        read_json(response).await
    }

    /// Count ships matching the criteria.
    pub async fn count(&self, criteria: &ShipCriteria) -> CliResult<usize> {
        let response = self
            .client
            .get(format!("{}/count", self.ships_url()))
            .query(criteria)
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch a ship by identifier.
    pub async fn get(&self, id: &str) -> CliResult<Ship> {
        let response = self.client.get(self.ship_url(id)).send().await?;
        read_json(response).await
    }

    /// Create a ship.
    pub async fn create(&self, patch: &ShipPatch) -> CliResult<Ship> {
        let response = self
            .client
            .post(self.ships_url())
            .json(patch)
            .send()
            .await?;
        read_json(response).await
    }

    /// Apply a partial update to a ship.
    pub async fn update(&self, id: &str, patch: &ShipPatch) -> CliResult<Ship> {
        let response = self
            .client
            .post(self.ship_url(id))
            .json(patch)
            .send()
            .await?;
        read_json(response).await
    }

    /// Delete a ship.
    pub async fn delete(&self, id: &str) -> CliResult<()> {
        let response = self.client.delete(self.ship_url(id)).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> CliResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|error| error.message)
        .unwrap_or(body);
    Err(ApiError {
        status: status.as_u16(),
        message,
    }
    .into())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> CliResult<T> {
    let response = check_status(response).await?;
    Ok(response.json::<T>().await?)
}
