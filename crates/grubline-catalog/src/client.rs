//! HTTP client for the catalog backend.
//!
//! Every catalog document is a plain `GET` returning JSON. The client knows
//! how to build the two document URLs and how to map HTTP outcomes onto
//! [`FetchError`]; decoding into domain types is left to [`crate::normalize`].

use std::time::Duration;

use async_trait::async_trait;
use grubline_core::{AppConfig, MenuDetail, RestaurantSummary};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode, Url};

use crate::error::FetchError;
use crate::normalize::{normalize_listing, normalize_menu};
use crate::subscription::{DocumentSource, RawDocument, ResourceId};

pub const DEFAULT_LISTING_PATH: &str = "/api/restaurants";
pub const DEFAULT_MENU_PATH: &str = "/api/restaurant/menu";

/// Client for the catalog backend.
///
/// Use [`CatalogClient::from_config`] in the binary and
/// [`CatalogClient::new`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    listing_path: String,
    menu_path: String,
}

impl CatalogClient {
    /// Creates a client using the default document paths.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `base_url` is not an absolute
    /// `http(s)` URL, or [`FetchError::Network`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        connect_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent(user_agent)
            .build()?;

        let parsed = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: base_url.to_owned(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            listing_path: DEFAULT_LISTING_PATH.to_owned(),
            menu_path: DEFAULT_MENU_PATH.to_owned(),
        })
    }

    /// Replaces the listing path and menu path prefix.
    #[must_use]
    pub fn with_paths(mut self, listing_path: &str, menu_path: &str) -> Self {
        self.listing_path = join_path(listing_path);
        self.menu_path = join_path(menu_path);
        self
    }

    /// Builds a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            config.connect_timeout_secs,
            &config.user_agent,
        )?
        .with_paths(&config.listing_path, &config.menu_path))
    }

    /// Identifier of the restaurant listing document.
    #[must_use]
    pub fn listing_resource(&self) -> ResourceId {
        ResourceId::new(format!("{}{}", self.base_url, self.listing_path))
    }

    /// Identifier of one restaurant's menu-detail document.
    ///
    /// The restaurant id is percent-encoded as a single path segment.
    #[must_use]
    pub fn menu_resource(&self, restaurant_id: &str) -> ResourceId {
        let segment = utf8_percent_encode(restaurant_id, NON_ALPHANUMERIC);
        ResourceId::new(format!("{}{}/{segment}", self.base_url, self.menu_path))
    }

    /// Fetches the JSON document behind `resource`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] if `resource` is not a valid URL.
    /// - [`FetchError::NotFound`] on HTTP 404.
    /// - [`FetchError::HttpStatus`] on any other non-2xx status.
    /// - [`FetchError::Network`] on transport failure or timeout.
    /// - [`FetchError::Decode`] if the body is not JSON.
    pub async fn fetch_document(&self, resource: &ResourceId) -> Result<RawDocument, FetchError> {
        let url = Url::parse(resource.as_str()).map_err(|e| FetchError::InvalidUrl {
            url: resource.to_string(),
            reason: e.to_string(),
        })?;

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: resource.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: resource.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            context: resource.to_string(),
            source: e,
        })
    }

    /// Fetches and normalizes the restaurant listing in one step.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::fetch_document`].
    pub async fn fetch_listing(&self) -> Result<Vec<RestaurantSummary>, FetchError> {
        let document = self.fetch_document(&self.listing_resource()).await?;
        Ok(normalize_listing(&document))
    }

    /// Fetches and normalizes one restaurant's menu in one step.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::fetch_document`]. An unknown restaurant id is
    /// [`FetchError::NotFound`].
    pub async fn fetch_menu(&self, restaurant_id: &str) -> Result<MenuDetail, FetchError> {
        let document = self
            .fetch_document(&self.menu_resource(restaurant_id))
            .await?;
        Ok(normalize_menu(&document))
    }
}

#[async_trait]
impl DocumentSource for CatalogClient {
    async fn fetch(&self, resource: &ResourceId) -> Result<RawDocument, FetchError> {
        self.fetch_document(resource).await
    }
}

/// Ensures a leading slash and strips trailing ones.
fn join_path(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
