//! HTTP-based `ReverseGeocoder` using Nominatim's reverse API.
//!
//! Requests carry an identifying `User-Agent` and an explicit timeout, as
//! required by the public instance's usage policy. Pacing is left to the
//! resolver.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use sightline_core::{Coordinate, GeocodeError, PlaceDetails, ReverseGeocoder};
use thiserror::Error;
use url::Url;

use super::response::ReverseResponse;

/// Error type for [`NominatimGeocoder`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The configured base URL could not be parsed.
    #[error("invalid Nominatim base URL {base_url:?}: {source}")]
    InvalidBaseUrl {
        /// URL as configured.
        base_url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default user agent for Nominatim requests.
pub const DEFAULT_USER_AGENT: &str = "sightline-geocode/0.1";

/// Neighbourhood-level zoom used for reverse lookups.
pub const DEFAULT_ZOOM: u8 = 16;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimConfig {
    /// Base URL of the Nominatim server.
    pub base_url: String,
    /// Connect and total request timeout.
    pub timeout: Duration,
    /// User agent string identifying the client.
    pub user_agent: String,
    /// Detail level of the returned address (3 = country .. 18 = building).
    pub zoom: u8,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl NominatimConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the zoom level.
    #[must_use]
    pub const fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }
}

/// Reverse geocoder backed by a Nominatim server.
///
/// Each call to [`ReverseGeocoder::reverse`] issues exactly one
/// `GET {base_url}/reverse` request.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    config: NominatimConfig,
    endpoint: Url,
}

impl NominatimGeocoder {
    /// Create a geocoder with default configuration for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(NominatimConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: NominatimConfig) -> Result<Self, ProviderBuildError> {
        let endpoint = reverse_endpoint(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &NominatimConfig {
        &self.config
    }

    /// Build the reverse lookup URL for `coordinate`.
    ///
    /// The URL format is:
    /// `{base_url}/reverse?format=jsonv2&lat={lat}&lon={lng}&zoom={zoom}&addressdetails=1`.
    fn build_reverse_url(&self, coordinate: Coordinate) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("format", "jsonv2")
            .append_pair("lat", &coordinate.lat.to_string())
            .append_pair("lon", &coordinate.lng.to_string())
            .append_pair("zoom", &self.config.zoom.to_string())
            .append_pair("addressdetails", "1");
        url
    }

    /// Convert a reqwest error to a `GeocodeError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> GeocodeError {
        if error.is_timeout() {
            return GeocodeError::Timeout {
                url: url.to_string(),
                timeout: self.config.timeout,
            };
        }

        if let Some(status) = error.status() {
            return GeocodeError::HttpError {
                url: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return GeocodeError::ParseError {
                message: error.to_string(),
            };
        }

        GeocodeError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, coordinate: Coordinate) -> Result<PlaceDetails, GeocodeError> {
        let url = self.build_reverse_url(coordinate);
        debug!("GET {url}");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        if let Some(reason) = &body.error {
            debug!("{url} could not be geocoded: {reason}");
        }
        Ok(body.into_place())
    }
}

fn reverse_endpoint(base_url: &str) -> Result<Url, ProviderBuildError> {
    let invalid = |source| ProviderBuildError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        source,
    };
    let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/'))).map_err(invalid)?;
    base.join("reverse").map_err(invalid)
}
