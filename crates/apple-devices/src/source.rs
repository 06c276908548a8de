//! Remote firmware metadata sources

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::device::Device;
use crate::error::Result;
#[cfg(feature = "http")]
use crate::error::Error;

/// Default ipsw.me API root
pub const DEFAULT_BASE_URL: &str = "https://api.ipsw.me/v4";

/// Entry of the device list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSummary {
    /// Model identifier, e.g. `iPhone14,2`
    pub identifier: String,
    /// Marketing name, when the service provides it
    #[serde(default)]
    pub name: Option<String>,
}

impl DeviceSummary {
    /// Summary with only an identifier
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: None,
        }
    }
}

/// Where the updater gets its device and firmware data from
#[async_trait]
pub trait FirmwareSource: Send + Sync {
    /// List every known device
    async fn list_devices(&self) -> Result<Vec<DeviceSummary>>;

    /// Fetch one device together with its IPSW firmware list
    async fn fetch_device(&self, identifier: &str) -> Result<Device>;
}

/// Configuration for the ipsw.me client
#[derive(Debug, Clone)]
pub struct IpswConfig {
    /// API root, without a trailing slash
    pub base_url: String,
    /// Timeout applied to every single request
    pub request_timeout: Duration,
    /// `User-Agent` header sent with each request
    pub user_agent: String,
}

impl Default for IpswConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(60),
            user_agent: concat!("apple-devices/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl IpswConfig {
    /// Set the API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the `User-Agent` header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP client for the ipsw.me API.
///
/// All requests share one connection pool. No request is retried.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct IpswClient {
    client: reqwest::Client,
    config: IpswConfig,
}

#[cfg(feature = "http")]
impl IpswClient {
    /// Create a client with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(IpswConfig::default())
    }

    /// Create a client with a custom configuration
    pub fn with_config(config: IpswConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    /// Active configuration
    pub fn config(&self) -> &IpswConfig {
        &self.config
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<T> {
        log::debug!("GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(Error::HttpStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl FirmwareSource for IpswClient {
    async fn list_devices(&self) -> Result<Vec<DeviceSummary>> {
        let url = format!("{}/devices", self.config.base_url);
        self.get_json(url, &[]).await
    }

    async fn fetch_device(&self, identifier: &str) -> Result<Device> {
        let url = format!("{}/device/{}", self.config.base_url, identifier);
        self.get_json(url, &[("type", "ipsw")]).await
    }
}
