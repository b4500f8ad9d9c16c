// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP implementation of [`RemoteStateClient`] for the hub's REST API.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::client::RemoteStateClient;
use crate::error::TransportError;
use crate::feed::{GlobalVariable, RefreshResponse};
use crate::types::Checkpoint;

/// Connection parameters for a hub.
///
/// # Examples
///
/// ```
/// use fibaro_sync::client::HttpHubConfig;
/// use std::time::Duration;
///
/// let config = HttpHubConfig::new("192.168.1.10")
///     .with_credentials("admin", "admin")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://192.168.1.10");
/// ```
#[derive(Debug, Clone)]
pub struct HttpHubConfig {
    host: String,
    port: u16,
    use_https: bool,
    credentials: Option<(String, String)>,
    timeout: Duration,
}

impl HttpHubConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default HTTPS port.
    pub const DEFAULT_HTTPS_PORT: u16 = 443;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the hub at `host`.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            use_https: false,
            credentials: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables HTTPS.
    ///
    /// If the port was left at its default it moves to 443.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.use_https = true;
        if self.port == Self::DEFAULT_PORT {
            self.port = Self::DEFAULT_HTTPS_PORT;
        }
        self
    }

    /// Sets basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        let port_suffix =
            if (self.use_https && self.port == 443) || (!self.use_https && self.port == 80) {
                String::new()
            } else {
                format!(":{}", self.port)
            };
        format!("{scheme}://{}{port_suffix}", self.host)
    }

    /// Creates an `HttpHubClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpHubClient, TransportError> {
        let base_url = self.base_url();
        let client = Client::builder().timeout(self.timeout).build()?;
        Ok(HttpHubClient {
            base_url,
            client,
            credentials: self.credentials,
        })
    }
}

/// Hub client speaking the REST API.
///
/// - `GET /api/refreshStates?last=<checkpoint>` for the change feed
/// - `GET /api/globalVariables/<name>` for global variables
#[derive(Debug, Clone)]
pub struct HttpHubClient {
    base_url: String,
    client: Client,
    credentials: Option<(String, String)>,
}

impl HttpHubClient {
    /// Creates a client for a base URL such as `http://192.168.1.10`.
    ///
    /// A bare host gets an `http://` prefix.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is empty or the HTTP client cannot be
    /// created.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(TransportError::InvalidAddress("hub address is required".to_string()));
        }
        let base_url = if base_url.starts_with("http://") || base_url.starts_with("https://") {
            base_url.to_string()
        } else {
            format!("http://{base_url}")
        };

        let client = Client::builder()
            .timeout(HttpHubConfig::DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url,
            client,
            credentials: None,
        })
    }

    /// Sets basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn refresh_url(&self, since: Checkpoint) -> String {
        format!("{}/api/refreshStates?last={since}", self.base_url)
    }

    fn global_variable_url(&self, name: &str) -> String {
        format!(
            "{}/api/globalVariables/{}",
            self.base_url,
            urlencoding::encode(name)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TransportError> {
        tracing::trace!(url = %url, "Sending hub request");

        let mut request = self.client.get(url);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl RemoteStateClient for HttpHubClient {
    async fn refresh_states(&self, since: Checkpoint) -> Result<RefreshResponse, TransportError> {
        self.get_json(&self.refresh_url(since)).await
    }

    async fn get_global_variable(&self, name: &str) -> Result<GlobalVariable, TransportError> {
        self.get_json(&self.global_variable_url(name)).await
    }
}
