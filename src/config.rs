use reqwest::redirect::Policy;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::{AlertProviderError, Result};
use crate::template::{AlertState, Placeholder};
use crate::types::Alert;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Placeholder remap table
///
/// Maps a placeholder name (e.g. `ALERT_TRIGGERED_OR_RESOLVED`) to a mapping
/// from canonical value to the replacement to use instead.
pub type Placeholders = HashMap<String, HashMap<String, String>>;

/// Settings for the HTTP client used to reach the provider
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    /// Accept invalid TLS certificates
    #[serde(default)]
    pub insecure: bool,

    /// Do not follow redirects
    #[serde(default)]
    pub ignore_redirect: bool,

    /// Request timeout in seconds
    #[serde(rename = "timeout", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            insecure: false,
            ignore_redirect: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build an HTTP client honoring these settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build_client(&self) -> Result<ClientWithMiddleware> {
        let redirect = if self.ignore_redirect {
            Policy::none()
        } else {
            Policy::default()
        };

        let client = Client::builder()
            .timeout(self.timeout())
            .danger_accept_invalid_certs(self.insecure)
            .redirect(redirect)
            .build()
            .map_err(AlertProviderError::BuildHttpClient)?;

        Ok(ClientBuilder::new(client).build())
    }
}

/// Configuration of a custom alert provider
///
/// # Example
///
/// ```rust
/// use custom_alert_provider::AlertProviderConfig;
///
/// let mut config = AlertProviderConfig::new("https://example.com/alert?state=[ALERT_TRIGGERED_OR_RESOLVED]")
///     .with_method("POST")
///     .with_body(r#"{"endpoint": "[ENDPOINT_NAME]"}"#)
///     .with_header("Content-Type", "application/json")
///     .with_placeholder("ALERT_TRIGGERED_OR_RESOLVED", "RESOLVED", "ok");
///
/// assert!(config.is_valid());
/// assert_eq!(config.alert_state_placeholder_value(true), "ok");
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AlertProviderConfig {
    /// URL template
    pub url: String,

    /// HTTP method, `GET` when unset or empty
    #[serde(default)]
    pub method: Option<String>,

    /// Body template
    #[serde(default)]
    pub body: String,

    /// Header name to header value template
    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub placeholders: Placeholders,

    /// HTTP client settings, defaulted by [`AlertProviderConfig::is_valid`]
    #[serde(default, rename = "client")]
    pub client_config: Option<ClientConfig>,

    /// Default alert for endpoints that use this provider
    #[serde(default)]
    pub default_alert: Option<Alert>,
}

impl AlertProviderConfig {
    /// Create a configuration with the given URL template
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = Some(method.to_string());
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Add a header whose value may contain placeholders
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Remap the canonical `value` of placeholder `name` to `replacement`
    pub fn with_placeholder(mut self, name: &str, value: &str, replacement: &str) -> Self {
        self.placeholders
            .entry(name.to_string())
            .or_default()
            .insert(value.to_string(), replacement.to_string());
        self
    }

    pub fn with_client_config(mut self, client_config: ClientConfig) -> Self {
        self.client_config = Some(client_config);
        self
    }

    pub fn with_default_alert(mut self, alert: Alert) -> Self {
        self.default_alert = Some(alert);
        self
    }

    /// Whether the configuration can be used to send alerts
    ///
    /// Fills in the default client configuration if none is set. An existing
    /// client configuration is kept as is.
    pub fn is_valid(&mut self) -> bool {
        self.client_config.get_or_insert_with(ClientConfig::default);
        !self.url.is_empty()
    }

    /// Value substituted for `[ALERT_TRIGGERED_OR_RESOLVED]`
    ///
    /// `TRIGGERED` or `RESOLVED`, unless the placeholder remap table
    /// overrides it.
    pub fn alert_state_placeholder_value(&self, resolved: bool) -> &str {
        let state = AlertState::from_resolved(resolved).as_str();
        self.placeholders
            .get(Placeholder::AlertTriggeredOrResolved.name())
            .and_then(|values| values.get(state))
            .map_or(state, String::as_str)
    }

    /// Get the default alert
    pub fn default_alert(&self) -> Option<&Alert> {
        self.default_alert.as_ref()
    }
}
