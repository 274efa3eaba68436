//! # Custom Alert Provider
//!
//! Send alerts for monitored endpoints as a fully templated HTTP request, so
//! any HTTP API can receive them without a dedicated integration.
//!
//! ## Features
//!
//! - Templated URL, body and header values
//! - Placeholders: `[ALERT_DESCRIPTION]`, `[ENDPOINT_NAME]`, `[ENDPOINT_GROUP]`,
//!   `[ENDPOINT_URL]` and `[ALERT_TRIGGERED_OR_RESOLVED]`
//! - Per-placeholder remapping of the `TRIGGERED` / `RESOLVED` values
//! - Configurable HTTP method (defaults to `GET`) and client settings
//! - Any status code of 400 or above is reported as an error with the response body
//!
//! ## Example
//!
//! ```rust,no_run
//! use custom_alert_provider::{Alert, AlertProviderConfig, CustomAlertProvider, Endpoint, EndpointResult};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AlertProviderConfig::new("https://chat.example.com/hooks/alerts")
//!         .with_method("POST")
//!         .with_header("Content-Type", "application/json")
//!         .with_body(r#"{"text": "[ENDPOINT_GROUP]/[ENDPOINT_NAME] [ALERT_TRIGGERED_OR_RESOLVED]: [ALERT_DESCRIPTION]"}"#)
//!         .with_placeholder("ALERT_TRIGGERED_OR_RESOLVED", "TRIGGERED", "is down")
//!         .with_placeholder("ALERT_TRIGGERED_OR_RESOLVED", "RESOLVED", "is back up");
//!
//!     let provider = CustomAlertProvider::new(config)?;
//!
//!     let endpoint = Endpoint::new("api")
//!         .with_group("core")
//!         .with_url("https://api.example.com/health");
//!     let alert = Alert::new().with_description("healthcheck failed 3 times in a row");
//!     let result = EndpointResult::new(false).with_condition("[STATUS] == 200", false);
//!
//!     provider.send(&endpoint, &alert, &result, false).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod errors;
mod request;
mod template;
mod types;

pub use client::CustomAlertProvider;
pub use config::{AlertProviderConfig, ClientConfig, Placeholders};
pub use errors::{AlertProviderError, Result};
pub use request::{RenderedRequest, DEFAULT_METHOD};
pub use template::{replace_placeholder, AlertState, Placeholder};
pub use types::{Alert, ConditionResult, Endpoint, EndpointResult};
