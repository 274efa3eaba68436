use chrono::{DateTime, Utc};
use serde::Deserialize;

const DEFAULT_FAILURE_THRESHOLD: u32 = 3;
const DEFAULT_SUCCESS_THRESHOLD: u32 = 2;

/// Monitored endpoint an alert is attached to
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Endpoint {
    /// Name of the endpoint
    pub name: String,

    /// Group the endpoint belongs to (may be empty)
    #[serde(default)]
    pub group: String,

    /// URL the endpoint is monitoring
    #[serde(default)]
    pub url: String,
}

impl Endpoint {
    /// Create a new endpoint with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Set the endpoint group
    pub fn with_group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    /// Set the monitored URL
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }
}

/// Alert attached to an endpoint
///
/// Used both for the alert being sent and for a provider's default alert.
///
/// # Example
///
/// ```rust
/// use custom_alert_provider::Alert;
///
/// let alert = Alert::new()
///     .with_description("healthcheck failed 3 times in a row")
///     .with_send_on_resolved(true);
///
/// assert_eq!(alert.description(), "healthcheck failed 3 times in a row");
/// assert!(alert.is_sending_on_resolved());
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Alert {
    /// Whether the alert is enabled (defaults to `true` when unset)
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Human-readable description of the alert
    #[serde(default)]
    pub description: Option<String>,

    /// Consecutive failures before the alert triggers
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,

    /// Consecutive successes before a triggered alert resolves
    #[serde(default = "default_success_threshold")]
    pub success_threshold: u32,

    /// Whether a notification is sent once the alert resolves
    #[serde(default)]
    pub send_on_resolved: Option<bool>,
}

fn default_failure_threshold() -> u32 {
    DEFAULT_FAILURE_THRESHOLD
}

fn default_success_threshold() -> u32 {
    DEFAULT_SUCCESS_THRESHOLD
}

impl Alert {
    /// Create a new alert with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Enable or disable the alert
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Set the failure threshold
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// Set the success threshold
    pub fn with_success_threshold(mut self, threshold: u32) -> Self {
        self.success_threshold = threshold;
        self
    }

    /// Set whether resolution is notified
    pub fn with_send_on_resolved(mut self, send_on_resolved: bool) -> Self {
        self.send_on_resolved = Some(send_on_resolved);
        self
    }

    /// Get the description, or an empty string if none is set
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Whether the alert is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Whether a notification should be sent on resolution
    pub fn is_sending_on_resolved(&self) -> bool {
        self.send_on_resolved.unwrap_or(false)
    }
}

impl Default for Alert {
    fn default() -> Self {
        Self {
            enabled: None,
            description: None,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
            send_on_resolved: None,
        }
    }
}

/// Outcome of a single condition evaluated against an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionResult {
    pub condition: String,
    pub success: bool,
}

/// Result of the endpoint evaluation that led to the alert
#[derive(Debug, Clone)]
pub struct EndpointResult {
    /// Whether every condition succeeded
    pub success: bool,

    /// Individual condition outcomes
    pub condition_results: Vec<ConditionResult>,

    /// When the evaluation happened
    pub timestamp: DateTime<Utc>,
}

impl EndpointResult {
    /// Create an empty result timestamped now
    pub fn new(success: bool) -> Self {
        Self {
            success,
            condition_results: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Record a condition outcome
    pub fn with_condition(mut self, condition: &str, success: bool) -> Self {
        self.condition_results.push(ConditionResult {
            condition: condition.to_string(),
            success,
        });
        self
    }

    /// Set a custom evaluation time
    pub fn with_timestamp(mut self, time: DateTime<Utc>) -> Self {
        self.timestamp = time;
        self
    }
}
