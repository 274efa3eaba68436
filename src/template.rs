use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Placeholders recognized in URL, body and header templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    AlertDescription,
    EndpointName,
    EndpointGroup,
    EndpointUrl,
    AlertTriggeredOrResolved,
}

impl Placeholder {
    /// Placeholders in the order they are substituted
    pub const ALL: [Self; 5] = [
        Self::AlertDescription,
        Self::EndpointName,
        Self::EndpointGroup,
        Self::EndpointUrl,
        Self::AlertTriggeredOrResolved,
    ];

    /// Bare name, as used for keys of the placeholder remap table
    pub const fn name(self) -> &'static str {
        match self {
            Self::AlertDescription => "ALERT_DESCRIPTION",
            Self::EndpointName => "ENDPOINT_NAME",
            Self::EndpointGroup => "ENDPOINT_GROUP",
            Self::EndpointUrl => "ENDPOINT_URL",
            Self::AlertTriggeredOrResolved => "ALERT_TRIGGERED_OR_RESOLVED",
        }
    }

    /// Bracketed token as it appears in templates
    pub const fn token(self) -> &'static str {
        match self {
            Self::AlertDescription => "[ALERT_DESCRIPTION]",
            Self::EndpointName => "[ENDPOINT_NAME]",
            Self::EndpointGroup => "[ENDPOINT_GROUP]",
            Self::EndpointUrl => "[ENDPOINT_URL]",
            Self::AlertTriggeredOrResolved => "[ALERT_TRIGGERED_OR_RESOLVED]",
        }
    }
}

impl Display for Placeholder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Whether an alert is being triggered or resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertState {
    Triggered,
    Resolved,
}

impl AlertState {
    pub fn from_resolved(resolved: bool) -> Self {
        if resolved {
            Self::Resolved
        } else {
            Self::Triggered
        }
    }

    /// Canonical value substituted for `[ALERT_TRIGGERED_OR_RESOLVED]`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Triggered => "TRIGGERED",
            Self::Resolved => "RESOLVED",
        }
    }
}

impl Display for AlertState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replace every occurrence of `placeholder` in the body, the URL and all
/// header values with `content`
///
/// Matching is literal: no escaping, no pattern syntax. Header names are left
/// untouched.
pub fn replace_placeholder(
    placeholder: &str,
    content: &str,
    body: &mut String,
    url: &mut String,
    headers: &mut HashMap<String, String>,
) {
    replace_in_place(body, placeholder, content);
    replace_in_place(url, placeholder, content);
    for value in headers.values_mut() {
        replace_in_place(value, placeholder, content);
    }
}

fn replace_in_place(target: &mut String, placeholder: &str, content: &str) {
    if target.contains(placeholder) {
        *target = target.replace(placeholder, content);
    }
}
