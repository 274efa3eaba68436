use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use std::collections::HashMap;
use url::Url;

use crate::config::AlertProviderConfig;
use crate::errors::{AlertProviderError, Result};
use crate::template::{replace_placeholder, Placeholder};
use crate::types::{Alert, Endpoint};

/// Method used when the configuration does not set one
pub const DEFAULT_METHOD: &str = "GET";

/// Request with every placeholder substituted
///
/// Built fresh for each alert and consumed when dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRequest {
    pub method: String,
    pub url: String,
    pub body: String,
    pub headers: HashMap<String, String>,
}

impl RenderedRequest {
    /// Render the configured templates for an alert on `endpoint`
    ///
    /// The configuration itself is left untouched.
    pub fn render(
        config: &AlertProviderConfig,
        endpoint: &Endpoint,
        alert: &Alert,
        resolved: bool,
    ) -> Self {
        let mut body = config.body.clone();
        let mut url = config.url.clone();
        let mut headers = config.headers.clone();

        let substitutions = [
            (Placeholder::AlertDescription, alert.description()),
            (Placeholder::EndpointName, endpoint.name.as_str()),
            (Placeholder::EndpointGroup, endpoint.group.as_str()),
            (Placeholder::EndpointUrl, endpoint.url.as_str()),
            (
                Placeholder::AlertTriggeredOrResolved,
                config.alert_state_placeholder_value(resolved),
            ),
        ];
        for (placeholder, content) in substitutions {
            replace_placeholder(placeholder.token(), content, &mut body, &mut url, &mut headers);
        }

        let method = config
            .method
            .as_deref()
            .filter(|method| !method.is_empty())
            .unwrap_or(DEFAULT_METHOD)
            .to_string();

        Self {
            method,
            url,
            body,
            headers,
        }
    }

    /// Turn the rendered strings into a request on `client`
    ///
    /// # Errors
    ///
    /// Returns an error if the method, URL or a header is not valid once
    /// rendered.
    pub fn into_request(self, client: &ClientWithMiddleware) -> Result<RequestBuilder> {
        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|_| AlertProviderError::InvalidMethod(self.method.clone()))?;

        let url = Url::parse(&self.url).map_err(|source| AlertProviderError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;

        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let invalid = || AlertProviderError::InvalidHeader { name: name.clone() };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
        }

        Ok(client.request(method, url).headers(headers).body(self.body))
    }
}
