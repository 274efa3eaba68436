use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, instrument};

use crate::config::{AlertProviderConfig, ClientConfig};
use crate::errors::{AlertProviderError, Result};
use crate::request::RenderedRequest;
use crate::types::{Alert, Endpoint, EndpointResult};

/// Status codes above this are treated as a failed delivery
const MAX_SUCCESS_STATUS: u16 = 399;

/// Provider sending alerts as a custom, templated HTTP request
///
/// # Example
///
/// ```rust,no_run
/// use custom_alert_provider::{Alert, AlertProviderConfig, CustomAlertProvider, Endpoint, EndpointResult};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = AlertProviderConfig::new("https://hooks.example.com/[ENDPOINT_NAME]")
///         .with_method("POST")
///         .with_body("[ENDPOINT_NAME] is [ALERT_TRIGGERED_OR_RESOLVED]: [ALERT_DESCRIPTION]");
///     let provider = CustomAlertProvider::new(config)?;
///
///     let endpoint = Endpoint::new("api").with_url("https://api.example.com/health");
///     let alert = Alert::new().with_description("healthcheck failed");
///
///     provider
///         .send(&endpoint, &alert, &EndpointResult::new(false), false)
///         .await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CustomAlertProvider {
    client: ClientWithMiddleware,
    config: AlertProviderConfig,
}

impl CustomAlertProvider {
    /// Create a new provider
    ///
    /// The HTTP client is built from the configuration's client settings,
    /// which are defaulted if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: AlertProviderConfig) -> Result<Self> {
        let config = validate(config)?;
        let client = config
            .client_config
            .as_ref()
            .map_or_else(|| ClientConfig::default().build_client(), ClientConfig::build_client)?;

        Ok(Self { client, config })
    }

    /// Create a new provider with a custom reqwest middleware client
    ///
    /// This allows you to add custom middleware (logging, auth, etc.) or to
    /// point the provider at a test transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_client(config: AlertProviderConfig, client: ClientWithMiddleware) -> Result<Self> {
        let config = validate(config)?;
        Ok(Self { client, config })
    }

    /// Get the provider configuration
    pub fn config(&self) -> &AlertProviderConfig {
        &self.config
    }

    /// Get the default alert configured for this provider
    pub fn default_alert(&self) -> Option<&Alert> {
        self.config.default_alert()
    }

    /// Render the request that would be sent for an alert
    pub fn build_request(&self, endpoint: &Endpoint, alert: &Alert, resolved: bool) -> RenderedRequest {
        RenderedRequest::render(&self.config, endpoint, alert, resolved)
    }

    /// Send an alert
    ///
    /// Any status code up to 399 counts as delivered.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The rendered request is invalid
    /// - The HTTP request fails
    /// - The provider returns a status code of 400 or above
    #[instrument(
        name = "CustomAlertProvider::send",
        skip_all,
        fields(
            endpoint = %endpoint.name,
            group = %endpoint.group,
            resolved = resolved,
            success = result.success,
        )
    )]
    pub async fn send(
        &self,
        endpoint: &Endpoint,
        alert: &Alert,
        result: &EndpointResult,
        resolved: bool,
    ) -> Result<()> {
        let request = self.build_request(endpoint, alert, resolved);

        debug!(method = %request.method, url = %request.url, "Sending custom alert");

        let response = request.into_request(&self.client)?.send().await?;

        let status = response.status().as_u16();
        let body = response.bytes().await.unwrap_or_default();

        if status > MAX_SUCCESS_STATUS {
            return Err(AlertProviderError::Api {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        debug!(status, "Custom alert sent successfully");
        Ok(())
    }
}

fn validate(mut config: AlertProviderConfig) -> Result<AlertProviderConfig> {
    if !config.is_valid() {
        return Err(AlertProviderError::InvalidConfig("url must not be empty"));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest_middleware::ClientBuilder;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoint() -> Endpoint {
        Endpoint::new("endpoint-name")
            .with_group("endpoint-group")
            .with_url("https://example.com")
    }

    fn endpoint_result(success: bool) -> EndpointResult {
        EndpointResult::new(success)
            .with_condition("[CONNECTED] == true", success)
            .with_condition("[STATUS] == 200", success)
    }

    #[test]
    fn test_new_rejects_empty_url() {
        let result = CustomAlertProvider::new(AlertProviderConfig::new(""));
        assert!(matches!(result, Err(AlertProviderError::InvalidConfig(_))));
    }

    #[test]
    fn test_new_defaults_client_config() {
        let provider = CustomAlertProvider::new(AlertProviderConfig::new("https://example.com")).unwrap();
        assert_eq!(provider.config().client_config, Some(ClientConfig::default()));
    }

    #[test]
    fn test_default_alert_getter() {
        let config = AlertProviderConfig::new("https://example.com")
            .with_default_alert(Alert::new().with_description("default"));
        let provider = CustomAlertProvider::new(config).unwrap();
        assert_eq!(provider.default_alert().map(Alert::description), Some("default"));

        let provider = CustomAlertProvider::new(AlertProviderConfig::new("https://example.com")).unwrap();
        assert!(provider.default_alert().is_none());
    }

    #[tokio::test]
    async fn test_send_triggered_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/alert"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = AlertProviderConfig::new(&format!("{}/alert", mock_server.uri()));
        let provider = CustomAlertProvider::new(config).unwrap();
        let alert = Alert::new().with_description("description-1");

        let result = provider.send(&endpoint(), &alert, &endpoint_result(false), false).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_triggered_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal server error"))
            .mount(&mock_server)
            .await;

        let config = AlertProviderConfig::new(&mock_server.uri());
        let provider = CustomAlertProvider::new(config).unwrap();
        let alert = Alert::new().with_description("description-1");

        let result = provider.send(&endpoint(), &alert, &endpoint_result(false), false).await;

        match result {
            Err(err @ AlertProviderError::Api { .. }) => {
                assert_eq!(err.status(), Some(500));
                let message = err.to_string();
                assert!(message.contains("500"));
                assert!(message.contains("Internal server error"));
            }
            _ => panic!("Expected Api error"),
        }
    }

    #[tokio::test]
    async fn test_send_resolved_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/endpoint-group/endpoint-name"))
            .and(query_param("event", "RESOLVED"))
            .and(query_param("url", "https://example.com"))
            .and(header("X-Alert-State", "RESOLVED"))
            .and(body_string("endpoint-name,endpoint-group,description-2,https://example.com,RESOLVED"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = AlertProviderConfig::new(&format!(
            "{}/[ENDPOINT_GROUP]/[ENDPOINT_NAME]?event=[ALERT_TRIGGERED_OR_RESOLVED]&url=[ENDPOINT_URL]",
            mock_server.uri()
        ))
        .with_method("POST")
        .with_body("[ENDPOINT_NAME],[ENDPOINT_GROUP],[ALERT_DESCRIPTION],[ENDPOINT_URL],[ALERT_TRIGGERED_OR_RESOLVED]")
        .with_header("X-Alert-State", "[ALERT_TRIGGERED_OR_RESOLVED]");
        let provider = CustomAlertProvider::new(config).unwrap();
        let alert = Alert::new().with_description("description-2");

        let result = provider.send(&endpoint(), &alert, &endpoint_result(true), true).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_resolved_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service unavailable"))
            .mount(&mock_server)
            .await;

        let provider = CustomAlertProvider::new(AlertProviderConfig::new(&mock_server.uri())).unwrap();
        let alert = Alert::new().with_description("description-2");

        let result = provider.send(&endpoint(), &alert, &endpoint_result(true), true).await;

        if let Err(AlertProviderError::Api { status, body }) = result {
            assert_eq!(status, 503);
            assert_eq!(body, "Service unavailable");
        } else {
            panic!("Expected Api error");
        }
    }

    #[tokio::test]
    async fn test_send_with_custom_placeholders() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/boom"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = AlertProviderConfig::new(&format!("{}/[ALERT_TRIGGERED_OR_RESOLVED]", mock_server.uri()))
            .with_method("PUT")
            .with_placeholder("ALERT_TRIGGERED_OR_RESOLVED", "TRIGGERED", "boom");
        let provider = CustomAlertProvider::new(config).unwrap();

        let result = provider.send(&endpoint(), &Alert::new(), &endpoint_result(false), false).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_4xx_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Bad request"))
            .mount(&mock_server)
            .await;

        let provider = CustomAlertProvider::new(AlertProviderConfig::new(&mock_server.uri())).unwrap();

        let result = provider.send(&endpoint(), &Alert::new(), &endpoint_result(false), false).await;
        assert_eq!(result.unwrap_err().status(), Some(400));
    }

    #[tokio::test]
    async fn test_send_repeatedly_releases_responses() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(3)
            .mount(&mock_server)
            .await;

        let provider = CustomAlertProvider::new(AlertProviderConfig::new(&mock_server.uri())).unwrap();

        for _ in 0..3 {
            let result = provider.send(&endpoint(), &Alert::new(), &endpoint_result(true), true).await;
            assert!(result.is_ok());
        }
    }

    #[tokio::test]
    async fn test_send_with_injected_client() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ClientBuilder::new(reqwest::Client::new()).build();
        let provider =
            CustomAlertProvider::with_client(AlertProviderConfig::new(&mock_server.uri()), client).unwrap();
        assert!(provider.config().client_config.is_some());

        let result = provider.send(&endpoint(), &Alert::new(), &endpoint_result(false), false).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_ignores_redirect_when_configured() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/alert"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/moved"))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/moved"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let url = format!("{}/alert", mock_server.uri());

        let config = AlertProviderConfig::new(&url).with_client_config(ClientConfig {
            ignore_redirect: true,
            ..ClientConfig::default()
        });
        let provider = CustomAlertProvider::new(config).unwrap();
        let result = provider.send(&endpoint(), &Alert::new(), &endpoint_result(false), false).await;
        assert!(result.is_ok());

        let provider = CustomAlertProvider::new(AlertProviderConfig::new(&url)).unwrap();
        let result = provider.send(&endpoint(), &Alert::new(), &endpoint_result(false), false).await;
        assert_eq!(result.unwrap_err().status(), Some(500));
    }

    #[tokio::test]
    async fn test_send_transport_failure() {
        let provider = CustomAlertProvider::new(AlertProviderConfig::new("http://127.0.0.1:1/alert")).unwrap();

        let result = provider.send(&endpoint(), &Alert::new(), &endpoint_result(false), false).await;
        assert!(matches!(result, Err(AlertProviderError::Request(_))));
    }

    #[tokio::test]
    async fn test_send_invalid_rendered_url() {
        let provider = CustomAlertProvider::new(AlertProviderConfig::new("[ENDPOINT_NAME]")).unwrap();

        let result = provider.send(&endpoint(), &Alert::new(), &endpoint_result(false), false).await;
        assert!(matches!(result, Err(AlertProviderError::InvalidUrl { .. })));
    }
}
