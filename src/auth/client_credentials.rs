//! OAuth 2.0 Client Credentials Grant.
//!
//! The Flair API authenticates server-to-server integrations by exchanging
//! an OAuth client id and secret for a bearer token:
//!
//! ```text
//! POST /oauth/token
//! client_id=...&client_secret=...&grant_type=client_credentials
//! ```
//!
//! The response carries `access_token` and `expires_in`. A rejected credential
//! (401) surfaces as [`HttpError::Api`].

use serde::Serialize;

use crate::auth::token::{AccessToken, AccessTokenResponse};
use crate::clients::{DataType, HttpClient, HttpError, HttpMethod, HttpRequest};
use crate::config::FlairConfig;

/// Path of the token endpoint, relative to the API root.
pub const TOKEN_PATH: &str = "/oauth/token";

/// Grant type for client credentials.
const CLIENT_CREDENTIALS_GRANT_TYPE: &str = "client_credentials";

/// Form fields for the client credentials exchange.
#[derive(Debug, Serialize)]
struct ClientCredentialsRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
}

/// Exchanges the configured client credentials for an access token.
///
/// # Errors
///
/// - [`HttpError::Api`] if the token endpoint rejects the credentials
/// - [`HttpError::Json`] if the response has no `access_token`
/// - [`HttpError::Network`] on transport failures
///
/// # Example
///
/// ```rust,ignore
/// let http = HttpClient::new(&config)?;
/// let token = exchange_client_credentials(&http, &config).await?;
/// println!("expires in {:?}s", token.expires_in());
/// ```
pub async fn exchange_client_credentials(
    http: &HttpClient,
    config: &FlairConfig,
) -> Result<AccessToken, HttpError> {
    let form = ClientCredentialsRequest {
        client_id: config.client_id().as_ref(),
        client_secret: config.client_secret().as_ref(),
        grant_type: CLIENT_CREDENTIALS_GRANT_TYPE,
    };

    let request = HttpRequest::builder(HttpMethod::Post, TOKEN_PATH)
        .body(serde_json::to_value(&form)?)
        .body_type(DataType::Form)
        .build()?;

    let response = http.request(request).await?;
    let token_response: AccessTokenResponse = serde_json::from_value(response.body)?;
    let token = AccessToken::from_response(token_response);

    tracing::info!(
        expires_in = ?token.expires_in(),
        "Obtained Flair API access token"
    );

    Ok(token)
}

// Verify types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientCredentialsRequest<'_>>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiRootUrl, ClientId, ClientSecret};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(root: &str) -> FlairConfig {
        FlairConfig::builder()
            .client_id(ClientId::new("client_id").unwrap())
            .client_secret(ClientSecret::new("client_secret").unwrap())
            .api_root(ApiRootUrl::new(root).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_request_body_contains_correct_grant_type() {
        let request = ClientCredentialsRequest {
            client_id: "test-client-id",
            client_secret: "test-client-secret",
            grant_type: CLIENT_CREDENTIALS_GRANT_TYPE,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"grant_type\":\"client_credentials\""));
        assert!(json.contains("\"client_id\":\"test-client-id\""));
        assert!(json.contains("\"client_secret\":\"test-client-secret\""));
    }

    #[tokio::test]
    async fn test_successful_exchange_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("client_id=client_id"))
            .and(body_string_contains("client_secret=client_secret"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "token",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server.uri());
        let http = HttpClient::new(&config).unwrap();
        let token = exchange_client_credentials(&http, &config).await.unwrap();

        assert_eq!(token.secret(), "token");
        assert_eq!(token.expires_in(), Some(3600));
        assert!(!token.expired());
    }

    #[tokio::test]
    async fn test_rejected_credentials_map_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_client"})),
            )
            .mount(&server)
            .await;

        let config = config_for(&server.uri());
        let http = HttpClient::new(&config).unwrap();
        let result = exchange_client_credentials(&http, &config).await;

        match result {
            Err(HttpError::Api(e)) => {
                assert!(e.is_unauthorized());
                assert_eq!(e.json, Some(json!({"error": "invalid_client"})));
            }
            other => panic!("Expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_response_without_token_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"expires_in": 3600})))
            .mount(&server)
            .await;

        let config = config_for(&server.uri());
        let http = HttpClient::new(&config).unwrap();
        let result = exchange_client_credentials(&http, &config).await;

        assert!(matches!(result, Err(HttpError::Json(_))));
    }
}
