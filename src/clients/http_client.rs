//! HTTP client for Flair API communication.
//!
//! This module provides the [`HttpClient`] type, the transport underneath
//! [`FlairClient`](crate::FlairClient). It resolves paths against the API
//! root, attaches JSON:API and bearer headers, and decodes responses.

use std::collections::HashMap;

use crate::clients::errors::{ApiError, HttpError};
use crate::clients::http_request::{DataType, HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{ApiRootUrl, FlairConfig};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Media type every request accepts.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// HTTP client for making requests to the Flair API.
///
/// The client handles:
/// - Resolving relative paths and server links against the API root
/// - Default headers including User-Agent and the JSON:API `Accept` type
/// - The `Authorization: Bearer` header when a request carries a token
/// - Turning responses with status >= 400 into [`ApiError`]
///
/// There is no retry logic; a failed call surfaces immediately.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// The URL every path is resolved against.
    api_root: ApiRootUrl,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given configuration.
    ///
    /// The configured timeout is applied to every request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(config: &FlairConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Flair API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), JSON_API_MEDIA_TYPE.to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            api_root: config.api_root().clone(),
            default_headers,
        })
    }

    /// Returns the API root this client resolves paths against.
    #[must_use]
    pub const fn api_root(&self) -> &ApiRootUrl {
        &self.api_root
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request to the API.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The path cannot be resolved into a URL (`InvalidUrl`)
    /// - A network or timeout error occurs (`Network`)
    /// - The server answers with status >= 400 (`Api`)
    /// - A success body is not valid JSON (`Json`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self
            .api_root
            .join(&request.path)
            .ok_or_else(|| HttpError::InvalidUrl {
                url: request.path.clone(),
            })?;

        let mut headers = self.default_headers.clone();
        if let Some(body_type) = request.body_type {
            if body_type != DataType::Form {
                headers.insert(
                    "Content-Type".to_string(),
                    body_type.as_content_type().to_string(),
                );
            }
        }
        if let Some(token) = &request.bearer_token {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(url.clone()),
            HttpMethod::Post => self.client.post(url.clone()),
            HttpMethod::Patch => self.client.patch(url.clone()),
            HttpMethod::Delete => self.client.delete(url.clone()),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }

        if let Some(body) = &request.body {
            req_builder = match request.body_type {
                Some(DataType::Form) => req_builder.form(body),
                _ => req_builder.body(body.to_string()),
            };
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let body_text = res.text().await?;

        tracing::debug!(
            method = %request.http_method,
            url = %url,
            status = code,
            "Flair API request completed"
        );

        if code >= 400 {
            return Err(HttpError::Api(ApiError::new(code, body_text)));
        }

        let body = if body_text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body_text)?
        };

        Ok(HttpResponse::new(code, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientId, ClientSecret};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(root: &str) -> FlairConfig {
        FlairConfig::builder()
            .client_id(ClientId::new("client_id").unwrap())
            .client_secret(ClientSecret::new("client_secret").unwrap())
            .api_root(ApiRootUrl::new(root).unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&config_for("http://example.com")).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert!(user_agent.contains("Flair API Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_accept_header_is_json_api() {
        let client = HttpClient::new(&config_for("http://example.com")).unwrap();

        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&JSON_API_MEDIA_TYPE.to_string())
        );
    }

    #[tokio::test]
    async fn test_request_sends_bearer_and_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/structures/1"))
            .and(header("Authorization", "Bearer token"))
            .and(header("Content-Type", "application/vnd.api+json"))
            .and(header("Accept", "application/vnd.api+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config_for(&server.uri())).unwrap();
        let request = HttpRequest::builder(HttpMethod::Patch, "/api/structures/1")
            .body(json!({"data": {"type": "structures", "id": "1"}}))
            .body_type(DataType::JsonApi)
            .bearer_token("token")
            .build()
            .unwrap();

        let response = client.request(request).await.unwrap();
        assert_eq!(response.code, 200);
        assert_eq!(response.body, json!({"data": null}));
    }

    #[tokio::test]
    async fn test_form_body_is_url_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config_for(&server.uri())).unwrap();
        let request = HttpRequest::builder(HttpMethod::Post, "/oauth/token")
            .body(json!({"grant_type": "client_credentials"}))
            .body_type(DataType::Form)
            .build()
            .unwrap();

        assert!(client.request(request).await.is_ok());
    }

    #[tokio::test]
    async fn test_error_status_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/structures/9"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"errors":[{"title":"Not Found"}]}"#),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(&config_for(&server.uri())).unwrap();
        let request = HttpRequest::builder(HttpMethod::Get, "/api/structures/9")
            .build()
            .unwrap();

        match client.request(request).await {
            Err(HttpError::Api(e)) => {
                assert_eq!(e.status, 404);
                assert_eq!(e.error_titles(), vec!["Not Found"]);
            }
            other => panic!("Expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_content_yields_null_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/structures/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = HttpClient::new(&config_for(&server.uri())).unwrap();
        let request = HttpRequest::builder(HttpMethod::Delete, "/api/structures/1")
            .build()
            .unwrap();

        let response = client.request(request).await.unwrap();
        assert_eq!(response.code, 204);
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = HttpClient::new(&config_for(&server.uri())).unwrap();
        let request = HttpRequest::builder(HttpMethod::Get, "/api/").build().unwrap();

        assert!(matches!(client.request(request).await, Err(HttpError::Json(_))));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
