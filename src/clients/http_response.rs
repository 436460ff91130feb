//! HTTP response types for the Flair API client.

/// An HTTP response from the API.
///
/// Error responses never reach this type: the [`HttpClient`](crate::clients::HttpClient)
/// turns them into [`ApiError`](crate::clients::ApiError) first.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// The parsed response body, or `Null` when the body was empty.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(code: u16, body: serde_json::Value) -> Self {
        Self { code, body }
    }

    /// Returns `true` if the server sent no body (204 and friends).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_null()
    }
}
