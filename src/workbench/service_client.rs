//! Client for the external conversion service.
//!
//! The service speaks JSON over HTTP: `POST /convert` and `POST /validate`,
//! both taking a [`ConversionRequest`]. This module only issues the calls and
//! decodes the structured responses; the translation itself happens remotely.

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use std::time::Duration;

use super::error::{ClientError, ClientResult};
use super::request::{
    ConversionOutcome, ConversionRequest, ValidationOutcome, decode_convert, decode_validate,
};

/// Stateless request/response contract to the conversion service.
///
/// `Err` is reserved for transport-level failures. Failures the service itself
/// reports come back as `Ok(ConversionOutcome::Failure)` or
/// `Ok(ValidationOutcome::Invalid)`.
pub trait ConversionService: Send + Sync + 'static {
    /// Convert source text to DAX
    fn convert(&self, request: ConversionRequest) -> BoxFuture<'_, ClientResult<ConversionOutcome>>;

    /// Validate source text without converting it
    fn validate(&self, request: ConversionRequest) -> BoxFuture<'_, ClientResult<ValidationOutcome>>;
}

/// HTTP implementation of [`ConversionService`].
#[derive(Debug, Clone)]
pub struct HttpConversionClient {
    base_url: String,
    http: Client,
}

impl HttpConversionClient {
    /// Create a client for the service rooted at `base_url`.
    ///
    /// Without a timeout a hung call stays pending until the transport gives up.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidEndpoint(base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.to_string(),
            http: builder.build()?,
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, path: &str, request: &ConversionRequest) -> ClientResult<Vec<u8>> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(request).send().await?;

        // Failures arrive as JSON bodies too; only an undecodable body is an error.
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, %status, "conversion service returned non-success status");
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl ConversionService for HttpConversionClient {
    fn convert(&self, request: ConversionRequest) -> BoxFuture<'_, ClientResult<ConversionOutcome>> {
        async move {
            let body = self.post("/convert", &request).await?;
            decode_convert(&body)
        }
        .boxed()
    }

    fn validate(&self, request: ConversionRequest) -> BoxFuture<'_, ClientResult<ValidationOutcome>> {
        async move {
            let body = self.post("/validate", &request).await?;
            decode_validate(&body)
        }
        .boxed()
    }
}
