//! The remote service as seen by the workflows.
//!
//! A [`Transport`] exchanges one request for one [`ServiceResponse`]. A
//! non-2xx answer is still a response, only a failed exchange is a
//! [`TransportError`].

pub mod contract;
mod form;
mod http;
mod options;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use form::{FormValue, MultipartForm};
pub use http::HttpTransport;
pub use options::*;

/// The service routes used by this client.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Endpoint {
    Embed,
    Recover,
    RecoverRsa,
    GenerateKeys,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Embed => "/api/embed",
            Endpoint::Recover => "/api/recover",
            Endpoint::RecoverRsa => "/api/recover-rsa",
            Endpoint::GenerateKeys => "/api/generate-keys",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ServiceResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    /// Represents a failed HTTP exchange, e.g. connection refused or timeout
    #[error("HTTP exchange failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents any other failure to deliver a request
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_multipart(
        &self,
        endpoint: Endpoint,
        form: MultipartForm,
    ) -> Result<ServiceResponse, TransportError>;

    /// `path` is either absolute or relative to the service base URL.
    async fn get(&self, path: &str) -> Result<ServiceResponse, TransportError>;
}
