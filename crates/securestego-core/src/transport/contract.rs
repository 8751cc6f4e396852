//! Response bodies of the service endpoints.

use serde::Deserialize;

use crate::media::ImageRef;

/// `POST /api/embed`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedResponse {
    pub stego_image_url: Option<String>,
    pub stego_image: Option<String>,
    pub encrypted_key: Option<String>,
    pub email_error: Option<String>,
    pub message: Option<String>,
}

impl EmbedResponse {
    pub fn image(&self) -> Option<ImageRef> {
        prefer_url(&self.stego_image_url, &self.stego_image)
    }

    pub fn wrapped_key(&self) -> Option<String> {
        non_empty(&self.encrypted_key)
    }

    pub fn delivery_error(&self) -> Option<String> {
        non_empty(&self.email_error)
    }
}

/// `POST /api/recover` and `POST /api/recover-rsa`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoverResponse {
    pub recovered_image_url: Option<String>,
    pub recovered_image: Option<String>,
    pub message: Option<String>,
}

impl RecoverResponse {
    pub fn image(&self) -> Option<ImageRef> {
        prefer_url(&self.recovered_image_url, &self.recovered_image)
    }
}

/// `GET /api/generate-keys`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    pub private_key_pem: String,
    pub public_key_pem: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// The `error` field of a failure body, if there is a usable one.
pub fn error_message(body: &[u8]) -> Option<String> {
    let body: ErrorBody = serde_json::from_slice(body).ok()?;
    non_empty(&body.error)
}

// both forms may be present, the URL wins
fn prefer_url(url: &Option<String>, inline: &Option<String>) -> Option<ImageRef> {
    non_empty(url).or_else(|| non_empty(inline)).map(ImageRef::new)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
