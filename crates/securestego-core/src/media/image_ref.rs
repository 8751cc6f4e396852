use std::fmt::{self, Display, Formatter};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::WorkflowError;
use crate::media::SelectedFile;
use crate::result::Result;

const DATA_URI_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Display-only data URI derived from a [`SelectedFile`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Preview(String);

impl Preview {
    pub fn of(file: &SelectedFile) -> Self {
        Self(format!(
            "{DATA_URI_SCHEME}{}{BASE64_MARKER},{}",
            file.mime(),
            STANDARD.encode(file.data())
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Preview {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An image handed back by the service, either a URL or an inline data URI.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ImageRef(String);

/// Bytes of an inline image together with its declared type.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InlineImage {
    pub mime: String,
    pub data: Vec<u8>,
}

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn is_data_uri(&self) -> bool {
        self.0.starts_with(DATA_URI_SCHEME)
    }

    /// Decodes an inline data URI, `None` if this reference is a URL.
    pub fn inline(&self) -> Option<Result<InlineImage>> {
        self.is_data_uri().then(|| decode_data_uri(&self.0))
    }
}

impl Display for ImageRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn decode_data_uri(uri: &str) -> Result<InlineImage> {
    let rest = uri
        .strip_prefix(DATA_URI_SCHEME)
        .ok_or(WorkflowError::InvalidImageReference)?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or(WorkflowError::InvalidImageReference)?;

    let (mime, data) = match header.strip_suffix(BASE64_MARKER) {
        Some(mime) => (
            mime,
            STANDARD
                .decode(payload.trim())
                .map_err(|_| WorkflowError::InvalidImageReference)?,
        ),
        None => (header, payload.as_bytes().to_vec()),
    };

    Ok(InlineImage {
        mime: if mime.is_empty() {
            "text/plain".to_string()
        } else {
            mime.to_string()
        },
        data,
    })
}
