use std::fmt::{self, Debug, Formatter};
use std::path::Path;

use image::ImageFormat;
use log::debug;

use crate::error::WorkflowError;
use crate::result::Result;

pub const IMAGE_MIME_PREFIX: &str = "image/";
pub const PEM_MIME: &str = "application/x-pem-file";
const FALLBACK_MIME: &str = "application/octet-stream";

/// A file chosen by the user for one slot of a workflow.
///
/// It has no identity beyond being the current value of its slot, a new
/// selection replaces it wholesale.
#[derive(Clone, Eq, PartialEq)]
pub struct SelectedFile {
    name: String,
    mime: String,
    data: Vec<u8>,
}

impl Debug for SelectedFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.data.len())
            .finish()
    }
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data,
        }
    }

    /// Reads a file from disk, the MIME type is sniffed from the content
    /// and falls back to the file extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| WorkflowError::ReadError { source })?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let mime = sniff_image_mime(&data)
            .unwrap_or_else(|| mime_from_extension(path))
            .to_string();
        debug!("read {} ({}, {} bytes)", name, mime, data.len());

        Ok(Self::new(name, mime, data))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Splits into `(name, mime, data)`.
    pub fn into_parts(self) -> (String, String, Vec<u8>) {
        (self.name, self.mime, self.data)
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with(IMAGE_MIME_PREFIX)
    }
}

/// The declared type filter of an ingestion point.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum MimeFilter {
    #[default]
    AnyImage,
    Any,
    Exact(String),
}

impl MimeFilter {
    pub fn accepts(&self, mime: &str) -> bool {
        match self {
            MimeFilter::AnyImage => mime.starts_with(IMAGE_MIME_PREFIX),
            MimeFilter::Any => true,
            MimeFilter::Exact(expected) => expected.eq_ignore_ascii_case(mime),
        }
    }
}

fn sniff_image_mime(data: &[u8]) -> Option<&'static str> {
    match image::guess_format(data).ok()? {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Tiff => Some("image/tiff"),
        _ => None,
    }
}

pub(crate) fn mime_from_extension(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| match e.to_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            "pem" | "key" => PEM_MIME,
            "txt" => "text/plain",
            _ => FALLBACK_MIME,
        })
        .unwrap_or(FALLBACK_MIME)
}
