use std::fmt::{self, Debug, Formatter};

use crate::media::SelectedFile;

#[derive(Clone, Eq, PartialEq)]
pub enum FormValue {
    Text(String),
    File(SelectedFile),
}

impl FormValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(t) => Some(t),
            FormValue::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&SelectedFile> {
        match self {
            FormValue::File(f) => Some(f),
            FormValue::Text(_) => None,
        }
    }
}

// text values may be passwords or keys
impl Debug for FormValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FormValue::Text(t) => write!(f, "Text({} chars)", t.chars().count()),
            FormValue::File(file) => write!(f, "File({:?})", file),
        }
    }
}

/// Ordered multipart body, independent of the HTTP client in use.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct MultipartForm {
    parts: Vec<(String, FormValue)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormValue::Text(value.into())));
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: SelectedFile) -> Self {
        self.parts.push((name.into(), FormValue::File(file)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.parts
            .iter()
            .find_map(|(n, value)| (n == name).then_some(value))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.parts.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn into_parts(self) -> Vec<(String, FormValue)> {
        self.parts
    }
}
