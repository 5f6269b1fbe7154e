//! # Form decoding
//!
//! Turns a request body into a flat key/value mapping. Keys are whatever the
//! landing page sent; a key posted twice keeps its last value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The body encodings a submission may arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEncoding {
    UrlEncoded,
    Multipart,
}

impl FormEncoding {
    /// Classifies a `Content-Type` header value, ignoring parameters and case.
    ///
    /// Only the segment before the first `;` is compared, so whitespace
    /// ahead of the parameters is accepted. Returns `None` for anything that
    /// is not a form encoding.
    pub fn from_content_type(raw: &str) -> Option<Self> {
        let essence = raw.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(mime::APPLICATION_WWW_FORM_URLENCODED.essence_str()) {
            Some(FormEncoding::UrlEncoded)
        } else if essence.eq_ignore_ascii_case(mime::MULTIPART_FORM_DATA.essence_str()) {
            Some(FormEncoding::Multipart)
        } else {
            None
        }
    }
}

/// Decoded form fields, kept verbatim for the audit column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `application/x-www-form-urlencoded` bytes (`&` pairs, `+` as
    /// space, percent escapes). An empty body yields no fields.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        url::form_urlencoded::parse(body).into_owned().collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw value as posted.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Trimmed value, or `None` when the key is missing or blank.
    pub fn trimmed(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Walks `keys` in order and returns the first trimmed, non-blank value.
    pub fn first_non_empty<S: AsRef<str>>(&self, keys: &[S]) -> Option<&str> {
        keys.iter().find_map(|key| self.trimmed(key.as_ref()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
