// SPDX-License-Identifier: MIT
//! Document metadata carried in the `.cub` envelope

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::format::{DEFAULT_ENCODING, DEFAULT_VERSION, UNTITLED_TITLE};

/// String-keyed document metadata
///
/// Every field is optional; absent keys are left out of the serialized form so
/// they come back absent. Unrecognized string keys are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    /// Creation timestamp (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    /// Last save timestamp (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordered tags; `Some(vec![])` and `None` are kept distinct
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Any other string-valued keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Current time in the timestamp format used by metadata
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

impl DocumentMetadata {
    /// Empty metadata (no keys)
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata the codec attaches when the caller supplies none
    ///
    /// Built fresh on every call.
    pub fn generated() -> Self {
        let now = timestamp_now();
        Self {
            encoding: Some(DEFAULT_ENCODING.to_string()),
            created: Some(now.clone()),
            modified: Some(now),
            version: Some(DEFAULT_VERSION.to_string()),
            ..Default::default()
        }
    }

    /// Metadata for a freshly created, unsaved document
    pub fn untitled() -> Self {
        let now = timestamp_now();
        Self {
            title: Some(UNTITLED_TITLE.to_string()),
            author: Some(String::new()),
            created: Some(now.clone()),
            modified: Some(now),
            version: Some(DEFAULT_VERSION.to_string()),
            ..Default::default()
        }
    }

    /// Builder-style title setter
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder-style author setter
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder-style tags setter
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set `modified` to the current time
    pub fn touch(&mut self) {
        self.modified = Some(timestamp_now());
    }

    /// Replace tags from a comma-separated list, dropping blank entries
    pub fn set_tags_from_csv(&mut self, csv: &str) {
        self.tags = Some(parse_tags(csv));
    }

    /// Tags joined with `", "` (empty when absent)
    pub fn tags_csv(&self) -> String {
        self.tags.as_deref().unwrap_or_default().join(", ")
    }

    /// Look up any key, recognized or extra
    pub fn get(&self, key: &str) -> Option<&str> {
        let field = match key {
            "encoding" => &self.encoding,
            "created" => &self.created,
            "modified" => &self.modified,
            "version" => &self.version,
            "title" => &self.title,
            "author" => &self.author,
            "description" => &self.description,
            _ => return self.extra.get(key).map(String::as_str),
        };
        field.as_deref()
    }

    /// Compact JSON bytes for the envelope
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Parse metadata from envelope bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Split a comma-separated tag list, trimming each entry
pub fn parse_tags(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
