//! Decoded release metadata.
//!
//! Decoding is deliberately permissive: the payload goes through
//! `serde_json::Value` and each field is pulled out with an explicit
//! absence rule, so registry metadata can evolve without breaking the
//! check. Only `tag_name` is required.

use serde_json::Value;

use crate::error::{Result, UpdateError};

/// One downloadable file attached to a release. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub name: String,
    pub download_url: String,
    /// Size in bytes. Absent is valid and distinct from zero.
    pub size: Option<u64>,
}

impl Asset {
    /// Returns `None` when the entry lacks a name or download URL;
    /// such entries are skipped, not fatal.
    fn from_json(value: &Value) -> Option<Self> {
        let name = value.get("name")?.as_str()?.to_string();
        let download_url = value.get("browser_download_url")?.as_str()?.to_string();
        let size = value.get("size").and_then(Value::as_u64);

        Some(Self {
            name,
            download_url,
            size,
        })
    }
}

/// Release metadata for a single check. Transient; created fresh per
/// check and discarded once the caller consumes the result.
#[derive(Debug, Clone)]
pub struct ReleaseRecord {
    pub tag_name: String,
    pub body: Option<String>,
    pub published_at: Option<String>,
    pub assets: Vec<Asset>,
    /// HTTP status the record was decoded from.
    pub status: u16,
}

impl ReleaseRecord {
    pub fn from_json(value: &Value, status: u16) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            UpdateError::InvalidResponse("release payload is not a JSON object".to_string())
        })?;

        let tag_name = object
            .get("tag_name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                UpdateError::InvalidResponse("release payload has no tag_name".to_string())
            })?
            .to_string();

        let body = object.get("body").and_then(Value::as_str).map(String::from);
        let published_at = object
            .get("published_at")
            .and_then(Value::as_str)
            .map(String::from);
        let assets = object
            .get("assets")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(Asset::from_json).collect())
            .unwrap_or_default();

        Ok(Self {
            tag_name,
            body,
            published_at,
            assets,
            status,
        })
    }
}
