//! Loading of resource snapshots from JSON.
//!
//! Claims and storage classes arrive in list form (`{"items": [...]}`);
//! volume stats arrive as a map from claim name to its counters.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::PolicyError;
use crate::types::{StorageClass, VolumeClaim, VolumeStats};

#[derive(Debug, Deserialize)]
struct List<T> {
    items: Vec<T>,
}

/// Parse a claim list from its serialized form.
///
/// # Errors
///
/// Returns [`PolicyError::Json`] on malformed input.
pub fn parse_claims(json: &str) -> Result<Vec<VolumeClaim>, PolicyError> {
    let list: List<VolumeClaim> = serde_json::from_str(json)?;
    Ok(list.items)
}

/// Parse a storage class list from its serialized form.
///
/// # Errors
///
/// Returns [`PolicyError::Json`] on malformed input.
pub fn parse_classes(json: &str) -> Result<Vec<StorageClass>, PolicyError> {
    let list: List<StorageClass> = serde_json::from_str(json)?;
    Ok(list.items)
}

/// Parse per-claim volume stats, keyed by claim name.
///
/// # Errors
///
/// Returns [`PolicyError::Json`] on malformed input.
pub fn parse_stats(json: &str) -> Result<HashMap<String, VolumeStats>, PolicyError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_claims(path: &Path) -> Result<Vec<VolumeClaim>, PolicyError> {
    parse_claims(&fs::read_to_string(path)?)
}

pub fn load_classes(path: &Path) -> Result<Vec<StorageClass>, PolicyError> {
    parse_classes(&fs::read_to_string(path)?)
}

pub fn load_stats(path: &Path) -> Result<HashMap<String, VolumeStats>, PolicyError> {
    parse_stats(&fs::read_to_string(path)?)
}
