use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A request for persistent storage capacity bound to a class and lifecycle
/// phase (a PersistentVolumeClaim).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeClaim {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ClaimSpec,
    #[serde(default)]
    pub status: ClaimStatus,
}

/// Identity and annotations shared by all resource types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSpec {
    #[serde(default)]
    pub storage_class_name: Option<String>,
    #[serde(default)]
    pub volume_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimStatus {
    #[serde(default)]
    pub phase: Option<String>,
    /// Bound capacity by resource name; values are quantity strings.
    #[serde(default)]
    pub capacity: BTreeMap<String, String>,
}

/// Named policy bucket governing resize behavior for the claims that
/// reference it. Shared across claims; resolved by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClass {
    pub metadata: ObjectMeta,
}

/// Runtime usage counters reported for one claim's volume.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeStats {
    pub available_bytes: i64,
    pub capacity_bytes: i64,
    pub available_inode_size: i64,
    pub capacity_inode_size: i64,
}
