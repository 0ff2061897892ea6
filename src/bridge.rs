//! Bridge between the host resource structs and the expression environment.
//!
//! Object schemas here mirror the serde layout of [`VolumeClaim`],
//! [`StorageClass`], and [`VolumeStats`] field for field, so expressions
//! address host data by the same names that appear in the serialized form.

use std::collections::BTreeMap;

use crate::types::{
    Bindings, CompileError, Env, FunctionDecl, Kind, ObjectSchema, StorageClass, Value,
    VolumeClaim, VolumeStats,
};
use crate::types::{deny, quantity_as_integer};

/// Variable name the claim under evaluation is bound to.
pub const CLAIM_VAR: &str = "pvc";
/// Variable name the claim's storage class is bound to.
pub const SC_VAR: &str = "sc";
/// Variable name the claim's volume usage stats are bound to.
pub const STATS_VAR: &str = "stats";

fn schemas() -> Vec<ObjectSchema> {
    vec![
        ObjectSchema::new("ObjectMeta")
            .field("name", Kind::String)
            .field("annotations", Kind::StringMap),
        ObjectSchema::new("ClaimSpec")
            .field("storageClassName", Kind::String)
            .field("volumeMode", Kind::String),
        ObjectSchema::new("ClaimStatus")
            .field("phase", Kind::String)
            .field("capacity", Kind::StringMap),
        ObjectSchema::new("PersistentVolumeClaim")
            .field("metadata", Kind::Object("ObjectMeta"))
            .field("spec", Kind::Object("ClaimSpec"))
            .field("status", Kind::Object("ClaimStatus")),
        ObjectSchema::new("StorageClass").field("metadata", Kind::Object("ObjectMeta")),
        ObjectSchema::new("VolumeStats")
            .field("availableBytes", Kind::Int)
            .field("capacityBytes", Kind::Int)
            .field("availableInodeSize", Kind::Int)
            .field("capacityInodeSize", Kind::Int),
    ]
}

/// Build the environment resize policies compile against: the three
/// resource variables, their schemas, and the policy-facing functions
/// `deny` and `quantityAsInteger` on top of the built-ins.
///
/// Neither policy function declares a cost estimate, so both charge the
/// conservative default per call.
///
/// # Errors
///
/// Returns [`CompileError`] if the schema set is internally inconsistent.
pub fn policy_env(cost_limit: u64) -> Result<Env, CompileError> {
    let mut builder = Env::builder()
        .variable(CLAIM_VAR, Kind::Object("PersistentVolumeClaim"))
        .variable(SC_VAR, Kind::Object("StorageClass"))
        .variable(STATS_VAR, Kind::Object("VolumeStats"))
        .function(FunctionDecl::function(
            "deny",
            vec![Kind::String],
            Kind::Int,
            deny,
        ))
        .function(FunctionDecl::function(
            "quantityAsInteger",
            vec![Kind::Quantity],
            Kind::Int,
            quantity_as_integer,
        ))
        .cost_limit(cost_limit);
    for schema in schemas() {
        builder = builder.object(schema);
    }
    builder.build()
}

fn meta_value(name: &str, annotations: &BTreeMap<String, String>) -> Value {
    Value::Object(
        [
            ("name".to_owned(), Value::from(name)),
            ("annotations".to_owned(), Value::Map(annotations.clone())),
        ]
        .into(),
    )
}

/// Bind a claim to its expression-visible object form. Unset optional
/// fields bind as empty strings so every schema field is always present.
pub fn claim_value(claim: &VolumeClaim) -> Value {
    let spec = Value::Object(
        [
            (
                "storageClassName".to_owned(),
                Value::from(claim.spec.storage_class_name.as_deref().unwrap_or("")),
            ),
            (
                "volumeMode".to_owned(),
                Value::from(claim.spec.volume_mode.as_deref().unwrap_or("")),
            ),
        ]
        .into(),
    );
    let status = Value::Object(
        [
            (
                "phase".to_owned(),
                Value::from(claim.status.phase.as_deref().unwrap_or("")),
            ),
            (
                "capacity".to_owned(),
                Value::Map(claim.status.capacity.clone()),
            ),
        ]
        .into(),
    );
    Value::Object(
        [
            (
                "metadata".to_owned(),
                meta_value(&claim.metadata.name, &claim.metadata.annotations),
            ),
            ("spec".to_owned(), spec),
            ("status".to_owned(), status),
        ]
        .into(),
    )
}

pub fn class_value(class: &StorageClass) -> Value {
    Value::Object(
        [(
            "metadata".to_owned(),
            meta_value(&class.metadata.name, &class.metadata.annotations),
        )]
        .into(),
    )
}

pub fn stats_value(stats: &VolumeStats) -> Value {
    Value::Object(
        [
            ("availableBytes".to_owned(), Value::Int(stats.available_bytes)),
            ("capacityBytes".to_owned(), Value::Int(stats.capacity_bytes)),
            (
                "availableInodeSize".to_owned(),
                Value::Int(stats.available_inode_size),
            ),
            (
                "capacityInodeSize".to_owned(),
                Value::Int(stats.capacity_inode_size),
            ),
        ]
        .into(),
    )
}

/// Bindings for one claim evaluation.
pub fn bind(claim: &VolumeClaim, class: &StorageClass, stats: &VolumeStats) -> Bindings {
    Bindings::new()
        .bind(CLAIM_VAR, claim_value(claim))
        .bind(SC_VAR, class_value(class))
        .bind(STATS_VAR, stats_value(stats))
}
