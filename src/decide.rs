//! The per-claim decision loop: resolve the claim's storage class and usage
//! stats, evaluate the policy, classify the outcome, and report it.

use std::collections::HashMap;

use log::{info, warn};

use crate::bridge;
use crate::types::{
    ClaimDecision, Decision, EvalError, Policy, StorageClass, Value, VolumeClaim, VolumeStats,
};

/// Run the policy over every claim and return one decision per claim, in
/// input order. A failure on one claim never affects another.
pub fn run(
    policy: &Policy,
    claims: &[VolumeClaim],
    classes: &[StorageClass],
    stats: &HashMap<String, VolumeStats>,
) -> Vec<ClaimDecision> {
    let by_name: HashMap<&str, &StorageClass> = classes
        .iter()
        .map(|class| (class.metadata.name.as_str(), class))
        .collect();

    claims
        .iter()
        .map(|claim| {
            let decision = decide(policy, claim, &by_name, stats);
            report(&claim.metadata.name, &decision);
            ClaimDecision {
                claim: claim.metadata.name.clone(),
                decision,
            }
        })
        .collect()
}

fn decide(
    policy: &Policy,
    claim: &VolumeClaim,
    classes: &HashMap<&str, &StorageClass>,
    stats: &HashMap<String, VolumeStats>,
) -> Decision {
    let class_name = claim.spec.storage_class_name.as_deref().unwrap_or("");
    let Some(class) = classes.get(class_name) else {
        return Decision::Skipped {
            reason: format!("StorageClass '{class_name}' not found"),
        };
    };
    let Some(volume_stats) = stats.get(&claim.metadata.name) else {
        return Decision::Skipped {
            reason: "VolumeStats not found".to_owned(),
        };
    };

    let bindings = bridge::bind(claim, class, volume_stats);
    match policy.evaluate(&bindings) {
        Ok(out) => match out.value {
            Value::Int(value) => Decision::Threshold {
                value,
                cost: out.cost,
            },
            other => Decision::Failed {
                detail: format!("unexpected result type {}", other.kind_name()),
            },
        },
        Err(EvalError::Deny(reason)) => Decision::Denied { reason },
        Err(err) => Decision::Failed {
            detail: err.to_string(),
        },
    }
}

fn report(claim: &str, decision: &Decision) {
    match decision {
        Decision::Threshold { value, cost } => {
            info!("{claim}: resize permitted, threshold={value}, cost={cost}");
        }
        Decision::Denied { reason } => {
            info!("{claim}: resize denied: {reason}");
        }
        Decision::Failed { detail } => {
            warn!("{claim}: policy evaluation failed: {detail}");
        }
        Decision::Skipped { reason } => {
            warn!("{claim}: skipped: {reason}");
        }
    }
}
