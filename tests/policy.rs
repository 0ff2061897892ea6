//! End-to-end runs of the default resize policy over claim fixtures.

use std::collections::HashMap;

use pvc_policy::{
    bridge, decide, snapshot, ClaimSpec, ClaimStatus, Decision, ObjectMeta, Policy, StorageClass,
    VolumeClaim, VolumeStats, DEFAULT_COST_LIMIT, DEFAULT_POLICY,
};

const GIB: i64 = 1 << 30;

fn default_policy() -> Policy {
    let env = bridge::policy_env(DEFAULT_COST_LIMIT).unwrap();
    Policy::compile(DEFAULT_POLICY, env).unwrap()
}

struct Fixture {
    claims: Vec<VolumeClaim>,
    classes: Vec<StorageClass>,
    stats: HashMap<String, VolumeStats>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            claims: Vec::new(),
            classes: vec![StorageClass {
                metadata: ObjectMeta {
                    name: "standard".into(),
                    annotations: [("resize/enabled".to_owned(), "true".to_owned())].into(),
                },
            }],
            stats: HashMap::new(),
        }
    }

    fn claim(mut self, name: &str, annotations: &[(&str, &str)]) -> Self {
        let mut meta_annotations: std::collections::BTreeMap<String, String> = annotations
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        meta_annotations
            .entry("resize/storage_limit".to_owned())
            .or_insert_with(|| "100Gi".to_owned());
        self.claims.push(VolumeClaim {
            metadata: ObjectMeta {
                name: name.into(),
                annotations: meta_annotations,
            },
            spec: ClaimSpec {
                storage_class_name: Some("standard".into()),
                volume_mode: Some("Filesystem".into()),
            },
            status: ClaimStatus {
                phase: Some("Bound".into()),
                capacity: [("storage".to_owned(), "10Gi".to_owned())].into(),
            },
        });
        self.stats.insert(
            name.to_owned(),
            VolumeStats {
                available_bytes: GIB,
                capacity_bytes: 10 * GIB,
                available_inode_size: 1000,
                capacity_inode_size: 2000,
            },
        );
        self
    }

    fn run(&self) -> Vec<Decision> {
        decide::run(&default_policy(), &self.claims, &self.classes, &self.stats)
            .into_iter()
            .map(|d| d.decision)
            .collect()
    }

    fn run_one(&self) -> Decision {
        let mut decisions = self.run();
        assert_eq!(decisions.len(), 1);
        decisions.remove(0)
    }
}

#[test]
fn default_threshold_is_ten_percent_of_capacity() {
    let decision = Fixture::new().claim("pvc-a", &[]).run_one();
    assert!(matches!(
        decision,
        Decision::Threshold { value, .. } if value == GIB
    ));
}

#[test]
fn empty_threshold_annotation_falls_back_to_default() {
    let decision = Fixture::new()
        .claim("pvc-a", &[("resize/threshold", "")])
        .run_one();
    assert!(matches!(
        decision,
        Decision::Threshold { value, .. } if value == GIB
    ));
}

#[test]
fn percentage_threshold_formula() {
    // 50% of a 10Gi volume resolves to exactly 5Gi worth of bytes.
    let decision = Fixture::new()
        .claim("pvc-a", &[("resize/threshold", "50%")])
        .run_one();
    assert!(matches!(
        decision,
        Decision::Threshold { value, .. } if value == 5 * GIB
    ));
}

#[test]
fn absolute_quantity_threshold() {
    let decision = Fixture::new()
        .claim("pvc-a", &[("resize/threshold", "1Gi")])
        .run_one();
    assert!(matches!(
        decision,
        Decision::Threshold { value, .. } if value == GIB
    ));
}

#[test]
fn reported_cost_is_positive_and_below_ceiling() {
    let decision = Fixture::new().claim("pvc-a", &[]).run_one();
    match decision {
        Decision::Threshold { cost, .. } => {
            assert!(cost > 0);
            assert!(cost < DEFAULT_COST_LIMIT);
        }
        other => panic!("expected threshold, got {other:?}"),
    }
}

#[test]
fn denies_when_class_resize_disabled() {
    let mut fixture = Fixture::new().claim("pvc-a", &[]);
    fixture.classes[0].metadata.annotations.clear();
    let decision = fixture.run_one();
    assert!(matches!(
        decision,
        Decision::Denied { reason } if reason == "resize is not enabled for the StorageClass"
    ));
}

#[test]
fn disabled_class_reason_unchanged_by_later_failures() {
    // Guard 1 already fails; also breaking the phase must not change the
    // reported reason.
    let mut fixture = Fixture::new().claim("pvc-a", &[]);
    fixture.classes[0].metadata.annotations.clear();
    fixture.claims[0].status.phase = Some("Pending".into());
    let decision = fixture.run_one();
    assert!(matches!(
        decision,
        Decision::Denied { reason } if reason == "resize is not enabled for the StorageClass"
    ));
}

#[test]
fn denies_missing_storage_limit() {
    let mut fixture = Fixture::new().claim("pvc-a", &[]);
    fixture.claims[0].metadata.annotations.remove("resize/storage_limit");
    let decision = fixture.run_one();
    assert!(matches!(
        decision,
        Decision::Denied { reason }
            if reason == "PVC must have a nonzero storage limit annotation"
    ));
}

#[test]
fn denies_zero_storage_limit() {
    let decision = Fixture::new()
        .claim("pvc-a", &[("resize/storage_limit", "0")])
        .run_one();
    assert!(matches!(
        decision,
        Decision::Denied { reason }
            if reason == "PVC must have a nonzero storage limit annotation"
    ));
}

#[test]
fn denies_non_filesystem_volume_mode() {
    let mut fixture = Fixture::new().claim("pvc-a", &[]);
    fixture.claims[0].spec.volume_mode = Some("Block".into());
    let decision = fixture.run_one();
    assert!(matches!(
        decision,
        Decision::Denied { reason } if reason == "PVC's volumeMode should be Filesystem"
    ));
}

#[test]
fn unset_volume_mode_passes_the_guard() {
    let mut fixture = Fixture::new().claim("pvc-a", &[]);
    fixture.claims[0].spec.volume_mode = None;
    let decision = fixture.run_one();
    assert!(matches!(decision, Decision::Threshold { .. }));
}

#[test]
fn denies_unbound_phase() {
    let mut fixture = Fixture::new().claim("pvc-a", &[]);
    fixture.claims[0].status.phase = Some("Pending".into());
    let decision = fixture.run_one();
    assert!(matches!(
        decision,
        Decision::Denied { reason } if reason == "PVC's phase should be Bound"
    ));
}

#[test]
fn denies_missing_capacity() {
    let mut fixture = Fixture::new().claim("pvc-a", &[]);
    fixture.claims[0].status.capacity.clear();
    let decision = fixture.run_one();
    assert!(matches!(
        decision,
        Decision::Denied { reason }
            if reason == "PVC must report a nonzero storage capacity"
    ));
}

#[test]
fn first_violated_guard_wins() {
    // Both the volume mode and the phase are wrong; the guard chain reports
    // the earlier violation.
    let mut fixture = Fixture::new().claim("pvc-a", &[]);
    fixture.claims[0].spec.volume_mode = Some("Block".into());
    fixture.claims[0].status.phase = Some("Pending".into());
    let decision = fixture.run_one();
    assert!(matches!(
        decision,
        Decision::Denied { reason } if reason == "PVC's volumeMode should be Filesystem"
    ));
}

#[test]
fn denial_surfaces_through_direct_evaluation() {
    let policy = default_policy();
    let fixture = Fixture::new().claim("pvc-a", &[]);
    let full = policy
        .evaluate(&bridge::bind(
            &fixture.claims[0],
            &fixture.classes[0],
            &fixture.stats["pvc-a"],
        ))
        .unwrap();

    let mut disabled = Fixture::new().claim("pvc-a", &[]);
    disabled.classes[0].metadata.annotations.clear();
    let err = policy
        .evaluate(&bridge::bind(
            &disabled.claims[0],
            &disabled.classes[0],
            &disabled.stats["pvc-a"],
        ))
        .unwrap_err();
    assert_eq!(
        err.deny_reason(),
        Some("resize is not enabled for the StorageClass")
    );
    assert!(full.cost > 0);
}

#[test]
fn unknown_class_and_missing_stats_skip() {
    let mut fixture = Fixture::new().claim("pvc-a", &[]).claim("pvc-b", &[]);
    fixture.claims[0].spec.storage_class_name = Some("premium".into());
    fixture.stats.remove("pvc-b");
    let decisions = fixture.run();
    assert!(matches!(
        &decisions[0],
        Decision::Skipped { reason } if reason == "StorageClass 'premium' not found"
    ));
    assert!(matches!(
        &decisions[1],
        Decision::Skipped { reason } if reason == "VolumeStats not found"
    ));
}

#[test]
fn one_bad_claim_does_not_poison_the_batch() {
    let mut fixture = Fixture::new().claim("pvc-bad", &[]).claim("pvc-good", &[]);
    fixture.claims[0].status.capacity =
        [("storage".to_owned(), "garbage".to_owned())].into();
    let decisions = fixture.run();
    assert!(matches!(&decisions[0], Decision::Failed { .. }));
    assert!(matches!(&decisions[1], Decision::Threshold { .. }));
}

#[test]
fn repeated_runs_agree() {
    let fixture = Fixture::new()
        .claim("pvc-a", &[("resize/threshold", "20%")])
        .claim("pvc-b", &[]);
    assert_eq!(fixture.run(), fixture.run());
}

#[test]
fn snapshot_files_drive_the_loop() {
    let claims = snapshot::parse_claims(
        r#"{"items": [{
            "metadata": {
                "name": "pvc-a",
                "annotations": {"resize/storage_limit": "100Gi", "resize/threshold": "30%"}
            },
            "spec": {"storageClassName": "standard", "volumeMode": "Filesystem"},
            "status": {"phase": "Bound", "capacity": {"storage": "10Gi"}}
        }]}"#,
    )
    .unwrap();
    let classes = snapshot::parse_classes(
        r#"{"items": [{
            "metadata": {"name": "standard", "annotations": {"resize/enabled": "true"}}
        }]}"#,
    )
    .unwrap();
    let stats = snapshot::parse_stats(&format!(
        r#"{{"pvc-a": {{
            "availableBytes": {},
            "capacityBytes": {},
            "availableInodeSize": 0,
            "capacityInodeSize": 0
        }}}}"#,
        GIB,
        10 * GIB
    ))
    .unwrap();

    let decisions = decide::run(&default_policy(), &claims, &classes, &stats);
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].claim, "pvc-a");
    assert!(matches!(
        decisions[0].decision,
        Decision::Threshold { value, .. } if value == 3 * GIB
    ));
}
