use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use pvc_policy::{
    bridge, ClaimSpec, ClaimStatus, ObjectMeta, Policy, StorageClass, Value, VolumeClaim,
    VolumeStats, DEFAULT_COST_LIMIT, DEFAULT_POLICY,
};

const GIB: i64 = 1 << 30;

fn claim(threshold: Option<&str>, phase: &str) -> VolumeClaim {
    let mut annotations: BTreeMap<String, String> =
        [("resize/storage_limit".to_owned(), "100Gi".to_owned())].into();
    if let Some(t) = threshold {
        annotations.insert("resize/threshold".to_owned(), t.to_owned());
    }
    VolumeClaim {
        metadata: ObjectMeta {
            name: "pvc-a".into(),
            annotations,
        },
        spec: ClaimSpec {
            storage_class_name: Some("standard".into()),
            volume_mode: Some("Filesystem".into()),
        },
        status: ClaimStatus {
            phase: Some(phase.into()),
            capacity: [("storage".to_owned(), "10Gi".to_owned())].into(),
        },
    }
}

fn class(enabled: bool) -> StorageClass {
    StorageClass {
        metadata: ObjectMeta {
            name: "standard".into(),
            annotations: if enabled {
                [("resize/enabled".to_owned(), "true".to_owned())].into()
            } else {
                BTreeMap::new()
            },
        },
    }
}

fn stats() -> VolumeStats {
    VolumeStats {
        available_bytes: GIB,
        capacity_bytes: 10 * GIB,
        available_inode_size: 1000,
        capacity_inode_size: 2000,
    }
}

type Outcome = (Option<(i64, u64)>, Option<String>);

fn outcome(policy: &Policy, claim: &VolumeClaim, class: &StorageClass) -> Outcome {
    match policy.evaluate(&bridge::bind(claim, class, &stats())) {
        Ok(out) => match out.value {
            Value::Int(v) => (Some((v, out.cost)), None),
            _ => (None, None),
        },
        Err(err) => (None, err.deny_reason().map(str::to_owned)),
    }
}

#[test]
fn evaluate_across_threads() {
    let env = bridge::policy_env(DEFAULT_COST_LIMIT).unwrap();
    let policy = Arc::new(Policy::compile(DEFAULT_POLICY, env).unwrap());

    let scenarios: Vec<(VolumeClaim, StorageClass)> = vec![
        (claim(None, "Bound"), class(true)),
        (claim(Some("50%"), "Bound"), class(true)),
        (claim(Some("1Gi"), "Bound"), class(true)),
        (claim(None, "Bound"), class(false)),
        (claim(None, "Pending"), class(true)),
    ];

    // Single-threaded baseline, including the consumed cost.
    let baseline: Vec<Outcome> = scenarios
        .iter()
        .map(|(c, sc)| outcome(&policy, c, sc))
        .collect();
    assert_eq!(baseline[0].0.map(|(v, _)| v), Some(GIB));
    assert_eq!(baseline[1].0.map(|(v, _)| v), Some(5 * GIB));
    assert_eq!(baseline[2].0.map(|(v, _)| v), Some(GIB));
    assert_eq!(
        baseline[3].1.as_deref(),
        Some("resize is not enabled for the StorageClass")
    );
    assert_eq!(baseline[4].1.as_deref(), Some("PVC's phase should be Bound"));

    // Same compiled policy shared across threads, two rounds per scenario,
    // each thread owning its own bindings.
    let mut handles = vec![];
    for _ in 0..2 {
        for (c, sc) in &scenarios {
            let policy = Arc::clone(&policy);
            let (c, sc) = (c.clone(), sc.clone());
            handles.push(thread::spawn(move || outcome(&policy, &c, &sc)));
        }
    }

    let results: Vec<Outcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result, &baseline[i % scenarios.len()], "scenario {i}");
    }
}
