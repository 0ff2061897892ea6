use std::path::Path;
use std::process::ExitCode;

use pvc_policy::{bridge, decide, snapshot, Policy, PolicyError, DEFAULT_COST_LIMIT, DEFAULT_POLICY};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (claims, classes, stats, policy) = match args.as_slice() {
        [claims, classes, stats] => (claims, classes, stats, None),
        [claims, classes, stats, policy] => (claims, classes, stats, Some(policy)),
        _ => {
            eprintln!("usage: pvc-policy <claims.json> <classes.json> <stats.json> [policy.cel]");
            return ExitCode::FAILURE;
        }
    };

    match run(claims, classes, stats, policy.map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pvc-policy: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    claims_path: &str,
    classes_path: &str,
    stats_path: &str,
    policy_path: Option<&str>,
) -> Result<(), PolicyError> {
    let source = match policy_path {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_POLICY.to_owned(),
    };
    let env = bridge::policy_env(DEFAULT_COST_LIMIT)?;
    let policy = Policy::compile(&source, env)?;

    let claims = snapshot::load_claims(Path::new(claims_path))?;
    let classes = snapshot::load_classes(Path::new(classes_path))?;
    let stats = snapshot::load_stats(Path::new(stats_path))?;

    for decision in decide::run(&policy, &claims, &classes, &stats) {
        println!("{decision}");
    }
    Ok(())
}
