use std::fmt;

/// Terminal outcome of the decision loop for one claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The policy permits resizing. Carries the byte threshold at which
    /// resizing should trigger and the evaluation cost actually consumed.
    Threshold { value: i64, cost: u64 },
    /// The policy explicitly denied the claim, with its reason.
    Denied { reason: String },
    /// Evaluation failed; the claim contributes no threshold.
    Failed { detail: String },
    /// The claim was not evaluated because its storage class or usage stats
    /// could not be resolved.
    Skipped { reason: String },
}

/// A claim name paired with the decision reached for it. Produced once per
/// claim per run; consumed immediately by reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimDecision {
    pub claim: String,
    pub decision: Decision,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Threshold { value, cost } => write!(f, "threshold={value}, cost={cost}"),
            Decision::Denied { reason } => write!(f, "denied: {reason}"),
            Decision::Failed { detail } => write!(f, "error: {detail}"),
            Decision::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

impl fmt::Display for ClaimDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.claim, self.decision)
    }
}
