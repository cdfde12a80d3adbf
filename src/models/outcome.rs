use serde::Serialize;

/// Result of one deletion step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeletionOutcome {
    Succeeded { deleted: Option<u64> },
    SkippedNotFound,
    /// Step did not apply (e.g. no federated grant to revoke)
    NotApplicable,
    Failed { reason: String },
}

impl DeletionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, DeletionOutcome::Failed { .. })
    }
}

/// Outcome tagged with the step it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: String,
    pub outcome: DeletionOutcome,
}

impl StepOutcome {
    pub fn new(step: impl Into<String>, outcome: DeletionOutcome) -> Self {
        Self {
            step: step.into(),
            outcome,
        }
    }
}

/// Everything that happened while deleting one account
///
/// Only logged. Callers never see partial-success detail.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeletionReport {
    pub user_id: String,
    pub collections: Vec<StepOutcome>,
    pub revocation: Option<StepOutcome>,
    pub identity: Option<StepOutcome>,
}

impl DeletionReport {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn failed_collections(&self) -> usize {
        self.collections
            .iter()
            .filter(|s| s.outcome.is_failure())
            .count()
    }

    pub fn skipped_collections(&self) -> usize {
        self.collections
            .iter()
            .filter(|s| s.outcome == DeletionOutcome::SkippedNotFound)
            .count()
    }

    /// True once the identity record is gone
    pub fn identity_deleted(&self) -> bool {
        matches!(
            self.identity.as_ref().map(|s| &s.outcome),
            Some(DeletionOutcome::Succeeded { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = DeletionReport::new("u1");
        report.collections = vec![
            StepOutcome::new("a", DeletionOutcome::Succeeded { deleted: Some(2) }),
            StepOutcome::new("b", DeletionOutcome::SkippedNotFound),
            StepOutcome::new(
                "c",
                DeletionOutcome::Failed {
                    reason: "timeout".to_string(),
                },
            ),
        ];

        assert_eq!(report.failed_collections(), 1);
        assert_eq!(report.skipped_collections(), 1);
        assert!(!report.identity_deleted());

        report.identity = Some(StepOutcome::new(
            "identity",
            DeletionOutcome::Succeeded { deleted: None },
        ));
        assert!(report.identity_deleted());
    }
}
