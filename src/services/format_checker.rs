use rand::Rng;

use crate::database::models::{DocumentRecord, FormatStatus};

/// Issues reported when a document fails the format check.
pub const DEFAULT_ISSUES: [&str; 3] = [
    "Incorrect heading format",
    "Missing country flag in header",
    "Citation style inconsistent",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCheckOutcome {
    pub status: FormatStatus,
    pub issues: Option<Vec<String>>,
}

impl FormatCheckOutcome {
    pub fn valid() -> Self {
        Self {
            status: FormatStatus::Valid,
            issues: None,
        }
    }

    pub fn with_issues() -> Self {
        Self {
            status: FormatStatus::Issues,
            issues: Some(DEFAULT_ISSUES.iter().map(|s| s.to_string()).collect()),
        }
    }
}

/// Decides the format-check result for a document.
pub trait FormatChecker: Send + Sync {
    fn check(&self, document: &DocumentRecord) -> FormatCheckOutcome;
}

/// Mock checker: valid or not with equal probability, ignoring the content.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFormatChecker;

impl FormatChecker for RandomFormatChecker {
    fn check(&self, _document: &DocumentRecord) -> FormatCheckOutcome {
        if rand::thread_rng().gen_bool(0.5) {
            FormatCheckOutcome::valid()
        } else {
            FormatCheckOutcome::with_issues()
        }
    }
}

/// Always returns the same outcome. Lets tests pin the result.
#[derive(Debug, Clone)]
pub struct FixedFormatChecker(pub FormatCheckOutcome);

impl FormatChecker for FixedFormatChecker {
    fn check(&self, _document: &DocumentRecord) -> FormatCheckOutcome {
        self.0.clone()
    }
}
