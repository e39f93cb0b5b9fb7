//! Sensitive-field classification.
//!
//! Pattern-table classification of field names. The tables are injectable
//! configuration — downstream consumers supply their own when the defaults
//! don't fit — so the engine consumes, never computes, the classification.

use serde::{Deserialize, Serialize};

/// Sensitivity classification for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensitivityClass {
    Pii,
    Credentials,
    Financial,
    Health,
}

const CREDENTIAL_PATTERNS: &[&str] = &[
    "password", "secret", "token", "api_key", "auth", "credential",
];
const FINANCIAL_PATTERNS: &[&str] = &[
    "credit_card", "card_number", "cvv", "account_number", "salary", "income", "iban",
];
const HEALTH_PATTERNS: &[&str] = &[
    "diagnosis", "medical", "health", "prescription", "condition",
];
const PII_PATTERNS: &[&str] = &[
    "ssn", "social_security", "email", "phone", "address", "dob", "birth",
];

/// Classifies field names by substring pattern tables.
#[derive(Debug, Clone)]
pub struct SensitivityClassifier {
    credentials: Vec<String>,
    financial: Vec<String>,
    health: Vec<String>,
    pii: Vec<String>,
}

impl Default for SensitivityClassifier {
    fn default() -> Self {
        let to_owned = |patterns: &[&str]| patterns.iter().map(|p| p.to_string()).collect();
        Self {
            credentials: to_owned(CREDENTIAL_PATTERNS),
            financial: to_owned(FINANCIAL_PATTERNS),
            health: to_owned(HEALTH_PATTERNS),
            pii: to_owned(PII_PATTERNS),
        }
    }
}

impl SensitivityClassifier {
    /// Build a classifier from caller-supplied pattern tables.
    pub fn new(
        credentials: Vec<String>,
        financial: Vec<String>,
        health: Vec<String>,
        pii: Vec<String>,
    ) -> Self {
        Self {
            credentials,
            financial,
            health,
            pii,
        }
    }

    /// Classify a field name. Credential patterns take precedence, then
    /// financial, health, PII.
    pub fn classify(&self, field: &str) -> Option<SensitivityClass> {
        let lower = field.to_lowercase();
        if self.credentials.iter().any(|p| lower.contains(p.as_str())) {
            return Some(SensitivityClass::Credentials);
        }
        if self.financial.iter().any(|p| lower.contains(p.as_str())) {
            return Some(SensitivityClass::Financial);
        }
        if self.health.iter().any(|p| lower.contains(p.as_str())) {
            return Some(SensitivityClass::Health);
        }
        if self.pii.iter().any(|p| lower.contains(p.as_str())) {
            return Some(SensitivityClass::Pii);
        }
        None
    }
}
