use serde::{Deserialize, Serialize};

use crate::draft::schema::{self, Violation, DRAFT_SCHEMA};

/// The structured case-study content extracted from a transcript.
///
/// Only ever attached to a case after `validate()` passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPayload {
    pub headline: String,
    pub customer: Customer,
    pub challenge: String,
    pub solution: String,
    pub results: Vec<ResultEntry>,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub description: String,
}

/// One headline outcome, e.g. "40% Reduction" / "in design approval times."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub metric: String,
    pub description: String,
}

impl DraftPayload {
    /// Checks the payload against `DRAFT_SCHEMA`, the same schema the completion
    /// output is held to.
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        schema::validate(&DRAFT_SCHEMA, &value)
    }

    /// Validates a raw JSON value and converts it into a typed payload.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, Vec<Violation>> {
        schema::validate(&DRAFT_SCHEMA, value)?;
        serde_json::from_value(value.clone()).map_err(|e| vec![Violation::malformed(e.to_string())])
    }
}
