//! Snapshot edits on a draft: each edit takes a full draft and returns a new one,
//! re-validated, so the stored payload never holds a half-applied change.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::draft::model::DraftPayload;
use crate::draft::schema::Violation;

/// Address of one editable text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    Headline,
    CustomerName,
    CustomerDescription,
    Challenge,
    Solution,
    Quote,
    ResultMetric(usize),
    ResultDescription(usize),
}

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("unknown field path '{0}'")]
    UnknownField(String),

    #[error("results.{index} does not exist (draft has {len} results)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("edit would leave the draft invalid: {}", join_violations(.0))]
    Invalid(Vec<Violation>),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl FromStr for FieldPath {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || EditError::UnknownField(s.to_string());
        let segments: Vec<&str> = s.split('.').collect();

        match segments.as_slice() {
            ["headline"] => Ok(FieldPath::Headline),
            ["customer", "name"] => Ok(FieldPath::CustomerName),
            ["customer", "description"] => Ok(FieldPath::CustomerDescription),
            ["challenge"] => Ok(FieldPath::Challenge),
            ["solution"] => Ok(FieldPath::Solution),
            ["quote"] => Ok(FieldPath::Quote),
            ["results", index, leaf] => {
                let index: usize = index.parse().map_err(|_| unknown())?;
                match *leaf {
                    "metric" => Ok(FieldPath::ResultMetric(index)),
                    "description" => Ok(FieldPath::ResultDescription(index)),
                    _ => Err(unknown()),
                }
            }
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Headline => write!(f, "headline"),
            FieldPath::CustomerName => write!(f, "customer.name"),
            FieldPath::CustomerDescription => write!(f, "customer.description"),
            FieldPath::Challenge => write!(f, "challenge"),
            FieldPath::Solution => write!(f, "solution"),
            FieldPath::Quote => write!(f, "quote"),
            FieldPath::ResultMetric(i) => write!(f, "results.{i}.metric"),
            FieldPath::ResultDescription(i) => write!(f, "results.{i}.description"),
        }
    }
}

/// A single field edit as sent by the editing client.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldEdit {
    pub path: String,
    pub value: String,
}

/// Returns a new draft with `path` set to `value`. The input draft is untouched.
pub fn apply_edit(
    draft: &DraftPayload,
    path: FieldPath,
    value: String,
) -> Result<DraftPayload, EditError> {
    let mut next = draft.clone();

    match path {
        FieldPath::Headline => next.headline = value,
        FieldPath::CustomerName => next.customer.name = value,
        FieldPath::CustomerDescription => next.customer.description = value,
        FieldPath::Challenge => next.challenge = value,
        FieldPath::Solution => next.solution = value,
        FieldPath::Quote => next.quote = value,
        FieldPath::ResultMetric(i) => {
            check_index(&next, i)?;
            next.results[i].metric = value;
        }
        FieldPath::ResultDescription(i) => {
            check_index(&next, i)?;
            next.results[i].description = value;
        }
    }

    next.validate().map_err(EditError::Invalid)?;
    Ok(next)
}

fn check_index(draft: &DraftPayload, index: usize) -> Result<(), EditError> {
    let len = draft.results.len();
    if index < len {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange { index, len })
    }
}

/// Applies `edits` in order. All-or-nothing: the first failing edit aborts and
/// no partial result is returned.
pub fn apply_edits(draft: &DraftPayload, edits: &[FieldEdit]) -> Result<DraftPayload, EditError> {
    edits.iter().try_fold(draft.clone(), |current, edit| {
        let path: FieldPath = edit.path.parse()?;
        apply_edit(&current, path, edit.value.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::model::fixtures::draft_with_results;

    #[test]
    fn test_parse_all_paths() {
        assert_eq!("headline".parse::<FieldPath>().unwrap(), FieldPath::Headline);
        assert_eq!(
            "customer.description".parse::<FieldPath>().unwrap(),
            FieldPath::CustomerDescription
        );
        assert_eq!(
            "results.2.metric".parse::<FieldPath>().unwrap(),
            FieldPath::ResultMetric(2)
        );
        assert_eq!(
            "results.0.description".parse::<FieldPath>().unwrap(),
            FieldPath::ResultDescription(0)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_paths() {
        for bad in ["", "customer", "results.x.metric", "results.0.value", "title"] {
            assert!(
                matches!(bad.parse::<FieldPath>(), Err(EditError::UnknownField(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let path = FieldPath::ResultDescription(1);
        assert_eq!(path.to_string().parse::<FieldPath>().unwrap(), path);
    }

    #[test]
    fn test_apply_edit_returns_new_snapshot() {
        let original = draft_with_results(2);
        let edited = apply_edit(&original, FieldPath::CustomerName, "Globex".to_string()).unwrap();
        assert_eq!(edited.customer.name, "Globex");
        assert_eq!(original.customer.name, "Acme Corp");
        assert_eq!(edited.headline, original.headline);
    }

    #[test]
    fn test_apply_edit_on_result_entry() {
        let original = draft_with_results(3);
        let edited =
            apply_edit(&original, FieldPath::ResultMetric(2), "3x Throughput".to_string()).unwrap();
        assert_eq!(edited.results[2].metric, "3x Throughput");
        assert_eq!(edited.results[0], original.results[0]);
    }

    #[test]
    fn test_apply_edit_out_of_range_index() {
        let original = draft_with_results(1);
        let err = apply_edit(&original, FieldPath::ResultMetric(1), "x".to_string()).unwrap_err();
        assert_eq!(err, EditError::IndexOutOfRange { index: 1, len: 1 });
    }

    #[test]
    fn test_apply_edit_rejects_blank_value() {
        let original = draft_with_results(1);
        let err = apply_edit(&original, FieldPath::Headline, "   ".to_string()).unwrap_err();
        match err {
            EditError::Invalid(violations) => assert_eq!(violations[0].field, "headline"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_apply_edits_is_all_or_nothing() {
        let original = draft_with_results(2);
        let edits = vec![
            FieldEdit {
                path: "headline".to_string(),
                value: "New headline".to_string(),
            },
            FieldEdit {
                path: "results.5.metric".to_string(),
                value: "nope".to_string(),
            },
        ];
        assert!(apply_edits(&original, &edits).is_err());
    }

    #[test]
    fn test_apply_edits_in_order() {
        let original = draft_with_results(1);
        let edits = vec![
            FieldEdit {
                path: "quote".to_string(),
                value: "first".to_string(),
            },
            FieldEdit {
                path: "quote".to_string(),
                value: "second".to_string(),
            },
        ];
        let edited = apply_edits(&original, &edits).unwrap();
        assert_eq!(edited.quote, "second");
    }
}
