//! Declarative shape of a draft payload.
//!
//! `DRAFT_SCHEMA` is the single source for both halves of the completion contract:
//! `describe()` renders the skeleton embedded in the system prompt and `validate()`
//! checks what comes back. Editing one without the other is not possible.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// A node in the schema tree.
#[derive(Debug)]
pub enum Shape {
    /// A string with at least one non-whitespace character.
    Text { hint: &'static str },
    Object { fields: &'static [Field] },
    List {
        item: &'static Shape,
        min: usize,
        max: usize,
        hint: &'static str,
    },
}

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
}

const RESULT_ENTRY: Shape = Shape::Object {
    fields: &[
        Field {
            name: "metric",
            shape: Shape::Text {
                hint: "The key result, e.g., '40% Increase' or '50 Hours Saved'.",
            },
        },
        Field {
            name: "description",
            shape: Shape::Text {
                hint: "A short sentence explaining the result.",
            },
        },
    ],
};

pub const DRAFT_SCHEMA: Shape = Shape::Object {
    fields: &[
        Field {
            name: "headline",
            shape: Shape::Text {
                hint: "A compelling, attention-grabbing headline for the case study.",
            },
        },
        Field {
            name: "customer",
            shape: Shape::Object {
                fields: &[
                    Field {
                        name: "name",
                        shape: Shape::Text {
                            hint: "The name of the customer or company.",
                        },
                    },
                    Field {
                        name: "description",
                        shape: Shape::Text {
                            hint: "A brief, one-sentence description of the customer.",
                        },
                    },
                ],
            },
        },
        Field {
            name: "challenge",
            shape: Shape::Text {
                hint: "A 2-3 sentence paragraph describing the main problem the customer was facing.",
            },
        },
        Field {
            name: "solution",
            shape: Shape::Text {
                hint: "A 2-3 sentence paragraph explaining how the product/service solved the challenge.",
            },
        },
        Field {
            name: "results",
            shape: Shape::List {
                item: &RESULT_ENTRY,
                min: 1,
                max: 3,
                hint: "A list of 1 to 3 key, quantifiable results.",
            },
        },
        Field {
            name: "quote",
            shape: Shape::Text {
                hint: "A powerful, impactful quote from the customer found within the transcript.",
            },
        },
    ],
};

// ────────────────────────────────────────────────────────────────────────────
// Violations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Problem {
    Missing,
    WrongType { expected: &'static str },
    Empty,
    TooFew { min: usize, actual: usize },
    TooMany { max: usize, actual: usize },
    Malformed { message: String },
}

/// One schema violation. `field` is a dotted path such as `results.1.metric`;
/// the empty string denotes the document root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub field: String,
    #[serde(flatten)]
    pub problem: Problem,
}

impl Violation {
    pub fn malformed(message: String) -> Self {
        Self {
            field: String::new(),
            problem: Problem::Malformed { message },
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = if self.field.is_empty() {
            "<root>"
        } else {
            self.field.as_str()
        };
        match &self.problem {
            Problem::Missing => write!(f, "{field}: required field is missing"),
            Problem::WrongType { expected } => write!(f, "{field}: expected {expected}"),
            Problem::Empty => write!(f, "{field}: must not be empty"),
            Problem::TooFew { min, actual } => {
                write!(f, "{field}: expected at least {min} entries, got {actual}")
            }
            Problem::TooMany { max, actual } => {
                write!(f, "{field}: expected at most {max} entries, got {actual}")
            }
            Problem::Malformed { message } => write!(f, "{field}: {message}"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

/// Validates `value` against `shape`, collecting every violation rather than
/// stopping at the first. Keys not named by the schema are ignored.
pub fn validate(shape: &Shape, value: &Value) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();
    check(shape, value, "", &mut violations);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check(shape: &Shape, value: &Value, path: &str, out: &mut Vec<Violation>) {
    let mut report = |problem| {
        out.push(Violation {
            field: path.to_string(),
            problem,
        })
    };

    match shape {
        Shape::Text { .. } => match value {
            Value::String(s) if s.trim().is_empty() => report(Problem::Empty),
            Value::String(_) => {}
            _ => report(Problem::WrongType { expected: "text" }),
        },
        Shape::Object { fields } => {
            let Some(map) = value.as_object() else {
                report(Problem::WrongType { expected: "object" });
                return;
            };
            for field in fields.iter() {
                let child = join(path, field.name);
                match map.get(field.name) {
                    None | Some(Value::Null) => out.push(Violation {
                        field: child,
                        problem: Problem::Missing,
                    }),
                    Some(v) => check(&field.shape, v, &child, out),
                }
            }
        }
        Shape::List { item, min, max, .. } => {
            let Some(items) = value.as_array() else {
                report(Problem::WrongType { expected: "list" });
                return;
            };
            if items.len() < *min {
                report(Problem::TooFew {
                    min: *min,
                    actual: items.len(),
                });
            } else if items.len() > *max {
                report(Problem::TooMany {
                    max: *max,
                    actual: items.len(),
                });
            }
            for (i, v) in items.iter().enumerate() {
                check(item, v, &join(path, &i.to_string()), out);
            }
        }
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt rendering
// ────────────────────────────────────────────────────────────────────────────

/// Renders the expected JSON skeleton: every text leaf carries its hint, every
/// list carries one sample item.
pub fn describe(shape: &Shape) -> Value {
    match shape {
        Shape::Text { hint } => Value::String((*hint).to_string()),
        Shape::Object { fields } => {
            let mut map = Map::new();
            for field in fields.iter() {
                map.insert(field.name.to_string(), describe(&field.shape));
            }
            Value::Object(map)
        }
        Shape::List { item, .. } => Value::Array(vec![describe(item)]),
    }
}

/// Hard constraints that the skeleton alone cannot express, one line each.
pub fn rules(shape: &Shape) -> Vec<String> {
    let mut lines = vec!["Every text field is required and must not be empty.".to_string()];
    collect_rules(shape, "", &mut lines);
    lines
}

fn collect_rules(shape: &Shape, path: &str, out: &mut Vec<String>) {
    match shape {
        Shape::Text { .. } => {}
        Shape::Object { fields } => {
            for field in fields.iter() {
                collect_rules(&field.shape, &join(path, field.name), out);
            }
        }
        Shape::List {
            item,
            min,
            max,
            hint,
        } => {
            out.push(format!(
                "`{path}` must contain between {min} and {max} entries. {hint}"
            ));
            collect_rules(item, &join(path, "N"), out);
        }
    }
}
