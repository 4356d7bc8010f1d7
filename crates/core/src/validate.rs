//! Validation and normalization of raw task records.
//!
//! Raw records arrive as JSON values. Validation stops at the first fatal
//! problem, scanning records in input order, and collects the non-fatal
//! warnings (defaulted importance, missing or past due date) found up to
//! that point. The warnings travel with the result on success and with the
//! [`ValidationFailure`] on error.

use crate::error::{TaskRef, ValidationError, ValidationFailure};
use crate::task::{DEFAULT_IMPORTANCE, Task, TaskId};
use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// Format accepted for `due_date`.
const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Byte positions of the separators in a zero-padded `YYYY-MM-DD` date.
const DUE_DATE_SEPARATORS: [usize; 2] = [4, 7];

/// Importance values accepted by validation.
const IMPORTANCE_RANGE: std::ops::RangeInclusive<u64> = 1..=10;

/// Fields every record must carry, in the order they are checked.
const REQUIRED_FIELDS: [&str; 3] = ["title", "estimated_hours", "dependencies"];

/// The normalized batch and the warnings raised while producing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validated {
    /// Normalized tasks, in input order
    pub tasks: Vec<Task>,
    /// Non-fatal findings, in the order they were raised
    pub warnings: Vec<String>,
}

/// Validates raw task records.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    id_required: bool,
    today: NaiveDate,
}

impl Validator {
    /// Create a validator that checks overdue dates against the local date.
    ///
    /// With `id_required`, every record needs an id and dependencies must
    /// reference ids from the same batch.
    #[must_use]
    pub fn new(id_required: bool) -> Self {
        Self {
            id_required,
            today: Local::now().date_naive(),
        }
    }

    /// Use an explicit current date for overdue checks.
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Validate and normalize a batch of raw records.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationFailure`] carrying the first
    /// [`ValidationError`] encountered and the warnings raised before it.
    /// Duplicate ids are checked across the whole batch before any record
    /// is normalized.
    #[instrument(skip_all, fields(id_required = self.id_required))]
    pub fn validate(&self, raw: &Value) -> Result<Validated, ValidationFailure> {
        let Value::Array(records) = raw else {
            return Err(ValidationError::TypeMismatch {
                subject: "task batch".to_string(),
                expected: "an array of task records",
                found: json_type(raw),
            }
            .into());
        };

        let known_ids = collect_ids(records)?;

        let mut validated = Validated::default();
        for (index, record) in records.iter().enumerate() {
            match self.normalize(index, record, &known_ids, &mut validated.warnings) {
                Ok(task) => validated.tasks.push(task),
                Err(error) => {
                    return Err(ValidationFailure {
                        error,
                        warnings: validated.warnings,
                    });
                }
            }
        }

        debug!(
            tasks = validated.tasks.len(),
            warnings = validated.warnings.len(),
            "Validated task batch"
        );
        Ok(validated)
    }

    fn normalize(
        &self,
        index: usize,
        record: &Value,
        known_ids: &HashSet<TaskId>,
        warnings: &mut Vec<String>,
    ) -> Result<Task, ValidationError> {
        let Value::Object(fields) = record else {
            return Err(ValidationError::TypeMismatch {
                subject: format!("record at index {index}"),
                expected: "an object",
                found: json_type(record),
            });
        };

        let id = self.read_id(index, fields)?;
        let task = TaskRef::new(id.as_ref(), index);

        for field in REQUIRED_FIELDS {
            if !fields.contains_key(field) {
                return Err(ValidationError::MissingField {
                    field,
                    task: task.clone(),
                });
            }
        }

        let title = read_title(&fields["title"], &task)?;
        let estimated_hours = read_hours(&fields["estimated_hours"], &task)?;
        let importance = read_importance(fields.get("importance"), &task, warnings)?;
        let due_date = self.read_due_date(fields.get("due_date"), &task, warnings)?;
        let dependencies = self.read_dependencies(
            &fields["dependencies"],
            id.as_ref(),
            &task,
            known_ids,
        )?;

        Ok(Task {
            id,
            title,
            due_date,
            estimated_hours,
            importance,
            dependencies,
        })
    }

    fn read_id(
        &self,
        index: usize,
        fields: &Map<String, Value>,
    ) -> Result<Option<TaskId>, ValidationError> {
        match fields.get("id") {
            None | Some(Value::Null) if self.id_required => Err(ValidationError::MissingField {
                field: "id",
                task: TaskRef::Index(index),
            }),
            None | Some(Value::Null) => Ok(None),
            Some(value) => TaskId::from_value(value).map(Some).ok_or_else(|| {
                ValidationError::TypeMismatch {
                    subject: format!("id of record at index {index}"),
                    expected: "a string or integer",
                    found: json_type(value),
                }
            }),
        }
    }

    fn read_due_date(
        &self,
        value: Option<&Value>,
        task: &TaskRef,
        warnings: &mut Vec<String>,
    ) -> Result<Option<NaiveDate>, ValidationError> {
        let raw = match value {
            None | Some(Value::Null) => {
                push_warning(warnings, format!("No due date provided for {task}"));
                return Ok(None);
            }
            Some(Value::String(raw)) => raw,
            Some(other) => {
                return Err(ValidationError::InvalidDueDate {
                    task: task.clone(),
                    value: other.to_string(),
                });
            }
        };

        let due_date = parse_due_date(raw).ok_or_else(|| ValidationError::InvalidDueDate {
            task: task.clone(),
            value: format!("'{raw}'"),
        })?;

        if due_date < self.today {
            push_warning(
                warnings,
                format!("Due date {due_date} for {task} is in the past (overdue)"),
            );
        }
        Ok(Some(due_date))
    }

    fn read_dependencies(
        &self,
        value: &Value,
        own_id: Option<&TaskId>,
        task: &TaskRef,
        known_ids: &HashSet<TaskId>,
    ) -> Result<Vec<TaskId>, ValidationError> {
        let Value::Array(entries) = value else {
            return Err(ValidationError::InvalidDependencyList {
                task: task.clone(),
                detail: format!("expected a list, found {}", json_type(value)),
            });
        };

        entries
            .iter()
            .map(|entry| {
                let dependency = TaskId::from_value(entry).ok_or_else(|| {
                    ValidationError::InvalidDependencyList {
                        task: task.clone(),
                        detail: format!("entry {entry} is not a task id"),
                    }
                })?;

                if self.id_required {
                    if own_id == Some(&dependency) {
                        return Err(ValidationError::SelfDependency { task: dependency });
                    }
                    if !known_ids.contains(&dependency) {
                        return Err(ValidationError::UnknownDependency {
                            task: task.clone(),
                            dependency,
                        });
                    }
                }
                Ok(dependency)
            })
            .collect()
    }
}

/// Validate `raw` against the local date.
///
/// # Errors
///
/// See [`Validator::validate`].
pub fn validate(raw: &Value, id_required: bool) -> Result<Validated, ValidationFailure> {
    Validator::new(id_required).validate(raw)
}

/// Gather every well-typed id in the batch, failing on the first repeat.
fn collect_ids(records: &[Value]) -> Result<HashSet<TaskId>, ValidationError> {
    let mut known = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        let Some(id) = record.get("id").and_then(TaskId::from_value) else {
            continue;
        };
        if known.contains(&id) {
            return Err(ValidationError::DuplicateId { id, index });
        }
        known.insert(id);
    }
    Ok(known)
}

/// Parse a strictly zero-padded `YYYY-MM-DD` date.
///
/// chrono alone also accepts unpadded fields such as `2025-6-1`.
fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let well_formed = raw.len() == 10
        && raw.bytes().enumerate().all(|(position, byte)| {
            if DUE_DATE_SEPARATORS.contains(&position) {
                byte == b'-'
            } else {
                byte.is_ascii_digit()
            }
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT).ok()
}

fn read_title(value: &Value, task: &TaskRef) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ValidationError::InvalidTitle { task: task.clone() })
}

fn read_hours(value: &Value, task: &TaskRef) -> Result<u64, ValidationError> {
    value
        .as_u64()
        .filter(|hours| *hours > 0)
        .ok_or_else(|| ValidationError::InvalidHours {
            task: task.clone(),
            value: value.to_string(),
        })
}

fn read_importance(
    value: Option<&Value>,
    task: &TaskRef,
    warnings: &mut Vec<String>,
) -> Result<u8, ValidationError> {
    match value {
        None | Some(Value::Null) => {
            push_warning(
                warnings,
                format!("Importance not provided for {task}, defaulting to {DEFAULT_IMPORTANCE}"),
            );
            Ok(DEFAULT_IMPORTANCE)
        }
        Some(value) => value
            .as_u64()
            .filter(|importance| IMPORTANCE_RANGE.contains(importance))
            .and_then(|importance| u8::try_from(importance).ok())
            .ok_or_else(|| ValidationError::InvalidImportance {
                task: task.clone(),
                value: value.to_string(),
            }),
    }
}

fn push_warning(warnings: &mut Vec<String>, message: String) {
    warn!("{message}");
    warnings.push(message);
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
