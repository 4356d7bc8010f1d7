//! Normalized task records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use taskrank_graph::TaskNodeData;

/// Importance assigned when a record does not specify one.
pub const DEFAULT_IMPORTANCE: u8 = 5;

/// Identifier of a task within one batch.
///
/// Records may use either integers or strings; `1` and `"1"` are different
/// ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    /// Integer id.
    Int(i64),
    /// String id.
    Str(String),
}

impl TaskId {
    /// Read an id from a raw JSON value.
    ///
    /// Only integers that fit in `i64` and strings qualify; floats, booleans,
    /// arrays, objects and null do not.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

/// A validated task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique id within the batch. `None` only when ids were not required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Optional deadline.
    pub due_date: Option<NaiveDate>,
    /// Estimated effort in whole hours, at least 1.
    pub estimated_hours: u64,
    /// Importance from 1 to 10.
    pub importance: u8,
    /// Ids of the tasks that must finish first.
    pub dependencies: Vec<TaskId>,
}

impl Task {
    /// Whether the task waits on at least one other task.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

impl TaskNodeData for Task {
    type Id = TaskId;

    fn node_id(&self) -> Option<&TaskId> {
        self.id.as_ref()
    }

    fn dependency_ids(&self) -> &[TaskId] {
        &self.dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_id_from_value() {
        assert_eq!(TaskId::from_value(&json!(7)), Some(TaskId::Int(7)));
        assert_eq!(TaskId::from_value(&json!(-2)), Some(TaskId::Int(-2)));
        assert_eq!(TaskId::from_value(&json!("abc")), Some(TaskId::from("abc")));
        assert_eq!(TaskId::from_value(&json!(1.5)), None);
        assert_eq!(TaskId::from_value(&json!(true)), None);
        assert_eq!(TaskId::from_value(&json!(null)), None);
        assert_eq!(TaskId::from_value(&json!([1])), None);
    }

    #[test]
    fn test_int_and_string_ids_differ() {
        assert_ne!(TaskId::Int(1), TaskId::from("1"));
        assert_eq!(TaskId::Int(1).to_string(), TaskId::from("1").to_string());
    }

    #[test]
    fn test_task_id_serializes_untagged() {
        assert_eq!(serde_json::to_value(TaskId::Int(3)).unwrap(), json!(3));
        assert_eq!(serde_json::to_value(TaskId::from("x")).unwrap(), json!("x"));
    }

    #[test]
    fn test_blocked_means_any_dependency() {
        let mut task = Task {
            id: Some(TaskId::Int(1)),
            title: "Deploy".to_string(),
            due_date: None,
            estimated_hours: 1,
            importance: DEFAULT_IMPORTANCE,
            dependencies: vec![],
        };
        assert!(!task.is_blocked());

        task.dependencies.push(TaskId::Int(2));
        assert!(task.is_blocked());
    }
}
