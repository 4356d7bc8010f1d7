//! Error types for taskrank.

use crate::task::TaskId;
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Result type alias for taskrank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which record an error or warning is about.
///
/// Records are named by id when they have one, otherwise by their position
/// in the input batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRef {
    /// A record with an id.
    Id(TaskId),
    /// A record without a usable id, by zero-based position.
    Index(usize),
}

impl TaskRef {
    pub(crate) fn new(id: Option<&TaskId>, index: usize) -> Self {
        id.map_or(Self::Index(index), |id| Self::Id(id.clone()))
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "task {id}"),
            Self::Index(index) => write!(f, "task at index {index}"),
        }
    }
}

/// Fatal problems found while validating raw task records.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum ValidationError {
    /// A value had the wrong JSON type.
    #[error("Expected {expected} for {subject}, found {found}")]
    #[diagnostic(
        code(taskrank::validate::type_mismatch),
        help("Tasks are submitted as a JSON array of objects")
    )]
    TypeMismatch {
        /// What was being read
        subject: String,
        /// The expected shape
        expected: &'static str,
        /// The JSON type actually found
        found: &'static str,
    },

    /// A required field was absent.
    #[error("Missing required field '{field}' in {task}")]
    #[diagnostic(
        code(taskrank::validate::missing_field),
        help("Every task needs title, estimated_hours and dependencies")
    )]
    MissingField {
        /// The missing field
        field: &'static str,
        /// The record missing it
        task: TaskRef,
    },

    /// Two records share an id.
    #[error("Duplicate task id {id} at index {index}")]
    #[diagnostic(code(taskrank::validate::duplicate_id))]
    DuplicateId {
        /// The repeated id
        id: TaskId,
        /// Position of the second occurrence
        index: usize,
    },

    /// The title was missing content.
    #[error("Invalid title for {task}: must be a non-empty string")]
    #[diagnostic(code(taskrank::validate::invalid_title))]
    InvalidTitle {
        /// The offending record
        task: TaskRef,
    },

    /// The effort estimate was not a positive integer.
    #[error("Invalid estimated_hours {value} for {task}: must be a positive integer")]
    #[diagnostic(code(taskrank::validate::invalid_hours))]
    InvalidHours {
        /// The offending record
        task: TaskRef,
        /// The raw value
        value: String,
    },

    /// The importance was not an integer from 1 to 10.
    #[error("Invalid importance {value} for {task}: must be an integer from 1 to 10")]
    #[diagnostic(code(taskrank::validate::invalid_importance))]
    InvalidImportance {
        /// The offending record
        task: TaskRef,
        /// The raw value
        value: String,
    },

    /// The due date could not be parsed.
    #[error("Invalid due_date {value} for {task}")]
    #[diagnostic(
        code(taskrank::validate::invalid_due_date),
        help("Dates use the zero-padded YYYY-MM-DD format, e.g. 2025-03-14")
    )]
    InvalidDueDate {
        /// The offending record
        task: TaskRef,
        /// The raw value
        value: String,
    },

    /// The dependencies field was not a list of ids.
    #[error("Invalid dependencies for {task}: {detail}")]
    #[diagnostic(
        code(taskrank::validate::invalid_dependency_list),
        help("Dependencies are a list of task ids, e.g. [1, 2]")
    )]
    InvalidDependencyList {
        /// The offending record
        task: TaskRef,
        /// What was wrong with the list
        detail: String,
    },

    /// A task listed itself as a dependency.
    #[error("Task {task} cannot depend on itself")]
    #[diagnostic(code(taskrank::validate::self_dependency))]
    SelfDependency {
        /// The offending task
        task: TaskId,
    },

    /// A dependency named a task missing from the batch.
    #[error("{task} depends on unknown task {dependency}")]
    #[diagnostic(
        code(taskrank::validate::unknown_dependency),
        help("Dependencies must reference tasks in the same batch")
    )]
    UnknownDependency {
        /// The task holding the reference
        task: TaskRef,
        /// The id that does not exist
        dependency: TaskId,
    },
}

/// A fatal validation error together with the warnings raised before it.
///
/// Validation stops at the first fatal problem; `warnings` holds what the
/// records preceding it produced, in order.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct ValidationFailure {
    /// The error that stopped validation
    pub error: ValidationError,
    /// Warnings raised before the error
    pub warnings: Vec<String>,
}

impl ValidationFailure {
    /// The kind tag of the underlying error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl From<ValidationError> for ValidationFailure {
    fn from(error: ValidationError) -> Self {
        Self {
            error,
            warnings: Vec::new(),
        }
    }
}

impl Diagnostic for ValidationFailure {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.error.code()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.error.help()
    }
}

/// Errors that can occur while ranking tasks.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Raw records failed validation.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationFailure),

    /// The dependency graph contains a cycle.
    #[error("Dependency cycle detected: {}", render_path(.path))]
    #[diagnostic(
        code(taskrank::graph::cycle),
        help("Remove one of the dependencies along the cycle")
    )]
    CycleDetected {
        /// Ids along the cycle; the first id repeats at the end
        path: Vec<TaskId>,
    },

    /// A strategy name did not match any known profile.
    #[error("Unknown strategy '{name}'")]
    #[diagnostic(
        code(taskrank::profile::unknown_strategy),
        help("Available strategies: smart, fastest, impact, deadline")
    )]
    UnknownStrategy {
        /// The name that was requested
        name: String,
    },

    /// A weight profile does not form a valid distribution.
    #[error("Invalid weights for strategy '{strategy}': {message}")]
    #[diagnostic(
        code(taskrank::profile::invalid_weights),
        help("Each weight must lie between 0 and 1 and the four must sum to 1.0")
    )]
    InvalidWeights {
        /// The strategy being configured
        strategy: String,
        /// What is wrong with the weights
        message: String,
    },

    /// Wrapped TOML parsing error.
    #[error("Configuration parse error: {0}")]
    #[diagnostic(code(taskrank::config::toml_parse))]
    TomlParse(#[from] toml::de::Error),
}

/// Fieldless tag for each error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ValidationError::TypeMismatch`].
    TypeMismatch,
    /// See [`ValidationError::MissingField`].
    MissingField,
    /// See [`ValidationError::DuplicateId`].
    DuplicateId,
    /// See [`ValidationError::InvalidTitle`].
    InvalidTitle,
    /// See [`ValidationError::InvalidHours`].
    InvalidHours,
    /// See [`ValidationError::InvalidImportance`].
    InvalidImportance,
    /// See [`ValidationError::InvalidDueDate`].
    InvalidDueDate,
    /// See [`ValidationError::InvalidDependencyList`].
    InvalidDependencyList,
    /// See [`ValidationError::SelfDependency`].
    SelfDependency,
    /// See [`ValidationError::UnknownDependency`].
    UnknownDependency,
    /// See [`Error::CycleDetected`].
    CycleDetected,
    /// See [`Error::UnknownStrategy`].
    UnknownStrategy,
    /// See [`Error::InvalidWeights`] and [`Error::TomlParse`].
    Config,
}

impl ValidationError {
    /// The kind tag of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::DuplicateId { .. } => ErrorKind::DuplicateId,
            Self::InvalidTitle { .. } => ErrorKind::InvalidTitle,
            Self::InvalidHours { .. } => ErrorKind::InvalidHours,
            Self::InvalidImportance { .. } => ErrorKind::InvalidImportance,
            Self::InvalidDueDate { .. } => ErrorKind::InvalidDueDate,
            Self::InvalidDependencyList { .. } => ErrorKind::InvalidDependencyList,
            Self::SelfDependency { .. } => ErrorKind::SelfDependency,
            Self::UnknownDependency { .. } => ErrorKind::UnknownDependency,
        }
    }
}

impl Error {
    /// The kind tag of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(failure) => failure.kind(),
            Self::CycleDetected { .. } => ErrorKind::CycleDetected,
            Self::UnknownStrategy { .. } => ErrorKind::UnknownStrategy,
            Self::InvalidWeights { .. } | Self::TomlParse(_) => ErrorKind::Config,
        }
    }

    /// Warnings raised before a validation failure; empty for other errors.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Validation(failure) => &failure.warnings,
            _ => &[],
        }
    }

    /// Create a new unknown strategy error.
    #[must_use]
    pub fn unknown_strategy(name: impl Into<String>) -> Self {
        Self::UnknownStrategy { name: name.into() }
    }

    /// Create a new invalid weights error.
    #[must_use]
    pub fn invalid_weights(strategy: impl fmt::Display, message: impl Into<String>) -> Self {
        Self::InvalidWeights {
            strategy: strategy.to_string(),
            message: message.into(),
        }
    }
}

impl From<ValidationError> for Error {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error.into())
    }
}

impl From<taskrank_graph::Error<TaskId>> for Error {
    fn from(error: taskrank_graph::Error<TaskId>) -> Self {
        match error {
            taskrank_graph::Error::CycleDetected { path } => Self::CycleDetected { path },
        }
    }
}

fn render_path(path: &[TaskId]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
