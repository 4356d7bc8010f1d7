//! Core types and operations for taskrank
//!
//! Ranking a batch of tasks runs through four stages:
//!
//! 1. [`validate`]: raw JSON records become strict [`Task`] values plus
//!    warnings
//! 2. [`build_graph`]: tasks become a "depends on" [`TaskGraph`]
//! 3. [`TaskGraph::detect_cycle`]: cyclic batches are rejected with the
//!    offending path
//! 4. [`score`]: every task gets sub-scores, a weighted composite and a
//!    depth, and the batch is ordered so blockers come first
//!
//! [`analyze`] chains all four; [`suggest`] picks the tasks that can be
//! started right away.

pub mod analyze;
pub mod config;
pub mod error;
pub mod profile;
pub mod score;
pub mod task;
pub mod validate;

pub use analyze::{AnalyzeOptions, Analysis, analyze, build_graph, suggest, task_records};
pub use config::Config;
pub use error::{Error, ErrorKind, Result, TaskRef, ValidationError, ValidationFailure};
pub use profile::{Profile, Profiles, Strategy, Weights};
pub use score::{Indicator, ScoredTask, Scorer, SubScores, score};
pub use task::{DEFAULT_IMPORTANCE, Task, TaskId};
pub use taskrank_graph::TaskGraph;
pub use validate::{Validated, Validator, validate};
