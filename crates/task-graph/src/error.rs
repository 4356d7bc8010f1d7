//! Error types for task graph operations.

use crate::NodeId;
use thiserror::Error;

/// Result type for task graph operations.
pub type Result<T, I> = std::result::Result<T, Error<I>>;

/// Errors that can occur during task graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error<I: NodeId> {
    /// A dependency cycle was detected in the graph.
    #[error("Cycle detected in task graph: {}", render_path(.path))]
    CycleDetected {
        /// Ids along the cycle in traversal order. The first id is repeated
        /// at the end to close the loop.
        path: Vec<I>,
    },
}

impl<I: NodeId> Error<I> {
    /// The cycle path carried by a [`Error::CycleDetected`] error.
    #[must_use]
    pub fn cycle_path(&self) -> &[I] {
        match self {
            Self::CycleDetected { path } => path,
        }
    }
}

fn render_path<I: NodeId>(path: &[I]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
