//! Dependency graph algorithms for taskrank.
//!
//! This crate turns a batch of tasks into a directed "depends on" graph
//! backed by petgraph, verifies it is acyclic, and computes how deep each
//! task sits in its dependency chain.
//!
//! # Key Types
//!
//! - [`TaskGraph`]: adjacency of task ids to the ids they depend on
//! - [`TaskNodeData`]: trait that task types implement to be graphed
//! - [`DepthMemo`]: per-invocation cache for [`TaskGraph::depth`]
//!
//! # Example
//!
//! ```ignore
//! use taskrank_graph::{DepthMemo, TaskGraph, TaskNodeData};
//!
//! struct Item {
//!     id: u32,
//!     deps: Vec<u32>,
//! }
//!
//! impl TaskNodeData for Item {
//!     type Id = u32;
//!
//!     fn node_id(&self) -> Option<&u32> {
//!         Some(&self.id)
//!     }
//!
//!     fn dependency_ids(&self) -> &[u32] {
//!         &self.deps
//!     }
//! }
//!
//! let graph = TaskGraph::from_tasks(&items);
//! graph.detect_cycle()?;
//!
//! let mut memo = DepthMemo::new();
//! let depth = graph.depth(&3, &mut memo);
//! ```
//!
//! All traversals use explicit stacks, so dependency chains of any length
//! are handled without recursion.

mod cycle;
mod depth;
mod error;
mod graph;
mod traversal;

pub use depth::DepthMemo;
pub use error::{Error, Result};
pub use graph::TaskGraph;

use std::fmt;
use std::hash::Hash;

/// Bounds required of a task identifier stored in the graph.
pub trait NodeId: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

impl<T> NodeId for T where T: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

/// Trait for task data that can be placed in a [`TaskGraph`].
pub trait TaskNodeData {
    /// Identifier type shared by the task and its dependency references.
    type Id: NodeId;

    /// The task's own id, or `None` for tasks that cannot be referenced.
    ///
    /// Tasks without an id are not added as graph keys.
    fn node_id(&self) -> Option<&Self::Id>;

    /// Ids of the tasks this task depends on, in declared order.
    fn dependency_ids(&self) -> &[Self::Id];
}
