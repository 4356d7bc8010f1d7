//! Task graph builder using petgraph.
//!
//! Edges point from a task to each task it depends on, so the outgoing
//! neighbours of a node are its dependencies and the incoming neighbours
//! are its dependents (fan-in).

use crate::{NodeId, TaskNodeData};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::debug;

/// Dependency graph over task ids.
///
/// Every id added to the graph is a key, even when it has no dependencies.
/// Node order follows insertion order, which keeps traversals deterministic.
#[derive(Debug, Clone)]
pub struct TaskGraph<I: NodeId> {
    /// The directed graph of task ids; an edge `a -> b` means `a` depends on `b`.
    graph: DiGraph<I, ()>,
    /// Map from task ids to node indices.
    id_to_node: HashMap<I, NodeIndex>,
}

impl<I: NodeId> TaskGraph<I> {
    /// Create a new empty task graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            id_to_node: HashMap::new(),
        }
    }

    /// Build the graph for a batch of tasks.
    ///
    /// All ids are added first, then the dependency edges, so a task may
    /// depend on one that appears later in the batch. Repeated entries in a
    /// dependency list collapse into a single edge. References to ids that
    /// are not in the batch are skipped.
    pub fn from_tasks<T>(tasks: &[T]) -> Self
    where
        T: TaskNodeData<Id = I>,
    {
        let mut graph = Self::new();

        for task in tasks {
            if let Some(id) = task.node_id() {
                graph.add_task(id.clone());
            }
        }

        for task in tasks {
            let Some(id) = task.node_id() else {
                continue;
            };
            for dep in task.dependency_ids() {
                if !graph.add_dependency(id, dep) {
                    debug!("Skipping edge '{}' -> '{}': unknown task", id, dep);
                }
            }
        }

        debug!(
            tasks = graph.task_count(),
            edges = graph.edge_count(),
            "Built task graph"
        );
        graph
    }

    /// Add a task id to the graph.
    ///
    /// If the id already exists, returns the existing node index.
    pub fn add_task(&mut self, id: I) -> NodeIndex {
        if let Some(&node) = self.id_to_node.get(&id) {
            return node;
        }

        let node = self.graph.add_node(id.clone());
        self.id_to_node.insert(id, node);
        node
    }

    /// Record that `task` depends on `dependency`.
    ///
    /// Returns `false` without changing the graph when either id is unknown.
    /// Adding the same edge twice is a no-op.
    pub fn add_dependency(&mut self, task: &I, dependency: &I) -> bool {
        match (self.id_to_node.get(task), self.id_to_node.get(dependency)) {
            (Some(&from), Some(&to)) => {
                self.graph.update_edge(from, to, ());
                true
            }
            _ => false,
        }
    }

    /// Get the number of tasks in the graph.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of distinct dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if a task exists in the graph.
    #[must_use]
    pub fn contains_task(&self, id: &I) -> bool {
        self.id_to_node.contains_key(id)
    }

    /// Iterate over all task ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &I> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Ids that `id` depends on, in declared order.
    ///
    /// Returns an empty list for unknown ids.
    #[must_use]
    pub fn dependencies(&self, id: &I) -> Vec<&I> {
        self.id_to_node
            .get(id)
            .map(|&node| {
                self.dependency_indices(node)
                    .into_iter()
                    .map(|idx| &self.graph[idx])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ids of the tasks that list `id` as a dependency.
    #[must_use]
    pub fn dependents(&self, id: &I) -> Vec<&I> {
        self.id_to_node
            .get(id)
            .map(|&node| {
                let mut dependents: Vec<&I> = self
                    .graph
                    .neighbors_directed(node, Direction::Incoming)
                    .map(|idx| &self.graph[idx])
                    .collect();
                dependents.reverse();
                dependents
            })
            .unwrap_or_default()
    }

    /// Number of tasks that depend on `id`.
    #[must_use]
    pub fn fan_in(&self, id: &I) -> usize {
        self.id_to_node.get(id).map_or(0, |&node| {
            self.graph
                .neighbors_directed(node, Direction::Incoming)
                .count()
        })
    }

    /// The adjacency map: every task id mapped to its dependency ids.
    #[must_use]
    pub fn adjacency(&self) -> HashMap<I, Vec<I>> {
        self.ids()
            .map(|id| {
                let deps = self.dependencies(id).into_iter().cloned().collect();
                (id.clone(), deps)
            })
            .collect()
    }

    /// The dependents map: every task id mapped to the ids depending on it.
    #[must_use]
    pub fn dependents_map(&self) -> HashMap<I, Vec<I>> {
        self.ids()
            .map(|id| {
                let dependents = self.dependents(id).into_iter().cloned().collect();
                (id.clone(), dependents)
            })
            .collect()
    }

    /// Check if the graph has cycles.
    ///
    /// Use [`TaskGraph::detect_cycle`] when the offending path is needed.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    pub(crate) fn node_index(&self, id: &I) -> Option<NodeIndex> {
        self.id_to_node.get(id).copied()
    }

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    pub(crate) fn id_at(&self, node: NodeIndex) -> &I {
        &self.graph[node]
    }

    /// Dependency nodes of `node` in the order their edges were added.
    pub(crate) fn dependency_indices(&self, node: NodeIndex) -> Vec<NodeIndex> {
        // petgraph lists neighbours most recent first
        let mut deps: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        deps.reverse();
        deps
    }
}

impl<I: NodeId> Default for TaskGraph<I> {
    fn default() -> Self {
        Self::new()
    }
}
