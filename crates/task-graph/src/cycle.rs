//! Cycle detection with path reporting.

use crate::traversal::Frame;
use crate::{Error, NodeId, Result, TaskGraph};
use petgraph::graph::NodeIndex;
use std::collections::HashSet;
use tracing::debug;

impl<I: NodeId> TaskGraph<I> {
    /// Verify that the graph is acyclic.
    ///
    /// Runs a depth-first search from every node not yet visited, in
    /// insertion order, following dependencies in declared order. Nodes
    /// on the current path are marked in-progress; reaching one of them
    /// again closes a cycle. Completed nodes are never re-explored, so
    /// the search is linear in nodes plus edges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] for the first cycle found. The path
    /// is the slice of the traversal stack from the revisited node's first
    /// occurrence, followed by the revisited node again.
    pub fn detect_cycle(&self) -> Result<(), I> {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut in_progress: HashSet<NodeIndex> = HashSet::new();

        for root in self.node_indices() {
            if visited.contains(&root) {
                continue;
            }

            in_progress.insert(root);
            let mut stack = vec![Frame::new(root, self.dependency_indices(root))];

            while let Some(frame) = stack.last_mut() {
                let Some(next) = frame.next_dependency() else {
                    let node = frame.node;
                    stack.pop();
                    in_progress.remove(&node);
                    visited.insert(node);
                    continue;
                };

                if in_progress.contains(&next) {
                    let start = stack
                        .iter()
                        .position(|frame| frame.node == next)
                        .unwrap_or_default();
                    let mut path: Vec<I> = stack[start..]
                        .iter()
                        .map(|frame| self.id_at(frame.node).clone())
                        .collect();
                    path.push(self.id_at(next).clone());

                    debug!(length = path.len() - 1, "Dependency cycle found");
                    return Err(Error::CycleDetected { path });
                }

                if !visited.contains(&next) {
                    in_progress.insert(next);
                    stack.push(Frame::new(next, self.dependency_indices(next)));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of(edges: &[(&'static str, &[&'static str])]) -> TaskGraph<&'static str> {
        let mut graph = TaskGraph::new();
        for (id, _) in edges {
            graph.add_task(*id);
        }
        for (id, deps) in edges {
            for dep in *deps {
                graph.add_dependency(id, dep);
            }
        }
        graph
    }

    #[test]
    fn test_acyclic_graph_passes() {
        let graph = graph_of(&[("a", &[]), ("b", &["a"]), ("c", &["a", "b"])]);
        assert!(graph.detect_cycle().is_ok());
    }

    #[test]
    fn test_empty_graph_passes() {
        let graph: TaskGraph<&str> = TaskGraph::new();
        assert!(graph.detect_cycle().is_ok());
    }

    #[test]
    fn test_two_node_cycle() {
        let graph = graph_of(&[("a", &["b"]), ("b", &["a"])]);

        let error = graph.detect_cycle().unwrap_err();
        assert_eq!(error.cycle_path(), &["a", "b", "a"]);
    }

    #[test]
    fn test_self_dependency_cycle() {
        let graph = graph_of(&[("a", &["a"])]);

        let error = graph.detect_cycle().unwrap_err();
        assert_eq!(error.cycle_path(), &["a", "a"]);
    }

    #[test]
    fn test_path_excludes_prefix_leading_into_cycle() {
        // entry -> x -> y -> z -> x
        let graph = graph_of(&[
            ("entry", &["x"]),
            ("x", &["y"]),
            ("y", &["z"]),
            ("z", &["x"]),
        ]);

        let error = graph.detect_cycle().unwrap_err();
        assert_eq!(error.cycle_path(), &["x", "y", "z", "x"]);
    }

    #[test]
    fn test_isolated_cycle_is_found() {
        // A clean component first, then a disconnected cycle
        let graph = graph_of(&[
            ("build", &[]),
            ("test", &["build"]),
            ("p", &["q"]),
            ("q", &["p"]),
        ]);

        let error = graph.detect_cycle().unwrap_err();
        assert_eq!(error.cycle_path(), &["p", "q", "p"]);
    }

    #[test]
    fn test_shared_dependency_is_not_a_cycle() {
        // Diamond: reaching "a" twice through completed paths is fine
        let graph = graph_of(&[
            ("d", &["b", "c"]),
            ("b", &["a"]),
            ("c", &["a"]),
            ("a", &[]),
        ]);
        assert!(graph.detect_cycle().is_ok());
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let ids: Vec<String> = (0..100_000).map(|i| format!("task_{i}")).collect();
        let mut graph = TaskGraph::new();
        for id in &ids {
            graph.add_task(id.clone());
        }
        for pair in ids.windows(2) {
            graph.add_dependency(&pair[1], &pair[0]);
        }
        assert!(graph.detect_cycle().is_ok());

        // Close the chain into one long cycle
        graph.add_dependency(&ids[0], &ids[ids.len() - 1]);
        let error = graph.detect_cycle().unwrap_err();
        assert_eq!(error.cycle_path().len(), ids.len() + 1);
    }
}
