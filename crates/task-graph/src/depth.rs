//! Dependency depth computation.
//!
//! The depth of a task is the length of its longest dependency chain:
//! 0 when it depends on nothing, otherwise one more than the deepest of
//! its dependencies. A task therefore always sits deeper than anything it
//! depends on, directly or transitively.

use crate::traversal::Frame;
use crate::{NodeId, TaskGraph};
use petgraph::graph::NodeIndex;
use std::collections::{HashMap, HashSet};

/// Memoized depths for a single graph.
///
/// A memo belongs to the graph that filled it and to one scoring pass;
/// create a fresh one for every invocation.
#[derive(Debug, Default)]
pub struct DepthMemo {
    depths: HashMap<NodeIndex, usize>,
}

impl DepthMemo {
    /// Create an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Whether nothing has been memoized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

impl<I: NodeId> TaskGraph<I> {
    /// Compute the depth of `id`.
    ///
    /// The graph should already have passed [`TaskGraph::detect_cycle`].
    /// On a cyclic graph this still terminates; edges that close a cycle
    /// are ignored. Unknown ids have depth 0.
    pub fn depth(&self, id: &I, memo: &mut DepthMemo) -> usize {
        let Some(start) = self.node_index(id) else {
            return 0;
        };
        if let Some(&depth) = memo.depths.get(&start) {
            return depth;
        }

        let mut on_stack: HashSet<NodeIndex> = HashSet::from([start]);
        let mut stack = vec![Frame::new(start, self.dependency_indices(start))];

        while let Some(frame) = stack.last_mut() {
            if let Some(next) = frame.next_dependency() {
                if !memo.depths.contains_key(&next) && on_stack.insert(next) {
                    stack.push(Frame::new(next, self.dependency_indices(next)));
                }
                continue;
            }

            // Every dependency is resolved (or closes a cycle)
            let depth = frame
                .dependencies
                .iter()
                .filter_map(|dep| memo.depths.get(dep))
                .map(|depth| depth + 1)
                .max()
                .unwrap_or(0);
            let node = frame.node;

            stack.pop();
            on_stack.remove(&node);
            memo.depths.insert(node, depth);
        }

        memo.depths.get(&start).copied().unwrap_or_default()
    }

    /// Compute the depth of every task in the graph with one shared memo.
    #[must_use]
    pub fn depths(&self) -> HashMap<I, usize> {
        let mut memo = DepthMemo::new();
        self.ids()
            .map(|id| (id.clone(), self.depth(id, &mut memo)))
            .collect()
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
    fn test_leaf_has_depth_zero() {
        let graph = graph_of(&[("a", &[])]);
        let mut memo = DepthMemo::new();
        assert_eq!(graph.depth(&"a", &mut memo), 0);
    }

    #[test]
    fn test_chain_depths() {
        let graph = graph_of(&[("deploy", &["fix"]), ("fix", &["refactor"]), ("refactor", &[])]);

        let depths = graph.depths();
        assert_eq!(depths[&"refactor"], 0);
        assert_eq!(depths[&"fix"], 1);
        assert_eq!(depths[&"deploy"], 2);
    }

    #[test]
    fn test_depth_takes_longest_chain() {
        // d depends on a directly and on c -> b -> a
        let graph = graph_of(&[
            ("a", &[]),
            ("b", &["a"]),
            ("c", &["b"]),
            ("d", &["a", "c"]),
        ]);

        let mut memo = DepthMemo::new();
        assert_eq!(graph.depth(&"d", &mut memo), 3);
    }

    #[test]
    fn test_memo_is_filled_for_visited_nodes() {
        let graph = graph_of(&[("a", &[]), ("b", &["a"]), ("c", &["b"]), ("x", &[])]);

        let mut memo = DepthMemo::new();
        assert!(memo.is_empty());
        assert_eq!(graph.depth(&"c", &mut memo), 2);
        assert_eq!(memo.len(), 3);

        // Second lookup is served from the memo
        assert_eq!(graph.depth(&"b", &mut memo), 1);
        assert_eq!(memo.len(), 3);
    }

    #[test]
    fn test_unknown_id_has_depth_zero() {
        let graph = graph_of(&[("a", &[])]);
        let mut memo = DepthMemo::new();
        assert_eq!(graph.depth(&"missing", &mut memo), 0);
    }

    #[test]
    fn test_cyclic_graph_terminates() {
        let graph = graph_of(&[("a", &["b"]), ("b", &["a"])]);
        let mut memo = DepthMemo::new();

        // The back edge is ignored: b resolves to 0, a to 1
        assert_eq!(graph.depth(&"a", &mut memo), 1);
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

        let mut memo = DepthMemo::new();
        assert_eq!(graph.depth(&ids[ids.len() - 1], &mut memo), ids.len() - 1);
    }
}
