//! Property-based tests for task graph invariants.
//!
//! These tests verify the behavioral contracts of the task graph:
//! - Depth strictly increases along every dependency edge
//! - Cycle detection agrees with petgraph and reports a closed path
//! - Fan-in matches the number of distinct dependents

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use taskrank_graph::{DepthMemo, TaskGraph, TaskNodeData};

// =============================================================================
// Test Task Type
// =============================================================================

/// Simple task type for property testing.
#[derive(Clone, Debug)]
struct PropTask {
    id: String,
    deps: Vec<String>,
}

impl TaskNodeData for PropTask {
    type Id = String;

    fn node_id(&self) -> Option<&String> {
        Some(&self.id)
    }

    fn dependency_ids(&self) -> &[String] {
        &self.deps
    }
}

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Generate a valid task name (lowercase alphanumeric with underscores).
fn task_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}".prop_map(String::from)
}

/// Generate a DAG with a specified number of tasks.
///
/// The strategy ensures no cycles by only allowing dependencies on tasks
/// with lower indices (tasks added earlier in the sequence).
fn dag_strategy(min_tasks: usize, max_tasks: usize) -> impl Strategy<Value = Vec<PropTask>> {
    (min_tasks..=max_tasks).prop_flat_map(|task_count| {
        proptest::collection::vec(task_name_strategy(), task_count).prop_flat_map(move |names| {
            // Deduplicate names by appending index
            let unique_names: Vec<String> = names
                .into_iter()
                .enumerate()
                .map(|(i, name)| format!("{name}_{i}"))
                .collect();

            let dep_strategies: Vec<_> = (0..task_count)
                .map(|i| {
                    if i == 0 {
                        Just(vec![]).boxed()
                    } else {
                        let earlier_names: Vec<String> = unique_names[..i].to_vec();
                        proptest::collection::vec(
                            proptest::sample::select(earlier_names),
                            0..=i.min(3),
                        )
                        .boxed()
                    }
                })
                .collect();

            let names_clone = unique_names.clone();
            dep_strategies.prop_map(move |all_deps| {
                names_clone
                    .iter()
                    .cloned()
                    .zip(all_deps)
                    .map(|(id, deps)| PropTask { id, deps })
                    .collect::<Vec<_>>()
            })
        })
    })
}

/// Generate a DAG and then close a ring of `ring` tasks into a cycle.
fn cyclic_graph_strategy() -> impl Strategy<Value = Vec<PropTask>> {
    (dag_strategy(0, 6), 1..=5_usize).prop_map(|(mut tasks, ring)| {
        let offset = tasks.len();
        for i in 0..ring {
            let next = format!("ring-{}", (i + 1) % ring);
            tasks.push(PropTask {
                id: format!("ring-{i}"),
                deps: vec![next],
            });
        }
        // Hang the ring off the DAG so it is reachable as well as isolated
        if let Some(first) = tasks.first_mut()
            && offset > 0
        {
            first.deps.push("ring-0".to_string());
        }
        tasks
    })
}

/// Every transitive dependency of `id`.
fn transitive_dependencies(tasks: &[PropTask], id: &str) -> HashSet<String> {
    let by_id: HashMap<&str, &PropTask> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    let mut seen = HashSet::new();
    let mut frontier = vec![id.to_string()];

    while let Some(current) = frontier.pop() {
        if let Some(task) = by_id.get(current.as_str()) {
            for dep in &task.deps {
                if seen.insert(dep.clone()) {
                    frontier.push(dep.clone());
                }
            }
        }
    }

    seen
}

// =============================================================================
// Property Tests: Depth
// =============================================================================

proptest! {
    /// Contract: depth(B) < depth(A) whenever A depends on B, directly or
    /// transitively.
    #[test]
    fn depth_increases_along_dependencies(tasks in dag_strategy(1, 15)) {
        let graph = TaskGraph::from_tasks(&tasks);
        prop_assert!(graph.detect_cycle().is_ok(), "Generated DAG should be acyclic");

        let depths = graph.depths();
        for task in &tasks {
            for dep in transitive_dependencies(&tasks, &task.id) {
                prop_assert!(
                    depths[&dep] < depths[&task.id],
                    "Dependency '{}' (depth {}) should be shallower than '{}' (depth {})",
                    dep, depths[&dep], task.id, depths[&task.id]
                );
            }
        }
    }

    /// Contract: depth is 0 exactly for tasks without dependencies.
    #[test]
    fn depth_zero_iff_no_dependencies(tasks in dag_strategy(1, 15)) {
        let graph = TaskGraph::from_tasks(&tasks);
        let mut memo = DepthMemo::new();

        for task in &tasks {
            let depth = graph.depth(&task.id, &mut memo);
            prop_assert_eq!(depth == 0, task.deps.is_empty());
        }
    }

    /// Contract: a shared memo gives the same answers as a fresh one.
    #[test]
    fn memo_does_not_change_results(tasks in dag_strategy(1, 15)) {
        let graph = TaskGraph::from_tasks(&tasks);
        let mut shared = DepthMemo::new();

        for task in tasks.iter().rev() {
            let mut fresh = DepthMemo::new();
            prop_assert_eq!(
                graph.depth(&task.id, &mut shared),
                graph.depth(&task.id, &mut fresh)
            );
        }
    }
}

// =============================================================================
// Property Tests: Cycle Detection
// =============================================================================

proptest! {
    /// Contract: acyclic graphs pass detection.
    #[test]
    fn cycle_detection_accepts_dags(tasks in dag_strategy(0, 15)) {
        let graph = TaskGraph::from_tasks(&tasks);

        prop_assert!(!graph.has_cycles());
        prop_assert!(graph.detect_cycle().is_ok());
    }

    /// Contract: cyclic graphs fail with a closed path made of real edges.
    #[test]
    fn cycle_detection_reports_closed_path(tasks in cyclic_graph_strategy()) {
        let graph = TaskGraph::from_tasks(&tasks);
        prop_assert!(graph.has_cycles());

        let error = graph.detect_cycle().expect_err("Cycle should be detected");
        let path = error.cycle_path();

        prop_assert!(path.len() >= 2);
        prop_assert_eq!(path.first(), path.last(), "Path should close on itself");

        let adjacency = graph.adjacency();
        for pair in path.windows(2) {
            prop_assert!(
                adjacency[&pair[0]].contains(&pair[1]),
                "'{}' -> '{}' should be an edge of the graph",
                pair[0], pair[1]
            );
        }

        // Only the closing node repeats
        let interior: HashSet<&String> = path[..path.len() - 1].iter().collect();
        prop_assert_eq!(interior.len(), path.len() - 1);
    }

    /// Contract: detection is deterministic for the same batch.
    #[test]
    fn cycle_detection_is_deterministic(tasks in cyclic_graph_strategy()) {
        let first = TaskGraph::from_tasks(&tasks).detect_cycle();
        let second = TaskGraph::from_tasks(&tasks).detect_cycle();
        prop_assert_eq!(first, second);
    }
}

// =============================================================================
// Additional Property Tests
// =============================================================================

proptest! {
    /// Contract: fan-in counts distinct dependents.
    #[test]
    fn fan_in_counts_distinct_dependents(tasks in dag_strategy(1, 15)) {
        let graph = TaskGraph::from_tasks(&tasks);

        for task in &tasks {
            let expected = tasks
                .iter()
                .filter(|other| other.deps.contains(&task.id))
                .count();
            prop_assert_eq!(graph.fan_in(&task.id), expected);
        }
    }

    /// Contract: graph task count matches input and every id is a key.
    #[test]
    fn every_task_is_a_key(tasks in dag_strategy(1, 20)) {
        let graph = TaskGraph::from_tasks(&tasks);
        let adjacency = graph.adjacency();

        prop_assert_eq!(graph.task_count(), tasks.len());
        for task in &tasks {
            prop_assert!(adjacency.contains_key(&task.id));
        }
    }

    /// Contract: adding the same id twice returns the same node.
    #[test]
    fn duplicate_ids_handled(name in task_name_strategy()) {
        let mut graph = TaskGraph::new();

        let node1 = graph.add_task(name.clone());
        let node2 = graph.add_task(name);

        prop_assert_eq!(node1, node2, "Same id should return same node index");
        prop_assert_eq!(graph.task_count(), 1);
    }
}
