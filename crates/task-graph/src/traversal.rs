//! Explicit-stack traversal support.
//!
//! Cycle detection and depth computation both walk the graph depth-first.
//! They keep their own stack of [`Frame`]s instead of recursing, so the
//! length of a dependency chain is bounded by heap, not call-stack, size.

use petgraph::graph::NodeIndex;

/// One node on the traversal stack together with its unvisited dependencies.
#[derive(Debug)]
pub(crate) struct Frame {
    pub(crate) node: NodeIndex,
    pub(crate) dependencies: Vec<NodeIndex>,
    cursor: usize,
}

impl Frame {
    pub(crate) fn new(node: NodeIndex, dependencies: Vec<NodeIndex>) -> Self {
        Self {
            node,
            dependencies,
            cursor: 0,
        }
    }

    /// Advance to the next dependency, or `None` once all have been seen.
    pub(crate) fn next_dependency(&mut self) -> Option<NodeIndex> {
        let next = self.dependencies.get(self.cursor).copied();
        if next.is_some() {
            self.cursor += 1;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_yields_dependencies_in_order() {
        let mut frame = Frame::new(
            NodeIndex::new(0),
            vec![NodeIndex::new(2), NodeIndex::new(1)],
        );

        assert_eq!(frame.next_dependency(), Some(NodeIndex::new(2)));
        assert_eq!(frame.next_dependency(), Some(NodeIndex::new(1)));
        assert_eq!(frame.next_dependency(), None);
        assert_eq!(frame.next_dependency(), None);
    }
}
