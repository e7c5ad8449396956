//! Directed-graph export boundary.
//!
//! Graph layout and drawing belong to an external collaborator; the tree
//! only exposes, per node, a label and a shape classification plus the
//! parent-to-child edges labeled with the rule outcome that leads down
//! them. Collaborators implement [`DigraphSink`]; [`DotWriter`] is a
//! built-in sink producing Graphviz DOT text.

use std::fmt::Write;

use super::node::Node;
use super::{address, NodeIndex, Tree};

/// Shape classification of a node for graph rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// Split nodes render as boxes.
    Box,
    /// Leaf nodes render as ellipses.
    Ellipse,
}

/// Receiver for the nodes and edges of a tree.
///
/// `add_edge` is called with `branch == true` when the edge leads to the
/// child reached by the splitting rule evaluating to true (the left
/// child), and `false` for the other child.
pub trait DigraphSink {
    /// Record a node with its display label and shape.
    fn add_node(&mut self, index: NodeIndex, label: &str, shape: NodeShape);

    /// Record a directed edge from `parent` to `child`.
    fn add_edge(&mut self, parent: NodeIndex, child: NodeIndex, branch: bool);
}

impl Tree {
    /// Emit every node and edge of the tree into `sink`, in preorder.
    ///
    /// Each node is emitted before its own subtree, immediately followed
    /// by the edge from its parent.
    pub fn visit_digraph<S: DigraphSink>(&self, sink: &mut S) {
        self.digraph_walk(0, sink);
    }

    fn digraph_walk<S: DigraphSink>(&self, index: NodeIndex, sink: &mut S) {
        let Ok(node) = self.get(index) else {
            return;
        };

        let shape = match node {
            Node::Split(_) => NodeShape::Box,
            Node::Leaf(_) => NodeShape::Ellipse,
        };
        sink.add_node(index, &node.to_string(), shape);

        if index > 0 && self.contains(address::parent(index)) {
            sink.add_edge(
                address::parent(index),
                index,
                address::is_left_child(index),
            );
        }

        self.digraph_walk(address::left_child(index), sink);
        self.digraph_walk(address::right_child(index), sink);
    }
}

/// [`DigraphSink`] that renders Graphviz DOT text.
#[derive(Debug)]
pub struct DotWriter {
    body: String,
}

impl DotWriter {
    /// Start a digraph with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            body: format!("digraph {name} {{\n"),
        }
    }

    /// Finish the digraph and return the DOT source.
    pub fn finish(mut self) -> String {
        self.body.push_str("}\n");
        self.body
    }
}

impl DigraphSink for DotWriter {
    fn add_node(&mut self, index: NodeIndex, label: &str, shape: NodeShape) {
        let shape = match shape {
            NodeShape::Box => "box",
            NodeShape::Ellipse => "ellipse",
        };
        // Writing to a String cannot fail.
        let _ = writeln!(self.body, "    {index} [label=\"{label}\", shape={shape}];");
    }

    fn add_edge(&mut self, parent: NodeIndex, child: NodeIndex, branch: bool) {
        let label = if branch { "T" } else { "F" };
        let _ = writeln!(self.body, "    {parent} -> {child} [label=\"{label}\"];");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::SplitRule;

    #[derive(Default)]
    struct Recorder {
        nodes: Vec<(NodeIndex, String, NodeShape)>,
        edges: Vec<(NodeIndex, NodeIndex, bool)>,
    }

    impl DigraphSink for Recorder {
        fn add_node(&mut self, index: NodeIndex, label: &str, shape: NodeShape) {
            self.nodes.push((index, label.to_string(), shape));
        }

        fn add_edge(&mut self, parent: NodeIndex, child: NodeIndex, branch: bool) {
            self.edges.push((parent, child, branch));
        }
    }

    fn stump() -> Tree {
        let mut tree = Tree::init(0.0).unwrap();
        tree.grow(0, 0, SplitRule::Quantitative(0.5), -1.0, 1.0)
            .unwrap();
        tree
    }

    #[test]
    fn emits_nodes_and_edges_in_preorder() {
        let mut recorder = Recorder::default();
        stump().visit_digraph(&mut recorder);

        assert_eq!(
            recorder.nodes,
            vec![
                (0, "x[0] <= 0.5".to_string(), NodeShape::Box),
                (1, "-1.0".to_string(), NodeShape::Ellipse),
                (2, "1.0".to_string(), NodeShape::Ellipse),
            ]
        );
        assert_eq!(recorder.edges, vec![(0, 1, true), (0, 2, false)]);
    }

    #[test]
    fn single_leaf_has_no_edges() {
        let mut recorder = Recorder::default();
        Tree::init(1.5).unwrap().visit_digraph(&mut recorder);

        assert_eq!(recorder.nodes.len(), 1);
        assert_eq!(recorder.nodes[0].2, NodeShape::Ellipse);
        assert!(recorder.edges.is_empty());
    }

    #[test]
    fn dot_writer_output() {
        let mut writer = DotWriter::new("tree");
        stump().visit_digraph(&mut writer);

        let expected = "digraph tree {\n\
                        \x20   0 [label=\"x[0] <= 0.5\", shape=box];\n\
                        \x20   1 [label=\"-1.0\", shape=ellipse];\n\
                        \x20   0 -> 1 [label=\"T\"];\n\
                        \x20   2 [label=\"1.0\", shape=ellipse];\n\
                        \x20   0 -> 2 [label=\"F\"];\n\
                        }\n";
        assert_eq!(writer.finish(), expected);
    }
}
