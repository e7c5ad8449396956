//! Box-drawing text rendering of a tree.
//!
//! The diagram is composed bottom-up: rendering a node first renders its
//! left and right subtrees into rectangular blocks of equal-length lines,
//! then draws its own label with underscore bridges and `/` `\` stubs
//! toward each child's label midpoint, and stitches the blocks together
//! line by line with a gap sized to the number of bridges drawn. The
//! exact padding and centering rules are fixed, so snapshot tests can
//! assert character-for-character output.

use super::node::Node;
use super::{address, NodeIndex, Tree};

/// A rendered rectangular block: its lines (all the same length), the
/// block width, and the start/end columns of the root label inside it.
struct RenderedBox {
    lines: Vec<String>,
    width: usize,
    label_start: usize,
    label_end: usize,
}

impl RenderedBox {
    fn empty() -> Self {
        Self {
            lines: Vec::new(),
            width: 0,
            label_start: 0,
            label_end: 0,
        }
    }
}

impl Tree {
    /// Render the tree as a multi-line box-drawing diagram, one label
    /// per node.
    ///
    /// Returns an empty string for an empty tree. Lines are
    /// right-trimmed and carry no trailing newline.
    pub fn render_text(&self) -> String {
        self.render(false)
    }

    /// Like [`Tree::render_text`], with each label prefixed by the
    /// node's index as `index-label`.
    pub fn render_text_indexed(&self) -> String {
        self.render(true)
    }

    fn render(&self, show_index: bool) -> String {
        let rendered = self.build_box(0, show_index);
        let mut lines: Vec<String> = rendered
            .lines
            .iter()
            .map(|line| line.trim_end().to_string())
            .collect();
        // The bottom padding row under the deepest leaves is always blank.
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    fn node_label(node: &Node, index: NodeIndex, show_index: bool) -> String {
        if show_index {
            format!("{index}-{node}")
        } else {
            node.to_string()
        }
    }

    fn build_box(&self, index: NodeIndex, show_index: bool) -> RenderedBox {
        let Ok(node) = self.get(index) else {
            return RenderedBox::empty();
        };

        let label = Self::node_label(node, index, show_index);
        let label_width = label.len();

        let left = self.build_box(address::left_child(index), show_index);
        let right = self.build_box(address::right_child(index), show_index);

        let mut line1 = String::new();
        let mut line2 = String::new();
        let mut gap_size = label_width;

        // Bridge from above the midpoint of the left child's label up to
        // just before this node's label, with a slash stub underneath.
        let label_start = if left.width > 0 {
            let anchor = (left.label_start + left.label_end) / 2 + 1;
            line1.push_str(&" ".repeat(anchor + 1));
            line1.push_str(&"_".repeat(left.width - anchor));
            line2.push_str(&" ".repeat(anchor));
            line2.push('/');
            line2.push_str(&" ".repeat(left.width - anchor));
            gap_size += 1;
            left.width + 1
        } else {
            0
        };

        line1.push_str(&label);
        line2.push_str(&" ".repeat(label_width));

        // Mirror-image bridge and backslash stub toward the right child.
        if right.width > 0 {
            let anchor = (right.label_start + right.label_end) / 2;
            line1.push_str(&"_".repeat(anchor));
            line1.push_str(&" ".repeat(right.width - anchor + 1));
            line2.push_str(&" ".repeat(anchor));
            line2.push('\\');
            line2.push_str(&" ".repeat(right.width - anchor));
            gap_size += 1;
        }
        let label_end = label_start + label_width - 1;

        // Stitch the sub-boxes together under the branch art, padding the
        // shorter side with spaces.
        let gap = " ".repeat(gap_size);
        let left_pad = " ".repeat(left.width);
        let right_pad = " ".repeat(right.width);
        let mut lines = vec![line1, line2];
        for i in 0..left.lines.len().max(right.lines.len()) {
            let left_line = left.lines.get(i).map(String::as_str).unwrap_or(&left_pad);
            let right_line = right.lines.get(i).map(String::as_str).unwrap_or(&right_pad);
            lines.push(format!("{left_line}{gap}{right_line}"));
        }

        let width = lines[0].len();
        RenderedBox {
            lines,
            width,
            label_start,
            label_end,
        }
    }
}
