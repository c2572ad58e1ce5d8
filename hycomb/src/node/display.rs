//! Parenthesized combinator notation, e.g.
//! `comp (pair iden unit) (case fail unit)`.
//!
//! Shared nodes are printed at every use, so the text of a DAG can be
//! exponentially larger than the DAG itself; rendering stops after a budget
//! of nodes and ends with `...`.
use crate::node::{ExprNode, NodeId, NodeTable};

/// Node budget used when none is given.
pub const DEFAULT_DISPLAY_BUDGET: usize = 1 << 12;

/// Render the expression rooted at `root`, printing at most `budget` nodes.
pub fn display_expr(nodes: &NodeTable, root: NodeId, budget: usize) -> String {
    enum Frame {
        Visit(NodeId, bool),
        Text(&'static str),
    }

    let mut out = String::new();
    let mut printed = 0usize;
    let mut stack = vec![Frame::Visit(root, false)];
    while let Some(frame) = stack.pop() {
        let (id, nested) = match frame {
            Frame::Text(s) => {
                out.push_str(s);
                continue;
            }
            Frame::Visit(id, nested) => (id, nested),
        };

        if printed == budget {
            out.push_str("...");
            break;
        }
        printed += 1;

        let node = nodes.get(id);
        let children = node.children();
        if nested && !children.is_empty() {
            out.push('(');
            stack.push(Frame::Text(")"));
        }
        match node {
            ExprNode::Jet(entry) => out.push_str(&entry.to_string()),
            _ => out.push_str(node.kind().name()),
        }
        for &child in children.iter().rev() {
            stack.push(Frame::Visit(child, true));
            stack.push(Frame::Text(" "));
        }
    }
    out
}
