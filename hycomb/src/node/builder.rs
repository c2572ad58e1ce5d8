//! Construction of programs by hand.
//!
//! Sharing is explicit: reusing a [`NodeId`] in several parents makes the
//! node shared, and every parent then constrains the same arrow. Calling a
//! constructor twice always creates two independent nodes.
use crate::{
    commit::Cmr,
    jet::{JetEntry, JetSet},
    node::{ExprNode, NodeId, NodeTable, Witness},
    types::{TypeRef, TypeTable},
};

/// Appends nodes to a fresh [`NodeTable`] together with the [`TypeTable`]
/// their witness declarations live in.
///
/// ```rust
/// # use hycomb::node::builder::ProgramBuilder;
/// let mut b = ProgramBuilder::new();
/// let iden = b.iden();
/// let unit = b.unit();
/// let root = b.pair(iden, unit);
/// let (nodes, _types) = b.finish();
/// assert_eq!(nodes.root(), Some(root));
/// ```
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    nodes: NodeTable,
    types: TypeTable,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing type table, e.g. one shared with other programs.
    pub fn with_types(types: TypeTable) -> Self {
        Self {
            nodes: NodeTable::new(),
            types,
        }
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeTable {
        &mut self.types
    }

    pub fn push(&mut self, node: ExprNode) -> NodeId {
        self.nodes.push(node)
    }

    pub fn iden(&mut self) -> NodeId {
        self.push(ExprNode::Iden)
    }

    pub fn unit(&mut self) -> NodeId {
        self.push(ExprNode::Unit)
    }

    pub fn fail(&mut self) -> NodeId {
        self.push(ExprNode::Fail)
    }

    pub fn injl(&mut self, child: NodeId) -> NodeId {
        self.push(ExprNode::InjL(child))
    }

    pub fn injr(&mut self, child: NodeId) -> NodeId {
        self.push(ExprNode::InjR(child))
    }

    pub fn take(&mut self, child: NodeId) -> NodeId {
        self.push(ExprNode::Take(child))
    }

    pub fn drop(&mut self, child: NodeId) -> NodeId {
        self.push(ExprNode::Drop(child))
    }

    pub fn comp(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.push(ExprNode::Comp(left, right))
    }

    pub fn case(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.push(ExprNode::Case(left, right))
    }

    pub fn pair(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.push(ExprNode::Pair(left, right))
    }

    pub fn disconnect(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.push(ExprNode::Disconnect(left, right))
    }

    /// A witness of the declared arrow carrying `payload`.
    pub fn witness(&mut self, source: TypeRef, target: TypeRef, payload: Vec<u8>) -> NodeId {
        self.push(ExprNode::Witness(Witness {
            source,
            target,
            payload,
        }))
    }

    pub fn hidden(&mut self, cmr: Cmr) -> NodeId {
        self.push(ExprNode::Hidden(cmr))
    }

    pub fn jet(&mut self, entry: &'static JetEntry) -> NodeId {
        self.push(ExprNode::Jet(entry))
    }

    /// A jet of `set` by name, or `None` if the set has no such jet.
    pub fn jet_by_name(&mut self, set: JetSet, name: &str) -> Option<NodeId> {
        let entry = set.table().by_name(name)?;
        Some(self.jet(entry))
    }

    pub fn finish(self) -> (NodeTable, TypeTable) {
        (self.nodes, self.types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_never_merge() {
        let mut b = ProgramBuilder::new();
        let a = b.unit();
        let c = b.unit();
        assert_ne!(a, c);
        let p = b.pair(a, a);
        assert_eq!(b.nodes().parent_counts()[a.index()], 2);
        assert_eq!(b.nodes().get(p).children().as_slice(), &[a, a]);
    }

    #[test]
    fn jets_resolve_by_name() {
        let mut b = ProgramBuilder::new();
        assert!(b.jet_by_name(JetSet::Core, "sig_all_hash").is_none());
        let id = b.jet_by_name(JetSet::Elements, "sig_all_hash").unwrap();
        let ExprNode::Jet(entry) = b.nodes().get(id) else {
            panic!("expected a jet node");
        };
        assert_eq!(entry.name(), "sig_all_hash");
    }
}
