//! Combinator nodes and the index-addressed node table.
//!
//! A program is a DAG stored as an append-only [`NodeTable`]. Children are
//! [`NodeId`]s pointing strictly backwards, so a child may be shared by any
//! number of parents and the table is always in post-order: iterating it
//! front to back visits every child before its parents. The last node is the
//! root.
//!
//! Submodules:
//! - `decode` / `encode`: the bit-level wire format
//! - `builder`: construction of programs by hand, sharing by reusing ids
//! - `display`: parenthesized combinator notation
use smallvec::{SmallVec, smallvec};
use strum::{EnumDiscriminants, EnumIs, EnumIter, EnumTryAs};

use crate::{commit::Cmr, jet::JetEntry, types::TypeRef};

pub mod builder;
pub mod decode;
pub mod display;
pub mod encode;

/// Index of a node inside its [`NodeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Declared types and runtime payload of a `witness` node.
///
/// Only the declared types reach the commitment; the payload is carried
/// along for downstream tools and never hashed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Witness {
    pub source: TypeRef,
    pub target: TypeRef,
    pub payload: Vec<u8>,
}

/// A single combinator instance.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, EnumTryAs, EnumDiscriminants)]
#[strum_discriminants(name(NodeKind))]
#[strum_discriminants(derive(Hash, EnumIter))]
pub enum ExprNode {
    Iden,
    Unit,
    InjL(NodeId),
    InjR(NodeId),
    Take(NodeId),
    Drop(NodeId),
    Comp(NodeId, NodeId),
    Case(NodeId, NodeId),
    Pair(NodeId, NodeId),
    Disconnect(NodeId, NodeId),
    Witness(Witness),
    Fail,
    /// A pruned subexpression, known only by its commitment.
    Hidden(Cmr),
    Jet(&'static JetEntry),
}

impl ExprNode {
    pub fn kind(&self) -> NodeKind {
        self.into()
    }

    /// Children in left-to-right order.
    pub fn children(&self) -> SmallVec<[NodeId; 2]> {
        match *self {
            ExprNode::InjL(c) | ExprNode::InjR(c) | ExprNode::Take(c) | ExprNode::Drop(c) => {
                smallvec![c]
            }
            ExprNode::Comp(l, r)
            | ExprNode::Case(l, r)
            | ExprNode::Pair(l, r)
            | ExprNode::Disconnect(l, r) => smallvec![l, r],
            ExprNode::Iden
            | ExprNode::Unit
            | ExprNode::Witness(_)
            | ExprNode::Fail
            | ExprNode::Hidden(_)
            | ExprNode::Jet(_) => SmallVec::new(),
        }
    }
}

impl NodeKind {
    /// Lower-case combinator name, as used in domain-separation tags and in
    /// the parenthesized notation.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Iden => "iden",
            NodeKind::Unit => "unit",
            NodeKind::InjL => "injl",
            NodeKind::InjR => "injr",
            NodeKind::Take => "take",
            NodeKind::Drop => "drop",
            NodeKind::Comp => "comp",
            NodeKind::Case => "case",
            NodeKind::Pair => "pair",
            NodeKind::Disconnect => "disconnect",
            NodeKind::Witness => "witness",
            NodeKind::Fail => "fail",
            NodeKind::Hidden => "hidden",
            NodeKind::Jet => "jet",
        }
    }

    /// Number of child references carried by this kind.
    pub fn arity(&self) -> usize {
        match self {
            NodeKind::InjL | NodeKind::InjR | NodeKind::Take | NodeKind::Drop => 1,
            NodeKind::Comp | NodeKind::Case | NodeKind::Pair | NodeKind::Disconnect => 2,
            _ => 0,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Append-only table of nodes in post-order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeTable {
    nodes: Vec<ExprNode>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `node`. Children should already be in the table; references
    /// are checked when the table becomes a [`Program`](crate::program::Program).
    pub fn push(&mut self, node: ExprNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// # Panics
    /// Panics if `id` does not belong to this table.
    #[inline]
    pub fn get(&self, id: NodeId) -> &ExprNode {
        &self.nodes[id.index()]
    }

    /// The root, i.e. the last node.
    pub fn root(&self) -> Option<NodeId> {
        self.nodes.len().checked_sub(1).map(|i| NodeId(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ExprNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Number of parents referencing each node; shared nodes have more than one.
    pub fn parent_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.nodes.len()];
        for node in &self.nodes {
            for child in node.children() {
                counts[child.index()] += 1;
            }
        }
        counts
    }
}
