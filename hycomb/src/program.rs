//! Decoded, typed and hashed programs.
use log::debug;

use crate::{
    address::{AddressEncoder, Network},
    commit::{Cmr, compute_commitments},
    config::DecodeOptions,
    encoding::BitReader,
    error::{DecodeError, DecodeResult},
    infer::infer_arrows,
    jet::{JetEntry, JetSet},
    node::{
        ExprNode, NodeId, NodeTable, decode::decode_nodes, display::display_expr,
        encode::encode_program,
    },
    types::{Arrow, TypeTable, decode::decode_types},
};

/// A well-typed program with the commitment of every node.
///
/// ```rust
/// # use hycomb::{jet::JetSet, node::builder::ProgramBuilder, program::Program};
/// let mut b = ProgramBuilder::new();
/// let hash = b.types_mut().word(256);
/// let unit = b.types_mut().unit();
/// let witness = b.witness(unit, hash, vec![0; 32]);
/// let jet = b.jet_by_name(JetSet::Elements, "eq_256").unwrap();
/// let dup = b.pair(witness, witness);
/// b.comp(dup, jet);
/// let (nodes, types) = b.finish();
///
/// let program = Program::from_parts(nodes, types, JetSet::Elements).unwrap();
/// assert_eq!(program.type_arrow(), "1 → 2");
/// assert!(program.is_redeem());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    nodes: NodeTable,
    types: TypeTable,
    arrows: Vec<Arrow>,
    cmrs: Vec<Cmr>,
    jets: Vec<Option<&'static JetEntry>>,
    jet_set: JetSet,
}

impl Program {
    /// Decode with the default [`DecodeOptions`].
    pub fn decode(bytes: &[u8]) -> DecodeResult<Self> {
        Self::decode_with(bytes, &DecodeOptions::default())
    }

    pub fn decode_with(bytes: &[u8], options: &DecodeOptions) -> DecodeResult<Self> {
        let mut reader = BitReader::new(bytes);
        let (types, wire_types) = decode_types(&mut reader, options)?;
        let nodes = decode_nodes(&mut reader, &wire_types, options)?;
        reader.finish()?;
        Self::from_parts(nodes, types, options.jet_set)
    }

    /// Type-check and hash a program built in memory.
    ///
    /// An empty node table is reported like an empty input. References the
    /// decoder would have rejected are rejected here too: children must
    /// precede their parent, witness types must be in `types` and jets must
    /// belong to `jet_set`.
    pub fn from_parts(
        nodes: NodeTable,
        mut types: TypeTable,
        jet_set: JetSet,
    ) -> DecodeResult<Self> {
        if nodes.is_empty() {
            return Err(DecodeError::TruncatedInput {
                position: 0,
                needed: 1,
            });
        }
        check_references(&nodes, &types, jet_set)?;

        let arrows = infer_arrows(&nodes, &mut types)?;
        let cmrs = compute_commitments(&nodes, &types);
        let table = jet_set.table();
        let jets: Vec<_> = cmrs.iter().map(|cmr| table.lookup(cmr)).collect();

        let program = Self {
            nodes,
            types,
            arrows,
            cmrs,
            jets,
            jet_set,
        };
        debug!(
            "program {} : {} ({} node(s), {} recognized jet(s))",
            program.cmr(),
            program.type_arrow(),
            program.nodes.len(),
            program.jets.iter().flatten().count()
        );
        Ok(program)
    }

    fn root(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Commitment of the root.
    pub fn cmr(&self) -> Cmr {
        self.cmrs[self.root()]
    }

    pub fn arrow(&self) -> Arrow {
        self.arrows[self.root()]
    }

    /// The root arrow rendered as `source → target`.
    pub fn type_arrow(&self) -> String {
        self.arrow().fmt(&self.types).to_string()
    }

    /// Whether the whole program is a single known jet.
    pub fn is_jet_recognized(&self) -> bool {
        self.recognized_jet().is_some()
    }

    pub fn recognized_jet(&self) -> Option<&'static JetEntry> {
        self.jets[self.root()]
    }

    /// Whether the program carries data only known at redemption: witness
    /// bytes or pruned branches.
    pub fn is_redeem(&self) -> bool {
        self.nodes.iter().any(|(_, node)| match node {
            ExprNode::Witness(w) => !w.payload.is_empty(),
            ExprNode::Hidden(_) => true,
            _ => false,
        })
    }

    pub fn jet_set(&self) -> JetSet {
        self.jet_set
    }

    /// # Panics
    /// Panics if `id` is not a node of this program.
    pub fn node(&self, id: NodeId) -> TypedNode<'_> {
        let i = id.index();
        TypedNode {
            id,
            node: self.nodes.get(id),
            arrow: self.arrows[i],
            cmr: self.cmrs[i],
            jet: self.jets[i],
        }
    }

    pub fn root_node(&self) -> TypedNode<'_> {
        self.node(NodeId::new(self.root()))
    }

    /// Every node in post-order.
    pub fn nodes(&self) -> impl Iterator<Item = TypedNode<'_>> + '_ {
        self.nodes.iter().map(|(id, _)| self.node(id))
    }

    pub fn node_table(&self) -> &NodeTable {
        &self.nodes
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Parenthesized notation of the program, at most `budget` nodes long.
    pub fn display_expr(&self, budget: usize) -> String {
        display_expr(&self.nodes, NodeId::new(self.root()), budget)
    }

    /// Canonical encoding; decoding it yields an equal program.
    pub fn encode(&self) -> Vec<u8> {
        encode_program(&self.nodes, &self.types)
    }

    /// Address of the program on each of `networks`.
    pub fn addresses<E: AddressEncoder>(
        &self,
        encoder: &E,
        networks: &[Network],
    ) -> Result<Vec<(Network, String)>, E::Error> {
        let cmr = self.cmr();
        networks
            .iter()
            .map(|&network| Ok((network, encoder.encode_address(&cmr, network.hrp())?)))
            .collect()
    }
}

/// Read-only view of one node of a [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedNode<'a> {
    id: NodeId,
    node: &'a ExprNode,
    arrow: Arrow,
    cmr: Cmr,
    jet: Option<&'static JetEntry>,
}

impl<'a> TypedNode<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a ExprNode {
        self.node
    }

    pub fn arrow(&self) -> Arrow {
        self.arrow
    }

    pub fn cmr(&self) -> Cmr {
        self.cmr
    }

    /// The jet whose commitment this node has, if any.
    pub fn recognized_jet(&self) -> Option<&'static JetEntry> {
        self.jet
    }
}

fn check_references(nodes: &NodeTable, types: &TypeTable, jet_set: JetSet) -> DecodeResult<()> {
    for (id, node) in nodes.iter() {
        let index = id.index();
        if let Some(child) = node.children().iter().find(|c| c.index() >= index) {
            return Err(DecodeError::InvalidNodeReference {
                index,
                offset: index.saturating_sub(child.index()) as u64,
            });
        }
        match node {
            ExprNode::Witness(w) => {
                let declared = [w.source, w.target];
                if let Some(r) = declared.into_iter().find(|r| r.index() >= types.len()) {
                    return Err(DecodeError::InvalidTypeReference {
                        index,
                        reference: r.index() as u64,
                    });
                }
            }
            ExprNode::Jet(entry) => {
                let jet = u64::from(entry.index());
                if jet_set.table().by_index(jet) != Some(*entry) {
                    return Err(DecodeError::UnknownJetIndex {
                        index,
                        jet,
                        set: jet_set.name(),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(())
}
