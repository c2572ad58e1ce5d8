//! Commitment Merkle roots.
//!
//! Every node commits to its kind and to its children's commitments with a
//! domain-separated tagged hash:
//!
//! ```text
//! th          = SHA256(tag)
//! commitment  = SHA256(th || th || payload)
//! payload     = ""                 leaves
//!             = child || 0^256     one child
//!             = left  || right     two children
//! ```
//!
//! Node tags are `"Simplicity\x1fCommitment\x1f" + kind`. A `witness`
//! commits to the type Merkle roots of its declared types, never to its
//! payload; a `hidden` node *is* its stored commitment; a `jet` node takes
//! the commitment of its catalog entry.
use std::{collections::HashMap, str::FromStr};

use log::{debug, trace};
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use strum::IntoEnumIterator;

use crate::{
    node::{ExprNode, NodeKind, NodeTable},
    types::{TypeExpr, TypeTable},
};

const COMMITMENT_TAG_PREFIX: &str = "Simplicity\x1fCommitment\x1f";
const TYPE_TAG_PREFIX: &str = "Simplicity\x1fType\x1f";
const JET_TAG: &str = "Simplicity\x1fJet";

/// A 32-byte commitment.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cmr([u8; 32]);

impl Cmr {
    pub const fn from_byte_array(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[inline]
    pub const fn to_byte_array(self) -> [u8; 32] {
        self.0
    }
}

impl std::fmt::Display for Cmr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl std::fmt::Debug for Cmr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cmr({self})")
    }
}

impl FromStr for Cmr {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Cmr {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Cmr {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Hash engines already fed with `th || th`, one per tag.
static ENGINES: Lazy<HashMap<String, Sha256>> = Lazy::new(|| {
    let node_tags = NodeKind::iter()
        .filter(|k| !matches!(k, NodeKind::Hidden | NodeKind::Jet))
        .map(|k| format!("{COMMITMENT_TAG_PREFIX}{}", k.name()));
    let type_tags = ["unit", "sum", "prod"]
        .into_iter()
        .map(|k| format!("{TYPE_TAG_PREFIX}{k}"));

    node_tags
        .chain(type_tags)
        .chain(std::iter::once(JET_TAG.to_string()))
        .map(|tag| {
            let engine = tagged_engine(&tag);
            (tag, engine)
        })
        .collect()
});

pub(crate) fn tagged_engine(tag: &str) -> Sha256 {
    let th = Sha256::digest(tag.as_bytes());
    let mut engine = Sha256::new();
    engine.update(th);
    engine.update(th);
    engine
}

fn engine(tag: &str) -> Sha256 {
    ENGINES
        .get(tag)
        .cloned()
        .unwrap_or_else(|| tagged_engine(tag))
}

fn finish(mut engine: Sha256, left: Option<&Cmr>, right: Option<&Cmr>) -> Cmr {
    if let Some(left) = left {
        engine.update(left.0);
        engine.update(right.map_or([0u8; 32], |r| r.0));
    }
    Cmr(engine.finalize().into())
}

/// Commitment of a node of `kind` over the given children.
///
/// `hidden` and `jet` nodes have no tag of their own; their commitment is
/// supplied from outside.
pub fn combinator_cmr(kind: NodeKind, children: &[Cmr]) -> Cmr {
    let engine = engine(&format!("{COMMITMENT_TAG_PREFIX}{}", kind.name()));
    finish(engine, children.first(), children.get(1))
}

/// Commitment of a primitive jet, which has no combinator expansion.
pub fn primitive_jet_cmr(name: &str) -> Cmr {
    let name_hash = Cmr(Sha256::digest(name.as_bytes()).into());
    finish(engine(JET_TAG), Some(&name_hash), None)
}

/// Type Merkle root of every entry of `table`, indexed by [`TypeRef`](crate::types::TypeRef).
///
/// Entries only reference earlier entries, so one ascending pass suffices.
pub fn type_roots(table: &TypeTable) -> Vec<Cmr> {
    let mut roots: Vec<Cmr> = Vec::with_capacity(table.len());
    for (_, expr) in table.iter() {
        let root = match expr {
            TypeExpr::Unit => finish(engine(&format!("{TYPE_TAG_PREFIX}unit")), None, None),
            TypeExpr::Sum(a, b) => finish(
                engine(&format!("{TYPE_TAG_PREFIX}sum")),
                Some(&roots[a.index()]),
                Some(&roots[b.index()]),
            ),
            TypeExpr::Product(a, b) => finish(
                engine(&format!("{TYPE_TAG_PREFIX}prod")),
                Some(&roots[a.index()]),
                Some(&roots[b.index()]),
            ),
        };
        roots.push(root);
    }
    roots
}

/// Commitment of every node of `nodes`, computed once each in ascending order.
pub fn compute_commitments(nodes: &NodeTable, types: &TypeTable) -> Vec<Cmr> {
    let has_witness = nodes.iter().any(|(_, n)| n.is_witness());
    let tmrs = if has_witness {
        type_roots(types)
    } else {
        Vec::new()
    };

    let mut cmrs: Vec<Cmr> = Vec::with_capacity(nodes.len());
    for (id, node) in nodes.iter() {
        let cmr = match node {
            ExprNode::Hidden(cmr) => *cmr,
            ExprNode::Jet(entry) => entry.cmr(),
            ExprNode::Witness(w) => {
                let engine = engine(&format!("{COMMITMENT_TAG_PREFIX}witness"));
                finish(
                    engine,
                    Some(&tmrs[w.source.index()]),
                    Some(&tmrs[w.target.index()]),
                )
            }
            _ => {
                let children: smallvec::SmallVec<[Cmr; 2]> = node
                    .children()
                    .iter()
                    .map(|c| cmrs[c.index()])
                    .collect();
                combinator_cmr(node.kind(), &children)
            }
        };
        trace!("cmr of {id} ({}) = {cmr}", node.kind());
        cmrs.push(cmr);
    }

    if let Some(root) = cmrs.last() {
        debug!("computed {} commitment(s), root {}", cmrs.len(), root);
    }
    cmrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_hex() {
        let text = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";
        let cmr: Cmr = text.parse().unwrap();
        assert_eq!(cmr.to_string(), text);
        assert_eq!(cmr.as_bytes()[1], 0x11);
        assert!("0011".parse::<Cmr>().is_err());
    }

    #[test]
    fn cached_engines_match_fresh_ones() {
        let fresh = finish(
            tagged_engine("Simplicity\x1fCommitment\x1fiden"),
            None,
            None,
        );
        assert_eq!(combinator_cmr(NodeKind::Iden, &[]), fresh);
    }

    #[test]
    fn kinds_are_domain_separated() {
        let a = combinator_cmr(NodeKind::Unit, &[]);
        let b = combinator_cmr(NodeKind::Iden, &[]);
        assert_ne!(
            combinator_cmr(NodeKind::Pair, &[a, b]),
            combinator_cmr(NodeKind::Comp, &[a, b])
        );
        assert_ne!(combinator_cmr(NodeKind::Take, &[a]), combinator_cmr(NodeKind::Drop, &[a]));
    }

    #[test]
    fn one_child_pads_with_zeros() {
        let a = combinator_cmr(NodeKind::Unit, &[]);
        let padded = finish(
            tagged_engine("Simplicity\x1fCommitment\x1finjl"),
            Some(&a),
            Some(&Cmr([0; 32])),
        );
        assert_eq!(combinator_cmr(NodeKind::InjL, &[a]), padded);
    }

    #[test]
    fn type_roots_follow_structure() {
        let mut t = TypeTable::new();
        let u = t.unit();
        let bit = t.sum(u, u);
        let p = t.product(bit, bit);
        let roots = type_roots(&t);
        assert_eq!(roots.len(), 3);
        assert_ne!(roots[bit.index()], roots[p.index()]);
        let expected = finish(
            tagged_engine("Simplicity\x1fType\x1fprod"),
            Some(&roots[bit.index()]),
            Some(&roots[bit.index()]),
        );
        assert_eq!(roots[p.index()], expected);
    }
}
