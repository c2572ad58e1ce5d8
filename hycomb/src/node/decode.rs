//! Wire format of the node table.
//!
//! `natural(count)` followed by `count` nodes in post-order, each introduced
//! by a prefix-code tag:
//!
//! ```text
//! 00000 comp      00100 injl      01000 iden      011  hidden
//! 00001 case      00101 injr      01001 unit      1    jet
//! 00010 pair      00110 take      01010 fail
//! 00011 disconnect 00111 drop     01011 witness
//! ```
//!
//! Children are relative back-references `natural(offset)` resolving to node
//! `index - offset`. A witness carries `natural(src + 1)`, `natural(tgt + 1)`
//! (absolute indices into the wire type table), `natural(len + 1)` and `len`
//! payload bytes; a hidden node its 256-bit commitment; a jet
//! `natural(index + 1)`.
use log::debug;

use crate::{
    commit::Cmr,
    config::DecodeOptions,
    encoding::BitReader,
    error::{DecodeError, DecodeResult},
    node::{ExprNode, NodeId, NodeKind, NodeTable, Witness},
    types::TypeRef,
};

/// Tag of a node kind, as `(value, bit length)`.
pub(crate) fn tag(kind: NodeKind) -> (u64, usize) {
    match kind {
        NodeKind::Comp => (0b00000, 5),
        NodeKind::Case => (0b00001, 5),
        NodeKind::Pair => (0b00010, 5),
        NodeKind::Disconnect => (0b00011, 5),
        NodeKind::InjL => (0b00100, 5),
        NodeKind::InjR => (0b00101, 5),
        NodeKind::Take => (0b00110, 5),
        NodeKind::Drop => (0b00111, 5),
        NodeKind::Iden => (0b01000, 5),
        NodeKind::Unit => (0b01001, 5),
        NodeKind::Fail => (0b01010, 5),
        NodeKind::Witness => (0b01011, 5),
        NodeKind::Hidden => (0b011, 3),
        NodeKind::Jet => (0b1, 1),
    }
}

fn read_kind(reader: &mut BitReader<'_>) -> DecodeResult<NodeKind> {
    if reader.read_bit()? {
        return Ok(NodeKind::Jet);
    }
    if reader.read_bit()? {
        return Ok(if reader.read_bit()? {
            NodeKind::Hidden
        } else {
            match reader.read_bits(2)? {
                0b00 => NodeKind::Iden,
                0b01 => NodeKind::Unit,
                0b10 => NodeKind::Fail,
                _ => NodeKind::Witness,
            }
        });
    }
    Ok(match reader.read_bits(3)? {
        0b000 => NodeKind::Comp,
        0b001 => NodeKind::Case,
        0b010 => NodeKind::Pair,
        0b011 => NodeKind::Disconnect,
        0b100 => NodeKind::InjL,
        0b101 => NodeKind::InjR,
        0b110 => NodeKind::Take,
        _ => NodeKind::Drop,
    })
}

/// Decode the node table. `wire_types` maps wire type indices to the
/// deduplicated table produced by [`decode_types`](crate::types::decode::decode_types).
pub fn decode_nodes(
    reader: &mut BitReader<'_>,
    wire_types: &[TypeRef],
    options: &DecodeOptions,
) -> DecodeResult<NodeTable> {
    let count = reader.read_natural()?;

    // Every node spends at least one bit.
    let remaining = reader.bits_remaining() as u64;
    if count > remaining {
        return Err(DecodeError::TruncatedInput {
            position: reader.bits_consumed(),
            needed: (count - remaining) as usize,
        });
    }
    if count > options.max_nodes as u64 {
        return Err(DecodeError::LimitExceeded {
            what: "node",
            limit: options.max_nodes,
            found: count,
        });
    }

    let jets = options.jet_set.table();
    let mut nodes = NodeTable::with_capacity(count as usize);
    for index in 0..count as usize {
        let kind = read_kind(reader)?;
        let node = match kind {
            NodeKind::Iden => ExprNode::Iden,
            NodeKind::Unit => ExprNode::Unit,
            NodeKind::Fail => ExprNode::Fail,
            NodeKind::InjL => ExprNode::InjL(read_child(reader, index)?),
            NodeKind::InjR => ExprNode::InjR(read_child(reader, index)?),
            NodeKind::Take => ExprNode::Take(read_child(reader, index)?),
            NodeKind::Drop => ExprNode::Drop(read_child(reader, index)?),
            NodeKind::Comp | NodeKind::Case | NodeKind::Pair | NodeKind::Disconnect => {
                let left = read_child(reader, index)?;
                let right = read_child(reader, index)?;
                match kind {
                    NodeKind::Comp => ExprNode::Comp(left, right),
                    NodeKind::Case => ExprNode::Case(left, right),
                    NodeKind::Pair => ExprNode::Pair(left, right),
                    _ => ExprNode::Disconnect(left, right),
                }
            }
            NodeKind::Witness => {
                let source = read_declared_type(reader, index, wire_types)?;
                let target = read_declared_type(reader, index, wire_types)?;
                let len = reader.read_natural()? - 1;
                if len > options.max_witness_bytes as u64 {
                    return Err(DecodeError::LimitExceeded {
                        what: "witness byte",
                        limit: options.max_witness_bytes,
                        found: len,
                    });
                }
                let payload = reader.read_bytes(len as usize)?;
                ExprNode::Witness(Witness {
                    source,
                    target,
                    payload,
                })
            }
            NodeKind::Hidden => ExprNode::Hidden(Cmr::from_byte_array(reader.read_array()?)),
            NodeKind::Jet => {
                let jet = reader.read_natural()? - 1;
                let entry = jets.by_index(jet).ok_or(DecodeError::UnknownJetIndex {
                    index,
                    jet,
                    set: options.jet_set.name(),
                })?;
                ExprNode::Jet(entry)
            }
        };
        nodes.push(node);
    }

    debug!(
        "decoded {} node(s) ending at bit {}",
        nodes.len(),
        reader.bits_consumed()
    );
    Ok(nodes)
}

fn read_child(reader: &mut BitReader<'_>, index: usize) -> DecodeResult<NodeId> {
    let offset = reader.read_natural()?;
    if offset > index as u64 {
        return Err(DecodeError::InvalidNodeReference { index, offset });
    }
    Ok(NodeId((index as u64 - offset) as u32))
}

fn read_declared_type(
    reader: &mut BitReader<'_>,
    index: usize,
    wire_types: &[TypeRef],
) -> DecodeResult<TypeRef> {
    let reference = reader.read_natural()? - 1;
    usize::try_from(reference)
        .ok()
        .and_then(|i| wire_types.get(i))
        .copied()
        .ok_or(DecodeError::InvalidTypeReference { index, reference })
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::encoding::BitWriter;

    fn decode(bytes: &[u8]) -> DecodeResult<NodeTable> {
        let mut reader = BitReader::new(bytes);
        decode_nodes(&mut reader, &[], &DecodeOptions::default())
    }

    #[test]
    fn tags_form_a_prefix_code() {
        for kind in NodeKind::iter() {
            let (value, len) = tag(kind);
            let mut w = BitWriter::new();
            w.write_bits(value, len);
            let bytes = w.finalize();
            let mut r = BitReader::new(&bytes);
            assert_eq!(read_kind(&mut r).unwrap(), kind);
            assert_eq!(r.bits_consumed(), len);
        }
    }

    #[test]
    fn decodes_shared_children() {
        // count 3 -> 101; iden 01000; unit 01001; pair 00010 offset 2 (100) offset 1 (0)
        // 101 01000 01001 00010 100 0 -> 21 bits
        let bytes = [0b1010_1000, 0b0100_1000, 0b1010_0000];
        let nodes = decode(&bytes).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(
            nodes.get(NodeId(2)),
            &ExprNode::Pair(NodeId(0), NodeId(1))
        );
    }

    #[test]
    fn rejects_forward_references() {
        // count 1 -> 0; injl 00100 offset 1 -> 0
        let bytes = [0b0001_0000];
        assert_eq!(
            decode(&bytes).unwrap_err(),
            DecodeError::InvalidNodeReference {
                index: 0,
                offset: 1
            }
        );
    }

    #[test]
    fn rejects_unknown_jets() {
        // count 1 -> 0; jet 1; natural(201) = 1111111 0 1001001
        let mut w = BitWriter::new();
        w.write_natural(1);
        w.write_bit(true);
        w.write_natural(201);
        let bytes = w.finalize();
        let err = decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownJetIndex {
                index: 0,
                jet: 200,
                set: "elements"
            }
        );
    }

    #[test]
    fn rejects_witness_types_outside_the_table() {
        let mut w = BitWriter::new();
        w.write_natural(1);
        w.write_bits(0b01011, 5);
        w.write_natural(1);
        w.write_natural(1);
        w.write_natural(1);
        let bytes = w.finalize();
        assert_eq!(
            decode(&bytes).unwrap_err(),
            DecodeError::InvalidTypeReference {
                index: 0,
                reference: 0
            }
        );
    }

    #[test]
    fn caps_node_counts() {
        let mut w = BitWriter::new();
        w.write_natural(3);
        for _ in 0..3 {
            w.write_bits(0b01000, 5);
        }
        let bytes = w.finalize();
        let options = DecodeOptions::default().with_max_nodes(2);
        let mut reader = BitReader::new(&bytes);
        assert_eq!(
            decode_nodes(&mut reader, &[], &options).unwrap_err(),
            DecodeError::LimitExceeded {
                what: "node",
                limit: 2,
                found: 3
            }
        );
    }
}
