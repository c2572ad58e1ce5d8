use crate::{
    encoding::BitWriter,
    node::{ExprNode, NodeTable, decode::tag},
    types::{TypeTable, decode::encode_types},
};

/// Serialize a program: the types its witnesses declare, then every node.
///
/// Only witness declarations refer to the type table on the wire, so types
/// interned by inference are left out and decoding then encoding a
/// canonical program gives back the same bytes.
pub fn encode_program(nodes: &NodeTable, types: &TypeTable) -> Vec<u8> {
    let mut writer = BitWriter::new();
    let declared = nodes.iter().filter_map(|(_, node)| match node {
        ExprNode::Witness(w) => Some([w.source, w.target]),
        _ => None,
    });
    let wire = encode_types(&mut writer, types, declared.flatten());

    writer.write_natural(nodes.len() as u64);
    for (id, node) in nodes.iter() {
        let (value, len) = tag(node.kind());
        writer.write_bits(value, len);
        match node {
            ExprNode::Witness(w) => {
                writer.write_natural(wire[w.source.index()] as u64 + 1);
                writer.write_natural(wire[w.target.index()] as u64 + 1);
                writer.write_natural(w.payload.len() as u64 + 1);
                writer.write_bytes(&w.payload);
            }
            ExprNode::Hidden(cmr) => writer.write_bytes(cmr.as_bytes()),
            ExprNode::Jet(entry) => writer.write_natural(entry.index() as u64 + 1),
            _ => {
                for child in node.children() {
                    writer.write_natural((id.index() - child.index()) as u64);
                }
            }
        }
    }
    writer.finalize()
}
