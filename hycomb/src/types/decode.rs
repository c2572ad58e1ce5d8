//! Wire format of the type table.
//!
//! `natural(count + 1)` followed by `count` entries. Each entry is a tag
//! (`0` unit, `10` sum, `11` product); compound entries carry two relative
//! back-references `natural(offset)` resolving to entry `index - offset`.
use log::debug;

use crate::{
    config::DecodeOptions,
    encoding::{BitReader, BitWriter},
    error::{DecodeError, DecodeResult},
    types::{TypeExpr, TypeRef, TypeTable},
};

/// Decode the type table, returning the deduplicated table and the mapping
/// from wire index to [`TypeRef`].
pub fn decode_types(
    reader: &mut BitReader<'_>,
    options: &DecodeOptions,
) -> DecodeResult<(TypeTable, Vec<TypeRef>)> {
    let count = reader.read_natural()? - 1;

    // Every entry spends at least one bit, so a larger count cannot be honest.
    let remaining = reader.bits_remaining() as u64;
    if count > remaining {
        return Err(DecodeError::TruncatedInput {
            position: reader.bits_consumed(),
            needed: (count - remaining) as usize,
        });
    }
    if count > options.max_types as u64 {
        return Err(DecodeError::LimitExceeded {
            what: "type",
            limit: options.max_types,
            found: count,
        });
    }

    let count = count as usize;
    let mut table = TypeTable::new();
    let mut wire = Vec::with_capacity(count);
    for index in 0..count {
        let expr = if !reader.read_bit()? {
            TypeExpr::Unit
        } else {
            let is_product = reader.read_bit()?;
            let left = read_type_reference(reader, index, &wire)?;
            let right = read_type_reference(reader, index, &wire)?;
            if is_product {
                TypeExpr::Product(left, right)
            } else {
                TypeExpr::Sum(left, right)
            }
        };
        wire.push(table.intern(expr));
    }

    debug!(
        "decoded {} wire type(s) into {} distinct type(s)",
        count,
        table.len()
    );
    Ok((table, wire))
}

fn read_type_reference(
    reader: &mut BitReader<'_>,
    index: usize,
    wire: &[TypeRef],
) -> DecodeResult<TypeRef> {
    let offset = reader.read_natural()?;
    if offset > index as u64 {
        return Err(DecodeError::InvalidTypeReference {
            index,
            reference: offset,
        });
    }
    Ok(wire[index - offset as usize])
}

/// Write the entries of `table` reachable from `roots`, keeping their
/// relative order, and return the wire index assigned to each table entry.
///
/// Entries nothing refers to are left out, so types interned while checking
/// a program never change its encoding. Slots of unwritten entries are
/// meaningless.
pub fn encode_types(
    writer: &mut BitWriter,
    table: &TypeTable,
    roots: impl IntoIterator<Item = TypeRef>,
) -> Vec<usize> {
    let mut keep = vec![false; table.len()];
    let mut pending: Vec<TypeRef> = roots.into_iter().collect();
    while let Some(r) = pending.pop() {
        if std::mem::replace(&mut keep[r.index()], true) {
            continue;
        }
        if let Some((a, b)) = table.get(r).children() {
            pending.extend([a, b]);
        }
    }

    let mut wire = vec![0; table.len()];
    let mut count = 0;
    for (slot, _) in wire.iter_mut().zip(&keep).filter(|(_, kept)| **kept) {
        *slot = count;
        count += 1;
    }

    writer.write_natural(count as u64 + 1);
    for (r, expr) in table.iter().filter(|(r, _)| keep[r.index()]) {
        let index = wire[r.index()];
        match expr {
            TypeExpr::Unit => writer.write_bit(false),
            TypeExpr::Sum(a, b) | TypeExpr::Product(a, b) => {
                writer.write_bit(true);
                writer.write_bit(expr.is_product());
                writer.write_natural((index - wire[a.index()]) as u64);
                writer.write_natural((index - wire[b.index()]) as u64);
            }
        }
    }
    debug!("encoded {count} of {} types", table.len());
    wire
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> DecodeResult<(TypeTable, Vec<TypeRef>)> {
        let mut reader = BitReader::new(bytes);
        decode_types(&mut reader, &DecodeOptions::default())
    }

    #[test]
    fn decodes_and_deduplicates() {
        // count 4 -> natural(5) = 11001; unit "0"; unit "0"; sum 1 2 -> "10 0 100";
        // product 1 1 -> "11 0 0"
        // bits: 11001 0 0 10 0 100 11 0 0
        let bytes = [0b1100_1001, 0b0010_0110, 0b0000_0000];
        let (table, wire) = decode(&bytes).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(wire[0], wire[1]);
        assert_eq!(table.get(wire[2]), TypeExpr::Sum(wire[0], wire[0]));
        assert_eq!(table.fmt(wire[3]).to_string(), "2^2");
    }

    #[test]
    fn rejects_self_reference() {
        // count 1 -> natural(2) = 100; sum with offset 1 at index 0
        let bytes = [0b1001_0000];
        assert_eq!(
            decode(&bytes).unwrap_err(),
            DecodeError::InvalidTypeReference {
                index: 0,
                reference: 1
            }
        );
    }

    #[test]
    fn rejects_counts_beyond_the_bit_budget() {
        // count 254 -> natural(255) = 1111111 0 1111111, then nothing
        let bytes = [0b1111_1110, 0b1111_1110];
        assert!(decode(&bytes).unwrap_err().is_truncated_input());
    }

    #[test]
    fn respects_configured_limit() {
        let mut table = TypeTable::new();
        let u = table.unit();
        let bit = table.sum(u, u);
        let mut w = BitWriter::new();
        encode_types(&mut w, &table, [bit]);
        let bytes = w.finalize();
        let options = DecodeOptions::default().with_max_types(1);
        let mut reader = BitReader::new(&bytes);
        assert_eq!(
            decode_types(&mut reader, &options).unwrap_err(),
            DecodeError::LimitExceeded {
                what: "type",
                limit: 1,
                found: 2
            }
        );
    }

    #[test]
    fn encoder_matches_decoder() {
        let mut table = TypeTable::new();
        let h = table.word(256);
        let u = table.unit();
        let sum = table.sum(h, u);
        let mut w = BitWriter::new();
        let wire_of = encode_types(&mut w, &table, [sum]);
        let bytes = w.finalize();
        let (decoded, wire) = decode(&bytes).unwrap();
        assert_eq!(decoded, table);
        assert_eq!(wire.len(), table.len());
        assert_eq!(wire_of[sum.index()], table.len() - 1);
    }

    #[test]
    fn unreferenced_entries_are_skipped() {
        let mut table = TypeTable::new();
        let u = table.unit();
        let bit = table.sum(u, u);
        let mut w = BitWriter::new();
        encode_types(&mut w, &table, [bit]);
        let expected = w.finalize();

        // Interned between and after the reachable entries.
        let mut grown = TypeTable::new();
        let u = grown.unit();
        let pair = grown.product(u, u);
        let bit = grown.sum(u, u);
        grown.product(bit, pair);
        let mut w = BitWriter::new();
        let wire = encode_types(&mut w, &grown, [bit]);
        assert_eq!(w.finalize(), expected);
        assert_eq!(wire[bit.index()], 1);

        let (decoded, _) = decode(&expected).unwrap();
        assert_eq!(decoded.len(), 2);
    }
}
