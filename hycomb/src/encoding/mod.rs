//! Bit-level encoding shared by the type table and the node table.
//!
//! Everything on the wire is a sequence of bits read most significant bit first.
//! Counts, offsets and indices use a self-delimiting natural-number code: a
//! unary bit-length prefix followed by that many payload bits. See
//! [`reader::BitReader::read_natural`].
pub mod reader;
pub mod writer;

pub use reader::BitReader;
pub use writer::BitWriter;
