//! Decoder, type checker and commitment hasher for combinator programs.
//!
//! A program travels as a compact bit string: a table of types followed by
//! a post-order table of combinator nodes. [`Program::decode`] rebuilds the
//! expression DAG, infers the arrow of every node, computes every node's
//! commitment Merkle root and recognizes known jets by commitment.
//!
//! ```rust
//! # use hycomb::{jet::JetSet, node::builder::ProgramBuilder, program::Program};
//! let mut b = ProgramBuilder::new();
//! let unit = b.types_mut().unit();
//! let input = b.witness(unit, unit, vec![]);
//! let root = b.jet_by_name(JetSet::Core, "low_1").unwrap();
//! b.comp(input, root);
//! let (nodes, types) = b.finish();
//!
//! let program = Program::from_parts(nodes, types, JetSet::Core).unwrap();
//! let decoded = Program::decode_with(
//!     &program.encode(),
//!     &hycomb::config::DecodeOptions::default().with_jet_set(JetSet::Core),
//! )
//! .unwrap();
//! assert_eq!(decoded.cmr(), program.cmr());
//! assert_eq!(decoded.type_arrow(), "1 → 2");
//! ```
pub mod address;
pub mod commit;
pub mod config;
pub mod encoding;
pub mod error;
pub mod infer;
pub mod jet;
pub mod node;
pub mod program;
pub mod types;

pub use commit::Cmr;
pub use config::DecodeOptions;
pub use error::{DecodeError, DecodeResult};
pub use program::{Program, TypedNode};
