use strum::EnumIs;
use thiserror::Error;

/// Every way a decode-and-check pass can fail.
///
/// All variants are terminal: the pipeline stops at the first failure and no
/// partial [`Program`](crate::program::Program) is produced.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum DecodeError {
    /// A field declares more bits than the input still holds.
    #[error("input truncated at bit {position}: {needed} more bit(s) required")]
    TruncatedInput { position: usize, needed: usize },

    /// Set padding bits or whole trailing bytes after the last node.
    #[error("malformed padding after bit {position}: trailing bits must be zero and under a byte")]
    MalformedPadding { position: usize },

    /// The unary length prefix of a natural number exceeds 63 bits.
    #[error("natural number at bit {position} does not fit in 64 bits")]
    NaturalOverflow { position: usize },

    /// A type reference points at the entry itself, a later entry, or past the table.
    #[error("type reference {reference} of entry {index} does not point at an earlier type")]
    InvalidTypeReference { index: usize, reference: u64 },

    /// A child offset of node `index` points at the node itself or a later node.
    #[error("child offset {offset} of node {index} does not point at an earlier node")]
    InvalidNodeReference { index: usize, offset: u64 },

    /// Jet node `index` names an opcode outside the compiled-in catalog.
    #[error("node {index} references jet {jet}, which is not in the `{set}` jet set")]
    UnknownJetIndex {
        index: usize,
        jet: u64,
        set: &'static str,
    },

    /// Two type expressions forced equal by node `node` have different shapes.
    #[error("type mismatch at node {node}: `{left}` cannot be unified with `{right}`")]
    TypeMismatch {
        node: usize,
        left: String,
        right: String,
    },

    /// The arrow of node `node` still contains a free type variable.
    #[error("the type of node {node} is ambiguous: a type variable was never bound")]
    UnboundTypeVariable { node: usize },

    /// A hidden node sits where no sibling fixes its type.
    #[error("hidden node {node} was pruned in a position where its type cannot be recovered")]
    UnrecognizedHiddenPruning { node: usize },

    /// The constraints of node `node` only admit an infinitely nested type.
    #[error("the type of node {node} would be infinite")]
    InfiniteType { node: usize },

    /// A declared size exceeds the configured [`DecodeOptions`](crate::config::DecodeOptions).
    #[error("{what} count {found} exceeds the configured limit of {limit}")]
    LimitExceeded {
        what: &'static str,
        limit: usize,
        found: u64,
    },
}

impl DecodeError {
    /// Bit offset in the input at which a wire-level error was detected.
    ///
    /// Only errors raised while reading bits carry a position; structural and
    /// typing errors refer to node indices instead.
    pub fn bit_position(&self) -> Option<usize> {
        match self {
            DecodeError::TruncatedInput { position, .. }
            | DecodeError::MalformedPadding { position }
            | DecodeError::NaturalOverflow { position } => Some(*position),
            _ => None,
        }
    }

    /// Index of the node the error is attached to, if any.
    pub fn node(&self) -> Option<usize> {
        match self {
            DecodeError::InvalidNodeReference { index, .. }
            | DecodeError::UnknownJetIndex { index, .. } => Some(*index),
            DecodeError::TypeMismatch { node, .. }
            | DecodeError::UnboundTypeVariable { node }
            | DecodeError::UnrecognizedHiddenPruning { node }
            | DecodeError::InfiniteType { node } => Some(*node),
            _ => None,
        }
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
