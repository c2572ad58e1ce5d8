use crate::jet::JetSet;

/// Knobs of a decode-and-check pass.
///
/// The limits bound memory before anything is allocated; the bit budget of
/// the input bounds it further.
///
/// ```rust
/// # use hycomb::{config::DecodeOptions, jet::JetSet};
/// let options = DecodeOptions::default()
///     .with_jet_set(JetSet::Core)
///     .with_max_nodes(1 << 12);
/// assert_eq!(options.max_nodes, 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Jet catalog used to resolve jet indices.
    pub jet_set: JetSet,
    pub max_nodes: usize,
    pub max_types: usize,
    /// Largest witness payload, in bytes.
    pub max_witness_bytes: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            jet_set: JetSet::Elements,
            max_nodes: 1 << 20,
            max_types: 1 << 20,
            max_witness_bytes: 1 << 16,
        }
    }
}

impl DecodeOptions {
    pub fn with_jet_set(mut self, jet_set: JetSet) -> Self {
        self.jet_set = jet_set;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_max_types(mut self, max_types: usize) -> Self {
        self.max_types = max_types;
        self
    }

    pub fn with_max_witness_bytes(mut self, max_witness_bytes: usize) -> Self {
        self.max_witness_bytes = max_witness_bytes;
        self
    }
}
