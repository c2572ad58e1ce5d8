//! Jet catalogs.
//!
//! A jet is a named primitive standing in for a combinator expression. The
//! catalogs are compiled in and built once, on first use, into immutable
//! [`JetTable`]s keyed by index, name and commitment.
//!
//! Every entry declares its arrow with a compact prefix descriptor:
//!
//! | char | type    |
//! |------|---------|
//! | `1`  | unit    |
//! | `2`  | bit     |
//! | `c`  | `2^8`   |
//! | `s`  | `2^16`  |
//! | `i`  | `2^32`  |
//! | `l`  | `2^64`  |
//! | `h`  | `2^256` |
//! | `+`  | sum of the next two types |
//! | `*`  | product of the next two types |
//!
//! so `*2*22` reads `2 × (2 × 2)`.
use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    commit::{self, Cmr},
    node::{NodeTable, builder::ProgramBuilder},
    types::{Arrow, TypeRef, TypeTable},
};

pub mod catalog;

/// Which compiled-in catalog resolves jet indices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum JetSet {
    /// Arithmetic, logic and cryptographic primitives.
    Core,
    /// `core` followed by transaction introspection.
    #[default]
    Elements,
}

static CORE_TABLE: Lazy<JetTable> = Lazy::new(|| JetTable::build(JetSet::Core));
static ELEMENTS_TABLE: Lazy<JetTable> = Lazy::new(|| JetTable::build(JetSet::Elements));

impl JetSet {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The table of this set, built on first access.
    pub fn table(self) -> &'static JetTable {
        match self {
            JetSet::Core => &CORE_TABLE,
            JetSet::Elements => &ELEMENTS_TABLE,
        }
    }
}

/// A jet of some [`JetTable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JetEntry {
    name: &'static str,
    index: u32,
    source: &'static str,
    target: &'static str,
    cmr: Cmr,
    structural: bool,
}

impl JetEntry {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Position inside its table; the wire index of the jet.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn cmr(&self) -> Cmr {
        self.cmr
    }

    pub fn source_descriptor(&self) -> &'static str {
        self.source
    }

    pub fn target_descriptor(&self) -> &'static str {
        self.target
    }

    /// Whether the jet's commitment is the commitment of a combinator expansion.
    pub fn is_structural(&self) -> bool {
        self.structural
    }

    /// Intern the declared arrow into `types`.
    pub fn arrow(&self, types: &mut TypeTable) -> Arrow {
        // Descriptors are validated when the table is built.
        let source = parse_descriptor(self.source, types).unwrap_or_else(|| types.unit());
        let target = parse_descriptor(self.target, types).unwrap_or_else(|| types.unit());
        Arrow { source, target }
    }

    /// Rebuild the combinator expansion of a structural jet.
    pub fn expansion(&self) -> Option<(NodeTable, TypeTable)> {
        let catalog::Body::Structural(build) = catalog::definition(self.name)?.body else {
            return None;
        };
        let mut builder = ProgramBuilder::new();
        build(&mut builder);
        Some(builder.finish())
    }
}

impl std::fmt::Display for JetEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "jet_{}", self.name)
    }
}

/// Parse a type descriptor into `types`, or `None` if it is malformed.
pub fn parse_descriptor(descriptor: &str, types: &mut TypeTable) -> Option<TypeRef> {
    // Prefix notation reads naturally right to left with an operand stack.
    let mut stack: Vec<TypeRef> = Vec::new();
    for c in descriptor.chars().rev() {
        let ty = match c {
            '1' => types.unit(),
            '2' => types.word(1),
            'c' => types.word(8),
            's' => types.word(16),
            'i' => types.word(32),
            'l' => types.word(64),
            'h' => types.word(256),
            '+' | '*' => {
                let left = stack.pop()?;
                let right = stack.pop()?;
                if c == '+' {
                    types.sum(left, right)
                } else {
                    types.product(left, right)
                }
            }
            _ => return None,
        };
        stack.push(ty);
    }
    match stack.as_slice() {
        [ty] => Some(*ty),
        _ => None,
    }
}

/// The immutable catalog of one [`JetSet`].
#[derive(Debug)]
pub struct JetTable {
    set: JetSet,
    entries: Vec<JetEntry>,
    by_cmr: HashMap<Cmr, usize>,
    by_name: HashMap<&'static str, usize>,
}

impl JetTable {
    fn build(set: JetSet) -> Self {
        let mut entries = Vec::new();
        let mut by_cmr = HashMap::new();
        let mut by_name = HashMap::new();

        for (index, def) in catalog::definitions(set).enumerate() {
            let mut scratch = TypeTable::new();
            assert!(
                parse_descriptor(def.source, &mut scratch).is_some()
                    && parse_descriptor(def.target, &mut scratch).is_some(),
                "malformed type descriptor for jet {}",
                def.name
            );

            let (cmr, structural) = match def.body {
                catalog::Body::Structural(build) => {
                    let mut builder = ProgramBuilder::new();
                    build(&mut builder);
                    let (nodes, types) = builder.finish();
                    let cmrs = commit::compute_commitments(&nodes, &types);
                    let root = *cmrs.last().expect("expansions are never empty");
                    (root, true)
                }
                catalog::Body::Primitive => (commit::primitive_jet_cmr(def.name), false),
            };

            let previous = by_cmr.insert(cmr, index);
            assert!(previous.is_none(), "jet {} collides with another", def.name);
            by_name.insert(def.name, index);
            entries.push(JetEntry {
                name: def.name,
                index: index as u32,
                source: def.source,
                target: def.target,
                cmr,
                structural,
            });
        }

        debug!("built `{}` jet table with {} entries", set, entries.len());
        Self {
            set,
            entries,
            by_cmr,
            by_name,
        }
    }

    pub fn set(&self) -> JetSet {
        self.set
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JetEntry> + '_ {
        self.entries.iter()
    }

    /// Exact-match lookup by commitment.
    pub fn lookup(&self, cmr: &Cmr) -> Option<&JetEntry> {
        self.by_cmr.get(cmr).map(|&i| &self.entries[i])
    }

    pub fn by_index(&self, index: u64) -> Option<&JetEntry> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.get(i))
    }

    pub fn by_name(&self, name: &str) -> Option<&JetEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_parse_in_prefix_order() {
        let mut t = TypeTable::new();
        let ty = parse_descriptor("*2*22", &mut t).unwrap();
        assert_eq!(t.fmt(ty).to_string(), "(2 × 2^2)");
        let ty = parse_descriptor("+1h", &mut t).unwrap();
        assert_eq!(t.fmt(ty).to_string(), "(1 + 2^256)");
        assert!(parse_descriptor("*2", &mut t).is_none());
        assert!(parse_descriptor("22", &mut t).is_none());
        assert!(parse_descriptor("x", &mut t).is_none());
    }

    #[test]
    fn elements_extends_core() {
        let core = JetSet::Core.table();
        let elements = JetSet::Elements.table();
        assert!(elements.len() > core.len());
        for entry in core.iter() {
            let other = elements.by_index(entry.index() as u64).unwrap();
            assert_eq!(other.name(), entry.name());
            assert_eq!(other.cmr(), entry.cmr());
        }
        assert!(core.by_name("sig_all_hash").is_none());
        assert!(elements.by_name("sig_all_hash").is_some());
    }

    #[test]
    fn lookups_agree() {
        let table = JetSet::Elements.table();
        for entry in table.iter() {
            assert_eq!(table.lookup(&entry.cmr()), Some(entry));
            assert_eq!(table.by_name(entry.name()), Some(entry));
        }
        assert!(table.by_index(table.len() as u64).is_none());
        assert!(table.by_index(u64::MAX).is_none());
    }

    #[test]
    fn sets_parse_from_lowercase_names() {
        assert_eq!("core".parse::<JetSet>().unwrap(), JetSet::Core);
        assert_eq!(JetSet::Elements.name(), "elements");
        assert_eq!(JetSet::default(), JetSet::Elements);
    }
}
