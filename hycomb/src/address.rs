//! Address derivation seam.
//!
//! The core computes what an address commits to; turning that into text
//! (bech32m or otherwise) is the job of an [`AddressEncoder`].
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use sha2::Digest;
use strum::{Display, EnumIter};

use crate::commit::{Cmr, tagged_engine};

/// Leaf version of programs committed to in a tap tree.
pub const LEAF_VERSION: u8 = 0xbe;

const TAP_LEAF_TAG: &str = "TapLeaf/elements";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Network {
    Liquid,
    LiquidTestnet,
    ElementsRegtest,
}

impl Network {
    /// Human-readable prefix of segwit addresses on this network.
    pub fn hrp(self) -> &'static str {
        match self {
            Network::Liquid => "ex",
            Network::LiquidTestnet => "tex",
            Network::ElementsRegtest => "ert",
        }
    }
}

/// Renders the commitment of a program as an address of some network.
pub trait AddressEncoder {
    type Error;

    fn encode_address(&self, cmr: &Cmr, hrp: &str) -> Result<String, Self::Error>;
}

/// Tagged tap-leaf hash of a single-leaf script tree holding the program.
pub fn tap_leaf_hash(cmr: &Cmr) -> [u8; 32] {
    let mut engine = tagged_engine(TAP_LEAF_TAG);
    engine.update([LEAF_VERSION, 32]);
    engine.update(cmr.as_bytes());
    engine.finalize().into()
}
