use bech32::{Hrp, segwit};
use hycomb::{Cmr, address::{AddressEncoder, tap_leaf_hash}};

/// Segwit v1 (bech32m) address paying to a tap tree whose only leaf is the
/// program.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bech32mEncoder;

impl AddressEncoder for Bech32mEncoder {
    type Error = String;

    fn encode_address(&self, cmr: &Cmr, hrp: &str) -> Result<String, String> {
        let hrp = Hrp::parse(hrp).map_err(|e| e.to_string())?;
        segwit::encode_v1(hrp, &tap_leaf_hash(cmr)).map_err(|e| e.to_string())
    }
}
