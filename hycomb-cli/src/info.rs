use base64::{Engine, engine::general_purpose::STANDARD};
use hycomb::{
    Cmr, DecodeOptions, Program,
    address::{AddressEncoder, Network},
};
use log::debug;
use serde::Serialize;

use crate::{
    address::Bech32mEncoder,
    error::{CliError, InputEncoding},
};

#[derive(Debug, Serialize)]
pub struct ProgramInfo {
    pub jets: &'static str,
    pub commit_base64: String,
    pub commit_decode: String,
    pub type_arrow: String,
    pub cmr: Cmr,
    pub liquid_address_unconf: String,
    pub liquid_testnet_address_unconf: String,
    pub elements_regtest_address_unconf: String,
    pub is_jet: bool,
    pub is_redeem: bool,
}

/// Decode `text` as base64, falling back to hex.
///
/// When neither decodes to a valid program, the error of the first encoding
/// that at least produced bytes is returned.
pub fn parse_program(text: &str, options: &DecodeOptions) -> Result<Program, CliError> {
    let text = text.trim();
    let mut first_error = None;

    for encoding in [InputEncoding::Base64, InputEncoding::Hex] {
        let bytes = match encoding {
            InputEncoding::Base64 => STANDARD.decode(text).ok(),
            InputEncoding::Hex => hex::decode(text).ok(),
        };
        let Some(bytes) = bytes else { continue };

        match Program::decode_with(&bytes, options) {
            Ok(program) => {
                debug!("decoded program from {encoding:?} input");
                return Ok(program);
            }
            Err(source) => {
                debug!("{encoding:?} input does not decode: {source}");
                first_error.get_or_insert(CliError::Decode { source, encoding });
            }
        }
    }

    Err(first_error.unwrap_or(CliError::InvalidEncoding))
}

pub fn program_info(program: &Program, max_display: usize) -> Result<ProgramInfo, CliError> {
    let cmr = program.cmr();
    let address = |network: Network| {
        Bech32mEncoder
            .encode_address(&cmr, network.hrp())
            .map_err(|message| CliError::Address {
                network: network.to_string(),
                message,
            })
    };

    Ok(ProgramInfo {
        jets: program.jet_set().name(),
        commit_base64: STANDARD.encode(program.encode()),
        commit_decode: program.display_expr(max_display),
        type_arrow: program.type_arrow(),
        cmr,
        liquid_address_unconf: address(Network::Liquid)?,
        liquid_testnet_address_unconf: address(Network::LiquidTestnet)?,
        elements_regtest_address_unconf: address(Network::ElementsRegtest)?,
        is_jet: program.is_jet_recognized(),
        is_redeem: program.is_redeem(),
    })
}
