use hycomb::DecodeError;
use thiserror::Error;

/// Where the program bytes came from, for pointing back into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEncoding {
    Base64,
    Hex,
}

impl InputEncoding {
    /// Bits carried by one input character.
    pub fn bits_per_char(self) -> usize {
        match self {
            InputEncoding::Base64 => 6,
            InputEncoding::Hex => 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("program is neither valid base64 nor valid hex")]
    InvalidEncoding,

    #[error("{source}")]
    Decode {
        source: DecodeError,
        encoding: InputEncoding,
    },

    #[error("cannot encode {network} address: {message}")]
    Address { network: String, message: String },

    #[error("cannot serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot serialize output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
