//! Address codec adapters
//!
//! Implements the `AddressCodec` port for the two address spellings the
//! module accepts:
//! - bech32 with the chain's human-readable prefix (`agoric1...`)
//! - `0x`-prefixed hex of a 20-byte account id

use crate::ports::outbound::AddressCodec;
use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use shared_types::{AccAddress, AddressError};

/// Bech32 account addresses with a fixed prefix.
#[derive(Clone, Debug)]
pub struct Bech32AddressCodec {
    hrp: Hrp,
}

impl Bech32AddressCodec {
    /// Create a codec for `prefix`, e.g. `"agoric"`.
    pub fn new(prefix: &str) -> Result<Self, AddressError> {
        let hrp = Hrp::parse(prefix).map_err(|e| AddressError::InvalidEncoding {
            address: prefix.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { hrp })
    }

    pub fn prefix(&self) -> String {
        self.hrp.to_lowercase()
    }
}

impl AddressCodec for Bech32AddressCodec {
    fn decode(&self, address: &str) -> Result<AccAddress, AddressError> {
        if address.trim().is_empty() {
            return Err(AddressError::Empty);
        }

        let checked = CheckedHrpstring::new::<Bech32>(address).map_err(|e| {
            AddressError::InvalidEncoding {
                address: address.to_string(),
                reason: e.to_string(),
            }
        })?;

        let actual = checked.hrp().to_lowercase();
        let expected = self.prefix();
        if actual != expected {
            return Err(AddressError::WrongPrefix { expected, actual });
        }

        let bytes: Vec<u8> = checked.byte_iter().collect();
        let len = bytes.len();
        AccAddress::from_bytes(bytes).ok_or(AddressError::InvalidLength { len })
    }

    fn encode(&self, address: &AccAddress) -> Result<String, AddressError> {
        bech32::encode::<Bech32>(self.hrp, address.as_bytes()).map_err(|e| {
            AddressError::InvalidEncoding {
                address: hex::encode(address.as_bytes()),
                reason: e.to_string(),
            }
        })
    }
}

/// `0x`-prefixed, 20-byte hex account ids.
#[derive(Clone, Copy, Debug, Default)]
pub struct HexAddressCodec;

impl HexAddressCodec {
    /// Account id length in bytes.
    pub const ADDRESS_LEN: usize = 20;
}

impl AddressCodec for HexAddressCodec {
    fn decode(&self, address: &str) -> Result<AccAddress, AddressError> {
        if address.is_empty() {
            return Err(AddressError::Empty);
        }
        let digits = address
            .strip_prefix("0x")
            .or_else(|| address.strip_prefix("0X"))
            .ok_or_else(|| AddressError::InvalidEncoding {
                address: address.to_string(),
                reason: "missing 0x prefix".to_string(),
            })?;

        let bytes = hex::decode(digits).map_err(|e| AddressError::InvalidEncoding {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        if bytes.len() != Self::ADDRESS_LEN {
            return Err(AddressError::InvalidLength { len: bytes.len() });
        }
        AccAddress::from_bytes(bytes).ok_or(AddressError::InvalidLength {
            len: Self::ADDRESS_LEN,
        })
    }

    fn encode(&self, address: &AccAddress) -> Result<String, AddressError> {
        if address.len() != Self::ADDRESS_LEN {
            return Err(AddressError::InvalidLength { len: address.len() });
        }
        Ok(format!("0x{}", hex::encode(address.as_bytes())))
    }
}

/// Codec selected at runtime from configuration.
#[derive(Clone, Debug)]
pub enum AnyAddressCodec {
    Bech32(Bech32AddressCodec),
    Hex(HexAddressCodec),
}

impl AddressCodec for AnyAddressCodec {
    fn decode(&self, address: &str) -> Result<AccAddress, AddressError> {
        match self {
            Self::Bech32(codec) => codec.decode(address),
            Self::Hex(codec) => codec.decode(address),
        }
    }

    fn encode(&self, address: &AccAddress) -> Result<String, AddressError> {
        match self {
            Self::Bech32(codec) => codec.encode(address),
            Self::Hex(codec) => codec.encode(address),
        }
    }
}
