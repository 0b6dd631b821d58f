//! Module configuration from defaults or environment variables.

use crate::adapters::{AnyAddressCodec, Bech32AddressCodec, HexAddressCodec};
use crate::error::{VpurseError, VpurseResult};
use std::env;
use std::str::FromStr;
use tracing::warn;

/// How account addresses are spelled in events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressFormat {
    /// `prefix1...` bech32 strings
    Bech32,
    /// `0x...` hex strings
    Hex,
}

impl FromStr for AddressFormat {
    type Err = VpurseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bech32" => Ok(Self::Bech32),
            "hex" => Ok(Self::Hex),
            other => Err(VpurseError::Config(format!(
                "unknown address format {other:?} (expected bech32 or hex)"
            ))),
        }
    }
}

/// vpurse configuration
#[derive(Clone, Debug)]
pub struct VpurseConfig {
    /// Address spelling used by the chain's events
    pub address_format: AddressFormat,
    /// Human-readable part of bech32 account addresses
    pub bech32_prefix: String,
}

impl Default for VpurseConfig {
    fn default() -> Self {
        Self {
            address_format: AddressFormat::Bech32,
            bech32_prefix: "agoric".to_string(),
        }
    }
}

impl VpurseConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `VPURSE_ADDRESS_FORMAT`: `bech32` or `hex` (default: bech32)
    /// - `VPURSE_BECH32_PREFIX`: account prefix (default: agoric)
    ///
    /// An unparseable address format falls back to the default with a
    /// warning; call [`validate`] before use.
    ///
    /// [`validate`]: VpurseConfig::validate
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            address_format: address_format_or_default(
                env::var("VPURSE_ADDRESS_FORMAT").ok().as_deref(),
                defaults.address_format,
            ),

            bech32_prefix: env::var("VPURSE_BECH32_PREFIX").unwrap_or(defaults.bech32_prefix),
        }
    }

    /// Reject settings the codec cannot work with.
    pub fn validate(&self) -> VpurseResult<()> {
        if self.address_format == AddressFormat::Bech32 {
            if self.bech32_prefix.is_empty() {
                return Err(VpurseError::Config("bech32 prefix is empty".to_string()));
            }
            if self.bech32_prefix.chars().any(|c| c.is_ascii_uppercase()) {
                return Err(VpurseError::Config(format!(
                    "bech32 prefix {:?} must be lower case",
                    self.bech32_prefix
                )));
            }
        }
        Ok(())
    }

    /// Build the configured address codec.
    pub fn address_codec(&self) -> VpurseResult<AnyAddressCodec> {
        self.validate()?;
        match self.address_format {
            AddressFormat::Bech32 => Bech32AddressCodec::new(&self.bech32_prefix)
                .map(AnyAddressCodec::Bech32)
                .map_err(|e| VpurseError::Config(e.to_string())),
            AddressFormat::Hex => Ok(AnyAddressCodec::Hex(HexAddressCodec)),
        }
    }
}

/// Parse an optional format setting, warning when it is present but invalid.
fn address_format_or_default(raw: Option<&str>, default: AddressFormat) -> AddressFormat {
    match raw.map(str::parse::<AddressFormat>) {
        None => default,
        Some(Ok(format)) => format,
        Some(Err(err)) => {
            warn!(
                value = raw.unwrap_or_default(),
                fallback = ?default,
                error = %err,
                "Ignoring VPURSE_ADDRESS_FORMAT"
            );
            default
        }
    }
}
