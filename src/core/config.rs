//! Signer configuration (TOML)
//!
//! Every field has a serde default, so an empty document is a complete configuration.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::errors::{Result, SignerError};

/// Bitcoin address kind used for single-key accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitcoinAddressKind {
    P2pkh,
    P2wpkh,
    P2shP2wpkh,
    P2tr,
}

/// TON wallet contract version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TonWalletVersion {
    V3r2,
    V4r2,
}

/// Bitcoin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitcoinConfig {
    /// "bitcoin" | "testnet" | "signet" | "regtest"
    #[serde(default = "BitcoinConfig::default_network")]
    pub network: String,

    #[serde(default = "BitcoinConfig::default_address_kind")]
    pub address_kind: BitcoinAddressKind,

    #[serde(default = "BitcoinConfig::default_tx_version")]
    pub tx_version: i32,

    #[serde(default = "BitcoinConfig::default_path_template")]
    pub path_template: String,
}

impl BitcoinConfig {
    fn default_network() -> String { "bitcoin".to_string() }
    fn default_address_kind() -> BitcoinAddressKind { BitcoinAddressKind::P2wpkh }
    fn default_tx_version() -> i32 { 2 }
    fn default_path_template() -> String { "m/44'/0'/0'/0/{index}".to_string() }

    /// Parsed network.
    pub fn network(&self) -> Result<bitcoin::Network> {
        bitcoin::Network::from_str(&self.network)
            .map_err(|_| SignerError::Config(format!("unknown bitcoin network: {}", self.network)))
    }
}

impl Default for BitcoinConfig {
    fn default() -> Self {
        Self {
            network: Self::default_network(),
            address_kind: Self::default_address_kind(),
            tx_version: Self::default_tx_version(),
            path_template: Self::default_path_template(),
        }
    }
}

/// Ethereum configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthereumConfig {
    #[serde(default = "EthereumConfig::default_chain_id")]
    pub chain_id: u64,

    #[serde(default = "EthereumConfig::default_path_template")]
    pub path_template: String,
}

impl EthereumConfig {
    fn default_chain_id() -> u64 { 1 }
    fn default_path_template() -> String { "m/44'/60'/0'/0/{index}".to_string() }
}

impl Default for EthereumConfig {
    fn default() -> Self {
        Self {
            chain_id: Self::default_chain_id(),
            path_template: Self::default_path_template(),
        }
    }
}

/// Cosmos configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmosConfig {
    #[serde(default = "CosmosConfig::default_prefix")]
    pub prefix: String,

    #[serde(default = "CosmosConfig::default_denom")]
    pub denom: String,

    #[serde(default = "CosmosConfig::default_decimals")]
    pub decimals: u32,

    #[serde(default = "CosmosConfig::default_path_template")]
    pub path_template: String,
}

impl CosmosConfig {
    fn default_prefix() -> String { "cosmos".to_string() }
    fn default_denom() -> String { "uatom".to_string() }
    fn default_decimals() -> u32 { 6 }
    fn default_path_template() -> String { "m/44'/118'/0'/0/{index}".to_string() }
}

impl Default for CosmosConfig {
    fn default() -> Self {
        Self {
            prefix: Self::default_prefix(),
            denom: Self::default_denom(),
            decimals: Self::default_decimals(),
            path_template: Self::default_path_template(),
        }
    }
}

/// Solana configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolanaConfig {
    #[serde(default = "SolanaConfig::default_path_template")]
    pub path_template: String,

    #[serde(default = "SolanaConfig::default_decimals")]
    pub decimals: u32,
}

impl SolanaConfig {
    fn default_path_template() -> String { "m/44'/501'/0'/{index}'".to_string() }
    fn default_decimals() -> u32 { 9 }
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            path_template: Self::default_path_template(),
            decimals: Self::default_decimals(),
        }
    }
}

/// TON configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TonConfig {
    #[serde(default = "TonConfig::default_wallet_version")]
    pub wallet_version: TonWalletVersion,

    #[serde(default)]
    pub workchain: i8,

    #[serde(default)]
    pub bounceable: bool,

    #[serde(default = "TonConfig::default_url_safe")]
    pub url_safe: bool,

    #[serde(default)]
    pub testnet: bool,

    #[serde(default = "TonConfig::default_decimals")]
    pub decimals: u32,

    #[serde(default = "TonConfig::default_send_mode")]
    pub send_mode: u8,

    #[serde(default = "TonConfig::default_path_template")]
    pub path_template: String,
}

impl TonConfig {
    fn default_wallet_version() -> TonWalletVersion { TonWalletVersion::V4r2 }
    fn default_url_safe() -> bool { true }
    fn default_decimals() -> u32 { 9 }
    fn default_send_mode() -> u8 { 3 }
    fn default_path_template() -> String { "m/44'/607'/1'/{index}'".to_string() }
}

impl Default for TonConfig {
    fn default() -> Self {
        Self {
            wallet_version: Self::default_wallet_version(),
            workchain: 0,
            bounceable: false,
            url_safe: Self::default_url_safe(),
            testnet: false,
            decimals: Self::default_decimals(),
            send_mode: Self::default_send_mode(),
            path_template: Self::default_path_template(),
        }
    }
}

/// signer配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerConfig {
    #[serde(default)]
    pub bitcoin: BitcoinConfig,
    #[serde(default)]
    pub ethereum: EthereumConfig,
    #[serde(default)]
    pub cosmos: CosmosConfig,
    #[serde(default)]
    pub solana: SolanaConfig,
    #[serde(default)]
    pub ton: TonConfig,
}

impl SignerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: SignerConfig = toml::from_str(s)?;
        config.validate()?;
        debug!("✅ signer config parsed");
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("loading signer config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| SignerError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.bitcoin.network()?;
        for (chain, template) in [
            ("bitcoin", &self.bitcoin.path_template),
            ("ethereum", &self.ethereum.path_template),
            ("cosmos", &self.cosmos.path_template),
            ("solana", &self.solana.path_template),
            ("ton", &self.ton.path_template),
        ] {
            if !template.starts_with('m') || !template.contains("{index}") {
                return Err(SignerError::Config(format!(
                    "{} path_template must start with `m` and contain {{index}}: {}",
                    chain, template
                )));
            }
        }
        if self.ethereum.chain_id == 0 {
            return Err(SignerError::Config("ethereum chain_id must be non-zero".to_string()));
        }
        if self.cosmos.prefix.is_empty() || self.cosmos.denom.is_empty() {
            return Err(SignerError::Config("cosmos prefix and denom must be set".to_string()));
        }
        if self.ton.workchain != 0 && self.ton.workchain != -1 {
            return Err(SignerError::Config(format!(
                "ton workchain must be 0 or -1, got {}",
                self.ton.workchain
            )));
        }
        if self.bitcoin.tx_version < 1 {
            return Err(SignerError::Config(format!(
                "bitcoin tx_version must be positive, got {}",
                self.bitcoin.tx_version
            )));
        }
        Ok(())
    }
}
