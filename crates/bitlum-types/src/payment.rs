//! Withdrawals and lightning network node information

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::de;

/// Account withdrawal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Withdrawal {
    /// Transaction ID on a blockchain, payment hash in lightning
    #[serde(rename = "paymentID")]
    pub payment_id: String,

    /// Receiver address on a blockchain; empty for lightning payments
    #[serde(deserialize_with = "de::null_as_default")]
    pub payment_addr: String,

    /// Amount the balance has been changed by
    #[serde(deserialize_with = "de::decimal")]
    pub change: Decimal,
}

/// Exchange lightning network node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LightningNodeInfo {
    /// Public host accepting incoming peer connections
    pub host: String,

    /// Public port accepting incoming peer connections
    pub port: String,

    /// Smallest payment the node supports
    #[serde(deserialize_with = "de::decimal")]
    pub min_amount: Decimal,

    /// Largest payment the node supports
    #[serde(deserialize_with = "de::decimal")]
    pub max_amount: Decimal,

    /// Identity public key of the node in the network
    pub identity_pubkey: String,

    /// Public name shown by network explorers
    pub alias: String,

    pub num_pending_channels: u32,
    pub num_active_channels: u32,
    pub num_peers: u32,

    /// Height of the best block known to the node
    pub block_height: u32,

    /// Hash of the best block known to the node
    pub block_hash: String,

    /// Whether the lightning wallet is synced to the chain
    pub synced_to_chain: bool,

    /// Currency the node operates with
    pub asset: String,
}

impl LightningNodeInfo {
    /// `pubkey@host:port` as accepted by `lncli connect`
    pub fn uri(&self) -> String {
        format!("{}@{}:{}", self.identity_pubkey, self.host, self.port)
    }
}

/// General service state and configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Info {
    /// Blockchain network the service runs on
    pub network: String,

    /// Server time
    pub time: String,

    /// Lightning node of the service, when one is configured
    pub lightning: Option<LightningNodeInfo>,
}
