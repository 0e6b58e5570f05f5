//! Account, balance and deposit types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::de;

/// User on whose behalf exchange operations are performed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Me {
    pub id: String,
    /// Email used at registration, or of the user who requested the macaroon
    pub email: String,
}

/// Blockchain transaction waiting for confirmations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transaction {
    /// Confirmations still required before the funds are enrolled
    pub confirmations_left: i64,
    /// Confirmations already received
    pub confirmations: i64,
    /// Address the funds are sent to
    #[serde(deserialize_with = "de::null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "de::decimal")]
    pub amount: Decimal,
    /// Blockchain transaction ID
    #[serde(rename = "txid")]
    pub tx_id: String,
}

/// Funds awaiting blockchain confirmation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendingInfo {
    #[serde(deserialize_with = "de::decimal")]
    pub amount: Decimal,
    #[serde(deserialize_with = "de::null_as_default")]
    pub transactions: Vec<Transaction>,
}

/// Balance of one asset owned by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// Asset name: BTC, BCH, ETH, LTC, DASH
    pub asset: String,

    /// Deposit address; empty until one has been created
    #[serde(deserialize_with = "de::null_as_default")]
    pub address: String,

    /// Funds usable for trading
    #[serde(deserialize_with = "de::decimal")]
    pub available: Decimal,

    /// Estimated value in dollars
    #[serde(deserialize_with = "de::decimal")]
    pub estimation: Decimal,

    /// Funds currently locked in orders
    #[serde(deserialize_with = "de::decimal")]
    pub freezed: Decimal,

    #[serde(deserialize_with = "de::null_as_default")]
    pub pending: PendingInfo,
}

impl Account {
    /// Available plus frozen funds, `None` on overflow
    pub fn total(&self) -> Option<Decimal> {
        self.available.checked_add(self.freezed)
    }

    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }
}

/// Deposit record from the account balance history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Deposit {
    /// Transaction ID on a blockchain, payment hash in lightning
    #[serde(rename = "paymentID")]
    pub payment_id: String,

    /// Payment system the deposit came through
    pub payment_type: String,

    /// Amount the balance has been changed by
    #[serde(deserialize_with = "de::decimal")]
    pub change: Decimal,

    /// Registration time as a unix timestamp with fractional seconds
    pub time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_with_pending_transactions() {
        let json = r#"{
            "asset": "BTC",
            "address": null,
            "available": "1.5",
            "estimation": "9000",
            "freezed": "0.25",
            "pending": {
                "amount": "0.1",
                "transactions": [{
                    "confirmationsLeft": 2,
                    "confirmations": 1,
                    "address": "2N8hwP1WmJrFF5QWABn38y63uYLhnJYJYTF",
                    "amount": "0.1",
                    "txid": "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16"
                }]
            }
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();

        assert!(!account.has_address());
        assert_eq!(account.total(), Some(dec!(1.75)));
        assert_eq!(account.pending.transactions.len(), 1);
        assert_eq!(account.pending.transactions[0].confirmations_left, 2);
        assert!(account.pending.transactions[0].tx_id.starts_with("f4184f"));
    }

    #[test]
    fn test_account_total_overflow() {
        let account = Account {
            available: Decimal::MAX,
            freezed: dec!(1),
            ..Default::default()
        };
        assert_eq!(account.total(), None);
    }

    #[test]
    fn test_account_without_pending() {
        let account: Account =
            serde_json::from_str(r#"{"asset": "ETH", "address": "0xabc", "pending": null}"#)
                .unwrap();

        assert!(account.has_address());
        assert_eq!(account.pending, PendingInfo::default());
    }

    #[test]
    fn test_deposit_payment_id_field() {
        let json = r#"{"paymentID": "hash", "paymentType": "lightning",
                       "change": "0.002", "time": 1536660000.5}"#;
        let deposit: Deposit = serde_json::from_str(json).unwrap();

        assert_eq!(deposit.payment_id, "hash");
        assert_eq!(deposit.payment_type, "lightning");
        assert_eq!(deposit.change, dec!(0.002));

        let back = serde_json::to_value(&deposit).unwrap();
        assert_eq!(back["paymentID"], "hash");
    }
}
