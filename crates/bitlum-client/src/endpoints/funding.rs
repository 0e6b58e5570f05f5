//! Funding endpoints for blockchain and lightning payments

use bitlum_types::{Decimal, Withdrawal};
use serde::Serialize;
use tracing::{debug, instrument};

use super::perform;
use crate::envelope::Request;
use crate::error::ClientResult;
use crate::transport::Transport;

const WITHDRAW_MUTATION: &str = r#"
mutation Withdraw($asset: Asset!, $amount: String!, $address: String!) {
  withdrawWithBlockchain(asset: $asset, amount: $amount, address: $address) {
    ... on Withdrawal {
      paymentID
      paymentAddr
      change
    }
  }
}
"#;

const CHECK_REACHABLE_QUERY: &str = r#"
query CheckReachable($asset: Asset!, $identityKey: String!) {
  checkReachable(asset: $asset, identityKey: $identityKey)
}
"#;

const CREATE_INVOICE_MUTATION: &str = r#"
mutation GenerateLightningInvoice($asset: Asset!, $amount: String!) {
  generateLightningInvoice(asset: $asset, amount: $amount)
}
"#;

const LIGHTNING_WITHDRAW_MUTATION: &str = r#"
mutation Withdraw($asset: Asset!, $invoice: String!) {
  withdrawWithLightning(asset: $asset, invoice: $invoice) {
    ... on Withdrawal {
      paymentID
    }
  }
}
"#;

#[derive(Serialize)]
struct WithdrawVariables<'a> {
    asset: &'a str,
    amount: Decimal,
    address: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReachableVariables<'a> {
    asset: &'a str,
    identity_key: &'a str,
}

#[derive(Serialize)]
struct CreateInvoiceVariables<'a> {
    asset: &'a str,
    amount: Decimal,
}

#[derive(Serialize)]
struct LightningWithdrawVariables<'a> {
    asset: &'a str,
    invoice: &'a str,
}

/// Funding endpoints
///
/// Withdrawals and invoices require authentication; the reachability
/// check is public.
pub struct FundingEndpoints<'a> {
    transport: &'a dyn Transport,
}

impl<'a> FundingEndpoints<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Withdraw funds to a blockchain address
    ///
    /// # Arguments
    /// * `asset` - Asset to withdraw (e.g., "BTC")
    /// * `amount` - Amount to withdraw
    /// * `address` - Receiver address
    #[instrument(skip(self))]
    pub async fn withdraw(
        &self,
        asset: &str,
        amount: Decimal,
        address: &str,
    ) -> ClientResult<Withdrawal> {
        debug!("Withdrawing {} {} via blockchain", amount, asset);

        let request = Request::new(
            WITHDRAW_MUTATION,
            &WithdrawVariables {
                asset,
                amount,
                address,
            },
        )?;
        perform(self.transport, true, &request, "withdrawWithBlockchain").await
    }

    /// Check that a lightning node can be reached from the exchange's node
    #[instrument(skip(self))]
    pub async fn lightning_node_reachable(
        &self,
        asset: &str,
        identity_pubkey: &str,
    ) -> ClientResult<bool> {
        let request = Request::new(
            CHECK_REACHABLE_QUERY,
            &ReachableVariables {
                asset,
                identity_key: identity_pubkey,
            },
        )?;
        perform(self.transport, false, &request, "checkReachable").await
    }

    /// Create a lightning invoice that deposits `amount` when paid
    #[instrument(skip(self))]
    pub async fn lightning_create_invoice(
        &self,
        asset: &str,
        amount: Decimal,
    ) -> ClientResult<String> {
        debug!("Creating lightning invoice for {} {}", amount, asset);

        let request = Request::new(CREATE_INVOICE_MUTATION, &CreateInvoiceVariables { asset, amount })?;
        perform(self.transport, true, &request, "generateLightningInvoice").await
    }

    /// Withdraw funds by paying a lightning invoice
    #[instrument(skip(self, invoice))]
    pub async fn lightning_withdraw(&self, asset: &str, invoice: &str) -> ClientResult<Withdrawal> {
        debug!("Paying lightning invoice in {}", asset);

        let request = Request::new(
            LIGHTNING_WITHDRAW_MUTATION,
            &LightningWithdrawVariables { asset, invoice },
        )?;
        perform(self.transport, true, &request, "withdrawWithLightning").await
    }
}
