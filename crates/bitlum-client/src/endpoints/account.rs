//! Account endpoints
//!
//! These endpoints require authentication.

use bitlum_types::{Account, Deposit, Me};
use serde::Serialize;
use tracing::{debug, instrument};

use super::perform;
use crate::envelope::Request;
use crate::error::ClientResult;
use crate::transport::Transport;

const ME_QUERY: &str = r#"
query Me {
  me {
    id
    email
  }
}
"#;

const USER_ID_QUERY: &str = r#"
query Me {
  me {
    id
  }
}
"#;

const ACCOUNTS_QUERY: &str = r#"
query Accounts($assets: [Asset!]!) {
  accounts(assets: $assets) {
    asset
    address
    available
    estimation
    freezed
    pending {
      amount
      transactions {
        confirmationsLeft
        confirmations
        address
        amount
        txid
      }
    }
  }
}
"#;

const DEPOSITS_QUERY: &str = r#"
query GetBalanceUpdates($assets: [Asset!]!, $offset: Int!, $limit: Int!) {
  balanceUpdateRecords(assets: $assets, offset: $offset, recordTypes: deposit, limit: $limit) {
    ... on Deposit {
      change
      time
      paymentID
      paymentType
    }
  }
}
"#;

const ISSUE_API_TOKEN_QUERY: &str = "query { issueApiToken }";

#[derive(Serialize)]
struct AccountsVariables<'a> {
    assets: &'a [&'a str],
}

#[derive(Serialize)]
struct DepositsVariables<'a> {
    assets: [&'a str; 1],
    offset: i64,
    limit: i64,
}

/// Account endpoints
pub struct AccountEndpoints<'a> {
    transport: &'a dyn Transport,
}

impl<'a> AccountEndpoints<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Get the user on whose behalf requests are made
    #[instrument(skip(self))]
    pub async fn me(&self) -> ClientResult<Me> {
        debug!("Fetching current user");

        let request = Request::without_variables(ME_QUERY);
        perform(self.transport, true, &request, "me").await
    }

    /// Get the ID of the user on whose behalf requests are made
    #[instrument(skip(self))]
    pub async fn user_id(&self) -> ClientResult<String> {
        let request = Request::without_variables(USER_ID_QUERY);
        let me: Me = perform(self.transport, true, &request, "me").await?;
        Ok(me.id)
    }

    /// Get balances of the given assets
    ///
    /// On an exchange error the accounts the server did return are
    /// available through [`ClientError::partial_data`](crate::ClientError::partial_data).
    #[instrument(skip(self))]
    pub async fn accounts(&self, assets: &[&str]) -> ClientResult<Vec<Account>> {
        debug!("Fetching {} accounts", assets.len());

        let request = Request::new(ACCOUNTS_QUERY, &AccountsVariables { assets })?;
        perform(self.transport, true, &request, "accounts").await
    }

    /// Get deposit history of an asset, newest first
    ///
    /// # Arguments
    /// * `asset` - Asset (e.g., "BTC")
    /// * `offset` - Number of records to skip
    /// * `limit` - Maximum number of records to return
    #[instrument(skip(self))]
    pub async fn deposits(&self, asset: &str, offset: i64, limit: i64) -> ClientResult<Vec<Deposit>> {
        debug!("Fetching deposits for {}", asset);

        let request = Request::new(
            DEPOSITS_QUERY,
            &DepositsVariables {
                assets: [asset],
                offset,
                limit,
            },
        )?;
        perform(self.transport, true, &request, "balanceUpdateRecords").await
    }

    /// Issue a long-lived API token for the user
    #[instrument(skip(self))]
    pub async fn issue_api_token(&self) -> ClientResult<String> {
        debug!("Issuing API token");

        let request = Request::without_variables(ISSUE_API_TOKEN_QUERY);
        perform(self.transport, true, &request, "issueApiToken").await
    }
}
