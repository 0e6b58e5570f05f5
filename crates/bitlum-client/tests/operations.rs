//! Operation tests against a recording mock transport
//!
//! Each operation is checked for the request it builds (authentication
//! flag and variables) and for how it interprets the response envelope.

mod common;

use bitlum_client::{Account, ClientError, OrderSide};
use common::*;
use reqwest::StatusCode;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

// =============================================================================
// Envelope handling, shared by all operations
// =============================================================================

#[tokio::test]
async fn test_user_id_when_transport_fails() {
    let transport = MockTransport::failing(StatusCode::INTERNAL_SERVER_ERROR);
    let client = mock_client(&transport);

    let err = client.user_id().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));

    let call = transport.single_call();
    assert!(call.authenticated);
    assert_eq!(call.request.variables, Value::Null);
}

#[tokio::test]
async fn test_user_id_when_invalid_envelope() {
    let transport = MockTransport::responding(INVALID_ENVELOPE);
    let client = mock_client(&transport);

    let err = client.user_id().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
    assert!(err.to_string().starts_with("failed to decode response"));
}

#[tokio::test]
async fn test_user_id_when_exchange_error() {
    let transport = MockTransport::responding(EXCHANGE_ERROR);
    let client = mock_client(&transport);

    let err = client.user_id().await.unwrap_err();
    assert_eq!(err.to_string(), "exchange error: some error");
    assert_eq!(err.exchange_error().unwrap().errors().len(), 1);
}

#[tokio::test]
async fn test_user_id_when_valid_response() {
    let transport = MockTransport::responding(r#"{ "data": { "me": { "id": "some-id" } } }"#);
    let client = mock_client(&transport);

    assert_eq!(client.user_id().await.unwrap(), "some-id");
}

#[tokio::test]
async fn test_accounts_keeps_partial_data() {
    let transport = MockTransport::responding(PARTIAL_ACCOUNTS);
    let client = mock_client(&transport);

    let err = client.accounts(&["BTC", "DASH"]).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "exchange error: asset DASH is not supported, location: 3:5"
    );

    let accounts: Vec<Account> = err.partial_data().expect("partial accounts");
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].asset, "BTC");
    assert_eq!(accounts[0].available, dec!(0.5));
    assert!(accounts[0].pending.transactions.is_empty());

    let call = transport.single_call();
    assert!(call.authenticated);
    assert_eq!(call.request.variables, json!({"assets": ["BTC", "DASH"]}));
}

// =============================================================================
// Market data
// =============================================================================

#[tokio::test]
async fn test_tickers_requires_markets() {
    let transport = MockTransport::responding("{}");
    let client = mock_client(&transport);

    let err = client.tickers(&[]).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidParameter(_)));
    assert!(err.to_string().contains("not empty markets expected"));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_tickers() {
    let transport = MockTransport::responding(
        r#"{"data": {"markets": [
            {"market": "BTCETH", "last": "10", "changeLast": "20"},
            {"market": "BTCDASH", "last": 15, "changeLast": 25}
        ]}}"#,
    );
    let client = mock_client(&transport);

    let tickers = client.tickers(&["BTCETH", "BTCDASH"]).await.unwrap();
    assert_eq!(tickers.len(), 2);
    assert_eq!(tickers[0].market, "BTCETH");
    assert_eq!(tickers[0].last, dec!(10));
    assert_eq!(tickers[1].change_last, dec!(25));

    let call = transport.single_call();
    assert!(!call.authenticated);
    assert_eq!(
        call.request.variables,
        json!({"markets": ["BTCETH", "BTCDASH"]})
    );
}

#[tokio::test]
async fn test_markets_variables() {
    let transport = MockTransport::responding(r#"{"data": {"markets": []}}"#);
    let client = mock_client(&transport);

    let markets = client.markets(&["BTCLTC"], 86400).await.unwrap();
    assert!(markets.is_empty());

    let call = transport.single_call();
    assert!(!call.authenticated);
    assert_eq!(
        call.request.variables,
        json!({"markets": ["BTCLTC"], "period": 86400})
    );
}

#[tokio::test]
async fn test_depth() {
    let transport = MockTransport::responding(
        r#"{"data": {"depth": {
            "asks": [{"price": "0.0301", "volume": "2"}],
            "bids": [{"price": "0.0299", "volume": "1.5"}]
        }}}"#,
    );
    let client = mock_client(&transport);

    let depth = client.depth("BTCETH", 50, 0.00000001).await.unwrap();
    assert_eq!(depth.best_ask().unwrap().price, dec!(0.0301));
    assert_eq!(depth.best_bid().unwrap().volume, dec!(1.5));
    assert_eq!(depth.mid_price(), Some(dec!(0.03)));

    let call = transport.single_call();
    assert!(!call.authenticated);
    assert_eq!(call.request.variables["market"], "BTCETH");
    assert_eq!(call.request.variables["limit"], 50);
}

#[tokio::test]
async fn test_deals_with_null_data() {
    let transport = MockTransport::responding(r#"{"data": {"deals": null}}"#);
    let client = mock_client(&transport);

    let deals = client.deals(&["BTCETH"], 10).await.unwrap();
    assert!(deals.is_empty());
    assert_eq!(
        transport.single_call().request.variables,
        json!({"markets": ["BTCETH"], "limit": 10})
    );
}

#[tokio::test]
async fn test_info_is_public() {
    let transport = MockTransport::responding(
        r#"{"data": {"info": {"network": "testnet", "time": "2018-09-11T10:00:00Z", "lightning": null}}}"#,
    );
    let client = mock_client(&transport);

    let info = client.info().await.unwrap();
    assert_eq!(info.network, "testnet");
    assert!(info.lightning.is_none());
    assert!(!transport.single_call().authenticated);
}

// =============================================================================
// Account and trading
// =============================================================================

#[tokio::test]
async fn test_deposits_variables() {
    let transport = MockTransport::responding(
        r#"{"data": {"balanceUpdateRecords": [
            {"paymentID": "tx1", "paymentType": "blockchain", "change": "0.1", "time": 1536660000.5}
        ]}}"#,
    );
    let client = mock_client(&transport);

    let deposits = client.deposits("BTC", 0, 20).await.unwrap();
    assert_eq!(deposits.len(), 1);
    assert_eq!(deposits[0].payment_id, "tx1");
    assert_eq!(deposits[0].change, dec!(0.1));

    let call = transport.single_call();
    assert!(call.authenticated);
    assert_eq!(
        call.request.variables,
        json!({"assets": ["BTC"], "offset": 0, "limit": 20})
    );
}

#[tokio::test]
async fn test_issue_api_token() {
    let transport = MockTransport::responding(r#"{"data": {"issueApiToken": "new-token"}}"#);
    let client = mock_client(&transport);

    assert_eq!(client.issue_api_token().await.unwrap(), "new-token");
    assert!(transport.single_call().authenticated);
}

#[tokio::test]
async fn test_order() {
    let transport = MockTransport::responding(
        r#"{"data": {"order": {"id": 42, "status": "finished", "amount": "1", "price": "0.03",
            "dealStock": "1", "dealMoney": "0.03"}}}"#,
    );
    let client = mock_client(&transport);

    let order = client.order(42).await.unwrap();
    assert_eq!(order.id, 42);
    assert!(order.is_finished());

    let call = transport.single_call();
    assert!(call.authenticated);
    assert_eq!(call.request.variables, json!({"id": 42}));
}

#[tokio::test]
async fn test_create_order_sides() {
    let body = r#"{"data": {"createMarketOrder": {"id": 7, "status": "finished"}}}"#;

    let cases = [
        (OrderSide::Ask, "ask"),
        (OrderSide::Bid, "bid"),
    ];
    for (side, wire) in cases {
        let transport = MockTransport::responding(body);
        let client = mock_client(&transport);

        let order = match side {
            OrderSide::Ask => client.create_order_ask("BTCETH", dec!(1.5)).await,
            OrderSide::Bid => client.create_order_bid("BTCETH", dec!(1.5)).await,
        }
        .unwrap();
        assert_eq!(order.id, 7);

        let call = transport.single_call();
        assert!(call.authenticated);
        assert!(call.request.query.contains("createMarketOrder"));
        assert_eq!(
            call.request.variables,
            json!({"market": "BTCETH", "amount": "1.5", "side": wire})
        );
    }
}

#[tokio::test]
async fn test_create_order_is_bid() {
    let transport =
        MockTransport::responding(r#"{"data": {"createMarketOrder": {"id": 8}}}"#);
    let client = mock_client(&transport);

    client.create_order("BTCLTC", dec!(0.2)).await.unwrap();
    assert_eq!(transport.single_call().request.variables["side"], "bid");
}

// =============================================================================
// Funding
// =============================================================================

#[tokio::test]
async fn test_withdraw() {
    let transport = MockTransport::responding(
        r#"{"data": {"withdrawWithBlockchain": {"paymentID": "txid", "paymentAddr": "addr", "change": "-0.5"}}}"#,
    );
    let client = mock_client(&transport);

    let withdrawal = client.withdraw("BTC", dec!(0.5), "addr").await.unwrap();
    assert_eq!(withdrawal.payment_id, "txid");
    assert_eq!(withdrawal.change, dec!(-0.5));

    let call = transport.single_call();
    assert!(call.authenticated);
    assert_eq!(
        call.request.variables,
        json!({"asset": "BTC", "amount": "0.5", "address": "addr"})
    );
}

#[tokio::test]
async fn test_lightning_node_reachable_is_public() {
    let transport = MockTransport::responding(r#"{"data": {"checkReachable": true}}"#);
    let client = mock_client(&transport);

    assert!(client.lightning_node_reachable("BTC", "03abcdef").await.unwrap());

    let call = transport.single_call();
    assert!(!call.authenticated);
    assert_eq!(
        call.request.variables,
        json!({"asset": "BTC", "identityKey": "03abcdef"})
    );
}

#[tokio::test]
async fn test_lightning_invoice_and_withdraw() {
    let transport =
        MockTransport::responding(r#"{"data": {"generateLightningInvoice": "lntb1invoice"}}"#);
    let client = mock_client(&transport);

    let invoice = client.lightning_create_invoice("BTC", dec!(0.001)).await.unwrap();
    assert_eq!(invoice, "lntb1invoice");
    assert_eq!(
        transport.single_call().request.variables,
        json!({"asset": "BTC", "amount": "0.001"})
    );

    let transport = MockTransport::responding(
        r#"{"data": {"withdrawWithLightning": {"paymentID": "hash"}}}"#,
    );
    let client = mock_client(&transport);

    let withdrawal = client.lightning_withdraw("BTC", "lntb1invoice").await.unwrap();
    assert_eq!(withdrawal.payment_id, "hash");
    assert!(withdrawal.payment_addr.is_empty());

    let call = transport.single_call();
    assert!(call.authenticated);
    assert_eq!(
        call.request.variables,
        json!({"asset": "BTC", "invoice": "lntb1invoice"})
    );
}
