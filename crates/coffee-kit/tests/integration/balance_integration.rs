//! Balance reads against a local node.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use alloy_primitives::Address;
use coffee_kit::*;

use crate::helpers::*;

fn account_json(balance: &str) -> String {
    format!(r#"{{"balance":"{balance}","energy":"0x0","hasCode":false}}"#)
}

#[tokio::test]
async fn test_native_balance() {
    let node = MockNode::start(|request| {
        assert_eq!(request.method, "GET");
        (200, account_json("0xde0b6b3a7640000"))
    })
    .await;
    let coffee = Coffee::custom(node.url()).build();

    let balance = coffee.balance(account()).await.unwrap();
    assert_eq!(balance.to_string(), "1 VET");
    assert_eq!(node.hits(&format!("/accounts/{}", account())), 1);
}

#[tokio::test]
async fn test_token_balance_via_balance_of() {
    let node = MockNode::start(|request| {
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/accounts/*");
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        let data = body["clauses"][0]["data"].as_str().unwrap();
        assert!(data.starts_with("0x70a08231"));
        (
            200,
            serde_json::json!([{
                "data": abi_word(500_000),
                "events": [],
                "transfers": [],
                "gasUsed": 591,
                "reverted": false,
                "vmError": ""
            }])
            .to_string(),
        )
    })
    .await;
    let coffee = Coffee::custom(node.url()).build();
    let usdc = Token::new(Address::repeat_byte(0x55), "USDC", "USD Coin", 6).unwrap();

    let balance = coffee.balance(account()).token(usdc.clone()).await.unwrap();
    assert_eq!(balance.format_amount(), "0.5");
    assert_eq!(balance.symbol(), "USDC");

    assert_eq!(
        coffee.read_balance(account(), Some(&usdc)).await.unwrap(),
        "0.5"
    );
}

#[tokio::test]
async fn test_reverted_balance_call_is_error() {
    let node = MockNode::start(|_| {
        (
            200,
            r#"[{"data":"0x","events":[],"transfers":[],"gasUsed":0,"reverted":true,"vmError":"execution reverted"}]"#
                .to_string(),
        )
    })
    .await;
    let coffee = Coffee::custom(node.url()).build();

    let err = coffee.balance(account()).token(b3tr()).await.unwrap_err();
    match err {
        Error::Rpc(RpcError::CallReverted { contract, message }) => {
            assert_eq!(contract, b3tr().address);
            assert_eq!(message, "execution reverted");
        }
        other => panic!("Expected CallReverted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let calls = Arc::new(AtomicUsize::new(0));
    let node = MockNode::start({
        let calls = calls.clone();
        move |_| match calls.fetch_add(1, Ordering::SeqCst) {
            0 => (503, "unavailable".to_string()),
            1 => (429, "slow down".to_string()),
            _ => (200, account_json("0x1bc16d674ec80000")),
        }
    })
    .await;
    let coffee = Coffee::custom(node.url()).retry_config(fast_retries(3)).build();

    let balance = coffee.balance(account()).await.unwrap();
    assert_eq!(balance.format_amount(), "2");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let node = MockNode::start(|_| (400, "bad address".to_string())).await;
    let coffee = Coffee::custom(node.url()).retry_config(fast_retries(3)).build();

    let err = coffee.balance(account()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Rpc(RpcError::Network { status_code: Some(400), retryable: false, .. })
    ));
    assert_eq!(node.requests().len(), 1);
}

#[tokio::test]
async fn test_form_balance_keeps_last_value_and_fills_max() {
    let calls = Arc::new(AtomicUsize::new(0));
    let node = MockNode::start({
        let calls = calls.clone();
        move |_| match calls.fetch_add(1, Ordering::SeqCst) {
            0 => (200, account_json("0x14d1120d7b160000")),
            _ => (500, "boom".to_string()),
        }
    })
    .await;
    let coffee = Coffee::custom(node.url())
        .retry_config(fast_retries(0))
        .recipient(RECIPIENT)
        .unwrap()
        .session(MockSession::connected(account(), vec![]))
        .build();
    let mut form = CoffeeForm::new(coffee);

    assert_eq!(form.balance(), "0");
    assert_eq!(form.refresh_balance().await, Some("1.5"));
    assert_eq!(form.refresh_balance().await, Some("1.5"));

    form.use_max_amount();
    assert_eq!(form.amount(), "1.5");
    assert_eq!(form.send_label(), "send 1.5 VET");
}

#[tokio::test]
async fn test_form_without_wallet_reads_nothing() {
    let node = MockNode::start(|_| (200, account_json("0x1"))).await;
    let coffee = Coffee::custom(node.url()).build();
    let mut form = CoffeeForm::new(coffee);

    assert_eq!(form.refresh_balance().await, None);
    assert!(node.requests().is_empty());
}
