//! Receipt polling through the client, against fakes and a local node.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use coffee_kit::*;
use tokio_test::{assert_pending, assert_ready};

use crate::helpers::*;

const RECEIPT_JSON: &str = r#"{
    "gasUsed": 21000,
    "gasPayer": "0x7567d83b7b8d80addcb281a71d54fc7b3364ffed",
    "paid": "0x1236efcbcbb340000",
    "reward": "0x576e189f04f60000",
    "reverted": false,
    "meta": {
        "blockID": "0x0004f6cc88bb4626a92907718e82f255b8fa511453a78e8797eb8cea3393b215",
        "blockNumber": 325324,
        "blockTimestamp": 1533267900,
        "txID": "0x0101010101010101010101010101010101010101010101010101010101010101",
        "txOrigin": "0x7567d83b7b8d80addcb281a71d54fc7b3364ffed"
    },
    "outputs": []
}"#;

// =============================================================================
// Scripted source
// =============================================================================

#[tokio::test]
async fn test_watch_null_polls_then_revert() {
    let receipts = ScriptedReceipts::new();
    receipts.script(
        txid(1),
        vec![Ok(None), Ok(None), Ok(None), Ok(Some(Receipt::new(true)))],
    );
    let coffee = offline_coffee(MockSession::disconnected(), receipts.clone());

    let watcher = coffee.watch(txid(1));
    assert_eq!(watcher.state(), PollState::Pending(txid(1)));

    let state = watcher.wait().await;
    assert!(matches!(state, PollState::Reverted { .. }));
    assert_eq!(receipts.polls(txid(1)), 4);

    // Terminal: the task ends and polling stops
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert!(watcher.is_finished());
    assert_eq!(receipts.polls(txid(1)), 4);
}

#[tokio::test]
async fn test_poll_errors_keep_pending() {
    let receipts = ScriptedReceipts::new();
    receipts.script(
        txid(2),
        vec![
            Err(RpcError::network("HTTP 502", Some(502), true).into()),
            Err(RpcError::Timeout(4).into()),
            Ok(Some(Receipt::new(false))),
        ],
    );
    let coffee = offline_coffee(MockSession::disconnected(), receipts);

    let mut poller = coffee.poller();
    poller.track(txid(2));
    assert_eq!(poller.step().await, &PollState::Pending(txid(2)));
    assert_eq!(poller.step().await, &PollState::Pending(txid(2)));
    assert!(matches!(poller.step().await, PollState::Confirmed { .. }));
}

#[tokio::test]
async fn test_budget_exhaustion_expires() {
    let receipts = ScriptedReceipts::new();
    let coffee = Coffee::custom("http://127.0.0.1:9")
        .receipt_source(receipts.clone())
        .clock(Arc::new(InstantClock::default()))
        .poll_policy(PollPolicy::default().with_max_attempts(5))
        .build();

    let state = coffee.watch(txid(3)).wait().await;
    assert_eq!(state, PollState::Expired(txid(3)));
    assert_eq!(state.status_text(), "Transaction Expired");
    assert_eq!(receipts.polls(txid(3)), 5);
}

#[tokio::test]
async fn test_subscribers_see_last_state_between_polls() {
    let receipts = ScriptedReceipts::new();
    receipts.script(txid(4), vec![Ok(None), Ok(Some(Receipt::new(false)))]);
    let coffee = offline_coffee(MockSession::disconnected(), receipts);

    let watcher = coffee.watch(txid(4));
    let mut rx = watcher.subscribe();
    assert_eq!(*rx.borrow_and_update(), PollState::Pending(txid(4)));

    // Null polls publish nothing new; the next change is the terminal state
    rx.changed().await.unwrap();
    assert!(matches!(*rx.borrow(), PollState::Confirmed { .. }));
}

#[tokio::test]
async fn test_wait_pending_until_mined_and_cancel() {
    let receipts = ScriptedReceipts::new();
    let coffee = Coffee::custom("http://127.0.0.1:9")
        .receipt_source(receipts.clone())
        .clock(Arc::new(InstantClock::default()))
        .poll_policy(PollPolicy::unbounded())
        .build();

    let watcher = coffee.watch(txid(5));
    {
        let mut wait = tokio_test::task::spawn(watcher.wait());
        assert_pending!(wait.poll());

        watcher.cancel();
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        let state = assert_ready!(wait.poll());
        assert_eq!(state, PollState::Pending(txid(5)));
    }

    let polls = receipts.polls(txid(5));
    tokio::task::yield_now().await;
    assert_eq!(receipts.polls(txid(5)), polls);
}

// =============================================================================
// Node-backed source
// =============================================================================

#[tokio::test]
async fn test_watch_against_node_receipt_endpoint() {
    let calls = Arc::new(AtomicUsize::new(0));
    let node = MockNode::start({
        let calls = calls.clone();
        move |request| {
            assert_eq!(request.method, "GET");
            match calls.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => (200, "null".to_string()),
                2 => (503, "busy".to_string()),
                _ => (200, RECEIPT_JSON.to_string()),
            }
        }
    })
    .await;

    let coffee = Coffee::custom(node.url())
        .retry_config(fast_retries(0))
        .clock(Arc::new(InstantClock::default()))
        .build();

    let state = coffee.watch(txid(1)).wait().await;
    let receipt = state.receipt().cloned().unwrap();
    assert!(matches!(state, PollState::Confirmed { .. }));
    assert_eq!(receipt.gas_used, 21000);
    assert_eq!(receipt.meta.block_number, 325324);
    assert_eq!(receipt.meta.tx_id, txid(1));

    let path = format!("/transactions/{}/receipt", txid(1));
    assert_eq!(node.hits(&path), 4);
}

#[tokio::test]
async fn test_single_receipt_fetch() {
    let node = MockNode::start(|_| (200, "null".to_string())).await;
    let coffee = Coffee::custom(node.url()).build();
    assert_eq!(coffee.receipt(txid(9)).await.unwrap(), None);
}
