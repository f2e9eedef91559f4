//! In-process stand-ins for the wallet, the node and the clock.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{Address, B256};
use coffee_kit::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const RECIPIENT: &str = "0x7567d83b7b8d80addcb281a71d54fc7b3364ffed";
pub const B3TR: &str = "0x5ef79995fe8a89e0812330e4378eb2660cede699";

pub fn recipient() -> Address {
    RECIPIENT.parse().unwrap()
}

pub fn account() -> Address {
    Address::repeat_byte(0xaa)
}

pub fn txid(byte: u8) -> TxId {
    TxId::new(B256::repeat_byte(byte))
}

pub fn b3tr() -> Token {
    Token::new(B3TR.parse().unwrap(), "B3TR", "B3TR", 18).unwrap()
}

pub fn e18(n: u64) -> alloy_primitives::U256 {
    alloy_primitives::U256::from(n) * alloy_primitives::U256::from(10u8).pow(alloy_primitives::U256::from(18u8))
}

// =============================================================================
// Wallet
// =============================================================================

/// Wallet that records every request and hands out scripted tx ids.
#[derive(Clone)]
pub struct MockSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    account: Option<Address>,
    answer_as: Option<Address>,
    txids: Mutex<VecDeque<TxId>>,
    requests: Mutex<Vec<SignRequest>>,
    reject: Option<String>,
}

impl MockSession {
    pub fn connected(account: Address, txids: Vec<TxId>) -> Self {
        Self::build(Some(account), None, txids, None)
    }

    pub fn disconnected() -> Self {
        Self::build(None, None, Vec::new(), None)
    }

    /// Signs with `other` regardless of the requested signer.
    pub fn impostor(account: Address, other: Address) -> Self {
        Self::build(Some(account), Some(other), vec![txid(0xee)], None)
    }

    pub fn rejecting(account: Address, reason: &str) -> Self {
        Self::build(Some(account), None, Vec::new(), Some(reason.to_string()))
    }

    fn build(
        account: Option<Address>,
        answer_as: Option<Address>,
        txids: Vec<TxId>,
        reject: Option<String>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                account,
                answer_as,
                txids: Mutex::new(txids.into()),
                requests: Mutex::new(Vec::new()),
                reject,
            }),
        }
    }

    pub fn requests(&self) -> Vec<SignRequest> {
        self.inner.requests.lock().unwrap().clone()
    }
}

impl WalletSession for MockSession {
    fn connected_account(&self) -> Option<Address> {
        self.inner.account
    }

    fn sign(&self, request: SignRequest) -> SignFuture<'_> {
        Box::pin(async move {
            let signer = self.inner.answer_as.unwrap_or(request.signer);
            self.inner.requests.lock().unwrap().push(request);
            if let Some(reason) = &self.inner.reject {
                return Err(SignerError::Rejected(reason.clone()));
            }
            let txid = self
                .inner
                .txids
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| SignerError::Failed("out of tx ids".to_string()))?;
            Ok(SignResponse { txid, signer })
        })
    }
}

// =============================================================================
// Receipts & clock
// =============================================================================

/// Receipt source scripted per transaction id. Unscripted polls see `null`.
#[derive(Default)]
pub struct ScriptedReceipts {
    scripts: Mutex<HashMap<TxId, VecDeque<Result<Option<Receipt>, Error>>>>,
    polls: Mutex<HashMap<TxId, usize>>,
}

impl ScriptedReceipts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, txid: TxId, answers: Vec<Result<Option<Receipt>, Error>>) {
        self.scripts.lock().unwrap().insert(txid, answers.into());
    }

    pub fn polls(&self, txid: TxId) -> usize {
        self.polls.lock().unwrap().get(&txid).copied().unwrap_or(0)
    }
}

impl ReceiptSource for ScriptedReceipts {
    fn receipt(&self, txid: TxId) -> coffee_kit::client::ReceiptFuture<'_> {
        *self.polls.lock().unwrap().entry(txid).or_default() += 1;
        let answer = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&txid)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Ok(None));
        Box::pin(async move { answer })
    }
}

/// Clock whose sleeps only yield to the scheduler.
#[derive(Default)]
pub struct InstantClock {
    pub sleeps: AtomicUsize,
}

impl Clock for InstantClock {
    fn sleep(&self, _duration: Duration) -> coffee_kit::client::SleepFuture<'_> {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        Box::pin(tokio::task::yield_now())
    }
}

/// A coffee client wired to in-process fakes.
pub fn offline_coffee(session: MockSession, receipts: Arc<ScriptedReceipts>) -> Coffee {
    Coffee::custom("http://127.0.0.1:9")
        .recipient(RECIPIENT)
        .unwrap()
        .session(session)
        .registry(TokenRegistry::from_tokens(vec![b3tr()]))
        .receipt_source(receipts)
        .clock(Arc::new(InstantClock::default()))
        .build()
}

// =============================================================================
// Node
// =============================================================================

/// A request received by [`MockNode`].
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Minimal HTTP/1.1 responder standing in for a Thor node.
///
/// Paths are lowercased before reaching the handler.
pub struct MockNode {
    url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    task: JoinHandle<()>,
}

impl MockNode {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handler = Arc::new(handler);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let task = tokio::spawn({
            let requests = requests.clone();
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let handler = handler.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let _ = serve(stream, handler.as_ref(), &requests).await;
                    });
                }
            }
        });

        Self {
            url,
            requests,
            task,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.path == path.to_lowercase())
            .count()
    }
}

impl Drop for MockNode {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve<F>(
    mut stream: TcpStream,
    handler: &F,
    requests: &Mutex<Vec<Recorded>>,
) -> std::io::Result<()>
where
    F: Fn(&Recorded) -> (u16, String),
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.split_whitespace();
    let request = Recorded {
        method: request_line.next().unwrap_or_default().to_string(),
        path: request_line.next().unwrap_or_default().to_lowercase(),
        body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
    };

    let (status, body) = handler(&request);
    requests.lock().unwrap().push(request);

    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// 32-byte big-endian ABI word for `value`, as `0x` hex.
pub fn abi_word(value: u64) -> String {
    format!("0x{value:064x}")
}

/// Retry settings that keep failing tests fast.
pub fn fast_retries(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        initial_delay_ms: 1,
        max_delay_ms: 5,
    }
}
