//! Shared utilities for integration testing.

#![allow(dead_code)]

use alloy::consensus::{SignableTransaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{hex, keccak256, Address, Bytes, TxHash, TxKind, U256};
use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use evm_sweeper::blockchain::{BlockchainError, BlockchainResult, ChainClient, ChainId, Wallet};
use evm_sweeper::resilience::CallContext;

/// Anvil's well-known development keys. Never hold real funds.
pub const ANVIL_KEYS: [&str; 6] = [
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
    "7c852118294e51e653712a81e05800f419141751be58f605c371e15141b007a6",
    "47e179ec197488593b187f80a00eb0da91f1b9d0b13f8733639f19c30a34926a",
    "8b3a350cf5c34c9194ca85829a2df0ec3153be0318b5e2d3348e872092edffba",
];

pub const GWEI_20: u128 = 20_000_000_000;
pub const ONE_FINNEY: u64 = 1_000_000_000_000_000;

pub fn address_of(key: &str) -> Address {
    Wallet::from_private_key(key).unwrap().address()
}

pub fn secret(key: &str) -> SecretString {
    SecretString::from(key.to_string())
}

pub fn receiver() -> Address {
    Address::repeat_byte(0xee)
}

/// Counts concurrent calls; decrements even when the call is cancelled.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, max: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        max.fetch_max(now, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Adapter operations, for call logs and fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    Nonce,
    Balance,
    GasPrice,
    ChainId,
    Broadcast,
}

impl MockOp {
    fn rpc_name(self) -> &'static str {
        match self {
            MockOp::Nonce => "eth_getTransactionCount",
            MockOp::Balance => "eth_getBalance",
            MockOp::GasPrice => "eth_gasPrice",
            MockOp::ChainId => "eth_chainId",
            MockOp::Broadcast => "eth_sendRawTransaction",
        }
    }
}

/// A transaction accepted by the mock node, decoded from its raw bytes.
#[derive(Debug, Clone)]
pub struct BroadcastRecord {
    pub hash: TxHash,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct MockAccount {
    nonce: u64,
    balance: U256,
}

/// In-memory chain with programmable faults and latency.
pub struct MockChain {
    chain_id: u64,
    gas_price: u128,
    accounts: Mutex<HashMap<Address, MockAccount>>,
    failures: Mutex<Vec<(MockOp, Option<Address>)>>,
    panics: Mutex<Vec<(MockOp, Option<Address>)>>,
    delays: Mutex<Vec<(MockOp, Option<Address>, Duration)>>,
    calls: Mutex<Vec<(MockOp, Option<Address>)>>,
    broadcasts: Mutex<Vec<BroadcastRecord>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockChain {
    pub fn new(chain_id: u64, gas_price: u128) -> Self {
        Self {
            chain_id,
            gas_price,
            accounts: Mutex::new(HashMap::new()),
            failures: Mutex::new(Vec::new()),
            panics: Mutex::new(Vec::new()),
            delays: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            broadcasts: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_account(self, address: Address, nonce: u64, balance: U256) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .insert(address, MockAccount { nonce, balance });
        self
    }

    /// Fail `op`, for one account or (with `None`) for everyone.
    pub fn failing(self, op: MockOp, address: Option<Address>) -> Self {
        self.failures.lock().unwrap().push((op, address));
        self
    }

    /// Panic inside `op`, for one account or (with `None`) for everyone.
    pub fn panicking(self, op: MockOp, address: Option<Address>) -> Self {
        self.panics.lock().unwrap().push((op, address));
        self
    }

    /// Delay `op`, for one account or (with `None`) for everyone.
    pub fn delayed(self, op: MockOp, address: Option<Address>, delay: Duration) -> Self {
        self.delays.lock().unwrap().push((op, address, delay));
        self
    }

    pub fn calls(&self) -> Vec<(MockOp, Option<Address>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ops_for(&self, address: Address) -> Vec<MockOp> {
        self.calls()
            .into_iter()
            .filter(|(_, a)| *a == Some(address))
            .map(|(op, _)| op)
            .collect()
    }

    pub fn broadcasts(&self) -> Vec<BroadcastRecord> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub fn balance_of(&self, address: Address) -> U256 {
        self.accounts
            .lock()
            .unwrap()
            .get(&address)
            .map(|a| a.balance)
            .unwrap_or_default()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn matches(target: Option<Address>, address: Option<Address>) -> bool {
        target.is_none() || target == address
    }

    async fn call<T, F>(
        &self,
        op: MockOp,
        address: Option<Address>,
        ctx: &CallContext,
        answer: F,
    ) -> BlockchainResult<T>
    where
        F: FnOnce(&Self) -> BlockchainResult<T> + Send,
        T: Send,
    {
        self.calls.lock().unwrap().push((op, address));

        let delay = self
            .delays
            .lock()
            .unwrap()
            .iter()
            .find(|(o, target, _)| *o == op && Self::matches(*target, address))
            .map(|(_, _, d)| *d);
        let failing = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .any(|(o, target)| *o == op && Self::matches(*target, address));
        let panicking = self
            .panics
            .lock()
            .unwrap()
            .iter()
            .any(|(o, target)| *o == op && Self::matches(*target, address));

        let name = op.rpc_name();
        ctx.guard(name, async move {
            let _in_flight = InFlight::enter(&self.in_flight, &self.max_in_flight);

            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            if panicking {
                panic!("mock node crashed during {name}");
            }
            if failing {
                return Err(match op {
                    MockOp::Broadcast => BlockchainError::Broadcast("replacement transaction underpriced".into()),
                    _ => BlockchainError::Connection {
                        op: name,
                        message: "connection refused".into(),
                    },
                });
            }
            answer(self)
        })
        .await
    }

    fn sender_of(raw_tx: &Bytes) -> Option<Address> {
        let TxEnvelope::Legacy(signed) = TxEnvelope::decode_2718(&mut raw_tx.as_ref()).ok()? else {
            return None;
        };
        signed
            .signature()
            .recover_address_from_prehash(&signed.tx().signature_hash())
            .ok()
    }

    fn accept(&self, raw_tx: &Bytes) -> BlockchainResult<TxHash> {
        let envelope = TxEnvelope::decode_2718(&mut raw_tx.as_ref())
            .map_err(|e| BlockchainError::Broadcast(format!("rlp: {e}")))?;
        let TxEnvelope::Legacy(signed) = envelope else {
            return Err(BlockchainError::Broadcast("unexpected transaction type".into()));
        };

        let tx = signed.tx();
        let from = signed
            .signature()
            .recover_address_from_prehash(&tx.signature_hash())
            .map_err(|e| BlockchainError::Broadcast(format!("invalid sender: {e}")))?;
        let TxKind::Call(to) = tx.to else {
            return Err(BlockchainError::Broadcast("contract creation".into()));
        };
        if tx.chain_id != Some(self.chain_id) {
            return Err(BlockchainError::Broadcast("invalid chain id".into()));
        }

        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.entry(from).or_default();
        if tx.nonce < account.nonce {
            return Err(BlockchainError::Broadcast("nonce too low".into()));
        }
        let cost = tx.value + U256::from(tx.gas_price) * U256::from(tx.gas_limit);
        if cost > account.balance {
            return Err(BlockchainError::Broadcast("insufficient funds for gas * price + value".into()));
        }
        account.balance -= cost;
        account.nonce = tx.nonce + 1;
        accounts.entry(to).or_default().balance += tx.value;
        drop(accounts);

        let hash = *signed.hash();
        self.broadcasts.lock().unwrap().push(BroadcastRecord {
            hash,
            from,
            to,
            value: tx.value,
            nonce: tx.nonce,
            gas_price: tx.gas_price,
            gas_limit: tx.gas_limit,
            chain_id: tx.chain_id,
        });
        Ok(hash)
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn pending_nonce(&self, address: Address, ctx: &CallContext) -> BlockchainResult<u64> {
        self.call(MockOp::Nonce, Some(address), ctx, |chain| {
            Ok(chain
                .accounts
                .lock()
                .unwrap()
                .get(&address)
                .map(|a| a.nonce)
                .unwrap_or_default())
        })
        .await
    }

    async fn balance(&self, address: Address, ctx: &CallContext) -> BlockchainResult<U256> {
        self.call(MockOp::Balance, Some(address), ctx, move |chain| Ok(chain.balance_of(address)))
            .await
    }

    async fn gas_price(&self, ctx: &CallContext) -> BlockchainResult<u128> {
        self.call(MockOp::GasPrice, None, ctx, |chain| Ok(chain.gas_price)).await
    }

    async fn chain_id(&self, ctx: &CallContext) -> BlockchainResult<ChainId> {
        self.call(MockOp::ChainId, None, ctx, |chain| Ok(ChainId(chain.chain_id))).await
    }

    async fn broadcast(&self, raw_tx: Bytes, ctx: &CallContext) -> BlockchainResult<TxHash> {
        let sender = Self::sender_of(&raw_tx);
        self.call(MockOp::Broadcast, sender, ctx, move |chain| chain.accept(&raw_tx))
            .await
    }
}

/// A JSON-RPC node on a local port, answering the calls a sweep makes.
pub struct RpcNode {
    pub addr: SocketAddr,
    methods: Arc<Mutex<Vec<String>>>,
    raw_txs: Arc<Mutex<Vec<Bytes>>>,
}

impl RpcNode {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Methods called so far, in arrival order.
    pub fn methods(&self) -> Vec<String> {
        self.methods.lock().unwrap().clone()
    }

    /// Raw transactions received through `eth_sendRawTransaction`.
    pub fn raw_txs(&self) -> Vec<Bytes> {
        self.raw_txs.lock().unwrap().clone()
    }
}

/// Start a node that serves fixed chain state for `accounts` (address, nonce, balance).
pub async fn start_rpc_node(chain_id: u64, gas_price: u128, accounts: &[(Address, u64, U256)]) -> RpcNode {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state: Arc<HashMap<Address, (u64, U256)>> =
        Arc::new(accounts.iter().map(|(a, n, b)| (*a, (*n, *b))).collect());
    let methods = Arc::new(Mutex::new(Vec::new()));
    let raw_txs = Arc::new(Mutex::new(Vec::new()));

    let (m, r) = (methods.clone(), raw_txs.clone());
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let (state, methods, raw_txs) = (state.clone(), m.clone(), r.clone());
                    tokio::spawn(async move {
                        let _ = serve_rpc(socket, chain_id, gas_price, &state, &methods, &raw_txs).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    RpcNode { addr, methods, raw_txs }
}

async fn serve_rpc(
    mut socket: TcpStream,
    chain_id: u64,
    gas_price: u128,
    state: &HashMap<Address, (u64, U256)>,
    methods: &Mutex<Vec<String>>,
    raw_txs: &Mutex<Vec<Bytes>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let request: Value = serde_json::from_slice(&buf[header_end..]).unwrap_or(Value::Null);
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = &request["params"];
    methods.lock().unwrap().push(method.clone());

    let account = |params: &Value| {
        params[0]
            .as_str()
            .and_then(|a| a.parse::<Address>().ok())
            .and_then(|a| state.get(&a).copied())
            .unwrap_or_default()
    };

    let result = match method.as_str() {
        "eth_chainId" => json!(U256::from(chain_id)),
        "eth_gasPrice" => json!(U256::from(gas_price)),
        "eth_getTransactionCount" => json!(U256::from(account(params).0)),
        "eth_getBalance" => json!(account(params).1),
        "eth_sendRawTransaction" => {
            let raw = Bytes::from(hex::decode(params[0].as_str().unwrap_or_default().trim_start_matches("0x")).unwrap_or_default());
            let hash = keccak256(&raw);
            raw_txs.lock().unwrap().push(raw);
            json!(hash)
        }
        _ => Value::Null,
    };

    let body = json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }).to_string();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}
