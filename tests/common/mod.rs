//! Shared utilities for integration testing.
//!
//! `MockNode` answers the JSON-RPC subset the console uses and models a
//! lottery contract with a fixed participant list. `start_mock_explorer`
//! serves the explorer's `eth_getTransactionByHash` proxy endpoint.

#![allow(dead_code)]

use alloy::consensus::TxEnvelope;
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{keccak256, Address, Bytes, U256};
use alloy::sol_types::{SolCall, SolEvent};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use lottery_console::config::ConsoleConfig;
use lottery_console::lottery::contract::ILottery;
use lottery_console::{HttpServer, Shutdown};

/// Anvil's first dev account.
pub const MANAGER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const MANAGER_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
/// Anvil's second dev account.
pub const OTHER_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub const CONTRACT_ADDRESS: &str = "0xcbA756ADbDD00cD47F56E2691711567FE0725d97";
pub const KNOWN_TX: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

/// In-memory chain state behind the mock JSON-RPC endpoint.
#[derive(Clone)]
pub struct MockNode {
    pub participants: Arc<Mutex<Vec<Address>>>,
    pub manager: Address,
    pub nonce: Arc<AtomicU64>,
    pub sent: Arc<Mutex<Vec<Bytes>>>,
    pub winners: Arc<Mutex<Vec<(Address, U256)>>>,
    /// Added to every JSON-RPC response, to model a slow node.
    pub delay_ms: Arc<AtomicU64>,
}

impl MockNode {
    pub fn new(participants: usize) -> Self {
        Self {
            participants: Arc::new(Mutex::new(
                (1..=participants as u8).map(Address::repeat_byte).collect(),
            )),
            manager: MANAGER_ADDRESS.parse().unwrap(),
            nonce: Arc::new(AtomicU64::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
            winners: Arc::new(Mutex::new(Vec::new())),
            delay_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Decode the `index`th raw transaction the node received.
    pub fn sent_tx(&self, index: usize) -> TxEnvelope {
        let raw = self.sent.lock().unwrap()[index].clone();
        TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap()
    }

    fn answer(&self, request: &Value) -> Value {
        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let method = request["method"].as_str().unwrap_or_default();
        let params = request.get("params").cloned().unwrap_or(Value::Null);

        let result = match method {
            "eth_chainId" => Ok(json!("0x7a69")),
            "eth_blockNumber" => Ok(json!("0x64")),
            "eth_gasPrice" => Ok(json!("0x3b9aca00")),
            "eth_getTransactionCount" => {
                Ok(json!(format!("{:#x}", self.nonce.load(Ordering::SeqCst))))
            }
            "eth_call" => self.call(&params[0]),
            "eth_getLogs" => Ok(self.logs()),
            "eth_sendRawTransaction" => {
                let raw: Bytes = params[0].as_str().unwrap_or("0x").parse().unwrap();
                let hash = keccak256(&raw);
                self.sent.lock().unwrap().push(raw);
                self.nonce.fetch_add(1, Ordering::SeqCst);
                Ok(json!(hash))
            }
            _ => Err(json!({"code": -32601, "message": "method not found"})),
        };

        match result {
            Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
            Err(error) => json!({"jsonrpc": "2.0", "id": id, "error": error}),
        }
    }

    fn call(&self, tx: &Value) -> Result<Value, Value> {
        let input = tx
            .get("input")
            .or_else(|| tx.get("data"))
            .and_then(Value::as_str)
            .unwrap_or("0x");
        let data: Bytes = input.parse().unwrap();
        let selector: [u8; 4] = data[..4].try_into().unwrap();
        let participants = self.participants.lock().unwrap().clone();

        let words: Vec<[u8; 32]> = if selector == ILottery::managerCall::SELECTOR {
            vec![address_word(self.manager)]
        } else if selector == ILottery::getContractBalanceCall::SELECTOR
            || selector == ILottery::getBalanceCall::SELECTOR
        {
            let balance = U256::from(10_000_000_000_000u64) * U256::from(participants.len());
            vec![balance.to_be_bytes::<32>()]
        } else if selector == ILottery::randomCall::SELECTOR {
            vec![U256::from(424242).to_be_bytes::<32>()]
        } else if selector == ILottery::participantsCall::SELECTOR {
            let index = U256::from_be_slice(&data[4..36]);
            if index >= U256::from(participants.len()) {
                return Err(json!({"code": 3, "message": "execution reverted", "data": "0x"}));
            }
            vec![address_word(participants[index.to::<usize>()])]
        } else if selector == ILottery::getPlayersCall::SELECTOR {
            let mut words = vec![
                U256::from(32).to_be_bytes::<32>(),
                U256::from(participants.len()).to_be_bytes::<32>(),
            ];
            words.extend(participants.iter().copied().map(address_word));
            words
        } else {
            return Err(json!({"code": 3, "message": "execution reverted", "data": "0x"}));
        };

        Ok(json!(alloy::hex::encode_prefixed(words.concat())))
    }

    fn logs(&self) -> Value {
        let contract: Address = CONTRACT_ADDRESS.parse().unwrap();
        let winners = self.winners.lock().unwrap();
        let logs: Vec<Value> = winners
            .iter()
            .enumerate()
            .map(|(i, (winner, amount))| {
                json!({
                    "address": contract,
                    "topics": [
                        ILottery::WinnerSelected::SIGNATURE_HASH,
                        alloy::hex::encode_prefixed(address_word(*winner)),
                    ],
                    "data": alloy::hex::encode_prefixed(amount.to_be_bytes::<32>()),
                    "blockNumber": format!("{:#x}", 90 + i),
                    "blockHash": alloy::hex::encode_prefixed([0x0b; 32]),
                    "transactionHash": alloy::hex::encode_prefixed([i as u8 + 1; 32]),
                    "transactionIndex": "0x0",
                    "logIndex": "0x0",
                    "removed": false,
                })
            })
            .collect();
        json!(logs)
    }
}

fn address_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}

async fn rpc(State(node): State<MockNode>, Json(request): Json<Value>) -> Json<Value> {
    let delay = node.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    match request {
        Value::Array(batch) => Json(Value::Array(batch.iter().map(|r| node.answer(r)).collect())),
        single => Json(node.answer(&single)),
    }
}

/// Start a mock JSON-RPC node, returning its URL.
pub async fn start_mock_node(node: MockNode) -> String {
    let app = Router::new().route("/", post(rpc)).with_state(node);
    format!("http://{}", serve(app).await)
}

async fn explorer_api(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let hash = query.get("txhash").map(|h| h.to_lowercase()).unwrap_or_default();
    let result = if hash == KNOWN_TX {
        json!({"hash": KNOWN_TX, "nonce": "0x1", "value": "0x9184e72a000"})
    } else {
        Value::Null
    };
    Json(json!({"jsonrpc": "2.0", "id": 1, "result": result}))
}

/// Start a mock explorer API, returning the `api_url` to configure.
pub async fn start_mock_explorer() -> String {
    let app = Router::new().route("/api", get(explorer_api));
    format!("http://{}/api", serve(app).await)
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

pub fn test_config(rpc_url: &str, explorer_url: &str) -> ConsoleConfig {
    let mut config = ConsoleConfig::default();
    config.blockchain.rpc_url = rpc_url.to_string();
    config.blockchain.chain_id = 31337;
    config.blockchain.rpc_timeout_secs = 2;
    config.lottery.contract_address = CONTRACT_ADDRESS.to_string();
    config.explorer.api_url = explorer_url.to_string();
    config
}

/// A running console wired to mock dependencies.
pub struct TestConsole {
    pub url: String,
    pub node: MockNode,
    pub http: reqwest::Client,
    // Dropping the coordinator closes the channel and stops the server.
    _shutdown: Shutdown,
}

impl TestConsole {
    pub async fn start(participants: usize) -> Self {
        Self::start_with(MockNode::new(participants), |_| {}).await
    }

    /// Start against `node`, letting the caller adjust the config first.
    pub async fn start_with(node: MockNode, tweak: impl FnOnce(&mut ConsoleConfig)) -> Self {
        let rpc_url = start_mock_node(node.clone()).await;
        let explorer_url = start_mock_explorer().await;

        let mut config = test_config(&rpc_url, &explorer_url);
        tweak(&mut config);
        let server = HttpServer::from_config(config).await.unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let shutdown = Shutdown::new();
        let receiver = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, receiver).await;
        });

        Self {
            url,
            node,
            http: reqwest::Client::builder().no_proxy().build().unwrap(),
            _shutdown: shutdown,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }
}
