//! Block-explorer API client (Etherscan-compatible proxy module).

use alloy::primitives::TxHash;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::ExplorerConfig;
use crate::explorer::hash::validate_tx_hash;
use crate::explorer::ExplorerError;
use crate::observability::metrics;

/// Result of a transaction lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "transaction", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// The explorer's raw transaction object.
    Found(Value),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http: reqwest::Client,
    config: ExplorerConfig,
}

impl ExplorerClient {
    pub fn new(config: ExplorerConfig) -> Result<Self, ExplorerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Validate `input` and look the transaction up.
    pub async fn lookup(&self, input: &str) -> Result<LookupOutcome, ExplorerError> {
        let result = match validate_tx_hash(input) {
            Ok(tx_hash) => self.lookup_hash(tx_hash).await,
            Err(e) => Err(e),
        };
        metrics::record_action("lookup", result.is_ok());
        result
    }

    async fn lookup_hash(&self, tx_hash: TxHash) -> Result<LookupOutcome, ExplorerError> {
        let tx_hash = tx_hash.to_string();
        let mut query = vec![
            ("module", "proxy"),
            ("action", "eth_getTransactionByHash"),
            ("txhash", tx_hash.as_str()),
        ];
        if !self.config.api_key.is_empty() {
            query.push(("apikey", self.config.api_key.as_str()));
        }

        tracing::debug!(tx_hash = %tx_hash, "Explorer lookup");
        let response = self
            .http
            .get(&self.config.api_url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;

        interpret(body)
    }
}

/// Map an explorer response body to an outcome.
fn interpret(mut body: Value) -> Result<LookupOutcome, ExplorerError> {
    if let Some(error) = body.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ExplorerError::Api(message));
    }

    match body.get_mut("result").map(Value::take) {
        Some(Value::Null) => Ok(LookupOutcome::NotFound),
        Some(tx @ Value::Object(_)) => Ok(LookupOutcome::Found(tx)),
        Some(Value::String(message)) => Err(ExplorerError::Api(message)),
        Some(other) => Err(ExplorerError::Api(format!("unexpected result: {}", other))),
        None => Err(ExplorerError::Api("response has no result".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interpret_found() {
        let body = json!({"jsonrpc": "2.0", "id": 1, "result": {"hash": "0xab", "nonce": "0x1"}});
        assert_eq!(
            interpret(body).unwrap(),
            LookupOutcome::Found(json!({"hash": "0xab", "nonce": "0x1"}))
        );
    }

    #[test]
    fn test_interpret_not_found() {
        let body = json!({"jsonrpc": "2.0", "id": 1, "result": null});
        assert_eq!(interpret(body).unwrap(), LookupOutcome::NotFound);
    }

    #[test]
    fn test_interpret_api_errors() {
        let body = json!({"status": "0", "message": "NOTOK", "result": "Invalid API Key"});
        assert!(matches!(interpret(body), Err(ExplorerError::Api(m)) if m == "Invalid API Key"));

        let body = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32602, "message": "invalid argument"}});
        assert!(matches!(interpret(body), Err(ExplorerError::Api(m)) if m == "invalid argument"));

        assert!(interpret(json!({})).is_err());
    }

    #[tokio::test]
    async fn test_invalid_hash_never_hits_network() {
        let client = ExplorerClient::new(ExplorerConfig {
            api_url: "http://127.0.0.1:9/api".to_string(),
            ..ExplorerConfig::default()
        })
        .unwrap();
        let err = client.lookup("0x1234").await.unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidHash(_)));
    }

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(
            serde_json::to_value(LookupOutcome::NotFound).unwrap(),
            json!({"status": "not_found"})
        );
    }
}
