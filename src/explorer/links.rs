//! Human-facing explorer URLs.

use alloy::primitives::{Address, TxHash};

#[derive(Debug, Clone)]
pub struct ExplorerLinks {
    web_url: String,
}

impl ExplorerLinks {
    pub fn new(web_url: &str) -> Self {
        Self {
            web_url: web_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn tx_url(&self, tx_hash: &TxHash) -> String {
        format!("{}/tx/{}", self.web_url, tx_hash)
    }

    pub fn address_url(&self, address: &Address) -> String {
        format!("{}/address/{}", self.web_url, address.to_checksum(None))
    }
}
