//! Chain access capability: fetch listing records and submit signed
//! operations. Ships an HTTP client for a real node endpoint, an in-process
//! simulator for the demo app and tests, and a missing-backend placeholder.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use shared::{
    domain::Address,
    error::TransactionError,
    protocol::{
        DropInstruction, DropListing, SignedTransaction, TransactionSignature,
        MAX_COMMISSION_BPS,
    },
};
use tokio::sync::Mutex;
use tracing::debug;

#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Current listing record, or `None` when no account exists at `address`.
    async fn fetch_listing(
        &self,
        address: Address,
    ) -> Result<Option<DropListing>, TransactionError>;

    /// Submits one signed operation and waits for confirmation.
    async fn submit(
        &self,
        transaction: SignedTransaction,
    ) -> Result<TransactionSignature, TransactionError>;
}

/// Placeholder used before an endpoint is configured.
pub struct MissingChainRpc;

#[async_trait]
impl ChainRpc for MissingChainRpc {
    async fn fetch_listing(
        &self,
        _address: Address,
    ) -> Result<Option<DropListing>, TransactionError> {
        Err(TransactionError::Network(
            "chain backend is unavailable".into(),
        ))
    }

    async fn submit(
        &self,
        _transaction: SignedTransaction,
    ) -> Result<TransactionSignature, TransactionError> {
        Err(TransactionError::Network(
            "chain backend is unavailable".into(),
        ))
    }
}

#[derive(serde::Deserialize)]
struct SubmitResponse {
    signature: String,
}

/// JSON client against a node gateway exposing `GET /listings/{address}` and
/// `POST /transactions`.
pub struct HttpChainRpc {
    http: Client,
    endpoint: String,
}

impl HttpChainRpc {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ChainRpc for HttpChainRpc {
    async fn fetch_listing(
        &self,
        address: Address,
    ) -> Result<Option<DropListing>, TransactionError> {
        let response = self
            .http
            .get(format!("{}/listings/{address}", self.endpoint))
            .send()
            .await
            .map_err(|e| TransactionError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .map_err(|e| TransactionError::Network(e.to_string()))?;
        let listing = response
            .json::<DropListing>()
            .await
            .map_err(|e| TransactionError::Network(e.to_string()))?;
        Ok(Some(listing))
    }

    async fn submit(
        &self,
        transaction: SignedTransaction,
    ) -> Result<TransactionSignature, TransactionError> {
        let response = self
            .http
            .post(format!("{}/transactions", self.endpoint))
            .json(&transaction)
            .send()
            .await
            .map_err(|e| TransactionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            // 4xx means the node simulated/executed and rejected the
            // operation; anything else is transport-level.
            if status.is_client_error() {
                return Err(TransactionError::Execution(detail));
            }
            return Err(TransactionError::Network(format!("{status}: {detail}")));
        }

        let body = response
            .json::<SubmitResponse>()
            .await
            .map_err(|e| TransactionError::Network(e.to_string()))?;
        Ok(TransactionSignature(body.signature))
    }
}

/// In-process stand-in for the drop program: registers listings and flips the
/// sold flag atomically on purchase. The client core never validates program
/// rules itself; this exists so the demo app and tests have a network to talk
/// to.
#[derive(Default)]
pub struct InMemoryChain {
    state: Mutex<InMemoryChainState>,
}

#[derive(Default)]
struct InMemoryChainState {
    listings: HashMap<Address, DropListing>,
    submitted: u64,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    fn verify_signatures(transaction: &SignedTransaction) -> Result<(), TransactionError> {
        if transaction.signatures.is_empty() {
            return Err(TransactionError::Execution(
                "transaction carries no signatures".into(),
            ));
        }
        for entry in &transaction.signatures {
            let decoded = STANDARD
                .decode(&entry.signature_b64)
                .map_err(|_| TransactionError::Execution("malformed signature".into()))?;
            if decoded.len() != 64 {
                return Err(TransactionError::Execution("malformed signature".into()));
            }
        }
        for account in &transaction.request.accounts {
            if account.is_signer
                && !transaction
                    .signatures
                    .iter()
                    .any(|entry| entry.signer == account.address)
            {
                return Err(TransactionError::Execution(format!(
                    "missing signature for account {}",
                    account.address
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ChainRpc for InMemoryChain {
    async fn fetch_listing(
        &self,
        address: Address,
    ) -> Result<Option<DropListing>, TransactionError> {
        Ok(self.state.lock().await.listings.get(&address).cloned())
    }

    async fn submit(
        &self,
        transaction: SignedTransaction,
    ) -> Result<TransactionSignature, TransactionError> {
        Self::verify_signatures(&transaction)?;

        let mut state = self.state.lock().await;
        match &transaction.request.instruction {
            DropInstruction::CreateDrop {
                price,
                commission_bps,
                metadata_uri,
            } => {
                if *commission_bps > MAX_COMMISSION_BPS {
                    return Err(TransactionError::Execution(
                        "commission basis points must be <= 10000".into(),
                    ));
                }
                let [drop_account, seller_account, ..] = transaction.request.accounts.as_slice()
                else {
                    return Err(TransactionError::Execution(
                        "create_drop requires drop and seller accounts".into(),
                    ));
                };
                if state.listings.contains_key(&drop_account.address) {
                    return Err(TransactionError::Execution(format!(
                        "account {} already in use",
                        drop_account.address
                    )));
                }
                state.listings.insert(
                    drop_account.address,
                    DropListing {
                        seller: seller_account.address,
                        price: *price,
                        commission_bps: *commission_bps,
                        metadata_uri: metadata_uri.clone(),
                        sold: false,
                    },
                );
                debug!(listing = %drop_account.address, "sim: listing registered");
            }
            DropInstruction::BuyDrop { price } => {
                let Some(drop_account) = transaction.request.accounts.first() else {
                    return Err(TransactionError::Execution(
                        "buy_drop requires the drop account".into(),
                    ));
                };
                let listing = state
                    .listings
                    .get_mut(&drop_account.address)
                    .ok_or_else(|| {
                        TransactionError::Execution(format!(
                            "no listing at {}",
                            drop_account.address
                        ))
                    })?;
                if listing.sold {
                    return Err(TransactionError::Execution(format!(
                        "listing {} already sold",
                        drop_account.address
                    )));
                }
                if listing.price != *price {
                    return Err(TransactionError::Execution(
                        "payment amount does not match the drop price".into(),
                    ));
                }
                listing.sold = true;
                debug!(listing = %drop_account.address, "sim: listing sold");
            }
        }

        state.submitted += 1;
        Ok(TransactionSignature(format!("sim-{}", state.submitted)))
    }
}

#[cfg(test)]
#[path = "tests/rpc_tests.rs"]
mod tests;
