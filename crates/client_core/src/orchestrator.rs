//! Builds, signs, and submits the two drop-program operations. At most one
//! operation may be in flight at a time; overlapping calls are rejected with
//! `Busy` rather than queued.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::{
    domain::Address,
    error::TransactionError,
    protocol::{
        AccountMeta, DropInstruction, SignatureEntry, SignedTransaction, TransactionRequest,
        TransactionSignature, ASSOCIATED_TOKEN_PROGRAM_ID, DROP_PROGRAM_ID, MAX_COMMISSION_BPS,
        RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID,
    },
};
use tracing::{info, warn};

use crate::{
    derive::{derive_associated_account, derive_authority, derive_metadata},
    rpc::ChainRpc,
    signer::{EphemeralKeypair, WalletSigner},
};

/// Everything a successful purchase produced, for the order record.
#[derive(Debug, Clone)]
pub struct PurchaseReceipt {
    pub listing: Address,
    pub mint: Address,
    pub token_account: Address,
    pub seller: Address,
    pub metadata_uri: String,
    pub signature: TransactionSignature,
}

pub struct TransactionOrchestrator {
    rpc: Arc<dyn ChainRpc>,
    signer: Arc<dyn WalletSigner>,
    program_id: Address,
    metadata_program_id: Address,
    in_flight: AtomicBool,
}

/// Releases the busy flag on every exit path, including panics.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TransactionOrchestrator {
    pub fn new(rpc: Arc<dyn ChainRpc>, signer: Arc<dyn WalletSigner>) -> Self {
        Self {
            rpc,
            signer,
            program_id: DROP_PROGRAM_ID,
            metadata_program_id: TOKEN_METADATA_PROGRAM_ID,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn signer_available(&self) -> bool {
        self.signer.is_available()
    }

    pub fn signer_identity(&self) -> Address {
        self.signer.identity()
    }

    fn claim_flight(&self) -> Result<FlightGuard<'_>, TransactionError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("orchestrator: rejected overlapping chain operation");
            return Err(TransactionError::Busy);
        }
        Ok(FlightGuard(&self.in_flight))
    }

    async fn sign_and_submit(
        &self,
        request: TransactionRequest,
        extra_signers: &[&EphemeralKeypair],
    ) -> Result<TransactionSignature, TransactionError> {
        let payload = request
            .signing_payload()
            .map_err(|e| TransactionError::InvalidInput(e.to_string()))?;

        let wallet_signature = self.signer.sign(&payload).await?;
        let mut signatures = vec![SignatureEntry {
            signer: self.signer.identity(),
            signature_b64: STANDARD.encode(wallet_signature),
        }];
        for keypair in extra_signers {
            signatures.push(SignatureEntry {
                signer: keypair.address(),
                signature_b64: STANDARD.encode(keypair.sign(&payload)),
            });
        }

        self.rpc
            .submit(SignedTransaction {
                request,
                signatures,
            })
            .await
    }

    /// Registers a new listing at a freshly generated address. No local state
    /// changes on failure; the listing keypair is simply discarded.
    pub async fn create_listing(
        &self,
        price: u64,
        commission_bps: u16,
        asset_uri: &str,
    ) -> Result<Address, TransactionError> {
        let _flight = self.claim_flight()?;

        if commission_bps > MAX_COMMISSION_BPS {
            return Err(TransactionError::InvalidInput(format!(
                "commission {commission_bps} exceeds {MAX_COMMISSION_BPS} basis points"
            )));
        }
        if asset_uri.is_empty() {
            return Err(TransactionError::InvalidInput(
                "asset uri must not be empty".into(),
            ));
        }

        let listing = EphemeralKeypair::generate();
        let seller = self.signer.identity();
        let request = TransactionRequest {
            program_id: self.program_id,
            instruction: DropInstruction::CreateDrop {
                price,
                commission_bps,
                metadata_uri: asset_uri.to_string(),
            },
            accounts: vec![
                AccountMeta::signer(listing.address(), true),
                AccountMeta::signer(seller, true),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID),
            ],
            fee_payer: seller,
        };

        let signature = self.sign_and_submit(request, &[&listing]).await?;
        info!(
            listing = %listing.address(),
            confirmation = %signature.0,
            price,
            commission_bps,
            "orchestrator: listing created"
        );
        Ok(listing.address())
    }

    /// Purchases a listed drop. The listing record is fetched first so a
    /// missing or sold listing fails before anything is signed; the sold flag
    /// flips network-side within the same submitted operation.
    pub async fn purchase(
        &self,
        listing_address: Address,
        expected_price: u64,
    ) -> Result<PurchaseReceipt, TransactionError> {
        let _flight = self.claim_flight()?;

        let record = self
            .rpc
            .fetch_listing(listing_address)
            .await?
            .ok_or(TransactionError::NotFound(listing_address))?;
        if record.sold {
            return Err(TransactionError::AlreadySold(listing_address));
        }
        if record.price != expected_price {
            return Err(TransactionError::PriceMismatch {
                expected: expected_price,
                actual: record.price,
            });
        }

        let buyer = self.signer.identity();
        let mint = EphemeralKeypair::generate();

        // Later derivations depend on the mint identity; the order here is
        // fixed: authority, then buyer token account, then metadata.
        let authority = derive_authority(&self.program_id)?;
        let buyer_token_account = derive_associated_account(&buyer, &mint.address())?;
        let metadata = derive_metadata(&self.metadata_program_id, &mint.address())?;

        // The commission recipient is the buyer wallet itself.
        let commission_recipient = buyer;

        let request = TransactionRequest {
            program_id: self.program_id,
            instruction: DropInstruction::BuyDrop {
                price: expected_price,
            },
            accounts: vec![
                AccountMeta::writable(listing_address),
                AccountMeta::signer(buyer, true),
                AccountMeta::writable(record.seller),
                AccountMeta::writable(commission_recipient),
                AccountMeta::signer(mint.address(), true),
                AccountMeta::writable(buyer_token_account),
                AccountMeta::readonly(authority),
                AccountMeta::writable(metadata),
                AccountMeta::readonly(RENT_SYSVAR_ID),
                AccountMeta::readonly(TOKEN_PROGRAM_ID),
                AccountMeta::readonly(TOKEN_METADATA_PROGRAM_ID),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID),
                AccountMeta::readonly(ASSOCIATED_TOKEN_PROGRAM_ID),
            ],
            fee_payer: buyer,
        };

        let signature = self.sign_and_submit(request, &[&mint]).await?;
        info!(
            listing = %listing_address,
            mint = %mint.address(),
            confirmation = %signature.0,
            "orchestrator: purchase confirmed"
        );
        Ok(PurchaseReceipt {
            listing: listing_address,
            mint: mint.address(),
            token_account: buyer_token_account,
            seller: record.seller,
            metadata_uri: record.metadata_uri,
            signature,
        })
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
