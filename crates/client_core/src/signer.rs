//! Wallet signer capability. The session holds exactly one signer; a missing
//! wallet is modeled as a signer that reports itself unavailable.

use async_trait::async_trait;
use ed25519_dalek::{Signer as _, SigningKey};
use rand::rngs::OsRng;
use shared::{domain::Address, error::TransactionError};

#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Public identity that owns purchases and listings made by this wallet.
    fn identity(&self) -> Address;

    /// Whether a wallet is actually connected. Session preconditions check
    /// this before any chain interaction is attempted.
    fn is_available(&self) -> bool {
        true
    }

    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, TransactionError>;
}

/// Placeholder used before a wallet is connected.
pub struct MissingWalletSigner;

#[async_trait]
impl WalletSigner for MissingWalletSigner {
    fn identity(&self) -> Address {
        Address::new([0u8; 32])
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn sign(&self, _message: &[u8]) -> Result<Vec<u8>, TransactionError> {
        Err(TransactionError::SigningRejected(
            "no wallet connected".into(),
        ))
    }
}

/// In-process ed25519 wallet, used by the demo app and tests.
pub struct LocalKeypairSigner {
    key: SigningKey,
}

impl LocalKeypairSigner {
    pub fn generate() -> Self {
        Self {
            key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_bytes(seed: [u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(&seed),
        }
    }
}

#[async_trait]
impl WalletSigner for LocalKeypairSigner {
    fn identity(&self) -> Address {
        Address::new(self.key.verifying_key().to_bytes())
    }

    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, TransactionError> {
        Ok(self.key.sign(message).to_bytes().to_vec())
    }
}

/// Fresh single-use keypair backing a new listing or mint identity. Signs the
/// same payload the wallet signs; discarded after submission.
pub(crate) struct EphemeralKeypair {
    key: SigningKey,
}

impl EphemeralKeypair {
    pub(crate) fn generate() -> Self {
        Self {
            key: SigningKey::generate(&mut OsRng),
        }
    }

    pub(crate) fn address(&self) -> Address {
        Address::new(self.key.verifying_key().to_bytes())
    }

    pub(crate) fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.key.sign(message).to_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_signer_identity_is_stable() {
        let signer = LocalKeypairSigner::from_bytes([9u8; 32]);
        assert_eq!(signer.identity(), signer.identity());
        assert!(signer.is_available());
        let signature = signer.sign(b"payload").await.unwrap();
        assert_eq!(signature.len(), 64);
    }

    #[tokio::test]
    async fn missing_signer_rejects_signing() {
        let signer = MissingWalletSigner;
        assert!(!signer.is_available());
        assert!(matches!(
            signer.sign(b"payload").await,
            Err(TransactionError::SigningRejected(_))
        ));
    }

    #[test]
    fn ephemeral_keypairs_are_unique() {
        assert_ne!(
            EphemeralKeypair::generate().address(),
            EphemeralKeypair::generate().address()
        );
    }
}
