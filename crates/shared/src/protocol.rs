//! Wire types for the drop program: instruction payloads, account lists, and
//! the client-side view of the on-chain listing record.

use serde::{Deserialize, Serialize};

use crate::domain::Address;

/// Fixed price for every listing, in minor currency units.
pub const DROP_PRICE_LAMPORTS: u64 = 100_000_000;
/// Fixed commission rate for every listing, in basis points.
pub const DROP_COMMISSION_BPS: u16 = 500;
/// Upper bound the program enforces on commission rates.
pub const MAX_COMMISSION_BPS: u16 = 10_000;

pub const DROP_PROGRAM_ID: Address = Address::from_tag(b"solstyle/drop-program/v1");
pub const SYSTEM_PROGRAM_ID: Address = Address::from_tag(b"system-program");
pub const TOKEN_PROGRAM_ID: Address = Address::from_tag(b"token-program");
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Address = Address::from_tag(b"associated-token-program");
pub const TOKEN_METADATA_PROGRAM_ID: Address = Address::from_tag(b"token-metadata-program");
pub const RENT_SYSVAR_ID: Address = Address::from_tag(b"sysvar-rent");

/// On-chain listing record as the client reads it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropListing {
    pub seller: Address,
    pub price: u64,
    pub commission_bps: u16,
    pub metadata_uri: String,
    pub sold: bool,
}

/// The two operations the drop program exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DropInstruction {
    CreateDrop {
        price: u64,
        commission_bps: u16,
        metadata_uri: String,
    },
    BuyDrop {
        price: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    pub address: Address,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn signer(address: Address, is_writable: bool) -> Self {
        Self {
            address,
            is_signer: true,
            is_writable,
        }
    }

    pub fn readonly(address: Address) -> Self {
        Self {
            address,
            is_signer: false,
            is_writable: false,
        }
    }

    pub fn writable(address: Address) -> Self {
        Self {
            address,
            is_signer: false,
            is_writable: true,
        }
    }
}

/// One unsigned operation destined for the drop program. Account order is
/// significant and must match what the program declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub program_id: Address,
    pub instruction: DropInstruction,
    pub accounts: Vec<AccountMeta>,
    pub fee_payer: Address,
}

impl TransactionRequest {
    /// Canonical bytes every required signer signs over.
    pub fn signing_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    pub signer: Address,
    pub signature_b64: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub request: TransactionRequest,
    pub signatures: Vec<SignatureEntry>,
}

/// Confirmation identifier reported by the network for a submitted operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_payload_is_deterministic() {
        let request = TransactionRequest {
            program_id: DROP_PROGRAM_ID,
            instruction: DropInstruction::BuyDrop {
                price: DROP_PRICE_LAMPORTS,
            },
            accounts: vec![AccountMeta::signer(Address::new([1u8; 32]), true)],
            fee_payer: Address::new([1u8; 32]),
        };
        assert_eq!(
            request.signing_payload().unwrap(),
            request.signing_payload().unwrap()
        );
    }

    #[test]
    fn instruction_serde_round_trip() {
        let instruction = DropInstruction::CreateDrop {
            price: DROP_PRICE_LAMPORTS,
            commission_bps: DROP_COMMISSION_BPS,
            metadata_uri: "ipfs://outfit".into(),
        };
        let json = serde_json::to_string(&instruction).unwrap();
        assert_eq!(
            serde_json::from_str::<DropInstruction>(&json).unwrap(),
            instruction
        );
    }
}
