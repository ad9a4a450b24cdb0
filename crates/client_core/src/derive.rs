//! Deterministic address derivation. Pure functions of their inputs: the same
//! seeds and program id always produce the same address, which is what makes
//! retries and third-party verification safe.

use sha2::{Digest, Sha256};
use shared::{
    domain::Address,
    error::AddressDeriveError,
    protocol::{ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID},
};

/// Longest seed accepted by the derivation scheme.
pub const MAX_SEED_LEN: usize = 32;

const DERIVE_DOMAIN_TAG: &[u8] = b"solstyle/derived-address/v1";

/// Hashes length-prefixed seeds followed by the program id under a fixed
/// domain tag. Rejects empty seed lists, empty seeds, and over-long seeds.
pub fn derive_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<Address, AddressDeriveError> {
    if seeds.is_empty() {
        return Err(AddressDeriveError::InvalidInput(
            "at least one seed is required".into(),
        ));
    }

    let mut hasher = Sha256::new();
    for seed in seeds {
        if seed.is_empty() {
            return Err(AddressDeriveError::InvalidInput("empty seed".into()));
        }
        if seed.len() > MAX_SEED_LEN {
            return Err(AddressDeriveError::InvalidInput(format!(
                "seed length {} exceeds maximum {MAX_SEED_LEN}",
                seed.len()
            )));
        }
        hasher.update([seed.len() as u8]);
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(DERIVE_DOMAIN_TAG);

    Ok(Address::new(hasher.finalize().into()))
}

/// Mint authority held by the drop program.
pub fn derive_authority(program_id: &Address) -> Result<Address, AddressDeriveError> {
    derive_address(&[b"authority"], program_id)
}

/// Account binding an owner identity to a specific token mint.
pub fn derive_associated_account(
    owner: &Address,
    mint: &Address,
) -> Result<Address, AddressDeriveError> {
    derive_address(
        &[
            owner.as_bytes(),
            TOKEN_PROGRAM_ID.as_bytes(),
            mint.as_bytes(),
        ],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
}

/// Metadata account owned by the token metadata program for a mint.
pub fn derive_metadata(
    metadata_program_id: &Address,
    mint: &Address,
) -> Result<Address, AddressDeriveError> {
    derive_address(
        &[
            b"metadata",
            metadata_program_id.as_bytes(),
            mint.as_bytes(),
        ],
        metadata_program_id,
    )
}

#[cfg(test)]
#[path = "tests/derive_tests.rs"]
mod tests;
