use shared::protocol::{DROP_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID};

use super::*;

#[test]
fn authority_is_identical_across_invocations() {
    let first = derive_authority(&DROP_PROGRAM_ID).unwrap();
    let second = derive_authority(&DROP_PROGRAM_ID).unwrap();
    assert_eq!(first, second);
}

#[test]
fn different_programs_yield_different_authorities() {
    let drop_authority = derive_authority(&DROP_PROGRAM_ID).unwrap();
    let metadata_authority = derive_authority(&TOKEN_METADATA_PROGRAM_ID).unwrap();
    assert_ne!(drop_authority, metadata_authority);
}

#[test]
fn associated_account_depends_on_owner_and_mint() {
    let owner_a = Address::new([1u8; 32]);
    let owner_b = Address::new([2u8; 32]);
    let mint_a = Address::new([3u8; 32]);
    let mint_b = Address::new([4u8; 32]);

    let base = derive_associated_account(&owner_a, &mint_a).unwrap();
    assert_eq!(base, derive_associated_account(&owner_a, &mint_a).unwrap());
    assert_ne!(base, derive_associated_account(&owner_b, &mint_a).unwrap());
    assert_ne!(base, derive_associated_account(&owner_a, &mint_b).unwrap());
}

#[test]
fn metadata_address_is_bound_to_the_metadata_program() {
    let mint = Address::new([5u8; 32]);
    let under_metadata = derive_metadata(&TOKEN_METADATA_PROGRAM_ID, &mint).unwrap();
    let under_drop = derive_metadata(&DROP_PROGRAM_ID, &mint).unwrap();
    assert_ne!(under_metadata, under_drop);
}

#[test]
fn malformed_seeds_are_rejected() {
    assert!(matches!(
        derive_address(&[], &DROP_PROGRAM_ID),
        Err(AddressDeriveError::InvalidInput(_))
    ));
    assert!(matches!(
        derive_address(&[b""], &DROP_PROGRAM_ID),
        Err(AddressDeriveError::InvalidInput(_))
    ));
    let too_long = [0u8; MAX_SEED_LEN + 1];
    assert!(matches!(
        derive_address(&[&too_long], &DROP_PROGRAM_ID),
        Err(AddressDeriveError::InvalidInput(_))
    ));
}

#[test]
fn seed_boundaries_are_length_prefixed() {
    // ["ab", "c"] and ["a", "bc"] must not collide.
    let split_one = derive_address(&[b"ab", b"c"], &DROP_PROGRAM_ID).unwrap();
    let split_two = derive_address(&[b"a", b"bc"], &DROP_PROGRAM_ID).unwrap();
    assert_ne!(split_one, split_two);
}
