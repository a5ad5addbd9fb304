//! Address derivation and instruction encoding for the bubblegum-cpi program

use cnft_driver::pda::{self, CollectionAddresses, EDITION_SEED, METADATA_SEED};
use cnft_driver::program::{
    self, CreateCollectionAccounts, CreateTreeAccounts, MintToCollectionAccounts, TokenProgram,
    BUBBLEGUM_CPI_PROGRAM_ID, MPL_BUBBLEGUM_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID,
};
use cnft_driver::DriverError;
use solana_sdk::pubkey::Pubkey;

#[test]
fn test_metadata_and_edition_seeds() {
    let mint = Pubkey::new_unique();

    let (expected_metadata, _) = Pubkey::find_program_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    );
    let (expected_edition, _) = Pubkey::find_program_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    );

    assert_eq!(pda::metadata(&mint).0, expected_metadata);
    assert_eq!(pda::master_edition(&mint).0, expected_edition);
    assert_ne!(expected_metadata, expected_edition);
}

#[test]
fn test_tree_authority_under_bubblegum() {
    let tree = Pubkey::new_unique();
    let (expected, bump) =
        Pubkey::find_program_address(&[tree.as_ref()], &MPL_BUBBLEGUM_PROGRAM_ID);
    assert_eq!(pda::tree_authority(&tree), (expected, bump));
}

#[test]
fn test_collection_addresses_depend_on_token_program() {
    let mint = Pubkey::new_unique();
    let owner = Pubkey::new_unique();

    let legacy = CollectionAddresses::derive(mint, &owner, &TokenProgram::SplToken.id());
    let t22 = CollectionAddresses::derive(mint, &owner, &TokenProgram::Token2022.id());

    assert_eq!(legacy.metadata, t22.metadata);
    assert_eq!(legacy.master_edition, t22.master_edition);
    assert_ne!(legacy.associated_token, t22.associated_token);
}

#[test]
fn test_create_tree_encoding() {
    let accounts = CreateTreeAccounts {
        tree_authority: Pubkey::new_unique(),
        merkle_tree: Pubkey::new_unique(),
        payer: Pubkey::new_unique(),
        tree_creator: Pubkey::new_unique(),
    };

    let ix = program::create_tree(&BUBBLEGUM_CPI_PROGRAM_ID, &accounts, 3, 8, None).unwrap();

    assert_eq!(ix.program_id, BUBBLEGUM_CPI_PROGRAM_ID);
    assert_eq!(&ix.data[..8], &program::instruction_discriminator("create_tree"));
    // u32 depth, u32 buffer, Option<bool> = None
    assert_eq!(&ix.data[8..], &[3u8, 0, 0, 0, 8, 0, 0, 0, 0]);
    assert_eq!(ix.accounts.len(), 8);
    assert!(ix.accounts[1].is_signer && ix.accounts[1].is_writable);
}

#[test]
fn test_metadata_args_encoding() {
    let accounts = CreateCollectionAccounts {
        collection_mint: Pubkey::new_unique(),
        payer: Pubkey::new_unique(),
        wallet: Pubkey::new_unique(),
        token_metadata: Pubkey::new_unique(),
        master_edition: Pubkey::new_unique(),
        associated_token: Pubkey::new_unique(),
        token_program: TokenProgram::SplToken.id(),
    };

    let ix = program::create_collection_nft(
        &BUBBLEGUM_CPI_PROGRAM_ID,
        &accounts,
        "https://a.io",
        "C",
    )
    .unwrap();

    let mut expected = program::instruction_discriminator("create_collection_nft").to_vec();
    expected.extend_from_slice(&12u32.to_le_bytes());
    expected.extend_from_slice(b"https://a.io");
    expected.extend_from_slice(&1u32.to_le_bytes());
    expected.extend_from_slice(b"C");
    assert_eq!(ix.data, expected);
    assert_eq!(ix.accounts.len(), 11);
}

#[test]
fn test_mint_rejects_bad_metadata() {
    let accounts = MintToCollectionAccounts {
        tree_config: Pubkey::new_unique(),
        leaf_owner: Pubkey::new_unique(),
        leaf_delegate: Pubkey::new_unique(),
        merkle_tree: Pubkey::new_unique(),
        payer: Pubkey::new_unique(),
        tree_creator: Pubkey::new_unique(),
        collection_authority: Pubkey::new_unique(),
        collection_mint: Pubkey::new_unique(),
        collection_metadata: Pubkey::new_unique(),
        edition_account: Pubkey::new_unique(),
    };

    let empty_name =
        program::mint_comp_nft_to_collection(&BUBBLEGUM_CPI_PROGRAM_ID, &accounts, "https://a.io", "  ");
    assert!(matches!(empty_name, Err(DriverError::Validation(_))));

    let long_uri = format!("https://a.io/{}", "x".repeat(200));
    let too_long =
        program::mint_comp_nft_to_collection(&BUBBLEGUM_CPI_PROGRAM_ID, &accounts, &long_uri, "N");
    assert!(matches!(too_long, Err(DriverError::Validation(_))));

    let ok = program::mint_comp_nft_to_collection(
        &BUBBLEGUM_CPI_PROGRAM_ID,
        &accounts,
        "https://example.com/my-collection-cNft.json",
        "My Collection cNFT 1",
    )
    .unwrap();
    assert_eq!(ok.accounts.len(), 15);
}
