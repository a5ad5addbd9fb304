//! Scenario driver
//!
//! One run creates a Merkle tree, a collection NFT and a compressed NFT
//! minted into that collection:
//!
//! 1. load the fixed identities (creator, fee payer, leaf owner)
//! 2. fund creator and fee payer
//! 3. generate fresh Merkle tree and collection mint keypairs
//! 4. derive tree authority, metadata, master edition and token account
//! 5. size and fund the tree account
//! 6. `create_tree`
//! 7. size the compute budget, attach a priority fee, attach a valid anchor
//! 8. sign, submit, confirm (failure aborts the run)
//! 9. `create_collection_nft`
//! 10. `mint_comp_nft_to_collection`
//!
//! Steps 9 and 10 report a `StepOutcome` each. The configured
//! `ContinuationPolicy` decides whether step 10 runs after step 9 failed.

use std::sync::Arc;

use reqwest::Client;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction,
};
use tracing::info;

use crate::config::{Config, ContinuationPolicy};
use crate::errors::{DriverError, DriverResult};
use crate::funding;
use crate::merkle;
use crate::pda::{self, CollectionAddresses};
use crate::priority_fee::{self, EstimateFilter};
use crate::program::{self, SPL_ACCOUNT_COMPRESSION_PROGRAM_ID};
use crate::rpc::LedgerRpc;
use crate::structured_logging::ScenarioLogger;
use crate::tx_builder::{compute_unit_limit, plan_instructions, TxBuilder};
use crate::wallet::Participants;

pub const STEP_CREATE_TREE: &str = "create_tree";
pub const STEP_CREATE_COLLECTION: &str = "create_collection_nft";
pub const STEP_MINT_TO_COLLECTION: &str = "mint_comp_nft_to_collection";

/// Result of one of the optional steps
#[derive(Debug)]
pub enum StepOutcome {
    Succeeded(Signature),
    Failed(DriverError),
    /// Not attempted because an earlier step failed
    Skipped,
}

impl StepOutcome {
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Self::Succeeded(sig) => Some(sig),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    pub fn error(&self) -> Option<&DriverError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    fn from_result(result: DriverResult<Signature>) -> Self {
        match result {
            Ok(sig) => Self::Succeeded(sig),
            Err(err) => Self::Failed(err),
        }
    }
}

/// Everything a run produced
#[derive(Debug)]
pub struct ScenarioReport {
    pub run_id: String,
    pub funding: Vec<Signature>,
    pub merkle_tree: Pubkey,
    pub tree_authority: Pubkey,
    pub tree_size: usize,
    pub collection: CollectionAddresses,
    pub create_tree: Signature,
    pub create_collection: StepOutcome,
    pub mint_to_collection: StepOutcome,
    /// Number of blockhashes fetched over the run
    pub anchor_refreshes: u64,
}

impl ScenarioReport {
    /// Both optional steps succeeded
    pub fn is_complete(&self) -> bool {
        self.create_collection.is_success() && self.mint_to_collection.is_success()
    }
}

pub struct ScenarioDriver {
    config: Config,
    program_id: Pubkey,
    rpc: Arc<dyn LedgerRpc>,
    builder: TxBuilder,
    http: Client,
    logger: ScenarioLogger,
}

impl ScenarioDriver {
    /// Fails when the configuration is invalid; nothing touches the network
    pub fn new(config: Config, rpc: Arc<dyn LedgerRpc>) -> DriverResult<Self> {
        config.validate()?;
        let program_id = config.program_id()?;
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.rpc.timeout_secs))
            .build()
            .map_err(|e| DriverError::Configuration(format!("http client: {}", e)))?;

        Ok(Self {
            config,
            program_id,
            builder: TxBuilder::new(rpc.clone()),
            rpc,
            http,
            logger: ScenarioLogger::for_new_run(),
        })
    }

    pub fn logger(&self) -> &ScenarioLogger {
        &self.logger
    }

    /// Load the identities from the configured paths and run
    pub async fn run_from_config(&mut self) -> DriverResult<ScenarioReport> {
        let participants = Participants::load(&self.config.keypairs, &self.logger)?;
        self.run(&participants).await
    }

    /// Run with fresh tree and collection mint keypairs
    pub async fn run(&mut self, participants: &Participants) -> DriverResult<ScenarioReport> {
        let merkle_tree = Keypair::new();
        let collection_mint = Keypair::new();
        self.run_with(participants, &merkle_tree, &collection_mint)
            .await
    }

    /// Run with caller-provided tree and collection mint keypairs
    pub async fn run_with(
        &mut self,
        participants: &Participants,
        merkle_tree: &Keypair,
        collection_mint: &Keypair,
    ) -> DriverResult<ScenarioReport> {
        let creator = &participants.creator;
        let fee_payer = &participants.fee_payer;
        let leaf_owner = &participants.leaf_owner;

        let funding = if self.config.funding.enabled {
            funding::airdrop(
                self.rpc.as_ref(),
                self.config.funding.lamports,
                &[creator.pubkey(), fee_payer.pubkey()],
            )
            .await?
        } else {
            Vec::new()
        };

        self.logger.address("merkle_tree", &merkle_tree.pubkey());
        self.logger.address("collection_mint", &collection_mint.pubkey());

        let (tree_authority, _bump) = pda::tree_authority(&merkle_tree.pubkey());
        self.logger.address("tree_authority", &tree_authority);

        let tree = &self.config.tree;
        let tree_size =
            merkle::merkle_tree_account_size(tree.max_depth, tree.max_buffer_size, tree.canopy_depth);
        let rent = self.rpc.minimum_balance_for_rent_exemption(tree_size).await?;
        self.logger
            .tree_size(tree.max_depth, tree.max_buffer_size, tree_size, rent);

        #[allow(deprecated)]
        let create_account_ix = system_instruction::create_account(
            &creator.pubkey(),
            &merkle_tree.pubkey(),
            rent,
            tree_size as u64,
            &SPL_ACCOUNT_COMPRESSION_PROGRAM_ID,
        );
        let create_tree_ix = program::create_tree(
            &self.program_id,
            &program::CreateTreeAccounts {
                tree_authority,
                merkle_tree: merkle_tree.pubkey(),
                payer: fee_payer.pubkey(),
                tree_creator: creator.pubkey(),
            },
            tree.max_depth,
            tree.max_buffer_size,
            tree.public,
        )?;

        let create_tree = self
            .execute_step(
                STEP_CREATE_TREE,
                vec![create_account_ix, create_tree_ix],
                &fee_payer.pubkey(),
                &[fee_payer, merkle_tree, creator],
            )
            .await?;

        let collection = CollectionAddresses::derive(
            collection_mint.pubkey(),
            &creator.pubkey(),
            &self.config.token_program.id(),
        );
        self.logger.address("token_metadata", &collection.metadata);
        self.logger.address("master_edition", &collection.master_edition);
        self.logger.address("associated_token", &collection.associated_token);

        let create_collection = StepOutcome::from_result(
            self.create_collection(creator, collection_mint, &collection)
                .await,
        );
        if let Some(err) = create_collection.error() {
            self.logger.step_failed(STEP_CREATE_COLLECTION, err);
        }

        let mint_to_collection = if create_collection.error().is_some()
            && self.config.continuation == ContinuationPolicy::StopOnFailure
        {
            self.logger
                .step_skipped(STEP_MINT_TO_COLLECTION, "collection step failed");
            StepOutcome::Skipped
        } else {
            let outcome = StepOutcome::from_result(
                self.mint_to_collection(
                    creator,
                    fee_payer,
                    &leaf_owner.pubkey(),
                    &merkle_tree.pubkey(),
                    &tree_authority,
                    &collection,
                )
                .await,
            );
            if let Some(err) = outcome.error() {
                self.logger.step_failed(STEP_MINT_TO_COLLECTION, err);
            }
            outcome
        };

        let report = ScenarioReport {
            run_id: self.logger.run_id().to_string(),
            funding,
            merkle_tree: merkle_tree.pubkey(),
            tree_authority,
            tree_size,
            collection,
            create_tree,
            create_collection,
            mint_to_collection,
            anchor_refreshes: self.builder.anchors().refreshes(),
        };

        info!(
            run_id = %report.run_id,
            complete = report.is_complete(),
            anchor_refreshes = report.anchor_refreshes,
            "Scenario finished"
        );
        Ok(report)
    }

    async fn create_collection(
        &mut self,
        creator: &Keypair,
        collection_mint: &Keypair,
        collection: &CollectionAddresses,
    ) -> DriverResult<Signature> {
        let ix = program::create_collection_nft(
            &self.program_id,
            &program::CreateCollectionAccounts {
                collection_mint: collection.mint,
                payer: creator.pubkey(),
                wallet: creator.pubkey(),
                token_metadata: collection.metadata,
                master_edition: collection.master_edition,
                associated_token: collection.associated_token,
                token_program: self.config.token_program.id(),
            },
            &self.config.collection.uri,
            &self.config.collection.name,
        )?;

        self.execute_step(
            STEP_CREATE_COLLECTION,
            vec![ix],
            &creator.pubkey(),
            &[creator, collection_mint],
        )
        .await
    }

    async fn mint_to_collection(
        &mut self,
        creator: &Keypair,
        fee_payer: &Keypair,
        leaf_owner: &Pubkey,
        merkle_tree: &Pubkey,
        tree_authority: &Pubkey,
        collection: &CollectionAddresses,
    ) -> DriverResult<Signature> {
        let ix = program::mint_comp_nft_to_collection(
            &self.program_id,
            &program::MintToCollectionAccounts {
                tree_config: *tree_authority,
                leaf_owner: *leaf_owner,
                leaf_delegate: *leaf_owner,
                merkle_tree: *merkle_tree,
                payer: fee_payer.pubkey(),
                tree_creator: creator.pubkey(),
                collection_authority: creator.pubkey(),
                collection_mint: collection.mint,
                collection_metadata: collection.metadata,
                edition_account: collection.master_edition,
            },
            &self.config.cnft.uri,
            &self.config.cnft.name,
        )?;

        self.execute_step(
            STEP_MINT_TO_COLLECTION,
            vec![ix],
            &fee_payer.pubkey(),
            &[fee_payer, creator],
        )
        .await
    }

    /// Size the budget, attach the fee, then sign, submit and confirm
    async fn execute_step(
        &mut self,
        step: &str,
        program_ixs: Vec<Instruction>,
        payer: &Pubkey,
        signers: &[&Keypair],
    ) -> DriverResult<Signature> {
        let estimate = self
            .builder
            .estimate_compute_units(&program_ixs, payer)
            .await?;
        let cu_limit = compute_unit_limit(estimate, self.config.compute.margin_percent);
        self.logger.compute(step, estimate, cu_limit);

        let cu_price = if self.config.priority_fee.enabled {
            self.fetch_priority_fee(step).await?
        } else {
            0
        };

        let plan = plan_instructions(cu_limit, cu_price, program_ixs)?;
        let signature = self.builder.send_and_confirm(&plan, payer, signers).await?;
        self.logger.tx_id(step, &signature);
        Ok(signature)
    }

    async fn fetch_priority_fee(&self, step: &str) -> DriverResult<u64> {
        let fee_config = &self.config.priority_fee;
        let filter = EstimateFilter {
            last_n_blocks: fee_config.last_n_blocks,
            account: fee_config.account.clone(),
        };

        let estimate = priority_fee::fetch_estimate_priority_fees(
            &self.http,
            self.config.priority_fee_endpoint(),
            &filter,
        )
        .await?;
        let micro_lamports = estimate.per_compute_unit.require(&fee_config.level)?;

        self.logger
            .priority_fee(step, &fee_config.level, micro_lamports);
        Ok(micro_lamports)
    }
}

/// Load identities, run once and return the report
pub async fn run_scenario(config: Config, rpc: Arc<dyn LedgerRpc>) -> DriverResult<ScenarioReport> {
    let mut driver = ScenarioDriver::new(config, rpc)?;
    driver.run_from_config().await
}
