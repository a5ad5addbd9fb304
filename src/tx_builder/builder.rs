//! Core transaction builder
//!
//! `TxBuilder` ties the pieces together for one transaction: attach a valid
//! anchor, sign with every required party, submit and wait for the
//! configured commitment.

use std::sync::Arc;

use solana_sdk::{
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
use tracing::debug;

use crate::rpc::LedgerRpc;
use crate::tx_builder::{
    context::AnchorCache,
    errors::TransactionBuilderError,
    instructions::{sanity_check_ix_order, InstructionPlan},
    output::TxBuildOutput,
    simulate,
};

pub struct TxBuilder {
    rpc: Arc<dyn LedgerRpc>,
    anchors: AnchorCache,
}

impl TxBuilder {
    pub fn new(rpc: Arc<dyn LedgerRpc>) -> Self {
        Self {
            rpc,
            anchors: AnchorCache::new(),
        }
    }

    pub fn anchors(&self) -> &AnchorCache {
        &self.anchors
    }

    /// Compute units the program instructions consume, if the simulation runs cleanly
    pub async fn estimate_compute_units(
        &self,
        instructions: &[solana_sdk::instruction::Instruction],
        payer: &Pubkey,
    ) -> Result<Option<u64>, TransactionBuilderError> {
        simulate::estimate_compute_units(self.rpc.as_ref(), instructions, payer).await
    }

    /// Sign `plan` with a valid anchor
    ///
    /// Fails with `Signing` if any signer the message requires is missing
    /// from `signers`, or if `signers` contains a key the message does not
    /// reference.
    pub async fn build_signed(
        &mut self,
        plan: &InstructionPlan,
        payer: &Pubkey,
        signers: &[&Keypair],
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        sanity_check_ix_order(&plan.instructions)?;

        let anchor = self.anchors.fresh(self.rpc.as_ref()).await?;

        let message = Message::new(&plan.instructions, Some(payer));
        let mut tx = Transaction::new_unsigned(message);
        tx.try_sign(signers, anchor.blockhash)
            .map_err(|e| TransactionBuilderError::Signing(e.to_string()))?;

        Ok(TxBuildOutput::new(tx, anchor))
    }

    /// Submit a signed transaction and wait for confirmation
    pub async fn submit(&self, output: &TxBuildOutput) -> Result<Signature, TransactionBuilderError> {
        if !output.is_fully_signed() {
            return Err(TransactionBuilderError::Signing(
                "transaction is missing required signatures".to_string(),
            ));
        }

        let signature = self.rpc.send_transaction(output.tx_ref()).await?;
        debug!(
            signature = %signature,
            last_valid_block_height = output.anchor.last_valid_block_height,
            "Transaction submitted, awaiting confirmation"
        );
        self.rpc.confirm_signature(&signature).await?;
        Ok(signature)
    }

    /// Build, sign, submit and confirm in one go
    pub async fn send_and_confirm(
        &mut self,
        plan: &InstructionPlan,
        payer: &Pubkey,
        signers: &[&Keypair],
    ) -> Result<Signature, TransactionBuilderError> {
        let output = self.build_signed(plan, payer, signers).await?;
        self.submit(&output).await
    }
}
