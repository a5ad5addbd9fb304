//! Signed transaction ready for submission

use solana_sdk::{pubkey::Pubkey, transaction::Transaction};

use crate::tx_builder::context::ValidityAnchor;

/// Transaction build output
///
/// Holds a fully signed transaction together with the anchor it was signed
/// against and the list of signers its message requires.
#[derive(Debug, Clone)]
pub struct TxBuildOutput {
    /// The signed transaction
    pub tx: Transaction,

    /// Blockhash and expiry the transaction was signed with
    pub anchor: ValidityAnchor,

    /// Required signers, from `message.header.num_required_signatures`
    pub required_signers: Vec<Pubkey>,
}

impl TxBuildOutput {
    pub fn new(tx: Transaction, anchor: ValidityAnchor) -> Self {
        let required = tx.message.header.num_required_signatures as usize;
        let required_signers = tx.message.account_keys[..required].to_vec();

        Self {
            tx,
            anchor,
            required_signers,
        }
    }

    pub fn tx_ref(&self) -> &Transaction {
        &self.tx
    }

    pub fn required_signers(&self) -> &[Pubkey] {
        &self.required_signers
    }

    /// Fee payer is always the first account of the message
    pub fn fee_payer(&self) -> Pubkey {
        self.required_signers[0]
    }

    /// Every required signature slot holds a non-default signature
    pub fn is_fully_signed(&self) -> bool {
        self.tx.is_signed()
    }
}
