//! Instruction planning and ordering validation
//!
//! Every scenario transaction has the same shape:
//! 1. Compute budget instructions (CU limit, priority fee)
//! 2. Program instructions (account creation, bubblegum-cpi calls)

use solana_sdk::{
    compute_budget::{self, ComputeBudgetInstruction},
    instruction::Instruction,
};

use crate::tx_builder::errors::TransactionBuilderError;

/// Ordered list of instructions for one transaction
#[derive(Debug, Clone)]
pub struct InstructionPlan {
    pub instructions: Vec<Instruction>,

    /// Compute unit limit requested (0 when none was attached)
    pub cu_limit: u32,

    /// Priority fee in micro-lamports per CU (0 when none was attached)
    pub cu_price: u64,
}

impl InstructionPlan {
    /// Program instructions, without the compute budget prefix
    pub fn program_instructions(&self) -> &[Instruction] {
        let prefix = self
            .instructions
            .iter()
            .take_while(|ix| is_compute_budget(ix))
            .count();
        &self.instructions[prefix..]
    }
}

fn is_compute_budget(ix: &Instruction) -> bool {
    ix.program_id == compute_budget::id()
}

/// Plan instructions with compute budget instructions first
///
/// # Arguments
///
/// * `cu_limit` - Compute unit limit (0 = skip this instruction)
/// * `cu_price` - Priority fee in micro-lamports (0 = skip this instruction)
/// * `program_ixs` - Program instructions, in execution order
///
/// # Errors
///
/// Returns `TransactionBuilderError::Configuration` if there is no program
/// instruction, or one of them references no accounts.
pub fn plan_instructions(
    cu_limit: u32,
    cu_price: u64,
    program_ixs: Vec<Instruction>,
) -> Result<InstructionPlan, TransactionBuilderError> {
    if program_ixs.is_empty() {
        return Err(TransactionBuilderError::Configuration(
            "Transaction has no program instructions".to_string(),
        ));
    }
    if let Some(ix) = program_ixs.iter().find(|ix| ix.accounts.is_empty()) {
        return Err(TransactionBuilderError::Configuration(format!(
            "Instruction for program {} has no accounts",
            ix.program_id
        )));
    }

    let mut instructions = Vec::with_capacity(program_ixs.len() + 2);

    if cu_limit > 0 {
        instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(cu_limit));
    }
    if cu_price > 0 {
        instructions.push(ComputeBudgetInstruction::set_compute_unit_price(cu_price));
    }

    instructions.extend(program_ixs);

    Ok(InstructionPlan {
        instructions,
        cu_limit,
        cu_price,
    })
}

/// Validate instruction ordering (debug/test only)
///
/// Compute budget instructions must form a prefix of the list, and each of
/// them may appear at most once.
#[cfg(debug_assertions)]
pub fn sanity_check_ix_order(instructions: &[Instruction]) -> Result<(), TransactionBuilderError> {
    if instructions.is_empty() {
        return Err(TransactionBuilderError::invalid_order(
            "Instruction list is empty",
        ));
    }

    let mut seen_program_ix = false;
    let mut seen_budget_tags: Vec<u8> = Vec::with_capacity(2);

    for (idx, ix) in instructions.iter().enumerate() {
        if is_compute_budget(ix) {
            if seen_program_ix {
                return Err(TransactionBuilderError::invalid_order(format!(
                    "Compute budget instruction at position {} follows a program instruction",
                    idx
                )));
            }
            let tag = ix.data.first().copied().unwrap_or_default();
            if seen_budget_tags.contains(&tag) {
                return Err(TransactionBuilderError::invalid_order(format!(
                    "Duplicate compute budget instruction (tag {}) at position {}",
                    tag, idx
                )));
            }
            seen_budget_tags.push(tag);
        } else {
            seen_program_ix = true;
        }
    }

    if !seen_program_ix {
        return Err(TransactionBuilderError::invalid_order(
            "Transaction only contains compute budget instructions",
        ));
    }

    Ok(())
}

/// No-op version of sanity_check_ix_order for release builds
#[cfg(not(debug_assertions))]
#[inline]
pub fn sanity_check_ix_order(_instructions: &[Instruction]) -> Result<(), TransactionBuilderError> {
    Ok(())
}
