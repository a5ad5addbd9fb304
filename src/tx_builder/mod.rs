//! Transaction assembly and submission
//!
//! Split into focused modules:
//! - **errors**: Error taxonomy for the build/submit lifecycle
//! - **context**: Validity anchor (blockhash + last valid height) caching
//! - **instructions**: Instruction planning and ordering validation
//! - **simulate**: Compute-unit estimation through simulation
//! - **output**: Signed transaction plus its required signers
//! - **builder**: Sign, submit and confirm
//!
//! ## Instruction order
//!
//! Every transaction starts with its compute-budget instructions (CU limit,
//! then the optional priority fee) followed by the program instructions.
//! `sanity_check_ix_order` enforces this in debug builds.
//!
//! ## Validity anchor
//!
//! `AnchorCache` reuses the last blockhash while the chain has not moved past
//! its last valid height and fetches a new one once it has.

pub mod builder;
pub mod context;
pub mod errors;
pub mod instructions;
pub mod output;
pub mod simulate;

pub use builder::TxBuilder;
pub use context::{AnchorCache, ValidityAnchor};
pub use errors::TransactionBuilderError;
pub use instructions::{plan_instructions, sanity_check_ix_order, InstructionPlan};
pub use output::TxBuildOutput;
pub use simulate::{
    compute_unit_limit, estimate_compute_units, DEFAULT_COMPUTE_UNITS,
    MAX_COMPUTE_UNITS,
};
