//! Shared DTOs (schemas-as-code) for the spreadpatch workspace.
//!
//! # Design constraints
//! - Receipts are serialized to disk and read by other tooling.
//! - Prefer adding optional fields over changing semantics.

pub mod patch;
pub mod receipt;

/// Schema identifiers.
pub mod schema {
    pub const SPREADPATCH_RECEIPT_V1: &str = "spreadpatch.receipt.v1";
}
