//! nftables rule schema and wire codec
//!
//! This module contains the types exchanged with the rule-processing engine
//! and their JSON codec. It provides:
//!
//! - [`rule`]: Rules and match clauses, plus the match operator constants
//! - [`expression`]: Match operands and payload field references
//! - [`statement`]: Rule body elements (match clause or verdict)
//! - [`error`]: Error types for encode/decode operations
//!
//! The wire format is polymorphic: the same logical field may arrive as a
//! scalar, a nested object, or a bare key with a null value. The codec
//! resolves each shape through a single, ordered classification step and
//! keeps anything it cannot type as an opaque fragment.

pub mod error;
pub mod expression;
pub mod rule;
pub mod statement;

#[cfg(test)]
pub mod test_helpers;
