//! nftjson - nftables rule schema and JSON codec
//!
//! Data structures for nftables rules and a lossless codec for the JSON
//! dialect `nft --json` exchanges with rule-processing engines.
//!
//! # Architecture
//!
//! - [`schema`] - Rule, statement and expression types plus their wire codec
//! - [`validators`] - Structural validation layered on top of the codec
//!
//! The codec is purely structural: it maps between in-memory values and wire
//! JSON without interpreting rule semantics. Statements the schema cannot
//! type are still round-tripped losslessly through an opaque escape hatch,
//! so output produced by a newer engine survives decode→encode unchanged.
//!
//! # Example
//!
//! ```
//! use nftjson::schema::expression::{Expression, Payload};
//! use nftjson::schema::rule::{Match, Rule, OP_EQ};
//! use nftjson::schema::statement::{Statement, Verdict};
//!
//! let mut rule = Rule::new("inet", "filter", "input").with_comment("allow ssh");
//! rule.expr.push(Statement::from(Match {
//!     op: OP_EQ.to_string(),
//!     left: Payload::new("tcp", "dport").into(),
//!     right: Expression::from(22.0),
//! }));
//! rule.expr.push(Statement::from(Verdict::Accept));
//!
//! let wire = rule.to_json_string().unwrap();
//! assert!(wire.contains(r#""right":22"#));
//! assert_eq!(Rule::from_json_str(&wire).unwrap(), rule);
//! ```

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]

pub mod schema;
pub mod validators;

// Re-export commonly used types
pub use schema::error::{Error, Result};
pub use schema::expression::{Expression, Payload};
pub use schema::rule::{Match, Rule};
pub use schema::statement::{Statement, ToTarget, Verdict};
