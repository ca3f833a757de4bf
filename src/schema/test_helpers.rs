//! Shared test utilities for schema module tests
//!
//! Provides common fixture builders to avoid duplication across test suites.
//! This module is only compiled in test mode.

use crate::schema::expression::{Expression, Payload};
use crate::schema::rule::{Match, Rule, OP_EQ};
use crate::schema::statement::{Statement, Verdict};

/// Creates a `tcp dport == <port>` match statement.
pub fn dport_match(port: f64) -> Statement {
    Statement::from(Match {
        op: OP_EQ.to_string(),
        left: Payload::new("tcp", "dport").into(),
        right: Expression::from(port),
    })
}

/// Creates an `ip daddr == <addr>` match statement.
pub fn daddr_match(addr: &str) -> Statement {
    Statement::from(Match {
        op: OP_EQ.to_string(),
        left: Payload::new("ip", "daddr").into(),
        right: Expression::from(addr),
    })
}

/// Creates the canonical test rule: accept tcp dport 22 on inet/filter/input.
///
/// This is the canonical helper for creating test rules.
/// Use this instead of building rules by hand in tests.
pub fn ssh_rule() -> Rule {
    let mut rule = Rule::new("inet", "filter", "input").with_comment("Allow SSH");
    rule.expr.push(dport_match(22.0));
    rule.expr.push(Statement::from(Verdict::Accept));
    rule
}
