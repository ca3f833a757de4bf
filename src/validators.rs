//! Structural validation for rule structures
//!
//! The wire codec deliberately decodes everything the engine tolerates,
//! including statements that carry both a match clause and a verdict key.
//! This module is the enforcement layer on top of it: call it on decoded
//! input, or on hand-built rules before handing them to the engine.

use crate::schema::rule::Rule;
use crate::schema::statement::Statement;

/// Validates that a statement has exactly one active arm.
///
/// # Errors
///
/// Returns `Err` if the statement carries both a match clause and a verdict,
/// or neither.
///
/// # Examples
///
/// ```
/// use nftjson::schema::statement::{Statement, Verdict};
/// use nftjson::validators::validate_statement;
///
/// assert!(validate_statement(&Statement::from(Verdict::Accept)).is_ok());
/// assert!(validate_statement(&Statement::default()).is_err());
/// ```
pub fn validate_statement(statement: &Statement) -> Result<(), String> {
    match (&statement.r#match, &statement.verdict) {
        (Some(_), Some(verdict)) => Err(format!(
            "statement mixes a match clause with the \"{}\" verdict",
            verdict.key()
        )),
        (None, None) => Err("statement has neither a match clause nor a verdict".to_string()),
        _ => Ok(()),
    }
}

/// Validates a rule's identifiers and every statement of its body.
///
/// # Errors
///
/// Returns `Err` if `family`, `table` or `chain` is empty, or if any
/// statement fails [`validate_statement`]; the message names the offending
/// statement by position.
pub fn validate_rule(rule: &Rule) -> Result<(), String> {
    for (name, value) in [
        ("family", &rule.family),
        ("table", &rule.table),
        ("chain", &rule.chain),
    ] {
        if value.is_empty() {
            return Err(format!("rule is missing the {name} identifier"));
        }
    }

    for (position, statement) in rule.expr.iter().enumerate() {
        validate_statement(statement).map_err(|e| format!("statement {position}: {e}"))?;
    }

    Ok(())
}

/// Sanitizes a comment for safe embedding in a rule.
///
/// Removes control characters, quotes, and shell metacharacters, and limits
/// the result to the 128 bytes the engine accepts for comments.
///
/// # Examples
///
/// ```
/// use nftjson::validators::sanitize_comment;
///
/// assert_eq!(sanitize_comment("Allow SSH"), "Allow SSH");
///
/// let cleaned = sanitize_comment("bad\ncomment\"quote");
/// assert!(!cleaned.contains('\n'));
/// assert!(!cleaned.contains('"'));
/// ```
pub fn sanitize_comment(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.' | ':'))
        .take(128)
        .collect()
}
