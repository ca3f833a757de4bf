//! Rules and match clauses
//!
//! A [`Rule`] addresses a chain within a table of an address family and
//! carries an ordered `expr` sequence — the literal execution order of the
//! rule body. Optional fields are omitted from the wire entirely when
//! absent, never encoded as null.

use crate::schema::error::Result;
use crate::schema::expression::Expression;
use crate::schema::statement::Statement;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ═══════════════════════════════════════════════════════════════════════════
// Match Operators
// ═══════════════════════════════════════════════════════════════════════════

pub const OP_AND: &str = "&"; // Binary AND
pub const OP_OR: &str = "|"; // Binary OR
pub const OP_XOR: &str = "^"; // Binary XOR
pub const OP_LSH: &str = "<<"; // Left shift
pub const OP_RSH: &str = ">>"; // Right shift
pub const OP_EQ: &str = "=="; // Equal
pub const OP_NEQ: &str = "!="; // Not equal
pub const OP_LS: &str = "<"; // Less than
pub const OP_GR: &str = ">"; // Greater than
pub const OP_LSE: &str = "<="; // Less than or equal to
pub const OP_GRE: &str = ">="; // Greater than or equal to
pub const OP_IN: &str = "in"; // Lookup, i.e. test if the RHS bits are contained in the LHS value

/// Address family catalog
///
/// [`Rule::family`] stays a plain string on the wire; this enum names the
/// families the engine knows and their wire spellings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum Family {
    #[strum(serialize = "ip")]
    Ip,
    #[strum(serialize = "ip6")]
    Ip6,
    #[strum(serialize = "inet")]
    Inet,
    #[strum(serialize = "arp")]
    Arp,
    #[strum(serialize = "bridge")]
    Bridge,
    #[strum(serialize = "netdev")]
    Netdev,
}

impl Family {
    /// Returns the wire spelling as a static string
    pub const fn as_str(self) -> &'static str {
        match self {
            Family::Ip => "ip",
            Family::Ip6 => "ip6",
            Family::Inet => "inet",
            Family::Arp => "arp",
            Family::Bridge => "bridge",
            Family::Netdev => "netdev",
        }
    }
}

/// Comparison between two expressions
///
/// The operator semantics are opaque to the codec; `op` accepts any string,
/// with the `OP_*` constants naming the defined operators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub op: String,
    pub left: Expression,
    pub right: Expression,
}

/// A single firewall rule addressed to `family`/`table`/`chain`
///
/// `handle` references an existing rule in the engine, `index` is a position
/// hint, and `comment` is free text. All three, and an empty `expr`, are
/// left off the wire when unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Rule {
    pub family: String,
    pub table: String,
    pub chain: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expr: Vec<Statement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Rule {
    /// Creates an empty rule addressed to the given chain.
    pub fn new(family: impl Into<String>, table: impl Into<String>, chain: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            table: table.into(),
            chain: chain.into(),
            ..Self::default()
        }
    }

    /// References an existing rule by its engine handle.
    pub fn with_handle(mut self, handle: i64) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn with_index(mut self, index: i64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Encodes the rule into a JSON tree.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Encodes the rule into compact wire JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a rule from wire JSON.
    ///
    /// # Errors
    ///
    /// Returns `Err` on malformed JSON, on missing identifier fields, or on
    /// an expression whose top-level JSON type is null or an array.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
