//! Rule body elements: match clauses and verdicts
//!
//! A [`Statement`] is one element of a rule's `expr` sequence. On the wire a
//! verdict has no conventional discriminator: simple verdicts are bare
//! object keys with a null value (`{"accept": null}`), while jump and goto
//! wrap a [`ToTarget`] object. Decoding is therefore dual-pass — a
//! structured decode of the `match`/`jump`/`goto` fields, then a raw
//! key-presence scan for the simple verdict names. Presence, not value, is
//! the discriminator for simple verdicts.

use crate::schema::rule::Match;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

// Verdict keys
pub const VERDICT_ACCEPT: &str = "accept";
pub const VERDICT_CONTINUE: &str = "continue";
pub const VERDICT_DROP: &str = "drop";
pub const VERDICT_RETURN: &str = "return";
pub const VERDICT_JUMP: &str = "jump";
pub const VERDICT_GOTO: &str = "goto";

/// Name of a user-defined chain referenced by jump/goto
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToTarget {
    pub target: String,
}

/// Terminal action of a statement, or a branch to another chain
#[derive(Debug, Clone, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub enum Verdict {
    #[strum(serialize = "accept")]
    Accept,
    #[strum(serialize = "continue")]
    Continue,
    #[strum(serialize = "drop")]
    Drop,
    #[strum(serialize = "return")]
    Return,
    #[strum(serialize = "jump")]
    Jump(ToTarget),
    #[strum(serialize = "goto")]
    Goto(ToTarget),
}

/// Classification order for bare verdict keys. Decoding keeps the first key
/// present in this order; jump and goto are considered after these four.
const SIMPLE_VERDICTS: [Verdict; 4] = [
    Verdict::Accept,
    Verdict::Continue,
    Verdict::Drop,
    Verdict::Return,
];

impl Verdict {
    /// Branches to a user-defined chain, returning here when it ends.
    ///
    /// # Examples
    ///
    /// ```
    /// use nftjson::schema::statement::Verdict;
    ///
    /// let verdict = Verdict::jump("ssh-guard");
    /// assert_eq!(verdict.key(), "jump");
    /// ```
    pub fn jump(target: impl Into<String>) -> Self {
        Self::Jump(ToTarget {
            target: target.into(),
        })
    }

    /// Branches to a user-defined chain without a return.
    pub fn goto(target: impl Into<String>) -> Self {
        Self::Goto(ToTarget {
            target: target.into(),
        })
    }

    /// Wire key carrying this verdict
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Accept => VERDICT_ACCEPT,
            Self::Continue => VERDICT_CONTINUE,
            Self::Drop => VERDICT_DROP,
            Self::Return => VERDICT_RETURN,
            Self::Jump(_) => VERDICT_JUMP,
            Self::Goto(_) => VERDICT_GOTO,
        }
    }

    /// `true` for the four bare-key verdicts, `false` for jump/goto
    pub const fn is_simple(&self) -> bool {
        matches!(self, Self::Accept | Self::Continue | Self::Drop | Self::Return)
    }
}

/// One element of a rule body
///
/// Well-formed statements have exactly one of `r#match`/`verdict` populated.
/// The decoder deliberately accepts objects carrying both a match clause and
/// a verdict key, mirroring what the engine tolerates; enforcement lives in
/// [`crate::validators`], not here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    pub r#match: Option<Match>,
    pub verdict: Option<Verdict>,
}

impl From<Match> for Statement {
    fn from(value: Match) -> Self {
        Self {
            r#match: Some(value),
            verdict: None,
        }
    }
}

impl From<Verdict> for Statement {
    fn from(value: Verdict) -> Self {
        Self {
            r#match: None,
            verdict: Some(value),
        }
    }
}

impl Serialize for Statement {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = usize::from(self.r#match.is_some()) + usize::from(self.verdict.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(clause) = &self.r#match {
            map.serialize_entry("match", clause)?;
        }
        match &self.verdict {
            Some(verdict @ (Verdict::Jump(target) | Verdict::Goto(target))) => {
                map.serialize_entry(verdict.key(), target)?;
            }
            // simple verdicts are bare keys with a literal null value
            Some(verdict) => map.serialize_entry(verdict.key(), &Value::Null)?,
            None => {}
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Statement {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let fields: serde_json::Map<String, Value> = Deserialize::deserialize(deserializer)?;

        // Pass 1: structured fields. A null value counts as absent, the way
        // the engine emits unset optional objects.
        let clause = typed_field::<Match, D::Error>(&fields, "match")?;
        let jump = typed_field::<ToTarget, D::Error>(&fields, VERDICT_JUMP)?;
        let goto = typed_field::<ToTarget, D::Error>(&fields, VERDICT_GOTO)?;

        // Pass 2: key-presence scan. Any value at a simple verdict key, even
        // a non-null one, marks the verdict.
        let indicators = SIMPLE_VERDICTS
            .iter()
            .filter(|verdict| fields.contains_key(verdict.key()))
            .count()
            + usize::from(jump.is_some())
            + usize::from(goto.is_some());

        let verdict = SIMPLE_VERDICTS
            .iter()
            .find(|verdict| fields.contains_key(verdict.key()))
            .cloned()
            .or_else(|| jump.map(Verdict::Jump))
            .or_else(|| goto.map(Verdict::Goto));

        if indicators > 1
            && let Some(kept) = &verdict
        {
            warn!(
                "statement carries {indicators} verdict keys, keeping \"{}\"",
                kept.key()
            );
        }

        Ok(Self {
            r#match: clause,
            verdict,
        })
    }
}

/// Decodes an optional object field out of the buffered statement keys.
fn typed_field<T, E>(
    fields: &serde_json::Map<String, Value>,
    key: &str,
) -> std::result::Result<Option<T>, E>
where
    T: serde::de::DeserializeOwned,
    E: serde::de::Error,
{
    match fields.get(key) {
        Some(value) => {
            serde_json::from_value::<Option<T>>(value.clone()).map_err(serde::de::Error::custom)
        }
        None => Ok(None),
    }
}
