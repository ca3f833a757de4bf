//! Match operands and payload field references
//!
//! An [`Expression`] is one side of a match clause. On the wire it is
//! polymorphic: a bare JSON scalar, the `{"payload": {...}}` wrapper, or an
//! arbitrary object shape the schema does not type (meta keys, conntrack
//! state, anonymous sets, ...). Decoding classifies the raw value by JSON
//! type; anything unrecognized is kept verbatim in [`Expression::Raw`] so a
//! decode→encode cycle never loses information.

use crate::schema::error::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::trace;

/// Object key wrapping a [`Payload`] on the wire
pub const PAYLOAD_KEY: &str = "payload";

// ═══════════════════════════════════════════════════════════════════════════
// Payload Field Catalog
// ═══════════════════════════════════════════════════════════════════════════
// Protocol and field names the engine understands. The catalog is open: the
// codec accepts any string here, these constants only name the common cases.

// Ethernet
pub const PAYLOAD_PROTOCOL_ETHER: &str = "ether";
pub const PAYLOAD_FIELD_ETHER_DADDR: &str = "daddr";
pub const PAYLOAD_FIELD_ETHER_SADDR: &str = "saddr";
pub const PAYLOAD_FIELD_ETHER_TYPE: &str = "type";

// IP (common)
pub const PAYLOAD_FIELD_IP_VERSION: &str = "version";
pub const PAYLOAD_FIELD_IP_DSCP: &str = "dscp";
pub const PAYLOAD_FIELD_IP_ECN: &str = "ecn";
pub const PAYLOAD_FIELD_IP_LENGTH: &str = "length";
pub const PAYLOAD_FIELD_IP_SADDR: &str = "saddr";
pub const PAYLOAD_FIELD_IP_DADDR: &str = "daddr";

// IPv4
pub const PAYLOAD_PROTOCOL_IP4: &str = "ip";
pub const PAYLOAD_FIELD_IP4_HDRLENGTH: &str = "hdrlength";
pub const PAYLOAD_FIELD_IP4_ID: &str = "id";
pub const PAYLOAD_FIELD_IP4_FRAG_OFF: &str = "frag-off";
pub const PAYLOAD_FIELD_IP4_TTL: &str = "ttl";
pub const PAYLOAD_FIELD_IP4_PROTOCOL: &str = "protocol";
pub const PAYLOAD_FIELD_IP4_CHECKSUM: &str = "checksum";

// IPv6
pub const PAYLOAD_PROTOCOL_IP6: &str = "ip6";
pub const PAYLOAD_FIELD_IP6_FLOWLABEL: &str = "flowlabel";
pub const PAYLOAD_FIELD_IP6_NEXTHDR: &str = "nexthdr";
pub const PAYLOAD_FIELD_IP6_HOPLIMIT: &str = "hoplimit";

// Transport
pub const PAYLOAD_PROTOCOL_TCP: &str = "tcp";
pub const PAYLOAD_PROTOCOL_UDP: &str = "udp";
pub const PAYLOAD_PROTOCOL_TH: &str = "th";
pub const PAYLOAD_FIELD_DPORT: &str = "dport";
pub const PAYLOAD_FIELD_SPORT: &str = "sport";

/// Reference to a protocol header field within packet data
///
/// `protocol` and `field` are not validated against the catalog above; the
/// engine owns that check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Payload {
    pub protocol: String,
    pub field: String,
}

impl Payload {
    pub fn new(protocol: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            field: field.into(),
        }
    }
}

/// A match operand
///
/// Exactly one arm is populated at a time; the enum representation makes a
/// zero-arm or multi-arm operand unconstructible. [`Expression::Raw`] is the
/// forward-compatibility escape hatch: it stores JSON fragments no typed arm
/// can express and re-emits them verbatim.
///
/// # Example
///
/// ```
/// use nftjson::schema::expression::Expression;
///
/// let input = r#"{"meta":{"key":"iifname"}}"#;
/// let expr: Expression = serde_json::from_str(input).unwrap();
/// assert!(matches!(expr, Expression::Raw(_)));
/// assert_eq!(serde_json::to_string(&expr).unwrap(), input);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    String(String),
    /// Numbers are carried as 64-bit floats regardless of integer-ness
    /// upstream; integral values print without a fractional part.
    Number(f64),
    Boolean(bool),
    Payload(Payload),
    /// Verbatim JSON fragment not expressible through the typed arms
    Raw(Value),
}

/// Integral doubles up to 2^53 are exact; past that, emit the float form.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

impl Expression {
    /// Builds an opaque expression from a raw JSON fragment.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `json` is not syntactically valid JSON.
    pub fn raw(json: &str) -> Result<Self> {
        Ok(Self::Raw(serde_json::from_str(json)?))
    }

    /// Classifies a decoded JSON value into the matching arm.
    ///
    /// This is the single classification step of the codec. The order is
    /// fixed: scalars map to their typed arms, objects are tried against the
    /// payload wrapper and fall back to [`Expression::Raw`], and null or
    /// arrays are rejected as unsupported shapes.
    ///
    /// An object only counts as a payload wrapper when it carries the
    /// `payload` key alone and the inner object has exactly the payload
    /// fields. Near misses (extra sibling keys, unknown inner keys, a
    /// non-object value) go to the opaque arm instead, so nothing the
    /// engine emits is decoded lossily.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::String(s)),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Ok(Self::Number(f)),
                // arbitrary-precision numbers stay in the fragment arm
                None => Ok(Self::Raw(Value::Number(n))),
            },
            Value::Bool(b) => Ok(Self::Boolean(b)),
            Value::Object(map) => {
                if map.len() == 1
                    && let Some(inner) = map.get(PAYLOAD_KEY)
                    && let Ok(payload) = serde_json::from_value::<Payload>(inner.clone())
                {
                    return Ok(Self::Payload(payload));
                }
                trace!("object does not match the payload wrapper, keeping raw fragment");
                Ok(Self::Raw(Value::Object(map)))
            }
            Value::Null => Err(Error::UnsupportedShape { json_type: "null" }),
            Value::Array(_) => Err(Error::UnsupportedShape { json_type: "array" }),
        }
    }
}

impl From<&str> for Expression {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Expression {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Expression {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Payload> for Expression {
    fn from(value: Payload) -> Self {
        Self::Payload(value)
    }
}

impl Serialize for Expression {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Raw(fragment) => fragment.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Number(n) => serialize_number(*n, serializer),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Payload(payload) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(PAYLOAD_KEY, payload)?;
                map.end()
            }
        }
    }
}

/// The engine prints integral numbers without a fraction; match it so
/// numeric operands survive a textual comparison.
fn serialize_number<S>(value: f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INT {
        serializer.serialize_i64(value as i64)
    } else {
        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_scalars() {
        let s: Expression = serde_json::from_str(r#""192.0.2.1""#).unwrap();
        assert_eq!(s, Expression::String("192.0.2.1".to_string()));

        let n: Expression = serde_json::from_str("443").unwrap();
        assert_eq!(n, Expression::Number(443.0));

        let b: Expression = serde_json::from_str("true").unwrap();
        assert_eq!(b, Expression::Boolean(true));
    }

    #[test]
    fn test_decode_payload_wrapper() {
        let expr: Expression =
            serde_json::from_str(r#"{"payload":{"protocol":"ip","field":"daddr"}}"#).unwrap();
        assert_eq!(
            expr,
            Expression::Payload(Payload::new(PAYLOAD_PROTOCOL_IP4, PAYLOAD_FIELD_IP_DADDR))
        );
    }

    #[test]
    fn test_encode_payload_wrapper() {
        let expr = Expression::from(Payload::new("ip6", "hoplimit"));
        assert_eq!(
            serde_json::to_string(&expr).unwrap(),
            r#"{"payload":{"protocol":"ip6","field":"hoplimit"}}"#
        );
    }

    #[test]
    fn test_unknown_object_shape_round_trips_byte_for_byte() {
        let input = r#"{"meta":{"key":"iifname"}}"#;
        let expr: Expression = serde_json::from_str(input).unwrap();
        assert!(matches!(expr, Expression::Raw(_)));
        assert_eq!(serde_json::to_string(&expr).unwrap(), input);
    }

    #[test]
    fn test_raw_fragment_key_order_is_preserved() {
        let input = r#"{"range":[1024,65535],"b":1,"a":2}"#;
        let expr: Expression = serde_json::from_str(input).unwrap();
        assert_eq!(serde_json::to_string(&expr).unwrap(), input);
    }

    #[test]
    fn test_payload_near_misses_stay_raw() {
        // sibling key next to "payload"
        let sibling: Expression =
            serde_json::from_str(r#"{"payload":{"protocol":"ip","field":"ttl"},"extra":1}"#)
                .unwrap();
        assert!(matches!(sibling, Expression::Raw(_)));

        // unknown key inside the wrapper
        let inner: Expression = serde_json::from_str(
            r#"{"payload":{"protocol":"ip","field":"ttl","base":"nh"}}"#,
        )
        .unwrap();
        assert!(matches!(inner, Expression::Raw(_)));

        // wrapper value is not an object
        let scalar: Expression = serde_json::from_str(r#"{"payload":"ttl"}"#).unwrap();
        assert!(matches!(scalar, Expression::Raw(_)));
    }

    #[test]
    fn test_near_miss_round_trip_is_lossless() {
        let input = r#"{"payload":{"protocol":"ip","field":"ttl"},"extra":1}"#;
        let expr: Expression = serde_json::from_str(input).unwrap();
        assert_eq!(serde_json::to_string(&expr).unwrap(), input);
    }

    #[test]
    fn test_null_and_array_are_rejected() {
        let null_err = serde_json::from_str::<Expression>("null").unwrap_err();
        assert!(null_err.to_string().contains("null"));

        let array_err = serde_json::from_str::<Expression>("[1,2]").unwrap_err();
        assert!(array_err.to_string().contains("array"));
    }

    #[test]
    fn test_integral_numbers_print_without_fraction() {
        assert_eq!(
            serde_json::to_string(&Expression::Number(80.0)).unwrap(),
            "80"
        );
        assert_eq!(
            serde_json::to_string(&Expression::Number(-7.0)).unwrap(),
            "-7"
        );
        assert_eq!(
            serde_json::to_string(&Expression::Number(0.5)).unwrap(),
            "0.5"
        );
    }

    #[test]
    fn test_raw_constructor_rejects_invalid_json() {
        assert!(Expression::raw(r#"{"meta":"#).is_err());
        assert!(Expression::raw(r#"{"meta":{"key":"oifname"}}"#).is_ok());
    }

    #[test]
    fn test_classification_arm_exclusivity() {
        // from_value is total over everything but null/arrays and always
        // lands on exactly one arm
        for (input, want_raw) in [
            (json!("tcp"), false),
            (json!(22), false),
            (json!(false), false),
            (json!({"payload": {"protocol": "th", "field": "dport"}}), false),
            (json!({"ct": {"key": "state"}}), true),
        ] {
            let expr = Expression::from_value(input).unwrap();
            assert_eq!(matches!(expr, Expression::Raw(_)), want_raw);
        }
    }
}
