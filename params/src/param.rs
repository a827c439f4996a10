//! The presence-tracking wrapper shared by every scalar kind.

use std::fmt;
use std::marker::PhantomData;
use std::str::{self, FromStr};

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Unexpected, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ParamError;
use crate::scalar::{Kind, Scalar, Token};
use crate::time::Timestamp;

/// The serialized form of an absent parameter.
pub const NULL_TOKEN: &str = "null";

/// The single key `toml` wraps a native (unquoted) datetime in.
const TOML_DATETIME_FIELD: &str = "$__toml_private_datetime";

/// A scalar that remembers whether the input actually supplied it.
///
/// Three input states collapse into two: a missing field and an explicit
/// `null` are both absent, a parseable token is present. An absent
/// parameter reports the kind's zero value and encodes as `null`.
///
/// ```
/// use presence_params::IntParam;
///
/// let mut limit: IntParam = "\"25\"".parse().unwrap();
/// assert_eq!(limit.value(), 25);
///
/// limit.clear();
/// assert!(!limit.present());
/// assert_eq!(limit.value(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param<K: Scalar> {
    value: Option<K>,
}

impl<K: Scalar> Param<K> {
    /// An absent parameter.
    #[must_use]
    pub const fn absent() -> Self {
        Self { value: None }
    }

    /// A present parameter holding `value`.
    #[must_use]
    pub const fn new(value: K) -> Self {
        Self { value: Some(value) }
    }

    /// Decode one raw token.
    ///
    /// Empty input and `null` are absent, not errors. `String`, `bool` and
    /// `i64` also accept their value wrapped in a single pair of quotes.
    pub fn decode(raw: &[u8]) -> Result<Self, ParamError> {
        let Ok(text) = str::from_utf8(raw) else {
            let err = ParamError::rejected(K::KIND, String::from_utf8_lossy(raw));
            tracing::debug!(kind = %K::KIND, error = %err, "rejected parameter token");
            return Err(err);
        };
        if text.is_empty() || text == NULL_TOKEN {
            return Ok(Self::absent());
        }

        Token::from_raw(text, K::KIND)
            .and_then(K::from_token)
            .map(Self::new)
            .inspect_err(|err| {
                tracing::debug!(kind = %K::KIND, error = %err, "rejected parameter token");
            })
    }

    /// Decode `raw` into `self`.
    ///
    /// On failure `self` is left absent, never holding a value from an
    /// earlier decode.
    pub fn unmarshal(&mut self, raw: &[u8]) -> Result<(), ParamError> {
        match Self::decode(raw) {
            Ok(decoded) => {
                *self = decoded;
                Ok(())
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    /// Decode a query-string or form value.
    pub fn from_param(param: &str) -> Result<Self, ParamError> {
        Self::decode(param.as_bytes())
    }

    /// JSON encoding: `null` when absent, the kind's canonical token otherwise.
    pub fn encode(&self) -> Result<Vec<u8>, ParamError> {
        serde_json::to_vec(self).map_err(|source| ParamError::Encode {
            kind: K::KIND,
            source,
        })
    }

    pub fn set(&mut self, value: K) {
        self.value = Some(value);
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    #[must_use]
    pub const fn present(&self) -> bool {
        self.value.is_some()
    }

    /// The value, or the kind's zero value when absent.
    #[must_use]
    pub fn value(&self) -> K {
        self.value.clone().unwrap_or_else(K::zero)
    }

    #[must_use]
    pub const fn get(&self) -> Option<&K> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn into_option(self) -> Option<K> {
        self.value
    }

    /// Overwrite `target` when present. Returns whether it was written.
    pub fn apply_to(&self, target: &mut K) -> bool {
        match &self.value {
            Some(value) => {
                target.clone_from(value);
                true
            }
            None => false,
        }
    }
}

impl Param<String> {
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    /// The value as a JSON string literal, `""` when absent.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self.as_str()).unwrap_or_default()
    }
}

impl Param<Timestamp> {
    /// True when absent or holding the zero instant.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.as_ref().is_none_or(Timestamp::is_zero)
    }

    /// Render with a strftime-style pattern, empty when absent.
    #[must_use]
    pub fn format(&self, pattern: &str) -> String {
        self.value
            .as_ref()
            .map(|timestamp| timestamp.format(pattern))
            .unwrap_or_default()
    }
}

impl<K: Scalar> Default for Param<K> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<K: Scalar> From<K> for Param<K> {
    fn from(value: K) -> Self {
        Self::new(value)
    }
}

impl<K: Scalar> From<Option<K>> for Param<K> {
    fn from(value: Option<K>) -> Self {
        Self { value }
    }
}

impl<K: Scalar> FromStr for Param<K> {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_param(s)
    }
}

impl<K: Scalar> fmt::Display for Param<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str(NULL_TOKEN),
        }
    }
}

impl<K: Scalar> Serialize for Param<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.value {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

// Entering through `deserialize_option` lets a struct field that is missing
// from the input come back absent without `#[serde(default)]`.
impl<'de, K: Scalar> Deserialize<'de> for Param<K> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(ParamVisitor(PhantomData))
    }
}

struct ParamVisitor<K>(PhantomData<K>);

impl<K: Scalar> ParamVisitor<K> {
    fn accept<E: de::Error>(token: Token<'_>) -> Result<Param<K>, E> {
        K::from_token(token).map(Param::new).map_err(|err| {
            tracing::debug!(kind = %K::KIND, error = %err, "rejected parameter token");
            E::custom(err)
        })
    }
}

impl<'de, K: Scalar> Visitor<'de> for ParamVisitor<K> {
    type Value = Param<K>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "null or a {} token", K::KIND)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Param::absent())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Param::absent())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Self::accept(Token::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Self::accept(Token::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Self::accept(Token::UInt(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Self::accept(Token::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Self::accept(Token::Str(v.into()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Self::accept(Token::Str(v.into()))
    }

    // Only a timestamp may arrive as a map, and only as toml's datetime.
    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        if K::KIND != Kind::Timestamp {
            return Err(de::Error::invalid_type(Unexpected::Map, &self));
        }
        let Some(key) = map.next_key::<String>()? else {
            return Err(de::Error::invalid_type(Unexpected::Map, &self));
        };
        if key != TOML_DATETIME_FIELD {
            return Err(de::Error::invalid_type(Unexpected::Map, &self));
        }
        let text: String = map.next_value()?;
        if map.next_key::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_type(Unexpected::Map, &self));
        }
        Self::accept(Token::Str(text.into()))
    }
}
