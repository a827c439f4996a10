//! The four value kinds a [`Param`](crate::Param) can carry, and the lenient
//! coercions that turn an input token into one of them.

use std::borrow::Cow;
use std::fmt;
use std::num::IntErrorKind;

use serde::Serialize;

use crate::error::ParamError;
use crate::time::Timestamp;

mod sealed {
    use super::Timestamp;

    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for bool {}
    impl Sealed for i64 {}
    impl Sealed for Timestamp {}
}

/// Which scalar kind a value or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Bool,
    Int,
    Timestamp,
}

impl Kind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scalar input token, as handed over by a host deserializer or
/// split off a raw parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// A string token with its quotes already removed and escapes resolved.
    Str(Cow<'a, str>),
    /// Unquoted text from the raw entry point.
    Bare(&'a str),
}

impl<'a> Token<'a> {
    /// Split raw parameter text into a token.
    ///
    /// A single surrounding pair of `"` marks a string token; its contents are
    /// unescaped with JSON string rules. Anything else is kept bare.
    pub(crate) fn from_raw(raw: &'a str, kind: Kind) -> Result<Self, ParamError> {
        let quoted = raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"');
        if !quoted {
            return Ok(Self::Bare(raw));
        }
        serde_json::from_str::<String>(raw)
            .map(|text| Self::Str(Cow::Owned(text)))
            .map_err(|_| ParamError::rejected(kind, raw))
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::UInt(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::Str(text) => write!(f, "{text:?}"),
            Self::Bare(text) => f.write_str(text),
        }
    }
}

/// A value kind that [`Param`](crate::Param) can track presence for.
///
/// Sealed: the set of kinds is fixed to `String`, `bool`, `i64` and
/// [`Timestamp`].
pub trait Scalar:
    sealed::Sealed + Serialize + fmt::Display + fmt::Debug + Clone + PartialEq + Sized
{
    const KIND: Kind;

    /// The value reported while the parameter is absent.
    fn zero() -> Self;

    /// Coerce one token into this kind.
    fn from_token(token: Token<'_>) -> Result<Self, ParamError>;
}

impl Scalar for String {
    const KIND: Kind = Kind::String;

    fn zero() -> Self {
        String::new()
    }

    fn from_token(token: Token<'_>) -> Result<Self, ParamError> {
        match token {
            Token::Str(text) => Ok(text.into_owned()),
            other => Err(ParamError::rejected(Self::KIND, other.to_string())),
        }
    }
}

impl Scalar for bool {
    const KIND: Kind = Kind::Bool;

    fn zero() -> Self {
        false
    }

    fn from_token(token: Token<'_>) -> Result<Self, ParamError> {
        let text = match &token {
            Token::Bool(value) => return Ok(*value),
            Token::Str(text) => &**text,
            Token::Bare(text) => *text,
            _ => return Err(ParamError::rejected(Self::KIND, token.to_string())),
        };
        if text.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ParamError::rejected(Self::KIND, token.to_string()))
        }
    }
}

/// 2^63. Floats at or above it, or below its negation, lie outside `i64`.
const I64_MAGNITUDE_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl Scalar for i64 {
    const KIND: Kind = Kind::Int;

    fn zero() -> Self {
        0
    }

    fn from_token(token: Token<'_>) -> Result<Self, ParamError> {
        match &token {
            Token::Int(value) => Ok(*value),
            Token::UInt(value) => i64::try_from(*value).map_err(|_| ParamError::NumericOverflow {
                kind: Self::KIND,
                raw: token.to_string(),
            }),
            // Integer literals past u64 reach us as floats from some hosts. A
            // float any i64 could hold is malformed like every other float.
            Token::Float(value) if *value >= I64_MAGNITUDE_BOUND || *value < -I64_MAGNITUDE_BOUND => {
                Err(ParamError::NumericOverflow {
                    kind: Self::KIND,
                    raw: token.to_string(),
                })
            }
            Token::Str(text) => parse_integer(text, &token),
            Token::Bare(text) => parse_integer(text, &token),
            Token::Bool(_) | Token::Float(_) => {
                Err(ParamError::rejected(Self::KIND, token.to_string()))
            }
        }
    }
}

/// Parse a base-10 integer literal: optional `-`, digits, no leading zeros.
fn parse_integer(text: &str, token: &Token<'_>) -> Result<i64, ParamError> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let well_formed = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && !(digits.len() > 1 && digits.starts_with('0'));
    if !well_formed {
        return Err(ParamError::rejected(Kind::Int, token.to_string()));
    }

    text.parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ParamError::NumericOverflow {
            kind: Kind::Int,
            raw: token.to_string(),
        },
        _ => ParamError::rejected(Kind::Int, token.to_string()),
    })
}

impl Scalar for Timestamp {
    const KIND: Kind = Kind::Timestamp;

    fn zero() -> Self {
        Timestamp::zero()
    }

    fn from_token(token: Token<'_>) -> Result<Self, ParamError> {
        let parsed = match &token {
            Token::Str(text) => Timestamp::parse(text),
            Token::Bare(text) => Timestamp::parse(text),
            _ => None,
        };
        parsed.ok_or_else(|| ParamError::rejected(Self::KIND, token.to_string()))
    }
}
