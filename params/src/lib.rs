//! Presence-tracking optional scalars.
//!
//! A request or config record that embeds [`Param`] fields can tell three
//! input states apart: the field was left out, the field was sent as `null`,
//! or the field was sent with a value. The first two are both *absent*; only
//! the third is *present*. Partial updates touch present fields and nothing
//! else.
//!
//! Four kinds are supported, one alias each: [`StringParam`], [`BoolParam`],
//! [`IntParam`] and [`TimeParam`]. Every kind follows the same contract:
//!
//! - `null` or empty input decodes absent without error.
//! - A failed decode leaves the parameter absent and reports the input.
//! - Absent encodes as `null`; present encodes the kind's canonical token.
//!
//! This crate contains pure domain types with no IO and no async.

mod error;
mod param;
mod scalar;
mod time;

pub use error::ParamError;
pub use param::{NULL_TOKEN, Param};
pub use scalar::{Kind, Scalar, Token};
pub use time::{Layout, Timestamp};

/// Presence-tracking string: quoted text, `""` is present and empty.
pub type StringParam = Param<String>;

/// Presence-tracking boolean: `true`/`false`, bare or quoted, any case.
pub type BoolParam = Param<bool>;

/// Presence-tracking 64-bit signed integer: base-10, bare or quoted.
pub type IntParam = Param<i64>;

/// Presence-tracking timestamp, decoded from any [`Layout`].
///
/// Under `toml` both a quoted string and a native datetime are accepted.
pub type TimeParam = Param<Timestamp>;
