//! Decode and encode failures for parameter values.

use thiserror::Error;

use crate::scalar::Kind;

/// Why a token could not become a [`Param`](crate::Param).
///
/// Every decode variant carries the offending input verbatim so callers can
/// report it back to whoever sent the payload.
#[derive(Debug, Error)]
pub enum ParamError {
    /// The token is not a bare or quoted form of the expected kind.
    #[error("invalid {kind} token: {raw}")]
    MalformedToken { kind: Kind, raw: String },

    /// The token matched none of the accepted timestamp layouts.
    #[error("invalid time format: {raw}")]
    UnsupportedTimeFormat { raw: String },

    /// The integer literal does not fit in an `i64`.
    #[error("{kind} token out of range: {raw}")]
    NumericOverflow { kind: Kind, raw: String },

    /// The text encoder failed while writing a present value.
    #[error("failed to encode {kind} value")]
    Encode {
        kind: Kind,
        #[source]
        source: serde_json::Error,
    },
}

impl ParamError {
    /// The generic "cannot parse as `kind`" error for `raw`.
    ///
    /// Timestamps report through [`ParamError::UnsupportedTimeFormat`] so the
    /// message matches the layout-fallback failure.
    pub(crate) fn rejected(kind: Kind, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match kind {
            Kind::Timestamp => Self::UnsupportedTimeFormat { raw },
            _ => Self::MalformedToken { kind, raw },
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::MalformedToken { kind, .. }
            | Self::NumericOverflow { kind, .. }
            | Self::Encode { kind, .. } => *kind,
            Self::UnsupportedTimeFormat { .. } => Kind::Timestamp,
        }
    }

    /// The input that was rejected, if this is a decode error.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::MalformedToken { raw, .. }
            | Self::UnsupportedTimeFormat { raw }
            | Self::NumericOverflow { raw, .. } => Some(raw),
            Self::Encode { .. } => None,
        }
    }
}
