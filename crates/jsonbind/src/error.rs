//! The error taxonomy and the public [`JsonError`] type.
//!
//! Every fallible entry point in the crate returns `Result<_, JsonError>`.
//! A `JsonError` carries the failure [`ErrorKind`], the byte offset into the
//! input where the failure was detected, and, when the failure happened
//! inside an object, a short snippet of source text starting at the
//! enclosing `{` so the message is actionable without the caller having to
//! re-slice the document.

use alloc::string::String;
use core::fmt;

use thiserror::Error;

/// Classification of parse, schema, and encoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    // ------------------------------- structural -------------------------------
    /// Expected a `{` at the start of an object.
    #[error("expected '{{' at start of class")]
    InvalidClassStart,
    /// Expected a `[` at the start of an array.
    #[error("expected '[' at start of array")]
    InvalidArrayStart,
    /// The input ended before the value did.
    #[error("unexpected end of data")]
    UnexpectedEndOfData,
    /// A parser positioned on an exact sub-range tried to read past it.
    #[error("attempt to access past end of value")]
    AttemptToAccessPastEndOfValue,
    /// Inside an object, neither a quoted member name nor `}` was found.
    #[error("expected a member name or end of class")]
    MissingMemberNameOrEndOfClass,
    /// An ordered-class contract declared indexes that go backwards.
    #[error("ordered class members must be declared in ascending index order")]
    OutOfOrderOrderedMembers,

    // ------------------------------ value shape -------------------------------
    /// The bytes at the cursor do not form a JSON number.
    #[error("invalid number")]
    InvalidNumber,
    /// A parsed integer does not fit in the destination type.
    #[error("number out of range for destination type")]
    NumberOutOfRange,
    /// A real value was NaN where NaN is not permitted.
    #[error("number is NaN")]
    NumberIsNaN,
    /// A real value was infinite where infinities are not permitted.
    #[error("number is infinite")]
    NumberIsInf,
    /// Expected one of the literals `true`, `false`, or `null`.
    #[error("invalid literal")]
    InvalidLiteral,
    /// An ISO-8601 timestamp failed to parse or had out-of-range fields.
    #[error("invalid ISO-8601 timestamp")]
    InvalidTimestamp,
    /// A `\u` escape was malformed (non-hex digits, truncated, or a high
    /// surrogate without its low half).
    #[error("invalid \\u escape sequence")]
    InvalidUtfEscape,
    /// An escape sequence decoded to something that is not a Unicode scalar
    /// value.
    #[error("escape decodes to an invalid code point")]
    InvalidUtfCodepoint,
    /// A byte outside `0x20..=0x7F` appeared in a string under a seven-bit
    /// policy.
    #[error("byte outside 0x20..=0x7F in seven-bit string")]
    InvalidStringHighAscii,

    // --------------------------------- schema ---------------------------------
    /// A non-nullable contract member was absent from the object.
    #[error("missing non-nullable member {0:?}")]
    MissingMember(String),
    /// The JSON value's shape matches no alternative of the contract.
    #[error("JSON value does not match any contract alternative")]
    UnexpectedJsonType,
    /// A required structural token was absent.
    #[error("missing expected token {0:?}")]
    MissingToken(char),
}

/// Maximum number of source bytes captured in [`JsonError::context`].
pub(crate) const CONTEXT_LEN: usize = 150;

/// A failed parse or schema mismatch.
///
/// Produced by every fallible entry point. `offset` is the byte position in
/// the original input where the failure was detected; `context` is a snippet
/// of up to 150 bytes starting at the enclosing object, when one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonError {
    kind: ErrorKind,
    offset: usize,
    context: Option<String>,
}

impl JsonError {
    pub(crate) fn new(kind: ErrorKind, offset: usize, context: Option<String>) -> Self {
        Self {
            kind,
            offset,
            context,
        }
    }

    /// The failure classification.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Byte offset into the input where the failure was detected.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Source text around the enclosing object, when available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.offset)?;
        if let Some(ctx) = &self.context {
            write!(f, " near {ctx:?}")?;
        }
        Ok(())
    }
}

impl core::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.kind)
    }
}
