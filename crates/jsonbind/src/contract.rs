//! The contract model: kind descriptors, the parse/serialize traits they
//! implement, and the modifier wrappers.
//!
//! A *contract* binds a user type to JSON at compile time. Member kinds are
//! zero-sized marker types ([`JsonBool`], [`JsonSigned`], [`JsonString`], …)
//! implementing [`JsonParse`] and [`JsonSerialize`]; class contracts are
//! [`JsonContract`] impls, usually generated by [`json_contract!`].
//! Modifiers compose: `Nullable<Quoted<JsonSigned<i32>>>` is a member that
//! may be `null` or absent and whose number is surrounded by quotes.
//!
//! [`json_contract!`]: crate::json_contract

use alloc::string::String;
use core::marker::PhantomData;

use crate::{
    error::{ErrorKind, JsonError},
    policy::ParsePolicy,
    ser::JsonWriter,
    state::ParseState,
};

/// The base JSON shape of a value, as determined by its first byte.
///
/// Untagged variants dispatch on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseKind {
    /// A JSON object.
    Class,
    /// A JSON array.
    Array,
    /// `true` or `false`.
    Bool,
    /// A quoted string.
    String,
    /// A number.
    Number,
    /// The `null` literal.
    Null,
}

impl BaseKind {
    /// Classify a value by its first non-whitespace byte.
    #[must_use]
    pub fn classify(b: u8) -> Option<Self> {
        match b {
            b'{' => Some(Self::Class),
            b'[' => Some(Self::Array),
            b't' | b'f' => Some(Self::Bool),
            b'"' => Some(Self::String),
            b'0'..=b'9' | b'+' | b'-' => Some(Self::Number),
            b'n' => Some(Self::Null),
            _ => None,
        }
    }
}

/// A member kind that can parse itself out of a [`ParseState`].
///
/// `KNOWN_BOUNDS` is true when the caller has already skipped the value, so
/// the state's range spans exactly the value's token text and no trailing
/// scan or end-of-item assertion is required.
pub trait JsonParse<'a, P: ParsePolicy>: Sized {
    /// The value this kind produces.
    type Parsed;

    /// Base shape for variant dispatch.
    const BASE: BaseKind;

    /// `true` when an absent member is representable ([`Nullable`]).
    const NULLABLE: bool = false;

    /// Parse one value. On success the cursor sits at `,`, `}`, `]`, or the
    /// end of the range, with whitespace trimmed (unless `KNOWN_BOUNDS`).
    fn parse<const KNOWN_BOUNDS: bool>(
        state: &mut ParseState<'a, P>,
    ) -> Result<Self::Parsed, JsonError>;

    /// Parse when the value sits inside surrounding quotes
    /// (literal-as-string). The cursor stops at the closing quote, which the
    /// caller consumes. Kinds that cannot appear quoted keep the default.
    fn parse_quoted(state: &mut ParseState<'a, P>) -> Result<Self::Parsed, JsonError> {
        Self::parse::<true>(state)
    }

    /// The value for a nullable member that is absent from its object.
    /// Only called when [`Self::NULLABLE`] is true.
    fn absent(state: &ParseState<'a, P>) -> Result<Self::Parsed, JsonError> {
        Err(state.error(ErrorKind::UnexpectedJsonType))
    }
}

/// A member kind that can write its value back as JSON.
pub trait JsonSerialize<'a> {
    /// The value this kind writes; matches [`JsonParse::Parsed`].
    type Value;

    /// Append the JSON encoding of `value`.
    fn emit(value: &Self::Value, w: &mut JsonWriter);

    /// `true` when a class member holding `value` should be omitted.
    fn is_absent(_value: &Self::Value) -> bool {
        false
    }
}

/// A user type bound to JSON by a member contract.
///
/// Implementations are normally generated by [`json_contract!`]; hand-written
/// impls cover shapes the macro does not, such as tagged variants.
///
/// [`json_contract!`]: crate::json_contract
pub trait JsonContract<'a>: Sized {
    /// Member names in declared order. Feeds the class location table and
    /// diagnostics.
    const MEMBER_NAMES: &'static [&'static str] = &[];

    /// Parse the complete value (including its delimiters) at the cursor.
    fn parse_json<P: ParsePolicy>(state: &mut ParseState<'a, P>) -> Result<Self, JsonError>;

    /// Write the complete value.
    fn serialize_json(&self, w: &mut JsonWriter);
}

// ---------------------------------------------------------------------------
// Bool
// ---------------------------------------------------------------------------

/// The `true`/`false` kind.
#[derive(Debug, Clone, Copy)]
pub struct JsonBool;

impl<'a, P: ParsePolicy> JsonParse<'a, P> for JsonBool {
    type Parsed = bool;
    const BASE: BaseKind = BaseKind::Bool;

    fn parse<const KNOWN_BOUNDS: bool>(state: &mut ParseState<'a, P>) -> Result<bool, JsonError> {
        state.expect_more()?;
        let value = if P::VALIDATED {
            if state.as_bytes().starts_with(b"true") {
                state.remove_prefix(4);
                true
            } else if state.as_bytes().starts_with(b"false") {
                state.remove_prefix(5);
                false
            } else {
                return Err(state.error(ErrorKind::InvalidLiteral));
            }
        } else if state.front() == b't' {
            state.remove_prefix(4);
            true
        } else {
            state.remove_prefix(5);
            false
        };
        if !KNOWN_BOUNDS {
            state.assert_item_end(ErrorKind::InvalidLiteral)?;
        }
        Ok(value)
    }

    fn parse_quoted(state: &mut ParseState<'a, P>) -> Result<bool, JsonError> {
        Self::parse::<true>(state)
    }
}

impl<'a> JsonSerialize<'a> for JsonBool {
    type Value = bool;

    fn emit(value: &bool, w: &mut JsonWriter) {
        w.write_bool(*value);
    }
}

// ---------------------------------------------------------------------------
// Nullable
// ---------------------------------------------------------------------------

/// Wraps any kind so that `null`, or an absent member, parses to `None`.
#[derive(Debug, Clone, Copy)]
pub struct Nullable<M>(PhantomData<M>);

impl<'a, P: ParsePolicy, M: JsonParse<'a, P>> JsonParse<'a, P> for Nullable<M> {
    type Parsed = Option<M::Parsed>;
    const BASE: BaseKind = M::BASE;
    const NULLABLE: bool = true;

    fn parse<const KNOWN_BOUNDS: bool>(
        state: &mut ParseState<'a, P>,
    ) -> Result<Self::Parsed, JsonError> {
        if KNOWN_BOUNDS {
            if state.len() == 0 || state.is_null() {
                return Ok(None);
            }
            return M::parse::<true>(state).map(Some);
        }
        if !state.has_more() {
            return Ok(None);
        }
        if state.front() == b'n' {
            state.skip_literal(b"null")?;
            state.assert_item_end(ErrorKind::InvalidLiteral)?;
            return Ok(None);
        }
        M::parse::<false>(state).map(Some)
    }

    fn absent(_state: &ParseState<'a, P>) -> Result<Self::Parsed, JsonError> {
        Ok(None)
    }
}

impl<'a, M: JsonSerialize<'a>> JsonSerialize<'a> for Nullable<M> {
    type Value = Option<M::Value>;

    fn emit(value: &Self::Value, w: &mut JsonWriter) {
        match value {
            Some(inner) => M::emit(inner, w),
            None => w.write_null(),
        }
    }

    fn is_absent(value: &Self::Value) -> bool {
        value.is_none()
    }
}

// ---------------------------------------------------------------------------
// Quoted literals
// ---------------------------------------------------------------------------

/// The wrapped kind's literal is always surrounded by quotes in the JSON
/// text, e.g. `"314159"` for a number member.
#[derive(Debug, Clone, Copy)]
pub struct Quoted<M>(PhantomData<M>);

impl<'a, P: ParsePolicy, M: JsonParse<'a, P>> JsonParse<'a, P> for Quoted<M> {
    type Parsed = M::Parsed;
    const BASE: BaseKind = BaseKind::String;

    fn parse<const KNOWN_BOUNDS: bool>(
        state: &mut ParseState<'a, P>,
    ) -> Result<Self::Parsed, JsonError> {
        state.expect_more()?;
        state.expect_front(b'"', ErrorKind::MissingToken('"'))?;
        let value = M::parse_quoted(state)?;
        state.expect_front(b'"', ErrorKind::MissingToken('"'))?;
        if !KNOWN_BOUNDS {
            state.assert_item_end(ErrorKind::InvalidLiteral)?;
        }
        Ok(value)
    }
}

impl<'a, M: JsonSerialize<'a>> JsonSerialize<'a> for Quoted<M> {
    type Value = M::Value;

    fn emit(value: &Self::Value, w: &mut JsonWriter) {
        w.write_raw("\"");
        M::emit(value, w);
        w.write_raw("\"");
    }
}

/// Like [`Quoted`] but the quotes are optional in the JSON text. Serializes
/// without quotes.
#[derive(Debug, Clone, Copy)]
pub struct MaybeQuoted<M>(PhantomData<M>);

impl<'a, P: ParsePolicy, M: JsonParse<'a, P>> JsonParse<'a, P> for MaybeQuoted<M> {
    type Parsed = M::Parsed;
    const BASE: BaseKind = M::BASE;

    fn parse<const KNOWN_BOUNDS: bool>(
        state: &mut ParseState<'a, P>,
    ) -> Result<Self::Parsed, JsonError> {
        if state.front_is(b'"') {
            Quoted::<M>::parse::<KNOWN_BOUNDS>(state)
        } else {
            M::parse::<KNOWN_BOUNDS>(state)
        }
    }
}

impl<'a, M: JsonSerialize<'a>> JsonSerialize<'a> for MaybeQuoted<M> {
    type Value = M::Value;

    fn emit(value: &Self::Value, w: &mut JsonWriter) {
        M::emit(value, w);
    }
}

// ---------------------------------------------------------------------------
// Nested class
// ---------------------------------------------------------------------------

/// A member whose value is another contract-bound object.
#[derive(Debug, Clone, Copy)]
pub struct JsonClass<T>(PhantomData<T>);

impl<'a, P: ParsePolicy, T: JsonContract<'a>> JsonParse<'a, P> for JsonClass<T> {
    type Parsed = T;
    const BASE: BaseKind = BaseKind::Class;

    fn parse<const KNOWN_BOUNDS: bool>(state: &mut ParseState<'a, P>) -> Result<T, JsonError> {
        // The nested parse re-anchors `class_first`; restore it so later
        // siblings (tagged variants, error context) still see this class.
        let anchor = state.class_first;
        let value = T::parse_json(state)?;
        state.class_first = anchor;
        Ok(value)
    }
}

impl<'a, T: JsonContract<'a>> JsonSerialize<'a> for JsonClass<T> {
    type Value = T;

    fn emit(value: &T, w: &mut JsonWriter) {
        value.serialize_json(w);
    }
}

// ---------------------------------------------------------------------------
// Custom conversions
// ---------------------------------------------------------------------------

/// A type with user-supplied text conversions, for members whose JSON
/// encoding is a string in a domain format (identifiers, IP addresses, …).
pub trait CustomJson: Sized {
    /// Parse from the member's raw text (quotes stripped, escapes intact).
    fn from_json_text(text: &str) -> Option<Self>;

    /// Write the member's text form; the serializer quotes and escapes it.
    fn write_json_text(&self, out: &mut String);
}

/// A member converted through [`CustomJson`].
#[derive(Debug, Clone, Copy)]
pub struct JsonCustom<T>(PhantomData<T>);

impl<'a, P: ParsePolicy, T: CustomJson> JsonParse<'a, P> for JsonCustom<T> {
    type Parsed = T;
    const BASE: BaseKind = BaseKind::String;

    fn parse<const KNOWN_BOUNDS: bool>(state: &mut ParseState<'a, P>) -> Result<T, JsonError> {
        let token = if KNOWN_BOUNDS {
            *state
        } else {
            let token = state.skip_value()?;
            state.assert_item_end(ErrorKind::InvalidLiteral)?;
            token
        };
        let bytes = token.as_bytes();
        let text = if bytes.len() >= 2 && bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"' {
            &token.as_str()[1..bytes.len() - 1]
        } else {
            token.as_str()
        };
        T::from_json_text(text).ok_or_else(|| token.error(ErrorKind::InvalidLiteral))
    }
}

impl<'a, T: CustomJson> JsonSerialize<'a> for JsonCustom<T> {
    type Value = T;

    fn emit(value: &T, w: &mut JsonWriter) {
        let mut text = String::new();
        value.write_json_text(&mut text);
        w.write_string(&text);
    }
}
