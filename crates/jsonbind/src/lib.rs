//! Contract-driven JSON codec.
//!
//! `jsonbind` binds user types to JSON through compile-time *contracts*: an
//! ordered list of member descriptors naming JSON fields, their parse kind,
//! and conversion policies. The parser consumes the contract directly and
//! builds the final typed value in a single pass over the input, with no
//! intermediate tree. The serializer is the mirror image.
//!
//! ```rust
//! use jsonbind::json_contract;
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: f64,
//!     y: f64,
//! }
//!
//! json_contract! {
//!     ordered struct Point {
//!         x => real,
//!         y => real,
//!     }
//! }
//!
//! let p: Point = jsonbind::from_json("[1.5, 2.5]").unwrap();
//! assert_eq!(p, Point { x: 1.5, y: 2.5 });
//! assert_eq!(jsonbind::to_json(&p), "[1.5,2.5]");
//! ```
//!
//! Objects tolerate arbitrary member order: parsing runs left-to-right while
//! the document matches the contract's order and falls back to a per-class
//! location table when it does not. Strings can be borrowed zero-copy
//! ([`JsonStringRaw`]) or owned with escape translation ([`JsonString`]);
//! checked and unchecked parsing are separate compile-time policies; unknown
//! subtrees stay lazy behind [`JsonValue`].

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod array;
mod class;
mod contract;
mod datetime;
mod error;
mod event;
mod keyvalue;
mod locations;
mod macros;
mod number;
mod pointer;
mod policy;
mod scanner;
mod ser;
mod skip;
mod state;
mod string;
mod value;
mod variant;

#[cfg(test)]
mod tests;

use alloc::{string::String, vec::Vec};

pub use array::{JsonArray, JsonArrayIterator};
pub use contract::{
    BaseKind, CustomJson, JsonBool, JsonClass, JsonContract, JsonCustom, JsonParse, JsonSerialize,
    MaybeQuoted, Nullable, Quoted,
};
pub use datetime::{CivilTime, JsonDate, UtcDateTime};
pub use error::{ErrorKind, JsonError};
pub use event::{json_event_parser, minify_json, JsonEventHandler};
pub use keyvalue::{
    DefaultPairNames, JsonKeyKind, JsonKeyValue, JsonKeyValueArray, KeyValueContainer, PairNames,
};
pub use number::{
    JsonCheckedSigned, JsonCheckedUnsigned, JsonFloat, JsonReal, JsonSigned, JsonUnsigned,
    SignedInteger, UnsignedInteger,
};
pub use policy::{
    Checked, CheckedDisallowHigh, ParseOptions, ParsePolicy, Unchecked, UncheckedDisallowHigh,
};
pub use ser::{JsonWriter, SerializeOptions};
pub use state::ParseState;
pub use string::{JsonString, JsonStringRaw, JsonStringRawOrNull};
pub use value::{json_value, ArrayElements, ClassMembers, JsonRaw, JsonValue, JsonValueKind};
pub use variant::{
    JsonTaggedVariant, JsonVariant, TaggedVariantContract, VariantContract, VariantSerialize,
};

/// Machinery reached by `json_contract!` expansions. Not a public API.
#[doc(hidden)]
pub mod __private {
    pub use crate::class::{
        begin_class, begin_ordered_class, class_cleanup, class_member, finish_ordered_class,
        ordered_member,
    };
    pub use crate::locations::LocationTable;
    pub use crate::ser::emit_member;
}

/// Parse a contract-bound value from `input` under the checked policy.
///
/// # Errors
///
/// Any [`ErrorKind`]: malformed JSON, a missing non-nullable member, or a
/// value that does not fit its contract kind.
pub fn from_json<'a, T: JsonContract<'a>>(input: &'a str) -> Result<T, JsonError> {
    parse_with_policy::<T, Checked>(input)
}

/// Parse trusting the input: format assertions are elided. Malformed input
/// yields garbage values or an imprecise error, never undefined behavior.
///
/// # Errors
///
/// Errors that remain detectable without validation (e.g. allocation-free
/// structural dead ends) are still reported.
pub fn from_json_unchecked<'a, T: JsonContract<'a>>(input: &'a str) -> Result<T, JsonError> {
    parse_with_policy::<T, Unchecked>(input)
}

/// Parse with runtime-selected [`ParseOptions`], dispatching once to the
/// matching compile-time policy.
///
/// # Errors
///
/// As [`from_json`].
pub fn from_json_with_options<'a, T: JsonContract<'a>>(
    input: &'a str,
    options: ParseOptions,
) -> Result<T, JsonError> {
    match (options.checked, options.allow_high_eight_bit) {
        (true, true) => parse_with_policy::<T, Checked>(input),
        (false, true) => parse_with_policy::<T, Unchecked>(input),
        (true, false) => parse_with_policy::<T, CheckedDisallowHigh>(input),
        (false, false) => parse_with_policy::<T, UncheckedDisallowHigh>(input),
    }
}

/// Parse the sub-value selected by `pointer` (e.g. `features[0].geometry`)
/// as a contract-bound value.
///
/// # Errors
///
/// [`ErrorKind::MissingMember`] when the path does not resolve, otherwise as
/// [`from_json`].
pub fn from_json_at<'a, T: JsonContract<'a>>(
    input: &'a str,
    pointer: &str,
) -> Result<T, JsonError> {
    let mut state = ParseState::<Checked>::new(input.as_bytes());
    state.trim_left();
    pointer::select_pointer(&mut state, pointer)?;
    T::parse_json(&mut state)
}

/// Parse a top-level JSON array whose elements go through the kind `E`.
///
/// # Errors
///
/// As [`from_json`].
///
/// # Examples
///
/// ```rust
/// use jsonbind::JsonSigned;
///
/// let v = jsonbind::from_json_array::<JsonSigned<i64>>("[1,2,3]").unwrap();
/// assert_eq!(v, vec![1, 2, 3]);
/// ```
pub fn from_json_array<'a, E>(input: &'a str) -> Result<Vec<E::Parsed>, JsonError>
where
    E: JsonParse<'a, Checked>,
{
    let mut state = ParseState::<Checked>::new(input.as_bytes());
    state.trim_left();
    JsonArray::<E>::parse::<false>(&mut state)
}

fn parse_with_policy<'a, T: JsonContract<'a>, P: ParsePolicy>(
    input: &'a str,
) -> Result<T, JsonError> {
    let mut state = ParseState::<P>::new(input.as_bytes());
    state.trim_left();
    T::parse_json(&mut state)
}

/// Serialize a contract-bound value to compact JSON.
#[must_use]
pub fn to_json<'a, T: JsonContract<'a>>(value: &T) -> String {
    to_json_with_options(value, SerializeOptions::default())
}

/// Serialize with explicit [`SerializeOptions`].
#[must_use]
pub fn to_json_with_options<'a, T: JsonContract<'a>>(
    value: &T,
    options: SerializeOptions,
) -> String {
    let mut writer = JsonWriter::with_options(options);
    value.serialize_json(&mut writer);
    writer.into_string()
}
