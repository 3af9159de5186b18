//! Variant kinds: untagged (value-discriminated) and tagged (discriminated
//! by a sibling member of the enclosing class).

use alloc::string::ToString;
use core::marker::PhantomData;

use crate::{
    contract::{BaseKind, JsonParse, JsonSerialize},
    error::{ErrorKind, JsonError},
    locations::parse_member_name,
    policy::ParsePolicy,
    ser::JsonWriter,
    state::ParseState,
};

/// A user enum parseable from more than one JSON shape.
///
/// The engine classifies the value by its first non-whitespace byte and
/// hands the [`BaseKind`] over; the implementation parses the matching
/// alternative or rejects with [`ErrorKind::UnexpectedJsonType`].
pub trait VariantContract<'a, P: ParsePolicy>: Sized {
    /// Parse the alternative selected by `base`.
    fn parse_variant(base: BaseKind, state: &mut ParseState<'a, P>) -> Result<Self, JsonError>;
}

/// Serialization side of a variant: write whichever alternative is held.
pub trait VariantSerialize {
    /// Append the active alternative's JSON encoding.
    fn serialize_variant(&self, w: &mut JsonWriter);
}

/// An untagged variant member.
#[derive(Debug, Clone, Copy)]
pub struct JsonVariant<V>(PhantomData<V>);

impl<'a, P, V> JsonParse<'a, P> for JsonVariant<V>
where
    P: ParsePolicy,
    V: VariantContract<'a, P>,
{
    type Parsed = V;
    const BASE: BaseKind = BaseKind::Class;

    fn parse<const KNOWN_BOUNDS: bool>(state: &mut ParseState<'a, P>) -> Result<V, JsonError> {
        state.trim_left();
        state.expect_more()?;
        let base = BaseKind::classify(state.front())
            .ok_or_else(|| state.error(ErrorKind::UnexpectedJsonType))?;
        V::parse_variant(base, state)
    }
}

impl<'a, V: VariantSerialize> JsonSerialize<'a> for JsonVariant<V> {
    type Value = V;

    fn emit(value: &V, w: &mut JsonWriter) {
        value.serialize_variant(w);
    }
}

/// A user enum whose alternative is selected by a sibling *tag member* of
/// the enclosing class.
///
/// Before the value is parsed, the engine re-scans the enclosing class for
/// `TAG_MEMBER`, parses it with the `Tag` kind, and passes the result to
/// [`parse_selected`], which plays the role of the contract's switcher.
///
/// [`parse_selected`]: TaggedVariantContract::parse_selected
pub trait TaggedVariantContract<'a, P: ParsePolicy>: Sized {
    /// Kind of the tag member.
    type Tag: JsonParse<'a, P>;

    /// Name of the tag member inside the enclosing class.
    const TAG_MEMBER: &'static str;

    /// Parse the alternative selected by the tag value.
    fn parse_selected(
        tag: <Self::Tag as JsonParse<'a, P>>::Parsed,
        state: &mut ParseState<'a, P>,
    ) -> Result<Self, JsonError>;
}

/// A tagged variant member.
#[derive(Debug, Clone, Copy)]
pub struct JsonTaggedVariant<V>(PhantomData<V>);

impl<'a, P, V> JsonParse<'a, P> for JsonTaggedVariant<V>
where
    P: ParsePolicy,
    V: TaggedVariantContract<'a, P>,
{
    type Parsed = V;
    const BASE: BaseKind = BaseKind::Class;

    fn parse<const KNOWN_BOUNDS: bool>(state: &mut ParseState<'a, P>) -> Result<V, JsonError> {
        let mut tag_state = find_tag_member(state, V::TAG_MEMBER)?;
        let tag = V::Tag::parse::<false>(&mut tag_state)?;
        V::parse_selected(tag, state)
    }
}

impl<'a, V: VariantSerialize> JsonSerialize<'a> for JsonTaggedVariant<V> {
    type Value = V;

    fn emit(value: &V, w: &mut JsonWriter) {
        value.serialize_variant(w);
    }
}

/// Search the enclosing class (from its recorded `{`) for `name` and return
/// a state positioned at that member's value.
fn find_tag_member<'a, P: ParsePolicy>(
    state: &ParseState<'a, P>,
    name: &'static str,
) -> Result<ParseState<'a, P>, JsonError> {
    let mut scan = state.sub(state.class_first, state.data().len());
    scan.expect_front(b'{', ErrorKind::InvalidClassStart)?;
    scan.trim_left();
    loop {
        if !scan.has_more() || scan.front_is(b'}') {
            return Err(scan.error(ErrorKind::MissingMember(name.to_string())));
        }
        if P::VALIDATED && !scan.is_at_next_class_member() {
            return Err(scan.error(ErrorKind::MissingMemberNameOrEndOfClass));
        }
        let member = parse_member_name(&mut scan)?;
        if member == name {
            return Ok(scan);
        }
        scan.skip_value()?;
        scan.clean_tail();
    }
}
