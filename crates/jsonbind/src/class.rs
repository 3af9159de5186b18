//! Class parsing: the frame around contract member lists.
//!
//! The functions here are the building blocks the [`json_contract!`] macro
//! assembles: open the object, locate and parse each contract member (in
//! document order when it matches contract order, through the location
//! table otherwise), then consume whatever members remain and the closing
//! brace. Ordered classes (objects encoded as JSON arrays) get the
//! positional equivalents.
//!
//! [`json_contract!`]: crate::json_contract

use alloc::string::ToString;

use crate::{
    contract::JsonParse,
    error::{ErrorKind, JsonError},
    locations::{parse_member_name, LocationTable, MemberLocation},
    policy::ParsePolicy,
    state::ParseState,
};

/// Consume `{` and position the cursor at the first member name, recording
/// the class anchor.
pub fn begin_class<'a, P: ParsePolicy>(state: &mut ParseState<'a, P>) -> Result<(), JsonError> {
    state.trim_left();
    state.expect_more()?;
    if P::VALIDATED && !state.front_is(b'{') {
        return Err(state.error(ErrorKind::InvalidClassStart));
    }
    state.set_class_position();
    state.remove_prefix(1);
    state.trim_left();
    Ok(())
}

/// Locate and parse contract member `index`.
pub fn class_member<'a, M, P, const N: usize>(
    table: &mut LocationTable<N>,
    index: usize,
    state: &mut ParseState<'a, P>,
) -> Result<M::Parsed, JsonError>
where
    M: JsonParse<'a, P>,
    P: ParsePolicy,
{
    match table.find(index, state)? {
        MemberLocation::InPlace => M::parse::<false>(state),
        MemberLocation::Cached {
            first,
            last,
            counter,
        } => {
            let mut sub = state.sub(first, last);
            sub.counter = counter;
            M::parse::<true>(&mut sub)
        }
        MemberLocation::Missing => {
            if M::NULLABLE {
                M::absent(state)
            } else {
                Err(state.error(ErrorKind::MissingMember(table.name(index).to_string())))
            }
        }
    }
}

/// Consume members the contract did not ask for and the closing `}`, then
/// trim so the cursor obeys the end-of-value contract.
pub fn class_cleanup<'a, P: ParsePolicy>(state: &mut ParseState<'a, P>) -> Result<(), JsonError> {
    loop {
        state.clean_tail();
        if !state.has_more() {
            if P::VALIDATED {
                return Err(state.error(ErrorKind::UnexpectedEndOfData));
            }
            return Ok(());
        }
        if state.front_is(b'}') {
            state.remove_prefix(1);
            break;
        }
        if P::VALIDATED && !state.is_at_next_class_member() {
            return Err(state.error(ErrorKind::MissingMemberNameOrEndOfClass));
        }
        parse_member_name(state)?;
        state.skip_value()?;
    }
    state.trim_left();
    Ok(())
}

/// Consume `[` and position the cursor at the first element of an ordered
/// class.
pub fn begin_ordered_class<'a, P: ParsePolicy>(
    state: &mut ParseState<'a, P>,
) -> Result<(), JsonError> {
    state.trim_left();
    state.expect_more()?;
    if P::VALIDATED && !state.front_is(b'[') {
        return Err(state.error(ErrorKind::InvalidArrayStart));
    }
    state.set_class_position();
    state.remove_prefix(1);
    state.trim_left();
    Ok(())
}

/// Parse the next ordered-class member.
///
/// `declared_index` skips intervening elements when the contract binds this
/// member to a later array position. A nullable member may be absent when
/// the array ends early.
pub fn ordered_member<'a, M, P>(
    state: &mut ParseState<'a, P>,
    current_index: &mut usize,
    declared_index: Option<usize>,
) -> Result<M::Parsed, JsonError>
where
    M: JsonParse<'a, P>,
    P: ParsePolicy,
{
    if let Some(want) = declared_index {
        if *current_index > want {
            return Err(state.error(ErrorKind::OutOfOrderOrderedMembers));
        }
        while *current_index < want && !state.front_is(b']') {
            state.skip_value()?;
            state.clean_tail();
            state.expect_more()?;
            *current_index += 1;
        }
    }
    *current_index += 1;
    if state.front_is(b']') || !state.has_more() {
        if M::NULLABLE {
            return M::absent(state);
        }
        return Err(state.error(ErrorKind::MissingMember(
            "ordered class member".to_string(),
        )));
    }
    let value = M::parse::<false>(state)?;
    state.clean_tail();
    Ok(value)
}

/// Consume any remaining elements and the closing `]` of an ordered class.
pub fn finish_ordered_class<'a, P: ParsePolicy>(
    state: &mut ParseState<'a, P>,
) -> Result<(), JsonError> {
    loop {
        if !state.has_more() {
            if P::VALIDATED {
                return Err(state.error(ErrorKind::UnexpectedEndOfData));
            }
            return Ok(());
        }
        if state.front_is(b']') {
            state.remove_prefix(1);
            break;
        }
        state.skip_value()?;
        state.clean_tail();
    }
    state.trim_left();
    Ok(())
}
