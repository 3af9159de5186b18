//! Path selection into a document: `features[0].geometry` style pointers.
//!
//! A pointer is a dot-separated list of member names with optional `[idx]`
//! element selectors. Selection repositions the parse state at the chosen
//! sub-value using the skip routines; nothing outside the path is parsed.

use alloc::string::ToString;

use crate::{
    error::{ErrorKind, JsonError},
    locations::parse_member_name,
    policy::ParsePolicy,
    state::ParseState,
};

enum Segment<'p> {
    Member(&'p str),
    Element(usize),
}

/// Split the next segment off the front of `path`.
fn next_segment<'p>(path: &mut &'p str) -> Option<Result<Segment<'p>, ()>> {
    let bytes = path.as_bytes();
    match bytes.first()? {
        b'.' => {
            *path = &path[1..];
            next_segment(path)
        }
        b'[' => {
            let Some(close) = path.find(']') else {
                return Some(Err(()));
            };
            let index = match path[1..close].parse::<usize>() {
                Ok(index) => index,
                Err(_) => return Some(Err(())),
            };
            *path = &path[close + 1..];
            Some(Ok(Segment::Element(index)))
        }
        _ => {
            let end = bytes
                .iter()
                .position(|&b| b == b'.' || b == b'[')
                .unwrap_or(path.len());
            let name = &path[..end];
            *path = &path[end..];
            Some(Ok(Segment::Member(name)))
        }
    }
}

/// Advance `state` to the sub-value selected by `pointer`.
pub(crate) fn select_pointer<'a, P: ParsePolicy>(
    state: &mut ParseState<'a, P>,
    pointer: &str,
) -> Result<(), JsonError> {
    let mut rest = pointer;
    while let Some(segment) = next_segment(&mut rest) {
        let segment =
            segment.map_err(|()| state.error(ErrorKind::MissingMember(pointer.to_string())))?;
        state.trim_left();
        match segment {
            Segment::Member(name) => {
                state.expect_front(b'{', ErrorKind::InvalidClassStart)?;
                state.trim_left();
                loop {
                    if !state.has_more() || state.front_is(b'}') {
                        return Err(state.error(ErrorKind::MissingMember(name.to_string())));
                    }
                    let member = parse_member_name(state)?;
                    if member == name {
                        break;
                    }
                    state.skip_value()?;
                    state.clean_tail();
                }
            }
            Segment::Element(index) => {
                state.expect_front(b'[', ErrorKind::InvalidArrayStart)?;
                state.trim_left();
                for _ in 0..index {
                    if state.front_is(b']') || !state.has_more() {
                        return Err(state.error(ErrorKind::MissingMember(pointer.to_string())));
                    }
                    state.skip_value()?;
                    state.clean_tail();
                }
                if state.front_is(b']') || !state.has_more() {
                    return Err(state.error(ErrorKind::MissingMember(pointer.to_string())));
                }
            }
        }
    }
    Ok(())
}
