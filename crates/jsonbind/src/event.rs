//! The event walker: a push-style re-skin of the parser, and the minifier
//! built on top of it.
//!
//! The walker visits every value in the document and invokes the handler's
//! callbacks, bracketing containers with start/end pairs. Any callback may
//! return `false` to stop the walk. Values reach the handler as lazy
//! [`JsonValue`] views, so nothing is materialized the handler does not ask
//! for.

use alloc::{string::String, vec::Vec};

use crate::{
    error::{ErrorKind, JsonError},
    locations::parse_member_name,
    policy::Checked,
    state::ParseState,
    value::{JsonValue, JsonValueKind},
};

/// Callbacks invoked by [`json_event_parser`].
///
/// `member` is the raw member name (escapes intact) when the value sits
/// inside an object, `None` for the root and for array elements. Returning
/// `false` from any callback stops the walk.
pub trait JsonEventHandler<'a> {
    /// A primitive value (or any value, for handlers that do not descend).
    fn on_value(&mut self, member: Option<&'a str>, value: JsonValue<'a>) -> bool {
        let _ = (member, value);
        true
    }

    /// An object is starting.
    fn on_class_start(&mut self, member: Option<&'a str>) -> bool {
        let _ = member;
        true
    }

    /// The current object ended.
    fn on_class_end(&mut self) -> bool {
        true
    }

    /// An array is starting.
    fn on_array_start(&mut self, member: Option<&'a str>) -> bool {
        let _ = member;
        true
    }

    /// The current array ended.
    fn on_array_end(&mut self) -> bool {
        true
    }
}

/// Walk `input`, pushing events into `handler`.
///
/// Returns `Ok(true)` when the document was fully walked, `Ok(false)` when
/// the handler stopped early, and `Err` on malformed input.
pub fn json_event_parser<'a, H: JsonEventHandler<'a>>(
    input: &'a str,
    handler: &mut H,
) -> Result<bool, JsonError> {
    let mut state = ParseState::<Checked>::new(input.as_bytes());
    state.trim_left();
    state.expect_more()?;
    walk_value(&mut state, None, handler)
}

fn walk_value<'a, H: JsonEventHandler<'a>>(
    state: &mut ParseState<'a, Checked>,
    member: Option<&'a str>,
    handler: &mut H,
) -> Result<bool, JsonError> {
    match state.front() {
        b'{' => {
            if !handler.on_class_start(member) {
                return Ok(false);
            }
            state.remove_prefix(1);
            state.trim_left();
            loop {
                if state.front_is(b'}') {
                    state.remove_prefix(1);
                    state.trim_left();
                    return Ok(handler.on_class_end());
                }
                if !state.has_more() {
                    return Err(state.error(ErrorKind::UnexpectedEndOfData));
                }
                if !state.is_at_next_class_member() {
                    return Err(state.error(ErrorKind::MissingMemberNameOrEndOfClass));
                }
                let name = parse_member_name(state)?;
                if !walk_value(state, Some(name), handler)? {
                    return Ok(false);
                }
                state.clean_tail();
            }
        }
        b'[' => {
            if !handler.on_array_start(member) {
                return Ok(false);
            }
            state.remove_prefix(1);
            state.trim_left();
            loop {
                if state.front_is(b']') {
                    state.remove_prefix(1);
                    state.trim_left();
                    return Ok(handler.on_array_end());
                }
                if !state.has_more() {
                    return Err(state.error(ErrorKind::UnexpectedEndOfData));
                }
                if !walk_value(state, None, handler)? {
                    return Ok(false);
                }
                state.clean_tail();
            }
        }
        _ => {
            let sub = state.skip_value()?;
            state.trim_left();
            Ok(handler.on_value(member, JsonValue::from_state(&sub)))
        }
    }
}

/// Rewrite `input` with inter-token whitespace removed and `null` object
/// members dropped. String and number tokens are preserved byte-exactly.
///
/// # Examples
///
/// ```rust
/// let out = jsonbind::minify_json("{ \"a\" : 1 , \"b\" : null }").unwrap();
/// assert_eq!(out, "{\"a\":1}");
/// ```
pub fn minify_json(input: &str) -> Result<String, JsonError> {
    let mut minifier = Minifier {
        out: String::with_capacity(input.len()),
        first_stack: Vec::new(),
    };
    json_event_parser(input, &mut minifier)?;
    Ok(minifier.out)
}

struct Minifier {
    out: String,
    first_stack: Vec<bool>,
}

impl Minifier {
    fn separator(&mut self, member: Option<&str>) {
        if let Some(first) = self.first_stack.last_mut() {
            if !*first {
                self.out.push(',');
            }
            *first = false;
        }
        if let Some(name) = member {
            self.out.push('"');
            self.out.push_str(name);
            self.out.push_str("\":");
        }
    }
}

impl<'a> JsonEventHandler<'a> for Minifier {
    fn on_value(&mut self, member: Option<&'a str>, value: JsonValue<'a>) -> bool {
        if member.is_some() && value.kind() == JsonValueKind::Null {
            return true;
        }
        self.separator(member);
        self.out.push_str(value.as_raw_text());
        true
    }

    fn on_class_start(&mut self, member: Option<&'a str>) -> bool {
        self.separator(member);
        self.out.push('{');
        self.first_stack.push(true);
        true
    }

    fn on_class_end(&mut self) -> bool {
        self.first_stack.pop();
        self.out.push('}');
        true
    }

    fn on_array_start(&mut self, member: Option<&'a str>) -> bool {
        self.separator(member);
        self.out.push('[');
        self.first_stack.push(true);
        true
    }

    fn on_array_end(&mut self) -> bool {
        self.first_stack.pop();
        self.out.push(']');
        true
    }
}
