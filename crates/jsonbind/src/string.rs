//! String kinds: borrowed raw text and owned escape-translated text.
//!
//! [`JsonStringRaw`] borrows the string body straight out of the input
//! buffer, escapes intact; the borrow is tied to the input's lifetime.
//! [`JsonString`] owns its result and translates escapes, including
//! `\uXXXX` with surrogate-pair combination. When the preceding skip saw no
//! backslash the owned kind takes a single-copy fast path.

use alloc::string::String;

use crate::{
    contract::{BaseKind, JsonParse, JsonSerialize},
    error::{ErrorKind, JsonError},
    policy::ParsePolicy,
    ser::JsonWriter,
    state::{ParseState, NO_COUNT},
};

/// Resolve the body range of a string token.
///
/// With `KNOWN_BOUNDS` the state spans the quoted token (as cached by a
/// skip) and the quotes are stripped here; otherwise the token is skipped
/// off the live cursor. Returns the body sub-state, whose `counter` carries
/// the first-escape offset.
fn string_body<'a, P: ParsePolicy, const KNOWN_BOUNDS: bool>(
    state: &mut ParseState<'a, P>,
) -> Result<ParseState<'a, P>, JsonError> {
    let token = if KNOWN_BOUNDS {
        *state
    } else {
        state.expect_more()?;
        state.skip_string()?
    };
    let bytes = token.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"' {
        let mut body = token.sub(token.first + 1, token.last - 1);
        body.counter = token.counter;
        Ok(body)
    } else if P::VALIDATED {
        Err(token.error(ErrorKind::MissingToken('"')))
    } else {
        Ok(token)
    }
}

/// Translate an escaped string body into owned text.
///
/// `first_escape` is the offset of the first backslash within `body`; the
/// prefix before it is copied in one piece.
fn unescape<'a, P: ParsePolicy>(
    body: &ParseState<'a, P>,
    first_escape: usize,
) -> Result<String, JsonError> {
    let bytes = body.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    out.push_str(&body.as_str()[..first_escape]);
    let mut i = first_escape;
    let mut run = i;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            if !P::ALLOW_HIGH_EIGHT_BIT && !(0x20..=0x7F).contains(&b) {
                return Err(body
                    .sub(body.first + i, body.last)
                    .error(ErrorKind::InvalidStringHighAscii));
            }
            i += 1;
            continue;
        }
        // Flush the plain run before the backslash. The run boundary is an
        // ASCII byte, so the slice stays on a char boundary.
        out.push_str(&body.as_str()[run..i]);
        i += 1;
        let esc = *bytes.get(i).ok_or_else(|| {
            body.sub(body.last, body.last)
                .error(ErrorKind::UnexpectedEndOfData)
        })?;
        i += 1;
        match esc {
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000C}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'\\' | b'/' | b'"' => out.push(esc as char),
            b'u' | b'U' => {
                let esc_pos = i;
                let Some(high) = read_hex4(bytes, &mut i) else {
                    return Err(escape_error(body, esc_pos, ErrorKind::InvalidUtfEscape));
                };
                let code = if (0xD800..=0xDBFF).contains(&high) {
                    // High surrogate: a `\uXXXX` low half must follow.
                    if bytes.get(i) != Some(&b'\\')
                        || !matches!(bytes.get(i + 1), Some(b'u' | b'U'))
                    {
                        return Err(escape_error(body, esc_pos, ErrorKind::InvalidUtfEscape));
                    }
                    i += 2;
                    let Some(low) = read_hex4(bytes, &mut i) else {
                        return Err(escape_error(body, esc_pos, ErrorKind::InvalidUtfEscape));
                    };
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(escape_error(body, esc_pos, ErrorKind::InvalidUtfCodepoint));
                    }
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                let Some(ch) = char::from_u32(code) else {
                    return Err(escape_error(body, esc_pos, ErrorKind::InvalidUtfCodepoint));
                };
                out.push(ch);
            }
            _ => {
                // Unknown escape: the escaped byte passes through untranslated.
                if !P::ALLOW_HIGH_EIGHT_BIT && !(0x20..=0x7F).contains(&esc) {
                    return Err(body
                        .sub(body.first + i - 1, body.last)
                        .error(ErrorKind::InvalidStringHighAscii));
                }
                if esc < 0x80 {
                    out.push(esc as char);
                } else {
                    // The byte is a UTF-8 continuation/lead from the input;
                    // re-attach the full character it starts.
                    let tail = &body.as_str()[i - 1..];
                    if let Some(c) = tail.chars().next() {
                        out.push(c);
                        i += c.len_utf8() - 1;
                    }
                }
            }
        }
        run = i;
    }
    out.push_str(&body.as_str()[run..]);
    Ok(out)
}

#[cold]
fn escape_error<'a, P: ParsePolicy>(
    body: &ParseState<'a, P>,
    offset: usize,
    kind: ErrorKind,
) -> JsonError {
    body.sub(body.first + offset, body.last).error(kind)
}

fn read_hex4(bytes: &[u8], i: &mut usize) -> Option<u32> {
    let mut code = 0u32;
    for _ in 0..4 {
        let b = *bytes.get(*i)?;
        let nibble = match b {
            b'0'..=b'9' => u32::from(b - b'0'),
            b'a'..=b'f' => u32::from(b - b'a') + 10,
            b'A'..=b'F' => u32::from(b - b'A') + 10,
            _ => return None,
        };
        code = (code << 4) | nibble;
        *i += 1;
    }
    Some(code)
}

fn check_seven_bit<'a, P: ParsePolicy>(body: &ParseState<'a, P>) -> Result<(), JsonError> {
    if P::ALLOW_HIGH_EIGHT_BIT {
        return Ok(());
    }
    for (i, b) in body.as_bytes().iter().enumerate() {
        if !(0x20..=0x7F).contains(b) {
            return Err(body
                .sub(body.first + i, body.last)
                .error(ErrorKind::InvalidStringHighAscii));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Raw (borrowed)
// ---------------------------------------------------------------------------

/// A string member borrowed from the input; no escape translation. The
/// result is invalidated when the input buffer goes away.
#[derive(Debug, Clone, Copy)]
pub struct JsonStringRaw;

impl<'a, P: ParsePolicy> JsonParse<'a, P> for JsonStringRaw {
    type Parsed = &'a str;
    const BASE: BaseKind = BaseKind::String;

    fn parse<const KNOWN_BOUNDS: bool>(state: &mut ParseState<'a, P>) -> Result<&'a str, JsonError> {
        let body = string_body::<P, KNOWN_BOUNDS>(state)?;
        if !KNOWN_BOUNDS {
            state.assert_item_end(ErrorKind::AttemptToAccessPastEndOfValue)?;
        }
        Ok(body.as_str())
    }
}

impl<'a> JsonSerialize<'a> for JsonStringRaw {
    type Value = &'a str;

    fn emit(value: &&'a str, w: &mut JsonWriter) {
        w.write_string(value);
    }
}

/// A borrowed string member where both `null` and the empty string parse to
/// `None`.
#[derive(Debug, Clone, Copy)]
pub struct JsonStringRawOrNull;

impl<'a, P: ParsePolicy> JsonParse<'a, P> for JsonStringRawOrNull {
    type Parsed = Option<&'a str>;
    const BASE: BaseKind = BaseKind::String;
    const NULLABLE: bool = true;

    fn parse<const KNOWN_BOUNDS: bool>(
        state: &mut ParseState<'a, P>,
    ) -> Result<Self::Parsed, JsonError> {
        if KNOWN_BOUNDS && (state.len() == 0 || state.is_null()) {
            return Ok(None);
        }
        if !KNOWN_BOUNDS && state.front_is(b'n') {
            state.skip_literal(b"null")?;
            state.assert_item_end(ErrorKind::InvalidLiteral)?;
            return Ok(None);
        }
        let s = JsonStringRaw::parse::<KNOWN_BOUNDS>(state)?;
        Ok(if s.is_empty() { None } else { Some(s) })
    }

    fn absent(_state: &ParseState<'a, P>) -> Result<Self::Parsed, JsonError> {
        Ok(None)
    }
}

impl<'a> JsonSerialize<'a> for JsonStringRawOrNull {
    type Value = Option<&'a str>;

    fn emit(value: &Self::Value, w: &mut JsonWriter) {
        match value {
            Some(s) => w.write_string(s),
            None => w.write_null(),
        }
    }

    fn is_absent(value: &Self::Value) -> bool {
        value.is_none()
    }
}

// ---------------------------------------------------------------------------
// Escaped (owned)
// ---------------------------------------------------------------------------

/// An owning string member with escape translation.
#[derive(Debug, Clone, Copy)]
pub struct JsonString;

impl<'a, P: ParsePolicy> JsonParse<'a, P> for JsonString {
    type Parsed = String;
    const BASE: BaseKind = BaseKind::String;

    fn parse<const KNOWN_BOUNDS: bool>(state: &mut ParseState<'a, P>) -> Result<String, JsonError> {
        let body = string_body::<P, KNOWN_BOUNDS>(state)?;
        if !KNOWN_BOUNDS {
            state.assert_item_end(ErrorKind::AttemptToAccessPastEndOfValue)?;
        }
        if body.counter == NO_COUNT {
            // No escape seen while skipping: one copy, no translation.
            check_seven_bit(&body)?;
            return Ok(String::from(body.as_str()));
        }
        unescape(&body, body.counter as usize)
    }
}

impl<'a> JsonSerialize<'a> for JsonString {
    type Value = String;

    fn emit(value: &String, w: &mut JsonWriter) {
        w.write_string(value);
    }
}
