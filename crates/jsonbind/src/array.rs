//! The array kind and the streaming array iterator.

use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::{
    contract::{BaseKind, JsonParse, JsonSerialize},
    error::{ErrorKind, JsonError},
    policy::{Checked, ParsePolicy},
    ser::JsonWriter,
    state::ParseState,
};

/// An array member; elements parse through `E` into a `Vec`.
///
/// When the array's bounds were pre-skipped the element count recorded by
/// the skip sizes the vector up front.
#[derive(Debug, Clone, Copy)]
pub struct JsonArray<E>(PhantomData<E>);

impl<'a, P: ParsePolicy, E: JsonParse<'a, P>> JsonParse<'a, P> for JsonArray<E> {
    type Parsed = Vec<E::Parsed>;
    const BASE: BaseKind = BaseKind::Array;

    fn parse<const KNOWN_BOUNDS: bool>(
        state: &mut ParseState<'a, P>,
    ) -> Result<Self::Parsed, JsonError> {
        state.trim_left();
        state.expect_more()?;
        if P::VALIDATED && !state.front_is(b'[') {
            return Err(state.error(ErrorKind::InvalidArrayStart));
        }
        let mut out = if KNOWN_BOUNDS && state.counter >= 0 {
            Vec::with_capacity(state.counter as usize)
        } else {
            Vec::new()
        };
        state.remove_prefix(1);
        state.trim_left();
        loop {
            if state.front_is(b']') {
                state.remove_prefix(1);
                break;
            }
            if !state.has_more() {
                if P::VALIDATED {
                    return Err(state.error(ErrorKind::UnexpectedEndOfData));
                }
                break;
            }
            out.push(E::parse::<false>(state)?);
            state.clean_tail();
        }
        state.trim_left();
        Ok(out)
    }
}

impl<'a, E: JsonSerialize<'a>> JsonSerialize<'a> for JsonArray<E> {
    type Value = Vec<E::Value>;

    fn emit(value: &Self::Value, w: &mut JsonWriter) {
        w.begin_array();
        let mut first = true;
        for element in value {
            w.element_sep(&mut first);
            E::emit(element, w);
        }
        w.end_array();
    }
}

/// A forward iterator producing parsed elements of a JSON array on demand.
///
/// Iteration ends when the array's `]` is reached; a malformed element
/// yields one `Err` and then the iterator is exhausted.
///
/// # Examples
///
/// ```rust
/// use jsonbind::{JsonArrayIterator, JsonSigned};
///
/// let iter = JsonArrayIterator::<JsonSigned<i64>>::new("[1, 2, 3]").unwrap();
/// let values: Result<Vec<i64>, _> = iter.collect();
/// assert_eq!(values.unwrap(), vec![1, 2, 3]);
/// ```
#[derive(Debug)]
pub struct JsonArrayIterator<'a, E, P: ParsePolicy = Checked> {
    state: ParseState<'a, P>,
    done: bool,
    _element: PhantomData<E>,
}

impl<'a, E, P> JsonArrayIterator<'a, E, P>
where
    E: JsonParse<'a, P>,
    P: ParsePolicy,
{
    /// Open `input`, which must hold a JSON array, and position at its first
    /// element.
    pub fn new(input: &'a str) -> Result<Self, JsonError> {
        let mut state = ParseState::new(input.as_bytes());
        state.trim_left();
        state.expect_more()?;
        if P::VALIDATED && !state.front_is(b'[') {
            return Err(state.error(ErrorKind::InvalidArrayStart));
        }
        state.remove_prefix(1);
        state.trim_left();
        Ok(Self {
            state,
            done: false,
            _element: PhantomData,
        })
    }
}

impl<'a, E, P> Iterator for JsonArrayIterator<'a, E, P>
where
    E: JsonParse<'a, P>,
    P: ParsePolicy,
{
    type Item = Result<E::Parsed, JsonError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.state.front_is(b']') {
            self.done = true;
            return None;
        }
        if !self.state.has_more() {
            self.done = true;
            if P::VALIDATED {
                return Some(Err(self.state.error(ErrorKind::UnexpectedEndOfData)));
            }
            return None;
        }
        match E::parse::<false>(&mut self.state) {
            Ok(value) => {
                self.state.clean_tail();
                Some(Ok(value))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
