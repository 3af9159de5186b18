//! Skip routines: advance the cursor past one complete JSON value.
//!
//! Each routine returns a sub-state spanning exactly the value's token text
//! (strings keep their surrounding quotes so a skipped `"null"` is not
//! mistaken for the `null` literal). Arrays record their element count and
//! strings their first-escape offset in the sub-state's `counter`, so a
//! later parse can preallocate or pick the zero-copy path.

use crate::{
    error::{ErrorKind, JsonError},
    policy::ParsePolicy,
    scanner::{self, ARRAY_KEYS, CLASS_KEYS},
    state::{ParseState, NO_COUNT},
};

impl<'a, P: ParsePolicy> ParseState<'a, P> {
    /// Skip a string token. The cursor must be on the opening quote.
    ///
    /// The returned sub-state spans the token including both quotes; its
    /// `counter` is the offset of the first backslash relative to the body
    /// start, or [`NO_COUNT`] when the body contains no escape.
    pub(crate) fn skip_string(&mut self) -> Result<Self, JsonError> {
        if P::VALIDATED && !self.front_is(b'"') {
            return Err(self.error(ErrorKind::MissingToken('"')));
        }
        let token_first = self.first;
        let body_first = self.first + 1;
        match scanner::find_string_end(self.data(), body_first, self.last) {
            Some((close, escape)) => {
                self.first = close + 1;
                let mut sub = self.sub(token_first, close + 1);
                sub.counter = escape.map_or(NO_COUNT, |p| (p - body_first) as isize);
                Ok(sub)
            }
            None => {
                if P::VALIDATED {
                    let at_end = self.sub(self.last, self.last);
                    return Err(at_end.error(ErrorKind::UnexpectedEndOfData));
                }
                self.first = self.last;
                Ok(self.sub(token_first, self.last))
            }
        }
    }

    /// Skip a number token: the character class `[0-9eE+-.]` consumed
    /// greedily. Shape validation is deferred to the number parser.
    pub(crate) fn skip_number(&mut self) -> Result<Self, JsonError> {
        let token_first = self.first;
        while self.first < self.last {
            match self.data()[self.first] {
                b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E' => self.first += 1,
                _ => break,
            }
        }
        if P::VALIDATED && self.first == token_first {
            return Err(self.error(ErrorKind::InvalidNumber));
        }
        Ok(self.sub(token_first, self.first))
    }

    /// Skip a `true`, `false`, or `null` literal; under the checked policy
    /// the bytes are verified.
    pub(crate) fn skip_literal(&mut self, literal: &'static [u8]) -> Result<Self, JsonError> {
        if P::VALIDATED && !self.as_bytes().starts_with(literal) {
            return Err(self.error(ErrorKind::InvalidLiteral));
        }
        let token_first = self.first;
        self.remove_prefix(literal.len());
        Ok(self.sub(token_first, self.first))
    }

    /// Skip an object. The cursor must be on `{`.
    pub(crate) fn skip_class(&mut self) -> Result<Self, JsonError> {
        self.skip_container(b'{', b'}', ErrorKind::InvalidClassStart)
    }

    /// Skip an array, counting its top-level elements into the returned
    /// sub-state's `counter`. The cursor must be on `[`.
    pub(crate) fn skip_array(&mut self) -> Result<Self, JsonError> {
        self.skip_container(b'[', b']', ErrorKind::InvalidArrayStart)
    }

    fn skip_container(
        &mut self,
        open: u8,
        close: u8,
        start_kind: ErrorKind,
    ) -> Result<Self, JsonError> {
        if P::VALIDATED && !self.front_is(open) {
            return Err(self.error(start_kind));
        }
        let counting = open == b'[';
        let token_first = self.first;
        self.remove_prefix(1);
        self.trim_left();
        let empty = self.front_is(close);

        let keys = if counting { &ARRAY_KEYS } else { &CLASS_KEYS };
        let mut depth = 1usize;
        // Brace depth inside an array, so commas in nested objects are not
        // counted as elements.
        let mut mask_depth = 0usize;
        let mut commas = 0usize;
        loop {
            let pos = scanner::find_first_of(self.data(), self.first, self.last, keys);
            if pos >= self.last {
                if P::VALIDATED {
                    let at_end = self.sub(self.last, self.last);
                    return Err(at_end.error(ErrorKind::UnexpectedEndOfData));
                }
                self.first = self.last;
                break;
            }
            self.first = pos;
            let b = self.data()[pos];
            if b == b'"' {
                self.skip_string()?;
            } else if b == open {
                depth += 1;
                self.first += 1;
            } else if b == close {
                depth -= 1;
                self.first += 1;
                if depth == 0 {
                    break;
                }
            } else if b == b',' {
                if depth == 1 && mask_depth == 0 {
                    commas += 1;
                }
                self.first += 1;
            } else {
                // The remaining keys of ARRAY_KEYS: `{` and `}`.
                if b == b'{' {
                    mask_depth += 1;
                } else {
                    mask_depth = mask_depth.saturating_sub(1);
                }
                self.first += 1;
            }
        }

        let mut sub = self.sub(token_first, self.first);
        if counting {
            sub.counter = if empty { 0 } else { commas as isize + 1 };
        }
        Ok(sub)
    }

    /// Skip one value of any kind, dispatching on the first byte.
    pub(crate) fn skip_value(&mut self) -> Result<Self, JsonError> {
        self.expect_more()?;
        match self.front() {
            b'"' => self.skip_string(),
            b'{' => self.skip_class(),
            b'[' => self.skip_array(),
            b't' => self.skip_literal(b"true"),
            b'f' => self.skip_literal(b"false"),
            b'n' => self.skip_literal(b"null"),
            _ => self.skip_number(),
        }
    }
}
