//! The lazy value view: an escape hatch for unknown subtrees.
//!
//! A [`JsonValue`] is a `(range, policy)` bundle over the original input.
//! Nothing is parsed until asked: classification looks at the first byte,
//! iteration walks members or elements with the skip routines, and
//! [`JsonValue::parse_with`] binds a kind after the fact.

use alloc::string::String;

use crate::{
    contract::{BaseKind, JsonParse, JsonSerialize},
    error::{ErrorKind, JsonError},
    locations::parse_member_name,
    policy::{Checked, ParsePolicy},
    ser::JsonWriter,
    state::ParseState,
    string::JsonString,
};

/// Shape of a lazily-viewed JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonValueKind {
    /// `null`
    Null,
    /// `true` / `false`
    Bool,
    /// A number token.
    Number,
    /// A quoted string.
    String,
    /// An object.
    Class,
    /// An array.
    Array,
}

/// A not-yet-parsed JSON value borrowed from the input.
#[derive(Debug, Clone, Copy)]
pub struct JsonValue<'a> {
    data: &'a [u8],
    first: usize,
    last: usize,
    counter: isize,
}

impl<'a> JsonValue<'a> {
    pub(crate) fn from_state<P: ParsePolicy>(state: &ParseState<'a, P>) -> Self {
        Self {
            data: state.data(),
            first: state.first,
            last: state.last,
            counter: state.counter,
        }
    }

    fn state(&self) -> ParseState<'a, Checked> {
        let mut state = ParseState::new(self.data);
        state.first = self.first;
        state.last = self.last;
        state.counter = self.counter;
        state
    }

    /// The value's token text, exactly as it appears in the input.
    #[must_use]
    pub fn as_raw_text(&self) -> &'a str {
        self.state().as_str()
    }

    /// Classify by the first byte of the token.
    #[must_use]
    pub fn kind(&self) -> JsonValueKind {
        match self.data.get(self.first) {
            Some(b'{') => JsonValueKind::Class,
            Some(b'[') => JsonValueKind::Array,
            Some(b'"') => JsonValueKind::String,
            Some(b't' | b'f') => JsonValueKind::Bool,
            Some(b'n') | None => JsonValueKind::Null,
            Some(_) => JsonValueKind::Number,
        }
    }

    /// `true` for an object.
    #[must_use]
    pub fn is_class(&self) -> bool {
        self.kind() == JsonValueKind::Class
    }

    /// `true` for an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.kind() == JsonValueKind::Array
    }

    /// `true` for the `null` literal.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.kind() == JsonValueKind::Null
    }

    /// The string body (quotes stripped, escapes intact), if this is a
    /// string.
    #[must_use]
    pub fn string_view(&self) -> Option<&'a str> {
        if self.kind() != JsonValueKind::String {
            return None;
        }
        let text = self.as_raw_text();
        if text.len() >= 2 {
            Some(&text[1..text.len() - 1])
        } else {
            None
        }
    }

    /// Parse as a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_raw_text() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Parse as a real.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_raw_text().parse().ok()
    }

    /// Parse as a signed integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_raw_text().parse().ok()
    }

    /// Parse as an unsigned integer.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.as_raw_text().parse().ok()
    }

    /// Unescape a string value into owned text.
    pub fn to_owned_string(&self) -> Result<String, JsonError> {
        let mut state = self.state();
        JsonString::parse::<true>(&mut state)
    }

    /// Parse this value through any member kind.
    pub fn parse_with<M: JsonParse<'a, Checked>>(&self) -> Result<M::Parsed, JsonError> {
        let mut state = self.state();
        M::parse::<true>(&mut state)
    }

    /// Iterate an object's `(name, value)` pairs. Names keep their source
    /// escapes.
    #[must_use]
    pub fn members(&self) -> ClassMembers<'a> {
        let mut state = self.state();
        let ok = state.front_is(b'{');
        if ok {
            state.remove_prefix(1);
            state.trim_left();
        }
        ClassMembers { state, done: !ok }
    }

    /// Iterate an array's elements.
    #[must_use]
    pub fn elements(&self) -> ArrayElements<'a> {
        let mut state = self.state();
        let ok = state.front_is(b'[');
        if ok {
            state.remove_prefix(1);
            state.trim_left();
        }
        ArrayElements { state, done: !ok }
    }

    /// Find an object member by name.
    pub fn find_member(&self, name: &str) -> Result<Option<JsonValue<'a>>, JsonError> {
        for entry in self.members() {
            let (member, value) = entry?;
            if member == name {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Find an array element by index.
    pub fn find_element(&self, index: usize) -> Result<Option<JsonValue<'a>>, JsonError> {
        for (i, entry) in self.elements().enumerate() {
            let value = entry?;
            if i == index {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

/// Iterator over an object's members.
#[derive(Debug)]
pub struct ClassMembers<'a> {
    state: ParseState<'a, Checked>,
    done: bool,
}

impl<'a> Iterator for ClassMembers<'a> {
    type Item = Result<(&'a str, JsonValue<'a>), JsonError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.state.front_is(b'}') || !self.state.has_more() {
            self.done = true;
            return None;
        }
        let name = match parse_member_name(&mut self.state) {
            Ok(name) => name,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };
        match self.state.skip_value() {
            Ok(sub) => {
                self.state.clean_tail();
                Some(Ok((name, JsonValue::from_state(&sub))))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Iterator over an array's elements.
#[derive(Debug)]
pub struct ArrayElements<'a> {
    state: ParseState<'a, Checked>,
    done: bool,
}

impl<'a> Iterator for ArrayElements<'a> {
    type Item = Result<JsonValue<'a>, JsonError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.state.front_is(b']') || !self.state.has_more() {
            self.done = true;
            return None;
        }
        match self.state.skip_value() {
            Ok(sub) => {
                self.state.clean_tail();
                Some(Ok(JsonValue::from_state(&sub)))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// The unknown-subtree kind: skip the value and hand back a lazy view.
#[derive(Debug, Clone, Copy)]
pub struct JsonRaw;

impl<'a, P: ParsePolicy> JsonParse<'a, P> for JsonRaw {
    type Parsed = JsonValue<'a>;
    const BASE: BaseKind = BaseKind::Class;

    fn parse<const KNOWN_BOUNDS: bool>(
        state: &mut ParseState<'a, P>,
    ) -> Result<JsonValue<'a>, JsonError> {
        if KNOWN_BOUNDS {
            return Ok(JsonValue::from_state(state));
        }
        let sub = state.skip_value()?;
        state.assert_item_end(ErrorKind::AttemptToAccessPastEndOfValue)?;
        Ok(JsonValue::from_state(&sub))
    }
}

impl<'a> JsonSerialize<'a> for JsonRaw {
    type Value = JsonValue<'a>;

    fn emit(value: &JsonValue<'a>, w: &mut JsonWriter) {
        w.write_raw(value.as_raw_text());
    }
}

/// Open `input` as a lazy value view without parsing it.
///
/// # Examples
///
/// ```rust
/// let value = jsonbind::json_value(r#"{"a":[1,2]}"#).unwrap();
/// assert!(value.is_class());
/// let a = value.find_member("a").unwrap().unwrap();
/// assert_eq!(a.find_element(1).unwrap().unwrap().as_i64(), Some(2));
/// ```
pub fn json_value(input: &str) -> Result<JsonValue<'_>, JsonError> {
    let mut state = ParseState::<Checked>::new(input.as_bytes());
    state.trim_left();
    let sub = state.skip_value()?;
    Ok(JsonValue::from_state(&sub))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_kinds() {
        for (text, kind) in [
            ("null", JsonValueKind::Null),
            ("true", JsonValueKind::Bool),
            ("-1.5", JsonValueKind::Number),
            ("\"s\"", JsonValueKind::String),
            ("{}", JsonValueKind::Class),
            ("[]", JsonValueKind::Array),
        ] {
            assert_eq!(json_value(text).unwrap().kind(), kind, "{text}");
        }
    }

    #[test]
    fn string_view_keeps_escapes() {
        let v = json_value(r#""a\nb""#).unwrap();
        assert_eq!(v.string_view(), Some(r"a\nb"));
        assert_eq!(v.to_owned_string().unwrap(), "a\nb");
    }

    #[test]
    fn member_iteration() {
        let v = json_value(r#"{"x":1, "y":{"z":[true]}}"#).unwrap();
        let names: alloc::vec::Vec<_> = v.members().map(|m| m.unwrap().0).collect();
        assert_eq!(names, ["x", "y"]);
        let z = v
            .find_member("y")
            .unwrap()
            .unwrap()
            .find_member("z")
            .unwrap()
            .unwrap();
        assert!(z.is_array());
        assert_eq!(z.find_element(0).unwrap().unwrap().as_bool(), Some(true));
    }

    #[test]
    fn missing_member_is_none() {
        let v = json_value(r#"{"x":1}"#).unwrap();
        assert!(v.find_member("nope").unwrap().is_none());
    }

    #[test]
    fn parse_with_binds_a_kind() {
        let v = json_value("[1,2,3]").unwrap();
        let parsed = v.parse_with::<crate::JsonArray<crate::JsonSigned<i64>>>().unwrap();
        assert_eq!(parsed, [1, 2, 3]);
    }

    #[test]
    fn raw_text_is_byte_exact() {
        let v = json_value("  {\"a\": [1, 2]}  ").unwrap();
        assert_eq!(v.as_raw_text(), "{\"a\": [1, 2]}");
    }
}
