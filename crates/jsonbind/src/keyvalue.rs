//! Key-value kinds: objects as maps and arrays of key/value pair objects.

use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::marker::PhantomData;

use crate::{
    contract::{BaseKind, CustomJson, JsonCustom, JsonParse, JsonSerialize},
    error::{ErrorKind, JsonError},
    locations::parse_member_name,
    policy::ParsePolicy,
    ser::JsonWriter,
    state::ParseState,
    string::{JsonString, JsonStringRaw},
};

/// A container a key-value kind can fill and drain.
///
/// `BTreeMap` gives unique-key map semantics; `Vec<(K, V)>` preserves
/// duplicate keys in document order (multimap semantics).
pub trait KeyValueContainer {
    /// Key type.
    type Key;
    /// Value type.
    type Value;

    /// Fresh container; `capacity` is a hint from a pre-skip, possibly 0.
    fn new_container(capacity: usize) -> Self;

    /// Append one pair.
    fn insert_pair(&mut self, key: Self::Key, value: Self::Value);

    /// Visit pairs in serialization order.
    fn for_each_pair(&self, f: impl FnMut(&Self::Key, &Self::Value));
}

impl<K: Ord, V> KeyValueContainer for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn new_container(_capacity: usize) -> Self {
        BTreeMap::new()
    }

    fn insert_pair(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn for_each_pair(&self, mut f: impl FnMut(&K, &V)) {
        for (k, v) in self {
            f(k, v);
        }
    }
}

impl<K, V> KeyValueContainer for Vec<(K, V)> {
    type Key = K;
    type Value = V;

    fn new_container(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }

    fn insert_pair(&mut self, key: K, value: V) {
        self.push((key, value));
    }

    fn for_each_pair(&self, mut f: impl FnMut(&K, &V)) {
        for (k, v) in self {
            f(k, v);
        }
    }
}

/// A kind usable in the key position of a map: parsed from the member-name
/// string rather than a value position.
pub trait JsonKeyKind<'a, P: ParsePolicy>: JsonParse<'a, P> {
    /// Parse a key from the quoted name at the cursor (colon not included).
    fn parse_key(state: &mut ParseState<'a, P>) -> Result<Self::Parsed, JsonError>;
}

impl<'a, P: ParsePolicy> JsonKeyKind<'a, P> for JsonStringRaw {
    fn parse_key(state: &mut ParseState<'a, P>) -> Result<&'a str, JsonError> {
        let mut token = state.skip_string()?;
        JsonStringRaw::parse::<true>(&mut token)
    }
}

impl<'a, P: ParsePolicy> JsonKeyKind<'a, P> for JsonString {
    fn parse_key(state: &mut ParseState<'a, P>) -> Result<String, JsonError> {
        let mut token = state.skip_string()?;
        JsonString::parse::<true>(&mut token)
    }
}

impl<'a, P: ParsePolicy, T: CustomJson> JsonKeyKind<'a, P> for JsonCustom<T> {
    fn parse_key(state: &mut ParseState<'a, P>) -> Result<T, JsonError> {
        let mut token = state.skip_string()?;
        JsonCustom::<T>::parse::<true>(&mut token)
    }
}

/// A JSON object parsed as a sequence of (key, value) pairs.
///
/// `K` must be a string-flavored kind ([`JsonKeyKind`]); `C` chooses the
/// container and with it the unique-vs-multimap policy.
#[derive(Debug, Clone, Copy)]
pub struct JsonKeyValue<K, V, C>(PhantomData<(K, V, C)>);

impl<'a, P, K, V, C> JsonParse<'a, P> for JsonKeyValue<K, V, C>
where
    P: ParsePolicy,
    K: JsonKeyKind<'a, P>,
    V: JsonParse<'a, P>,
    C: KeyValueContainer<Key = K::Parsed, Value = V::Parsed>,
{
    type Parsed = C;
    const BASE: BaseKind = BaseKind::Class;

    fn parse<const KNOWN_BOUNDS: bool>(state: &mut ParseState<'a, P>) -> Result<C, JsonError> {
        state.trim_left();
        state.expect_more()?;
        if P::VALIDATED && !state.front_is(b'{') {
            return Err(state.error(ErrorKind::InvalidClassStart));
        }
        state.remove_prefix(1);
        state.trim_left();
        let mut container = C::new_container(0);
        loop {
            if state.front_is(b'}') {
                state.remove_prefix(1);
                break;
            }
            if !state.has_more() {
                if P::VALIDATED {
                    return Err(state.error(ErrorKind::UnexpectedEndOfData));
                }
                break;
            }
            if P::VALIDATED && !state.is_at_next_class_member() {
                return Err(state.error(ErrorKind::MissingMemberNameOrEndOfClass));
            }
            let key = K::parse_key(state)?;
            state.trim_left();
            state.expect_front(b':', ErrorKind::MissingToken(':'))?;
            state.trim_left();
            let value = V::parse::<false>(state)?;
            container.insert_pair(key, value);
            state.clean_tail();
        }
        state.trim_left();
        Ok(container)
    }
}

impl<'a, K, V, C> JsonSerialize<'a> for JsonKeyValue<K, V, C>
where
    K: JsonSerialize<'a>,
    V: JsonSerialize<'a>,
    C: KeyValueContainer<Key = K::Value, Value = V::Value>,
{
    type Value = C;

    fn emit(value: &C, w: &mut JsonWriter) {
        w.begin_class();
        let mut first = true;
        value.for_each_pair(|k, v| {
            w.element_sep(&mut first);
            K::emit(k, w);
            w.write_raw(":");
            V::emit(v, w);
        });
        w.end_class();
    }
}

/// Member names of the pair objects in a [`JsonKeyValueArray`].
pub trait PairNames {
    /// Name of the key member.
    const KEY: &'static str = "key";
    /// Name of the value member.
    const VALUE: &'static str = "value";
}

/// The conventional `{"key":…,"value":…}` naming.
#[derive(Debug, Clone, Copy)]
pub struct DefaultPairNames;

impl PairNames for DefaultPairNames {}

/// A JSON array of two-member objects, `[{"key":k,"value":v},…]`, with
/// contract-declared member names.
///
/// Unlike [`JsonKeyValue`], the key is a value position, so any kind can
/// serve as `K`.
#[derive(Debug, Clone, Copy)]
pub struct JsonKeyValueArray<K, V, C, N = DefaultPairNames>(PhantomData<(K, V, C, N)>);

impl<'a, P, K, V, C, N> JsonParse<'a, P> for JsonKeyValueArray<K, V, C, N>
where
    P: ParsePolicy,
    K: JsonParse<'a, P>,
    V: JsonParse<'a, P>,
    C: KeyValueContainer<Key = K::Parsed, Value = V::Parsed>,
    N: PairNames,
{
    type Parsed = C;
    const BASE: BaseKind = BaseKind::Array;

    fn parse<const KNOWN_BOUNDS: bool>(state: &mut ParseState<'a, P>) -> Result<C, JsonError> {
        state.trim_left();
        state.expect_more()?;
        if P::VALIDATED && !state.front_is(b'[') {
            return Err(state.error(ErrorKind::InvalidArrayStart));
        }
        let mut container = C::new_container(if KNOWN_BOUNDS && state.counter >= 0 {
            state.counter as usize
        } else {
            0
        });
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
            state.expect_front(b'{', ErrorKind::InvalidClassStart)?;
            state.trim_left();
            let key = pair_member::<K, P>(state, N::KEY)?;
            state.clean_tail();
            let value = pair_member::<V, P>(state, N::VALUE)?;
            container.insert_pair(key, value);
            state.clean_tail();
            state.expect_front(b'}', ErrorKind::MissingToken('}'))?;
            state.clean_tail();
        }
        state.trim_left();
        Ok(container)
    }
}

fn pair_member<'a, M, P>(
    state: &mut ParseState<'a, P>,
    expected: &'static str,
) -> Result<M::Parsed, JsonError>
where
    M: JsonParse<'a, P>,
    P: ParsePolicy,
{
    if P::VALIDATED && !state.is_at_next_class_member() {
        return Err(state.error(ErrorKind::MissingMemberNameOrEndOfClass));
    }
    let name = parse_member_name(state)?;
    if P::VALIDATED && name != expected {
        return Err(state.error(ErrorKind::MissingMember(expected.into())));
    }
    M::parse::<false>(state)
}

impl<'a, K, V, C, N> JsonSerialize<'a> for JsonKeyValueArray<K, V, C, N>
where
    K: JsonSerialize<'a>,
    V: JsonSerialize<'a>,
    C: KeyValueContainer<Key = K::Value, Value = V::Value>,
    N: PairNames,
{
    type Value = C;

    fn emit(value: &C, w: &mut JsonWriter) {
        w.begin_array();
        let mut first = true;
        value.for_each_pair(|k, v| {
            w.element_sep(&mut first);
            w.begin_class();
            let mut inner_first = true;
            w.member_name(N::KEY, &mut inner_first);
            K::emit(k, w);
            w.member_name(N::VALUE, &mut inner_first);
            V::emit(v, w);
            w.end_class();
        });
        w.end_array();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::{policy::Checked, JsonSigned};

    use super::*;

    #[test]
    fn map_of_strings() {
        let mut st = ParseState::<Checked>::new(br#"{"field1":"a","field2":"b"}"#);
        let map = JsonKeyValue::<JsonString, JsonString, BTreeMap<String, String>>::parse::<false>(
            &mut st,
        )
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["field1"], "a");
        assert_eq!(map["field2"], "b");
    }

    #[test]
    fn map_empty() {
        let mut st = ParseState::<Checked>::new(b"{}");
        let map =
            JsonKeyValue::<JsonString, JsonString, BTreeMap<String, String>>::parse::<false>(
                &mut st,
            )
            .unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn multimap_preserves_duplicates_in_order() {
        let mut st = ParseState::<Checked>::new(br#"{"a":"x","a":"y"}"#);
        let pairs = JsonKeyValue::<JsonString, JsonString, Vec<(String, String)>>::parse::<false>(
            &mut st,
        )
        .unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("a".to_string(), "x".to_string()));
        assert_eq!(pairs[1], ("a".to_string(), "y".to_string()));
    }

    #[test]
    fn raw_keys_borrow() {
        let input = r#"{"k":1}"#;
        let mut st = ParseState::<Checked>::new(input.as_bytes());
        let pairs =
            JsonKeyValue::<JsonStringRaw, JsonSigned<i64>, Vec<(&str, i64)>>::parse::<false>(
                &mut st,
            )
            .unwrap();
        assert_eq!(pairs, [("k", 1)]);
    }

    #[test]
    fn kv_array_round_shape() {
        let text = r#"[{"key":"a","value":1},{"key":"b","value":2}]"#;
        let mut st = ParseState::<Checked>::new(text.as_bytes());
        let pairs = JsonKeyValueArray::<
            JsonString,
            JsonSigned<i64>,
            Vec<(String, i64)>,
        >::parse::<false>(&mut st)
        .unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].0, "b");
        assert_eq!(pairs[1].1, 2);
    }

    #[test]
    fn kv_array_wrong_member_name_fails() {
        let text = r#"[{"clave":"a","value":1}]"#;
        let mut st = ParseState::<Checked>::new(text.as_bytes());
        let err = JsonKeyValueArray::<JsonString, JsonSigned<i64>, Vec<(String, i64)>>::parse::<
            false,
        >(&mut st)
        .unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::MissingMember("key".to_string()));
    }
}
