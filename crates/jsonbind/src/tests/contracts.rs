//! Contract semantics: member order, nullability, duplicates, the error
//! taxonomy, and checked/unchecked equivalence.

use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    from_json, from_json_unchecked, json_contract, to_json, CustomJson, ErrorKind, JsonError,
};

use super::{sample_class2, MyClass1, MyClass2};

#[test]
fn member_order_is_irrelevant() {
    let fields = [
        ("member0", "\"this is a test\""),
        ("member1", "314159"),
        ("member2", "true"),
    ];
    // All 3! orderings of the same key-value set parse to the same value.
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    let expected = sample_class2().a;
    for order in orders {
        let body: Vec<String> = order
            .iter()
            .map(|&i| format!("\"{}\":{}", fields[i].0, fields[i].1))
            .collect();
        let text = format!("{{{}}}", body.join(","));
        let parsed: MyClass1 = from_json(&text).unwrap();
        assert_eq!(parsed, expected, "{text}");
    }
}

#[test]
fn unknown_members_are_skipped() {
    let text = r#"{
        "extra": {"nested": [1, 2, {"deep": "x,y"}]},
        "member1": 7,
        "member0": "v",
        "alien": null,
        "member2": false,
        "tail": "t"
    }"#;
    let parsed: MyClass1 = from_json(text).unwrap();
    assert_eq!(parsed.member_1, 7);
    assert_eq!(parsed.member_0, "v");
    assert!(!parsed.member_2);
}

#[test]
fn nullable_member_absent_and_null() {
    #[derive(Debug, PartialEq)]
    struct Config {
        name: String,
        retries: Option<i32>,
    }

    json_contract! {
        struct Config {
            name: "name" => string,
            retries: "retries" => nullable(signed(i32)),
        }
    }

    let absent: Config = from_json(r#"{"name":"a"}"#).unwrap();
    assert_eq!(absent.retries, None);

    let null: Config = from_json(r#"{"name":"a","retries":null}"#).unwrap();
    assert_eq!(null.retries, None);

    let present: Config = from_json(r#"{"retries":3,"name":"a"}"#).unwrap();
    assert_eq!(present.retries, Some(3));

    // Absent nullables are omitted on the way back out.
    assert_eq!(to_json(&absent), r#"{"name":"a"}"#);
    assert_eq!(to_json(&present), r#"{"name":"a","retries":3}"#);
}

#[test]
fn duplicate_member_first_wins() {
    let parsed: MyClass1 =
        from_json(r#"{"member0":"first","member0":"second","member1":1,"member2":true}"#).unwrap();
    assert_eq!(parsed.member_0, "first");

    // Same policy when the duplicate pair arrives before the request scans it.
    let parsed: MyClass1 =
        from_json(r#"{"member1":1,"member0":"first","member0":"second","member2":true}"#).unwrap();
    assert_eq!(parsed.member_0, "first");
}

#[test]
fn quoted_numbers() {
    #[derive(Debug, PartialEq)]
    struct Quotes {
        exact: i64,
        loose: i64,
    }

    json_contract! {
        struct Quotes {
            exact: "exact" => quoted(signed(i64)),
            loose: "loose" => maybe_quoted(signed(i64)),
        }
    }

    let both: Quotes = from_json(r#"{"exact":"42","loose":"7"}"#).unwrap();
    assert_eq!((both.exact, both.loose), (42, 7));
    let bare: Quotes = from_json(r#"{"exact":"42","loose":7}"#).unwrap();
    assert_eq!(bare.loose, 7);
    assert_eq!(to_json(&both), r#"{"exact":"42","loose":7}"#);

    let err = from_json::<Quotes>(r#"{"exact":42,"loose":7}"#).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::MissingToken('"'));
}

static CUSTOM_PARSES: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, PartialEq)]
struct Tag(String);

impl CustomJson for Tag {
    fn from_json_text(text: &str) -> Option<Self> {
        CUSTOM_PARSES.fetch_add(1, Ordering::Relaxed);
        text.strip_prefix("tag:").map(|rest| Tag(rest.to_string()))
    }

    fn write_json_text(&self, out: &mut String) {
        out.push_str("tag:");
        out.push_str(&self.0);
    }
}

#[derive(Debug, PartialEq)]
struct Tagged {
    first: Tag,
    second: Tag,
}

json_contract! {
    struct Tagged {
        first: "first" => custom(Tag),
        second: "second" => custom(Tag),
    }
}

#[test]
fn custom_members_parse_exactly_once_even_reordered() {
    CUSTOM_PARSES.store(0, Ordering::Relaxed);
    let parsed: Tagged = from_json(r#"{"second":"tag:b","first":"tag:a"}"#).unwrap();
    assert_eq!(parsed.first, Tag("a".to_string()));
    assert_eq!(parsed.second, Tag("b".to_string()));
    assert_eq!(CUSTOM_PARSES.load(Ordering::Relaxed), 2);
    assert_eq!(to_json(&parsed), r#"{"first":"tag:a","second":"tag:b"}"#);
}

#[test]
fn raw_member_defers_unknown_subtree() {
    #[derive(Debug)]
    struct Envelope<'a> {
        id: i64,
        payload: crate::JsonValue<'a>,
    }

    json_contract! {
        struct Envelope<'a> {
            id: "id" => signed(i64),
            payload: "payload" => raw,
        }
    }

    // Reordered so the raw member is located through the cache.
    let text = r#"{"payload":{"deep":[1,2,{"k":"v"}]},"id":9}"#;
    let envelope: Envelope<'_> = from_json(text).unwrap();
    assert_eq!(envelope.id, 9);
    assert!(envelope.payload.is_class());
    assert_eq!(envelope.payload.as_raw_text(), r#"{"deep":[1,2,{"k":"v"}]}"#);

    // The lazy view re-emits byte-exact.
    assert_eq!(
        to_json(&envelope),
        r#"{"id":9,"payload":{"deep":[1,2,{"k":"v"}]}}"#
    );

    // In document order the member parses in place.
    let ordered: Envelope<'_> = from_json(r#"{"id":1,"payload":[true,null]}"#).unwrap();
    assert!(ordered.payload.is_array());
    assert_eq!(ordered.payload.as_raw_text(), "[true,null]");
}

fn kind_of<T: for<'a> crate::JsonContract<'a> + core::fmt::Debug>(text: &str) -> ErrorKind {
    from_json::<T>(text).unwrap_err().kind().clone()
}

#[test]
fn error_taxonomy() {
    assert_eq!(kind_of::<MyClass1>("[1]"), ErrorKind::InvalidClassStart);
    assert_eq!(kind_of::<super::Point>("{}"), ErrorKind::InvalidArrayStart);
    assert_eq!(kind_of::<MyClass1>(""), ErrorKind::UnexpectedEndOfData);
    assert_eq!(
        kind_of::<MyClass1>(r#"{"member0":"x""#),
        ErrorKind::UnexpectedEndOfData
    );
    assert_eq!(
        kind_of::<MyClass1>(r#"{"member0":"x","member1":1}"#),
        ErrorKind::MissingMember("member2".to_string())
    );
    assert_eq!(
        kind_of::<MyClass1>(r#"{"member0":"x","member1":oops,"member2":true}"#),
        ErrorKind::InvalidNumber
    );
    assert_eq!(
        kind_of::<MyClass1>(r#"{"member0":"x","member1":1,"member2":maybe}"#),
        ErrorKind::InvalidLiteral
    );
    assert_eq!(
        kind_of::<MyClass1>(r#"{42:"x"}"#),
        ErrorKind::MissingMemberNameOrEndOfClass
    );
}

#[test]
fn error_context_points_at_enclosing_class() {
    let err = from_json::<MyClass2>(r#"{"a":{"member0":"x","member1":1},"b":2}"#).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::MissingMember("member2".to_string()));
    // The context snippet starts at the inner class's brace.
    assert!(err.context().unwrap().starts_with(r#"{"member0""#));
}

#[test]
fn checked_and_unchecked_agree_on_valid_input() {
    let texts = [
        r#"{"a":{"member0":"this is a test","member1":314159,"member2":true},"b":1234}"#,
        r#"{"b":0,"a":{"member2":false,"member1":-1,"member0":""}}"#,
        "{ \"a\" : { \"member0\" : \"w s\" , \"member1\" : 2 , \"member2\" : true } , \"b\" : 9 }",
    ];
    for text in texts {
        let checked: MyClass2 = from_json(text).unwrap();
        let unchecked: MyClass2 = from_json_unchecked(text).unwrap();
        assert_eq!(checked, unchecked, "{text}");
    }
}

#[test]
fn errors_implement_std_error() {
    fn take_error(_err: &dyn core::error::Error) {}
    let err: JsonError = from_json::<MyClass1>("[]").unwrap_err();
    take_error(&err);
}
