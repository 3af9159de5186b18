//! quickcheck properties: round-trip identity, whitespace invariance,
//! escape correctness, and checked/unchecked equivalence.

use alloc::{string::String, vec::Vec};

use quickcheck::{quickcheck, Arbitrary, Gen};

use crate::{
    from_json, from_json_unchecked, json_contract, to_json, to_json_with_options,
    SerializeOptions,
};

use super::{MyClass1, MyClass2, Point};

impl Arbitrary for MyClass1 {
    fn arbitrary(g: &mut Gen) -> Self {
        MyClass1 {
            member_0: String::arbitrary(g),
            member_1: i32::arbitrary(g),
            member_2: bool::arbitrary(g),
        }
    }
}

impl Arbitrary for MyClass2 {
    fn arbitrary(g: &mut Gen) -> Self {
        MyClass2 {
            a: MyClass1::arbitrary(g),
            b: u32::arbitrary(g),
        }
    }
}

quickcheck! {
    /// parse ∘ serialize is the identity on values, across the full
    /// Unicode range of the string member (surrogate pairs included).
    fn round_trip_identity(value: MyClass2) -> bool {
        let text = to_json(&value);
        from_json::<MyClass2>(&text).unwrap() == value
    }

    /// Escaping to pure ASCII must round-trip just the same.
    fn round_trip_through_ascii_escapes(value: MyClass1) -> bool {
        let text = to_json_with_options(&value, SerializeOptions {
            escape_high_eight_bit: true,
        });
        text.is_ascii() && from_json::<MyClass1>(&text).unwrap() == value
    }

    /// The serializer is deterministic.
    fn serializer_is_canonical(value: MyClass2) -> bool {
        to_json(&value) == to_json(&value)
    }

    /// Whitespace between structural tokens never changes the parse.
    fn whitespace_invariance(value: MyClass2, seed: u64) -> bool {
        let compact = to_json(&value);
        let inflated = inflate_whitespace(&compact, seed);
        from_json::<MyClass2>(&inflated).unwrap() == value
    }

    /// The checked and unchecked parsers agree on every valid document.
    fn checked_equals_unchecked(value: MyClass2) -> bool {
        let text = to_json(&value);
        from_json::<MyClass2>(&text).unwrap() == from_json_unchecked::<MyClass2>(&text).unwrap()
    }

    /// Reals survive the shortest-form print and re-parse exactly.
    fn real_round_trip(x: f64, y: f64) -> quickcheck::TestResult {
        if !x.is_finite() || !y.is_finite() {
            return quickcheck::TestResult::discard();
        }
        let p = Point { x, y };
        let text = to_json(&p);
        let back: Point = from_json(&text).unwrap();
        quickcheck::TestResult::from_bool(back.x.to_bits() == x.to_bits() && back.y.to_bits() == y.to_bits())
    }
}

/// Re-insert whitespace after every structural token outside strings. A
/// small xorshift keeps the choice deterministic per seed.
fn inflate_whitespace(compact: &str, mut seed: u64) -> String {
    const WS: [&str; 4] = [" ", "\t", "\n", "\r"];
    let mut out = String::with_capacity(compact.len() * 2);
    let mut in_string = false;
    let mut escaped = false;
    for c in compact.chars() {
        out.push(c);
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '}' | '[' | ']' | ',' | ':' => {
                seed ^= seed << 13;
                seed ^= seed >> 7;
                seed ^= seed << 17;
                for _ in 0..(seed % 3) {
                    out.push_str(WS[(seed >> 8) as usize % WS.len()]);
                }
            }
            _ => {}
        }
    }
    out
}

#[test]
fn inflate_whitespace_respects_strings() {
    let inflated = inflate_whitespace(r#"{"a":"b,c"}"#, 12345);
    // The comma inside the string must not attract whitespace.
    assert!(inflated.contains("b,c"));
}

#[derive(Debug, Clone, PartialEq)]
struct EveryKind {
    text: String,
    count: i64,
    ratio: f64,
    on: bool,
    maybe: Option<String>,
    points: Vec<f64>,
}

json_contract! {
    struct EveryKind {
        text: "text" => string,
        count: "count" => checked_signed(i64),
        ratio: "ratio" => real,
        on: "on" => bool,
        maybe: "maybe" => nullable(string),
        points: "points" => array(real(f64)),
    }
}

impl Arbitrary for EveryKind {
    fn arbitrary(g: &mut Gen) -> Self {
        let finite = |g: &mut Gen| loop {
            let x = f64::arbitrary(g);
            if x.is_finite() {
                return x;
            }
        };
        let ratio = finite(g);
        let points = (0..usize::arbitrary(g) % 8).map(|_| finite(g)).collect();
        EveryKind {
            text: String::arbitrary(g),
            count: i64::arbitrary(g),
            ratio,
            on: bool::arbitrary(g),
            maybe: Option::<String>::arbitrary(g),
            points,
        }
    }
}

quickcheck! {
    fn every_kind_round_trips(value: EveryKind) -> bool {
        let text = to_json(&value);
        let back: EveryKind = from_json(&text).unwrap();
        // Compare reals by bits so -0.0 and NaN-free exactness hold.
        back.text == value.text
            && back.count == value.count
            && back.ratio.to_bits() == value.ratio.to_bits()
            && back.on == value.on
            && back.maybe == value.maybe
            && back.points.len() == value.points.len()
            && back
                .points
                .iter()
                .zip(&value.points)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}
