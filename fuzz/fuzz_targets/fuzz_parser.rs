#![no_main]

use arbitrary::Arbitrary;
use jsonbind::{
    from_json, from_json_unchecked, json_contract, minify_json, to_json, JsonError,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, PartialEq)]
struct Record {
    name: String,
    value: i64,
    ratio: f64,
    flag: bool,
    note: Option<String>,
    tags: Vec<String>,
}

json_contract! {
    struct Record {
        name: "name" => string,
        value: "value" => checked_signed(i64),
        ratio: "ratio" => real,
        flag: "flag" => bool,
        note: "note" => nullable(string),
        tags: "tags" => array(string),
    }
}

fn exercise(text: &str) {
    // Malformed input must produce an error, never a panic.
    let parsed: Result<Record, JsonError> = from_json(text);
    if let Ok(record) = parsed {
        // A value that parsed must round-trip exactly.
        let emitted = to_json(&record);
        let again: Record = from_json(&emitted).expect("round trip re-parse");
        assert_eq!(
            (&again.name, again.value, again.flag, &again.note, &again.tags),
            (&record.name, record.value, record.flag, &record.note, &record.tags),
        );
        assert!(
            again.ratio.to_bits() == record.ratio.to_bits() || again.ratio.is_nan(),
            "ratio drifted: {} vs {}",
            record.ratio,
            again.ratio
        );

        // The unchecked parser must agree on input the checked one accepts.
        let trusted: Record = from_json_unchecked(text).expect("unchecked agrees");
        assert_eq!(trusted, record);
    }

    // Minification must be idempotent when it succeeds.
    if let Ok(min) = minify_json(text) {
        let reminified = minify_json(&min).expect("minified output is valid");
        assert_eq!(reminified, min);
    }

    // The lazy value view must tolerate anything that skipped cleanly.
    if let Ok(value) = jsonbind::json_value(text) {
        let _ = value.kind();
        if value.is_class() {
            for member in value.members().take(64) {
                let _ = member.map(|(_, v)| v.kind());
            }
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    text: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    exercise(input.text);
});
