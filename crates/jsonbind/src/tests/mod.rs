//! Contract-level test suite: shared fixture contracts plus the scenario,
//! property, and snapshot modules.

mod contracts;
mod properties;

use alloc::string::String;

use crate::json_contract;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MyClass1 {
    pub member_0: String,
    pub member_1: i32,
    pub member_2: bool,
}

json_contract! {
    struct MyClass1 {
        member_0: "member0" => string,
        member_1: "member1" => signed(i32),
        member_2: "member2" => bool,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MyClass2 {
    pub a: MyClass1,
    pub b: u32,
}

json_contract! {
    struct MyClass2 {
        a: "a" => class(MyClass1),
        b: "b" => unsigned(u32),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Point {
    pub x: f64,
    pub y: f64,
}

json_contract! {
    ordered struct Point {
        x => real,
        y => real,
    }
}

pub(crate) fn sample_class2() -> MyClass2 {
    MyClass2 {
        a: MyClass1 {
            member_0: String::from("this is a test"),
            member_1: 314159,
            member_2: true,
        },
        b: 1234,
    }
}
