//! The `json_contract!` declaration macro.
//!
//! Generates [`JsonContract`] impls for the two common contract shapes:
//! named-member classes and ordered classes (objects encoded as arrays).
//! Member kinds are written as kind specs such as `signed(i32)`, `string`,
//! `array(real(f64))`, `nullable(class(Inner))`, or `map(raw_string, string;
//! BTreeMap<String, String>)`, resolved to descriptor types by
//! [`json_kind_type!`]. Exotic shapes (tagged variants, custom switchers)
//! are written as hand impls of [`JsonContract`] instead.
//!
//! [`JsonContract`]: crate::JsonContract

/// Resolve a kind spec to its descriptor type.
///
/// Kind specs: `real[(f32|f64)]`, `signed[(T)]`, `unsigned[(T)]`,
/// `checked_signed(T)`, `checked_unsigned(T)`, `bool`, `string`,
/// `raw_string`, `raw_string_or_null`, `date`, `class(T)`, `array(spec)`,
/// `nullable(spec)`, `quoted(spec)`, `maybe_quoted(spec)`,
/// `map(kspec, vspec; Container)`, `kv_array(kspec, vspec; Container)`,
/// `custom(T)`, `variant(T)`, `tagged_variant(T)`, `raw`.
#[doc(hidden)]
#[macro_export]
macro_rules! json_kind_type {
    (real) => { $crate::JsonReal<f64> };
    (real($t:ty)) => { $crate::JsonReal<$t> };
    (signed) => { $crate::JsonSigned<i64> };
    (signed($t:ty)) => { $crate::JsonSigned<$t> };
    (checked_signed($t:ty)) => { $crate::JsonCheckedSigned<$t> };
    (unsigned) => { $crate::JsonUnsigned<u64> };
    (unsigned($t:ty)) => { $crate::JsonUnsigned<$t> };
    (checked_unsigned($t:ty)) => { $crate::JsonCheckedUnsigned<$t> };
    (bool) => { $crate::JsonBool };
    (string) => { $crate::JsonString };
    (raw_string) => { $crate::JsonStringRaw };
    (raw_string_or_null) => { $crate::JsonStringRawOrNull };
    (date) => { $crate::JsonDate };
    (class($t:ty)) => { $crate::JsonClass<$t> };
    (array($($inner:tt)+)) => { $crate::JsonArray<$crate::json_kind_type!($($inner)+)> };
    (nullable($($inner:tt)+)) => { $crate::Nullable<$crate::json_kind_type!($($inner)+)> };
    (quoted($($inner:tt)+)) => { $crate::Quoted<$crate::json_kind_type!($($inner)+)> };
    (maybe_quoted($($inner:tt)+)) => { $crate::MaybeQuoted<$crate::json_kind_type!($($inner)+)> };
    (map($kn:ident $(($($ka:tt)+))?, $vn:ident $(($($va:tt)+))?; $c:ty)) => {
        $crate::JsonKeyValue<
            $crate::json_kind_type!($kn $(($($ka)+))?),
            $crate::json_kind_type!($vn $(($($va)+))?),
            $c,
        >
    };
    (kv_array($kn:ident $(($($ka:tt)+))?, $vn:ident $(($($va:tt)+))?; $c:ty)) => {
        $crate::JsonKeyValueArray<
            $crate::json_kind_type!($kn $(($($ka)+))?),
            $crate::json_kind_type!($vn $(($($va)+))?),
            $c,
        >
    };
    (custom($t:ty)) => { $crate::JsonCustom<$t> };
    (variant($t:ty)) => { $crate::JsonVariant<$t> };
    (tagged_variant($t:ty)) => { $crate::JsonTaggedVariant<$t> };
    (raw) => { $crate::JsonRaw };
}

/// Declare the JSON contract for a user type.
///
/// # Examples
///
/// ```rust
/// use jsonbind::json_contract;
///
/// #[derive(Debug, PartialEq)]
/// struct Server {
///     host: String,
///     port: u16,
///     secure: bool,
/// }
///
/// json_contract! {
///     struct Server {
///         host: "host" => string,
///         port: "port" => checked_unsigned(u16),
///         secure: "secure" => bool,
///     }
/// }
///
/// let server: Server = jsonbind::from_json(r#"{"host":"a","port":80,"secure":false}"#).unwrap();
/// assert_eq!(server.port, 80);
/// assert_eq!(jsonbind::to_json(&server), r#"{"host":"a","port":80,"secure":false}"#);
/// ```
///
/// Ordered classes bind to a JSON array positionally:
///
/// ```rust
/// use jsonbind::json_contract;
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// json_contract! {
///     ordered struct Point {
///         x => real,
///         y => real,
///     }
/// }
///
/// let p: Point = jsonbind::from_json("[1.5, 2.5]").unwrap();
/// assert_eq!(p, Point { x: 1.5, y: 2.5 });
/// assert_eq!(jsonbind::to_json(&p), "[1.5,2.5]");
/// ```
#[macro_export]
macro_rules! json_contract {
    (@count) => { 0usize };
    (@count $head:literal $($tail:literal)*) => { 1usize + $crate::json_contract!(@count $($tail)*) };

    (struct $ty:ident {
        $($members:tt)+
    }) => {
        $crate::json_contract!(@named 'a ($ty) $($members)+);
    };

    // Borrow-carrying contracts (raw strings, lazy values) name their
    // lifetime: `struct Envelope<'a> { .. }`.
    (struct $ty:ident<$lt:lifetime> {
        $($members:tt)+
    }) => {
        $crate::json_contract!(@named $lt ($ty<$lt>) $($members)+);
    };

    (@named $lt:lifetime ($target:ty)
        $($field:ident : $name:literal => $kn:ident $(($($ka:tt)+))?),+ $(,)?
    ) => {
        impl<$lt> $crate::JsonContract<$lt> for $target {
            const MEMBER_NAMES: &'static [&'static str] = &[$($name),+];

            fn parse_json<P: $crate::ParsePolicy>(
                state: &mut $crate::ParseState<$lt, P>,
            ) -> ::core::result::Result<Self, $crate::JsonError> {
                const __MEMBERS: usize = $crate::json_contract!(@count $($name)+);
                $crate::__private::begin_class(state)?;
                let mut __table = $crate::__private::LocationTable::<__MEMBERS>::new(
                    <Self as $crate::JsonContract<$lt>>::MEMBER_NAMES,
                );
                let mut __index = 0usize;
                $(
                    let $field = {
                        let __value = $crate::__private::class_member::<
                            $crate::json_kind_type!($kn $(($($ka)+))?),
                            P,
                            __MEMBERS,
                        >(&mut __table, __index, state)?;
                        __index += 1;
                        __value
                    };
                )+
                let _ = __index;
                $crate::__private::class_cleanup(state)?;
                ::core::result::Result::Ok(Self { $($field),+ })
            }

            fn serialize_json(&self, w: &mut $crate::JsonWriter) {
                w.begin_class();
                let mut __first = true;
                $(
                    $crate::__private::emit_member::<
                        $crate::json_kind_type!($kn $(($($ka)+))?),
                    >($name, &self.$field, w, &mut __first);
                )+
                w.end_class();
            }
        }
    };

    (ordered struct $ty:ident {
        $($field:ident => $kn:ident $(($($ka:tt)+))?),+ $(,)?
    }) => {
        impl<'a> $crate::JsonContract<'a> for $ty {
            fn parse_json<P: $crate::ParsePolicy>(
                state: &mut $crate::ParseState<'a, P>,
            ) -> ::core::result::Result<Self, $crate::JsonError> {
                $crate::__private::begin_ordered_class(state)?;
                let mut __index = 0usize;
                $(
                    let $field = $crate::__private::ordered_member::<
                        $crate::json_kind_type!($kn $(($($ka)+))?),
                        P,
                    >(state, &mut __index, ::core::option::Option::None)?;
                )+
                let _ = __index;
                $crate::__private::finish_ordered_class(state)?;
                ::core::result::Result::Ok(Self { $($field),+ })
            }

            fn serialize_json(&self, w: &mut $crate::JsonWriter) {
                w.begin_array();
                let mut __first = true;
                $(
                    w.element_sep(&mut __first);
                    <$crate::json_kind_type!($kn $(($($ka)+))?) as $crate::JsonSerialize<'_>>::emit(
                        &self.$field,
                        w,
                    );
                )+
                w.end_array();
            }
        }
    };
}
