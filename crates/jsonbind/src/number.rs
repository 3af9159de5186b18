//! Number kinds: signed and unsigned integers and reals.
//!
//! Integers accumulate base-10 into a 64-bit magnitude; the `RANGE_CHECK`
//! const parameter decides between checked narrowing (failing with
//! `NumberOutOfRange`) and wrapping conversion, matching the contract's
//! range-check flag. Reals delimit the token text with the number skip and
//! hand it to `core`'s correctly-rounded `FromStr` (round-to-nearest,
//! ties-to-even). `NaN`, `Infinity`, and `-Infinity` are accepted only
//! inside quotes, via [`Quoted`]/[`MaybeQuoted`].
//!
//! [`Quoted`]: crate::Quoted
//! [`MaybeQuoted`]: crate::MaybeQuoted

use core::marker::PhantomData;

use crate::{
    contract::{BaseKind, JsonParse, JsonSerialize},
    error::{ErrorKind, JsonError},
    policy::ParsePolicy,
    ser::JsonWriter,
    state::ParseState,
};

mod sealed {
    pub trait Sealed {}
}

/// Integer types a signed number kind can produce.
pub trait SignedInteger: Copy + sealed::Sealed {
    /// Checked conversion from sign and magnitude; `None` on overflow.
    fn from_magnitude(negative: bool, magnitude: u64) -> Option<Self>;
    /// Wrapping conversion from sign and magnitude.
    fn from_magnitude_wrapping(negative: bool, magnitude: u64) -> Self;
}

/// Integer types an unsigned number kind can produce.
pub trait UnsignedInteger: Copy + sealed::Sealed {
    /// Checked conversion; `None` on overflow.
    fn from_magnitude(magnitude: u64) -> Option<Self>;
    /// Wrapping conversion.
    fn from_magnitude_wrapping(magnitude: u64) -> Self;
}

macro_rules! impl_signed_integer {
    ($($t:ty)+) => {$(
        impl sealed::Sealed for $t {}
        impl SignedInteger for $t {
            #[inline]
            fn from_magnitude(negative: bool, magnitude: u64) -> Option<Self> {
                let wide = if negative {
                    (magnitude as i128).wrapping_neg()
                } else {
                    magnitude as i128
                };
                <$t>::try_from(wide).ok()
            }

            #[inline]
            fn from_magnitude_wrapping(negative: bool, magnitude: u64) -> Self {
                let wide = if negative {
                    (magnitude as i128).wrapping_neg()
                } else {
                    magnitude as i128
                };
                wide as $t
            }
        }
    )+};
}

macro_rules! impl_unsigned_integer {
    ($($t:ty)+) => {$(
        impl sealed::Sealed for $t {}
        impl UnsignedInteger for $t {
            #[inline]
            fn from_magnitude(magnitude: u64) -> Option<Self> {
                <$t>::try_from(magnitude).ok()
            }

            #[inline]
            fn from_magnitude_wrapping(magnitude: u64) -> Self {
                magnitude as $t
            }
        }
    )+};
}

impl_signed_integer!(i8 i16 i32 i64 isize);
impl_unsigned_integer!(u8 u16 u32 u64 usize);

/// Float types a real kind can produce.
pub trait JsonFloat: Copy + sealed::Sealed {
    /// Parse the full token text; `None` when it is not a valid decimal.
    fn parse_text(text: &str) -> Option<Self>;
    /// The NaN value.
    fn nan() -> Self;
    /// Positive or negative infinity.
    fn infinity(negative: bool) -> Self;
    /// `false` for NaN and the infinities.
    fn is_finite_value(&self) -> bool;
}

macro_rules! impl_json_float {
    ($($t:ty)+) => {$(
        impl sealed::Sealed for $t {}
        impl JsonFloat for $t {
            #[inline]
            fn parse_text(text: &str) -> Option<Self> {
                text.parse::<$t>().ok()
            }

            #[inline]
            fn nan() -> Self {
                <$t>::NAN
            }

            #[inline]
            fn infinity(negative: bool) -> Self {
                if negative { <$t>::NEG_INFINITY } else { <$t>::INFINITY }
            }

            #[inline]
            fn is_finite_value(&self) -> bool {
                self.is_finite()
            }
        }
    )+};
}

impl_json_float!(f32 f64);

/// Accumulate a run of ASCII digits into a magnitude.
///
/// Under `RANGE_CHECK` the accumulator itself is overflow-checked; otherwise
/// it wraps. Under the checked policy at least one digit is required.
fn parse_digits<'a, P: ParsePolicy, const RANGE_CHECK: bool>(
    state: &mut ParseState<'a, P>,
) -> Result<u64, JsonError> {
    let mut magnitude: u64 = 0;
    let mut any = false;
    let mut overflow = false;
    while state.has_more() {
        let digit = state.front().wrapping_sub(b'0');
        if digit > 9 {
            break;
        }
        if RANGE_CHECK {
            match magnitude
                .checked_mul(10)
                .and_then(|m| m.checked_add(u64::from(digit)))
            {
                Some(m) => magnitude = m,
                None => overflow = true,
            }
        } else {
            magnitude = magnitude.wrapping_mul(10).wrapping_add(u64::from(digit));
        }
        any = true;
        state.remove_prefix(1);
    }
    if P::VALIDATED && !any {
        return Err(state.error(ErrorKind::InvalidNumber));
    }
    if overflow {
        return Err(state.error(ErrorKind::NumberOutOfRange));
    }
    Ok(magnitude)
}

// ---------------------------------------------------------------------------
// Signed
// ---------------------------------------------------------------------------

/// A signed integer member. `RANGE_CHECK` turns narrowing overflow into
/// [`ErrorKind::NumberOutOfRange`] instead of wrapping.
#[derive(Debug, Clone, Copy)]
pub struct JsonSigned<T = i64, const RANGE_CHECK: bool = false>(PhantomData<T>);

/// A signed integer member that fails on overflow of the destination type.
pub type JsonCheckedSigned<T = i64> = JsonSigned<T, true>;

impl<'a, P: ParsePolicy, T: SignedInteger, const RANGE_CHECK: bool> JsonParse<'a, P>
    for JsonSigned<T, RANGE_CHECK>
{
    type Parsed = T;
    const BASE: BaseKind = BaseKind::Number;

    fn parse<const KNOWN_BOUNDS: bool>(state: &mut ParseState<'a, P>) -> Result<T, JsonError> {
        state.expect_more()?;
        let negative = match state.front() {
            b'-' => {
                state.remove_prefix(1);
                true
            }
            b'+' => {
                state.remove_prefix(1);
                false
            }
            _ => false,
        };
        let magnitude = parse_digits::<P, RANGE_CHECK>(state)?;
        let value = if RANGE_CHECK {
            T::from_magnitude(negative, magnitude)
                .ok_or_else(|| state.error(ErrorKind::NumberOutOfRange))?
        } else {
            T::from_magnitude_wrapping(negative, magnitude)
        };
        if !KNOWN_BOUNDS {
            state.assert_item_end(ErrorKind::InvalidNumber)?;
        }
        Ok(value)
    }

    fn parse_quoted(state: &mut ParseState<'a, P>) -> Result<T, JsonError> {
        Self::parse::<true>(state)
    }
}

impl<'a, T: itoa::Integer + Copy, const RANGE_CHECK: bool> JsonSerialize<'a>
    for JsonSigned<T, RANGE_CHECK>
{
    type Value = T;

    fn emit(value: &T, w: &mut JsonWriter) {
        w.write_int(*value);
    }
}

// ---------------------------------------------------------------------------
// Unsigned
// ---------------------------------------------------------------------------

/// An unsigned integer member. No sign is accepted.
#[derive(Debug, Clone, Copy)]
pub struct JsonUnsigned<T = u64, const RANGE_CHECK: bool = false>(PhantomData<T>);

/// An unsigned integer member that fails on overflow of the destination
/// type.
pub type JsonCheckedUnsigned<T = u64> = JsonUnsigned<T, true>;

impl<'a, P: ParsePolicy, T: UnsignedInteger, const RANGE_CHECK: bool> JsonParse<'a, P>
    for JsonUnsigned<T, RANGE_CHECK>
{
    type Parsed = T;
    const BASE: BaseKind = BaseKind::Number;

    fn parse<const KNOWN_BOUNDS: bool>(state: &mut ParseState<'a, P>) -> Result<T, JsonError> {
        state.expect_more()?;
        let magnitude = parse_digits::<P, RANGE_CHECK>(state)?;
        let value = if RANGE_CHECK {
            T::from_magnitude(magnitude).ok_or_else(|| state.error(ErrorKind::NumberOutOfRange))?
        } else {
            T::from_magnitude_wrapping(magnitude)
        };
        if !KNOWN_BOUNDS {
            state.assert_item_end(ErrorKind::InvalidNumber)?;
        }
        Ok(value)
    }

    fn parse_quoted(state: &mut ParseState<'a, P>) -> Result<T, JsonError> {
        Self::parse::<true>(state)
    }
}

impl<'a, T: itoa::Integer + Copy, const RANGE_CHECK: bool> JsonSerialize<'a>
    for JsonUnsigned<T, RANGE_CHECK>
{
    type Value = T;

    fn emit(value: &T, w: &mut JsonWriter) {
        w.write_int(*value);
    }
}

// ---------------------------------------------------------------------------
// Real
// ---------------------------------------------------------------------------

/// A real (floating point) member.
#[derive(Debug, Clone, Copy)]
pub struct JsonReal<T = f64>(PhantomData<T>);

impl<'a, P: ParsePolicy, T: JsonFloat> JsonParse<'a, P> for JsonReal<T> {
    type Parsed = T;
    const BASE: BaseKind = BaseKind::Number;

    fn parse<const KNOWN_BOUNDS: bool>(state: &mut ParseState<'a, P>) -> Result<T, JsonError> {
        state.expect_more()?;
        let token = if KNOWN_BOUNDS {
            let token = *state;
            state.remove_prefix(state.len());
            token
        } else {
            state.skip_number()?
        };
        let value =
            T::parse_text(token.as_str()).ok_or_else(|| token.error(ErrorKind::InvalidNumber))?;
        // A bare number has no non-finite spelling, but an overflowing
        // exponent like 1e999 still parses to infinity.
        if P::VALIDATED && !value.is_finite_value() {
            return Err(token.error(ErrorKind::NumberIsInf));
        }
        if !KNOWN_BOUNDS {
            state.assert_item_end(ErrorKind::InvalidNumber)?;
        }
        Ok(value)
    }

    /// Inside quotes the special literals `NaN`, `Infinity`, and
    /// `-Infinity` are also accepted.
    fn parse_quoted(state: &mut ParseState<'a, P>) -> Result<T, JsonError> {
        state.expect_more()?;
        match state.front() {
            b'N' => {
                state.skip_literal(b"NaN")?;
                Ok(T::nan())
            }
            b'I' => {
                state.skip_literal(b"Infinity")?;
                Ok(T::infinity(false))
            }
            b'-' if state.as_bytes().starts_with(b"-I") => {
                state.skip_literal(b"-Infinity")?;
                Ok(T::infinity(true))
            }
            _ => {
                let token = state.skip_number()?;
                T::parse_text(token.as_str()).ok_or_else(|| token.error(ErrorKind::InvalidNumber))
            }
        }
    }
}

impl<'a, T: ryu::Float + PartialEq + PartialOrd + Copy> JsonSerialize<'a> for JsonReal<T> {
    type Value = T;

    fn emit(value: &T, w: &mut JsonWriter) {
        w.write_real(*value);
    }
}

#[cfg(test)]
mod tests {
    use crate::policy::{Checked, Unchecked};

    use super::*;

    fn state(s: &str) -> ParseState<'_, Checked> {
        ParseState::new(s.as_bytes())
    }

    #[test]
    fn signed_basic() {
        let mut st = state("314159,");
        let v: i32 = JsonSigned::<i32>::parse::<false>(&mut st).unwrap();
        assert_eq!(v, 314159);
        assert_eq!(st.front(), b',');
    }

    #[test]
    fn signed_negative_and_leading_plus() {
        let mut st = state("-42]");
        assert_eq!(JsonSigned::<i64>::parse::<false>(&mut st).unwrap(), -42);
        let mut st = state("+17}");
        assert_eq!(JsonSigned::<i64>::parse::<false>(&mut st).unwrap(), 17);
    }

    #[test]
    fn signed_min_is_representable() {
        let mut st = state("-9223372036854775808");
        let v = JsonCheckedSigned::<i64>::parse::<false>(&mut st).unwrap();
        assert_eq!(v, i64::MIN);
    }

    #[test]
    fn checked_signed_overflow() {
        let mut st = state("128");
        let err = JsonCheckedSigned::<i8>::parse::<false>(&mut st).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::NumberOutOfRange);
    }

    #[test]
    fn unchecked_range_wraps() {
        let mut st = state("300,");
        let v: u8 = JsonUnsigned::<u8>::parse::<false>(&mut st).unwrap();
        assert_eq!(v, 44);
    }

    #[test]
    fn unsigned_rejects_sign() {
        let mut st = state("-1");
        assert!(JsonUnsigned::<u64>::parse::<false>(&mut st).is_err());
    }

    #[test]
    fn empty_digits_is_invalid() {
        let mut st = state("x");
        let err = JsonSigned::<i64>::parse::<false>(&mut st).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::InvalidNumber);
    }

    #[test]
    fn trailing_junk_is_invalid() {
        let mut st = state("12x");
        assert!(JsonSigned::<i64>::parse::<false>(&mut st).is_err());
    }

    #[test]
    fn real_forms() {
        for (text, want) in [
            ("1.5,", 1.5),
            ("-0.25}", -0.25),
            ("1e3]", 1000.0),
            ("2.5e-2,", 0.025),
            ("0,", 0.0),
        ] {
            let mut st = state(text);
            let v: f64 = JsonReal::<f64>::parse::<false>(&mut st).unwrap();
            assert_eq!(v, want, "{text}");
        }
    }

    #[test]
    fn real_rejects_malformed() {
        for text in ["1e,", "--1,", "1.2.3,", ".e5,"] {
            let mut st = state(text);
            assert!(JsonReal::<f64>::parse::<false>(&mut st).is_err(), "{text}");
        }
    }

    #[test]
    fn quoted_specials() {
        let mut st = state("NaN\"");
        assert!(JsonReal::<f64>::parse_quoted(&mut st).unwrap().is_nan());
        let mut st = state("Infinity\"");
        assert_eq!(
            JsonReal::<f64>::parse_quoted(&mut st).unwrap(),
            f64::INFINITY
        );
        let mut st = state("-Infinity\"");
        assert_eq!(
            JsonReal::<f64>::parse_quoted(&mut st).unwrap(),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn overflowing_exponent_is_rejected() {
        let mut st = state("1e999,");
        let err = JsonReal::<f64>::parse::<false>(&mut st).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::NumberIsInf);
    }

    #[test]
    fn bare_specials_rejected() {
        let mut st = state("NaN");
        assert!(JsonReal::<f64>::parse::<false>(&mut st).is_err());
    }

    #[test]
    fn unchecked_matches_checked_on_valid_input() {
        let mut checked = state("98765,");
        let mut unchecked: ParseState<'_, Unchecked> = ParseState::new(b"98765,");
        let a: i64 = JsonSigned::<i64>::parse::<false>(&mut checked).unwrap();
        let b: i64 = JsonSigned::<i64>::parse::<false>(&mut unchecked).unwrap();
        assert_eq!(a, b);
    }
}
