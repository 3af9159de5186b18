//! Compile-time parse policies.
//!
//! The checked/unchecked distinction and the eight-bit string mode are kept
//! at the type level so the hot loops monomorphize into two code paths
//! instead of branching on a runtime flag. [`ParseOptions`] is the
//! runtime-facing mirror used by [`from_json_with_options`]; it selects one
//! of the four policy types at the entry point and nowhere else.
//!
//! [`from_json_with_options`]: crate::from_json_with_options

mod sealed {
    pub trait Sealed {}
}

/// A compile-time bundle of booleans controlling parser behavior.
///
/// `VALIDATED` gates every format assertion: under an unvalidated (trusted
/// input) policy the parser skips end-of-input and shape checks and may
/// return garbage values for malformed documents. It never reads out of
/// bounds; that guarantee comes from the language, not the policy.
///
/// `ALLOW_HIGH_EIGHT_BIT` permits bytes `>= 0x80` in strings; when `false`
/// the escaped-string parser rejects them with
/// [`ErrorKind::InvalidStringHighAscii`].
///
/// [`ErrorKind::InvalidStringHighAscii`]: crate::ErrorKind::InvalidStringHighAscii
pub trait ParsePolicy: sealed::Sealed + Copy + Default + 'static {
    /// `true` when format assertions are performed.
    const VALIDATED: bool;
    /// `true` when bytes `>= 0x80` are permitted in strings.
    const ALLOW_HIGH_EIGHT_BIT: bool;
}

macro_rules! declare_policy {
    ($(#[$doc:meta])* $name:ident, $validated:expr, $high:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl ParsePolicy for $name {
            const VALIDATED: bool = $validated;
            const ALLOW_HIGH_EIGHT_BIT: bool = $high;
        }
    };
}

declare_policy!(
    /// Validate the input at every step. The default policy.
    Checked,
    true,
    true
);
declare_policy!(
    /// Trust the input: elide format assertions. Malformed input yields
    /// garbage values or an imprecise error, never undefined behavior.
    Unchecked,
    false,
    true
);
declare_policy!(
    /// Validate, and reject string bytes outside `0x20..=0x7F`.
    CheckedDisallowHigh,
    true,
    false
);
declare_policy!(
    /// Trust the input and reject string bytes outside `0x20..=0x7F`.
    UncheckedDisallowHigh,
    false,
    false
);

/// Runtime options for the convenience entry points.
///
/// Each combination maps to one of the compile-time [`ParsePolicy`] types;
/// the selection happens once, at the entry point.
///
/// # Examples
///
/// ```rust
/// use jsonbind::ParseOptions;
///
/// let options = ParseOptions {
///     checked: false,
///     ..Default::default()
/// };
/// assert!(options.allow_high_eight_bit);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Validate the input while parsing.
    ///
    /// # Default
    ///
    /// `true`
    pub checked: bool,

    /// Permit bytes `>= 0x80` in strings.
    ///
    /// # Default
    ///
    /// `true`
    pub allow_high_eight_bit: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            checked: true,
            allow_high_eight_bit: true,
        }
    }
}
