//! Built-in [`Rule`] implementations.

use std::marker::PhantomData;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use super::Rule;
use crate::error::{ValidationError, ValidationErrorKind};

/// Anything with a length a [`Length`] rule can bound.
pub trait Measure {
    /// Unit used in error reasons (`"characters"`, `"items"`).
    const UNIT: &'static str;

    /// Returns the measured length.
    fn measure(&self) -> usize;
}

/// Counts extended grapheme clusters, so `"e\u{301}"` is one character.
impl Measure for str {
    const UNIT: &'static str = "characters";

    fn measure(&self) -> usize {
        self.graphemes(true).count()
    }
}

impl Measure for String {
    const UNIT: &'static str = "characters";

    fn measure(&self) -> usize {
        self.as_str().measure()
    }
}

impl<T> Measure for Vec<T> {
    const UNIT: &'static str = "items";

    fn measure(&self) -> usize {
        self.len()
    }
}

/// Length within `MIN..=MAX`, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Length<const MIN: usize, const MAX: usize>;

impl<T, const MIN: usize, const MAX: usize> Rule<T> for Length<MIN, MAX>
where
    T: Measure + ?Sized,
{
    fn validate(value: &T) -> Result<(), ValidationError> {
        let len = value.measure();
        if (MIN..=MAX).contains(&len) {
            Ok(())
        } else {
            Err(ValidationError::new(
                ValidationErrorKind::InvalidLength,
                format!(
                    "length must be between {MIN} and {MAX} {}, got {len}",
                    T::UNIT
                ),
            ))
        }
    }
}

/// Integer within `MIN..=MAX`, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range<const MIN: i64, const MAX: i64>;

macro_rules! impl_range {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<const MIN: i64, const MAX: i64> Rule<$ty> for Range<MIN, MAX> {
                fn validate(value: &$ty) -> Result<(), ValidationError> {
                    if (i128::from(MIN)..=i128::from(MAX)).contains(&i128::from(*value)) {
                        Ok(())
                    } else {
                        Err(ValidationError::new(
                            ValidationErrorKind::OutOfRange,
                            format!("value must be between {MIN} and {MAX}, got {value}"),
                        ))
                    }
                }
            }
        )*
    };
}

impl_range!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Applies `R` to a present payload; an absent payload always passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NotNil<R>(PhantomData<R>);

impl<T, R: Rule<T>> Rule<Option<T>> for NotNil<R> {
    fn validate(value: &Option<T>) -> Result<(), ValidationError> {
        value.as_ref().map_or(Ok(()), R::validate)
    }
}

/// Both rules must pass; the first failure is reported.
impl<T, A, B> Rule<T> for (A, B)
where
    T: ?Sized,
    A: Rule<T>,
    B: Rule<T>,
{
    fn validate(value: &T) -> Result<(), ValidationError> {
        A::validate(value)?;
        B::validate(value)
    }
}

/// A full-string regular expression rule.
///
/// Declare new ones with [`pattern_rule!`](crate::pattern_rule).
pub trait Pattern {
    /// The pattern as written, without the implicit anchors.
    const PATTERN: &'static str;

    /// Returns the compiled, fully anchored expression.
    fn regex() -> &'static Regex;

    /// Checks that the whole of `value` matches.
    ///
    /// # Errors
    ///
    /// Returns a `malformedString` [`ValidationError`] on mismatch.
    fn check(value: &str) -> Result<(), ValidationError> {
        if Self::regex().is_match(value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                ValidationErrorKind::MalformedString,
                format!("value must match pattern `{}`", Self::PATTERN),
            ))
        }
    }
}

/// Compiles `pattern` anchored at both ends, so it matches whole strings only.
///
/// # Panics
///
/// Panics if `pattern` is not a valid regular expression. Patterns are
/// literals supplied through [`pattern_rule!`](crate::pattern_rule).
#[must_use]
pub fn compile_full_match(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$")).expect("pattern_rule! requires a valid regex literal")
}

/// Declares a zero-sized [`Pattern`] rule usable as `Rule<String>` and `Rule<str>`.
///
/// ```
/// use paypal::pattern_rule;
/// use paypal::validation::Validated;
///
/// pattern_rule! {
///     /// Two to eleven upper-case letters.
///     pub Ticker = r"[A-Z]{2,11}"
/// }
///
/// assert!(Validated::<String, Ticker>::new("PYPL").is_ok());
/// assert!(Validated::<String, Ticker>::new("pypl").is_err());
/// ```
#[macro_export]
macro_rules! pattern_rule {
    ($(#[$meta:meta])* $vis:vis $name:ident = $pattern:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name;

        impl $crate::validation::Pattern for $name {
            const PATTERN: &'static str = $pattern;

            fn regex() -> &'static $crate::validation::Regex {
                static REGEX: ::std::sync::LazyLock<$crate::validation::Regex> =
                    ::std::sync::LazyLock::new(|| $crate::validation::compile_full_match($pattern));
                &REGEX
            }
        }

        impl $crate::validation::Rule<str> for $name {
            fn validate(value: &str) -> ::std::result::Result<(), $crate::ValidationError> {
                <Self as $crate::validation::Pattern>::check(value)
            }
        }

        impl $crate::validation::Rule<::std::string::String> for $name {
            fn validate(
                value: &::std::string::String,
            ) -> ::std::result::Result<(), $crate::ValidationError> {
                <Self as $crate::validation::Pattern>::check(value)
            }
        }
    };
}

pattern_rule! {
    /// Loose e-mail shape PayPal accepts: something, `@`, then neither `"` nor `-`.
    pub EmailAddress = r#".+@[^"\-].+"#
}

pattern_rule! {
    /// Primary account number, 13 to 19 digits.
    pub CardNumber = r"\d{13,19}"
}

pattern_rule! {
    /// Card security code, 3 or 4 digits.
    pub Cvv2 = r"\d{3,4}"
}

pattern_rule! {
    /// ISO 3166-1 alpha-2 country code.
    pub CountryCode = r"[A-Z]{2}"
}

pattern_rule! {
    /// ISO 4217 currency code.
    pub CurrencyCode = r"[A-Z]{3}"
}

pattern_rule! {
    /// ITU E.164 country calling code.
    pub PhoneCountryCode = r"\d{1,3}"
}

pattern_rule! {
    /// National significant number, up to 14 digits.
    pub NationalNumber = r"\d{1,14}"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_is_anchored() {
        assert!(CardNumber::check("4111111111111111").is_ok());
        assert!(CardNumber::check("x4111111111111111").is_err());
        assert!(CardNumber::check("4111111111111111x").is_err());
        assert!(CardNumber::check("411111111111").is_err());
        assert!(CardNumber::check("41111111111111111111").is_err());
    }

    #[test]
    fn test_range_bounds() {
        assert!(<Range<1, 12> as Rule<u8>>::validate(&1).is_ok());
        assert!(<Range<1, 12> as Rule<u8>>::validate(&12).is_ok());
        let err = <Range<1, 12> as Rule<u8>>::validate(&13).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::OutOfRange);
        assert_eq!(err.reason(), "value must be between 1 and 12, got 13");
        assert!(<Range<1, 12> as Rule<i32>>::validate(&0).is_err());
    }

    #[test]
    fn test_length_on_collections() {
        assert!(<Length<1, 2> as Rule<Vec<u8>>>::validate(&vec![]).is_err());
        assert!(<Length<1, 2> as Rule<Vec<u8>>>::validate(&vec![1, 2]).is_ok());
        let err = <Length<1, 2> as Rule<Vec<u8>>>::validate(&vec![1, 2, 3]).unwrap_err();
        assert_eq!(err.reason(), "length must be between 1 and 2 items, got 3");
    }

    #[test]
    fn test_length_reason_names_bounds() {
        let err = <Length<2, 11> as Rule<str>>::validate("a").unwrap_err();
        assert_eq!(err.reason(), "length must be between 2 and 11 characters, got 1");
    }

    #[test]
    fn test_length_counts_grapheme_clusters() {
        let decomposed = "e\u{301}".repeat(4);
        assert_eq!(decomposed.chars().count(), 8);
        assert!(<Length<0, 4> as Rule<String>>::validate(&decomposed).is_ok());
        assert!(<Length<0, 3> as Rule<String>>::validate(&decomposed).is_err());

        let flags = "\u{1F1FA}\u{1F1F8}\u{1F1E9}\u{1F1EA}";
        assert_eq!(flags.measure(), 2);
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
        assert_eq!(family.measure(), 1);
        assert_eq!("héllo".measure(), 5);
    }
}
