//! Self-validating field values.
//!
//! [`Validated<T, R>`] wraps a value of type `T` together with a zero-sized
//! [`Rule`] `R`. The only ways to obtain or change the value,
//! [`Validated::new`], [`Validated::set`] and deserialization, all run the
//! rule first. A `Validated` therefore never holds a value its rule rejects.
//!
//! On the wire the wrapper is transparent: it serializes exactly as `T`.
//!
//! ```
//! use paypal::validation::{Length, Validated};
//!
//! let mut name = Validated::<String, Length<0, 8>>::new("ok")?;
//! assert!(name.set("far too long").is_err());
//! assert_eq!(name.get(), "ok");
//! # Ok::<(), paypal::ValidationError>(())
//! ```

mod rules;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use regex::Regex;
pub use rules::*;

use crate::error::ValidationError;

/// A stateless validation policy over values of type `T`.
///
/// Implementors are marker types; the same input must always produce the
/// same outcome.
pub trait Rule<T: ?Sized> {
    /// Checks `value`, describing the violated constraint on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `value` does not satisfy the rule.
    fn validate(value: &T) -> Result<(), ValidationError>;
}

/// A value of type `T` that always satisfies rule `R`.
pub struct Validated<T, R> {
    value: T,
    rule: PhantomData<fn() -> R>,
}

/// A string field whose length (in characters) lies in `MIN..=MAX`.
pub type Text<const MIN: usize, const MAX: usize> = Validated<String, Length<MIN, MAX>>;

impl<T, R: Rule<T>> Validated<T, R> {
    /// Validates `value` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns the rule's [`ValidationError`] if `value` is rejected.
    pub fn new(value: impl Into<T>) -> Result<Self, ValidationError> {
        let value = value.into();
        R::validate(&value)?;
        Ok(Self {
            value,
            rule: PhantomData,
        })
    }

    /// Validated assignment: replaces the value only if `value` passes.
    ///
    /// On failure the previous value is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the rule's [`ValidationError`] if `value` is rejected.
    pub fn set(&mut self, value: impl Into<T>) -> Result<(), ValidationError> {
        let value = value.into();
        R::validate(&value)?;
        self.value = value;
        Ok(())
    }
}

impl<T, R> Validated<T, R> {
    /// Returns the current value.
    #[must_use]
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Unwraps the current value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, R> Validated<Option<T>, R> {
    /// Returns `true` if the optional payload is absent.
    ///
    /// Intended for `#[serde(skip_serializing_if = "Validated::is_none")]`.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.value.is_none()
    }
}

impl<T, R> Default for Validated<Option<T>, NotNil<R>> {
    fn default() -> Self {
        Self {
            value: None,
            rule: PhantomData,
        }
    }
}

impl<T, const MAX: usize> Default for Validated<Vec<T>, Length<0, MAX>> {
    fn default() -> Self {
        Self {
            value: Vec::new(),
            rule: PhantomData,
        }
    }
}

impl<T, R> Deref for Validated<T, R> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Clone, R> Clone for Validated<T, R> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            rule: PhantomData,
        }
    }
}

impl<T: fmt::Debug, R> fmt::Debug for Validated<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: fmt::Display, R> fmt::Display for Validated<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: PartialEq, R> PartialEq for Validated<T, R> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq, R> Eq for Validated<T, R> {}

impl<T: Hash, R> Hash for Validated<T, R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<R: Rule<String>> PartialEq<str> for Validated<String, R> {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl<R: Rule<String>> FromStr for Validated<String, R> {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<T: Serialize, R> Serialize for Validated<T, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T, R> Deserialize<'de> for Validated<T, R>
where
    T: Deserialize<'de>,
    R: Rule<T>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = T::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
