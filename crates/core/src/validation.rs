//! Field-level validation for input models.
//!
//! Every `New*`/`*Update` input runs its rules through a [`Validator`], which
//! collects messages per field instead of stopping at the first failure. The
//! collected [`FieldErrors`] surface to HTTP clients as a 422 body.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::constants::MAX_AMOUNT;
use crate::errors::Result;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex pattern");
    static ref SLUG_REGEX: Regex =
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Invalid regex pattern");
    static ref URL_REGEX: Regex = Regex::new(r"^https?://\S+$").expect("Invalid regex pattern");
}

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Accumulates rule failures for one input model.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` against `field` when `condition` is false.
    pub fn check(&mut self, condition: bool, field: &str, message: &str) -> &mut Self {
        if !condition {
            self.errors.add(field, message);
        }
        self
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(
            !value.trim().is_empty(),
            field,
            &format!("The {} field is required.", field),
        )
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        self.check(
            value.chars().count() <= max,
            field,
            &format!("The {} may not be greater than {} characters.", field, max),
        )
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(
            EMAIL_REGEX.is_match(value),
            field,
            &format!("The {} must be a valid email address.", field),
        )
    }

    pub fn slug(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(
            SLUG_REGEX.is_match(value),
            field,
            &format!(
                "The {} may only contain lowercase letters, numbers, and dashes.",
                field
            ),
        )
    }

    pub fn url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.is_empty() => self.check(
                URL_REGEX.is_match(v),
                field,
                &format!("The {} must be a valid URL.", field),
            ),
            _ => self,
        }
    }

    pub fn positive(&mut self, field: &str, value: Decimal) -> &mut Self {
        self.check(
            value > Decimal::ZERO,
            field,
            &format!("The {} must be greater than 0.", field),
        )
    }

    /// A strictly positive figure no larger than [`MAX_AMOUNT`].
    pub fn amount(&mut self, field: &str, value: Decimal) -> &mut Self {
        self.positive(field, value).check(
            value <= MAX_AMOUNT,
            field,
            &format!("The {} may not be greater than {}.", field, MAX_AMOUNT),
        )
    }

    pub fn non_negative(&mut self, field: &str, value: Decimal) -> &mut Self {
        self.check(
            value >= Decimal::ZERO,
            field,
            &format!("The {} must be at least 0.", field),
        )
    }

    pub fn between(&mut self, field: &str, value: Decimal, min: Decimal, max: Decimal) -> &mut Self {
        self.check(
            value >= min && value <= max,
            field,
            &format!("The {} must be between {} and {}.", field, min, max),
        )
    }

    pub fn one_of(&mut self, field: &str, value: &str, allowed: &[&str]) -> &mut Self {
        self.check(
            allowed.contains(&value),
            field,
            &format!("The selected {} is invalid.", field),
        )
    }

    pub fn finish(&mut self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors).into())
        }
    }
}

/// Lowercases `input` and collapses every run of non-alphanumerics into a dash.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
