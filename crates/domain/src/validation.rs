//! Predicates for validating raw numeric input strings.
//!
//! These never panic and never allocate errors. Callers use the returned
//! booleans to disable actions on invalid input rather than failing.

/// True if the string contains nothing but whitespace.
#[must_use]
pub fn is_empty(value: &str) -> bool {
    value.trim().is_empty()
}

/// True if the string parses to a finite number, optionally bounded from
/// below. With `exclude_min` the minimum itself is rejected.
#[must_use]
pub fn is_valid_number(value: &str, min: Option<f32>, exclude_min: bool) -> bool {
    let Some(number) = parse_number(value) else {
        return false;
    };
    match min {
        Some(min) if exclude_min => number > min,
        Some(min) => number >= min,
        None => true,
    }
}

/// True if the string parses to an integer, optionally bounded from below.
#[must_use]
pub fn is_valid_integer(value: &str, min: Option<i64>, exclude_min: bool) -> bool {
    let Ok(number) = value.trim().parse::<i64>() else {
        return false;
    };
    match min {
        Some(min) if exclude_min => number > min,
        Some(min) => number >= min,
        None => true,
    }
}

/// True if the string parses to a number strictly between 0 and 1.
#[must_use]
pub fn is_number_between_zero_and_one(value: &str) -> bool {
    parse_number(value).is_some_and(|number| number > 0.0 && number < 1.0)
}

/// True if the string is non-empty but does not parse to a number above 0.
/// Empty input is not reported as invalid; it stands for "use the default".
#[must_use]
pub fn is_invalid_number_or_zero(value: &str) -> bool {
    !is_empty(value) && !is_valid_number(value, Some(0.0), true)
}

pub(crate) fn parse_number(value: &str) -> Option<f32> {
    value
        .replace(',', ".")
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|number| number.is_finite())
}
