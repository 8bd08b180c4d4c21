// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw record values.
//!
//! Source tables deliver numbers either as numbers or as strings. Strings are parsed the way a
//! lenient spreadsheet import would: leading whitespace is skipped and the longest numeric
//! prefix is used (`"12.5 kg"` is `12.5`). Anything unparseable is `0`.
//!
//! A value is *reported* only if it is finite and strictly positive. Unreported values are
//! dropped from aggregation rather than counted as zero contributions.

/// A record's value as delivered by the source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawValue<'a> {
    /// Already numeric.
    Number(f64),
    /// Numeric string, possibly malformed.
    Text(&'a str),
    /// No value in the source row.
    Missing,
}

impl From<f64> for RawValue<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<Option<&'a str>> for RawValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Missing, Self::Text)
    }
}

impl RawValue<'_> {
    /// Numeric value, with malformed or missing input as `0`.
    pub fn parse(self) -> f64 {
        match self {
            Self::Number(v) => v,
            Self::Text(s) => parse_leading_f64(s).unwrap_or(0.0),
            Self::Missing => 0.0,
        }
    }

    /// The value if it counts as reported.
    pub fn reported(self) -> Option<f64> {
        parse_reported(self.parse())
    }
}

/// Returns `value` if it is finite and `> 0`.
pub fn parse_reported(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Parses the longest numeric prefix of `s`, after leading whitespace.
///
/// Returns `None` if `s` does not start with a number.
pub fn parse_leading_f64(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac = frac_end - (end + 1);
        if digits + frac > 0 {
            digits += frac;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn leading_prefix_is_parsed() {
        assert_eq!(parse_leading_f64("10"), Some(10.0));
        assert_eq!(parse_leading_f64("  12.5 kg"), Some(12.5));
        assert_eq!(parse_leading_f64("-3"), Some(-3.0));
        assert_eq!(parse_leading_f64(".5"), Some(0.5));
        assert_eq!(parse_leading_f64("1.2.3"), Some(1.2));
        assert_eq!(parse_leading_f64("2e3t"), Some(2000.0));
        assert_eq!(parse_leading_f64("7e"), Some(7.0));
        assert_eq!(parse_leading_f64("bad"), None);
        assert_eq!(parse_leading_f64("."), None);
        assert_eq!(parse_leading_f64(""), None);
    }

    #[test]
    fn only_finite_positive_values_are_reported() {
        assert_eq!(RawValue::from("10").reported(), Some(10.0));
        assert_eq!(RawValue::from("-3").reported(), None);
        assert_eq!(RawValue::from("bad").reported(), None);
        assert_eq!(RawValue::from("0").reported(), None);
        assert_eq!(RawValue::Number(f64::INFINITY).reported(), None);
        assert_eq!(RawValue::from(None).reported(), None);
        assert_eq!(RawValue::from("bad").parse(), 0.0, "malformed strings parse to zero");
    }
}
