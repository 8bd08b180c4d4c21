// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display strings for values, shares and labels.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;

/// Number of characters kept by [`short_label`] by default.
pub const SHORT_LABEL_CHARS: usize = 9;

/// A display unit: raw values are divided by `divisor` and shown with `decimals` digits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitScale {
    /// Raw units per display unit.
    pub divisor: f64,
    /// Digits after the decimal point.
    pub decimals: usize,
    /// Appended unit suffix.
    pub suffix: &'static str,
}

impl UnitScale {
    /// Kilograms shown as tonnes with one decimal.
    pub const TONNES: Self = Self {
        divisor: 1000.0,
        decimals: 1,
        suffix: "t",
    };

    /// Kilograms shown as whole kilograms.
    pub const KILOGRAMS: Self = Self {
        divisor: 1.0,
        decimals: 0,
        suffix: " kg",
    };

    /// The value in display units.
    pub fn scale(&self, raw: f64) -> f64 {
        raw / self.divisor
    }

    /// Formats `raw` in display units with the suffix, e.g. `12.3t`.
    pub fn format(&self, raw: f64) -> String {
        format!(
            "{:.*}{}",
            self.decimals,
            plain(self.scale(raw)),
            self.suffix
        )
    }
}

/// Formats a percentage, e.g. `42.5%`.
pub fn format_percent(percent: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, plain(percent))
}

/// Cuts `text` to `max_chars` characters, marking the cut with `..`.
pub fn short_label(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}..", &text[..cut])),
    }
}

/// `part / whole × 100`, or `0` when `whole` is not positive.
///
/// The result is not clamped; indicators clamp, labels show the true value.
pub fn coverage_percent(part: f64, whole: f64) -> f64 {
    if whole.is_finite() && whole > 0.0 && part.is_finite() {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Non-finite values print as `0`, and `-0` prints without a sign.
fn plain(v: f64) -> f64 {
    if v.is_finite() && v != 0.0 { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn tonnes_have_one_decimal() {
        assert_eq!(UnitScale::TONNES.format(12_345.0), "12.3t");
        assert_eq!(UnitScale::TONNES.format(0.0), "0.0t");
        assert_eq!(UnitScale::TONNES.format(f64::NAN), "0.0t");
        assert_eq!(UnitScale::KILOGRAMS.format(812.4), "812 kg");
    }

    #[test]
    fn percents() {
        assert_eq!(format_percent(42.456, 1), "42.5%");
        assert_eq!(format_percent(100.0, 0), "100%");
    }

    #[test]
    fn labels_are_cut_after_nine_chars() {
        assert_eq!(short_label("Residential", SHORT_LABEL_CHARS), "Residenti..");
        assert_eq!(short_label("Transport", SHORT_LABEL_CHARS), "Transport");
        assert!(matches!(short_label("LPG", SHORT_LABEL_CHARS), Cow::Borrowed(_)));
        assert_eq!(short_label("Überweidung", 3), "Übe..");
    }

    #[test]
    fn coverage_is_zero_without_a_whole() {
        assert_eq!(coverage_percent(5.0, 0.0), 0.0);
        assert_eq!(coverage_percent(150.0, 100.0), 150.0);
        assert_eq!(coverage_percent(25.0, 100.0), 25.0);
    }
}
