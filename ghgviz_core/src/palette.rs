// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color token table.
//!
//! Every chart instance receives its own palette, so two charts with different themes never
//! share lookup state.

extern crate alloc;

use alloc::string::String;

use hashbrown::HashMap;
use peniko::Color;
use peniko::color::{Srgb, parse_color};

/// Errors returned while building a [`Palette`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaletteError {
    /// A palette entry is not a parseable CSS color.
    #[error("invalid color {value:?} for token {token:?}")]
    InvalidColor {
        /// Token being defined.
        token: String,
        /// Offending color string.
        value: String,
    },
}

/// Maps color tokens to colors, with a fallback for unknown tokens.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: HashMap<String, Color>,
    fallback: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Color::from_rgb8(0x8b, 0x9a, 0xb0))
    }
}

impl Palette {
    /// Creates an empty palette resolving everything to `fallback`.
    pub fn new(fallback: Color) -> Self {
        Self {
            colors: HashMap::new(),
            fallback,
        }
    }

    /// Builds a palette from `(token, css color)` pairs.
    pub fn from_css<'a>(
        fallback: Color,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, PaletteError> {
        let mut palette = Self::new(fallback);
        for (token, css) in entries {
            palette.insert_css(token, css)?;
        }
        Ok(palette)
    }

    /// Inserts or replaces a token.
    pub fn insert(&mut self, token: impl Into<String>, color: Color) {
        self.colors.insert(token.into(), color);
    }

    /// Inserts a token from a CSS color string such as `"#ff7b4d"`.
    pub fn insert_css(&mut self, token: &str, css: &str) -> Result<(), PaletteError> {
        let color = parse_color(css)
            .map_err(|_| PaletteError::InvalidColor {
                token: token.into(),
                value: css.into(),
            })?
            .to_alpha_color::<Srgb>();
        self.insert(token, color);
        Ok(())
    }

    /// Resolves a token, falling back for unknown tokens.
    pub fn color(&self, token: &str) -> Color {
        self.colors.get(token).copied().unwrap_or(self.fallback)
    }

    /// Returns the fallback color.
    pub fn fallback(&self) -> Color {
        self.fallback
    }

    /// Returns `true` if `token` has an explicit entry.
    pub fn contains(&self, token: &str) -> bool {
        self.colors.contains_key(token)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn unknown_tokens_use_the_fallback() {
        let palette = Palette::from_css(
            Color::BLACK,
            [("Energy", "#ffd24d"), ("Transport", "#4d9fff")],
        )
        .unwrap();
        assert_eq!(palette.color("Energy").to_rgba8().r, 0xff);
        assert_eq!(palette.color("Transport").to_rgba8().b, 0xff);
        assert_eq!(palette.color("Livestock"), Color::BLACK);
        assert!(!palette.contains("Livestock"));
    }

    #[test]
    fn invalid_css_is_reported_with_its_token() {
        let err = Palette::from_css(Color::BLACK, [("Waste", "not-a-color")]).unwrap_err();
        assert_eq!(
            err,
            PaletteError::InvalidColor {
                token: "Waste".into(),
                value: "not-a-color".into(),
            }
        );
    }
}
