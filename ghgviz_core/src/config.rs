// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.
//!
//! This is presentation-layer configuration: invalid values never fail a render. Parsers
//! are strict (`FromStr`), while the `*_or_default` helpers and the serde path fall back to
//! defaults with a warning.

extern crate alloc;

use alloc::string::String;
use core::fmt;
use core::num::NonZeroUsize;
use core::str::FromStr;

/// Ordering applied to an aggregated series before truncation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// Value descending; ties keep first-seen order.
    #[default]
    ByValue,
    /// Category ascending, then value descending within each category.
    ByCategory,
    /// Label ascending, case-insensitive.
    Alphabetic,
}

/// Error returned when a sort mode name is unknown.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort mode {0:?}, expected one of byValue, byCategory, alphabetic")]
pub struct ParseSortModeError(pub String);

impl FromStr for SortMode {
    type Err = ParseSortModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "byValue" | "by_value" | "value" => Ok(Self::ByValue),
            "byCategory" | "by_category" | "category" => Ok(Self::ByCategory),
            "alphabetic" | "alpha" => Ok(Self::Alphabetic),
            other => Err(ParseSortModeError(other.into())),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ByValue => "byValue",
            Self::ByCategory => "byCategory",
            Self::Alphabetic => "alphabetic",
        })
    }
}

impl SortMode {
    /// Parses a sort mode, falling back to [`SortMode::ByValue`] for unknown names.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_else(|err: ParseSortModeError| {
            log::warn!("{err}; using byValue");
            Self::default()
        })
    }
}

/// How many items of a sorted series are kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TopN {
    /// Keep every item.
    #[default]
    All,
    /// Keep the first `n` items.
    First(NonZeroUsize),
}

/// Error returned when a top-N value is neither `"all"` nor a positive count.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid top-N value {0:?}, expected \"all\" or a positive count")]
pub struct ParseTopNError(pub String);

impl FromStr for TopN {
    type Err = ParseTopNError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<usize>()
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self::First)
            .ok_or_else(|| ParseTopNError(s.into()))
    }
}

impl TopN {
    /// Converts a signed count, treating `n <= 0` as [`TopN::All`].
    pub fn from_count(n: i64) -> Self {
        match usize::try_from(n).ok().and_then(NonZeroUsize::new) {
            Some(n) => Self::First(n),
            None => {
                log::warn!("top-N count {n} is not positive; keeping all items");
                Self::All
            }
        }
    }

    /// Number of items kept out of `len`.
    pub fn limit(self, len: usize) -> usize {
        match self {
            Self::All => len,
            Self::First(n) => n.get().min(len),
        }
    }
}

/// Options consumed by the aggregation, scale and animation layers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawEngineConfig"))]
pub struct EngineConfig {
    /// Series ordering.
    pub sort_mode: SortMode,
    /// Truncation after sorting.
    pub top_n: TopN,
    /// Reveal animation duration in milliseconds.
    pub animation_duration_ms: f64,
    /// Delay between mount and the start of the reveal, in milliseconds.
    pub animation_delay_ms: f64,
    /// Number of axis ticks, including the zero tick.
    pub tick_count: usize,
}

/// Default reveal duration.
pub const DEFAULT_ANIMATION_DURATION_MS: f64 = 900.0;
/// Default axis tick count.
pub const DEFAULT_TICK_COUNT: usize = 5;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::ByValue,
            top_n: TopN::All,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            animation_delay_ms: 0.0,
            tick_count: DEFAULT_TICK_COUNT,
        }
    }
}

impl EngineConfig {
    /// Sets the sort mode.
    pub fn with_sort_mode(mut self, sort_mode: SortMode) -> Self {
        self.sort_mode = sort_mode;
        self
    }

    /// Sets the truncation.
    pub fn with_top_n(mut self, top_n: TopN) -> Self {
        self.top_n = top_n;
        self
    }

    /// Sets the reveal duration in milliseconds.
    pub fn with_animation_duration_ms(mut self, ms: f64) -> Self {
        self.animation_duration_ms = ms;
        self
    }

    /// Sets the mount delay in milliseconds.
    pub fn with_animation_delay_ms(mut self, ms: f64) -> Self {
        self.animation_delay_ms = ms;
        self
    }

    /// Sets the tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Returns a copy with out-of-range values replaced by defaults.
    pub fn sanitized(self) -> Self {
        let mut out = self;
        if out.tick_count < 2 {
            log::warn!(
                "tick count {} is below 2; using {DEFAULT_TICK_COUNT}",
                out.tick_count
            );
            out.tick_count = DEFAULT_TICK_COUNT;
        }
        if !out.animation_duration_ms.is_finite() || out.animation_duration_ms < 0.0 {
            log::warn!(
                "animation duration {} ms is invalid; using {DEFAULT_ANIMATION_DURATION_MS}",
                out.animation_duration_ms
            );
            out.animation_duration_ms = DEFAULT_ANIMATION_DURATION_MS;
        }
        if !out.animation_delay_ms.is_finite() || out.animation_delay_ms < 0.0 {
            out.animation_delay_ms = 0.0;
        }
        out
    }
}

/// Lenient mirror of the JSON configuration surface.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEngineConfig {
    #[serde(default)]
    sort_mode: Option<String>,
    #[serde(default)]
    top_n: Option<RawTopN>,
    #[serde(default)]
    animation_duration_ms: Option<f64>,
    #[serde(default)]
    animation_delay_ms: Option<f64>,
    #[serde(default)]
    tick_count: Option<i64>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawTopN {
    Count(i64),
    Keyword(String),
}

#[cfg(feature = "serde")]
impl From<RawEngineConfig> for EngineConfig {
    fn from(raw: RawEngineConfig) -> Self {
        let defaults = Self::default();
        let top_n = match raw.top_n {
            None => defaults.top_n,
            Some(RawTopN::Count(n)) => TopN::from_count(n),
            Some(RawTopN::Keyword(s)) => s.parse().unwrap_or_else(|err: ParseTopNError| {
                log::warn!("{err}; keeping all items");
                TopN::All
            }),
        };
        Self {
            sort_mode: raw
                .sort_mode
                .as_deref()
                .map_or(defaults.sort_mode, SortMode::parse_or_default),
            top_n,
            animation_duration_ms: raw
                .animation_duration_ms
                .unwrap_or(defaults.animation_duration_ms),
            animation_delay_ms: raw
                .animation_delay_ms
                .unwrap_or(defaults.animation_delay_ms),
            tick_count: raw
                .tick_count
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(defaults.tick_count),
        }
        .sanitized()
    }
}
