// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordering and truncation of aggregated series.
//!
//! All sorts are stable: items that compare equal keep their current relative order, which for a
//! freshly aggregated series is first-seen order.

use alloc::format;
use alloc::string::String;
use core::cmp::Ordering;

use ghgviz_core::{AggregatedSeries, SeriesItem, SortMode, TopN};

/// Sorts `series` in place.
///
/// - [`SortMode::ByValue`]: value descending.
/// - [`SortMode::ByCategory`]: category ascending, then value descending.
/// - [`SortMode::Alphabetic`]: label ascending, ignoring case.
pub fn sort_series(series: &mut AggregatedSeries, mode: SortMode) {
    let items = series.items_mut();
    match mode {
        SortMode::ByValue => items.sort_by(by_value_desc),
        SortMode::ByCategory => items.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| by_value_desc(a, b))
        }),
        SortMode::Alphabetic => items.sort_by(|a, b| cmp_ignore_case(&a.label, &b.label)),
    }
}

/// Returns a sorted copy of `series`.
pub fn sorted(series: &AggregatedSeries, mode: SortMode) -> AggregatedSeries {
    let mut out = series.clone();
    sort_series(&mut out, mode);
    out
}

fn by_value_desc(a: &SeriesItem, b: &SeriesItem) -> Ordering {
    b.value.total_cmp(&a.value)
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Keeps the first `limit` items of an already ordered series.
///
/// The series is not re-sorted and the total is recomputed over the kept items.
pub fn top_n(mut series: AggregatedSeries, limit: TopN) -> AggregatedSeries {
    let n = limit.limit(series.len());
    if n < series.len() {
        log::trace!("top-n keeps {n} of {} items", series.len());
        series.truncate(n);
    }
    series
}

/// Like [`top_n`], but folds the cut items into one trailing remainder item.
///
/// The total of the result equals the total of the input. The remainder item uses `label` as
/// its label, category and color token, and as its key unless a kept item already has that key,
/// in which case the key gets a ` (2)`, ` (3)`, ... suffix. No remainder is added when nothing
/// was cut.
pub fn top_n_with_remainder(series: AggregatedSeries, limit: TopN, label: &str) -> AggregatedSeries {
    let n = limit.limit(series.len());
    if n >= series.len() {
        return series;
    }
    let mut items = series.into_items();
    let rest: f64 = items.drain(n..).map(|i| i.value).sum();
    let key = unused_key(&items, label);
    let mut out = AggregatedSeries::new(items);
    if rest > 0.0 {
        out.push(SeriesItem::new(key, label, rest).with_label(label));
    }
    out
}

fn unused_key(items: &[SeriesItem], wanted: &str) -> String {
    let taken = |k: &str| items.iter().any(|i| i.key == k);
    if !taken(wanted) {
        return wanted.into();
    }
    (2_usize..)
        .map(|i| format!("{wanted} ({i})"))
        .find(|k| !taken(k))
        .unwrap_or_else(|| wanted.into())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use core::num::NonZeroUsize;
    use std::vec::Vec;

    use super::*;

    fn keys(s: &AggregatedSeries) -> Vec<&str> {
        s.items().iter().map(|i| i.key.as_str()).collect()
    }

    fn series() -> AggregatedSeries {
        AggregatedSeries::new(vec![
            SeriesItem::new("a", "Transport", 30.0),
            SeriesItem::new("b", "Energy", 10.0),
            SeriesItem::new("c", "Transport", 50.0),
        ])
    }

    fn first(n: usize) -> TopN {
        TopN::First(NonZeroUsize::new(n).unwrap())
    }

    #[test]
    fn top_two_by_value() {
        let mut s = series();
        sort_series(&mut s, SortMode::ByValue);
        let s = top_n(s, first(2));
        let values: Vec<f64> = s.items().iter().map(|i| i.value).collect();
        assert_eq!(values, [50.0, 30.0]);
        assert_eq!(s.total(), 80.0);
    }

    #[test]
    fn by_category_then_value() {
        let s = sorted(&series(), SortMode::ByCategory);
        assert_eq!(keys(&s), ["b", "c", "a"]);
    }

    #[test]
    fn alphabetic_ignores_case() {
        let s = AggregatedSeries::new(vec![
            SeriesItem::new("2", "x", 1.0).with_label("lpg"),
            SeriesItem::new("1", "x", 1.0).with_label("Diesel"),
            SeriesItem::new("3", "x", 1.0).with_label("Electricity"),
        ]);
        let s = sorted(&s, SortMode::Alphabetic);
        assert_eq!(keys(&s), ["1", "3", "2"]);
    }

    #[test]
    fn equal_values_keep_first_seen_order() {
        let s = AggregatedSeries::new(vec![
            SeriesItem::new("x", "c", 5.0),
            SeriesItem::new("y", "c", 9.0),
            SeriesItem::new("z", "c", 5.0),
        ]);
        let s = sorted(&s, SortMode::ByValue);
        assert_eq!(keys(&s), ["y", "x", "z"]);
    }

    #[test]
    fn top_n_does_not_resort() {
        let s = top_n(series(), first(2));
        assert_eq!(keys(&s), ["a", "b"]);
        let s = top_n(series(), TopN::All);
        assert_eq!(s.len(), 3);
        let s = top_n(series(), first(10));
        assert_eq!(s.len(), 3, "a limit above the length keeps everything");
    }

    #[test]
    fn remainder_preserves_the_total() {
        let s = sorted(&series(), SortMode::ByValue);
        let s = top_n_with_remainder(s, first(1), "Other");
        assert_eq!(keys(&s), ["c", "Other"]);
        assert_eq!(s.items()[1].value, 40.0);
        assert_eq!(s.total(), 90.0);

        let s = top_n_with_remainder(series(), TopN::All, "Other");
        assert_eq!(s.len(), 3, "nothing cut, no remainder");
    }

    #[test]
    fn remainder_key_stays_unique() {
        let s = AggregatedSeries::new(vec![
            SeriesItem::new("Other", "Waste", 50.0),
            SeriesItem::new("Other (2)", "Waste", 40.0),
            SeriesItem::new("b", "Energy", 30.0),
            SeriesItem::new("c", "Energy", 20.0),
        ]);
        let s = top_n_with_remainder(s, first(2), "Other");
        assert_eq!(keys(&s), ["Other", "Other (2)", "Other (3)"]);
        assert_eq!(s.get("Other").unwrap().value, 50.0, "kept item untouched");
        let rest = s.get("Other (3)").unwrap();
        assert_eq!(rest.value, 50.0);
        assert_eq!(rest.label, "Other");
        assert_eq!(rest.color_token, "Other");
        assert_eq!(s.total(), 140.0);
    }
}
