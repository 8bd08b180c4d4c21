// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouping raw records into a series.

use alloc::string::String;
use alloc::vec::Vec;

use ghgviz_core::{AggregatedSeries, SeriesItem};
use hashbrown::HashMap;

use crate::record::RawValue;

/// A raw source row that can be aggregated.
///
/// Only `key`, `category` and `value` are required. Label and color token default to the key
/// and category respectively.
pub trait SeriesRecord {
    /// Grouping key.
    fn key(&self) -> &str;

    /// Display label of the group. Taken from the first record of each group.
    fn label(&self) -> &str {
        self.key()
    }

    /// Category of the group. Taken from the first record of each group.
    fn category(&self) -> &str;

    /// Reported value.
    fn value(&self) -> RawValue<'_>;

    /// Palette token of the group. Taken from the first record of each group.
    fn color_token(&self) -> &str {
        self.category()
    }
}

struct Row<'r> {
    key: &'r str,
    label: &'r str,
    category: &'r str,
    color_token: &'r str,
    value: RawValue<'r>,
}

/// Aggregates records by [`SeriesRecord::key`].
///
/// Groups appear in the order their key was first seen. Values that are not reported
/// (non-finite or `<= 0` after parsing) are dropped; a group with no reported value at all does
/// not appear.
pub fn aggregate<'r, R: SeriesRecord + 'r>(
    records: impl IntoIterator<Item = &'r R>,
) -> AggregatedSeries {
    aggregate_rows(records, |r| Row {
        key: r.key(),
        label: r.label(),
        category: r.category(),
        color_token: r.color_token(),
        value: r.value(),
    })
}

/// Aggregates arbitrary records with explicit field accessors.
///
/// Labels default to the key and color tokens to the category.
pub fn aggregate_by<'r, R: 'r>(
    records: impl IntoIterator<Item = &'r R>,
    key: impl Fn(&R) -> &str,
    value: impl Fn(&R) -> RawValue<'_>,
    category: impl Fn(&R) -> &str,
) -> AggregatedSeries {
    aggregate_rows(records, |r| Row {
        key: key(r),
        label: key(r),
        category: category(r),
        color_token: category(r),
        value: value(r),
    })
}

fn aggregate_rows<'r, R: 'r>(
    records: impl IntoIterator<Item = &'r R>,
    row: impl Fn(&'r R) -> Row<'r>,
) -> AggregatedSeries {
    let mut index: HashMap<&'r str, usize> = HashMap::new();
    let mut items: Vec<SeriesItem> = Vec::new();
    let mut seen = 0_usize;
    let mut dropped = 0_usize;

    for record in records {
        seen += 1;
        let fields = row(record);
        let Some(value) = fields.value.reported() else {
            dropped += 1;
            continue;
        };
        match index.get(fields.key) {
            Some(&i) => items[i].value += value,
            None => {
                index.insert(fields.key, items.len());
                items.push(
                    SeriesItem::new(fields.key, fields.category, value)
                        .with_label(fields.label)
                        .with_color_token(fields.color_token),
                );
            }
        }
    }

    if dropped > 0 {
        log::debug!("dropped {dropped} of {seen} records without a reported value");
    }
    log::trace!("aggregated {seen} records into {} items", items.len());
    AggregatedSeries::new(items)
}

/// Per-category reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateOp {
    /// Number of reported values.
    Count,
    /// Sum of reported values.
    Sum,
    /// Smallest reported value.
    Min,
    /// Largest reported value.
    Max,
    /// Mean of reported values.
    Mean,
}

/// Running statistics of one category.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryStats {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl CategoryStats {
    fn new(value: f64) -> Self {
        Self {
            count: 1,
            sum: value,
            min: value,
            max: value,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Applies `op`.
    pub fn get(&self, op: AggregateOp) -> f64 {
        match op {
            AggregateOp::Count => self.count as f64,
            AggregateOp::Sum => self.sum,
            AggregateOp::Min => self.min,
            AggregateOp::Max => self.max,
            AggregateOp::Mean => self.sum / self.count as f64,
        }
    }

    /// Number of reported values.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Reported values rolled up per category, in first-seen order.
///
/// Used for category summaries such as a share strip or a legend with totals.
#[derive(Clone, Debug, Default)]
pub struct CategoryRollup {
    order: Vec<String>,
    stats: HashMap<String, CategoryStats>,
}

impl CategoryRollup {
    /// Rolls up records by [`SeriesRecord::category`].
    pub fn compute<'r, R: SeriesRecord + 'r>(records: impl IntoIterator<Item = &'r R>) -> Self {
        Self::compute_by(records, R::category, R::value)
    }

    /// Rolls up records with explicit accessors.
    pub fn compute_by<'r, R: 'r>(
        records: impl IntoIterator<Item = &'r R>,
        category: impl Fn(&R) -> &str,
        value: impl Fn(&R) -> RawValue<'_>,
    ) -> Self {
        let mut rollup = Self::default();
        for record in records {
            let Some(v) = value(record).reported() else {
                continue;
            };
            let c = category(record);
            match rollup.stats.get_mut(c) {
                Some(stats) => stats.add(v),
                None => {
                    rollup.order.push(c.into());
                    rollup.stats.insert(c.into(), CategoryStats::new(v));
                }
            }
        }
        rollup
    }

    /// Categories in first-seen order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of categories with at least one reported value.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no category has a reported value.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Statistics for one category.
    pub fn stats(&self, category: &str) -> Option<&CategoryStats> {
        self.stats.get(category)
    }

    /// `op` applied to one category.
    pub fn value(&self, category: &str, op: AggregateOp) -> Option<f64> {
        self.stats(category).map(|s| s.get(op))
    }

    /// One item per category, keyed and colored by the category name.
    pub fn to_series(&self, op: AggregateOp) -> AggregatedSeries {
        self.order
            .iter()
            .filter_map(|c| {
                let v = self.stats.get(c)?.get(op);
                Some(SeriesItem::new(c.as_str(), c.as_str(), v))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    struct Entry {
        fuel: &'static str,
        sector: &'static str,
        amount: &'static str,
    }

    impl SeriesRecord for Entry {
        fn key(&self) -> &str {
            self.fuel
        }
        fn category(&self) -> &str {
            self.sector
        }
        fn value(&self) -> RawValue<'_> {
            self.amount.into()
        }
    }

    const fn row(fuel: &'static str, sector: &'static str, amount: &'static str) -> Entry {
        Entry {
            fuel,
            sector,
            amount,
        }
    }

    #[test]
    fn unreported_values_are_dropped_before_grouping() {
        let rows = [
            row("A", "x", "10"),
            row("A", "x", "5"),
            row("B", "y", "-3"),
            row("B", "y", "bad"),
        ];
        let s = aggregate(&rows);
        assert_eq!(s.len(), 1);
        assert_eq!(s.items()[0].key, "A");
        assert_eq!(s.items()[0].value, 15.0);
        assert_eq!(s.total(), 15.0);
    }

    #[test]
    fn groups_keep_first_seen_order_and_metadata() {
        let rows = [
            row("Diesel", "Transport", "4"),
            row("LPG", "Residential", "2"),
            row("Diesel", "Industry", "1"),
        ];
        let s = aggregate(&rows);
        let keys: std::vec::Vec<_> = s.items().iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["Diesel", "LPG"]);
        assert_eq!(s.items()[0].category, "Transport", "first record wins");
        assert_eq!(s.items()[0].color_token, "Transport");
        assert_eq!(s.total(), 7.0);
    }

    #[test]
    fn no_records_is_the_no_data_state() {
        let rows: [Entry; 0] = [];
        let s = aggregate(&rows);
        assert!(s.is_empty());
        assert!(!s.has_data());

        let s = aggregate(&[row("A", "x", "0"), row("B", "x", "")]);
        assert!(!s.has_data());
    }

    #[test]
    fn aggregate_by_uses_accessors() {
        let data = [("a", 1.0, "k"), ("b", f64::NAN, "k"), ("a", 2.5, "k")];
        let s = aggregate_by(&data, |d| d.0, |d| RawValue::Number(d.1), |d| d.2);
        assert_eq!(s.len(), 1);
        assert_eq!(s.total(), 3.5);
    }

    #[test]
    fn rollup_reduces_per_category() {
        let rows = [
            row("Diesel", "Transport", "4"),
            row("Petrol", "Transport", "2"),
            row("LPG", "Residential", "3"),
            row("Diesel", "Transport", "n/a"),
        ];
        let r = CategoryRollup::compute(&rows);
        let cats: std::vec::Vec<_> = r.categories().collect();
        assert_eq!(cats, ["Transport", "Residential"]);
        assert_eq!(r.value("Transport", AggregateOp::Count), Some(2.0));
        assert_eq!(r.value("Transport", AggregateOp::Sum), Some(6.0));
        assert_eq!(r.value("Transport", AggregateOp::Min), Some(2.0));
        assert_eq!(r.value("Transport", AggregateOp::Max), Some(4.0));
        assert_eq!(r.value("Transport", AggregateOp::Mean), Some(3.0));
        assert_eq!(r.value("Waste", AggregateOp::Sum), None);

        let s = r.to_series(AggregateOp::Sum);
        assert_eq!(s.total(), 9.0);
        assert_eq!(s.items()[1].key, "Residential");
    }
}
