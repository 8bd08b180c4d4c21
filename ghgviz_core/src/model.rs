// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Aggregated series model.
//!
//! A series is recomputed from raw records on every render pass. Nothing here is persisted and
//! nothing here is mutated once handed to the geometry layer.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// One aggregated, labeled value of a chart series.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesItem {
    /// Identity of the item, unique within one chart.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Category used for filtering, grouping and `ByCategory` ordering.
    pub category: String,
    /// Aggregated value. Always finite and `>= 0`.
    pub value: f64,
    /// Palette token used to pick the fill color.
    pub color_token: String,
}

impl SeriesItem {
    /// Creates an item whose label is its key and whose color token is its category.
    pub fn new(key: impl Into<String>, category: impl Into<String>, value: f64) -> Self {
        let key = key.into();
        let category = category.into();
        Self {
            label: key.clone(),
            color_token: category.clone(),
            key,
            category,
            value: sanitize_value(value),
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the palette token.
    pub fn with_color_token(mut self, token: impl Into<String>) -> Self {
        self.color_token = token.into();
        self
    }
}

/// An ordered series plus its total.
///
/// `total` is always `Σ items[i].value`. A series with `total <= 0` is the "no data" state:
/// views must render a placeholder instead of a chart, since every share would be undefined.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregatedSeries {
    items: Vec<SeriesItem>,
    total: f64,
}

impl AggregatedSeries {
    /// Creates a series from items, computing the total.
    pub fn new(items: Vec<SeriesItem>) -> Self {
        let total = items.iter().map(|i| i.value).sum();
        Self { items, total }
    }

    /// Returns the empty "no data" series.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Items in their current order.
    pub fn items(&self) -> &[SeriesItem] {
        &self.items
    }

    /// Mutable access for reordering.
    ///
    /// Reordering never changes the total; callers must not change values through this.
    pub fn items_mut(&mut self) -> &mut [SeriesItem] {
        &mut self.items
    }

    /// Consumes the series and returns its items.
    pub fn into_items(self) -> Vec<SeriesItem> {
        self.items
    }

    /// Sum of all item values.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if the series can be rendered as shares of a positive total.
    pub fn has_data(&self) -> bool {
        !self.items.is_empty() && self.total > 0.0 && self.total.is_finite()
    }

    /// Looks up an item by key.
    pub fn get(&self, key: &str) -> Option<&SeriesItem> {
        self.items.iter().find(|i| i.key == key)
    }

    /// Share of `value` in the total, in percent. `None` in the "no data" state.
    pub fn percent_of_total(&self, value: f64) -> Option<f64> {
        self.has_data().then(|| value / self.total * 100.0)
    }

    /// Largest item value, or `0` for an empty series.
    pub fn max_value(&self) -> f64 {
        self.items.iter().map(|i| i.value).fold(0.0, f64::max)
    }

    /// Returns the items of one category, with the total recomputed over them.
    ///
    /// `None` returns an unfiltered copy.
    pub fn filter_category(&self, category: Option<&str>) -> Self {
        match category {
            None => self.clone(),
            Some(c) => Self::new(
                self.items
                    .iter()
                    .filter(|i| i.category == c)
                    .cloned()
                    .collect(),
            ),
        }
    }

    /// Keeps the first `n` items, recomputing the total.
    pub fn truncate(&mut self, n: usize) {
        self.items.truncate(n);
        self.total = self.items.iter().map(|i| i.value).sum();
    }

    /// Appends an item, updating the total.
    pub fn push(&mut self, item: SeriesItem) {
        self.total += item.value;
        self.items.push(item);
    }
}

impl FromIterator<SeriesItem> for AggregatedSeries {
    fn from_iter<T: IntoIterator<Item = SeriesItem>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn sanitize_value(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn sample() -> AggregatedSeries {
        AggregatedSeries::new(vec![
            SeriesItem::new("LPG", "Residential", 30.0),
            SeriesItem::new("Diesel", "Transport", 10.0),
            SeriesItem::new("Firewood", "Residential", 60.0),
        ])
    }

    #[test]
    fn total_is_sum_of_values() {
        let s = sample();
        assert_eq!(s.total(), 100.0);
        assert!(s.has_data());
        assert_eq!(s.percent_of_total(30.0), Some(30.0));
    }

    #[test]
    fn empty_series_is_no_data() {
        let s = AggregatedSeries::empty();
        assert!(!s.has_data());
        assert_eq!(s.percent_of_total(1.0), None, "no NaN percentages for empty input");
        assert_eq!(s.max_value(), 0.0);
    }

    #[test]
    fn filter_category_recomputes_total() {
        let s = sample().filter_category(Some("Residential"));
        assert_eq!(s.len(), 2);
        assert_eq!(s.total(), 90.0);
        assert!(s.get("Diesel").is_none());

        let none = sample().filter_category(Some("Waste"));
        assert!(!none.has_data(), "a filter with no matches is the no-data state");
    }

    #[test]
    fn negative_and_nan_values_are_clamped_to_zero() {
        assert_eq!(SeriesItem::new("a", "b", -4.0).value, 0.0);
        assert_eq!(SeriesItem::new("a", "b", f64::NAN).value, 0.0);
    }

    #[test]
    fn truncate_keeps_total_consistent() {
        let mut s = sample();
        s.truncate(2);
        assert_eq!(s.total(), 40.0);
    }
}
