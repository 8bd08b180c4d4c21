// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover and category-filter state for one chart instance.
//!
//! Two independent axes:
//! - hover: `Idle` or `Hovered(key)`, visual emphasis only;
//! - filter: no active category, or one active category restricting which items are shown
//!   and which items count towards totals.
//!
//! Tooltips are derived on demand and never cached, since the pointer moves continuously while
//! the hovered identity does not.

extern crate alloc;

use alloc::string::String;

use kurbo::{Point, Vec2};

use crate::model::{AggregatedSeries, SeriesItem};

/// Offset from the pointer to the tooltip anchor.
pub const TOOLTIP_OFFSET: Vec2 = Vec2::new(12.0, -42.0);

/// Hover axis of the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverState<'a> {
    /// Nothing hovered.
    Idle,
    /// The item with this key is hovered.
    Hovered(&'a str),
}

/// Visual emphasis of one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// Nothing is hovered.
    Normal,
    /// This item is hovered.
    Highlighted,
    /// Another item is hovered.
    Dimmed,
}

/// Input events, applied in arrival order.
#[derive(Clone, Copy, Debug)]
pub enum InteractionEvent<'a> {
    /// Pointer entered an item.
    PointerEnter {
        /// Item under the pointer.
        item: &'a SeriesItem,
        /// Pointer position.
        at: Point,
    },
    /// Pointer moved without changing the hovered item.
    PointerMove {
        /// Pointer position.
        at: Point,
    },
    /// Pointer left the hovered item.
    PointerLeave,
    /// A legend or category control was clicked.
    CategoryClick {
        /// Category of the control.
        category: &'a str,
    },
}

/// Tooltip payload for a hovered item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tooltip<'a> {
    /// Item label.
    pub label: &'a str,
    /// Item value in source units.
    pub absolute_value: f64,
    /// `value / total * 100`.
    pub percent_of_total: f64,
    /// Where the tooltip box is anchored, if a pointer position is known.
    pub anchor: Option<Point>,
}

/// Derives a tooltip from an item and the total it is a share of.
///
/// Returns `None` when `total` is not positive.
pub fn tooltip_for(item: &SeriesItem, total: f64) -> Option<Tooltip<'_>> {
    if !(total > 0.0 && total.is_finite()) {
        return None;
    }
    Some(Tooltip {
        label: &item.label,
        absolute_value: item.value,
        percent_of_total: item.value / total * 100.0,
        anchor: None,
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Hovered {
    key: String,
    category: String,
}

/// Interaction state owned by a single chart view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    hovered: Option<Hovered>,
    active_category: Option<String>,
    pointer: Option<Point>,
}

impl InteractionState {
    /// Creates the idle, unfiltered state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event.
    pub fn apply(&mut self, event: InteractionEvent<'_>) {
        match event {
            InteractionEvent::PointerEnter { item, at } => self.pointer_enter(item, at),
            InteractionEvent::PointerMove { at } => self.pointer_move(at),
            InteractionEvent::PointerLeave => self.pointer_leave(),
            InteractionEvent::CategoryClick { category } => self.toggle_category(category),
        }
    }

    /// `Idle → Hovered(key)`.
    pub fn pointer_enter(&mut self, item: &SeriesItem, at: Point) {
        self.hovered = Some(Hovered {
            key: item.key.clone(),
            category: item.category.clone(),
        });
        self.pointer = Some(at);
    }

    /// Updates the pointer position used for tooltip placement.
    pub fn pointer_move(&mut self, at: Point) {
        self.pointer = Some(at);
    }

    /// `Hovered(_) → Idle`.
    pub fn pointer_leave(&mut self) {
        self.hovered = None;
        self.pointer = None;
    }

    /// Toggles the category filter.
    ///
    /// Clicking the active category clears the filter. Activating a category that excludes the
    /// hovered item also clears the hover, so no tooltip can be shown for a hidden item.
    pub fn toggle_category(&mut self, category: &str) {
        if self.active_category.as_deref() == Some(category) {
            self.active_category = None;
        } else {
            self.active_category = Some(category.into());
        }
        let hidden = self
            .hovered
            .as_ref()
            .is_some_and(|h| !self.admits_category(&h.category));
        if hidden {
            log::trace!("clearing hover, filtered out by {category:?}");
            self.hovered = None;
        }
    }

    /// Clears the category filter.
    pub fn clear_category(&mut self) {
        self.active_category = None;
    }

    /// Hover axis.
    pub fn hover_state(&self) -> HoverState<'_> {
        match &self.hovered {
            Some(h) => HoverState::Hovered(&h.key),
            None => HoverState::Idle,
        }
    }

    /// Key of the hovered item.
    pub fn hovered_key(&self) -> Option<&str> {
        self.hovered.as_ref().map(|h| h.key.as_str())
    }

    /// Active category filter.
    pub fn active_category(&self) -> Option<&str> {
        self.active_category.as_deref()
    }

    /// Last known pointer position.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Whether `item` passes the category filter.
    pub fn admits(&self, item: &SeriesItem) -> bool {
        self.admits_category(&item.category)
    }

    fn admits_category(&self, category: &str) -> bool {
        self.active_category
            .as_deref()
            .is_none_or(|active| active == category)
    }

    /// Hover emphasis for `item`. Independent of the filter.
    pub fn emphasis(&self, item: &SeriesItem) -> Emphasis {
        match &self.hovered {
            None => Emphasis::Normal,
            Some(h) if h.key == item.key => Emphasis::Highlighted,
            Some(_) => Emphasis::Dimmed,
        }
    }

    /// The series restricted to admitted items, total recomputed.
    pub fn visible_series(&self, series: &AggregatedSeries) -> AggregatedSeries {
        series.filter_category(self.active_category())
    }

    /// Total over admitted items, without allocating.
    pub fn visible_total(&self, series: &AggregatedSeries) -> f64 {
        series
            .items()
            .iter()
            .filter(|i| self.admits(i))
            .map(|i| i.value)
            .sum()
    }

    /// Tooltip for the hovered item, as a share of the visible total.
    ///
    /// `None` when idle, when the hovered key is not in `series`, when the hovered item is
    /// filtered out, or when the visible total is not positive.
    pub fn tooltip<'s>(&self, series: &'s AggregatedSeries) -> Option<Tooltip<'s>> {
        let key = self.hovered_key()?;
        let item = series.get(key)?;
        if !self.admits(item) {
            return None;
        }
        let mut tip = tooltip_for(item, self.visible_total(series))?;
        tip.anchor = self.pointer.map(|p| p + TOOLTIP_OFFSET);
        Some(tip)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn series() -> AggregatedSeries {
        AggregatedSeries::new(vec![
            SeriesItem::new("LPG", "Residential", 30.0),
            SeriesItem::new("Diesel", "Transport", 10.0),
            SeriesItem::new("Firewood", "Residential", 60.0),
        ])
    }

    #[test]
    fn enter_and_leave_cycle_hover_state() {
        let s = series();
        let mut st = InteractionState::new();
        assert_eq!(st.hover_state(), HoverState::Idle);
        st.apply(InteractionEvent::PointerEnter {
            item: &s.items()[0],
            at: Point::new(5.0, 5.0),
        });
        assert_eq!(st.hover_state(), HoverState::Hovered("LPG"));
        st.apply(InteractionEvent::PointerLeave);
        assert_eq!(st.hover_state(), HoverState::Idle);
        assert_eq!(st.pointer(), None);
    }

    #[test]
    fn category_click_toggles() {
        let mut st = InteractionState::new();
        st.toggle_category("Transport");
        assert_eq!(st.active_category(), Some("Transport"));
        st.toggle_category("Residential");
        assert_eq!(st.active_category(), Some("Residential"));
        st.toggle_category("Residential");
        assert_eq!(st.active_category(), None, "second click on the same category clears");
    }

    #[test]
    fn tooltip_tracks_pointer_and_share() {
        let s = series();
        let mut st = InteractionState::new();
        st.pointer_enter(&s.items()[0], Point::new(100.0, 100.0));
        let tip = st.tooltip(&s).unwrap();
        assert_eq!(tip.label, "LPG");
        assert_eq!(tip.absolute_value, 30.0);
        assert!((tip.percent_of_total - 30.0).abs() < 1e-9);
        assert_eq!(tip.anchor, Some(Point::new(112.0, 58.0)));

        st.pointer_move(Point::new(110.0, 100.0));
        assert_eq!(st.tooltip(&s).unwrap().anchor, Some(Point::new(122.0, 58.0)));
    }

    #[test]
    fn filtering_out_the_hovered_item_clears_hover() {
        let s = series();
        let mut st = InteractionState::new();
        st.pointer_enter(s.get("Diesel").unwrap(), Point::ZERO);
        st.toggle_category("Residential");
        assert_eq!(st.hovered_key(), None);
        assert!(st.tooltip(&s).is_none());
    }

    #[test]
    fn hovering_a_hidden_item_never_yields_a_tooltip() {
        let s = series();
        let mut st = InteractionState::new();
        st.toggle_category("Residential");
        st.pointer_enter(s.get("Diesel").unwrap(), Point::ZERO);
        assert_eq!(st.emphasis(s.get("Diesel").unwrap()), Emphasis::Highlighted);
        assert!(st.tooltip(&s).is_none());
        assert_eq!(st.visible_total(&s), 90.0, "hover never re-includes a hidden item");
    }

    #[test]
    fn percentages_use_the_filtered_total() {
        let s = series();
        let mut st = InteractionState::new();
        st.toggle_category("Residential");
        st.pointer_enter(s.get("LPG").unwrap(), Point::ZERO);
        let tip = st.tooltip(&s).unwrap();
        assert!((tip.percent_of_total - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(st.visible_series(&s).len(), 2);
    }

    #[test]
    fn emphasis_dims_other_items() {
        let s = series();
        let mut st = InteractionState::new();
        assert_eq!(st.emphasis(&s.items()[1]), Emphasis::Normal);
        st.pointer_enter(&s.items()[0], Point::ZERO);
        assert_eq!(st.emphasis(&s.items()[0]), Emphasis::Highlighted);
        assert_eq!(st.emphasis(&s.items()[1]), Emphasis::Dimmed);
    }

    #[test]
    fn tooltip_for_zero_total_is_none() {
        let item = SeriesItem::new("a", "b", 0.0);
        assert!(tooltip_for(&item, 0.0).is_none());
    }
}
