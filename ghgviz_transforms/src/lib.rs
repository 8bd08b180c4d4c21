// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record-to-series transforms.
//!
//! This crate turns raw source rows into an ordered [`AggregatedSeries`]:
//! - parse each value leniently and drop anything that is not a positive, finite number,
//! - group by key in first-seen order and sum,
//! - sort by the configured [`SortMode`], and
//! - keep the configured [`TopN`], optionally folding the rest into a remainder item.
//!
//! Everything is a full recompute. There is no incremental state between runs.
//!
//! [`AggregatedSeries`]: ghgviz_core::AggregatedSeries
//! [`SortMode`]: ghgviz_core::SortMode
//! [`TopN`]: ghgviz_core::TopN

#![no_std]

extern crate alloc;

mod aggregate;
mod pipeline;
mod record;
mod sort;

pub use aggregate::{
    AggregateOp, CategoryRollup, CategoryStats, SeriesRecord, aggregate, aggregate_by,
};
pub use pipeline::{prepare, prepare_series};
pub use record::{RawValue, parse_leading_f64, parse_reported};
pub use sort::{sort_series, sorted, top_n, top_n_with_remainder};
