// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The full-recompute pipeline run on every render pass.

use ghgviz_core::{AggregatedSeries, EngineConfig};

use crate::aggregate::{SeriesRecord, aggregate};
use crate::sort::{sort_series, top_n};

/// Aggregates, sorts and truncates `records` according to `config`.
pub fn prepare<'r, R: SeriesRecord + 'r>(
    records: impl IntoIterator<Item = &'r R>,
    config: &EngineConfig,
) -> AggregatedSeries {
    prepare_series(aggregate(records), config)
}

/// Sorts and truncates an already aggregated series.
pub fn prepare_series(mut series: AggregatedSeries, config: &EngineConfig) -> AggregatedSeries {
    sort_series(&mut series, config.sort_mode);
    top_n(series, config.top_n)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use ghgviz_core::{SortMode, TopN};

    use super::*;
    use crate::record::RawValue;

    struct Reading(&'static str, &'static str, f64);

    impl SeriesRecord for Reading {
        fn key(&self) -> &str {
            self.0
        }
        fn category(&self) -> &str {
            self.1
        }
        fn value(&self) -> RawValue<'_> {
            RawValue::Number(self.2)
        }
    }

    #[test]
    fn aggregate_sort_truncate() {
        let rows = [
            Reading("Firewood", "Residential", 12.0),
            Reading("Diesel", "Transport", 40.0),
            Reading("LPG", "Residential", 8.0),
            Reading("Firewood", "Residential", 30.0),
            Reading("Petrol", "Transport", -1.0),
        ];
        let config = EngineConfig::default().with_top_n(TopN::from_count(2));
        let s = prepare(&rows, &config);
        let keys: std::vec::Vec<_> = s.items().iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["Firewood", "Diesel"]);
        assert_eq!(s.total(), 82.0);

        let config = EngineConfig::default().with_sort_mode(SortMode::Alphabetic);
        let s = prepare(&rows, &config);
        assert_eq!(s.items()[0].key, "Diesel");
        assert_eq!(s.len(), 3);
    }
}
