// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSV rows of the settlement inventory.
//!
//! Numeric columns are read as text and parsed leniently, so a malformed cell drops one record
//! instead of failing the whole file.

use std::io;

use ghgviz_transforms::{RawValue, SeriesRecord};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// One emission source of one settlement.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct EmissionRow {
    pub(crate) vlcode: String,
    pub(crate) village_name: String,
    pub(crate) sector: String,
    pub(crate) activity: String,
    pub(crate) annual_co2_kg: Option<String>,
}

impl SeriesRecord for EmissionRow {
    fn key(&self) -> &str {
        &self.activity
    }

    fn category(&self) -> &str {
        &self.sector
    }

    fn value(&self) -> RawValue<'_> {
        self.annual_co2_kg.as_deref().into()
    }
}

/// One projection year of one settlement.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ScenarioRow {
    pub(crate) vlcode: String,
    pub(crate) year: String,
    pub(crate) business_as_usual: Option<String>,
    pub(crate) line_of_sight: Option<String>,
    pub(crate) accelerated: Option<String>,
}

/// The projection pathways, in legend order.
pub(crate) const PATHWAYS: [Pathway; 3] = [
    Pathway::BusinessAsUsual,
    Pathway::LineOfSight,
    Pathway::Accelerated,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pathway {
    BusinessAsUsual,
    LineOfSight,
    Accelerated,
}

impl Pathway {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::BusinessAsUsual => "Business as usual",
            Self::LineOfSight => "Line of sight",
            Self::Accelerated => "Accelerated",
        }
    }
}

impl ScenarioRow {
    /// Projected emissions for `pathway`; unreadable cells count as `0`.
    pub(crate) fn value(&self, pathway: Pathway) -> f64 {
        let cell = match pathway {
            Pathway::BusinessAsUsual => &self.business_as_usual,
            Pathway::LineOfSight => &self.line_of_sight,
            Pathway::Accelerated => &self.accelerated,
        };
        let v = RawValue::from(cell.as_deref()).parse();
        if v.is_finite() { v } else { 0.0 }
    }
}

/// One carbon sink of one settlement.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct SequestrationRow {
    pub(crate) vlcode: String,
    pub(crate) source: String,
    pub(crate) annual_co2_kg: Option<String>,
}

impl SeriesRecord for SequestrationRow {
    fn key(&self) -> &str {
        &self.source
    }

    fn category(&self) -> &str {
        "Sequestration"
    }

    fn value(&self) -> RawValue<'_> {
        self.annual_co2_kg.as_deref().into()
    }
}

/// Reads every row of a headed CSV stream.
pub(crate) fn read_rows<T: DeserializeOwned>(reader: impl io::Read) -> Result<Vec<T>, csv::Error> {
    let mut reader = csv::Reader::from_reader(reader);
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    log::debug!("read {} rows", rows.len());
    Ok(rows)
}

/// Rows belonging to settlement `site`.
pub(crate) fn for_site<'a, T>(
    rows: &'a [T],
    site: &'a str,
    code: impl Fn(&T) -> &str + 'a,
) -> impl Iterator<Item = &'a T> + 'a {
    rows.iter().filter(move |r| code(r) == site)
}

#[cfg(test)]
mod tests {
    use ghgviz_transforms::aggregate;

    use super::*;

    const EMISSIONS: &str = "\
vlcode,village_name,sector,activity,annual_co2_kg
VL9,Test,Residential,LPG,100
VL9,Test,Residential,LPG,50.5
VL9,Test,Transport,Diesel,n/a
VL9,Test,Transport,Petrol,
VL8,Other,Transport,Diesel,10
";

    #[test]
    fn malformed_cells_drop_single_records() {
        let rows: Vec<EmissionRow> = read_rows(EMISSIONS.as_bytes()).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[3].annual_co2_kg, None, "empty cells are missing");

        let series = aggregate(for_site(&rows, "VL9", |r| &r.vlcode));
        assert_eq!(series.len(), 1);
        assert_eq!(series.items()[0].key, "LPG");
        assert_eq!(series.total(), 150.5);
    }

    #[test]
    fn scenario_cells_default_to_zero() {
        let csv = "vlcode,year,business_as_usual,line_of_sight,accelerated\nVL9,2030,12,x,\n";
        let rows: Vec<ScenarioRow> = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].value(Pathway::BusinessAsUsual), 12.0);
        assert_eq!(rows[0].value(Pathway::LineOfSight), 0.0);
        assert_eq!(rows[0].value(Pathway::Accelerated), 0.0);
    }

    #[test]
    fn embedded_samples_parse() {
        let rows: Vec<EmissionRow> =
            read_rows(include_str!("../data/emissions.csv").as_bytes()).unwrap();
        assert!(rows.iter().any(|r| r.vlcode == "VL001"));
        let rows: Vec<SequestrationRow> =
            read_rows(include_str!("../data/sequestration.csv").as_bytes()).unwrap();
        assert!(!rows.is_empty());
    }
}
