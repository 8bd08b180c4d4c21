// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The settlement dashboard: activity ring, activity vs sector bars, sector shares, projection
//! lines and a sequestration coverage ring.

use ghgviz_charts::{
    ArcLayoutSpec, BarChartSpec, BarGroup, LineChartSpec, LineSeries, SHORT_LABEL_CHARS, Scale,
    ShareStrip, UnitScale, coverage_percent, format_percent, polar_to_cartesian,
    progress_arc_path, short_label,
};
use ghgviz_core::{
    AggregatedSeries, Emphasis, EngineConfig, InteractionState, Palette, PaletteError,
    SeriesItem, SortMode, reveal_count, reveal_value,
};
use ghgviz_transforms::{
    AggregateOp, CategoryRollup, aggregate, parse_leading_f64, sort_series, sorted,
    top_n_with_remainder,
};
use kurbo::{Point, Rect};
use peniko::Color;

use crate::records::{EmissionRow, PATHWAYS, ScenarioRow, SequestrationRow, for_site};
use crate::svg::{Anchor, SvgDocument};

pub(crate) const WIDTH: f64 = 960.0;
pub(crate) const HEIGHT: f64 = 660.0;

const OTHER_LABEL: &str = "Other";
const ACTIVITY_TOKEN: &str = "activity";
const AVERAGE_TOKEN: &str = "sector average";
const SEQUESTRATION_TOKEN: &str = "sequestration";
const DIM_ALPHA: f32 = 0.3;

const BACKGROUND: Color = Color::from_rgb8(0x0f, 0x17, 0x24);
const TEXT: Color = Color::from_rgb8(0xe6, 0xed, 0xf3);
const MUTED: Color = Color::from_rgb8(0x8b, 0x9a, 0xb0);
const GRID: Color = Color::from_rgb8(0x2a, 0x35, 0x45);

const DONUT_CENTER: Point = Point::new(180.0, 200.0);
const RING_CENTER: Point = Point::new(180.0, 560.0);
const BAR_PLOT: Rect = Rect::new(430.0, 80.0, 930.0, 280.0);
const STRIP_BOUNDS: Rect = Rect::new(430.0, 340.0, 930.0, 358.0);
const LINE_PLOT: Rect = Rect::new(430.0, 430.0, 930.0, 600.0);

/// Colors of the sectors, the bar series and the projection pathways.
pub(crate) fn palette() -> Result<Palette, PaletteError> {
    Palette::from_css(
        MUTED,
        [
            ("Residential", "#ff7b4d"),
            ("Energy", "#ffd24d"),
            ("Transport", "#4d9fff"),
            ("Agriculture", "#00e676"),
            ("Waste", "#b084ff"),
            ("Livestock", "#ff6eb4"),
            (ACTIVITY_TOKEN, "#4d9fff"),
            (AVERAGE_TOKEN, "#ff6b6b"),
            (SEQUESTRATION_TOKEN, "#00e676"),
            ("Business as usual", "#ff4d4d"),
            ("Line of sight", "#ffb84d"),
            ("Accelerated", "#00e676"),
        ],
    )
}

/// Everything the dashboard shows for one settlement.
#[derive(Debug)]
pub(crate) struct SiteView {
    pub(crate) site: String,
    pub(crate) village: String,
    /// Activities by emissions, the cut tail folded into one remainder item.
    pub(crate) activities: AggregatedSeries,
    /// Sector totals, largest first.
    pub(crate) sectors: AggregatedSeries,
    sector_stats: CategoryRollup,
    activity_count: usize,
    emissions_total: f64,
    sequestration_total: f64,
    years: Vec<String>,
    pathways: Vec<LineSeries>,
}

impl SiteView {
    /// Builds the view of `site`, or `None` if it has no emission rows.
    pub(crate) fn build(
        site: &str,
        emissions: &[EmissionRow],
        scenario: &[ScenarioRow],
        sinks: &[SequestrationRow],
        config: &EngineConfig,
    ) -> Option<Self> {
        let rows: Vec<&EmissionRow> = for_site(emissions, site, |r| &r.vlcode).collect();
        let village = rows.first()?.village_name.clone();

        let mut all = aggregate(rows.iter().copied());
        sort_series(&mut all, config.sort_mode);
        let activity_count = all.len();
        let emissions_total = all.total();
        let activities = top_n_with_remainder(all, config.top_n, OTHER_LABEL);

        let sector_stats = CategoryRollup::compute(rows.iter().copied());
        let sectors = sorted(&sector_stats.to_series(AggregateOp::Sum), SortMode::ByValue);

        let sequestration_total = aggregate(for_site(sinks, site, |r| &r.vlcode)).total();

        let mut projection: Vec<&ScenarioRow> = for_site(scenario, site, |r| &r.vlcode).collect();
        projection.sort_by(|a, b| year_of(a).total_cmp(&year_of(b)));
        let years = projection.iter().map(|r| r.year.clone()).collect();
        let pathways = PATHWAYS
            .iter()
            .map(|&p| LineSeries::new(p.label(), projection.iter().map(|r| r.value(p))))
            .collect();

        log::info!(
            "{site} ({village}): {activity_count} activities, {} sectors, {} projection years",
            sectors.len(),
            projection.len()
        );
        Some(Self {
            site: site.into(),
            village,
            activities,
            sectors,
            sector_stats,
            activity_count,
            emissions_total,
            sequestration_total,
            years,
            pathways,
        })
    }

    /// Sequestration as a percentage of emissions, unclamped.
    pub(crate) fn coverage(&self) -> f64 {
        coverage_percent(self.sequestration_total, self.emissions_total)
    }
}

fn year_of(row: &ScenarioRow) -> f64 {
    parse_leading_f64(&row.year).unwrap_or(f64::INFINITY)
}

/// A site view together with its presentation settings.
#[derive(Debug)]
pub(crate) struct Dashboard {
    pub(crate) view: SiteView,
    palette: Palette,
    config: EngineConfig,
}

impl Dashboard {
    pub(crate) fn new(view: SiteView, palette: Palette, config: EngineConfig) -> Self {
        Self {
            view,
            palette,
            config: config.sanitized(),
        }
    }

    fn donut(&self) -> ArcLayoutSpec {
        ArcLayoutSpec::new(DONUT_CENTER, 120.0, 78.0)
    }

    /// Point in the middle of the ring segment of `key`, if it is visible.
    pub(crate) fn segment_center(&self, interaction: &InteractionState, key: &str) -> Option<Point> {
        let visible = interaction.visible_series(&self.view.activities);
        let spec = self.donut();
        let radius = (spec.inner_radius + spec.outer_radius) * 0.5;
        spec.layout(&visible)
            .iter()
            .find(|s| s.key == key)
            .map(|s| polar_to_cartesian(spec.center, radius, s.mid_deg()))
    }

    /// The activity under `point`, hit-testing the ring first and then the bars.
    pub(crate) fn item_at(&self, interaction: &InteractionState, point: Point) -> Option<SeriesItem> {
        let visible = interaction.visible_series(&self.view.activities);
        let spec = self.donut();
        let segments = spec.layout(&visible);
        if let Some(seg) = spec.segment_at(&segments, point) {
            return visible.items().get(seg.index).cloned();
        }
        let groups = self.bar_groups(&visible);
        let layout = self.bar_spec().layout(&groups, 1.0);
        let key = layout.bar_at(point)?.key;
        visible.get(key).cloned()
    }

    fn bar_spec(&self) -> BarChartSpec {
        BarChartSpec::new(BAR_PLOT).with_tick_count(self.config.tick_count)
    }

    fn bar_groups<'a>(&self, visible: &'a AggregatedSeries) -> Vec<BarGroup<'a>> {
        visible
            .items()
            .iter()
            .map(|item| {
                let mean = self
                    .view
                    .sector_stats
                    .value(&item.category, AggregateOp::Mean)
                    .unwrap_or(0.0);
                BarGroup::new(&item.key, [item.value, mean])
            })
            .collect()
    }

    /// Renders one frame at reveal progress `eased`.
    pub(crate) fn render(&self, interaction: &InteractionState, eased: f64) -> SvgDocument {
        let mut doc =
            SvgDocument::new(Rect::new(0.0, 0.0, WIDTH, HEIGHT)).with_background(BACKGROUND);
        let visible = interaction.visible_series(&self.view.activities);

        self.header(&mut doc, eased);
        self.ring(&mut doc, interaction, &visible, eased);
        self.legend(&mut doc, interaction);
        self.bars(&mut doc, interaction, &visible, eased);
        self.strip(&mut doc, eased);
        self.lines(&mut doc, eased);
        self.coverage(&mut doc, eased);
        self.tooltip(&mut doc, interaction);
        doc
    }

    fn header(&self, doc: &mut SvgDocument, eased: f64) {
        let v = &self.view;
        doc.text(
            Point::new(24.0, 36.0),
            20.0,
            Anchor::Start,
            TEXT,
            &format!("{} ({})", v.village, v.site),
        );
        let total = UnitScale::TONNES.format(reveal_value(v.emissions_total, eased));
        let count = reveal_count(v.activity_count as u64, eased);
        doc.text(
            Point::new(WIDTH - 24.0, 36.0),
            14.0,
            Anchor::End,
            MUTED,
            &format!("{total} CO2e per year from {count} activities"),
        );
    }

    fn ring(
        &self,
        doc: &mut SvgDocument,
        interaction: &InteractionState,
        visible: &AggregatedSeries,
        eased: f64,
    ) {
        let spec = self.donut();
        let segments = spec.layout(visible);
        for seg in spec.reveal(&segments, eased) {
            let Some(path) = seg.path(spec.center) else {
                continue;
            };
            let d = path.to_svg_d();
            let fill = seg.fill(&self.palette);
            match interaction.emphasis(&visible.items()[seg.index]) {
                Emphasis::Normal => doc.fill_path(&d, fill),
                Emphasis::Highlighted => doc.outlined_path(&d, fill, TEXT, 2.0),
                Emphasis::Dimmed => doc.fill_path(&d, fill.multiply_alpha(DIM_ALPHA)),
            }
        }

        if !visible.has_data() {
            doc.text(spec.center, 14.0, Anchor::Middle, MUTED, "No data");
            return;
        }
        let (caption, value) = match interaction.tooltip(&self.view.activities) {
            Some(tip) => (
                short_label(tip.label, SHORT_LABEL_CHARS).into_owned(),
                tip.absolute_value,
            ),
            None => (
                interaction.active_category().unwrap_or("Total").to_owned(),
                visible.total(),
            ),
        };
        doc.text(
            spec.center + (0.0, -6.0),
            12.0,
            Anchor::Middle,
            MUTED,
            &caption,
        );
        doc.text(
            spec.center + (0.0, 16.0),
            20.0,
            Anchor::Middle,
            TEXT,
            &UnitScale::TONNES.format(reveal_value(value, eased)),
        );
    }

    fn legend(&self, doc: &mut SvgDocument, interaction: &InteractionState) {
        let active = interaction.active_category();
        for (i, sector) in self.view.sectors.items().iter().enumerate() {
            let y = 350.0 + 18.0 * i as f64;
            let mut fill = self.palette.color(&sector.color_token);
            let mut text = TEXT;
            if active.is_some_and(|a| a != sector.category) {
                fill = fill.multiply_alpha(DIM_ALPHA);
                text = MUTED;
            }
            doc.rounded_rect(Rect::new(60.0, y - 10.0, 72.0, y + 2.0), 2.0, fill);
            doc.text(Point::new(80.0, y), 12.0, Anchor::Start, text, &sector.label);
            doc.text(
                Point::new(300.0, y),
                12.0,
                Anchor::End,
                MUTED,
                &UnitScale::TONNES.format(sector.value),
            );
        }
    }

    fn bars(
        &self,
        doc: &mut SvgDocument,
        interaction: &InteractionState,
        visible: &AggregatedSeries,
        eased: f64,
    ) {
        let groups = self.bar_groups(visible);
        let layout = self.bar_spec().layout(&groups, eased);
        axis(doc, &layout.scale, BAR_PLOT);

        for bar in &layout.bars {
            let token = if bar.series == 0 {
                ACTIVITY_TOKEN
            } else {
                AVERAGE_TOKEN
            };
            let mut fill = self.palette.color(token);
            if visible
                .get(bar.key)
                .is_some_and(|item| interaction.emphasis(item) == Emphasis::Dimmed)
            {
                fill = fill.multiply_alpha(DIM_ALPHA);
            }
            doc.rounded_rect(bar.rect, 2.0, fill);
        }
        let half_band = layout.bands.band_width() * 0.5;
        for (i, group) in groups.iter().enumerate() {
            doc.text(
                Point::new(layout.bands.x(i) + half_band, BAR_PLOT.y1 + 16.0),
                11.0,
                Anchor::Middle,
                MUTED,
                &short_label(group.key, SHORT_LABEL_CHARS),
            );
        }
        for (i, (token, label)) in [(ACTIVITY_TOKEN, "Activity"), (AVERAGE_TOKEN, "Sector average")]
            .into_iter()
            .enumerate()
        {
            let x = BAR_PLOT.x0 + 120.0 * i as f64;
            let y = BAR_PLOT.y0 - 20.0;
            doc.rounded_rect(
                Rect::new(x, y - 9.0, x + 10.0, y + 1.0),
                2.0,
                self.palette.color(token),
            );
            doc.text(Point::new(x + 16.0, y), 11.0, Anchor::Start, MUTED, label);
        }
    }

    fn strip(&self, doc: &mut SvgDocument, eased: f64) {
        doc.text(
            Point::new(STRIP_BOUNDS.x0, STRIP_BOUNDS.y0 - 10.0),
            12.0,
            Anchor::Start,
            MUTED,
            "Share by sector",
        );
        for seg in ShareStrip::new(STRIP_BOUNDS).layout(&self.view.sectors, eased) {
            doc.rect(seg.rect, seg.fill(&self.palette));
            if seg.rect.width() > 36.0 {
                doc.text(
                    Point::new(seg.rect.center().x, STRIP_BOUNDS.y1 + 16.0),
                    11.0,
                    Anchor::Middle,
                    MUTED,
                    &format_percent(seg.percent, 0),
                );
            }
        }
    }

    fn lines(&self, doc: &mut SvgDocument, eased: f64) {
        let spec = LineChartSpec::new(LINE_PLOT).with_tick_count(self.config.tick_count);
        let layout = spec.layout(&self.view.pathways, eased);
        axis(doc, &layout.scale, LINE_PLOT);
        for path in &layout.paths {
            doc.stroke_path(&path.to_bez_path().to_svg(), path.stroke(&self.palette), 2.5);
        }
        for (i, year) in self.view.years.iter().enumerate() {
            doc.text(
                Point::new(layout.x.x(i), LINE_PLOT.y1 + 16.0),
                11.0,
                Anchor::Middle,
                MUTED,
                year,
            );
        }
        for (i, series) in self.view.pathways.iter().enumerate() {
            let x = LINE_PLOT.x0 + 140.0 * i as f64;
            let y = LINE_PLOT.y0 - 20.0;
            let color = self.palette.color(&series.color_token);
            doc.line(Point::new(x, y - 4.0), Point::new(x + 14.0, y - 4.0), color, 2.5);
            doc.text(Point::new(x + 20.0, y), 11.0, Anchor::Start, MUTED, &series.key);
        }
    }

    fn coverage(&self, doc: &mut SvgDocument, eased: f64) {
        let pct = reveal_value(self.view.coverage(), eased);
        let ring = progress_arc_path(RING_CENTER, 56.0, 12.0, pct);
        doc.stroke_path(&ring.track_path().to_svg_d(), GRID, ring.stroke_width);
        if let Some(path) = &ring.path {
            doc.stroke_path(
                &path.to_svg_d(),
                self.palette.color(SEQUESTRATION_TOKEN),
                ring.stroke_width,
            );
        }
        doc.text(
            RING_CENTER + (0.0, 6.0),
            18.0,
            Anchor::Middle,
            TEXT,
            &format_percent(pct, 1),
        );
        doc.text(
            RING_CENTER + (0.0, 84.0),
            12.0,
            Anchor::Middle,
            MUTED,
            &format!(
                "{} sequestered",
                UnitScale::TONNES.format(reveal_value(self.view.sequestration_total, eased))
            ),
        );
    }

    fn tooltip(&self, doc: &mut SvgDocument, interaction: &InteractionState) {
        let Some(tip) = interaction.tooltip(&self.view.activities) else {
            return;
        };
        let Some(at) = tip.anchor else {
            return;
        };
        let detail = format!(
            "{} | {}",
            UnitScale::TONNES.format(tip.absolute_value),
            format_percent(tip.percent_of_total, 1)
        );
        let chars = tip.label.chars().count().max(detail.chars().count());
        let width = 16.0 + 6.5 * chars as f64;
        doc.rounded_rect(
            Rect::new(at.x, at.y, at.x + width, at.y + 38.0),
            4.0,
            Color::from_rgba8(0x1b, 0x26, 0x36, 0xf0),
        );
        doc.text(at + (8.0, 15.0), 12.0, Anchor::Start, TEXT, tip.label);
        doc.text(at + (8.0, 31.0), 11.0, Anchor::Start, MUTED, &detail);
    }
}

fn axis(doc: &mut SvgDocument, scale: &Scale, plot: Rect) {
    for (value, y) in scale.ticks() {
        doc.line(Point::new(plot.x0, y), Point::new(plot.x1, y), GRID, 1.0);
        doc.text(
            Point::new(plot.x0 - 6.0, y + 4.0),
            10.0,
            Anchor::End,
            MUTED,
            &UnitScale::TONNES.format(value),
        );
    }
}

#[cfg(test)]
mod tests {
    use ghgviz_core::{InteractionEvent, TopN};

    use super::*;
    use crate::records::read_rows;

    fn dashboard(config: EngineConfig) -> Dashboard {
        let emissions: Vec<EmissionRow> =
            read_rows(include_str!("../data/emissions.csv").as_bytes()).unwrap();
        let scenario: Vec<ScenarioRow> =
            read_rows(include_str!("../data/scenario.csv").as_bytes()).unwrap();
        let sinks: Vec<SequestrationRow> =
            read_rows(include_str!("../data/sequestration.csv").as_bytes()).unwrap();
        let view = SiteView::build("VL001", &emissions, &scenario, &sinks, &config).unwrap();
        Dashboard::new(view, palette().unwrap(), config)
    }

    fn top(n: i64) -> EngineConfig {
        EngineConfig::default().with_top_n(TopN::from_count(n))
    }

    #[test]
    fn remainder_keeps_the_site_total() {
        let d = dashboard(top(6));
        let acts = &d.view.activities;
        assert_eq!(acts.len(), 7);
        assert_eq!(acts.items()[0].key, "Firewood");
        assert_eq!(acts.items()[0].value, 53_310.0, "repeated activities are summed");
        assert_eq!(acts.items()[6].key, OTHER_LABEL);
        assert!((acts.total() - d.view.emissions_total).abs() < 1e-6);
        assert_eq!(d.view.activity_count, 11, "landfill has no reported value");
    }

    #[test]
    fn sectors_are_sorted_by_total() {
        let d = dashboard(EngineConfig::default());
        let sectors = &d.view.sectors;
        assert_eq!(sectors.items()[0].key, "Residential");
        assert!(
            sectors
                .items()
                .windows(2)
                .all(|w| w[0].value >= w[1].value),
            "descending"
        );
    }

    #[test]
    fn unknown_sites_have_no_view() {
        let config = EngineConfig::default();
        assert!(SiteView::build("VL404", &[], &[], &[], &config).is_none());
    }

    #[test]
    fn coverage_is_a_share_of_emissions() {
        let d = dashboard(EngineConfig::default());
        let expected = 55_860.0 / d.view.emissions_total * 100.0;
        assert!((d.view.coverage() - expected).abs() < 1e-9);
    }

    #[test]
    fn hovering_a_segment_shows_its_tooltip() {
        let d = dashboard(top(6));
        let mut state = InteractionState::new();
        let at = d.segment_center(&state, "Diesel").unwrap();
        let item = d.item_at(&state, at).unwrap();
        assert_eq!(item.key, "Diesel");
        state.apply(InteractionEvent::PointerEnter { item: &item, at });

        let svg = d.render(&state, 1.0).to_svg_string();
        assert!(svg.contains("21.4t | "), "tooltip detail is rendered");
    }

    #[test]
    fn category_filter_narrows_the_ring() {
        let d = dashboard(top(6));
        let mut state = InteractionState::new();
        state.toggle_category("Transport");
        assert!(d.segment_center(&state, "Firewood").is_none());
        assert!(d.segment_center(&state, "Diesel").is_some());
    }

    #[test]
    fn first_frame_draws_no_ring() {
        let d = dashboard(top(6));
        let state = InteractionState::new();
        let start = d.render(&state, 0.0).to_svg_string();
        let end = d.render(&state, 1.0).to_svg_string();
        assert!(start.contains("0.0t CO2e"), "counters start at zero");
        assert!(end.len() > start.len());
    }
}
