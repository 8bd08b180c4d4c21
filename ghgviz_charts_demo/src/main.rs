// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders the emissions dashboard of one settlement to SVG.
//!
//! Without input paths the bundled sample inventory is used. The reveal animation is driven on a
//! fixed-step clock; `--frames` dumps every frame and the last state is written to `--out`.

mod dashboard;
mod records;
mod svg;

use std::error::Error as _;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use ghgviz_core::{
    EngineConfig, InteractionEvent, InteractionState, PaletteError, RevealOnChange, StepScheduler,
};
use kurbo::Point;
use serde::de::DeserializeOwned;

use crate::dashboard::{Dashboard, SiteView, palette};
use crate::records::{EmissionRow, ScenarioRow, SequestrationRow, read_rows};
use crate::svg::SvgDocument;

#[derive(Debug, Parser)]
#[command(name = "ghgviz-dashboard", version, about = "Settlement emissions dashboard as SVG")]
struct Cli {
    /// Emission inventory CSV (vlcode, village_name, sector, activity, annual_co2_kg).
    #[arg(long)]
    records: Option<PathBuf>,

    /// Scenario projection CSV (vlcode, year, business_as_usual, line_of_sight, accelerated).
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Sequestration CSV (vlcode, source, annual_co2_kg).
    #[arg(long)]
    sequestration: Option<PathBuf>,

    /// Engine configuration as JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Settlement code.
    #[arg(long, default_value = "VL001")]
    site: String,

    /// Only show activities of this sector.
    #[arg(long)]
    category: Option<String>,

    /// Hover the ring segment of this activity.
    #[arg(long, conflicts_with = "pointer")]
    hover: Option<String>,

    /// Hover whatever lies under this point, as `x,y`.
    #[arg(long, value_parser = parse_point)]
    pointer: Option<Point>,

    /// Frame interval of the animation clock, in milliseconds (at least 1).
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,

    /// Stop the reveal once the clock reaches this time, rendering the partial state.
    #[arg(long)]
    stop_after_ms: Option<f64>,

    /// Directory receiving one SVG per animation frame.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Output SVG.
    #[arg(short, long, default_value = "ghgviz_dashboard.svg")]
    out: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed CSV")]
    Csv(#[from] csv::Error),
    #[error("malformed configuration")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error("no emission records for site {0:?}")]
    UnknownSite(String),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            let mut source = err.source();
            while let Some(cause) = source {
                log::error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), DemoError> {
    let config = load_config(cli.config.as_deref())?;
    log::debug!("{config:?}");

    let emissions: Vec<EmissionRow> =
        load_rows(cli.records.as_deref(), include_str!("../data/emissions.csv"))?;
    let scenario: Vec<ScenarioRow> =
        load_rows(cli.scenario.as_deref(), include_str!("../data/scenario.csv"))?;
    let sinks: Vec<SequestrationRow> = load_rows(
        cli.sequestration.as_deref(),
        include_str!("../data/sequestration.csv"),
    )?;

    let view = SiteView::build(&cli.site, &emissions, &scenario, &sinks, &config)
        .ok_or_else(|| DemoError::UnknownSite(cli.site.clone()))?;
    let dashboard = Dashboard::new(view, palette()?, config);

    let mut interaction = InteractionState::new();
    if let Some(category) = &cli.category {
        interaction.apply(InteractionEvent::CategoryClick { category });
    }
    let pointer = match (&cli.pointer, &cli.hover) {
        (Some(at), _) => Some(*at),
        (None, Some(key)) => {
            let at = dashboard.segment_center(&interaction, key);
            if at.is_none() {
                log::warn!("activity {key:?} is not shown; nothing to hover");
            }
            at
        }
        (None, None) => None,
    };
    if let Some(at) = pointer {
        match dashboard.item_at(&interaction, at) {
            Some(item) => interaction.apply(InteractionEvent::PointerEnter { item: &item, at }),
            None => log::warn!("no activity under ({}, {})", at.x, at.y),
        }
    }

    if let Some(dir) = &cli.frames {
        fs::create_dir_all(dir).map_err(|source| DemoError::Write {
            path: dir.clone(),
            source,
        })?;
    }

    let mut scheduler = StepScheduler::new(cli.frame_ms.max(1.0));
    let mut reveal = RevealOnChange::new(&config);
    let now = scheduler.now();
    reveal.set_source(cli.site.clone(), &mut scheduler, now);

    let mut frame = 0_usize;
    while reveal.animator().pending_frame().is_some() {
        if cli.stop_after_ms.is_some_and(|t| scheduler.now() >= t) {
            log::info!("stopping the reveal at {} ms", scheduler.now());
            break;
        }
        let (now, due) = scheduler.advance();
        for request in due {
            let Some(eased) = reveal.on_frame(&mut scheduler, request, now) else {
                continue;
            };
            frame += 1;
            log::debug!("frame {frame} at {now} ms: eased {eased:.3}");
            if let Some(dir) = &cli.frames {
                let path = dir.join(format!("frame_{frame:03}.svg"));
                write_svg(&path, &dashboard.render(&interaction, eased))?;
            }
        }
    }
    let eased = reveal.animator().eased();
    log::info!("rendered {frame} frames, reveal at {eased:.3}");

    reveal.unmount(&mut scheduler);
    write_svg(&cli.out, &dashboard.render(&interaction, eased))?;
    println!("wrote {}", cli.out.display());
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, DemoError> {
    let config: EngineConfig = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| DemoError::Read {
                path: path.into(),
                source,
            })?;
            serde_json::from_str(&text)?
        }
        None => serde_json::from_str(include_str!("../data/config.json"))?,
    };
    Ok(config.sanitized())
}

fn load_rows<T: DeserializeOwned>(path: Option<&Path>, bundled: &str) -> Result<Vec<T>, DemoError> {
    let rows = match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| DemoError::Read {
                path: path.into(),
                source,
            })?;
            read_rows(BufReader::new(file))?
        }
        None => read_rows(bundled.as_bytes())?,
    };
    Ok(rows)
}

fn write_svg(path: &Path, doc: &SvgDocument) -> Result<(), DemoError> {
    fs::write(path, doc.to_svg_string()).map_err(|source| DemoError::Write {
        path: path.into(),
        source,
    })
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got {s:?}"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|err| format!("invalid coordinate {v:?}: {err}"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}
