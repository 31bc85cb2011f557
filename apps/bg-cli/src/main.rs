#![deny(warnings)]

//! Headless BusinessGraph calculator: computes the revenue/cost/profit model
//! for one scenario, prints the localized result panel and writes exports.

mod config;

use anyhow::{Context, Result};
use bg_core::{validate, InputLimits};
use bg_report::{Lang, Report};
use config::{Overrides, ScenarioFile};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct CliArgs {
    overrides: Overrides,
    config: Option<PathBuf>,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
    version: bool,
}

fn parse_number(flag: &str, value: Option<String>) -> Result<Option<f64>> {
    match value {
        Some(v) => v
            .parse::<f64>()
            .map(Some)
            .with_context(|| format!("{flag} expects a number, got {v:?}")),
        None => anyhow::bail!("{flag} expects a value"),
    }
}

fn parse_args<I: IntoIterator<Item = String>>(raw: I) -> Result<CliArgs> {
    let mut args = CliArgs::default();
    let mut it = raw.into_iter().peekable();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--price" => args.overrides.price = parse_number(&arg, it.next())?,
            "--unit-cost" => args.overrides.unit_cost = parse_number(&arg, it.next())?,
            "--fixed-cost" => args.overrides.fixed_cost = parse_number(&arg, it.next())?,
            "--max-qty" => args.overrides.max_quantity = parse_number(&arg, it.next())?,
            "--lang" => {
                let code = it.next().context("--lang expects kk or ru")?;
                args.overrides.lang = Some(code.parse::<Lang>()?);
            }
            "--config" => {
                let path = it.next().context("--config expects a path")?;
                args.config = Some(PathBuf::from(path));
            }
            // Path is optional for the exports
            "--csv" => {
                let path = it.next_if(|s| !s.starts_with("--"));
                args.csv = Some(
                    path.map(PathBuf::from)
                        .unwrap_or_else(|| PathBuf::from(bg_report::CSV_FILE_NAME)),
                );
            }
            "--json" => {
                let path = it.next_if(|s| !s.starts_with("--"));
                args.json = Some(path.map(PathBuf::from).unwrap_or_else(|| {
                    let now = chrono::Local::now().naive_local();
                    PathBuf::from(bg_report::timestamped_file_name("businessgraph", "json", now))
                }));
            }
            "--version" => args.version = true,
            _ => {}
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!(
            "businessgraph {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }

    let file = match &args.config {
        Some(path) => ScenarioFile::load(path)?,
        None => ScenarioFile::default(),
    };
    let limits = InputLimits::default();
    let (raw, lang) = config::resolve(&args.overrides, &file, &limits);
    let params = validate(&raw)?;
    limits.check_quantity(params.max_quantity())?;
    info!(?params, %lang, "computing scenario");

    // The caller owns the bundle; exporters only borrow it.
    let bundle = bg_econ::compute(&params);
    info!(
        feasible = bundle.breakeven().is_feasible(),
        advisory = %bundle.advisory(),
        "scenario computed"
    );

    let m = lang.messages();
    println!("{}", m.title);
    println!("{}", m.subtitle);
    println!("{}", m.about);
    println!("{}", lang.selector_line());
    println!();
    println!("{}", m.inputs);
    println!("  {}: {}", m.price, params.price());
    println!("  {}: {}", m.cost, params.unit_cost());
    println!("  {}: {}", m.fixed, params.fixed_cost());
    println!("  {}: {}", m.qty_max, params.max_quantity());
    println!();
    println!("{} [{}]", m.chart_title, m.y_axis);
    print!("{}", Report::new(&bundle, lang).render());

    if let Some(path) = &args.csv {
        bg_report::export_csv(&bundle, path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.json {
        bg_report::export_json(&bundle, path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    println!();
    println!("{}", m.footer);
    Ok(())
}
