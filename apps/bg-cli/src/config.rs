//! Scenario file loading and input resolution.

use anyhow::{Context, Result};
use bg_core::{InputLimits, RawParameters};
use bg_report::Lang;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Optional values from a YAML scenario file.
///
/// ```yaml
/// price: 1000
/// unit_cost: 900
/// fixed_cost: 100000
/// max_quantity: 2000
/// lang: ru
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    pub price: Option<f64>,
    pub unit_cost: Option<f64>,
    pub fixed_cost: Option<f64>,
    pub max_quantity: Option<f64>,
    pub lang: Option<Lang>,
}

impl ScenarioFile {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("invalid scenario file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scenario file {}", path.display()))?;
        Self::from_yaml(&text)
    }
}

/// Values given on the command line; these win over the scenario file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overrides {
    pub price: Option<f64>,
    pub unit_cost: Option<f64>,
    pub fixed_cost: Option<f64>,
    pub max_quantity: Option<f64>,
    pub lang: Option<Lang>,
}

/// Merge flags, file and form defaults, in that order of precedence.
pub fn resolve(
    flags: &Overrides,
    file: &ScenarioFile,
    limits: &InputLimits,
) -> (RawParameters, Lang) {
    let d = limits.defaults;
    let raw = RawParameters {
        price: flags.price.or(file.price).unwrap_or(d.price),
        unit_cost: flags.unit_cost.or(file.unit_cost).unwrap_or(d.unit_cost),
        fixed_cost: flags.fixed_cost.or(file.fixed_cost).unwrap_or(d.fixed_cost),
        max_quantity: flags
            .max_quantity
            .or(file.max_quantity)
            .unwrap_or(d.max_quantity),
    };
    let lang = flags.lang.or(file.lang).unwrap_or_default();
    (raw, lang)
}
