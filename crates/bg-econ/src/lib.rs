#![deny(warnings)]

//! Economic model and advisory engine for BusinessGraph.
//!
//! Turns validated [`Parameters`] into:
//! - a fixed-size sample grid over `[0, max_quantity]`
//! - revenue, cost and profit series evaluated on that grid
//! - the analytic breakeven quantity, or an infeasibility marker
//! - a locale-independent advisory category
//!
//! Everything here is a pure function of the parameters; a [`ResultBundle`]
//! is built fresh for every call and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub use bg_core::{Field, Parameters, ValidationError};

/// Number of quantity samples on every grid.
pub const SAMPLE_COUNT: usize = 400;

/// Margin ratio below which a positive margin counts as thin.
pub const THIN_MARGIN_RATIO: f64 = 0.15;

/// Evenly spaced quantities over `[0, max_quantity]`, both ends included.
///
/// Always returns [`SAMPLE_COUNT`] points; the last one is exactly
/// `max_quantity`.
pub fn sample_grid(max_quantity: f64) -> Vec<f64> {
    let step = max_quantity / (SAMPLE_COUNT - 1) as f64;
    let mut grid: Vec<f64> = (0..SAMPLE_COUNT).map(|i| i as f64 * step).collect();
    if let Some(last) = grid.last_mut() {
        *last = max_quantity;
    }
    grid
}

/// Revenue `T(x) = price * x`.
pub fn revenue_at(params: &Parameters, x: f64) -> f64 {
    params.price() * x
}

/// Total cost `S(x) = unit_cost * x + fixed_cost`.
pub fn cost_at(params: &Parameters, x: f64) -> f64 {
    params.unit_cost() * x + params.fixed_cost()
}

/// Profit `P(x) = T(x) - S(x)`.
pub fn profit_at(params: &Parameters, x: f64) -> f64 {
    revenue_at(params, x) - cost_at(params, x)
}

/// Revenue, cost and profit, index-aligned with the grid they were evaluated on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub revenue: Vec<f64>,
    pub cost: Vec<f64>,
    pub profit: Vec<f64>,
}

/// Evaluate the three linear functions at every grid point.
pub fn evaluate(params: &Parameters, grid: &[f64]) -> Series {
    let revenue: Vec<f64> = grid.iter().map(|&x| revenue_at(params, x)).collect();
    let cost: Vec<f64> = grid.iter().map(|&x| cost_at(params, x)).collect();
    let profit = revenue.iter().zip(&cost).map(|(r, c)| r - c).collect();
    Series {
        revenue,
        cost,
        profit,
    }
}

/// Outcome of the breakeven computation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Breakeven {
    /// Profit crosses zero at `x0`. May lie beyond the sampled domain.
    Point { x0: f64 },
    /// Price does not exceed unit cost; profit never turns positive.
    Infeasible,
}

impl Breakeven {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Breakeven::Point { .. })
    }

    /// Breakeven quantity when feasible.
    pub fn quantity(&self) -> Option<f64> {
        match self {
            Breakeven::Point { x0 } => Some(*x0),
            Breakeven::Infeasible => None,
        }
    }
}

/// Solve `P(x) = 0` analytically.
///
/// Example:
/// let p = Parameters::new(2000.0, 1200.0, 400_000.0, 1000.0).unwrap();
/// assert_eq!(breakeven(&p), Breakeven::Point { x0: 500.0 });
pub fn breakeven(params: &Parameters) -> Breakeven {
    if params.price() > params.unit_cost() {
        Breakeven::Point {
            x0: params.fixed_cost() / params.margin(),
        }
    } else {
        Breakeven::Infeasible
    }
}

/// Advisory tip category. Message text is looked up by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// Margin exists but is thin: consider a price increase.
    RaisePrice,
    /// No positive margin: unit cost must come down.
    ReduceCost,
    /// Healthy margin: grow sales volume to cover fixed costs.
    ScaleVolume,
}

impl Advisory {
    /// Stable key, matching the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            Advisory::RaisePrice => "raise_price",
            Advisory::ReduceCost => "reduce_cost",
            Advisory::ScaleVolume => "scale_volume",
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Classify pricing health from the margin ratio `(price - unit_cost) / price`.
pub fn advise(params: &Parameters) -> Advisory {
    let margin = params.margin();
    if params.price() == 0.0 || margin <= 0.0 {
        return Advisory::ReduceCost;
    }
    if margin / params.price() < THIN_MARGIN_RATIO {
        Advisory::RaisePrice
    } else {
        Advisory::ScaleVolume
    }
}

/// One row of the exported dataset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DataRow {
    pub x: f64,
    pub revenue: f64,
    pub costs: f64,
    pub profit: f64,
}

/// Everything computed for one parameter set.
#[derive(Clone, Debug, Serialize)]
pub struct ResultBundle {
    params: Parameters,
    grid: Vec<f64>,
    series: Series,
    breakeven: Breakeven,
    advisory: Advisory,
}

impl ResultBundle {
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn breakeven(&self) -> Breakeven {
        self.breakeven
    }

    pub fn advisory(&self) -> Advisory {
        self.advisory
    }

    /// Whether the breakeven point falls on the sampled domain.
    /// `None` when there is no breakeven.
    pub fn breakeven_in_range(&self) -> Option<bool> {
        self.breakeven
            .quantity()
            .map(|x0| x0 <= self.params.max_quantity())
    }

    /// Tabular view with columns `x, revenue, costs, profit`.
    pub fn rows(&self) -> impl Iterator<Item = DataRow> + '_ {
        self.grid.iter().enumerate().map(move |(i, &x)| DataRow {
            x,
            revenue: self.series.revenue[i],
            costs: self.series.cost[i],
            profit: self.series.profit[i],
        })
    }
}

/// Package already computed parts. Performs no computation of its own.
pub fn assemble(
    params: Parameters,
    grid: Vec<f64>,
    series: Series,
    breakeven: Breakeven,
    advisory: Advisory,
) -> ResultBundle {
    ResultBundle {
        params,
        grid,
        series,
        breakeven,
        advisory,
    }
}

/// Run the full pipeline for validated parameters.
pub fn compute(params: &Parameters) -> ResultBundle {
    let grid = sample_grid(params.max_quantity());
    let series = evaluate(params, &grid);
    let be = breakeven(params);
    let advisory = advise(params);
    debug!(?be, %advisory, "computed result bundle");
    assemble(*params, grid, series, be, advisory)
}

/// Validate raw inputs and run the pipeline.
///
/// Example:
/// let bundle = analyze(1000.0, 1200.0, 50_000.0, 500.0).unwrap();
/// assert_eq!(bundle.breakeven(), Breakeven::Infeasible);
pub fn analyze(
    price: f64,
    unit_cost: f64,
    fixed_cost: f64,
    max_quantity: f64,
) -> Result<ResultBundle, ValidationError> {
    let params = Parameters::new(price, unit_cost, fixed_cost, max_quantity)?;
    Ok(compute(&params))
}
