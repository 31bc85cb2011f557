#![deny(warnings)]

//! Core input model and invariants for BusinessGraph.
//!
//! This crate defines the validated business parameters consumed by the
//! economic engine, the raw form values they are built from, and the input
//! limits of the calculator form.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Identifies one of the four scalar inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Selling price per unit.
    Price,
    /// Variable cost per unit.
    UnitCost,
    /// Fixed cost independent of quantity.
    FixedCost,
    /// Upper bound of the quantity domain.
    MaxQuantity,
}

impl Field {
    /// Stable snake_case name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Price => "price",
            Field::UnitCost => "unit_cost",
            Field::FixedCost => "fixed_cost",
            Field::MaxQuantity => "max_quantity",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for calculator inputs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Value is negative or non-finite (or non-positive for `max_quantity`).
    #[error("invalid parameter {field}: {value}")]
    InvalidParameter { field: Field, value: f64 },
    /// Quantity bound outside the form range.
    #[error("max quantity {value} is out of supported range [{min}, {max}]")]
    QuantityOutOfRange { value: f64, min: f64, max: f64 },
    /// Quantity bound not aligned to the form step.
    #[error("max quantity {value} is not a multiple of step {step}")]
    QuantityOffStep { value: f64, step: f64 },
}

/// Unvalidated form values, as typed by a user or read from a scenario file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawParameters {
    /// Price per unit.
    pub price: f64,
    /// Cost per unit.
    pub unit_cost: f64,
    /// Fixed cost.
    pub fixed_cost: f64,
    /// Maximum quantity shown on the chart.
    pub max_quantity: f64,
}

/// Validated business parameters.
///
/// All four values are finite and non-negative, and `max_quantity` is
/// strictly positive. The only way to obtain one is through [`validate`]
/// (directly, via [`Parameters::new`], or via deserialization).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameters", into = "RawParameters")]
pub struct Parameters {
    price: f64,
    unit_cost: f64,
    fixed_cost: f64,
    max_quantity: f64,
}

impl Parameters {
    /// Validate four raw inputs.
    ///
    /// Example:
    /// let p = Parameters::new(2000.0, 1200.0, 400_000.0, 1000.0).unwrap();
    /// assert_eq!(p.margin(), 800.0);
    pub fn new(
        price: f64,
        unit_cost: f64,
        fixed_cost: f64,
        max_quantity: f64,
    ) -> Result<Self, ValidationError> {
        validate(&RawParameters {
            price,
            unit_cost,
            fixed_cost,
            max_quantity,
        })
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }

    pub fn fixed_cost(&self) -> f64 {
        self.fixed_cost
    }

    pub fn max_quantity(&self) -> f64 {
        self.max_quantity
    }

    /// Per-unit contribution before fixed costs: `price - unit_cost`.
    pub fn margin(&self) -> f64 {
        self.price - self.unit_cost
    }
}

impl TryFrom<RawParameters> for Parameters {
    type Error = ValidationError;

    fn try_from(raw: RawParameters) -> Result<Self, Self::Error> {
        validate(&raw)
    }
}

impl From<Parameters> for RawParameters {
    fn from(p: Parameters) -> Self {
        RawParameters {
            price: p.price,
            unit_cost: p.unit_cost,
            fixed_cost: p.fixed_cost,
            max_quantity: p.max_quantity,
        }
    }
}

fn non_negative(field: Field, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < 0.0 {
        debug!(%field, value, "rejecting parameter");
        return Err(ValidationError::InvalidParameter { field, value });
    }
    // -0.0 + 0.0 == +0.0
    Ok(value + 0.0)
}

/// Validate raw inputs into [`Parameters`]. Values are never clamped.
pub fn validate(raw: &RawParameters) -> Result<Parameters, ValidationError> {
    let price = non_negative(Field::Price, raw.price)?;
    let unit_cost = non_negative(Field::UnitCost, raw.unit_cost)?;
    let fixed_cost = non_negative(Field::FixedCost, raw.fixed_cost)?;
    if !raw.max_quantity.is_finite() || raw.max_quantity <= 0.0 {
        debug!(value = raw.max_quantity, "rejecting max quantity");
        return Err(ValidationError::InvalidParameter {
            field: Field::MaxQuantity,
            value: raw.max_quantity,
        });
    }
    Ok(Parameters {
        price,
        unit_cost,
        fixed_cost,
        max_quantity: raw.max_quantity,
    })
}

/// Defaults and quantity bounds of the calculator form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    /// Default form values.
    pub defaults: RawParameters,
    /// Smallest selectable quantity bound.
    pub min_quantity: f64,
    /// Largest selectable quantity bound.
    pub max_quantity: f64,
    /// Quantity slider step.
    pub quantity_step: f64,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            defaults: RawParameters {
                price: 2000.0,
                unit_cost: 1200.0,
                fixed_cost: 400_000.0,
                max_quantity: 1000.0,
            },
            min_quantity: 100.0,
            max_quantity: 10_000.0,
            quantity_step: 100.0,
        }
    }
}

impl InputLimits {
    /// Check a quantity bound against the slider range and step.
    ///
    /// The engine accepts any positive bound; this check belongs to front ends
    /// that mirror the calculator form.
    pub fn check_quantity(&self, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() || value < self.min_quantity || value > self.max_quantity {
            return Err(ValidationError::QuantityOutOfRange {
                value,
                min: self.min_quantity,
                max: self.max_quantity,
            });
        }
        if (value - self.min_quantity) % self.quantity_step != 0.0 {
            return Err(ValidationError::QuantityOffStep {
                value,
                step: self.quantity_step,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_are_valid() {
        let limits = InputLimits::default();
        let p = validate(&limits.defaults).unwrap();
        assert_eq!(p.price(), 2000.0);
        assert_eq!(p.unit_cost(), 1200.0);
        assert_eq!(p.fixed_cost(), 400_000.0);
        assert_eq!(p.max_quantity(), 1000.0);
        assert!(limits.check_quantity(p.max_quantity()).is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = Parameters::new(-1.0, 1200.0, 400_000.0, 1000.0).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidParameter {
                field: Field::Price,
                value: -1.0
            }
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(matches!(
            Parameters::new(f64::NAN, 0.0, 0.0, 100.0),
            Err(ValidationError::InvalidParameter { field: Field::Price, .. })
        ));
        assert!(matches!(
            Parameters::new(1.0, f64::INFINITY, 0.0, 100.0),
            Err(ValidationError::InvalidParameter { field: Field::UnitCost, .. })
        ));
        assert!(matches!(
            Parameters::new(1.0, 0.0, f64::NEG_INFINITY, 100.0),
            Err(ValidationError::InvalidParameter { field: Field::FixedCost, .. })
        ));
        assert!(matches!(
            Parameters::new(1.0, 0.0, 0.0, f64::NAN),
            Err(ValidationError::InvalidParameter { field: Field::MaxQuantity, .. })
        ));
    }

    #[test]
    fn max_quantity_must_be_positive() {
        assert!(Parameters::new(1.0, 1.0, 1.0, 0.0).is_err());
        assert!(Parameters::new(1.0, 1.0, 1.0, -100.0).is_err());
        assert!(Parameters::new(1.0, 1.0, 1.0, 0.5).is_ok());
    }

    #[test]
    fn negative_zero_is_normalized() {
        let p = Parameters::new(-0.0, -0.0, -0.0, 100.0).unwrap();
        assert!(p.price().is_sign_positive());
        assert!(p.unit_cost().is_sign_positive());
        assert!(p.fixed_cost().is_sign_positive());
    }

    #[test]
    fn quantity_range_and_step() {
        let limits = InputLimits::default();
        assert!(limits.check_quantity(100.0).is_ok());
        assert!(limits.check_quantity(10_000.0).is_ok());
        assert!(matches!(
            limits.check_quantity(50.0),
            Err(ValidationError::QuantityOutOfRange { .. })
        ));
        assert!(matches!(
            limits.check_quantity(10_100.0),
            Err(ValidationError::QuantityOutOfRange { .. })
        ));
        assert!(matches!(
            limits.check_quantity(150.0),
            Err(ValidationError::QuantityOffStep { .. })
        ));
    }

    #[test]
    fn serde_roundtrip_validates() {
        let p = Parameters::new(1000.0, 900.0, 100_000.0, 2000.0).unwrap();
        let s = serde_json::to_string(&p).unwrap();
        let back: Parameters = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);

        let bad = r#"{"price":-5.0,"unit_cost":1.0,"fixed_cost":1.0,"max_quantity":100.0}"#;
        assert!(serde_json::from_str::<Parameters>(bad).is_err());
    }

    proptest! {
        #[test]
        fn non_negative_inputs_accepted(price in 0.0f64..1e9,
                                        cost in 0.0f64..1e9,
                                        fixed in 0.0f64..1e12,
                                        qty in 1.0f64..1e6) {
            let p = Parameters::new(price, cost, fixed, qty).unwrap();
            prop_assert_eq!(p.margin(), price - cost);
        }

        #[test]
        fn negative_inputs_rejected(v in -1e9f64..-1e-9) {
            prop_assert!(Parameters::new(v, 0.0, 0.0, 100.0).is_err());
            prop_assert!(Parameters::new(0.0, v, 0.0, 100.0).is_err());
            prop_assert!(Parameters::new(0.0, 0.0, v, 100.0).is_err());
            prop_assert!(Parameters::new(0.0, 0.0, 0.0, v).is_err());
        }
    }
}
