//! Static emission factor table and the activity → CO2 conversion.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::carbon_constants::MAX_ENTRY_CO2_KG;
use super::carbon_errors::CarbonError;
use super::carbon_model::EmissionCategory;

/// Kilograms of CO2 emitted per unit of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionFactor {
    pub activity_type: &'static str,
    pub factor: Decimal,
    pub unit: &'static str,
    pub category: EmissionCategory,
}

pub const EMISSION_FACTORS: [EmissionFactor; 11] = [
    EmissionFactor {
        activity_type: "electricity",
        factor: dec!(0.82),
        unit: "kWh",
        category: EmissionCategory::Electricity,
    },
    EmissionFactor {
        activity_type: "petrol",
        factor: dec!(2.31),
        unit: "L",
        category: EmissionCategory::Transport,
    },
    EmissionFactor {
        activity_type: "diesel",
        factor: dec!(2.68),
        unit: "L",
        category: EmissionCategory::Transport,
    },
    EmissionFactor {
        activity_type: "flightShort",
        factor: dec!(0.09),
        unit: "km",
        category: EmissionCategory::Flight,
    },
    EmissionFactor {
        activity_type: "flightLong",
        factor: dec!(0.15),
        unit: "km",
        category: EmissionCategory::Flight,
    },
    EmissionFactor {
        activity_type: "lpg",
        factor: dec!(2.98),
        unit: "kg",
        category: EmissionCategory::Fuel,
    },
    EmissionFactor {
        activity_type: "beef",
        factor: dec!(27),
        unit: "kg",
        category: EmissionCategory::Food,
    },
    EmissionFactor {
        activity_type: "chicken",
        factor: dec!(6.9),
        unit: "kg",
        category: EmissionCategory::Food,
    },
    EmissionFactor {
        activity_type: "rice",
        factor: dec!(4.0),
        unit: "kg",
        category: EmissionCategory::Food,
    },
    EmissionFactor {
        activity_type: "vegetables",
        factor: dec!(2.0),
        unit: "kg",
        category: EmissionCategory::Food,
    },
    EmissionFactor {
        activity_type: "waste",
        factor: dec!(1.0),
        unit: "kg",
        category: EmissionCategory::Waste,
    },
];

/// Result of converting one activity quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2Conversion {
    pub co2_amount: Decimal,
    pub category: EmissionCategory,
    pub factor: Decimal,
}

/// Looks up the factor row for an activity type. Keys are case-sensitive.
pub fn emission_factor(activity_type: &str) -> Option<&'static EmissionFactor> {
    EMISSION_FACTORS
        .iter()
        .find(|f| f.activity_type == activity_type)
}

/// Converts `quantity` units of `activity_type` into kilograms of CO2.
///
/// The category always comes from the factor table. Negative quantities are
/// rejected rather than clamped, as is any product above `MAX_ENTRY_CO2_KG`.
/// The product is returned unrounded.
pub fn convert(activity_type: &str, quantity: Decimal) -> Result<Co2Conversion, CarbonError> {
    let factor = emission_factor(activity_type)
        .ok_or_else(|| CarbonError::UnknownActivityType(activity_type.to_string()))?;

    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err(CarbonError::InvalidQuantity {
            activity_type: activity_type.to_string(),
            reason: format!("quantity must not be negative, got {}", quantity),
        });
    }

    let co2_amount = quantity
        .checked_mul(factor.factor)
        .filter(|amount| *amount <= Decimal::from(MAX_ENTRY_CO2_KG))
        .ok_or_else(|| CarbonError::InvalidQuantity {
            activity_type: activity_type.to_string(),
            reason: format!("quantity {} is too large", quantity),
        })?;

    Ok(Co2Conversion {
        co2_amount,
        category: factor.category,
        factor: factor.factor,
    })
}
