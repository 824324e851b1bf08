//! Carbon module - emission conversion, ledger models, services, and traits.

mod carbon_constants;
mod carbon_errors;
mod carbon_model;
mod carbon_service;
mod carbon_traits;
mod emission_converter;

#[cfg(test)]
mod carbon_service_tests;

pub use carbon_constants::*;
pub use carbon_errors::CarbonError;
pub use carbon_model::{
    add_co2, round_co2, total_co2, ActivityQuantities, CarbonEntry, CarbonSummary, DailyCarbonTotal,
    DateRange, EmissionCategory, NewCarbonEntry,
};
pub use carbon_service::CarbonService;
pub use carbon_traits::{CarbonRepositoryTrait, CarbonServiceTrait};
pub use emission_converter::{
    convert, emission_factor, Co2Conversion, EmissionFactor, EMISSION_FACTORS,
};
