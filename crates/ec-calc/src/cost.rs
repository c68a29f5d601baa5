//! Life-cycle cost calculation definition.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The cost calculation document pushed to the server during setup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostCalculation {
    pub study_period_years: u32,
    /// Real discount rate, e.g. 0.03 for 3%.
    pub discount_rate: f64,
    pub electricity_price_per_kwh: f64,
    pub heat_price_per_kwh: f64,
    /// Per-material installed cost overrides, keyed by material name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub material_costs_per_m3: BTreeMap<String, f64>,
}

impl CostCalculation {
    /// Present value of a constant annual cost over the study period.
    pub fn present_value(&self, annual_cost: f64) -> f64 {
        if self.discount_rate == 0.0 {
            return annual_cost * self.study_period_years as f64;
        }
        (1..=self.study_period_years)
            .map(|year| annual_cost / (1.0 + self.discount_rate).powi(year as i32))
            .sum()
    }

    pub fn annual_energy_cost(
        &self,
        electricity_kwh_per_year: f64,
        heat_kwh_per_year: f64,
    ) -> f64 {
        electricity_kwh_per_year * self.electricity_price_per_kwh
            + heat_kwh_per_year * self.heat_price_per_kwh
    }
}
