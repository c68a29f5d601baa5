//! Life-cycle assessment calculation definition.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The LCA calculation document pushed to the server during setup. The server
/// evaluates it against the current model state; the client only needs the
/// shape and a few convenience accessors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LcaCalculation {
    pub study_period_years: u32,
    /// Life-cycle stages included in the impact total.
    pub stages: Vec<LifeCycleStage>,
    /// Operational electricity emission factor.
    pub electricity_factor_kgco2_kwh: f64,
    /// Operational heat emission factor (district heat or fuel mix).
    pub heat_factor_kgco2_kwh: f64,
    /// Per-material overrides of the built-in impact data, keyed by
    /// material name as it appears in the building model.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub material_factors: BTreeMap<String, MaterialImpact>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifeCycleStage {
    /// A1-A3: raw material supply, transport, manufacturing.
    Product,
    /// A4: transport to site.
    Transport,
    /// B4: replacement over the study period.
    Replacement,
    /// B6: operational energy use.
    OperationalEnergy,
    /// C1-C4: demolition and disposal.
    EndOfLife,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MaterialImpact {
    pub gwp_kgco2_kg: f64,
    /// Service life; materials outliving the study period are never replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_life_years: Option<u32>,
}

impl LcaCalculation {
    pub fn includes(&self, stage: LifeCycleStage) -> bool {
        self.stages.contains(&stage)
    }

    /// Operational impact over the study period for annual energy use,
    /// zero when the operational stage is excluded.
    pub fn operational_impact_kgco2(
        &self,
        electricity_kwh_per_year: f64,
        heat_kwh_per_year: f64,
    ) -> f64 {
        if !self.includes(LifeCycleStage::OperationalEnergy) {
            return 0.0;
        }
        let annual = electricity_kwh_per_year * self.electricity_factor_kgco2_kwh
            + heat_kwh_per_year * self.heat_factor_kgco2_kwh;
        annual * self.study_period_years as f64
    }
}
