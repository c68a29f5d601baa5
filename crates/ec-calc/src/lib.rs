//! ec-calc: calculation definitions for the evaluation service.
//!
//! These are the documents pushed to the server during setup (LCA and cost
//! calculations) and the typed forms of the energy-query and simulation
//! option surfaces.

pub mod cost;
pub mod energy;
pub mod lca;

pub use cost::CostCalculation;
pub use energy::{
    EnergyMode, EnergyQuery, EnergyVariable, OutputRequest, OutputResolution, ResultKind,
    SelectedOutputs, SimulationOptions,
};
pub use lca::{LcaCalculation, LifeCycleStage, MaterialImpact};
