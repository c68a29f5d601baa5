//! Setup request assembly and reporting.

use ec_calc::{CostCalculation, EnergyMode, LcaCalculation};
use ec_frame::Frame;
use ec_model::{Building, ParameterSet};
use std::fmt;
use std::path::PathBuf;

/// Everything a calculation setup can carry. All sections are optional and
/// uploaded independently; an existing setup of the same name is updated
/// section by section.
#[derive(Debug, Clone, Default)]
pub struct SetupRequest {
    pub name: String,
    /// EPW weather file for dynamic simulation.
    pub epw: Option<PathBuf>,
    /// Weather table for the steady-state energy calculation.
    pub weather_data: Option<Frame>,
    /// Raw engine input text of the building (IDF).
    pub idf: Option<String>,
    /// Converted building model.
    pub model: Option<Building>,
    /// Parametric definition of the model.
    pub parameters: Option<ParameterSet>,
    pub lca_calculation: Option<LcaCalculation>,
    pub cost_calculation: Option<CostCalculation>,
    pub energy_calculation: Option<EnergyMode>,
    /// Create the result database for the setup (on unless switched off).
    pub init_db: bool,
}

impl SetupRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            init_db: true,
            ..Self::default()
        }
    }

    pub fn epw(mut self, path: impl Into<PathBuf>) -> Self {
        self.epw = Some(path.into());
        self
    }

    pub fn weather_data(mut self, weather: Frame) -> Self {
        self.weather_data = Some(weather);
        self
    }

    pub fn idf(mut self, text: impl Into<String>) -> Self {
        self.idf = Some(text.into());
        self
    }

    pub fn model(mut self, building: Building) -> Self {
        self.model = Some(building);
        self
    }

    pub fn parameters(mut self, params: ParameterSet) -> Self {
        self.parameters = Some(params);
        self
    }

    pub fn lca_calculation(mut self, calc: LcaCalculation) -> Self {
        self.lca_calculation = Some(calc);
        self
    }

    pub fn cost_calculation(mut self, calc: CostCalculation) -> Self {
        self.cost_calculation = Some(calc);
        self
    }

    pub fn energy_calculation(mut self, mode: EnergyMode) -> Self {
        self.energy_calculation = Some(mode);
        self
    }

    pub fn skip_init_db(mut self) -> Self {
        self.init_db = false;
        self
    }
}

/// One uploadable section of a setup, in upload order. The wire name is the
/// `type` query key of the `/setup` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupSection {
    Epw,
    WeatherData,
    Idf,
    Model,
    Parameters,
    LcaCalculation,
    CostCalculation,
    Database,
    EnergyCalculation,
}

impl SetupSection {
    pub fn wire_name(&self) -> &'static str {
        match self {
            SetupSection::Epw => "epw",
            SetupSection::WeatherData => "weather_data",
            SetupSection::Idf => "idf",
            SetupSection::Model => "model",
            SetupSection::Parameters => "parameters",
            SetupSection::LcaCalculation => "lca_calculation",
            SetupSection::CostCalculation => "cost_calculation",
            SetupSection::Database => "database",
            SetupSection::EnergyCalculation => "energy_calculation",
        }
    }
}

impl fmt::Display for SetupSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Result of a setup upload: either every provided section was acknowledged,
/// or the server rejected one and the sequence stopped there.
#[derive(Debug, Clone, PartialEq)]
pub enum SetupOutcome {
    Completed {
        /// Server acknowledgement per uploaded section, in upload order.
        acks: Vec<(SetupSection, String)>,
    },
    Rejected {
        section: SetupSection,
        /// The server's text, verbatim.
        message: String,
        /// Sections acknowledged before the rejection.
        acks: Vec<(SetupSection, String)>,
    },
}

impl SetupOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, SetupOutcome::Completed { .. })
    }
}
