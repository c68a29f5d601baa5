//! Energy calculation mode, query surface and simulation output options.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// How the server evaluates energy demand: full dynamic simulation or a
/// steady-state monthly balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyMode {
    Simulation,
    SteadyState,
}

impl EnergyMode {
    /// The word the `/setup` endpoint expects in its `mode` query key.
    pub fn wire_word(&self) -> &'static str {
        match self {
            EnergyMode::Simulation => "simulation",
            EnergyMode::SteadyState => "steady_state",
        }
    }
}

impl fmt::Display for EnergyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_word())
    }
}

/// A variable the simulation can report. The wire words are the service's
/// own, spaces included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyVariable {
    #[serde(rename = "heating")]
    Heating,
    #[serde(rename = "cooling")]
    Cooling,
    #[serde(rename = "lights")]
    Lights,
    #[serde(rename = "infiltration")]
    Infiltration,
    #[serde(rename = "solar gains")]
    SolarGains,
    #[serde(rename = "glazing loss")]
    GlazingLoss,
    #[serde(rename = "glazing gain")]
    GlazingGain,
    #[serde(rename = "opaque loss")]
    OpaqueLoss,
    #[serde(rename = "ventilation")]
    Ventilation,
    #[serde(rename = "equipment")]
    Equipment,
    #[serde(rename = "people")]
    People,
}

impl EnergyVariable {
    pub fn wire_word(&self) -> &'static str {
        match self {
            EnergyVariable::Heating => "heating",
            EnergyVariable::Cooling => "cooling",
            EnergyVariable::Lights => "lights",
            EnergyVariable::Infiltration => "infiltration",
            EnergyVariable::SolarGains => "solar gains",
            EnergyVariable::GlazingLoss => "glazing loss",
            EnergyVariable::GlazingGain => "glazing gain",
            EnergyVariable::OpaqueLoss => "opaque loss",
            EnergyVariable::Ventilation => "ventilation",
            EnergyVariable::Equipment => "equipment",
            EnergyVariable::People => "people",
        }
    }
}

impl fmt::Display for EnergyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_word())
    }
}

/// Aggregation level of reported results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputResolution {
    Runperiod,
    Annual,
    Monthly,
    Daily,
    Hourly,
    Timestep,
}

impl OutputResolution {
    pub fn wire_word(&self) -> &'static str {
        match self {
            OutputResolution::Runperiod => "runperiod",
            OutputResolution::Annual => "annual",
            OutputResolution::Monthly => "monthly",
            OutputResolution::Daily => "daily",
            OutputResolution::Hourly => "hourly",
            OutputResolution::Timestep => "timestep",
        }
    }
}

impl fmt::Display for OutputResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_word())
    }
}

/// What entity the energy table is broken down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Zone,
    Surface,
    Balance,
}

impl ResultKind {
    pub fn wire_word(&self) -> &'static str {
        match self {
            ResultKind::Zone => "zone",
            ResultKind::Surface => "surface",
            ResultKind::Balance => "balance",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_word())
    }
}

/// Typed query for `/energy`. Defaults mirror the service contract:
/// zone-level heating/cooling/lights over the whole run period.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyQuery {
    /// Id of a previously run simulation; omitted for steady-state setups.
    pub calc_id: Option<String>,
    pub variables: Vec<EnergyVariable>,
    pub kind: ResultKind,
    pub period: OutputResolution,
}

impl Default for EnergyQuery {
    fn default() -> Self {
        Self {
            calc_id: None,
            variables: vec![
                EnergyVariable::Heating,
                EnergyVariable::Cooling,
                EnergyVariable::Lights,
            ],
            kind: ResultKind::Zone,
            period: OutputResolution::Runperiod,
        }
    }
}

impl EnergyQuery {
    pub fn for_calc(calc_id: impl Into<String>) -> Self {
        Self {
            calc_id: Some(calc_id.into()),
            ..Self::default()
        }
    }
}

/// Simulation options carried in the `/instate` POST body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    pub outputs: OutputRequest,
    pub output_resolution: OutputResolution,
    #[serde(default)]
    pub clear_existing_variables: bool,
}

/// Requested output variables: everything, or explicit per-entity lists.
///
/// On the wire this is either the string `"all"` or an object with `zone`
/// and `surface` arrays, so the serde impls are written by hand.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputRequest {
    All,
    Selected(SelectedOutputs),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectedOutputs {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zone: Vec<EnergyVariable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub surface: Vec<EnergyVariable>,
}

impl Serialize for OutputRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OutputRequest::All => serializer.serialize_str("all"),
            OutputRequest::Selected(sel) => sel.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for OutputRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) if s == "all" => Ok(OutputRequest::All),
            serde_json::Value::String(s) => {
                Err(D::Error::custom(format!("expected \"all\", got \"{s}\"")))
            }
            other => {
                let sel = SelectedOutputs::deserialize(other).map_err(D::Error::custom)?;
                Ok(OutputRequest::Selected(sel))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mode_wire_words() {
        assert_eq!(EnergyMode::Simulation.to_string(), "simulation");
        assert_eq!(EnergyMode::SteadyState.to_string(), "steady_state");
    }

    #[test]
    fn energy_query_defaults() {
        let q = EnergyQuery::default();
        assert_eq!(q.calc_id, None);
        assert_eq!(
            q.variables,
            vec![
                EnergyVariable::Heating,
                EnergyVariable::Cooling,
                EnergyVariable::Lights
            ]
        );
        assert_eq!(q.kind, ResultKind::Zone);
        assert_eq!(q.period, OutputResolution::Runperiod);
    }

    #[test]
    fn options_serialize_all() {
        let opts = SimulationOptions {
            outputs: OutputRequest::All,
            output_resolution: OutputResolution::Hourly,
            clear_existing_variables: true,
        };
        let v = serde_json::to_value(&opts).unwrap();
        assert_eq!(
            v,
            json!({
                "outputs": "all",
                "output_resolution": "hourly",
                "clear_existing_variables": true
            })
        );
    }

    #[test]
    fn options_serialize_selected() {
        let opts = SimulationOptions {
            outputs: OutputRequest::Selected(SelectedOutputs {
                zone: vec![EnergyVariable::Heating, EnergyVariable::SolarGains],
                surface: vec![EnergyVariable::GlazingGain],
            }),
            output_resolution: OutputResolution::Monthly,
            clear_existing_variables: false,
        };
        let v = serde_json::to_value(&opts).unwrap();
        assert_eq!(
            v,
            json!({
                "outputs": {
                    "zone": ["heating", "solar gains"],
                    "surface": ["glazing gain"]
                },
                "output_resolution": "monthly",
                "clear_existing_variables": false
            })
        );
    }

    #[test]
    fn options_deserialize_both_shapes() {
        let all: SimulationOptions = serde_json::from_value(json!({
            "outputs": "all",
            "output_resolution": "daily",
            "clear_existing_variables": false
        }))
        .unwrap();
        assert_eq!(all.outputs, OutputRequest::All);

        let sel: SimulationOptions = serde_json::from_value(json!({
            "outputs": {"zone": ["cooling"]},
            "output_resolution": "daily"
        }))
        .unwrap();
        match sel.outputs {
            OutputRequest::Selected(s) => {
                assert_eq!(s.zone, vec![EnergyVariable::Cooling]);
                assert!(s.surface.is_empty());
            }
            _ => panic!("expected selected outputs"),
        }
    }
}
