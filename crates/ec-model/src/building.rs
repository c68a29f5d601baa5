//! Building model schema definitions.
//!
//! This is the converted, engine-independent form of a building that the
//! evaluation service works on: zones with surfaces, surfaces referencing
//! constructions, constructions carrying the material data the LCA and cost
//! calculations need.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Building {
    pub name: String,
    pub storeys: u32,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub constructions: Vec<Construction>,
    #[serde(default)]
    pub glazing: Vec<GlazingType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub floor_area_m2: f64,
    pub volume_m3: f64,
    pub conditioning: Conditioning,
    #[serde(default)]
    pub surfaces: Vec<Surface>,
    #[serde(default)]
    pub internal_gains: InternalGains,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Conditioning {
    Unconditioned,
    Heated {
        setpoint_c: f64,
    },
    HeatedAndCooled {
        heating_setpoint_c: f64,
        cooling_setpoint_c: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InternalGains {
    #[serde(default)]
    pub occupancy_w_m2: f64,
    #[serde(default)]
    pub lighting_w_m2: f64,
    #[serde(default)]
    pub equipment_w_m2: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Surface {
    pub id: String,
    pub kind: SurfaceKind,
    pub area_m2: f64,
    /// Name of an entry in [`Building::constructions`]. Windows reference
    /// [`Building::glazing`] instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SurfaceKind {
    ExternalWall { orientation_deg: f64 },
    InternalWall,
    Roof,
    GroundFloor,
    IntermediateFloor,
    Window {
        glazing: String,
        orientation_deg: f64,
        frame_fraction: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Construction {
    pub name: String,
    /// Layers ordered outside-in.
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    pub material: String,
    pub thickness_m: f64,
    pub conductivity_w_mk: f64,
    pub density_kg_m3: f64,
    pub specific_heat_j_kgk: f64,
    /// Cradle-to-gate embodied carbon per kg of material.
    #[serde(default)]
    pub embodied_carbon_kgco2_kg: f64,
    /// Installed cost per m3 of material.
    #[serde(default)]
    pub cost_per_m3: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlazingType {
    pub name: String,
    pub u_value_w_m2k: f64,
    pub g_value: f64,
    #[serde(default)]
    pub embodied_carbon_kgco2_m2: f64,
    #[serde(default)]
    pub cost_per_m2: f64,
}

impl Construction {
    /// Thermal resistance of the layer stack, surface films excluded.
    pub fn resistance_m2k_w(&self) -> f64 {
        self.layers
            .iter()
            .map(|l| l.thickness_m / l.conductivity_w_mk)
            .sum()
    }
}

impl Building {
    pub fn construction(&self, name: &str) -> Option<&Construction> {
        self.constructions.iter().find(|c| c.name == name)
    }

    pub fn glazing_type(&self, name: &str) -> Option<&GlazingType> {
        self.glazing.iter().find(|g| g.name == name)
    }

    /// Total conditioned floor area.
    pub fn conditioned_area_m2(&self) -> f64 {
        self.zones
            .iter()
            .filter(|z| !matches!(z.conditioning, Conditioning::Unconditioned))
            .map(|z| z.floor_area_m2)
            .sum()
    }
}
