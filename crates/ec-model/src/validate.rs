//! Building model validation.

use crate::building::{Building, SurfaceKind};
use crate::params::Parameter;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate zone id: {0}")]
    DuplicateZoneId(String),

    #[error("Duplicate surface id: {0}")]
    DuplicateSurfaceId(String),

    #[error("Surface '{surface}' references unknown construction '{construction}'")]
    UnknownConstruction { surface: String, construction: String },

    #[error("Window '{surface}' references unknown glazing '{glazing}'")]
    UnknownGlazing { surface: String, glazing: String },

    #[error("Non-positive {what} on '{id}': {value}")]
    NonPositive {
        what: &'static str,
        id: String,
        value: f64,
    },

    #[error("Opaque surface '{0}' has no construction")]
    MissingConstruction(String),

    #[error("Parameter '{name}' value {value} outside limits [{min}, {max}]")]
    ParameterOutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

pub fn validate_building(building: &Building) -> Result<(), ValidationError> {
    let mut zone_ids = HashSet::new();
    let mut surface_ids = HashSet::new();

    for zone in &building.zones {
        if !zone_ids.insert(zone.id.as_str()) {
            return Err(ValidationError::DuplicateZoneId(zone.id.clone()));
        }
        if zone.floor_area_m2 <= 0.0 {
            return Err(ValidationError::NonPositive {
                what: "floor area",
                id: zone.id.clone(),
                value: zone.floor_area_m2,
            });
        }
        if zone.volume_m3 <= 0.0 {
            return Err(ValidationError::NonPositive {
                what: "volume",
                id: zone.id.clone(),
                value: zone.volume_m3,
            });
        }

        for surface in &zone.surfaces {
            if !surface_ids.insert(surface.id.as_str()) {
                return Err(ValidationError::DuplicateSurfaceId(surface.id.clone()));
            }
            if surface.area_m2 <= 0.0 {
                return Err(ValidationError::NonPositive {
                    what: "surface area",
                    id: surface.id.clone(),
                    value: surface.area_m2,
                });
            }
            match &surface.kind {
                SurfaceKind::Window { glazing, .. } => {
                    if building.glazing_type(glazing).is_none() {
                        return Err(ValidationError::UnknownGlazing {
                            surface: surface.id.clone(),
                            glazing: glazing.clone(),
                        });
                    }
                }
                _ => match &surface.construction {
                    None => {
                        return Err(ValidationError::MissingConstruction(surface.id.clone()));
                    }
                    Some(name) => {
                        if building.construction(name).is_none() {
                            return Err(ValidationError::UnknownConstruction {
                                surface: surface.id.clone(),
                                construction: name.clone(),
                            });
                        }
                    }
                },
            }
        }
    }

    Ok(())
}

/// Check a parameter's value against its own limits.
pub fn validate_parameter(param: &Parameter) -> Result<(), ValidationError> {
    let (Some(min), Some(max)) = (param.min, param.max) else {
        return Ok(());
    };
    let Some(value) = param.value.as_f64() else {
        return Ok(());
    };
    if value < min || value > max {
        return Err(ValidationError::ParameterOutOfRange {
            name: param.name.clone(),
            value,
            min,
            max,
        });
    }
    Ok(())
}
