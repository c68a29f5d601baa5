//! ec-model: building model schema and parametric definitions.

pub mod building;
pub mod params;
pub mod validate;

pub use building::*;
pub use params::{ParamValue, Parameter, ParameterSet};
pub use validate::{ValidationError, validate_building, validate_parameter};

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ModelResult<Building> {
    let content = std::fs::read_to_string(path)?;
    let building: Building = serde_yaml::from_str(&content)?;
    validate_building(&building)?;
    Ok(building)
}

pub fn save_yaml(path: &std::path::Path, building: &Building) -> ModelResult<()> {
    validate_building(building)?;
    let content = serde_yaml::to_string(building)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ModelResult<Building> {
    let content = std::fs::read_to_string(path)?;
    let building: Building = serde_json::from_str(&content)?;
    validate_building(&building)?;
    Ok(building)
}

pub fn save_json(path: &std::path::Path, building: &Building) -> ModelResult<()> {
    validate_building(building)?;
    let content = serde_json::to_string_pretty(building)?;
    std::fs::write(path, content)?;
    Ok(())
}
