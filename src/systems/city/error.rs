use thiserror::Error;

use super::building::BuildingSpec;

/// Rejected before any geometry is written.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} range is empty: min {min} must be below max {max}")]
    EmptyRange { name: &'static str, min: u32, max: u32 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
}

/// Raised by a scene backend when it refuses a write.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("unknown scene handle {0}")]
    UnknownHandle(String),
    #[error("invalid dimensions {width} x {depth} x {height} for '{name}'")]
    InvalidDimensions {
        name: String,
        width: f32,
        depth: f32,
        height: f32,
    },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid city configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("scene rejected building {} at ({}, {}): {source}", .spec.id, .spec.position.x, .spec.position.y)]
    SceneWrite {
        spec: BuildingSpec,
        #[source]
        source: SceneError,
    },
    #[error("scene rejected {stage}: {source}")]
    Scene {
        stage: &'static str,
        #[source]
        source: SceneError,
    },
}

/// What a block does when the scene refuses one of its buildings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OnSceneError {
    /// stop the whole run, later siblings assume earlier writes landed
    #[default]
    Abort,
    /// log, leave the cell empty and keep going
    Skip,
}
