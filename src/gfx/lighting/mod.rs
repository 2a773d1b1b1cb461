//! # Lighting
//!
//! Light payloads, the ambient world background, and the [`LightingPlanner`]
//! that builds a size-aware 3-point studio rig.

pub mod lighting_planner;

use serde::{Deserialize, Serialize};

pub use lighting_planner::{LightingOutcome, LightingPlanner, FILL_NAME, KEY_NAME, RIM_NAME};

/// Light source shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    /// Directional light; `energy` is irradiance in W/m²
    Sun,
    /// Omni light; `energy` is power in W
    Point,
    /// Square area light with edge length `size`; `energy` is power in W
    Area { size: f32 },
}

/// Light payload of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightData {
    pub kind: LightKind,
    pub energy: f32,
    pub color: [f32; 3],
}

impl LightData {
    pub fn sun(strength: f32) -> Self {
        Self {
            kind: LightKind::Sun,
            energy: strength,
            color: [1.0, 1.0, 1.0],
        }
    }

    pub fn area(size: f32, power: f32) -> Self {
        Self {
            kind: LightKind::Area { size },
            energy: power,
            color: [1.0, 1.0, 1.0],
        }
    }

    pub fn point(power: f32) -> Self {
        Self {
            kind: LightKind::Point,
            energy: power,
            color: [1.0, 1.0, 1.0],
        }
    }
}

/// Constant-color environment behind the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub color: [f32; 3],
    pub strength: f32,
}
