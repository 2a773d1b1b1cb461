use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3};
use log::info;

use crate::config::LightingConfig;
use crate::gfx::{
    bounds::SceneBounds,
    scene::{Constraint, ObjectId, Scene, SceneObject},
};

use super::{LightData, World};

pub const KEY_NAME: &str = "TurntableKey";
pub const FILL_NAME: &str = "TurntableFill";
pub const RIM_NAME: &str = "TurntableRim";

/// What the planner did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingOutcome {
    /// The scene already carries authored lights
    Skipped,
    Synthesized {
        key: ObjectId,
        fill: ObjectId,
        rim: ObjectId,
    },
}

/// Builds a key/fill/rim rig scaled to the scene size
///
/// Area light power is derived from the key's irradiance so that each light
/// delivers `ratio * key_strength` at the scene center regardless of scene size.
pub struct LightingPlanner {
    config: LightingConfig,
}

impl Default for LightingPlanner {
    fn default() -> Self {
        Self::new(LightingConfig::default())
    }
}

impl LightingPlanner {
    pub fn new(config: LightingConfig) -> Self {
        Self { config }
    }

    pub fn key_offset(size: f32) -> Vector3<f32> {
        Vector3::new(size, -size, size)
    }

    pub fn fill_offset(size: f32) -> Vector3<f32> {
        Vector3::new(-size, -size, 0.5 * size)
    }

    pub fn rim_offset(size: f32) -> Vector3<f32> {
        Vector3::new(0.0, size, size)
    }

    /// Area light power reaching `ratio * key_strength` at `distance`
    fn area_power(&self, ratio: f32, distance: f32) -> f32 {
        ratio * self.config.key_strength * PI * distance * distance
    }

    /// Adds the world background and the 3-point rig
    ///
    /// Does nothing when the scene already has any light object.
    pub fn plan(&self, scene: &mut Scene, bounds: &SceneBounds, pivot: ObjectId) -> LightingOutcome {
        if scene.has_lights() {
            info!("Scene already provides lighting, keeping it");
            return LightingOutcome::Skipped;
        }

        let center = bounds.center();
        let size = bounds.placement_size();

        scene.world = Some(World {
            color: self.config.world_color,
            strength: self.config.world_strength,
        });

        let tilt = self.config.key_tilt_deg;
        let key = scene.add_object(
            SceneObject::light(KEY_NAME, LightData::sun(self.config.key_strength))
                .with_location(center + Self::key_offset(size))
                .with_rotation(Vector3::new(
                    tilt[0].to_radians(),
                    tilt[1].to_radians(),
                    tilt[2].to_radians(),
                )),
        );

        let fill_offset = Self::fill_offset(size);
        let fill = scene.add_object(
            SceneObject::light(
                FILL_NAME,
                LightData::area(
                    2.0 * size,
                    self.area_power(self.config.fill_ratio, fill_offset.magnitude()),
                ),
            )
            .with_location(center + fill_offset)
            .with_constraint(Constraint::track_to(pivot)),
        );

        let rim_offset = Self::rim_offset(size);
        let rim = scene.add_object(
            SceneObject::light(
                RIM_NAME,
                LightData::area(
                    size,
                    self.area_power(self.config.rim_ratio, rim_offset.magnitude()),
                ),
            )
            .with_location(center + rim_offset)
            .with_constraint(Constraint::track_to(pivot)),
        );

        info!("Added 3-point lighting scaled to size {:.2}", size);

        LightingOutcome::Synthesized { key, fill, rim }
    }
}
