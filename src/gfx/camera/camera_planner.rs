//! Adaptive camera placement
//!
//! The camera is placed straight in front of the scene, at the height of its
//! center, at a distance proportional to the scene size. A track-to constraint
//! keeps it aimed at the pivot, or at a focus empty in the middle of the whole
//! scene when background content must stay in frame.

use cgmath::Vector3;
use log::{info, warn};

use crate::config::CameraConfig;
use crate::gfx::{
    bounds::SceneBounds,
    scene::{Constraint, ObjectId, ObjectKind, Scene, SceneObject},
};

use super::camera_utils::{look_rotation, CameraData};

/// Name of the synthesized camera
pub const CAMERA_NAME: &str = "TurntableCamera";
/// Name of the look-at target used when background content exists
pub const FOCUS_NAME: &str = "TurntableFocus";

/// What the planner did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraOutcome {
    /// The scene's active camera was kept as is
    Reused(ObjectId),
    /// No active camera was set; an existing camera object was made active
    Promoted(ObjectId),
    /// A new camera was created, aimed at `target`
    Synthesized { camera: ObjectId, target: ObjectId },
}

impl CameraOutcome {
    pub fn camera(&self) -> ObjectId {
        match *self {
            CameraOutcome::Reused(id) | CameraOutcome::Promoted(id) => id,
            CameraOutcome::Synthesized { camera, .. } => camera,
        }
    }
}

pub struct CameraPlanner {
    focal_length_mm: f32,
    distance_factor: f32,
}

impl Default for CameraPlanner {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl CameraPlanner {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            focal_length_mm: config.focal_length_mm,
            distance_factor: config.distance_factor,
        }
    }

    /// Camera location for the given framing
    pub fn camera_location(&self, framing: &SceneBounds) -> Vector3<f32> {
        framing.center() + Vector3::new(0.0, -self.distance_factor * framing.placement_size(), 0.0)
    }

    /// Ensures the scene has an active camera
    ///
    /// # Arguments
    /// * `framing` - Bounds of everything that must stay in frame (subject and background)
    /// * `pivot` - The turntable pivot, the default look-at target
    /// * `has_background` - Whether background content exists; the camera then
    ///   aims at a focus empty at the framing center instead of the pivot
    pub fn plan(
        &self,
        scene: &mut Scene,
        framing: &SceneBounds,
        pivot: Option<ObjectId>,
        has_background: bool,
    ) -> CameraOutcome {
        if let Some(active) = scene.active_camera {
            if scene
                .object(active)
                .is_some_and(|obj| obj.kind() == ObjectKind::Camera)
            {
                info!("Reusing active camera '{}'", scene.objects[active.index()].name);
                return CameraOutcome::Reused(active);
            }
            warn!("Active camera handle does not point at a camera, ignoring it");
        }

        if let Some(&first) = scene.ids_of_kind(ObjectKind::Camera).first() {
            warn!(
                "No active camera set, using '{}'",
                scene.objects[first.index()].name
            );
            scene.active_camera = Some(first);
            return CameraOutcome::Promoted(first);
        }

        let target = match pivot {
            Some(pivot) if !has_background => pivot,
            _ => scene.add_object(SceneObject::empty(FOCUS_NAME).with_location(framing.center())),
        };

        let location = self.camera_location(framing);
        let camera = scene.add_object(
            SceneObject::camera(CAMERA_NAME, CameraData::with_lens(self.focal_length_mm))
                .with_location(location)
                .with_rotation(look_rotation(framing.center() - location))
                .with_constraint(Constraint::track_to(target)),
        );
        scene.active_camera = Some(camera);

        info!(
            "Camera placed at ({:.2}, {:.2}, {:.2}) with {}mm lens",
            location.x, location.y, location.z, self.focal_length_mm
        );

        CameraOutcome::Synthesized { camera, target }
    }
}
