//! Preserve-or-synthesize decision
//!
//! A pre-authored scene may already animate its subject. When the caller did not
//! ask for a specific rotation count, that animation is kept and the turntable is
//! not synthesized. The frame count then comes from the scene's declared frame
//! range, unless that range looks unconfigured, in which case the authored
//! keyframe extent is used. Either way the first frame is kept so the authored
//! motion is played from where it starts.

use log::info;

use crate::config::AnimationConfig;
use crate::gfx::scene::{ObjectId, Scene};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationPlan {
    /// Keep authored animation over `frames` frames from `start`
    Preserve { start: i32, frames: u32 },
    /// Write a turntable track with `rotations` full turns
    Synthesize { rotations: f32 },
}

impl AnimationPlan {
    pub fn preserves(&self) -> bool {
        matches!(self, AnimationPlan::Preserve { .. })
    }
}

pub struct AnimationDetector {
    min_declared_frames: u32,
    default_rotations: f32,
}

impl Default for AnimationDetector {
    fn default() -> Self {
        Self::new(&AnimationConfig::default())
    }
}

impl AnimationDetector {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            min_declared_frames: config.min_declared_frames,
            default_rotations: config.default_rotations,
        }
    }

    /// First keyframe of the subject and the frames spanned, first to last inclusive
    pub fn authored_extent(scene: &Scene, subject: &[ObjectId]) -> Option<(i32, u32)> {
        subject
            .iter()
            .filter_map(|&id| scene.object(id)?.animation.as_ref()?.frame_range())
            .reduce(|(a_min, a_max), (b_min, b_max)| (a_min.min(b_min), a_max.max(b_max)))
            .map(|(first, last)| {
                (first.round() as i32, (last - first).round().max(0.0) as u32 + 1)
            })
    }

    /// Decides the plan for this run
    ///
    /// # Arguments
    /// * `requested_rotations` - `None` or a negative value means unspecified
    pub fn detect(
        &self,
        scene: &Scene,
        subject: &[ObjectId],
        requested_rotations: Option<f32>,
    ) -> AnimationPlan {
        if let Some(rotations) = requested_rotations.filter(|r| *r >= 0.0) {
            return AnimationPlan::Synthesize { rotations };
        }

        let animated = subject
            .iter()
            .any(|&id| scene.object(id).is_some_and(|obj| obj.is_animated()));

        let extent = Self::authored_extent(scene, subject);
        match extent {
            Some((first, extent)) if animated => {
                let declared = scene.declared_frame_count();
                let (start, frames) = if declared >= self.min_declared_frames {
                    (scene.frame_start, declared)
                } else {
                    info!(
                        "Declared frame range ({} frames) looks unconfigured, using authored extent",
                        declared
                    );
                    (first, extent)
                };
                info!(
                    "Preserving authored animation over {} frames from frame {}",
                    frames, start
                );
                AnimationPlan::Preserve { start, frames }
            }
            _ => AnimationPlan::Synthesize {
                rotations: self.default_rotations,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{AnimationData, Axis, Channel, Interpolation, MeshData, SceneObject};

    fn animated_scene(first: f32, last: f32) -> (Scene, ObjectId) {
        let mut animation = AnimationData::new();
        let track = animation.track_mut(Channel::Rotation(Axis::Z));
        track.insert(first, 0.0, Interpolation::Bezier);
        track.insert(last, 6.28, Interpolation::Bezier);

        let mut scene = Scene::default();
        let mut object =
            SceneObject::mesh("Card", MeshData::from_extents([-1.0; 3], [1.0; 3], Vec::new()));
        object.animation = Some(animation);
        let id = scene.add_object(object);
        (scene, id)
    }

    #[test]
    fn test_degenerate_range_falls_back_to_authored_extent() {
        let (mut scene, card) = animated_scene(1.0, 200.0);
        scene.frame_start = 1;
        scene.frame_end = 1;

        let plan = AnimationDetector::default().detect(&scene, &[card], None);

        assert_eq!(plan, AnimationPlan::Preserve { start: 1, frames: 200 });
    }

    #[test]
    fn test_configured_range_wins_over_extent() {
        let (mut scene, card) = animated_scene(1.0, 200.0);
        scene.frame_start = 1;
        scene.frame_end = 96;

        let plan = AnimationDetector::default().detect(&scene, &[card], Some(-1.0));

        assert_eq!(plan, AnimationPlan::Preserve { start: 1, frames: 96 });
    }

    #[test]
    fn test_explicit_rotations_always_synthesize() {
        let (scene, card) = animated_scene(1.0, 200.0);

        let plan = AnimationDetector::default().detect(&scene, &[card], Some(2.0));

        assert_eq!(plan, AnimationPlan::Synthesize { rotations: 2.0 });
    }

    #[test]
    fn test_unanimated_subject_synthesizes_default() {
        let mut scene = Scene::default();
        let card = scene.add_object(SceneObject::mesh(
            "Card",
            MeshData::from_extents([-1.0; 3], [1.0; 3], Vec::new()),
        ));

        let plan = AnimationDetector::default().detect(&scene, &[card], None);

        assert_eq!(plan, AnimationPlan::Synthesize { rotations: 1.0 });
    }

    #[test]
    fn test_animation_outside_subject_is_ignored() {
        let (scene, _card) = animated_scene(1.0, 200.0);

        let plan = AnimationDetector::default().detect(&scene, &[], None);

        assert!(!plan.preserves());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let (mut scene, card) = animated_scene(10.0, 59.0);
        scene.frame_start = 1;
        scene.frame_end = 5;
        let detector = AnimationDetector::new(&AnimationConfig {
            min_declared_frames: 24,
            ..AnimationConfig::default()
        });

        assert_eq!(
            detector.detect(&scene, &[card], None),
            AnimationPlan::Preserve { start: 10, frames: 50 }
        );
    }

    #[test]
    fn test_preserve_keeps_the_authored_start() {
        let (mut scene, card) = animated_scene(10.0, 100.0);
        scene.frame_start = 10;
        scene.frame_end = 100;

        let plan = AnimationDetector::default().detect(&scene, &[card], None);

        assert_eq!(plan, AnimationPlan::Preserve { start: 10, frames: 91 });
    }
}
