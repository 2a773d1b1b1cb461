use std::f32::consts::TAU;

use log::{info, warn};

use crate::gfx::scene::{AnimationData, AnimationTrack, Axis, Channel, Interpolation, ObjectId, Scene};

/// Channel the turntable drives: rotation about the vertical axis
pub const TURNTABLE_CHANNEL: Channel = Channel::Rotation(Axis::Z);

/// Writes the turntable rotation onto the pivot
pub struct TurntableAnimator;

impl TurntableAnimator {
    /// Two linear samples: angle 0 at frame 1, `2π·rotations` at `frames + 1`
    ///
    /// The last sample sits one frame past the range so the final rendered frame
    /// is not a duplicate of the first.
    pub fn track(frames: u32, rotations: f32) -> AnimationTrack {
        let frames = frames.max(1);
        let mut track = AnimationTrack::new(TURNTABLE_CHANNEL);
        track.insert(1.0, 0.0, Interpolation::Linear);
        track.insert((frames + 1) as f32, TAU * rotations, Interpolation::Linear);
        track
    }

    /// Replaces the pivot's Z rotation track; returns false when there is no pivot
    pub fn animate(scene: &mut Scene, pivot: Option<ObjectId>, frames: u32, rotations: f32) -> bool {
        let Some(object) = pivot.and_then(|id| scene.object_mut(id)) else {
            warn!("No pivot to animate, skipping turntable");
            return false;
        };

        object
            .animation
            .get_or_insert_with(AnimationData::new)
            .replace_track(Self::track(frames, rotations));

        info!(
            "Turntable: {} rotation(s) over {} frames on '{}'",
            rotations,
            frames.max(1),
            object.name
        );
        true
    }
}
