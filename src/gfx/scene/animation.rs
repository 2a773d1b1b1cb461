//! Keyframe tracks attached to scene objects
//!
//! A track animates one scalar transform channel (for example the Z component of
//! an object's Euler rotation). Keyframes are kept sorted by frame and a frame
//! never appears twice: inserting at an existing frame replaces that sample.

use serde::{Deserialize, Serialize};

/// Transform axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }
}

/// The transform channel a track drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Location(Axis),
    Rotation(Axis),
    Scale(Axis),
}

impl Channel {
    pub fn is_rotation(&self) -> bool {
        matches!(self, Channel::Rotation(_))
    }
}

/// How values are interpolated between a keyframe and the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Interpolation {
    Constant,
    Linear,
    #[default]
    Bezier,
}

/// A single (frame, value) sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: f32,
    pub value: f32,
    pub interpolation: Interpolation,
}

/// Keyframes on one channel, strictly increasing in frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationTrack {
    channel: Channel,
    keyframes: Vec<Keyframe>,
}

impl AnimationTrack {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            keyframes: Vec::new(),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Inserts a keyframe, replacing any sample already at `frame`
    pub fn insert(&mut self, frame: f32, value: f32, interpolation: Interpolation) {
        let keyframe = Keyframe {
            frame,
            value,
            interpolation,
        };

        match self
            .keyframes
            .binary_search_by(|probe| probe.frame.total_cmp(&frame))
        {
            Ok(index) => self.keyframes[index] = keyframe,
            Err(index) => self.keyframes.insert(index, keyframe),
        }
    }

    /// Sets the interpolation mode of every keyframe
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        for keyframe in &mut self.keyframes {
            keyframe.interpolation = interpolation;
        }
    }

    /// First and last keyframe frames
    pub fn frame_range(&self) -> Option<(f32, f32)> {
        match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => Some((first.frame, last.frame)),
            _ => None,
        }
    }
}

/// All animation tracks carried by one object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationData {
    tracks: Vec<AnimationTrack>,
}

impl AnimationData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[AnimationTrack] {
        &self.tracks
    }

    pub fn track(&self, channel: Channel) -> Option<&AnimationTrack> {
        self.tracks.iter().find(|track| track.channel == channel)
    }

    /// Returns the track for `channel`, creating an empty one if needed
    pub fn track_mut(&mut self, channel: Channel) -> &mut AnimationTrack {
        let index = match self.tracks.iter().position(|track| track.channel == channel) {
            Some(index) => index,
            None => {
                self.tracks.push(AnimationTrack::new(channel));
                self.tracks.len() - 1
            }
        };
        &mut self.tracks[index]
    }

    /// Replaces the whole track on the track's channel
    pub fn replace_track(&mut self, track: AnimationTrack) {
        match self.tracks.iter_mut().find(|t| t.channel == track.channel) {
            Some(existing) => *existing = track,
            None => self.tracks.push(track),
        }
    }

    /// True when at least one track has keyframes
    pub fn has_keyframes(&self) -> bool {
        self.tracks.iter().any(|track| !track.is_empty())
    }

    /// Frame extent covered by all tracks
    pub fn frame_range(&self) -> Option<(f32, f32)> {
        self.tracks
            .iter()
            .filter_map(AnimationTrack::frame_range)
            .reduce(|(a_min, a_max), (b_min, b_max)| (a_min.min(b_min), a_max.max(b_max)))
    }
}
