//! # Pivot Rig
//!
//! The turntable rotates a single empty, the pivot, placed at the center of the
//! subject. Subject roots are parented under it with keep-transform semantics,
//! so they do not move when the rig is built and follow the pivot's rotation
//! afterwards. Subjects nested under another subject ride along with it.
//!
//! The pivot's location is set once, when it is created, and never changed.

use cgmath::Vector3;
use log::{debug, info, warn};

use crate::error::SceneError;
use crate::gfx::scene::{ObjectId, ObjectKind, Scene, SceneObject};

/// Name of the pivot empty
pub const PIVOT_NAME: &str = "TurntablePivot";

/// `TurntablePivot` or the `TurntablePivot (n)` name a pivot gets when a
/// different object already holds the plain one
fn is_pivot_name(name: &str) -> bool {
    name == PIVOT_NAME
        || name
            .strip_prefix(PIVOT_NAME)
            .and_then(|rest| rest.strip_prefix(" ("))
            .and_then(|rest| rest.strip_suffix(')'))
            .is_some_and(|n| n.parse::<u32>().is_ok())
}

pub struct PivotRig;

impl PivotRig {
    /// Pivot empties already in the scene, exact name first
    pub fn candidates(scene: &Scene) -> Vec<ObjectId> {
        let mut found: Vec<ObjectId> = scene
            .ids()
            .filter(|&id| {
                let object = &scene.objects[id.index()];
                object.kind() == ObjectKind::Empty && is_pivot_name(&object.name)
            })
            .collect();
        found.sort_by_key(|&id| scene.objects[id.index()].name != PIVOT_NAME);
        found
    }

    /// Existing pivot empty, if the scene already has one
    pub fn find(scene: &Scene) -> Option<ObjectId> {
        Self::candidates(scene).into_iter().next()
    }

    /// First ancestor of `id` that already moves it: the pivot, another subject,
    /// or (when animation is kept) an animated object
    fn carried_by(
        scene: &Scene,
        id: ObjectId,
        subject: &[ObjectId],
        pivot: ObjectId,
        preserve_animation: bool,
    ) -> Option<ObjectId> {
        let mut current = scene.object(id).and_then(|obj| obj.parent);
        let mut depth = 0;

        while let Some(ancestor) = current {
            let object = scene.object(ancestor)?;
            if ancestor == pivot
                || subject.contains(&ancestor)
                || (preserve_animation && object.is_animated())
            {
                return Some(ancestor);
            }
            if depth >= scene.objects.len() {
                break;
            }
            current = object.parent;
            depth += 1;
        }

        None
    }

    /// Creates or reuses the pivot and parents the subject roots under it
    ///
    /// An existing pivot that sits inside the subject hierarchy is not reused,
    /// since rotating it would rotate itself.
    ///
    /// # Arguments
    /// * `subject` - Objects the turntable rotates
    /// * `center` - Subject bounds center, used only when the pivot is created
    /// * `preserve_animation` - When false, authored animation on the subject is
    ///   removed so it does not compete with the turntable. When true, subjects
    ///   under an animated parent stay there and keep following it.
    pub fn build(
        scene: &mut Scene,
        subject: &[ObjectId],
        center: Vector3<f32>,
        preserve_animation: bool,
    ) -> Result<ObjectId, SceneError> {
        let reusable = Self::candidates(scene).into_iter().find(|&pivot| {
            let inside = subject.iter().any(|&id| scene.is_ancestor(id, pivot));
            if inside {
                warn!(
                    "'{}' is inside the subject hierarchy, not reusing it",
                    scene.objects[pivot.index()].name
                );
            }
            !inside
        });

        let pivot = match reusable {
            Some(pivot) => {
                info!("Reusing existing pivot '{}'", scene.objects[pivot.index()].name);
                pivot
            }
            None => {
                let pivot = scene.add_object(SceneObject::empty(PIVOT_NAME).with_location(center));
                let name = &scene.objects[pivot.index()].name;
                if name != PIVOT_NAME {
                    warn!("'{}' is already taken, pivot named '{}'", PIVOT_NAME, name);
                }
                info!(
                    "Pivot created at ({:.3}, {:.3}, {:.3})",
                    center.x, center.y, center.z
                );
                pivot
            }
        };

        if !preserve_animation {
            for &id in subject {
                let object = scene
                    .object_mut(id)
                    .ok_or(SceneError::UnknownObject(id.index()))?;
                if object.animation.take().is_some() {
                    debug!("Cleared animation on '{}'", object.name);
                }
            }
        }

        for &id in subject {
            if let Some(carrier) = Self::carried_by(scene, id, subject, pivot, preserve_animation) {
                debug!(
                    "'{}' follows '{}', leaving its parent as is",
                    scene.objects[id.index()].name,
                    scene.objects[carrier.index()].name
                );
                continue;
            }
            scene.set_parent_keep_transform(id, pivot)?;
        }

        Ok(pivot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::bounds::BoundsComputer;
    use crate::gfx::scene::{AnimationData, Axis, Channel, Interpolation, MeshData};
    use cgmath::{InnerSpace, Matrix4, Rad};

    fn mesh_at(scene: &mut Scene, name: &str, location: Vector3<f32>) -> ObjectId {
        scene.add_object(
            SceneObject::mesh(name, MeshData::from_extents([-0.5; 3], [0.5; 3], Vec::new()))
                .with_location(location),
        )
    }

    fn assert_matrix_close(a: Matrix4<f32>, b: Matrix4<f32>) {
        let a: &[f32; 16] = a.as_ref();
        let b: &[f32; 16] = b.as_ref();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-4, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_pivot_sits_at_subject_center_ignoring_background() {
        let mut scene = Scene::default();
        let a = mesh_at(&mut scene, "A", Vector3::new(2.0, 0.0, 0.0));
        let b = mesh_at(&mut scene, "B", Vector3::new(4.0, 2.0, 1.0));
        mesh_at(&mut scene, "VEN_floor", Vector3::new(-50.0, -50.0, -10.0));

        let center = BoundsComputer::compute(&scene, &[a, b]).center();
        let pivot = PivotRig::build(&mut scene, &[a, b], center, false).unwrap();

        assert_eq!(scene.objects[pivot.index()].transform.location, Vector3::new(3.0, 1.0, 0.5));
    }

    #[test]
    fn test_reparenting_keeps_world_pose() {
        let mut scene = Scene::default();
        let a = scene.add_object(
            SceneObject::mesh("A", MeshData::from_extents([-1.0; 3], [1.0; 3], Vec::new()))
                .with_location(Vector3::new(1.0, -2.0, 3.0))
                .with_rotation(Vector3::new(0.3, 0.0, 1.2))
                .with_scale(Vector3::new(2.0, 2.0, 2.0)),
        );
        let before = scene.world_matrix(a);

        let pivot = PivotRig::build(&mut scene, &[a], Vector3::new(5.0, 5.0, 5.0), false).unwrap();

        assert_eq!(scene.objects[a.index()].parent, Some(pivot));
        assert_matrix_close(before, scene.world_matrix(a));
    }

    #[test]
    fn test_pivot_rotation_moves_children() {
        let mut scene = Scene::default();
        let a = mesh_at(&mut scene, "A", Vector3::new(1.0, 0.0, 0.0));
        let pivot = PivotRig::build(&mut scene, &[a], Vector3::new(0.0, 0.0, 0.0), false).unwrap();

        scene.objects[pivot.index()].transform.rotation.z = std::f32::consts::FRAC_PI_2;

        assert_matrix_close(
            scene.world_matrix(a),
            Matrix4::from_angle_z(Rad(std::f32::consts::FRAC_PI_2))
                * Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0)),
        );
    }

    #[test]
    fn test_existing_pivot_is_reused_and_not_moved() {
        let mut scene = Scene::default();
        let existing =
            scene.add_object(SceneObject::empty(PIVOT_NAME).with_location(Vector3::new(0.0, 0.0, 1.0)));
        let a = mesh_at(&mut scene, "A", Vector3::new(3.0, 0.0, 0.0));

        let pivot = PivotRig::build(&mut scene, &[a], Vector3::new(3.0, 0.0, 0.0), false).unwrap();
        let again = PivotRig::build(&mut scene, &[a], Vector3::new(9.0, 9.0, 9.0), false).unwrap();

        assert_eq!(pivot, existing);
        assert_eq!(again, existing);
        assert_eq!(scene.objects[existing.index()].transform.location, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(scene.ids_of_kind(ObjectKind::Empty).len(), 1);
    }

    #[test]
    fn test_animation_cleared_unless_preserved() {
        let mut animation = AnimationData::new();
        animation
            .track_mut(Channel::Rotation(Axis::Z))
            .insert(1.0, 0.0, Interpolation::Bezier);

        let mut scene = Scene::default();
        let a = mesh_at(&mut scene, "A", Vector3::new(0.0, 0.0, 0.0));
        scene.objects[a.index()].animation = Some(animation.clone());
        PivotRig::build(&mut scene, &[a], Vector3::new(0.0, 0.0, 0.0), true).unwrap();
        assert!(scene.objects[a.index()].is_animated());

        let mut scene = Scene::default();
        let a = mesh_at(&mut scene, "A", Vector3::new(0.0, 0.0, 0.0));
        scene.objects[a.index()].animation = Some(animation);
        PivotRig::build(&mut scene, &[a], Vector3::new(0.0, 0.0, 0.0), false).unwrap();
        assert!(!scene.objects[a.index()].is_animated());
    }

    #[test]
    fn test_child_of_animated_parent_keeps_following_it() {
        let mut scene = Scene::default();
        let root = scene.add_object(SceneObject::empty("Root"));
        let mut slide = AnimationData::new();
        let track = slide.track_mut(Channel::Location(Axis::X));
        track.insert(1.0, 0.0, Interpolation::Linear);
        track.insert(48.0, 5.0, Interpolation::Linear);
        scene.objects[root.index()].animation = Some(slide);

        let wheel = mesh_at(&mut scene, "Wheel", Vector3::new(1.0, 0.0, 0.0));
        scene.objects[wheel.index()].parent = Some(root);

        PivotRig::build(&mut scene, &[wheel], Vector3::new(1.0, 0.0, 0.0), true).unwrap();
        assert_eq!(scene.objects[wheel.index()].parent, Some(root));

        // Root evaluated at its last key
        scene.objects[root.index()].transform.location.x = 5.0;
        let origin = scene.world_matrix(wheel).w.truncate();
        assert!((origin - Vector3::new(6.0, 0.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_only_subject_roots_are_reparented() {
        let mut scene = Scene::default();
        let body = mesh_at(&mut scene, "Body", Vector3::new(1.0, 0.0, 0.0));
        let door = mesh_at(&mut scene, "Door", Vector3::new(0.0, 1.0, 0.0));
        scene.objects[door.index()].parent = Some(body);
        let door_before = scene.world_matrix(door);

        let pivot =
            PivotRig::build(&mut scene, &[body, door], Vector3::new(0.0, 0.0, 0.0), false).unwrap();

        assert_eq!(scene.objects[body.index()].parent, Some(pivot));
        assert_eq!(scene.objects[door.index()].parent, Some(body));
        assert_matrix_close(door_before, scene.world_matrix(door));

        scene.objects[pivot.index()].transform.rotation.z = std::f32::consts::FRAC_PI_2;
        assert_matrix_close(
            scene.world_matrix(door),
            Matrix4::from_angle_z(Rad(std::f32::consts::FRAC_PI_2)) * door_before,
        );
    }

    #[test]
    fn test_pivot_name_taken_by_a_mesh() {
        let mut scene = Scene::default();
        mesh_at(&mut scene, PIVOT_NAME, Vector3::new(0.0, 0.0, 0.0));
        let a = mesh_at(&mut scene, "A", Vector3::new(2.0, 0.0, 0.0));

        let pivot = PivotRig::build(&mut scene, &[a], Vector3::new(2.0, 0.0, 0.0), false).unwrap();
        let again = PivotRig::build(&mut scene, &[a], Vector3::new(2.0, 0.0, 0.0), false).unwrap();

        assert_eq!(scene.objects[pivot.index()].name, "TurntablePivot (1)");
        assert_eq!(again, pivot);
        assert_eq!(scene.ids_of_kind(ObjectKind::Empty).len(), 1);
    }

    #[test]
    fn test_pivot_inside_subject_is_not_reused() {
        let mut scene = Scene::default();
        let a = mesh_at(&mut scene, "A", Vector3::new(2.0, 0.0, 0.0));
        let stale = scene.add_object(SceneObject::empty(PIVOT_NAME));
        scene.objects[stale.index()].parent = Some(a);

        let pivot = PivotRig::build(&mut scene, &[a], Vector3::new(2.0, 0.0, 0.0), false).unwrap();

        assert_ne!(pivot, stale);
        assert_eq!(scene.objects[a.index()].parent, Some(pivot));
        assert_eq!(scene.objects[pivot.index()].transform.location, Vector3::new(2.0, 0.0, 0.0));
    }
}
