use std::path::Path;

use log::{debug, warn};

use crate::error::ImportError;
use crate::gfx::{
    geometry::GeometryData,
    resources::Material,
    scene::{Scene, SceneObject, SceneOrigin},
};

use super::Importer;

/// Wavefront OBJ importer
///
/// Each OBJ model becomes one mesh object. Materials come from the MTL
/// library when present; a missing MTL file is not an error.
pub struct ObjImporter;

/// OBJ files are Y-up; rotate +90° about X into Z-up
fn y_up_to_z_up(position: [f32; 3]) -> [f32; 3] {
    [position[0], -position[2], position[1]]
}

impl Importer for ObjImporter {
    fn extensions(&self) -> &[&'static str] {
        &["obj"]
    }

    fn import(&self, path: &Path) -> Result<Scene, ImportError> {
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;

        let materials = materials.unwrap_or_else(|err| {
            warn!("No usable MTL library ({}), meshes keep no materials", err);
            Vec::new()
        });

        let mut scene = Scene::new(SceneOrigin::Imported);

        let mut material_names = Vec::with_capacity(materials.len());
        for (i, mtl) in materials.iter().enumerate() {
            let material_name = if mtl.name.is_empty() {
                format!("material_{}", i)
            } else {
                mtl.name.clone()
            };
            material_names.push(material_name.clone());

            if scene.material_manager.get_material(&material_name).is_some() {
                continue;
            }

            let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
            scene.add_material(Material::new(
                &material_name,
                [diffuse[0], diffuse[1], diffuse[2], mtl.dissolve.unwrap_or(1.0)],
                0.0,
                // Shininess to roughness
                1.0 - (mtl.shininess.unwrap_or(32.0) / 128.0).clamp(0.0, 1.0),
            ));
        }

        for (i, model) in models.iter().enumerate() {
            let mesh = &model.mesh;
            let mut geometry =
                GeometryData::from_flat_positions(&mesh.positions, mesh.indices.clone());
            for vertex in geometry.vertices.iter_mut() {
                *vertex = y_up_to_z_up(*vertex);
            }

            let assigned = mesh
                .material_id
                .and_then(|id| material_names.get(id).cloned())
                .into_iter()
                .collect();

            let name = if model.name.is_empty() {
                format!("Object_{}", i)
            } else {
                model.name.clone()
            };

            debug!(
                "OBJ model '{}': {} vertices, {} triangles",
                name,
                geometry.vertex_count(),
                geometry.triangle_count()
            );

            scene.add_object(SceneObject::mesh(name, geometry.to_mesh_data(assigned)));
        }

        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::bounds::BoundsComputer;
    use cgmath::Vector3;
    use std::fs;
    use std::path::PathBuf;

    fn write_files(stem: &str, obj: &str, mtl: Option<&str>) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("turntable_obj_{}_{}", stem, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        if let Some(mtl) = mtl {
            fs::write(dir.join(format!("{stem}.mtl")), mtl).unwrap();
        }
        let path = dir.join(format!("{stem}.obj"));
        fs::write(&path, obj).unwrap();
        path
    }

    #[test]
    fn test_obj_with_materials() {
        let obj = "mtllib card.mtl\n\
                   o Card_Front\n\
                   v 0 0 0\nv 2 0 0\nv 2 4 0\nv 0 4 1\n\
                   usemtl 正面_mat\n\
                   f 1 2 3\nf 1 3 4\n";
        let mtl = "newmtl 正面_mat\nKd 1.0 0.5 0.25\nNs 128\n";
        let path = write_files("card", obj, Some(mtl));

        let scene = ObjImporter.import(&path).unwrap();

        assert_eq!(scene.objects.len(), 1);
        assert_eq!(scene.objects[0].name, "Card_Front");
        assert_eq!(scene.objects[0].material_names(), &["正面_mat".to_string()]);
        let material = scene.material_manager.get_material("正面_mat").unwrap();
        assert_eq!(material.base_color, [1.0, 0.5, 0.25, 1.0]);
        assert_eq!(material.roughness, 0.0);

        // Y-up height becomes Z-up height; OBJ +Z faces -Y
        let bounds = BoundsComputer::compute(&scene, &scene.mesh_ids());
        assert_eq!(bounds.min, Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(bounds.max, Vector3::new(2.0, 0.0, 4.0));
    }

    #[test]
    fn test_missing_mtl_is_not_fatal() {
        let obj = "mtllib missing.mtl\no Box\nv 0 0 0\nv 1 0 0\nv 1 1 0\nusemtl nowhere\nf 1 2 3\n";
        let path = write_files("nomtl", obj, None);

        let scene = ObjImporter.import(&path).unwrap();

        assert_eq!(scene.mesh_ids().len(), 1);
        assert!(scene.objects[0].material_names().is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(matches!(
            ObjImporter.import(Path::new("/no/such/model.obj")),
            Err(ImportError::Obj(_))
        ));
    }
}
