use std::fmt;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::animation::{AnimationDetector, AnimationPlan, TurntableAnimator};
use crate::classify::{Classification, ObjectClassifier, TextureTarget};
use crate::config::{CliOptions, PipelineConfig};
use crate::error::{ImportError, RenderError, TurntableError};
use crate::gfx::{
    bounds::BoundsComputer,
    camera::{CameraOutcome, CameraPlanner},
    geometry::add_fallback_cube,
    lighting::{LightingOutcome, LightingPlanner},
    rendering::{select_backend, RenderBackend, RenderJob, Renderer},
    scene::{ObjectId, ObjectKind, Scene, SceneOrigin},
};
use crate::io::{GltfImporter, ImporterRegistry, ObjImporter, ProjectImporter};
use crate::rig::PivotRig;
use crate::texturing::{MaterialTextureResolver, TextureReport};

/// What the caller wants out of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderRequest {
    pub output: PathBuf,
    pub textures: Vec<(TextureTarget, PathBuf)>,
    /// Explicit frame count; `None` means auto
    pub frames: Option<u32>,
    /// Explicit rotation count; `None` means auto-detect
    pub rotations: Option<f32>,
    /// Render a single frame
    pub test: bool,
}

impl From<&CliOptions> for RenderRequest {
    fn from(options: &CliOptions) -> Self {
        Self {
            output: options.output.clone(),
            textures: options.textures.clone(),
            frames: options.frames,
            rotations: options.rotations,
            test: options.test,
        }
    }
}

/// Everything the pipeline decided while staging a scene
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub classification: Classification,
    /// Set when the scene had no mesh and a primitive was added
    pub fallback_primitive: Option<ObjectId>,
    pub pivot: ObjectId,
    pub camera: CameraOutcome,
    pub lighting: LightingOutcome,
    pub textures: Vec<TextureReport>,
    pub animation: AnimationPlan,
    /// Final frame count handed to the renderer
    pub frames: u32,
    pub backend: Option<RenderBackend>,
}

/// The turntable pipeline: import, stage, render
pub struct TurntableApp {
    config: PipelineConfig,
    importers: ImporterRegistry,
    classifier: ObjectClassifier,
    resolver: MaterialTextureResolver,
}

impl Default for TurntableApp {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl TurntableApp {
    pub fn new(config: PipelineConfig) -> Self {
        let mut importers = ImporterRegistry::new();
        importers.register(Box::new(ObjImporter));
        importers.register(Box::new(GltfImporter { fps: config.fps }));
        importers.register(Box::new(ProjectImporter));

        Self {
            config,
            importers,
            classifier: ObjectClassifier::default(),
            resolver: MaterialTextureResolver::default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Imports the input file
    pub fn load(&self, input: &Path) -> Result<Scene, ImportError> {
        self.importers.import(input)
    }

    /// Frame count for the run
    ///
    /// In order: `--test`, an explicit count, preserved animation, a project's
    /// own frame range when it looks configured, then the default.
    pub fn resolve_frames(&self, scene: &Scene, request: &RenderRequest, plan: &AnimationPlan) -> u32 {
        if request.test {
            return 1;
        }
        if let Some(frames) = request.frames.filter(|&frames| frames > 0) {
            return frames;
        }
        if let AnimationPlan::Preserve { frames, .. } = *plan {
            return frames.max(1);
        }
        if scene.origin == SceneOrigin::Project {
            let declared = scene.declared_frame_count();
            if declared >= self.config.animation.min_declared_frames {
                return declared;
            }
        }
        self.config.default_frames.max(1)
    }

    /// Runs every staging step on `scene`, leaving it ready for the renderer
    pub fn stage(&self, scene: &mut Scene, request: &RenderRequest) -> Result<PipelineReport, TurntableError> {
        let fallback_primitive = if scene.mesh_ids().is_empty() {
            warn!("Scene has no meshes, adding a fallback cube");
            Some(add_fallback_cube(scene))
        } else {
            None
        };

        let classification = self.classifier.classify(scene);
        info!(
            "Classified {} subject and {} background object(s)",
            classification.subject.len(),
            classification.background.len()
        );

        // Detect before rigging: the rig clears authored animation it does not keep
        let animation = AnimationDetector::new(&self.config.animation).detect(
            scene,
            &classification.subject,
            request.rotations,
        );

        let subject_bounds = BoundsComputer::compute(scene, &classification.subject);
        let pivot = PivotRig::build(
            scene,
            &classification.subject,
            subject_bounds.center(),
            animation.preserves(),
        )?;

        let framing = BoundsComputer::compute(scene, &classification.all());
        info!(
            "Scene center ({:.3}, {:.3}, {:.3}), size {:.3}",
            framing.center().x,
            framing.center().y,
            framing.center().z,
            framing.size()
        );

        let camera = CameraPlanner::new(&self.config.camera).plan(
            scene,
            &framing,
            Some(pivot),
            classification.has_background(),
        );
        let lighting = LightingPlanner::new(self.config.lighting).plan(scene, &framing, pivot);

        let mut textures = Vec::new();
        for (target, path) in &request.textures {
            match self.resolver.apply(scene, path, *target) {
                Ok(report) => textures.push(report),
                Err(err) => warn!("Skipping {} texture: {}", target.label(), err),
            }
        }

        let frames = self.resolve_frames(scene, request, &animation);
        match animation {
            AnimationPlan::Synthesize { rotations } => {
                TurntableAnimator::animate(scene, Some(pivot), frames, rotations);
            }
            AnimationPlan::Preserve { .. } => info!("Keeping authored animation"),
        }

        // The turntable track is keyed from frame 1; authored motion keeps its own start
        let start = match animation {
            AnimationPlan::Preserve { start, .. } => start,
            AnimationPlan::Synthesize { .. } => 1,
        };
        scene.frame_start = start;
        scene.frame_end = start + frames as i32 - 1;
        if scene.origin == SceneOrigin::Imported {
            scene.fps = self.config.fps;
        }
        scene.output.path = request.output.clone();
        scene.output.force_video_contract();

        info!(
            "Frame range {}-{} at {} fps",
            scene.frame_start, scene.frame_end, scene.fps
        );

        Ok(PipelineReport {
            classification,
            fallback_primitive,
            pivot,
            camera,
            lighting,
            textures,
            animation,
            frames,
            backend: None,
        })
    }

    /// Imports, stages and renders
    pub fn run(
        &self,
        input: &Path,
        request: &RenderRequest,
        renderer: &dyn Renderer,
    ) -> Result<PipelineReport, TurntableError> {
        let scene = self.load(input)?;
        self.render(scene, request, renderer)
    }

    /// Like [`run`](Self::run), but looks the renderer up only after the input
    /// has imported, so input errors are reported first
    pub fn run_with<R, F>(
        &self,
        input: &Path,
        request: &RenderRequest,
        locate: F,
    ) -> Result<PipelineReport, TurntableError>
    where
        R: Renderer,
        F: FnOnce() -> Result<R, RenderError>,
    {
        let scene = self.load(input)?;
        let renderer = locate()?;
        self.render(scene, request, &renderer)
    }

    /// Stages an imported scene and renders it
    pub fn render(
        &self,
        mut scene: Scene,
        request: &RenderRequest,
        renderer: &dyn Renderer,
    ) -> Result<PipelineReport, TurntableError> {
        let mut report = self.stage(&mut scene, request)?;

        report.backend = select_backend(renderer, &RenderBackend::PREFERENCE);
        let job = RenderJob::from_scene(&scene, report.backend);

        info!("Rendering {} frames with {}", job.frame_count(), renderer.name());
        renderer.render(&scene, &job)?;
        info!("Output: {}", job.output.path.display());

        Ok(report)
    }
}

/// Scene settings printed by `--inspect`
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub origin: SceneOrigin,
    pub frame_start: i32,
    pub frame_end: i32,
    pub fps: u32,
    pub active_camera: Option<String>,
    pub object_count: usize,
    pub mesh_count: usize,
    pub camera_count: usize,
    pub light_count: usize,
    pub material_count: usize,
    pub container: &'static str,
    pub codec: &'static str,
}

impl SceneSummary {
    pub fn of(scene: &Scene) -> Self {
        let stats = scene.get_statistics();
        Self {
            origin: scene.origin,
            frame_start: scene.frame_start,
            frame_end: scene.frame_end,
            fps: scene.fps,
            active_camera: scene
                .active_camera
                .and_then(|id| scene.object(id))
                .filter(|obj| obj.kind() == ObjectKind::Camera)
                .map(|obj| obj.name.clone()),
            object_count: stats.object_count,
            mesh_count: stats.mesh_count,
            camera_count: stats.camera_count,
            light_count: stats.light_count,
            material_count: stats.material_count,
            container: scene.output.container.identifier(),
            codec: scene.output.codec.identifier(),
        }
    }
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Origin:        {:?}", self.origin)?;
        writeln!(
            f,
            "Frame range:   {}-{} ({} fps)",
            self.frame_start, self.frame_end, self.fps
        )?;
        writeln!(
            f,
            "Active camera: {}",
            self.active_camera.as_deref().unwrap_or("(none)")
        )?;
        writeln!(
            f,
            "Objects:       {} ({} meshes, {} cameras, {} lights)",
            self.object_count, self.mesh_count, self.camera_count, self.light_count
        )?;
        writeln!(f, "Materials:     {}", self.material_count)?;
        write!(f, "Output:        {} / {}", self.container, self.codec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::CameraData,
        lighting::LightData,
        rendering::{Container, VideoCodec},
        resources::Material,
        scene::{AnimationData, Axis, Channel, Interpolation, MeshData, SceneObject},
    };
    use crate::animation::TURNTABLE_CHANNEL;
    use std::cell::RefCell;
    use std::f32::consts::TAU;

    fn request() -> RenderRequest {
        RenderRequest {
            output: PathBuf::from("/tmp/turntable_test.mp4"),
            ..RenderRequest::default()
        }
    }

    fn card_scene() -> Scene {
        let mut scene = Scene::default();
        scene.add_material(Material::new("正面_mat", [1.0; 4], 0.0, 0.5));
        scene.add_material(Material::new("背景", [0.2, 0.2, 0.2, 1.0], 0.0, 0.5));
        scene.add_object(SceneObject::mesh(
            "Card_Front",
            MeshData::from_extents([-1.0, -0.1, 0.0], [1.0, 0.1, 3.0], vec!["正面_mat".into()]),
        ));
        scene.add_object(SceneObject::mesh(
            "VEN_backdrop",
            MeshData::from_extents([-10.0, 5.0, 0.0], [10.0, 6.0, 10.0], vec!["背景".into()]),
        ));
        scene
    }

    #[test]
    fn test_empty_scene_gets_fallback_subject() {
        let mut scene = Scene::default();
        let report = TurntableApp::default().stage(&mut scene, &request()).unwrap();

        let cube = report.fallback_primitive.unwrap();
        assert_eq!(report.classification.subject, vec![cube]);

        let bounds = BoundsComputer::compute(&scene, &report.classification.subject);
        assert!(!bounds.is_empty());
        assert!(bounds.size().is_finite());
        assert!(bounds.size() > 0.0);
    }

    #[test]
    fn test_test_flag_forces_single_frame() {
        let mut scene = card_scene();
        let request = RenderRequest {
            frames: Some(300),
            test: true,
            ..request()
        };

        let report = TurntableApp::default().stage(&mut scene, &request).unwrap();

        assert_eq!(report.frames, 1);
        assert_eq!((scene.frame_start, scene.frame_end), (1, 1));
    }

    #[test]
    fn test_stage_builds_full_turntable() {
        let mut scene = card_scene();
        let request = RenderRequest {
            rotations: Some(2.0),
            ..request()
        };

        let report = TurntableApp::default().stage(&mut scene, &request).unwrap();

        assert_eq!(report.frames, 120);
        assert_eq!(report.classification.background.len(), 1);
        assert!(matches!(report.camera, CameraOutcome::Synthesized { .. }));
        assert!(matches!(report.lighting, LightingOutcome::Synthesized { .. }));
        assert_eq!(report.animation, AnimationPlan::Synthesize { rotations: 2.0 });

        let track = scene.objects[report.pivot.index()]
            .animation
            .as_ref()
            .and_then(|animation| animation.track(TURNTABLE_CHANNEL))
            .unwrap();
        assert_eq!(track.keyframes()[1].frame, 121.0);
        assert!((track.keyframes()[1].value - 2.0 * TAU).abs() < 1e-4);

        assert_eq!(scene.output.container, Container::Mpeg4);
        assert_eq!(scene.output.codec, VideoCodec::H264);
        assert_eq!(scene.output.path, PathBuf::from("/tmp/turntable_test.mp4"));
    }

    #[test]
    fn test_project_keeps_its_camera_lights_and_frames() {
        let mut scene = card_scene();
        scene.origin = SceneOrigin::Project;
        scene.frame_end = 72;
        scene.output.container = Container::Matroska;
        let camera = scene.add_object(SceneObject::camera("ShotCam", CameraData::default()));
        scene.active_camera = Some(camera);
        scene.add_object(SceneObject::light("Key", LightData::sun(4.0)));
        let objects_before = scene.objects.len();

        let report = TurntableApp::default().stage(&mut scene, &request()).unwrap();

        assert_eq!(report.camera, CameraOutcome::Reused(camera));
        assert_eq!(report.lighting, LightingOutcome::Skipped);
        assert_eq!(report.frames, 72);
        // Only the pivot is added
        assert_eq!(scene.objects.len(), objects_before + 1);
        assert_eq!(scene.output.container, Container::Mpeg4);
    }

    #[test]
    fn test_preserved_animation_sets_frames_and_skips_turntable() {
        let mut scene = card_scene();
        scene.frame_end = 1;
        let mut authored = AnimationData::new();
        let track = authored.track_mut(Channel::Rotation(Axis::Z));
        track.insert(1.0, 0.0, Interpolation::Bezier);
        track.insert(200.0, 3.0, Interpolation::Bezier);
        let card = scene.find_by_name("Card_Front").unwrap();
        scene.objects[card.index()].animation = Some(authored);

        let report = TurntableApp::default().stage(&mut scene, &request()).unwrap();

        assert_eq!(report.animation, AnimationPlan::Preserve { start: 1, frames: 200 });
        assert_eq!(report.frames, 200);
        assert!(scene.objects[card.index()].is_animated());
        assert!(scene.objects[report.pivot.index()].animation.is_none());
    }

    #[test]
    fn test_preserved_animation_keeps_its_first_frame() {
        let mut scene = card_scene();
        scene.frame_start = 10;
        scene.frame_end = 100;
        let mut authored = AnimationData::new();
        let track = authored.track_mut(Channel::Location(Axis::Z));
        track.insert(10.0, 0.0, Interpolation::Linear);
        track.insert(100.0, 2.0, Interpolation::Linear);
        let card = scene.find_by_name("Card_Front").unwrap();
        scene.objects[card.index()].animation = Some(authored);

        let report = TurntableApp::default().stage(&mut scene, &request()).unwrap();

        assert_eq!(report.frames, 91);
        assert_eq!((scene.frame_start, scene.frame_end), (10, 100));
    }

    #[test]
    fn test_missing_texture_does_not_stop_the_run() {
        let mut scene = card_scene();
        let request = RenderRequest {
            textures: vec![(TextureTarget::Front, PathBuf::from("/no/such/front.png"))],
            ..request()
        };

        let report = TurntableApp::default().stage(&mut scene, &request).unwrap();

        assert!(report.textures.is_empty());
        assert_eq!(report.frames, 120);
    }

    struct RecordingRenderer {
        jobs: RefCell<Vec<RenderJob>>,
    }

    impl Renderer for RecordingRenderer {
        fn name(&self) -> &str {
            "recording"
        }

        fn supports_backend(&self, backend: RenderBackend) -> bool {
            backend == RenderBackend::Workbench
        }

        fn render(&self, _scene: &Scene, job: &RenderJob) -> Result<(), RenderError> {
            self.jobs.borrow_mut().push(job.clone());
            Ok(())
        }
    }

    #[test]
    fn test_run_hands_the_staged_scene_to_the_renderer() {
        let path = std::env::temp_dir().join(format!("turntable_app_{}.json", std::process::id()));
        ProjectImporter::save(&card_scene(), &path).unwrap();
        let renderer = RecordingRenderer {
            jobs: RefCell::new(Vec::new()),
        };

        let report = TurntableApp::default()
            .run(&path, &RenderRequest { frames: Some(48), ..request() }, &renderer)
            .unwrap();

        assert_eq!(report.backend, Some(RenderBackend::Workbench));
        let jobs = renderer.jobs.borrow();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].frame_count(), 48);
        assert_eq!(jobs[0].backend, Some(RenderBackend::Workbench));
        assert_eq!(jobs[0].output.codec, VideoCodec::H264);
    }

    #[test]
    fn test_unsupported_input_fails_before_staging() {
        let renderer = RecordingRenderer {
            jobs: RefCell::new(Vec::new()),
        };
        let result = TurntableApp::default().run(Path::new("model.fbx"), &request(), &renderer);

        assert!(matches!(
            result,
            Err(TurntableError::Import(ImportError::UnsupportedFormat(_)))
        ));
        assert!(renderer.jobs.borrow().is_empty());
    }

    #[test]
    fn test_input_errors_come_before_renderer_lookup() {
        let mut looked_up = false;
        let result = TurntableApp::default().run_with(Path::new("model.fbx"), &request(), || {
            looked_up = true;
            Err::<RecordingRenderer, _>(RenderError::NotFound)
        });

        assert!(matches!(
            result,
            Err(TurntableError::Import(ImportError::UnsupportedFormat(_)))
        ));
        assert!(!looked_up);
    }

    #[test]
    fn test_missing_renderer_fails_after_import() {
        let path =
            std::env::temp_dir().join(format!("turntable_app_norender_{}.json", std::process::id()));
        ProjectImporter::save(&card_scene(), &path).unwrap();

        let result = TurntableApp::default().run_with(&path, &request(), || {
            Err::<RecordingRenderer, _>(RenderError::NotFound)
        });

        assert!(matches!(result, Err(TurntableError::Render(RenderError::NotFound))));
    }

    #[test]
    fn test_summary_lists_scene_settings() {
        let mut scene = card_scene();
        let camera = scene.add_object(SceneObject::camera("ShotCam", CameraData::default()));
        scene.active_camera = Some(camera);

        let summary = SceneSummary::of(&scene);
        assert_eq!(summary.active_camera.as_deref(), Some("ShotCam"));
        assert_eq!(summary.mesh_count, 2);
        assert!(summary.to_string().contains("mp4 / h264"));
    }
}
