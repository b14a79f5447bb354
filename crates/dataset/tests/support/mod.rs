//! Shared fixtures: a scratch preset library and an in-process render engine
//! that keeps scene state between renders the way a real engine does.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use docwarp_common::config::RendererConfig;
use docwarp_common::error::{DocwarpError, DocwarpResult};
use docwarp_dataset::EffectOrchestrator;
use docwarp_effect_catalog::{EffectCatalog, BUILTIN_EFFECTS};
use docwarp_render_engine::{BackendReport, RenderBackend, SceneRenderer, ScenePlan, SceneStep};

/// Preset content that makes the engine fail to load the scene.
pub const FAULTY_PRESET: &[u8] = b"faulty";

/// Preset content for a scene without the target object.
pub const NO_TARGET_PRESET: &[u8] = b"no-target";

/// Engine state that survives between plans unless a plan resets it.
#[derive(Debug, Default)]
pub struct EngineState {
    pub scene: Vec<String>,
    pub plans: Vec<ScenePlan>,
}

/// Fake engine. Renders an RGBA image whose pixels spell out the scene
/// state, so leaked state shows up as different output bytes.
pub struct StatefulBackend {
    pub state: Arc<Mutex<EngineState>>,
}

impl StatefulBackend {
    pub fn new() -> (Self, Arc<Mutex<EngineState>>) {
        let state = Arc::new(Mutex::new(EngineState::default()));
        (
            Self {
                state: state.clone(),
            },
            state,
        )
    }
}

impl RenderBackend for StatefulBackend {
    fn execute(&mut self, plan: &ScenePlan) -> DocwarpResult<BackendReport> {
        let mut state = self.state.lock().unwrap();
        state.plans.push(plan.clone());
        let mut report = BackendReport::default();
        let mut has_target = false;

        for step in &plan.steps {
            match step {
                SceneStep::ResetScene => state.scene.clear(),
                SceneStep::OpenPreset { path } => {
                    let content = std::fs::read(path)?;
                    if content == FAULTY_PRESET {
                        return Err(DocwarpError::render(format!(
                            "Cannot open preset {}",
                            path.display()
                        )));
                    }
                    has_target = content != NO_TARGET_PRESET;
                    state
                        .scene
                        .push(format!("scene:{}", String::from_utf8_lossy(&content)));
                }
                SceneStep::BakePhysics => state.scene.push("baked".to_string()),
                SceneStep::BindTarget { object } => {
                    report.target_found = has_target;
                    if has_target {
                        state.scene.push(format!("target:{object}"));
                    }
                }
                SceneStep::AttachImageMaterial { material, .. } => {
                    if has_target {
                        state.scene.push(format!("material:{material}"));
                        report.texture_attached = true;
                    }
                }
                SceneStep::ShadeSmooth { .. } => state.scene.push("smooth".to_string()),
                SceneStep::ConfigureOutput { .. } => {}
                SceneStep::RenderStill => {
                    let output = plan
                        .output_path()
                        .ok_or_else(|| DocwarpError::render("No output configured"))?;
                    write_state_image(&state.scene, output);
                    report.render_finished = true;
                }
            }
            report.steps_completed.push(step.op_name().to_string());
        }

        Ok(report)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "stateful-fake"
    }
}

fn write_state_image(scene: &[String], output: &Path) {
    let bytes = scene.join("|").into_bytes();
    let width = bytes.len().max(1) as u32;
    let mut img = image::RgbaImage::new(width, 1);
    for (x, b) in bytes.iter().enumerate() {
        img.put_pixel(x as u32, 0, image::Rgba([*b, *b, *b, 0]));
    }
    img.save(output).unwrap();
}

/// Scratch workspace with a full preset library and a source page.
pub struct Workspace {
    pub root: PathBuf,
    pub presets: PathBuf,
    pub source: PathBuf,
    pub renderer: RendererConfig,
}

impl Workspace {
    pub fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("docwarp_test_dataset_{name}"));
        let _ = std::fs::remove_dir_all(&root);
        let presets = root.join("warp presets");
        std::fs::create_dir_all(&presets).unwrap();
        for (_, _, file) in BUILTIN_EFFECTS {
            std::fs::write(presets.join(file), file.as_bytes()).unwrap();
        }

        let source = root.join("page.png");
        image::RgbImage::from_pixel(16, 24, image::Rgb([240, 240, 230]))
            .save(&source)
            .unwrap();

        let renderer = RendererConfig {
            temp_output: Some(root.join("scratch").join("temp.png")),
            ..RendererConfig::default()
        };

        Self {
            root,
            presets,
            source,
            renderer,
        }
    }

    pub fn catalog(&self) -> Arc<EffectCatalog> {
        Arc::new(EffectCatalog::builtin(&self.presets))
    }

    pub fn orchestrator(&self) -> (EffectOrchestrator, Arc<Mutex<EngineState>>) {
        let (backend, state) = StatefulBackend::new();
        let renderer = SceneRenderer::new(Box::new(backend), &self.renderer);
        (EffectOrchestrator::new(self.catalog(), renderer), state)
    }

    pub fn overwrite_preset(&self, file: &str, content: &[u8]) {
        std::fs::write(self.presets.join(file), content).unwrap();
    }

    pub fn dataset_dir(&self) -> PathBuf {
        self.root.join("dataset")
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
