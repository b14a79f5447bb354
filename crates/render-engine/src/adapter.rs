//! Scene renderer adapter: request in, rendered image out.

use std::path::{Path, PathBuf};

use docwarp_common::config::RendererConfig;
use docwarp_common::error::{DocwarpError, DocwarpResult};

use crate::backend::RenderBackend;
use crate::blender::BlenderBackend;
use crate::plan::{RenderRequest, ScenePlan};
use crate::source::{inspect_render_output, load_source_image};

/// A finished render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// The adapter's scratch file. Overwritten by the next render, so the
    /// caller must move or copy it first.
    pub path: PathBuf,

    /// False when the preset had no target object and the document texture
    /// could not be applied.
    pub texture_attached: bool,
}

/// Drives one render backend through the reset-then-configure protocol.
///
/// All renders share one scratch output path. `render` takes `&mut self`,
/// so a renderer can only ever service one request at a time.
pub struct SceneRenderer {
    backend: Box<dyn RenderBackend>,
    target_object: String,
    output_path: PathBuf,
}

impl SceneRenderer {
    pub fn new(backend: Box<dyn RenderBackend>, config: &RendererConfig) -> Self {
        Self {
            backend,
            target_object: config.target_object.clone(),
            output_path: absolute(&config.resolved_temp_output()),
        }
    }

    /// A renderer backed by a Blender subprocess.
    pub fn blender(config: &RendererConfig) -> Self {
        Self::new(
            Box::new(BlenderBackend::new(config.blender_binary.clone())),
            config,
        )
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Scratch path every render is written to.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Render one request.
    ///
    /// Fails with `ImageLoad` when the source image is unusable and with
    /// `Render` when the engine does not produce an image.
    pub fn render(&mut self, request: &RenderRequest) -> DocwarpResult<RenderOutput> {
        let started = std::time::Instant::now();
        let source = load_source_image(&request.source_image)?;

        if !request.preset_locator.is_file() {
            return Err(DocwarpError::render(format!(
                "Preset for {:?} not found at {}",
                request.effect_id,
                request.preset_locator.display()
            )));
        }

        if let Some(parent) = self.output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DocwarpError::render(format!(
                    "Cannot prepare render output directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        // A stale file from an earlier render must never pass as this one.
        if let Err(err) = std::fs::remove_file(&self.output_path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                return Err(DocwarpError::render(format!(
                    "Cannot clear previous render at {}: {err}",
                    self.output_path.display()
                )));
            }
        }

        let request = RenderRequest {
            preset_locator: absolute(&request.preset_locator),
            source_image: absolute(&request.source_image),
            ..request.clone()
        };
        let plan = ScenePlan::build(&request, &self.target_object, &self.output_path);

        tracing::info!(
            effect = %request.effect_id,
            preset = %request.preset_locator.display(),
            source = %request.source_image.display(),
            source_width = source.width,
            source_height = source.height,
            shading = ?request.shading,
            backend = self.backend.name(),
            "Rendering effect"
        );

        let report = self.backend.execute(&plan)?;

        if !report.target_found {
            tracing::warn!(
                effect = %request.effect_id,
                target = %self.target_object,
                "Target object not found in preset; rendered without the document texture"
            );
        }

        let rendered = inspect_render_output(&self.output_path)?;
        if !rendered.has_alpha {
            tracing::warn!(
                effect = %request.effect_id,
                path = %self.output_path.display(),
                "Render has no alpha channel"
            );
        }

        tracing::info!(
            effect = %request.effect_id,
            width = rendered.width,
            height = rendered.height,
            bytes = rendered.bytes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Render finished"
        );

        Ok(RenderOutput {
            path: self.output_path.clone(),
            texture_attached: report.target_found && report.texture_attached,
        })
    }
}

impl std::fmt::Debug for SceneRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRenderer")
            .field("backend", &self.backend.name())
            .field("target_object", &self.target_object)
            .field("output_path", &self.output_path)
            .finish()
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendReport;
    use crate::plan::{SceneStep, Shading};
    use docwarp_common::error::ErrorKind;
    use std::sync::{Arc, Mutex};

    /// Records plans and writes a small RGBA image at the configured output.
    struct RecordingBackend {
        plans: Arc<Mutex<Vec<ScenePlan>>>,
        target_found: bool,
    }

    impl RenderBackend for RecordingBackend {
        fn execute(&mut self, plan: &ScenePlan) -> DocwarpResult<BackendReport> {
            self.plans.lock().unwrap().push(plan.clone());
            let output = plan.output_path().unwrap();
            image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 0]))
                .save(output)
                .unwrap();
            Ok(BackendReport {
                steps_completed: plan.steps.iter().map(|s| s.op_name().to_string()).collect(),
                target_found: self.target_found,
                texture_attached: self.target_found,
                render_finished: true,
                error: None,
            })
        }

        fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    /// Reports success but never writes anything.
    struct SilentBackend;

    impl RenderBackend for SilentBackend {
        fn execute(&mut self, _plan: &ScenePlan) -> DocwarpResult<BackendReport> {
            Ok(BackendReport {
                render_finished: true,
                ..BackendReport::default()
            })
        }

        fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "silent"
        }
    }

    struct Fixture {
        dir: PathBuf,
        preset: PathBuf,
        source: PathBuf,
        config: RendererConfig,
    }

    fn fixture(name: &str) -> Fixture {
        let dir = std::env::temp_dir().join(format!("docwarp_test_adapter_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let preset = dir.join("curl_tl.blend");
        std::fs::write(&preset, b"BLENDER-v300").unwrap();
        let source = dir.join("page.png");
        image::RgbImage::new(8, 8).save(&source).unwrap();
        let config = RendererConfig {
            temp_output: Some(dir.join("scratch").join("render.png")),
            ..RendererConfig::default()
        };
        Fixture {
            dir,
            preset,
            source,
            config,
        }
    }

    fn request(f: &Fixture, shading: Shading) -> RenderRequest {
        RenderRequest {
            preset_locator: f.preset.clone(),
            source_image: f.source.clone(),
            effect_id: "Curl TL".to_string(),
            shading,
        }
    }

    #[test]
    fn test_render_returns_scratch_output() {
        let f = fixture("ok");
        let plans = Arc::new(Mutex::new(Vec::new()));
        let mut renderer = SceneRenderer::new(
            Box::new(RecordingBackend {
                plans: plans.clone(),
                target_found: true,
            }),
            &f.config,
        );

        let output = renderer.render(&request(&f, Shading::Smooth)).unwrap();
        assert_eq!(output.path, f.dir.join("scratch").join("render.png"));
        assert!(output.texture_attached);
        assert!(output.path.is_file());

        let plans = plans.lock().unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].steps[0], SceneStep::ResetScene);
        assert!(plans[0]
            .steps
            .contains(&SceneStep::BindTarget {
                object: "demo for blender".to_string()
            }));
        std::fs::remove_dir_all(&f.dir).ok();
    }

    #[test]
    fn test_missing_target_degrades_without_failing() {
        let f = fixture("no_target");
        let mut renderer = SceneRenderer::new(
            Box::new(RecordingBackend {
                plans: Arc::new(Mutex::new(Vec::new())),
                target_found: false,
            }),
            &f.config,
        );

        let output = renderer.render(&request(&f, Shading::AsAuthored)).unwrap();
        assert!(!output.texture_attached);
        std::fs::remove_dir_all(&f.dir).ok();
    }

    #[test]
    fn test_bad_source_is_image_load_failure() {
        let f = fixture("bad_source");
        std::fs::write(&f.source, b"garbage").unwrap();
        let plans = Arc::new(Mutex::new(Vec::new()));
        let mut renderer = SceneRenderer::new(
            Box::new(RecordingBackend {
                plans: plans.clone(),
                target_found: true,
            }),
            &f.config,
        );

        let err = renderer.render(&request(&f, Shading::AsAuthored)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImageLoadFailure);
        assert!(plans.lock().unwrap().is_empty());
        std::fs::remove_dir_all(&f.dir).ok();
    }

    #[test]
    fn test_missing_preset_is_render_failure() {
        let f = fixture("no_preset");
        std::fs::remove_file(&f.preset).unwrap();
        let mut renderer = SceneRenderer::new(Box::new(SilentBackend), &f.config);

        let err = renderer.render(&request(&f, Shading::AsAuthored)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RenderFailure);
        std::fs::remove_dir_all(&f.dir).ok();
    }

    #[test]
    fn test_stale_output_is_not_returned() {
        let f = fixture("stale");
        let scratch = f.config.resolved_temp_output();
        std::fs::create_dir_all(scratch.parent().unwrap()).unwrap();
        image::RgbaImage::new(2, 2).save(&scratch).unwrap();

        let mut renderer = SceneRenderer::new(Box::new(SilentBackend), &f.config);
        let err = renderer.render(&request(&f, Shading::AsAuthored)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RenderFailure);
        assert!(!scratch.exists());
        std::fs::remove_dir_all(&f.dir).ok();
    }
}
