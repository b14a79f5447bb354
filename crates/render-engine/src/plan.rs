//! Render requests and the scene plans built from them.

use std::path::{Path, PathBuf};

use docwarp_effect_catalog::EffectDescriptor;
use serde::{Deserialize, Serialize};

/// Name given to the material created for the source image.
pub const DOCUMENT_MATERIAL_NAME: &str = "DocwarpDocument";

/// How the target geometry should be shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shading {
    /// Leave shading exactly as authored in the preset.
    #[default]
    AsAuthored,
    /// Smooth (auto-smooth) shading before rendering.
    Smooth,
}

/// A single render invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Scene preset to load.
    pub preset_locator: PathBuf,

    /// Document image applied to the target object.
    pub source_image: PathBuf,

    /// Effect being rendered (for logging and conditional behaviour).
    pub effect_id: String,

    /// Shading applied to the target object.
    pub shading: Shading,
}

impl RenderRequest {
    /// Build a request for a catalog effect. Shading follows the effect's
    /// family.
    pub fn for_effect(descriptor: &EffectDescriptor, source_image: impl Into<PathBuf>) -> Self {
        Self {
            preset_locator: descriptor.preset_locator.clone(),
            source_image: source_image.into(),
            effect_id: descriptor.effect_id.clone(),
            shading: if descriptor.requires_smooth_shading() {
                Shading::Smooth
            } else {
                Shading::AsAuthored
            },
        }
    }
}

/// One engine operation. Serialized with an `op` tag for the engine driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SceneStep {
    /// Discard everything and start from an empty scene.
    ResetScene,

    /// Load the preset scene file.
    OpenPreset { path: PathBuf },

    /// Bake every physics/point cache to completion.
    BakePhysics,

    /// Look up the object that receives the document texture.
    BindTarget { object: String },

    /// Create a fresh image material and put it in the target's first slot.
    AttachImageMaterial { image: PathBuf, material: String },

    /// Smooth-shade the target object.
    ShadeSmooth { auto_smooth: bool },

    /// Output settings for the still render.
    ConfigureOutput {
        path: PathBuf,
        transparent: bool,
        file_format: String,
        color_mode: String,
    },

    /// Synchronous still render written to the configured output.
    RenderStill,
}

impl SceneStep {
    /// Tag used in the serialized plan and in driver status lines.
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::ResetScene => "reset_scene",
            Self::OpenPreset { .. } => "open_preset",
            Self::BakePhysics => "bake_physics",
            Self::BindTarget { .. } => "bind_target",
            Self::AttachImageMaterial { .. } => "attach_image_material",
            Self::ShadeSmooth { .. } => "shade_smooth",
            Self::ConfigureOutput { .. } => "configure_output",
            Self::RenderStill => "render_still",
        }
    }
}

/// Ordered engine steps for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenePlan {
    pub effect_id: String,
    pub steps: Vec<SceneStep>,
}

impl ScenePlan {
    /// Build the plan for `request`, writing to `output_path` and texturing
    /// the object called `target_object`.
    pub fn build(request: &RenderRequest, target_object: &str, output_path: &Path) -> Self {
        let mut steps = vec![
            SceneStep::ResetScene,
            SceneStep::OpenPreset {
                path: request.preset_locator.clone(),
            },
            SceneStep::BakePhysics,
            SceneStep::BindTarget {
                object: target_object.to_string(),
            },
            SceneStep::AttachImageMaterial {
                image: request.source_image.clone(),
                material: DOCUMENT_MATERIAL_NAME.to_string(),
            },
        ];

        if request.shading == Shading::Smooth {
            steps.push(SceneStep::ShadeSmooth { auto_smooth: true });
        }

        steps.push(SceneStep::ConfigureOutput {
            path: output_path.to_path_buf(),
            transparent: true,
            file_format: "PNG".to_string(),
            color_mode: "RGBA".to_string(),
        });
        steps.push(SceneStep::RenderStill);

        Self {
            effect_id: request.effect_id.clone(),
            steps,
        }
    }

    /// Where the render will be written, if the plan configures output.
    pub fn output_path(&self) -> Option<&Path> {
        self.steps.iter().find_map(|step| match step {
            SceneStep::ConfigureOutput { path, .. } => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
