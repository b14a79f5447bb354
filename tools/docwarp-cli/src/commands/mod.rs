pub mod apply;
pub mod check;
pub mod export_preset;
pub mod generate;
pub mod list;

use std::path::PathBuf;
use std::sync::Arc;

use docwarp_common::config::AppConfig;
use docwarp_dataset::EffectOrchestrator;
use docwarp_effect_catalog::EffectCatalog;
use docwarp_render_engine::SceneRenderer;

/// Load the config file and apply command-line overrides.
pub fn load_config(presets: Option<PathBuf>, blender: Option<PathBuf>) -> AppConfig {
    let mut config = AppConfig::load();
    if let Some(dir) = presets {
        config.presets_dir = dir;
    }
    if let Some(binary) = blender {
        config.renderer.blender_binary = binary;
    }
    config
}

pub fn catalog(config: &AppConfig) -> Arc<EffectCatalog> {
    Arc::new(EffectCatalog::builtin(&config.presets_dir))
}

/// Orchestrator backed by Blender.
pub fn orchestrator(config: &AppConfig) -> EffectOrchestrator {
    EffectOrchestrator::new(catalog(config), SceneRenderer::blender(&config.renderer))
}
