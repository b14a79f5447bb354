//! Single-effect orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use docwarp_common::error::{DocwarpError, DocwarpResult};
use docwarp_effect_catalog::EffectCatalog;
use docwarp_render_engine::{RenderOutput, RenderRequest, SceneRenderer};

use crate::files::export_preset;

/// Resolves effects through the catalog and renders them with the scene
/// renderer. One attempt per call, no retries.
#[derive(Debug)]
pub struct EffectOrchestrator {
    catalog: Arc<EffectCatalog>,
    renderer: SceneRenderer,
}

impl EffectOrchestrator {
    pub fn new(catalog: Arc<EffectCatalog>, renderer: SceneRenderer) -> Self {
        Self { catalog, renderer }
    }

    pub fn catalog(&self) -> &EffectCatalog {
        &self.catalog
    }

    pub fn renderer(&self) -> &SceneRenderer {
        &self.renderer
    }

    /// Render `effect_id` onto `source_image` and return the path of the
    /// renderer's scratch output. The file is overwritten by the next call.
    pub fn apply_effect(&mut self, effect_id: &str, source_image: &Path) -> DocwarpResult<PathBuf> {
        self.render_effect(effect_id, source_image)
            .map(|output| output.path)
    }

    /// Like [`apply_effect`](Self::apply_effect), also reporting whether the
    /// document texture was attached.
    pub fn render_effect(
        &mut self,
        effect_id: &str,
        source_image: &Path,
    ) -> DocwarpResult<RenderOutput> {
        let descriptor = self
            .catalog
            .descriptor(effect_id)
            .ok_or_else(|| DocwarpError::unknown_effect(effect_id))?;
        let request = RenderRequest::for_effect(descriptor, source_image);
        self.renderer.render(&request)
    }

    /// Copy the raw preset behind `effect_id` to `destination`.
    pub fn export_preset(&self, effect_id: &str, destination: &Path) -> DocwarpResult<u64> {
        export_preset(&self.catalog, effect_id, destination)
    }
}
