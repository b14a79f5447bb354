//! Render a single effect.

use std::path::PathBuf;

use docwarp_common::config::AppConfig;
use docwarp_dataset::save_preview;

pub fn run(
    config: &AppConfig,
    effect: String,
    image: PathBuf,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("Applying {effect:?} to {}", image.display());

    let mut orchestrator = super::orchestrator(config);
    let render = orchestrator
        .apply_effect(&effect, &image)
        .map_err(|e| anyhow::anyhow!("{effect} failed ({}): {e}", e.kind()))?;

    match output {
        Some(dest) => {
            let bytes = save_preview(&render, &dest)?;
            println!("Saved: {} ({bytes} bytes)", dest.display());
        }
        None => println!("Rendered: {}", render.display()),
    }

    Ok(())
}
