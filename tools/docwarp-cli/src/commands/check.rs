//! Check renderer availability and the preset library.

use docwarp_common::config::{config_file_path, AppConfig};
use docwarp_render_engine::SceneRenderer;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("DocWarp System Check");
    println!("{}", "=".repeat(50));

    let config_path = config_file_path();
    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!("[INFO] Config: defaults ({} not found)", config_path.display());
    }

    let renderer = SceneRenderer::blender(&config.renderer);
    let renderer_ok = renderer.is_available();
    if renderer_ok {
        println!(
            "[OK] Renderer: {} ({})",
            renderer.backend_name(),
            config.renderer.blender_binary.display()
        );
    } else {
        println!(
            "[FAIL] Renderer: {} not found. Install Blender or pass --blender",
            config.renderer.blender_binary.display()
        );
    }
    println!("     Target object: {:?}", config.renderer.target_object);
    println!("     Scratch output: {}", renderer.output_path().display());

    let catalog = super::catalog(config);
    let missing = catalog.missing_presets();
    if missing.is_empty() {
        println!(
            "[OK] Presets: all {} found in {}",
            catalog.len(),
            config.presets_dir.display()
        );
    } else {
        println!(
            "[WARN] Presets: {} of {} missing in {}",
            missing.len(),
            catalog.len(),
            config.presets_dir.display()
        );
        for descriptor in &missing {
            println!(
                "     {} ({})",
                descriptor.effect_id,
                descriptor.preset_locator.display()
            );
        }
    }

    println!();
    if renderer_ok && missing.is_empty() {
        println!("DocWarp is ready.");
    } else {
        println!("Some requirements are missing. See above for fixes.");
    }

    Ok(())
}
