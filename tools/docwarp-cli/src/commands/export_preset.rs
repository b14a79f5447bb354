//! Export an effect's scene preset.

use std::path::PathBuf;

use docwarp_common::config::AppConfig;

pub fn run(config: &AppConfig, effect: String, dest: PathBuf) -> anyhow::Result<()> {
    let catalog = super::catalog(config);
    let bytes = docwarp_dataset::export_preset(&catalog, &effect, &dest)?;
    println!("Exported {effect:?} to {} ({bytes} bytes)", dest.display());
    Ok(())
}
