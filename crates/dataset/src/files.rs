//! File operations on render outputs and presets.

use std::path::{Path, PathBuf};

use docwarp_common::error::{DocwarpError, DocwarpResult};
use docwarp_effect_catalog::EffectCatalog;

/// Dataset file name for one item: `{effect_id}_{timestamp}_output.png`.
pub fn dataset_file_name(effect_id: &str, timestamp: i64) -> String {
    format!("{effect_id}_{timestamp}_output.png")
}

/// Pick the output path for an item, advancing the timestamp one second at a
/// time until the name is free. Returns the timestamp actually used.
pub fn reserve_dataset_path(dataset_dir: &Path, effect_id: &str, timestamp: i64) -> (i64, PathBuf) {
    let mut stamp = timestamp;
    loop {
        let path = dataset_dir.join(dataset_file_name(effect_id, stamp));
        if !path.exists() {
            if stamp != timestamp {
                tracing::warn!(
                    effect = effect_id,
                    requested = timestamp,
                    used = stamp,
                    "Dataset name already taken; advanced timestamp"
                );
            }
            return (stamp, path);
        }
        stamp += 1;
    }
}

/// Move `from` to `to`, falling back to copy-and-delete when a rename is not
/// possible (for example across filesystems).
pub fn move_file(from: &Path, to: &Path) -> DocwarpResult<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }

    std::fs::copy(from, to).map_err(|source| DocwarpError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    if let Err(err) = std::fs::remove_file(from) {
        tracing::debug!(error = %err, path = %from.display(), "Failed to remove moved file");
    }
    Ok(())
}

/// Copy the raw preset file for `effect_id` to `destination`.
///
/// The identifier is resolved before the filesystem is touched, so an unknown
/// effect leaves `destination` as it was. Returns the number of bytes copied.
pub fn export_preset(
    catalog: &EffectCatalog,
    effect_id: &str,
    destination: &Path,
) -> DocwarpResult<u64> {
    let preset = catalog.resolve(effect_id)?;
    let bytes = std::fs::copy(preset, destination).map_err(|source| DocwarpError::Copy {
        from: preset.to_path_buf(),
        to: destination.to_path_buf(),
        source,
    })?;

    tracing::info!(
        effect = effect_id,
        preset = %preset.display(),
        destination = %destination.display(),
        bytes,
        "Exported preset"
    );
    Ok(bytes)
}

/// Copy a preview render to a user-chosen location.
pub fn save_preview(render: &Path, destination: &Path) -> DocwarpResult<u64> {
    std::fs::copy(render, destination).map_err(|source| DocwarpError::Copy {
        from: render.to_path_buf(),
        to: destination.to_path_buf(),
        source,
    })
}
