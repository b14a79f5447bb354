//! Source and output image checks.

use std::path::Path;

use docwarp_common::error::{DocwarpError, DocwarpResult};
use image::{ImageFormat, ImageReader};

/// Raster formats accepted as document sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    Jpeg,
}

/// Header-level facts about a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: SourceFormat,
}

/// Check that `path` is an existing, decodable PNG or JPEG.
///
/// The full image is decoded, so truncated or corrupt bodies are caught.
/// Every failure maps to [`DocwarpError::ImageLoad`] so callers can tell a
/// bad source apart from a renderer failure.
pub fn load_source_image(path: &Path) -> DocwarpResult<SourceImageInfo> {
    if !path.is_file() {
        return Err(DocwarpError::image_load(path, "file does not exist"));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    if !matches!(extension.as_deref(), Some("png" | "jpg" | "jpeg")) {
        return Err(DocwarpError::image_load(
            path,
            "unsupported file extension (expected .png, .jpg or .jpeg)",
        ));
    }

    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| DocwarpError::image_load(path, e.to_string()))?;

    let format = match reader.format() {
        Some(ImageFormat::Png) => SourceFormat::Png,
        Some(ImageFormat::Jpeg) => SourceFormat::Jpeg,
        Some(other) => {
            return Err(DocwarpError::image_load(
                path,
                format!("unsupported image format {other:?}"),
            ))
        }
        None => return Err(DocwarpError::image_load(path, "unrecognized image data")),
    };

    // The renderer loads textures lazily and paints a placeholder for
    // corrupt data, so the whole body is decoded here.
    let decoded = reader
        .decode()
        .map_err(|e| DocwarpError::image_load(path, e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(DocwarpError::image_load(path, "image has zero size"));
    }

    Ok(SourceImageInfo {
        width,
        height,
        format,
    })
}

/// Facts about a finished render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedImageInfo {
    pub width: u32,
    pub height: u32,
    pub bytes: u64,
    pub has_alpha: bool,
}

/// Check that the renderer actually produced a non-empty, decodable image.
pub fn inspect_render_output(path: &Path) -> DocwarpResult<RenderedImageInfo> {
    let bytes = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            return Err(DocwarpError::render(format!(
                "Renderer produced no output at {}: {e}",
                path.display()
            )))
        }
    };
    if bytes == 0 {
        return Err(DocwarpError::render(format!(
            "Renderer produced an empty file at {}",
            path.display()
        )));
    }

    let image = image::open(path).map_err(|e| {
        DocwarpError::render(format!(
            "Renderer output at {} is not a readable image: {e}",
            path.display()
        ))
    })?;

    Ok(RenderedImageInfo {
        width: image.width(),
        height: image.height(),
        bytes,
        has_alpha: image.color().has_alpha(),
    })
}
