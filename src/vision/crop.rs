use std::path::Path;

use image::GenericImageView;

use crate::error::AuditError;
use crate::extract::element::Rect;

/// Pixels of context added around an element crop.
pub const CROP_PADDING: f64 = 20.0;

/// Cut a padded element crop out of a full-page screenshot and save it.
///
/// The padded rect is clamped to the image bounds; an element whose clamped
/// area is empty (scrolled out of the capture) yields MissingData rather
/// than a zero-size file.
pub fn capture_element_crop(
    screenshot_path: &Path,
    rect: &Rect,
    output_path: &Path,
) -> Result<(), AuditError> {
    let img = image::open(screenshot_path).map_err(|e| AuditError::Image {
        context: format!("open {}", screenshot_path.display()),
        source: e,
    })?;

    let left = (rect.x - CROP_PADDING).max(0.0) as u32;
    let top = (rect.y - CROP_PADDING).max(0.0) as u32;
    let right = ((rect.x + rect.width + CROP_PADDING).max(0.0) as u32).min(img.width());
    let bottom = ((rect.y + rect.height + CROP_PADDING).max(0.0) as u32).min(img.height());

    if right <= left || bottom <= top {
        return Err(AuditError::MissingData(format!(
            "element rect ({}, {}) {}x{} lies outside the {}x{} screenshot",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            img.width(),
            img.height()
        )));
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AuditError::Io {
            context: format!("create {}", parent.display()),
            source: e,
        })?;
    }

    let cropped = img.crop_imm(left, top, right - left, bottom - top);
    cropped.save(output_path).map_err(|e| AuditError::Image {
        context: format!("save {}", output_path.display()),
        source: e,
    })?;

    Ok(())
}
