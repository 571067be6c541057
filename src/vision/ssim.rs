use std::path::Path;

use image::GrayImage;
use image::imageops::FilterType;

use crate::error::AuditError;

// Standard SSIM stabilizers for 8-bit dynamic range.
const C1: f64 = (0.01 * 255.0) * (0.01 * 255.0);
const C2: f64 = (0.03 * 255.0) * (0.03 * 255.0);

/// Global structural similarity of two equal-sized grayscale images.
///
/// Single-window SSIM over the whole frame: luminance means, variances, and
/// covariance with the standard C1/C2 stabilizers. Flags gross layout drift
/// between locale renderings, not per-region differences. Callers resize to
/// equal dimensions first (see `ssim_files`).
pub fn ssim(a: &GrayImage, b: &GrayImage) -> f64 {
    debug_assert_eq!(a.dimensions(), b.dimensions(), "ssim expects equal dimensions");

    let n = (a.width() as u64 * a.height() as u64).min(b.width() as u64 * b.height() as u64);
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;

    let mut sum_a = 0.0;
    let mut sum_b = 0.0;
    for (pa, pb) in a.pixels().zip(b.pixels()) {
        sum_a += pa.0[0] as f64;
        sum_b += pb.0[0] as f64;
    }
    let mu_a = sum_a / n;
    let mu_b = sum_b / n;

    let mut var_a = 0.0;
    let mut var_b = 0.0;
    let mut cov = 0.0;
    for (pa, pb) in a.pixels().zip(b.pixels()) {
        let da = pa.0[0] as f64 - mu_a;
        let db = pb.0[0] as f64 - mu_b;
        var_a += da * da;
        var_b += db * db;
        cov += da * db;
    }
    var_a /= n;
    var_b /= n;
    cov /= n;

    let numerator = (2.0 * mu_a * mu_b + C1) * (2.0 * cov + C2);
    let denominator = (mu_a * mu_a + mu_b * mu_b + C1) * (var_a + var_b + C2);

    if denominator != 0.0 { numerator / denominator } else { 0.0 }
}

/// SSIM of two screenshot files. The second image is resized to the first
/// image's dimensions (Lanczos3) when they differ, since locale renderings
/// routinely reflow to different page heights.
pub fn ssim_files(path_a: &Path, path_b: &Path) -> Result<f64, AuditError> {
    let img_a = image::open(path_a)
        .map_err(|e| AuditError::Image {
            context: format!("open {}", path_a.display()),
            source: e,
        })?
        .into_luma8();

    let mut img_b = image::open(path_b)
        .map_err(|e| AuditError::Image {
            context: format!("open {}", path_b.display()),
            source: e,
        })?
        .into_luma8();

    if img_a.dimensions() != img_b.dimensions() {
        img_b = image::imageops::resize(&img_b, img_a.width(), img_a.height(), FilterType::Lanczos3);
    }

    Ok(ssim(&img_a, &img_b))
}
