use image::{GenericImageView, GrayImage, Luma, RgbImage};
use locale_audit::extract::element::Rect;
use locale_audit::vision::crop::{CROP_PADDING, capture_element_crop};
use locale_audit::vision::ssim::{ssim, ssim_files};

fn uniform(width: u32, height: u32, value: u8) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([value]))
}

fn gradient(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([((x + y) % 256) as u8]))
}

// ============================================================================
// 1. SSIM on in-memory images
// ============================================================================

#[test]
fn ssim_identical_images_is_one() {
    let a = gradient(64, 64);
    let b = gradient(64, 64);
    let score = ssim(&a, &b);
    assert!((score - 1.0).abs() < 1e-9, "Identical images score 1.0, got {}", score);
}

#[test]
fn ssim_identical_uniform_images_is_one() {
    let a = uniform(32, 32, 128);
    let b = uniform(32, 32, 128);
    assert!((ssim(&a, &b) - 1.0).abs() < 1e-9);
}

#[test]
fn ssim_black_vs_white_is_low() {
    let black = uniform(32, 32, 0);
    let white = uniform(32, 32, 255);
    let score = ssim(&black, &white);
    assert!(score < 0.1, "Contrasting images must score low, got {}", score);
}

#[test]
fn ssim_is_symmetric() {
    let a = gradient(48, 48);
    let b = uniform(48, 48, 64);
    let forward = ssim(&a, &b);
    let backward = ssim(&b, &a);
    assert!((forward - backward).abs() < 1e-9);
}

#[test]
fn ssim_empty_image_is_zero() {
    let a = GrayImage::new(0, 0);
    let b = GrayImage::new(0, 0);
    assert_eq!(ssim(&a, &b), 0.0);
}

// ============================================================================
// 2. SSIM on files — locale screenshots reflow to different heights
// ============================================================================

#[test]
fn ssim_files_resizes_mismatched_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("source.png");
    let path_b = dir.path().join("target.png");

    gradient(64, 64).save(&path_a).unwrap();
    gradient(64, 96).save(&path_b).unwrap();

    let score = ssim_files(&path_a, &path_b).expect("Mismatched sizes are resized, not an error");
    assert!((0.0..=1.0).contains(&score));
}

#[test]
fn ssim_files_identical_files_score_one() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("a.png");
    let path_b = dir.path().join("b.png");

    let img = gradient(40, 40);
    img.save(&path_a).unwrap();
    img.save(&path_b).unwrap();

    let score = ssim_files(&path_a, &path_b).unwrap();
    assert!((score - 1.0).abs() < 1e-9);
}

#[test]
fn ssim_files_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("a.png");
    gradient(10, 10).save(&path_a).unwrap();

    assert!(ssim_files(&path_a, &dir.path().join("missing.png")).is_err());
}

// ============================================================================
// 3. Element crops
// ============================================================================

#[test]
fn crop_is_padded_and_saved() {
    let dir = tempfile::tempdir().unwrap();
    let screenshot = dir.path().join("page.png");
    RgbImage::from_pixel(400, 300, image::Rgb([200, 200, 200]))
        .save(&screenshot)
        .unwrap();

    let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
    let out = dir.path().join("issue_screenshots").join("issue_1_english_truncation.png");
    capture_element_crop(&screenshot, &rect, &out).unwrap();

    let cropped = image::open(&out).unwrap();
    let pad = CROP_PADDING as u32;
    assert_eq!(cropped.width(), 50 + 2 * pad);
    assert_eq!(cropped.height(), 20 + 2 * pad);
}

#[test]
fn crop_clamps_to_image_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let screenshot = dir.path().join("page.png");
    RgbImage::from_pixel(100, 100, image::Rgb([0, 0, 0]))
        .save(&screenshot)
        .unwrap();

    // Element flush against the top-left corner: no room for padding there
    let rect = Rect::new(0.0, 0.0, 30.0, 30.0);
    let out = dir.path().join("corner.png");
    capture_element_crop(&screenshot, &rect, &out).unwrap();

    let cropped = image::open(&out).unwrap();
    let pad = CROP_PADDING as u32;
    assert_eq!(cropped.width(), 30 + pad, "Only the in-bounds side is padded");
    assert_eq!(cropped.height(), 30 + pad);
}

#[test]
fn crop_outside_screenshot_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let screenshot = dir.path().join("page.png");
    RgbImage::from_pixel(100, 100, image::Rgb([0, 0, 0]))
        .save(&screenshot)
        .unwrap();

    // Below the captured area (scrolled out of view)
    let rect = Rect::new(10.0, 500.0, 30.0, 30.0);
    let out = dir.path().join("nope.png");
    assert!(capture_element_crop(&screenshot, &rect, &out).is_err());
}
