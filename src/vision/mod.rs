pub mod crop;
pub mod ssim;
