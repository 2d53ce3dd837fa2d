//! Image to model-input conversion
//!
//! Every classifier input goes through the same deterministic transform:
//! decode, exact resize to 224×224 with a triangle (bilinear) filter, RGB,
//! scale to `[0.0, 1.0]`, add a batch dimension.

use super::error::ClassificationError;
use candle_core::{DType, Device, Tensor};
use image::imageops::FilterType;

pub const INPUT_SIZE: usize = 224;
pub const INPUT_CHANNELS: usize = 3;

/// Returns a `[1, 224, 224, 3]` f32 tensor with values in `[0.0, 1.0]`.
pub fn preprocess(bytes: &[u8], device: &Device) -> Result<Tensor, ClassificationError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ClassificationError::BadInput(format!("decode failed: {}", e)))?;

    let side = INPUT_SIZE as u32;
    let pixels = decoded
        .resize_exact(side, side, FilterType::Triangle)
        .to_rgb8()
        .into_raw();

    Tensor::from_vec(pixels, (INPUT_SIZE, INPUT_SIZE, INPUT_CHANNELS), device)
        .and_then(|t| t.to_dtype(DType::F32))
        .and_then(|t| t.affine(1.0 / 255.0, 0.0))
        .and_then(|t| t.unsqueeze(0))
        .map_err(|e| ClassificationError::BadInput(format!("tensor conversion failed: {}", e)))
}
