//! Image decoding and tensor preparation

use candle_core::{Device, Tensor};
use image::{imageops::FilterType, DynamicImage};
use macaca_core::{Error, Result};

/// ImageNet per-channel mean (RGB)
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet per-channel standard deviation (RGB)
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decode raw upload bytes, sniffing the format from the content
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| Error::image_decode(e.to_string()))
}

/// Resize to `size`x`size` and normalise with ImageNet statistics.
///
/// Returns CHW-ordered values, `3 * size * size` long.
pub fn normalize(image: &DynamicImage, size: u32) -> Vec<f32> {
    let rgb = image.resize_exact(size, size, FilterType::Triangle).to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut data = Vec::with_capacity(3 * (width * height) as usize);
    for channel in 0..3 {
        for y in 0..height {
            for x in 0..width {
                let value = rgb.get_pixel(x, y)[channel] as f32 / 255.0;
                data.push((value - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel]);
            }
        }
    }

    data
}

/// Build a `(1, 3, size, size)` input tensor for a single image
pub fn to_tensor(image: &DynamicImage, size: u32, device: &Device) -> Result<Tensor> {
    let data = normalize(image, size);
    let side = size as usize;

    Tensor::from_vec(data, (3, side, side), device)
        .and_then(|t| t.unsqueeze(0))
        .map_err(|e| Error::inference(format!("Failed to build input tensor: {}", e)))
}
