//! Scattering masked colors into images.

pub use super::*;

use burn::tensor::TensorData;

/// Scattering the masked colors into a background-filled image.
///
/// ## Arguments
///
/// * `colors_rgb` - The colors of the masked pixels in raster order.
/// * `mask` - `[H * W]`, `true` where the pixel is predicted.
/// * `background` - The color value of the unmasked pixels.
///
/// ## Returns
///
/// The image with shape `[H, W, 3]`.
pub fn reconstruct_image<B: Backend>(
    colors_rgb: &[[f32; 3]],
    mask: &[bool],
    image_height: usize,
    image_width: usize,
    background: f32,
    device: &B::Device,
) -> Result<Tensor<B, 3>, Error> {
    let pixel_count = image_height * image_width;
    if mask.len() != pixel_count {
        return Err(Error::MismatchedShape(format!(
            "The mask has {} pixels instead of {image_height} x {image_width}",
            mask.len(),
        )));
    }

    let mask_count = mask.iter().filter(|is_masked| **is_masked).count();
    if colors_rgb.len() != mask_count {
        return Err(Error::MismatchedShape(format!(
            "The colors have {} samples instead of {mask_count} masked pixels",
            colors_rgb.len(),
        )));
    }

    let mut values = vec![background; pixel_count * 3];
    mask.iter()
        .enumerate()
        .filter(|(_, is_masked)| **is_masked)
        .zip(colors_rgb)
        .for_each(|((index, _), color)| {
            values[index * 3..index * 3 + 3].copy_from_slice(color);
        });

    Ok(Tensor::from_data(
        TensorData::new(values, [image_height, image_width, 3]),
        device,
    ))
}

/// Collecting the colors into a tensor with shape `[N, 3]`.
pub fn get_tensor_from_colors<B: Backend>(
    colors_rgb: &[[f32; 3]],
    device: &B::Device,
) -> Tensor<B, 2> {
    let values = colors_rgb.iter().flatten().copied().collect::<Vec<_>>();
    Tensor::from_data(TensorData::new(values, [colors_rgb.len(), 3]), device)
}
