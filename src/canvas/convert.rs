//! Converting image tensors to 8-bit images.

pub use super::*;
pub use image::RgbImage;

/// Converting the image tensor to an 8-bit RGB image.
///
/// ## Arguments
///
/// * `tensor` - The image with shape `[H, W, 3]`, ranging from `0.0` to `1.0`.
///
/// ## Details
///
/// The values are clamped and scaled to `0` to `255`.
pub fn get_image_from_tensor<B: Backend>(
    tensor: Tensor<B, 3>
) -> Result<RgbImage, Error> {
    let [image_height, image_width, channels] = tensor.dims();
    if channels != 3 {
        return Err(Error::MismatchedShape(format!(
            "The image has {channels} channels instead of 3",
        )));
    }

    let values = tensor
        .clamp(0.0, 1.0)
        .mul_scalar(255.0)
        .into_data()
        .iter::<f32>()
        .map(|value| value.round() as u8)
        .collect::<Vec<_>>();

    RgbImage::from_raw(image_width as u32, image_height as u32, values).ok_or_else(
        || {
            Error::MismatchedShape(format!(
                "The image buffer is smaller than {image_height} x {image_width} x 3",
            ))
        },
    )
}

#[cfg(test)]
mod tests {
    #[test]
    fn get_image_from_tensor() {
        use super::*;
        use burn::{backend::NdArray, tensor::TensorData};

        let device = Default::default();
        let values = vec![
            0.0, 0.5, 1.0, 1.5, -0.5, 0.25, //
            0.1, 0.2, 0.3, 0.4, 0.6, 0.8, //
        ];
        let tensor =
            Tensor::<NdArray, 3>::from_data(TensorData::new(values, [2, 2, 3]), &device);

        let image = super::get_image_from_tensor(tensor).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 0).0, [0, 128, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [255, 0, 64]);
        assert_eq!(image.get_pixel(0, 1).0, [26, 51, 77]);
        assert_eq!(image.get_pixel(1, 1).0, [102, 153, 204]);
    }

    #[test]
    fn get_image_from_tensor_with_invalid_channels() {
        use super::*;
        use burn::backend::NdArray;

        let device = Default::default();
        let tensor = Tensor::<NdArray, 3>::zeros([2, 2, 4], &device);

        let error = super::get_image_from_tensor(tensor).unwrap_err();
        assert!(matches!(error, Error::MismatchedShape(_)), "{error:?}");
    }
}
