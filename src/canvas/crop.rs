//! Cropping images to the region of the mask.

pub use super::*;

/// The smallest axis-aligned rectangle enclosing all the masked pixels.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BoundingBox {
    /// The column of the left edge.
    pub x: usize,
    /// The row of the top edge.
    pub y: usize,
    /// The count of columns.
    pub width: usize,
    /// The count of rows.
    pub height: usize,
}

impl BoundingBox {
    /// ## Arguments
    ///
    /// * `mask` - `[H * W]`, `true` where the pixel is predicted.
    ///
    /// ## Returns
    ///
    /// [`Error::DegenerateMask`] if no pixel is masked.
    pub fn from_mask(
        mask: &[bool],
        image_height: usize,
        image_width: usize,
    ) -> Result<Self, Error> {
        if mask.len() != image_height * image_width {
            return Err(Error::MismatchedShape(format!(
                "The mask has {} pixels instead of {image_height} x {image_width}",
                mask.len(),
            )));
        }

        // [x_min, y_min, x_max, y_max]
        let bounds = mask
            .iter()
            .enumerate()
            .filter(|(_, is_masked)| **is_masked)
            .map(|(index, _)| (index % image_width, index / image_width))
            .fold(None, |bounds: Option<[usize; 4]>, (x, y)| {
                Some(match bounds {
                    None => [x, y, x, y],
                    Some([x_min, y_min, x_max, y_max]) => [
                        x_min.min(x),
                        y_min.min(y),
                        x_max.max(x),
                        y_max.max(y),
                    ],
                })
            });

        let [x_min, y_min, x_max, y_max] = bounds.ok_or(Error::DegenerateMask)?;

        Ok(Self {
            x: x_min,
            y: y_min,
            width: x_max - x_min + 1,
            height: y_max - y_min + 1,
        })
    }

    /// Cropping the image with shape `[H, W, C]` to the box.
    #[inline]
    pub fn crop<B: Backend>(
        &self,
        image: Tensor<B, 3>,
    ) -> Tensor<B, 3> {
        let channels = image.dims()[2];
        image.slice([
            self.y..self.y + self.height,
            self.x..self.x + self.width,
            0..channels,
        ])
    }
}
