//! A unit of evaluation.

pub use crate::{
    canvas::{reconstruct_image, BoundingBox},
    error::Error,
};
pub use burn::tensor::{backend::Backend, Tensor};

use std::fmt;

/// The masked prediction of a rendered view and its ground truth.
#[derive(Clone, Default, PartialEq)]
pub struct Frame {
    /// `[N, 3]`, the predicted colors of the masked pixels in raster order.
    pub colors_rgb_predicted: Vec<[f32; 3]>,
    /// `[N, 3]`, the ground-truth colors of the masked pixels in raster order.
    pub colors_rgb_target: Vec<[f32; 3]>,
    /// The index of the frame in the sequence.
    pub frame_index: u32,
    /// `H`
    pub image_height: usize,
    /// `W`
    pub image_width: usize,
    /// `[H * W]`, `true` where the pixel is predicted.
    ///
    /// The count of `true` is `N`.
    pub mask: Vec<bool>,
    /// The index of the camera view.
    pub view_index: u32,
}

impl Frame {
    /// Checking the invariants of the shapes.
    pub fn validate(&self) -> Result<&Self, Error> {
        let pixel_count = self.image_height * self.image_width;
        if self.mask.len() != pixel_count {
            return Err(Error::MismatchedShape(format!(
                "The mask of frame {} has {} pixels instead of {} x {}",
                self.frame_index,
                self.mask.len(),
                self.image_height,
                self.image_width,
            )));
        }

        let mask_count = self.mask_count();
        if self.colors_rgb_predicted.len() != mask_count
            || self.colors_rgb_target.len() != mask_count
        {
            return Err(Error::MismatchedShape(format!(
                "The colors of frame {} have ({}, {}) samples instead of {} masked pixels",
                self.frame_index,
                self.colors_rgb_predicted.len(),
                self.colors_rgb_target.len(),
                mask_count,
            )));
        }

        Ok(self)
    }

    /// The count of masked pixels.
    #[inline]
    pub fn mask_count(&self) -> usize {
        self.mask.iter().filter(|is_masked| **is_masked).count()
    }

    /// The bounding box of the masked pixels.
    #[inline]
    pub fn bounding_box(&self) -> Result<BoundingBox, Error> {
        BoundingBox::from_mask(&self.mask, self.image_height, self.image_width)
    }

    /// Reconstructing the predicted and ground-truth images.
    ///
    /// ## Returns
    ///
    /// `(predicted, target)`, both with shape `[H, W, 3]`.
    pub fn reconstruct<B: Backend>(
        &self,
        background: f32,
        device: &B::Device,
    ) -> Result<(Tensor<B, 3>, Tensor<B, 3>), Error> {
        let predicted = reconstruct_image(
            &self.colors_rgb_predicted,
            &self.mask,
            self.image_height,
            self.image_width,
            background,
            device,
        )?;
        let target = reconstruct_image(
            &self.colors_rgb_target,
            &self.mask,
            self.image_height,
            self.image_width,
            background,
            device,
        )?;

        Ok((predicted, target))
    }
}

impl fmt::Debug for Frame {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Frame")
            .field("colors_rgb_predicted.len()", &self.colors_rgb_predicted.len())
            .field("colors_rgb_target.len()", &self.colors_rgb_target.len())
            .field("frame_index", &self.frame_index)
            .field("image_height", &self.image_height)
            .field("image_width", &self.image_width)
            .field("mask_count()", &self.mask_count())
            .field("view_index", &self.view_index)
            .finish()
    }
}
