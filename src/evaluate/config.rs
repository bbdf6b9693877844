//! Configuring the evaluator.

pub use super::*;

use std::path::PathBuf;

/// The settings of an evaluation run.
#[derive(Config, Debug)]
pub struct EvaluatorConfig {
    /// The image height before scaling.
    pub image_height: u32,

    /// The image width before scaling.
    pub image_width: u32,

    /// The directory of the comparison images and the metrics file.
    pub result_directory: PathBuf,

    /// The unmasked pixels are white instead of black.
    #[config(default = "false")]
    pub is_background_white: bool,

    /// The comparison images are written for each frame.
    #[config(default = "true")]
    pub is_comparison_saved: bool,

    /// It selects the file name of the metrics.
    #[config(default = "false")]
    pub is_novel_pose: bool,

    /// It disables cropping to the bounding box of the mask.
    #[config(default = "false")]
    pub is_whole_image_evaluated: bool,

    /// The settings of LPIPS.
    #[config(default = "LpipsConfig::new()")]
    pub lpips: LpipsConfig,

    /// The working resolution is the image size multiplied by the ratio.
    #[config(default = "1.0")]
    pub resolution_ratio: f64,
}

impl EvaluatorConfig {
    /// Initialize the evaluator with a pretrained extractor.
    pub fn init<B: Backend, E: FeatureExtractor<B>>(
        &self,
        extractor: E,
        device: &B::Device,
    ) -> Result<Evaluator<B, E>, Error> {
        let evaluator = Evaluator {
            config: self.to_owned(),
            device: device.to_owned(),
            metric_lpips: self.lpips.init(extractor, device)?,
            metric_mse: MeanSquareError::init(),
            metric_psnr: Psnr::init(device),
            metric_ssim: MeanStructuralSimilarity::init(device),
            metrics: MetricsAccumulator::default(),
            persister: ResultPersister::new(
                self.result_directory.to_owned(),
                self.is_novel_pose,
            ),
        };

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "gausplat_evaluator::evaluate",
            "init > resolution ({:?})",
            self.resolution(),
        );

        Ok(evaluator)
    }

    /// The color value of the unmasked pixels.
    #[inline]
    pub fn background(&self) -> f32 {
        if self.is_background_white {
            1.0
        } else {
            0.0
        }
    }

    /// `[H, W]` of the working resolution.
    #[inline]
    pub fn resolution(&self) -> [usize; 2] {
        [
            (self.image_height as f64 * self.resolution_ratio) as usize,
            (self.image_width as f64 * self.resolution_ratio) as usize,
        ]
    }
}
