//! Evaluating rendered frames against the ground truth.

pub mod accumulate;
pub mod config;

pub use crate::{
    canvas::get_tensor_from_colors, error::Error, frame::Frame, metric::*,
    persist::ResultPersister,
};
pub use accumulate::*;
pub use burn::config::Config;
pub use config::*;

use burn::tensor::ElementConversion;
use std::fmt;

/// Computing MSE, PSNR, SSIM and LPIPS for each frame
/// and accumulating them over a run.
pub struct Evaluator<B: Backend, E> {
    /// The settings of the run.
    pub config: EvaluatorConfig,
    /// The device of the images and the metrics.
    pub device: B::Device,
    /// LPIPS with the frozen extractor.
    pub metric_lpips: Lpips<B, E>,
    /// MSE
    pub metric_mse: MeanSquareError,
    /// PSNR
    pub metric_psnr: Psnr<B>,
    /// SSIM of RGB images.
    pub metric_ssim: MeanStructuralSimilarity<B, 3>,
    /// The metrics of the evaluated frames.
    pub metrics: MetricsAccumulator,
    /// The writer of the results.
    pub persister: ResultPersister,
}

impl<B: Backend, E: FeatureExtractor<B>> Evaluator<B, E> {
    /// Evaluating the frame and appending its metrics.
    ///
    /// ## Details
    ///
    /// - MSE and PSNR are computed on the masked colors,
    ///   or on the whole images if `config.is_whole_image_evaluated`.
    /// - SSIM is computed on the images cropped to the bounding box of the mask,
    ///   or on the whole images if `config.is_whole_image_evaluated`.
    /// - LPIPS is always computed on the whole images.
    ///
    /// On error, no metric is appended.
    pub fn evaluate(
        &mut self,
        frame: &Frame,
    ) -> Result<&mut Self, Error> {
        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "gausplat_evaluator::evaluate",
            "evaluate > frame ({}) > view ({})",
            frame.frame_index, frame.view_index,
        );

        let resolution = self.config.resolution();
        let resolution_frame = [frame.image_height, frame.image_width];
        if resolution_frame != resolution {
            return Err(Error::MismatchedResolution {
                expected: resolution,
                found: resolution_frame,
            });
        }

        // Reconstructing the images

        let images =
            frame.reconstruct::<B>(self.config.background(), &self.device)?;
        let bounding_box = match self.config.is_whole_image_evaluated {
            true => None,
            false => Some(frame.bounding_box()?),
        };

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "gausplat_evaluator::evaluate",
            "evaluate > bounding_box ({:?})",
            bounding_box,
        );

        // Computing the pixel metrics

        let [mse, psnr] = match bounding_box {
            Some(_) => self.evaluate_pixels(
                get_tensor_from_colors(&frame.colors_rgb_predicted, &self.device),
                get_tensor_from_colors(&frame.colors_rgb_target, &self.device),
            ),
            None => self.evaluate_pixels(images.0.to_owned(), images.1.to_owned()),
        };

        // Computing the structural metric

        let images_cropped = match bounding_box {
            Some(bounding_box) => (
                bounding_box.crop(images.0.to_owned()),
                bounding_box.crop(images.1.to_owned()),
            ),
            None => images.to_owned(),
        };
        let ssim = self
            .metric_ssim
            .evaluate(images_cropped.0.to_owned(), images_cropped.1.to_owned())
            .into_scalar()
            .elem::<f64>();

        // Computing the perceptual metric

        let lpips = self
            .metric_lpips
            .evaluate(images.0, images.1)
            .into_scalar()
            .elem::<f64>();

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "gausplat_evaluator::evaluate",
            "evaluate > mse ({mse}) > psnr ({psnr}) > ssim ({ssim}) > lpips ({lpips})",
        );

        if self.config.is_comparison_saved {
            self.persister.save_comparison(
                frame.frame_index,
                frame.view_index,
                images_cropped.0,
                images_cropped.1,
            )?;
        }

        self.metrics.push([mse, psnr, ssim, lpips]);

        Ok(self)
    }

    /// Saving the accumulated metrics and clearing them.
    ///
    /// ## Returns
    ///
    /// The means of the metrics, or `None` if no frame is evaluated.
    ///
    /// ## Details
    ///
    /// The metrics are kept if saving fails.
    pub fn summarize(&mut self) -> Result<Option<MetricsSummary>, Error> {
        let summary = self.metrics.summary();
        let file_path = self.persister.save_metrics(&self.metrics)?;

        log::info!(
            target: "gausplat_evaluator::evaluate",
            "The results are saved at {:?}",
            file_path,
        );
        if let Some(summary) = &summary {
            log::info!(target: "gausplat_evaluator::evaluate", "mse: {}", summary.mse);
            log::info!(target: "gausplat_evaluator::evaluate", "psnr: {}", summary.psnr);
            log::info!(target: "gausplat_evaluator::evaluate", "ssim: {}", summary.ssim);
            log::info!(target: "gausplat_evaluator::evaluate", "lpips: {}", summary.lpips);
        }

        self.metrics.clear();

        Ok(summary)
    }

    /// ## Returns
    ///
    /// `[MSE, PSNR]`
    fn evaluate_pixels<const D: usize>(
        &self,
        value: Tensor<B, D>,
        target: Tensor<B, D>,
    ) -> [f64; 2] {
        let mse = self
            .metric_mse
            .evaluate(value.to_owned(), target.to_owned())
            .into_scalar()
            .elem::<f64>();
        let psnr = self
            .metric_psnr
            .evaluate(value, target)
            .into_scalar()
            .elem::<f64>();

        [mse, psnr]
    }
}

impl<B: Backend, E: fmt::Debug> fmt::Debug for Evaluator<B, E> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct(&format!("Evaluator<{}>", B::name()))
            .field("config", &self.config)
            .field("device", &self.device)
            .field("metric_lpips.extractor", &self.metric_lpips.extractor)
            .field("metric_lpips.layers", &self.metric_lpips.layers)
            .field("metrics.len()", &self.metrics.len())
            .field("persister", &self.persister)
            .finish()
    }
}
