//! Accumulating the per-frame metrics of a run.

pub use super::*;

use serde::{Deserialize, Serialize};

/// The per-frame metrics of an evaluation run.
///
/// ## Details
///
/// The four sequences are aligned by the arrival order of frames
/// and always have the same length.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MetricsAccumulator {
    mse: Vec<f64>,
    psnr: Vec<f64>,
    ssim: Vec<f64>,
    lpips: Vec<f64>,
}

/// The means of the accumulated metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MetricsSummary {
    /// Mean of MSE.
    pub mse: f64,
    /// Mean of PSNR in dB.
    pub psnr: f64,
    /// Mean of SSIM.
    pub ssim: f64,
    /// Mean of LPIPS.
    pub lpips: f64,
}

impl MetricsAccumulator {
    /// Appending the metrics of a frame to all the sequences.
    #[inline]
    pub fn push(
        &mut self,
        [mse, psnr, ssim, lpips]: [f64; 4],
    ) -> &mut Self {
        self.mse.push(mse);
        self.psnr.push(psnr);
        self.ssim.push(ssim);
        self.lpips.push(lpips);
        self
    }

    /// Emptying all the sequences.
    #[inline]
    pub fn clear(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    /// Checking if no frame is evaluated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mse.is_empty()
    }

    /// The count of evaluated frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.mse.len()
    }

    /// The LPIPS of each frame.
    #[inline]
    pub fn lpips(&self) -> &[f64] {
        &self.lpips
    }

    /// The MSE of each frame.
    #[inline]
    pub fn mse(&self) -> &[f64] {
        &self.mse
    }

    /// The PSNR of each frame.
    #[inline]
    pub fn psnr(&self) -> &[f64] {
        &self.psnr
    }

    /// The SSIM of each frame.
    #[inline]
    pub fn ssim(&self) -> &[f64] {
        &self.ssim
    }

    /// The arithmetic means of the sequences.
    ///
    /// It is `None` if no frame is evaluated.
    pub fn summary(&self) -> Option<MetricsSummary> {
        let mean = |values: &[f64]| values.iter().sum::<f64>() / values.len() as f64;

        (!self.is_empty()).then(|| MetricsSummary {
            mse: mean(&self.mse),
            psnr: mean(&self.psnr),
            ssim: mean(&self.ssim),
            lpips: mean(&self.lpips),
        })
    }

    /// Checking that all the sequences have the same length.
    pub fn validate(&self) -> Result<&Self, Error> {
        let lengths = [
            self.mse.len(),
            self.psnr.len(),
            self.ssim.len(),
            self.lpips.len(),
        ];
        if lengths.iter().any(|length| *length != lengths[0]) {
            return Err(Error::MismatchedShape(format!(
                "The metric sequences have different lengths {lengths:?}",
            )));
        }

        Ok(self)
    }
}
