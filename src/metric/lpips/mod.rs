//! Learned perceptual image patch similarity (LPIPS) metric.
//!
//! For more information, see:
//! *Zhang, R., Isola, P., Efros, A. A., Shechtman, E., & Wang, O. (2018). The Unreasonable Effectiveness of Deep Features as a Perceptual Metric. CVPR.*
//! https://arxiv.org/abs/1801.03924

pub mod vgg;

pub use super::*;
pub use crate::error::Error;
pub use burn::{
    config::Config,
    module::{Module, Param},
};
pub use vgg::*;

use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder};
use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    path::Path,
};

/// A pretrained multi-layer feature network.
pub trait FeatureExtractor<B: Backend>: fmt::Debug {
    /// The channel count of each reported layer.
    fn channels(&self) -> Vec<usize>;

    /// ## Arguments
    ///
    /// * `input` - The images with shape `[N, 3, H, W]`.
    ///   The values range from `-1.0` to `1.0`.
    ///
    /// ## Returns
    ///
    /// The features of each reported layer with shape `[N, C_l, H_l, W_l]`.
    fn extract_features(
        &self,
        input: Tensor<B, 4>,
    ) -> Vec<Tensor<B, 4>>;

    /// Marking all the parameters as non-trainable.
    fn freeze(self) -> Self;
}

/// The settings of LPIPS.
#[derive(Config, Debug, PartialEq)]
pub struct LpipsConfig {
    /// The indexes of the extractor layers to compare.
    #[config(default = "vec![0, 1, 2, 3, 4]")]
    pub layers: Vec<usize>,
}

/// The channel weights of the selected layers.
#[derive(Debug, Module)]
pub struct LinearLayers<B: Backend> {
    /// `[C_l]` for each selected layer.
    pub weights: Vec<Param<Tensor<B, 1>>>,
}

/// Computing the learned perceptual image patch similarity (LPIPS) between the inputs.
///
/// ## Details
///
/// - `self.weights`: `[C_l]` for each layer in `self.layers`
///   - Non-negative, ones by default
/// - `self.shift`, `self.scale`: `[1, 3, 1, 1]`
///   - The input scaling of the extractor
#[derive(Clone, Debug)]
pub struct Lpips<B: Backend, E> {
    /// Frozen feature network.
    pub extractor: E,
    /// The indexes of the extractor layers to compare.
    pub layers: Vec<usize>,
    /// The divisor of the input scaling.
    pub scale: Tensor<B, 4>,
    /// The offset of the input scaling.
    pub shift: Tensor<B, 4>,
    /// The channel weights of each layer.
    pub weights: Vec<Tensor<B, 1>>,
}

impl LpipsConfig {
    /// Initialize the metric with a pretrained extractor.
    ///
    /// ## Details
    ///
    /// The extractor is frozen and run once on the device.
    /// It fails with [`Error::DeviceUnavailable`] if that run fails.
    pub fn init<B: Backend, E: FeatureExtractor<B>>(
        &self,
        extractor: E,
        device: &B::Device,
    ) -> Result<Lpips<B, E>, Error> {
        const CHECK_SIZE: usize = 32;

        let extractor = extractor.freeze();
        let channels = extractor.channels();

        if self.layers.is_empty() {
            return Err(Error::MismatchedShape(
                "LPIPS requires at least one layer".into(),
            ));
        }
        if let Some(layer) =
            self.layers.iter().find(|layer| **layer >= channels.len())
        {
            return Err(Error::MismatchedShape(format!(
                "LPIPS layer {layer} is out of the extractor layers ({})",
                channels.len()
            )));
        }

        // Checking the device

        let features = panic::catch_unwind(AssertUnwindSafe(|| {
            let input = Tensor::<B, 4>::zeros([1, 3, CHECK_SIZE, CHECK_SIZE], device);
            extractor.extract_features(input)
        }))
        .map_err(|_| Error::DeviceUnavailable(format!("{device:?}")))?;

        if features.len() != channels.len() {
            return Err(Error::MismatchedShape(format!(
                "The extractor reports {} layers instead of {}",
                features.len(),
                channels.len()
            )));
        }
        for (feature, channel_count) in features.iter().zip(&channels) {
            if feature.device() != *device {
                return Err(Error::DeviceUnavailable(format!("{device:?}")));
            }
            if feature.dims()[1] != *channel_count {
                return Err(Error::MismatchedShape(format!(
                    "The extractor reports {:?} instead of {} channels",
                    feature.dims(),
                    channel_count
                )));
            }
        }

        let shift = Tensor::<B, 1>::from_floats([-0.030, -0.088, -0.188], device)
            .reshape([1, 3, 1, 1]);
        let scale = Tensor::<B, 1>::from_floats([0.458, 0.448, 0.450], device)
            .reshape([1, 3, 1, 1]);
        let weights = self
            .layers
            .iter()
            .map(|layer| Tensor::ones([channels[*layer]], device))
            .collect();

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "gausplat_evaluator::metric::lpips",
            "init > layers ({:?}) > channels ({:?})",
            self.layers, channels,
        );

        Ok(Lpips {
            extractor,
            layers: self.layers.to_owned(),
            scale,
            shift,
            weights,
        })
    }
}

impl<B: Backend, E: FeatureExtractor<B>> Lpips<B, E> {
    /// Replacing the channel weights.
    ///
    /// The weights are clamped to be non-negative.
    pub fn load_linear_layers(
        mut self,
        layers: LinearLayers<B>,
    ) -> Result<Self, Error> {
        let weights = layers
            .weights
            .into_iter()
            .map(|weight| weight.val().detach().clamp_min(0.0))
            .collect::<Vec<_>>();

        let dims_expected = self.weights.iter().map(|w| w.dims()).collect::<Vec<_>>();
        let dims = weights.iter().map(|w| w.dims()).collect::<Vec<_>>();
        if dims != dims_expected {
            return Err(Error::MismatchedShape(format!(
                "The linear layers are {dims:?} instead of {dims_expected:?}"
            )));
        }

        self.weights = weights;
        Ok(self)
    }

    /// Loading the channel weights from a burn record file of [`LinearLayers`].
    ///
    /// It fails with [`Error::MismatchedShape`] if the weights in the file
    /// do not match the selected layers.
    pub fn load_linear_file(
        self,
        file_path: impl AsRef<Path>,
        device: &B::Device,
    ) -> Result<Self, Error> {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record = recorder
            .load::<LinearLayersRecord<B>>(file_path.as_ref().to_path_buf(), device)?;

        self.load_linear_layers(LinearLayers {
            weights: record.weights,
        })
    }

    /// Computing the LPIPS between the inputs.
    ///
    /// ## Details
    ///
    /// - `(input_0, input_1)`: `([n, 3, h, w], [n, 3, h, w])`
    ///   - The values are expected to fall within the range of `0.0` to `1.0`
    /// - Return: `[1]`, the mean distance of the batch
    ///
    pub fn forward(
        &self,
        input_0: Tensor<B, 4>,
        input_1: Tensor<B, 4>,
    ) -> Tensor<B, 1> {
        const EPSILON: f64 = 1e-10;

        debug_assert_eq!(input_0.dims(), input_1.dims());
        debug_assert_eq!(input_0.dims()[1], 3);

        let batch = input_0.dims()[0];
        let device = input_0.device();

        // x' = (2x - 1 - shift) / scale
        let scale = |input: Tensor<B, 4>| {
            input
                .detach()
                .mul_scalar(2.0)
                .sub_scalar(1.0)
                .sub(self.shift.to_owned())
                .div(self.scale.to_owned())
        };
        // f' = f / (|f| + eps)
        let normalize = |feature: Tensor<B, 4>| {
            let norm = feature
                .to_owned()
                .powf_scalar(2.0)
                .sum_dim(1)
                .sqrt()
                .add_scalar(EPSILON);
            feature.div(norm)
        };

        let features = (
            self.extractor.extract_features(scale(input_0)),
            self.extractor.extract_features(scale(input_1)),
        );

        // d[n] = sum_l(mean_hw(sum_c(w_l * (f'0 - f'1)^2)))
        let distances = self.layers.iter().zip(&self.weights).fold(
            Tensor::<B, 1>::zeros([batch], &device),
            |distances, (layer, weight)| {
                let feature_0 = normalize(features.0[*layer].to_owned().detach());
                let feature_1 = normalize(features.1[*layer].to_owned().detach());
                let weight = weight.to_owned().reshape([1, weight.dims()[0], 1, 1]);
                let distance = feature_0
                    .sub(feature_1)
                    .powf_scalar(2.0)
                    .mul(weight)
                    .sum_dim(1)
                    .mean_dim(3)
                    .mean_dim(2)
                    .reshape([batch]);

                distances.add(distance)
            },
        );

        distances.mean().detach()
    }
}

impl<B: Backend, E: FeatureExtractor<B>> Metric<B> for Lpips<B, E> {
    /// ## Arguments
    ///
    /// * `value` - The input tensor with shape `[N?, H, W, 3]`.
    /// * `target` - The target tensor with shape `[N?, H, W, 3]`.
    ///
    /// ## Returns
    ///
    /// The mean of LPIPS with shape `[1]`.
    ///
    /// ## Details
    ///
    /// * The argument value should range from `0.0` to `1.0`
    /// * The result value is non-negative
    fn evaluate<const D: usize>(
        &self,
        value: Tensor<B, D>,
        target: Tensor<B, D>,
    ) -> Tensor<B, 1> {
        debug_assert!(D >= 3, "D: {}", D);

        let dims = value.dims();
        let [height, width, channels] = [dims[D - 3], dims[D - 2], dims[D - 1]];
        let batch = dims[..D - 3].iter().product::<usize>();
        let shape = [batch, height, width, channels];

        // [N, H, W, 3] -> [N, 3, H, W]
        self.forward(
            value.reshape(shape).permute([0, 3, 1, 2]),
            target.reshape(shape).permute([0, 3, 1, 2]),
        )
    }
}
