//! VGG-16 feature extractor.

pub use super::*;

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        PaddingConfig2d,
    },
    record::{FullPrecisionSettings, NamedMpkFileRecorder},
    tensor::{activation::relu, module::max_pool2d},
};
use std::path::Path;

/// The convolutional part of VGG-16 as described in the paper:
///
/// *Simonyan, K., & Zisserman, A. (2015). Very Deep Convolutional Networks for Large-Scale Image Recognition. ICLR.*
/// https://arxiv.org/abs/1409.1556
///
/// ## Details
///
/// - `self.blocks`: 5 blocks of `3x3` convolutions
///   - The outputs are `relu1_2`, `relu2_2`, `relu3_3`, `relu4_3` and `relu5_3`
///   - Each block except the first starts with a `2x2` max pooling
#[derive(Debug, Module)]
pub struct Vgg16Features<B: Backend> {
    /// The convolutions of each block.
    pub blocks: Vec<Vec<Conv2d<B>>>,
}

impl<B: Backend> Vgg16Features<B> {
    /// The output channels of each convolution in each block.
    pub const BLOCKS: [&'static [usize]; 5] = [
        &[64, 64],
        &[128, 128],
        &[256, 256, 256],
        &[512, 512, 512],
        &[512, 512, 512],
    ];

    /// Initialize the extractor with random weights.
    pub fn init(device: &B::Device) -> Self {
        let mut channels_in = 3;
        let mut blocks = Vec::with_capacity(Self::BLOCKS.len());

        for block in Self::BLOCKS {
            let mut convs = Vec::with_capacity(block.len());
            for &channels_out in block {
                convs.push(
                    Conv2dConfig::new([channels_in, channels_out], [3, 3])
                        .with_padding(PaddingConfig2d::Explicit(1, 1))
                        .init(device),
                );
                channels_in = channels_out;
            }
            blocks.push(convs);
        }

        Self { blocks }
    }

    /// Loading the pretrained weights from a burn record file.
    pub fn from_file(
        file_path: impl AsRef<Path>,
        device: &B::Device,
    ) -> Result<Self, Error> {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let extractor = Self::init(device).load_file(
            file_path.as_ref().to_path_buf(),
            &recorder,
            device,
        )?;

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "gausplat_evaluator::metric::lpips",
            "Vgg16Features::from_file > {:?}",
            file_path.as_ref(),
        );

        Ok(extractor)
    }
}

impl<B: Backend> FeatureExtractor<B> for Vgg16Features<B> {
    fn channels(&self) -> Vec<usize> {
        Self::BLOCKS
            .iter()
            .filter_map(|block| block.last().copied())
            .collect()
    }

    fn extract_features(
        &self,
        mut input: Tensor<B, 4>,
    ) -> Vec<Tensor<B, 4>> {
        let mut features = Vec::with_capacity(self.blocks.len());

        for (index, block) in self.blocks.iter().enumerate() {
            if index != 0 {
                input = max_pool2d(input, [2, 2], [2, 2], [0, 0], [1, 1]);
            }
            for conv in block {
                input = relu(conv.forward(input));
            }
            features.push(input.to_owned());
        }

        features
    }

    #[inline]
    fn freeze(self) -> Self {
        self.no_grad()
    }
}

impl<B: Backend> Default for Vgg16Features<B> {
    #[inline]
    fn default() -> Self {
        Self::init(&Default::default())
    }
}
