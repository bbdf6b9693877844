//! Mean square error (MSE) metric.

pub use super::*;

/// Computing the mean square error (MSE) between the inputs:
///
/// `mean((value - target) ^ 2)`
///
/// ## Details
///
/// The inputs can be of any rank, e.g. the masked color samples `[N, 3]`
/// or the reconstructed images `[H, W, 3]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeanSquareError;

impl MeanSquareError {
    /// Initialize the metric.
    #[inline]
    pub fn init() -> Self {
        Self
    }
}

impl<B: Backend> Metric<B> for MeanSquareError {
    /// ## Returns
    ///
    /// The mean square error (MSE) with shape `[1]`.
    #[inline]
    fn evaluate<const D: usize>(
        &self,
        value: Tensor<B, D>,
        target: Tensor<B, D>,
    ) -> Tensor<B, 1> {
        debug_assert_eq!(value.dims(), target.dims());

        value.sub(target).powf_scalar(2.0).mean()
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn evaluate_on_images() {
        use super::*;
        use burn::backend::NdArray;

        let device = Default::default();
        let metric = MeanSquareError::init();

        let value = Tensor::<NdArray, 3>::zeros([16, 16, 3], &device);
        let target = Tensor::<NdArray, 3>::zeros([16, 16, 3], &device);
        let score = metric.evaluate(value, target).into_scalar();
        assert_eq!(score, 0.0);

        let value = Tensor::<NdArray, 3>::ones([16, 16, 3], &device);
        let target = Tensor::<NdArray, 3>::zeros([16, 16, 3], &device);
        let score = metric.evaluate(value, target).into_scalar();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn evaluate_on_samples() {
        use super::*;
        use burn::backend::NdArray;

        let device = Default::default();
        let metric = MeanSquareError::init();

        let value = Tensor::<NdArray, 2>::from_floats(
            [[0.0, 0.5, 1.0], [0.25, 0.25, 0.25]],
            &device,
        );
        let target = Tensor::<NdArray, 2>::from_floats(
            [[0.5, 0.5, 0.5], [0.25, 0.25, 0.75]],
            &device,
        );
        let score = metric.evaluate(value, target).into_scalar();
        assert_eq!(score, 0.125);
    }

    #[test]
    fn evaluate_increasing_error() {
        use super::*;
        use burn::backend::NdArray;

        let device = Default::default();
        let metric = MeanSquareError::init();
        let target = Tensor::<NdArray, 3>::full([8, 8, 3], 0.25, &device);

        let scores = [0.0, 0.1, 0.2, 0.4, 0.75].map(|error| {
            let value = target.to_owned().add_scalar(error);
            metric.evaluate(value, target.to_owned()).into_scalar()
        });
        scores.windows(2).for_each(|pair| {
            assert!(pair[0] < pair[1], "scores: {:?}", scores);
        });
    }
}
