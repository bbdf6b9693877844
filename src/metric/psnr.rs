//! Peak signal-to-noise ratio (PSNR) metric.

pub use super::*;

/// Computing the peak signal-to-noise ratio (PSNR) between the inputs:
///
/// `10 * log10(1 / MSE) = -10 / log(10) * log(MSE)`
///
/// ## Details
///
/// It relies on [`MSE`](MeanSquareError).
///
/// The MSE is clamped to [`Psnr::MSE_MIN`] before taking the logarithm,
/// so identical inputs score [`Psnr::MAX`] instead of infinity.
#[derive(Clone, Debug)]
pub struct Psnr<B: Backend> {
    /// Coefficient for PSNR.
    pub coefficient: Tensor<B, 1>,
    /// Inner metric.
    pub mse: MeanSquareError,
}

impl<B: Backend> Psnr<B> {
    /// The score of a comparison without error.
    ///
    /// It is also the score of every MSE below [`Psnr::MSE_MIN`],
    /// e.g. a uniform error below `1e-5` per channel.
    pub const MAX: f64 = 100.0;
    /// The lower bound of MSE, where `-10 * log10(MSE_MIN) == MAX`.
    ///
    /// PSNR is strictly decreasing in MSE only above the bound.
    pub const MSE_MIN: f64 = 1e-10;

    /// Initialize the metric.
    pub fn init(device: &B::Device) -> Self {
        let ten = Tensor::<B, 1>::from_floats([10.0], device);
        let coefficient = ten.to_owned().neg().div(ten.log());
        let mse = MeanSquareError::init();
        Self { coefficient, mse }
    }
}

impl<B: Backend> Metric<B> for Psnr<B> {
    /// ## Returns
    ///
    /// The peak signal-to-noise ratio (PSNR) with shape `[1]`.
    ///
    /// ## Details
    ///
    /// * The argument value should range from `0.0` to `1.0`
    /// * The result value ranges from `0.0` to [`Psnr::MAX`]
    #[inline]
    fn evaluate<const D: usize>(
        &self,
        value: Tensor<B, D>,
        target: Tensor<B, D>,
    ) -> Tensor<B, 1> {
        let mse = self.mse.evaluate(value, target).clamp_min(Self::MSE_MIN);
        self.coefficient.to_owned().mul(mse.log())
    }
}

impl<B: Backend> Default for Psnr<B> {
    fn default() -> Self {
        Self::init(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn default() {
        use super::*;
        use burn::backend::NdArray;

        let target = -10.0 / 10.0_f32.ln();
        let output = Psnr::<NdArray>::default().coefficient.into_scalar();
        assert_eq!(output, target);
    }

    #[test]
    fn evaluate() {
        use super::*;
        use burn::backend::NdArray;

        let device = Default::default();
        let metric = Psnr::init(&device);

        let value = Tensor::<NdArray, 3>::zeros([16, 16, 3], &device);
        let target = Tensor::<NdArray, 3>::ones([16, 16, 3], &device);
        let score = metric.evaluate(value, target).into_scalar();
        assert_eq!(score, 0.0);

        let value = Tensor::<NdArray, 2>::from_floats(
            [[0.0, 0.1, 0.2], [0.5, 0.4, 0.3]],
            &device,
        );
        let target = Tensor::<NdArray, 2>::from_floats(
            [[0.5, 0.6, 0.7], [0.0, 0.9, 0.8]],
            &device,
        );
        let score = metric.evaluate(value, target).into_scalar();
        assert!((score - 6.0206).abs() < 1e-4, "score: {:?}", score);
    }

    #[test]
    fn evaluate_without_error() {
        use super::*;
        use burn::backend::NdArray;

        let device = Default::default();
        let metric = Psnr::init(&device);
        let target = Psnr::<NdArray>::MAX as f32;

        let value = Tensor::<NdArray, 3>::zeros([16, 16, 3], &device);
        let score = metric.evaluate(value.to_owned(), value).into_scalar();
        assert!(score.is_finite(), "score: {:?}", score);
        assert!((score - target).abs() < 1e-3, "score: {:?}", score);

        let value = Tensor::<NdArray, 3>::ones([16, 16, 3], &device);
        let score = metric.evaluate(value.to_owned(), value).into_scalar();
        assert!((score - target).abs() < 1e-3, "score: {:?}", score);
    }

    #[test]
    fn evaluate_increasing_error() {
        use super::*;
        use burn::backend::NdArray;

        let device = Default::default();
        let metric = Psnr::init(&device);
        let target = Tensor::<NdArray, 3>::full([8, 8, 3], 0.2, &device);

        let scores = [0.0, 0.01, 0.05, 0.2, 0.8].map(|error| {
            let value = target.to_owned().add_scalar(error);
            metric.evaluate(value, target.to_owned()).into_scalar()
        });
        scores.windows(2).for_each(|pair| {
            assert!(pair[0] > pair[1], "scores: {:?}", scores);
        });
    }

    #[test]
    fn evaluate_below_mse_min() {
        use super::*;
        use burn::backend::NdArray;

        let device = Default::default();
        let metric = Psnr::init(&device);
        let target = Tensor::<NdArray, 3>::full([8, 8, 3], 0.5, &device);

        // MSE of 4e-12 and 1.6e-11
        let scores = [2e-6, 4e-6].map(|error| {
            let value = target.to_owned().add_scalar(error);
            metric.evaluate(value, target.to_owned()).into_scalar()
        });
        assert_eq!(scores[0], scores[1]);
        assert!(
            (scores[0] - Psnr::<NdArray>::MAX as f32).abs() < 1e-3,
            "scores: {:?}",
            scores
        );

        // MSE of 4e-10
        let value = target.to_owned().add_scalar(2e-5);
        let score = metric.evaluate(value, target).into_scalar();
        assert!(score < scores[0] - 1.0, "score: {:?}", score);
    }
}
