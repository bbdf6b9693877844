//! Saving the results of an evaluation run.

pub use crate::{
    canvas::get_image_from_tensor, error::Error, evaluate::MetricsAccumulator,
};
pub use burn::tensor::{backend::Backend, Tensor};

use std::{
    fs,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Writing the metrics file and the comparison images under a directory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultPersister {
    /// The base directory of the results.
    pub directory: PathBuf,
    /// It selects the file name of the metrics.
    pub is_novel_pose: bool,
}

impl ResultPersister {
    /// Creating a persister writing under the directory.
    #[inline]
    pub fn new(
        directory: PathBuf,
        is_novel_pose: bool,
    ) -> Self {
        Self {
            directory,
            is_novel_pose,
        }
    }

    /// `<directory>/comparison`
    #[inline]
    pub fn comparison_directory(&self) -> PathBuf {
        self.directory.join("comparison")
    }

    /// `<directory>/metrics_novelpose.json` or `<directory>/metrics_novelview.json`
    #[inline]
    pub fn metrics_file_path(&self) -> PathBuf {
        self.directory.join(if self.is_novel_pose {
            "metrics_novelpose.json"
        } else {
            "metrics_novelview.json"
        })
    }

    /// Saving the accumulated metrics.
    ///
    /// ## Returns
    ///
    /// The path of the metrics file.
    pub fn save_metrics(
        &self,
        metrics: &MetricsAccumulator,
    ) -> Result<PathBuf, Error> {
        metrics.validate()?;

        let file_path = self.metrics_file_path();
        fs::create_dir_all(&self.directory)?;

        let mut writer = BufWriter::new(fs::File::create(&file_path)?);
        serde_json::to_writer_pretty(&mut writer, metrics)?;
        writer.flush()?;

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "gausplat_evaluator::persist",
            "save_metrics > {:?} > len ({})",
            file_path, metrics.len(),
        );

        Ok(file_path)
    }

    /// Loading the metrics saved by [`ResultPersister::save_metrics`].
    pub fn load_metrics(file_path: impl AsRef<Path>) -> Result<MetricsAccumulator, Error> {
        let reader = BufReader::new(fs::File::open(file_path)?);
        let metrics = serde_json::from_reader::<_, MetricsAccumulator>(reader)?;
        metrics.validate()?;

        Ok(metrics)
    }

    /// Saving the predicted and ground-truth images of a frame.
    ///
    /// ## Arguments
    ///
    /// * `value` - The predicted image with shape `[H, W, 3]`.
    /// * `target` - The ground-truth image with shape `[H, W, 3]`.
    ///
    /// ## Returns
    ///
    /// The paths of `frame{frame_index:04}_view{view_index:04}.png`
    /// and `frame{frame_index:04}_view{view_index:04}_gt.png`.
    pub fn save_comparison<B: Backend>(
        &self,
        frame_index: u32,
        view_index: u32,
        value: Tensor<B, 3>,
        target: Tensor<B, 3>,
    ) -> Result<[PathBuf; 2], Error> {
        let directory = self.comparison_directory();
        let file_paths = [
            directory.join(format!("frame{frame_index:04}_view{view_index:04}.png")),
            directory.join(format!("frame{frame_index:04}_view{view_index:04}_gt.png")),
        ];
        let images = [get_image_from_tensor(value)?, get_image_from_tensor(target)?];

        fs::create_dir_all(&directory)?;

        let results = rayon::join(
            || images[0].save(&file_paths[0]),
            || images[1].save(&file_paths[1]),
        );
        results.0?;
        results.1?;

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "gausplat_evaluator::persist",
            "save_comparison > {:?}",
            file_paths[0],
        );

        Ok(file_paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn metrics_file_path() {
        let persister = ResultPersister::new("results".into(), true);
        assert_eq!(
            persister.metrics_file_path(),
            PathBuf::from("results/metrics_novelpose.json")
        );

        let persister = ResultPersister::new("results".into(), false);
        assert_eq!(
            persister.metrics_file_path(),
            PathBuf::from("results/metrics_novelview.json")
        );
    }

    #[test]
    fn save_and_load_metrics() {
        let directory = tempdir().unwrap();
        let persister = ResultPersister::new(directory.path().join("nested"), false);

        let mut metrics = MetricsAccumulator::default();
        metrics
            .push([0.0123456789, 19.0848, 0.912345678901, 0.1])
            .push([1e-7, 70.0, 0.999999, 0.0003]);

        let file_path = persister.save_metrics(&metrics).unwrap();
        assert_eq!(file_path, persister.metrics_file_path());

        // Saving again into the existing directory
        let file_path = persister.save_metrics(&metrics).unwrap();

        let output = ResultPersister::load_metrics(&file_path).unwrap();
        assert_eq!(output.len(), metrics.len());
        for (output, target) in [
            (output.mse(), metrics.mse()),
            (output.psnr(), metrics.psnr()),
            (output.ssim(), metrics.ssim()),
            (output.lpips(), metrics.lpips()),
        ] {
            output.iter().zip(target).for_each(|(output, target)| {
                assert!((output - target).abs() < 1e-12, "{output} != {target}");
            });
        }
    }

    #[test]
    fn save_metrics_into_file() {
        let directory = tempdir().unwrap();
        let result_directory = directory.path().join("results");
        fs::write(&result_directory, b"").unwrap();

        let persister = ResultPersister::new(result_directory, true);
        let error = persister
            .save_metrics(&MetricsAccumulator::default())
            .unwrap_err();
        assert!(matches!(error, Error::Io(_)), "{error:?}");
    }

    #[test]
    fn load_metrics_missing() {
        let directory = tempdir().unwrap();
        let error = ResultPersister::load_metrics(directory.path().join("metrics.json"))
            .unwrap_err();
        assert!(matches!(error, Error::Io(_)), "{error:?}");
    }

    #[test]
    fn save_comparison() {
        use burn::backend::NdArray;

        let device = Default::default();
        let directory = tempdir().unwrap();
        let persister = ResultPersister::new(directory.path().to_owned(), false);

        let value = Tensor::<NdArray, 3>::full([3, 5, 3], 0.5, &device);
        let target = Tensor::<NdArray, 3>::ones([3, 5, 3], &device);
        let file_paths = persister
            .save_comparison(7, 12, value, target)
            .unwrap();
        assert_eq!(
            file_paths,
            [
                directory.path().join("comparison/frame0007_view0012.png"),
                directory.path().join("comparison/frame0007_view0012_gt.png"),
            ]
        );

        let image = image::open(&file_paths[0]).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (5, 3));
        assert_eq!(image.get_pixel(4, 2).0, [128, 128, 128]);
        let image = image::open(&file_paths[1]).unwrap().to_rgb8();
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
    }
}
