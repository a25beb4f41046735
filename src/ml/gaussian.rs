//! Diagonal Gaussian class models
//!
//! Each class `c` has a mean `μ_c` and a variance `σ²_c` per dimension. The
//! log-likelihood of a feature vector `x` is
//!
//! ```text
//! ℓ_c(x) = Σ_d [ -0.5 * log10(σ²_c,d) - (x_d - μ_c,d)² / (2 σ²_c,d) ]
//! ```
//!
//! and the predicted class is the one with the largest `ℓ_c`, the lowest index
//! winning ties.
//!
//! # Parameter dump
//!
//! One line per class, in class order:
//!
//! ```text
//! 0, 1.5e0, 2.5e-1, -3e0, 1e-2, ...
//! ```
//!
//! i.e. the class index followed by `mean, variance` pairs for every dimension,
//! in scientific notation.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::AnalysisError;

/// Mean and variance vectors of one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassModel {
    /// Mean per dimension
    pub mean: Vec<f32>,
    /// Variance per dimension (strictly positive)
    pub variance: Vec<f32>,
}

impl ClassModel {
    fn log_likelihood(&self, x: &[f32]) -> f32 {
        self.mean
            .iter()
            .zip(&self.variance)
            .zip(x)
            .map(|((&mu, &var), &xd)| {
                let diff = xd - mu;
                -0.5 * var.log10() - diff * diff / (2.0 * var)
            })
            .sum()
    }
}

/// Trained diagonal Gaussian model over any number of classes
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianModel {
    classes: Vec<ClassModel>,
    dimensions: usize,
}

impl GaussianModel {
    /// Estimate per-class mean and population variance from labeled vectors
    ///
    /// `classes[c]` holds the training vectors of class `c`. Variances below
    /// `variance_floor` are raised to it.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if there are no classes, a class
    /// has no vectors, or the vectors differ in length, and
    /// `AnalysisError::DegenerateVariance` if a variance comes out NaN or infinite.
    pub fn train<V: AsRef<[f32]>>(classes: &[Vec<V>], variance_floor: f32) -> Result<Self, AnalysisError> {
        if classes.is_empty() {
            return Err(AnalysisError::InvalidInput("No classes to train".to_string()));
        }
        if !(variance_floor.is_finite() && variance_floor > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Variance floor must be positive, got {}",
                variance_floor
            )));
        }

        let dimensions = classes
            .iter()
            .find_map(|vectors| vectors.first())
            .map(|v| v.as_ref().len())
            .unwrap_or(0);
        if dimensions == 0 {
            return Err(AnalysisError::InvalidInput(
                "Training vectors are empty".to_string(),
            ));
        }

        let mut models = Vec::with_capacity(classes.len());
        for (c, vectors) in classes.iter().enumerate() {
            if vectors.is_empty() {
                return Err(AnalysisError::InvalidInput(format!(
                    "Class {} has no training frames",
                    c
                )));
            }
            if let Some(bad) = vectors.iter().find(|v| v.as_ref().len() != dimensions) {
                return Err(AnalysisError::InvalidInput(format!(
                    "Class {} has a vector of {} dimensions, expected {}",
                    c,
                    bad.as_ref().len(),
                    dimensions
                )));
            }

            // accumulate in f64: cepstral coefficients can be large
            let n = vectors.len() as f64;
            let mut mean = vec![0.0f64; dimensions];
            for v in vectors {
                for (m, &x) in mean.iter_mut().zip(v.as_ref()) {
                    *m += x as f64;
                }
            }
            mean.iter_mut().for_each(|m| *m /= n);

            let mut variance = vec![0.0f64; dimensions];
            for v in vectors {
                for ((s, &m), &x) in variance.iter_mut().zip(&mean).zip(v.as_ref()) {
                    let d = x as f64 - m;
                    *s += d * d;
                }
            }

            let variance: Vec<f32> = variance
                .iter()
                .enumerate()
                .map(|(d, &s)| {
                    let var = (s / n) as f32;
                    if var < variance_floor {
                        log::warn!(
                            "Class {} dimension {}: variance {:e} raised to floor {:e}",
                            c,
                            d,
                            var,
                            variance_floor
                        );
                        variance_floor
                    } else {
                        var
                    }
                })
                .collect();

            log::debug!("Trained class {} from {} vectors", c, vectors.len());
            models.push(ClassModel {
                mean: mean.iter().map(|&m| m as f32).collect(),
                variance,
            });
        }

        // NaN inputs or an f32 overflow leave variances the floor cannot fix
        Self::from_classes(models)
    }

    /// Assemble a model from explicit class parameters
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DegenerateVariance` if any variance is zero,
    /// negative or non-finite, and `AnalysisError::InvalidInput` if there are no
    /// classes or the vector lengths disagree.
    pub fn from_classes(classes: Vec<ClassModel>) -> Result<Self, AnalysisError> {
        let dimensions = match classes.first() {
            Some(first) => first.mean.len(),
            None => return Err(AnalysisError::InvalidInput("No classes".to_string())),
        };

        for (c, class) in classes.iter().enumerate() {
            if class.mean.len() != dimensions || class.variance.len() != dimensions {
                return Err(AnalysisError::InvalidInput(format!(
                    "Class {} has {} means and {} variances, expected {}",
                    c,
                    class.mean.len(),
                    class.variance.len(),
                    dimensions
                )));
            }
            if let Some(d) = class.variance.iter().position(|v| !(v.is_finite() && *v > 0.0)) {
                return Err(AnalysisError::DegenerateVariance(format!(
                    "class {}, dimension {}: {}",
                    c, d, class.variance[d]
                )));
            }
        }

        Ok(Self {
            classes,
            dimensions,
        })
    }

    /// Number of classes
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Feature dimensions
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Parameters of every class
    pub fn classes(&self) -> &[ClassModel] {
        &self.classes
    }

    fn check_dimensions(&self, x: &[f32]) -> Result<(), AnalysisError> {
        if x.len() != self.dimensions {
            return Err(AnalysisError::InvalidInputLength(format!(
                "Feature vector has {} dimensions, model expects {}",
                x.len(),
                self.dimensions
            )));
        }
        Ok(())
    }

    /// Log-likelihood of `x` under every class
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` for a vector of the wrong length.
    pub fn log_likelihoods(&self, x: &[f32]) -> Result<Vec<f32>, AnalysisError> {
        self.check_dimensions(x)?;
        Ok(self.classes.iter().map(|c| c.log_likelihood(x)).collect())
    }

    /// Most likely class of `x`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` for a vector of the wrong
    /// length and `AnalysisError::NumericalError` if every likelihood is NaN.
    pub fn classify(&self, x: &[f32]) -> Result<usize, AnalysisError> {
        let likelihoods = self.log_likelihoods(x)?;
        crate::features::argmax(&likelihoods).ok_or_else(|| {
            AnalysisError::NumericalError("All class log-likelihoods are NaN".to_string())
        })
    }

    /// Write the parameter dump
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Io` if writing fails.
    pub fn write_params<W: Write>(&self, mut writer: W) -> Result<(), AnalysisError> {
        for (c, class) in self.classes.iter().enumerate() {
            let mut line = c.to_string();
            for (m, v) in class.mean.iter().zip(&class.variance) {
                line.push_str(&format!(", {:e}, {:e}", m, v));
            }
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a parameter dump written by [`GaussianModel::write_params`]
    ///
    /// Blank lines and a trailing comma are accepted.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ModelFormat` for malformed numbers, odd field
    /// counts, inconsistent dimensions or out-of-order class indices, and
    /// `AnalysisError::DegenerateVariance` for non-positive variances.
    pub fn read_params<R: BufRead>(reader: R) -> Result<Self, AnalysisError> {
        let mut classes: Vec<ClassModel> = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.strip_suffix(',').unwrap_or(line).split(',').map(str::trim);

            let index: usize = fields
                .next()
                .and_then(|f| f.parse().ok())
                .ok_or_else(|| {
                    AnalysisError::ModelFormat(format!("Line {}: missing class index", line_no + 1))
                })?;
            if index != classes.len() {
                return Err(AnalysisError::ModelFormat(format!(
                    "Line {}: class index {} out of order, expected {}",
                    line_no + 1,
                    index,
                    classes.len()
                )));
            }

            let values = fields
                .map(|f| {
                    f.parse::<f32>().map_err(|_| {
                        AnalysisError::ModelFormat(format!(
                            "Line {}: invalid number '{}'",
                            line_no + 1,
                            f
                        ))
                    })
                })
                .collect::<Result<Vec<f32>, _>>()?;

            if values.is_empty() || values.len() % 2 != 0 {
                return Err(AnalysisError::ModelFormat(format!(
                    "Line {}: expected mean/variance pairs, got {} values",
                    line_no + 1,
                    values.len()
                )));
            }

            let mean = values.iter().step_by(2).copied().collect::<Vec<_>>();
            let variance = values.iter().skip(1).step_by(2).copied().collect::<Vec<_>>();
            if let Some(first) = classes.first() {
                if first.mean.len() != mean.len() {
                    return Err(AnalysisError::ModelFormat(format!(
                        "Line {}: {} dimensions, expected {}",
                        line_no + 1,
                        mean.len(),
                        first.mean.len()
                    )));
                }
            }
            classes.push(ClassModel { mean, variance });
        }

        if classes.is_empty() {
            return Err(AnalysisError::ModelFormat(
                "Parameter dump contains no classes".to_string(),
            ));
        }

        Self::from_classes(classes)
    }

    /// Write the parameter dump to a file
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Io` if the file cannot be created or written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AnalysisError> {
        let file = File::create(path)?;
        self.write_params(BufWriter::new(file))
    }

    /// Read the parameter dump from a file
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Io` if the file cannot be read, and the errors of
    /// [`GaussianModel::read_params`] for malformed content.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let file = File::open(path)?;
        Self::read_params(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_clusters() -> Vec<Vec<Vec<f32>>> {
        let a = (0..50)
            .map(|i| vec![1.0 + (i % 5) as f32 * 0.1, -2.0 + (i % 7) as f32 * 0.05])
            .collect();
        let b = (0..50)
            .map(|i| vec![5.0 + (i % 3) as f32 * 0.1, 3.0 + (i % 4) as f32 * 0.05])
            .collect();
        vec![a, b]
    }

    #[test]
    fn test_population_statistics() {
        let classes = vec![vec![vec![1.0f32, 10.0], vec![3.0, 10.0]]];
        let model = GaussianModel::train(&classes, 1e-6).unwrap();
        let class = &model.classes()[0];
        assert!((class.mean[0] - 2.0).abs() < 1e-6);
        // divide by N, not N - 1
        assert!((class.variance[0] - 1.0).abs() < 1e-6);
        // constant dimension floored
        assert_eq!(class.variance[1], 1e-6);
    }

    #[test]
    fn test_recovers_cluster_labels() {
        let clusters = two_clusters();
        let model = GaussianModel::train(&clusters, 1e-6).unwrap();
        assert_eq!(model.class_count(), 2);
        assert_eq!(model.dimensions(), 2);

        for (label, vectors) in clusters.iter().enumerate() {
            for v in vectors {
                assert_eq!(model.classify(v).unwrap(), label);
            }
        }
    }

    #[test]
    fn test_log_likelihood_formula() {
        let model = GaussianModel::from_classes(vec![ClassModel {
            mean: vec![0.0],
            variance: vec![10.0],
        }])
        .unwrap();
        // -0.5 * log10(10) - 4 / 20
        let ll = model.log_likelihoods(&[2.0]).unwrap()[0];
        assert!((ll - (-0.5 - 0.2)).abs() < 1e-6);
    }

    #[test]
    fn test_equal_likelihood_tie_goes_to_first_class() {
        let class = ClassModel {
            mean: vec![0.0, 0.0],
            variance: vec![1.0, 1.0],
        };
        let model = GaussianModel::from_classes(vec![class.clone(), class]).unwrap();
        assert_eq!(model.classify(&[0.3, -0.2]).unwrap(), 0);
    }

    #[test]
    fn test_train_rejects_non_finite_variance() {
        let classes = vec![vec![vec![1.0f32, f32::NAN], vec![2.0, 0.5]]];
        assert!(matches!(
            GaussianModel::train(&classes, 1e-6),
            Err(AnalysisError::DegenerateVariance(_))
        ));

        // spread of 2e20 squares past f32::MAX
        let classes = vec![vec![vec![1e20f32], vec![-1e20]]];
        assert!(matches!(
            GaussianModel::train(&classes, 1e-6),
            Err(AnalysisError::DegenerateVariance(_))
        ));
    }

    #[test]
    fn test_train_rejects_empty_class() {
        let classes: Vec<Vec<Vec<f32>>> = vec![vec![vec![1.0]], vec![]];
        assert!(matches!(
            GaussianModel::train(&classes, 1e-6),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_params_round_trip() {
        let model = GaussianModel::train(&two_clusters(), 1e-6).unwrap();
        let mut dump = Vec::new();
        model.write_params(&mut dump).unwrap();

        let text = String::from_utf8(dump.clone()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("0, "));

        let restored = GaussianModel::read_params(dump.as_slice()).unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn test_read_params_trailing_comma() {
        let text = "0, 1e0, 2e0, \n1, -1e0, 5e-1,\n";
        let model = GaussianModel::read_params(text.as_bytes()).unwrap();
        assert_eq!(model.class_count(), 2);
        assert_eq!(model.classes()[1].mean, vec![-1.0]);
        assert_eq!(model.classes()[1].variance, vec![0.5]);
    }

    #[test]
    fn test_read_params_rejects_malformed() {
        // degenerate variance
        let err = GaussianModel::read_params("0, 1e0, 0e0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateVariance(_)));
        let err = GaussianModel::read_params("0, 1e0, -2e0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateVariance(_)));

        // odd field count
        let err = GaussianModel::read_params("0, 1e0, 1e0, 2e0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AnalysisError::ModelFormat(_)));

        // out-of-order classes
        let err = GaussianModel::read_params("1, 1e0, 1e0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AnalysisError::ModelFormat(_)));

        // bad number and dimension mismatch
        assert!(GaussianModel::read_params("0, abc, 1e0\n".as_bytes()).is_err());
        assert!(GaussianModel::read_params("0, 1e0, 1e0\n1, 1e0, 1e0, 2e0, 1e0\n".as_bytes()).is_err());
        assert!(GaussianModel::read_params("".as_bytes()).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let model = GaussianModel::train(&two_clusters(), 1e-6).unwrap();
        let path = std::env::temp_dir().join(format!("tonal_dsp_params_{}.txt", std::process::id()));
        model.save(&path).unwrap();
        let loaded = GaussianModel::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, model);

        assert!(matches!(
            GaussianModel::load("/nonexistent/params.txt"),
            Err(AnalysisError::Io(_))
        ));
    }
}
