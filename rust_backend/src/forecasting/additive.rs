//! Additive trend + daily seasonality model.
//!
//! The series is modelled as
//!
//! ```text
//! y(t) = k + m·t + Σ_{n=1..N} (a_n·sin(2πnt) + b_n·cos(2πnt))
//! ```
//!
//! with `t` in days for the seasonal terms and rescaled to `[0, 1]` over the
//! history for the trend. Coefficients get zero-mean Gaussian priors, so the
//! MAP estimate is a ridge regression on max-abs scaled data, solved through a
//! Cholesky factorization of the regularized normal matrix.
//!
//! Intervals are analytic: `yhat ± z·σ·sqrt(1 + xᵀA⁻¹x)`, where `A` is the
//! regularized normal matrix, `σ` the residual standard deviation and `z` the
//! standard normal quantile of the configured coverage. Nothing is sampled, so
//! fits are reproducible bit for bit.

use chrono::NaiveDate;
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::TAU;

use crate::config::ForecastSettings;
use crate::forecasting::model::{FittedModel, ForecastModel, ModelError, Prediction};
use crate::forecasting::series::SeriesPoint;

/// Default forecasting model.
#[derive(Debug, Clone, PartialEq)]
pub struct AdditiveTrendModel {
    daily_seasonality: bool,
    fourier_order: usize,
    trend_prior_scale: f64,
    seasonality_prior_scale: f64,
    z: f64,
}

impl AdditiveTrendModel {
    pub fn from_settings(settings: &ForecastSettings) -> Result<Self, ModelError> {
        let width = settings.interval_width;
        if !(width > 0.0 && width < 1.0) {
            return Err(ModelError::InvalidSettings(format!(
                "interval_width must lie in (0, 1), got {}",
                width
            )));
        }
        if !(settings.trend_prior_scale > 0.0 && settings.seasonality_prior_scale > 0.0) {
            return Err(ModelError::InvalidSettings(
                "prior scales must be positive".to_string(),
            ));
        }

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ModelError::InvalidSettings(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + width / 2.0);
        if !z.is_finite() {
            return Err(ModelError::InvalidSettings(format!(
                "no normal quantile for interval_width {}",
                width
            )));
        }

        Ok(Self {
            daily_seasonality: settings.daily_seasonality,
            fourier_order: settings.fourier_order,
            trend_prior_scale: settings.trend_prior_scale,
            seasonality_prior_scale: settings.seasonality_prior_scale,
            z,
        })
    }

    fn seasonal_terms(&self) -> usize {
        if self.daily_seasonality {
            self.fourier_order
        } else {
            0
        }
    }

    fn feature_count(&self) -> usize {
        2 + 2 * self.seasonal_terms()
    }

    /// Prior precision of each coefficient, in feature order.
    fn penalties(&self) -> Vec<f64> {
        let trend = 1.0 / (self.trend_prior_scale * self.trend_prior_scale);
        let seasonal = 1.0 / (self.seasonality_prior_scale * self.seasonality_prior_scale);
        let mut penalties = vec![trend, trend];
        penalties.resize(self.feature_count(), seasonal);
        penalties
    }
}

impl ForecastModel for AdditiveTrendModel {
    fn name(&self) -> &str {
        "additive-trend"
    }

    fn fit(&self, points: &[SeriesPoint]) -> Result<Box<dyn FittedModel>, ModelError> {
        let Some(first) = points.first() else {
            return Err(ModelError::TooFewPoints {
                observed: 0,
                required: 1,
            });
        };
        if let Some(index) = points.iter().position(|p| !p.value.is_finite()) {
            return Err(ModelError::NonFiniteObservation(index));
        }

        let origin = first.date;
        let days: Vec<f64> = points
            .iter()
            .map(|p| (p.date - origin).num_days() as f64)
            .collect();
        let t_scale = positive_or_one(days.iter().copied().fold(0.0, f64::max));
        let y_scale = positive_or_one(points.iter().map(|p| p.value.abs()).fold(0.0, f64::max));

        let basis = Basis {
            seasonal_terms: self.seasonal_terms(),
            t_scale,
        };
        let p = self.feature_count();
        let n = points.len();

        let design: Vec<Vec<f64>> = days.iter().map(|&t| basis.features(t)).collect();
        let y: Vec<f64> = points.iter().map(|pt| pt.value / y_scale).collect();

        // Gram matrix XᵀX, row-major.
        let mut gram = vec![0.0; p * p];
        let mut xty = vec![0.0; p];
        for (row, &target) in design.iter().zip(&y) {
            for i in 0..p {
                xty[i] += row[i] * target;
                for j in 0..p {
                    gram[i * p + j] += row[i] * row[j];
                }
            }
        }

        let mut factor = gram.clone();
        for (i, penalty) in self.penalties().into_iter().enumerate() {
            factor[i * p + i] += penalty;
        }
        cholesky_in_place(&mut factor, p)?;

        let beta = cholesky_solve(&factor, &xty, p);
        let covariance = cholesky_inverse(&factor, p);

        // Effective number of parameters: trace(A⁻¹XᵀX).
        let effective_params: f64 = (0..p)
            .flat_map(|i| (0..p).map(move |j| (i, j)))
            .map(|(i, j)| covariance[i * p + j] * gram[j * p + i])
            .sum();

        let sse: f64 = design
            .iter()
            .zip(&y)
            .map(|(row, target)| {
                let residual = target - dot(row, &beta);
                residual * residual
            })
            .sum();
        let dof = (n as f64 - effective_params).max(1.0);
        let sigma = (sse / dof).sqrt();
        if !sigma.is_finite() {
            return Err(ModelError::NotPositiveDefinite);
        }

        Ok(Box::new(FittedAdditiveModel {
            origin,
            basis,
            y_scale,
            beta,
            covariance,
            sigma,
            z: self.z,
        }))
    }
}

#[derive(Debug, Clone, Copy)]
struct Basis {
    seasonal_terms: usize,
    t_scale: f64,
}

impl Basis {
    fn features(&self, days: f64) -> Vec<f64> {
        let mut row = Vec::with_capacity(2 + 2 * self.seasonal_terms);
        row.push(1.0);
        row.push(days / self.t_scale);
        for order in 1..=self.seasonal_terms {
            let angle = TAU * order as f64 * days;
            row.push(angle.sin());
            row.push(angle.cos());
        }
        row
    }
}

#[derive(Debug, Clone)]
struct FittedAdditiveModel {
    origin: NaiveDate,
    basis: Basis,
    y_scale: f64,
    beta: Vec<f64>,
    covariance: Vec<f64>,
    sigma: f64,
    z: f64,
}

impl FittedModel for FittedAdditiveModel {
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<Prediction>, ModelError> {
        let p = self.beta.len();
        dates
            .iter()
            .map(|&date| {
                let x = self.basis.features((date - self.origin).num_days() as f64);
                let leverage: f64 = (0..p)
                    .map(|i| x[i] * (0..p).map(|j| self.covariance[i * p + j] * x[j]).sum::<f64>())
                    .sum();
                let yhat = dot(&x, &self.beta) * self.y_scale;
                let half_width =
                    self.z * self.sigma * (1.0 + leverage.max(0.0)).sqrt() * self.y_scale;

                if !yhat.is_finite() || !half_width.is_finite() {
                    return Err(ModelError::NonFinitePrediction(date));
                }
                Ok(Prediction {
                    date,
                    yhat,
                    yhat_lower: yhat - half_width,
                    yhat_upper: yhat + half_width,
                })
            })
            .collect()
    }
}

fn positive_or_one(value: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        1.0
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Replace the lower triangle of a row-major SPD matrix with its Cholesky
/// factor `L` and zero the upper triangle.
fn cholesky_in_place(matrix: &mut [f64], n: usize) -> Result<(), ModelError> {
    for i in 0..n {
        for j in 0..=i {
            let mut sum = matrix[i * n + j];
            for k in 0..j {
                sum -= matrix[i * n + k] * matrix[j * n + k];
            }

            if i == j {
                if !sum.is_finite() || sum <= 0.0 {
                    return Err(ModelError::NotPositiveDefinite);
                }
                matrix[i * n + i] = sum.sqrt();
            } else {
                matrix[i * n + j] = sum / matrix[j * n + j];
            }
        }

        for j in i + 1..n {
            matrix[i * n + j] = 0.0;
        }
    }
    Ok(())
}

/// Solve `L Lᵀ x = b` given the factor from [`cholesky_in_place`].
fn cholesky_solve(factor: &[f64], b: &[f64], n: usize) -> Vec<f64> {
    let mut z = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= factor[i * n + k] * z[k];
        }
        z[i] = sum / factor[i * n + i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = z[i];
        for k in i + 1..n {
            sum -= factor[k * n + i] * x[k];
        }
        x[i] = sum / factor[i * n + i];
    }
    x
}

fn cholesky_inverse(factor: &[f64], n: usize) -> Vec<f64> {
    let mut inverse = vec![0.0; n * n];
    let mut unit = vec![0.0; n];
    for col in 0..n {
        unit.iter_mut().for_each(|v| *v = 0.0);
        unit[col] = 1.0;
        for (row, value) in cholesky_solve(factor, &unit, n).into_iter().enumerate() {
            inverse[row * n + col] = value;
        }
    }
    inverse
}
