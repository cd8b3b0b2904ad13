//! Aperture efficiency as a function of focal ratio
//!
//! Maps f/D to the fraction of theoretical gain a parabolic dish actually
//! realises. The model is an asymmetric quadratic around the optimum focal
//! ratio: efficiency falls off faster for shallow dishes (spillover past the
//! rim) than for deep ones (feed blockage), so the curvature above the
//! optimum is calibrated strictly larger than the curvature below it.
//!
//! Calibrated against reflector-antenna literature (Balanis ch. 15, Kraus
//! ch. 9, Nikolova lecture notes) so that η(0.20) ≈ 0.692, η(0.45) = 0.700
//! and η(1.00) ≈ 0.629.
//!
//! ## Example
//!
//! ```rust
//! use soga_core::efficiency::EfficiencyModel;
//!
//! let model = EfficiencyModel::default();
//! let eta = model.evaluate(0.45);
//! assert!((eta - 0.70).abs() < 1e-9);
//! assert!(model.evaluate(1.2) < eta);
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{SogaError, SogaResult};

/// Lowest physically realistic aperture efficiency for a parabolic dish.
pub const MIN_EFFICIENCY: f64 = 0.40;

/// Highest efficiency the model may report (practical peak).
pub const MAX_EFFICIENCY: f64 = 0.70;

/// Slack beyond the clamp range before the model is considered miscalibrated.
const CALIBRATION_SLACK: f64 = 0.01;

/// Calibrated asymmetric efficiency curve η(f/D).
///
/// All constants are injected so the model stays testable with alternative
/// calibrations; [`EfficiencyModel::default`] carries the literature fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyModel {
    /// Peak efficiency reached at the optimal focal ratio.
    pub peak: f64,
    /// Focal ratio at which efficiency peaks.
    pub optimal_f_d: f64,
    /// Quadratic curvature for f/D below the optimum (blockage regime).
    pub curvature_below: f64,
    /// Quadratic curvature for f/D at or above the optimum (spillover
    /// regime). Must exceed `curvature_below`.
    pub curvature_above: f64,
}

impl Default for EfficiencyModel {
    fn default() -> Self {
        Self {
            peak: 0.70,
            optimal_f_d: 0.45,
            curvature_below: 0.128,
            curvature_above: 0.236,
        }
    }
}

impl EfficiencyModel {
    /// Build a model from explicit calibration constants.
    pub fn new(
        peak: f64,
        optimal_f_d: f64,
        curvature_below: f64,
        curvature_above: f64,
    ) -> SogaResult<Self> {
        if peak <= 0.0 || peak > 1.0 {
            return Err(SogaError::InvalidConfig(format!(
                "efficiency peak must be in (0, 1], got {peak}"
            )));
        }
        if optimal_f_d <= 0.0 || optimal_f_d > 2.0 {
            return Err(SogaError::InvalidConfig(format!(
                "optimal f/D must be in (0, 2], got {optimal_f_d}"
            )));
        }
        if curvature_below < 0.0 {
            return Err(SogaError::InvalidConfig(format!(
                "curvature below optimum must be non-negative, got {curvature_below}"
            )));
        }
        if curvature_above <= curvature_below {
            return Err(SogaError::InvalidConfig(format!(
                "spillover curvature ({curvature_above}) must exceed blockage \
                 curvature ({curvature_below})"
            )));
        }
        Ok(Self {
            peak,
            optimal_f_d,
            curvature_below,
            curvature_above,
        })
    }

    /// Aperture efficiency for one focal ratio, clamped to
    /// [[`MIN_EFFICIENCY`], [`MAX_EFFICIENCY`]].
    ///
    /// A raw (pre-clamp) value outside the expected envelope logs a
    /// calibration warning but never fails: this is a model-sanity check,
    /// not input validation.
    pub fn evaluate(&self, f_d_ratio: f64) -> f64 {
        let deviation = f_d_ratio - self.optimal_f_d;
        let curvature = if deviation < 0.0 {
            self.curvature_below
        } else {
            self.curvature_above
        };
        let raw = self.peak - curvature * deviation * deviation;

        if raw < MIN_EFFICIENCY - CALIBRATION_SLACK || raw > MAX_EFFICIENCY + CALIBRATION_SLACK {
            tracing::warn!(
                f_d_ratio,
                raw_efficiency = raw,
                "efficiency model produced a value outside [{MIN_EFFICIENCY}, \
                 {MAX_EFFICIENCY}]; calibration constants may need adjustment"
            );
        }

        raw.clamp(MIN_EFFICIENCY, MAX_EFFICIENCY)
    }

    /// Vectorized form of [`evaluate`](Self::evaluate): one efficiency per
    /// input focal ratio, same order.
    pub fn evaluate_batch(&self, f_d_ratios: &[f64]) -> Vec<f64> {
        f_d_ratios.iter().map(|&fd| self.evaluate(fd)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_at_optimal_f_d() {
        let model = EfficiencyModel::default();
        let eta = model.evaluate(model.optimal_f_d);
        assert!(
            (eta - model.peak).abs() < 1e-9,
            "efficiency at the optimum should equal the peak, got {eta}"
        );
    }

    #[test]
    fn stays_within_physical_envelope() {
        let model = EfficiencyModel::default();
        let mut fd = 0.2;
        while fd <= 1.5 {
            let eta = model.evaluate(fd);
            assert!(
                (MIN_EFFICIENCY..=MAX_EFFICIENCY).contains(&eta),
                "η({fd:.2}) = {eta} outside [0.40, 0.70]"
            );
            fd += 0.01;
        }
    }

    #[test]
    fn maximum_occurs_exactly_at_optimum() {
        let model = EfficiencyModel::default();
        let at_opt = model.evaluate(model.optimal_f_d);
        for offset in [-0.2, -0.1, -0.01, 0.01, 0.1, 0.2] {
            let eta = model.evaluate(model.optimal_f_d + offset);
            assert!(
                eta < at_opt,
                "η should be strictly below the peak away from the optimum, \
                 got {eta} at offset {offset}"
            );
        }
    }

    #[test]
    fn spillover_penalized_harder_than_blockage() {
        let model = EfficiencyModel::default();
        let delta = 0.2;
        let below = model.evaluate(model.optimal_f_d - delta);
        let above = model.evaluate(model.optimal_f_d + delta);
        assert!(
            above < below,
            "symmetric deviation should lose more efficiency on the shallow \
             side: below={below}, above={above}"
        );
    }

    #[test]
    fn matches_literature_calibration_points() {
        let model = EfficiencyModel::default();
        assert!((model.evaluate(0.20) - 0.692).abs() < 5e-3);
        assert!((model.evaluate(1.00) - 0.629).abs() < 5e-3);
    }

    #[test]
    fn batch_agrees_with_scalar() {
        let model = EfficiencyModel::default();
        let inputs = [0.2, 0.45, 0.7, 1.0, 1.5];
        let batch = model.evaluate_batch(&inputs);
        assert_eq!(batch.len(), inputs.len());
        for (fd, eta) in inputs.iter().zip(&batch) {
            assert_eq!(*eta, model.evaluate(*fd));
        }
    }

    #[test]
    fn rejects_inverted_curvatures() {
        assert!(EfficiencyModel::new(0.70, 0.45, 0.236, 0.128).is_err());
        assert!(EfficiencyModel::new(0.70, 0.45, 0.128, 0.128).is_err());
        assert!(EfficiencyModel::new(0.70, 0.45, 0.128, 0.236).is_ok());
    }

    #[test]
    fn rejects_unphysical_peak() {
        assert!(EfficiencyModel::new(0.0, 0.45, 0.128, 0.236).is_err());
        assert!(EfficiencyModel::new(1.2, 0.45, 0.128, 0.236).is_err());
    }
}
