//! Core value objects for parabolic antenna design
//!
//! This module defines the fundamental types shared by the physics model and
//! the optimization engine: validated geometry, performance metrics, search
//! constraints, and the result bundle produced by a run.
//!
//! All types validate their invariants eagerly at construction and are never
//! mutated afterwards. Invalid values are rejected with an error naming the
//! offending field and the violated bound.
//!
//! ## Example
//!
//! ```rust
//! use soga_core::models::AntennaGeometry;
//!
//! let geometry = AntennaGeometry::new(1.0, 0.5).unwrap();
//! assert_eq!(geometry.f_d_ratio(), 0.5);
//! assert!((geometry.depth() - 0.125).abs() < 1e-12);
//!
//! // A focal length of 0.1 m on a 1 m dish gives f/D = 0.1, too deep.
//! assert!(AntennaGeometry::new(1.0, 0.1).is_err());
//! ```

use serde::{Deserialize, Serialize};

/// Practical lower bound for the focal-length-to-diameter ratio.
/// Below this the parabola is too deep to illuminate efficiently.
pub const MIN_F_D_RATIO: f64 = 0.2;

/// Practical upper bound for the focal-length-to-diameter ratio.
/// Above this the parabola is nearly flat and spillover dominates.
pub const MAX_F_D_RATIO: f64 = 1.5;

/// Result type for antenna design operations
pub type SogaResult<T> = Result<T, SogaError>;

/// Errors that can occur during antenna design and optimization
#[derive(Debug, Clone, thiserror::Error)]
pub enum SogaError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid metrics: {0}")]
    InvalidMetrics(String),

    #[error("invalid constraints: {0}")]
    InvalidConstraints(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("optimization found no viable solution; relax the constraints")]
    NoViableSolution,
}

/// Physical geometry of a parabolic reflector.
///
/// Immutable once validated: `diameter` and `focal_length` must be positive
/// and the resulting f/D ratio must fall within the practical range
/// [[`MIN_F_D_RATIO`], [`MAX_F_D_RATIO`]].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AntennaGeometry {
    diameter: f64,
    focal_length: f64,
}

impl AntennaGeometry {
    /// Create a validated geometry from diameter and focal length (both in
    /// metres).
    pub fn new(diameter: f64, focal_length: f64) -> SogaResult<Self> {
        if diameter <= 0.0 {
            return Err(SogaError::InvalidGeometry(format!(
                "diameter must be positive, got {diameter}"
            )));
        }
        if focal_length <= 0.0 {
            return Err(SogaError::InvalidGeometry(format!(
                "focal length must be positive, got {focal_length}"
            )));
        }
        let f_d = focal_length / diameter;
        if f_d < MIN_F_D_RATIO {
            return Err(SogaError::InvalidGeometry(format!(
                "f/D ratio {f_d:.3} below practical minimum {MIN_F_D_RATIO} \
                 (parabola too deep)"
            )));
        }
        if f_d > MAX_F_D_RATIO {
            return Err(SogaError::InvalidGeometry(format!(
                "f/D ratio {f_d:.3} above practical maximum {MAX_F_D_RATIO} \
                 (parabola too shallow)"
            )));
        }
        Ok(Self {
            diameter,
            focal_length,
        })
    }

    /// Reflector diameter in metres.
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Vertex-to-focus distance in metres.
    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    /// Dimensionless focal ratio f/D.
    pub fn f_d_ratio(&self) -> f64 {
        self.focal_length / self.diameter
    }

    /// Parabola sag at the rim: depth = D² / (16 f), in metres.
    pub fn depth(&self) -> f64 {
        self.diameter * self.diameter / (16.0 * self.focal_length)
    }
}

/// Key RF performance figures for one antenna design.
///
/// Gain may be negative for very inefficient designs; beamwidth must lie in
/// (0, 180] degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    gain_dbi: f64,
    beamwidth_deg: f64,
}

impl PerformanceMetrics {
    pub fn new(gain_dbi: f64, beamwidth_deg: f64) -> SogaResult<Self> {
        if beamwidth_deg <= 0.0 || beamwidth_deg > 180.0 {
            return Err(SogaError::InvalidMetrics(format!(
                "beamwidth must be in (0, 180] degrees, got {beamwidth_deg}"
            )));
        }
        Ok(Self {
            gain_dbi,
            beamwidth_deg,
        })
    }

    /// Antenna gain in dBi.
    pub fn gain_dbi(&self) -> f64 {
        self.gain_dbi
    }

    /// Half-power beamwidth in degrees.
    pub fn beamwidth_deg(&self) -> f64 {
        self.beamwidth_deg
    }
}

/// Search-space definition for one optimization run.
///
/// `desired_range_km` is informative only: the genetic search does not
/// enforce it, it is consumed by the link-budget feasibility pre-check in
/// [`crate::physics::validate_range_feasibility`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimizationConstraints {
    min_diameter: f64,
    max_diameter: f64,
    max_weight: f64,
    min_f_d_ratio: f64,
    max_f_d_ratio: f64,
    desired_range_km: f64,
}

impl OptimizationConstraints {
    /// Build a validated constraint set. Diameters in metres, weight in
    /// kilograms, range in kilometres.
    pub fn new(
        min_diameter: f64,
        max_diameter: f64,
        max_weight: f64,
        min_f_d_ratio: f64,
        max_f_d_ratio: f64,
        desired_range_km: f64,
    ) -> SogaResult<Self> {
        if min_diameter <= 0.0 {
            return Err(SogaError::InvalidConstraints(format!(
                "min_diameter must be positive, got {min_diameter}"
            )));
        }
        if max_diameter <= 0.0 {
            return Err(SogaError::InvalidConstraints(format!(
                "max_diameter must be positive, got {max_diameter}"
            )));
        }
        if min_diameter >= max_diameter {
            return Err(SogaError::InvalidConstraints(format!(
                "min_diameter ({min_diameter}) must be less than max_diameter \
                 ({max_diameter})"
            )));
        }
        if max_weight <= 0.0 {
            return Err(SogaError::InvalidConstraints(format!(
                "max_weight must be positive, got {max_weight}"
            )));
        }
        if min_f_d_ratio <= 0.0 {
            return Err(SogaError::InvalidConstraints(format!(
                "min_f_d_ratio must be positive, got {min_f_d_ratio}"
            )));
        }
        if max_f_d_ratio <= 0.0 {
            return Err(SogaError::InvalidConstraints(format!(
                "max_f_d_ratio must be positive, got {max_f_d_ratio}"
            )));
        }
        if min_f_d_ratio >= max_f_d_ratio {
            return Err(SogaError::InvalidConstraints(format!(
                "min_f_d_ratio ({min_f_d_ratio}) must be less than \
                 max_f_d_ratio ({max_f_d_ratio})"
            )));
        }
        if desired_range_km <= 0.0 {
            return Err(SogaError::InvalidConstraints(format!(
                "desired_range_km must be positive, got {desired_range_km}"
            )));
        }
        Ok(Self {
            min_diameter,
            max_diameter,
            max_weight,
            min_f_d_ratio,
            max_f_d_ratio,
            desired_range_km,
        })
    }

    pub fn min_diameter(&self) -> f64 {
        self.min_diameter
    }

    pub fn max_diameter(&self) -> f64 {
        self.max_diameter
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    pub fn min_f_d_ratio(&self) -> f64 {
        self.min_f_d_ratio
    }

    pub fn max_f_d_ratio(&self) -> f64 {
        self.max_f_d_ratio
    }

    pub fn desired_range_km(&self) -> f64 {
        self.desired_range_km
    }
}

/// One member of the computed Pareto front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParetoPoint {
    /// Reflector diameter in metres.
    pub diameter: f64,
    /// Focal ratio f/D.
    pub f_d_ratio: f64,
    /// Gain in dBi (already converted back from the minimized negative).
    pub gain: f64,
    /// Total antenna weight in kilograms.
    pub weight: f64,
}

/// Final output of one optimization run.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    /// The knee-point design selected from the Pareto front.
    pub optimal_geometry: AntennaGeometry,
    /// Metrics recomputed for the selected design with the exact
    /// efficiency model.
    pub performance_metrics: PerformanceMetrics,
    /// Best gain (dBi) per generation, earliest first. May be empty if no
    /// generation data was recoverable.
    pub convergence_history: Vec<f64>,
    /// The full non-dominated set, for visualization by callers.
    pub pareto_front: Vec<ParetoPoint>,
}
