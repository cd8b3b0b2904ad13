//! Application facade for antenna design optimization
//!
//! Wraps the optimization engine behind a request/summary pair expressed
//! in user units: payloads in grams, ranges in kilometres on the way in,
//! fabrication millimetres on the way out. The facade validates requests
//! against realistic manufacturing limits, runs the link-budget range
//! pre-check, and only then spends the genetic-search budget.
//!
//! ## Example
//!
//! ```rust,no_run
//! use soga_core::facade::{DesignFacade, DesignRequest};
//!
//! let facade = DesignFacade::with_defaults().unwrap();
//! let summary = facade.run(&DesignRequest::default()).unwrap();
//! println!(
//!     "D = {} mm, f = {} mm, gain = {} dBi",
//!     summary.optimal_diameter_mm, summary.optimal_focal_length_mm, summary.expected_gain_dbi
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, LinkBudgetParams, SimulationConfig};
use crate::engine::OptimizationEngine;
use crate::models::{OptimizationConstraints, SogaError, SogaResult};
use crate::physics::validate_range_feasibility;

/// Realistic manufacturing and operating limits for small-platform
/// reflector antennas. Requests outside these bounds are rejected before
/// any physics runs.
pub const MIN_DIAMETER_LIMIT_M: f64 = 0.05;
pub const MAX_DIAMETER_LIMIT_M: f64 = 5.0;
pub const MIN_PAYLOAD_LIMIT_G: f64 = 10.0;
pub const MAX_PAYLOAD_LIMIT_G: f64 = 50_000.0;
pub const MIN_RANGE_LIMIT_KM: f64 = 0.1;
pub const MAX_RANGE_LIMIT_KM: f64 = 100.0;

/// A design request in user units (metres, grams, kilometres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignRequest {
    pub min_diameter_m: f64,
    pub max_diameter_m: f64,
    /// Antenna mass budget in grams.
    pub max_payload_g: f64,
    pub min_f_d_ratio: f64,
    pub max_f_d_ratio: f64,
    pub desired_range_km: f64,
}

impl Default for DesignRequest {
    fn default() -> Self {
        Self {
            min_diameter_m: 0.1,
            max_diameter_m: 2.0,
            max_payload_g: 1000.0,
            min_f_d_ratio: 0.3,
            max_f_d_ratio: 0.8,
            desired_range_km: 10.0,
        }
    }
}

/// Optimization outcome formatted for fabrication.
///
/// Dimensions are in millimetres rounded to 0.01 mm, the focal ratio to
/// three decimals, gain and beamwidth to two. The convergence history
/// keeps full precision for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSummary {
    pub optimal_diameter_mm: f64,
    pub optimal_focal_length_mm: f64,
    pub optimal_depth_mm: f64,
    pub f_d_ratio: f64,
    pub expected_gain_dbi: f64,
    pub beamwidth_deg: f64,
    pub convergence: Vec<f64>,
}

/// High-level entry point: request in, summary out.
#[derive(Debug, Clone)]
pub struct DesignFacade {
    engine: OptimizationEngine,
    link_budget: LinkBudgetParams,
}

impl DesignFacade {
    pub fn new(engine: OptimizationEngine, link_budget: LinkBudgetParams) -> SogaResult<Self> {
        link_budget.validate()?;
        Ok(Self {
            engine,
            link_budget,
        })
    }

    /// Facade over an engine with default simulation and search settings.
    pub fn with_defaults() -> SogaResult<Self> {
        let engine = OptimizationEngine::new(EngineConfig::default(), SimulationConfig::default())?;
        Self::new(engine, LinkBudgetParams::default())
    }

    /// Validate, pre-check the link budget, optimize, format.
    pub fn run(&self, request: &DesignRequest) -> SogaResult<DesignSummary> {
        let constraints = self.build_constraints(request)?;
        let result = self.engine.run(&constraints)?;

        let geometry = &result.optimal_geometry;
        let metrics = &result.performance_metrics;
        Ok(DesignSummary {
            optimal_diameter_mm: round_to(geometry.diameter() * 1000.0, 2),
            optimal_focal_length_mm: round_to(geometry.focal_length() * 1000.0, 2),
            optimal_depth_mm: round_to(geometry.depth() * 1000.0, 2),
            f_d_ratio: round_to(geometry.f_d_ratio(), 3),
            expected_gain_dbi: round_to(metrics.gain_dbi(), 2),
            beamwidth_deg: round_to(metrics.beamwidth_deg(), 2),
            convergence: result.convergence_history,
        })
    }

    /// Translate a request into validated domain constraints.
    ///
    /// Rejects values outside the realistic limits, converts grams to
    /// kilograms and confirms with the link budget that the desired range
    /// is reachable with the allowed antenna sizes.
    fn build_constraints(&self, request: &DesignRequest) -> SogaResult<OptimizationConstraints> {
        check_limit(
            "min_diameter_m",
            request.min_diameter_m,
            MIN_DIAMETER_LIMIT_M,
            MAX_DIAMETER_LIMIT_M,
        )?;
        check_limit(
            "max_diameter_m",
            request.max_diameter_m,
            MIN_DIAMETER_LIMIT_M,
            MAX_DIAMETER_LIMIT_M,
        )?;
        check_limit(
            "max_payload_g",
            request.max_payload_g,
            MIN_PAYLOAD_LIMIT_G,
            MAX_PAYLOAD_LIMIT_G,
        )?;
        check_limit(
            "min_f_d_ratio",
            request.min_f_d_ratio,
            crate::models::MIN_F_D_RATIO,
            crate::models::MAX_F_D_RATIO,
        )?;
        check_limit(
            "max_f_d_ratio",
            request.max_f_d_ratio,
            crate::models::MIN_F_D_RATIO,
            crate::models::MAX_F_D_RATIO,
        )?;
        check_limit(
            "desired_range_km",
            request.desired_range_km,
            MIN_RANGE_LIMIT_KM,
            MAX_RANGE_LIMIT_KM,
        )?;

        let max_weight_kg = request.max_payload_g / 1000.0;
        let constraints = OptimizationConstraints::new(
            request.min_diameter_m,
            request.max_diameter_m,
            max_weight_kg,
            request.min_f_d_ratio,
            request.max_f_d_ratio,
            request.desired_range_km,
        )?;

        let simulation = self.engine.simulation();
        let feasibility = validate_range_feasibility(
            constraints.max_diameter(),
            constraints.desired_range_km(),
            simulation.frequency_ghz,
            simulation.aperture_efficiency,
            &self.link_budget,
        )?;
        if !feasibility.is_feasible {
            let mut message = format!(
                "desired range of {} km is not reachable with a {} m antenna: \
                 link margin {:.1} dB is below the required {:.1} dB",
                constraints.desired_range_km(),
                constraints.max_diameter(),
                feasibility.link.link_margin_db,
                self.link_budget.min_link_margin_db,
            );
            if let Some(range) = feasibility.achievable_range_km {
                message.push_str(&format!("; achievable range is {range:.1} km"));
            }
            if let Some(diameter) = feasibility.required_diameter_m {
                message.push_str(&format!("; required diameter is {diameter:.2} m"));
            }
            return Err(SogaError::InvalidConstraints(message));
        }

        Ok(constraints)
    }
}

fn check_limit(name: &str, value: f64, min: f64, max: f64) -> SogaResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(SogaError::InvalidParameter(format!(
            "{name} = {value} is outside the realistic range [{min}, {max}]"
        )));
    }
    Ok(())
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
