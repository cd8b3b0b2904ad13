//! # Parabolic Antenna Design Optimizer
//!
//! This crate sizes parabolic reflector antennas for small RF platforms by
//! searching the diameter and focal-ratio space with a multi-objective
//! genetic algorithm, then picking the best gain/weight compromise.
//!
//! ## Overview
//!
//! The design question is always the same trade: a bigger dish gives more
//! gain but weighs more. The crate models that trade end to end:
//!
//! - **Physics**: aperture gain, half-power beamwidth, free-space path loss
//!   and a symmetric point-to-point link budget
//! - **Efficiency**: an asymmetric quadratic model of aperture efficiency
//!   versus focal ratio, calibrated against published reflector data
//! - **Optimization**: seeded NSGA-II with constraint domination over the
//!   two-variable design space, minimizing `(-gain, weight)`
//! - **Selection**: knee-point extraction from the Pareto front, so the
//!   returned design is the balanced compromise rather than an extreme
//!
//! ## Signal Flow
//!
//! ```text
//! DesignRequest → constraints + link-budget pre-check → NSGA-II search
//!              → Pareto front → knee point → exact metrics → DesignSummary
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use soga_core::facade::{DesignFacade, DesignRequest};
//!
//! let facade = DesignFacade::with_defaults().unwrap();
//! let request = DesignRequest {
//!     max_diameter_m: 1.2,
//!     max_payload_g: 800.0,
//!     desired_range_km: 15.0,
//!     ..DesignRequest::default()
//! };
//! let summary = facade.run(&request).unwrap();
//! println!(
//!     "dish {} mm, focal length {} mm, {} dBi",
//!     summary.optimal_diameter_mm, summary.optimal_focal_length_mm, summary.expected_gain_dbi
//! );
//! ```
//!
//! Every run is deterministic for a fixed seed; the core does no I/O and
//! holds no global state, so independent optimizations can run on separate
//! threads without coordination.

pub mod config;
pub mod efficiency;
pub mod engine;
pub mod facade;
pub mod knee;
pub mod models;
pub mod nsga2;
pub mod physics;
pub mod problem;

pub use config::{EngineConfig, LinkBudgetParams, SimulationConfig};
pub use efficiency::EfficiencyModel;
pub use engine::OptimizationEngine;
pub use facade::{DesignFacade, DesignRequest, DesignSummary};
pub use knee::select_knee_point;
pub use models::{
    AntennaGeometry, OptimizationConstraints, OptimizationResult, ParetoPoint,
    PerformanceMetrics, SogaError, SogaResult,
};
pub use nsga2::{BatchEvaluation, Individual, Nsga2, Nsga2Config, Nsga2Outcome};
pub use physics::{
    calculate_beamwidth, calculate_free_space_path_loss, calculate_gain, calculate_link_budget,
    validate_range_feasibility, LinkBudgetResult, RangeFeasibility,
};
pub use problem::AntennaProblem;
