//! Antenna design as a multi-objective search problem
//!
//! Encodes the dish-sizing trade-off for the genetic solver: two decision
//! variables (diameter and focal ratio), two minimized objectives (negative
//! gain and weight), and one inequality constraint (weight within the
//! payload budget).
//!
//! Evaluation is batch-oriented: all candidates of a generation are pushed
//! through the efficiency model and the gain equation in one call, and the
//! objective/constraint rows come back in input order.
//!
//! ## Example
//!
//! ```rust
//! use soga_core::config::SimulationConfig;
//! use soga_core::models::OptimizationConstraints;
//! use soga_core::problem::AntennaProblem;
//!
//! let constraints =
//!     OptimizationConstraints::new(0.1, 2.0, 1.0, 0.3, 0.8, 10.0).unwrap();
//! let problem = AntennaProblem::new(constraints, SimulationConfig::default()).unwrap();
//!
//! let eval = problem.evaluate(&[vec![1.0, 0.45]]).unwrap();
//! assert!(eval.objectives[0][0] < 0.0, "first objective is negative gain");
//! ```

use std::f64::consts::PI;

use crate::config::SimulationConfig;
use crate::models::{OptimizationConstraints, SogaResult};
use crate::nsga2::BatchEvaluation;
use crate::physics;

/// Index of the diameter variable in a decision vector.
pub const VAR_DIAMETER: usize = 0;

/// Index of the focal-ratio variable in a decision vector.
pub const VAR_F_D_RATIO: usize = 1;

/// The antenna sizing problem presented to the genetic solver.
#[derive(Debug, Clone)]
pub struct AntennaProblem {
    constraints: OptimizationConstraints,
    simulation: SimulationConfig,
}

impl AntennaProblem {
    /// Bind a validated constraint set and simulation constants into a
    /// solvable problem.
    pub fn new(
        constraints: OptimizationConstraints,
        simulation: SimulationConfig,
    ) -> SogaResult<Self> {
        simulation.validate()?;
        Ok(Self {
            constraints,
            simulation,
        })
    }

    /// Box bounds per decision variable: [diameter, f/D].
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        vec![
            (
                self.constraints.min_diameter(),
                self.constraints.max_diameter(),
            ),
            (
                self.constraints.min_f_d_ratio(),
                self.constraints.max_f_d_ratio(),
            ),
        ]
    }

    /// Total antenna mass for one diameter: reflector area times areal
    /// density plus the size-independent feed/strut mass.
    pub fn weight_kg(&self, diameter_m: f64) -> f64 {
        let reflector_area = (PI / 4.0) * diameter_m * diameter_m;
        reflector_area * self.simulation.reflector_areal_density_kg_per_m2
            + self.simulation.fixed_component_weight_kg
    }

    /// Evaluate a batch of candidate decision vectors.
    ///
    /// Returns per-candidate objective rows `[-gain_dbi, weight_kg]` and
    /// the single constraint value `weight − max_weight` (≤ 0 feasible),
    /// in the same order as the input.
    pub fn evaluate(&self, candidates: &[Vec<f64>]) -> SogaResult<BatchEvaluation> {
        let diameters: Vec<f64> = candidates.iter().map(|x| x[VAR_DIAMETER]).collect();
        let f_d_ratios: Vec<f64> = candidates.iter().map(|x| x[VAR_F_D_RATIO]).collect();

        let efficiencies = self.simulation.efficiency.evaluate_batch(&f_d_ratios);
        let gains = physics::calculate_gain_batch(
            &diameters,
            self.simulation.frequency_ghz,
            &efficiencies,
        )?;

        let mut objectives = Vec::with_capacity(candidates.len());
        let mut violations = Vec::with_capacity(candidates.len());
        for (gain, &diameter) in gains.iter().zip(&diameters) {
            let weight = self.weight_kg(diameter);
            objectives.push(vec![-gain, weight]);
            violations.push(weight - self.constraints.max_weight());
        }

        Ok(BatchEvaluation {
            objectives,
            violations,
        })
    }

    pub fn constraints(&self) -> &OptimizationConstraints {
        &self.constraints
    }

    pub fn simulation(&self) -> &SimulationConfig {
        &self.simulation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::calculate_gain;

    fn test_constraints() -> OptimizationConstraints {
        OptimizationConstraints::new(0.1, 2.0, 1.0, 0.3, 0.8, 10.0).unwrap()
    }

    #[test]
    fn bounds_follow_the_constraints() {
        let problem =
            AntennaProblem::new(test_constraints(), SimulationConfig::default()).unwrap();
        let bounds = problem.bounds();
        assert_eq!(bounds.len(), 2);
        assert_eq!(bounds[VAR_DIAMETER], (0.1, 2.0));
        assert_eq!(bounds[VAR_F_D_RATIO], (0.3, 0.8));
    }

    #[test]
    fn weight_model_is_area_times_density_plus_fixed() {
        let sim = SimulationConfig::default();
        let problem = AntennaProblem::new(test_constraints(), sim).unwrap();
        let expected = (PI / 4.0) * 1.0 * sim.reflector_areal_density_kg_per_m2
            + sim.fixed_component_weight_kg;
        assert!((problem.weight_kg(1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn evaluation_rows_match_candidate_order() {
        let sim = SimulationConfig::default();
        let problem = AntennaProblem::new(test_constraints(), sim).unwrap();
        let candidates = vec![vec![0.5, 0.45], vec![1.5, 0.6]];
        let eval = problem.evaluate(&candidates).unwrap();
        assert_eq!(eval.objectives.len(), 2);
        assert_eq!(eval.violations.len(), 2);

        for (row, candidate) in eval.objectives.iter().zip(&candidates) {
            let eta = sim.efficiency.evaluate(candidate[VAR_F_D_RATIO]);
            let gain =
                calculate_gain(candidate[VAR_DIAMETER], sim.frequency_ghz, eta).unwrap();
            assert!((row[0] + gain).abs() < 1e-12, "objective 0 is -gain");
            assert!(
                (row[1] - problem.weight_kg(candidate[VAR_DIAMETER])).abs() < 1e-12,
                "objective 1 is weight"
            );
        }
    }

    #[test]
    fn constraint_sign_convention() {
        let problem =
            AntennaProblem::new(test_constraints(), SimulationConfig::default()).unwrap();
        // A small dish is comfortably under the 1 kg budget; a huge one is not.
        let eval = problem.evaluate(&[vec![0.1, 0.45], vec![2.0, 0.45]]).unwrap();
        assert!(eval.violations[0] < 0.0, "small dish should be feasible");
        assert!(eval.violations[1] > 0.0, "2 m dish should break 1 kg budget");
    }

    #[test]
    fn larger_dish_gains_more_and_weighs_more() {
        let problem =
            AntennaProblem::new(test_constraints(), SimulationConfig::default()).unwrap();
        let eval = problem.evaluate(&[vec![0.3, 0.45], vec![1.2, 0.45]]).unwrap();
        // Negative gain objective falls as the dish grows.
        assert!(eval.objectives[1][0] < eval.objectives[0][0]);
        assert!(eval.objectives[1][1] > eval.objectives[0][1]);
    }
}
