//! Seeded NSGA-II solver for bounded real-valued problems
//!
//! Non-dominated Sorting Genetic Algorithm II (Deb et al., 2002) over real
//! decision vectors with box bounds and inequality constraints. The solver
//! is deliberately problem-agnostic: it pulls objective and constraint
//! values from a batch evaluation callback, one call per generation, so the
//! problem side can vectorize freely.
//!
//! Randomness comes exclusively from a [`rand::rngs::StdRng`] seeded from
//! the configuration, which makes every run reproducible bit for bit.
//!
//! ## Example
//!
//! ```rust
//! use soga_core::nsga2::{BatchEvaluation, Nsga2, Nsga2Config};
//!
//! // Minimize (x², (x-2)²) on [0, 2], a classic convex bi-objective.
//! let config = Nsga2Config {
//!     population_size: 20,
//!     max_generations: 10,
//!     bounds: vec![(0.0, 2.0)],
//!     ..Default::default()
//! };
//! let mut solver = Nsga2::new(config);
//! let outcome = solver
//!     .run(|candidates| {
//!         let objectives = candidates
//!             .iter()
//!             .map(|x| vec![x[0] * x[0], (x[0] - 2.0) * (x[0] - 2.0)])
//!             .collect();
//!         Ok(BatchEvaluation {
//!             objectives,
//!             violations: vec![0.0; candidates.len()],
//!         })
//!     })
//!     .unwrap();
//! assert!(!outcome.front.is_empty());
//! ```

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{SogaError, SogaResult};

/// Objectives and constraint values for one batch of candidates.
///
/// `objectives[i]` and `violations[i]` describe `candidates[i]`; violations
/// follow the g(x) ≤ 0 convention (positive means infeasible).
#[derive(Debug, Clone)]
pub struct BatchEvaluation {
    pub objectives: Vec<Vec<f64>>,
    pub violations: Vec<f64>,
}

/// Solver parameters.
#[derive(Debug, Clone)]
pub struct Nsga2Config {
    /// Individuals per generation.
    pub population_size: usize,
    /// Generations to run, counting the initial population as the first.
    pub max_generations: usize,
    /// Probability of applying SBX crossover to a parent pair.
    pub crossover_probability: f64,
    /// Per-variable probability of polynomial mutation.
    pub mutation_probability: f64,
    /// SBX distribution index (larger = children closer to parents).
    pub crossover_eta: f64,
    /// Polynomial mutation distribution index.
    pub mutation_eta: f64,
    /// Box bounds per decision variable.
    pub bounds: Vec<(f64, f64)>,
    /// RNG seed.
    pub seed: u64,
}

impl Default for Nsga2Config {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 50,
            crossover_probability: 0.9,
            mutation_probability: 0.5,
            crossover_eta: 15.0,
            mutation_eta: 20.0,
            bounds: Vec::new(),
            seed: 42,
        }
    }
}

/// One candidate solution with its evaluation and ranking state.
#[derive(Debug, Clone)]
pub struct Individual {
    /// Decision variables.
    pub x: Vec<f64>,
    /// Objective values (all minimized).
    pub objectives: Vec<f64>,
    /// Aggregated constraint violation; 0.0 means feasible.
    pub violation: f64,
    rank: usize,
    crowding: f64,
}

impl Individual {
    fn new(x: Vec<f64>) -> Self {
        Self {
            x,
            objectives: Vec::new(),
            violation: 0.0,
            rank: usize::MAX,
            crowding: 0.0,
        }
    }

    /// Whether the candidate satisfies every constraint.
    pub fn is_feasible(&self) -> bool {
        self.violation <= 0.0
    }

    /// Constraint-domination (Deb's rules): a feasible solution dominates
    /// any infeasible one; two infeasible solutions compare by violation;
    /// two feasible ones by Pareto dominance.
    fn dominates(&self, other: &Individual) -> bool {
        let self_ok = self.is_feasible();
        let other_ok = other.is_feasible();
        if self_ok != other_ok {
            return self_ok;
        }
        if !self_ok {
            return self.violation < other.violation;
        }

        let mut strictly_better = false;
        for (a, b) in self.objectives.iter().zip(&other.objectives) {
            if a > b {
                return false;
            }
            if a < b {
                strictly_better = true;
            }
        }
        strictly_better
    }
}

/// Best feasible objective values observed in one generation, or `None`
/// when the whole generation was infeasible.
#[derive(Debug, Clone)]
pub struct GenerationRecord {
    pub best_objectives: Option<Vec<f64>>,
}

/// Final state of a solver run.
#[derive(Debug, Clone)]
pub struct Nsga2Outcome {
    /// Feasible rank-0 individuals of the last generation.
    pub front: Vec<Individual>,
    /// One record per generation, earliest first.
    pub history: Vec<GenerationRecord>,
}

/// NSGA-II optimizer.
pub struct Nsga2 {
    config: Nsga2Config,
    rng: StdRng,
    population: Vec<Individual>,
}

impl Nsga2 {
    pub fn new(config: Nsga2Config) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            population: Vec::new(),
        }
    }

    /// Run the full generational loop.
    ///
    /// `evaluate` receives every candidate of a generation in one call and
    /// must return objectives and violations in the same row order.
    pub fn run<F>(&mut self, mut evaluate: F) -> SogaResult<Nsga2Outcome>
    where
        F: FnMut(&[Vec<f64>]) -> SogaResult<BatchEvaluation>,
    {
        if self.config.bounds.is_empty() {
            return Err(SogaError::InvalidConfig(
                "NSGA-II requires at least one bounded decision variable".into(),
            ));
        }
        for (i, (lo, hi)) in self.config.bounds.iter().enumerate() {
            if !(lo < hi) {
                return Err(SogaError::InvalidConfig(format!(
                    "bound {i} is empty or inverted: [{lo}, {hi}]"
                )));
            }
        }

        self.initialize_population();
        self.evaluate_population(0, self.config.population_size, &mut evaluate)?;
        self.rank_population();

        let mut history = Vec::with_capacity(self.config.max_generations);
        history.push(self.record_generation());

        for _ in 1..self.config.max_generations {
            let offspring = self.breed_offspring();
            let first_child = self.population.len();
            self.population.extend(offspring);
            self.evaluate_population(first_child, self.population.len(), &mut evaluate)?;
            self.rank_population();
            self.truncate_population();
            history.push(self.record_generation());
        }

        let front = self
            .population
            .iter()
            .filter(|ind| ind.rank == 0 && ind.is_feasible())
            .cloned()
            .collect();

        Ok(Nsga2Outcome { front, history })
    }

    /// Uniform random sampling within the box bounds.
    fn initialize_population(&mut self) {
        let n = self.config.population_size;
        self.population = Vec::with_capacity(n);
        for _ in 0..n {
            let x = self
                .config
                .bounds
                .iter()
                .map(|&(lo, hi)| lo + self.rng.gen::<f64>() * (hi - lo))
                .collect();
            self.population.push(Individual::new(x));
        }
    }

    /// Evaluate `population[start..end]` with one batch callback invocation.
    fn evaluate_population<F>(&mut self, start: usize, end: usize, evaluate: &mut F) -> SogaResult<()>
    where
        F: FnMut(&[Vec<f64>]) -> SogaResult<BatchEvaluation>,
    {
        let candidates: Vec<Vec<f64>> = self.population[start..end]
            .iter()
            .map(|ind| ind.x.clone())
            .collect();
        let evaluation = evaluate(&candidates)?;
        if evaluation.objectives.len() != candidates.len()
            || evaluation.violations.len() != candidates.len()
        {
            return Err(SogaError::InvalidParameter(format!(
                "batch evaluation returned {} objective rows and {} violations \
                 for {} candidates",
                evaluation.objectives.len(),
                evaluation.violations.len(),
                candidates.len()
            )));
        }
        for (ind, (objectives, violation)) in self.population[start..end]
            .iter_mut()
            .zip(evaluation.objectives.into_iter().zip(evaluation.violations))
        {
            ind.objectives = objectives;
            ind.violation = violation.max(0.0);
        }
        Ok(())
    }

    /// Fast non-dominated sorting followed by crowding-distance assignment.
    fn rank_population(&mut self) {
        let n = self.population.len();
        let mut domination_count = vec![0usize; n];
        let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];

        for i in 0..n {
            for j in (i + 1)..n {
                if self.population[i].dominates(&self.population[j]) {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                } else if self.population[j].dominates(&self.population[i]) {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
            }
        }

        let mut current: Vec<usize> = Vec::new();
        for i in 0..n {
            self.population[i].rank = usize::MAX;
            if domination_count[i] == 0 {
                self.population[i].rank = 0;
                current.push(i);
            }
        }

        let mut front_index = 0;
        while !current.is_empty() {
            let mut next = Vec::new();
            for &i in &current {
                for &j in &dominated_by[i] {
                    domination_count[j] -= 1;
                    if domination_count[j] == 0 {
                        self.population[j].rank = front_index + 1;
                        next.push(j);
                    }
                }
            }
            front_index += 1;
            current = next;
        }

        self.assign_crowding_distances();
    }

    fn assign_crowding_distances(&mut self) {
        let n = self.population.len();
        if n == 0 {
            return;
        }
        for ind in &mut self.population {
            ind.crowding = 0.0;
        }
        let n_obj = self.population[0].objectives.len();
        let max_rank = self.population.iter().map(|i| i.rank).max().unwrap_or(0);

        for rank in 0..=max_rank {
            let mut front: Vec<usize> = (0..n)
                .filter(|&i| self.population[i].rank == rank)
                .collect();
            if front.is_empty() {
                continue;
            }
            if front.len() <= 2 {
                for &i in &front {
                    self.population[i].crowding = f64::INFINITY;
                }
                continue;
            }
            for m in 0..n_obj {
                front.sort_by(|&a, &b| {
                    self.population[a].objectives[m]
                        .partial_cmp(&self.population[b].objectives[m])
                        .unwrap_or(Ordering::Equal)
                });
                let first = front[0];
                let last = front[front.len() - 1];
                self.population[first].crowding = f64::INFINITY;
                self.population[last].crowding = f64::INFINITY;

                let span = self.population[last].objectives[m]
                    - self.population[first].objectives[m];
                let span = if span.abs() > 1e-12 { span } else { 1.0 };
                for w in 1..front.len() - 1 {
                    let gap = self.population[front[w + 1]].objectives[m]
                        - self.population[front[w - 1]].objectives[m];
                    self.population[front[w]].crowding += gap / span;
                }
            }
        }
    }

    /// Binary tournament by rank, ties broken by crowding distance.
    fn tournament_select(&mut self) -> usize {
        let a = self.rng.gen_range(0..self.population.len());
        let b = self.rng.gen_range(0..self.population.len());
        let ia = &self.population[a];
        let ib = &self.population[b];
        if ia.rank != ib.rank {
            if ia.rank < ib.rank {
                a
            } else {
                b
            }
        } else if ia.crowding >= ib.crowding {
            a
        } else {
            b
        }
    }

    /// Simulated binary crossover on one parent pair.
    fn sbx_crossover(&mut self, p1: &[f64], p2: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut c1 = p1.to_vec();
        let mut c2 = p2.to_vec();
        if self.rng.gen::<f64>() > self.config.crossover_probability {
            return (c1, c2);
        }
        for v in 0..p1.len() {
            if self.rng.gen::<f64>() > 0.5 {
                continue;
            }
            let (lo, hi) = self.config.bounds[v];
            let y1 = p1[v].min(p2[v]);
            let y2 = p1[v].max(p2[v]);
            if (y2 - y1).abs() < 1e-12 {
                continue;
            }
            let eta = self.config.crossover_eta;
            let beta = 1.0 + 2.0 * (y1 - lo) / (y2 - y1);
            let alpha = 2.0 - beta.powf(-(eta + 1.0));
            let u = self.rng.gen::<f64>();
            let betaq = if u <= 1.0 / alpha {
                (u * alpha).powf(1.0 / (eta + 1.0))
            } else {
                (1.0 / (2.0 - u * alpha)).powf(1.0 / (eta + 1.0))
            };
            c1[v] = (0.5 * ((y1 + y2) - betaq * (y2 - y1))).clamp(lo, hi);
            c2[v] = (0.5 * ((y1 + y2) + betaq * (y2 - y1))).clamp(lo, hi);
        }
        (c1, c2)
    }

    /// Polynomial mutation, applied per variable.
    fn polynomial_mutation(&mut self, x: &mut [f64]) {
        for v in 0..x.len() {
            if self.rng.gen::<f64>() > self.config.mutation_probability {
                continue;
            }
            let (lo, hi) = self.config.bounds[v];
            let span = hi - lo;
            let delta_lo = (x[v] - lo) / span;
            let delta_hi = (hi - x[v]) / span;
            let eta = self.config.mutation_eta;
            let u = self.rng.gen::<f64>();
            let deltaq = if u < 0.5 {
                let xy = 1.0 - delta_lo;
                let val = 2.0 * u + (1.0 - 2.0 * u) * xy.powf(eta + 1.0);
                val.powf(1.0 / (eta + 1.0)) - 1.0
            } else {
                let xy = 1.0 - delta_hi;
                let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * xy.powf(eta + 1.0);
                1.0 - val.powf(1.0 / (eta + 1.0))
            };
            x[v] = (x[v] + deltaq * span).clamp(lo, hi);
        }
    }

    /// Produce a full offspring population via tournament + SBX + mutation.
    fn breed_offspring(&mut self) -> Vec<Individual> {
        let n = self.config.population_size;
        let mut offspring = Vec::with_capacity(n);
        while offspring.len() < n {
            let a = self.tournament_select();
            let b = self.tournament_select();
            let p1 = self.population[a].x.clone();
            let p2 = self.population[b].x.clone();
            let (mut c1, mut c2) = self.sbx_crossover(&p1, &p2);
            self.polynomial_mutation(&mut c1);
            self.polynomial_mutation(&mut c2);
            offspring.push(Individual::new(c1));
            if offspring.len() < n {
                offspring.push(Individual::new(c2));
            }
        }
        offspring
    }

    /// (μ+λ) environmental selection: keep the best `population_size`
    /// individuals by rank, then crowding distance.
    fn truncate_population(&mut self) {
        let mut order: Vec<usize> = (0..self.population.len()).collect();
        order.sort_by(|&a, &b| {
            let ia = &self.population[a];
            let ib = &self.population[b];
            ia.rank.cmp(&ib.rank).then_with(|| {
                ib.crowding
                    .partial_cmp(&ia.crowding)
                    .unwrap_or(Ordering::Equal)
            })
        });
        let kept: Vec<Individual> = order
            .into_iter()
            .take(self.config.population_size)
            .map(|i| self.population[i].clone())
            .collect();
        self.population = kept;
    }

    fn record_generation(&self) -> GenerationRecord {
        let n_obj = self
            .population
            .first()
            .map(|i| i.objectives.len())
            .unwrap_or(0);
        let mut best: Option<Vec<f64>> = None;
        for ind in self.population.iter().filter(|i| i.is_feasible()) {
            match &mut best {
                None => best = Some(ind.objectives.clone()),
                Some(current) => {
                    for m in 0..n_obj {
                        if ind.objectives[m] < current[m] {
                            current[m] = ind.objectives[m];
                        }
                    }
                }
            }
        }
        GenerationRecord {
            best_objectives: best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schaffer_config() -> Nsga2Config {
        Nsga2Config {
            population_size: 40,
            max_generations: 30,
            bounds: vec![(-5.0, 5.0)],
            ..Default::default()
        }
    }

    fn schaffer(candidates: &[Vec<f64>]) -> SogaResult<BatchEvaluation> {
        // Schaffer N.1: f1 = x², f2 = (x − 2)²; front is x ∈ [0, 2].
        let objectives = candidates
            .iter()
            .map(|x| vec![x[0] * x[0], (x[0] - 2.0) * (x[0] - 2.0)])
            .collect();
        Ok(BatchEvaluation {
            objectives,
            violations: vec![0.0; candidates.len()],
        })
    }

    #[test]
    fn solves_schaffer_front() {
        let mut solver = Nsga2::new(schaffer_config());
        let outcome = solver.run(schaffer).expect("run succeeds");
        assert!(!outcome.front.is_empty());
        for ind in &outcome.front {
            assert!(
                (-0.2..=2.2).contains(&ind.x[0]),
                "front member x = {} far from the known Pareto set [0, 2]",
                ind.x[0]
            );
        }
    }

    #[test]
    fn identical_seeds_reproduce_the_run() {
        let run = || {
            let mut solver = Nsga2::new(schaffer_config());
            solver.run(schaffer).unwrap()
        };
        let a = run();
        let b = run();
        assert_eq!(a.front.len(), b.front.len());
        for (ia, ib) in a.front.iter().zip(&b.front) {
            assert_eq!(ia.x, ib.x, "seeded runs must be bit-identical");
            assert_eq!(ia.objectives, ib.objectives);
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Nsga2::new(schaffer_config());
        let mut b = Nsga2::new(Nsga2Config {
            seed: 7,
            ..schaffer_config()
        });
        let fa = a.run(schaffer).unwrap();
        let fb = b.run(schaffer).unwrap();
        let same = fa.front.len() == fb.front.len()
            && fa.front.iter().zip(&fb.front).all(|(x, y)| x.x == y.x);
        assert!(!same, "different seeds should explore differently");
    }

    #[test]
    fn history_has_one_record_per_generation() {
        let mut solver = Nsga2::new(schaffer_config());
        let outcome = solver.run(schaffer).unwrap();
        assert_eq!(outcome.history.len(), 30);
        assert!(outcome.history[0].best_objectives.is_some());
    }

    #[test]
    fn history_best_objective_never_worsens() {
        let mut solver = Nsga2::new(schaffer_config());
        let outcome = solver.run(schaffer).unwrap();
        let firsts: Vec<f64> = outcome
            .history
            .iter()
            .filter_map(|r| r.best_objectives.as_ref().map(|b| b[0]))
            .collect();
        for w in firsts.windows(2) {
            assert!(
                w[1] <= w[0] + 1e-12,
                "elitism should keep the best objective monotone: {w:?}"
            );
        }
    }

    #[test]
    fn infeasible_constraint_empties_the_front() {
        let config = Nsga2Config {
            population_size: 20,
            max_generations: 10,
            bounds: vec![(0.0, 1.0)],
            ..Default::default()
        };
        let mut solver = Nsga2::new(config);
        let outcome = solver
            .run(|candidates| {
                let objectives = candidates.iter().map(|x| vec![x[0], 1.0 - x[0]]).collect();
                // g(x) = 1 > 0 everywhere: nothing is ever feasible.
                Ok(BatchEvaluation {
                    objectives,
                    violations: vec![1.0; candidates.len()],
                })
            })
            .unwrap();
        assert!(outcome.front.is_empty());
        assert!(outcome.history.iter().all(|r| r.best_objectives.is_none()));
    }

    #[test]
    fn rejects_empty_and_inverted_bounds() {
        let mut solver = Nsga2::new(Nsga2Config {
            bounds: vec![],
            ..Default::default()
        });
        assert!(solver.run(schaffer).is_err());

        let mut solver = Nsga2::new(Nsga2Config {
            bounds: vec![(2.0, 1.0)],
            ..Default::default()
        });
        assert!(solver.run(schaffer).is_err());
    }

    #[test]
    fn constraint_domination_prefers_feasible() {
        let mut feasible = Individual::new(vec![0.0]);
        feasible.objectives = vec![10.0, 10.0];
        feasible.violation = 0.0;
        let mut infeasible = Individual::new(vec![0.0]);
        infeasible.objectives = vec![0.0, 0.0];
        infeasible.violation = 0.5;
        assert!(feasible.dominates(&infeasible));
        assert!(!infeasible.dominates(&feasible));
    }
}
