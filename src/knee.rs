//! Knee-point selection on a bi-objective Pareto front
//!
//! Collapses a computed Pareto front to a single best-compromise solution:
//! normalize both objectives to [0, 1], draw the straight line between the
//! two extreme points, and pick the solution bulging furthest from that
//! line (maximum perpendicular distance, Branke et al. 2004). A front that
//! degenerates to a point after normalization returns its first member.
//!
//! Pure function of the decision and objective arrays; no solver state.
//!
//! ## Example
//!
//! ```rust
//! use soga_core::knee::select_knee_point;
//!
//! let x = vec![vec![0.0], vec![1.0], vec![2.0]];
//! // The middle point bulges below the line joining the extremes.
//! let f = vec![vec![0.0, 1.0], vec![0.2, 0.2], vec![1.0, 0.0]];
//! let knee = select_knee_point(&x, &f).unwrap();
//! assert_eq!(knee, vec![1.0]);
//! ```

use crate::models::{SogaError, SogaResult};

/// Select the knee point of a front described by decision vectors `x` and
/// parallel bi-objective rows `f` (both minimized). Returns the decision
/// vector of the selected solution.
pub fn select_knee_point(x: &[Vec<f64>], f: &[Vec<f64>]) -> SogaResult<Vec<f64>> {
    if x.is_empty() || x.len() != f.len() {
        return Err(SogaError::InvalidParameter(format!(
            "knee selection needs matching non-empty arrays, got {} decision \
             vectors and {} objective rows",
            x.len(),
            f.len()
        )));
    }
    if x.len() == 1 {
        return Ok(x[0].clone());
    }

    // Per-objective min/max normalization; a collapsed column normalizes
    // with range 1.0 to avoid division by zero.
    let n_obj = f[0].len();
    let mut lo = vec![f64::INFINITY; n_obj];
    let mut hi = vec![f64::NEG_INFINITY; n_obj];
    for row in f {
        for m in 0..n_obj {
            lo[m] = lo[m].min(row[m]);
            hi[m] = hi[m].max(row[m]);
        }
    }
    let range: Vec<f64> = lo
        .iter()
        .zip(&hi)
        .map(|(l, h)| if h - l == 0.0 { 1.0 } else { h - l })
        .collect();
    let normalized: Vec<Vec<f64>> = f
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(m, v)| (v - lo[m]) / range[m])
                .collect()
        })
        .collect();

    // Extremes: best in each objective after normalization.
    let argmin = |m: usize| -> usize {
        let mut best = 0;
        for (i, row) in normalized.iter().enumerate() {
            if row[m] < normalized[best][m] {
                best = i;
            }
        }
        best
    };
    let p1 = &normalized[argmin(0)];
    let p2 = &normalized[argmin(1)];

    let line = [p2[0] - p1[0], p2[1] - p1[1]];
    let line_length = (line[0] * line[0] + line[1] * line[1]).sqrt();
    if line_length == 0.0 {
        // Front collapsed to a single point after normalization.
        return Ok(x[0].clone());
    }

    // Perpendicular distance via the 2D cross-product magnitude.
    let mut knee = 0;
    let mut best_distance = f64::NEG_INFINITY;
    for (i, point) in normalized.iter().enumerate() {
        let to_point = [p1[0] - point[0], p1[1] - point[1]];
        let cross = (line[0] * to_point[1] - line[1] * to_point[0]).abs();
        let distance = cross / line_length;
        if distance > best_distance {
            best_distance = distance;
            knee = i;
        }
    }

    Ok(x[knee].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_solution_returned_unchanged() {
        let x = vec![vec![1.25, 0.45]];
        let f = vec![vec![-30.0, 0.8]];
        let knee = select_knee_point(&x, &f).unwrap();
        assert_eq!(knee, vec![1.25, 0.45]);
    }

    #[test]
    fn picks_the_bulge_of_a_convex_front() {
        // Points on the unit trade-off line except the third, which bulges
        // toward the origin.
        let x = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]];
        let f = vec![
            vec![0.0, 1.0],
            vec![0.5, 0.5],
            vec![0.1, 0.1],
            vec![1.0, 0.0],
        ];
        let knee = select_knee_point(&x, &f).unwrap();
        assert_eq!(knee, vec![2.0]);
    }

    #[test]
    fn coincident_extremes_fall_back_to_first() {
        // Every objective row identical: both extremes normalize to the
        // same point and the line has zero length.
        let x = vec![vec![10.0], vec![20.0], vec![30.0]];
        let f = vec![vec![1.0, 2.0], vec![1.0, 2.0], vec![1.0, 2.0]];
        let knee = select_knee_point(&x, &f).unwrap();
        assert_eq!(knee, vec![10.0]);
    }

    #[test]
    fn zero_range_column_does_not_divide_by_zero() {
        // Second objective constant across the front.
        let x = vec![vec![0.0], vec![1.0], vec![2.0]];
        let f = vec![vec![0.0, 5.0], vec![0.4, 5.0], vec![1.0, 5.0]];
        let knee = select_knee_point(&x, &f).unwrap();
        assert_eq!(knee.len(), 1);
    }

    #[test]
    fn rejects_mismatched_or_empty_input() {
        assert!(select_knee_point(&[], &[]).is_err());
        let x = vec![vec![0.0]];
        let f = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        assert!(select_knee_point(&x, &f).is_err());
    }

    #[test]
    fn invariant_under_objective_scaling() {
        // Normalization should make the choice scale-free.
        let x = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]];
        let f1 = vec![
            vec![0.0, 1.0],
            vec![0.5, 0.5],
            vec![0.1, 0.1],
            vec![1.0, 0.0],
        ];
        let f2: Vec<Vec<f64>> = f1
            .iter()
            .map(|row| vec![row[0] * 1000.0, row[1] * 0.001])
            .collect();
        assert_eq!(
            select_knee_point(&x, &f1).unwrap(),
            select_knee_point(&x, &f2).unwrap()
        );
    }
}
