//! Closed-form RF physics for parabolic reflectors
//!
//! Pure, stateless functions implementing the standard Balanis/Kraus
//! equations: aperture gain, half-power beamwidth, free-space path loss, and
//! a point-to-point link budget with a range-feasibility check. Gain is also
//! available in a batch form because the genetic search evaluates whole
//! populations per generation.
//!
//! ## Example
//!
//! ```rust
//! use soga_core::physics::{calculate_gain, calculate_beamwidth};
//!
//! // A 1 m dish at 10 GHz with 65% aperture efficiency.
//! let gain = calculate_gain(1.0, 10.0, 0.65).unwrap();
//! assert!((gain - 38.54).abs() < 0.1);
//!
//! let beamwidth = calculate_beamwidth(1.0, 2.4, 65.0).unwrap();
//! assert!((beamwidth - 8.12).abs() < 0.1);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::LinkBudgetParams;
use crate::models::{SogaError, SogaResult};

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Practical aperture-efficiency ceiling for parabolic reflectors. The
/// physical maximum is ~0.80 (spillover, blockage and illumination losses
/// are unavoidable); the extra margin absorbs numerical edge cases.
pub const MAX_APERTURE_EFFICIENCY: f64 = 0.85;

/// Aperture gain of a parabolic dish in dBi.
///
/// Implements G = η·(π·D/λ)² with λ = c/f, returned as 10·log10(G).
pub fn calculate_gain(
    diameter_m: f64,
    frequency_ghz: f64,
    aperture_efficiency: f64,
) -> SogaResult<f64> {
    if diameter_m <= 0.0 {
        return Err(SogaError::InvalidParameter(format!(
            "diameter must be positive, got {diameter_m}"
        )));
    }
    if frequency_ghz <= 0.0 {
        return Err(SogaError::InvalidParameter(format!(
            "frequency must be positive, got {frequency_ghz}"
        )));
    }
    if aperture_efficiency <= 0.0 {
        return Err(SogaError::InvalidParameter(format!(
            "aperture efficiency must be positive, got {aperture_efficiency}"
        )));
    }
    if aperture_efficiency > MAX_APERTURE_EFFICIENCY {
        return Err(SogaError::InvalidParameter(format!(
            "aperture efficiency {aperture_efficiency:.3} exceeds \
             {MAX_APERTURE_EFFICIENCY}; the physical maximum for parabolic \
             reflectors is ~0.80"
        )));
    }

    let wavelength = SPEED_OF_LIGHT / (frequency_ghz * 1e9);
    let gain_linear = aperture_efficiency * (PI * diameter_m / wavelength).powi(2);
    Ok(10.0 * gain_linear.log10())
}

/// Batch form of [`calculate_gain`]: one gain per (diameter, efficiency)
/// pair at a common frequency, in input order.
pub fn calculate_gain_batch(
    diameters_m: &[f64],
    frequency_ghz: f64,
    aperture_efficiencies: &[f64],
) -> SogaResult<Vec<f64>> {
    if diameters_m.len() != aperture_efficiencies.len() {
        return Err(SogaError::InvalidParameter(format!(
            "diameter and efficiency batches differ in length: {} vs {}",
            diameters_m.len(),
            aperture_efficiencies.len()
        )));
    }
    let mut gains = Vec::with_capacity(diameters_m.len());
    for (&d, &eta) in diameters_m.iter().zip(aperture_efficiencies) {
        gains.push(calculate_gain(d, frequency_ghz, eta)?);
    }
    Ok(gains)
}

/// Half-power beamwidth in degrees: θ = k·λ/D.
///
/// k = 65.0 matches typical illumination per IEEE Std 145-2013; Balanis'
/// optimal taper gives 58.4 and Kraus' uniform case 70.0.
pub fn calculate_beamwidth(diameter_m: f64, frequency_ghz: f64, k_factor: f64) -> SogaResult<f64> {
    if diameter_m <= 0.0 {
        return Err(SogaError::InvalidParameter(format!(
            "diameter must be positive, got {diameter_m}"
        )));
    }
    if frequency_ghz <= 0.0 {
        return Err(SogaError::InvalidParameter(format!(
            "frequency must be positive, got {frequency_ghz}"
        )));
    }
    if k_factor <= 0.0 {
        return Err(SogaError::InvalidParameter(format!(
            "k factor must be positive, got {k_factor}"
        )));
    }
    let wavelength = SPEED_OF_LIGHT / (frequency_ghz * 1e9);
    Ok(k_factor * wavelength / diameter_m)
}

/// Free-space path loss in dB (ITU-R form with distance in km and
/// frequency in GHz): FSPL = 20·log10(d) + 20·log10(f) + 92.45.
pub fn calculate_free_space_path_loss(distance_km: f64, frequency_ghz: f64) -> SogaResult<f64> {
    if distance_km <= 0.0 {
        return Err(SogaError::InvalidParameter(format!(
            "distance must be positive, got {distance_km}"
        )));
    }
    if frequency_ghz <= 0.0 {
        return Err(SogaError::InvalidParameter(format!(
            "frequency must be positive, got {frequency_ghz}"
        )));
    }
    Ok(20.0 * distance_km.log10() + 20.0 * frequency_ghz.log10() + 92.45)
}

/// Full link-budget breakdown for one dish size and distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkBudgetResult {
    /// Gain of one dish in dBi (used at both ends of the link).
    pub antenna_gain_dbi: f64,
    /// Free-space path loss in dB.
    pub fspl_db: f64,
    /// Power at the receiver input in dBm.
    pub received_power_dbm: f64,
    /// Received power minus (sensitivity + required SNR + fade margin).
    pub link_margin_db: f64,
    /// True when the margin meets the configured minimum.
    pub is_viable: bool,
}

/// Compute the link budget for a symmetric point-to-point link where the
/// same parabolic dish is used at both ends.
pub fn calculate_link_budget(
    antenna_diameter_m: f64,
    distance_km: f64,
    frequency_ghz: f64,
    aperture_efficiency: f64,
    params: &LinkBudgetParams,
) -> SogaResult<LinkBudgetResult> {
    params.validate()?;
    let antenna_gain_dbi = calculate_gain(antenna_diameter_m, frequency_ghz, aperture_efficiency)?;
    let fspl_db = calculate_free_space_path_loss(distance_km, frequency_ghz)?;

    let received_power_dbm =
        params.tx_power_dbm + 2.0 * antenna_gain_dbi - fspl_db - params.implementation_loss_db;
    let link_margin_db = received_power_dbm
        - (params.rx_sensitivity_dbm + params.required_snr_db + params.fade_margin_db);

    Ok(LinkBudgetResult {
        antenna_gain_dbi,
        fspl_db,
        received_power_dbm,
        link_margin_db,
        is_viable: link_margin_db >= params.min_link_margin_db,
    })
}

/// Outcome of the range-feasibility pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeFeasibility {
    /// True when the desired range closes at the largest allowed dish.
    pub is_feasible: bool,
    /// Budget evaluated at `max_diameter` over the desired range.
    pub link: LinkBudgetResult,
    /// When infeasible: the range (km) the largest dish can actually close.
    pub achievable_range_km: Option<f64>,
    /// When infeasible: the dish diameter (m) the desired range would need.
    pub required_diameter_m: Option<f64>,
}

/// Check whether the desired range is reachable using the *largest* allowed
/// dish (the best case the optimizer could ever pick).
///
/// On infeasibility the diagnostics are closed-form inversions of the path
/// loss equation, no search involved: the maximum tolerable FSPL follows
/// directly from the budget, distance from 10^((FSPL − 92.45 − 20·log10 f)/20),
/// and because the dish appears at both link ends its gain contributes
/// 40·log10(D), so a deficit of Δ dB needs the diameter scaled by 10^(Δ/40).
pub fn validate_range_feasibility(
    max_antenna_diameter_m: f64,
    desired_range_km: f64,
    frequency_ghz: f64,
    aperture_efficiency: f64,
    params: &LinkBudgetParams,
) -> SogaResult<RangeFeasibility> {
    let link = calculate_link_budget(
        max_antenna_diameter_m,
        desired_range_km,
        frequency_ghz,
        aperture_efficiency,
        params,
    )?;

    if link.is_viable {
        return Ok(RangeFeasibility {
            is_feasible: true,
            link,
            achievable_range_km: None,
            required_diameter_m: None,
        });
    }

    // Largest FSPL the budget tolerates while still leaving the minimum
    // margin, at the best-case dish size.
    let max_tolerable_fspl_db = params.tx_power_dbm + 2.0 * link.antenna_gain_dbi
        - params.implementation_loss_db
        - (params.rx_sensitivity_dbm + params.required_snr_db + params.fade_margin_db)
        - params.min_link_margin_db;

    let achievable_range_km = if max_tolerable_fspl_db > 0.0 {
        Some(10f64.powf((max_tolerable_fspl_db - 92.45 - 20.0 * frequency_ghz.log10()) / 20.0))
    } else {
        None
    };

    let gain_deficit_db = link.fspl_db - max_tolerable_fspl_db;
    let required_diameter_m = Some(max_antenna_diameter_m * 10f64.powf(gain_deficit_db / 40.0));

    Ok(RangeFeasibility {
        is_feasible: false,
        link,
        achievable_range_km,
        required_diameter_m,
    })
}
