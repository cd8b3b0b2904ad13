//! Configuration for the optimizer core
//!
//! Immutable configuration structs passed explicitly into the engine and the
//! problem encoding. The core never reads global state: callers load these
//! from whatever source they like (TOML, CLI, hard-coded test fixtures) and
//! hand them in.
//!
//! ## Example
//!
//! ```rust
//! use soga_core::config::{EngineConfig, SimulationConfig};
//!
//! let sim = SimulationConfig::default();
//! assert_eq!(sim.frequency_ghz, 2.4);
//!
//! let engine = EngineConfig {
//!     population_size: 50,
//!     max_generations: 30,
//!     seed: 7,
//! };
//! engine.validate().unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::efficiency::EfficiencyModel;
use crate::models::{SogaError, SogaResult};

/// Physical constants of the simulated antenna system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Operating frequency in GHz.
    pub frequency_ghz: f64,
    /// Fixed aperture efficiency used by the link-budget pre-check, where
    /// the f/D of the final design is not yet known.
    pub aperture_efficiency: f64,
    /// Beamwidth illumination factor k in θ = k·λ/D. 65.0 per IEEE Std
    /// 145-2013; 58.4 (Balanis) and 70.0 (Kraus) are the usual alternatives.
    pub beamwidth_k_factor: f64,
    /// Reflector surface mass per area in kg/m².
    pub reflector_areal_density_kg_per_m2: f64,
    /// Mass of feed, struts and mounting hardware in kg, independent of
    /// dish size.
    pub fixed_component_weight_kg: f64,
    /// Calibrated aperture-efficiency curve η(f/D).
    pub efficiency: EfficiencyModel,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frequency_ghz: 2.4,
            aperture_efficiency: 0.65,
            beamwidth_k_factor: 65.0,
            reflector_areal_density_kg_per_m2: 1.2,
            fixed_component_weight_kg: 0.1,
            efficiency: EfficiencyModel::default(),
        }
    }
}

impl SimulationConfig {
    /// Check every field against its physical bound.
    pub fn validate(&self) -> SogaResult<()> {
        if self.frequency_ghz <= 0.0 {
            return Err(SogaError::InvalidConfig(format!(
                "frequency_ghz must be positive, got {}",
                self.frequency_ghz
            )));
        }
        if self.aperture_efficiency <= 0.0 || self.aperture_efficiency > 1.0 {
            return Err(SogaError::InvalidConfig(format!(
                "aperture_efficiency must be in (0, 1], got {}",
                self.aperture_efficiency
            )));
        }
        if self.beamwidth_k_factor <= 0.0 {
            return Err(SogaError::InvalidConfig(format!(
                "beamwidth_k_factor must be positive, got {}",
                self.beamwidth_k_factor
            )));
        }
        if self.reflector_areal_density_kg_per_m2 <= 0.0 {
            return Err(SogaError::InvalidConfig(format!(
                "reflector_areal_density_kg_per_m2 must be positive, got {}",
                self.reflector_areal_density_kg_per_m2
            )));
        }
        if self.fixed_component_weight_kg < 0.0 {
            return Err(SogaError::InvalidConfig(format!(
                "fixed_component_weight_kg must be non-negative, got {}",
                self.fixed_component_weight_kg
            )));
        }
        // Re-derive the efficiency model to reuse its own validation.
        EfficiencyModel::new(
            self.efficiency.peak,
            self.efficiency.optimal_f_d,
            self.efficiency.curvature_below,
            self.efficiency.curvature_above,
        )?;
        Ok(())
    }
}

/// RF chain parameters for the link-budget calculation.
///
/// Bounds reflect realistic point-to-point telemetry hardware; values
/// outside them are almost certainly unit mistakes, so validation rejects
/// them with the bound named.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkBudgetParams {
    /// Transmitter output power in dBm. Realistic range [-100, 60].
    pub tx_power_dbm: f64,
    /// Receiver sensitivity in dBm. Realistic range [-150, -20].
    pub rx_sensitivity_dbm: f64,
    /// SNR the demodulator needs on top of sensitivity, in dB. Range [0, 30].
    pub required_snr_db: f64,
    /// Fading allowance in dB. Range [0, 40].
    pub fade_margin_db: f64,
    /// Filter, connector and pointing losses in dB. Range [0, 20].
    pub implementation_loss_db: f64,
    /// Minimum link margin for a link to count as viable, in dB.
    /// Range [0, 20].
    pub min_link_margin_db: f64,
}

impl Default for LinkBudgetParams {
    fn default() -> Self {
        Self {
            tx_power_dbm: 20.0,
            rx_sensitivity_dbm: -100.0,
            required_snr_db: 10.0,
            fade_margin_db: 10.0,
            implementation_loss_db: 2.0,
            min_link_margin_db: 6.0,
        }
    }
}

impl LinkBudgetParams {
    pub fn validate(&self) -> SogaResult<()> {
        if !(-100.0..=60.0).contains(&self.tx_power_dbm) {
            return Err(SogaError::InvalidParameter(format!(
                "tx_power_dbm {} outside realistic range [-100, 60] dBm",
                self.tx_power_dbm
            )));
        }
        if !(-150.0..=-20.0).contains(&self.rx_sensitivity_dbm) {
            return Err(SogaError::InvalidParameter(format!(
                "rx_sensitivity_dbm {} outside realistic range [-150, -20] dBm",
                self.rx_sensitivity_dbm
            )));
        }
        if !(0.0..=30.0).contains(&self.required_snr_db) {
            return Err(SogaError::InvalidParameter(format!(
                "required_snr_db {} outside realistic range [0, 30] dB",
                self.required_snr_db
            )));
        }
        if !(0.0..=40.0).contains(&self.fade_margin_db) {
            return Err(SogaError::InvalidParameter(format!(
                "fade_margin_db {} outside realistic range [0, 40] dB",
                self.fade_margin_db
            )));
        }
        if !(0.0..=20.0).contains(&self.implementation_loss_db) {
            return Err(SogaError::InvalidParameter(format!(
                "implementation_loss_db {} outside realistic range [0, 20] dB",
                self.implementation_loss_db
            )));
        }
        if !(0.0..=20.0).contains(&self.min_link_margin_db) {
            return Err(SogaError::InvalidParameter(format!(
                "min_link_margin_db {} outside realistic range [0, 20] dB",
                self.min_link_margin_db
            )));
        }
        Ok(())
    }
}

/// Genetic-search parameters for the optimization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Generations to run; the sole termination control.
    pub max_generations: usize,
    /// RNG seed. Identical seed + inputs reproduce the run bit for bit.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 50,
            seed: 42,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> SogaResult<()> {
        if self.population_size < 2 {
            return Err(SogaError::InvalidConfig(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.max_generations == 0 {
            return Err(SogaError::InvalidConfig(
                "max_generations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimulationConfig::default().validate().expect("simulation defaults");
        LinkBudgetParams::default().validate().expect("link defaults");
        EngineConfig::default().validate().expect("engine defaults");
    }

    #[test]
    fn simulation_rejects_bad_frequency() {
        let cfg = SimulationConfig {
            frequency_ghz: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn simulation_rejects_bad_density() {
        let cfg = SimulationConfig {
            reflector_areal_density_kg_per_m2: -1.0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("areal_density"));
    }

    #[test]
    fn simulation_allows_zero_fixed_weight() {
        // Reflector-only weight model remains expressible.
        let cfg = SimulationConfig {
            fixed_component_weight_kg: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn link_params_reject_out_of_range_tx_power() {
        let params = LinkBudgetParams {
            tx_power_dbm: 70.0,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(
            err.to_string().contains("[-100, 60]"),
            "message should name the bound: {err}"
        );
    }

    #[test]
    fn link_params_reject_positive_sensitivity() {
        let params = LinkBudgetParams {
            rx_sensitivity_dbm: 5.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn engine_rejects_degenerate_population() {
        let cfg = EngineConfig {
            population_size: 1,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = EngineConfig {
            max_generations: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
