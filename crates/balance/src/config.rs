//! Analysis configuration and the keyed parameter lookup it is built from

use std::collections::HashMap;

use balance_nostd_internal::{DeltaBinning, PairBinner, PtCut};

use crate::Error;

/// Keyed lookup of numeric run parameters.
///
/// Integers (like species codes) are stored as reals, mirroring the
/// parameter files produced by the event generators.
pub trait ParameterSource {
    fn get_val(&self, key: &str) -> Option<f64>;
}

/// A `HashMap`-backed [`ParameterSource`]
#[derive(Clone, Debug, Default)]
pub struct ParameterMap {
    values: HashMap<String, f64>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// sets (or overwrites) a value and returns the updated map
    pub fn set(mut self, key: &str, value: f64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

impl ParameterSource for ParameterMap {
    fn get_val(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

impl ParameterSource for HashMap<String, f64> {
    fn get_val(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }
}

/// Configuration of a single balance function analysis
#[derive(Clone, Debug, PartialEq)]
pub struct BalanceConfig {
    /// species code of the a role (`particle_alpha`)
    pub particle_alpha: i32,
    /// species code of the b role (`particle_beta`)
    pub particle_beta: i32,
    /// lower edge of the (inclusive) pT window (`BpT_min`)
    pub pt_min: f64,
    /// upper edge of the (inclusive) pT window (`BpT_max`)
    pub pt_max: f64,
    /// number of Δy bins (`Bnpts`)
    pub n_rap_bins: usize,
    /// the Δy bins cover `[-rap_max, rap_max)` (`Brap_max`)
    pub rap_max: f64,
}

fn required(params: &impl ParameterSource, key: &'static str) -> Result<f64, Error> {
    params.get_val(key).ok_or_else(|| Error::missing_parameter(key))
}

fn required_int(params: &impl ParameterSource, key: &'static str) -> Result<i64, Error> {
    let value = required(params, key)?;
    if value.fract() != 0.0 || !value.is_finite() {
        Err(Error::invalid_parameter(key, value, "an integer is required"))
    } else {
        Ok(value as i64)
    }
}

fn species_code(params: &impl ParameterSource, key: &'static str) -> Result<i32, Error> {
    let value = required_int(params, key)?;
    // the charge conjugate code (-value) must also be representable
    match i32::try_from(value) {
        Ok(code) if code.checked_neg().is_some() => Ok(code),
        _ => Err(Error::invalid_parameter(
            key,
            value as f64,
            "species codes and their negation must fit in 32 bits",
        )),
    }
}

impl BalanceConfig {
    /// reads `particle_alpha`, `particle_beta`, `BpT_min`, `BpT_max`,
    /// `Bnpts` and `Brap_max` from `params`
    pub fn from_parameters(params: &impl ParameterSource) -> Result<Self, Error> {
        let n_rap_bins = required_int(params, "Bnpts")?;
        if n_rap_bins < 1 {
            return Err(Error::invalid_parameter(
                "Bnpts",
                n_rap_bins as f64,
                "at least 1 Δy bin is required",
            ));
        }

        let config = Self {
            particle_alpha: species_code(params, "particle_alpha")?,
            particle_beta: species_code(params, "particle_beta")?,
            pt_min: required(params, "BpT_min")?,
            pt_max: required(params, "BpT_max")?,
            n_rap_bins: n_rap_bins as usize,
            rap_max: required(params, "Brap_max")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// checks the values that `pair_binner` depends upon
    pub fn validate(&self) -> Result<(), Error> {
        if self.particle_alpha == i32::MIN {
            Err(Error::invalid_parameter(
                "particle_alpha",
                self.particle_alpha as f64,
                "the species code must have a representable negation",
            ))
        } else if self.particle_beta == i32::MIN {
            Err(Error::invalid_parameter(
                "particle_beta",
                self.particle_beta as f64,
                "the species code must have a representable negation",
            ))
        } else if !(self.rap_max > 0.0) || !self.rap_max.is_finite() {
            Err(Error::invalid_parameter(
                "Brap_max",
                self.rap_max,
                "a positive finite value is required",
            ))
        } else if self.pt_min.is_nan() {
            Err(Error::invalid_parameter("BpT_min", self.pt_min, "can't be NaN"))
        } else if self.pt_max.is_nan() || self.pt_max < self.pt_min {
            Err(Error::invalid_parameter(
                "BpT_max",
                self.pt_max,
                "must not be smaller than BpT_min",
            ))
        } else if self.n_rap_bins == 0 {
            Err(Error::invalid_parameter(
                "Bnpts",
                0.0,
                "at least 1 Δy bin is required",
            ))
        } else {
            Ok(())
        }
    }

    /// `true` when the b role is the charge conjugate of the a role
    pub fn same_species(&self) -> bool {
        Some(self.particle_alpha) == self.particle_beta.checked_neg()
    }

    /// build the pair binner shared by every histogram channel
    pub fn pair_binner(&self) -> Result<PairBinner, Error> {
        self.validate()?;
        let binning = DeltaBinning::symmetric(self.rap_max, self.n_rap_bins)
            .map_err(Error::internal_legacy_adhoc)?;
        let pt_cut = PtCut::new(self.pt_min, self.pt_max).map_err(Error::internal_legacy_adhoc)?;
        Ok(PairBinner::new(binning, pt_cut, self.same_species()))
    }
}
