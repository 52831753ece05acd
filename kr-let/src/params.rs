//! Numeric values for the quantities of the LET model.
//!
//! The model itself is purely symbolic. A [`LetCoefficients`] set binds a number to each symbol,
//! which is how the symbolic results are checked numerically.

use crate::{
    error::ModelError,
    model::{EO, EW, KO, KW, LO, LW, SW, SW_MAX, SW_MIN, TO, TW},
};
use let_compute::numerical::Bindings;
use tracing::info;

/// A numeric value for each of the eleven quantities of the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetCoefficients {
    pub sw: f64,
    pub sw_min: f64,
    pub sw_max: f64,
    pub kw: f64,
    pub ko: f64,
    pub lw: f64,
    pub ew: f64,
    pub tw: f64,
    pub lo: f64,
    pub eo: f64,
    pub to: f64,
}

impl LetCoefficients {
    /// A symmetric reference set: `Sw` halfway in `[0.2, 0.8]`, unit endpoint permeabilities,
    /// `L = T = 2` and `E = 1` for both phases.
    pub fn reference() -> Self {
        Self {
            sw: 0.5,
            sw_min: 0.2,
            sw_max: 0.8,
            kw: 1.0,
            ko: 1.0,
            lw: 2.0,
            ew: 1.0,
            tw: 2.0,
            lo: 2.0,
            eo: 1.0,
            to: 2.0,
        }
    }

    fn named_values(&self) -> [(&'static str, f64); 11] {
        [
            (SW, self.sw),
            (SW_MIN, self.sw_min),
            (SW_MAX, self.sw_max),
            (KW, self.kw),
            (KO, self.ko),
            (LW, self.lw),
            (EW, self.ew),
            (TW, self.tw),
            (LO, self.lo),
            (EO, self.eo),
            (TO, self.to),
        ]
    }

    /// Checks that the endpoint permeabilities and shape coefficients are finite and positive,
    /// and that `Sw` lies in a non-empty range `[Sw_min, Sw_max]`.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in self.named_values().into_iter().skip(3) {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::InvalidParameter { name, value });
            }
        }

        let in_range = self.sw_min < self.sw_max
            && self.sw_min <= self.sw
            && self.sw <= self.sw_max;
        if !in_range || !self.sw_min.is_finite() || !self.sw_max.is_finite() {
            return Err(ModelError::InvalidSaturationRange {
                sw: self.sw,
                min: self.sw_min,
                max: self.sw_max,
            });
        }

        info!(
            "LET water: Kw={} Lw={} Ew={} Tw={}; oil: Ko={} Lo={} Eo={} To={}; Sw={} in [{}, {}]",
            self.kw, self.lw, self.ew, self.tw,
            self.ko, self.lo, self.eo, self.to,
            self.sw, self.sw_min, self.sw_max,
        );
        Ok(())
    }

    /// Validates the coefficients and binds each value to its symbol.
    pub fn bindings(&self) -> Result<Bindings, ModelError> {
        self.validate()?;

        let mut bindings = Bindings::new();
        for (name, value) in self.named_values() {
            bindings.add_var(name, value);
        }
        Ok(bindings)
    }
}
