//! Construction of the LET relative permeability model.
//!
//! The LET correlation describes the relative permeability of a phase in terms of the normalized
//! water saturation `Swe` and three shape parameters `L`, `E` and `T`:
//!
//! ```text
//! Kr = K * S^L / (S^L + E * (1 - S)^T)
//! ```
//!
//! where `S` is the saturation of the phase itself: `Swe` for water and `1 - Swe` for oil.
//!
//! Every quantity is kept symbolic. [`LetModel`] builds the two permeability curves once, and
//! differentiates them with respect to the water saturation `Sw` on request.

use crate::{error::ModelError, render::{self, Labeled}};
use let_compute::symbolic::{derivative, simplify, SymExpr};
use std::collections::HashSet;
use tracing::debug;

/// Water saturation.
pub const SW: &str = "Sw";

/// Irreducible water saturation.
pub const SW_MIN: &str = "Sw_min";

/// Maximum water saturation.
pub const SW_MAX: &str = "Sw_max";

/// Water permeability at the maximum water saturation.
pub const KW: &str = "Kw";

/// Oil permeability at the irreducible water saturation.
pub const KO: &str = "Ko";

/// Shape parameter `L` of the water curve, governing its lower part.
pub const LW: &str = "Lw";

/// Elevation parameter `E` of the water curve.
pub const EW: &str = "Ew";

/// Shape parameter `T` of the water curve, governing its upper part.
pub const TW: &str = "Tw";

/// Shape parameter `L` of the oil curve.
pub const LO: &str = "Lo";

/// Elevation parameter `E` of the oil curve.
pub const EO: &str = "Eo";

/// Shape parameter `T` of the oil curve.
pub const TO: &str = "To";

/// Keeps track of the names handed out as symbols, so that no name is used for two quantities.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    declared: HashSet<String>,
}

impl SymbolTable {
    /// Declares a new symbol with the given name.
    pub fn declare(&mut self, name: &str) -> Result<SymExpr, ModelError> {
        if !self.declared.insert(name.to_string()) {
            return Err(ModelError::DuplicateSymbol(name.to_string()));
        }
        Ok(SymExpr::symbol(name))
    }

    /// Returns true if a symbol with the given name was declared.
    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }
}

/// One of the two fluid phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Water,
    Oil,
}

impl Phase {
    /// Both phases, in report order.
    pub const ALL: [Phase; 2] = [Phase::Water, Phase::Oil];
}

/// The endpoint permeability and LET shape parameters of one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseParams {
    pub k: SymExpr,
    pub l: SymExpr,
    pub e: SymExpr,
    pub t: SymExpr,
}

/// The eleven symbols the model is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct LetSymbols {
    pub sw: SymExpr,
    pub sw_min: SymExpr,
    pub sw_max: SymExpr,
    pub water: PhaseParams,
    pub oil: PhaseParams,
}

impl LetSymbols {
    /// Declares every symbol of the model in a fresh [`SymbolTable`].
    pub fn declare() -> Result<Self, ModelError> {
        Self::declare_in(&mut SymbolTable::default())
    }

    /// Declares every symbol of the model in the given table.
    pub fn declare_in(table: &mut SymbolTable) -> Result<Self, ModelError> {
        Ok(Self {
            sw: table.declare(SW)?,
            sw_min: table.declare(SW_MIN)?,
            sw_max: table.declare(SW_MAX)?,
            water: PhaseParams {
                k: table.declare(KW)?,
                l: table.declare(LW)?,
                e: table.declare(EW)?,
                t: table.declare(TW)?,
            },
            oil: PhaseParams {
                k: table.declare(KO)?,
                l: table.declare(LO)?,
                e: table.declare(EO)?,
                t: table.declare(TO)?,
            },
        })
    }

    /// Returns the parameters of the given phase.
    pub fn phase(&self, phase: Phase) -> &PhaseParams {
        match phase {
            Phase::Water => &self.water,
            Phase::Oil => &self.oil,
        }
    }
}

/// Builds the normalized water saturation `(Sw - Sw_min) / (Sw_max - Sw_min)`.
pub fn normalized_saturation(sw: &SymExpr, sw_min: &SymExpr, sw_max: &SymExpr) -> SymExpr {
    (sw.clone() - sw_min.clone()) / (sw_max.clone() - sw_min.clone())
}

/// Builds the LET permeability of a phase from the normalized water saturation.
///
/// The expression is returned in its construction form, `K * S^L * (S^L + E * (1 - S)^T)^-1`.
pub fn phase_permeability(swe: &SymExpr, phase: Phase, params: &PhaseParams) -> SymExpr {
    let complement = SymExpr::integer(1) - swe.clone();
    let (own, opposing) = match phase {
        Phase::Water => (swe.clone(), complement),
        Phase::Oil => (complement, swe.clone()),
    };

    let own_term = own.pow(params.l.clone());
    let opposing_term = params.e.clone() * opposing.pow(params.t.clone());
    params.k.clone() * own_term.clone() / (own_term + opposing_term)
}

/// The symbolic LET model for a water / oil system.
#[derive(Debug, Clone, PartialEq)]
pub struct LetModel {
    symbols: LetSymbols,
    swe: SymExpr,
    krw: SymExpr,
    kro: SymExpr,
}

impl LetModel {
    /// Declares the symbols of the model and builds both permeability curves.
    pub fn build() -> Result<Self, ModelError> {
        let symbols = LetSymbols::declare()?;
        let swe = normalized_saturation(&symbols.sw, &symbols.sw_min, &symbols.sw_max);
        let krw = phase_permeability(&swe, Phase::Water, symbols.phase(Phase::Water));
        let kro = phase_permeability(&swe, Phase::Oil, symbols.phase(Phase::Oil));
        debug!(swe = %swe, krw = krw.complexity(), kro = kro.complexity(), "built LET model");

        Ok(Self { symbols, swe, krw, kro })
    }

    /// Returns the symbols the model was built from.
    pub fn symbols(&self) -> &LetSymbols {
        &self.symbols
    }

    /// Returns the normalized water saturation.
    pub fn normalized_saturation(&self) -> &SymExpr {
        &self.swe
    }

    /// Returns the relative permeability of the given phase.
    pub fn permeability(&self, phase: Phase) -> &SymExpr {
        match phase {
            Phase::Water => &self.krw,
            Phase::Oil => &self.kro,
        }
    }

    /// Returns the derivative of the phase permeability with respect to `Sw`, before
    /// simplification.
    pub fn raw_derivative(&self, phase: Phase) -> Result<SymExpr, ModelError> {
        Ok(derivative(self.permeability(phase), SW)?)
    }

    /// Returns the simplified derivative of the phase permeability with respect to `Sw`.
    pub fn derivative(&self, phase: Phase) -> Result<SymExpr, ModelError> {
        let raw = self.raw_derivative(phase)?;
        let simplified = simplify(&raw);
        debug!(
            ?phase,
            raw = raw.complexity(),
            simplified = simplified.complexity(),
            "simplified derivative",
        );
        Ok(simplified)
    }

    /// Returns the four labeled expressions of the report, in output order.
    pub fn report(&self) -> Result<Vec<Labeled>, ModelError> {
        Ok(vec![
            Labeled::new(render::WATER_PERMEABILITY, self.krw.clone()),
            Labeled::new(render::OIL_PERMEABILITY, self.kro.clone()),
            Labeled::new(render::WATER_DERIVATIVE, self.derivative(Phase::Water)?),
            Labeled::new(render::OIL_DERIVATIVE, self.derivative(Phase::Oil)?),
        ])
    }
}
