//! Text rendering of the model report.

use crate::error::ModelError;
use let_compute::symbolic::SymExpr;
use std::{fmt, io::Write};

/// Label of the water permeability.
pub const WATER_PERMEABILITY: &str = "Water perm";

/// Label of the oil permeability.
pub const OIL_PERMEABILITY: &str = "Oil perm";

/// Label of the simplified water permeability derivative.
pub const WATER_DERIVATIVE: &str = "Kw der";

/// Label of the simplified oil permeability derivative.
pub const OIL_DERIVATIVE: &str = "Ko der";

/// An expression with the label it is reported under.
#[derive(Debug, Clone, PartialEq)]
pub struct Labeled {
    /// Text printed before the expression.
    pub label: &'static str,

    /// The reported expression.
    pub expr: SymExpr,
}

impl Labeled {
    /// Creates a labeled expression.
    pub fn new(label: &'static str, expr: SymExpr) -> Self {
        Self { label, expr }
    }
}

impl fmt::Display for Labeled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.expr)
    }
}

/// Writes each entry on its own line, followed by a blank line.
pub fn write_report<W: Write>(out: &mut W, entries: &[Labeled]) -> Result<(), ModelError> {
    for entry in entries {
        writeln!(out, "{entry}")?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::model::LetModel;
    use pretty_assertions::assert_eq;
    use super::*;

    fn render(entries: &[Labeled]) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, entries).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn labeled_line() {
        let entry = Labeled::new(WATER_PERMEABILITY, SymExpr::symbol("Kw") * SymExpr::symbol("Sw"));
        assert_eq!(entry.to_string(), "Water perm Kw * Sw");
        assert_eq!(render(&[entry]), "Water perm Kw * Sw\n\n");
    }

    #[test]
    fn report_order_and_layout() {
        let report = LetModel::build().unwrap().report().unwrap();
        let output = render(&report);
        let lines = output.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 8);
        let labels = [WATER_PERMEABILITY, OIL_PERMEABILITY, WATER_DERIVATIVE, OIL_DERIVATIVE];
        for (pair, label) in lines.chunks(2).zip(labels) {
            assert!(pair[0].starts_with(&format!("{label} ")), "unexpected line {:?}", pair[0]);
            assert_eq!(pair[1], "");
        }
    }

    #[test]
    fn permeabilities_print_their_own_symbols() {
        let report = LetModel::build().unwrap().report().unwrap();
        let words = |entry: &Labeled| entry.expr.to_string()
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        let water = words(&report[0]);
        let oil = words(&report[1]);
        assert!(["Lo", "Eo", "To", "Ko"].iter().all(|name| !water.iter().any(|word| word == name)));
        assert!(["Lw", "Ew", "Tw", "Kw"].iter().all(|name| !oil.iter().any(|word| word == name)));
        assert!(water.iter().any(|word| word == "Kw"));
        assert!(oil.iter().any(|word| word == "Ko"));
    }

    #[test]
    fn output_is_idempotent() {
        let first = render(&LetModel::build().unwrap().report().unwrap());
        let second = render(&LetModel::build().unwrap().report().unwrap());
        assert_eq!(first, second);
    }
}
