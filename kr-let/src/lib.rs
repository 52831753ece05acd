//! Symbolic LET relative permeability curves for a water / oil system.
//!
//! [`model::LetModel`] builds the water and oil permeability expressions and their derivatives
//! with respect to the water saturation; [`render::write_report`] prints them.

pub mod error;
pub mod model;
pub mod params;
pub mod render;
