//! # Units of Measure
//!
//! Takeoff quantities and BOM lines carry an explicit unit of measure.
//! A small closed enum keeps JSON clean (`"lf"`, `"sqft"`, ...) and makes
//! unit mismatches impossible to spell.
//!
//! All lengths in the engine are US customary: feet for building
//! dimensions and linear demand, inches for panel/trim cut lengths.
//!
//! ## Example
//!
//! ```rust
//! use barn_core::units::{Unit, ft_to_in, in_to_ft};
//!
//! assert_eq!(Unit::LinearFeet.code(), "lf");
//! assert_eq!(ft_to_in(10.0), 120.0);
//! assert_eq!(in_to_ft(96.0), 8.0);
//! ```

use serde::{Deserialize, Serialize};

/// Unit of measure for a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Discrete count (posts, trusses, panels, sheets, sticks)
    #[serde(rename = "ea")]
    Each,
    /// Linear feet (girts, purlins, trim runs)
    #[serde(rename = "lf")]
    LinearFeet,
    /// Square feet (panel/insulation/sheathing area demand)
    #[serde(rename = "sqft")]
    SquareFeet,
    /// Inches (trim segment demand before stick packing)
    #[serde(rename = "in")]
    Inches,
    /// Cubic yards (concrete)
    #[serde(rename = "cuyd")]
    CubicYards,
    /// Lump sum (allowances)
    #[serde(rename = "lump")]
    Lump,
}

impl Unit {
    /// All unit variants
    pub const ALL: [Unit; 6] = [
        Unit::Each,
        Unit::LinearFeet,
        Unit::SquareFeet,
        Unit::Inches,
        Unit::CubicYards,
        Unit::Lump,
    ];

    /// Short code used in catalogs and JSON
    pub fn code(&self) -> &'static str {
        match self {
            Unit::Each => "ea",
            Unit::LinearFeet => "lf",
            Unit::SquareFeet => "sqft",
            Unit::Inches => "in",
            Unit::CubicYards => "cuyd",
            Unit::Lump => "lump",
        }
    }

    /// Parse from common catalog spellings
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ea" | "each" | "pc" | "pcs" => Some(Unit::Each),
            "lf" | "lin ft" | "linft" => Some(Unit::LinearFeet),
            "sqft" | "sf" | "sq ft" => Some(Unit::SquareFeet),
            "in" | "inch" | "inches" => Some(Unit::Inches),
            "cuyd" | "cy" | "cu yd" => Some(Unit::CubicYards),
            "lump" | "ls" => Some(Unit::Lump),
            _ => None,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Convert feet to inches
pub fn ft_to_in(ft: f64) -> f64 {
    ft * 12.0
}

/// Convert inches to feet
pub fn in_to_ft(inches: f64) -> f64 {
    inches / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_tokens() {
        let json = serde_json::to_string(&Unit::SquareFeet).unwrap();
        assert_eq!(json, "\"sqft\"");
        let roundtrip: Unit = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, Unit::SquareFeet);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Unit::from_code("EA"), Some(Unit::Each));
        assert_eq!(Unit::from_code("sf"), Some(Unit::SquareFeet));
        assert_eq!(Unit::from_code("furlong"), None);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(ft_to_in(2.5), 30.0);
        assert_eq!(in_to_ft(30.0), 2.5);
    }
}
