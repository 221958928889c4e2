//! Finite-or-infinite quantities
//!
//! Formulas with a singular denominator (parallel resistor sum, lens at the
//! focal point, zero-volume gas) produce `Quantity::Infinite` instead of a
//! division fault. The sentinel survives logging and export as `∞`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Textual marker for an infinite quantity
pub const INFINITY_MARK: &str = "∞";

/// A derived value that may be unbounded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Quantity {
    Finite(f64),
    Infinite,
}

impl Quantity {
    /// `numerator / denominator`, infinite when the denominator is zero
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            Quantity::Infinite
        } else {
            Quantity::from_f64(numerator / denominator)
        }
    }

    /// Wrap a raw float; infinities and NaN map to the sentinel
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Quantity::Finite(value)
        } else {
            Quantity::Infinite
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Quantity::Infinite)
    }

    pub fn finite(&self) -> Option<f64> {
        match self {
            Quantity::Finite(v) => Some(*v),
            Quantity::Infinite => None,
        }
    }

    /// Fixed-precision text, `∞` for the sentinel
    pub fn format(&self, precision: usize) -> String {
        match self {
            Quantity::Finite(v) => crate::fixed(*v, precision),
            Quantity::Infinite => INFINITY_MARK.to_string(),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Finite(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
            Quantity::Infinite => f.write_str(INFINITY_MARK),
        }
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::from_f64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_zero_denominator_is_infinite() {
        assert_eq!(Quantity::ratio(9.0, 0.0), Quantity::Infinite);
        assert_eq!(Quantity::ratio(9.0, 200.0), Quantity::Finite(0.045));
    }

    #[test]
    fn test_non_finite_maps_to_sentinel() {
        assert!(Quantity::from_f64(f64::INFINITY).is_infinite());
        assert!(Quantity::from_f64(f64::NAN).is_infinite());
        assert_eq!(Quantity::from_f64(2.5).finite(), Some(2.5));
    }

    #[test]
    fn test_format() {
        assert_eq!(Quantity::Finite(1.23456).format(2), "1.23");
        assert_eq!(Quantity::Infinite.format(2), "∞");
        assert_eq!(format!("{:.1}", Quantity::Finite(2.26)), "2.3");
        assert_eq!(format!("{}", Quantity::Infinite), "∞");
    }
}
