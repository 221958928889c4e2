//! User-adjustable parameters
//!
//! Every parameter has a closed range. Input from a control is clamped to
//! the nearest bound instead of being rejected.

use serde::Serialize;

/// Static description of one parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    /// Event name (`"gravity"`, `"r1"`, ...)
    pub name: &'static str,
    /// Control label
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Whole-number parameter (resistor count, coil turns)
    pub integer: bool,
}

impl ParamSpec {
    pub const fn new(
        name: &'static str,
        label: &'static str,
        unit: Option<&'static str>,
        min: f64,
        max: f64,
        default: f64,
    ) -> Self {
        Self {
            name,
            label,
            unit,
            min,
            max,
            default,
            integer: false,
        }
    }

    pub const fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    /// Clamp into range (NaN maps to the minimum), rounding integer params
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        let value = value.clamp(self.min, self.max);
        if self.integer { value.round() } else { value }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Look up a parameter by name
pub fn find<'a>(specs: &'a [ParamSpec], name: &str) -> Option<&'a ParamSpec> {
    specs.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RESISTOR: ParamSpec = ParamSpec::new("r1", "R1", Some("Ω"), 1.0, 2000.0, 100.0);
    const TURNS: ParamSpec = ParamSpec::new("turns", "Turns", None, 1.0, 50.0, 10.0).integer();

    #[test]
    fn test_clamp_to_bounds() {
        assert_eq!(RESISTOR.clamp(0.0), 1.0);
        assert_eq!(RESISTOR.clamp(-40.0), 1.0);
        assert_eq!(RESISTOR.clamp(5000.0), 2000.0);
        assert_eq!(RESISTOR.clamp(150.5), 150.5);
        assert_eq!(RESISTOR.clamp(f64::NAN), 1.0);
    }

    #[test]
    fn test_integer_rounds() {
        assert_eq!(TURNS.clamp(12.4), 12.0);
        assert_eq!(TURNS.clamp(12.6), 13.0);
        assert_eq!(TURNS.clamp(0.2), 1.0);
    }

    #[test]
    fn test_find() {
        let specs = [RESISTOR, TURNS];
        assert_eq!(find(&specs, "turns").map(|s| s.max), Some(50.0));
        assert!(find(&specs, "mass").is_none());
    }

    proptest! {
        #[test]
        fn clamped_value_is_always_in_range(value in proptest::num::f64::ANY) {
            prop_assert!(RESISTOR.contains(RESISTOR.clamp(value)));
            prop_assert!(TURNS.contains(TURNS.clamp(value)));
        }
    }
}
