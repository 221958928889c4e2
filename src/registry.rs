//! Static table of available simulations
//!
//! The set of simulations is fixed at build time; each entry pairs a kind
//! with the constructor that produces a fresh default instance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sim::{
    Circuit, MagneticField, Optics, Orbit, Pendulum, Projectile, SimError, Simulation,
    Thermodynamics, VibratingString, Wave,
};

/// Identifies one simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimKind {
    Pendulum,
    Projectile,
    Orbit,
    Wave,
    String,
    Circuit,
    Optics,
    Thermodynamics,
    #[serde(rename = "magnetic")]
    MagneticField,
}

impl SimKind {
    /// All kinds in menu order
    pub const ALL: [SimKind; 9] = [
        SimKind::Pendulum,
        SimKind::Projectile,
        SimKind::Orbit,
        SimKind::Wave,
        SimKind::String,
        SimKind::Circuit,
        SimKind::Optics,
        SimKind::Thermodynamics,
        SimKind::MagneticField,
    ];

    /// Stable short identifier (CLI, settings, snapshots)
    pub fn id(&self) -> &'static str {
        match self {
            SimKind::Pendulum => "pendulum",
            SimKind::Projectile => "projectile",
            SimKind::Orbit => "orbit",
            SimKind::Wave => "wave",
            SimKind::String => "string",
            SimKind::Circuit => "circuit",
            SimKind::Optics => "optics",
            SimKind::Thermodynamics => "thermodynamics",
            SimKind::MagneticField => "magnetic",
        }
    }

    /// Menu title
    pub fn title(&self) -> &'static str {
        match self {
            SimKind::Pendulum => "Pendulum",
            SimKind::Projectile => "Projectile Motion",
            SimKind::Orbit => "Circular Orbit",
            SimKind::Wave => "Wave Interference",
            SimKind::String => "Vibrating String",
            SimKind::Circuit => "Electric Circuit",
            SimKind::Optics => "Thin Lens Optics",
            SimKind::Thermodynamics => "Ideal Gas",
            SimKind::MagneticField => "Magnetic Field",
        }
    }
}

impl fmt::Display for SimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SimKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SimKind::ALL
            .into_iter()
            .find(|k| k.id() == wanted || k.title().to_lowercase() == wanted)
            .ok_or_else(|| SimError::UnknownSimulation(s.to_string()))
    }
}

pub type Constructor = fn() -> Box<dyn Simulation>;

fn make<T: Simulation + Default + 'static>() -> Box<dyn Simulation> {
    Box::new(T::default())
}

/// Every simulation with its constructor, in `SimKind::ALL` order
pub static REGISTRY: &[(SimKind, Constructor)] = &[
    (SimKind::Pendulum, make::<Pendulum>),
    (SimKind::Projectile, make::<Projectile>),
    (SimKind::Orbit, make::<Orbit>),
    (SimKind::Wave, make::<Wave>),
    (SimKind::String, make::<VibratingString>),
    (SimKind::Circuit, make::<Circuit>),
    (SimKind::Optics, make::<Optics>),
    (SimKind::Thermodynamics, make::<Thermodynamics>),
    (SimKind::MagneticField, make::<MagneticField>),
];

/// Fresh default instance of `kind`
pub fn create(kind: SimKind) -> Box<dyn Simulation> {
    let (_, make) = REGISTRY[kind as usize];
    make()
}

/// Fresh default instance looked up by id or title
pub fn create_by_id(id: &str) -> Result<Box<dyn Simulation>, SimError> {
    id.parse().map(create)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_kind() {
        assert_eq!(REGISTRY.len(), SimKind::ALL.len());
        for (i, kind) in SimKind::ALL.into_iter().enumerate() {
            assert_eq!(REGISTRY[i].0, kind);
            assert_eq!(create(kind).kind(), kind);
        }
    }

    #[test]
    fn test_parse_ids_and_titles() {
        assert_eq!("pendulum".parse::<SimKind>().ok(), Some(SimKind::Pendulum));
        assert_eq!(" Magnetic ".parse::<SimKind>().ok(), Some(SimKind::MagneticField));
        assert_eq!("ideal gas".parse::<SimKind>().ok(), Some(SimKind::Thermodynamics));
        assert!(matches!(
            "quantum".parse::<SimKind>(),
            Err(SimError::UnknownSimulation(s)) if s == "quantum"
        ));
    }

    #[test]
    fn test_fresh_instances_start_with_empty_logs() {
        for kind in SimKind::ALL {
            let sim = create(kind);
            assert!(sim.log().is_empty(), "{kind} logged on construction");
            for spec in sim.params() {
                assert_eq!(sim.param(spec.name), Some(spec.default), "{kind}.{}", spec.name);
            }
        }
    }

    #[test]
    fn test_serde_names_match_ids() {
        for kind in SimKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
        }
    }

    #[test]
    fn test_create_by_id() {
        assert_eq!(create_by_id("optics").map(|s| s.kind()).ok(), Some(SimKind::Optics));
        assert!(create_by_id("").is_err());
    }
}
