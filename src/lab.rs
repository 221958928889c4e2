//! Host that owns one instance of every simulation
//!
//! Instances are independent: each keeps its own clock, run state and log.
//! Frame time is fed to all of them so a simulation keeps running while
//! another one is on screen.

use glam::Vec2;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::persistence::{ExportError, ExportOutcome};
use crate::registry::{self, SimKind};
use crate::renderer::{Scene, Viewport};
use crate::settings::Settings;
use crate::sim::{Instance, SimError};

/// Split `name=value` into its parts
pub fn parse_assignment(text: &str) -> Result<(String, f64), SimError> {
    let bad = || SimError::BadAssignment(text.to_string());
    let (name, value) = text.split_once('=').ok_or_else(bad)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(bad());
    }
    let value: f64 = value.trim().parse().map_err(|_| bad())?;
    Ok((name.to_string(), value))
}

pub struct Lab {
    instances: Vec<Instance>,
    selected: SimKind,
    viewport: Viewport,
    export_dir: PathBuf,
}

impl Default for Lab {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl Lab {
    pub fn new(settings: &Settings) -> Self {
        let instances = registry::REGISTRY
            .iter()
            .map(|(_, make)| Instance::new(make(), settings.clock()))
            .collect();
        log::info!(
            "Lab ready: {} simulations, tick {} ms, starting with {}",
            registry::REGISTRY.len(),
            settings.tick_interval_ms,
            settings.default_simulation
        );
        Self {
            instances,
            selected: settings.default_simulation,
            viewport: settings.viewport,
            export_dir: settings.export_dir.clone(),
        }
    }

    pub fn selected(&self) -> SimKind {
        self.selected
    }

    pub fn select(&mut self, kind: SimKind) {
        if self.selected != kind {
            log::info!("Switched to {}", kind.title());
            self.selected = kind;
        }
    }

    /// Select by id or title
    pub fn select_id(&mut self, id: &str) -> Result<SimKind, SimError> {
        let kind = id.parse()?;
        self.select(kind);
        Ok(kind)
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn instance(&self, kind: SimKind) -> &Instance {
        &self.instances[kind as usize]
    }

    pub fn instance_mut(&mut self, kind: SimKind) -> &mut Instance {
        &mut self.instances[kind as usize]
    }

    pub fn current(&self) -> &Instance {
        self.instance(self.selected)
    }

    pub fn current_mut(&mut self) -> &mut Instance {
        let kind = self.selected;
        self.instance_mut(kind)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Apply a `name=value` assignment to the current simulation
    pub fn assign(&mut self, assignment: &str) -> Result<f64, SimError> {
        let (name, value) = parse_assignment(assignment)?;
        self.current_mut().set_param(&name, value)
    }

    /// Feed frame time to every instance; returns ticks run by the current one
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let selected = self.selected;
        let mut current_ticks = 0;
        for inst in &mut self.instances {
            let ticks = inst.advance(elapsed);
            if inst.kind() == selected {
                current_ticks = ticks;
            }
        }
        current_ticks
    }

    pub fn pointer_down(&mut self, point: Vec2) -> bool {
        let viewport = self.viewport;
        self.current_mut().pointer_down(point, viewport)
    }

    pub fn pointer_move(&mut self, point: Vec2) {
        let viewport = self.viewport;
        self.current_mut().pointer_move(point, viewport);
    }

    pub fn pointer_up(&mut self) {
        self.current_mut().pointer_up();
    }

    pub fn render(&self) -> Scene {
        self.current().render(self.viewport)
    }

    /// `<export_dir>/<id>_data.csv`
    pub fn default_export_path(&self) -> PathBuf {
        self.export_dir.join(format!("{}_data.csv", self.selected.id()))
    }

    pub fn export_current(&mut self, path: &Path) -> Result<ExportOutcome, ExportError> {
        self.current_mut().export(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RunState;
    use tempfile::tempdir;

    #[test]
    fn test_one_instance_per_kind() {
        let lab = Lab::default();
        assert_eq!(lab.instances().len(), SimKind::ALL.len());
        for kind in SimKind::ALL {
            assert_eq!(lab.instance(kind).kind(), kind);
        }
        assert_eq!(lab.selected(), SimKind::Pendulum);
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("gravity=3.5").ok(), Some(("gravity".into(), 3.5)));
        assert_eq!(parse_assignment(" r1 = 20 ").ok(), Some(("r1".into(), 20.0)));
        for bad in ["gravity", "=3", "gravity=fast"] {
            assert!(matches!(parse_assignment(bad), Err(SimError::BadAssignment(_))), "{bad}");
        }
    }

    #[test]
    fn test_assign_targets_current() {
        let mut lab = Lab::default();
        lab.select_id("circuit").unwrap();
        assert_eq!(lab.assign("voltage=120").ok(), Some(50.0));
        assert_eq!(lab.current().simulation().log().len(), 1);
        assert!(matches!(lab.assign("gravity=1"), Err(SimError::UnknownParam { .. })));
        assert!(lab.select_id("nope").is_err());
        assert_eq!(lab.selected(), SimKind::Circuit);
    }

    #[test]
    fn test_instances_advance_independently() {
        let mut lab = Lab::default();
        lab.instance_mut(SimKind::Wave).pause();
        assert_eq!(lab.advance(Duration::from_millis(32)), 2);
        assert_eq!(lab.instance(SimKind::Pendulum).simulation().log().len(), 2);
        assert_eq!(lab.instance(SimKind::Orbit).simulation().log().len(), 2);
        assert!(lab.instance(SimKind::Wave).simulation().log().is_empty());
        assert_eq!(lab.instance(SimKind::Wave).run_state(), RunState::Paused);
        assert!(lab.instance(SimKind::Optics).simulation().log().is_empty());
    }

    #[test]
    fn test_default_export_path() {
        let settings = Settings {
            export_dir: PathBuf::from("out"),
            default_simulation: SimKind::MagneticField,
            ..Settings::default()
        };
        let lab = Lab::new(&settings);
        assert_eq!(lab.default_export_path(), PathBuf::from("out/magnetic_data.csv"));
    }

    #[test]
    fn test_export_current() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            export_dir: dir.path().to_path_buf(),
            default_simulation: SimKind::Thermodynamics,
            ..Settings::default()
        };
        let mut lab = Lab::new(&settings);
        let path = lab.default_export_path();
        assert_eq!(lab.export_current(&path).unwrap(), ExportOutcome::NothingToExport);
        assert!(!path.exists());

        lab.assign("volume=2").unwrap();
        lab.assign("temperature=400").unwrap();
        assert_eq!(
            lab.export_current(&path).unwrap(),
            ExportOutcome::Written {
                path: path.clone(),
                rows: 2
            }
        );
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        // Exporting leaves the log untouched
        assert_eq!(lab.current().simulation().log().len(), 2);
    }
}
