//! Phys Tutor headless runner
//!
//! Drives one simulation through the lab's fixed clock without a window,
//! then prints a summary or JSON snapshot and optionally exports the log.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use phys_tutor::persistence::ExportOutcome;
use phys_tutor::{Lab, Settings, SimKind, registry};

/// Run a physics simulation headlessly
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulation id or title (defaults to the configured one)
    #[arg(short, long)]
    sim: Option<String>,

    /// Frames to run, one tick interval each
    #[arg(short, long, default_value_t = 100)]
    ticks: u32,

    /// Parameter assignment applied before running, e.g. `gravity=3.7`
    #[arg(long = "set", value_name = "NAME=VALUE")]
    assignments: Vec<String>,

    /// Pause after this many frames; the remaining frames must not tick
    #[arg(long)]
    pause_after: Option<u32>,

    /// Export the log as CSV (default path under the export directory)
    #[arg(short, long, value_name = "PATH", num_args = 0..=1)]
    export: Option<Option<PathBuf>>,

    /// Path to a settings JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List simulations and their parameters, then exit
    #[arg(long)]
    list: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    // RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn list() {
    for kind in SimKind::ALL {
        let sim = registry::create(kind);
        let mode = if sim.is_dynamic() { "dynamic" } else { "static" };
        println!("{:<16} {} ({mode})", kind.id(), kind.title());
        for spec in sim.params() {
            println!(
                "    {:<16} {:>8} .. {:<8} default {}{}",
                spec.name,
                spec.min,
                spec.max,
                spec.default,
                spec.unit.map(|u| format!(" {u}")).unwrap_or_default()
            );
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    #[cfg(not(target_arch = "wasm32"))]
    init_logging(args.debug);

    if args.list {
        list();
        return Ok(());
    }

    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let mut lab = Lab::new(&settings);
    if let Some(id) = &args.sim {
        lab.select_id(id)?;
    }
    for assignment in &args.assignments {
        let applied = lab.assign(assignment)?;
        log::debug!("{assignment} -> {applied}");
    }

    let frame = settings.tick_interval();
    let mut ticks = 0u64;
    for n in 0..args.ticks {
        if args.pause_after == Some(n) {
            lab.current_mut().pause();
        }
        ticks += u64::from(lab.advance(frame));
    }

    let current = lab.current();
    let sim = current.simulation();
    if args.json {
        let mut snapshot = sim.snapshot();
        snapshot["run_state"] = current.run_state().as_str().into();
        snapshot["ticks"] = ticks.into();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{} [{}]", lab.selected().title(), current.run_state().as_str());
        println!("  ticks run: {ticks}");
        println!("  records:   {}", sim.log().len());
        println!("  {}", sim.status());
    }

    if let Some(target) = args.export {
        let path = target.unwrap_or_else(|| lab.default_export_path());
        match lab
            .export_current(&path)
            .with_context(|| format!("exporting {}", lab.selected().title()))?
        {
            ExportOutcome::Written { path, rows } => {
                println!("Exported {rows} rows to {}", path.display())
            }
            ExportOutcome::NothingToExport => println!("No data to export"),
        }
    }

    Ok(())
}
