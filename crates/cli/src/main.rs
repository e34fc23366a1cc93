//! Floorplan layout CLI

use anyhow::Context;
use clap::{Parser, Subcommand};
use floorplan_layout::{
    BuildingGeometry, EngineConfig, OptimizationResult, Optimizer, UnitSize, ViolationKind,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "floorplan")]
#[command(about = "Automatic unit and corridor layout for building floorplans")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available layout profiles
    Profiles,

    /// Place units and corridors in a building
    Optimize {
        /// Path to the building geometry (JSON)
        geometry: PathBuf,

        /// Layout profile id (e.g., 10%, 25%, 30%, 35%)
        #[arg(short, long, default_value = "25%")]
        profile: String,

        /// Requested corridor width in meters
        #[arg(short, long, default_value = "1.5")]
        corridor_width: f64,

        /// Override every unit with one size, e.g. 2x2.5
        #[arg(short, long)]
        unit_size: Option<UnitSize>,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Engine configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file for the layout (JSON); printed to stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check an existing layout against a building
    Validate {
        /// Path to the building geometry (JSON)
        geometry: PathBuf,

        /// Path to a layout produced by `optimize` (JSON)
        layout: PathBuf,

        /// Layout profile id
        #[arg(short, long, default_value = "25%")]
        profile: String,

        /// Engine configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Profiles => {
            let optimizer = Optimizer::default();
            println!("Available Profiles:");
            println!("===================");
            for profile in optimizer.profile_details() {
                let mix: Vec<String> = profile
                    .size_mix()
                    .iter()
                    .map(|(kind, weight)| format!("{} {:.0}%", kind.name(), weight * 100.0))
                    .collect();
                println!(
                    "  {:<5} coverage={:.0}% density={:?} spacing={}m mix=[{}]",
                    profile.id(),
                    profile.coverage() * 100.0,
                    profile.density(),
                    profile.min_spacing(),
                    mix.join(", ")
                );
            }
        }

        Commands::Optimize {
            geometry,
            profile,
            corridor_width,
            unit_size,
            seed,
            config,
            output,
        } => {
            let building = load_geometry(&geometry)?;
            let mut engine = load_config(config.as_deref())?;
            if let Some(seed) = seed {
                engine = engine.with_seed(seed);
            }

            let optimizer = Optimizer::new(engine);
            let outcome = optimizer.optimize(&building, unit_size, corridor_width, &profile)?;

            for reason in outcome.reasons() {
                log::warn!("Degraded: {}", reason);
            }

            let run = outcome.into_run();
            let stats = &run.result.statistics;
            let json = serde_json::to_string_pretty(&run.result)?;

            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!(
                        "Placed {}/{} units, {} corridors, {:.1}% utilization (seed {}, {} ms)",
                        stats.unit_count,
                        run.target_count,
                        stats.corridor_count,
                        stats.utilization_rate,
                        run.seed,
                        run.elapsed_ms
                    );
                    println!("Layout saved to: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Validate {
            geometry,
            layout,
            profile,
            config,
        } => {
            let building = load_geometry(&geometry)?;
            let text = fs::read_to_string(&layout)
                .with_context(|| format!("reading {}", layout.display()))?;
            let result: OptimizationResult = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", layout.display()))?;

            let optimizer = Optimizer::new(load_config(config.as_deref())?);
            let report = optimizer.validate_layout(&result.units, &building, &profile)?;

            let mut invalid = 0;
            for entry in &report {
                if entry.outcome.valid {
                    continue;
                }
                invalid += 1;
                println!("{}:", entry.unit_id);
                for violation in &entry.outcome.violations {
                    println!("  - {}", describe(violation));
                    println!("    hint: {}", violation.suggestion());
                }
            }
            println!("\n{}/{} units valid", report.len() - invalid, report.len());

            if invalid > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_geometry(path: &Path) -> anyhow::Result<BuildingGeometry> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let geometry: BuildingGeometry =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    if let Err(e) = geometry.validate() {
        log::warn!("{}: {}", path.display(), e);
    }
    Ok(geometry)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: EngineConfig =
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn describe(violation: &ViolationKind) -> String {
    match violation {
        ViolationKind::OutsideBoundary => "outside the building boundary".to_string(),
        ViolationKind::RestrictedZone { zone } => format!("inside restricted zone #{}", zone),
        ViolationKind::EntranceZone { zone } => format!("blocks entrance zone #{}", zone),
        ViolationKind::Overlap { other } => format!("overlaps {}", other),
        ViolationKind::InsufficientSpacing {
            other,
            distance,
            required,
        } => format!("{:.2}m from {} (needs {:.2}m)", distance, other, required),
        ViolationKind::WallClearance {
            wall,
            distance,
            required,
        } => format!("{:.2}m from wall #{} (needs {:.2}m)", distance, wall, required),
        ViolationKind::InvalidDimensions => "width and height must be positive".to_string(),
    }
}
