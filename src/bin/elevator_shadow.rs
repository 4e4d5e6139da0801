use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use elevator_shadow::astro::AstronomyService;
use elevator_shadow::config::{load_elevators, load_planet_model};
use elevator_shadow::export::{SweepReport, export_sweep_csv, export_sweep_json};
use elevator_shadow::geometry::{self, Elevator, TransitionKind};
use elevator_shadow::{Backend, build_service, evaluate_catalog};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Umbra and penumbra exit heights along a space elevator"
)]
struct Cli {
    /// Log at DEBUG instead of INFO
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Astronomy backend
    #[arg(long, value_enum, default_value_t = Backend::Analytic, global = true)]
    backend: Backend,

    /// Planet model (YAML or TOML) overriding WGS84 for the analytic backend
    #[arg(long, global = true)]
    planet: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Exit heights at a single instant
    At {
        #[command(flatten)]
        site: Site,

        /// RFC 3339 instant (defaults to now)
        #[arg(long, value_parser = parse_instant)]
        time: Option<DateTime<Utc>>,
    },
    /// Exit heights sampled over a time window
    Sweep {
        #[command(flatten)]
        site: Site,

        /// RFC 3339 start of the window
        #[arg(long, value_parser = parse_instant)]
        start: DateTime<Utc>,

        /// RFC 3339 end of the window (inclusive)
        #[arg(long, value_parser = parse_instant)]
        end: DateTime<Utc>,

        /// Sampling step in minutes
        #[arg(long, default_value_t = 30)]
        step_minutes: i64,

        /// Write samples as CSV (`-` for stdout)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the full report as JSON (`-` for stdout)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Label stored in the JSON report
        #[arg(long, default_value = "elevator")]
        name: String,
    },
    /// Evaluate every elevator in a YAML/TOML catalog
    Catalog {
        /// Catalog file or directory of TOML records
        #[arg(long, default_value = "data/elevators.yaml")]
        file: PathBuf,

        /// RFC 3339 instant (defaults to now)
        #[arg(long, value_parser = parse_instant)]
        time: Option<DateTime<Utc>>,
    },
}

#[derive(Args)]
struct Site {
    /// Geodetic latitude of the base in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// East longitude of the base in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Structure height above the surface in km
    #[arg(long, allow_hyphen_values = true)]
    height: f64,
}

impl Site {
    fn elevator(&self) -> Elevator {
        Elevator::new(self.lat, self.lon, self.height)
    }
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("expected an RFC 3339 timestamp: {err}"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let ellipsoid = cli
        .planet
        .as_ref()
        .map(|path| {
            load_planet_model(path)
                .map(|model| model.ellipsoid())
                .with_context(|| format!("loading planet model {}", path.display()))
        })
        .transpose()?;
    let astro = build_service(cli.backend, ellipsoid)?;

    match cli.command {
        Command::At { site, time } => {
            run_at(astro.as_ref(), &site, time.unwrap_or_else(Utc::now))
        }
        Command::Sweep {
            site,
            start,
            end,
            step_minutes,
            csv,
            json,
            name,
        } => {
            let elevator = site.elevator();
            let step = Duration::try_minutes(step_minutes).context("step out of range")?;
            let samples = geometry::sweep(&elevator, astro.as_ref(), start, end, step)?;
            let transitions = geometry::transitions(&samples);

            println!(
                "{:<26} {:>10} {:>14} {:>14}",
                "instant", "sun el°", "umbra km", "penumbra km"
            );
            for sample in &samples {
                println!(
                    "{:<26} {:>10.3} {:>14.3} {:>14.3}",
                    sample.instant.to_rfc3339(),
                    sample.sun_elevation.to_degrees(),
                    sample.heights.umbra_km,
                    sample.heights.penumbra_km
                );
            }
            println!("\nUmbra transitions:");
            if transitions.is_empty() {
                println!("  none");
            }
            for transition in &transitions {
                let label = match transition.kind {
                    TransitionKind::EnterUmbra => "enter",
                    TransitionKind::ExitUmbra => "exit",
                };
                println!(
                    "  {label:<5} between {} and {}",
                    transition.after.to_rfc3339(),
                    transition.before.to_rfc3339()
                );
            }

            if let Some(path) = csv {
                export_sweep_csv(&path, &samples)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            if let Some(path) = json {
                let report = SweepReport {
                    name: &name,
                    latitude_deg: site.lat,
                    longitude_deg: site.lon,
                    height_km: site.height,
                    samples: &samples,
                    transitions: &transitions,
                };
                export_sweep_json(&path, &report)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            Ok(())
        }
        Command::Catalog { file, time } => {
            let instant = time.unwrap_or_else(Utc::now);
            let elevators = load_elevators(&file)
                .with_context(|| format!("loading catalog {}", file.display()))?;
            let entries = evaluate_catalog(&elevators, astro.as_ref(), instant)?;
            println!("Shadow exit heights at {}", instant.to_rfc3339());
            println!(
                "{:<20} {:>9} {:>9} {:>12} {:>14} {:>14}",
                "name", "lat°", "lon°", "height km", "umbra km", "penumbra km"
            );
            for (config, entry) in elevators.iter().zip(&entries) {
                println!(
                    "{:<20} {:>9.3} {:>9.3} {:>12.1} {:>14.3} {:>14.3}",
                    entry.name,
                    config.latitude_deg,
                    config.longitude_deg,
                    config.height_km,
                    entry.heights.umbra_km,
                    entry.heights.penumbra_km
                );
            }
            Ok(())
        }
    }
}

fn run_at(
    astro: &dyn AstronomyService,
    site: &Site,
    instant: DateTime<Utc>,
) -> anyhow::Result<()> {
    let elevator = site.elevator();
    let state = elevator.at(astro, instant)?;
    let sun = state.sun();
    let horizontal = astro.azimuth_elevation(&elevator.base(), &sun.position_km, instant)?;
    let heights = state.shadow_heights(astro)?;

    println!("=== Elevator Shadow ===");
    println!(
        "Base: lat {:.4}°, lon {:.4}°, height {:.1} km",
        site.lat, site.lon, site.height
    );
    println!("Instant: {}", instant.to_rfc3339());
    println!(
        "Sun: azimuth {:.3}°, elevation {:.3}°, angular diameter {:.4}°",
        horizontal.azimuth.to_degrees(),
        horizontal.elevation.to_degrees(),
        sun.angular_diameter.to_degrees()
    );
    println!("Umbra exit: {:.3} km", heights.umbra_km);
    println!("Penumbra exit: {:.3} km", heights.penumbra_km);
    if horizontal.elevation > 0.0 {
        println!("Sun above the base horizon: structure fully lit");
    }
    Ok(())
}
