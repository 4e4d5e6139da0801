//! Download the NAIF kernels used by `--backend spice` into `data/spice/`
//! (or `$ELEVATOR_SHADOW_SPICE_DIR`).

use std::path::PathBuf;

use clap::Parser;
use elevator_shadow::ephem_spice;
use elevator_shadow::ephem_spice::kernels::{KERNEL_CATALOG, kernel_dir};
use elevator_shadow::importer::{KernelStatus, download_kernels, format_size};
use tracing::{Level, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about = "Fetch the SPICE kernel catalog")]
struct Cli {
    /// Target directory (defaults to the configured kernel directory)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Only list the catalog and what is missing locally
    #[arg(long)]
    list: bool,

    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let dir = cli.dir.unwrap_or_else(kernel_dir);

    if cli.list {
        for descriptor in KERNEL_CATALOG {
            let present = descriptor.path_in(&dir).exists();
            println!(
                "{} {:<14} [{}] {}",
                if present { "[ok]     " } else { "[missing]" },
                descriptor.filename,
                descriptor.kind.label(),
                descriptor.description
            );
        }
        return Ok(());
    }

    for status in download_kernels(KERNEL_CATALOG, &dir)? {
        match status {
            KernelStatus::Downloaded(path) => println!("[ok] {}", path.display()),
            KernelStatus::AlreadyPresent(path) => println!("[skip] {}", path.display()),
        }
    }

    if dir == kernel_dir() {
        match ephem_spice::kernel_summaries() {
            Ok(summaries) => {
                println!("\nLocal kernel summaries:");
                for summary in summaries {
                    println!(
                        "  - {:<13} [{} | {}] {}\n      └ {}",
                        summary.descriptor.filename,
                        summary.descriptor.kind.label(),
                        format_size(summary.file_size_bytes),
                        summary.descriptor.description,
                        summary.path.display()
                    );
                }
            }
            Err(err) => warn!(%err, "unable to summarize kernels"),
        }
    }
    if !ephem_spice::toolkit_available() {
        println!("\nNote: rebuild with `--features spice` to use these kernels.");
    }

    Ok(())
}
