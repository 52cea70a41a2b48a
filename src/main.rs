//! StreamMine - Main Entry Point
//!
//! Loads a pipeline specification from a TOML file, assembles it against the
//! built-in component registry, and runs it to completion, printing periodic
//! measure reports and a final summary.

use anyhow::bail;
use streammine_rs::{
    components,
    pipeline::{report_channel, RunState, Runner, RunnerMessage},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,streammine_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let spec_path = match args.next() {
        Some(path) => path,
        None => bail!("usage: streammine <pipeline.toml>"),
    };

    // Populate the component catalog before any assembly
    let registry = components::builtin_registry();

    let (report_tx, report_rx) = report_channel();
    let runner = Runner::new().with_report_channel(report_tx);

    tracing::info!("Running pipeline spec {}", spec_path);
    let report = streammine_rs::run_spec_file(&registry, &spec_path, &runner)?;

    // Print the cadence snapshots collected during the run
    for msg in report_rx.try_iter() {
        if let RunnerMessage::Report {
            instances_seen,
            measures,
            ..
        } = msg
        {
            match measures {
                Some(m) => println!("[{:>8}] {}", instances_seen, m),
                None => println!("[{:>8}] no measures", instances_seen),
            }
        }
    }

    println!(
        "{}: {} instances in {:.3}s",
        report.state,
        report.instances_seen,
        report.elapsed.as_secs_f64()
    );
    match &report.measures {
        Some(m) => println!("final measures: {}", m),
        None => println!("final measures: none"),
    }

    if report.state == RunState::Failed {
        if let Some(error) = report.error {
            bail!("pipeline failed: {}", error);
        }
        bail!("pipeline failed");
    }

    Ok(())
}
