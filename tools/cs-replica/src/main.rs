//! CS-Replica: committee sync replica tool

use clap::Parser;
use cs_replica::{run, write_metrics, Cli};
use sync_telemetry::{init_telemetry, TelemetryConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _telemetry = init_telemetry(TelemetryConfig::for_service("cs-replica"))?;

    let output = run(cli.command)?;
    println!("{output}");

    if let Some(path) = cli.metrics_out {
        write_metrics(&path)?;
    }
    Ok(())
}
