//! offgrid-sim entry point: CLI wiring and report output.

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info};

use offgrid_sim::cli::CliArgs;
use offgrid_sim::io::export::export_csv;
use offgrid_sim::reporting::latex_table;
use offgrid_sim::runner::{run_batch, run_scenario, scenario_matrix};
use offgrid_sim::telemetry::init_tracing;

fn main() -> Result<()> {
    let cli = CliArgs::parse();
    init_tracing(cli.quiet);

    let scenario = cli.scenario()?;

    if cli.matrix {
        let configs = scenario_matrix(&scenario);
        let mut reports = Vec::with_capacity(configs.len());
        let mut failed = 0;
        for (cfg, outcome) in configs.iter().zip(run_batch(&configs)) {
            match outcome {
                Ok(run) => reports.push(run.report),
                Err(e) => {
                    error!(scenario = %cfg.label(), "{e}");
                    failed += 1;
                }
            }
        }
        print!("{}", latex_table(&reports));
        if failed > 0 {
            bail!("{failed} of {} scenarios failed", configs.len());
        }
        return Ok(());
    }

    let run = run_scenario(&scenario).with_context(|| format!("scenario {}", scenario.label()))?;

    for row in &run.trace.rows {
        println!("{row}");
    }
    println!("\n{}", run.report);
    println!("{}", run.report.latex_row());

    if let Some(path) = &cli.trace_out {
        export_csv(&run.trace.rows, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        info!(path = %path.display(), "trace written");
    }

    Ok(())
}
