//! Sweep command implementation.

use crate::cli::SweepArgs;
use crate::error::Result;
use crate::output::Formatter;
use lexcheck_extractor::Extractor;
use lexcheck_janitor::{SweepConfig, SweepMetrics, SweepWorker, Sweeper};
use lexcheck_store::SqliteStore;
use lexcheck_verify::StatuteSource;
use std::sync::Arc;

/// Execute the sweep command.
///
/// Without `--watch` or `--cycles` a single sweep runs immediately.
pub async fn execute_sweep<S: StatuteSource>(
    args: SweepArgs,
    extractor: Arc<Extractor<S, SqliteStore>>,
    config: &SweepConfig,
    formatter: &Formatter,
) -> Result<()> {
    let metrics = run_sweep(&args, extractor, config).await?;
    println!("{}", formatter.format_metrics(&metrics)?);
    Ok(())
}

/// Apply command-line overrides to the configured sweep settings.
fn effective_config(args: &SweepArgs, config: &SweepConfig) -> SweepConfig {
    let mut config = config.clone();
    if let Some(hours) = args.stale_after_hours {
        config.stale_after_hours = hours;
    }
    if let Some(limit) = args.limit {
        config.batch_limit = limit;
    }
    config.dry_run |= args.dry_run;
    config
}

async fn run_sweep<S: StatuteSource>(
    args: &SweepArgs,
    extractor: Arc<Extractor<S, SqliteStore>>,
    config: &SweepConfig,
) -> Result<SweepMetrics> {
    let mut sweeper = Sweeper::new(extractor, effective_config(args, config))?;

    if args.watch {
        let mut worker = SweepWorker::new(sweeper);
        worker.run().await?;
        return Ok(worker.metrics().clone());
    }

    if let Some(cycles) = args.cycles {
        let mut worker = SweepWorker::new(sweeper);
        worker.run_cycles(cycles).await?;
        return Ok(worker.metrics().clone());
    }

    Ok(sweeper.sweep().await?)
}
