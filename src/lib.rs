// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod report;

use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{RunOptions, load_jobfile};
use crate::engine::Dispatch;
use crate::errors::{JobdagError, Result};
use crate::exec::{Pool, Slots};
use crate::report::{RunSummary, Ui};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - job file loading (imports, validation)
/// - option resolution (CLI vs. `[options]`)
/// - the slot pool, execution pool and dispatch loop
/// - Ctrl-C handling
///
/// With `--dot` the graph is printed and nothing runs; the returned summary
/// is empty.
pub async fn run(args: CliArgs) -> Result<RunSummary> {
    if !args.file.is_file() {
        return Err(JobdagError::JobfileNotFound(args.file));
    }

    let jobfile = load_jobfile(&args.file)?;
    let options = RunOptions::resolve(
        args.max_jobs,
        args.output_directory.as_deref(),
        args.dot,
        &jobfile.options,
        &jobfile.path,
    )?;
    debug!(?options, "resolved run options");

    if options.dot {
        print!("{}", jobfile.graph.to_dot());
        return Ok(RunSummary::default());
    }

    info!(
        file = %jobfile.path.display(),
        jobs = jobfile.graph.len(),
        max_jobs = options.max_jobs,
        "loaded job file"
    );

    let slots = Slots::new(options.max_jobs)?;
    let pool = Pool::new(options.output_directory);
    let mut dispatch =
        Dispatch::new(jobfile.graph, slots, pool).with_reporter(Box::new(Ui::stdout()));

    let run = dispatch.run();
    tokio::pin!(run);
    let mut listen_for_ctrl_c = true;

    // Returning ends the borrow of `dispatch`; dropping it drops the pool,
    // which kills running children.
    loop {
        tokio::select! {
            summary = &mut run => return summary,
            signal = tokio::signal::ctrl_c(), if listen_for_ctrl_c => match signal {
                Ok(()) => {
                    warn!("interrupted, stopping running jobs");
                    return Err(JobdagError::Interrupted);
                }
                Err(e) => {
                    warn!(error = %e, "failed to listen for Ctrl+C; running without it");
                    listen_for_ctrl_c = false;
                }
            },
        }
    }
}
