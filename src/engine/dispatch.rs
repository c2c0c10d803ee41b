// src/engine/dispatch.rs

use std::fmt;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::dag::Graph;
use crate::errors::{JobdagError, Result};
use crate::exec::{ExecutionRecord, Pool, Slots};
use crate::report::{JobReport, Outcome, Reporter, RunSummary, Stats};

/// The scheduling loop.
///
/// Owns the graph, the slot pool and the execution pool for one run, and
/// drives them until every job is terminal:
///
/// 1. launch ready jobs (definition order) while slots are free
/// 2. wait for any execution to finish
/// 3. release its slot, record the result in the graph, report it
///
/// A job's failure only affects its descendants; independent branches keep
/// running.
pub struct Dispatch {
    graph: Graph,
    slots: Slots,
    pool: Pool,
    stats: Stats,
    reporters: Vec<Box<dyn Reporter>>,
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("graph", &self.graph)
            .field("slots", &self.slots)
            .field("pool", &self.pool)
            .field("reporters", &self.reporters.len())
            .finish_non_exhaustive()
    }
}

impl Dispatch {
    pub fn new(graph: Graph, slots: Slots, pool: Pool) -> Self {
        Self {
            graph,
            slots,
            pool,
            stats: Stats::new(),
            reporters: Vec::new(),
        }
    }

    /// Add a sink that is told about every terminal job.
    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    /// Run the graph to completion.
    ///
    /// Returns an error only for definition/configuration problems found
    /// before anything is spawned, or for broken internal invariants. Job
    /// failures are part of the returned [`RunSummary`].
    pub async fn run(&mut self) -> Result<RunSummary> {
        self.graph.validate()?;
        self.pool.ensure_output_dir()?;

        let started = Instant::now();
        info!(
            jobs = self.graph.len(),
            slots = self.slots.capacity(),
            output_dir = %self.pool.output_dir().display(),
            "dispatch started"
        );

        while !self.graph.is_finished() {
            let launched = self.launch_ready().await?;

            if self.pool.active_count() == 0 {
                let unfinished = self.graph.unfinished();
                error!(
                    launched,
                    ?unfinished,
                    "no job ready or running but graph is unfinished"
                );
                return Err(JobdagError::Deadlock { unfinished });
            }

            self.harvest_one().await?;
        }

        let summary = self.stats.summary(started.elapsed());
        info!(
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "dispatch finished"
        );
        for reporter in &mut self.reporters {
            reporter.run_finished(&summary);
        }

        Ok(summary)
    }

    /// Start ready jobs until either no job is ready or no slot is free.
    /// Returns how many were launched.
    async fn launch_ready(&mut self) -> Result<usize> {
        let mut launched = 0;

        while self.slots.available_count() > 0 {
            let Some(name) = self.graph.ready_jobs().next().map(|job| job.name.clone()) else {
                break;
            };

            let slot = self.slots.acquire().await?;
            self.graph.mark_started(&name, slot)?;
            let job = self
                .graph
                .job(&name)
                .ok_or_else(|| JobdagError::UnknownJob(name.clone()))?;
            self.pool.launch(job, slot)?;

            debug!(job = %name, slot, active = self.pool.active_count(), "job dispatched");
            launched += 1;
        }

        Ok(launched)
    }

    /// Wait for one execution to finish and fold its result back into the
    /// graph and the reporters.
    async fn harvest_one(&mut self) -> Result<()> {
        let Some(record) = self.pool.wait_any().await? else {
            return Ok(());
        };

        self.slots.release(record.slot)?;
        let skipped = self.graph.mark_finished(&record.job, record.exit_code)?;
        self.report(&record, &skipped);

        Ok(())
    }

    fn report(&mut self, record: &ExecutionRecord, skipped: &[String]) {
        let report = JobReport::from(record);
        match report.outcome {
            Outcome::Passed => debug!(job = %report.job, slot = report.slot, "job passed"),
            Outcome::Failed => warn!(
                job = %report.job,
                slot = report.slot,
                exit_code = ?report.exit_code,
                output = %report.output.display(),
                skipped = skipped.len(),
                "job failed"
            ),
        }

        self.stats.job_finished(&report);
        for reporter in &mut self.reporters {
            reporter.job_finished(&report);
        }

        for job in skipped {
            self.stats.job_skipped(job);
            for reporter in &mut self.reporters {
                reporter.job_skipped(job);
            }
        }
    }
}
