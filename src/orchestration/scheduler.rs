// Tue Jan 13 2026 - Alex

use crate::config::Config;
use crate::unit::{SkipReason, UnitDescriptor, UnitOutcome};
use indicatif::ProgressBar;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Runs one job per unit, either on a dedicated rayon pool or inline.
/// A panicking job becomes a `SkipReason::Panicked` outcome for that unit only.
pub struct UnitScheduler {
    thread_count: usize,
    parallel: bool,
    progress: Option<ProgressBar>,
}

impl UnitScheduler {
    pub fn new(thread_count: usize) -> Self {
        Self {
            thread_count: thread_count.max(1),
            parallel: true,
            progress: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_threads).with_parallel(config.parallel_loading)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Ticks once per finished unit, panicked ones included.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Outcomes come back in the same order as `units`.
    pub fn run<F>(&self, units: Vec<UnitDescriptor>, job: F) -> Result<Vec<UnitOutcome>, String>
    where
        F: Fn(&UnitDescriptor) -> Result<String, SkipReason> + Send + Sync,
    {
        if let Some(progress) = &self.progress {
            progress.set_length(units.len() as u64);
        }

        if !self.parallel || self.thread_count == 1 || units.len() <= 1 {
            return Ok(units.into_iter().map(|unit| self.run_one(&job, unit)).collect());
        }

        log::debug!("Loading {} units on {} threads", units.len(), self.thread_count);

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.thread_count)
            .thread_name(|i| format!("unit-loader-{}", i))
            .build()
            .map_err(|e| e.to_string())?;

        Ok(pool.install(|| {
            units
                .into_par_iter()
                .map(|unit| self.run_one(&job, unit))
                .collect()
        }))
    }

    fn run_one<F>(&self, job: &F, unit: UnitDescriptor) -> UnitOutcome
    where
        F: Fn(&UnitDescriptor) -> Result<String, SkipReason>,
    {
        let outcome = run_guarded(job, unit);
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
        outcome
    }
}

impl Default for UnitScheduler {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

fn run_guarded<F>(job: &F, unit: UnitDescriptor) -> UnitOutcome
where
    F: Fn(&UnitDescriptor) -> Result<String, SkipReason>,
{
    let result = match panic::catch_unwind(AssertUnwindSafe(|| job(&unit))) {
        Ok(result) => result,
        Err(payload) => Err(SkipReason::Panicked(panic_message(payload.as_ref()))),
    };

    UnitOutcome { unit, result }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
