use std::future::Future;
use anyhow::{Result, bail};
use tokio::time::Instant;

use crate::prober::AttemptResult;
use crate::report::RunReport;

pub struct Scheduler {
    max_attempts: u64,
}

impl Scheduler {
    pub fn new(max_attempts: u64) -> Result<Self> {
        if max_attempts == 0 {
            bail!("attempt count must be at least 1");
        }
        Ok(Self { max_attempts })
    }

    /// job: one attempt per call. Runs strictly one after another and stops
    /// at the first attempt that is not a success. An `Err` from the job
    /// aborts the run without a report.
    pub async fn run<J, F>(&self, mut job: J) -> Result<RunReport>
    where
        J: FnMut() -> F,
        F: Future<Output = Result<AttemptResult>>,
    {
        let start = Instant::now();
        let mut code = 0;
        let mut call_no = 0;
        let mut successful_attempts = 0;

        while call_no < self.max_attempts {
            call_no += 1;
            let result = job().await?;
            tracing::debug!(attempt = call_no, code = result.outcome_code(), "attempt finished");

            if !result.is_success() {
                code = result.outcome_code();
                break;
            }
            successful_attempts += 1;
        }

        Ok(RunReport {
            code,
            call_no,
            successful_attempts,
            elapsed: start.elapsed(),
        })
    }
}
