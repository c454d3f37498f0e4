use std::fmt;
use std::time::Duration;
use serde::Serialize;

use crate::config::OutputFormat;

/// Outcome of a whole run of attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub code: i32,
    /// 1-based number of the attempt that ended the run.
    pub call_no: u64,
    pub successful_attempts: u64,
    pub elapsed: Duration,
}

#[derive(Serialize)]
struct JsonReport {
    code: i32,
    call_no: u64,
    success: bool,
    successful_attempts: u64,
    elapsed_ms: f64,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => {
                let body = JsonReport {
                    code: self.code,
                    call_no: self.call_no,
                    success: self.is_success(),
                    successful_attempts: self.successful_attempts,
                    elapsed_ms: self.elapsed.as_micros() as f64 / 1000.0,
                };
                Ok(serde_json::to_string(&body)?)
            }
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Client call returned {} on call no. {}", self.code, self.call_no)
    }
}
