// Run journal and machine-readable result
//
// The runner appends one StepRecord per step as it goes; the driver turns the
// journal into a RunReport, which decides the process exit code and can be
// written as result.json next to the screenshots.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Process exit codes
pub mod exit_code {
    /// Every step passed
    pub const PASSED: u8 = 0;
    /// The runner failed; see the error screenshot and result file
    pub const FAILED: u8 = 1;
    /// The run never started: bad configuration or no browser
    pub const SETUP: u8 = 2;
}

/// How a single step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Passed,
    /// Optional step that timed out and was skipped
    Tolerated,
    Failed,
}

/// One entry of the run journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: String,
    pub status: StepStatus,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Ordered record of the steps a run went through
#[derive(Debug, Clone, Default)]
pub struct Journal {
    steps: Vec<StepRecord>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: &str, status: StepStatus, elapsed: Duration) -> &mut StepRecord {
        self.steps.push(StepRecord {
            step: step.to_string(),
            status,
            duration_ms: elapsed.as_millis() as u64,
            screenshot: None,
            detail: None,
        });
        let last = self.steps.len() - 1;
        &mut self.steps[last]
    }

    pub fn into_steps(self) -> Vec<StepRecord> {
        self.steps
    }
}

/// Overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
}

/// Result of one verification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub outcome: Outcome,
    pub base_url: String,
    pub duration_ms: u64,
    pub steps: Vec<StepRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_screenshot: Option<PathBuf>,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }

    pub fn exit_code(&self) -> u8 {
        match self.outcome {
            Outcome::Passed => exit_code::PASSED,
            Outcome::Failed => exit_code::FAILED,
        }
    }

    /// Status of the most recent record for `step`
    pub fn status_of(&self, step: &str) -> Option<StepStatus> {
        self.steps
            .iter()
            .rev()
            .find(|record| record.step == step)
            .map(|record| record.status)
    }

    /// Screenshots written by passing steps, in order
    pub fn screenshots(&self) -> Vec<&Path> {
        self.steps
            .iter()
            .filter_map(|record| record.screenshot.as_deref())
            .collect()
    }

    /// Writes the report as pretty-printed JSON.
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
