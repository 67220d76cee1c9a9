use serde::{Deserialize, Serialize};

/// What a cloner did with one dataset when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    Cloned,
    /// Target already exists and overwrite is off.
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CloneStatus {
    Cloned,
    Skipped { reason: String },
    Failed { reason: String },
}

impl CloneStatus {
    /// Skips count as successes: an existing artifact is a benign outcome.
    pub fn is_success(&self) -> bool {
        !matches!(self, CloneStatus::Failed { .. })
    }
}

impl From<CloneOutcome> for CloneStatus {
    fn from(outcome: CloneOutcome) -> Self {
        match outcome {
            CloneOutcome::Cloned => CloneStatus::Cloned,
            CloneOutcome::Skipped { reason } => CloneStatus::Skipped { reason },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetResult {
    pub dataset: String,
    #[serde(flatten)]
    pub status: CloneStatus,
}

impl DatasetResult {
    pub fn new(dataset: impl Into<String>, status: CloneStatus) -> Self {
        Self {
            dataset: dataset.into(),
            status,
        }
    }

    pub fn failed(dataset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            dataset,
            CloneStatus::Failed {
                reason: reason.into(),
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub successes: usize,
    pub failures: usize,
    pub results: Vec<DatasetResult>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: DatasetResult) {
        if result.status.is_success() {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        self.results.push(result);
    }

    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, CloneStatus::Skipped { .. }))
            .count()
    }

    pub fn failed_datasets(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.status.is_success())
            .map(|r| r.dataset.as_str())
            .collect()
    }
}

impl Extend<DatasetResult> for BatchResult {
    fn extend<I: IntoIterator<Item = DatasetResult>>(&mut self, iter: I) {
        for result in iter {
            self.push(result);
        }
    }
}
