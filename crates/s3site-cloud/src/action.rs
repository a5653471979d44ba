//! Outcomes of a provisioning run

use serde::{Deserialize, Serialize};

/// What the bucket step did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketOutcome {
    pub bucket: String,

    /// Buckets created during this run (main and redirect buckets)
    pub created: Vec<String>,

    /// Number of routing rules submitted with the website config
    pub routing_rules: usize,

    /// Redirect buckets now forwarding to the main bucket
    pub redirect_buckets: Vec<String>,
}

/// What the distribution step did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum DistributionOutcome {
    Created { id: String, domain_name: String },
    Updated { id: String },
    /// A distribution exists and no override is configured
    Unchanged { id: String },
    /// Headless run without autocreate
    Skipped,
    /// The user declined creating a distribution
    Declined,
}

impl DistributionOutcome {
    /// Id of the distribution after this step, if one exists
    pub fn distribution_id(&self) -> Option<&str> {
        match self {
            DistributionOutcome::Created { id, .. }
            | DistributionOutcome::Updated { id }
            | DistributionOutcome::Unchanged { id } => Some(id),
            DistributionOutcome::Skipped | DistributionOutcome::Declined => None,
        }
    }
}

impl std::fmt::Display for DistributionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributionOutcome::Created { id, .. } => write!(f, "created {}", id),
            DistributionOutcome::Updated { id } => write!(f, "updated {}", id),
            DistributionOutcome::Unchanged { id } => write!(f, "{} unchanged", id),
            DistributionOutcome::Skipped => write!(f, "skipped"),
            DistributionOutcome::Declined => write!(f, "declined"),
        }
    }
}

/// What the DNS step did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainOutcome {
    /// Hosted zones created during this run
    pub zones_created: Vec<String>,

    /// Hosted zones the user declined to create; records under them were not touched
    pub zones_declined: Vec<String>,

    /// Record names created (or re-created)
    pub records_created: Vec<String>,

    /// Existing records the user chose to keep
    pub records_kept: Vec<String>,
}

/// Provisioning step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Bucket,
    Distribution,
    Domain,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Bucket => write!(f, "bucket"),
            Step::Distribution => write!(f, "distribution"),
            Step::Domain => write!(f, "domain"),
        }
    }
}

/// Result of a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step: Step,

    pub success: bool,

    /// Success message
    pub message: String,

    /// Error message if failed
    pub error: Option<String>,
}

/// Result of a whole run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub bucket: Option<BucketOutcome>,
    pub distribution: Option<DistributionOutcome>,
    pub domain: Option<DomainOutcome>,

    /// Steps in execution order
    pub steps: Vec<StepResult>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|s| s.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|s| !s.success)
    }

    pub fn add_success(&mut self, step: Step, message: String) {
        self.steps.push(StepResult {
            step,
            success: true,
            message,
            error: None,
        });
    }

    pub fn add_failure(&mut self, step: Step, error: String) {
        self.steps.push(StepResult {
            step,
            success: false,
            message: String::new(),
            error: Some(error),
        });
    }

    pub fn step(&self, step: Step) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.step == step)
    }
}
