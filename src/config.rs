//! Configuration parameters for a 2-Opt run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::construction::BuilderMethod;
use crate::error::Result;

/// How an improving move is chosen within one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementPolicy {
    /// Apply the first improving move found and restart the scan.
    #[default]
    FirstImprovement,
    /// Scan every candidate and apply the single best move.
    BestImprovement,
}

/// Configuration settings for the 2-Opt solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strategy used to build the initial tour
    pub builder: BuilderMethod,
    /// Move selection policy
    pub policy: ImprovementPolicy,
    /// A move is improving only when its delta is below `-epsilon`
    pub epsilon: f64,
    /// Maximum number of passes before the run is stopped and flagged as capped
    pub max_passes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            builder: BuilderMethod::default(),
            policy: ImprovementPolicy::default(),
            epsilon: 1e-9,
            max_passes: 100_000,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Set the initial tour construction method.
    pub fn with_builder(mut self, builder: BuilderMethod) -> Self {
        self.builder = builder;
        self
    }

    /// Set the move selection policy.
    pub fn with_policy(mut self, policy: ImprovementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the improvement threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the pass cap.
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes;
        self
    }
}
