//! Run statistics and formatting helpers.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Format a distance for display.
pub fn format_distance(distance: f64) -> String {
    format!("{:.2} units", distance)
}

/// Format a duration with a precision that suits its magnitude.
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs_f64();

    if seconds < 0.001 {
        format!("{:.3}ms", seconds * 1000.0)
    } else if seconds < 1.0 {
        format!("{:.1}ms", seconds * 1000.0)
    } else {
        format!("{:.3}s", seconds)
    }
}

/// Statistics about a finished (or in-progress) 2-Opt run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub initial_length: f64,
    pub final_length: f64,
    /// Number of passes started
    pub iterations: usize,
    /// Number of accepted swaps
    pub swaps: usize,
    pub improvement_percent: f64,
    /// The run stopped at the pass cap instead of converging
    pub capped: bool,
    pub elapsed: Duration,
    /// Initial length followed by the length after every accepted swap
    pub length_history: Vec<f64>,
}

impl RunStatistics {
    pub(crate) fn new(initial_length: f64) -> Self {
        RunStatistics {
            initial_length,
            final_length: initial_length,
            length_history: vec![initial_length],
            ..RunStatistics::default()
        }
    }

    /// Record the final length and derive the improvement percentage.
    pub(crate) fn finish(&mut self, final_length: f64, elapsed: Duration) {
        self.final_length = final_length;
        self.elapsed = elapsed;
        self.improvement_percent = if self.initial_length > 0.0 {
            (self.initial_length - final_length) / self.initial_length * 100.0
        } else {
            0.0
        };
    }

    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Run Statistics:
- Iterations: {}
- Swaps Made: {}
- Initial Distance: {}
- Final Distance: {}
- Tour Improvement: {:.1}%
- Capped: {}
- Computation Time: {}",
            self.iterations,
            self.swaps,
            format_distance(self.initial_length),
            format_distance(self.final_length),
            self.improvement_percent,
            self.capped,
            format_duration(self.elapsed)
        )
    }
}
