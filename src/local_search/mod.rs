//! The 2-Opt improvement engine.
//!
//! A [`TwoOptEngine`] owns a distance matrix snapshot and its own copy of the
//! tour. It moves through `Idle -> Running -> (Converged | Cancelled)` and
//! reports its progress as a sequence of [`EngineEvent`]s, either one pass at
//! a time through [`TwoOptEngine::step`] or lazily through
//! [`TwoOptEngine::events`].

pub mod events;
pub mod two_opt;

use log::{info, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, ImprovementPolicy};
use crate::error::{Error, Result};
use crate::problem::DistanceMatrix;
use crate::tour::Tour;
use crate::utils::RunStatistics;

pub use self::events::{EngineEvent, SwapEvent};
pub use self::two_opt::Move;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Idle,
    Running,
    Converged,
    Cancelled,
}

impl EngineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, EngineState::Converged | EngineState::Cancelled)
    }
}

/// Requests cooperative cancellation of a run from another thread.
///
/// The flag is checked between passes, so a pass that is already scanning
/// always completes (or applies its swap) before the run stops.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Final result of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub tour: Tour,
    pub length: f64,
    pub state: EngineState,
    pub statistics: RunStatistics,
}

/// Runs 2-Opt on a single tour.
pub struct TwoOptEngine {
    matrix: DistanceMatrix,
    tour: Tour,
    policy: ImprovementPolicy,
    epsilon: f64,
    max_passes: usize,
    state: EngineState,
    current_length: f64,
    statistics: RunStatistics,
    cancel: CancelHandle,
    started_at: Option<Instant>,
    /// Events of the current pass not yet handed out by [`EngineEvents`]
    pending: VecDeque<EngineEvent>,
}

impl TwoOptEngine {
    /// Create an idle engine.
    ///
    /// Fails with [`Error::InvalidInput`] when the tour does not cover exactly
    /// the cities of the matrix or the configuration is unusable.
    pub fn new(matrix: DistanceMatrix, tour: Tour, config: &Config) -> Result<Self> {
        if tour.len() != matrix.size() {
            return Err(Error::invalid_input(format!(
                "tour has {} cities but the distance matrix covers {}",
                tour.len(),
                matrix.size()
            )));
        }
        if !config.epsilon.is_finite() || config.epsilon < 0.0 {
            return Err(Error::invalid_input(format!(
                "epsilon must be a finite non-negative number, got {}",
                config.epsilon
            )));
        }
        if config.max_passes == 0 {
            return Err(Error::invalid_input("max_passes must be at least 1"));
        }

        let current_length = tour.length(&matrix);

        Ok(TwoOptEngine {
            matrix,
            tour,
            policy: config.policy,
            epsilon: config.epsilon,
            max_passes: config.max_passes,
            state: EngineState::Idle,
            current_length,
            statistics: RunStatistics::new(current_length),
            cancel: CancelHandle::default(),
            started_at: None,
            pending: VecDeque::new(),
        })
    }

    /// Move from `Idle` to `Running`.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            EngineState::Idle => {
                self.begin();
                Ok(())
            }
            EngineState::Running => Err(Error::AlreadyRunning),
            EngineState::Converged | EngineState::Cancelled => Err(Error::invalid_input(
                "run has already finished; build a new engine to run again",
            )),
        }
    }

    /// Run exactly one pass, starting the engine first if it is idle.
    ///
    /// An improving pass yields `SwapApplied` followed by
    /// `PassCompleted { improving: true }`. The final pass yields
    /// `PassCompleted { improving: false }` and `RunFinished`. A cancelled or
    /// capped run yields only `RunFinished`; a finished engine yields nothing.
    ///
    /// If an [`EngineEvents`] iterator stopped halfway through a pass, the
    /// remaining events of that pass are returned instead.
    pub fn step(&mut self) -> Result<Vec<EngineEvent>> {
        if !self.pending.is_empty() {
            return Ok(self.pending.drain(..).collect());
        }
        match self.state {
            EngineState::Idle => self.start()?,
            EngineState::Running => {}
            EngineState::Converged | EngineState::Cancelled => return Ok(Vec::new()),
        }
        Ok(self.advance())
    }

    /// Lazy event stream over the rest of the run.
    ///
    /// Dropping the iterator leaves the engine where it stopped; calling
    /// `events` again continues from there.
    pub fn events(&mut self) -> EngineEvents<'_> {
        EngineEvents { engine: self }
    }

    /// Run to completion without stepping.
    pub fn run(&mut self) -> Result<RunOutcome> {
        if self.state == EngineState::Idle {
            self.start()?;
        }
        for _ in self.events() {}
        Ok(self.snapshot())
    }

    /// Stop the run and return its `RunFinished` event.
    ///
    /// Returns `None` if the run had already finished. Undelivered events of
    /// the last pass are discarded.
    pub fn cancel(&mut self) -> Option<EngineEvent> {
        if self.state.is_terminal() {
            return None;
        }
        self.pending.clear();
        Some(self.finish(EngineState::Cancelled))
    }

    /// Handle for cancelling the run from outside the engine's thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// Tour length tracked through swap deltas.
    pub fn current_length(&self) -> f64 {
        self.current_length
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    /// The final result, once the run is over.
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.state.is_terminal().then(|| self.snapshot())
    }

    fn begin(&mut self) {
        info!(
            "starting 2-opt on {} cities, initial length {:.2}, policy {:?}",
            self.tour.len(),
            self.current_length,
            self.policy
        );
        self.state = EngineState::Running;
        self.started_at = Some(Instant::now());
    }

    /// One pass of a running engine.
    fn advance(&mut self) -> Vec<EngineEvent> {
        if self.cancel.is_cancelled() {
            return vec![self.finish(EngineState::Cancelled)];
        }

        if self.statistics.iterations >= self.max_passes {
            warn!(
                "stopping after {} passes without convergence",
                self.statistics.iterations
            );
            self.statistics.capped = true;
            return vec![self.finish(EngineState::Converged)];
        }

        self.statistics.iterations += 1;
        trace!("pass {}", self.statistics.iterations);

        match self.find_move() {
            Some(mv) => {
                let swap = self.apply_move(mv);
                vec![
                    EngineEvent::SwapApplied(swap),
                    EngineEvent::PassCompleted { improving: true },
                ]
            }
            None => vec![
                EngineEvent::PassCompleted { improving: false },
                self.finish(EngineState::Converged),
            ],
        }
    }

    fn finish(&mut self, state: EngineState) -> EngineEvent {
        self.state = state;
        self.current_length = self.tour.length(&self.matrix);

        let elapsed = self
            .started_at
            .map(|started| started.elapsed())
            .unwrap_or_default();
        self.statistics.finish(self.current_length, elapsed);

        info!(
            "2-opt {:?} after {} passes and {} swaps: {:.2} -> {:.2} ({:.1}%)",
            state,
            self.statistics.iterations,
            self.statistics.swaps,
            self.statistics.initial_length,
            self.statistics.final_length,
            self.statistics.improvement_percent
        );

        EngineEvent::RunFinished {
            final_tour: self.tour.clone(),
            statistics: self.statistics.clone(),
        }
    }

    fn snapshot(&self) -> RunOutcome {
        RunOutcome {
            tour: self.tour.clone(),
            length: self.current_length,
            state: self.state,
            statistics: self.statistics.clone(),
        }
    }
}

/// Iterator returned by [`TwoOptEngine::events`].
pub struct EngineEvents<'a> {
    engine: &'a mut TwoOptEngine,
}

impl Iterator for EngineEvents<'_> {
    type Item = EngineEvent;

    fn next(&mut self) -> Option<EngineEvent> {
        let engine = &mut *self.engine;
        if engine.pending.is_empty() {
            match engine.state {
                EngineState::Idle => engine.begin(),
                EngineState::Running => {}
                EngineState::Converged | EngineState::Cancelled => return None,
            }
            let events = engine.advance();
            engine.pending.extend(events);
        }
        engine.pending.pop_front()
    }
}
