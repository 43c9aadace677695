//! Command interface between a presentation layer and the solver core.
//!
//! A [`Session`] owns the editable city set and the configuration. Starting a
//! run snapshots the cities into a fresh [`DistanceMatrix`] and hands it to a
//! new [`TwoOptEngine`]; the city set cannot change while that run is active.

use log::{debug, info};

use crate::config::Config;
use crate::construction::{BuilderMethod, TourBuilder};
use crate::error::{Error, Result};
use crate::local_search::{EngineEvent, EngineState, RunOutcome, TwoOptEngine};
use crate::problem::{City, CitySet, DistanceMatrix};

#[derive(Default)]
pub struct Session {
    cities: CitySet,
    config: Config,
    engine: Option<TwoOptEngine>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Session {
            cities: CitySet::new(),
            config,
            engine: None,
        }
    }

    pub fn with_cities(cities: CitySet, config: Config) -> Self {
        Session {
            cities,
            config,
            engine: None,
        }
    }

    /// Add a city and return its index.
    pub fn add_city(&mut self, name: impl Into<String>, x: f64, y: f64) -> Result<usize> {
        self.ensure_editable()?;
        let index = self.cities.add_city(name, x, y);
        self.engine = None;
        debug!("added city {index} at ({x}, {y})");
        Ok(index)
    }

    /// Remove the city at `index`. Later indices shift down by one.
    pub fn remove_city(&mut self, index: usize) -> Result<City> {
        self.ensure_editable()?;
        let city = self.cities.remove_city(index)?;
        self.engine = None;
        debug!("removed city {index} ({})", city.name);
        Ok(city)
    }

    /// Replace the city set with the built-in reference set.
    pub fn load_sample_set(&mut self) -> Result<()> {
        self.ensure_editable()?;
        self.cities.replace(CitySet::sample());
        self.engine = None;
        info!("loaded {} sample cities", self.cities.len());
        Ok(())
    }

    pub fn set_builder_method(&mut self, method: BuilderMethod) -> Result<()> {
        self.ensure_editable()?;
        self.config.builder = method;
        Ok(())
    }

    /// Build the initial tour and start a new run.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(Error::AlreadyRunning);
        }
        if self.cities.len() < 2 {
            return Err(Error::invalid_input(format!(
                "a tour needs at least 2 cities, have {}",
                self.cities.len()
            )));
        }

        let matrix = DistanceMatrix::from_city_set(&self.cities)?;
        let tour = self.config.builder.build_initial_tour(&matrix)?;
        info!(
            "built {} initial tour over {} cities",
            self.config.builder.name(),
            tour.len()
        );

        let mut engine = TwoOptEngine::new(matrix, tour, &self.config)?;
        engine.start()?;
        self.engine = Some(engine);
        Ok(())
    }

    /// Run one pass of the active run.
    pub fn step(&mut self) -> Result<Vec<EngineEvent>> {
        self.engine.as_mut().ok_or(Error::NotRunning)?.step()
    }

    /// Start a run if none is active and drive it to completion.
    pub fn run(&mut self) -> Result<RunOutcome> {
        if !self.is_running() {
            self.start()?;
        }
        self.engine.as_mut().ok_or(Error::NotRunning)?.run()
    }

    /// Cancel the active run, returning its `RunFinished` event.
    pub fn cancel(&mut self) -> Result<Option<EngineEvent>> {
        Ok(self.engine.as_mut().ok_or(Error::NotRunning)?.cancel())
    }

    /// State of the latest run, `Idle` if none was started.
    pub fn state(&self) -> EngineState {
        self.engine
            .as_ref()
            .map_or(EngineState::Idle, TwoOptEngine::state)
    }

    pub fn is_running(&self) -> bool {
        self.state() == EngineState::Running
    }

    pub fn cities(&self) -> &CitySet {
        &self.cities
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> Option<&TwoOptEngine> {
        self.engine.as_ref()
    }

    /// Result of the latest finished run, until the city set changes.
    pub fn last_outcome(&self) -> Option<RunOutcome> {
        self.engine.as_ref().and_then(TwoOptEngine::outcome)
    }

    /// City edits are rejected during a run. A successful edit drops any
    /// finished run, whose matrix snapshot no longer matches the city set.
    fn ensure_editable(&self) -> Result<()> {
        if self.is_running() {
            return Err(Error::AlreadyRunning);
        }
        Ok(())
    }
}
