//! Named-step glue for an external pipeline-tuning driver.
//!
//! A driver holds a [`WorkingSet`] of named values and calls [`Step`]s that
//! read and write those names. Every parameter a driver may want to search
//! over is set on the step itself.
//!
//! # Example
//! ```ignore
//! use tabprep::pipeline::{ImputeStep, SimulateMissingStep, SplitStep, StepPipeline, WorkingSet};
//!
//! let pipeline = StepPipeline::new()
//!     .with_step(SplitStep::new("data", 0.8).with_target("class"))
//!     .with_step(SimulateMissingStep::new("x_train", "x_train", 0.2))
//!     .with_step(SimulateMissingStep::new("x_test", "x_test", 0.2))
//!     .with_step(ImputeStep::new("x_train", "x_test").with_max_iter(2));
//!
//! let mut ws = WorkingSet::new().with("data", encoded);
//! pipeline.run(&mut ws)?;
//! ```

mod data;
mod step;

pub use data::{Value, WorkingSet};
pub use step::{EncodeStep, ImputeStep, SimulateMissingStep, SplitStep, Step};

use crate::config::PreprocessingConfig;
use crate::preprocessing::error::{PreprocessingError, Result};
use std::time::Instant;

/// An ordered list of steps run against one working set.
#[derive(Default)]
pub struct StepPipeline {
    steps: Vec<Box<dyn Step>>,
}

impl StepPipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn with_step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// The mushroom experiment: encode `"data"`, split off `target`, corrupt
    /// both partitions, and impute them, all parameterised by `config`.
    pub fn from_config(config: &PreprocessingConfig, target: &str) -> Result<Self> {
        config.validate()?;
        Ok(Self::new()
            .with_step(
                EncodeStep::new("data", "data", config.encoding.strategies.clone())
                    .with_columns(config.encoding.columns.clone().into()),
            )
            .with_step(SplitStep::new("data", config.train_ratio).with_target(target))
            .with_step(
                SimulateMissingStep::new("x_train", "x_train", 0.0)
                    .with_config(config.simulator.clone()),
            )
            .with_step(
                SimulateMissingStep::new("x_test", "x_test", 0.0)
                    .with_config(config.simulator.clone()),
            )
            .with_step(
                ImputeStep::new("x_train", "x_test")
                    .with_config(config.imputer.clone(), config.ridge.clone()),
            ))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get step names for debugging.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step in order, stopping at the first error.
    ///
    /// Inputs are checked before each step runs, so a wiring mistake is
    /// reported as [`PreprocessingError::MissingInput`] naming the value.
    pub fn run(&self, ws: &mut WorkingSet) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            if let Some(absent) = step.inputs().into_iter().find(|name| !ws.contains(name)) {
                return Err(PreprocessingError::MissingInput(format!(
                    "{} (needed by step {} '{}')",
                    absent,
                    index,
                    step.name()
                )));
            }

            let started = Instant::now();
            step.run(ws).map_err(|e| {
                tracing::error!(step = step.name(), index, error = %e, "Step failed");
                e
            })?;
            tracing::info!(
                step = step.name(),
                index,
                outputs = ?step.outputs(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Step finished"
            );
        }
        Ok(())
    }
}
