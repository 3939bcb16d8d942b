//! Reproducible synthetic missingness.
//!
//! Every cell of a copy of the input is visited in row-major order and
//! replaced by the missing marker with independent probability `chance`.
//! The generator is always seeded explicitly, so a given
//! `(seed, input, chance)` produces the same output on every run.
//!
//! # Example
//! ```ignore
//! use tabprep::preprocessing::MissingDataSimulator;
//!
//! let corrupted = MissingDataSimulator::new(0.2).simulate(&data)?;
//! assert_eq!(corrupted.shape(), data.shape());
//! ```

use crate::dataset::{Cell, DataFrame};
use crate::preprocessing::error::{PreprocessingError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Configuration for MissingDataSimulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Per-cell probability of being nulled, in `[0, 1]`.
    pub chance: f64,
    /// Generator seed.
    pub seed: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            chance: 0.1,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulatorConfig {
    /// Check that `chance` is a probability.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.chance) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "chance must be in [0, 1], got {}",
                self.chance
            )));
        }
        Ok(())
    }
}

/// Injects missing values into a copy of a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MissingDataSimulator {
    config: SimulatorConfig,
}

impl MissingDataSimulator {
    /// Create a simulator with the given chance and [`DEFAULT_SEED`].
    pub fn new(chance: f64) -> Self {
        Self {
            config: SimulatorConfig {
                chance,
                seed: DEFAULT_SEED,
            },
        }
    }

    pub fn from_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Set the generator seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Row-major mask of the cells that would be nulled in a frame of this shape.
    ///
    /// `mask[row][col]` is `true` for a nulled cell. [`simulate`] applies
    /// exactly this mask.
    ///
    /// [`simulate`]: MissingDataSimulator::simulate
    pub fn mask(&self, rows: usize, cols: usize) -> Result<Vec<Vec<bool>>> {
        self.config.validate()?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        Ok((0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| rng.gen::<f64>() < self.config.chance)
                    .collect()
            })
            .collect())
    }

    /// Return a copy of `data` with cells nulled according to [`mask`].
    ///
    /// The input is left untouched. Cells already missing still consume a
    /// draw, so the pattern depends only on shape, seed and chance.
    ///
    /// # Errors
    /// [`PreprocessingError::InvalidParameter`] if `chance` is outside `[0, 1]`.
    ///
    /// [`mask`]: MissingDataSimulator::mask
    pub fn simulate(&self, data: &DataFrame) -> Result<DataFrame> {
        let (rows, cols) = data.shape();
        let mask = self.mask(rows, cols)?;
        let mut out = data.clone();
        let mut nulled = 0usize;

        for (row, flags) in mask.iter().enumerate() {
            for (col, &hit) in flags.iter().enumerate() {
                if hit {
                    if let Some(cell) = out.cell_mut(row, col) {
                        *cell = Cell::Missing;
                        nulled += 1;
                    }
                }
            }
        }

        tracing::debug!(
            rows,
            cols,
            chance = self.config.chance,
            seed = self.config.seed,
            nulled,
            "Simulated missing data"
        );
        Ok(out)
    }
}

/// Null cells of a copy of `data` with probability `chance`, using [`DEFAULT_SEED`].
pub fn simulate_missing_data(data: &DataFrame, chance: f64) -> Result<DataFrame> {
    MissingDataSimulator::new(chance).simulate(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use proptest::prelude::*;

    fn shapes_and_sizes(rows: usize) -> DataFrame {
        let shapes = ["bell", "conical", "flat", "knobbed"];
        DataFrame::from_columns(vec![
            Column::categorical("shape", (0..rows).map(|i| shapes[i % shapes.len()])),
            Column::numeric("size", (0..rows).map(|i| i as f64 * 0.5)),
        ])
        .unwrap()
    }

    #[test]
    fn test_simulate_chance_zero_is_identity() {
        let df = shapes_and_sizes(100);
        let out = simulate_missing_data(&df, 0.0).unwrap();
        assert_eq!(out, df);
    }

    #[test]
    fn test_simulate_chance_one_nulls_everything() {
        let df = shapes_and_sizes(100);
        let out = simulate_missing_data(&df, 1.0).unwrap();
        assert_eq!(out.missing_count(), 200);
        assert_eq!(out.column_names(), df.column_names());
    }

    #[test]
    fn test_simulate_is_deterministic() {
        let df = shapes_and_sizes(50);
        let a = simulate_missing_data(&df, 0.3).unwrap();
        let b = simulate_missing_data(&df, 0.3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_simulate_seed_changes_pattern() {
        let df = shapes_and_sizes(200);
        let a = MissingDataSimulator::new(0.5).simulate(&df).unwrap();
        let b = MissingDataSimulator::new(0.5)
            .with_seed(7)
            .simulate(&df)
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_simulate_does_not_mutate_input() {
        let df = shapes_and_sizes(20);
        let before = df.clone();
        let _ = simulate_missing_data(&df, 0.7).unwrap();
        assert_eq!(df, before);
    }

    #[test]
    fn test_simulate_rate_is_close_to_chance() {
        let df = shapes_and_sizes(5000);
        let out = simulate_missing_data(&df, 0.25).unwrap();
        let rate = out.missing_count() as f64 / 10000.0;
        assert!((rate - 0.25).abs() < 0.03, "rate = {}", rate);
    }

    #[test]
    fn test_simulate_matches_mask() {
        let df = shapes_and_sizes(30);
        let sim = MissingDataSimulator::new(0.4);
        let mask = sim.mask(30, 2).unwrap();
        let out = sim.simulate(&df).unwrap();
        for (row, flags) in mask.iter().enumerate() {
            for (col, &hit) in flags.iter().enumerate() {
                let cell = out.get(row, col).unwrap();
                if hit {
                    assert!(cell.is_missing());
                } else {
                    assert_eq!(cell, df.get(row, col).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_simulate_rejects_invalid_chance() {
        let df = shapes_and_sizes(3);
        for chance in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                simulate_missing_data(&df, chance),
                Err(PreprocessingError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_simulate_empty_frame() {
        let out = simulate_missing_data(&DataFrame::new(), 0.5).unwrap();
        assert!(out.is_empty());
    }

    proptest! {
        #[test]
        fn prop_simulate_reproducible_and_pure(rows in 0usize..40, chance in 0.0f64..=1.0, seed in any::<u64>()) {
            let df = shapes_and_sizes(rows);
            let before = df.clone();
            let sim = MissingDataSimulator::new(chance).with_seed(seed);
            let a = sim.simulate(&df).unwrap();
            let b = sim.simulate(&df).unwrap();
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(&df, &before);
            prop_assert!(a.missing_count() <= rows * 2);
        }
    }
}
