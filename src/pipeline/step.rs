//! Step trait and the steps wrapping each preprocessing operation.

use super::data::WorkingSet;
use crate::dataset::DataFrame;
use crate::model::{RidgeConfig, RidgeRegressor};
use crate::preprocessing::encoding::{encode_selected, ColumnSelection, EncodingStrategy};
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::imputation::{impute_pair, IterativeImputer, IterativeImputerConfig};
use crate::preprocessing::missing::{MissingDataSimulator, SimulatorConfig};

/// One named operation over a [`WorkingSet`].
///
/// This is the trait object interface a driver sees: every step declares the
/// names it reads and writes, and carries all of its parameters.
pub trait Step {
    /// Get the step name for logging.
    fn name(&self) -> &'static str;

    /// Names read from the working set.
    fn inputs(&self) -> Vec<&str>;

    /// Names written to the working set.
    fn outputs(&self) -> Vec<&str>;

    /// Run the step, replacing its outputs in `ws`.
    fn run(&self, ws: &mut WorkingSet) -> Result<()>;
}

/// Nulls cells of one frame with [`MissingDataSimulator`].
#[derive(Clone, Debug)]
pub struct SimulateMissingStep {
    input: String,
    output: String,
    simulator: MissingDataSimulator,
}

impl SimulateMissingStep {
    pub fn new(input: impl Into<String>, output: impl Into<String>, chance: f64) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            simulator: MissingDataSimulator::new(chance),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.simulator = self.simulator.with_seed(seed);
        self
    }

    pub fn with_config(mut self, config: SimulatorConfig) -> Self {
        self.simulator = MissingDataSimulator::from_config(config);
        self
    }
}

impl Step for SimulateMissingStep {
    fn name(&self) -> &'static str {
        "simulate_missing"
    }

    fn inputs(&self) -> Vec<&str> {
        vec![self.input.as_str()]
    }

    fn outputs(&self) -> Vec<&str> {
        vec![self.output.as_str()]
    }

    fn run(&self, ws: &mut WorkingSet) -> Result<()> {
        let corrupted = self.simulator.simulate(ws.frame(&self.input)?)?;
        ws.insert(self.output.clone(), corrupted);
        Ok(())
    }
}

/// Encodes categorical columns with one strategy per column.
#[derive(Clone, Debug)]
pub struct EncodeStep {
    input: String,
    output: String,
    encoders: String,
    columns: ColumnSelection,
    strategies: Vec<EncodingStrategy>,
}

impl EncodeStep {
    /// Encode every categorical column of `input`; the registry is written
    /// under `"encoders"`.
    pub fn new(
        input: impl Into<String>,
        output: impl Into<String>,
        strategies: Vec<EncodingStrategy>,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            encoders: "encoders".to_string(),
            columns: ColumnSelection::Categorical,
            strategies,
        }
    }

    pub fn with_columns(mut self, columns: ColumnSelection) -> Self {
        self.columns = columns;
        self
    }

    /// Set the name the encoder registry is written under.
    pub fn with_encoders_output(mut self, name: impl Into<String>) -> Self {
        self.encoders = name.into();
        self
    }
}

impl Step for EncodeStep {
    fn name(&self) -> &'static str {
        "encode"
    }

    fn inputs(&self) -> Vec<&str> {
        vec![self.input.as_str()]
    }

    fn outputs(&self) -> Vec<&str> {
        vec![self.output.as_str(), self.encoders.as_str()]
    }

    fn run(&self, ws: &mut WorkingSet) -> Result<()> {
        let (encoded, encoders) =
            encode_selected(ws.frame(&self.input)?, &self.columns, &self.strategies)?;
        ws.insert(self.output.clone(), encoded);
        ws.insert(self.encoders.clone(), encoders);
        Ok(())
    }
}

/// Head/tail split of one frame, optionally separating a target column.
#[derive(Clone, Debug)]
pub struct SplitStep {
    input: String,
    train: String,
    test: String,
    train_ratio: f64,
    target: Option<String>,
}

impl SplitStep {
    /// Split `input` into `"x_train"` and `"x_test"`.
    pub fn new(input: impl Into<String>, train_ratio: f64) -> Self {
        Self {
            input: input.into(),
            train: "x_train".to_string(),
            test: "x_test".to_string(),
            train_ratio,
            target: None,
        }
    }

    pub fn with_outputs(mut self, train: impl Into<String>, test: impl Into<String>) -> Self {
        self.train = train.into();
        self.test = test.into();
        self
    }

    /// Move `column` out of the features into `"y_train"` / `"y_test"`.
    pub fn with_target(mut self, column: impl Into<String>) -> Self {
        self.target = Some(column.into());
        self
    }
}

impl Step for SplitStep {
    fn name(&self) -> &'static str {
        "split"
    }

    fn inputs(&self) -> Vec<&str> {
        vec![self.input.as_str()]
    }

    fn outputs(&self) -> Vec<&str> {
        let mut out = vec![self.train.as_str(), self.test.as_str()];
        if self.target.is_some() {
            out.extend(["y_train", "y_test"]);
        }
        out
    }

    fn run(&self, ws: &mut WorkingSet) -> Result<()> {
        if !(0.0..=1.0).contains(&self.train_ratio) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "train_ratio must be in [0, 1], got {}",
                self.train_ratio
            )));
        }
        let mut features = ws.frame(&self.input)?.clone();
        let target = match &self.target {
            Some(column) => Some(DataFrame::from_columns(vec![
                features.drop_column(column)?
            ])?),
            None => None,
        };

        let (x_train, x_test) = features.split(self.train_ratio)?;
        if let Some(target) = target {
            let (y_train, y_test) = target.split(self.train_ratio)?;
            ws.insert("y_train", y_train);
            ws.insert("y_test", y_test);
        }
        ws.insert(self.train.clone(), x_train);
        ws.insert(self.test.clone(), x_test);
        Ok(())
    }
}

/// Fits one iterative imputer on the train frame and imputes train and test.
#[derive(Clone, Debug)]
pub struct ImputeStep {
    train: String,
    test: String,
    imputer: IterativeImputer<RidgeRegressor>,
}

impl ImputeStep {
    /// Impute `train` and `test` in place with a default imputer.
    pub fn new(train: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            train: train.into(),
            test: test.into(),
            imputer: IterativeImputer::new(),
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.imputer = self.imputer.with_max_iter(max_iter);
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.imputer = self.imputer.with_tol(tol);
        self
    }

    /// Replace every imputer and estimator parameter at once.
    pub fn with_config(mut self, imputer: IterativeImputerConfig, ridge: RidgeConfig) -> Self {
        self.imputer = IterativeImputer::from_config(RidgeRegressor::from_config(ridge), imputer);
        self
    }
}

impl Step for ImputeStep {
    fn name(&self) -> &'static str {
        "impute"
    }

    fn inputs(&self) -> Vec<&str> {
        vec![self.train.as_str(), self.test.as_str()]
    }

    fn outputs(&self) -> Vec<&str> {
        vec![self.train.as_str(), self.test.as_str()]
    }

    fn run(&self, ws: &mut WorkingSet) -> Result<()> {
        let (train, test) = impute_pair(
            &self.imputer,
            ws.frame(&self.train)?,
            ws.frame(&self.test)?,
        )?;
        ws.insert(self.train.clone(), train);
        ws.insert(self.test.clone(), test);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, ColumnType};

    fn mushrooms() -> DataFrame {
        let n = 20;
        DataFrame::from_columns(vec![
            Column::categorical("class", (0..n).map(|i| if i % 3 == 0 { "p" } else { "e" })),
            Column::categorical("odor", (0..n).map(|i| ["a", "l", "n"][i % 3])),
            Column::numeric("width", (0..n).map(|i| i as f64)),
        ])
        .unwrap()
    }

    #[test]
    fn test_encode_step_writes_frame_and_registry() {
        let mut ws = WorkingSet::new().with("data", mushrooms());
        let step = EncodeStep::new(
            "data",
            "encoded",
            vec![EncodingStrategy::Ordinal, EncodingStrategy::OneHot],
        );
        step.run(&mut ws).unwrap();

        let encoded = ws.frame("encoded").unwrap();
        assert!(encoded
            .columns()
            .iter()
            .all(|c| c.dtype() == ColumnType::Numeric));
        assert_eq!(ws.encoders("encoders").unwrap().len(), 2);
        assert_eq!(step.outputs(), vec!["encoded", "encoders"]);
    }

    #[test]
    fn test_simulate_step_respects_seed() {
        let mut ws = WorkingSet::new().with("data", mushrooms());
        SimulateMissingStep::new("data", "a", 0.3).run(&mut ws).unwrap();
        SimulateMissingStep::new("data", "b", 0.3).run(&mut ws).unwrap();
        SimulateMissingStep::new("data", "c", 0.3)
            .with_seed(1)
            .run(&mut ws)
            .unwrap();
        assert_eq!(ws.frame("a").unwrap(), ws.frame("b").unwrap());
        assert_ne!(ws.frame("a").unwrap(), ws.frame("c").unwrap());
    }

    #[test]
    fn test_split_step_with_target() {
        let mut ws = WorkingSet::new().with("data", mushrooms());
        let step = SplitStep::new("data", 0.75).with_target("class");
        step.run(&mut ws).unwrap();

        assert_eq!(ws.frame("x_train").unwrap().shape(), (15, 2));
        assert_eq!(ws.frame("x_test").unwrap().shape(), (5, 2));
        assert_eq!(ws.frame("y_train").unwrap().column_names(), vec!["class"]);
        assert_eq!(ws.frame("y_test").unwrap().n_rows(), 5);
    }

    #[test]
    fn test_split_step_invalid_ratio() {
        let mut ws = WorkingSet::new().with("data", mushrooms());
        assert!(matches!(
            SplitStep::new("data", 1.5).run(&mut ws),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_impute_step_fills_both_partitions() {
        let numeric = DataFrame::from_columns(vec![
            Column::numeric("a", (0..20).map(|i| i as f64)),
            Column::numeric("b", (0..20).map(|i| 3.0 * i as f64)),
        ])
        .unwrap();
        let mut ws = WorkingSet::new().with("data", numeric);
        SplitStep::new("data", 0.5).run(&mut ws).unwrap();
        SimulateMissingStep::new("x_train", "x_train", 0.2)
            .run(&mut ws)
            .unwrap();
        SimulateMissingStep::new("x_test", "x_test", 0.2)
            .run(&mut ws)
            .unwrap();

        ImputeStep::new("x_train", "x_test")
            .with_max_iter(5)
            .run(&mut ws)
            .unwrap();
        assert_eq!(ws.frame("x_train").unwrap().missing_count(), 0);
        assert_eq!(ws.frame("x_test").unwrap().missing_count(), 0);
    }

    #[test]
    fn test_step_missing_input() {
        let mut ws = WorkingSet::new();
        assert!(matches!(
            ImputeStep::new("x_train", "x_test").run(&mut ws),
            Err(PreprocessingError::MissingInput(_))
        ));
    }
}
