//! Replayable step lists, stored as JSON.
//!
//! ```json
//! {
//!   "steps": [
//!     { "op": "filter", "column": "city", "operator": "equals", "value": "Oslo" },
//!     { "op": "formula", "name": "total",
//!       "formula": { "mode": "numeric", "function": "ADD", "column": "a", "second_column": "b" } },
//!     { "op": "aggregate", "group": "region", "value": "total", "function": "SUM" }
//!   ]
//! }
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::AggregateFunction;
use crate::error::{Result, TablewrightError};
use crate::formula::Formula;
use crate::ops::FilterOperator;
use crate::session::{OperationOutcome, Session, View};

/// One session operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Filter {
        column: String,
        operator: FilterOperator,
        #[serde(default)]
        value: String,
    },
    Sort {
        column: String,
    },
    Dedupe,
    Hierarchy {
        columns: Vec<String>,
    },
    Formula {
        name: String,
        formula: Formula,
    },
    Aggregate {
        group: String,
        value: String,
        function: AggregateFunction,
    },
    Unique {
        column: String,
    },
    Transpose,
    Reset,
    View {
        view: View,
    },
}

impl Step {
    /// The `op` tag of this step.
    pub fn name(&self) -> &'static str {
        match self {
            Step::Filter { .. } => "filter",
            Step::Sort { .. } => "sort",
            Step::Dedupe => "dedupe",
            Step::Hierarchy { .. } => "hierarchy",
            Step::Formula { .. } => "formula",
            Step::Aggregate { .. } => "aggregate",
            Step::Unique { .. } => "unique",
            Step::Transpose => "transpose",
            Step::Reset => "reset",
            Step::View { .. } => "view",
        }
    }

    /// Get a human-readable description of the step.
    pub fn description(&self) -> String {
        match self {
            Step::Filter {
                column,
                operator,
                value,
            } => format!("Keep rows where '{}' {} '{}'", column, operator, value),
            Step::Sort { column } => format!("Sort ascending by '{}'", column),
            Step::Dedupe => "Remove duplicate rows".to_string(),
            Step::Hierarchy { columns } => {
                format!("Assign hierarchy IDs on {}", columns.join(" > "))
            }
            Step::Formula { name, formula } => format!("{} = {}", name, formula),
            Step::Aggregate {
                group,
                value,
                function,
            } => format!("{} of '{}' grouped by '{}'", function, value, group),
            Step::Unique { column } => format!("Unique values of '{}'", column),
            Step::Transpose => "Transpose the first rows".to_string(),
            Step::Reset => "Reset to loaded data".to_string(),
            Step::View { view } => format!("Show the {} view", view),
        }
    }
}

/// An ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Parse a pipeline from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a pipeline from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TablewrightError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let pipeline: Pipeline = serde_json::from_reader(BufReader::new(file))?;
        Ok(pipeline)
    }

    /// Save the pipeline as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| TablewrightError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = File::create(path).map_err(io_err)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

impl Session {
    /// Apply a single step.
    pub fn apply(&mut self, step: &Step) -> Result<OperationOutcome> {
        match step {
            Step::Filter {
                column,
                operator,
                value,
            } => self.filter(column, operator, value),
            Step::Sort { column } => self.sort(column),
            Step::Dedupe => self.dedupe(),
            Step::Hierarchy { columns } => self.assign_hierarchy(columns),
            Step::Formula { name, formula } => self.apply_formula(formula, name),
            Step::Aggregate {
                group,
                value,
                function,
            } => self.aggregate(group, value, *function),
            Step::Unique { column } => self.extract_unique(column),
            Step::Transpose => self.transpose(),
            Step::Reset => self.reset_to_main(),
            Step::View { view } => self.set_view(*view),
        }
    }

    /// Apply every step in order, stopping at the first failure.
    ///
    /// Steps before the failing one stay applied. The error carries the
    /// 1-based index of the failing step.
    pub fn run_pipeline(&mut self, pipeline: &Pipeline) -> Result<Vec<OperationOutcome>> {
        let mut outcomes = Vec::with_capacity(pipeline.len());

        for (i, step) in pipeline.steps.iter().enumerate() {
            let outcome = self.apply(step).map_err(|e| TablewrightError::Pipeline {
                step: i + 1,
                op: step.name().to_string(),
                source: Box::new(e),
            })?;
            tracing::info!(step = i + 1, op = step.name(), "{}", outcome.description);
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
