//! Session state: canonical, working and analysis datasets plus the view.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::{self, AggregateFunction, DEFAULT_TRANSPOSE_LIMIT};
use crate::error::{Result, TablewrightError};
use crate::export::{ExportFormat, Exporter};
use crate::formula::{self, Formula};
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::model::Dataset;
use crate::ops::{self, FilterOperator, ID_COLUMN, UNIQUE_KEY_COLUMN};

/// Which dataset is active for rendering and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// The working dataset.
    #[default]
    Main,
    /// The latest analysis dataset.
    Analysis,
}

impl FromStr for View {
    type Err = TablewrightError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "main" | "working" => Ok(View::Main),
            "analysis" => Ok(View::Analysis),
            _ => Err(TablewrightError::UnknownView(s.to_string())),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Main => f.write_str("main"),
            View::Analysis => f.write_str("analysis"),
        }
    }
}

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Parser used by [`Session::load_file`].
    pub parser: ParserConfig,
    /// Maximum number of rows pivoted by [`Session::transpose`].
    pub transpose_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            transpose_limit: DEFAULT_TRANSPOSE_LIMIT,
        }
    }
}

/// What an operation did, for user feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationOutcome {
    /// Human-readable description.
    pub description: String,
    /// View active after the operation.
    pub view: View,
    /// Rows of the dataset the operation read.
    pub rows_before: usize,
    /// Rows of the dataset the operation produced.
    pub rows_after: usize,
    /// Columns the operation added.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns_added: Vec<String>,
    /// Rows removed as duplicates.
    #[serde(default)]
    pub removed: usize,
    /// Rows whose formula evaluation failed.
    #[serde(default)]
    pub faults: usize,
}

impl OperationOutcome {
    fn new(description: String, view: View, rows_before: usize, rows_after: usize) -> Self {
        Self {
            description,
            view,
            rows_before,
            rows_after,
            columns_added: Vec::new(),
            removed: 0,
            faults: 0,
        }
    }
}

/// An interactive transformation session.
///
/// Row-level operations replace the working dataset; analysis operations
/// replace the analysis dataset. The canonical dataset captured by the last
/// load is never modified and is the source for [`Session::reset_to_main`].
/// A failed operation leaves every dataset untouched.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
    canonical: Option<Dataset>,
    working: Dataset,
    analysis: Dataset,
    view: View,
    source: Option<SourceMetadata>,
}

impl Session {
    /// Create an empty session with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session with custom configuration.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace all datasets with `data`.
    pub fn load(&mut self, data: impl Into<Dataset>) -> OperationOutcome {
        let data = data.into();
        let rows = data.len();

        self.working = data.clone();
        self.canonical = Some(data);
        self.analysis = Dataset::new();
        self.view = View::Main;
        self.source = None;

        tracing::debug!(rows, "session loaded");
        OperationOutcome::new(format!("Loaded {} rows", rows), View::Main, 0, rows)
    }

    /// Load a CSV/TSV/JSON/XLSX file, replacing all datasets.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<OperationOutcome> {
        let (data, source) = Parser::with_config(self.config.parser.clone()).parse_file(path)?;
        let mut outcome = self.load(data);
        outcome.description = format!("Loaded {} rows from '{}'", outcome.rows_after, source.file);
        self.source = Some(source);
        Ok(outcome)
    }

    /// Whether a dataset has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.canonical.is_some()
    }

    /// Metadata of the loaded file, if the data came from one.
    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }

    /// The snapshot captured at load time.
    pub fn canonical(&self) -> Option<&Dataset> {
        self.canonical.as_ref()
    }

    pub fn working(&self) -> &Dataset {
        &self.working
    }

    pub fn analysis(&self) -> &Dataset {
        &self.analysis
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Headers of the working dataset.
    pub fn headers(&self) -> Vec<String> {
        self.working.headers()
    }

    /// The dataset selected by the current view.
    pub fn active(&self) -> &Dataset {
        match self.view {
            View::Main => &self.working,
            View::Analysis => &self.analysis,
        }
    }

    /// Headers of the active dataset.
    pub fn active_headers(&self) -> Vec<String> {
        self.active().headers()
    }

    fn ensure_loaded(&self) -> Result<()> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(TablewrightError::NotLoaded)
        }
    }

    fn replace_working(&mut self, data: Dataset, description: String) -> OperationOutcome {
        let outcome = OperationOutcome::new(description, View::Main, self.working.len(), data.len());
        tracing::debug!(
            operation = %outcome.description,
            rows_before = outcome.rows_before,
            rows_after = outcome.rows_after,
            "working dataset replaced"
        );
        self.working = data;
        self.view = View::Main;
        outcome
    }

    fn replace_analysis(&mut self, data: Dataset, description: String) -> OperationOutcome {
        let outcome = OperationOutcome::new(description, View::Analysis, self.working.len(), data.len());
        tracing::debug!(
            operation = %outcome.description,
            rows = outcome.rows_after,
            "analysis dataset replaced"
        );
        self.analysis = data;
        self.view = View::Analysis;
        outcome
    }

    /// Restore the working dataset from the canonical snapshot.
    pub fn reset_to_main(&mut self) -> Result<OperationOutcome> {
        let canonical = self.canonical.clone().ok_or(TablewrightError::NotLoaded)?;
        Ok(self.replace_working(canonical, "Reset to loaded data".to_string()))
    }

    /// Keep rows whose `column` matches `value`.
    pub fn filter(
        &mut self,
        column: &str,
        operator: &FilterOperator,
        value: &str,
    ) -> Result<OperationOutcome> {
        self.ensure_loaded()?;
        let data = ops::filter(&self.working, column, operator, value);
        Ok(self.replace_working(
            data,
            format!("Filter '{}' {} '{}'", column, operator, value),
        ))
    }

    /// Sort ascending by `column`.
    pub fn sort(&mut self, column: &str) -> Result<OperationOutcome> {
        self.ensure_loaded()?;
        let data = ops::sort(&self.working, column);
        Ok(self.replace_working(data, format!("Sort by '{}'", column)))
    }

    /// Remove duplicate rows; the outcome carries the removed count.
    pub fn dedupe(&mut self) -> Result<OperationOutcome> {
        self.ensure_loaded()?;
        let (data, removed) = ops::dedupe(&self.working);
        let mut outcome = self.replace_working(data, format!("Removed {} duplicates", removed));
        outcome.removed = removed;
        Ok(outcome)
    }

    /// Append `UniqueKey` and `ID` columns keyed on `columns`.
    pub fn assign_hierarchy(&mut self, columns: &[String]) -> Result<OperationOutcome> {
        self.ensure_loaded()?;
        let data = ops::assign_hierarchy(&self.working, columns)?;
        let mut outcome = self.replace_working(
            data,
            format!("Hierarchy IDs on {}", columns.join(", ")),
        );
        outcome.columns_added = vec![UNIQUE_KEY_COLUMN.to_string(), ID_COLUMN.to_string()];
        Ok(outcome)
    }

    /// Compute `formula` into a new column named `column`.
    pub fn apply_formula(&mut self, formula: &Formula, column: &str) -> Result<OperationOutcome> {
        self.ensure_loaded()?;
        let output = formula::apply_formula(&self.working, formula, column)?;
        let mut outcome = self.replace_working(
            output.data,
            format!("Column '{}' created: {}", output.column, formula),
        );
        outcome.columns_added = vec![output.column];
        outcome.faults = output.faults;
        Ok(outcome)
    }

    /// Group the working dataset and switch to the analysis view.
    pub fn aggregate(
        &mut self,
        group_column: &str,
        value_column: &str,
        function: AggregateFunction,
    ) -> Result<OperationOutcome> {
        self.ensure_loaded()?;
        let data = analysis::aggregate(&self.working, group_column, value_column, function);
        Ok(self.replace_analysis(
            data,
            format!("Analysis: {} of '{}' by '{}'", function, value_column, group_column),
        ))
    }

    /// Distinct values of `column`, shown in the analysis view.
    pub fn extract_unique(&mut self, column: &str) -> Result<OperationOutcome> {
        self.ensure_loaded()?;
        let data = analysis::unique(&self.working, column);
        Ok(self.replace_analysis(data, format!("Unique: '{}'", column)))
    }

    /// Pivot the first rows of the working dataset, shown in the analysis view.
    pub fn transpose(&mut self) -> Result<OperationOutcome> {
        self.ensure_loaded()?;
        let limit = self.working.len().min(self.config.transpose_limit);
        let data = analysis::transpose(&self.working, &self.working.headers(), limit);
        Ok(self.replace_analysis(data, format!("Transpose (first {} rows)", limit)))
    }

    /// Switch the active dataset.
    pub fn set_view(&mut self, view: View) -> Result<OperationOutcome> {
        self.ensure_loaded()?;
        self.view = view;
        let rows = self.active().len();
        Ok(OperationOutcome::new(format!("View: {}", view), view, rows, rows))
    }

    /// Write the active dataset to `path`.
    pub fn export_active(&self, path: impl AsRef<Path>, format: ExportFormat) -> Result<usize> {
        self.ensure_loaded()?;
        Exporter::new(format).write_file(self.active(), path)
    }

    /// Write the active dataset to any writer.
    pub fn export_active_to<W: Write>(&self, writer: W, format: ExportFormat) -> Result<usize> {
        self.ensure_loaded()?;
        Exporter::new(format).write(self.active(), writer)
    }
}
