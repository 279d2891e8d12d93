//! Samplesets: curated sample datasets as typed polars DataFrames
//!
//! This crate is notebook-style glue: it keeps a small registry of dataset
//! descriptors, downloads a chosen dataset over HTTP to a temporary file
//! while reporting progress to a pluggable front end, and loads the result
//! through the polars CSV engine as a typed, schema-aware DataFrame.
//!
//! ```no_run
//! use samplesets::SampleData;
//!
//! # fn main() -> samplesets::Result<()> {
//! let sample_data = SampleData::new();
//!
//! // No id: show the dataset list
//! sample_data.sample_data(None)?;
//!
//! // Download dataset "1" and get a DataFrame back
//! if let Some(df) = sample_data.sample_data(Some("1"))? {
//!     println!("{}", df);
//! }
//! # Ok(())
//! # }
//! ```

use polars::prelude::DataFrame;
use thiserror::Error;

pub mod display;
pub mod download;
pub mod load;
pub mod registry;

// Re-export commonly used types
pub use display::{dataset_list_html, ConsolePresenter, JsonLinePresenter, Presenter, ProgressEvent};
pub use download::{Fetcher, HttpFetcher};
pub use load::{CsvLoader, CsvSchema};
pub use registry::{ColumnType, DatasetDef, Registry};

/// Main error type for the samplesets library
#[derive(Debug, Error)]
pub enum SampleDataError {
    /// The requested id is not in the registry
    #[error("Unknown sample data identifier: {0}")]
    UnknownDataset(String),

    /// Two registry entries share an id
    #[error("Duplicate dataset id in registry: {0}")]
    DuplicateDataset(String),

    /// The GET could not be established or the stream failed mid-read
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The engine could not parse the downloaded file
    #[error("Load error: {0}")]
    LoadError(#[from] polars::error::PolarsError),

    /// Local file error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for samplesets operations
pub type Result<T> = std::result::Result<T, SampleDataError>;

/// Entry point: ties the registry, fetcher, loader, and front end together
pub struct SampleData {
    registry: Registry,
    presenter: Box<dyn Presenter>,
    fetcher: Box<dyn Fetcher>,
    loader: CsvLoader,
}

impl SampleData {
    /// Builtin registry, console front end, HTTP fetcher
    pub fn new() -> Self {
        Self::with_registry(Registry::builtin())
    }

    /// Use a custom registry with the default collaborators
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            presenter: Box::new(ConsolePresenter::new()),
            fetcher: Box::new(HttpFetcher::new()),
            loader: CsvLoader::new(),
        }
    }

    /// Substitute the presentation front end
    pub fn with_presenter(mut self, presenter: Box<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    /// Substitute the fetcher
    pub fn with_fetcher(mut self, fetcher: Box<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// The registry in use
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Interactive entry point.
    ///
    /// With no id, renders the dataset list and returns `Ok(None)`. With an
    /// unknown id, reports it, renders the list, and returns `Ok(None)`
    /// without touching the network. With a known id, downloads and loads
    /// the dataset.
    pub fn sample_data(&self, id: Option<&str>) -> Result<Option<DataFrame>> {
        let id = match id {
            None => {
                self.render_list();
                return Ok(None);
            }
            Some(id) => id,
        };

        match self.load_dataset(id) {
            Err(SampleDataError::UnknownDataset(_)) => {
                self.presenter.status(
                    "Unknown sample data identifier. Please choose an id from the list below",
                );
                self.render_list();
                Ok(None)
            }
            other => other.map(Some),
        }
    }

    /// Strict entry point: an unknown id is an error, not a list redisplay.
    pub fn load_dataset(&self, id: &str) -> Result<DataFrame> {
        let def = self
            .registry
            .get(id)
            .ok_or_else(|| SampleDataError::UnknownDataset(id.to_string()))?;

        // The temp file handle is held until after the load, then dropped,
        // which deletes the file on success and failure alike.
        let file = self.fetcher.fetch(def, self.presenter.as_ref())?;

        self.presenter.status(&format!(
            "Creating DataFrame for '{}'. Please wait...",
            def.display_name
        ));
        let schema = CsvSchema::from_columns(def.schema.as_deref());
        let df = self.loader.load(file.path(), &schema)?;

        self.presenter.status(&format!(
            "Successfully created DataFrame for '{}'",
            def.display_name
        ));
        Ok(df)
    }

    fn render_list(&self) {
        self.presenter
            .render(&dataset_list_html(self.registry.list()));
    }
}

impl Default for SampleData {
    fn default() -> Self {
        Self::new()
    }
}
