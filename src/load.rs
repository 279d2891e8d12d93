//! CSV loading
//!
//! This module turns a downloaded file into a typed `DataFrame` via the
//! polars CSV reader. The file is always parsed as headered CSV; column
//! types either come from an explicit schema or are inferred by the engine.

use std::path::Path;
use std::sync::Arc;

use polars::prelude::*;

use crate::registry::ColumnType;
use crate::Result;

/// How the CSV's column types are determined
#[derive(Debug, Clone)]
pub enum CsvSchema {
    /// Let the engine infer a type for every column
    Inferred,
    /// Declare every column, in file order
    Explicit(Vec<(String, ColumnType)>),
}

impl CsvSchema {
    /// Build from a descriptor's optional column list
    pub fn from_columns(columns: Option<&[(String, ColumnType)]>) -> Self {
        match columns {
            Some(columns) => CsvSchema::Explicit(columns.to_vec()),
            None => CsvSchema::Inferred,
        }
    }
}

fn polars_type(ty: ColumnType) -> DataType {
    match ty {
        ColumnType::Int => DataType::Int32,
        ColumnType::Double => DataType::Float64,
        ColumnType::Str => DataType::String,
    }
}

/// Parses downloaded files through the polars CSV engine
pub struct CsvLoader;

impl CsvLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse `path` as headered CSV into a `DataFrame`
    pub fn load(&self, path: &Path, schema: &CsvSchema) -> Result<DataFrame> {
        log::debug!("loading CSV from {}", path.display());

        let options = CsvReadOptions::default().with_has_header(true);
        let options = match schema {
            CsvSchema::Explicit(columns) => {
                let fields = columns
                    .iter()
                    .map(|(name, ty)| Field::new(name, polars_type(*ty)));
                options.with_schema(Some(Arc::new(Schema::from_iter(fields))))
            }
            CsvSchema::Inferred => options,
        };

        let df = options
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        log::debug!("loaded DataFrame with shape {:?}", df.shape());
        Ok(df)
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}
