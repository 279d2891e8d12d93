//! Dataset registry
//!
//! This module provides the descriptor type for curated sample datasets and
//! an ordered, immutable registry keyed by short string identifiers.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::SampleDataError;

/// Column type tokens understood by the CSV loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// 32-bit signed integer column
    #[serde(rename = "int")]
    Int,
    /// 64-bit floating point column
    #[serde(rename = "double")]
    Double,
    /// UTF-8 string column
    #[serde(rename = "string")]
    Str,
}

impl ColumnType {
    /// Map a loose type token to a column type.
    ///
    /// Unrecognized tokens fall back to `Str`, matching the loader's
    /// behavior of treating anything it cannot type as text.
    pub fn from_token(token: &str) -> Self {
        match token {
            "int" => ColumnType::Int,
            "double" => ColumnType::Double,
            _ => ColumnType::Str,
        }
    }
}

/// Descriptor for a single downloadable sample dataset
///
/// Descriptors are defined once at registry construction and never mutated.
/// `schema`, when present, enumerates every CSV column in file order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDef {
    /// Short identifier, unique within a registry
    pub id: String,
    /// Human-readable dataset name
    pub display_name: String,
    /// Source location, used as-is for the HTTP GET
    pub url: String,
    /// Subject area, for display only
    pub topic: String,
    /// Publishing organization, for display only
    pub publisher: String,
    /// Explicit column schema; `None` means the loader infers types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Vec<(String, ColumnType)>>,
}

/// Ordered collection of dataset descriptors
///
/// Lookup is by id; listing preserves insertion order for display.
/// There are no mutation operations after construction.
#[derive(Debug, Clone)]
pub struct Registry {
    defs: Vec<DatasetDef>,
}

impl Registry {
    /// Build a registry from descriptors, rejecting duplicate ids
    pub fn new(defs: Vec<DatasetDef>) -> Result<Self> {
        for (i, def) in defs.iter().enumerate() {
            if defs[..i].iter().any(|d| d.id == def.id) {
                return Err(SampleDataError::DuplicateDataset(def.id.clone()));
            }
        }
        Ok(Self { defs })
    }

    /// Look up a descriptor by id
    pub fn get(&self, id: &str) -> Option<&DatasetDef> {
        self.defs.iter().find(|d| d.id == id)
    }

    /// All descriptors in insertion order
    pub fn list(&self) -> &[DatasetDef] {
        &self.defs
    }

    /// Number of registered datasets
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// True if the registry holds no datasets
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// The stock registry of curated sample datasets
    pub fn builtin() -> Self {
        let defs = vec![
            DatasetDef {
                id: "1".to_string(),
                display_name: "Car performance data".to_string(),
                url: "https://apsportal.ibm.com/exchange-api/v1/entries/c81e9be8daf6941023b9dc86f303053b/data?accessKey=21818d62c8eee8fb329cc401ea263033".to_string(),
                topic: "transportation".to_string(),
                publisher: "IBM".to_string(),
                schema: Some(vec![
                    ("mpg".to_string(), ColumnType::Int),
                    ("cylinders".to_string(), ColumnType::Int),
                    ("engine".to_string(), ColumnType::Double),
                    ("horsepower".to_string(), ColumnType::Int),
                    ("weight".to_string(), ColumnType::Int),
                    ("acceleration".to_string(), ColumnType::Double),
                    ("year".to_string(), ColumnType::Int),
                    ("origin".to_string(), ColumnType::Str),
                    ("name".to_string(), ColumnType::Str),
                ]),
            },
            DatasetDef {
                id: "2".to_string(),
                display_name: "Airbnb Data for Analytics: Washington D.C. Listings".to_string(),
                url: "https://apsportal.ibm.com/exchange-api/v1/entries/c3af8034bd7f7374f87b3df6420865d5/data?accessKey=693121eff3eb97c917c5ac9987ee3095".to_string(),
                topic: "Economy & Business".to_string(),
                publisher: "IBM Cloud Data Services".to_string(),
                schema: None,
            },
        ];

        // The builtin ids are distinct by inspection
        Self { defs }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
