pub mod sample;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;

/// One column of a source or destination table, as the mapping service sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub id: String,
    pub name: String,
    #[serde(rename = "dataType")]
    pub data_type: String,
    #[serde(rename = "isPrimaryKey")]
    pub is_primary_key: bool,
    #[serde(rename = "isNullable")]
    pub is_nullable: bool,
}

impl ColumnDescriptor {
    pub fn new(id: &str, name: &str, data_type: &str, is_primary_key: bool, is_nullable: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_primary_key,
            is_nullable,
        }
    }
}

// Body of POST /predict-mappings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRequest {
    pub source_schema: Vec<ColumnDescriptor>,
    pub destination_schema: Vec<ColumnDescriptor>,
}

impl SchemaRequest {
    /// Checks that column ids are unique within each side.
    pub fn validate(&self) -> Result<(), SchemaError> {
        check_unique(SchemaSide::Source, &self.source_schema)?;
        check_unique(SchemaSide::Destination, &self.destination_schema)
    }
}

fn check_unique(side: SchemaSide, columns: &[ColumnDescriptor]) -> Result<(), SchemaError> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.id.as_str()) {
            return Err(SchemaError::DuplicateColumnId {
                side,
                id: column.id.clone(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingPrediction {
    pub source_column_id: String,
    pub destination_column_id: String,
    pub confidence: f64,
    pub suggested_type: String,
    pub reason: String,
}

// Success body of POST /predict-mappings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub predictions: Vec<MappingPrediction>,
}

impl PredictionResponse {
    /// Parses and validates a response body. Confidence must lie in [0, 1].
    pub fn from_json(body: &str) -> Result<Self, SchemaError> {
        let response: PredictionResponse =
            serde_json::from_str(body).map_err(|e| SchemaError::InvalidPredictions(e.to_string()))?;

        for (index, prediction) in response.predictions.iter().enumerate() {
            if !(0.0..=1.0).contains(&prediction.confidence) {
                return Err(SchemaError::InvalidPredictions(format!(
                    "prediction {} has confidence {} outside [0, 1]",
                    index + 1,
                    prediction.confidence
                )));
            }
        }

        Ok(response)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSide {
    Source,
    Destination,
}

impl fmt::Display for SchemaSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSide::Source => write!(f, "source"),
            SchemaSide::Destination => write!(f, "destination"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    DuplicateColumnId { side: SchemaSide, id: String },
    UnknownColumnId { side: SchemaSide, id: String },
    InvalidPredictions(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::DuplicateColumnId { side, id } => {
                write!(f, "Duplicate {} column id: {}", side, id)
            }
            SchemaError::UnknownColumnId { side, id } => {
                write!(f, "Prediction references unknown {} column id: {}", side, id)
            }
            SchemaError::InvalidPredictions(msg) => write!(f, "Invalid prediction response: {}", msg),
        }
    }
}

impl Error for SchemaError {}

/// Id to column lookup for one side of a request.
pub struct ColumnIndex<'a> {
    side: SchemaSide,
    columns: HashMap<&'a str, &'a ColumnDescriptor>,
}

impl<'a> ColumnIndex<'a> {
    pub fn new(side: SchemaSide, columns: &'a [ColumnDescriptor]) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for column in columns {
            // First occurrence wins
            index.entry(column.id.as_str()).or_insert(column);
        }
        Self { side, columns: index }
    }

    pub fn resolve(&self, id: &str) -> Result<&'a ColumnDescriptor, SchemaError> {
        self.columns
            .get(id)
            .copied()
            .ok_or_else(|| SchemaError::UnknownColumnId {
                side: self.side,
                id: id.to_string(),
            })
    }
}
