//! OpenSearch index configuration and mappings.
//!
//! This module defines the settings and mappings for the patent index: full
//! text fields for title and abstract, keyword fields for exact lookups and a
//! `knn_vector` field whose dimension comes from the embedding model.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::errors::ProvisioningError;

/// Date formats accepted by `publication_date`.
pub const PUBLICATION_DATE_FORMAT: &str =
    "yyyy-MM-dd||yyyy||epoch_millis||strict_date_optional_time";

/// Name of the vector field.
pub const EMBEDDING_FIELD: &str = "embedding";

/// OpenSearch field type definitions used by the patent index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum FieldMapping {
    /// Analyzed full-text field.
    #[serde(rename = "text")]
    Text,
    /// Exact-match field.
    #[serde(rename = "keyword")]
    Keyword,
    /// 32-bit integer.
    #[serde(rename = "integer")]
    Integer,
    /// Date field accepting several formats separated by `||`.
    #[serde(rename = "date")]
    Date { format: String },
    /// Fixed-dimension vector searchable by nearest neighbour.
    #[serde(rename = "knn_vector")]
    KnnVector { dimension: usize },
}

/// Distance metric used by the k-NN plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpaceType {
    #[serde(rename = "cosinesimil")]
    Cosine,
    #[serde(rename = "l2")]
    L2,
    #[serde(rename = "innerproduct")]
    InnerProduct,
}

/// Index field mappings container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mappings {
    pub properties: BTreeMap<String, FieldMapping>,
}

/// Index-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSettings {
    pub index: KnnSettings,
}

/// The `index.knn*` settings block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnnSettings {
    pub knn: bool,
    #[serde(rename = "knn.space_type")]
    pub space_type: SpaceType,
}

/// Schema of the patent index: mappings plus vector search settings.
///
/// Built fresh for every provisioning run from the dimension reported by the
/// embedding model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSchema {
    pub mappings: Mappings,
    pub settings: IndexSettings,
}

impl IndexSchema {
    /// Build the patent schema for vectors of `dimension` components.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexSchema)` - The schema with cosine similarity enabled
    /// * `Err(ProvisioningError)` - If `dimension` is zero
    pub fn patents(dimension: usize) -> Result<Self, ProvisioningError> {
        if dimension == 0 {
            return Err(ProvisioningError::validation(
                "vector dimension must be positive",
            ));
        }

        let properties = BTreeMap::from([
            ("title".to_string(), FieldMapping::Text),
            ("abstract".to_string(), FieldMapping::Text),
            (
                "publication_date".to_string(),
                FieldMapping::Date {
                    format: PUBLICATION_DATE_FORMAT.to_string(),
                },
            ),
            ("patent_id".to_string(), FieldMapping::Keyword),
            ("pdf".to_string(), FieldMapping::Keyword),
            ("token_count".to_string(), FieldMapping::Integer),
            (
                EMBEDDING_FIELD.to_string(),
                FieldMapping::KnnVector { dimension },
            ),
        ]);

        Ok(Self {
            mappings: Mappings { properties },
            settings: IndexSettings {
                index: KnnSettings {
                    knn: true,
                    space_type: SpaceType::Cosine,
                },
            },
        })
    }

    /// Dimension declared on the vector field.
    pub fn dimension(&self) -> Option<usize> {
        match self.mappings.properties.get(EMBEDDING_FIELD) {
            Some(FieldMapping::KnnVector { dimension }) => Some(*dimension),
            _ => None,
        }
    }

    /// The create-index request body.
    pub fn to_body(&self) -> Result<Value, ProvisioningError> {
        serde_json::to_value(self).map_err(|e| ProvisioningError::parse(e.to_string()))
    }
}
